//! ce-component-tree - Component tree construction and traversal
//!
//! This library builds the tree of components (project, directories, files)
//! of an analysis from a flat scanner report, resolves stable uuids for
//! every component against persisted identities, and lets computation steps
//! walk the tree with type-aware or path-aware visitors.
//!
//! # Architecture
//!
//! The library is organized into the following layers:
//!
//! - **Domain Layer** (`component_tree`): Component model, tree construction
//!   services and the visitor engine
//! - **Application Layer** (`application`): The build component tree use case
//! - **Ports** (`ports`): Interface definitions for infrastructure
//! - **Adapters** (`adapters`): Concrete implementations of ports
//! - **Shared** (`shared`): Common utilities and error types
//!
//! # Example
//!
//! ```no_run
//! use ce_component_tree::prelude::*;
//! use std::path::Path;
//!
//! # fn main() -> Result<()> {
//! // Create adapters
//! let report_reader = JsonReportReader::from_path(Path::new("report.json"))?;
//! let repository = InMemoryRepository::from_path(Path::new("db.json"))?;
//! let branch = branch_from_metadata(&report_reader.read_metadata()?);
//!
//! // Create use case and build the tree
//! let use_case = BuildComponentTreeUseCase::new(report_reader, repository);
//! let holder = TreeRootHolder::new();
//! let project = Project::new("AXx1", "my-project", "My Project", None);
//! let response = use_case.execute(BuildTreeRequest::new(project, branch, None), &holder)?;
//!
//! // Walk it
//! let mut line_counter = LineCounter::new();
//! VisitorsCrawler::new(vec![ComponentVisitor::path_aware(&mut line_counter)])
//!     .visit(holder.root()?)?;
//! println!("{} components", response.component_count);
//! # Ok(())
//! # }
//! ```

pub mod adapters;
pub mod application;
pub mod component_tree;
pub mod ports;
pub mod shared;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::adapters::outbound::console::{LineCount, LineCounter, TreePrinter};
    pub use crate::adapters::outbound::filesystem::JsonReportReader;
    pub use crate::adapters::outbound::memory::InMemoryRepository;
    pub use crate::application::dto::{BuildTreeRequest, BuildTreeResponse};
    pub use crate::application::use_cases::{
        branch_from_metadata, resolve_merge_branch, BuildComponentTreeUseCase,
    };
    pub use crate::component_tree::domain::{
        Branch, Component, ComponentAttributes, ComponentType, CrawlerDepthLimit, Project, Status,
    };
    pub use crate::component_tree::services::{
        build_changed_component_tree_root, BranchComponentUuids, BranchSource, ComponentUuidFactory,
        TreeRootHolder,
    };
    pub use crate::component_tree::visitors::{
        ComponentVisitor, Order, Path, PathAwareVisitor, TypeAwareVisitor, VisitorsCrawler,
    };
    pub use crate::ports::outbound::{
        BranchRepository, ComponentRepository, ReportComponent, ReportMetadata, ScannerReportReader,
    };
    pub use crate::shared::{Result, TreeError};
}
