/// Component model of the analyzed tree
///
/// Immutable value types only; construction and traversal live in
/// the sibling `services` and `visitors` modules.
pub mod attributes;
pub mod branch;
pub mod component;
pub mod depth_limit;

pub use attributes::{
    FileAttributes, ProjectAttributes, ProjectViewAttributes, ReportAttributes, SubViewAttributes,
    ViewAttributes, ViewType,
};
pub use branch::{
    effective_key, remove_branch_and_pull_request_from_key, Branch, BranchScope, BranchType,
    Project,
};
pub use component::{Component, ComponentAttributes, ComponentBuilder, ComponentType, Status};
pub use depth_limit::CrawlerDepthLimit;
