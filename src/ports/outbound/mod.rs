/// Outbound ports (Driven ports) - Infrastructure interfaces
///
/// These ports define the interfaces that the tree construction uses
/// to read the scanner report and the persisted component identities.
pub mod branch_repository;
pub mod component_repository;
pub mod scanner_report_reader;

pub use branch_repository::{BranchRecord, BranchRepository};
pub use component_repository::{
    AnalysisRecord, ComponentRepository, ComponentWithModuleUuid, KeyWithUuid, Scope,
};
pub use scanner_report_reader::{
    FileStatus, ReportComponent, ReportComponentType, ReportMetadata, ScannerReportReader,
};
