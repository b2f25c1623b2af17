use crate::component_tree::domain::{BranchType, Status};
use crate::shared::{Result, TreeError};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Component type as written by the scanner.
///
/// Values unknown to this version of the reader deserialize to
/// `Unrecognized` and are rejected by the tree builder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReportComponentType {
    #[default]
    Unset,
    Project,
    Module,
    Directory,
    File,
    #[serde(other)]
    Unrecognized,
}

impl fmt::Display for ReportComponentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ReportComponentType::Unset => "UNSET",
            ReportComponentType::Project => "PROJECT",
            ReportComponentType::Module => "MODULE",
            ReportComponentType::Directory => "DIRECTORY",
            ReportComponentType::File => "FILE",
            ReportComponentType::Unrecognized => "UNRECOGNIZED",
        };
        f.write_str(name)
    }
}

/// File status as written by the scanner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FileStatus {
    #[default]
    Unavailable,
    Same,
    Changed,
    Added,
    #[serde(other)]
    Unrecognized,
}

impl FileStatus {
    /// Converts to the component status; unrecognized values are a fault.
    pub fn to_status(self) -> Result<Status> {
        match self {
            FileStatus::Unavailable => Ok(Status::Unavailable),
            FileStatus::Same => Ok(Status::Same),
            FileStatus::Changed => Ok(Status::Changed),
            FileStatus::Added => Ok(Status::Added),
            FileStatus::Unrecognized => Err(TreeError::UnsupportedStatus {
                status: "UNRECOGNIZED".to_string(),
            }
            .into()),
        }
    }
}

/// One entry of the scanner report's flat, ref-indexed component list
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportComponent {
    #[serde(rename = "ref")]
    pub reference: i32,
    #[serde(rename = "type")]
    pub component_type: ReportComponentType,
    pub key: String,
    pub name: String,
    pub description: String,
    pub project_relative_path: String,
    pub language: String,
    pub is_test: bool,
    pub lines: i32,
    pub status: FileStatus,
    pub marked_as_unchanged: bool,
    pub old_relative_file_path: String,
    pub child_refs: Vec<i32>,
}

impl ReportComponent {
    pub fn new(reference: i32, component_type: ReportComponentType) -> Self {
        Self {
            reference,
            component_type,
            ..Self::default()
        }
    }
}

/// Report-level metadata
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportMetadata {
    pub project_key: String,
    pub root_component_ref: i32,
    pub project_version: String,
    pub build_string: String,
    pub relative_path_from_scm_root: String,
    pub branch_name: String,
    pub branch_type: Option<BranchType>,
    pub pull_request_key: String,
    /// Branch a pull request will be merged into
    pub target_branch_name: String,
    pub reference_branch_name: String,
    /// Legacy multi-module layout: module key to its project-relative path
    pub modules_project_relative_path_by_key: HashMap<String, String>,
}

/// ScannerReportReader port for reading the scanner's analysis report
///
/// This port abstracts where the report comes from (an extracted report
/// directory, a JSON dump, an in-memory fixture).
pub trait ScannerReportReader {
    /// Reads the report-level metadata
    ///
    /// # Errors
    /// Returns an error if the metadata cannot be read or decoded
    fn read_metadata(&self) -> Result<ReportMetadata>;

    /// Reads one component of the report
    ///
    /// # Arguments
    /// * `component_ref` - Scanner reference of the component
    ///
    /// # Errors
    /// Returns an error if no component exists for `component_ref`
    fn read_component(&self, component_ref: i32) -> Result<ReportComponent>;
}
