use crate::shared::{Result, TreeError};
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// Attributes of a PROJECT component
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectAttributes {
    project_version: String,
    build_string: Option<String>,
}

impl ProjectAttributes {
    pub fn new(project_version: impl Into<String>, build_string: Option<String>) -> Self {
        Self {
            project_version: project_version.into(),
            build_string,
        }
    }

    pub fn project_version(&self) -> &str {
        &self.project_version
    }

    pub fn build_string(&self) -> Option<&str> {
        self.build_string.as_deref()
    }
}

/// Attributes of a FILE component
///
/// The number of lines is mandatory and must be strictly positive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileAttributes {
    unit_test: bool,
    language_key: Option<Arc<str>>,
    lines: i32,
    marked_as_unchanged: bool,
    old_relative_file_path: Option<String>,
}

impl FileAttributes {
    pub fn new(unit_test: bool, language_key: Option<Arc<str>>, lines: i32) -> Result<Self> {
        if lines <= 0 {
            return Err(TreeError::InvalidLineCount { lines }.into());
        }
        Ok(Self {
            unit_test,
            language_key,
            lines,
            marked_as_unchanged: false,
            old_relative_file_path: None,
        })
    }

    /// Marks the file data as reused unchanged from a previous analysis
    pub fn with_marked_as_unchanged(mut self, marked_as_unchanged: bool) -> Self {
        self.marked_as_unchanged = marked_as_unchanged;
        self
    }

    /// Path the file had before SCM move detection renamed it
    pub fn with_old_relative_file_path(mut self, old_relative_file_path: Option<String>) -> Self {
        self.old_relative_file_path = old_relative_file_path;
        self
    }

    pub fn is_unit_test(&self) -> bool {
        self.unit_test
    }

    pub fn language_key(&self) -> Option<&str> {
        self.language_key.as_deref()
    }

    pub fn lines(&self) -> i32 {
        self.lines
    }

    pub fn is_marked_as_unchanged(&self) -> bool {
        self.marked_as_unchanged
    }

    pub fn old_relative_file_path(&self) -> Option<&str> {
        self.old_relative_file_path.as_deref()
    }
}

/// Kind of a root view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewType {
    Portfolio,
    Application,
}

/// Attributes of a VIEW component
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewAttributes {
    view_type: ViewType,
}

impl ViewAttributes {
    pub fn new(view_type: ViewType) -> Self {
        Self { view_type }
    }

    pub fn view_type(&self) -> ViewType {
        self.view_type
    }
}

/// Attributes of a SUBVIEW component
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubViewAttributes {
    original_view_uuid: Option<String>,
}

impl SubViewAttributes {
    pub fn new(original_view_uuid: Option<String>) -> Self {
        Self { original_view_uuid }
    }

    /// Uuid of the view this sub-view is a local reference to, if any
    pub fn original_view_uuid(&self) -> Option<&str> {
        self.original_view_uuid.as_deref()
    }
}

/// Attributes of a PROJECT_VIEW component
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectViewAttributes {
    project_uuid: String,
    original_key: String,
    analysis_date: Option<DateTime<Utc>>,
}

impl ProjectViewAttributes {
    pub fn new(
        project_uuid: impl Into<String>,
        original_key: impl Into<String>,
        analysis_date: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            project_uuid: project_uuid.into(),
            original_key: original_key.into(),
            analysis_date,
        }
    }

    pub fn project_uuid(&self) -> &str {
        &self.project_uuid
    }

    pub fn original_key(&self) -> &str {
        &self.original_key
    }

    pub fn analysis_date(&self) -> Option<DateTime<Utc>> {
        self.analysis_date
    }
}

/// Scanner-side attributes: the originating report ref (absent for
/// synthesized directories) and the SCM-relative path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportAttributes {
    component_ref: Option<i32>,
    scm_path: Option<String>,
}

impl ReportAttributes {
    pub fn new(component_ref: Option<i32>, scm_path: Option<String>) -> Self {
        Self {
            component_ref,
            scm_path,
        }
    }

    pub fn component_ref(&self) -> Option<i32> {
        self.component_ref
    }

    pub fn scm_path(&self) -> Option<&str> {
        self.scm_path.as_deref()
    }
}
