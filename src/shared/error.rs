use std::fmt;
use thiserror::Error;

/// Exit codes for the `ce-tree` binary.
///
/// These codes allow callers to tell a malformed report apart from
/// environment problems such as unreadable files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Tree built and printed
    Success = 0,
    /// Tree construction or traversal fault (any [`TreeError`])
    BuildFailed = 1,
    /// Invalid command-line arguments (clap parsing errors)
    InvalidArguments = 2,
    /// Application error (file I/O, JSON/YAML parsing, configuration)
    ApplicationError = 3,
}

impl ExitCode {
    /// Convert to i32 for use with std::process::exit
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Picks the exit code matching the root cause of an error.
    ///
    /// A visitor failure is a build failure unless what the visitor hit
    /// was an I/O error.
    pub fn for_error(error: &anyhow::Error) -> Self {
        let mut visit_failed = false;
        for cause in error.chain() {
            match cause.downcast_ref::<TreeError>() {
                Some(TreeError::VisitFailed { source, .. }) => {
                    if source.chain().any(|inner| inner.is::<std::io::Error>()) {
                        return ExitCode::ApplicationError;
                    }
                    visit_failed = true;
                }
                Some(_) => return ExitCode::BuildFailed,
                None => {}
            }
        }
        if visit_failed {
            ExitCode::BuildFailed
        } else {
            ExitCode::ApplicationError
        }
    }
}

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExitCode::Success => write!(f, "Success (0)"),
            ExitCode::BuildFailed => write!(f, "Build Failed (1)"),
            ExitCode::InvalidArguments => write!(f, "Invalid Arguments (2)"),
            ExitCode::ApplicationError => write!(f, "Application Error (3)"),
        }
    }
}

/// Faults raised while building, holding or traversing a component tree.
///
/// None of them are retried: they propagate to the owning task, which
/// decides whether the analysis fails.
#[derive(Debug, Error)]
pub enum TreeError {
    #[error("Expected root component of type 'PROJECT'")]
    ExpectedProjectRoot,

    #[error("Unsupported component type '{component_type}'")]
    UnsupportedComponentType { component_type: String },

    #[error("Files should have a project relative path: ref {component_ref}")]
    MissingProjectRelativePath { component_ref: i32 },

    #[error("File '{path}' has no line")]
    FileHasNoLine { path: String },

    #[error("Duplicate file path '{path}' in scanner report")]
    DuplicateFilePath { path: String },

    #[error("File '{path}' is nested under another file")]
    FileUnderFile { path: String },

    #[error("Number of lines must be greater than zero, got {lines}")]
    InvalidLineCount { lines: i32 },

    #[error("Unsupported file status value '{status}'")]
    UnsupportedStatus { status: String },

    #[error("Invalid component: {message}")]
    InvalidComponent { message: String },

    #[error("No component for ref {component_ref} in scanner report")]
    MissingReportComponent { component_ref: i32 },

    #[error("root can not be set twice in holder")]
    HolderAlreadyInitialized,

    #[error("Holder has not been initialized yet")]
    HolderNotInitialized,

    #[error("Component with ref '{component_ref}' can't be found")]
    ComponentNotFoundByRef { component_ref: i32 },

    #[error("Component with uuid '{uuid}' can't be found")]
    ComponentNotFoundByUuid { uuid: String },

    #[error("Branch '{branch}' has no merge branch")]
    MissingMergeBranch { branch: String },

    #[error("{source_name} branch '{branch}' does not exist")]
    BranchNotFound {
        source_name: &'static str,
        branch: String,
    },

    #[error("Duration has not been computed")]
    DurationNotComputed,

    #[error("Visit of Component {{key={key},type={component_type}}} failed")]
    VisitFailed {
        key: String,
        component_type: String,
        #[source]
        source: anyhow::Error,
    },
}

impl TreeError {
    pub(crate) fn invalid_component(message: impl Into<String>) -> Self {
        TreeError::InvalidComponent {
            message: message.into(),
        }
    }

    /// Whether this error already carries the crawler's diagnostic context.
    pub fn is_visit_failure(&self) -> bool {
        matches!(self, TreeError::VisitFailed { .. })
    }
}
