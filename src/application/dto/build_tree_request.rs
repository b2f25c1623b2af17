use crate::component_tree::domain::{Branch, Project};

/// BuildTreeRequest - Request DTO for the build component tree use case
#[derive(Debug, Clone)]
pub struct BuildTreeRequest {
    /// Project as persisted (uuid, key, name)
    pub project: Project,
    /// Analyzed branch or pull request
    pub branch: Branch,
    /// Path of the project inside its SCM repository.
    /// When absent, the path recorded in the report metadata is used.
    pub scm_base_path: Option<String>,
}

impl BuildTreeRequest {
    pub fn new(project: Project, branch: Branch, scm_base_path: Option<String>) -> Self {
        Self {
            project,
            branch,
            scm_base_path,
        }
    }
}
