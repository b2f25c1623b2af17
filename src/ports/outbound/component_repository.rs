use crate::shared::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Persisted (key, uuid) pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyWithUuid {
    pub key: String,
    pub uuid: String,
}

impl KeyWithUuid {
    pub fn new(key: impl Into<String>, uuid: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            uuid: uuid.into(),
        }
    }
}

/// Qualifier scope of a persisted component row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Scope {
    /// Projects and legacy modules
    Project,
    Directory,
    File,
}

/// Persisted component together with the legacy module it belonged to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentWithModuleUuid {
    pub uuid: String,
    pub key: String,
    pub module_uuid: Option<String>,
    pub path: Option<String>,
    pub scope: Scope,
}

/// A persisted analysis of a root component
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisRecord {
    pub uuid: String,
    pub root_component_uuid: String,
    pub created_at: DateTime<Utc>,
    pub project_version: Option<String>,
}

/// ComponentRepository port for reading persisted component identities
///
/// Consumed synchronously while the tree is being built; implementations
/// may block on first use.
pub trait ComponentRepository {
    /// Persisted (key, uuid) pairs of the project's main branch
    fn select_uuids_by_key_for_main(&self, project_key: &str) -> Result<Vec<KeyWithUuid>>;

    /// Persisted (key, uuid) pairs of a named branch of the project
    fn select_uuids_by_key_for_branch(
        &self,
        project_key: &str,
        branch: &str,
    ) -> Result<Vec<KeyWithUuid>>;

    /// Persisted (key, uuid) pairs of a pull request of the project
    fn select_uuids_by_key_for_pull_request(
        &self,
        project_key: &str,
        pull_request: &str,
    ) -> Result<Vec<KeyWithUuid>>;

    /// All persisted components of the root, with their historical module
    ///
    /// # Arguments
    /// * `root_key` - Key of the project whose rows are loaded
    fn select_components_with_module_uuid(
        &self,
        root_key: &str,
    ) -> Result<Vec<ComponentWithModuleUuid>>;

    /// Enabled (key, uuid) pairs of every component of a branch
    fn select_keys_by_branch_uuid(&self, branch_uuid: &str) -> Result<Vec<KeyWithUuid>>;

    /// Last analysis of a root component, if any
    fn select_last_analysis(&self, root_uuid: &str) -> Result<Option<AnalysisRecord>>;
}
