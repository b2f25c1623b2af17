use crate::shared::Result;
use serde::{Deserialize, Serialize};

/// Persisted branch or pull request row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BranchRecord {
    pub uuid: String,
    pub project_uuid: String,
    pub key: String,
    /// Branch this one merges into, absent for the main branch
    #[serde(default)]
    pub merge_branch_uuid: Option<String>,
}

/// BranchRepository port for looking up persisted branches
pub trait BranchRepository {
    /// Branch row with the given uuid
    fn select_by_uuid(&self, uuid: &str) -> Result<Option<BranchRecord>>;

    /// Branch row of a project by branch name
    ///
    /// # Arguments
    /// * `project_uuid` - Uuid of the project owning the branch
    /// * `key` - Branch name
    fn select_by_branch_key(&self, project_uuid: &str, key: &str) -> Result<Option<BranchRecord>>;
}
