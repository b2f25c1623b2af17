use crate::ports::outbound::{
    AnalysisRecord, BranchRecord, BranchRepository, ComponentRepository, ComponentWithModuleUuid,
    KeyWithUuid, Scope,
};
use crate::shared::security::{read_regular_file, MAX_FILE_SIZE};
use crate::shared::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Persisted component row
///
/// `project_uuid` is the uuid of the root component of the branch the row
/// belongs to; the main branch root has its own uuid there.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentRow {
    pub uuid: String,
    pub key: String,
    pub project_uuid: String,
    #[serde(default)]
    pub module_uuid: Option<String>,
    #[serde(default)]
    pub path: Option<String>,
    pub scope: Scope,
}

impl ComponentRow {
    pub fn new(
        uuid: impl Into<String>,
        key: impl Into<String>,
        project_uuid: impl Into<String>,
        scope: Scope,
    ) -> Self {
        Self {
            uuid: uuid.into(),
            key: key.into(),
            project_uuid: project_uuid.into(),
            module_uuid: None,
            path: None,
            scope,
        }
    }

    pub fn with_module(mut self, module_uuid: impl Into<String>, path: Option<String>) -> Self {
        self.module_uuid = Some(module_uuid.into());
        self.path = path;
        self
    }
}

/// InMemoryRepository adapter holding a snapshot of persisted rows
///
/// Implements both [`ComponentRepository`] and [`BranchRepository`].
/// Branch rows follow the convention that a branch uuid is the uuid of the
/// branch's root component.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InMemoryRepository {
    #[serde(default)]
    components: Vec<ComponentRow>,
    #[serde(default)]
    branches: Vec<BranchRecord>,
    #[serde(default)]
    analyses: Vec<AnalysisRecord>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a snapshot (`components`, `branches`, `analyses`) from a JSON file
    ///
    /// # Errors
    /// Returns an error if the file is unsafe to read or is not a valid snapshot
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = read_regular_file(path, "repository snapshot", MAX_FILE_SIZE)?;
        let repository: Self = serde_json::from_str(&content).map_err(|e| {
            anyhow::anyhow!(
                "Failed to parse repository snapshot {}: {}",
                path.display(),
                e
            )
        })?;
        debug!(
            components = repository.components.len(),
            branches = repository.branches.len(),
            analyses = repository.analyses.len(),
            "Loaded repository snapshot"
        );
        Ok(repository)
    }

    pub fn with_component(mut self, row: ComponentRow) -> Self {
        self.components.push(row);
        self
    }

    pub fn with_branch(
        mut self,
        uuid: impl Into<String>,
        project_uuid: impl Into<String>,
        key: impl Into<String>,
    ) -> Self {
        self.branches.push(BranchRecord {
            uuid: uuid.into(),
            project_uuid: project_uuid.into(),
            key: key.into(),
            merge_branch_uuid: None,
        });
        self
    }

    pub fn with_analysis(mut self, analysis: AnalysisRecord) -> Self {
        self.analyses.push(analysis);
        self
    }

    /// Uuid of the main branch root of the project with the given key
    pub fn project_uuid(&self, project_key: &str) -> Option<&str> {
        self.components
            .iter()
            .find(|row| {
                row.key == project_key && row.scope == Scope::Project && row.module_uuid.is_none()
            })
            .map(|row| row.uuid.as_str())
    }

    fn keys_of_branch_root(&self, root_uuid: &str) -> Vec<KeyWithUuid> {
        self.components
            .iter()
            .filter(|row| row.project_uuid == root_uuid)
            .map(|row| KeyWithUuid::new(row.key.as_str(), row.uuid.as_str()))
            .collect()
    }

    fn keys_of_named_branch(&self, project_key: &str, branch_key: &str) -> Vec<KeyWithUuid> {
        let branch = self.project_uuid(project_key).and_then(|project_uuid| {
            self.branches
                .iter()
                .find(|branch| branch.project_uuid == project_uuid && branch.key == branch_key)
        });
        match branch {
            Some(branch) => self.keys_of_branch_root(&branch.uuid),
            None => Vec::new(),
        }
    }
}

impl ComponentRepository for InMemoryRepository {
    fn select_uuids_by_key_for_main(&self, project_key: &str) -> Result<Vec<KeyWithUuid>> {
        Ok(self
            .project_uuid(project_key)
            .map(|project_uuid| self.keys_of_branch_root(project_uuid))
            .unwrap_or_default())
    }

    fn select_uuids_by_key_for_branch(
        &self,
        project_key: &str,
        branch: &str,
    ) -> Result<Vec<KeyWithUuid>> {
        Ok(self.keys_of_named_branch(project_key, branch))
    }

    fn select_uuids_by_key_for_pull_request(
        &self,
        project_key: &str,
        pull_request: &str,
    ) -> Result<Vec<KeyWithUuid>> {
        Ok(self.keys_of_named_branch(project_key, pull_request))
    }

    fn select_components_with_module_uuid(
        &self,
        root_key: &str,
    ) -> Result<Vec<ComponentWithModuleUuid>> {
        let Some(project_uuid) = self.project_uuid(root_key) else {
            return Ok(Vec::new());
        };
        Ok(self
            .components
            .iter()
            .filter(|row| row.project_uuid == project_uuid)
            .map(|row| ComponentWithModuleUuid {
                uuid: row.uuid.clone(),
                key: row.key.clone(),
                module_uuid: row.module_uuid.clone(),
                path: row.path.clone(),
                scope: row.scope,
            })
            .collect())
    }

    fn select_keys_by_branch_uuid(&self, branch_uuid: &str) -> Result<Vec<KeyWithUuid>> {
        Ok(self.keys_of_branch_root(branch_uuid))
    }

    fn select_last_analysis(&self, root_uuid: &str) -> Result<Option<AnalysisRecord>> {
        Ok(self
            .analyses
            .iter()
            .filter(|analysis| analysis.root_component_uuid == root_uuid)
            .max_by_key(|analysis| analysis.created_at)
            .cloned())
    }
}

impl BranchRepository for InMemoryRepository {
    fn select_by_uuid(&self, uuid: &str) -> Result<Option<BranchRecord>> {
        Ok(self.branches.iter().find(|branch| branch.uuid == uuid).cloned())
    }

    fn select_by_branch_key(&self, project_uuid: &str, key: &str) -> Result<Option<BranchRecord>> {
        Ok(self
            .branches
            .iter()
            .find(|branch| branch.project_uuid == project_uuid && branch.key == key)
            .cloned())
    }
}
