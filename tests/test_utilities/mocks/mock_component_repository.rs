use ce_component_tree::ports::outbound::{
    AnalysisRecord, BranchRecord, ComponentWithModuleUuid, KeyWithUuid,
};
use ce_component_tree::prelude::*;
use chrono::Utc;
use std::cell::Cell;
use std::collections::HashMap;

/// Mock ComponentRepository and BranchRepository for testing
pub struct MockComponentRepository {
    pub main_uuids: Vec<KeyWithUuid>,
    /// Persisted uuids by branch name or pull request key
    pub branch_uuids: HashMap<String, Vec<KeyWithUuid>>,
    pub module_components: Vec<ComponentWithModuleUuid>,
    pub keys_by_branch_uuid: HashMap<String, Vec<KeyWithUuid>>,
    pub analyses: HashMap<String, AnalysisRecord>,
    pub branches: Vec<BranchRecord>,
    pub should_fail: bool,
    pub module_queries: Cell<usize>,
}

impl MockComponentRepository {
    pub fn new() -> Self {
        Self {
            main_uuids: Vec::new(),
            branch_uuids: HashMap::new(),
            module_components: Vec::new(),
            keys_by_branch_uuid: HashMap::new(),
            analyses: HashMap::new(),
            branches: Vec::new(),
            should_fail: false,
            module_queries: Cell::new(0),
        }
    }

    pub fn with_uuid(mut self, key: &str, uuid: &str) -> Self {
        self.main_uuids.push(KeyWithUuid::new(key, uuid));
        self
    }

    pub fn with_branch_uuid(mut self, branch: &str, key: &str, uuid: &str) -> Self {
        self.branch_uuids
            .entry(branch.to_string())
            .or_default()
            .push(KeyWithUuid::new(key, uuid));
        self
    }

    pub fn with_module_component(mut self, component: ComponentWithModuleUuid) -> Self {
        self.module_components.push(component);
        self
    }

    pub fn with_analysis(mut self, root_uuid: &str, project_version: Option<&str>) -> Self {
        self.analyses.insert(
            root_uuid.to_string(),
            AnalysisRecord {
                uuid: format!("{}_ANALYSIS", root_uuid),
                root_component_uuid: root_uuid.to_string(),
                created_at: Utc::now(),
                project_version: project_version.map(str::to_string),
            },
        );
        self
    }

    pub fn with_branch(mut self, uuid: &str, project_uuid: &str, key: &str, keys: &[(&str, &str)]) -> Self {
        self.branches.push(BranchRecord {
            uuid: uuid.to_string(),
            project_uuid: project_uuid.to_string(),
            key: key.to_string(),
            merge_branch_uuid: None,
        });
        self.keys_by_branch_uuid.insert(
            uuid.to_string(),
            keys.iter()
                .map(|(key, uuid)| KeyWithUuid::new(*key, *uuid))
                .collect(),
        );
        self
    }

    /// Records that the branch row `branch_uuid` merges into `merge_branch_uuid`
    pub fn with_merge_branch(mut self, branch_uuid: &str, merge_branch_uuid: &str) -> Self {
        if let Some(branch) = self.branches.iter_mut().find(|b| b.uuid == branch_uuid) {
            branch.merge_branch_uuid = Some(merge_branch_uuid.to_string());
        }
        self
    }

    pub fn with_failure() -> Self {
        Self {
            should_fail: true,
            ..Self::new()
        }
    }

    fn check(&self) -> Result<()> {
        if self.should_fail {
            anyhow::bail!("Mock repository failure");
        }
        Ok(())
    }
}

impl Default for MockComponentRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl ComponentRepository for MockComponentRepository {
    fn select_uuids_by_key_for_main(&self, _project_key: &str) -> Result<Vec<KeyWithUuid>> {
        self.check()?;
        Ok(self.main_uuids.clone())
    }

    fn select_uuids_by_key_for_branch(
        &self,
        _project_key: &str,
        branch: &str,
    ) -> Result<Vec<KeyWithUuid>> {
        self.check()?;
        Ok(self.branch_uuids.get(branch).cloned().unwrap_or_default())
    }

    fn select_uuids_by_key_for_pull_request(
        &self,
        _project_key: &str,
        pull_request: &str,
    ) -> Result<Vec<KeyWithUuid>> {
        self.check()?;
        Ok(self.branch_uuids.get(pull_request).cloned().unwrap_or_default())
    }

    fn select_components_with_module_uuid(
        &self,
        _root_key: &str,
    ) -> Result<Vec<ComponentWithModuleUuid>> {
        self.check()?;
        self.module_queries.set(self.module_queries.get() + 1);
        Ok(self.module_components.clone())
    }

    fn select_keys_by_branch_uuid(&self, branch_uuid: &str) -> Result<Vec<KeyWithUuid>> {
        self.check()?;
        Ok(self.keys_by_branch_uuid.get(branch_uuid).cloned().unwrap_or_default())
    }

    fn select_last_analysis(&self, root_uuid: &str) -> Result<Option<AnalysisRecord>> {
        self.check()?;
        Ok(self.analyses.get(root_uuid).cloned())
    }
}

impl BranchRepository for MockComponentRepository {
    fn select_by_uuid(&self, uuid: &str) -> Result<Option<BranchRecord>> {
        self.check()?;
        Ok(self.branches.iter().find(|branch| branch.uuid == uuid).cloned())
    }

    fn select_by_branch_key(&self, project_uuid: &str, key: &str) -> Result<Option<BranchRecord>> {
        self.check()?;
        Ok(self
            .branches
            .iter()
            .find(|branch| branch.project_uuid == project_uuid && branch.key == key)
            .cloned())
    }
}
