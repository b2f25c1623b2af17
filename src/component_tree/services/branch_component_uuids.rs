use crate::component_tree::domain::{remove_branch_and_pull_request_from_key, Branch, Project};
use crate::ports::outbound::{BranchRepository, ComponentRepository, KeyWithUuid};
use crate::shared::{Result, TreeError};
use once_cell::unsync::OnceCell;
use std::collections::HashMap;
use tracing::debug;

/// Branch whose components are indexed by [`BranchComponentUuids`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BranchSource {
    /// Branch a non-main branch or pull request merges into
    MergeBranch,
    /// Branch a pull request targets
    TargetBranch,
    /// New-code reference branch
    ReferenceBranch,
}

/// Uuids of the components of another branch, by branch-less key.
///
/// Used to find, for a component of the analyzed branch, its counterpart
/// in the merge, target or reference branch. The index is loaded on first
/// query, and only when the source applies to the analyzed branch; when it
/// doesn't, every query answers `None` without touching the repositories.
pub struct BranchComponentUuids<'a, C: ?Sized, B: ?Sized> {
    source: BranchSource,
    branch: &'a Branch,
    project: &'a Project,
    component_repository: &'a C,
    branch_repository: &'a B,
    uuids_by_key: OnceCell<HashMap<String, String>>,
}

impl<'a, C, B> BranchComponentUuids<'a, C, B>
where
    C: ComponentRepository + ?Sized,
    B: BranchRepository + ?Sized,
{
    pub fn new(
        source: BranchSource,
        branch: &'a Branch,
        project: &'a Project,
        component_repository: &'a C,
        branch_repository: &'a B,
    ) -> Self {
        Self {
            source,
            branch,
            project,
            component_repository,
            branch_repository,
            uuids_by_key: OnceCell::new(),
        }
    }

    /// Whether the analyzed branch has such a counterpart branch at all
    pub fn applies(&self) -> bool {
        match self.source {
            BranchSource::MergeBranch => !self.branch.is_main(),
            BranchSource::TargetBranch => self.branch.is_pull_request(),
            BranchSource::ReferenceBranch => self.branch.reference_branch_name().is_some(),
        }
    }

    /// Uuid of the counterpart of the component with the given db key
    ///
    /// A branch built from report metadata only knows its merge branch
    /// after `resolve_merge_branch`.
    ///
    /// # Errors
    /// Returns an error if:
    /// - the merge branch is required but unknown or not persisted
    /// - the reference branch is required but not persisted
    /// - a repository fails
    pub fn get_uuid(&self, db_key: &str) -> Result<Option<String>> {
        if !self.applies() {
            return Ok(None);
        }
        let uuids_by_key = self.uuids_by_key.get_or_try_init(|| self.load())?;
        Ok(uuids_by_key
            .get(remove_branch_and_pull_request_from_key(db_key))
            .cloned())
    }

    fn load(&self) -> Result<HashMap<String, String>> {
        let branch_uuid = match self.source {
            BranchSource::MergeBranch => Some(self.merge_branch_uuid()?),
            BranchSource::TargetBranch => self.target_branch_uuid()?,
            BranchSource::ReferenceBranch => self.reference_branch_uuid()?,
        };
        let Some(branch_uuid) = branch_uuid else {
            return Ok(HashMap::new());
        };

        let uuids_by_key: HashMap<String, String> = self
            .component_repository
            .select_keys_by_branch_uuid(&branch_uuid)?
            .into_iter()
            .map(|KeyWithUuid { key, uuid }| {
                (remove_branch_and_pull_request_from_key(&key).to_string(), uuid)
            })
            .collect();
        debug!(
            source = ?self.source,
            branch_uuid = %branch_uuid,
            components = uuids_by_key.len(),
            "Loaded branch component uuids"
        );
        Ok(uuids_by_key)
    }

    fn merge_branch_uuid(&self) -> Result<String> {
        let merge_branch_uuid =
            self.branch
                .merge_branch_uuid()
                .ok_or_else(|| TreeError::MissingMergeBranch {
                    branch: self.branch.name().to_string(),
                })?;
        let record = self
            .branch_repository
            .select_by_uuid(merge_branch_uuid)?
            .ok_or_else(|| TreeError::BranchNotFound {
                source_name: "Merge",
                branch: merge_branch_uuid.to_string(),
            })?;
        Ok(record.uuid)
    }

    fn target_branch_uuid(&self) -> Result<Option<String>> {
        let Some(target_branch_name) = self.branch.target_branch_name() else {
            return Ok(None);
        };
        let record = self
            .branch_repository
            .select_by_branch_key(self.project.uuid(), target_branch_name)?;
        match record {
            Some(record) => self.analyzed_branch_uuid(record.uuid),
            None => Ok(None),
        }
    }

    fn reference_branch_uuid(&self) -> Result<Option<String>> {
        let Some(reference_branch_name) = self.branch.reference_branch_name() else {
            return Ok(None);
        };
        let record = self
            .branch_repository
            .select_by_branch_key(self.project.uuid(), reference_branch_name)?
            .ok_or_else(|| TreeError::BranchNotFound {
                source_name: "Reference",
                branch: reference_branch_name.to_string(),
            })?;
        self.analyzed_branch_uuid(record.uuid)
    }

    /// `branch_uuid` if the branch was analyzed at least once
    fn analyzed_branch_uuid(&self, branch_uuid: String) -> Result<Option<String>> {
        let analysis = self.component_repository.select_last_analysis(&branch_uuid)?;
        Ok(analysis.map(|_| branch_uuid))
    }
}
