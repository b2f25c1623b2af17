use serde::{Deserialize, Serialize};

const BRANCH_KEY_SEPARATOR: &str = ":BRANCH:";
const PULL_REQUEST_SEPARATOR: &str = ":PULL_REQUEST:";

/// Kind of the analyzed branch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BranchType {
    Long,
    Short,
    PullRequest,
}

/// Scope used to select persisted identities for a branch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BranchScope {
    MainBranch,
    Branch(String),
    PullRequest(String),
}

/// The branch (or pull request) being analyzed.
///
/// Carries what the tree construction needs to know about the analysis
/// scope: whether it targets main, which persisted branch it merges into,
/// and the new-code reference branch if one is configured.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Branch {
    branch_type: BranchType,
    name: String,
    is_main: bool,
    merge_branch_uuid: Option<String>,
    target_branch_name: Option<String>,
    pull_request_key: Option<String>,
    reference_branch_name: Option<String>,
}

impl Branch {
    /// The main branch of a project
    pub fn main(name: impl Into<String>) -> Self {
        Self {
            branch_type: BranchType::Long,
            name: name.into(),
            is_main: true,
            merge_branch_uuid: None,
            target_branch_name: None,
            pull_request_key: None,
            reference_branch_name: None,
        }
    }

    /// A long-lived branch other than main
    pub fn long(name: impl Into<String>, merge_branch_uuid: Option<String>) -> Self {
        Self {
            branch_type: BranchType::Long,
            is_main: false,
            merge_branch_uuid,
            ..Self::main(name)
        }
    }

    /// A short-lived branch, compared against the branch it merges into
    pub fn short(name: impl Into<String>, merge_branch_uuid: Option<String>) -> Self {
        Self {
            branch_type: BranchType::Short,
            is_main: false,
            merge_branch_uuid,
            ..Self::main(name)
        }
    }

    /// A pull request; `target_branch_name` is the branch it will be merged into
    pub fn pull_request(
        pull_request_key: impl Into<String>,
        merge_branch_uuid: Option<String>,
        target_branch_name: Option<String>,
    ) -> Self {
        let pull_request_key = pull_request_key.into();
        Self {
            branch_type: BranchType::PullRequest,
            is_main: false,
            merge_branch_uuid,
            target_branch_name,
            pull_request_key: Some(pull_request_key.clone()),
            ..Self::main(pull_request_key)
        }
    }

    /// Sets the merge branch once it has been resolved from persisted rows
    pub fn with_merge_branch_uuid(mut self, merge_branch_uuid: Option<String>) -> Self {
        self.merge_branch_uuid = merge_branch_uuid;
        self
    }

    pub fn with_reference_branch_name(mut self, reference_branch_name: Option<String>) -> Self {
        self.reference_branch_name = reference_branch_name;
        self
    }

    pub fn branch_type(&self) -> BranchType {
        self.branch_type
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_main(&self) -> bool {
        self.is_main
    }

    pub fn is_pull_request(&self) -> bool {
        self.branch_type == BranchType::PullRequest
    }

    /// Short-lived branches and pull requests only materialize what changed
    pub fn is_short_lived(&self) -> bool {
        matches!(
            self.branch_type,
            BranchType::Short | BranchType::PullRequest
        )
    }

    pub fn merge_branch_uuid(&self) -> Option<&str> {
        self.merge_branch_uuid.as_deref()
    }

    pub fn target_branch_name(&self) -> Option<&str> {
        self.target_branch_name.as_deref()
    }

    pub fn pull_request_key(&self) -> Option<&str> {
        self.pull_request_key.as_deref()
    }

    pub fn reference_branch_name(&self) -> Option<&str> {
        self.reference_branch_name.as_deref()
    }

    /// Scope used to load persisted identities for this branch
    pub fn scope(&self) -> BranchScope {
        if self.is_main {
            BranchScope::MainBranch
        } else if let Some(pull_request_key) = &self.pull_request_key {
            BranchScope::PullRequest(pull_request_key.clone())
        } else {
            BranchScope::Branch(self.name.clone())
        }
    }

    /// Branch-aware database key for a component.
    ///
    /// Main branch keys are `projectKey` or `projectKey:path`; other branches
    /// append `:BRANCH:<name>` and pull requests `:PULL_REQUEST:<key>`.
    pub fn generate_key(&self, project_key: &str, file_or_dir_path: Option<&str>) -> String {
        let effective_key = effective_key(project_key, file_or_dir_path);
        match self.scope() {
            BranchScope::MainBranch => effective_key,
            BranchScope::Branch(name) => format!("{}{}{}", effective_key, BRANCH_KEY_SEPARATOR, name),
            BranchScope::PullRequest(key) => {
                format!("{}{}{}", effective_key, PULL_REQUEST_SEPARATOR, key)
            }
        }
    }
}

/// Project identity as already persisted before the analysis starts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    uuid: String,
    key: String,
    name: String,
    description: Option<String>,
}

impl Project {
    pub fn new(
        uuid: impl Into<String>,
        key: impl Into<String>,
        name: impl Into<String>,
        description: Option<String>,
    ) -> Self {
        Self {
            uuid: uuid.into(),
            key: key.into(),
            name: name.into(),
            description,
        }
    }

    pub fn uuid(&self) -> &str {
        &self.uuid
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

/// `rootKey` for an empty or absent path, `rootKey:path` otherwise
pub fn effective_key(root_key: &str, path: Option<&str>) -> String {
    match path {
        Some(path) if !path.is_empty() => format!("{}:{}", root_key, path),
        _ => root_key.to_string(),
    }
}

/// Strips a `:BRANCH:` or `:PULL_REQUEST:` suffix from a database key.
pub fn remove_branch_and_pull_request_from_key(component_key: &str) -> &str {
    let without_branch = match component_key.find(BRANCH_KEY_SEPARATOR) {
        Some(index) => &component_key[..index],
        None => component_key,
    };
    match without_branch.find(PULL_REQUEST_SEPARATOR) {
        Some(index) => &without_branch[..index],
        None => without_branch,
    }
}
