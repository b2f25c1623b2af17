use crate::component_tree::domain::{Branch, BranchScope};
use crate::ports::outbound::{ComponentRepository, ComponentWithModuleUuid, KeyWithUuid, Scope};
use crate::shared::Result;
use std::cell::RefCell;
use std::collections::HashMap;
use tracing::debug;
use uuid::Uuid;

/// Path of the synthetic root folder of a legacy module
const MODULE_ROOT_FOLDER_PATH: &str = "/";

/// ComponentUuidFactory - Resolves component keys to stable uuids
///
/// Lookups go through three tiers:
/// 1. uuids persisted under the exact key for the analyzed branch scope
/// 2. uuids of components whose key changed when legacy modules were
///    flattened (only when the report still describes modules)
/// 3. a freshly minted uuid, cached for the lifetime of the factory
///
/// Minted uuids are not persisted here.
#[derive(Debug)]
pub struct ComponentUuidFactory {
    uuids_by_key: HashMap<String, String>,
    uuids_by_migrated_key: HashMap<String, String>,
    minted_uuids_by_key: RefCell<HashMap<String, String>>,
}

impl ComponentUuidFactory {
    /// Loads persisted identities for the root and its branch scope
    ///
    /// # Arguments
    /// * `repository` - Source of persisted component rows
    /// * `root_key` - Key of the analyzed project
    /// * `branch` - Analyzed branch, selects which persisted keys apply
    /// * `path_to_key` - Translates a project-relative path (absent for the root) to a db key
    /// * `report_modules_path` - Module key to project-relative path, from the report metadata
    ///
    /// # Errors
    /// Returns an error if the repository fails
    pub fn new<C, F>(
        repository: &C,
        root_key: &str,
        branch: &Branch,
        path_to_key: F,
        report_modules_path: &HashMap<String, String>,
    ) -> Result<Self>
    where
        C: ComponentRepository + ?Sized,
        F: Fn(Option<&str>) -> String,
    {
        let persisted = match branch.scope() {
            BranchScope::MainBranch => repository.select_uuids_by_key_for_main(root_key)?,
            BranchScope::Branch(name) => {
                repository.select_uuids_by_key_for_branch(root_key, &name)?
            }
            BranchScope::PullRequest(key) => {
                repository.select_uuids_by_key_for_pull_request(root_key, &key)?
            }
        };
        let uuids_by_key: HashMap<String, String> = persisted
            .into_iter()
            .map(|KeyWithUuid { key, uuid }| (key, uuid))
            .collect();

        let uuids_by_migrated_key = if report_modules_path.is_empty() {
            HashMap::new()
        } else {
            let rows = repository.select_components_with_module_uuid(root_key)?;
            migrated_uuids(&rows, &path_to_key, report_modules_path)
        };

        debug!(
            root_key,
            persisted = uuids_by_key.len(),
            migrated = uuids_by_migrated_key.len(),
            "Loaded component uuids"
        );

        Ok(Self {
            uuids_by_key,
            uuids_by_migrated_key,
            minted_uuids_by_key: RefCell::new(HashMap::new()),
        })
    }

    /// Returns the uuid of `key`, minting one if it was never persisted.
    ///
    /// Repeated calls with the same key return the same uuid.
    pub fn get_or_create_for_key(&self, key: &str) -> String {
        if let Some(uuid) = self
            .uuids_by_key
            .get(key)
            .or_else(|| self.uuids_by_migrated_key.get(key))
        {
            return uuid.clone();
        }
        self.minted_uuids_by_key
            .borrow_mut()
            .entry(key.to_string())
            .or_insert_with(|| Uuid::new_v4().to_string())
            .clone()
    }
}

/// Builds the migrated-key to uuid map from rows carrying their legacy module.
fn migrated_uuids<F>(
    rows: &[ComponentWithModuleUuid],
    path_to_key: &F,
    report_modules_path: &HashMap<String, String>,
) -> HashMap<String, String>
where
    F: Fn(Option<&str>) -> String,
{
    let modules_by_uuid: HashMap<&str, &ComponentWithModuleUuid> = rows
        .iter()
        .filter(|row| row.scope == Scope::Project)
        .map(|row| (row.uuid.as_str(), row))
        .collect();
    let module_paths: HashMap<&str, Option<String>> = modules_by_uuid
        .iter()
        .map(|(uuid, module)| {
            (
                *uuid,
                module_path_from_root(*module, &modules_by_uuid, report_modules_path),
            )
        })
        .collect();

    let mut uuids_by_migrated_key = HashMap::new();
    for row in rows {
        if row.path.as_deref() == Some(MODULE_ROOT_FOLDER_PATH) {
            continue;
        }

        if row.scope == Scope::Project {
            let module_path = module_paths.get(row.uuid.as_str()).cloned().flatten();
            // a module without a resolved path must not take the root key
            if module_path.is_some() || row.module_uuid.is_none() {
                let key = path_to_key(module_path.as_deref().filter(|path| !path.is_empty()));
                uuids_by_migrated_key.insert(key, row.uuid.clone());
            }
        } else {
            let module_path = row
                .module_uuid
                .as_deref()
                .and_then(|module_uuid| module_paths.get(module_uuid).cloned().flatten());
            if let Some(path) = component_path(row.path.as_deref(), module_path.as_deref()) {
                uuids_by_migrated_key.insert(path_to_key(Some(path.as_str())), row.uuid.clone());
            }
        }
    }
    uuids_by_migrated_key
}

/// Root-relative path of a legacy module.
///
/// Uses the path reported by the scanner when the module is still known to
/// it, otherwise walks the module-parent chain up to the root module. Returns
/// `None` when a non-root module on the chain has no path, or on a cycle.
fn module_path_from_root<'a>(
    module: &'a ComponentWithModuleUuid,
    modules_by_uuid: &HashMap<&'a str, &'a ComponentWithModuleUuid>,
    report_modules_path: &'a HashMap<String, String>,
) -> Option<String> {
    let mut segments: Vec<&'a str> = Vec::new();
    let mut current = module;

    for _ in 0..=modules_by_uuid.len() {
        if let Some(reported) = report_modules_path.get(&current.key) {
            segments.push(reported);
            return Some(join_segments(segments));
        }
        match current.module_uuid.as_deref() {
            None => return Some(join_segments(segments)),
            Some(parent_uuid) => {
                let path = current.path.as_deref().filter(|path| !path.is_empty())?;
                segments.push(path);
                current = *modules_by_uuid.get(parent_uuid)?;
            }
        }
    }
    None
}

fn join_segments(mut segments: Vec<&str>) -> String {
    segments.reverse();
    segments
        .into_iter()
        .filter(|segment| !segment.is_empty())
        .collect::<Vec<_>>()
        .join("/")
}

/// Project-relative path of a non-module row given its module's path
fn component_path(path: Option<&str>, module_path: Option<&str>) -> Option<String> {
    let path = path.filter(|path| !path.is_empty());
    match module_path.filter(|module_path| !module_path.is_empty()) {
        None => path.map(str::to_string),
        Some(module_path) => match path {
            None => Some(module_path.to_string()),
            Some(path) => Some(format!("{}/{}", module_path, path)),
        },
    }
}
