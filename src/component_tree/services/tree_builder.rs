use super::key_generator::ComponentKeyGenerator;
use crate::component_tree::domain::{
    Branch, Component, ComponentAttributes, ComponentBuilder, ComponentType, FileAttributes,
    Project, ProjectAttributes, ReportAttributes, Status,
};
use crate::ports::outbound::{ReportComponent, ReportComponentType};
use crate::shared::{Result, TreeError};
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::debug;

/// Key of the directory at the root of the project
const ROOT_DIRECTORY_PATH: &str = "/";

/// ComponentTreeBuilder - Builds the component tree from the scanner report
///
/// Files of the report are laid out in a path trie, which is then lowered
/// bottom-up into immutable components. Directory chains where each
/// directory holds a single sub-directory are collapsed into one directory.
pub struct ComponentTreeBuilder<'a> {
    key_generator: &'a dyn ComponentKeyGenerator,
    public_key_generator: &'a dyn ComponentKeyGenerator,
    uuid_supplier: &'a dyn Fn(&str) -> String,
    scanner_component_supplier: &'a dyn Fn(i32) -> Result<ReportComponent>,
    project: &'a Project,
    branch: &'a Branch,
    project_attributes: ProjectAttributes,
    language_keys: RefCell<HashSet<Arc<str>>>,
}

impl<'a> ComponentTreeBuilder<'a> {
    /// Creates a new builder
    ///
    /// # Arguments
    /// * `key_generator` - Generates the db key of a component (branch-aware)
    /// * `public_key_generator` - Generates the displayed key of a component
    /// * `uuid_supplier` - Resolves a db key to the component uuid
    /// * `scanner_component_supplier` - Reads a report component by ref
    /// * `project` - Project as already persisted
    /// * `branch` - Analyzed branch
    /// * `project_attributes` - Attributes given to the PROJECT component
    pub fn new(
        key_generator: &'a dyn ComponentKeyGenerator,
        public_key_generator: &'a dyn ComponentKeyGenerator,
        uuid_supplier: &'a dyn Fn(&str) -> String,
        scanner_component_supplier: &'a dyn Fn(i32) -> Result<ReportComponent>,
        project: &'a Project,
        branch: &'a Branch,
        project_attributes: ProjectAttributes,
    ) -> Self {
        Self {
            key_generator,
            public_key_generator,
            uuid_supplier,
            scanner_component_supplier,
            project,
            branch,
            project_attributes,
            language_keys: RefCell::new(HashSet::new()),
        }
    }

    /// Builds the full report tree rooted at the scanner's project component
    ///
    /// # Arguments
    /// * `root` - The PROJECT component of the report
    /// * `scm_base_path` - Path of the project inside the SCM repository, if any
    ///
    /// # Errors
    /// Returns an error if:
    /// - `root` is not a PROJECT
    /// - a child of the project is not a FILE
    /// - a file has no project-relative path, no line, or an unknown status
    pub fn build_project(
        &self,
        root: &ReportComponent,
        scm_base_path: Option<&str>,
    ) -> Result<Arc<Component>> {
        if root.component_type != ReportComponentType::Project {
            return Err(TreeError::ExpectedProjectRoot.into());
        }

        let mut trie = PathTrie::new(root.clone());
        for child_ref in &root.child_refs {
            let component = (self.scanner_component_supplier)(*child_ref)?;
            if component.component_type != ReportComponentType::File {
                return Err(TreeError::UnsupportedComponentType {
                    component_type: component.component_type.to_string(),
                }
                .into());
            }
            trie.insert_file(component)?;
        }
        debug!(
            root_key = %root.key,
            files = root.child_refs.len(),
            nodes = trie.nodes.len(),
            "Built report path trie"
        );

        let lowering = Lowering {
            builder: self,
            trie: &trie,
            root,
            scm_base_path: scm_base_path.map(str::trim).filter(|path| !path.is_empty()),
        };
        lowering.build_component(PathTrie::ROOT, "", "")
    }

    fn intern_language(&self, language: &str) -> Option<Arc<str>> {
        let language = language.trim();
        if language.is_empty() {
            return None;
        }
        let mut language_keys = self.language_keys.borrow_mut();
        if let Some(interned) = language_keys.get(language) {
            return Some(Arc::clone(interned));
        }
        let interned: Arc<str> = Arc::from(language);
        language_keys.insert(Arc::clone(&interned));
        Some(interned)
    }
}

/// Mutable path trie; only lives while the tree is being built
#[derive(Debug, Default)]
struct TrieNode {
    report_component: Option<ReportComponent>,
    children: Vec<(String, usize)>,
    child_by_segment: HashMap<String, usize>,
}

#[derive(Debug)]
struct PathTrie {
    nodes: Vec<TrieNode>,
}

impl PathTrie {
    const ROOT: usize = 0;

    fn new(root: ReportComponent) -> Self {
        Self {
            nodes: vec![TrieNode {
                report_component: Some(root),
                ..TrieNode::default()
            }],
        }
    }

    fn insert_file(&mut self, file: ReportComponent) -> Result<()> {
        if file.project_relative_path.is_empty() {
            return Err(TreeError::MissingProjectRelativePath {
                component_ref: file.reference,
            }
            .into());
        }

        let mut current = Self::ROOT;
        for segment in file
            .project_relative_path
            .split('/')
            .filter(|segment| !segment.is_empty())
        {
            if current != Self::ROOT && self.nodes[current].report_component.is_some() {
                return Err(TreeError::FileUnderFile {
                    path: file.project_relative_path.clone(),
                }
                .into());
            }
            current = self.child_or_insert(current, segment);
        }

        let node = &mut self.nodes[current];
        if node.report_component.is_some() {
            return Err(TreeError::DuplicateFilePath {
                path: file.project_relative_path.clone(),
            }
            .into());
        }
        if !node.children.is_empty() {
            return Err(TreeError::FileUnderFile {
                path: file.project_relative_path.clone(),
            }
            .into());
        }
        node.report_component = Some(file);
        Ok(())
    }

    fn child_or_insert(&mut self, parent: usize, segment: &str) -> usize {
        if let Some(&child) = self.nodes[parent].child_by_segment.get(segment) {
            return child;
        }
        let child = self.nodes.len();
        self.nodes.push(TrieNode::default());
        let parent_node = &mut self.nodes[parent];
        parent_node.children.push((segment.to_string(), child));
        parent_node.child_by_segment.insert(segment.to_string(), child);
        child
    }

    /// The single child of `node` when that child is not a leaf
    fn collapsible_child(&self, node: usize) -> Option<(&str, usize)> {
        match self.nodes[node].children.as_slice() {
            [(segment, child)] if !self.nodes[*child].children.is_empty() => {
                Some((segment.as_str(), *child))
            }
            _ => None,
        }
    }
}

struct Lowering<'b, 'a> {
    builder: &'b ComponentTreeBuilder<'a>,
    trie: &'b PathTrie,
    root: &'b ReportComponent,
    scm_base_path: Option<&'b str>,
}

impl Lowering<'_, '_> {
    fn build_component(
        &self,
        node: usize,
        current_path: &str,
        parent_path: &str,
    ) -> Result<Arc<Component>> {
        let children = self.build_children(node, current_path)?;

        match &self.trie.nodes[node].report_component {
            Some(file) if file.component_type == ReportComponentType::File => self.build_file(file),
            Some(project) if project.component_type == ReportComponentType::Project => {
                self.build_project(project, children)
            }
            _ => self.build_directory(parent_path, current_path, children),
        }
    }

    fn build_children(&self, node: usize, current_path: &str) -> Result<Vec<Arc<Component>>> {
        let mut children = Vec::with_capacity(self.trie.nodes[node].children.len());
        for (segment, child) in &self.trie.nodes[node].children {
            let mut path = join_path(current_path, segment);
            let mut child = *child;
            while let Some((segment, only_child)) = self.trie.collapsible_child(child) {
                path = join_path(&path, segment);
                child = only_child;
            }
            children.push(self.build_component(child, &path, current_path)?);
        }
        Ok(children)
    }

    fn build_project(
        &self,
        project: &ReportComponent,
        children: Vec<Arc<Component>>,
    ) -> Result<Arc<Component>> {
        let builder = self.builder;
        let db_key = builder.key_generator.generate_key(&self.root.key, None);
        let public_key = builder
            .public_key_generator
            .generate_key(&self.root.key, None);

        let (name, description) = if builder.branch.is_main() {
            (
                trim_to_none(&project.name)
                    .unwrap_or_else(|| builder.project.name().to_string()),
                trim_to_none(&project.description)
                    .or_else(|| builder.project.description().map(str::to_string)),
            )
        } else {
            (
                builder.project.name().to_string(),
                builder.project.description().map(str::to_string),
            )
        };

        let component = Component::builder(ComponentAttributes::Project(
            builder.project_attributes.clone(),
        ))
        .uuid((builder.uuid_supplier)(&db_key))
        .db_key(db_key)
        .key(public_key)
        .name(name)
        .description(description)
        .status(project.status.to_status()?)
        .report_attributes(ReportAttributes::new(
            Some(project.reference),
            scm_path(self.scm_base_path, &project.project_relative_path),
        ))
        .children(children)
        .build()?;
        Ok(Arc::new(component))
    }

    fn build_directory(
        &self,
        parent_path: &str,
        path: &str,
        children: Vec<Arc<Component>>,
    ) -> Result<Arc<Component>> {
        let builder = self.builder;
        let non_empty_path = if path.is_empty() {
            ROOT_DIRECTORY_PATH
        } else {
            path
        };
        let db_key = builder
            .key_generator
            .generate_key(&self.root.key, Some(non_empty_path));
        let public_key = builder
            .public_key_generator
            .generate_key(&self.root.key, Some(non_empty_path));
        let short_name = path.strip_prefix(parent_path).unwrap_or(path);
        let short_name = short_name.strip_prefix('/').unwrap_or(short_name);

        let component = Component::builder(ComponentAttributes::Directory)
            .uuid((builder.uuid_supplier)(&db_key))
            .db_key(db_key)
            .key(public_key)
            .name(path)
            .short_name(short_name)
            .status(Status::Unavailable)
            .report_attributes(ReportAttributes::new(
                None,
                scm_path(self.scm_base_path, path),
            ))
            .children(children)
            .build()?;
        Ok(Arc::new(component))
    }

    fn build_file(&self, file: &ReportComponent) -> Result<Arc<Component>> {
        let builder = self.builder;
        let path = file.project_relative_path.as_str();
        let db_key = builder
            .key_generator
            .generate_key(&self.root.key, Some(path));
        let public_key = builder
            .public_key_generator
            .generate_key(&self.root.key, Some(path));
        let short_name = path.rsplit('/').next().unwrap_or(path);

        let component = Component::builder(ComponentAttributes::File(self.file_attributes(file)?))
            .uuid((builder.uuid_supplier)(&db_key))
            .db_key(db_key)
            .key(public_key)
            .name(path)
            .short_name(short_name)
            .status(file.status.to_status()?)
            .description(trim_to_none(&file.description))
            .report_attributes(ReportAttributes::new(
                Some(file.reference),
                scm_path(self.scm_base_path, path),
            ))
            .build()?;
        Ok(Arc::new(component))
    }

    fn file_attributes(&self, file: &ReportComponent) -> Result<FileAttributes> {
        if file.lines <= 0 {
            return Err(TreeError::FileHasNoLine {
                path: file.project_relative_path.clone(),
            }
            .into());
        }
        Ok(FileAttributes::new(
            file.is_test,
            self.builder.intern_language(&file.language),
            file.lines,
        )?
        .with_marked_as_unchanged(file.marked_as_unchanged)
        .with_old_relative_file_path(trim_to_none(&file.old_relative_file_path)))
    }
}

/// Derives from a report tree the tree holding only what changed.
///
/// Files with status SAME are dropped, directories left without children
/// are dropped, and a directory whose only remaining child is a directory
/// is merged into that child. The PROJECT is always kept.
///
/// # Errors
/// Returns an error if `root` is not a PROJECT, or if the tree holds
/// view components.
pub fn build_changed_component_tree_root(root: &Component) -> Result<Arc<Component>> {
    if root.component_type() != ComponentType::Project {
        return Err(TreeError::ExpectedProjectRoot.into());
    }
    let children = changed_children(root)?;
    let component = changed_component_builder(root, root.short_name())
        .children(children)
        .build()?;
    Ok(Arc::new(component))
}

fn changed_children(component: &Component) -> Result<Vec<Arc<Component>>> {
    let mut children = Vec::new();
    for child in component.children() {
        if let Some(changed) = changed_component(child)? {
            children.push(changed);
        }
    }
    Ok(children)
}

fn changed_component(component: &Arc<Component>) -> Result<Option<Arc<Component>>> {
    match component.component_type() {
        ComponentType::File => {
            Ok((component.status() != Status::Same).then(|| Arc::clone(component)))
        }
        ComponentType::Directory => changed_directory(component),
        other => Err(TreeError::UnsupportedComponentType {
            component_type: other.to_string(),
        }
        .into()),
    }
}

fn changed_directory(directory: &Component) -> Result<Option<Arc<Component>>> {
    let children = changed_children(directory)?;
    let component = match children.as_slice() {
        [] => return Ok(None),
        [only_child] if only_child.component_type() == ComponentType::Directory => {
            let short_name = format!("{}/{}", directory.short_name(), only_child.short_name());
            changed_component_builder(only_child, &short_name)
                .children(only_child.children().iter().cloned())
                .build()?
        }
        _ => changed_component_builder(directory, directory.short_name())
            .children(children)
            .build()?,
    };
    Ok(Some(Arc::new(component)))
}

fn changed_component_builder(
    component: &Component,
    short_name: &str,
) -> ComponentBuilder {
    Component::builder(component.attributes().clone())
        .uuid(component.uuid())
        .db_key(component.db_key())
        .key(component.key())
        .name(component.name())
        .short_name(short_name)
        .description(component.description().map(str::to_string))
        .status(component.status())
        .report_attributes(component.report_attributes().clone())
}

fn join_path(current_path: &str, segment: &str) -> String {
    if current_path.is_empty() {
        segment.to_string()
    } else {
        format!("{}/{}", current_path, segment)
    }
}

fn scm_path(scm_base_path: Option<&str>, relative_path: &str) -> Option<String> {
    if relative_path.is_empty() {
        return scm_base_path.map(str::to_string);
    }
    match scm_base_path {
        None => Some(relative_path.to_string()),
        Some(base) => Some(format!("{}/{}", base, relative_path)),
    }
}

fn trim_to_none(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
