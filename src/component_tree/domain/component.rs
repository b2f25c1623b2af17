use super::attributes::{
    FileAttributes, ProjectAttributes, ProjectViewAttributes, ReportAttributes, SubViewAttributes,
    ViewAttributes,
};
use crate::shared::{Result, TreeError};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// Maximum length of a component name, longer names are abbreviated
pub const MAX_COMPONENT_NAME_LENGTH: usize = 2000;

/// Maximum length of a component description, longer ones are abbreviated
pub const MAX_COMPONENT_DESCRIPTION_LENGTH: usize = 2000;

const ABBREVIATION_MARKER: &str = "...";

/// Type of a node of the analyzed tree.
///
/// The report tree (PROJECT, DIRECTORY, FILE) and the views tree
/// (VIEW, SUBVIEW, PROJECT_VIEW) are disjoint; depths are only comparable
/// within the same tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentType {
    Project,
    Directory,
    File,
    View,
    SubView,
    ProjectView,
}

impl ComponentType {
    /// Structural depth rank within the tree the type belongs to
    pub fn depth(self) -> u8 {
        match self {
            ComponentType::Project | ComponentType::View => 0,
            ComponentType::Directory | ComponentType::SubView => 1,
            ComponentType::File | ComponentType::ProjectView => 2,
        }
    }

    pub fn is_report_type(self) -> bool {
        matches!(
            self,
            ComponentType::Project | ComponentType::Directory | ComponentType::File
        )
    }

    pub fn is_views_type(self) -> bool {
        !self.is_report_type()
    }

    /// FILE and PROJECT_VIEW never have children
    pub fn is_leaf(self) -> bool {
        self.depth() == 2
    }

    /// Strictly deeper than `other`; always false across the two trees.
    pub fn is_deeper_than(self, other: ComponentType) -> bool {
        self.is_report_type() == other.is_report_type() && self.depth() > other.depth()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ComponentType::Project => "PROJECT",
            ComponentType::Directory => "DIRECTORY",
            ComponentType::File => "FILE",
            ComponentType::View => "VIEW",
            ComponentType::SubView => "SUBVIEW",
            ComponentType::ProjectView => "PROJECT_VIEW",
        }
    }
}

impl fmt::Display for ComponentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Status of a component relative to the previous analysis, or to the
/// base branch for short-lived branches and pull requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Status {
    #[default]
    Unavailable,
    Same,
    Changed,
    Added,
}

impl Status {
    pub fn as_str(self) -> &'static str {
        match self {
            Status::Unavailable => "UNAVAILABLE",
            Status::Same => "SAME",
            Status::Changed => "CHANGED",
            Status::Added => "ADDED",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Type-specific attribute bundle. The variant decides the component type,
/// so a bundle can never be read on a component of the wrong type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComponentAttributes {
    Project(ProjectAttributes),
    Directory,
    File(FileAttributes),
    View(ViewAttributes),
    SubView(SubViewAttributes),
    ProjectView(ProjectViewAttributes),
}

impl ComponentAttributes {
    pub fn component_type(&self) -> ComponentType {
        match self {
            ComponentAttributes::Project(_) => ComponentType::Project,
            ComponentAttributes::Directory => ComponentType::Directory,
            ComponentAttributes::File(_) => ComponentType::File,
            ComponentAttributes::View(_) => ComponentType::View,
            ComponentAttributes::SubView(_) => ComponentType::SubView,
            ComponentAttributes::ProjectView(_) => ComponentType::ProjectView,
        }
    }
}

/// Immutable node of the analyzed tree. Identity is the uuid.
#[derive(Debug, Clone)]
pub struct Component {
    status: Status,
    uuid: String,
    db_key: String,
    key: String,
    name: String,
    short_name: String,
    description: Option<String>,
    report_attributes: ReportAttributes,
    attributes: ComponentAttributes,
    children: Vec<Arc<Component>>,
}

impl Component {
    pub fn builder(attributes: ComponentAttributes) -> ComponentBuilder {
        ComponentBuilder::new(attributes)
    }

    pub fn component_type(&self) -> ComponentType {
        self.attributes.component_type()
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn uuid(&self) -> &str {
        &self.uuid
    }

    /// Key as persisted in the database (branch-aware)
    pub fn db_key(&self) -> &str {
        &self.db_key
    }

    /// Display key, defaults to the db key
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn short_name(&self) -> &str {
        &self.short_name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn report_attributes(&self) -> &ReportAttributes {
        &self.report_attributes
    }

    pub fn attributes(&self) -> &ComponentAttributes {
        &self.attributes
    }

    pub fn children(&self) -> &[Arc<Component>] {
        &self.children
    }

    pub fn project_attributes(&self) -> Option<&ProjectAttributes> {
        match &self.attributes {
            ComponentAttributes::Project(attributes) => Some(attributes),
            _ => None,
        }
    }

    pub fn file_attributes(&self) -> Option<&FileAttributes> {
        match &self.attributes {
            ComponentAttributes::File(attributes) => Some(attributes),
            _ => None,
        }
    }

    pub fn view_attributes(&self) -> Option<&ViewAttributes> {
        match &self.attributes {
            ComponentAttributes::View(attributes) => Some(attributes),
            _ => None,
        }
    }

    pub fn sub_view_attributes(&self) -> Option<&SubViewAttributes> {
        match &self.attributes {
            ComponentAttributes::SubView(attributes) => Some(attributes),
            _ => None,
        }
    }

    pub fn project_view_attributes(&self) -> Option<&ProjectViewAttributes> {
        match &self.attributes {
            ComponentAttributes::ProjectView(attributes) => Some(attributes),
            _ => None,
        }
    }
}

impl PartialEq for Component {
    fn eq(&self, other: &Self) -> bool {
        self.uuid == other.uuid
    }
}

impl Eq for Component {}

impl Hash for Component {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.uuid.hash(state);
    }
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Component{{type={}, status={}, uuid='{}', key='{}', name='{}'}}",
            self.component_type(),
            self.status,
            self.uuid,
            self.db_key,
            self.name
        )
    }
}

/// Builder for [`Component`]; uuid, db key and name are mandatory.
#[derive(Debug)]
pub struct ComponentBuilder {
    attributes: ComponentAttributes,
    status: Status,
    uuid: Option<String>,
    db_key: Option<String>,
    key: Option<String>,
    name: Option<String>,
    short_name: Option<String>,
    description: Option<String>,
    report_attributes: ReportAttributes,
    children: Vec<Arc<Component>>,
}

impl ComponentBuilder {
    fn new(attributes: ComponentAttributes) -> Self {
        Self {
            attributes,
            status: Status::default(),
            uuid: None,
            db_key: None,
            key: None,
            name: None,
            short_name: None,
            description: None,
            report_attributes: ReportAttributes::default(),
            children: Vec::new(),
        }
    }

    pub fn status(mut self, status: Status) -> Self {
        self.status = status;
        self
    }

    pub fn uuid(mut self, uuid: impl Into<String>) -> Self {
        self.uuid = Some(uuid.into());
        self
    }

    pub fn db_key(mut self, db_key: impl Into<String>) -> Self {
        self.db_key = Some(db_key.into());
        self
    }

    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn short_name(mut self, short_name: impl Into<String>) -> Self {
        self.short_name = Some(short_name.into());
        self
    }

    pub fn description(mut self, description: Option<String>) -> Self {
        self.description = description;
        self
    }

    pub fn report_attributes(mut self, report_attributes: ReportAttributes) -> Self {
        self.report_attributes = report_attributes;
        self
    }

    pub fn child(mut self, child: Arc<Component>) -> Self {
        self.children.push(child);
        self
    }

    pub fn children(mut self, children: impl IntoIterator<Item = Arc<Component>>) -> Self {
        self.children.extend(children);
        self
    }

    pub fn build(self) -> Result<Component> {
        let component_type = self.attributes.component_type();

        let uuid = self
            .uuid
            .filter(|uuid| !uuid.is_empty())
            .ok_or_else(|| TreeError::invalid_component("uuid can't be empty"))?;
        let db_key = self
            .db_key
            .filter(|key| !key.is_empty())
            .ok_or_else(|| TreeError::invalid_component("key can't be empty"))?;
        let name = self
            .name
            .ok_or_else(|| TreeError::invalid_component("name can't be null"))?;

        if component_type.is_leaf() && !self.children.is_empty() {
            return Err(TreeError::invalid_component(format!(
                "a {} can't have children",
                component_type
            ))
            .into());
        }
        for child in &self.children {
            if child.component_type().is_report_type() != component_type.is_report_type() {
                return Err(TreeError::invalid_component(format!(
                    "a {} can't have a {} child",
                    component_type,
                    child.component_type()
                ))
                .into());
            }
        }

        let name = abbreviate(&name, MAX_COMPONENT_NAME_LENGTH);
        let short_name = match self.short_name {
            Some(short_name) => abbreviate(&short_name, MAX_COMPONENT_NAME_LENGTH),
            None => name.clone(),
        };

        Ok(Component {
            status: self.status,
            key: self.key.unwrap_or_else(|| db_key.clone()),
            uuid,
            db_key,
            name,
            short_name,
            description: self
                .description
                .map(|d| abbreviate(&d, MAX_COMPONENT_DESCRIPTION_LENGTH)),
            report_attributes: self.report_attributes,
            attributes: self.attributes,
            children: self.children,
        })
    }
}

/// Truncates `value` to at most `max_chars` characters, ending with "..."
/// when something was cut.
fn abbreviate(value: &str, max_chars: usize) -> String {
    if value.chars().count() <= max_chars {
        return value.to_string();
    }
    let kept = max_chars.saturating_sub(ABBREVIATION_MARKER.len());
    let mut abbreviated: String = value.chars().take(kept).collect();
    abbreviated.push_str(ABBREVIATION_MARKER);
    abbreviated
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(uuid: &str) -> Arc<Component> {
        Arc::new(
            Component::builder(ComponentAttributes::File(
                FileAttributes::new(false, None, 1).unwrap(),
            ))
            .uuid(uuid)
            .db_key(format!("K1:{}", uuid))
            .name(uuid)
            .build()
            .unwrap(),
        )
    }

    #[test]
    fn test_component_type_depths() {
        assert!(ComponentType::File.is_deeper_than(ComponentType::Directory));
        assert!(ComponentType::Directory.is_deeper_than(ComponentType::Project));
        assert!(!ComponentType::Project.is_deeper_than(ComponentType::Project));
        assert!(ComponentType::ProjectView.is_deeper_than(ComponentType::View));
    }

    #[test]
    fn test_component_type_depth_is_not_comparable_across_trees() {
        assert!(!ComponentType::File.is_deeper_than(ComponentType::View));
        assert!(!ComponentType::ProjectView.is_deeper_than(ComponentType::Project));
    }

    #[test]
    fn test_component_type_kinds() {
        assert!(ComponentType::Directory.is_report_type());
        assert!(ComponentType::SubView.is_views_type());
        assert_eq!(ComponentType::ProjectView.to_string(), "PROJECT_VIEW");
        assert!(ComponentType::File.is_leaf());
        assert!(ComponentType::ProjectView.is_leaf());
        assert!(!ComponentType::SubView.is_leaf());
    }

    #[test]
    fn test_key_defaults_to_db_key() {
        let component = Component::builder(ComponentAttributes::Directory)
            .uuid("U1")
            .db_key("K1:src")
            .name("src")
            .build()
            .unwrap();

        assert_eq!(component.key(), "K1:src");
        assert_eq!(component.short_name(), "src");
        assert_eq!(component.status(), Status::Unavailable);
        assert_eq!(component.component_type(), ComponentType::Directory);
    }

    #[test]
    fn test_build_fails_without_uuid() {
        let result = Component::builder(ComponentAttributes::Directory)
            .db_key("K1:src")
            .name("src")
            .build();
        assert!(result.unwrap_err().to_string().contains("uuid"));
    }

    #[test]
    fn test_build_fails_without_key() {
        let result = Component::builder(ComponentAttributes::Directory)
            .uuid("U1")
            .name("src")
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn test_build_fails_without_name() {
        let result = Component::builder(ComponentAttributes::Directory)
            .uuid("U1")
            .db_key("K1:src")
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn test_name_and_description_are_abbreviated() {
        let long = "a".repeat(MAX_COMPONENT_NAME_LENGTH + 10);
        let component = Component::builder(ComponentAttributes::Directory)
            .uuid("U1")
            .db_key("K1:src")
            .name(long.clone())
            .description(Some(long))
            .build()
            .unwrap();

        assert_eq!(component.name().chars().count(), MAX_COMPONENT_NAME_LENGTH);
        assert!(component.name().ends_with("..."));
        assert_eq!(
            component.description().unwrap().chars().count(),
            MAX_COMPONENT_DESCRIPTION_LENGTH
        );
    }

    #[test]
    fn test_report_parent_rejects_view_child() {
        let project_view = Arc::new(
            Component::builder(ComponentAttributes::ProjectView(ProjectViewAttributes::new(
                "P1", "project1", None,
            )))
            .uuid("PV1")
            .db_key("PV1")
            .name("pv")
            .build()
            .unwrap(),
        );

        let result = Component::builder(ComponentAttributes::Directory)
            .uuid("U1")
            .db_key("K1:src")
            .name("src")
            .child(project_view)
            .build();

        assert!(matches!(
            result.unwrap_err().downcast_ref::<TreeError>(),
            Some(TreeError::InvalidComponent { .. })
        ));
    }

    #[test]
    fn test_leaves_reject_children() {
        let result = Component::builder(ComponentAttributes::File(
            FileAttributes::new(false, None, 1).unwrap(),
        ))
        .uuid("F0")
        .db_key("K1:src/A.js")
        .name("src/A.js")
        .child(file("F1"))
        .build();
        assert_eq!(
            result.unwrap_err().to_string(),
            "Invalid component: a FILE can't have children"
        );

        let result = Component::builder(ComponentAttributes::ProjectView(
            ProjectViewAttributes::new("P1", "project1", None),
        ))
        .uuid("PV1")
        .db_key("PV1")
        .name("pv")
        .child(file("F1"))
        .build();
        assert!(matches!(
            result.unwrap_err().downcast_ref::<TreeError>(),
            Some(TreeError::InvalidComponent { .. })
        ));
    }

    #[test]
    fn test_wrong_attribute_bundle_is_absent() {
        let component = file("F1");
        assert!(component.file_attributes().is_some());
        assert!(component.project_attributes().is_none());
        assert!(component.view_attributes().is_none());
        assert!(component.sub_view_attributes().is_none());
        assert!(component.project_view_attributes().is_none());
    }

    #[test]
    fn test_equality_is_by_uuid() {
        let a = file("F1");
        let b = Component::builder(ComponentAttributes::Directory)
            .uuid("F1")
            .db_key("other")
            .name("other")
            .build()
            .unwrap();
        assert_eq!(*a, b);
        assert_ne!(*a, *file("F2"));
    }

    #[test]
    fn test_children_keep_insertion_order() {
        let component = Component::builder(ComponentAttributes::Directory)
            .uuid("D1")
            .db_key("K1:src")
            .name("src")
            .children(vec![file("F2"), file("F1")])
            .build()
            .unwrap();

        let uuids: Vec<&str> = component.children().iter().map(|c| c.uuid()).collect();
        assert_eq!(uuids, vec!["F2", "F1"]);
    }

    #[test]
    fn test_abbreviate_keeps_short_values() {
        assert_eq!(abbreviate("short", 10), "short");
        assert_eq!(abbreviate("0123456789ab", 10), "0123456...");
    }
}
