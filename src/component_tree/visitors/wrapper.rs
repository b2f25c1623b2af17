use super::visitor::{Order, TypeAwareVisitor};
use crate::component_tree::domain::{Component, ComponentType, CrawlerDepthLimit};
use crate::shared::Result;
use std::sync::Arc;

/// Shape-agnostic view of a registered visitor, driven by the crawler.
///
/// `before_component` and `after_component` bracket every component the
/// visitor applies to, whatever its order.
pub trait VisitorWrapper {
    fn crawler_depth_limit(&self) -> CrawlerDepthLimit;

    fn order(&self) -> Order;

    fn name(&self) -> &str;

    fn before_component(&mut self, component: &Arc<Component>);

    fn after_component(&mut self, component: &Arc<Component>);

    fn visit_project(&mut self, project: &Arc<Component>) -> Result<()>;

    fn visit_directory(&mut self, directory: &Arc<Component>) -> Result<()>;

    fn visit_file(&mut self, file: &Arc<Component>) -> Result<()>;

    fn visit_view(&mut self, view: &Arc<Component>) -> Result<()>;

    fn visit_sub_view(&mut self, sub_view: &Arc<Component>) -> Result<()>;

    fn visit_project_view(&mut self, project_view: &Arc<Component>) -> Result<()>;

    fn visit_any(&mut self, component: &Arc<Component>) -> Result<()>;

    /// `visit_any` followed by the method matching the component type
    fn visit_node(&mut self, component: &Arc<Component>) -> Result<()> {
        self.visit_any(component)?;
        match component.component_type() {
            ComponentType::Project => self.visit_project(component),
            ComponentType::Directory => self.visit_directory(component),
            ComponentType::File => self.visit_file(component),
            ComponentType::View => self.visit_view(component),
            ComponentType::SubView => self.visit_sub_view(component),
            ComponentType::ProjectView => self.visit_project_view(component),
        }
    }
}

/// Adapter for [`TypeAwareVisitor`]; has no per-component state
pub struct TypeAwareWrapper<'a> {
    delegate: &'a mut dyn TypeAwareVisitor,
}

impl<'a> TypeAwareWrapper<'a> {
    pub fn new(delegate: &'a mut dyn TypeAwareVisitor) -> Self {
        Self { delegate }
    }
}

impl VisitorWrapper for TypeAwareWrapper<'_> {
    fn crawler_depth_limit(&self) -> CrawlerDepthLimit {
        self.delegate.crawler_depth_limit()
    }

    fn order(&self) -> Order {
        self.delegate.order()
    }

    fn name(&self) -> &str {
        self.delegate.name()
    }

    fn before_component(&mut self, _component: &Arc<Component>) {}

    fn after_component(&mut self, _component: &Arc<Component>) {}

    fn visit_project(&mut self, project: &Arc<Component>) -> Result<()> {
        self.delegate.visit_project(project)
    }

    fn visit_directory(&mut self, directory: &Arc<Component>) -> Result<()> {
        self.delegate.visit_directory(directory)
    }

    fn visit_file(&mut self, file: &Arc<Component>) -> Result<()> {
        self.delegate.visit_file(file)
    }

    fn visit_view(&mut self, view: &Arc<Component>) -> Result<()> {
        self.delegate.visit_view(view)
    }

    fn visit_sub_view(&mut self, sub_view: &Arc<Component>) -> Result<()> {
        self.delegate.visit_sub_view(sub_view)
    }

    fn visit_project_view(&mut self, project_view: &Arc<Component>) -> Result<()> {
        self.delegate.visit_project_view(project_view)
    }

    fn visit_any(&mut self, component: &Arc<Component>) -> Result<()> {
        self.delegate.visit_any(component)
    }
}
