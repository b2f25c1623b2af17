use super::path_aware::{PathAwareVisitor, PathAwareWrapper};
use super::wrapper::{TypeAwareWrapper, VisitorWrapper};
use crate::component_tree::domain::{Component, CrawlerDepthLimit};
use crate::shared::Result;
use std::sync::Arc;

/// When a visitor sees a component relative to its children
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Order {
    /// Before the children (top-down)
    PreOrder,
    /// After the children (bottom-up)
    PostOrder,
}

/// Visitor dispatching on the component type.
///
/// `visit_any` is called for every visited component, before the
/// type-specific method. All methods default to doing nothing.
pub trait TypeAwareVisitor {
    /// Deepest component type this visitor wants to see
    fn crawler_depth_limit(&self) -> CrawlerDepthLimit;

    fn order(&self) -> Order;

    /// Name used to report cumulative durations
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    fn visit_project(&mut self, _project: &Arc<Component>) -> Result<()> {
        Ok(())
    }

    fn visit_directory(&mut self, _directory: &Arc<Component>) -> Result<()> {
        Ok(())
    }

    fn visit_file(&mut self, _file: &Arc<Component>) -> Result<()> {
        Ok(())
    }

    fn visit_view(&mut self, _view: &Arc<Component>) -> Result<()> {
        Ok(())
    }

    fn visit_sub_view(&mut self, _sub_view: &Arc<Component>) -> Result<()> {
        Ok(())
    }

    fn visit_project_view(&mut self, _project_view: &Arc<Component>) -> Result<()> {
        Ok(())
    }

    fn visit_any(&mut self, _component: &Arc<Component>) -> Result<()> {
        Ok(())
    }
}

/// A visitor registered with the crawler.
///
/// Both shapes are normalized to a [`VisitorWrapper`] when the crawler is
/// created, so the traversal itself never looks at the shape again.
pub enum ComponentVisitor<'a> {
    TypeAware(&'a mut dyn TypeAwareVisitor),
    PathAware(Box<dyn VisitorWrapper + 'a>),
}

impl<'a> ComponentVisitor<'a> {
    pub fn type_aware(visitor: &'a mut dyn TypeAwareVisitor) -> Self {
        ComponentVisitor::TypeAware(visitor)
    }

    pub fn path_aware<V>(visitor: &'a mut V) -> Self
    where
        V: PathAwareVisitor + 'a,
        V::Element: 'a,
    {
        ComponentVisitor::PathAware(Box::new(PathAwareWrapper::new(visitor)))
    }

    pub(crate) fn into_wrapper(self) -> Box<dyn VisitorWrapper + 'a> {
        match self {
            ComponentVisitor::TypeAware(visitor) => Box::new(TypeAwareWrapper::new(visitor)),
            ComponentVisitor::PathAware(wrapper) => wrapper,
        }
    }
}
