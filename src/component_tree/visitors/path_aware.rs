use super::visitor::Order;
use super::wrapper::VisitorWrapper;
use crate::component_tree::domain::{Component, ComponentType, CrawlerDepthLimit};
use crate::shared::Result;
use std::sync::Arc;

/// One step of a [`Path`]: a visited component and the element the visitor
/// created for it.
#[derive(Debug)]
pub struct PathElement<T> {
    component: Arc<Component>,
    element: T,
}

impl<T> PathElement<T> {
    pub fn component(&self) -> &Arc<Component> {
        &self.component
    }

    pub fn element(&self) -> &T {
        &self.element
    }

    pub fn element_mut(&mut self) -> &mut T {
        &mut self.element
    }
}

/// Elements of the components from the root down to the one being visited
#[derive(Debug)]
pub struct Path<T> {
    stack: Vec<PathElement<T>>,
}

impl<T> Default for Path<T> {
    fn default() -> Self {
        Self { stack: Vec::new() }
    }
}

impl<T> Path<T> {
    /// Element of the component being visited
    pub fn current(&self) -> Option<&T> {
        self.stack.last().map(PathElement::element)
    }

    pub fn current_mut(&mut self) -> Option<&mut T> {
        self.stack.last_mut().map(PathElement::element_mut)
    }

    /// Element of the parent of the component being visited; `None` on the root
    pub fn parent(&self) -> Option<&T> {
        self.parent_index().map(|index| &self.stack[index].element)
    }

    pub fn parent_mut(&mut self) -> Option<&mut T> {
        let index = self.parent_index()?;
        Some(&mut self.stack[index].element)
    }

    pub fn root(&self) -> Option<&T> {
        self.stack.first().map(PathElement::element)
    }

    pub fn is_root(&self) -> bool {
        self.stack.len() == 1
    }

    pub fn len(&self) -> usize {
        self.stack.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    /// From the component being visited up to the root
    pub fn iter(&self) -> impl Iterator<Item = &PathElement<T>> {
        self.stack.iter().rev()
    }

    fn parent_index(&self) -> Option<usize> {
        self.stack.len().checked_sub(2)
    }

    fn push(&mut self, component: Arc<Component>, element: T) {
        self.stack.push(PathElement { component, element });
    }

    fn pop(&mut self) -> Option<PathElement<T>> {
        self.stack.pop()
    }
}

/// Visitor that keeps one element per component on the path from the root.
///
/// An element is created for a component right before it is visited and
/// dropped right after it was visited, whatever the visitor's order, so a
/// post-order visitor sees the elements of its already visited children
/// through their effects on `path.current_mut()`.
pub trait PathAwareVisitor {
    type Element;

    fn crawler_depth_limit(&self) -> CrawlerDepthLimit;

    fn order(&self) -> Order;

    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    fn create_for_any(&mut self, component: &Component) -> Self::Element;

    fn create_for_project(&mut self, project: &Component) -> Self::Element {
        self.create_for_any(project)
    }

    fn create_for_directory(&mut self, directory: &Component) -> Self::Element {
        self.create_for_any(directory)
    }

    fn create_for_file(&mut self, file: &Component) -> Self::Element {
        self.create_for_any(file)
    }

    fn create_for_view(&mut self, view: &Component) -> Self::Element {
        self.create_for_any(view)
    }

    fn create_for_sub_view(&mut self, sub_view: &Component) -> Self::Element {
        self.create_for_any(sub_view)
    }

    fn create_for_project_view(&mut self, project_view: &Component) -> Self::Element {
        self.create_for_any(project_view)
    }

    fn visit_project(
        &mut self,
        _project: &Arc<Component>,
        _path: &mut Path<Self::Element>,
    ) -> Result<()> {
        Ok(())
    }

    fn visit_directory(
        &mut self,
        _directory: &Arc<Component>,
        _path: &mut Path<Self::Element>,
    ) -> Result<()> {
        Ok(())
    }

    fn visit_file(&mut self, _file: &Arc<Component>, _path: &mut Path<Self::Element>) -> Result<()> {
        Ok(())
    }

    fn visit_view(&mut self, _view: &Arc<Component>, _path: &mut Path<Self::Element>) -> Result<()> {
        Ok(())
    }

    fn visit_sub_view(
        &mut self,
        _sub_view: &Arc<Component>,
        _path: &mut Path<Self::Element>,
    ) -> Result<()> {
        Ok(())
    }

    fn visit_project_view(
        &mut self,
        _project_view: &Arc<Component>,
        _path: &mut Path<Self::Element>,
    ) -> Result<()> {
        Ok(())
    }

    fn visit_any(
        &mut self,
        _component: &Arc<Component>,
        _path: &mut Path<Self::Element>,
    ) -> Result<()> {
        Ok(())
    }
}

/// Adapter for [`PathAwareVisitor`]; owns the path stack
pub struct PathAwareWrapper<'a, V: PathAwareVisitor> {
    delegate: &'a mut V,
    path: Path<V::Element>,
}

impl<'a, V: PathAwareVisitor> PathAwareWrapper<'a, V> {
    pub fn new(delegate: &'a mut V) -> Self {
        Self {
            delegate,
            path: Path::default(),
        }
    }
}

impl<V: PathAwareVisitor> VisitorWrapper for PathAwareWrapper<'_, V> {
    fn crawler_depth_limit(&self) -> CrawlerDepthLimit {
        self.delegate.crawler_depth_limit()
    }

    fn order(&self) -> Order {
        self.delegate.order()
    }

    fn name(&self) -> &str {
        self.delegate.name()
    }

    fn before_component(&mut self, component: &Arc<Component>) {
        let element = match component.component_type() {
            ComponentType::Project => self.delegate.create_for_project(component),
            ComponentType::Directory => self.delegate.create_for_directory(component),
            ComponentType::File => self.delegate.create_for_file(component),
            ComponentType::View => self.delegate.create_for_view(component),
            ComponentType::SubView => self.delegate.create_for_sub_view(component),
            ComponentType::ProjectView => self.delegate.create_for_project_view(component),
        };
        self.path.push(Arc::clone(component), element);
    }

    fn after_component(&mut self, _component: &Arc<Component>) {
        self.path.pop();
    }

    fn visit_project(&mut self, project: &Arc<Component>) -> Result<()> {
        self.delegate.visit_project(project, &mut self.path)
    }

    fn visit_directory(&mut self, directory: &Arc<Component>) -> Result<()> {
        self.delegate.visit_directory(directory, &mut self.path)
    }

    fn visit_file(&mut self, file: &Arc<Component>) -> Result<()> {
        self.delegate.visit_file(file, &mut self.path)
    }

    fn visit_view(&mut self, view: &Arc<Component>) -> Result<()> {
        self.delegate.visit_view(view, &mut self.path)
    }

    fn visit_sub_view(&mut self, sub_view: &Arc<Component>) -> Result<()> {
        self.delegate.visit_sub_view(sub_view, &mut self.path)
    }

    fn visit_project_view(&mut self, project_view: &Arc<Component>) -> Result<()> {
        self.delegate.visit_project_view(project_view, &mut self.path)
    }

    fn visit_any(&mut self, component: &Arc<Component>) -> Result<()> {
        self.delegate.visit_any(component, &mut self.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component_tree::domain::ComponentAttributes;

    fn directory(uuid: &str) -> Arc<Component> {
        Arc::new(
            Component::builder(ComponentAttributes::Directory)
                .uuid(uuid)
                .db_key(uuid)
                .name(uuid)
                .build()
                .unwrap(),
        )
    }

    #[test]
    fn test_empty_path() {
        let path: Path<u32> = Path::default();
        assert!(path.is_empty());
        assert!(path.current().is_none());
        assert!(path.parent().is_none());
        assert!(!path.is_root());
    }

    #[test]
    fn test_path_navigation() {
        let mut path = Path::default();
        path.push(directory("A"), 1);
        assert!(path.is_root());
        assert_eq!(path.current(), Some(&1));
        assert_eq!(path.parent(), None);

        path.push(directory("B"), 2);
        path.push(directory("C"), 3);
        assert!(!path.is_root());
        assert_eq!(path.current(), Some(&3));
        assert_eq!(path.parent(), Some(&2));
        assert_eq!(path.root(), Some(&1));

        *path.parent_mut().unwrap() += 10;
        assert_eq!(path.parent(), Some(&12));

        let uuids: Vec<&str> = path.iter().map(|e| e.component().uuid()).collect();
        assert_eq!(uuids, vec!["C", "B", "A"]);

        path.pop();
        assert_eq!(path.current(), Some(&12));
        assert_eq!(path.len(), 2);
    }
}
