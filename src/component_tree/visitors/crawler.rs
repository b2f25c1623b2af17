use super::visitor::{ComponentVisitor, Order};
use super::wrapper::VisitorWrapper;
use crate::component_tree::domain::Component;
use crate::shared::{Result, TreeError};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::trace;

/// VisitorsCrawler - Runs several visitors over a tree in a single walk
///
/// At each component, only the visitors whose depth limit reaches the
/// component's type take part: their `before_component` hooks run first,
/// then the pre-order visitors, then the children (in order), then the
/// post-order visitors, then the `after_component` hooks. Visitors of the
/// same order run in registration order.
///
/// A failure in a visitor stops the walk and is reported once as
/// [`TreeError::VisitFailed`] for the component where it happened.
pub struct VisitorsCrawler<'a> {
    wrappers: Vec<Box<dyn VisitorWrapper + 'a>>,
    durations: Option<Vec<Duration>>,
}

impl<'a> VisitorsCrawler<'a> {
    /// Creates a crawler that does not measure durations
    pub fn new(visitors: Vec<ComponentVisitor<'a>>) -> Self {
        Self::with_durations(visitors, false)
    }

    /// Creates a crawler, measuring time spent in each visitor if
    /// `compute_durations` is set
    pub fn with_durations(visitors: Vec<ComponentVisitor<'a>>, compute_durations: bool) -> Self {
        let wrappers: Vec<Box<dyn VisitorWrapper + 'a>> = visitors
            .into_iter()
            .map(ComponentVisitor::into_wrapper)
            .collect();
        let durations = compute_durations.then(|| vec![Duration::ZERO; wrappers.len()]);
        Self {
            wrappers,
            durations,
        }
    }

    /// Time spent in each visitor so far, in registration order
    ///
    /// # Errors
    /// Returns [`TreeError::DurationNotComputed`] if the crawler was created
    /// without duration tracking
    pub fn cumulative_durations(&self) -> Result<Vec<(String, Duration)>> {
        let durations = self
            .durations
            .as_ref()
            .ok_or(TreeError::DurationNotComputed)?;
        Ok(self
            .wrappers
            .iter()
            .zip(durations)
            .map(|(wrapper, duration)| (wrapper.name().to_string(), *duration))
            .collect())
    }

    /// Walks the tree rooted at `component`
    ///
    /// # Errors
    /// Returns [`TreeError::VisitFailed`] carrying the key and type of the
    /// component where a visitor failed, with the visitor error as source
    pub fn visit(&mut self, component: &Arc<Component>) -> Result<()> {
        self.visit_impl(component).map_err(|error| {
            let already_wrapped = error
                .downcast_ref::<TreeError>()
                .is_some_and(TreeError::is_visit_failure);
            if already_wrapped {
                error
            } else {
                TreeError::VisitFailed {
                    key: component.db_key().to_string(),
                    component_type: component.component_type().to_string(),
                    source: error,
                }
                .into()
            }
        })
    }

    fn visit_impl(&mut self, component: &Arc<Component>) -> Result<()> {
        let component_type = component.component_type();
        let applicable: Vec<usize> = self
            .wrappers
            .iter()
            .enumerate()
            .filter(|(_, wrapper)| wrapper.crawler_depth_limit().matches(component_type))
            .map(|(index, _)| index)
            .collect();
        // children are always deeper, so no visitor can apply below
        if applicable.is_empty() {
            return Ok(());
        }
        trace!(
            key = component.db_key(),
            component_type = %component_type,
            visitors = applicable.len(),
            "Visiting component"
        );

        for &index in &applicable {
            self.wrappers[index].before_component(component);
        }
        self.visit_nodes(&applicable, Order::PreOrder, component)?;
        for child in component.children() {
            self.visit(child)?;
        }
        self.visit_nodes(&applicable, Order::PostOrder, component)?;
        for &index in &applicable {
            self.wrappers[index].after_component(component);
        }
        Ok(())
    }

    fn visit_nodes(
        &mut self,
        applicable: &[usize],
        order: Order,
        component: &Arc<Component>,
    ) -> Result<()> {
        for &index in applicable {
            if self.wrappers[index].order() != order {
                continue;
            }
            let start = Instant::now();
            self.wrappers[index].visit_node(component)?;
            if let Some(durations) = self.durations.as_mut() {
                durations[index] += start.elapsed();
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component_tree::domain::{
        ComponentAttributes, ComponentType, CrawlerDepthLimit, FileAttributes,
        ProjectViewAttributes, SubViewAttributes, ViewAttributes, ViewType,
    };
    use crate::component_tree::visitors::{Path, PathAwareVisitor, TypeAwareVisitor};
    use std::cell::RefCell;
    use std::rc::Rc;

    type CallLog = Rc<RefCell<Vec<String>>>;

    fn file(key: &str) -> Arc<Component> {
        Arc::new(
            Component::builder(ComponentAttributes::File(
                FileAttributes::new(false, None, 1).unwrap(),
            ))
            .uuid(format!("{}_uuid", key))
            .db_key(key)
            .name(key)
            .build()
            .unwrap(),
        )
    }

    fn directory(key: &str, children: Vec<Arc<Component>>) -> Arc<Component> {
        Arc::new(
            Component::builder(ComponentAttributes::Directory)
                .uuid(format!("{}_uuid", key))
                .db_key(key)
                .name(key)
                .children(children)
                .build()
                .unwrap(),
        )
    }

    fn project(children: Vec<Arc<Component>>) -> Arc<Component> {
        Arc::new(
            Component::builder(ComponentAttributes::Project(
                crate::component_tree::domain::ProjectAttributes::new("1.0", None),
            ))
            .uuid("P_uuid")
            .db_key("P")
            .name("P")
            .children(children)
            .build()
            .unwrap(),
        )
    }

    fn tree() -> Arc<Component> {
        project(vec![
            directory("D1", vec![file("F1"), file("F2")]),
            directory("D2", vec![file("F3")]),
        ])
    }

    fn project_view(key: &str) -> Arc<Component> {
        Arc::new(
            Component::builder(ComponentAttributes::ProjectView(ProjectViewAttributes::new(
                format!("{}_project", key),
                key,
                None,
            )))
            .uuid(format!("{}_uuid", key))
            .db_key(key)
            .name(key)
            .build()
            .unwrap(),
        )
    }

    /// VIEW V -> [SUBVIEW SV -> [PROJECT_VIEW PV1], PROJECT_VIEW PV2]
    fn views_tree() -> Arc<Component> {
        let sub_view = Arc::new(
            Component::builder(ComponentAttributes::SubView(SubViewAttributes::new(None)))
                .uuid("SV_uuid")
                .db_key("SV")
                .name("SV")
                .child(project_view("PV1"))
                .build()
                .unwrap(),
        );
        Arc::new(
            Component::builder(ComponentAttributes::View(ViewAttributes::new(
                ViewType::Portfolio,
            )))
            .uuid("V_uuid")
            .db_key("V")
            .name("V")
            .children([sub_view, project_view("PV2")])
            .build()
            .unwrap(),
        )
    }

    fn typed_calls(calls: &CallLog) -> Vec<String> {
        calls
            .borrow()
            .iter()
            .filter(|call| !call.contains(":any:"))
            .cloned()
            .collect()
    }

    struct RecordingVisitor {
        tag: &'static str,
        depth: CrawlerDepthLimit,
        order: Order,
        log: CallLog,
        fail_on: Option<&'static str>,
    }

    impl RecordingVisitor {
        fn new(tag: &'static str, depth: CrawlerDepthLimit, order: Order, log: &CallLog) -> Self {
            Self {
                tag,
                depth,
                order,
                log: Rc::clone(log),
                fail_on: None,
            }
        }

        fn record(&self, method: &str, component: &Component) {
            self.log
                .borrow_mut()
                .push(format!("{}:{}:{}", self.tag, method, component.db_key()));
        }
    }

    impl TypeAwareVisitor for RecordingVisitor {
        fn crawler_depth_limit(&self) -> CrawlerDepthLimit {
            self.depth
        }

        fn order(&self) -> Order {
            self.order
        }

        fn visit_project(&mut self, project: &Arc<Component>) -> Result<()> {
            self.record("project", project);
            Ok(())
        }

        fn visit_directory(&mut self, directory: &Arc<Component>) -> Result<()> {
            self.record("directory", directory);
            Ok(())
        }

        fn visit_file(&mut self, file: &Arc<Component>) -> Result<()> {
            self.record("file", file);
            if self.fail_on == Some(file.db_key()) {
                anyhow::bail!("cannot visit {}", file.db_key());
            }
            Ok(())
        }

        fn visit_view(&mut self, view: &Arc<Component>) -> Result<()> {
            self.record("view", view);
            Ok(())
        }

        fn visit_sub_view(&mut self, sub_view: &Arc<Component>) -> Result<()> {
            self.record("sub_view", sub_view);
            Ok(())
        }

        fn visit_project_view(&mut self, project_view: &Arc<Component>) -> Result<()> {
            self.record("project_view", project_view);
            Ok(())
        }

        fn visit_any(&mut self, component: &Arc<Component>) -> Result<()> {
            self.record("any", component);
            Ok(())
        }
    }

    fn log() -> CallLog {
        Rc::new(RefCell::new(Vec::new()))
    }

    #[test]
    fn test_pre_order_visits_parents_first() {
        let calls = log();
        let mut visitor = RecordingVisitor::new("pre", CrawlerDepthLimit::FILE, Order::PreOrder, &calls);
        VisitorsCrawler::new(vec![ComponentVisitor::type_aware(&mut visitor)])
            .visit(&tree())
            .unwrap();

        assert_eq!(
            *calls.borrow(),
            vec![
                "pre:any:P",
                "pre:project:P",
                "pre:any:D1",
                "pre:directory:D1",
                "pre:any:F1",
                "pre:file:F1",
                "pre:any:F2",
                "pre:file:F2",
                "pre:any:D2",
                "pre:directory:D2",
                "pre:any:F3",
                "pre:file:F3",
            ]
        );
    }

    #[test]
    fn test_post_order_visits_children_first() {
        let calls = log();
        let mut visitor = RecordingVisitor::new("post", CrawlerDepthLimit::FILE, Order::PostOrder, &calls);
        VisitorsCrawler::new(vec![ComponentVisitor::type_aware(&mut visitor)])
            .visit(&tree())
            .unwrap();

        let typed: Vec<String> = calls
            .borrow()
            .iter()
            .filter(|call| !call.contains(":any:"))
            .cloned()
            .collect();
        assert_eq!(
            typed,
            vec![
                "post:file:F1",
                "post:file:F2",
                "post:directory:D1",
                "post:file:F3",
                "post:directory:D2",
                "post:project:P",
            ]
        );
    }

    #[test]
    fn test_pre_and_post_order_visitors_together() {
        let calls = log();
        let mut pre = RecordingVisitor::new("pre", CrawlerDepthLimit::FILE, Order::PreOrder, &calls);
        let mut post = RecordingVisitor::new("post", CrawlerDepthLimit::FILE, Order::PostOrder, &calls);
        VisitorsCrawler::new(vec![
            ComponentVisitor::type_aware(&mut post),
            ComponentVisitor::type_aware(&mut pre),
        ])
        .visit(&directory("D", vec![file("F")]))
        .unwrap();

        assert_eq!(
            *calls.borrow(),
            vec![
                "pre:any:D",
                "pre:directory:D",
                "pre:any:F",
                "pre:file:F",
                "post:any:F",
                "post:file:F",
                "post:any:D",
                "post:directory:D",
            ]
        );
    }

    #[test]
    fn test_depth_limit_directory_never_visits_files() {
        let calls = log();
        let mut visitor =
            RecordingVisitor::new("v", CrawlerDepthLimit::DIRECTORY, Order::PreOrder, &calls);
        VisitorsCrawler::new(vec![ComponentVisitor::type_aware(&mut visitor)])
            .visit(&tree())
            .unwrap();

        assert!(calls.borrow().iter().all(|call| !call.contains(":file:")));
        assert!(calls.borrow().contains(&"v:directory:D2".to_string()));
    }

    #[test]
    fn test_depth_limit_project_only_visits_root() {
        let calls = log();
        let mut visitor =
            RecordingVisitor::new("v", CrawlerDepthLimit::PROJECT, Order::PostOrder, &calls);
        VisitorsCrawler::new(vec![ComponentVisitor::type_aware(&mut visitor)])
            .visit(&tree())
            .unwrap();

        assert_eq!(*calls.borrow(), vec!["v:any:P", "v:project:P"]);
    }

    #[test]
    fn test_views_visitor_skips_report_tree() {
        let calls = log();
        let mut visitor =
            RecordingVisitor::new("v", CrawlerDepthLimit::PROJECT_VIEW, Order::PreOrder, &calls);
        VisitorsCrawler::new(vec![ComponentVisitor::type_aware(&mut visitor)])
            .visit(&tree())
            .unwrap();

        assert!(calls.borrow().is_empty());
    }

    #[test]
    fn test_views_tree_pre_order_down_to_leaves() {
        let calls = log();
        let mut visitor = RecordingVisitor::new("pre", CrawlerDepthLimit::LEAVES, Order::PreOrder, &calls);
        VisitorsCrawler::new(vec![ComponentVisitor::type_aware(&mut visitor)])
            .visit(&views_tree())
            .unwrap();

        assert_eq!(
            *calls.borrow(),
            vec![
                "pre:any:V",
                "pre:view:V",
                "pre:any:SV",
                "pre:sub_view:SV",
                "pre:any:PV1",
                "pre:project_view:PV1",
                "pre:any:PV2",
                "pre:project_view:PV2",
            ]
        );
    }

    #[test]
    fn test_views_tree_post_order_down_to_leaves() {
        let calls = log();
        let mut visitor = RecordingVisitor::new("post", CrawlerDepthLimit::LEAVES, Order::PostOrder, &calls);
        VisitorsCrawler::new(vec![ComponentVisitor::type_aware(&mut visitor)])
            .visit(&views_tree())
            .unwrap();

        assert_eq!(
            typed_calls(&calls),
            vec![
                "post:project_view:PV1",
                "post:sub_view:SV",
                "post:project_view:PV2",
                "post:view:V",
            ]
        );
    }

    #[test]
    fn test_views_tree_depth_limit_sub_view() {
        for order in [Order::PreOrder, Order::PostOrder] {
            let calls = log();
            let mut visitor = RecordingVisitor::new("v", CrawlerDepthLimit::SUBVIEW, order, &calls);
            VisitorsCrawler::new(vec![ComponentVisitor::type_aware(&mut visitor)])
                .visit(&views_tree())
                .unwrap();

            let expected = match order {
                Order::PreOrder => vec!["v:view:V", "v:sub_view:SV"],
                Order::PostOrder => vec!["v:sub_view:SV", "v:view:V"],
            };
            assert_eq!(typed_calls(&calls), expected);
        }
    }

    #[test]
    fn test_report_visitor_skips_views_tree() {
        let calls = log();
        let mut visitor = RecordingVisitor::new("v", CrawlerDepthLimit::FILE, Order::PreOrder, &calls);
        VisitorsCrawler::new(vec![ComponentVisitor::type_aware(&mut visitor)])
            .visit(&views_tree())
            .unwrap();

        assert!(calls.borrow().is_empty());
    }

    #[test]
    fn test_visitor_failure_is_wrapped_once() {
        let calls = log();
        let mut visitor = RecordingVisitor::new("v", CrawlerDepthLimit::FILE, Order::PreOrder, &calls);
        visitor.fail_on = Some("F2");

        let err = VisitorsCrawler::new(vec![ComponentVisitor::type_aware(&mut visitor)])
            .visit(&tree())
            .unwrap_err();

        assert_eq!(err.to_string(), "Visit of Component {key=F2,type=FILE} failed");
        let source = std::error::Error::source(err.downcast_ref::<TreeError>().unwrap()).unwrap();
        assert_eq!(source.to_string(), "cannot visit F2");
        assert!(!calls.borrow().iter().any(|call| call.ends_with(":D2")));
    }

    #[test]
    fn test_durations_not_computed_by_default() {
        let crawler = VisitorsCrawler::new(vec![]);
        let err = crawler.cumulative_durations().unwrap_err();
        assert!(matches!(
            err.downcast_ref::<TreeError>(),
            Some(TreeError::DurationNotComputed)
        ));
    }

    #[test]
    fn test_durations_are_reported_per_visitor() {
        let calls = log();
        let mut visitor = RecordingVisitor::new("v", CrawlerDepthLimit::FILE, Order::PreOrder, &calls);
        let mut crawler =
            VisitorsCrawler::with_durations(vec![ComponentVisitor::type_aware(&mut visitor)], true);
        crawler.visit(&tree()).unwrap();

        let durations = crawler.cumulative_durations().unwrap();
        assert_eq!(durations.len(), 1);
        assert!(durations[0].0.ends_with("RecordingVisitor"));
    }

    struct DepthCounter {
        depths_by_key: Vec<(String, usize)>,
        files_by_key: Vec<(String, u32)>,
    }

    impl PathAwareVisitor for DepthCounter {
        type Element = u32;

        fn crawler_depth_limit(&self) -> CrawlerDepthLimit {
            CrawlerDepthLimit::FILE
        }

        fn order(&self) -> Order {
            Order::PostOrder
        }

        fn create_for_any(&mut self, _component: &Component) -> u32 {
            0
        }

        fn create_for_file(&mut self, _file: &Component) -> u32 {
            1
        }

        fn visit_any(&mut self, component: &Arc<Component>, path: &mut Path<u32>) -> Result<()> {
            self.depths_by_key
                .push((component.db_key().to_string(), path.len()));
            let files = path.current().copied().unwrap_or_default();
            if component.component_type() != ComponentType::File {
                self.files_by_key
                    .push((component.db_key().to_string(), files));
            }
            if let Some(parent) = path.parent_mut() {
                *parent += files;
            }
            Ok(())
        }
    }

    #[test]
    fn test_path_aware_visitor_tracks_path() {
        let mut counter = DepthCounter {
            depths_by_key: Vec::new(),
            files_by_key: Vec::new(),
        };
        VisitorsCrawler::new(vec![ComponentVisitor::path_aware(&mut counter)])
            .visit(&tree())
            .unwrap();

        assert!(counter.depths_by_key.contains(&("P".to_string(), 1)));
        assert!(counter.depths_by_key.contains(&("D1".to_string(), 2)));
        assert!(counter.depths_by_key.contains(&("F3".to_string(), 3)));
        assert_eq!(
            counter.files_by_key,
            vec![
                ("D1".to_string(), 2),
                ("D2".to_string(), 1),
                ("P".to_string(), 3),
            ]
        );
    }
}
