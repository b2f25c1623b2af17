use super::component::ComponentType;
use std::fmt;

/// How deep a visitor wants the crawler to go, separately for the report
/// tree and the views tree. A missing limit means the visitor never applies
/// to that tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CrawlerDepthLimit {
    report_max_depth: Option<ComponentType>,
    views_max_depth: Option<ComponentType>,
}

impl CrawlerDepthLimit {
    pub const PROJECT: Self = Self::report_only(ComponentType::Project);
    pub const DIRECTORY: Self = Self::report_only(ComponentType::Directory);
    pub const FILE: Self = Self::report_only(ComponentType::File);
    pub const VIEW: Self = Self::views_only(ComponentType::View);
    pub const SUBVIEW: Self = Self::views_only(ComponentType::SubView);
    pub const PROJECT_VIEW: Self = Self::views_only(ComponentType::ProjectView);
    pub const LEAVES: Self = Self::new(Some(ComponentType::File), Some(ComponentType::ProjectView));
    pub const ROOTS: Self = Self::new(Some(ComponentType::Project), Some(ComponentType::View));

    pub const fn new(
        report_max_depth: Option<ComponentType>,
        views_max_depth: Option<ComponentType>,
    ) -> Self {
        Self {
            report_max_depth,
            views_max_depth,
        }
    }

    const fn report_only(max_depth: ComponentType) -> Self {
        Self::new(Some(max_depth), None)
    }

    const fn views_only(max_depth: ComponentType) -> Self {
        Self::new(None, Some(max_depth))
    }

    pub fn report_max_depth(&self) -> Option<ComponentType> {
        self.report_max_depth
    }

    pub fn views_max_depth(&self) -> Option<ComponentType> {
        self.views_max_depth
    }

    /// Whether the limit is `component_type` or deeper, within the tree that
    /// `component_type` belongs to.
    pub fn matches(&self, component_type: ComponentType) -> bool {
        let limit = if component_type.is_report_type() {
            self.report_max_depth
        } else {
            self.views_max_depth
        };
        limit.is_some_and(|max| max == component_type || max.is_deeper_than(component_type))
    }
}

impl fmt::Display for CrawlerDepthLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let render = |depth: Option<ComponentType>| depth.map_or("-", ComponentType::as_str);
        write!(
            f,
            "CrawlerDepthLimit{{{} {}}}",
            render(self.report_max_depth),
            render(self.views_max_depth)
        )
    }
}
