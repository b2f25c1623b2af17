use crate::component_tree::domain::{Component, ComponentType, CrawlerDepthLimit, Status};
use crate::component_tree::visitors::{Order, Path, PathAwareVisitor};
use crate::shared::Result;
use owo_colors::OwoColorize;
use std::collections::HashMap;
use std::fmt::Write;
use std::sync::Arc;

/// Files and lines under a component
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LineCount {
    pub files: usize,
    pub lines: u64,
}

impl LineCount {
    fn add(&mut self, other: LineCount) {
        self.files += other.files;
        self.lines += other.lines;
    }
}

/// LineCounter - Sums files and lines bottom-up
///
/// Each component accumulates into its path element, then hands the total
/// to its parent's element. Totals are kept by component uuid.
#[derive(Debug, Default)]
pub struct LineCounter {
    counts_by_uuid: HashMap<String, LineCount>,
}

impl LineCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self, uuid: &str) -> Option<LineCount> {
        self.counts_by_uuid.get(uuid).copied()
    }

    pub fn into_counts(self) -> HashMap<String, LineCount> {
        self.counts_by_uuid
    }
}

impl PathAwareVisitor for LineCounter {
    type Element = LineCount;

    fn crawler_depth_limit(&self) -> CrawlerDepthLimit {
        CrawlerDepthLimit::LEAVES
    }

    fn order(&self) -> Order {
        Order::PostOrder
    }

    fn name(&self) -> &str {
        "LineCounter"
    }

    fn create_for_any(&mut self, _component: &Component) -> LineCount {
        LineCount::default()
    }

    fn visit_any(&mut self, component: &Arc<Component>, path: &mut Path<LineCount>) -> Result<()> {
        if let (Some(file), Some(current)) = (component.file_attributes(), path.current_mut()) {
            current.add(LineCount {
                files: 1,
                lines: u64::from(file.lines().unsigned_abs()),
            });
        }
        let count = path.current().copied().unwrap_or_default();
        if let Some(parent) = path.parent_mut() {
            parent.add(count);
        }
        self.counts_by_uuid.insert(component.uuid().to_string(), count);
        Ok(())
    }
}

/// TreePrinter - Renders the tree top-down, one component per line
///
/// Children are indented by two spaces per level. Statuses are colored
/// when `colored` is set.
pub struct TreePrinter<'a> {
    depth_limit: CrawlerDepthLimit,
    line_counts: &'a HashMap<String, LineCount>,
    colored: bool,
    output: String,
}

impl<'a> TreePrinter<'a> {
    pub fn new(
        depth_limit: CrawlerDepthLimit,
        line_counts: &'a HashMap<String, LineCount>,
        colored: bool,
    ) -> Self {
        Self {
            depth_limit,
            line_counts,
            colored,
            output: String::new(),
        }
    }

    pub fn into_output(self) -> String {
        self.output
    }

    fn status_label(&self, status: Status) -> String {
        if !self.colored {
            return status.as_str().to_string();
        }
        match status {
            Status::Added => status.as_str().green().to_string(),
            Status::Changed => status.as_str().yellow().to_string(),
            Status::Same => status.as_str().dimmed().to_string(),
            Status::Unavailable => status.as_str().to_string(),
        }
    }
}

impl PathAwareVisitor for TreePrinter<'_> {
    type Element = ();

    fn crawler_depth_limit(&self) -> CrawlerDepthLimit {
        self.depth_limit
    }

    fn order(&self) -> Order {
        Order::PreOrder
    }

    fn name(&self) -> &str {
        "TreePrinter"
    }

    fn create_for_any(&mut self, _component: &Component) {}

    fn visit_any(&mut self, component: &Arc<Component>, path: &mut Path<()>) -> Result<()> {
        let indent = "  ".repeat(path.len().saturating_sub(1));
        let count = self
            .line_counts
            .get(component.uuid())
            .copied()
            .unwrap_or_default();

        let mut line = format!(
            "{}{} [{}]",
            indent,
            component.short_name(),
            component.component_type()
        );
        if component.component_type() == ComponentType::File {
            write!(
                line,
                " {} ({} lines)",
                self.status_label(component.status()),
                count.lines
            )?;
        } else {
            write!(line, " ({} files, {} lines)", count.files, count.lines)?;
        }
        writeln!(self.output, "{}", line)?;
        Ok(())
    }
}
