use crate::component_tree::domain::{Component, CrawlerDepthLimit};
use crate::component_tree::visitors::{ComponentVisitor, Order, TypeAwareVisitor, VisitorsCrawler};
use crate::shared::{Result, TreeError};
use once_cell::sync::OnceCell;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

#[derive(Debug)]
struct Roots {
    root: Arc<Component>,
    report_tree_root: Arc<Component>,
}

#[derive(Debug, Default)]
struct ComponentIndex {
    by_ref: HashMap<i32, Arc<Component>>,
    by_uuid: HashMap<String, Arc<Component>>,
}

/// TreeRootHolder - Single-assignment holder of the tree of an analysis
///
/// Holds two roots: `root`, the tree the computation steps work on (only
/// what changed, for short-lived branches and pull requests), and
/// `report_tree_root`, the full tree built from the report. Lookups by ref
/// and by uuid are indexed on first use.
///
/// Every read fails until [`TreeRootHolder::set_roots`] was called, and
/// roots can only be set once.
#[derive(Debug, Default)]
pub struct TreeRootHolder {
    roots: OnceCell<Roots>,
    index: OnceCell<ComponentIndex>,
    report_index: OnceCell<HashMap<i32, Arc<Component>>>,
}

impl TreeRootHolder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs the roots
    ///
    /// # Errors
    /// Returns [`TreeError::HolderAlreadyInitialized`] on a second call
    pub fn set_roots(&self, root: Arc<Component>, report_tree_root: Arc<Component>) -> Result<()> {
        self.roots
            .set(Roots {
                root,
                report_tree_root,
            })
            .map_err(|_| TreeError::HolderAlreadyInitialized.into())
    }

    /// Whether the roots were not set yet
    pub fn is_empty(&self) -> bool {
        self.roots.get().is_none()
    }

    pub fn root(&self) -> Result<&Arc<Component>> {
        Ok(&self.roots()?.root)
    }

    pub fn report_tree_root(&self) -> Result<&Arc<Component>> {
        Ok(&self.roots()?.report_tree_root)
    }

    /// Component of the tree under [`TreeRootHolder::root`] with the given ref
    ///
    /// # Errors
    /// Returns an error if the holder is not initialized or no such component exists
    pub fn component_by_ref(&self, component_ref: i32) -> Result<&Arc<Component>> {
        self.optional_component_by_ref(component_ref)?
            .ok_or_else(|| TreeError::ComponentNotFoundByRef { component_ref }.into())
    }

    pub fn optional_component_by_ref(&self, component_ref: i32) -> Result<Option<&Arc<Component>>> {
        Ok(self.index()?.by_ref.get(&component_ref))
    }

    /// Component of the full report tree with the given ref
    pub fn report_tree_component_by_ref(&self, component_ref: i32) -> Result<&Arc<Component>> {
        let report_index = self.report_index.get_or_try_init(|| {
            let mut indexer = ComponentIndexer::default();
            crawl(&mut indexer, self.report_tree_root()?)?;
            Ok::<_, anyhow::Error>(indexer.index.by_ref)
        })?;
        report_index
            .get(&component_ref)
            .ok_or_else(|| TreeError::ComponentNotFoundByRef { component_ref }.into())
    }

    pub fn component_by_uuid(&self, uuid: &str) -> Result<&Arc<Component>> {
        self.index()?
            .by_uuid
            .get(uuid)
            .ok_or_else(|| {
                TreeError::ComponentNotFoundByUuid {
                    uuid: uuid.to_string(),
                }
                .into()
            })
    }

    /// Number of components of the tree under [`TreeRootHolder::root`], down to files
    pub fn size(&self) -> Result<usize> {
        Ok(self.index()?.by_uuid.len())
    }

    fn roots(&self) -> Result<&Roots> {
        self.roots
            .get()
            .ok_or_else(|| TreeError::HolderNotInitialized.into())
    }

    fn index(&self) -> Result<&ComponentIndex> {
        self.index.get_or_try_init(|| {
            let mut indexer = ComponentIndexer::default();
            crawl(&mut indexer, self.root()?)?;
            debug!(
                by_ref = indexer.index.by_ref.len(),
                by_uuid = indexer.index.by_uuid.len(),
                "Indexed component tree"
            );
            Ok(indexer.index)
        })
    }
}

fn crawl(indexer: &mut ComponentIndexer, root: &Arc<Component>) -> Result<()> {
    VisitorsCrawler::new(vec![ComponentVisitor::type_aware(indexer)]).visit(root)
}

#[derive(Default)]
struct ComponentIndexer {
    index: ComponentIndex,
}

impl TypeAwareVisitor for ComponentIndexer {
    fn crawler_depth_limit(&self) -> CrawlerDepthLimit {
        CrawlerDepthLimit::FILE
    }

    fn order(&self) -> Order {
        Order::PostOrder
    }

    fn visit_any(&mut self, component: &Arc<Component>) -> Result<()> {
        if let Some(component_ref) = component.report_attributes().component_ref() {
            self.index
                .by_ref
                .insert(component_ref, Arc::clone(component));
        }
        self.index
            .by_uuid
            .insert(component.uuid().to_string(), Arc::clone(component));
        Ok(())
    }
}
