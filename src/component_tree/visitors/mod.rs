/// Visitor engine over the component tree
///
/// Downstream computations implement [`TypeAwareVisitor`] or
/// [`PathAwareVisitor`] and hand them to a [`VisitorsCrawler`].
pub mod crawler;
pub mod path_aware;
pub mod visitor;
pub mod wrapper;

pub use crawler::VisitorsCrawler;
pub use path_aware::{Path, PathAwareVisitor, PathElement};
pub use visitor::{ComponentVisitor, Order, TypeAwareVisitor};
pub use wrapper::VisitorWrapper;
