/// Console adapters for rendering the component tree
mod tree_printer;

pub use tree_printer::{LineCount, LineCounter, TreePrinter};
