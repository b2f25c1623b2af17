/// Services building, holding and indexing the component tree
pub mod branch_component_uuids;
pub mod key_generator;
pub mod tree_builder;
pub mod tree_root_holder;
pub mod uuid_factory;

pub use branch_component_uuids::{BranchComponentUuids, BranchSource};
pub use key_generator::{ComponentKeyGenerator, PublicKeyGenerator};
pub use tree_builder::{build_changed_component_tree_root, ComponentTreeBuilder};
pub use tree_root_holder::TreeRootHolder;
pub use uuid_factory::ComponentUuidFactory;
