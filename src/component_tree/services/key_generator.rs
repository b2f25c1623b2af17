use crate::component_tree::domain::{effective_key, Branch};

/// Turns a root key and a project-relative path into a component key
pub trait ComponentKeyGenerator {
    fn generate_key(&self, root_key: &str, path: Option<&str>) -> String;
}

/// Branch-aware database keys
impl ComponentKeyGenerator for Branch {
    fn generate_key(&self, root_key: &str, path: Option<&str>) -> String {
        Branch::generate_key(self, root_key, path)
    }
}

/// Public (displayed) keys: always the main-branch effective key
#[derive(Debug, Clone, Copy, Default)]
pub struct PublicKeyGenerator;

impl ComponentKeyGenerator for PublicKeyGenerator {
    fn generate_key(&self, root_key: &str, path: Option<&str>) -> String {
        effective_key(root_key, path)
    }
}
