//! Counter key derivation

/// Counter key builder
///
/// All counter keys share the `visit:` namespace so they can coexist with
/// other data in a shared store. The transform is deterministic: one page id
/// always maps to the same key.
pub struct VisitKey;

impl VisitKey {
    /// Counter key for a page's visit count
    pub fn visit(page_id: &str) -> String {
        format!("visit:{}", page_id)
    }
}
