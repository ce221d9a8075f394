//! Deep merge of two trees
//!
//! Leaves of the source always win. Branches present on both sides are merged key by key;
//! sequences of mappings are merged by position, so element `[1]` of the override is combined
//! with element `[1]` of the base regardless of their content.
use crate::tree::Tree;

impl Tree {
    /// Merges `source` into `self`
    ///
    /// A source document that is a scalar (a leaf root with a value) replaces `self` entirely.
    /// An empty source document leaves `self` untouched.
    #[tracing::instrument(level = "trace", skip_all, fields(name = ?self.name))]
    pub fn merge(&mut self, source: Tree) {
        if source.is_leaf() {
            if source.is_root() && source.value.is_null() {
                tracing::trace!("empty document, nothing to merge");
                return;
            }

            let name = self.name.take();
            *self = source;
            self.name = name;
            return;
        }

        for (name, node) in source.children {
            if node.is_leaf() {
                self.append(name, node);
                continue;
            }

            match self.children.get_mut(&name) {
                Some(existing)
                    if !existing.is_leaf() && existing.is_slice_of_map != node.is_slice_of_map =>
                {
                    tracing::debug!(%name, "branch changes shape, replacing it");
                }
                Some(existing) => {
                    existing.is_slice_of_map = node.is_slice_of_map;
                    existing.merge(node);
                    continue;
                }
                None => {}
            }

            self.append(name, node);
        }
    }
}

/// Merges every override into `base`, in order
pub fn merge_all(mut base: Tree, overrides: impl IntoIterator<Item = Tree>) -> Tree {
    for source in overrides {
        base.merge(source);
    }
    base
}
