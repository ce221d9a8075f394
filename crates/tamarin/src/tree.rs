//! Generic tree representation of a decoded document
//!
//! Every mapping entry becomes a named node. A sequence whose elements are mappings becomes a
//! node flagged [Tree::is_slice_of_map] with one child per element, named by its position.
//! Every other value (scalars, sequences of scalars) is stored unexpanded in a leaf.
use crate::value::Value;

/// Key of a node inside its parent
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Name {
    /// mapping key
    Key(String),
    /// zero-based sequence position
    Index(usize),
}

impl From<&str> for Name {
    fn from(value: &str) -> Self {
        Name::Key(value.to_string())
    }
}

impl From<String> for Name {
    fn from(value: String) -> Self {
        Name::Key(value)
    }
}

impl From<usize> for Name {
    fn from(value: usize) -> Self {
        Name::Index(value)
    }
}

impl std::fmt::Display for Name {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Name::Key(key) => f.write_str(key),
            Name::Index(index) => write!(f, "[{index}]"),
        }
    }
}

/// One position in a document
///
/// Cloning performs a deep copy; a tree exclusively owns all of its children.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Tree {
    /// `None` only for the document root
    pub name: Option<Name>,
    /// Payload of a leaf. Ignored on nodes with children.
    pub value: Value,
    pub is_slice_of_map: bool,
    pub children: indexmap::IndexMap<Name, Tree>,
}

impl Tree {
    /// An empty root
    pub fn new() -> Self {
        Self::default()
    }

    /// A named leaf carrying `value`
    pub fn leaf(name: impl Into<Name>, value: impl Into<Value>) -> Self {
        Self {
            name: Some(name.into()),
            value: value.into(),
            ..Default::default()
        }
    }

    /// A named node without children
    pub fn branch(name: impl Into<Name>) -> Self {
        Self {
            name: Some(name.into()),
            ..Default::default()
        }
    }

    /// Inserts `child` under `name`
    ///
    /// An existing child with the same name is replaced, not merged, and returned.
    pub fn append(&mut self, name: impl Into<Name>, mut child: Tree) -> Option<Tree> {
        let name = name.into();
        child.name = Some(name.clone());
        self.children.insert(name, child)
    }

    pub fn get(&self, name: &Name) -> Option<&Tree> {
        self.children.get(name)
    }

    pub fn get_mut(&mut self, name: &Name) -> Option<&mut Tree> {
        self.children.get_mut(name)
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    pub fn is_root(&self) -> bool {
        self.name.is_none()
    }

    /// Human readable rendering of the tree structure
    ///
    /// Meant for debugging only, the format may change at any time.
    pub fn dump(&self) -> String {
        let mut lines = vec![];
        if self.is_root() && self.is_leaf() {
            if !self.value.is_null() {
                lines.push(render_value(&self.value));
            }
        } else if self.is_root() {
            for child in self.children.values() {
                child.dump_into(0, &mut lines);
            }
        } else {
            self.dump_into(0, &mut lines);
        }
        lines.join("\n")
    }

    fn dump_into(&self, depth: usize, lines: &mut Vec<String>) {
        let mut line = "  ".repeat(depth);
        if let Some(name) = &self.name {
            line.push_str(&name.to_string());
        }

        if self.is_leaf() {
            line.push_str(&format!(" = {}", render_value(&self.value)));
            lines.push(line);
            return;
        }

        lines.push(line);
        for child in self.children.values() {
            child.dump_into(depth + 1, lines);
        }
    }
}

fn render_value(value: &Value) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| format!("{value:?}"))
}

impl std::fmt::Display for Tree {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.dump())
    }
}
