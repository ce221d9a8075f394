//! Conversion between [Value] and [Tree]
//!
//! [Tree::from_value] expands nested mappings and sequences of mappings into subtrees.
//! Whether a sequence holds mappings is decided by its first element only; a sequence that starts
//! with a mapping but continues with something else cannot be represented and is rejected.
//!
//! [Tree::to_value] is the inverse. Sequences of mappings are rebuilt in index order.
use crate::tree::{Name, Tree};
use crate::value::Value;

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ConvertError {
    #[error("invalid document shape at `{path}`: {reason}")]
    InvalidShape { path: String, reason: &'static str },
    #[error("unsupported mapping key {0}")]
    UnsupportedKey(String),
    #[error("mapping key `{0}` appears more than once")]
    DuplicateKey(String),
}

impl ConvertError {
    fn invalid_shape(path: &str, reason: &'static str) -> Self {
        ConvertError::InvalidShape {
            path: if path.is_empty() {
                "<root>".to_string()
            } else {
                path.to_string()
            },
            reason,
        }
    }
}

fn child_path(parent: &str, name: &Name) -> String {
    match name {
        Name::Index(_) => format!("{parent}{name}"),
        Name::Key(_) if parent.is_empty() => name.to_string(),
        Name::Key(_) => format!("{parent}.{name}"),
    }
}

fn is_slice_of_map(sequence: &[Value]) -> bool {
    sequence.first().is_some_and(Value::is_mapping)
}

impl Tree {
    /// Builds a tree from a decoded document
    ///
    /// - a mapping becomes the children of the root
    /// - `null` (e.g. an empty file) becomes an empty root
    /// - anything else is a scalar document: a root leaf carrying the value
    pub fn from_value(value: Value) -> Result<Tree, ConvertError> {
        match value {
            Value::Object(mapping) => from_mapping(mapping, ""),
            Value::Null => Ok(Tree::new()),
            scalar => Ok(Tree {
                value: scalar,
                ..Default::default()
            }),
        }
    }

    /// Builds the document represented by this tree
    pub fn to_value(&self) -> Result<Value, ConvertError> {
        if self.is_root() && self.is_leaf() {
            return Ok(match &self.value {
                Value::Null => Value::Object(Default::default()),
                scalar => scalar.clone(),
            });
        }

        to_mapping(self, "")
    }
}

fn from_mapping(
    mapping: indexmap::IndexMap<String, Value>,
    path: &str,
) -> Result<Tree, ConvertError> {
    let mut tree = Tree::new();
    for (key, value) in mapping {
        let name = Name::Key(key);
        let path = child_path(path, &name);

        let child = match value {
            Value::Object(nested) if !nested.is_empty() => from_mapping(nested, &path)?,
            Value::Array(sequence) if is_slice_of_map(&sequence) => {
                from_slice_of_map(sequence, &path)?
            }
            // scalars, sequences of scalars and empty mappings
            other => Tree {
                value: other,
                ..Default::default()
            },
        };

        tree.append(name, child);
    }
    Ok(tree)
}

fn from_slice_of_map(sequence: Vec<Value>, path: &str) -> Result<Tree, ConvertError> {
    let mut tree = Tree {
        is_slice_of_map: true,
        ..Default::default()
    };

    for (index, element) in sequence.into_iter().enumerate() {
        let name = Name::Index(index);
        let Value::Object(mapping) = element else {
            return Err(ConvertError::invalid_shape(
                &child_path(path, &name),
                "sequence starts with a mapping but this element is not a mapping",
            ));
        };

        let element_tree = from_mapping(mapping, &child_path(path, &name))?;
        tree.append(name, element_tree);
    }

    Ok(tree)
}

fn to_mapping(tree: &Tree, path: &str) -> Result<Value, ConvertError> {
    let mut mapping = indexmap::IndexMap::with_capacity(tree.children.len());

    for (name, child) in &tree.children {
        let path = child_path(path, name);
        let Name::Key(key) = name else {
            return Err(ConvertError::invalid_shape(
                &path,
                "sequence position found inside a mapping",
            ));
        };

        let value = if child.is_leaf() {
            child.value.clone()
        } else if child.is_slice_of_map {
            to_sequence(child, &path)?
        } else {
            to_mapping(child, &path)?
        };

        mapping.insert(key.clone(), value);
    }

    Ok(Value::Object(mapping))
}

fn to_sequence(tree: &Tree, path: &str) -> Result<Value, ConvertError> {
    let mut elements = Vec::with_capacity(tree.children.len());
    for (name, child) in &tree.children {
        let Name::Index(index) = name else {
            return Err(ConvertError::invalid_shape(
                &child_path(path, name),
                "mapping key found inside a sequence of mappings",
            ));
        };
        elements.push((*index, child));
    }

    // children are keyed, not ordered: restore sequence order explicitly
    elements.sort_by_key(|(index, _)| *index);

    elements
        .into_iter()
        .map(|(index, child)| to_mapping(child, &child_path(path, &Name::Index(index))))
        .collect::<Result<Vec<_>, _>>()
        .map(Value::Array)
}
