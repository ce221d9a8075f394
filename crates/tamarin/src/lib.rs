//! # tamarin - cascading deployment configuration
//!
//! ## Introduction for developers
//!
//! Read this to understand how `tamarin` works internally.
//!
//! ### Loading files
//!
//! A base directory is walked and every `.yml`/`.yaml` file is recorded by its file name
//! ([documents::Documents]). The same file name found at several depths forms a cascade: the
//! shallowest file is the base, deeper files override it.
//!
//! ```text
//! app/deployment.yml               replicas: 1, image: "app:{{ tag }}"
//! app/production/deployment.yml    replicas: 3
//! ```
//!
//! Parsing YAML is left to [serde_yaml]. The decoded document is turned into a [value::Value] so
//! the rest of the crate never inspects dynamically typed data.
//!
//! ### The tree
//!
//! A [value::Value] is converted into a [tree::Tree] ([tree::Tree::from_value]):
//!
//! | **document**                  | **tree**                                                  |
//! |-------------------------------|-----------------------------------------------------------|
//! | mapping                       | node with one child per key                               |
//! | sequence starting with a map  | node flagged `is_slice_of_map`, children named `[0]`, `[1]` |
//! | any other sequence            | leaf, the whole sequence is its value                     |
//! | scalar                        | leaf                                                      |
//!
//! ### Merging
//!
//! see [tree::Tree::merge]
//!
//! Overrides are merged into the base one after another. Leaves of the override always win,
//! branches are combined key by key and sequences of mappings position by position.
//!
//! ### Placeholders
//!
//! see [replace::Replacer]
//!
//! After merging, string leaves may contain a `{{ name }}` placeholder which is resolved against a
//! [context::Context]. A string binding is spliced into the text, any other binding replaces the
//! leaf value entirely.
//!
//! ### Output
//!
//! The tree is converted back into a [value::Value] ([tree::Tree::to_value]) which in turn gets
//! serialized via [serde].
//!
pub mod context;
pub mod convert;
pub mod documents;
pub mod merge;
pub mod replace;
pub mod tree;
pub mod value;
