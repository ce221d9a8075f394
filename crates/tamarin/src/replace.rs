//! Placeholder substitution
//!
//! A placeholder is `{{ name }}` (whitespace optional, lowercase letters only) anywhere inside a
//! string leaf. Only the first placeholder of a string is resolved. Whitespace means ASCII
//! whitespace; a non-breaking space does not open a placeholder.
//!
//! | binding        | `"port-{{ x }}"` becomes                  |
//! |----------------|-------------------------------------------|
//! | `x = "http"`   | `"port-http"` (spliced into the string)   |
//! | `x = 8080`     | `8080` (the whole leaf takes the value)   |
//! | unbound        | `null`                                    |
use crate::context::Context;
use crate::tree::Tree;
use crate::value::Value;
use regex::Regex;

pub const DEFAULT_PATTERN: &str = r"\{\{[ \t\n\f\r]*([a-z]+)[ \t\n\f\r]*\}\}";

#[derive(Debug, Clone)]
pub struct Replacer {
    pattern: Regex,
}

impl Default for Replacer {
    fn default() -> Self {
        Self {
            pattern: Regex::new(DEFAULT_PATTERN)
                .expect("default placeholder pattern must compile"),
        }
    }
}

impl Replacer {
    /// Uses a custom placeholder pattern
    ///
    /// The first capture group must match the variable name.
    pub fn with_pattern(pattern: &str) -> Result<Self, ReplaceError> {
        let pattern = Regex::new(pattern)?;
        if pattern.captures_len() < 2 {
            return Err(ReplaceError::MissingCapture(pattern.to_string()));
        }
        Ok(Self { pattern })
    }

    /// Resolves placeholders in every leaf of `tree`
    ///
    /// Returns how many leaves were rewritten.
    pub fn replace(&self, tree: &mut Tree, context: &Context) -> usize {
        if tree.is_leaf() {
            let Some(value) = self.substitute(&tree.value, context) else {
                return 0;
            };
            tree.value = value;
            return 1;
        }

        tree.children
            .values_mut()
            .map(|child| self.replace(child, context))
            .sum()
    }

    /// Resolves the first placeholder in `value`
    ///
    /// Returns `None` when `value` is not a string or contains no placeholder.
    pub fn substitute(&self, value: &Value, context: &Context) -> Option<Value> {
        let text = value.as_str()?;
        let captures = self.pattern.captures(text)?;
        let matched = captures.get(0)?;
        let key = captures.get(1)?.as_str();

        tracing::trace!(placeholder = matched.as_str(), key, "placeholder found");

        Some(match context.get(key) {
            Some(Value::String(replacement)) => {
                let mut spliced = String::with_capacity(text.len() + replacement.len());
                spliced.push_str(&text[..matched.start()]);
                spliced.push_str(replacement);
                spliced.push_str(&text[matched.end()..]);
                Value::String(spliced)
            }
            Some(other) => other.clone(),
            None => {
                tracing::debug!(key, "unresolved placeholder, using null");
                Value::Null
            }
        })
    }
}

#[derive(thiserror::Error, Debug)]
pub enum ReplaceError {
    #[error("invalid placeholder pattern")]
    Pattern(#[from] regex::Error),
    #[error("placeholder pattern `{0}` has no capture group for the variable name")]
    MissingCapture(String),
}
