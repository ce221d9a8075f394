//! Variables available to placeholders of one document
use crate::convert::ConvertError;
use crate::value::Value;

#[derive(derive_new::new, Debug, Clone, Default, PartialEq)]
pub struct Context {
    #[new(default)]
    vars: indexmap::IndexMap<String, Value>,
}

impl Context {
    /// Binds `key`, replacing any previous binding
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.vars.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.vars.get(key)
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.vars.iter()
    }

    /// Parses a `name=value` binding
    ///
    /// The value is read as a YAML scalar, so `count=5` binds an integer and `name=web` a string.
    /// An empty value binds an empty string.
    pub fn parse_assignment(assignment: &str) -> Result<(String, Value), ContextError> {
        let Some((key, raw)) = assignment.split_once('=') else {
            return Err(ContextError::MissingEquals(assignment.to_string()));
        };

        let key = key.trim();
        if key.is_empty() {
            return Err(ContextError::MissingEquals(assignment.to_string()));
        }

        if raw.is_empty() {
            return Ok((key.to_string(), Value::from("")));
        }

        let yaml: serde_yaml::Value = serde_yaml::from_str(raw)?;
        Ok((key.to_string(), Value::try_from(yaml)?))
    }

    /// Variables for rendering `file_name`
    ///
    /// Later sources win: the built-in `filename`, then the entries of `vars_file`, then each
    /// `name=value` assignment in order.
    pub fn for_file<S: AsRef<str>>(
        file_name: &str,
        vars_file: Option<Value>,
        assignments: &[S],
    ) -> Result<Self, ContextError> {
        let mut context = Self::new();
        context.insert("filename", file_name);

        if let Some(vars_file) = vars_file {
            context.extend(Self::from_value(vars_file)?.vars);
        }

        for assignment in assignments {
            let (key, value) = Self::parse_assignment(assignment.as_ref())?;
            context.insert(key, value);
        }

        Ok(context)
    }

    /// Builds a context from the top-level mapping of a variables document
    pub fn from_value(value: Value) -> Result<Self, ContextError> {
        match value {
            Value::Object(vars) => Ok(Self { vars }),
            Value::Null => Ok(Self::default()),
            _ => Err(ContextError::NotAMapping),
        }
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Context {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            vars: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl<K: Into<String>, V: Into<Value>> Extend<(K, V)> for Context {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        self.vars
            .extend(iter.into_iter().map(|(k, v)| (k.into(), v.into())));
    }
}

#[derive(thiserror::Error, Debug)]
pub enum ContextError {
    #[error("expected `name=value`, got `{0}`")]
    MissingEquals(String),
    #[error("variables must be a mapping")]
    NotAMapping,
    #[error("unable to parse variable value")]
    Value(#[from] serde_yaml::Error),
    #[error("unsupported variable value")]
    Convert(#[from] ConvertError),
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn assignment_keeps_scalar_type() {
        assert_eq!(
            Context::parse_assignment("count=5").unwrap(),
            ("count".to_string(), Value::Integer(5))
        );
        assert_eq!(
            Context::parse_assignment("name=web-1").unwrap(),
            ("name".to_string(), Value::from("web-1"))
        );
        assert_eq!(
            Context::parse_assignment("url=http://host?a=b").unwrap(),
            ("url".to_string(), Value::from("http://host?a=b"))
        );
        assert_eq!(
            Context::parse_assignment("empty=").unwrap(),
            ("empty".to_string(), Value::from(""))
        );
    }

    #[test]
    fn assignment_without_equals() {
        assert!(matches!(
            Context::parse_assignment("count"),
            Err(ContextError::MissingEquals(_))
        ));
        assert!(matches!(
            Context::parse_assignment("=5"),
            Err(ContextError::MissingEquals(_))
        ));
    }

    #[test]
    fn later_bindings_win() {
        let mut context: Context = [("name", "a")].into_iter().collect();
        context.extend([("name", "b")]);
        assert_eq!(context.len(), 1);
        assert_eq!(context.get("name"), Some(&Value::from("b")));
    }

    #[test]
    fn for_file_binds_filename() {
        let context = Context::for_file::<&str>("deployment.yml", None, &[]).unwrap();
        assert_eq!(context.get("filename"), Some(&Value::from("deployment.yml")));
        assert_eq!(context.len(), 1);
    }

    #[test]
    fn for_file_precedence() {
        let vars_file = Value::from(serde_json::json!({
            "filename": "from-file",
            "tag": "v1",
            "replicas": 2
        }));
        let context = Context::for_file(
            "deployment.yml",
            Some(vars_file),
            &["tag=v2", "region=eu"],
        )
        .unwrap();

        assert_eq!(context.get("filename"), Some(&Value::from("from-file")));
        assert_eq!(context.get("tag"), Some(&Value::from("v2")));
        assert_eq!(context.get("replicas"), Some(&Value::Integer(2)));
        assert_eq!(context.get("region"), Some(&Value::from("eu")));

        let context =
            Context::for_file("deployment.yml", None, &["filename=override"]).unwrap();
        assert_eq!(context.get("filename"), Some(&Value::from("override")));
    }

    #[test]
    fn for_file_rejects_bad_input() {
        assert!(matches!(
            Context::for_file::<&str>("x.yml", Some(Value::Integer(1)), &[]),
            Err(ContextError::NotAMapping)
        ));
        assert!(matches!(
            Context::for_file("x.yml", None, &["novalue"]),
            Err(ContextError::MissingEquals(_))
        ));
    }

    #[test]
    fn from_value_requires_mapping() {
        let value: Value = Value::from(serde_json::json!({"env": "prod", "replicas": 2}));
        let context = Context::from_value(value).unwrap();
        assert_eq!(context.get("replicas"), Some(&Value::Integer(2)));

        assert!(matches!(
            Context::from_value(Value::from("nope")),
            Err(ContextError::NotAMapping)
        ));
    }
}
