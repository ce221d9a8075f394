//! configuration files found below a base directory
//!
//! Files are grouped by file name. The same file name usually appears at several depths:
//! ```text
//! app/deployment.yml              <- base
//! app/production/deployment.yml   <- override
//! app/production/eu/deployment.yml
//! ```
//! The shallowest file is the base, every deeper one overrides what came before. [Documents::cascade]
//! loads and merges them in that order.
use crate::convert::ConvertError;
use crate::merge::merge_all;
use crate::tree::Tree;
use crate::value::Value;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

#[derive(Default, Debug)]
pub struct Documents {
    /// file name -> directories containing it, shortest path first, then by path
    files: indexmap::IndexMap<String, Vec<PathBuf>>,
}

impl Documents {
    /// Records `path` as a candidate for its file name
    pub fn insert(&mut self, path: &Path) {
        let (Some(dir), Some(file_name)) = (path.parent(), path.file_name()) else {
            return;
        };

        let directories = self
            .files
            .entry(file_name.to_string_lossy().into_owned())
            .or_default();
        directories.push(dir.to_path_buf());
        directories.sort_by(|a, b| {
            a.as_os_str()
                .len()
                .cmp(&b.as_os_str().len())
                .then_with(|| a.cmp(b))
        });
    }

    /// All known file names
    pub fn file_names(&self) -> impl Iterator<Item = &str> {
        self.files.keys().map(String::as_str)
    }

    /// Paths of `file_name`, base first
    pub fn candidates(&self, file_name: &str) -> Vec<PathBuf> {
        self.files
            .get(file_name)
            .map(|dirs| dirs.iter().map(|dir| dir.join(file_name)).collect())
            .unwrap_or_default()
    }

    pub fn file_count(&self) -> usize {
        self.files.values().map(Vec::len).sum()
    }

    /// Loads and merges every candidate of `file_name`
    pub fn cascade(&self, file_name: &str) -> Result<Tree, LoadError> {
        let mut trees = self
            .candidates(file_name)
            .into_iter()
            .map(|path| load_tree(&path));

        let Some(base) = trees.next() else {
            return Err(LoadError::FileNotFound(file_name.to_string()));
        };

        let base = base?;
        let overrides = trees.collect::<Result<Vec<_>, _>>()?;
        tracing::debug!(file_name, overrides = overrides.len(), "merging");
        Ok(merge_all(base, overrides))
    }
}

impl Documents {
    pub fn load_directory(&mut self, dir_path: &Path) -> Result<(), LoadError> {
        let before = self.file_count();
        self.walk(dir_path)?;

        if self.file_count() == before {
            return Err(LoadError::NoFilesFound);
        }

        Ok(())
    }

    fn walk(&mut self, dir_path: &Path) -> Result<(), LoadError> {
        for entry in WalkDir::new(dir_path).follow_links(false).sort_by_file_name() {
            let entry = entry?;
            if !entry.file_type().is_file() || !is_yaml_file(entry.path()) {
                continue;
            }

            tracing::trace!(path=%entry.path().display(), "found file");
            self.insert(entry.path());
        }

        Ok(())
    }
}

fn is_yaml_file(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|ext| ext.to_str()),
        Some("yml" | "yaml")
    )
}

/// Reads and decodes a YAML file
pub fn load_yaml(file_path: &Path) -> Result<Value, LoadError> {
    tracing::info!(path=%file_path.display(), "loading file");

    let file_contents = std::fs::read_to_string(file_path)?;
    parse_yaml(&file_contents)
}

/// Decodes a YAML document
pub fn parse_yaml(contents: &str) -> Result<Value, LoadError> {
    let yaml: serde_yaml::Value = serde_yaml::from_str(contents)?;
    Ok(Value::try_from(yaml)?)
}

fn load_tree(file_path: &Path) -> Result<Tree, LoadError> {
    Ok(Tree::from_value(load_yaml(file_path)?)?)
}

#[derive(thiserror::Error, Debug)]
pub enum LoadError {
    #[error("No files found in directory")]
    NoFilesFound,
    #[error("No file named {0} found")]
    FileNotFound(String),
    #[error("IO error")]
    IoError(#[from] std::io::Error),
    #[error("Unable to walk directory")]
    WalkError(#[from] walkdir::Error),
    #[error("Unable to parse yaml file")]
    YamlParseFailed(#[from] serde_yaml::Error),
    #[error("Unsupported document")]
    Convert(#[from] ConvertError),
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn candidates_are_ordered_by_depth() {
        let mut documents = Documents::default();
        documents.insert(Path::new("/app/production/eu/deployment.yml"));
        documents.insert(Path::new("/app/deployment.yml"));
        documents.insert(Path::new("/app/production/deployment.yml"));
        documents.insert(Path::new("/app/service.yml"));

        assert_eq!(
            documents.candidates("deployment.yml"),
            vec![
                PathBuf::from("/app/deployment.yml"),
                PathBuf::from("/app/production/deployment.yml"),
                PathBuf::from("/app/production/eu/deployment.yml"),
            ]
        );
        assert_eq!(
            documents.file_names().collect::<Vec<_>>(),
            vec!["deployment.yml", "service.yml"]
        );
        assert_eq!(documents.file_count(), 4);
        assert!(documents.candidates("missing.yml").is_empty());
    }

    #[test]
    fn candidates_of_equal_depth_are_ordered_by_path() {
        let mut documents = Documents::default();
        documents.insert(Path::new("/app/test/x.yml"));
        documents.insert(Path::new("/app/prod/x.yml"));
        documents.insert(Path::new("/app/x.yml"));

        assert_eq!(
            documents.candidates("x.yml"),
            vec![
                PathBuf::from("/app/x.yml"),
                PathBuf::from("/app/prod/x.yml"),
                PathBuf::from("/app/test/x.yml"),
            ]
        );
    }

    #[test]
    fn base_error_is_reported_first() {
        let dir = std::env::temp_dir().join(format!("tamarin-base-error-{}", std::process::id()));
        std::fs::create_dir_all(dir.join("prod")).unwrap();
        std::fs::write(dir.join("x.yml"), "a: [unclosed").unwrap();
        std::fs::write(dir.join("prod/x.yml"), "[a, b]: value\n").unwrap();

        let mut documents = Documents::default();
        documents.load_directory(&dir).unwrap();
        let result = documents.cascade("x.yml");
        std::fs::remove_dir_all(&dir).unwrap();

        assert!(matches!(result, Err(LoadError::YamlParseFailed(_))));
    }

    #[test]
    fn cascade_unknown_file() {
        let documents = Documents::default();
        assert!(matches!(
            documents.cascade("deployment.yml"),
            Err(LoadError::FileNotFound(_))
        ));
    }

    #[test]
    fn parse_yaml_documents() {
        assert_eq!(parse_yaml("").unwrap(), Value::Null);
        assert_eq!(
            parse_yaml("a:\n  b: 1\n").unwrap(),
            Value::from(serde_json::json!({"a": {"b": 1}}))
        );
        assert!(matches!(
            parse_yaml("a: [unclosed"),
            Err(LoadError::YamlParseFailed(_))
        ));
    }
}
