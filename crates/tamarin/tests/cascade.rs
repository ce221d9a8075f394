//! Cascade tests
//!
//! Loads the fixture directory `tests/fixtures/app`, merges each file name and resolves
//! placeholders.
use pretty_assertions::assert_eq;
use serde_json::json;
use std::path::PathBuf;
use tamarin::context::Context;
use tamarin::documents::{Documents, LoadError};
use tamarin::replace::Replacer;
use tamarin::value::Value;

fn fixtures() -> Documents {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_env("TAMARIN_LOG"))
        .with_writer(std::io::stderr)
        .try_init();

    let mut documents = Documents::default();
    documents
        .load_directory(&PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/app"))
        .expect("fixtures must load");
    documents
}

#[test]
fn only_yaml_files_are_indexed() {
    let documents = fixtures();

    let mut file_names = documents.file_names().collect::<Vec<_>>();
    file_names.sort();
    assert_eq!(file_names, vec!["deployment.yml", "service.yml"]);
    assert_eq!(documents.file_count(), 5);
}

#[test]
fn deployment_cascade() {
    let documents = fixtures();
    let mut tree = documents.cascade("deployment.yml").unwrap();

    let context: Context = [
        ("filename", Value::from("deployment.yml")),
        ("tag", Value::from("v2")),
        ("replicas", Value::Integer(3)),
    ]
    .into_iter()
    .collect();
    let rewritten = Replacer::default().replace(&mut tree, &context);
    assert_eq!(rewritten, 3);

    let expected = Value::from(json!({
        "apiVersion": "apps/v1",
        "kind": "Deployment",
        "metadata": {
            "name": "deployment.yml",
            "labels": {"app": "web", "env": "production", "region": "eu"}
        },
        "spec": {
            "replicas": 3,
            "template": {
                "spec": {
                    "containers": [
                        {"name": "app", "image": "registry/app:v2-prod", "ports": [80]},
                        {"name": "sidecar", "image": "proxy:1"}
                    ]
                }
            }
        }
    }));
    assert_eq!(tree.to_value().unwrap(), expected);
}

#[test]
fn empty_override_keeps_base() {
    let documents = fixtures();
    let tree = documents.cascade("service.yml").unwrap();

    assert_eq!(
        tree.to_value().unwrap(),
        Value::from(json!({
            "kind": "Service",
            "spec": {"ports": [{"port": 80, "targetPort": 8080}]}
        }))
    );
}

#[test]
fn unresolved_placeholders_become_null() {
    let documents = fixtures();
    let mut tree = documents.cascade("deployment.yml").unwrap();
    Replacer::default().replace(&mut tree, &Context::new());

    let value = serde_json::to_value(tree.to_value().unwrap()).unwrap();
    assert_eq!(value["metadata"]["name"], serde_json::Value::Null);
    assert_eq!(value["spec"]["replicas"], serde_json::Value::Null);
    assert_eq!(
        value["spec"]["template"]["spec"]["containers"][1]["image"],
        json!("proxy:1")
    );
}

#[test]
fn missing_directory() {
    let mut documents = Documents::default();
    let missing = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/missing");
    let result = documents.load_directory(&missing);
    assert!(matches!(result, Err(LoadError::WalkError(_))));
}
