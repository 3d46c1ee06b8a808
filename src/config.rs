//! Component configuration for the CLI.
//!
//! Properties come from a component manifest in the usual Dapr layout
//! (`spec.metadata: [{name, value}]`) and from repeated `--property k=v`
//! flags, which win over manifest entries with the same name.

use anyhow::Context;
use bindings::Metadata;
use clap::Args;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Component name used when no manifest provides one.
pub const DEFAULT_COMPONENT_NAME: &str = "kafka-binding";
/// Manifest `spec.type` this binding expects.
pub const COMPONENT_TYPE: &str = "bindings.kafka";

#[derive(Args, Clone, Debug, Default)]
pub struct ComponentOpts {
    /// Component manifest (YAML) holding the binding properties
    #[arg(long, value_name = "PATH", env = "KAFKA_BINDING_COMPONENT")]
    pub component: Option<PathBuf>,

    /// Binding property, overrides the manifest (format: name=value)
    #[arg(long = "property", value_name = "NAME=VALUE", value_parser = parse_key_val)]
    pub properties: Vec<(String, String)>,
}

impl ComponentOpts {
    /// Merge the manifest and the command-line overrides into binding metadata.
    pub fn load_metadata(&self) -> anyhow::Result<Metadata> {
        let mut metadata = match &self.component {
            Some(path) => Component::from_file(path)
                .with_context(|| format!("Failed to load component from {path:?}"))?
                .into_metadata()?,
            None => Metadata::new(DEFAULT_COMPONENT_NAME),
        };

        for (name, value) in &self.properties {
            metadata.properties.insert(name.clone(), value.clone());
        }

        debug!(
            name = %metadata.name,
            properties = ?sorted_names(&metadata),
            "Loaded component metadata"
        );
        Ok(metadata)
    }
}

/// Parse a `name=value` pair. The value may itself contain `=`.
pub fn parse_key_val(s: &str) -> Result<(String, String), String> {
    let (name, value) = s
        .split_once('=')
        .ok_or_else(|| format!("invalid name=value pair: no `=` found in `{s}`"))?;
    if name.is_empty() {
        return Err(format!("invalid name=value pair: empty name in `{s}`"));
    }
    Ok((name.to_string(), value.to_string()))
}

/// A component manifest.
#[derive(Debug, Deserialize)]
pub struct Component {
    #[serde(default)]
    metadata: ComponentName,
    spec: ComponentSpec,
}

#[derive(Debug, Default, Deserialize)]
struct ComponentName {
    #[serde(default)]
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ComponentSpec {
    #[serde(rename = "type", default)]
    component_type: Option<String>,
    #[serde(default)]
    version: Option<String>,
    #[serde(default)]
    metadata: Vec<ComponentProperty>,
}

#[derive(Debug, Deserialize)]
struct ComponentProperty {
    name: String,
    #[serde(default)]
    value: Option<serde_yaml::Value>,
}

impl Component {
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(yaml: &str) -> anyhow::Result<Self> {
        serde_yaml::from_str(yaml).context("Invalid component manifest")
    }

    /// Flatten the manifest into binding metadata. Scalar values are
    /// stringified; a missing or null value becomes an empty string.
    pub fn into_metadata(self) -> anyhow::Result<Metadata> {
        match self.spec.component_type.as_deref() {
            Some(COMPONENT_TYPE) | None => {}
            Some(other) => warn!(
                component_type = other,
                expected = COMPONENT_TYPE,
                "Component manifest is not a Kafka binding"
            ),
        }
        if let Some(version) = &self.spec.version {
            debug!(version = %version, "Component manifest version");
        }

        let mut metadata = Metadata::new(
            self.metadata
                .name
                .unwrap_or_else(|| DEFAULT_COMPONENT_NAME.to_string()),
        );
        for property in self.spec.metadata {
            let value = scalar_to_string(&property.name, property.value)?;
            metadata.properties.insert(property.name, value);
        }
        Ok(metadata)
    }
}

fn scalar_to_string(name: &str, value: Option<serde_yaml::Value>) -> anyhow::Result<String> {
    use serde_yaml::Value;

    match value {
        None | Some(Value::Null) => Ok(String::new()),
        Some(Value::String(s)) => Ok(s),
        Some(Value::Bool(b)) => Ok(b.to_string()),
        Some(Value::Number(n)) => Ok(n.to_string()),
        Some(_) => anyhow::bail!("Component property {name} must be a scalar value"),
    }
}

fn sorted_names(metadata: &Metadata) -> Vec<&str> {
    let mut names: Vec<&str> = metadata.properties.keys().map(String::as_str).collect();
    names.sort_unstable();
    names
}
