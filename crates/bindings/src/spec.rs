//! Binding spec metadata.
//!
//! Every binding ships a `spec.yaml` describing itself: which directions it
//! supports, which connection fields it understands (and how strongly, per
//! direction), and the shape of each operation's inputs and outputs. The
//! document is compiled into the binding and returned, re-encoded as JSON,
//! by the `metadata` operation.
//!
//! ```yaml
//! name: kafka
//! cert-status: stable
//! version: v1
//! binding-type: [input, output]
//! connection-metadata:
//!   - name: brokers
//!     description: Comma-separated list of Kafka brokers
//!     example: "localhost:9092"
//!     binding-support:
//!       input: required
//!       output: required
//! operations: []
//! input-binding-metadata:
//!   data: []
//! ```
//!
//! Unknown keys are rejected while parsing. Every key accepted on the way in
//! is emitted on the way out, so the JSON response never loses a field that
//! the source document declared.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Raw `spec.yaml` bytes, usually embedded with `include_bytes!`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpecYaml(pub &'static [u8]);

impl SpecYaml {
    pub fn parse(&self) -> Result<SpecMetadata> {
        SpecMetadata::from_yaml(self.0)
    }
}

/// The full metadata document of a binding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct SpecMetadata {
    pub name: String,
    pub cert_status: String,
    pub version: String,
    pub binding_type: Vec<BindingDirection>,
    pub connection_metadata: Vec<ConnectionField>,
    pub operations: Vec<OperationMetadata>,
    #[serde(default)]
    pub input_binding_metadata: InputBindingMetadata,
}

impl SpecMetadata {
    /// Parse a `spec.yaml` document.
    ///
    /// An empty document is reported separately from one that fails to parse.
    pub fn from_yaml(yaml: &[u8]) -> Result<Self> {
        if yaml.is_empty() {
            return Err(Error::EmptySpecMetadata);
        }
        serde_yaml::from_slice(yaml).map_err(Error::InvalidSpecMetadata)
    }

    /// Encode as the JSON body of a `metadata` response.
    pub fn to_json(&self) -> Result<Vec<u8>> {
        serde_json::to_vec(self).map_err(Error::EncodeSpecMetadata)
    }

    pub fn supports(&self, direction: BindingDirection) -> bool {
        self.binding_type.contains(&direction)
    }

    pub fn connection_field(&self, name: &str) -> Option<&ConnectionField> {
        self.connection_metadata.iter().find(|field| field.name == name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BindingDirection {
    Input,
    Output,
}

/// How strongly a binding direction depends on a connection field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SupportLevel {
    Unsupported,
    Optional,
    Required,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct ConnectionField {
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub example: String,
    pub binding_support: BindingSupport,
}

/// Per-direction support level of a connection field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BindingSupport {
    pub input: SupportLevel,
    pub output: SupportLevel,
}

impl BindingSupport {
    pub fn level(&self, direction: BindingDirection) -> SupportLevel {
        match direction {
            BindingDirection::Input => self.input,
            BindingDirection::Output => self.output,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OperationMetadata {
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub inputs: OperationInputs,
    #[serde(default)]
    pub outputs: OperationOutputs,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OperationInputs {
    #[serde(default)]
    pub data: Vec<OperationInputField>,
    #[serde(default)]
    pub metadata: Vec<OperationInputField>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OperationInputField {
    pub name: String,
    #[serde(default)]
    pub required: bool,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OperationOutputs {
    #[serde(default)]
    pub data: Vec<ResponseField>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ResponseField {
    pub name: String,
    pub description: String,
}

/// Metadata keys an input binding attaches to every event it delivers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InputBindingMetadata {
    #[serde(default)]
    pub data: Vec<ResponseField>,
}
