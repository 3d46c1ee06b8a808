use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Tag selecting which behavior an `invoke` call performs.
///
/// The well-known kinds have their own variants; anything else a host sends
/// is kept verbatim in [`OperationKind::Other`] so the binding can report it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum OperationKind {
    Create,
    Get,
    Delete,
    List,
    /// Describe the binding's own spec metadata
    Metadata,
    Other(String),
}

impl OperationKind {
    pub fn as_str(&self) -> &str {
        match self {
            OperationKind::Create => "create",
            OperationKind::Get => "get",
            OperationKind::Delete => "delete",
            OperationKind::List => "list",
            OperationKind::Metadata => "metadata",
            OperationKind::Other(other) => other,
        }
    }
}

impl From<&str> for OperationKind {
    fn from(s: &str) -> Self {
        match s {
            "create" => OperationKind::Create,
            "get" => OperationKind::Get,
            "delete" => OperationKind::Delete,
            "list" => OperationKind::List,
            "metadata" => OperationKind::Metadata,
            other => OperationKind::Other(other.to_string()),
        }
    }
}

impl From<String> for OperationKind {
    fn from(s: String) -> Self {
        OperationKind::from(s.as_str())
    }
}

impl From<OperationKind> for String {
    fn from(kind: OperationKind) -> Self {
        kind.as_str().to_string()
    }
}

impl FromStr for OperationKind {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(OperationKind::from(s))
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
