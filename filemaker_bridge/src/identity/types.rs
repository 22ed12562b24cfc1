use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Normalized identity handed to the embedding session layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityRecord {
    pub id: String,
    pub name: String,
    pub group: Option<String>,
}

/// Claims carried by the credential the FileMaker authentication script signs.
#[derive(Debug, Deserialize)]
pub(super) struct FileMakerClaims {
    #[serde(default)]
    pub(super) id: Option<Value>,
    #[serde(default)]
    pub(super) sub: Option<String>,
    pub(super) user: String,
    #[serde(rename = "privilegeSet", default)]
    pub(super) privilege_set: Option<String>,
}

impl From<FileMakerClaims> for IdentityRecord {
    fn from(claims: FileMakerClaims) -> Self {
        let id = match claims.id {
            Some(Value::String(s)) if !s.is_empty() => s,
            Some(Value::Number(n)) => n.to_string(),
            _ => claims
                .sub
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| claims.user.clone()),
        };
        Self {
            id,
            name: claims.user,
            group: claims.privilege_set,
        }
    }
}
