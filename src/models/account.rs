//! Account and event entries of the schema.

use serde::{Deserialize, Serialize};

/// One program account declared by the schema. The byte layout comes from
/// the user-defined type it references.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountDef {
    /// Account name, schema-original casing.
    pub name: String,
    /// Name of the user-defined struct holding the account's fields.
    /// Defaults to the account's own name.
    #[serde(default, rename = "type")]
    pub ty: Option<String>,
    /// Explicit discriminator override; bypasses derivation when present.
    #[serde(default)]
    pub discriminator: Option<Vec<u8>>,
}

impl AccountDef {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ty: None,
            discriminator: None,
        }
    }

    /// The referenced type name.
    pub fn type_name(&self) -> &str {
        self.ty.as_deref().unwrap_or(&self.name)
    }
}

/// One program event. Same shape as an account entry; events carry a
/// discriminator and a struct layout but no size accessor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventDef {
    /// Event name, schema-original casing.
    pub name: String,
    /// Name of the user-defined struct holding the event's fields.
    /// Defaults to the event's own name.
    #[serde(default, rename = "type")]
    pub ty: Option<String>,
    /// Explicit discriminator override.
    #[serde(default)]
    pub discriminator: Option<Vec<u8>>,
}

impl EventDef {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ty: None,
            discriminator: None,
        }
    }

    pub fn type_name(&self) -> &str {
        self.ty.as_deref().unwrap_or(&self.name)
    }
}
