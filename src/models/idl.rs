//! IDL schema model

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::models::account::{AccountDef, EventDef};
use crate::models::instruction::InstructionDef;
use crate::models::types::TypeDef;

/// Root of a program's interface description.
///
/// This is the read-only input boundary: loading and validating the schema
/// file is the caller's concern; [`Idl::from_json`] is a convenience for
/// the common JSON shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Idl {
    /// Program name
    pub name: String,
    /// Program version
    #[serde(default)]
    pub version: String,
    /// Program address (base58), when the schema carries one
    #[serde(default)]
    pub address: Option<String>,
    /// Program instructions
    #[serde(default)]
    pub instructions: Vec<InstructionDef>,
    /// Program accounts
    #[serde(default)]
    pub accounts: Vec<AccountDef>,
    /// Program events
    #[serde(default)]
    pub events: Vec<EventDef>,
    /// User-defined types
    #[serde(default)]
    pub types: Vec<TypeDef>,
}

impl Idl {
    /// Create an empty IDL
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            version: "0.1.0".to_string(),
            address: None,
            instructions: Vec::new(),
            accounts: Vec::new(),
            events: Vec::new(),
            types: Vec::new(),
        }
    }

    /// Parse an IDL from its JSON representation
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("failed to parse IDL JSON")
    }

    /// Add a user-defined type to the IDL
    pub fn add_type(&mut self, def: TypeDef) {
        if !self.types.iter().any(|t| t.name == def.name) {
            self.types.push(def);
        }
    }

    /// Add an account to the IDL
    pub fn add_account(&mut self, account: AccountDef) {
        if !self.accounts.iter().any(|a| a.name == account.name) {
            self.accounts.push(account);
        }
    }

    /// Add an event to the IDL
    pub fn add_event(&mut self, event: EventDef) {
        if !self.events.iter().any(|e| e.name == event.name) {
            self.events.push(event);
        }
    }

    /// Add an instruction to the IDL
    pub fn add_instruction(&mut self, instruction: InstructionDef) {
        if !self.instructions.iter().any(|i| i.name == instruction.name) {
            self.instructions.push(instruction);
        }
    }

    /// Look up a user-defined type by name
    pub fn type_by_name(&self, name: &str) -> Option<&TypeDef> {
        self.types.iter().find(|t| t.name == name)
    }
}
