//! Instruction entries and account slots.

use serde::{Deserialize, Serialize};
use solana_pubkey::Pubkey;

use crate::models::types::IdlField;

/// Policy governing how optional account slots reach the final key list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OptionalAccountPolicy {
    /// Optional accounts at the tail of the list are omitted when absent;
    /// supplying a later optional while an earlier one is missing is a
    /// configuration error at resolution time.
    OmitTrailingOptionals,
    /// Every slot keeps its position; an absent optional resolves to the
    /// program's own address, forced readonly and non-signer.
    DefaultToProgramId,
}

/// One position in an instruction's account list. Order in the schema is
/// significant and preserved through planning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountSlot {
    /// Slot name, schema-original casing.
    pub name: String,
    #[serde(default)]
    pub is_mut: bool,
    #[serde(default)]
    pub is_signer: bool,
    #[serde(default)]
    pub is_optional: bool,
    /// Explicit constant-address binding (base58), taking precedence over
    /// the well-known-address table.
    #[serde(default)]
    pub address: Option<String>,
}

impl AccountSlot {
    pub fn new(name: &str, is_mut: bool, is_signer: bool) -> Self {
        Self {
            name: name.to_string(),
            is_mut,
            is_signer,
            is_optional: false,
            address: None,
        }
    }

    pub fn optional(name: &str, is_mut: bool, is_signer: bool) -> Self {
        Self {
            is_optional: true,
            ..Self::new(name, is_mut, is_signer)
        }
    }
}

/// One program instruction declared by the schema.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstructionDef {
    /// Instruction name, schema-original casing.
    pub name: String,
    /// Ordered account slots.
    #[serde(default)]
    pub accounts: Vec<AccountSlot>,
    /// Ordered argument fields.
    #[serde(default)]
    pub args: Vec<IdlField>,
    /// Explicit discriminator override.
    #[serde(default)]
    pub discriminator: Option<Vec<u8>>,
    /// Per-instruction policy override; falls back to the program-wide
    /// default from the render options.
    #[serde(default)]
    pub optional_policy: Option<OptionalAccountPolicy>,
}

impl InstructionDef {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            accounts: Vec::new(),
            args: Vec::new(),
            discriminator: None,
            optional_policy: None,
        }
    }

    pub fn add_account(&mut self, slot: AccountSlot) {
        self.accounts.push(slot);
    }

    pub fn add_arg(&mut self, field: IdlField) {
        self.args.push(field);
    }
}

/// One fully resolved entry of an instruction's key list, produced by
/// evaluating a key-list plan against caller-supplied accounts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedAccountMeta {
    /// Slot name, schema-original casing.
    pub name: String,
    pub pubkey: Pubkey,
    pub is_writable: bool,
    pub is_signer: bool,
}

impl ResolvedAccountMeta {
    /// Convert to the transaction-level account meta.
    pub fn to_account_meta(&self) -> solana_instruction::AccountMeta {
        if self.is_writable {
            solana_instruction::AccountMeta::new(self.pubkey, self.is_signer)
        } else {
            solana_instruction::AccountMeta::new_readonly(self.pubkey, self.is_signer)
        }
    }
}
