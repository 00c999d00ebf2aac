//! Well-known account addresses.
//!
//! Account slots whose names appear in this table resolve to a constant
//! address by default; the caller can extend or override the table through
//! `RenderOptions` and can still override any entry per call.

use once_cell::sync::Lazy;
use solana_pubkey::Pubkey;
use std::collections::HashMap;

/// SPL Token program.
pub const TOKEN_PROGRAM_ID: Pubkey =
    Pubkey::from_str_const("TokenkegQfeZyiNwAJbNbGKPFXCWuBvf9Ss623VQ5DA");

/// SPL Associated Token Account program.
pub const ASSOCIATED_TOKEN_PROGRAM_ID: Pubkey =
    Pubkey::from_str_const("ATokenGPvbdGVxr1b2hvZbsiqW5xWH25efTNsLJA8knL");

/// Default mapping from conventional account-slot names to constant
/// addresses. Keys are the camelCase names Anchor schemas use.
pub static KNOWN_ADDRESSES: Lazy<HashMap<&'static str, Pubkey>> = Lazy::new(|| {
    let mut addresses = HashMap::new();

    addresses.insert("systemProgram", solana_sdk_ids::system_program::ID);
    addresses.insert("tokenProgram", TOKEN_PROGRAM_ID);
    addresses.insert("associatedTokenProgram", ASSOCIATED_TOKEN_PROGRAM_ID);
    addresses.insert("rent", solana_sdk_ids::sysvar::rent::ID);
    addresses.insert("clock", solana_sdk_ids::sysvar::clock::ID);
    addresses.insert("instructionsSysvar", solana_sdk_ids::sysvar::instructions::ID);

    addresses
});

/// Owned copy of [`KNOWN_ADDRESSES`], keyed by `String` so callers can
/// extend it with program-specific entries.
pub fn default_known_addresses() -> HashMap<String, Pubkey> {
    KNOWN_ADDRESSES
        .iter()
        .map(|(name, address)| (name.to_string(), *address))
        .collect()
}
