//! Discriminator derivation constants.

/// Length in bytes of an implicitly derived discriminator.
pub const DISCRIMINATOR_LENGTH: usize = 8;

/// Digest namespace for account types.
pub const ACCOUNT_NAMESPACE: &str = "account";

/// Digest namespace for instructions. Anchor hashes instruction names
/// under `global`, not `instruction`.
pub const INSTRUCTION_NAMESPACE: &str = "global";

/// Digest namespace for events.
pub const EVENT_NAMESPACE: &str = "event";
