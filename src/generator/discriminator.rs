//! Discriminator derivation.
//!
//! Implicit discriminators are a pure function of the entity's kind and
//! schema-original name: the first 8 bytes of
//! `sha256("<namespace>:<Name>")`. No state, no configuration; the same
//! input yields the same bytes in every process.

use serde::Serialize;

use crate::constants::discriminators::{
    ACCOUNT_NAMESPACE, DISCRIMINATOR_LENGTH, EVENT_NAMESPACE, INSTRUCTION_NAMESPACE,
};
use crate::utils::hash::sha256_first_8;

/// Kind tag of a discriminated entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EntityKind {
    Account,
    Instruction,
    Event,
}

impl EntityKind {
    /// Digest namespace. Instructions hash under `global`, matching the
    /// Anchor derivation.
    pub fn namespace(&self) -> &'static str {
        match self {
            EntityKind::Account => ACCOUNT_NAMESPACE,
            EntityKind::Instruction => INSTRUCTION_NAMESPACE,
            EntityKind::Event => EVENT_NAMESPACE,
        }
    }
}

/// Where a discriminator's bytes came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DiscriminatorOrigin {
    Implicit,
    Explicit,
}

/// A byte prefix identifying one account/instruction/event variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Discriminator {
    pub bytes: Vec<u8>,
    pub origin: DiscriminatorOrigin,
}

impl Discriminator {
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Derive the implicit discriminator for `name` under `kind`'s namespace.
pub fn implicit_discriminator(kind: EntityKind, name: &str) -> Discriminator {
    let preimage = format!("{}:{}", kind.namespace(), name);
    let bytes = sha256_first_8(&preimage).to_vec();
    debug_assert_eq!(bytes.len(), DISCRIMINATOR_LENGTH);
    Discriminator {
        bytes,
        origin: DiscriminatorOrigin::Implicit,
    }
}

/// Wrap schema-supplied discriminator bytes unchanged. No length
/// constraint beyond what the schema states.
pub fn explicit_discriminator(bytes: Vec<u8>) -> Discriminator {
    Discriminator {
        bytes,
        origin: DiscriminatorOrigin::Explicit,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::distributions::{Alphanumeric, DistString};

    #[test]
    fn test_implicit_is_pure() {
        let mut rng = rand::thread_rng();
        for _ in 0..50 {
            let name = Alphanumeric.sample_string(&mut rng, 12);
            let first = implicit_discriminator(EntityKind::Account, &name);
            let second = implicit_discriminator(EntityKind::Account, &name);
            assert_eq!(first, second);
            assert_eq!(first.bytes.len(), DISCRIMINATOR_LENGTH);
            assert_eq!(first.origin, DiscriminatorOrigin::Implicit);
        }
    }

    #[test]
    fn test_kinds_use_distinct_namespaces() {
        let account = implicit_discriminator(EntityKind::Account, "Transfer");
        let instruction = implicit_discriminator(EntityKind::Instruction, "Transfer");
        let event = implicit_discriminator(EntityKind::Event, "Transfer");
        assert_ne!(account.bytes, instruction.bytes);
        assert_ne!(account.bytes, event.bytes);
        assert_ne!(instruction.bytes, event.bytes);
    }

    #[test]
    fn test_name_casing_changes_bytes() {
        // Original casing feeds the digest; display casing must not.
        let original = implicit_discriminator(EntityKind::Account, "myVault");
        let pascal = implicit_discriminator(EntityKind::Account, "MyVault");
        assert_ne!(original.bytes, pascal.bytes);
    }

    #[test]
    fn test_explicit_passthrough() {
        let disc = explicit_discriminator(vec![1, 2, 3]);
        assert_eq!(disc.bytes, vec![1, 2, 3]);
        assert_eq!(disc.len(), 3);
        assert_eq!(disc.origin, DiscriminatorOrigin::Explicit);
    }
}
