//! Account-key resolution planning.
//!
//! An instruction's key list is described as a tagged sequence of steps,
//! one per schema slot, in schema order. Only presence handling differs
//! between the two policies; ordering is never rearranged. The plan also
//! carries its reference semantics: [`KeyListPlan::resolve_metas`]
//! evaluates the steps against caller-supplied accounts and is exactly the
//! behavior generated wrappers must reproduce.

use std::collections::HashMap;
use std::str::FromStr;

use serde::Serialize;
use solana_pubkey::Pubkey;

use crate::errors::{CodegenError, CodegenResult};
use crate::models::instruction::{AccountSlot, OptionalAccountPolicy, ResolvedAccountMeta};

/// One step of the key-list construction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum KeyStep {
    /// Required slot: the caller must supply it.
    Always { slot: AccountSlot },
    /// Known-address slot: defaults to its bound constant, caller may
    /// override. Applies under either policy.
    ConstantDefault { slot: AccountSlot, address: Pubkey },
    /// Optional slot under the default-to-constant policy: absent values
    /// resolve to the program's own address, forced readonly/non-signer.
    ProgramFallback { slot: AccountSlot },
    /// Optional slot under the omit-trailing policy: included only when
    /// supplied, and only if every earlier optional named in `requires`
    /// was supplied too.
    Guarded {
        slot: AccountSlot,
        requires: Vec<String>,
    },
}

impl KeyStep {
    pub fn slot(&self) -> &AccountSlot {
        match self {
            KeyStep::Always { slot }
            | KeyStep::ConstantDefault { slot, .. }
            | KeyStep::ProgramFallback { slot }
            | KeyStep::Guarded { slot, .. } => slot,
        }
    }
}

/// Ordered key-list construction plan for one instruction.
#[derive(Debug, Clone, Serialize)]
pub struct KeyListPlan {
    /// Instruction name, schema-original casing (used in the generated
    /// checks' error messages).
    pub instruction: String,
    pub policy: OptionalAccountPolicy,
    pub steps: Vec<KeyStep>,
}

/// Resolve a slot's constant binding: an explicit base58 address on the
/// slot wins over the well-known-address table.
fn constant_for(
    instruction: &str,
    slot: &AccountSlot,
    known: &HashMap<String, Pubkey>,
) -> CodegenResult<Option<Pubkey>> {
    if let Some(address) = &slot.address {
        let parsed = Pubkey::from_str(address).map_err(|_| {
            CodegenError::MalformedSchema(format!(
                "`{}.{}`: invalid constant address `{}`",
                instruction, slot.name, address
            ))
        })?;
        return Ok(Some(parsed));
    }
    Ok(known.get(&slot.name).copied())
}

/// Build the key-list plan for one instruction's slots under `policy`.
///
/// Slot order is preserved exactly; only presence/absence handling and
/// fallbacks differ between policies.
pub fn plan_account_keys(
    instruction: &str,
    slots: &[AccountSlot],
    policy: OptionalAccountPolicy,
    known: &HashMap<String, Pubkey>,
) -> CodegenResult<KeyListPlan> {
    let mut steps = Vec::with_capacity(slots.len());
    // Optional slots already seen in the trailing suffix; each later
    // optional requires all of them.
    let mut optional_chain: Vec<String> = Vec::new();

    for slot in slots {
        let constant = constant_for(instruction, slot, known)?;
        let step = match (constant, slot.is_optional, policy) {
            (Some(address), _, _) => KeyStep::ConstantDefault {
                slot: slot.clone(),
                address,
            },
            (None, false, _) => KeyStep::Always { slot: slot.clone() },
            (None, true, OptionalAccountPolicy::DefaultToProgramId) => {
                KeyStep::ProgramFallback { slot: slot.clone() }
            }
            (None, true, OptionalAccountPolicy::OmitTrailingOptionals) => {
                let step = KeyStep::Guarded {
                    slot: slot.clone(),
                    requires: optional_chain.clone(),
                };
                optional_chain.push(slot.name.clone());
                step
            }
        };
        steps.push(step);
    }

    Ok(KeyListPlan {
        instruction: instruction.to_string(),
        policy,
        steps,
    })
}

impl KeyListPlan {
    /// Evaluate the plan against caller-supplied accounts.
    ///
    /// This is the reference semantics of the generated key-list code.
    /// The ordering guard for trailing optionals fires here, at
    /// resolution time: presence of optional accounts cannot be known
    /// when the plan is built.
    pub fn resolve_metas(
        &self,
        supplied: &HashMap<String, Pubkey>,
        program_id: &Pubkey,
    ) -> CodegenResult<Vec<ResolvedAccountMeta>> {
        let mut metas = Vec::with_capacity(self.steps.len());

        for step in &self.steps {
            let slot = step.slot();
            match step {
                KeyStep::Always { .. } => {
                    let pubkey = supplied.get(&slot.name).copied().ok_or_else(|| {
                        CodegenError::OptionalAccountConfig(format!(
                            "instruction `{}`: required account `{}` was not supplied",
                            self.instruction, slot.name
                        ))
                    })?;
                    metas.push(declared_meta(slot, pubkey));
                }
                KeyStep::ConstantDefault { address, .. } => {
                    let pubkey = supplied.get(&slot.name).copied().unwrap_or(*address);
                    metas.push(declared_meta(slot, pubkey));
                }
                KeyStep::ProgramFallback { .. } => match supplied.get(&slot.name) {
                    Some(pubkey) => metas.push(declared_meta(slot, *pubkey)),
                    None => metas.push(ResolvedAccountMeta {
                        name: slot.name.clone(),
                        pubkey: *program_id,
                        is_writable: false,
                        is_signer: false,
                    }),
                },
                KeyStep::Guarded { requires, .. } => {
                    if let Some(pubkey) = supplied.get(&slot.name) {
                        for required in requires {
                            if !supplied.contains_key(required) {
                                return Err(CodegenError::OptionalAccountConfig(format!(
                                    "instruction `{}`: optional account `{}` was supplied \
                                     but earlier optional account `{}` is missing",
                                    self.instruction, slot.name, required
                                )));
                            }
                        }
                        metas.push(declared_meta(slot, *pubkey));
                    }
                }
            }
        }
        Ok(metas)
    }
}

fn declared_meta(slot: &AccountSlot, pubkey: Pubkey) -> ResolvedAccountMeta {
    ResolvedAccountMeta {
        name: slot.name.clone(),
        pubkey,
        is_writable: slot.is_mut,
        is_signer: slot.is_signer,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::addresses::default_known_addresses;

    fn slots() -> Vec<AccountSlot> {
        vec![
            AccountSlot::new("authority", true, true),
            AccountSlot::optional("delegate", false, false),
            AccountSlot::optional("closeTarget", true, false),
        ]
    }

    fn supplied(names: &[&str]) -> HashMap<String, Pubkey> {
        names
            .iter()
            .map(|n| (n.to_string(), Pubkey::new_unique()))
            .collect()
    }

    #[test]
    fn test_omit_trailing_happy_path() {
        let plan = plan_account_keys(
            "revoke",
            &slots(),
            OptionalAccountPolicy::OmitTrailingOptionals,
            &HashMap::new(),
        )
        .unwrap();
        let accounts = supplied(&["authority", "delegate", "closeTarget"]);
        let program_id = Pubkey::new_unique();

        let metas = plan.resolve_metas(&accounts, &program_id).unwrap();
        let names: Vec<&str> = metas.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["authority", "delegate", "closeTarget"]);
    }

    #[test]
    fn test_omit_trailing_skips_absent_suffix() {
        let plan = plan_account_keys(
            "revoke",
            &slots(),
            OptionalAccountPolicy::OmitTrailingOptionals,
            &HashMap::new(),
        )
        .unwrap();
        let accounts = supplied(&["authority"]);
        let program_id = Pubkey::new_unique();

        let metas = plan.resolve_metas(&accounts, &program_id).unwrap();
        assert_eq!(metas.len(), 1);
        assert_eq!(metas[0].name, "authority");
    }

    #[test]
    fn test_omit_trailing_out_of_order_is_config_error() {
        let plan = plan_account_keys(
            "revoke",
            &slots(),
            OptionalAccountPolicy::OmitTrailingOptionals,
            &HashMap::new(),
        )
        .unwrap();
        // closeTarget supplied while delegate is missing.
        let accounts = supplied(&["authority", "closeTarget"]);
        let program_id = Pubkey::new_unique();

        let err = plan.resolve_metas(&accounts, &program_id).unwrap_err();
        assert!(matches!(err, CodegenError::OptionalAccountConfig(_)));
        assert!(err.to_string().contains("closeTarget"));
        assert!(err.to_string().contains("delegate"));
    }

    #[test]
    fn test_default_policy_keeps_positions_and_forces_flags() {
        let plan = plan_account_keys(
            "revoke",
            &slots(),
            OptionalAccountPolicy::DefaultToProgramId,
            &HashMap::new(),
        )
        .unwrap();
        let mut accounts = supplied(&["authority", "closeTarget"]);
        let close_target = accounts["closeTarget"];
        let program_id = Pubkey::new_unique();

        let metas = plan.resolve_metas(&accounts, &program_id).unwrap();
        assert_eq!(metas.len(), 3);
        // Absent delegate resolves to the program id, readonly non-signer
        // despite any declared flags.
        assert_eq!(metas[1].name, "delegate");
        assert_eq!(metas[1].pubkey, program_id);
        assert!(!metas[1].is_writable);
        assert!(!metas[1].is_signer);
        // Supplied closeTarget keeps its declared mutability.
        assert_eq!(metas[2].pubkey, close_target);
        assert!(metas[2].is_writable);

        // Each optional resolves independently of the others.
        accounts.remove("closeTarget");
        let metas = plan.resolve_metas(&accounts, &program_id).unwrap();
        assert_eq!(metas[2].pubkey, program_id);
        assert!(!metas[2].is_writable);
    }

    #[test]
    fn test_missing_required_account_fails() {
        let plan = plan_account_keys(
            "revoke",
            &slots(),
            OptionalAccountPolicy::OmitTrailingOptionals,
            &HashMap::new(),
        )
        .unwrap();
        let err = plan
            .resolve_metas(&HashMap::new(), &Pubkey::new_unique())
            .unwrap_err();
        assert!(matches!(err, CodegenError::OptionalAccountConfig(_)));
        assert!(err.to_string().contains("authority"));
    }

    #[test]
    fn test_known_address_defaults_under_both_policies() {
        let known = default_known_addresses();
        let slots = vec![
            AccountSlot::new("payer", true, true),
            AccountSlot::new("systemProgram", false, false),
        ];
        let program_id = Pubkey::new_unique();

        for policy in [
            OptionalAccountPolicy::OmitTrailingOptionals,
            OptionalAccountPolicy::DefaultToProgramId,
        ] {
            let plan = plan_account_keys("create", &slots, policy, &known).unwrap();
            assert!(matches!(plan.steps[1], KeyStep::ConstantDefault { .. }));

            let metas = plan
                .resolve_metas(&supplied(&["payer"]), &program_id)
                .unwrap();
            assert_eq!(metas[1].pubkey, known["systemProgram"]);
        }
    }

    #[test]
    fn test_caller_overrides_known_address() {
        let known = default_known_addresses();
        let slots = vec![AccountSlot::new("tokenProgram", false, false)];
        let plan = plan_account_keys(
            "swap",
            &slots,
            OptionalAccountPolicy::OmitTrailingOptionals,
            &known,
        )
        .unwrap();

        let override_key = Pubkey::new_unique();
        let mut accounts = HashMap::new();
        accounts.insert("tokenProgram".to_string(), override_key);
        let metas = plan.resolve_metas(&accounts, &Pubkey::new_unique()).unwrap();
        assert_eq!(metas[0].pubkey, override_key);
    }

    #[test]
    fn test_explicit_slot_address_wins_over_table() {
        let mut slot = AccountSlot::new("oracle", false, false);
        slot.address = Some("SysvarC1ock11111111111111111111111111111111".to_string());
        let plan = plan_account_keys(
            "read",
            &[slot],
            OptionalAccountPolicy::OmitTrailingOptionals,
            &HashMap::new(),
        )
        .unwrap();
        match &plan.steps[0] {
            KeyStep::ConstantDefault { address, .. } => {
                assert_eq!(
                    address.to_string(),
                    "SysvarC1ock11111111111111111111111111111111"
                );
            }
            other => panic!("expected constant default, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_slot_address_is_malformed_schema() {
        let mut slot = AccountSlot::new("oracle", false, false);
        slot.address = Some("not-base58!".to_string());
        let err = plan_account_keys(
            "read",
            &[slot],
            OptionalAccountPolicy::OmitTrailingOptionals,
            &HashMap::new(),
        )
        .unwrap_err();
        assert!(matches!(err, CodegenError::MalformedSchema(_)));
        assert!(err.to_string().contains("read.oracle"));
    }

    #[test]
    fn test_required_slot_after_optional_stays_unconditional() {
        let slots = vec![
            AccountSlot::new("authority", false, true),
            AccountSlot::optional("delegate", false, false),
            AccountSlot::new("vault", true, false),
        ];
        let plan = plan_account_keys(
            "drain",
            &slots,
            OptionalAccountPolicy::OmitTrailingOptionals,
            &HashMap::new(),
        )
        .unwrap();
        assert!(matches!(plan.steps[2], KeyStep::Always { .. }));

        // delegate omitted: vault still lands right after authority.
        let metas = plan
            .resolve_metas(&supplied(&["authority", "vault"]), &Pubkey::new_unique())
            .unwrap();
        let names: Vec<&str> = metas.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["authority", "vault"]);
    }
}
