//! Wrapper-description generation.
//!
//! The assembler composes the resolver, the discriminator engine, the
//! layout builder, and the key-list planner into the complete description
//! of one account, event, or instruction wrapper. Each entity is one
//! render pass with its own fresh [`PassContext`]; passes never share
//! state. The rendered structures are handed to an external text emitter
//! as read-only data; no text is printed and no files are written here.

pub mod accounts;
pub mod discriminator;
pub mod serde_layout;

use std::collections::HashMap;

use anyhow::{Context, Result};
use log::{debug, info};
use serde::Serialize;
use solana_pubkey::Pubkey;

use crate::constants::addresses::default_known_addresses;
use crate::errors::{CodegenError, CodegenResult};
use crate::models::account::{AccountDef, EventDef};
use crate::models::idl::Idl;
use crate::models::instruction::{InstructionDef, OptionalAccountPolicy};
use crate::models::types::{TypeDef, TypeDefKind};
use crate::resolver::{PassContext, TypeRegistry, TypeResolver};
use crate::utils::casing::to_pascal_case;

use self::accounts::{plan_account_keys, KeyListPlan};
use self::discriminator::{
    explicit_discriminator, implicit_discriminator, Discriminator, EntityKind,
};
use self::serde_layout::{build_struct_descriptor, SizeAccessor, StructDescriptor};

/// Program-wide rendering knobs.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Policy applied to instructions without their own override.
    pub optional_account_policy: OptionalAccountPolicy,
    /// Well-known slot name -> constant address table. Seeded from
    /// `constants::addresses`; callers may extend or replace entries.
    pub known_addresses: HashMap<String, Pubkey>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            optional_account_policy: OptionalAccountPolicy::OmitTrailingOptionals,
            known_addresses: default_known_addresses(),
        }
    }
}

/// Complete wrapper description of one account type.
#[derive(Debug, Clone, Serialize)]
pub struct RenderedAccount {
    /// Account name, schema-original casing.
    pub name: String,
    pub args_type_name: String,
    pub discriminator: Discriminator,
    pub descriptor: StructDescriptor,
    pub size: SizeAccessor,
    /// Capabilities this pass exercised; drives the emitter's imports.
    pub usage: PassContext,
}

/// Complete wrapper description of one event.
#[derive(Debug, Clone, Serialize)]
pub struct RenderedEvent {
    pub name: String,
    pub data_type_name: String,
    pub discriminator: Discriminator,
    pub descriptor: StructDescriptor,
    pub usage: PassContext,
}

/// Complete wrapper description of one instruction.
#[derive(Debug, Clone, Serialize)]
pub struct RenderedInstruction {
    /// Instruction name, schema-original casing.
    pub name: String,
    pub args_type_name: String,
    pub accounts_type_name: String,
    pub discriminator: Discriminator,
    /// Layout of the serialized instruction data (discriminator + args).
    pub descriptor: StructDescriptor,
    pub key_plan: KeyListPlan,
    pub usage: PassContext,
}

/// All wrapper descriptions for one program, plus program-level rollups.
#[derive(Debug, Clone, Serialize)]
pub struct RenderedProgram {
    pub name: String,
    pub address: Option<String>,
    pub accounts: Vec<RenderedAccount>,
    pub events: Vec<RenderedEvent>,
    pub instructions: Vec<RenderedInstruction>,
    /// Union of every pass's capability usage.
    pub usage: PassContext,
}

fn struct_fields<'a>(
    def: &'a TypeDef,
    entity: &str,
) -> CodegenResult<&'a [crate::models::types::IdlField]> {
    match &def.def {
        TypeDefKind::Struct { fields } => Ok(fields),
        _ => Err(CodegenError::MalformedSchema(format!(
            "`{}`: referenced type `{}` is not a struct",
            entity, def.name
        ))),
    }
}

fn lookup_type<'a>(idl: &'a Idl, entity: &str, name: &str) -> CodegenResult<&'a TypeDef> {
    idl.type_by_name(name).ok_or_else(|| {
        CodegenError::MalformedSchema(format!(
            "`{}`: reference to unknown type `{}`",
            entity, name
        ))
    })
}

/// Render the wrapper description for one account type.
pub fn render_account(
    def: &AccountDef,
    idl: &Idl,
    resolver: &TypeResolver,
) -> CodegenResult<RenderedAccount> {
    let mut cx = PassContext::new();
    let type_def = lookup_type(idl, &def.name, def.type_name())?;
    let fields = resolver.resolve_fields(struct_fields(type_def, &def.name)?, &def.name, &mut cx)?;

    let discriminator = match &def.discriminator {
        Some(bytes) => explicit_discriminator(bytes.clone()),
        None => implicit_discriminator(EntityKind::Account, &def.name),
    };
    let args_type_name = format!("{}Args", to_pascal_case(&def.name));
    let descriptor =
        build_struct_descriptor(&def.name, &args_type_name, fields, Some(discriminator.clone()))?;
    let size = descriptor.size_accessor();
    debug!("rendered account `{}` ({:?})", def.name, size);

    Ok(RenderedAccount {
        name: def.name.clone(),
        args_type_name,
        discriminator,
        descriptor,
        size,
        usage: cx,
    })
}

/// Render the wrapper description for one event.
pub fn render_event(
    def: &EventDef,
    idl: &Idl,
    resolver: &TypeResolver,
) -> CodegenResult<RenderedEvent> {
    let mut cx = PassContext::new();
    let type_def = lookup_type(idl, &def.name, def.type_name())?;
    let fields = resolver.resolve_fields(struct_fields(type_def, &def.name)?, &def.name, &mut cx)?;

    let discriminator = match &def.discriminator {
        Some(bytes) => explicit_discriminator(bytes.clone()),
        None => implicit_discriminator(EntityKind::Event, &def.name),
    };
    let data_type_name = format!("{}EventData", to_pascal_case(&def.name));
    let descriptor =
        build_struct_descriptor(&def.name, &data_type_name, fields, Some(discriminator.clone()))?;
    debug!("rendered event `{}`", def.name);

    Ok(RenderedEvent {
        name: def.name.clone(),
        data_type_name,
        discriminator,
        descriptor,
        usage: cx,
    })
}

/// Render the wrapper description for one instruction.
pub fn render_instruction(
    def: &InstructionDef,
    resolver: &TypeResolver,
    options: &RenderOptions,
) -> CodegenResult<RenderedInstruction> {
    let mut cx = PassContext::new();
    let fields = resolver.resolve_fields(&def.args, &def.name, &mut cx)?;

    let discriminator = match &def.discriminator {
        Some(bytes) => explicit_discriminator(bytes.clone()),
        None => implicit_discriminator(EntityKind::Instruction, &def.name),
    };
    let pascal = to_pascal_case(&def.name);
    let args_type_name = format!("{}InstructionArgs", pascal);
    let accounts_type_name = format!("{}InstructionAccounts", pascal);
    let descriptor =
        build_struct_descriptor(&def.name, &args_type_name, fields, Some(discriminator.clone()))?;

    let policy = def
        .optional_policy
        .unwrap_or(options.optional_account_policy);
    let key_plan = plan_account_keys(&def.name, &def.accounts, policy, &options.known_addresses)?;
    debug!(
        "rendered instruction `{}` ({} accounts, {:?})",
        def.name,
        key_plan.steps.len(),
        policy
    );

    Ok(RenderedInstruction {
        name: def.name.clone(),
        args_type_name,
        accounts_type_name,
        discriminator,
        descriptor,
        key_plan,
        usage: cx,
    })
}

/// Render every account, event, and instruction of a program.
///
/// Each entity is one independent pass; failures carry the entity's name
/// as context. The returned program rolls up every pass's capability
/// usage for the emitter's import planning.
pub fn render_program(idl: &Idl, options: &RenderOptions) -> Result<RenderedProgram> {
    info!(
        "rendering program `{}`: {} accounts, {} events, {} instructions",
        idl.name,
        idl.accounts.len(),
        idl.events.len(),
        idl.instructions.len()
    );
    let registry = TypeRegistry::build(&idl.types)
        .with_context(|| format!("building type registry for `{}`", idl.name))?;
    let resolver = TypeResolver::new(&registry);

    let mut usage = PassContext::new();
    let mut accounts = Vec::with_capacity(idl.accounts.len());
    for def in &idl.accounts {
        let rendered = render_account(def, idl, &resolver)
            .with_context(|| format!("rendering account `{}`", def.name))?;
        usage.merge(&rendered.usage);
        accounts.push(rendered);
    }

    let mut events = Vec::with_capacity(idl.events.len());
    for def in &idl.events {
        let rendered = render_event(def, idl, &resolver)
            .with_context(|| format!("rendering event `{}`", def.name))?;
        usage.merge(&rendered.usage);
        events.push(rendered);
    }

    let mut instructions = Vec::with_capacity(idl.instructions.len());
    for def in &idl.instructions {
        let rendered = render_instruction(def, &resolver, options)
            .with_context(|| format!("rendering instruction `{}`", def.name))?;
        usage.merge(&rendered.usage);
        instructions.push(rendered);
    }

    Ok(RenderedProgram {
        name: idl.name.clone(),
        address: idl.address.clone(),
        accounts,
        events,
        instructions,
        usage,
    })
}
