//! Type graph resolution.
//!
//! Maps abstract type nodes to serialization strategies and display types,
//! and precomputes the size kind of every user-defined type. Resolution is
//! where fixed-vs-fixable is decided: a value whose encoded length depends
//! on the value itself (sequences, options, strings, payload-carrying
//! enums) is `Fixable`, and fixability propagates upward through arrays and
//! structs.
//!
//! Capability usage (fixable encodings, scalar enums, referenced defined
//! types) is recorded into a [`PassContext`] threaded explicitly through
//! every call. The assembler creates a fresh context per render pass, so
//! nothing can leak between unrelated accounts or instructions.


use std::collections::{BTreeSet, HashMap, HashSet};

use log::debug;
use serde::Serialize;

use crate::errors::{CodegenError, CodegenResult};
use crate::models::types::{IdlField, IdlTypeNode, Primitive, TypeDef, TypeDefKind};
use crate::utils::casing::{to_pascal_case, to_snake_case};

/// Encoded byte length of a type: a compile-time constant, or dependent on
/// the runtime value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SizeKind {
    Fixed(usize),
    Fixable,
}

impl SizeKind {
    pub fn is_fixed(&self) -> bool {
        matches!(self, SizeKind::Fixed(_))
    }

    pub fn fixed(&self) -> Option<usize> {
        match self {
            SizeKind::Fixed(n) => Some(*n),
            SizeKind::Fixable => None,
        }
    }
}

/// Which codec applies to a resolved type, with the metadata that codec
/// needs. Handed to the emitter as data; this crate never encodes bytes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum SerdeStrategy {
    /// Direct scalar codec. Fixed-width except for `String`.
    Scalar(Primitive),
    /// Fixed-length array of an element strategy.
    Array {
        elem: Box<SerdeStrategy>,
        len: usize,
    },
    /// Length-prefixed dynamic sequence. Always fixable.
    Seq { elem: Box<SerdeStrategy> },
    /// Presence-prefixed optional. Always fixable.
    Option { elem: Box<SerdeStrategy> },
    /// Codec of a user-defined type, by name.
    Defined {
        name: String,
        size: SizeKind,
        scalar_enum: bool,
    },
}

impl SerdeStrategy {
    /// Size kind implied by the strategy.
    pub fn size(&self) -> SizeKind {
        match self {
            SerdeStrategy::Scalar(p) => match p.fixed_width() {
                Some(n) => SizeKind::Fixed(n),
                None => SizeKind::Fixable,
            },
            SerdeStrategy::Array { elem, len } => match elem.size() {
                SizeKind::Fixed(n) => SizeKind::Fixed(n * len),
                SizeKind::Fixable => SizeKind::Fixable,
            },
            SerdeStrategy::Seq { .. } | SerdeStrategy::Option { .. } => SizeKind::Fixable,
            SerdeStrategy::Defined { size, .. } => *size,
        }
    }

    /// True for a fixed-length `u8` array, the only shape a padding field
    /// may have.
    pub fn is_u8_array(&self) -> bool {
        matches!(
            self,
            SerdeStrategy::Array { elem, .. }
                if matches!(elem.as_ref(), SerdeStrategy::Scalar(Primitive::U8))
        )
    }
}

/// One resolved field, ready for descriptor building.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SerdeField {
    /// Schema-original name; feeds byte-level concerns and error messages.
    pub name: String,
    /// snake_case name for generated identifiers.
    pub display_name: String,
    /// Display type signature, e.g. `[u8; 32]` or `Option<Pubkey>`.
    pub type_display: String,
    pub strategy: SerdeStrategy,
    pub size: SizeKind,
    pub is_padding: bool,
}

/// Capabilities exercised while resolving one entity. Created fresh per
/// render pass and returned to the caller; the emitter reads it to decide
/// which imports the generated wrapper needs.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PassContext {
    /// Some resolved type had a value-dependent encoded length.
    pub uses_fixable: bool,
    /// Payload-free enums referenced during the pass.
    pub scalar_enums: BTreeSet<String>,
    /// All user-defined types referenced during the pass.
    pub defined_types: BTreeSet<String>,
}

impl PassContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold another pass's usage into this one (program-level rollup).
    pub fn merge(&mut self, other: &PassContext) {
        self.uses_fixable |= other.uses_fixable;
        self.scalar_enums.extend(other.scalar_enums.iter().cloned());
        self.defined_types.extend(other.defined_types.iter().cloned());
    }
}

#[derive(Debug, Clone, Copy)]
struct RegistryEntry {
    size: SizeKind,
    scalar_enum: bool,
}

/// Precomputed size kinds for every user-defined type in the schema.
///
/// Built once per schema; a reference to an undefined type or a recursive
/// definition fails here, before any entity is rendered.
#[derive(Debug)]
pub struct TypeRegistry {
    entries: HashMap<String, RegistryEntry>,
}

impl TypeRegistry {
    pub fn build(defs: &[TypeDef]) -> CodegenResult<Self> {
        let by_name: HashMap<&str, &TypeDef> =
            defs.iter().map(|d| (d.name.as_str(), d)).collect();
        let mut entries = HashMap::new();
        let mut in_progress = HashSet::new();

        for def in defs {
            Self::compute(def, &by_name, &mut entries, &mut in_progress)?;
        }
        debug!("type registry built with {} entries", entries.len());
        Ok(Self { entries })
    }

    fn compute(
        def: &TypeDef,
        by_name: &HashMap<&str, &TypeDef>,
        entries: &mut HashMap<String, RegistryEntry>,
        in_progress: &mut HashSet<String>,
    ) -> CodegenResult<RegistryEntry> {
        if let Some(entry) = entries.get(&def.name) {
            return Ok(*entry);
        }
        if !in_progress.insert(def.name.clone()) {
            return Err(CodegenError::MalformedSchema(format!(
                "recursive type definition involving `{}`",
                def.name
            )));
        }

        let entry = if !def.generics.is_empty() {
            // Generic typedefs are sized per instantiation; conservatively
            // value-dependent here.
            RegistryEntry {
                size: SizeKind::Fixable,
                scalar_enum: false,
            }
        } else {
            match &def.def {
                TypeDefKind::Struct { fields } => {
                    let mut total = 0usize;
                    let mut fixed = true;
                    for field in fields {
                        let size = Self::node_size(
                            &field.ty,
                            &def.name,
                            &field.name,
                            by_name,
                            entries,
                            in_progress,
                        )?;
                        match size {
                            SizeKind::Fixed(n) => total += n,
                            SizeKind::Fixable => fixed = false,
                        }
                    }
                    RegistryEntry {
                        size: if fixed {
                            SizeKind::Fixed(total)
                        } else {
                            SizeKind::Fixable
                        },
                        scalar_enum: false,
                    }
                }
                TypeDefKind::Enum { variants } => {
                    let scalar = variants.iter().all(|v| v.fields.is_empty());
                    // Validate payload fields even though a payload enum is
                    // fixable regardless: unknown references must not slip
                    // through unreported.
                    for variant in variants {
                        for field in &variant.fields {
                            Self::node_size(
                                &field.ty,
                                &def.name,
                                &field.name,
                                by_name,
                                entries,
                                in_progress,
                            )?;
                        }
                    }
                    RegistryEntry {
                        size: if scalar {
                            SizeKind::Fixed(1)
                        } else {
                            SizeKind::Fixable
                        },
                        scalar_enum: scalar,
                    }
                }
                TypeDefKind::Alias { value } => RegistryEntry {
                    size: Self::node_size(value, &def.name, "<alias>", by_name, entries, in_progress)?,
                    scalar_enum: false,
                },
            }
        };

        in_progress.remove(&def.name);
        entries.insert(def.name.clone(), entry);
        Ok(entry)
    }

    fn node_size(
        node: &IdlTypeNode,
        owner: &str,
        field: &str,
        by_name: &HashMap<&str, &TypeDef>,
        entries: &mut HashMap<String, RegistryEntry>,
        in_progress: &mut HashSet<String>,
    ) -> CodegenResult<SizeKind> {
        match node {
            IdlTypeNode::Primitive(p) => Ok(match p.fixed_width() {
                Some(n) => SizeKind::Fixed(n),
                None => SizeKind::Fixable,
            }),
            IdlTypeNode::Array { array: (elem, len) } => {
                match Self::node_size(elem, owner, field, by_name, entries, in_progress)? {
                    SizeKind::Fixed(n) => Ok(SizeKind::Fixed(n * len)),
                    SizeKind::Fixable => Ok(SizeKind::Fixable),
                }
            }
            IdlTypeNode::Vec { vec } | IdlTypeNode::Option { option: vec } => {
                // Validate the element before classifying as fixable.
                Self::node_size(vec, owner, field, by_name, entries, in_progress)?;
                Ok(SizeKind::Fixable)
            }
            IdlTypeNode::Defined { defined } => {
                let name = defined.name();
                if !defined.generics().is_empty() {
                    return Ok(SizeKind::Fixable);
                }
                let referenced = by_name.get(name).ok_or_else(|| {
                    CodegenError::MalformedSchema(format!(
                        "`{}.{}`: reference to unknown type `{}`",
                        owner, field, name
                    ))
                })?;
                Ok(Self::compute(referenced, by_name, entries, in_progress)?.size)
            }
            // Reachable only inside non-generic typedefs, where a
            // placeholder has nothing to bind to.
            IdlTypeNode::Generic { generic } => Err(CodegenError::Resolution(format!(
                "`{}.{}`: unbound generic parameter `{}`",
                owner, field, generic
            ))),
        }
    }

    fn lookup(&self, name: &str) -> Option<RegistryEntry> {
        self.entries.get(name).copied()
    }

    /// Size kind of a user-defined type, when known.
    pub fn size_of(&self, name: &str) -> Option<SizeKind> {
        self.lookup(name).map(|e| e.size)
    }
}

/// A resolved node: the display type signature plus the codec strategy.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedType {
    pub display: String,
    pub strategy: SerdeStrategy,
}

/// Walks type nodes against a built registry.
pub struct TypeResolver<'a> {
    registry: &'a TypeRegistry,
}

impl<'a> TypeResolver<'a> {
    pub fn new(registry: &'a TypeRegistry) -> Self {
        Self { registry }
    }

    /// Resolve one node. `hint` names the entity/field being resolved and
    /// only feeds error messages. Capability usage is recorded into `cx`.
    pub fn resolve(
        &self,
        node: &IdlTypeNode,
        hint: &str,
        cx: &mut PassContext,
    ) -> CodegenResult<ResolvedType> {
        match node {
            IdlTypeNode::Primitive(p) => {
                if p.fixed_width().is_none() {
                    cx.uses_fixable = true;
                }
                Ok(ResolvedType {
                    display: p.display().to_string(),
                    strategy: SerdeStrategy::Scalar(*p),
                })
            }
            IdlTypeNode::Array { array: (elem, len) } => {
                let inner = self.resolve(elem, hint, cx)?;
                Ok(ResolvedType {
                    display: format!("[{}; {}]", inner.display, len),
                    strategy: SerdeStrategy::Array {
                        elem: Box::new(inner.strategy),
                        len: *len,
                    },
                })
            }
            IdlTypeNode::Vec { vec } => {
                let inner = self.resolve(vec, hint, cx)?;
                cx.uses_fixable = true;
                Ok(ResolvedType {
                    display: format!("Vec<{}>", inner.display),
                    strategy: SerdeStrategy::Seq {
                        elem: Box::new(inner.strategy),
                    },
                })
            }
            IdlTypeNode::Option { option } => {
                let inner = self.resolve(option, hint, cx)?;
                cx.uses_fixable = true;
                Ok(ResolvedType {
                    display: format!("Option<{}>", inner.display),
                    strategy: SerdeStrategy::Option {
                        elem: Box::new(inner.strategy),
                    },
                })
            }
            IdlTypeNode::Defined { defined } => {
                let name = defined.name();
                let entry = self.registry.lookup(name).ok_or_else(|| {
                    CodegenError::Resolution(format!(
                        "`{}`: reference to unknown type `{}`",
                        hint, name
                    ))
                })?;

                cx.defined_types.insert(name.to_string());
                if entry.scalar_enum {
                    cx.scalar_enums.insert(name.to_string());
                }

                let mut size = entry.size;
                let mut display = to_pascal_case(name);
                if !defined.generics().is_empty() {
                    // Sized per instantiation; the emitter monomorphizes.
                    size = SizeKind::Fixable;
                    let args = defined
                        .generics()
                        .iter()
                        .map(|g| self.resolve(g, hint, cx).map(|r| r.display))
                        .collect::<CodegenResult<Vec<_>>>()?;
                    display = format!("{}<{}>", display, args.join(", "));
                }
                if !size.is_fixed() {
                    cx.uses_fixable = true;
                }
                Ok(ResolvedType {
                    display,
                    strategy: SerdeStrategy::Defined {
                        name: name.to_string(),
                        size,
                        scalar_enum: entry.scalar_enum,
                    },
                })
            }
            IdlTypeNode::Generic { generic } => Err(CodegenError::Resolution(format!(
                "`{}`: unbound generic parameter `{}`",
                hint, generic
            ))),
        }
    }

    /// Resolve an ordered field list into [`SerdeField`]s. `owner` names
    /// the entity for error messages.
    pub fn resolve_fields(
        &self,
        fields: &[IdlField],
        owner: &str,
        cx: &mut PassContext,
    ) -> CodegenResult<Vec<SerdeField>> {
        fields
            .iter()
            .map(|field| {
                let hint = format!("{}.{}", owner, field.name);
                let resolved = self.resolve(&field.ty, &hint, cx)?;
                let size = resolved.strategy.size();
                Ok(SerdeField {
                    name: field.name.clone(),
                    display_name: to_snake_case(&field.name),
                    type_display: resolved.display,
                    strategy: resolved.strategy,
                    size,
                    is_padding: field.padding,
                })
            })
            .collect()
    }
}
