//! Struct-level serde descriptors.
//!
//! A [`StructDescriptor`] is the byte-layout description of one account,
//! event, or instruction-args struct: the ordered fields (discriminator
//! first when present), the total size kind, and the projections the
//! emitter renders from. Building one validates the padding invariants;
//! a malformed field list fails here, never at serialize time.

use serde::Serialize;

use crate::errors::{CodegenError, CodegenResult};
use crate::generator::discriminator::Discriminator;
use crate::resolver::{SerdeField, SerdeStrategy, SizeKind};
use crate::models::types::Primitive;

/// Name of the synthesized discriminator layout field.
pub const DISCRIMINATOR_FIELD: &str = "discriminator";

/// How generated code obtains the struct's encoded byte size.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum SizeAccessor {
    /// Compile-time constant.
    Const(usize),
    /// Size must be measured from a representative value built out of the
    /// named caller-supplied fields; discriminator bytes and zero-filled
    /// padding are synthesized, never inputs.
    Computed { inputs: Vec<String> },
}

/// Byte-layout description of one struct.
#[derive(Debug, Clone, Serialize)]
pub struct StructDescriptor {
    /// Entity name, schema-original casing.
    pub name: String,
    /// Generated identifier for the user-facing args type.
    pub args_type_name: String,
    /// Layout-ordered fields, including the synthesized discriminator.
    pub fields: Vec<SerdeField>,
    pub discriminator: Option<Discriminator>,
    /// Original name of the padding field, when present.
    pub padding_field: Option<String>,
    pub size: SizeKind,
}

impl StructDescriptor {
    /// Fields of the user-facing args type: everything except the
    /// synthesized discriminator and the padding field.
    pub fn args_fields(&self) -> impl Iterator<Item = &SerdeField> {
        let skip = usize::from(self.discriminator.is_some());
        self.fields.iter().skip(skip).filter(|f| !f.is_padding)
    }

    /// Fields of the pretty/inspect projection. Same exclusions as the
    /// args type: padding is invisible to the logical data model.
    pub fn pretty_fields(&self) -> impl Iterator<Item = &SerdeField> {
        self.args_fields()
    }

    /// Size accessor the emitter should generate.
    pub fn size_accessor(&self) -> SizeAccessor {
        match self.size {
            SizeKind::Fixed(n) => SizeAccessor::Const(n),
            SizeKind::Fixable => SizeAccessor::Computed {
                inputs: self
                    .args_fields()
                    .map(|f| f.display_name.clone())
                    .collect(),
            },
        }
    }
}

fn synthesized_discriminator_field(disc: &Discriminator) -> SerdeField {
    let len = disc.bytes.len();
    SerdeField {
        name: DISCRIMINATOR_FIELD.to_string(),
        display_name: DISCRIMINATOR_FIELD.to_string(),
        type_display: format!("[u8; {}]", len),
        strategy: SerdeStrategy::Array {
            elem: Box::new(SerdeStrategy::Scalar(Primitive::U8)),
            len,
        },
        size: SizeKind::Fixed(len),
        is_padding: false,
    }
}

/// Build the descriptor for one struct.
///
/// `fields` is the resolved user field list in schema order. When a
/// discriminator is given, a layout field for it is synthesized and
/// prepended; it is never part of the args type. Total size is
/// `Fixed(sum)` iff every layout field is fixed.
pub fn build_struct_descriptor(
    name: &str,
    args_type_name: &str,
    fields: Vec<SerdeField>,
    discriminator: Option<Discriminator>,
) -> CodegenResult<StructDescriptor> {
    let padding: Vec<&SerdeField> = fields.iter().filter(|f| f.is_padding).collect();
    if padding.len() > 1 {
        let names: Vec<&str> = padding.iter().map(|f| f.name.as_str()).collect();
        return Err(CodegenError::MalformedSchema(format!(
            "`{}`: more than one padding field ({})",
            name,
            names.join(", ")
        )));
    }
    if let Some(field) = padding.first() {
        if !field.strategy.is_u8_array() {
            return Err(CodegenError::MalformedSchema(format!(
                "`{}.{}`: padding field must be a fixed-length u8 array, got `{}`",
                name, field.name, field.type_display
            )));
        }
    }
    let padding_field = padding.first().map(|f| f.name.clone());

    let mut layout = Vec::with_capacity(fields.len() + 1);
    if let Some(disc) = &discriminator {
        layout.push(synthesized_discriminator_field(disc));
    }
    layout.extend(fields);

    let mut total = 0usize;
    let mut fixed = true;
    for field in &layout {
        match field.size {
            SizeKind::Fixed(n) => total += n,
            SizeKind::Fixable => fixed = false,
        }
    }

    Ok(StructDescriptor {
        name: name.to_string(),
        args_type_name: args_type_name.to_string(),
        fields: layout,
        discriminator,
        padding_field,
        size: if fixed {
            SizeKind::Fixed(total)
        } else {
            SizeKind::Fixable
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::discriminator::{implicit_discriminator, EntityKind};
    use crate::models::types::{IdlField, IdlTypeNode, Primitive};
    use crate::resolver::{PassContext, TypeRegistry, TypeResolver};

    fn resolve(fields: &[IdlField]) -> Vec<SerdeField> {
        let registry = TypeRegistry::build(&[]).unwrap();
        let resolver = TypeResolver::new(&registry);
        let mut cx = PassContext::new();
        resolver.resolve_fields(fields, "Test", &mut cx).unwrap()
    }

    #[test]
    fn test_fixed_size_sums_all_fields() {
        let fields = resolve(&[
            IdlField::new("owner", IdlTypeNode::primitive(Primitive::Pubkey)),
            IdlField::new("amount", IdlTypeNode::primitive(Primitive::U64)),
            IdlField::new("bump", IdlTypeNode::primitive(Primitive::U8)),
        ]);
        let disc = implicit_discriminator(EntityKind::Account, "Vault");
        let descriptor = build_struct_descriptor("Vault", "VaultArgs", fields, Some(disc)).unwrap();

        // 8 (discriminator) + 32 + 8 + 1
        assert_eq!(descriptor.size, SizeKind::Fixed(49));
        assert_eq!(descriptor.size_accessor(), SizeAccessor::Const(49));
        assert_eq!(descriptor.fields.len(), 4);
        assert_eq!(descriptor.fields[0].name, DISCRIMINATOR_FIELD);
    }

    #[test]
    fn test_fixable_field_makes_struct_fixable() {
        let fields = resolve(&[
            IdlField::new("owner", IdlTypeNode::primitive(Primitive::Pubkey)),
            IdlField::new(
                "tags",
                IdlTypeNode::vec_of(IdlTypeNode::primitive(Primitive::U8)),
            ),
        ]);
        let disc = implicit_discriminator(EntityKind::Account, "Registry");
        let descriptor =
            build_struct_descriptor("Registry", "RegistryArgs", fields, Some(disc)).unwrap();

        assert_eq!(descriptor.size, SizeKind::Fixable);
        match descriptor.size_accessor() {
            SizeAccessor::Computed { inputs } => {
                // Only caller-supplied fields; no discriminator entry.
                assert_eq!(inputs, vec!["owner".to_string(), "tags".to_string()]);
            }
            other => panic!("expected computed accessor, got {:?}", other),
        }
    }

    #[test]
    fn test_discriminator_excluded_from_args() {
        let fields = resolve(&[IdlField::new("value", IdlTypeNode::primitive(Primitive::U32))]);
        let disc = implicit_discriminator(EntityKind::Instruction, "setValue");
        let descriptor =
            build_struct_descriptor("setValue", "SetValueInstructionArgs", fields, Some(disc))
                .unwrap();

        let args: Vec<&str> = descriptor.args_fields().map(|f| f.name.as_str()).collect();
        assert_eq!(args, vec!["value"]);
    }

    #[test]
    fn test_padding_excluded_from_args_and_pretty_but_counted() {
        let fields = resolve(&[
            IdlField::new("bump", IdlTypeNode::primitive(Primitive::U8)),
            IdlField::padding_field("reserved", 7),
            IdlField::new("amount", IdlTypeNode::primitive(Primitive::U64)),
        ]);
        let disc = implicit_discriminator(EntityKind::Account, "Pool");
        let descriptor = build_struct_descriptor("Pool", "PoolArgs", fields, Some(disc)).unwrap();

        assert_eq!(descriptor.padding_field.as_deref(), Some("reserved"));
        // Padding bytes are part of the layout: 8 + 1 + 7 + 8.
        assert_eq!(descriptor.size, SizeKind::Fixed(24));

        let args: Vec<&str> = descriptor.args_fields().map(|f| f.name.as_str()).collect();
        assert_eq!(args, vec!["bump", "amount"]);
        let pretty: Vec<&str> = descriptor.pretty_fields().map(|f| f.name.as_str()).collect();
        assert_eq!(pretty, vec!["bump", "amount"]);
    }

    #[test]
    fn test_two_padding_fields_rejected() {
        let fields = resolve(&[
            IdlField::padding_field("pad1", 4),
            IdlField::padding_field("pad2", 4),
        ]);
        let err = build_struct_descriptor("Bad", "BadArgs", fields, None).unwrap_err();
        assert!(matches!(err, CodegenError::MalformedSchema(_)));
        assert!(err.to_string().contains("pad1"));
        assert!(err.to_string().contains("pad2"));
    }

    #[test]
    fn test_non_u8_padding_rejected() {
        let mut field = IdlField::new(
            "pad",
            IdlTypeNode::array(IdlTypeNode::primitive(Primitive::U32), 2),
        );
        field.padding = true;
        let fields = resolve(&[field]);
        let err = build_struct_descriptor("Bad", "BadArgs", fields, None).unwrap_err();
        assert!(matches!(err, CodegenError::MalformedSchema(_)));
        assert!(err.to_string().contains("Bad.pad"));
    }

    #[test]
    fn test_no_discriminator_layout() {
        let fields = resolve(&[IdlField::new("x", IdlTypeNode::primitive(Primitive::U16))]);
        let descriptor = build_struct_descriptor("Plain", "PlainArgs", fields, None).unwrap();
        assert_eq!(descriptor.size, SizeKind::Fixed(2));
        assert_eq!(descriptor.fields.len(), 1);
        let args: Vec<&str> = descriptor.args_fields().map(|f| f.name.as_str()).collect();
        assert_eq!(args, vec!["x"]);
    }
}
