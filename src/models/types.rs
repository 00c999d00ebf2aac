//! Abstract type nodes and user-defined type definitions.
//!
//! [`IdlTypeNode`] is a closed sum type: every node a schema can contain is
//! one of these variants, and every consumer matches exhaustively. There is
//! no opaque/unknown fallback; a type string that matches no variant fails
//! at deserialization time, before any layout is computed.

use serde::{Deserialize, Serialize};

/// Scalar leaf types. All except `String` have a fixed encoded width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Primitive {
    Bool,
    U8,
    I8,
    U16,
    I16,
    U32,
    I32,
    U64,
    I64,
    U128,
    I128,
    F32,
    F64,
    Pubkey,
    String,
}

impl Primitive {
    /// Encoded byte width, or `None` when the width depends on the value.
    pub fn fixed_width(&self) -> Option<usize> {
        match self {
            Primitive::Bool | Primitive::U8 | Primitive::I8 => Some(1),
            Primitive::U16 | Primitive::I16 => Some(2),
            Primitive::U32 | Primitive::I32 | Primitive::F32 => Some(4),
            Primitive::U64 | Primitive::I64 | Primitive::F64 => Some(8),
            Primitive::U128 | Primitive::I128 => Some(16),
            Primitive::Pubkey => Some(32),
            Primitive::String => None,
        }
    }

    /// Rust-facing type name for generated identifiers.
    pub fn display(&self) -> &'static str {
        match self {
            Primitive::Bool => "bool",
            Primitive::U8 => "u8",
            Primitive::I8 => "i8",
            Primitive::U16 => "u16",
            Primitive::I16 => "i16",
            Primitive::U32 => "u32",
            Primitive::I32 => "i32",
            Primitive::U64 => "u64",
            Primitive::I64 => "i64",
            Primitive::U128 => "u128",
            Primitive::I128 => "i128",
            Primitive::F32 => "f32",
            Primitive::F64 => "f64",
            Primitive::Pubkey => "Pubkey",
            Primitive::String => "String",
        }
    }
}

/// Reference to a user-defined type, with or without generic arguments.
///
/// JSON shapes: `{"defined": "Name"}` or
/// `{"defined": {"name": "Name", "generics": [...]}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DefinedRef {
    Name(String),
    Full {
        name: String,
        #[serde(default)]
        generics: Vec<IdlTypeNode>,
    },
}

impl DefinedRef {
    pub fn name(&self) -> &str {
        match self {
            DefinedRef::Name(name) => name,
            DefinedRef::Full { name, .. } => name,
        }
    }

    pub fn generics(&self) -> &[IdlTypeNode] {
        match self {
            DefinedRef::Name(_) => &[],
            DefinedRef::Full { generics, .. } => generics,
        }
    }
}

/// One node in the abstract type graph.
///
/// Serde shapes follow the Anchor IDL JSON conventions: a bare string for
/// primitives, `{"array": [elem, len]}`, `{"vec": elem}`,
/// `{"option": elem}`, `{"defined": ...}`, `{"generic": "T"}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IdlTypeNode {
    Primitive(Primitive),
    Array { array: (Box<IdlTypeNode>, usize) },
    Vec { vec: Box<IdlTypeNode> },
    Option { option: Box<IdlTypeNode> },
    Defined { defined: DefinedRef },
    Generic { generic: String },
}

impl IdlTypeNode {
    pub fn primitive(p: Primitive) -> Self {
        IdlTypeNode::Primitive(p)
    }

    pub fn array(elem: IdlTypeNode, len: usize) -> Self {
        IdlTypeNode::Array {
            array: (Box::new(elem), len),
        }
    }

    pub fn vec_of(elem: IdlTypeNode) -> Self {
        IdlTypeNode::Vec { vec: Box::new(elem) }
    }

    pub fn option_of(elem: IdlTypeNode) -> Self {
        IdlTypeNode::Option {
            option: Box::new(elem),
        }
    }

    pub fn defined(name: &str) -> Self {
        IdlTypeNode::Defined {
            defined: DefinedRef::Name(name.to_string()),
        }
    }
}

/// One named field inside a struct or enum-variant payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdlField {
    /// Field name, schema-original casing.
    pub name: String,
    /// Field type.
    #[serde(rename = "type")]
    pub ty: IdlTypeNode,
    /// Marks an alignment-only field: zero-filled in the byte layout,
    /// invisible to the logical data model.
    #[serde(default)]
    pub padding: bool,
}

impl IdlField {
    pub fn new(name: &str, ty: IdlTypeNode) -> Self {
        Self {
            name: name.to_string(),
            ty,
            padding: false,
        }
    }

    pub fn padding_field(name: &str, len: usize) -> Self {
        Self {
            name: name.to_string(),
            ty: IdlTypeNode::array(IdlTypeNode::primitive(Primitive::U8), len),
            padding: true,
        }
    }
}

/// One variant of a user-defined enum. A variant with no fields carries
/// only its tag byte.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnumVariant {
    pub name: String,
    #[serde(default)]
    pub fields: Vec<IdlField>,
}

/// Body of a user-defined type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum TypeDefKind {
    Struct { fields: Vec<IdlField> },
    Enum { variants: Vec<EnumVariant> },
    Alias { value: IdlTypeNode },
}

/// A named user-defined type from the schema's `types` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeDef {
    /// Type name, schema-original casing.
    pub name: String,
    /// Declared generic parameter names, empty for concrete types.
    #[serde(default)]
    pub generics: Vec<String>,
    #[serde(rename = "type")]
    pub def: TypeDefKind,
}

impl TypeDef {
    /// A concrete struct definition.
    pub fn new_struct(name: &str, fields: Vec<IdlField>) -> Self {
        Self {
            name: name.to_string(),
            generics: Vec::new(),
            def: TypeDefKind::Struct { fields },
        }
    }

    /// An enum definition; scalar iff no variant carries fields.
    pub fn new_enum(name: &str, variants: Vec<EnumVariant>) -> Self {
        Self {
            name: name.to_string(),
            generics: Vec::new(),
            def: TypeDefKind::Enum { variants },
        }
    }

    /// True when every variant is payload-free, i.e. the whole value is a
    /// single tag byte.
    pub fn is_scalar_enum(&self) -> bool {
        match &self.def {
            TypeDefKind::Enum { variants } => variants.iter().all(|v| v.fields.is_empty()),
            _ => false,
        }
    }
}
