//! Data models for the program interface description

pub mod account;
pub mod idl;
pub mod instruction;
pub mod types;


pub use self::account::{AccountDef, EventDef};
pub use self::idl::Idl;
pub use self::instruction::{AccountSlot, InstructionDef, OptionalAccountPolicy, ResolvedAccountMeta};
pub use self::types::{DefinedRef, EnumVariant, IdlField, IdlTypeNode, Primitive, TypeDef, TypeDefKind};
