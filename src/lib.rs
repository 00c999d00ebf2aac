//! A library for turning a Solana program's interface description into
//! structured client-wrapper descriptions.
//!
//! Given a schema of accounts, events, instructions, and user-defined
//! types, this crate decides how every type is laid out in bytes (fixed
//! size vs. size-dependent-on-value), derives the discriminator prefix of
//! every entity, and plans how each instruction's account-key list is
//! assembled, including the two optional-account policies. The output is
//! data, not text: rendering the descriptions into source code is the
//! job of an external emitter, as are CLI handling, file I/O, and the
//! byte codec itself.

pub mod constants;
pub mod errors;
pub mod generator;
pub mod models;
pub mod resolver;
pub mod utils;

pub use errors::{CodegenError, CodegenResult};
pub use generator::{
    render_program, RenderOptions, RenderedAccount, RenderedEvent, RenderedInstruction,
    RenderedProgram,
};
pub use models::Idl;

/// Version of the wrapper generator
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
