//! VM-to-Hack translator.
//!
//! - `parser` classifies one VM line into a [`Command`].
//! - `translator` turns commands into typed Hack [`Instruction`]s.
//! - `program` runs a set of source units behind the bootstrap prologue.
//! - `loader` reads units from a `.vm` file or a directory of them.

pub mod asm;
pub mod ast;
pub mod config;
pub mod context;
pub mod error;
pub mod loader;
pub mod parser;
pub mod program;
pub mod translator;

pub use asm::Instruction;
pub use ast::Command;
pub use config::Options;
pub use context::TranslationContext;
pub use error::{LoadError, ParseError, TranslateError, UnitError};
pub use program::{translate_units, SourceUnit, Translation};
pub use translator::Translator;
