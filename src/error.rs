//! Error types for the translator.

use std::{io, path::PathBuf};

use thiserror::Error;

/// A line that could not be classified as a VM command.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("unknown command `{0}`")]
    UnknownCommand(String),

    #[error("`{command}` takes {expected} operand(s), found {found}")]
    Arity {
        command: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("unknown segment `{0}`")]
    InvalidSegment(String),

    #[error("expected an integer from 0 to 32767, found `{0}`")]
    InvalidInteger(String),

    #[error("invalid symbol `{0}`")]
    InvalidSymbol(String),
}

/// A well-formed command that has no translation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TranslateError {
    #[error("cannot pop into the constant segment")]
    PopConstant,

    #[error("pointer index must be 0 or 1, found {0}")]
    PointerIndex(u16),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Translate(#[from] TranslateError),
}

/// Failure that abandoned the rest of one source unit.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{unit}:{line}: `{command}`: {kind}")]
pub struct UnitError {
    pub unit: String,
    pub line: usize,
    pub command: String,
    pub kind: CommandError,
}

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("cannot read {}: {source}", .path.display())]
    Read { path: PathBuf, source: io::Error },

    #[error("{} is neither a .vm file nor a directory", .0.display())]
    NotVmSource(PathBuf),

    #[error("cannot derive a unit name from {}", .0.display())]
    UnitName(PathBuf),
}

pub type LoadResult<T> = Result<T, LoadError>;
