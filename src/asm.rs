//! Hack assembly instructions as typed values.
//!
//! Every generated block is a `Vec<Instruction>`; text only appears when the
//! block is rendered through `Display`.

use std::fmt;

/// Operand of an A-instruction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Address {
    Constant(u16),
    Symbol(String),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Dest {
    A,
    D,
    M,
    AM,
}

/// The subset of the ALU computations the translator emits.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Comp {
    Zero,
    MinusOne,
    A,
    D,
    M,
    NotM,
    NegM,
    APlusOne,
    AMinusOne,
    MPlusOne,
    MMinusOne,
    DPlusA,
    DPlusM,
    DMinusA,
    MMinusD,
    DAndM,
    DOrM,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Jump {
    JEQ,
    JGT,
    JLT,
    JNE,
    JMP,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Instruction {
    At(Address),
    Compute {
        dest: Option<Dest>,
        comp: Comp,
        jump: Option<Jump>,
    },
    Label(String),
    Comment(String),
}

impl Instruction {
    /// Whether the instruction occupies a ROM word once assembled.
    pub fn is_code(&self) -> bool {
        matches!(self, Instruction::At(_) | Instruction::Compute { .. })
    }
}

pub fn at_c(arg: u16) -> Instruction {
    Instruction::At(Address::Constant(arg))
}

pub fn at_s(sym: impl Into<String>) -> Instruction {
    Instruction::At(Address::Symbol(sym.into()))
}

/// `dest=comp`
pub fn set(dest: Dest, comp: Comp) -> Instruction {
    Instruction::Compute {
        dest: Some(dest),
        comp,
        jump: None,
    }
}

/// `comp;jump`
pub fn jump(comp: Comp, jump: Jump) -> Instruction {
    Instruction::Compute {
        dest: None,
        comp,
        jump: Some(jump),
    }
}

pub fn label(sym: impl Into<String>) -> Instruction {
    Instruction::Label(sym.into())
}

pub fn comment(text: impl Into<String>) -> Instruction {
    Instruction::Comment(text.into())
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Address::Constant(value) => write!(f, "{}", value),
            Address::Symbol(sym) => f.write_str(sym),
        }
    }
}

impl fmt::Display for Dest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Dest::A => "A",
            Dest::D => "D",
            Dest::M => "M",
            Dest::AM => "AM",
        })
    }
}

impl fmt::Display for Comp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Comp::Zero => "0",
            Comp::MinusOne => "-1",
            Comp::A => "A",
            Comp::D => "D",
            Comp::M => "M",
            Comp::NotM => "!M",
            Comp::NegM => "-M",
            Comp::APlusOne => "A+1",
            Comp::AMinusOne => "A-1",
            Comp::MPlusOne => "M+1",
            Comp::MMinusOne => "M-1",
            Comp::DPlusA => "D+A",
            Comp::DPlusM => "D+M",
            Comp::DMinusA => "D-A",
            Comp::MMinusD => "M-D",
            Comp::DAndM => "D&M",
            Comp::DOrM => "D|M",
        })
    }
}

impl fmt::Display for Jump {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Jump::JEQ => "JEQ",
            Jump::JGT => "JGT",
            Jump::JLT => "JLT",
            Jump::JNE => "JNE",
            Jump::JMP => "JMP",
        })
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Instruction::At(address) => write!(f, "@{}", address),
            Instruction::Compute { dest, comp, jump } => {
                if let Some(dest) = dest {
                    write!(f, "{}=", dest)?;
                }
                write!(f, "{}", comp)?;
                if let Some(jump) = jump {
                    write!(f, ";{}", jump)?;
                }
                Ok(())
            }
            Instruction::Label(sym) => write!(f, "({})", sym),
            Instruction::Comment(text) => write!(f, "// {}", text),
        }
    }
}
