use std::fmt;

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Segment {
    Constant,
    Local,
    Static,
    Argument,
    This,
    That,
    Pointer,
    Temp,
}

impl Segment {
    pub fn name(self) -> &'static str {
        match self {
            Segment::Constant => "constant",
            Segment::Local => "local",
            Segment::Static => "static",
            Segment::Argument => "argument",
            Segment::This => "this",
            Segment::That => "that",
            Segment::Pointer => "pointer",
            Segment::Temp => "temp",
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum ArithmeticOp {
    Add,
    Sub,
    Neg,
    And,
    Or,
    Not,
}

impl ArithmeticOp {
    pub fn name(self) -> &'static str {
        match self {
            ArithmeticOp::Add => "add",
            ArithmeticOp::Sub => "sub",
            ArithmeticOp::Neg => "neg",
            ArithmeticOp::And => "and",
            ArithmeticOp::Or => "or",
            ArithmeticOp::Not => "not",
        }
    }

    pub fn is_unary(self) -> bool {
        matches!(self, ArithmeticOp::Neg | ArithmeticOp::Not)
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum ComparisonOp {
    Eq,
    Gt,
    Lt,
}

impl ComparisonOp {
    pub fn name(self) -> &'static str {
        match self {
            ComparisonOp::Eq => "eq",
            ComparisonOp::Gt => "gt",
            ComparisonOp::Lt => "lt",
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Direction {
    Push,
    Pop,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum BranchKind {
    Label,
    Goto,
    IfGoto,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum FunctionKind {
    Function,
    Call,
}

/// One classified line of VM code.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum Command {
    // Stack basics
    Arithmetic(ArithmeticOp),
    Comparison(ComparisonOp),
    MemoryAccess(Direction, Segment, u16),

    // Control
    Branch(BranchKind, String),
    FunctionControl(FunctionKind, String, u16),
    Return,
}

impl Command {
    /// Net change in stack depth once the command (and, for `call`, the
    /// matching return) has completed. `None` for `return`, which leaves the
    /// current frame entirely.
    pub fn stack_effect(&self) -> Option<i32> {
        let delta = match self {
            Command::Arithmetic(op) if op.is_unary() => 0,
            Command::Arithmetic(_) | Command::Comparison(_) => -1,
            Command::MemoryAccess(Direction::Push, _, _) => 1,
            Command::MemoryAccess(Direction::Pop, _, _) => -1,
            Command::Branch(BranchKind::IfGoto, _) => -1,
            Command::Branch(_, _) => 0,
            Command::FunctionControl(FunctionKind::Function, _, locals) => i32::from(*locals),
            Command::FunctionControl(FunctionKind::Call, _, args) => 1 - i32::from(*args),
            Command::Return => return None,
        };
        Some(delta)
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Arithmetic(op) => f.write_str(op.name()),
            Command::Comparison(op) => f.write_str(op.name()),
            Command::MemoryAccess(Direction::Push, seg, arg) => {
                write!(f, "push {} {}", seg.name(), arg)
            }
            Command::MemoryAccess(Direction::Pop, seg, arg) => {
                write!(f, "pop {} {}", seg.name(), arg)
            }
            Command::Branch(BranchKind::Label, sym) => write!(f, "label {}", sym),
            Command::Branch(BranchKind::Goto, sym) => write!(f, "goto {}", sym),
            Command::Branch(BranchKind::IfGoto, sym) => write!(f, "if-goto {}", sym),
            Command::FunctionControl(FunctionKind::Function, name, n) => {
                write!(f, "function {} {}", name, n)
            }
            Command::FunctionControl(FunctionKind::Call, name, n) => {
                write!(f, "call {} {}", name, n)
            }
            Command::Return => f.write_str("return"),
        }
    }
}

#[test]
fn test_display_round_trips_source_form() {
    let cmd = Command::MemoryAccess(Direction::Pop, Segment::Pointer, 1);
    assert_eq!(cmd.to_string(), "pop pointer 1");
    let cmd = Command::Branch(BranchKind::IfGoto, "LOOP".to_string());
    assert_eq!(cmd.to_string(), "if-goto LOOP");
}

#[test]
fn test_stack_effects() {
    use Command::*;
    assert_eq!(Arithmetic(ArithmeticOp::Add).stack_effect(), Some(-1));
    assert_eq!(Arithmetic(ArithmeticOp::Not).stack_effect(), Some(0));
    assert_eq!(Comparison(ComparisonOp::Lt).stack_effect(), Some(-1));
    assert_eq!(
        FunctionControl(FunctionKind::Call, "F".into(), 3).stack_effect(),
        Some(-2)
    );
    assert_eq!(
        FunctionControl(FunctionKind::Function, "F".into(), 4).stack_effect(),
        Some(4)
    );
    assert_eq!(Return.stack_effect(), None);
}
