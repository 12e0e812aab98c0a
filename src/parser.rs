use nom::{
    branch::alt,
    bytes::complete::{is_a, tag},
    character::{complete::digit1, is_digit},
    combinator::{all_consuming, map, map_res, value, verify},
    IResult,
};

use crate::{
    ast::{
        ArithmeticOp, BranchKind, Command, ComparisonOp, Direction, FunctionKind,
        Segment::{self, *},
    },
    error::ParseError,
};

#[derive(Debug, PartialEq, Clone, Copy)]
enum Opcode {
    Arithmetic(ArithmeticOp),
    Comparison(ComparisonOp),
    Memory(Direction),
    Branch(BranchKind),
    Function(FunctionKind),
    Return,
}

impl Opcode {
    fn name(self) -> &'static str {
        match self {
            Opcode::Arithmetic(op) => op.name(),
            Opcode::Comparison(op) => op.name(),
            Opcode::Memory(Direction::Push) => "push",
            Opcode::Memory(Direction::Pop) => "pop",
            Opcode::Branch(BranchKind::Label) => "label",
            Opcode::Branch(BranchKind::Goto) => "goto",
            Opcode::Branch(BranchKind::IfGoto) => "if-goto",
            Opcode::Function(FunctionKind::Function) => "function",
            Opcode::Function(FunctionKind::Call) => "call",
            Opcode::Return => "return",
        }
    }

    fn arity(self) -> usize {
        match self {
            Opcode::Arithmetic(_) | Opcode::Comparison(_) | Opcode::Return => 0,
            Opcode::Branch(_) => 1,
            Opcode::Memory(_) | Opcode::Function(_) => 2,
        }
    }
}

/// Largest value an A-instruction can load.
pub const MAX_INTEGER: u16 = 0x7fff;

fn integer(input: &str) -> IResult<&str, u16> {
    verify(map_res(digit1, |c: &str| c.parse()), |v: &u16| *v <= MAX_INTEGER)(input)
}

#[test]
fn test_integer() {
    assert_eq!(integer("32767"), Ok(("", 32767)));
    assert!(integer("32768").is_err());
    assert!(integer("65535").is_err());
    assert!(integer("70000").is_err());
    assert!(integer("-1").is_err());
}

fn segment(input: &str) -> IResult<&str, Segment> {
    alt((
        value(Constant, tag("constant")),
        value(Local, tag("local")),
        value(Static, tag("static")),
        value(Argument, tag("argument")),
        value(This, tag("this")),
        value(That, tag("that")),
        value(Pointer, tag("pointer")),
        value(Temp, tag("temp")),
    ))(input)
}

fn arithmetic(input: &str) -> IResult<&str, Opcode> {
    map(
        alt((
            value(ArithmeticOp::Add, tag("add")),
            value(ArithmeticOp::Sub, tag("sub")),
            value(ArithmeticOp::Neg, tag("neg")),
            value(ArithmeticOp::And, tag("and")),
            value(ArithmeticOp::Or, tag("or")),
            value(ArithmeticOp::Not, tag("not")),
        )),
        Opcode::Arithmetic,
    )(input)
}

fn comparison(input: &str) -> IResult<&str, Opcode> {
    map(
        alt((
            value(ComparisonOp::Eq, tag("eq")),
            value(ComparisonOp::Gt, tag("gt")),
            value(ComparisonOp::Lt, tag("lt")),
        )),
        Opcode::Comparison,
    )(input)
}

fn control(input: &str) -> IResult<&str, Opcode> {
    alt((
        value(Opcode::Memory(Direction::Push), tag("push")),
        value(Opcode::Memory(Direction::Pop), tag("pop")),
        value(Opcode::Branch(BranchKind::Label), tag("label")),
        value(Opcode::Branch(BranchKind::Goto), tag("goto")),
        value(Opcode::Branch(BranchKind::IfGoto), tag("if-goto")),
        value(Opcode::Function(FunctionKind::Function), tag("function")),
        value(Opcode::Function(FunctionKind::Call), tag("call")),
        value(Opcode::Return, tag("return")),
    ))(input)
}

fn opcode(input: &str) -> IResult<&str, Opcode> {
    alt((arithmetic, comparison, control))(input)
}

#[test]
fn test_opcode() {
    assert_eq!(
        opcode("neg"),
        Ok(("", Opcode::Arithmetic(ArithmeticOp::Neg)))
    );
    assert_eq!(
        opcode("if-goto"),
        Ok(("", Opcode::Branch(BranchKind::IfGoto)))
    );
}

// `$` is left out: the translator uses it to scope labels.
fn symbol(input: &str) -> IResult<&str, String> {
    map(
        verify(
            is_a("abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ_.:0123456789"),
            |c: &str| !is_digit(c.as_bytes()[0]),
        ),
        |sym: &str| sym.to_string(),
    )(input)
}

#[test]
fn test_symbol() {
    assert_eq!(symbol("Main.fib:LOOP"), Ok(("", "Main.fib:LOOP".to_string())));
    assert!(symbol("1abc").is_err());
    assert_eq!(symbol("Foo$LOOP"), Ok(("$LOOP", "Foo".to_string())));
}

/// Runs `parser` over a whole whitespace-delimited token.
fn whole<'a, O>(parser: impl FnMut(&'a str) -> IResult<&'a str, O>, token: &'a str) -> Option<O> {
    all_consuming(parser)(token).ok().map(|(_, out)| out)
}

fn strip_comment(line: &str) -> &str {
    line.split_once("//").map(|(s, _)| s).unwrap_or(line)
}

/// Classify one raw source line. Blank and comment-only lines yield `None`.
pub fn parse_line(line: &str) -> Result<Option<Command>, ParseError> {
    let mut tokens = strip_comment(line).split_whitespace();
    let Some(head) = tokens.next() else {
        return Ok(None);
    };
    let operands: Vec<&str> = tokens.collect();

    let op = whole(opcode, head).ok_or_else(|| ParseError::UnknownCommand(head.to_string()))?;
    if operands.len() != op.arity() {
        return Err(ParseError::Arity {
            command: op.name(),
            expected: op.arity(),
            found: operands.len(),
        });
    }

    let seg = |token: &str| {
        whole(segment, token).ok_or_else(|| ParseError::InvalidSegment(token.to_string()))
    };
    let int = |token: &str| {
        whole(integer, token).ok_or_else(|| ParseError::InvalidInteger(token.to_string()))
    };
    let sym = |token: &str| {
        whole(symbol, token).ok_or_else(|| ParseError::InvalidSymbol(token.to_string()))
    };

    let command = match op {
        Opcode::Arithmetic(op) => Command::Arithmetic(op),
        Opcode::Comparison(op) => Command::Comparison(op),
        Opcode::Memory(dir) => Command::MemoryAccess(dir, seg(operands[0])?, int(operands[1])?),
        Opcode::Branch(kind) => Command::Branch(kind, sym(operands[0])?),
        Opcode::Function(kind) => {
            Command::FunctionControl(kind, sym(operands[0])?, int(operands[1])?)
        }
        Opcode::Return => Command::Return,
    };

    Ok(Some(command))
}
