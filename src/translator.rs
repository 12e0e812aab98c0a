use crate::{
    asm::{at_c, at_s, comment, jump, label, set, Comp::{self, *}, Dest, Instruction, Jump},
    ast::{
        ArithmeticOp, BranchKind, Command, ComparisonOp, Direction, FunctionKind,
        Segment::{self, *},
    },
    config::Options,
    context::TranslationContext,
    error::TranslateError,
};

/// Base address of the stack.
pub const STACK_BASE: u16 = 256;
/// First register of the temp window.
pub const TEMP_BASE: u32 = 5;
/// Scratch register used by the generated code.
const SCRATCH: &str = "R13";
/// Words in a saved frame: return address plus four base pointers.
const FRAME_SIZE: u16 = 5;

fn pointer_arg(arg: u16) -> Result<&'static str, TranslateError> {
    match arg {
        0 => Ok("THIS"),
        1 => Ok("THAT"),
        _ => Err(TranslateError::PointerIndex(arg)),
    }
}

/// *SP = D; SP++
fn push_d() -> Vec<Instruction> {
    vec![
        at_s("SP"),
        set(Dest::M, MPlusOne),
        set(Dest::A, MMinusOne), // Don't need to refetch SP; this is safe
        set(Dest::M, D),
    ]
}

/// SP--; D = *SP
fn pop_d() -> Vec<Instruction> {
    vec![at_s("SP"), set(Dest::AM, MMinusOne), set(Dest::D, M)]
}

/// Push microcode for the four pointer-based segments
fn seg_push(base: &str, arg: u16) -> Vec<Instruction> {
    let mut block = vec![
        at_s(base),
        set(Dest::D, M),
        at_c(arg),
        set(Dest::A, DPlusA), // A = SEG+arg
        set(Dest::D, M),
    ];
    block.extend(push_d());
    block
}

fn seg_push_direct(sym: String) -> Vec<Instruction> {
    let mut block = vec![at_s(sym), set(Dest::D, M)];
    block.extend(push_d());
    block
}

fn seg_pop(base: &str, arg: u16) -> Vec<Instruction> {
    let mut block = vec![
        at_s(base),
        set(Dest::D, M),
        at_c(arg),
        set(Dest::D, DPlusA),
        at_s(SCRATCH),
        set(Dest::M, D), // Store target addr in R13
    ];
    block.extend(pop_d());
    block.extend([
        at_s(SCRATCH),
        set(Dest::A, M), // At the target address...
        set(Dest::M, D), // ... store the popped val
    ]);
    block
}

fn seg_pop_direct(sym: String) -> Vec<Instruction> {
    let mut block = pop_d();
    block.extend([at_s(sym), set(Dest::M, D)]);
    block
}

fn simple_un_op(comp: Comp) -> Vec<Instruction> {
    vec![at_s("SP"), set(Dest::A, MMinusOne), set(Dest::M, comp)]
}

// i.e. no conditions or jumps, just pop and run
fn simple_bin_op(comp: Comp) -> Vec<Instruction> {
    let mut block = pop_d(); // Right arg in D
    block.extend([
        set(Dest::A, AMinusOne), // Looking at second arg of stack, will overwrite
        set(Dest::M, comp),
    ]);
    block
}

fn arithmetic(op: ArithmeticOp) -> Vec<Instruction> {
    match op {
        ArithmeticOp::Add => simple_bin_op(DPlusM),
        ArithmeticOp::Sub => simple_bin_op(MMinusD),
        ArithmeticOp::And => simple_bin_op(DAndM),
        ArithmeticOp::Or => simple_bin_op(DOrM),
        ArithmeticOp::Neg => simple_un_op(NegM),
        ArithmeticOp::Not => simple_un_op(NotM),
    }
}

/// Generates Hack assembly for one command at a time, threading a
/// [`TranslationContext`] through the whole run.
#[derive(Debug, Default)]
pub struct Translator {
    context: TranslationContext,
    options: Options,
}

impl Translator {
    pub fn new(options: Options) -> Self {
        Translator {
            context: TranslationContext::new(),
            options,
        }
    }

    pub fn context(&self) -> &TranslationContext {
        &self.context
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    pub fn begin_unit(&mut self, unit: &str) {
        self.context.begin_unit(unit);
    }

    /// SP = 256, optionally followed by a call to the entry function.
    pub fn bootstrap(&mut self) -> Vec<Instruction> {
        let mut block = vec![
            at_c(STACK_BASE),
            set(Dest::D, A),
            at_s("SP"),
            set(Dest::M, D),
        ];
        if self.options.call_entry {
            let entry = self.options.entry_function();
            if self.options.annotate {
                block.push(comment(format!("call {} 0", entry)));
            }
            block.extend(self.call(&entry, 0));
        }
        block
    }

    fn push(&self, segment: Segment, arg: u16) -> Result<Vec<Instruction>, TranslateError> {
        let block = match segment {
            Constant => {
                let mut block = vec![at_c(arg), set(Dest::D, A)];
                block.extend(push_d());
                block
            }
            Local => seg_push("LCL", arg),
            Argument => seg_push("ARG", arg),
            This => seg_push("THIS", arg),
            That => seg_push("THAT", arg),
            Static => seg_push_direct(self.context.static_symbol(arg)),
            Temp => seg_push_direct(format!("R{}", TEMP_BASE + u32::from(arg))),
            Pointer => seg_push_direct(pointer_arg(arg)?.to_string()),
        };
        Ok(block)
    }

    fn pop(&self, segment: Segment, arg: u16) -> Result<Vec<Instruction>, TranslateError> {
        let block = match segment {
            Constant => return Err(TranslateError::PopConstant),
            Local => seg_pop("LCL", arg),
            Argument => seg_pop("ARG", arg),
            This => seg_pop("THIS", arg),
            That => seg_pop("THAT", arg),
            Static => seg_pop_direct(self.context.static_symbol(arg)),
            Temp => seg_pop_direct(format!("R{}", TEMP_BASE + u32::from(arg))),
            Pointer => seg_pop_direct(pointer_arg(arg)?.to_string()),
        };
        Ok(block)
    }

    fn compare(&mut self, op: ComparisonOp) -> Vec<Instruction> {
        let (name, jmp) = match op {
            ComparisonOp::Eq => ("EQ", Jump::JEQ),
            ComparisonOp::Gt => ("GT", Jump::JGT),
            ComparisonOp::Lt => ("LT", Jump::JLT),
        };
        let sym = self.context.next_comparison();
        let true_sym = format!("{}_TRUE_{}", name, sym);
        let end_sym = format!("{}_END_{}", name, sym);

        let mut block = pop_d(); // Right arg in D
        block.extend([
            set(Dest::A, AMinusOne), // Looking at second arg of stack, will overwrite
            set(Dest::D, MMinusD),
            at_s(true_sym.clone()),
            jump(D, jmp),
            set(Dest::D, Zero),
            at_s(end_sym.clone()),
            jump(Zero, Jump::JMP),
            label(true_sym),
            set(Dest::D, MinusOne),
            label(end_sym),
            at_s("SP"),
            set(Dest::A, MMinusOne),
            set(Dest::M, D),
        ]);
        block
    }

    fn goto(&self, sym: &str) -> Vec<Instruction> {
        vec![
            at_s(self.context.label_symbol(sym)),
            jump(Zero, Jump::JMP), // Unconditional jump
        ]
    }

    fn if_goto(&self, sym: &str) -> Vec<Instruction> {
        let mut block = pop_d(); // Stack popped into D
        block.extend([
            at_s(self.context.label_symbol(sym)),
            jump(D, Jump::JNE), // False is 0
        ]);
        block
    }

    fn function(&mut self, name: &str, locals: u16) -> Vec<Instruction> {
        self.context.begin_function(name);
        let mut block = vec![label(name)];
        for _ in 0..locals {
            block.extend([
                at_s("SP"),
                set(Dest::M, MPlusOne),
                set(Dest::A, MMinusOne),
                set(Dest::M, Zero),
            ]);
        }
        block
    }

    fn call(&mut self, name: &str, args: u16) -> Vec<Instruction> {
        let ret_sym = format!("{}$ret.{}", name, self.context.next_call());

        let mut block = vec![at_s(ret_sym.clone()), set(Dest::D, A)];
        block.extend(push_d());
        for reg in ["LCL", "ARG", "THIS", "THAT"] {
            block.extend([at_s(reg), set(Dest::D, M)]);
            block.extend(push_d());
        }
        block.extend([
            // ARG = SP - args - 5
            at_s("SP"),
            set(Dest::D, M),
            at_c(args),
            set(Dest::D, DMinusA),
            at_c(FRAME_SIZE),
            set(Dest::D, DMinusA),
            at_s("ARG"),
            set(Dest::M, D),
            // LCL = SP
            at_s("SP"),
            set(Dest::D, M),
            at_s("LCL"),
            set(Dest::M, D),
            at_s(name),
            jump(Zero, Jump::JMP),
            label(ret_sym),
        ]);
        block
    }

    fn ret(&self) -> Vec<Instruction> {
        let mut block = vec![
            // R13 = *(LCL - 5), read before ARG[0] can overwrite it
            at_s("LCL"),
            set(Dest::D, M),
            at_c(FRAME_SIZE),
            set(Dest::A, DMinusA),
            set(Dest::D, M),
            at_s(SCRATCH),
            set(Dest::M, D),
            // *ARG = top of stack
            at_s("SP"),
            set(Dest::A, MMinusOne),
            set(Dest::D, M),
            at_s("ARG"),
            set(Dest::A, M),
            set(Dest::M, D),
            // SP = ARG + 1
            set(Dest::D, APlusOne),
            at_s("SP"),
            set(Dest::M, D),
        ];
        // LCL walks down the saved frame, restoring THAT, THIS, ARG
        for reg in ["THAT", "THIS", "ARG"] {
            block.extend([
                at_s("LCL"),
                set(Dest::AM, MMinusOne),
                set(Dest::D, M),
                at_s(reg),
                set(Dest::M, D),
            ]);
        }
        block.extend([
            at_s("LCL"),
            set(Dest::A, MMinusOne),
            set(Dest::D, M),
            at_s("LCL"),
            set(Dest::M, D),
            at_s(SCRATCH),
            set(Dest::A, M),
            jump(Zero, Jump::JMP),
        ]);
        block
    }

    /// Translate a single command, updating the context.
    pub fn translate(&mut self, command: &Command) -> Result<Vec<Instruction>, TranslateError> {
        let translated = match command {
            Command::Arithmetic(op) => arithmetic(*op),
            Command::Comparison(op) => self.compare(*op),
            Command::MemoryAccess(Direction::Push, seg, arg) => self.push(*seg, *arg)?,
            Command::MemoryAccess(Direction::Pop, seg, arg) => self.pop(*seg, *arg)?,
            Command::Branch(BranchKind::Label, sym) => vec![label(self.context.label_symbol(sym))],
            Command::Branch(BranchKind::Goto, sym) => self.goto(sym),
            Command::Branch(BranchKind::IfGoto, sym) => self.if_goto(sym),
            Command::FunctionControl(FunctionKind::Function, name, locals) => {
                self.function(name, *locals)
            }
            Command::FunctionControl(FunctionKind::Call, name, args) => self.call(name, *args),
            Command::Return => self.ret(),
        };

        if self.options.annotate {
            let mut block = vec![comment(command.to_string())];
            block.extend(translated);
            Ok(block)
        } else {
            Ok(translated)
        }
    }
}
