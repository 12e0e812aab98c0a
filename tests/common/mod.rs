//! A small Hack CPU that runs translator output directly, so tests can check
//! behaviour rather than text.

#![allow(dead_code)]

use std::collections::HashMap;

use vmtrans::asm::{Address, Comp, Dest, Instruction, Jump};

pub const SP: usize = 0;
pub const LCL: usize = 1;
pub const ARG: usize = 2;
pub const THIS: usize = 3;
pub const THAT: usize = 4;

const FIRST_VARIABLE: u16 = 16;

#[derive(Debug, Clone, Copy)]
enum Op {
    Load(u16),
    Compute {
        dest: Option<Dest>,
        comp: Comp,
        jump: Option<Jump>,
    },
}

pub struct Hack {
    rom: Vec<Op>,
    labels: HashMap<String, u16>,
    symbols: HashMap<String, u16>,
    pub ram: Vec<i16>,
    pc: usize,
    a: i16,
    d: i16,
}

fn predefined() -> HashMap<String, u16> {
    let mut symbols: HashMap<String, u16> = [
        ("SP", 0),
        ("LCL", 1),
        ("ARG", 2),
        ("THIS", 3),
        ("THAT", 4),
        ("SCREEN", 16384),
        ("KBD", 24576),
    ]
    .into_iter()
    .map(|(name, addr)| (name.to_string(), addr))
    .collect();
    for r in 0..16 {
        symbols.insert(format!("R{}", r), r);
    }
    symbols
}

impl Hack {
    pub fn new(program: &[Instruction]) -> Self {
        let mut labels = HashMap::new();
        let mut address = 0u16;
        for instruction in program {
            match instruction {
                Instruction::Label(name) => {
                    let previous = labels.insert(name.clone(), address);
                    assert!(previous.is_none(), "duplicate label {}", name);
                }
                i if i.is_code() => address += 1,
                _ => {}
            }
        }

        let mut symbols = predefined();
        let mut next_variable = FIRST_VARIABLE;
        let mut rom = vec![];
        for instruction in program {
            match instruction {
                Instruction::At(Address::Constant(value)) => rom.push(Op::Load(*value)),
                Instruction::At(Address::Symbol(name)) => {
                    let value = match labels.get(name) {
                        Some(addr) => *addr,
                        None => *symbols.entry(name.clone()).or_insert_with(|| {
                            next_variable += 1;
                            next_variable - 1
                        }),
                    };
                    rom.push(Op::Load(value));
                }
                Instruction::Compute { dest, comp, jump } => rom.push(Op::Compute {
                    dest: *dest,
                    comp: *comp,
                    jump: *jump,
                }),
                Instruction::Label(_) | Instruction::Comment(_) => {}
            }
        }

        Hack {
            rom,
            labels,
            symbols,
            ram: vec![0; 1 << 16],
            pc: 0,
            a: 0,
            d: 0,
        }
    }

    pub fn label(&self, name: &str) -> Option<usize> {
        self.labels.get(name).map(|addr| *addr as usize)
    }

    /// RAM address assigned to a variable symbol such as `Main.0`.
    pub fn variable(&self, name: &str) -> Option<usize> {
        self.symbols.get(name).map(|addr| *addr as usize)
    }

    pub fn sp(&self) -> i16 {
        self.ram[SP]
    }

    pub fn top(&self) -> i16 {
        self.ram[(self.sp() - 1) as u16 as usize]
    }

    pub fn halted(&self) -> bool {
        self.pc >= self.rom.len()
    }

    fn m(&self) -> i16 {
        self.ram[self.a as u16 as usize]
    }

    fn eval(&self, comp: Comp) -> i16 {
        let (a, d, m) = (self.a, self.d, self.m());
        match comp {
            Comp::Zero => 0,
            Comp::MinusOne => -1,
            Comp::A => a,
            Comp::D => d,
            Comp::M => m,
            Comp::NotM => !m,
            Comp::NegM => m.wrapping_neg(),
            Comp::APlusOne => a.wrapping_add(1),
            Comp::AMinusOne => a.wrapping_sub(1),
            Comp::MPlusOne => m.wrapping_add(1),
            Comp::MMinusOne => m.wrapping_sub(1),
            Comp::DPlusA => d.wrapping_add(a),
            Comp::DPlusM => d.wrapping_add(m),
            Comp::DMinusA => d.wrapping_sub(a),
            Comp::MMinusD => m.wrapping_sub(d),
            Comp::DAndM => d & m,
            Comp::DOrM => d | m,
        }
    }

    pub fn step(&mut self) {
        match self.rom[self.pc] {
            Op::Load(value) => {
                self.a = value as i16;
                self.pc += 1;
            }
            Op::Compute { dest, comp, jump } => {
                let value = self.eval(comp);
                let address = self.a as u16 as usize;
                match dest {
                    Some(Dest::A) => self.a = value,
                    Some(Dest::D) => self.d = value,
                    Some(Dest::M) => self.ram[address] = value,
                    Some(Dest::AM) => {
                        self.ram[address] = value;
                        self.a = value;
                    }
                    None => {}
                }
                let taken = match jump {
                    None => false,
                    Some(Jump::JEQ) => value == 0,
                    Some(Jump::JGT) => value > 0,
                    Some(Jump::JLT) => value < 0,
                    Some(Jump::JNE) => value != 0,
                    Some(Jump::JMP) => true,
                };
                if taken {
                    self.pc = self.a as u16 as usize;
                } else {
                    self.pc += 1;
                }
            }
        }
    }

    /// Run until the program falls off the end of ROM.
    pub fn run(&mut self, max_steps: usize) {
        for _ in 0..max_steps {
            if self.halted() {
                return;
            }
            self.step();
        }
        panic!("program did not halt within {} steps", max_steps);
    }

    /// Run until the program counter reaches `label`.
    pub fn run_until(&mut self, label: &str, max_steps: usize) {
        let target = self
            .label(label)
            .unwrap_or_else(|| panic!("no label {}", label));
        for _ in 0..max_steps {
            if self.pc == target {
                return;
            }
            assert!(!self.halted(), "halted before reaching {}", label);
            self.step();
        }
        panic!("did not reach {} within {} steps", label, max_steps);
    }
}

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}
