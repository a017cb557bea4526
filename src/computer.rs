use std::{fmt::Display, ops::ControlFlow, str::FromStr};

use int_enum::IntEnum;
use log::trace;

use crate::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, IntEnum)]
#[repr(usize)]
pub enum RegisterName {
    A = 0,
    B = 1,
    C = 2,
}

impl Display for RegisterName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            RegisterName::A => 'A',
            RegisterName::B => 'B',
            RegisterName::C => 'C',
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Registers([u64; 3]);

impl Display for Registers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "A: {}, B: {}, C: {}", self.0[0], self.0[1], self.0[2])
    }
}

impl Registers {
    pub fn new(a: u64, b: u64, c: u64) -> Self {
        Self([a, b, c])
    }

    pub fn reg(&self, name: RegisterName) -> u64 {
        self.0[usize::from(name)]
    }

    pub fn reg_mut(&mut self, name: RegisterName) -> &mut u64 {
        &mut self.0[usize::from(name)]
    }

    pub fn with_reg(mut self, name: RegisterName, value: u64) -> Self {
        *self.reg_mut(name) = value;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Program {
    codes: Vec<usize>,
}

impl TryFrom<Vec<usize>> for Program {
    type Error = Error;

    fn try_from(codes: Vec<usize>) -> Result<Self, Self::Error> {
        if codes.len() % 2 != 0 {
            return Err(Error::MalformedProgram(codes.len()));
        }

        Ok(Self { codes })
    }
}

/// Parses comma separated codes, like `0,1,5,4,3,0`.
impl FromStr for Program {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.split(',')
            .map(|code_text| {
                let code_text = code_text.trim();
                code_text
                    .parse::<usize>()
                    .map_err(|_| Error::InvalidCode(code_text.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()
            .and_then(Self::try_from)
    }
}

impl Program {
    pub fn codes(&self) -> &[usize] {
        &self.codes
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// Operation code and operand at `inst_ptr`, `None` once the computer should halt.
    fn fetch(&self, inst_ptr: usize) -> Option<(usize, usize)> {
        if inst_ptr + 1 < self.codes.len() {
            Some((self.codes[inst_ptr], self.codes[inst_ptr + 1]))
        } else {
            None
        }
    }
}

/// State after executing a single instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    pub registers: Registers,
    pub inst_ptr: usize,
    pub output: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, IntEnum)]
#[repr(usize)]
pub enum Instruction {
    Adv = 0,
    Bxl = 1,
    Bst = 2,
    Jnz = 3,
    Bxc = 4,
    Out = 5,
    Bdv = 6,
    Cdv = 7,
}

impl Instruction {
    pub fn decode(opcode: usize) -> Result<Self, Error> {
        Self::try_from(opcode).map_err(Error::InvalidOpcode)
    }

    pub fn execute(
        self,
        operand: usize,
        registers: &Registers,
        inst_ptr: usize,
    ) -> Result<Step, Error> {
        let mut next_registers = *registers;
        let mut next_inst_ptr = inst_ptr + 2;
        let mut output = None;
        match self {
            Instruction::Adv => {
                *next_registers.reg_mut(RegisterName::A) = Self::shift_a(operand, registers)?
            }
            Instruction::Bxl => *next_registers.reg_mut(RegisterName::B) ^= operand as u64,
            Instruction::Bst => {
                *next_registers.reg_mut(RegisterName::B) = combo_operand(operand, registers)? % 8
            }
            Instruction::Jnz => {
                if registers.reg(RegisterName::A) != 0 {
                    if operand % 2 != 0 {
                        return Err(Error::MisalignedJump(operand));
                    }
                    next_inst_ptr = operand;
                }
            }
            Instruction::Bxc => {
                *next_registers.reg_mut(RegisterName::B) ^= registers.reg(RegisterName::C)
            }
            Instruction::Out => {
                output = Some((combo_operand(operand, registers)? % 8) as usize)
            }
            Instruction::Bdv => {
                *next_registers.reg_mut(RegisterName::B) = Self::shift_a(operand, registers)?
            }
            Instruction::Cdv => {
                *next_registers.reg_mut(RegisterName::C) = Self::shift_a(operand, registers)?
            }
        }

        Ok(Step {
            registers: next_registers,
            inst_ptr: next_inst_ptr,
            output,
        })
    }

    // A / 2^combo, truncated. Shifting by 64 or more leaves nothing.
    fn shift_a(operand: usize, registers: &Registers) -> Result<u64, Error> {
        let shift = combo_operand(operand, registers)?;
        Ok(registers
            .reg(RegisterName::A)
            .checked_shr(u32::try_from(shift).unwrap_or(u32::MAX))
            .unwrap_or(0))
    }
}

pub fn combo_operand(operand: usize, registers: &Registers) -> Result<u64, Error> {
    match operand {
        0..=3 => Ok(operand as u64),
        4 => Ok(registers.reg(RegisterName::A)),
        5 => Ok(registers.reg(RegisterName::B)),
        6 => Ok(registers.reg(RegisterName::C)),
        7 => Err(Error::InvalidOperand(operand)),
        other => Err(Error::OperandOutOfRange(other)),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Halted,
    Interrupted,
}

#[derive(Debug)]
pub struct Computer {
    registers: Registers,
    output: Vec<usize>,
    step_count: usize,
}

impl Computer {
    pub fn new(registers: Registers) -> Self {
        Self {
            registers,
            output: Vec::new(),
            step_count: 0,
        }
    }

    pub fn run(&mut self, program: &Program) -> Result<(), Error> {
        self.run_until(program, |_| ControlFlow::Continue(()))
            .map(|_| ())
    }

    /// Runs `program` from its first instruction, handing the output so far to
    /// `on_output` after each emitted value. Breaking from `on_output` stops
    /// the run right there.
    pub fn run_until<F>(&mut self, program: &Program, mut on_output: F) -> Result<RunState, Error>
    where
        F: FnMut(&[usize]) -> ControlFlow<()>,
    {
        let mut inst_ptr = 0;
        while let Some((opcode, operand)) = program.fetch(inst_ptr) {
            let inst = Instruction::decode(opcode)?;
            let step = inst.execute(operand, &self.registers, inst_ptr)?;
            trace!(
                "Step #{}: {:?} {} @ {}, registers({}).",
                self.step_count,
                inst,
                operand,
                inst_ptr,
                step.registers
            );

            self.registers = step.registers;
            inst_ptr = step.inst_ptr;
            self.step_count += 1;
            if let Some(n) = step.output {
                self.output.push(n);
                if on_output(&self.output).is_break() {
                    return Ok(RunState::Interrupted);
                }
            }
        }

        Ok(RunState::Halted)
    }

    pub fn registers(&self) -> &Registers {
        &self.registers
    }

    pub fn output(&self) -> &[usize] {
        &self.output
    }

    pub fn step_count(&self) -> usize {
        self.step_count
    }
}

pub fn run_program(registers: Registers, program: &Program) -> Result<Vec<usize>, Error> {
    let mut computer = Computer::new(registers);
    computer.run(program)?;
    Ok(computer.output)
}
