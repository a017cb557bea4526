use std::{
    error,
    fmt::Display,
    fs::File,
    io::{BufRead, BufReader},
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use clap::{Args, Parser};

pub mod computer;
pub mod search;

use computer::{Program, RegisterName, Registers};
use search::SearchStrategy;

#[derive(Debug)]
pub enum Error {
    NoRegisterLine(RegisterName),
    NoProgram,
    InvalidRegisterText(String),
    InvalidRegisterValue(String),
    InvalidProgramText(String),
    InvalidCode(String),
    MalformedProgram(usize),
    InvalidOpcode(usize),
    InvalidOperand(usize),
    OperandOutOfRange(usize),
    MisalignedJump(usize),
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::NoRegisterLine(name) => write!(
                f,
                "Can't find line for register {} in debug information.",
                name
            ),
            Error::NoProgram => write!(f, "Can't find line for program in debug information."),
            Error::InvalidRegisterText(s) => write!(f, "Invalid text({}) for register.", s),
            Error::InvalidRegisterValue(s) => write!(f, "Invalid text({}) for register value.", s),
            Error::InvalidProgramText(s) => write!(f, "Invalid text({}) for program.", s),
            Error::InvalidCode(s) => write!(f, "Invalid text({}) for code.", s),
            Error::MalformedProgram(n) => write!(
                f,
                "Program has {} code(s), expect pairs of operation code and operand.",
                n
            ),
            Error::InvalidOpcode(n) => write!(f, "Invalid operation code({}).", n),
            Error::InvalidOperand(n) => write!(f, "Invalid combo operand({}).", n),
            Error::OperandOutOfRange(n) => write!(f, "Operand({}) is out of range 0..=7.", n),
            Error::MisalignedJump(n) => write!(
                f,
                "Jump target({}) doesn't point at an operation code.",
                n
            ),
        }
    }
}

impl error::Error for Error {}

#[derive(Debug, Args)]
pub struct InputArgs {
    pub input_path: PathBuf,
    /// Log search progress and other debug information to stderr
    #[arg(short, long)]
    pub debug: bool,
}

#[derive(Debug, Args)]
pub struct SearchArgs {
    #[arg(long, value_enum, default_value_t = SearchStrategy::Octal)]
    pub strategy: SearchStrategy,
    /// Give up after trying this many values of register A
    #[arg(long)]
    pub max_candidates: Option<u64>,
}

#[derive(Debug, Parser)]
pub struct CLIArgs {
    #[command(flatten)]
    pub input: InputArgs,
}

#[derive(Debug, Parser)]
pub struct SearchCLIArgs {
    #[command(flatten)]
    pub input: InputArgs,
    #[command(flatten)]
    pub search: SearchArgs,
}

/// Logs go to stderr. `RUST_LOG` overrides the level picked by `debug`.
pub fn init_logger(debug: bool) {
    let default_filter = if debug { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();
}

pub fn format_output(output: &[usize]) -> String {
    output
        .iter()
        .map(|n| format!("{}", n))
        .collect::<Vec<_>>()
        .join(",")
}

pub fn read_debug_info<P: AsRef<Path>>(path: P) -> Result<(Registers, Program)> {
    let file = File::open(&path)
        .with_context(|| format!("Failed to open given file({}).", path.as_ref().display()))?;
    let reader = BufReader::new(file);
    let mut lines = reader.lines().enumerate();
    let mut registers = Registers::default();

    for name in [RegisterName::A, RegisterName::B, RegisterName::C] {
        let (line_ind, line) = lines.next().ok_or(Error::NoRegisterLine(name))?;
        let line = line.with_context(|| {
            format!(
                "Failed to read line {} in given file({}).",
                line_ind + 1,
                path.as_ref().display()
            )
        })?;
        let value_text = field_text(&line, &format!("Register {}:", name))
            .ok_or_else(|| Error::InvalidRegisterText(line.clone()))?;
        *registers.reg_mut(name) = value_text
            .parse::<u64>()
            .map_err(|_| Error::InvalidRegisterValue(value_text.to_string()))?;
    }

    for (line_ind, line) in lines {
        let line = line.with_context(|| {
            format!(
                "Failed to read line {} in given file({}).",
                line_ind + 1,
                path.as_ref().display()
            )
        })?;
        if !line.trim().is_empty() {
            let program = field_text(&line, "Program:")
                .ok_or_else(|| Error::InvalidProgramText(line.clone()))?
                .parse::<Program>()?;
            return Ok((registers, program));
        }
    }

    Err(Error::NoProgram.into())
}

/// Text following `header` in `line`, e.g. the value of `Register A: 729`.
fn field_text<'a>(line: &'a str, header: &str) -> Option<&'a str> {
    line.trim_start().strip_prefix(header).map(str::trim)
}
