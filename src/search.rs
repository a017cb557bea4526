use std::ops::ControlFlow;

use clap::ValueEnum;
use log::{debug, info};

use crate::{
    computer::{Computer, Program, RegisterName, Registers, RunState},
    Error,
};

const MAX_BEST_CANDIDATES: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SearchStrategy {
    /// Fix register A one octal digit at a time, most significant digit first
    Octal,
    /// Try every value of register A counting up from 1
    Linear,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TargetMatch {
    pub matched_len: usize,
    pub exact: bool,
}

/// Runs `program` and compares its output against `target` as it's emitted,
/// stopping at the first value that differs.
pub fn match_target(
    registers: Registers,
    program: &Program,
    target: &[usize],
) -> Result<TargetMatch, Error> {
    let mut computer = Computer::new(registers);
    let mut matched_len = 0;
    let state = computer.run_until(program, |output| {
        if target.get(output.len() - 1) == output.last() {
            matched_len = output.len();
            ControlFlow::Continue(())
        } else {
            ControlFlow::Break(())
        }
    })?;

    Ok(TargetMatch {
        matched_len,
        exact: state == RunState::Halted && matched_len == target.len(),
    })
}

#[derive(Debug, Default)]
pub struct SearchProgress {
    tried: u64,
    from_tail: bool,
    best_len: usize,
    best_candidates: Vec<u64>,
}

impl SearchProgress {
    fn record(&mut self, candidate: u64, matched_len: usize) {
        self.tried += 1;
        if matched_len > self.best_len {
            self.best_len = matched_len;
            self.best_candidates.clear();
            self.best_candidates.push(candidate);
            debug!(
                "After {} candidate(s), register A {} reproduces the {} {} code(s) of the program.",
                self.tried,
                candidate,
                if self.from_tail { "last" } else { "first" },
                matched_len
            );
        } else if matched_len > 0
            && matched_len == self.best_len
            && self.best_candidates.len() < MAX_BEST_CANDIDATES
        {
            self.best_candidates.push(candidate);
        }
    }

    pub fn tried(&self) -> u64 {
        self.tried
    }

    /// Whether `best_len` counts codes from the end of the program rather
    /// than from its start.
    pub fn from_tail(&self) -> bool {
        self.from_tail
    }

    pub fn best_len(&self) -> usize {
        self.best_len
    }

    pub fn best_candidates(&self) -> &[u64] {
        &self.best_candidates
    }
}

#[derive(Debug)]
pub struct QuineSearch<'a> {
    registers: Registers,
    program: &'a Program,
    max_candidates: Option<u64>,
    progress: SearchProgress,
}

impl<'a> QuineSearch<'a> {
    pub fn new(registers: Registers, program: &'a Program) -> Self {
        Self {
            registers,
            program,
            max_candidates: None,
            progress: SearchProgress::default(),
        }
    }

    pub fn with_max_candidates(mut self, max_candidates: Option<u64>) -> Self {
        self.max_candidates = max_candidates;
        self
    }

    /// Least positive value of register A found by `strategy` that makes the
    /// program output itself. `None` when the strategy runs out of candidates
    /// or hits the candidate limit.
    pub fn find(&mut self, strategy: SearchStrategy) -> Result<Option<u64>, Error> {
        let found = match strategy {
            SearchStrategy::Octal if !self.program.is_empty() => {
                self.progress.from_tail = true;
                self.find_octal_from(self.program.len() - 1, 0)?
            }
            _ => {
                self.progress.from_tail = false;
                self.find_linear()?
            }
        };

        match found {
            Some(a) => info!(
                "Found register A {} after {} candidate(s).",
                a, self.progress.tried
            ),
            None => info!(
                "No register A found after {} candidate(s), best candidates {:?} reproduce {} code(s).",
                self.progress.tried, self.progress.best_candidates, self.progress.best_len
            ),
        }

        Ok(found)
    }

    pub fn progress(&self) -> &SearchProgress {
        &self.progress
    }

    fn find_octal_from(&mut self, target_ind: usize, prefix: u64) -> Result<Option<u64>, Error> {
        let Some(base) = prefix.checked_mul(8) else {
            return Ok(None);
        };
        let program = self.program;
        let target = &program.codes()[target_ind..];
        for digit in 0..8 {
            let candidate = base + digit;
            if target_ind == 0 && candidate == 0 {
                continue;
            }
            if self.is_exhausted() {
                return Ok(None);
            }

            if self.try_candidate(candidate, target)?.exact {
                if target_ind == 0 {
                    return Ok(Some(candidate));
                }
                if let Some(a) = self.find_octal_from(target_ind - 1, candidate)? {
                    return Ok(Some(a));
                }
            }
        }

        Ok(None)
    }

    fn find_linear(&mut self) -> Result<Option<u64>, Error> {
        let program = self.program;
        for candidate in 1..=u64::MAX {
            if self.is_exhausted() {
                return Ok(None);
            }
            if self.try_candidate(candidate, program.codes())?.exact {
                return Ok(Some(candidate));
            }
        }

        Ok(None)
    }

    fn try_candidate(&mut self, candidate: u64, target: &[usize]) -> Result<TargetMatch, Error> {
        let registers = self.registers.with_reg(RegisterName::A, candidate);
        let target_match = match_target(registers, self.program, target)?;
        // Digit by digit, a candidate reproduces the tail it targets or nothing.
        let reproduced_len = if self.progress.from_tail {
            if target_match.exact {
                target.len()
            } else {
                0
            }
        } else {
            target_match.matched_len
        };
        self.progress.record(candidate, reproduced_len);

        Ok(target_match)
    }

    fn is_exhausted(&self) -> bool {
        self.max_candidates
            .is_some_and(|max| self.progress.tried >= max)
    }
}

pub fn find_quine(
    registers: Registers,
    program: &Program,
    strategy: SearchStrategy,
    max_candidates: Option<u64>,
) -> Result<Option<u64>, Error> {
    QuineSearch::new(registers, program)
        .with_max_candidates(max_candidates)
        .find(strategy)
}
