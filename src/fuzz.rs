use rand::Rng;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use rayon::prelude::*;

use crate::error::Error;
use crate::input::NoInput;
use crate::interpreter::{EofPolicy, Interpreter, RunConfig};
use crate::token::ALPHABET;

/// Configuration for a fuzz campaign.
#[derive(Debug, Clone, Copy)]
pub struct FuzzConfig {
    /// Number of random programs to run.
    pub programs: usize,
    /// Number of instruction bytes per program.
    pub program_size: usize,
    /// Maximum steps per program.
    pub step_limit: usize,
    /// Programs run with no input, so this decides what `?` does.
    pub on_eof: EofPolicy,
}

impl Default for FuzzConfig {
    fn default() -> Self {
        Self {
            programs: 1 << 12, // 4096
            program_size: 64,
            step_limit: 1 << 13, // 8192
            on_eof: EofPolicy::Zero,
        }
    }
}

/// How a single fuzz program ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Completed,
    Unbalanced,
    StepLimited,
    InputExhausted,
    /// Any other error, such as a failing input source.
    Failed,
}

/// Tally of outcomes across a campaign.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FuzzReport {
    pub completed: usize,
    pub unbalanced: usize,
    pub step_limited: usize,
    pub input_exhausted: usize,
    pub failed: usize,
    /// Output of every completed program, concatenated in program order.
    pub output: Vec<u8>,
}

impl FuzzReport {
    pub fn total(&self) -> usize {
        self.completed + self.unbalanced + self.step_limited + self.input_exhausted + self.failed
    }

    fn record(&mut self, outcome: Outcome, output: Vec<u8>) {
        match outcome {
            Outcome::Completed => {
                self.completed += 1;
                self.output.extend_from_slice(&output);
            }
            Outcome::Unbalanced => self.unbalanced += 1,
            Outcome::StepLimited => self.step_limited += 1,
            Outcome::InputExhausted => self.input_exhausted += 1,
            Outcome::Failed => self.failed += 1,
        }
    }
}

/// A batch of random BFLX programs drawn from the instruction alphabet.
pub struct Fuzz {
    pub programs: Vec<Vec<u8>>,
    pub config: FuzzConfig,
}

impl Fuzz {
    /// Generate the programs for `config` deterministically from `seed`.
    pub fn new(config: FuzzConfig, seed: u64) -> Self {
        let mut rng = SmallRng::seed_from_u64(seed);
        let programs = (0..config.programs)
            .map(|_| {
                (0..config.program_size)
                    .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())])
                    .collect::<Vec<u8>>()
            })
            .collect();
        Self { programs, config }
    }

    /// Execute every program on a fresh interpreter with no input.
    ///
    /// Programs run in parallel; the report is assembled in program order so
    /// it is the same for a given seed regardless of scheduling.
    pub fn run(&self) -> FuzzReport {
        let run_config = RunConfig {
            step_limit: Some(self.config.step_limit),
            on_eof: self.config.on_eof,
        };

        let results: Vec<(Outcome, Vec<u8>)> = self
            .programs
            .par_iter()
            .map(|program| run_one(program, run_config))
            .collect();

        let mut report = FuzzReport::default();
        for (outcome, output) in results {
            report.record(outcome, output);
        }
        report
    }
}

fn run_one(program: &[u8], config: RunConfig) -> (Outcome, Vec<u8>) {
    match Interpreter::with_config(config).run(program, &mut NoInput) {
        Ok(output) => (Outcome::Completed, output),
        Err(Error::UnbalancedBrackets { .. }) => (Outcome::Unbalanced, Vec::new()),
        Err(Error::StepLimitExceeded { .. }) => (Outcome::StepLimited, Vec::new()),
        Err(Error::InputExhausted { .. }) => (Outcome::InputExhausted, Vec::new()),
        Err(e) => {
            crate::warn!("fuzz program failed: {e}");
            (Outcome::Failed, Vec::new())
        }
    }
}
