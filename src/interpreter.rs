use std::str::FromStr;

use crate::counter::GrowCursor;
use crate::error::{Error, Result};
use crate::input::Input;
use crate::program::Program;
use crate::tape::Tape;
use crate::token::Token;

/// Size of the scratch register bank.
pub const REGISTER_COUNT: usize = 16;

/// What `?` does once the input is exhausted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EofPolicy {
    /// Stop the run with [`Error::InputExhausted`].
    #[default]
    Fail,
    /// Store 0 in the cell and carry on.
    Zero,
}

impl FromStr for EofPolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "fail" => Ok(EofPolicy::Fail),
            "zero" => Ok(EofPolicy::Zero),
            other => Err(format!("unknown EOF policy '{other}', expected fail or zero")),
        }
    }
}

/// Per-run settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunConfig {
    /// Maximum number of tokens dispatched by one `run` (None for unbounded).
    pub step_limit: Option<usize>,
    pub on_eof: EofPolicy,
}

/// A BFLX interpreter.
///
/// Memory is a stack of tapes ("levels") plus a bank of 16 byte registers.
/// Every instruction acts on the current cell of the current level, or moves
/// between levels. State persists across calls to [`Interpreter::run`].
#[derive(Debug, Clone)]
pub struct Interpreter {
    registers: [u8; REGISTER_COUNT],
    register_index: usize,
    levels: Vec<Tape>,
    level: GrowCursor,
    config: RunConfig,
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

impl Interpreter {
    pub fn new() -> Self {
        Self::with_config(RunConfig::default())
    }

    pub fn with_config(config: RunConfig) -> Self {
        Self {
            registers: [0; REGISTER_COUNT],
            register_index: 0,
            levels: vec![Tape::new()],
            level: GrowCursor::new(),
            config,
        }
    }

    pub fn registers(&self) -> &[u8; REGISTER_COUNT] {
        &self.registers
    }

    pub fn register_index(&self) -> usize {
        self.register_index
    }

    pub fn level_index(&self) -> usize {
        self.level.index()
    }

    pub fn level_count(&self) -> usize {
        self.levels.len()
    }

    pub fn levels(&self) -> &[Tape] {
        &self.levels
    }

    /// The tape at the current level.
    #[inline(always)]
    pub fn tape(&self) -> &Tape {
        &self.levels[self.level.index()]
    }

    #[inline(always)]
    fn tape_mut(&mut self) -> &mut Tape {
        &mut self.levels[self.level.index()]
    }

    /// Move up one level, pushing a fresh tape if already at the top.
    pub fn level_up(&mut self) {
        if self.level.advance(&mut self.levels, Tape::new) {
            crate::debug!("level {} allocated", self.level.index());
        }
    }

    /// Move down one level, wrapping from the floor to the top.
    pub fn level_down(&mut self) {
        self.level.retreat(self.levels.len());
    }

    pub fn level_top(&mut self) {
        self.level.to_end(self.levels.len());
    }

    pub fn level_floor(&mut self) {
        self.level.to_start();
    }

    pub fn select_register(&mut self, index: usize) -> Result<()> {
        if index >= REGISTER_COUNT {
            return Err(Error::RegisterIndexOutOfRange(index));
        }
        self.register_index = index;
        Ok(())
    }

    /// Run `program` to completion and return everything it wrote.
    ///
    /// `?` pulls bytes from `input`. The scan position moves one token at a
    /// time; a taken bracket jump lands on the partner bracket and the scan
    /// then continues from the token after it. A loop back therefore resumes
    /// at the first token of the body without re-testing the `[`.
    pub fn run<I: Input + ?Sized>(&mut self, program: &[u8], input: &mut I) -> Result<Vec<u8>> {
        let program = Program::new(program);
        let mut out = Vec::new();
        let mut steps: usize = 0;
        let mut ix: usize = 0;

        while ix < program.len() {
            if let Some(limit) = self.config.step_limit {
                if steps >= limit {
                    return Err(Error::StepLimitExceeded { limit });
                }
            }
            steps += 1;

            let byte = program.byte(ix);
            crate::trace!(
                "ix:{ix} token:{} level:{} dx:{} rx:{}",
                byte.escape_ascii(),
                self.level.index(),
                self.tape().cursor(),
                self.register_index
            );

            let Some(token) = Token::decode(byte) else {
                ix += 1;
                continue;
            };

            match token {
                Token::LoopStart if self.tape().get() == 0 => {
                    ix = program.jump(ix).ok_or(Error::UnbalancedBrackets {
                        position: ix,
                        bracket: '[',
                    })?;
                    crate::debug!("skip loop to {ix}");
                }
                Token::LoopEnd if self.tape().get() != 0 => {
                    ix = program.jump(ix).ok_or(Error::UnbalancedBrackets {
                        position: ix,
                        bracket: ']',
                    })?;
                    crate::debug!("repeat loop from {ix}");
                }
                Token::LoopStart | Token::LoopEnd => {}
                Token::Register(n) => {
                    self.select_register(n as usize)?;
                    crate::debug!("register[{n}]={}", self.registers[self.register_index]);
                }
                Token::Store => {
                    self.registers[self.register_index] = self.tape().get();
                    crate::debug!(
                        "register[{}]={}",
                        self.register_index,
                        self.registers[self.register_index]
                    );
                }
                Token::Load => {
                    let value = self.registers[self.register_index];
                    crate::debug!(
                        "register[{}]={value} -> level:{}",
                        self.register_index,
                        self.level.index()
                    );
                    self.tape_mut().set(value);
                }
                Token::Increment => self.tape_mut().increment(),
                Token::Decrement => self.tape_mut().decrement(),
                Token::Forward => {
                    self.tape_mut().forward();
                }
                Token::Back => self.tape_mut().back(),
                Token::Start => self.tape_mut().reset_to_start(),
                Token::End => self.tape_mut().reset_to_end(),
                Token::LevelUp => self.level_up(),
                Token::LevelDown => self.level_down(),
                Token::LevelTop => self.level_top(),
                Token::LevelFloor => self.level_floor(),
                Token::Write => {
                    out.push(self.tape().get());
                    self.tape_mut().forward();
                }
                Token::WriteDecimal => {
                    out.extend_from_slice(self.tape().get().to_string().as_bytes());
                    self.tape_mut().forward();
                }
                Token::WritePadded => {
                    out.extend_from_slice(format!("{:03}", self.tape().get()).as_bytes());
                    self.tape_mut().forward();
                }
                Token::Read => {
                    let value = match input.read_byte()? {
                        Some(b) => b,
                        None => match self.config.on_eof {
                            EofPolicy::Fail => return Err(Error::InputExhausted { position: ix }),
                            EofPolicy::Zero => 0,
                        },
                    };
                    crate::debug!("input:{value}");
                    self.tape_mut().set(value);
                    self.tape_mut().forward();
                }
            }
            ix += 1;
        }

        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::NoInput;

    fn run(program: &str) -> Vec<u8> {
        Interpreter::new().run(program.as_bytes(), &mut NoInput).unwrap()
    }

    fn run_text(program: &str) -> String {
        String::from_utf8(run(program)).unwrap()
    }

    #[test]
    fn test_fresh_interpreter() {
        let interp = Interpreter::new();
        assert_eq!(interp.level_count(), 1);
        assert_eq!(interp.level_index(), 0);
        assert_eq!(interp.register_index(), 0);
        assert_eq!(interp.registers(), &[0; REGISTER_COUNT]);
        assert_eq!(interp.tape().cells(), &[0]);
    }

    #[test]
    fn test_write_raw_byte_and_advance() {
        let mut interp = Interpreter::new();
        let out = interp.run(b"++++w", &mut NoInput).unwrap();
        assert_eq!(out, vec![4]);
        assert_eq!(interp.tape().len(), 2);
        assert_eq!(interp.tape().cursor(), 1);
    }

    #[test]
    fn test_loop_clears_cell() {
        assert_eq!(run_text("+++[-]n"), "0");
    }

    #[test]
    fn test_register_round_trip_across_runs() {
        let mut interp = Interpreter::new();
        interp.run(b"9#", &mut NoInput).unwrap();
        assert_eq!(interp.register_index(), 9);
        assert_eq!(interp.registers()[9], 0);
        interp.run(b"0%", &mut NoInput).unwrap();
        assert_eq!(interp.register_index(), 0);
        assert_eq!(interp.tape().get(), 0);
    }

    #[test]
    fn test_register_copies_between_cells() {
        // Store 5 in r3, move right, load it back out.
        assert_eq!(run("+++++3#>3%w"), vec![5]);
    }

    #[test]
    fn test_registers_copy_between_levels() {
        // Cell on the floor -> r1 -> cell on level 1.
        let mut interp = Interpreter::new();
        interp.run(b"++1#^1%", &mut NoInput).unwrap();
        assert_eq!(interp.level_index(), 1);
        assert_eq!(interp.tape().get(), 2);
        assert_eq!(interp.levels()[0].get(), 2);
    }

    #[test]
    fn test_decimal_output_is_unpadded() {
        assert_eq!(run_text("+++++++n"), "7");
        assert_eq!(run_text("n"), "0");
        assert_eq!(run_text("-n"), "255");
    }

    #[test]
    fn test_padded_output_is_three_digits() {
        assert_eq!(run_text("+++++++N"), "007");
        assert_eq!(run_text("N"), "000");
        assert_eq!(run_text("-N"), "255");
    }

    #[test]
    fn test_output_advances_cursor() {
        // Each write moves to a fresh zero cell.
        assert_eq!(run_text("+nnn"), "100");
    }

    #[test]
    fn test_back_wraps_to_last_cell() {
        // Grow to three cells, mark the last, wrap to it from cell 0.
        assert_eq!(run_text(">>+++(<n"), "3");
    }

    #[test]
    fn test_reset_to_start_and_end() {
        assert_eq!(run_text("++>>+)n(n"), "12");
    }

    #[test]
    fn test_level_stack_grows_and_wraps() {
        let mut interp = Interpreter::new();
        interp.run(b"^^", &mut NoInput).unwrap();
        assert_eq!(interp.level_count(), 3);
        assert_eq!(interp.level_index(), 2);
        interp.run(b"_v", &mut NoInput).unwrap();
        assert_eq!(interp.level_index(), 2);
        interp.run(b"_T", &mut NoInput).unwrap();
        assert_eq!(interp.level_index(), 2);
        assert_eq!(interp.level_count(), 3);
    }

    #[test]
    fn test_levels_have_independent_tapes() {
        assert_eq!(run_text("+++^+v n ^n"), "31");
    }

    #[test]
    fn test_level_up_then_down_restores_index() {
        let mut interp = Interpreter::new();
        interp.level_up();
        interp.level_down();
        assert_eq!(interp.level_index(), 0);
        assert_eq!(interp.level_count(), 2);
    }

    #[test]
    fn test_level_down_from_floor_wraps_to_top() {
        let mut interp = Interpreter::new();
        interp.level_down();
        assert_eq!(interp.level_index(), 0);
        interp.level_up();
        interp.level_up();
        interp.level_floor();
        interp.level_down();
        assert_eq!(interp.level_index(), 2);
    }

    #[test]
    fn test_nested_loops() {
        // 3 * 4 accumulated into cell 1.
        assert_eq!(run_text("+++[>++++[>+<-]<-]>>n"), "12");
    }

    #[test]
    fn test_loop_back_skips_the_open_bracket() {
        // A loop body runs until the cell hits zero, re-entering at the
        // first body token each time.
        assert_eq!(run_text("+++++[->++<]>n"), "10");
    }

    #[test]
    fn test_skip_lands_after_matching_bracket() {
        // Cell is zero so the whole nested body is skipped.
        assert_eq!(run_text("[+[+]+]n"), "0");
    }

    #[test]
    fn test_noops_are_ignored() {
        assert_eq!(run_text("+ a b + c n"), "2");
    }

    #[test]
    fn test_unbalanced_open_bracket() {
        let err = Interpreter::new().run(b"[+", &mut NoInput).unwrap_err();
        assert!(matches!(
            err,
            Error::UnbalancedBrackets {
                position: 0,
                bracket: '['
            }
        ));
    }

    #[test]
    fn test_unbalanced_close_bracket() {
        let err = Interpreter::new().run(b"+]", &mut NoInput).unwrap_err();
        assert!(matches!(
            err,
            Error::UnbalancedBrackets {
                position: 1,
                bracket: ']'
            }
        ));
    }

    #[test]
    fn test_unmatched_bracket_not_taken_is_harmless() {
        // The jump is never taken, same as a re-scan that never starts.
        assert_eq!(run_text("+[n"), "1");
        assert_eq!(run_text("]n"), "0");
    }

    #[test]
    fn test_read_input() {
        let mut input: &[u8] = b"AB";
        let out = Interpreter::new().run(b"??(ww", &mut input).unwrap();
        assert_eq!(out, b"AB");
    }

    #[test]
    fn test_read_exhausted_fails_by_default() {
        let err = Interpreter::new().run(b"+?", &mut NoInput).unwrap_err();
        assert!(matches!(err, Error::InputExhausted { position: 1 }));
    }

    #[test]
    fn test_read_exhausted_zero_policy() {
        let config = RunConfig {
            on_eof: EofPolicy::Zero,
            ..RunConfig::default()
        };
        let mut interp = Interpreter::with_config(config);
        let out = interp.run(b"+++?<n", &mut NoInput).unwrap();
        assert_eq!(out, b"0");
    }

    #[test]
    fn test_step_limit_stops_infinite_loop() {
        let config = RunConfig {
            step_limit: Some(100),
            ..RunConfig::default()
        };
        let err = Interpreter::with_config(config)
            .run(b"+[]", &mut NoInput)
            .unwrap_err();
        assert!(matches!(err, Error::StepLimitExceeded { limit: 100 }));
    }

    #[test]
    fn test_step_limit_exactly_enough() {
        let config = RunConfig {
            step_limit: Some(3),
            ..RunConfig::default()
        };
        let out = Interpreter::with_config(config)
            .run(b"++n", &mut NoInput)
            .unwrap();
        assert_eq!(out, b"2");
    }

    #[test]
    fn test_select_register_guard() {
        let mut interp = Interpreter::new();
        assert!(interp.select_register(15).is_ok());
        assert!(matches!(
            interp.select_register(16),
            Err(Error::RegisterIndexOutOfRange(16))
        ));
        assert_eq!(interp.register_index(), 15);
    }

    #[test]
    fn test_eof_policy_parse() {
        assert_eq!("fail".parse::<EofPolicy>(), Ok(EofPolicy::Fail));
        assert_eq!("zero".parse::<EofPolicy>(), Ok(EofPolicy::Zero));
        assert!("skip".parse::<EofPolicy>().is_err());
    }

    #[test]
    fn test_empty_program() {
        assert!(run("").is_empty());
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use crate::input::NoInput;
    use crate::token::ALPHABET;
    use proptest::prelude::*;

    fn program_strategy() -> impl Strategy<Value = Vec<u8>> {
        prop::collection::vec(prop::sample::select(ALPHABET), 0..128)
    }

    proptest! {
        #[test]
        fn random_programs_never_panic(program in program_strategy()) {
            let config = RunConfig { step_limit: Some(4096), on_eof: EofPolicy::Zero };
            let mut interp = Interpreter::with_config(config);
            let _ = interp.run(&program, &mut NoInput);
            prop_assert!(interp.level_index() < interp.level_count());
            prop_assert!(interp.tape().cursor() < interp.tape().len());
            prop_assert!(interp.register_index() < REGISTER_COUNT);
        }

        #[test]
        fn random_bytes_never_panic(program in prop::collection::vec(any::<u8>(), 0..256)) {
            let config = RunConfig { step_limit: Some(4096), on_eof: EofPolicy::Fail };
            let _ = Interpreter::with_config(config).run(&program, &mut NoInput);
        }

        #[test]
        fn padded_output_is_three_digits(value in any::<u8>()) {
            let mut program = vec![b'+'; value as usize];
            program.push(b'N');
            let out = Interpreter::new().run(&program, &mut NoInput).unwrap();
            prop_assert_eq!(out, format!("{value:03}").into_bytes());
        }

        #[test]
        fn decimal_output_is_minimal(value in any::<u8>()) {
            let mut program = vec![b'+'; value as usize];
            program.push(b'n');
            let out = Interpreter::new().run(&program, &mut NoInput).unwrap();
            prop_assert_eq!(out, value.to_string().into_bytes());
        }

        #[test]
        fn level_up_then_down_is_identity(ups in 0usize..16, downs in 0usize..16) {
            let mut interp = Interpreter::new();
            for _ in 0..ups {
                interp.level_up();
            }
            for _ in 0..downs {
                interp.level_down();
            }
            let before = interp.level_index();
            interp.level_up();
            interp.level_down();
            prop_assert_eq!(interp.level_index(), before);
        }
    }
}
