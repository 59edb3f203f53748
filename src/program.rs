use std::fmt::Write;

use crate::token::Token;

/// A loaded BFLX program: the raw source bytes plus a precomputed bracket
/// match table.
///
/// The table is built once at load so loops jump directly instead of
/// rescanning. Unmatched brackets are recorded as `None` and only become an
/// error if execution actually tries to jump from them.
#[derive(Debug, Clone)]
pub struct Program<'a> {
    source: &'a [u8],
    jumps: Vec<Option<usize>>,
}

impl<'a> Program<'a> {
    pub fn new(source: &'a [u8]) -> Self {
        Self {
            source,
            jumps: build_jump_table(source),
        }
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.source.len()
    }

    pub fn is_empty(&self) -> bool {
        self.source.is_empty()
    }

    #[inline(always)]
    pub fn byte(&self, ix: usize) -> u8 {
        self.source[ix]
    }

    /// Index of the bracket matching the one at `ix`, if any.
    #[inline(always)]
    pub fn jump(&self, ix: usize) -> Option<usize> {
        self.jumps[ix]
    }
}

/// Build a bracket-match lookup table for the program.
///
/// `result[i]` is the index of the bracket matching position `i`. Entries for
/// unmatched brackets and non-bracket bytes are `None`.
///
/// The pairing is the same that a depth-counting scan produces: forward from
/// `[` counting `[` up and `]` down, or backward from `]` the other way round.
fn build_jump_table(source: &[u8]) -> Vec<Option<usize>> {
    let mut table = vec![None; source.len()];
    let mut open = Vec::new();

    for (i, &byte) in source.iter().enumerate() {
        match Token::decode(byte) {
            Some(Token::LoopStart) => open.push(i),
            Some(Token::LoopEnd) => {
                if let Some(start) = open.pop() {
                    table[start] = Some(i);
                    table[i] = Some(start);
                }
            }
            _ => {}
        }
    }

    table
}

/// Pretty-print a listing of the instructions in `source`.
///
/// Each line holds the byte offset, the instruction character and its
/// mnemonic. No-op bytes are skipped and brackets show their jump target.
pub fn disassemble(source: &[u8]) -> String {
    let program = Program::new(source);
    let mut out = String::new();
    for (ix, &byte) in source.iter().enumerate() {
        let Some(token) = Token::decode(byte) else {
            continue;
        };
        let _ = write!(out, "{ix:04}  {}  {}", byte as char, token.mnemonic());
        match token {
            Token::Register(n) => {
                let _ = write!(out, " r{n}");
            }
            Token::LoopStart | Token::LoopEnd => match program.jump(ix) {
                Some(target) => {
                    let _ = write!(out, " -> {target:04}");
                }
                None => out.push_str(" -> unmatched"),
            },
            _ => {}
        }
        out.push('\n');
    }
    out
}
