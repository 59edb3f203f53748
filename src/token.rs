/// The BFLX instruction set.
///
/// Every instruction is a single byte. Bytes outside this table are no-ops,
/// so comments and whitespace can be mixed freely into a program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Token {
    /// `0`-`9`: select a register.
    Register(u8),
    /// `#`: copy the current cell into the selected register.
    Store,
    /// `%`: copy the selected register into the current cell.
    Load,
    Increment,
    Decrement,
    Forward,
    Back,
    /// `(`: cursor to the first cell.
    Start,
    /// `)`: cursor to the last cell.
    End,
    LevelUp,
    LevelDown,
    LevelTop,
    LevelFloor,
    /// `w`: emit the raw cell byte.
    Write,
    /// `n`: emit the cell as unpadded decimal.
    WriteDecimal,
    /// `N`: emit the cell as three zero-padded digits.
    WritePadded,
    /// `?`: read one byte of input.
    Read,
    LoopStart,
    LoopEnd,
}

const HASH: u8 = b'#';
const PERCENT: u8 = b'%';
const PLUS: u8 = b'+';
const MINUS: u8 = b'-';
const GREATER: u8 = b'>';
const LESS: u8 = b'<';
const LPAREN: u8 = b'(';
const RPAREN: u8 = b')';
const CARET: u8 = b'^';
const LOWER_V: u8 = b'v';
const UPPER_T: u8 = b'T';
const UNDERSCORE: u8 = b'_';
const LOWER_W: u8 = b'w';
const LOWER_N: u8 = b'n';
const UPPER_N: u8 = b'N';
const QUESTION: u8 = b'?';
const LBRACKET: u8 = b'[';
const RBRACKET: u8 = b']';

/// Every byte that decodes to an instruction.
pub const ALPHABET: &[u8] = b"0123456789#%+-><()^vT_wnN?[]";

impl Token {
    #[inline]
    pub fn decode(byte: u8) -> Option<Token> {
        let token = match byte {
            b'0'..=b'9' => Token::Register(byte - b'0'),
            HASH => Token::Store,
            PERCENT => Token::Load,
            PLUS => Token::Increment,
            MINUS => Token::Decrement,
            GREATER => Token::Forward,
            LESS => Token::Back,
            LPAREN => Token::Start,
            RPAREN => Token::End,
            CARET => Token::LevelUp,
            LOWER_V => Token::LevelDown,
            UPPER_T => Token::LevelTop,
            UNDERSCORE => Token::LevelFloor,
            LOWER_W => Token::Write,
            LOWER_N => Token::WriteDecimal,
            UPPER_N => Token::WritePadded,
            QUESTION => Token::Read,
            LBRACKET => Token::LoopStart,
            RBRACKET => Token::LoopEnd,
            _ => return None,
        };
        Some(token)
    }

    pub fn mnemonic(self) -> &'static str {
        match self {
            Token::Register(_) => "select",
            Token::Store => "store",
            Token::Load => "load",
            Token::Increment => "inc",
            Token::Decrement => "dec",
            Token::Forward => "fwd",
            Token::Back => "back",
            Token::Start => "start",
            Token::End => "end",
            Token::LevelUp => "up",
            Token::LevelDown => "down",
            Token::LevelTop => "top",
            Token::LevelFloor => "floor",
            Token::Write => "write",
            Token::WriteDecimal => "dec-out",
            Token::WritePadded => "pad-out",
            Token::Read => "read",
            Token::LoopStart => "loop",
            Token::LoopEnd => "until",
        }
    }
}
