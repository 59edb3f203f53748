use std::io::{self, BufRead, ErrorKind, Read};

/// A source of bytes for the `?` instruction.
///
/// Each call blocks for at most one byte. `Ok(None)` means the input is
/// exhausted.
pub trait Input {
    fn read_byte(&mut self) -> io::Result<Option<u8>>;
}

/// Input that is always exhausted.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoInput;

impl Input for NoInput {
    fn read_byte(&mut self) -> io::Result<Option<u8>> {
        Ok(None)
    }
}

/// Consumes bytes from the front of the slice.
impl Input for &[u8] {
    fn read_byte(&mut self) -> io::Result<Option<u8>> {
        match self.split_first() {
            Some((&byte, rest)) => {
                *self = rest;
                Ok(Some(byte))
            }
            None => Ok(None),
        }
    }
}

/// One raw byte per read, from any reader.
pub struct ByteInput<R> {
    reader: R,
}

impl<R: Read> ByteInput<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }
}

impl<R: Read> Input for ByteInput<R> {
    fn read_byte(&mut self) -> io::Result<Option<u8>> {
        let mut buf = [0u8; 1];
        loop {
            match self.reader.read(&mut buf) {
                Ok(0) => return Ok(None),
                Ok(_) => return Ok(Some(buf[0])),
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
    }
}

/// Interactive input: each read takes one line and yields its first byte.
///
/// The rest of the line, newline included, is discarded, so a user types one
/// character and presses enter per `?`. An empty line yields `b'\n'`.
pub struct LineInput<R> {
    reader: R,
    line: Vec<u8>,
}

impl<R: BufRead> LineInput<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line: Vec::new(),
        }
    }
}

impl<R: BufRead> Input for LineInput<R> {
    fn read_byte(&mut self) -> io::Result<Option<u8>> {
        self.line.clear();
        let n = self.reader.read_until(b'\n', &mut self.line)?;
        if n == 0 {
            return Ok(None);
        }
        Ok(self.line.first().copied())
    }
}
