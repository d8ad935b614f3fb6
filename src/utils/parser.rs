//! Sequential byte cursor over a canonical encoding

use crate::types::*;

/// Read-only cursor over a byte buffer
///
/// Reads never advance past the end: a short read fails with
/// `BufferUnderrun` and leaves the position unchanged.
#[derive(Debug, Clone)]
pub struct BinaryParser<'a> {
    data: &'a [u8],
    position: usize,
}

impl<'a> BinaryParser<'a> {
    /// Create a cursor positioned at the start of `data`
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, position: 0 }
    }

    /// Next byte, without advancing
    pub fn peek(&self) -> CodecResult<u8> {
        self.data
            .get(self.position)
            .copied()
            .ok_or(CodecError::BufferUnderrun {
                requested: 1,
                remaining: 0,
            })
    }

    /// Next `n` bytes, advancing the cursor by `n`
    pub fn read(&mut self, n: usize) -> CodecResult<&'a [u8]> {
        let remaining = self.remaining();
        if n > remaining {
            return Err(CodecError::BufferUnderrun {
                requested: n,
                remaining,
            });
        }
        let start = self.position;
        self.position += n;
        Ok(&self.data[start..self.position])
    }

    /// Next `N` bytes as a fixed-size array
    pub fn read_array<const N: usize>(&mut self) -> CodecResult<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.read(N)?);
        Ok(out)
    }

    /// Advance by `n` bytes
    pub fn skip(&mut self, n: usize) -> CodecResult<()> {
        self.read(n).map(|_| ())
    }

    /// Bytes left to read
    pub fn remaining(&self) -> usize {
        self.data.len() - self.position
    }

    /// Whether every byte has been consumed
    pub fn is_end(&self) -> bool {
        self.position >= self.data.len()
    }

    /// Offset of the next byte from the start of the buffer
    pub fn position(&self) -> usize {
        self.position
    }
}
