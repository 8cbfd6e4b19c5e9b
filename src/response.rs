use core::cmp;

/// Bytes staged for the next read transactions.
///
/// The staged bytes stay in place until replaced, so every read is answered
/// with the same data until the application stages something new.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Response<const N: usize> {
    buf: [u8; N],
    end: usize,
}

impl<const N: usize> Response<N> {
    pub const fn new() -> Self {
        Self {
            buf: [0; N],
            end: 0,
        }
    }

    /// Stages `buf` and returns the part that did not fit.
    pub fn write<'a>(&mut self, buf: &'a [u8]) -> &'a [u8] {
        let take_idx = cmp::min(buf.len(), N);
        self.buf[..take_idx].copy_from_slice(&buf[..take_idx]);
        self.end = take_idx;

        &buf[take_idx..]
    }

    /// Copies the staged bytes into `payload`. The rest reads as zero.
    pub fn fill(&self, payload: &mut [u8; N]) {
        payload[..self.end].copy_from_slice(self.bytes());
        payload[self.end..].fill(0);
    }

    pub fn bytes(&self) -> &[u8] {
        &self.buf[..self.end]
    }

    pub fn reset(&mut self) {
        self.end = 0;
    }

    pub fn is_empty(&self) -> bool {
        self.end == 0
    }
}

impl<const N: usize> Default for Response<N> {
    fn default() -> Self {
        Self::new()
    }
}
