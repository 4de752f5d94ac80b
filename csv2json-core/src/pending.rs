use core::cmp;

/// Room for the output of a single transition. The longest one is `[null,`.
const CAPACITY: usize = 8;

/// Output produced by one transition that has not reached the caller yet.
///
/// A transition always writes its output here first, so a caller with a tiny
/// output buffer still receives every byte, just over several calls.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct Pending {
    buf: [u8; CAPACITY],
    start: usize,
    end: usize,
}

impl Pending {
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn clear(&mut self) {
        self.start = 0;
        self.end = 0;
    }

    pub fn push(&mut self, bytes: &[u8]) {
        let end = self.end + bytes.len();
        debug_assert!(end <= CAPACITY, "transition output too long");
        self.buf[self.end..end].copy_from_slice(bytes);
        self.end = end;
    }

    pub fn push_byte(&mut self, b: u8) {
        self.push(&[b]);
    }

    /// Move as much staged output as fits into `output`, returning the
    /// number of bytes moved.
    pub fn drain(&mut self, output: &mut [u8]) -> usize {
        let n = cmp::min(self.end - self.start, output.len());
        output[..n].copy_from_slice(&self.buf[self.start..self.start + n]);
        self.start += n;
        if self.is_empty() {
            self.clear();
        }
        n
    }
}

#[cfg(test)]
mod tests {
    use super::Pending;

    #[test]
    fn drains_across_calls() {
        let mut p = Pending::default();
        p.push(b"[null,");
        let mut out = [0u8; 4];
        assert_eq!(p.drain(&mut out), 4);
        assert_eq!(&out, b"[nul");
        assert!(!p.is_empty());
        assert_eq!(p.drain(&mut out), 2);
        assert_eq!(&out[..2], b"l,");
        assert!(p.is_empty());
        assert_eq!(p.drain(&mut out), 0);
    }
}
