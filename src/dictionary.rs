//! A rolling preset dictionary: the trailing `MAX_CHUNK_SIZE` bytes of all
//! plaintext processed so far, fed to `flate2` as each chunk's DEFLATE
//! dictionary.
use crate::MAX_CHUNK_SIZE;

pub(crate) struct Dictionary {
    buf: Vec<u8>,
}

impl Dictionary {
    pub(crate) fn new() -> Self {
        Dictionary {
            buf: Vec::with_capacity(MAX_CHUNK_SIZE),
        }
    }

    pub(crate) fn as_slice(&self) -> &[u8] {
        &self.buf
    }

    /// Appends `data` (one chunk's plaintext) and drops whatever now falls
    /// outside the trailing `MAX_CHUNK_SIZE` bytes.
    pub(crate) fn extend(&mut self, data: &[u8]) {
        if data.len() >= MAX_CHUNK_SIZE {
            self.buf.clear();
            self.buf.extend_from_slice(&data[data.len() - MAX_CHUNK_SIZE..]);
            return;
        }

        let overflow = (self.buf.len() + data.len()).saturating_sub(MAX_CHUNK_SIZE);
        if overflow > 0 {
            self.buf.drain(..overflow);
        }
        self.buf.extend_from_slice(data);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_empty() {
        let dict = Dictionary::new();
        assert!(dict.as_slice().is_empty());
    }

    #[test]
    fn accumulates_under_the_cap() {
        let mut dict = Dictionary::new();
        dict.extend(b"abc");
        dict.extend(b"def");
        assert_eq!(dict.as_slice(), b"abcdef");
    }

    #[test]
    fn caps_at_max_chunk_size() {
        let mut dict = Dictionary::new();
        dict.extend(&vec![1u8; MAX_CHUNK_SIZE]);
        dict.extend(&[2u8; 100]);
        assert_eq!(dict.as_slice().len(), MAX_CHUNK_SIZE);
        assert_eq!(&dict.as_slice()[MAX_CHUNK_SIZE - 100..], &[2u8; 100][..]);
    }

    #[test]
    fn a_single_oversized_chunk_keeps_only_the_tail() {
        let mut dict = Dictionary::new();
        let mut data = vec![0u8; MAX_CHUNK_SIZE + 10];
        data[MAX_CHUNK_SIZE..].copy_from_slice(&[9u8; 10]);
        dict.extend(&data);
        assert_eq!(dict.as_slice().len(), MAX_CHUNK_SIZE);
        assert_eq!(&dict.as_slice()[MAX_CHUNK_SIZE - 10..], &[9u8; 10][..]);
    }
}
