use std::fmt;

use crate::algorithm;

/// The discriminated category of an [`Error`], for callers that want to
/// branch on failure type without matching every variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    MalformedHeader,
    UnsupportedAlgorithm,
    ChecksumMismatch,
    MalformedChunk,
    LengthMismatch,
    DeflateError,
}

/// The error type used when compression or decompression fails.
#[derive(Debug, PartialEq)]
pub enum Error {
    /// The container is shorter than the fixed 24-byte header.
    HeaderTooShort { len: usize },

    /// The header's magic bytes don't match the fixed MSZIP prefix.
    MalformedHeader {
        expected_magic: [u8; 6],
        actual_magic: [u8; 6],
    },

    /// The header's algorithm byte is not MSZIP (2).
    UnsupportedAlgorithm { value: u8 },

    /// The header's CRC byte disagrees with the recomputed value.
    ChecksumMismatch { expected: u8, actual: u8 },

    /// A chunk's padding marker didn't match the fixed value.
    MalformedChunkPadding { actual: u16 },

    /// The buffer ran out before a chunk's prefix or payload was fully read.
    TruncatedChunk,

    /// The first chunk decompressed to a different length than the header promised.
    FirstChunkLengthMismatch { expected: usize, actual: usize },

    /// The total decompressed length differs from the header's claim.
    TotalLengthMismatch { expected: usize, actual: usize },

    /// The underlying DEFLATE engine rejected a chunk; message is the engine's own.
    Deflate(String),
}

impl Error {
    /// The discriminated kind of this error, grouping related variants.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::HeaderTooShort { .. } | Error::MalformedHeader { .. } => {
                ErrorKind::MalformedHeader
            }
            Error::UnsupportedAlgorithm { .. } => ErrorKind::UnsupportedAlgorithm,
            Error::ChecksumMismatch { .. } => ErrorKind::ChecksumMismatch,
            Error::MalformedChunkPadding { .. } | Error::TruncatedChunk => {
                ErrorKind::MalformedChunk
            }
            Error::FirstChunkLengthMismatch { .. } | Error::TotalLengthMismatch { .. } => {
                ErrorKind::LengthMismatch
            }
            Error::Deflate(_) => ErrorKind::DeflateError,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::HeaderTooShort { len } => write!(
                f,
                "container too short for a header: got {} bytes, need at least 24",
                len
            ),
            Error::MalformedHeader {
                expected_magic,
                actual_magic,
            } => write!(
                f,
                "invalid magic bytes: expected {}, got {}",
                hex(expected_magic),
                hex(actual_magic)
            ),
            Error::UnsupportedAlgorithm { value } => match algorithm::name_of(*value) {
                Some(name) => write!(
                    f,
                    "unsupported compression algorithm: expected MSZIP (2), got {} ({})",
                    name, value
                ),
                None => write!(
                    f,
                    "unsupported compression algorithm: expected MSZIP (2), got {}",
                    value
                ),
            },
            Error::ChecksumMismatch { expected, actual } => write!(
                f,
                "header checksum mismatch: expected {}, got {}",
                expected, actual
            ),
            Error::MalformedChunkPadding { actual } => write!(
                f,
                "invalid chunk padding: expected 0x4b43, got {:#06x}",
                actual
            ),
            Error::TruncatedChunk => write!(f, "buffer ended in the middle of a chunk"),
            Error::FirstChunkLengthMismatch { expected, actual } => write!(
                f,
                "first chunk decompressed to {} bytes, expected {} bytes",
                actual, expected
            ),
            Error::TotalLengthMismatch { expected, actual } => write!(
                f,
                "decompressed data length does not match: expected {} bytes, got {} bytes",
                expected, actual
            ),
            Error::Deflate(message) => write!(f, "DEFLATE engine error: {}", message),
        }
    }
}

impl std::error::Error for Error {}

fn hex(bytes: &[u8; 6]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}
