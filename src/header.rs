//! The fixed 24-byte MSZIP container header and its undocumented checksum.
use std::convert::TryFrom;

use byteorder::{ByteOrder, LittleEndian, WriteBytesExt};

use crate::algorithm::Algorithm;
use crate::error::Error;

/// Fixed magic bytes at the start of every MSZIP container. This value is
/// hardcoded in Cabinet.dll's `Compress` entry point.
pub(crate) const MAGIC: [u8; 6] = [0x0A, 0x51, 0xE5, 0xC0, 0x18, 0x00];

/// Size of the container header, in bytes.
pub(crate) const HEADER_LEN: usize = 24;

/// Computes the header checksum byte.
///
/// This is *not* "CRC-32 of the whole header with the crc byte zeroed": it's
/// a two-stage computation where the CRC-32 of the six magic bytes seeds the
/// CRC-32 of everything after the crc byte. `header` must be the full
/// 24-byte header; the byte at offset 6 (the crc byte itself) is never read.
fn header_crc(header: &[u8; HEADER_LEN]) -> u8 {
    let seed = crc32fast::hash(&header[0..6]);
    let mut hasher = crc32fast::Hasher::new_with_initial(seed);
    hasher.update(&header[7..HEADER_LEN]);
    (hasher.finalize() & 0xFF) as u8
}

/// Packs a header for a container holding `total_len` total plaintext bytes,
/// whose first chunk decompresses to `first_chunk_len` bytes. Always encodes
/// the MSZIP algorithm tag; this crate never produces the other Cabinet
/// algorithms.
pub(crate) fn encode_header(total_len: u64, first_chunk_len: u64) -> [u8; HEADER_LEN] {
    let mut buf = Vec::with_capacity(HEADER_LEN);
    buf.extend_from_slice(&MAGIC);
    buf.push(0); // crc placeholder, patched below
    buf.push(Algorithm::MsZip as u8);
    buf.write_u64::<LittleEndian>(total_len)
        .expect("writes into a Vec never fail");
    buf.write_u64::<LittleEndian>(first_chunk_len)
        .expect("writes into a Vec never fail");

    let mut header = [0u8; HEADER_LEN];
    header.copy_from_slice(&buf);
    header[6] = header_crc(&header);
    header
}

/// Unpacks and validates a header from the front of `bytes`. `bytes` may be
/// longer than the header; only the first 24 bytes are inspected.
///
/// Checks run in order: length, magic, algorithm, checksum.
pub(crate) fn decode_header(bytes: &[u8]) -> Result<(Algorithm, u64, u64), Error> {
    if bytes.len() < HEADER_LEN {
        return Err(Error::HeaderTooShort { len: bytes.len() });
    }

    let mut actual_magic = [0u8; 6];
    actual_magic.copy_from_slice(&bytes[0..6]);
    if actual_magic != MAGIC {
        return Err(Error::MalformedHeader {
            expected_magic: MAGIC,
            actual_magic,
        });
    }

    let algorithm_byte = bytes[7];
    let algorithm = Algorithm::try_from(algorithm_byte)
        .map_err(|()| Error::UnsupportedAlgorithm { value: algorithm_byte })?;
    if algorithm != Algorithm::MsZip {
        return Err(Error::UnsupportedAlgorithm { value: algorithm_byte });
    }

    let mut header = [0u8; HEADER_LEN];
    header.copy_from_slice(&bytes[0..HEADER_LEN]);
    let expected_crc = header_crc(&header);
    let actual_crc = bytes[6];
    if actual_crc != expected_crc {
        return Err(Error::ChecksumMismatch {
            expected: expected_crc,
            actual: actual_crc,
        });
    }

    let total_len = LittleEndian::read_u64(&bytes[8..16]);
    let first_chunk_len = LittleEndian::read_u64(&bytes[16..24]);
    Ok((algorithm, total_len, first_chunk_len))
}
