//! This crate implements the MSZIP container format as produced and
//! consumed by the Windows Cabinet compression API
//! (`CreateCompressor`/`Compress`/`Decompress` with the MSZIP algorithm).
//!
//! MSZIP chunks arbitrary data into pieces of up to 32 KiB and compresses
//! each piece as an independent raw DEFLATE stream, using the plaintext of
//! every prior chunk as that stream's preset dictionary. A small header in
//! front of the chunks carries the total and first-chunk lengths and an
//! undocumented single-byte checksum.
//!
//! In order to use this crate, call [`compress`] (or [`compress_with_level`])
//! to produce a container and [`decompress`] to invert it.
//!
//! ```
//! let original = b"Lorem ipsum dolor sit amet";
//! let container = mszip::compress(original).unwrap();
//! let restored = mszip::decompress(&container).unwrap();
//! assert_eq!(restored, original);
//! ```
mod algorithm;
mod chunk;
mod dictionary;
mod error;
mod header;

use flate2::{Compress, Compression, Decompress, FlushCompress, FlushDecompress};

pub use error::{Error, ErrorKind};

use dictionary::Dictionary;

/// Maximum plaintext size of a single chunk, and the size of the sliding
/// dictionary window: 32 KiB.
pub const MAX_CHUNK_SIZE: usize = 32 * 1024;

/// The `level` used by [`compress`].
pub const DEFAULT_LEVEL: i32 = 9;

/// An upper bound on how much we'll eagerly reserve for the output buffer on
/// [`decompress`], based purely on the header's (untrusted) claimed length.
/// Containers larger than this still decompress correctly; they just grow
/// the output buffer incrementally instead of in one allocation.
const MAX_RESERVE_HINT: u64 = 256 * 1024 * 1024;

/// Compresses `plaintext` into an MSZIP container at the default level (9).
pub fn compress(plaintext: &[u8]) -> Result<Vec<u8>, Error> {
    compress_with_level(plaintext, DEFAULT_LEVEL)
}

/// Compresses `plaintext` into an MSZIP container.
///
/// `level` is a DEFLATE compression level in `0..=9`, or `-1` for the
/// library's default. No input can legitimately make this fail; a returned
/// `Err` indicates a bug in this crate rather than bad input.
pub fn compress_with_level(plaintext: &[u8], level: i32) -> Result<Vec<u8>, Error> {
    assert!(level == -1 || (0..=9).contains(&level), "level out of range");
    let compression = if level < 0 {
        Compression::default()
    } else {
        Compression::new(level as u32)
    };

    let total_len = plaintext.len() as u64;
    let first_chunk_len = plaintext.len().min(MAX_CHUNK_SIZE) as u64;

    let mut out = header::encode_header(total_len, first_chunk_len).to_vec();
    let mut dictionary = Dictionary::new();

    for plain_chunk in plaintext.chunks(MAX_CHUNK_SIZE) {
        let mut compressor = Compress::new(compression, false);
        if !dictionary.as_slice().is_empty() {
            compressor
                .set_dictionary(dictionary.as_slice())
                .map_err(|e| Error::Deflate(e.to_string()))?;
        }

        // 32 KiB of arbitrary input very rarely expands by more than a
        // handful of bytes; this is generous headroom for stored blocks.
        let mut payload = Vec::with_capacity(MAX_CHUNK_SIZE + 64);
        compressor
            .compress_vec(plain_chunk, &mut payload, FlushCompress::Finish)
            .map_err(|e| Error::Deflate(e.to_string()))?;

        chunk::write_chunk(&mut out, &payload);
        dictionary.extend(plain_chunk);
    }

    Ok(out)
}

/// Decompresses an MSZIP container, returning the original plaintext.
pub fn decompress(compressed: &[u8]) -> Result<Vec<u8>, Error> {
    let (_algorithm, total_len, first_chunk_len) = header::decode_header(compressed)?;

    let reserve = total_len.min(MAX_RESERVE_HINT) as usize;
    let mut out = Vec::with_capacity(reserve);
    let mut cursor = &compressed[header::HEADER_LEN..];
    let mut dictionary = Dictionary::new();
    let mut first_chunk = true;

    while !cursor.is_empty() {
        let payload = chunk::read_chunk(&mut cursor)?;

        let mut decompressor = Decompress::new(false);
        if !dictionary.as_slice().is_empty() {
            decompressor
                .set_dictionary(dictionary.as_slice())
                .map_err(|e| Error::Deflate(e.to_string()))?;
        }

        let before = out.len();
        out.reserve(MAX_CHUNK_SIZE);
        decompressor
            .decompress_vec(payload, &mut out, FlushDecompress::Finish)
            .map_err(|e| Error::Deflate(e.to_string()))?;
        let produced = out.len() - before;

        if first_chunk {
            if produced as u64 != first_chunk_len {
                return Err(Error::FirstChunkLengthMismatch {
                    expected: first_chunk_len as usize,
                    actual: produced,
                });
            }
            first_chunk = false;
        }

        dictionary.extend(&out[before..]);
    }

    if out.len() as u64 != total_len {
        return Err(Error::TotalLengthMismatch {
            expected: total_len as usize,
            actual: out.len(),
        });
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn repeating_data(size: usize) -> Vec<u8> {
        let modulus = 251; // a prime no bigger than u8::MAX
        (0..size).map(|index| (index % modulus) as u8).collect()
    }

    fn random_data(size: usize) -> Vec<u8> {
        use rand::{RngCore, SeedableRng};
        let mut rng = rand::rngs::SmallRng::seed_from_u64(0xA11CE);
        let mut data = vec![0u8; size];
        rng.fill_bytes(&mut data);
        data
    }

    fn round_trip(data: &[u8]) {
        let compressed = compress(data).unwrap();
        let restored = decompress(&compressed).unwrap();
        assert_eq!(restored, data);
    }

    #[test]
    fn empty_input_round_trips_with_no_chunks() {
        let compressed = compress(b"").unwrap();
        assert_eq!(compressed.len(), header::HEADER_LEN, "no chunks follow the header");
        assert_eq!(decompress(&compressed).unwrap(), b"");
    }

    #[test]
    fn single_byte_round_trips() {
        round_trip(b"\x00");
        round_trip(b"A");
    }

    #[test]
    fn exactly_one_chunk_worth_round_trips() {
        let data = vec![0xFFu8; MAX_CHUNK_SIZE];
        let compressed = compress(&data).unwrap();

        let mut cursor = &compressed[header::HEADER_LEN..];
        let mut chunk_count = 0;
        while !cursor.is_empty() {
            chunk::read_chunk(&mut cursor).unwrap();
            chunk_count += 1;
        }
        assert_eq!(chunk_count, 1);
        assert_eq!(decompress(&compressed).unwrap(), data);
    }

    #[test]
    fn one_byte_over_a_chunk_makes_two_chunks() {
        let data = random_data(MAX_CHUNK_SIZE + 1);
        let compressed = compress(&data).unwrap();

        let mut cursor = &compressed[header::HEADER_LEN..];
        let mut chunk_payload_lens = Vec::new();
        while !cursor.is_empty() {
            chunk_payload_lens.push(chunk::read_chunk(&mut cursor).unwrap().len());
        }
        assert_eq!(chunk_payload_lens.len(), 2);
        assert_eq!(decompress(&compressed).unwrap(), data);
    }

    #[test]
    fn many_chunks_share_a_rolling_dictionary() {
        round_trip(&repeating_data(MAX_CHUNK_SIZE * 10));
        round_trip(&random_data(MAX_CHUNK_SIZE * 3 + 777));
    }

    #[test]
    fn zeros_round_trip_across_chunk_boundaries() {
        round_trip(&vec![0u8; 1000]);
        round_trip(&vec![0u8; MAX_CHUNK_SIZE + 1000]);
    }

    #[test]
    fn decompress_is_pure_and_idempotent() {
        let compressed = compress(&repeating_data(5000)).unwrap();
        assert_eq!(decompress(&compressed).unwrap(), decompress(&compressed).unwrap());
    }

    #[test]
    fn non_default_level_still_round_trips() {
        let data = random_data(MAX_CHUNK_SIZE + 500);
        let compressed = compress_with_level(&data, 1).unwrap();
        assert_eq!(decompress(&compressed).unwrap(), data);

        let compressed = compress_with_level(&data, -1).unwrap();
        assert_eq!(decompress(&compressed).unwrap(), data);
    }

    #[test]
    fn tampered_algorithm_byte_is_named_in_the_error() {
        let mut compressed = compress(b"hello, world").unwrap();
        compressed[7] = 3; // XPRESS
        let err = decompress(&compressed).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnsupportedAlgorithm);
        assert!(err.to_string().contains("XPRESS"));
    }

    #[test]
    fn tampered_length_field_fails_checksum() {
        let mut compressed = compress(b"hello, world").unwrap();
        compressed[15] ^= 0x01; // inside decompressed_length, covered by the CRC
        let err = decompress(&compressed).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ChecksumMismatch);
    }
}
