//! The 6-byte per-chunk prefix that frames each DEFLATE payload.
use byteorder::{ByteOrder, LittleEndian, WriteBytesExt};

use crate::error::Error;

/// Fixed padding marker following every chunk's size field, stored as the
/// ASCII bytes `'C'`, `'K'` and checked back as this little-endian `u16`.
///
/// The prose describing this marker elsewhere is internally inconsistent
/// about byte order; this value matches the reference implementation the
/// format was taken from (see DESIGN.md).
pub(crate) const PADDING: u16 = 0x4B43;

/// Length of the size + padding prefix, in bytes.
const PREFIX_LEN: usize = 6;

/// Appends one framed chunk (size prefix, padding marker, payload) to `out`.
pub(crate) fn write_chunk(out: &mut Vec<u8>, payload: &[u8]) {
    let framed_size = payload.len() as u32 + 2;
    out.write_u32::<LittleEndian>(framed_size)
        .expect("writes into a Vec never fail");
    out.write_u16::<LittleEndian>(PADDING)
        .expect("writes into a Vec never fail");
    out.extend_from_slice(payload);
}

/// Reads one framed chunk from the front of `*cursor`, advancing it past the
/// chunk on success.
pub(crate) fn read_chunk<'a>(cursor: &mut &'a [u8]) -> Result<&'a [u8], Error> {
    if cursor.len() < PREFIX_LEN {
        return Err(Error::TruncatedChunk);
    }

    let framed_size = LittleEndian::read_u32(&cursor[0..4]) as usize;
    let padding = LittleEndian::read_u16(&cursor[4..6]);
    if padding != PADDING {
        return Err(Error::MalformedChunkPadding { actual: padding });
    }

    let payload_len = framed_size
        .checked_sub(2)
        .ok_or(Error::TruncatedChunk)?;
    let rest = &cursor[PREFIX_LEN..];
    if rest.len() < payload_len {
        return Err(Error::TruncatedChunk);
    }

    let (payload, remaining) = rest.split_at(payload_len);
    *cursor = remaining;
    Ok(payload)
}
