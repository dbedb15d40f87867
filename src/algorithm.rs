use std::convert::TryFrom;

/// Compression algorithm identifiers used by the Cabinet compression API.
///
/// Only [`Algorithm::MsZip`] is implemented by this crate; the others are
/// recognized so that decode errors can name the algorithm a container
/// actually claims instead of reporting a bare byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Algorithm {
    MsZip = 2,
    Xpress = 3,
    XpressHuff = 4,
    Lzms = 5,
}

impl Algorithm {
    /// The symbolic name as used by `CreateCompressor`'s `Algorithm` parameter.
    pub(crate) fn name(self) -> &'static str {
        match self {
            Algorithm::MsZip => "MSZIP",
            Algorithm::Xpress => "XPRESS",
            Algorithm::XpressHuff => "XPRESS_HUFF",
            Algorithm::Lzms => "LZMS",
        }
    }
}

impl TryFrom<u8> for Algorithm {
    type Error = ();

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Ok(match value {
            2 => Self::MsZip,
            3 => Self::Xpress,
            4 => Self::XpressHuff,
            5 => Self::Lzms,
            _ => return Err(()),
        })
    }
}

/// Best-effort symbolic name for an algorithm byte, for error messages.
pub(crate) fn name_of(value: u8) -> Option<&'static str> {
    Algorithm::try_from(value).ok().map(Algorithm::name)
}
