use thiserror::Error;

/// Errors surfaced by the VByte and posting-list codecs.
///
/// Decompression callers are expected to drop the offending posting list
/// and carry on; compression callers treat these as hard input errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CodecError {
    /// Ran out of bytes before seeing a terminator byte.
    #[error("vbyte decode: truncated input")]
    Truncated,

    /// More than five groups, or a terminator payload past 32 bits.
    #[error("vbyte decode: value too large")]
    Overflow,

    /// Posting list handed to the compressor was not sorted by doc id.
    #[error("posting list must be sorted by doc id")]
    UnsortedPostings,

    /// Posting frequency of zero; every stored posting has freq >= 1.
    #[error("posting frequency must be positive")]
    ZeroFrequency,
}
