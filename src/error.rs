//! Error taxonomy for the query engine.

use thiserror::Error;
use tokio::time::error::Elapsed;

/// Errors that can occur while building a request, assembling a response, or decoding one.
///
/// Everything except [`A2SError::Io`] and [`A2SError::Timeout`] corresponds to a malformed or
/// out-of-protocol response and is never retried by the query engine.
#[derive(Error, Debug)]
pub enum A2SError {
    /// The leading 4-byte split-mode header was neither -1 (single) nor -2 (multi).
    #[error("invalid split-mode header: {0}")]
    InvalidSplitModeHeader(i32),

    /// A multi-packet response declared a total packet count below 2.
    #[error("multi-packet response declared total packets too low: {0}")]
    PacketTotalTooLow(u8),

    /// A fragment's index was not in `0..total`.
    #[error("packet index {index} out of bounds for total {total}")]
    PacketNumberIsOutOfBounds { index: u8, total: u8 },

    /// A later fragment's split-mode header did not match the first fragment's.
    #[error("response split-mode changed from {expected} to {actual}")]
    UnexpectedSplitModeChange { expected: i32, actual: i32 },

    /// A later fragment's answer ID did not match the first fragment's.
    #[error("response answer id changed from {expected} to {actual}")]
    UnexpectedAnswerIdChange { expected: i32, actual: i32 },

    /// A later fragment's declared total packet count did not match the first fragment's.
    #[error("total packet count changed from {expected} to {actual}")]
    TotalPacketsChangedFromInitial { expected: u8, actual: u8 },

    /// Two fragments of the same answer declared the same index.
    #[error("packet index {0} was repeated in a multi-packet response")]
    PacketNumberRepeated(u8),

    /// The first byte of the assembled payload did not match the expected response kind header.
    #[error("response message header was 0x{actual:02x}, expected 0x{expected:02x}")]
    IncorrectResponseMessageHeader { expected: u8, actual: u8 },

    /// The CRC32 of a decompressed payload did not match the declared checksum.
    #[error("assembled response checksum mismatch")]
    ChecksumMismatch,

    /// bz2 decompression of a compressed multi-packet response failed, or the decompressed
    /// length did not match the declared assembled size.
    #[error("failed to decompress response payload: {0}")]
    DecompressionFailed(String),

    /// A fixed-width field read ran past the end of the buffer.
    #[error("buffer exhausted while decoding a fixed-width field")]
    UnexpectedEof,

    /// Underlying socket I/O failure (bind, send, or receive).
    #[error("socket I/O error")]
    Io(#[from] std::io::Error),

    /// The query's deadline elapsed before assembly completed.
    #[error("query timed out")]
    Timeout(#[from] Elapsed),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, A2SError>;
