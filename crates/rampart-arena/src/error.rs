//! Arena-specific error types.

use thiserror::Error;

/// Errors that can occur during arena allocation.
///
/// Both variants indicate a sizing defect in the caller's memory plan and
/// are treated as fatal by the game loop.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ArenaError {
    /// The remaining block is smaller than the request.
    #[error("arena exhausted: requested {requested} bytes, {remaining} remaining")]
    OutOfMemory {
        /// Number of bytes requested, alignment padding included.
        requested: usize,
        /// Bytes left in the block.
        remaining: usize,
    },
    /// A typed region could not be aligned for its element type.
    #[error("cannot align arena region to {align} bytes")]
    Misaligned {
        /// Required alignment of the element type.
        align: usize,
    },
}
