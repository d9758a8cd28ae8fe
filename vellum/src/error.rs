/// Errors returned by [`crate::DataProvider`] and the list operations forwarding to it.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// An index fell outside the valid range for the operation.
    ///
    /// Reads, removals, replacements and invalidations accept `0..len`; insertions accept
    /// `0..=len`.
    #[error("index {index} out of range for length {len}")]
    IndexOutOfRange { index: usize, len: usize },
}

pub type Result<T> = core::result::Result<T, Error>;
