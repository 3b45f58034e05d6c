//! Errors returned by the fallible operations of the crate.

use thiserror::Error;

/// Shorthand for results carrying an [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Everything that can go wrong when parsing, optimizing or growing colors.
#[derive(Debug, Error, PartialEq)]
pub enum Error {
    /// The literal could not be parsed into a color.
    #[error("parse error: {0}")]
    Parse(String),

    /// The space name is not one of the supported spaces.
    #[error("unknown color space: {0}")]
    UnknownSpace(String),

    /// The frozen mask does not line up with the colors.
    #[error("frozen mask has {mask} entries but there are {colors} colors")]
    Constraint {
        /// Length of the mask.
        mask: usize,
        /// Number of colors.
        colors: usize,
    },

    /// A parameter is out of its valid range.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}
