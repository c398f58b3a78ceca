//! Error type shared by all operations.
use thiserror::Error;

/// Errors reported by permutation, partition and character operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Two permutations (or a permutation and a slice) of different degrees were combined.
    #[error("incompatible degrees {left} and {right}")]
    IncompatibleDegree { left: usize, right: usize },
    /// A character was evaluated on a class of a different symmetric group.
    #[error("character of S_{expected} evaluated on a class of S_{found}")]
    DegreeMismatch { expected: usize, found: usize },
    /// Malformed cycle notation.
    #[error("invalid cycle notation at byte {position}: {reason}")]
    InvalidCycleSyntax {
        position: usize,
        reason: &'static str,
    },
    /// The images passed to a constructor do not form a bijection of `1..=n`.
    #[error("not a permutation of 1..={degree}")]
    NonBijectiveInput { degree: usize },
    /// The parts passed to a constructor are not a weakly decreasing list of positive integers.
    #[error("not a partition: {parts:?}")]
    InvalidPartition { parts: Vec<usize> },
    /// The positions passed to [`Perm::embed`](crate::Perm::embed) are not distinct points of the target degree.
    #[error("invalid embedding into degree {degree}: {reason}")]
    InvalidEmbedding {
        degree: usize,
        reason: &'static str,
    },
    /// A character value does not fit the requested integer type.
    #[error("character value overflows the requested integer type")]
    Overflow,
}

pub type Result<T> = std::result::Result<T, Error>;
