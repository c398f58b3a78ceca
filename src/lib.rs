//! Permutations, symmetric groups and their characters
//!
//! This crate provides permutations of finite sets with a cached cycle decomposition, exhaustive
//! enumeration of symmetric groups and the irreducible characters of symmetric groups computed by
//! the Murnaghan-Nakayama rule.
//!
pub mod action;
pub mod character;
pub mod cycles;
pub mod error;
pub mod group;
pub mod parse;
pub mod partition;
pub mod perm;

use std::fmt;
use std::hash::Hash;

use num_traits::{FromPrimitive, PrimInt, ToPrimitive};

pub use crate::character::{
    character, character_of, character_table, character_value, Character, CharacterMemo,
    CharacterValue,
};
pub use crate::cycles::Cycles;
pub use crate::error::{Error, Result};
pub use crate::group::SymmetricGroup;
pub use crate::partition::Partition;
pub use crate::perm::Perm;

/// Default point type.
///
/// Points are the positive integers `1..=n`, stored in a machine integer (`u32` unless a
/// permutation picks another [`Point`] type).
pub type El = u32;

/// Integer types usable as points of a permutation.
///
/// Any primitive integer, signed or unsigned, qualifies. A permutation of degree n requires n to
/// be representable in the point type.
pub trait Point:
    PrimInt + FromPrimitive + ToPrimitive + Hash + fmt::Debug + fmt::Display + Send + Sync + 'static
{
    /// Converts a (1-based) point number into the point type.
    ///
    /// Panics when the number does not fit.
    fn from_point(point: usize) -> Self {
        Self::from_usize(point)
            .unwrap_or_else(|| panic!("point {} does not fit the point type", point))
    }

    /// Converts a point into its 1-based number. Returns 0 for values that are not points.
    fn point(self) -> usize {
        self.to_usize().unwrap_or(0)
    }
}

impl<T> Point for T where
    T: PrimInt
        + FromPrimitive
        + ToPrimitive
        + Hash
        + fmt::Debug
        + fmt::Display
        + Send
        + Sync
        + 'static
{
}
