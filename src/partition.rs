//! Integer partitions and their beta-set encoding.
use std::fmt;

use bitvec::vec::BitVec;
use num_bigint::BigUint;
use num_traits::One;

use crate::error::{Error, Result};

/// A partition of an integer n: a weakly decreasing list of positive integers summing to n.
///
/// Partitions of n label both the conjugacy classes of S<sub>n</sub> (as cycle types) and its
/// irreducible representations.
#[derive(Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "Vec<usize>", into = "Vec<usize>"))]
pub struct Partition {
    parts: Vec<usize>,
}

impl Partition {
    /// Create a partition from weakly decreasing positive parts.
    pub fn new(parts: impl Into<Vec<usize>>) -> Result<Partition> {
        let parts = parts.into();
        if parts.iter().any(|&p| p == 0) || parts.windows(2).any(|w| w[0] < w[1]) {
            return Err(Error::InvalidPartition { parts });
        }
        Ok(Partition { parts })
    }

    /// Create a partition from positive parts in any order.
    pub fn from_unsorted(parts: impl Into<Vec<usize>>) -> Result<Partition> {
        let mut parts = parts.into();
        parts.sort_unstable_by(|a, b| b.cmp(a));
        Partition::new(parts)
    }

    pub(crate) fn from_sorted_unchecked(parts: Vec<usize>) -> Partition {
        debug_assert!(parts.windows(2).all(|w| w[0] >= w[1]));
        Partition { parts }
    }

    /// All partitions of `n`, in reverse lexicographic order starting with `[n]`.
    pub fn all(n: usize) -> Partitions {
        Partitions {
            next: Some(if n == 0 { vec![] } else { vec![n] }),
        }
    }

    /// The number being partitioned.
    pub fn n(&self) -> usize {
        self.parts.iter().sum()
    }

    /// Number of parts.
    pub fn len(&self) -> usize {
        self.parts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    pub fn parts(&self) -> &[usize] {
        &self.parts
    }

    pub fn iter(&self) -> std::slice::Iter<'_, usize> {
        self.parts.iter()
    }

    /// The conjugate partition, obtained by transposing the Young diagram.
    pub fn conjugate(&self) -> Partition {
        let columns = self.parts.first().copied().unwrap_or(0);
        let parts = (0..columns)
            .map(|j| self.parts.iter().take_while(|&&p| p > j).count())
            .collect();
        Partition { parts }
    }

    /// Order of the centralizer of a permutation with this cycle type.
    ///
    /// This is the product of `i^m * m!` over all part sizes `i` occurring `m` times.
    pub fn centralizer_order(&self) -> BigUint {
        let mut result = BigUint::one();
        let mut run = 0usize;
        for (pos, &part) in self.parts.iter().enumerate() {
            run = if pos > 0 && self.parts[pos - 1] == part {
                run + 1
            } else {
                1
            };
            result *= part * run;
        }
        result
    }

    /// Number of permutations in S<sub>n</sub> with this cycle type.
    pub fn class_size(&self) -> BigUint {
        factorial(self.n()) / self.centralizer_order()
    }

    /// Dimension of the irreducible representation labeled by this partition.
    ///
    /// Computed with the hook length formula.
    pub fn dimension(&self) -> BigUint {
        let conjugate = self.conjugate();
        let mut hooks = BigUint::one();
        for (i, &row) in self.parts.iter().enumerate() {
            for (j, &column) in conjugate.parts[..row].iter().enumerate() {
                hooks *= (row - j) + (column - i) - 1;
            }
        }
        factorial(self.n()) / hooks
    }
}

impl fmt::Display for Partition {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Debug::fmt(&self.parts, f)
    }
}

impl fmt::Debug for Partition {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl From<Partition> for Vec<usize> {
    fn from(partition: Partition) -> Vec<usize> {
        partition.parts
    }
}

impl TryFrom<Vec<usize>> for Partition {
    type Error = Error;

    fn try_from(parts: Vec<usize>) -> Result<Partition> {
        Partition::new(parts)
    }
}

impl<'a> IntoIterator for &'a Partition {
    type Item = &'a usize;
    type IntoIter = std::slice::Iter<'a, usize>;

    fn into_iter(self) -> Self::IntoIter {
        self.parts.iter()
    }
}

/// Iterator over all partitions of an integer.
#[derive(Clone, Debug)]
pub struct Partitions {
    next: Option<Vec<usize>>,
}

impl Iterator for Partitions {
    type Item = Partition;

    fn next(&mut self) -> Option<Partition> {
        let current = self.next.take()?;

        let mut parts = current.clone();
        let mut rest = 0;
        while parts.last() == Some(&1) {
            parts.pop();
            rest += 1;
        }
        if let Some(last) = parts.pop() {
            let part = last - 1;
            rest += 1;
            parts.push(part);
            while rest > part {
                parts.push(part);
                rest -= part;
            }
            if rest > 0 {
                parts.push(rest);
            }
            self.next = Some(parts);
        }

        Some(Partition { parts: current })
    }
}

pub(crate) fn factorial(n: usize) -> BigUint {
    (1..=n).fold(BigUint::one(), |acc, k| acc * k)
}

/// Beta-set encoding of a partition.
///
/// A partition with k parts λ<sub>1</sub> ≥ ... ≥ λ<sub>k</sub> is encoded by the set of its
/// first-column hook lengths λ<sub>i</sub> + k - i, stored as a bit sequence where bit j is set
/// iff j is a hook length. Padding a partition with zero parts shifts the set and adds 0, so the
/// encoding is normalized to have bit 0 clear and no trailing zero bits. The empty partition is
/// encoded by the empty sequence.
///
/// Removing a rim hook of size s corresponds to moving a set bit at position p down to a clear
/// position p - s. The leg length of the hook is the number of set bits strictly between.
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct BetaSet {
    bits: BitVec,
}

impl BetaSet {
    pub fn new(partition: &Partition) -> BetaSet {
        let k = partition.len();
        let len = partition.parts.first().map_or(0, |&first| first + k);
        let mut bits = BitVec::repeat(false, len);
        for (i, &part) in partition.parts.iter().enumerate() {
            bits.set(part + (k - 1 - i), true);
        }
        BetaSet { bits }
    }

    /// Number of boxes of the encoded partition.
    pub fn size(&self) -> usize {
        self.bits
            .iter_ones()
            .enumerate()
            .map(|(index, position)| position - index)
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    pub fn to_partition(&self) -> Partition {
        let mut parts: Vec<usize> = self
            .bits
            .iter_ones()
            .enumerate()
            .map(|(index, position)| position - index)
            .filter(|&part| part > 0)
            .collect();
        parts.reverse();
        Partition { parts }
    }

    /// All rim hooks of the given size, as pairs of the remaining shape and the hook's leg length.
    pub fn rim_hooks(&self, size: usize) -> impl Iterator<Item = (BetaSet, usize)> + '_ {
        self.bits
            .iter_ones()
            .filter(move |&p| size > 0 && p >= size && !self.bits[p - size])
            .map(move |p| {
                let leg = self.bits[p - size + 1..p].count_ones();
                let mut bits = self.bits.clone();
                bits.set(p, false);
                bits.set(p - size, true);
                (BetaSet::normalized(bits), leg)
            })
    }

    fn normalized(mut bits: BitVec) -> BetaSet {
        let leading = bits.leading_ones();
        if leading > 0 {
            bits.drain(..leading);
        }
        let len = bits.last_one().map_or(0, |last| last + 1);
        bits.truncate(len);
        BetaSet { bits }
    }
}

impl fmt::Debug for BetaSet {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("BetaSet(")?;
        for bit in self.bits.iter() {
            f.write_str(if *bit { "1" } else { "0" })?;
        }
        f.write_str(")")
    }
}

impl From<&Partition> for BetaSet {
    fn from(partition: &Partition) -> BetaSet {
        BetaSet::new(partition)
    }
}
