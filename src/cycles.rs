//! Cycle decompositions of permutations.
use std::fmt;
use std::ops::Deref;
use std::sync::atomic::Ordering;

use num_bigint::BigUint;
use num_integer::Integer;
use num_traits::One;

use crate::error::{Error, Result};
use crate::partition::Partition;
use crate::perm::{index_of, Perm};
use crate::Point;

/// The disjoint cycles of a permutation.
///
/// All cycles, including 1-cycles, are stored back to back in one vector. Cycles appear in the
/// order of their smallest point and each cycle starts at its smallest point.
#[derive(Clone, PartialEq, Eq)]
pub struct Cycles<T> {
    flat: Vec<T>,
    bounds: Vec<usize>,
}

impl<T: Point> Cycles<T> {
    /// Decompose the permutation with the given images of 1..=n.
    pub fn of(images: &[T]) -> Cycles<T> {
        let n = images.len();
        let mut seen = vec![false; n];
        let mut flat = Vec::with_capacity(n);
        let mut bounds = Vec::with_capacity(n + 1);
        bounds.push(0);

        for start in 0..n {
            if seen[start] {
                continue;
            }
            let mut pos = start;
            while !seen[pos] {
                seen[pos] = true;
                flat.push(T::from_point(pos + 1));
                pos = index_of(images[pos]);
            }
            bounds.push(flat.len());
        }

        Cycles { flat, bounds }
    }

    /// Number of cycles, counting 1-cycles.
    pub fn len(&self) -> usize {
        self.bounds.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The cycle with the given index.
    pub fn get(&self, index: usize) -> Option<Cycle<'_, T>> {
        let start = *self.bounds.get(index)?;
        let end = *self.bounds.get(index + 1)?;
        Some(Cycle(&self.flat[start..end]))
    }

    /// Returns an iterator over all cycles, including 1-cycles.
    pub fn iter(&self) -> CycleIter<'_, T> {
        CycleIter {
            cycles: self,
            index: 0,
        }
    }

    /// All points, cycle by cycle.
    pub fn flat(&self) -> &[T] {
        &self.flat
    }

    /// Offsets of the cycles in [`Cycles::flat`]: cycle i spans `bounds[i]..bounds[i + 1]`.
    pub fn bounds(&self) -> &[usize] {
        &self.bounds
    }

    pub fn lengths(&self) -> impl Iterator<Item = usize> + '_ {
        self.bounds.windows(2).map(|w| w[1] - w[0])
    }

    /// The cycle lengths in decreasing order.
    pub fn cycle_type(&self) -> Partition {
        let mut lengths: Vec<usize> = self.lengths().collect();
        lengths.sort_unstable_by(|a, b| b.cmp(a));
        Partition::from_sorted_unchecked(lengths)
    }

    /// Parity of the number of transpositions needed to write the permutation, 0 or 1.
    pub fn parity(&self) -> u8 {
        ((self.flat.len() - self.len()) % 2) as u8
    }

    /// The least common multiple of the cycle lengths.
    pub fn order(&self) -> BigUint {
        self.lengths()
            .fold(BigUint::one(), |acc, len| acc.lcm(&BigUint::from(len)))
    }
}

impl<T: Point> fmt::Debug for Cycles<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for cycle in self.iter() {
            fmt::Display::fmt(&cycle, f)?;
        }
        Ok(())
    }
}

/// A single cycle, starting at its smallest point.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Cycle<'a, T>(&'a [T]);

impl<'a, T> Cycle<'a, T> {
    pub fn as_slice(&self) -> &'a [T] {
        self.0
    }
}

impl<'a, T> Deref for Cycle<'a, T> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        self.0
    }
}

impl<'a, T: Point> fmt::Display for Cycle<'a, T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut first = true;
        for el in self.0 {
            f.write_str(if first { "(" } else { "," })?;
            first = false;
            fmt::Display::fmt(el, f)?;
        }
        f.write_str(if first { "()" } else { ")" })
    }
}

impl<'a, T: Point> fmt::Debug for Cycle<'a, T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

/// Iterator over the cycles of a decomposition.
#[derive(Clone)]
pub struct CycleIter<'a, T> {
    cycles: &'a Cycles<T>,
    index: usize,
}

impl<'a, T: Point> Iterator for CycleIter<'a, T> {
    type Item = Cycle<'a, T>;

    fn next(&mut self) -> Option<Cycle<'a, T>> {
        let cycle = self.cycles.get(self.index)?;
        self.index += 1;
        Some(cycle)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.cycles.len() - self.index;
        (remaining, Some(remaining))
    }
}

impl<'a, T: Point> ExactSizeIterator for CycleIter<'a, T> {}

impl<'a, T: Point> IntoIterator for &'a Cycles<T> {
    type Item = Cycle<'a, T>;
    type IntoIter = CycleIter<'a, T>;

    fn into_iter(self) -> CycleIter<'a, T> {
        self.iter()
    }
}

/// Structural queries backed by the cycle decomposition.
impl<T: Point> Perm<T> {
    /// The cycle decomposition of this permutation.
    ///
    /// The decomposition is computed on first use and cached until the next [`Perm::set`].
    /// Filling the cache clears the `modified` flag.
    pub fn cycles(&self) -> &Cycles<T> {
        let cycles = self.cycles.get_or_init(|| Cycles::of(&self.images));
        self.modified.store(false, Ordering::Release);
        cycles
    }

    /// Parity of this permutation, 0 for even and 1 for odd permutations.
    ///
    /// Uses the cached decomposition if there is one, otherwise walks the cycles directly without
    /// filling the cache.
    pub fn parity(&self) -> u8 {
        if let Some(cycles) = self.cycles.get() {
            return cycles.parity();
        }

        let mut seen = vec![false; self.degree()];
        let mut odd = false;
        for start in 0..self.degree() {
            if seen[start] {
                continue;
            }
            seen[start] = true;
            let mut pos = index_of(self.images[start]);
            while !seen[pos] {
                seen[pos] = true;
                odd = !odd;
                pos = index_of(self.images[pos]);
            }
        }
        odd as u8
    }

    /// The sign of this permutation, 1 for even and -1 for odd permutations.
    pub fn sign(&self) -> i8 {
        1 - 2 * self.parity() as i8
    }

    /// The cycle type of this permutation, its cycle lengths in decreasing order.
    ///
    /// Two permutations of the same degree are conjugate if and only if their cycle types agree.
    pub fn cycle_type(&self) -> Partition {
        self.cycles().cycle_type()
    }

    /// The order of this permutation in its symmetric group.
    ///
    /// Fails with [`Error::Overflow`] when the order does not fit the requested type; `BigUint`
    /// always succeeds.
    pub fn order<O>(&self) -> Result<O>
    where
        O: TryFrom<BigUint>,
    {
        O::try_from(self.cycles().order()).map_err(|_| Error::Overflow)
    }
}
