//! Permutations of finite sets.
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicBool, Ordering};

use num_integer::Integer;
use num_traits::{FromPrimitive, ToPrimitive};
use once_cell::sync::OnceCell;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::action::RightAction;
use crate::cycles::Cycles;
use crate::error::{Error, Result};
use crate::{El, Point};

/// A permutation of a finite set.
///
/// A permutation rearranges the elements of a finite set. It is a bijection from a set to the same
/// set.
///
/// Here these sets are always {1, ..., n}, where n is the degree of the permutation. The set of
/// permutations of {1, ..., n} is called the symmetric group of degree n and also written as
/// S<sub>n</sub>. Permutations of different degrees are never equal and cannot be composed; there
/// is no implicit extension by fixed points.
///
/// Internally a permutation is stored as a vector containing the images of 1, ..., n, together
/// with a lazily computed cycle decomposition. The decomposition is computed at most once per
/// state and is shared between threads querying the same permutation. [`Perm::set`] discards it
/// and raises the `modified` flag, which is cleared again when the next query refills the cache.
///
/// Products follow the right action convention: `g.compose(&h)` first applies `g` and then `h`.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(
        try_from = "Vec<T>",
        into = "Vec<T>",
        bound(serialize = "T: serde::Serialize", deserialize = "T: serde::Deserialize<'de>")
    )
)]
pub struct Perm<T: Point = El> {
    pub(crate) images: Vec<T>,
    pub(crate) cycles: OnceCell<Cycles<T>>,
    pub(crate) modified: AtomicBool,
}

#[inline]
pub(crate) fn index_of<T: Point>(point: T) -> usize {
    point.point().wrapping_sub(1)
}

impl<T: Point> Perm<T> {
    pub(crate) fn from_images(images: Vec<T>) -> Perm<T> {
        Perm {
            images,
            cycles: OnceCell::new(),
            modified: AtomicBool::new(false),
        }
    }

    /// Drop the cached cycle decomposition after the images changed.
    pub(crate) fn invalidate_cycles(&mut self) {
        self.cycles = OnceCell::new();
        *self.modified.get_mut() = true;
    }

    /// Whether the images changed since the cycle decomposition was last computed.
    pub fn is_modified(&self) -> bool {
        self.modified.load(Ordering::Acquire)
    }

    /// The identity permutation of degree `degree`.
    ///
    /// Panics when `degree` does not fit the point type.
    pub fn identity(degree: usize) -> Perm<T> {
        Perm::from_images((1..=degree).map(T::from_point).collect())
    }

    /// Create a permutation from a vector containing the images of 1..=n.
    ///
    /// Fails with [`Error::NonBijectiveInput`] if the vector does not correspond to a permutation.
    pub fn from_vec(images: Vec<T>) -> Result<Perm<T>> {
        Self::from_vec_with_scratch(images, &mut vec![])
    }

    /// Create a permutation from a vector containing the images of 1..=n.
    ///
    /// Fails with [`Error::NonBijectiveInput`] if the vector does not correspond to a permutation.
    /// The last parameter is used as scratch space and will be overwritten.
    pub fn from_vec_with_scratch(images: Vec<T>, scratch: &mut Vec<bool>) -> Result<Perm<T>> {
        let seen = scratch;
        seen.clear();
        seen.resize(images.len(), false);

        for &image in images.iter() {
            let index = index_of(image);
            if index >= images.len() || seen[index] {
                return Err(Error::NonBijectiveInput {
                    degree: images.len(),
                });
            }
            seen[index] = true;
        }

        Ok(Perm::from_images(images))
    }

    /// Create a permutation from a vector of images without checking that it is a bijection.
    ///
    /// All other operations assume a bijection of 1..=n and may panic or return meaningless
    /// results otherwise.
    pub fn from_vec_unchecked(images: Vec<T>) -> Perm<T> {
        Perm::from_images(images)
    }

    /// A uniformly random permutation of degree `degree`.
    pub fn random<R: Rng + ?Sized>(degree: usize, rng: &mut R) -> Perm<T> {
        let mut images: Vec<T> = (1..=degree).map(T::from_point).collect();
        images.shuffle(rng);
        Perm::from_images(images)
    }

    /// The size of the set this permutation acts on.
    pub fn degree(&self) -> usize {
        self.images.len()
    }

    /// The images of 1..=n. The image of point `i` is at index `i - 1`.
    pub fn as_slice(&self) -> &[T] {
        &self.images
    }

    /// The image of a point.
    ///
    /// Panics when the point is not in 1..=n.
    pub fn image(&self, point: usize) -> T {
        assert!(
            point >= 1 && point <= self.degree(),
            "point {} out of range 1..={}",
            point,
            self.degree()
        );
        self.images[point - 1]
    }

    /// Set the image of a point.
    ///
    /// This does not check that the permutation stays a bijection. The caller has to restore that
    /// invariant before using any other operation. The cached cycle decomposition is discarded
    /// and recomputed by the next query that needs it.
    ///
    /// Panics when the point is not in 1..=n.
    pub fn set(&mut self, point: usize, image: T) {
        assert!(
            point >= 1 && point <= self.degree(),
            "point {} out of range 1..={}",
            point,
            self.degree()
        );
        self.images[point - 1] = image;
        self.invalidate_cycles();
    }

    /// Whether every point is fixed.
    pub fn is_identity(&self) -> bool {
        self.images
            .iter()
            .enumerate()
            .all(|(i, &image)| index_of(image) == i)
    }

    /// The product of this permutation and `other`: first apply `self`, then `other`.
    pub fn compose(&self, other: &Perm<T>) -> Result<Perm<T>> {
        check_degrees(self.degree(), other.degree())?;
        Ok(self.then(other))
    }

    /// Composition for permutations already known to have equal degrees.
    fn then(&self, other: &Perm<T>) -> Perm<T> {
        Perm::from_images(
            self.images
                .iter()
                .map(|&image| other.images[index_of(image)])
                .collect(),
        )
    }

    /// The inverse of this permutation.
    pub fn inverse(&self) -> Perm<T> {
        let mut images = vec![T::zero(); self.degree()];
        for (i, &image) in self.images.iter().enumerate() {
            images[index_of(image)] = T::from_point(i + 1);
        }
        Perm::from_images(images)
    }

    /// The square of this permutation.
    pub fn square(&self) -> Perm<T> {
        self.then(self)
    }

    /// The conjugate `h⁻¹ self h` of this permutation by `h`.
    pub fn conjugate(&self, h: &Perm<T>) -> Result<Perm<T>> {
        check_degrees(self.degree(), h.degree())?;
        Ok(h.inverse().then(self).then(h))
    }

    /// A power of this permutation.
    ///
    /// Exponents from -3 to 3 are computed by composition. All other exponents use the cycle
    /// decomposition: every point moves `exponent mod l` steps along its cycle of length l.
    pub fn pow<E>(&self, exponent: E) -> Perm<T>
    where
        E: Integer + Clone + ToPrimitive + FromPrimitive,
    {
        if exponent < E::zero() && E::from_i8(-3).map_or(false, |min| exponent >= min) {
            return self.inverse().pow(E::zero() - exponent);
        }

        match exponent.to_usize() {
            Some(0) => Perm::identity(self.degree()),
            Some(1) => Perm::from_images(self.images.clone()),
            Some(2) => self.square(),
            Some(3) => self.square().then(self),
            _ => {
                let cycles = self.cycles();
                let mut images = vec![T::zero(); self.degree()];
                for cycle in cycles.iter() {
                    let len = cycle.len();
                    let shift = cycle_shift(&exponent, len);
                    for (i, &point) in cycle.iter().enumerate() {
                        images[index_of(point)] = cycle[(i + shift) % len];
                    }
                }
                Perm::from_images(images)
            }
        }
    }

    /// A power of this permutation, computed by repeated squaring.
    ///
    /// Gives the same result as [`Perm::pow`] without computing or caching a cycle decomposition.
    pub fn pow_by_squaring<E>(&self, exponent: E) -> Perm<T>
    where
        E: Integer + Clone + ToPrimitive + FromPrimitive,
    {
        if exponent < E::zero() {
            // g^k = (g⁻¹)^(-(k + 1)) g⁻¹, which does not negate the minimum of E
            let inverse = self.inverse();
            let rest = E::zero() - (exponent + E::one());
            return inverse.pow_by_squaring(rest).then(&inverse);
        }

        match exponent.to_usize() {
            Some(0) => Perm::identity(self.degree()),
            Some(1) => Perm::from_images(self.images.clone()),
            Some(2) => self.square(),
            Some(3) => self.square().then(self),
            _ => {
                let odd = exponent.is_odd();
                let half_exp = exponent / (E::one() + E::one());

                let mut result = self.pow_by_squaring(half_exp).square();

                if odd {
                    result = result.then(self);
                }
                result
            }
        }
    }

    /// Lift this permutation into degree `degree`.
    ///
    /// Point `i` of this permutation is identified with `positions[i - 1]`. The result acts like
    /// this permutation on the listed positions and fixes every other point. The positions must be
    /// distinct points of 1..=degree, one per point of this permutation.
    pub fn embed(&self, degree: usize, positions: &[usize]) -> Result<Perm<T>> {
        if positions.len() != self.degree() {
            return Err(Error::InvalidEmbedding {
                degree,
                reason: "expected one position per point",
            });
        }
        let mut used = vec![false; degree];
        for &position in positions {
            if position == 0 || position > degree {
                return Err(Error::InvalidEmbedding {
                    degree,
                    reason: "position out of range",
                });
            }
            if used[position - 1] {
                return Err(Error::InvalidEmbedding {
                    degree,
                    reason: "positions are not distinct",
                });
            }
            used[position - 1] = true;
        }

        let mut lifted = Perm::identity(degree);
        for (&position, &image) in positions.iter().zip(self.images.iter()) {
            lifted.images[position - 1] = T::from_point(positions[index_of(image)]);
        }
        Ok(lifted)
    }

    /// Display this permutation as the list of its images, e.g. `[2, 3, 1]`.
    pub fn array_notation(&self) -> ArrayNotation<'_, T> {
        ArrayNotation(self)
    }
}

fn check_degrees(left: usize, right: usize) -> Result<()> {
    if left == right {
        Ok(())
    } else {
        Err(Error::IncompatibleDegree { left, right })
    }
}

/// The number of steps `exponent` advances along a cycle of length `len`.
fn cycle_shift<E>(exponent: &E, len: usize) -> usize
where
    E: Integer + Clone + ToPrimitive + FromPrimitive,
{
    let shift = match E::from_usize(len) {
        Some(len) => exponent.mod_floor(&len).to_usize(),
        // the exponent type cannot hold len, so |exponent| <= len
        None if *exponent >= E::zero() => exponent.to_usize(),
        None => (E::zero() - (exponent.clone() + E::one()))
            .to_usize()
            .map(|magnitude| len - (magnitude + 1)),
    };
    shift.map_or(0, |shift| shift % len)
}

impl<T: Point> Clone for Perm<T> {
    fn clone(&self) -> Perm<T> {
        Perm {
            images: self.images.clone(),
            cycles: self.cycles.clone(),
            modified: AtomicBool::new(self.is_modified()),
        }
    }
}

impl<T: Point> Default for Perm<T> {
    /// The identity permutation of degree 0.
    fn default() -> Perm<T> {
        Perm::identity(0)
    }
}

impl<T: Point> From<Perm<T>> for Vec<T> {
    fn from(perm: Perm<T>) -> Vec<T> {
        perm.images
    }
}

impl<T: Point> TryFrom<Vec<T>> for Perm<T> {
    type Error = Error;

    fn try_from(images: Vec<T>) -> Result<Perm<T>> {
        Perm::from_vec(images)
    }
}

/// Composition of a permutation on the right.
///
/// `h.right_apply(g)` is `g.compose(&h)`.
impl<T: Point> RightAction<Perm<T>> for Perm<T> {
    type Error = Error;

    fn right_apply_to(&self, perm: &mut Perm<T>) -> Result<()> {
        check_degrees(perm.degree(), self.degree())?;
        for image in perm.images.iter_mut() {
            *image = self.images[index_of(*image)];
        }
        perm.cycles = OnceCell::new();
        *perm.modified.get_mut() = false;
        Ok(())
    }
}

/// Application of a permutation to a slice.
///
/// For a permutation g, this moves the element of the slice at (1-based) position i to position
/// g(i).
impl<T: Point, X> RightAction<[X]> for Perm<T> {
    type Error = Error;

    fn right_apply_to(&self, slice: &mut [X]) -> Result<()> {
        check_degrees(slice.len(), self.degree())?;

        for cycle in self.cycles().iter() {
            if let Some((&first, rest)) = cycle.split_first() {
                for &point in rest {
                    slice.swap(index_of(first), index_of(point));
                }
            }
        }
        Ok(())
    }
}

impl<T: Point, X> RightAction<Vec<X>> for Perm<T> {
    type Error = Error;

    fn right_apply_to(&self, vec: &mut Vec<X>) -> Result<()> {
        RightAction::<[X]>::right_apply_to(self, &mut vec[..])
    }
}

impl<T: Point> fmt::Display for Perm<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let cycles = self.cycles();

        let mut empty = true;

        for cycle in cycles.iter().filter(|cycle| cycle.len() > 1) {
            empty = false;
            fmt::Display::fmt(&cycle, f)?;
        }

        if empty {
            f.write_str("()")?;
        }

        Ok(())
    }
}

impl<T: Point> fmt::Debug for Perm<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl<T: Point> PartialEq for Perm<T> {
    fn eq(&self, other: &Perm<T>) -> bool {
        self.images == other.images
    }
}

impl<T: Point> Eq for Perm<T> {}

impl<T: Point> Hash for Perm<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.images.hash(state);
    }
}

/// Array notation of a permutation, see [`Perm::array_notation`].
pub struct ArrayNotation<'a, T: Point>(&'a Perm<T>);

impl<'a, T: Point> fmt::Display for ArrayNotation<'a, T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Debug::fmt(self.0.as_slice(), f)
    }
}
