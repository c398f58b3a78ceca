//! Symmetric groups and exhaustive enumeration of their elements.
use std::iter::FusedIterator;
use std::marker::PhantomData;

use num_bigint::BigUint;
use rand::Rng;

use crate::error::{Error, Result};
use crate::partition::factorial;
use crate::perm::Perm;
use crate::{El, Point};

/// The symmetric group S<sub>n</sub> of all permutations of {1, ..., n} with points of type `T`.
///
/// A symmetric group is determined by its degree and its point type. It acts as a factory for
/// permutations and enumerates all of its n! elements.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct SymmetricGroup<T: Point = El> {
    degree: usize,
    point: PhantomData<T>,
}

impl<T: Point> SymmetricGroup<T> {
    /// The symmetric group of the given degree.
    ///
    /// Panics when `degree` does not fit the point type.
    pub fn new(degree: usize) -> SymmetricGroup<T> {
        assert!(
            T::from_usize(degree).is_some(),
            "degree {} does not fit the point type",
            degree
        );
        SymmetricGroup {
            degree,
            point: PhantomData,
        }
    }

    pub fn degree(&self) -> usize {
        self.degree
    }

    /// The number of elements, n!.
    ///
    /// Fails with [`Error::Overflow`] when n! does not fit the requested type.
    pub fn order<O>(&self) -> Result<O>
    where
        O: TryFrom<BigUint>,
    {
        O::try_from(factorial(self.degree)).map_err(|_| Error::Overflow)
    }

    pub fn identity(&self) -> Perm<T> {
        Perm::identity(self.degree)
    }

    /// The element with the given images, see [`Perm::from_vec`].
    pub fn perm(&self, images: Vec<T>) -> Result<Perm<T>> {
        if images.len() != self.degree {
            return Err(Error::IncompatibleDegree {
                left: self.degree,
                right: images.len(),
            });
        }
        Perm::from_vec(images)
    }

    pub fn contains(&self, perm: &Perm<T>) -> bool {
        perm.degree() == self.degree
    }

    /// A uniformly random element.
    pub fn random<R: Rng + ?Sized>(&self, rng: &mut R) -> Perm<T> {
        Perm::random(self.degree, rng)
    }

    /// In-place enumeration of all elements, sharing one buffer.
    pub fn heap_permutations(&self) -> HeapPermutations<T> {
        HeapPermutations::new(self.degree)
    }

    /// Iterator over all elements, each as a separate [`Perm`].
    ///
    /// This copies every element. [`SymmetricGroup::for_each_in_place`] and
    /// [`SymmetricGroup::heap_permutations`] avoid that.
    pub fn elements(&self) -> Elements<T> {
        Elements {
            heap: self.heap_permutations(),
        }
    }

    /// Call `f` with the images of every element, reusing a single buffer.
    pub fn for_each_in_place<F>(&self, mut f: F)
    where
        F: FnMut(&[T]),
    {
        let mut heap = self.heap_permutations();
        while let Some(images) = heap.next_state() {
            f(images);
        }
    }
}

impl<'a, T: Point> IntoIterator for &'a SymmetricGroup<T> {
    type Item = Perm<T>;
    type IntoIter = Elements<T>;

    fn into_iter(self) -> Elements<T> {
        self.elements()
    }
}

/// Heap's algorithm, without recursion.
///
/// Each step after the first applies a single transposition to one buffer of images, so that the
/// sequence of states runs through all n! permutations exactly once, starting with the identity.
/// A state is only valid until the next call of [`HeapPermutations::next_state`]; copy it to keep
/// it. Once exhausted the enumeration cannot be restarted.
#[derive(Clone, Debug)]
pub struct HeapPermutations<T> {
    images: Vec<T>,
    // counters[k - 1] is the counter c[k] for the 1-based position k
    counters: Vec<usize>,
    started: bool,
    done: bool,
}

impl<T: Point> HeapPermutations<T> {
    pub fn new(degree: usize) -> HeapPermutations<T> {
        HeapPermutations {
            images: (1..=degree).map(T::from_point).collect(),
            counters: vec![1; degree],
            started: false,
            done: false,
        }
    }

    /// Advance to the next permutation and return its images.
    pub fn next_state(&mut self) -> Option<&[T]> {
        if !self.started {
            self.started = true;
            return Some(&self.images);
        }
        if self.done {
            return None;
        }

        let degree = self.images.len();
        let mut k = 1;
        while k <= degree && self.counters[k - 1] >= k {
            self.counters[k - 1] = 1;
            k += 1;
        }
        if k > degree {
            log::trace!("enumerated all permutations of degree {}", degree);
            self.done = true;
            return None;
        }

        if k % 2 == 1 {
            self.images.swap(k - 1, 0);
        } else {
            self.images.swap(k - 1, self.counters[k - 1] - 1);
        }
        self.counters[k - 1] += 1;

        Some(&self.images)
    }
}

/// Iterator over all elements of a symmetric group, see [`SymmetricGroup::elements`].
#[derive(Clone, Debug)]
pub struct Elements<T> {
    heap: HeapPermutations<T>,
}

impl<T: Point> Iterator for Elements<T> {
    type Item = Perm<T>;

    fn next(&mut self) -> Option<Perm<T>> {
        self.heap
            .next_state()
            .map(|images| Perm::from_images(images.to_vec()))
    }
}

impl<T: Point> FusedIterator for Elements<T> {}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::HashSet;

    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn heap_order_for_three() {
        let mut states = vec![];
        SymmetricGroup::<u8>::new(3).for_each_in_place(|images| states.push(images.to_vec()));
        assert_eq!(
            states,
            vec![
                vec![1, 2, 3],
                vec![2, 1, 3],
                vec![3, 1, 2],
                vec![1, 3, 2],
                vec![2, 3, 1],
                vec![3, 2, 1],
            ]
        );
    }

    #[test]
    fn enumeration_is_complete() {
        for degree in 0..=6 {
            let group = SymmetricGroup::<El>::new(degree);
            let elements: Vec<Perm> = group.elements().collect();
            let order: usize = group.order().unwrap();
            assert_eq!(elements.len(), order);

            let distinct: HashSet<Perm> = elements.iter().cloned().collect();
            assert_eq!(distinct.len(), order);

            for g in elements {
                assert!(group.contains(&g));
                assert!(Perm::from_vec(Vec::from(g)).is_ok());
            }
        }
    }

    #[test]
    fn consecutive_states_differ_by_a_transposition() {
        let mut heap = HeapPermutations::<u32>::new(5);
        let mut previous = heap.next_state().unwrap().to_vec();
        while let Some(images) = heap.next_state() {
            let moved = images
                .iter()
                .zip(previous.iter())
                .filter(|(a, b)| a != b)
                .count();
            assert_eq!(moved, 2);
            previous = images.to_vec();
        }
        assert!(heap.next_state().is_none());
    }

    #[test]
    fn even_permutations_are_half() {
        let group = SymmetricGroup::<i16>::new(5);
        let even = group.elements().filter(|g| g.parity() == 0).count();
        assert_eq!(even, 60);
    }

    #[test]
    fn factory() {
        let group = SymmetricGroup::<u32>::new(4);
        assert_eq!(group, SymmetricGroup::new(4));
        assert_ne!(group, SymmetricGroup::new(5));
        assert!(group.identity().is_identity());
        assert!(group.perm(vec![2, 1, 4, 3]).is_ok());
        assert_eq!(
            group.perm(vec![2, 1, 3]),
            Err(Error::IncompatibleDegree { left: 4, right: 3 })
        );
        assert_eq!(group.order::<u64>().unwrap(), 24);
        assert_eq!(SymmetricGroup::<u32>::new(25).order::<u64>(), Err(Error::Overflow));

        let mut rng = StdRng::seed_from_u64(5);
        assert!(group.contains(&group.random(&mut rng)));
        assert_eq!((&group).into_iter().count(), 24);
    }
}
