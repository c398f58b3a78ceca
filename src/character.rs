//! Irreducible characters of symmetric groups.
//!
//! The irreducible characters of S<sub>n</sub> are labeled by the partitions λ of n and are
//! constant on conjugacy classes, which are labeled by cycle types μ, again partitions of n. The
//! value χ<sub>λ</sub>(μ) is computed by the Murnaghan-Nakayama rule
//!
//! χ<sub>λ</sub>(μ) = Σ<sub>ξ</sub> (-1)<sup>leg(ξ)</sup> χ<sub>λ∖ξ</sub>(μ<sub>2</sub>, μ<sub>3</sub>, ...)
//!
//! where ξ runs over the rim hooks of λ of size μ<sub>1</sub> and χ of the empty partition is 1.
//! Shapes are handled in their [`BetaSet`] encoding, where removing a rim hook moves a single bit.
//!
//! Intermediate values only depend on the remaining shape and the remaining parts of μ, so they
//! are stored in a [`CharacterMemo`] that is shared between all characters evaluated with it. Each
//! value type has a process-wide memo, see [`CharacterValue::shared_memo`]; a private memo can be
//! passed with [`Character::with_memo`].
use std::fmt;

use ahash::AHashMap;
use num_bigint::BigInt;
use num_traits::{CheckedAdd, CheckedSub, One, Zero};
use once_cell::sync::Lazy;
use parking_lot::RwLock;

use crate::error::{Error, Result};
use crate::partition::{BetaSet, Partition};
use crate::perm::Perm;
use crate::Point;

/// Integer types character values can be computed in.
///
/// `i64` is fast but fails with [`Error::Overflow`] for large characters, `BigInt` never fails.
pub trait CharacterValue:
    Clone + fmt::Debug + Zero + One + CheckedAdd + CheckedSub + Send + Sync + 'static
{
    /// The process-wide memo table for this value type.
    fn shared_memo() -> &'static CharacterMemo<Self>;
}

static MACHINE_MEMO: Lazy<CharacterMemo<i64>> = Lazy::new(CharacterMemo::new);
static BIG_MEMO: Lazy<CharacterMemo<BigInt>> = Lazy::new(CharacterMemo::new);

impl CharacterValue for i64 {
    fn shared_memo() -> &'static CharacterMemo<i64> {
        &MACHINE_MEMO
    }
}

impl CharacterValue for BigInt {
    fn shared_memo() -> &'static CharacterMemo<BigInt> {
        &BIG_MEMO
    }
}

type MemoKey = (BetaSet, Box<[usize]>);

/// Memo table of character values, keyed by a shape and the remaining parts of a cycle type.
///
/// Entries are written once and never removed. Values are computed outside of the lock; when two
/// threads compute the same entry, the first insertion wins and both computed the same value.
pub struct CharacterMemo<V> {
    table: RwLock<AHashMap<MemoKey, V>>,
}

impl<V: Clone> CharacterMemo<V> {
    pub fn new() -> CharacterMemo<V> {
        CharacterMemo {
            table: RwLock::new(AHashMap::new()),
        }
    }

    pub fn with_capacity(capacity: usize) -> CharacterMemo<V> {
        CharacterMemo {
            table: RwLock::new(AHashMap::with_capacity(capacity)),
        }
    }

    /// Number of stored values.
    pub fn len(&self) -> usize {
        self.table.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn get(&self, key: &MemoKey) -> Option<V> {
        self.table.read().get(key).cloned()
    }

    /// Insert a value unless the key is present and return the stored value.
    fn insert(&self, key: MemoKey, value: V) -> V {
        self.table.write().entry(key).or_insert(value).clone()
    }
}

impl<V: Clone> Default for CharacterMemo<V> {
    fn default() -> Self {
        CharacterMemo::new()
    }
}

impl<V> fmt::Debug for CharacterMemo<V> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("CharacterMemo")
            .field("len", &self.table.read().len())
            .finish()
    }
}

/// The irreducible character of S<sub>n</sub> labeled by a partition of n.
///
/// The partition is encoded once on construction, so evaluating the same character on many
/// permutations or classes is cheap.
pub struct Character<'m, V: CharacterValue> {
    partition: Partition,
    shape: BetaSet,
    memo: &'m CharacterMemo<V>,
}

impl<V: CharacterValue> Character<'static, V> {
    /// The character labeled by `partition`, using the process-wide memo of `V`.
    pub fn new(partition: Partition) -> Character<'static, V> {
        Character::with_memo(partition, V::shared_memo())
    }
}

impl<'m, V: CharacterValue> Character<'m, V> {
    /// The character labeled by `partition`, using the given memo.
    pub fn with_memo(partition: Partition, memo: &'m CharacterMemo<V>) -> Character<'m, V> {
        let shape = BetaSet::new(&partition);
        Character {
            partition,
            shape,
            memo,
        }
    }

    pub fn partition(&self) -> &Partition {
        &self.partition
    }

    /// The degree n of the symmetric group this is a character of.
    pub fn degree(&self) -> usize {
        self.partition.n()
    }

    /// The value at a permutation.
    ///
    /// Fails with [`Error::IncompatibleDegree`] when the permutation is not in S<sub>n</sub>.
    pub fn eval<T: Point>(&self, perm: &Perm<T>) -> Result<V> {
        if perm.degree() != self.degree() {
            return Err(Error::IncompatibleDegree {
                left: self.degree(),
                right: perm.degree(),
            });
        }
        self.eval_class(&perm.cycle_type())
    }

    /// The value on the conjugacy class with the given cycle type.
    ///
    /// Fails with [`Error::DegreeMismatch`] when the cycle type is not a partition of n.
    pub fn eval_class(&self, class: &Partition) -> Result<V> {
        if class.n() != self.degree() {
            return Err(Error::DegreeMismatch {
                expected: self.degree(),
                found: class.n(),
            });
        }
        log::debug!("evaluating character {} on class {}", self.partition, class);
        murnaghan_nakayama(&self.shape, class.parts(), self.memo)
    }

    /// The dimension of the representation, the value at the identity.
    pub fn dimension(&self) -> Result<V> {
        self.eval_class(&Partition::from_sorted_unchecked(vec![1; self.degree()]))
    }
}

impl<'m, V: CharacterValue> fmt::Debug for Character<'m, V> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "χ{}", self.partition)
    }
}

fn murnaghan_nakayama<V: CharacterValue>(
    shape: &BetaSet,
    class: &[usize],
    memo: &CharacterMemo<V>,
) -> Result<V> {
    let (&hook, rest) = match class.split_first() {
        Some(split) => split,
        None => return Ok(if shape.is_empty() { V::one() } else { V::zero() }),
    };

    let key: MemoKey = (shape.clone(), class.into());
    if let Some(value) = memo.get(&key) {
        log::trace!("memo hit for {:?} on {:?}", shape, class);
        return Ok(value);
    }

    let mut value = V::zero();
    for (remaining, leg) in shape.rim_hooks(hook) {
        let term = murnaghan_nakayama(&remaining, rest, memo)?;
        value = if leg % 2 == 0 {
            value.checked_add(&term)
        } else {
            value.checked_sub(&term)
        }
        .ok_or(Error::Overflow)?;
    }

    log::trace!("memo insert for {:?} on {:?}: {:?}", shape, class, value);
    Ok(memo.insert(key, value))
}

/// The character labeled by `partition` as a function on permutations.
pub fn character<V, T>(partition: Partition) -> impl Fn(&Perm<T>) -> Result<V>
where
    V: CharacterValue,
    T: Point,
{
    let character = Character::<V>::new(partition);
    move |perm: &Perm<T>| character.eval(perm)
}

/// The value of the character labeled by `partition` on the class with cycle type `class`.
pub fn character_value<V: CharacterValue>(partition: &Partition, class: &Partition) -> Result<V> {
    Character::<V>::new(partition.clone()).eval_class(class)
}

/// The value of the character labeled by `partition` at `perm`.
///
/// Unlike [`Character::eval`] a permutation of the wrong degree is reported as
/// [`Error::DegreeMismatch`].
pub fn character_of<V: CharacterValue, T: Point>(
    partition: &Partition,
    perm: &Perm<T>,
) -> Result<V> {
    character_value(partition, &perm.cycle_type())
}

/// The character table of S<sub>n</sub>.
///
/// Rows are the characters and columns the conjugacy classes, both in the order of
/// [`Partition::all`].
pub fn character_table<V: CharacterValue>(n: usize) -> Result<Vec<Vec<V>>> {
    let classes: Vec<Partition> = Partition::all(n).collect();
    classes
        .iter()
        .map(|lambda| {
            let character = Character::<V>::new(lambda.clone());
            classes
                .iter()
                .map(|class| character.eval_class(class))
                .collect()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::group::SymmetricGroup;
    use crate::perm::tests::random_perm_pair;
    use crate::El;

    use num_bigint::BigUint;
    use num_traits::Signed;
    use proptest::prelude::*;

    fn partition(parts: &[usize]) -> Partition {
        Partition::new(parts.to_vec()).unwrap()
    }

    fn perm(images: &[El]) -> Perm {
        Perm::from_vec(images.to_vec()).unwrap()
    }

    #[test]
    fn three_one() {
        let lambda = partition(&[3, 1]);
        let chi = Character::<i64>::new(lambda.clone());
        assert_eq!(chi.eval(&Perm::<El>::identity(4)).unwrap(), 3);
        assert_eq!(chi.eval_class(&partition(&[2, 2])).unwrap(), -1);
        assert_eq!(chi.eval_class(&partition(&[2, 1, 1])).unwrap(), 1);
        assert_eq!(chi.eval_class(&partition(&[3, 1])).unwrap(), 0);
        assert_eq!(chi.eval_class(&partition(&[4])).unwrap(), -1);
        assert_eq!(chi.dimension().unwrap(), 3);

        let big: BigInt = character_value(&lambda, &partition(&[2, 2])).unwrap();
        assert_eq!(big, BigInt::from(-1));
    }

    #[test]
    fn table_of_s3() {
        let table: Vec<Vec<i64>> = character_table(3).unwrap();
        // classes [3], [2, 1], [1, 1, 1]
        assert_eq!(table, vec![vec![1, 1, 1], vec![-1, 0, 2], vec![1, -1, 1]]);
    }

    #[test]
    fn empty_partition() {
        let chi = Character::<i64>::new(Partition::default());
        assert_eq!(chi.eval_class(&Partition::default()).unwrap(), 1);
        assert_eq!(chi.eval(&Perm::<El>::identity(0)).unwrap(), 1);
    }

    #[test]
    fn degree_errors() {
        let lambda = partition(&[3, 1]);
        let chi = Character::<i64>::new(lambda.clone());
        assert_eq!(
            chi.eval(&Perm::<El>::identity(5)),
            Err(Error::IncompatibleDegree { left: 4, right: 5 })
        );
        assert_eq!(
            chi.eval_class(&partition(&[2, 1])),
            Err(Error::DegreeMismatch {
                expected: 4,
                found: 3
            })
        );
        assert_eq!(
            character_of::<i64, El>(&lambda, &perm(&[2, 1, 3])),
            Err(Error::DegreeMismatch {
                expected: 4,
                found: 3
            })
        );
    }

    #[test]
    fn evaluator_closure() {
        let chi = character::<i64, El>(partition(&[2, 1]));
        assert_eq!(chi(&perm(&[1, 2, 3])).unwrap(), 2);
        assert_eq!(chi(&perm(&[2, 1, 3])).unwrap(), 0);
        assert_eq!(chi(&perm(&[2, 3, 1])).unwrap(), -1);
        assert!(chi(&perm(&[2, 1])).is_err());
    }

    #[test]
    fn trivial_and_sign_characters() {
        let n = 5;
        let trivial = Character::<i64>::new(partition(&[n]));
        let sign = Character::<i64>::new(partition(&[1; 5]));
        for g in SymmetricGroup::<El>::new(n).elements() {
            assert_eq!(trivial.eval(&g).unwrap(), 1);
            assert_eq!(sign.eval(&g).unwrap(), i64::from(g.sign()));
        }
    }

    #[test]
    fn dimensions_match_hook_lengths() {
        for n in 0..=8 {
            for lambda in Partition::all(n) {
                let value: BigInt = Character::new(lambda.clone()).dimension().unwrap();
                assert_eq!(value, BigInt::from(lambda.dimension()), "{}", lambda);
            }
        }
    }

    #[test]
    fn row_orthogonality() {
        for n in 1..=6 {
            let order = (1..=n).product::<i64>();
            let classes: Vec<Partition> = Partition::all(n as usize).collect();
            for lambda in Partition::all(n as usize) {
                let chi = Character::<i64>::new(lambda);
                let norm: i64 = classes
                    .iter()
                    .map(|mu| {
                        let size = i64::try_from(mu.class_size()).unwrap();
                        let value = chi.eval_class(mu).unwrap();
                        size * value * value
                    })
                    .sum();
                assert_eq!(norm, order);
            }
        }
    }

    #[test]
    fn column_orthogonality() {
        let n = 6;
        let classes: Vec<Partition> = Partition::all(n).collect();
        let table: Vec<Vec<BigInt>> = character_table(n).unwrap();
        for (j, mu) in classes.iter().enumerate() {
            for (k, nu) in classes.iter().enumerate() {
                let sum = table
                    .iter()
                    .fold(BigInt::zero(), |acc, row| acc + &row[j] * &row[k]);
                let expected = if j == k {
                    BigInt::from(mu.centralizer_order())
                } else {
                    BigInt::zero()
                };
                assert_eq!(sum, expected, "classes {} and {}", mu, nu);
            }
        }
    }

    #[test]
    fn private_memo_grows_monotonically() {
        let memo = CharacterMemo::<BigInt>::new();
        assert!(memo.is_empty());

        let chi = Character::with_memo(partition(&[4, 2, 1]), &memo);
        let value = chi.eval_class(&partition(&[3, 2, 1, 1])).unwrap();
        let filled = memo.len();
        assert!(filled > 0);

        assert_eq!(chi.eval_class(&partition(&[3, 2, 1, 1])).unwrap(), value);
        assert_eq!(memo.len(), filled);

        let other = Character::with_memo(partition(&[3, 3, 1]), &memo);
        other.eval_class(&partition(&[3, 2, 1, 1])).unwrap();
        assert!(memo.len() >= filled);
    }

    #[test]
    fn large_values() {
        // the dimension of [10, 9, ..., 1] exceeds i64
        let staircase = Partition::new((1..=10).rev().collect::<Vec<usize>>()).unwrap();
        let memo = CharacterMemo::<i64>::new();
        let machine = Character::with_memo(staircase.clone(), &memo).dimension();
        let big: BigInt = Character::new(staircase.clone()).dimension().unwrap();

        assert_eq!(big, BigInt::from(staircase.dimension()));
        assert!(big.is_positive());
        assert!(big > BigInt::from(i64::MAX));
        assert_eq!(machine, Err(Error::Overflow));
        assert!(BigUint::try_from(big).is_ok());
    }

    #[test]
    fn shared_memo_across_threads() {
        let classes: Vec<Partition> = Partition::all(7).collect();
        let expected: Vec<Vec<i64>> = character_table(7).unwrap();
        std::thread::scope(|scope| {
            for _ in 0..4 {
                scope.spawn(|| {
                    let memo = CharacterMemo::<i64>::new();
                    for (lambda, row) in classes.iter().zip(expected.iter()) {
                        let chi = Character::with_memo(lambda.clone(), &memo);
                        let shared = Character::<i64>::new(lambda.clone());
                        for (mu, value) in classes.iter().zip(row.iter()) {
                            assert_eq!(&chi.eval_class(mu).unwrap(), value);
                            assert_eq!(&shared.eval_class(mu).unwrap(), value);
                        }
                    }
                });
            }
        });
    }

    proptest! {
        #[test]
        fn constant_on_conjugacy_classes((g, h) in random_perm_pair(0..9u32)) {
            let conjugate = g.conjugate(&h).unwrap();
            for lambda in Partition::all(g.degree()) {
                let chi = Character::<i64>::new(lambda);
                prop_assert_eq!(chi.eval(&g).unwrap(), chi.eval(&conjugate).unwrap());
            }
        }
    }
}
