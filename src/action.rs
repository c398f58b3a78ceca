//! Group actions.
//!
//! Permutations act on the right: `x^g` is the image of `x` under `g`, so acting with `g` and then
//! with `h` is acting with the product `gh`.

/// Right action on `T`.
///
/// Elements of implementing types act on `T` values on the right. Acting may fail when the value
/// is not compatible with the acting element, e.g. when degrees differ.
pub trait RightAction<T>
where
    T: ?Sized,
{
    type Error;

    /// Act on a value on the right.
    fn right_apply(&self, mut value: T) -> Result<T, Self::Error>
    where
        T: Sized,
    {
        self.right_apply_to(&mut value)?;
        Ok(value)
    }

    /// Act on a value, in place, on the right.
    ///
    /// On failure the value is left unchanged.
    fn right_apply_to(&self, value: &mut T) -> Result<(), Self::Error>;
}
