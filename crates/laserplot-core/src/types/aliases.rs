//! Type aliases for commonly used complex types.
//!
//! Complex trait-object types are hard to read at a glance; these aliases
//! give them names that convey intent and keep usage consistent across crates.

/// A boxed dynamically-typed iterator.
///
/// Used when the concrete iterator type varies at runtime (e.g., forward vs reverse).
/// This is necessary because `Range<T>` and `Rev<Range<T>>` are different types.
///
/// # Example
/// ```rust
/// use laserplot_core::types::BoxedIterator;
///
/// let ascending = false;
/// let iter: BoxedIterator<u32> = if ascending {
///     Box::new(0..3)
/// } else {
///     Box::new((0..3).rev())
/// };
/// assert_eq!(iter.collect::<Vec<_>>(), vec![2, 1, 0]);
/// ```
pub type BoxedIterator<T> = Box<dyn Iterator<Item = T>>;
