//! Fallible construction.
//!
//! | Pattern | Use When |
//! |---------|----------|
//! | `new()` | Construction always succeeds |
//! | [`TryNew`] | Construction validates its input and may fail |
//! | `TryFrom<T>` | Converting from another type |
//!
//! Types implementing [`TryNew`] do not also expose a `new()` performing the
//! same validation; the `try_` prefix keeps fallibility visible at call sites.

/// Validated construction.
///
/// # Example
///
/// ```
/// use warden_types::TryNew;
///
/// struct ScopeName(String);
///
/// #[derive(Debug, PartialEq)]
/// struct EmptyScope;
///
/// impl TryNew for ScopeName {
///     type Error = EmptyScope;
///     type Args = String;
///
///     fn try_new(name: String) -> Result<Self, Self::Error> {
///         if name.is_empty() {
///             return Err(EmptyScope);
///         }
///         Ok(ScopeName(name))
///     }
/// }
///
/// assert!(ScopeName::try_new("ubus".into()).is_ok());
/// assert_eq!(ScopeName::try_new(String::new()).err(), Some(EmptyScope));
/// ```
pub trait TryNew: Sized {
    /// Error returned when validation fails.
    type Error;
    /// Construction arguments; use a tuple for several.
    type Args;

    /// Validates `args` and constructs `Self`.
    ///
    /// # Errors
    ///
    /// Returns `Self::Error` when `args` violate the type's invariants.
    fn try_new(args: Self::Args) -> Result<Self, Self::Error>;
}
