//! Edit outcomes.

/// Result of a tree mutation.
///
/// Mutations never fail loudly: every variant carries a usable tree so an
/// edit session stays alive after a bad command. The variant records what
/// actually happened.
#[must_use]
#[derive(Debug, Clone, PartialEq)]
pub enum Edit<T> {
    /// The mutation took effect.
    Applied(T),
    /// The input was well addressed but the mutation is a no-op.
    Unchanged(T),
    /// The address did not resolve; the original value is returned untouched.
    NotFound(T),
}

impl<T> Edit<T> {
    /// The resulting value, whatever happened.
    pub fn into_inner(self) -> T {
        match self {
            Edit::Applied(value) | Edit::Unchanged(value) | Edit::NotFound(value) => value,
        }
    }

    /// True if the mutation took effect.
    pub fn is_applied(&self) -> bool {
        matches!(self, Edit::Applied(_))
    }

    /// True if the mutation was a no-op.
    pub fn is_unchanged(&self) -> bool {
        matches!(self, Edit::Unchanged(_))
    }

    /// True if the address did not resolve.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Edit::NotFound(_))
    }

    /// Borrow the carried value.
    pub fn value(&self) -> &T {
        match self {
            Edit::Applied(value) | Edit::Unchanged(value) | Edit::NotFound(value) => value,
        }
    }

    /// Map the carried value, keeping the outcome.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Edit<U> {
        match self {
            Edit::Applied(value) => Edit::Applied(f(value)),
            Edit::Unchanged(value) => Edit::Unchanged(f(value)),
            Edit::NotFound(value) => Edit::NotFound(f(value)),
        }
    }

    /// Short label for reporting.
    pub fn outcome(&self) -> &'static str {
        match self {
            Edit::Applied(_) => "applied",
            Edit::Unchanged(_) => "unchanged",
            Edit::NotFound(_) => "not found",
        }
    }
}
