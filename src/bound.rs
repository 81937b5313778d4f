//! Read-only record binding.
//!
//! `Bound` exposes a record instance for reading only: there is no
//! setter, so accidental writes fail at compile time instead of at
//! runtime. Replacing the held instance is an explicit, separate
//! operation.

/// A record instance readable by many, replaceable only via `rebind`.
#[derive(Debug, Clone, PartialEq)]
pub struct Bound<M> {
    inner: M,
}

impl<M> Bound<M> {
    pub fn new(inner: M) -> Self {
        Self { inner }
    }

    /// Read access to the bound record.
    pub fn get(&self) -> &M {
        &self.inner
    }

    /// Bind a new record, returning the previously bound one.
    pub fn rebind(&mut self, inner: M) -> M {
        std::mem::replace(&mut self.inner, inner)
    }

    /// Unwrap the binding.
    pub fn into_inner(self) -> M {
        self.inner
    }
}

impl<M> AsRef<M> for Bound<M> {
    fn as_ref(&self) -> &M {
        &self.inner
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_returns_the_bound_value() {
        let bound = Bound::new("first");
        assert_eq!(*bound.get(), "first");
        assert_eq!(*bound.as_ref(), "first");
    }

    #[test]
    fn rebind_swaps_and_returns_the_previous_value() {
        let mut bound = Bound::new(1);
        let previous = bound.rebind(2);
        assert_eq!(previous, 1);
        assert_eq!(*bound.get(), 2);
        assert_eq!(bound.into_inner(), 2);
    }
}
