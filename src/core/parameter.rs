use alloc::sync::Arc;
use core::fmt;
use core::sync::atomic::{AtomicU32, Ordering};

/// A thread-safe floating point parameter cell.
///
/// Clones share the same cell, so a control thread can keep one handle while
/// every running effect instance reads another. Loads and stores are relaxed:
/// a single value never tears, but two cells written back to back may be
/// observed out of order by the audio thread.
#[derive(Clone)]
pub struct Parameter {
    value: Arc<AtomicU32>,
}

impl Parameter {
    /// Creates a new Parameter with an initial value.
    pub fn new(value: f32) -> Self {
        Parameter {
            value: Arc::new(AtomicU32::new(value.to_bits())),
        }
    }

    /// Sets the parameter value.
    #[inline]
    pub fn set(&self, value: f32) {
        self.value.store(value.to_bits(), Ordering::Relaxed);
    }

    /// Gets the current parameter value.
    #[inline]
    pub fn get(&self) -> f32 {
        f32::from_bits(self.value.load(Ordering::Relaxed))
    }

    /// Returns true if both handles point at the same cell.
    pub fn shares_cell(&self, other: &Parameter) -> bool {
        Arc::ptr_eq(&self.value, &other.value)
    }
}

impl fmt::Debug for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Parameter").field(&self.get()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_value() {
        let a = Parameter::new(1.0);
        let b = a.clone();
        b.set(0.25);

        assert_eq!(a.get(), 0.25);
        assert!(a.shares_cell(&b));
        assert!(!a.shares_cell(&Parameter::new(0.25)));
    }
}
