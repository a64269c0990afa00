//! Guard predicates for gating transition rules.
//!
//! A guard is a pure boolean function over the entity. It is evaluated after
//! a rule has been selected and before any command runs, so a rejected guard
//! never causes side effects.

use std::fmt;
use std::sync::Arc;

/// Pure predicate that decides whether a selected rule may fire.
///
/// # Example
///
/// ```rust
/// use lifecycle::core::Guard;
///
/// struct Upload {
///     bytes: usize,
/// }
///
/// let non_empty = Guard::new(|upload: &Upload| upload.bytes > 0);
///
/// assert!(non_empty.check(&Upload { bytes: 512 }));
/// assert!(!non_empty.check(&Upload { bytes: 0 }));
/// ```
pub struct Guard<T> {
    predicate: Arc<dyn Fn(&T) -> bool + Send + Sync>,
}

impl<T> Guard<T> {
    /// Create a guard from a pure predicate function.
    ///
    /// The predicate must be deterministic and free of side effects; the
    /// engine may evaluate it for dry runs such as
    /// [`can_apply`](crate::engine::StateMachineEngine::can_apply).
    pub fn new<F>(predicate: F) -> Self
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        Guard {
            predicate: Arc::new(predicate),
        }
    }

    /// Check whether the guard accepts this entity.
    pub fn check(&self, entity: &T) -> bool {
        (self.predicate)(entity)
    }
}

impl<T> Clone for Guard<T> {
    fn clone(&self) -> Self {
        Self {
            predicate: Arc::clone(&self.predicate),
        }
    }
}

impl<T> fmt::Debug for Guard<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Guard(..)")
    }
}
