//! Lenses: the only way the engine touches an entity's shape.
//!
//! A lens pairs a read accessor with a non-mutating write accessor. Every
//! lens must satisfy two laws:
//!
//! - round trip: `lens.read(&lens.write(&e, s)) == s`
//! - preservation: `lens.write(&e, s)` differs from `e` only in the state field

use std::fmt;
use std::sync::Arc;

/// Read/write access to the state embedded in an entity.
///
/// # Example
///
/// ```rust
/// use lifecycle::core::Lens;
///
/// #[derive(Clone, Debug, PartialEq)]
/// struct Ticket {
///     id: u32,
///     open: bool,
/// }
///
/// struct OpenLens;
///
/// impl Lens<Ticket, bool> for OpenLens {
///     fn read(&self, ticket: &Ticket) -> bool {
///         ticket.open
///     }
///
///     fn write(&self, ticket: &Ticket, open: bool) -> Ticket {
///         Ticket { open, ..ticket.clone() }
///     }
/// }
///
/// let ticket = Ticket { id: 7, open: true };
/// let closed = OpenLens.write(&ticket, false);
///
/// assert!(!OpenLens.read(&closed));
/// assert!(ticket.open); // Original unchanged
/// ```
pub trait Lens<T, S> {
    /// Read the current state out of an entity.
    fn read(&self, entity: &T) -> S;

    /// Produce a new entity carrying `state`, leaving `entity` untouched.
    fn write(&self, entity: &T, state: S) -> T;
}

impl<T, S, L> Lens<T, S> for Box<L>
where
    L: Lens<T, S> + ?Sized,
{
    fn read(&self, entity: &T) -> S {
        (**self).read(entity)
    }

    fn write(&self, entity: &T, state: S) -> T {
        (**self).write(entity, state)
    }
}

impl<T, S, L> Lens<T, S> for Arc<L>
where
    L: Lens<T, S> + ?Sized,
{
    fn read(&self, entity: &T) -> S {
        (**self).read(entity)
    }

    fn write(&self, entity: &T, state: S) -> T {
        (**self).write(entity, state)
    }
}

type Reader<T, S> = Arc<dyn Fn(&T) -> S + Send + Sync>;
type Writer<T, S> = Arc<dyn Fn(&T, S) -> T + Send + Sync>;

/// A lens built from two closures.
///
/// Cloning is cheap: both closures are reference counted.
///
/// # Example
///
/// ```rust
/// use lifecycle::core::{FnLens, Lens};
///
/// #[derive(Clone, Debug, PartialEq)]
/// struct Job {
///     name: String,
///     stage: u8,
/// }
///
/// let stage = FnLens::new(
///     |job: &Job| job.stage,
///     |job: &Job, stage| Job { stage, ..job.clone() },
/// );
///
/// let job = Job { name: "nightly".to_string(), stage: 1 };
/// let next = stage.write(&job, 2);
///
/// assert_eq!(stage.read(&next), 2);
/// assert_eq!(next.name, job.name);
/// ```
pub struct FnLens<T, S> {
    read: Reader<T, S>,
    write: Writer<T, S>,
}

impl<T, S> FnLens<T, S> {
    /// Create a lens from a reader and a writer.
    ///
    /// The writer must build a new entity; it receives the original by
    /// reference and cannot mutate it.
    pub fn new<R, W>(read: R, write: W) -> Self
    where
        R: Fn(&T) -> S + Send + Sync + 'static,
        W: Fn(&T, S) -> T + Send + Sync + 'static,
    {
        Self {
            read: Arc::new(read),
            write: Arc::new(write),
        }
    }
}

impl<T, S> Lens<T, S> for FnLens<T, S> {
    fn read(&self, entity: &T) -> S {
        (self.read)(entity)
    }

    fn write(&self, entity: &T, state: S) -> T {
        (self.write)(entity, state)
    }
}

impl<T, S> Clone for FnLens<T, S> {
    fn clone(&self) -> Self {
        Self {
            read: Arc::clone(&self.read),
            write: Arc::clone(&self.write),
        }
    }
}

impl<T, S> fmt::Debug for FnLens<T, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnLens").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    enum Phase {
        Draft,
        Live,
    }

    #[derive(Clone, Debug, PartialEq)]
    struct Page {
        slug: String,
        revision: u32,
        phase: Phase,
    }

    fn phase_lens() -> FnLens<Page, Phase> {
        FnLens::new(
            |page: &Page| page.phase,
            |page: &Page, phase| Page {
                phase,
                ..page.clone()
            },
        )
    }

    fn page() -> Page {
        Page {
            slug: "home".to_string(),
            revision: 4,
            phase: Phase::Draft,
        }
    }

    #[test]
    fn read_returns_embedded_state() {
        assert_eq!(phase_lens().read(&page()), Phase::Draft);
    }

    #[test]
    fn write_round_trips() {
        let lens = phase_lens();
        let updated = lens.write(&page(), Phase::Live);

        assert_eq!(lens.read(&updated), Phase::Live);
    }

    #[test]
    fn write_preserves_other_fields() {
        let original = page();
        let updated = phase_lens().write(&original, Phase::Live);

        assert_eq!(updated.slug, original.slug);
        assert_eq!(updated.revision, original.revision);
        assert_eq!(original.phase, Phase::Draft);
    }

    #[test]
    fn cloned_lens_shares_accessors() {
        let lens = phase_lens();
        let copy = lens.clone();

        let updated = copy.write(&page(), Phase::Live);
        assert_eq!(lens.read(&updated), Phase::Live);
    }

    #[test]
    fn boxed_lens_delegates() {
        let lens: Box<dyn Lens<Page, Phase> + Send + Sync> = Box::new(phase_lens());

        let updated = lens.write(&page(), Phase::Live);
        assert_eq!(lens.read(&updated), Phase::Live);
    }
}
