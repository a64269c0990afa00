//! Events that drive lifecycle transitions.

use std::fmt::Debug;
use std::hash::Hash;

/// Something that happened to an entity.
///
/// Events form a closed tagged union and may carry payload data. The
/// transition table is keyed on the event's [`Kind`](Event::Kind), a
/// payload-free discriminant, so rules can be written without constructing
/// sample payloads.
///
/// Tag-only enums are their own kind; see [`event_enum!`](crate::event_enum).
///
/// Payloads never influence a transition. Rule lookup uses only the kind,
/// and guards and command handlers receive the entity and command but not
/// the event. A payload is carried into [`StateHistory`](crate::core::StateHistory)
/// names and [`TransitionError`](crate::engine::TransitionError) values for
/// diagnostics. Data a guard must inspect belongs on the entity.
///
/// # Example
///
/// ```rust
/// use lifecycle::core::Event;
///
/// #[derive(Clone, Debug)]
/// enum PaymentEvent {
///     Authorized { amount_cents: u64 },
///     Declined { reason: String },
/// }
///
/// #[derive(Clone, PartialEq, Eq, Hash, Debug)]
/// enum PaymentEventKind {
///     Authorized,
///     Declined,
/// }
///
/// impl Event for PaymentEvent {
///     type Kind = PaymentEventKind;
///
///     fn kind(&self) -> PaymentEventKind {
///         match self {
///             Self::Authorized { .. } => PaymentEventKind::Authorized,
///             Self::Declined { .. } => PaymentEventKind::Declined,
///         }
///     }
///
///     fn name(&self) -> &str {
///         match self {
///             Self::Authorized { .. } => "Authorized",
///             Self::Declined { .. } => "Declined",
///         }
///     }
/// }
///
/// let event = PaymentEvent::Declined { reason: "expired card".to_string() };
/// assert_eq!(event.kind(), PaymentEventKind::Declined);
/// ```
pub trait Event: Clone + Debug + Send + Sync {
    /// Payload-free discriminant used as the transition table key.
    type Kind: Clone + Eq + Hash + Debug + Send + Sync;

    /// The discriminant of this event.
    fn kind(&self) -> Self::Kind;

    /// Get the event's name for display/logging.
    fn name(&self) -> &str;

    /// Display name for a bare kind, used when no event value is at hand.
    ///
    /// Defaults to the kind's `Debug` form.
    fn kind_name(kind: &Self::Kind) -> String {
        format!("{:?}", kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Debug)]
    enum BuildEvent {
        Queued,
        Finished { exit_code: i32 },
    }

    #[derive(Clone, PartialEq, Eq, Hash, Debug)]
    enum BuildEventKind {
        Queued,
        Finished,
    }

    impl Event for BuildEvent {
        type Kind = BuildEventKind;

        fn kind(&self) -> BuildEventKind {
            match self {
                Self::Queued => BuildEventKind::Queued,
                Self::Finished { .. } => BuildEventKind::Finished,
            }
        }

        fn name(&self) -> &str {
            match self {
                Self::Queued => "Queued",
                Self::Finished { .. } => "Finished",
            }
        }
    }

    #[test]
    fn kind_ignores_payload() {
        let ok = BuildEvent::Finished { exit_code: 0 };
        let failed = BuildEvent::Finished { exit_code: 1 };

        assert_eq!(ok.kind(), failed.kind());
        assert_ne!(ok.kind(), BuildEvent::Queued.kind());
    }

    #[test]
    fn kind_name_defaults_to_debug() {
        assert_eq!(BuildEvent::kind_name(&BuildEventKind::Finished), "Finished");
    }

    #[test]
    fn name_is_stable_across_payloads() {
        assert_eq!(BuildEvent::Finished { exit_code: 7 }.name(), "Finished");
        assert_eq!(BuildEvent::Queued.name(), "Queued");
    }
}
