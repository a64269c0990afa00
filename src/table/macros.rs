//! Macros for declaring lifecycle vocabularies.

/// Generate a state enum and its `State` implementation.
///
/// # Example
///
/// ```
/// use lifecycle::state_enum;
///
/// state_enum! {
///     pub enum TaskState {
///         Scheduled,
///         InProgress,
///         Completed,
///         Failed,
///     }
///     final: [Completed, Failed]
///     error: [Failed]
/// }
/// ```
#[macro_export]
macro_rules! state_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident
            ),* $(,)?
        }

        $(final: [$($final:ident),* $(,)?])?
        $(error: [$($error:ident),* $(,)?])?
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, serde::Serialize, serde::Deserialize)]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                $variant
            ),*
        }

        impl $crate::core::State for $name {
            fn name(&self) -> &str {
                match self {
                    $(Self::$variant => stringify!($variant)),*
                }
            }

            fn is_final(&self) -> bool {
                match self {
                    $($(Self::$final => true,)*)?
                    _ => false,
                }
            }

            fn is_error(&self) -> bool {
                match self {
                    $($(Self::$error => true,)*)?
                    _ => false,
                }
            }
        }
    };
}

/// Generate a tag-only event enum that is its own table key.
///
/// Events carrying payloads implement [`Event`](crate::core::Event) by hand
/// with a separate kind type.
///
/// # Example
///
/// ```
/// use lifecycle::core::Event;
/// use lifecycle::event_enum;
///
/// event_enum! {
///     pub enum TaskEvent {
///         TaskScheduled,
///         TaskStarted,
///         TaskFailed,
///         TaskCompleted,
///     }
/// }
///
/// assert_eq!(TaskEvent::TaskStarted.kind(), TaskEvent::TaskStarted);
/// assert_eq!(TaskEvent::TaskFailed.name(), "TaskFailed");
/// ```
#[macro_export]
macro_rules! event_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                $variant
            ),*
        }

        impl $crate::core::Event for $name {
            type Kind = Self;

            fn kind(&self) -> Self {
                *self
            }

            fn name(&self) -> &str {
                match self {
                    $(Self::$variant => stringify!($variant)),*
                }
            }

            fn kind_name(kind: &Self) -> ::std::string::String {
                ::std::string::ToString::to_string($crate::core::Event::name(kind))
            }
        }
    };
}

/// Generate a command enum and its `Command` implementation.
///
/// # Example
///
/// ```
/// use lifecycle::command_enum;
/// use lifecycle::core::Command;
///
/// command_enum! {
///     pub enum TaskCommand {
///         Execute,
///     }
/// }
///
/// assert_eq!(TaskCommand::Execute.name(), "Execute");
/// ```
#[macro_export]
macro_rules! command_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                $variant
            ),*
        }

        impl $crate::core::Command for $name {
            fn name(&self) -> &str {
                match self {
                    $(Self::$variant => stringify!($variant)),*
                }
            }
        }
    };
}

/// Build an [`FnLens`](crate::core::FnLens) over a named field of a struct.
///
/// The writer clones the entity and replaces the one field, so every other
/// field is carried over unchanged. The entity may be any type, including a
/// path-qualified or generic one such as `model::Record<u32, TaskState>`, and must
/// implement `Clone`.
///
/// # Example
///
/// ```
/// use lifecycle::core::Lens;
/// use lifecycle::{field_lens, state_enum};
///
/// state_enum! {
///     enum TaskState {
///         Scheduled,
///         InProgress,
///     }
/// }
///
/// #[derive(Clone, Debug, PartialEq)]
/// struct Task {
///     name: String,
///     state: TaskState,
/// }
///
/// let lens = field_lens!(Task, state);
/// let task = Task { name: "build-1".to_string(), state: TaskState::Scheduled };
/// let started = lens.write(&task, TaskState::InProgress);
///
/// assert_eq!(started.name, "build-1");
/// assert_eq!(lens.read(&started), TaskState::InProgress);
/// ```
#[macro_export]
macro_rules! field_lens {
    ($entity:ty, $field:ident) => {
        $crate::core::FnLens::new(
            |entity: &$entity| ::std::clone::Clone::clone(&entity.$field),
            |entity: &$entity, value| {
                let mut next: $entity = ::std::clone::Clone::clone(entity);
                next.$field = value;
                next
            },
        )
    };
}
