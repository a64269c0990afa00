//! Command handlers: the imperative shell the engine calls into.
//!
//! The engine never performs side effects itself. When a rule names a
//! command, the engine hands the entity and the command to a handler and
//! commits the transition only if the handler succeeds.

use crate::core::Command;
use async_trait::async_trait;
use std::convert::Infallible;
use std::fmt::Debug;

/// Executes commands synchronously.
///
/// Any closure `Fn(&T, &C) -> Result<(), E>` is a handler.
///
/// # Example
///
/// ```rust
/// use lifecycle::engine::CommandHandler;
///
/// #[derive(Debug)]
/// enum Op {
///     Run,
/// }
///
/// struct Task {
///     name: String,
/// }
///
/// let handler = |task: &Task, op: &Op| -> Result<(), String> {
///     if task.name.is_empty() {
///         Err(format!("cannot {op:?} an unnamed task"))
///     } else {
///         Ok(())
///     }
/// };
///
/// assert!(handler.handle(&Task { name: "build-1".to_string() }, &Op::Run).is_ok());
/// assert!(handler.handle(&Task { name: String::new() }, &Op::Run).is_err());
/// ```
pub trait CommandHandler<T, C> {
    /// Caller-defined failure payload, propagated unchanged by the engine.
    type Error;

    /// Execute `command` on behalf of `entity`.
    fn handle(&self, entity: &T, command: &C) -> Result<(), Self::Error>;
}

impl<T, C, E, F> CommandHandler<T, C> for F
where
    F: Fn(&T, &C) -> Result<(), E>,
{
    type Error = E;

    fn handle(&self, entity: &T, command: &C) -> Result<(), E> {
        self(entity, command)
    }
}

/// Executes commands asynchronously.
///
/// Used with [`apply_async`](crate::engine::StateMachineEngine::apply_async),
/// which awaits the handler before committing. Deadlines and cancellation are
/// the caller's to impose around that call.
#[async_trait]
pub trait AsyncCommandHandler<T, C>: Send + Sync
where
    T: Send + Sync,
    C: Send + Sync,
{
    type Error: Send;

    async fn handle(&self, entity: &T, command: &C) -> Result<(), Self::Error>;
}

/// A handler that accepts every command without doing anything.
///
/// Useful for tables whose rules carry no commands.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NoopHandler;

impl<T, C> CommandHandler<T, C> for NoopHandler {
    type Error = Infallible;

    fn handle(&self, _entity: &T, _command: &C) -> Result<(), Infallible> {
        Ok(())
    }
}

#[async_trait]
impl<T, C> AsyncCommandHandler<T, C> for NoopHandler
where
    T: Send + Sync,
    C: Send + Sync,
{
    type Error = Infallible;

    async fn handle(&self, _entity: &T, _command: &C) -> Result<(), Infallible> {
        Ok(())
    }
}

/// Decorator that reports every dispatched command through `tracing`.
///
/// Emits `debug` events when a command is dispatched and succeeds, and a
/// `warn` event carrying the cause when it fails. The wrapped handler's result
/// is returned untouched.
#[derive(Clone, Debug)]
pub struct Traced<H> {
    inner: H,
    label: &'static str,
}

impl<H> Traced<H> {
    /// Wrap `inner`, tagging its events with `label`.
    pub fn new(label: &'static str, inner: H) -> Self {
        Self { inner, label }
    }

    pub fn label(&self) -> &'static str {
        self.label
    }

    pub fn inner(&self) -> &H {
        &self.inner
    }

    pub fn into_inner(self) -> H {
        self.inner
    }

    fn report<E: Debug>(&self, command: &str, result: &Result<(), E>) {
        match result {
            Ok(()) => tracing::debug!(handler = self.label, command, "command succeeded"),
            Err(cause) => {
                tracing::warn!(handler = self.label, command, ?cause, "command failed")
            }
        }
    }
}

impl<T, C, H> CommandHandler<T, C> for Traced<H>
where
    C: Command,
    H: CommandHandler<T, C>,
    H::Error: Debug,
{
    type Error = H::Error;

    fn handle(&self, entity: &T, command: &C) -> Result<(), H::Error> {
        tracing::debug!(handler = self.label, command = command.name(), "dispatching command");
        let result = self.inner.handle(entity, command);
        self.report(command.name(), &result);
        result
    }
}

#[async_trait]
impl<T, C, H> AsyncCommandHandler<T, C> for Traced<H>
where
    T: Send + Sync,
    C: Command,
    H: AsyncCommandHandler<T, C>,
    H::Error: Debug,
{
    type Error = H::Error;

    async fn handle(&self, entity: &T, command: &C) -> Result<(), H::Error> {
        tracing::debug!(handler = self.label, command = command.name(), "dispatching command");
        let result = self.inner.handle(entity, command).await;
        self.report(command.name(), &result);
        result
    }
}
