//! # Unit references
//!
//! Units only talk to each other by sending messages. A [`UnitRef`] is the multi-use address of a
//! unit, while a [`ReplySink`] is a single-use capability to answer one request. Both are cheap to
//! clone or move into a request so that the responding unit never needs to know who asked.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use std::{fmt, sync::{mpsc::Sender, Arc}};

// ------------------------------------------------------------------------------------------------
// TRAITS
// ------------------------------------------------------------------------------------------------

/// Address of a unit which accepts messages of type `M`.
///
/// Sending never blocks and never waits for the message to be processed.
pub trait UnitRef<M>: Send + Sync {
    fn send(&self, msg: M) -> Result<(), UnitError>;
}

// ------------------------------------------------------------------------------------------------
// TYPES
// ------------------------------------------------------------------------------------------------

/// Shared reference to a unit accepting `M`.
pub type Ref<M> = Arc<dyn UnitRef<M>>;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Single-use reply capability.
///
/// Consumed by [`ReplySink::deliver`], so a reply can be sent at most once.
pub struct ReplySink<M> {
    handler: Box<dyn FnOnce(M) -> Result<(), ReplyError> + Send>,
}

/// Adapts a reference to a unit accepting `N` into one accepting `M`.
///
/// Used when a unit must receive another unit's message type in its own inbox, for example the
/// tank controller receiving gyro samples.
pub struct MappedRef<M, N> {
    inner: Ref<N>,
    map: fn(M) -> N,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

#[derive(Debug, thiserror::Error, Clone, PartialEq)]
pub enum UnitError {
    #[error("The recipient unit is no longer receiving messages")]
    Disconnected,
}

#[derive(Debug, thiserror::Error, Clone, PartialEq)]
pub enum ReplyError {
    #[error("Could not deliver the reply: {0}")]
    Unit(UnitError),

    #[error("The reply handler failed: {0}")]
    Handler(String),
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl<M: Send> UnitRef<M> for Sender<M> {
    fn send(&self, msg: M) -> Result<(), UnitError> {
        Sender::send(self, msg).map_err(|_| UnitError::Disconnected)
    }
}

impl<M> ReplySink<M> {
    /// Create a sink which runs `handler` with the reply.
    pub fn new<F>(handler: F) -> Self
    where
        F: FnOnce(M) -> Result<(), ReplyError> + Send + 'static,
    {
        Self {
            handler: Box::new(handler),
        }
    }

    /// Create a sink which forwards the reply, converted by `map`, into a unit's inbox.
    pub fn to_unit<N, F>(unit: Ref<N>, map: F) -> Self
    where
        M: 'static,
        N: 'static,
        F: FnOnce(M) -> N + Send + 'static,
    {
        Self::new(move |msg| unit.send(map(msg)).map_err(ReplyError::Unit))
    }

    /// Deliver the reply, consuming the sink.
    pub fn deliver(self, msg: M) -> Result<(), ReplyError> {
        (self.handler)(msg)
    }
}

impl<M> fmt::Debug for ReplySink<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ReplySink<{}>", std::any::type_name::<M>())
    }
}

impl<M, N> MappedRef<M, N> {
    pub fn new(inner: Ref<N>, map: fn(M) -> N) -> Self {
        Self { inner, map }
    }
}

impl<M, N> UnitRef<M> for MappedRef<M, N>
where
    M: 'static,
    N: 'static,
{
    fn send(&self, msg: M) -> Result<(), UnitError> {
        self.inner.send((self.map)(msg))
    }
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------
