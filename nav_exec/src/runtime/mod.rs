//! # Unit runtime
//!
//! Every unit runs on its own thread and processes the messages in its inbox one at a time, in the
//! order they were sent. Units find each other through the [`Context`], which maps string ids to
//! unit references. CPU heavy work is handed to the [`WorkerPool`] so that it never holds up a
//! unit's inbox.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

mod pool;

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use std::{
    any::Any,
    collections::HashMap,
    sync::{
        mpsc::{channel, Receiver, Sender},
        Arc,
    },
    thread::{self, JoinHandle},
};

use comms_if::unit::{Ref, UnitError, UnitRef};
use log::{debug, warn};

pub use pool::WorkerPool;

// ------------------------------------------------------------------------------------------------
// TRAITS
// ------------------------------------------------------------------------------------------------

/// A message driven unit.
pub trait Unit: Send + 'static {
    /// The type of message accepted by this unit
    type Msg: Send + 'static;

    /// Process a single message.
    fn on_message(&mut self, msg: Self::Msg);

    /// Called once, after the last message has been processed.
    fn on_shutdown(&mut self) {}
}

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// A unit's message queue.
///
/// Created before the unit itself so that references to the unit can be handed out (including to
/// the unit) before it is started.
pub struct Inbox<M> {
    tx: Sender<Envelope<M>>,
    rx: Receiver<Envelope<M>>,
}

/// Handle to a running unit.
pub struct UnitHandle {
    name: String,
    request_stop: Box<dyn Fn() -> Result<(), UnitError> + Send>,
    jh: JoinHandle<()>,
}

/// Registry of unit references, keyed by unit id.
#[derive(Default)]
pub struct Context {
    refs: HashMap<String, Box<dyn Any + Send + Sync>>,
}

struct InboxRef<M>(Sender<Envelope<M>>);

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    #[error("Could not spawn the thread for unit {0}: {1}")]
    SpawnFailed(String, std::io::Error),

    #[error("Unit {0} panicked")]
    UnitPanicked(String),

    #[error("The worker pool has been shut down")]
    PoolShutDown,

    #[error("A worker pool must have at least one thread")]
    NoWorkers,
}

enum Envelope<M> {
    Msg(M),
    Stop,
}

// ------------------------------------------------------------------------------------------------
// FUNCTIONS
// ------------------------------------------------------------------------------------------------

/// Start a unit on its own thread, processing messages from the given inbox.
pub fn spawn_unit<U: Unit>(
    name: &str,
    mut unit: U,
    inbox: Inbox<U::Msg>,
) -> Result<UnitHandle, RuntimeError> {
    let Inbox { tx, rx } = inbox;
    let thread_name = name.to_string();

    let jh = thread::Builder::new()
        .name(thread_name.clone())
        .spawn(move || {
            while let Ok(envelope) = rx.recv() {
                match envelope {
                    Envelope::Msg(m) => unit.on_message(m),
                    Envelope::Stop => break,
                }
            }

            debug!("Unit {} shutting down", thread_name);
            unit.on_shutdown();
        })
        .map_err(|e| RuntimeError::SpawnFailed(name.to_string(), e))?;

    Ok(UnitHandle {
        name: name.to_string(),
        request_stop: Box::new(move || tx.send(Envelope::Stop).map_err(|_| UnitError::Disconnected)),
        jh,
    })
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl<M: Send + 'static> Inbox<M> {
    pub fn new() -> Self {
        let (tx, rx) = channel();
        Self { tx, rx }
    }

    /// Get a reference through which messages can be sent to this inbox.
    pub fn unit_ref(&self) -> Ref<M> {
        Arc::new(InboxRef(self.tx.clone()))
    }
}

impl<M: Send + 'static> Default for Inbox<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: Send> UnitRef<M> for InboxRef<M> {
    fn send(&self, msg: M) -> Result<(), UnitError> {
        self.0
            .send(Envelope::Msg(msg))
            .map_err(|_| UnitError::Disconnected)
    }
}

impl UnitHandle {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Stop the unit once the messages already in its inbox have been processed, and wait for it
    /// to exit.
    pub fn shutdown(self) -> Result<(), RuntimeError> {
        let UnitHandle {
            name,
            request_stop,
            jh,
        } = self;

        if request_stop().is_err() {
            warn!("Unit {} had already stopped", name);
        }

        jh.join().map_err(|_| RuntimeError::UnitPanicked(name))
    }
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a reference under the given id, replacing any previous reference with that id.
    pub fn register<M: 'static>(&mut self, id: &str, unit: Ref<M>) {
        if self.refs.insert(id.to_string(), Box::new(unit)).is_some() {
            warn!("Unit reference \"{}\" registered twice, keeping the latest", id);
        }
    }

    /// Get the reference registered under `id`, if there is one and it accepts `M`.
    pub fn get_ref<M: 'static>(&self, id: &str) -> Option<Ref<M>> {
        self.refs.get(id)?.downcast_ref::<Ref<M>>().cloned()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.refs.contains_key(id)
    }
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------
