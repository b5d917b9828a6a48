//! Multi-port I/O coordination for closed-loop spiking network runs
//!
//! This crate connects a [`neuroloop_runtime::SpikingNetwork`] to an
//! abstract environment: encoders turn per-port observations into input
//! spikes, decoders turn output spikes into per-port actions at their own
//! readout cadence, and the closed-loop runtime drives one simulation
//! tick end to end (encode, inject, step, route, act, evaluate, reward).
//!
//! Observation and action payloads are opaque to this crate; applications
//! pick the types and the coordinator moves them between ports.

#![deny(missing_docs)]
#![warn(clippy::all)]

pub mod closed_loop;
pub mod coordinator;
pub mod error;
pub mod goal;
pub mod traits;

pub use closed_loop::{ClosedLoop, TickOutcome};
pub use coordinator::IoCoordinator;
pub use error::{IoError, Result};
pub use goal::{Goal, NullGoal};
pub use traits::{Actions, Decoder, Encoder, Environment, Observations};

// Re-export the time axis shared with the engine
pub use neuroloop_runtime::{NeuronId, SimTime};
