//! Discrete-time spiking network engine
//!
//! This crate provides the simulation core for leaky integrate-and-fire
//! networks with millisecond-binned delayed synaptic delivery and
//! reward-modulated eligibility-trace plasticity. The caller drives time:
//! every operation is synchronous and runs to completion.

#![deny(missing_docs)]
#![warn(clippy::all)]

use core::fmt;

// Core modules
pub mod error;
pub mod network;
pub mod neuron;
pub mod plasticity;
pub mod scheduler;
pub mod synapse;
pub mod wiring;

// Re-export essential types
pub use error::{Result, RuntimeError};
pub use network::SpikingNetwork;
pub use neuron::{LifConfig, LifNeuron, LifState};
pub use plasticity::{PlasticityConfig, PlasticityEngine};
pub use scheduler::CurrentScheduler;
pub use synapse::{Synapse, SynapseStore};
pub use wiring::{Circuit, CircuitLayout, Population};

/// Simulation time in milliseconds.
pub type SimTime = f64;

/// Integer-millisecond slot used to key pending currents.
pub type TimeBin = i64;

/// Quantize a simulation time to its delivery bin.
///
/// Rounds half-away-from-zero, so an offset landing exactly on a bin
/// boundary goes to the nearer-from-zero side consistently.
#[inline]
pub fn time_bin(t: SimTime) -> TimeBin {
    t.round() as TimeBin
}

/// Dense neuron identifier in `[0, N)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NeuronId(pub u32);

impl NeuronId {
    /// Create a new neuron ID
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value
    pub const fn raw(&self) -> u32 {
        self.0
    }

    /// Get the ID as a vector index
    pub const fn index(&self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NeuronId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.0)
    }
}

/// Stable synapse index assigned on insertion; never reused or reordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SynapseId(pub u32);

impl SynapseId {
    /// Create a new synapse ID
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value
    pub const fn raw(&self) -> u32 {
        self.0
    }

    /// Get the ID as a vector index
    pub const fn index(&self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for SynapseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "s{}", self.0)
    }
}
