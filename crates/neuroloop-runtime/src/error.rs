//! Error types for the simulation engine

use thiserror::Error;

/// Result type for engine operations
pub type Result<T> = std::result::Result<T, RuntimeError>;

/// Errors that can occur while building or stepping a network
#[derive(Error, Debug)]
pub enum RuntimeError {
    /// Invalid network configuration
    #[error("Invalid configuration: {reason}")]
    InvalidConfiguration {
        /// Reason for invalid configuration
        reason: String,
    },

    /// Invalid parameter value
    #[error("Invalid parameter {parameter}: {value} (expected {constraint})")]
    InvalidParameter {
        /// Parameter name
        parameter: String,
        /// Invalid value
        value: String,
        /// Constraint description
        constraint: String,
    },

    /// Neuron id outside `[0, N)`
    #[error("Neuron {neuron_id} not found")]
    NeuronNotFound {
        /// Neuron ID that was not found
        neuron_id: u32,
    },

    /// Synapse index outside the store
    #[error("Synapse {synapse_id} not found")]
    SynapseNotFound {
        /// Synapse ID that was not found
        synapse_id: u32,
    },

    /// A population name was declared twice
    #[error("Population {name:?} already declared")]
    DuplicatePopulation {
        /// Offending population name
        name: String,
    },

    /// A population name was never declared
    #[error("Population {name:?} not found")]
    UnknownPopulation {
        /// Requested population name
        name: String,
    },

    /// Simulation time moved backwards between ticks
    #[error("Time moved backwards: t={t}ms after t={t_last}ms")]
    TimeReversal {
        /// Offending tick time (ms)
        t: f64,
        /// Previous tick time (ms)
        t_last: f64,
    },
}

impl RuntimeError {
    /// Create an invalid configuration error
    pub fn invalid_config(reason: impl Into<String>) -> Self {
        Self::InvalidConfiguration {
            reason: reason.into(),
        }
    }

    /// Create an invalid parameter error
    pub fn invalid_parameter(
        parameter: impl Into<String>,
        value: impl Into<String>,
        constraint: impl Into<String>,
    ) -> Self {
        Self::InvalidParameter {
            parameter: parameter.into(),
            value: value.into(),
            constraint: constraint.into(),
        }
    }
}
