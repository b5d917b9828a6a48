//! Error types for I/O binding and the closed loop

use thiserror::Error;

/// Result type for I/O operations
pub type Result<T> = std::result::Result<T, IoError>;

/// Errors from binding ports or running the closed loop
#[derive(Error, Debug)]
pub enum IoError {
    /// A port name was bound twice on the same side
    #[error("Port {port:?} is already bound")]
    DuplicatePort {
        /// Offending port name
        port: String,
    },

    /// A binding referenced a neuron outside the network
    #[error("Neuron {neuron_id} out of range (network has {num_neurons} neurons)")]
    NeuronOutOfRange {
        /// Offending neuron id
        neuron_id: u32,
        /// Network size the coordinator was bound to
        num_neurons: u32,
    },

    /// Invalid binding parameter
    #[error("Invalid parameter {parameter}: {value} (expected {constraint})")]
    InvalidParameter {
        /// Parameter name
        parameter: String,
        /// Invalid value
        value: String,
        /// Constraint description
        constraint: String,
    },

    /// Engine-level failure surfaced through the closed loop
    #[error("Runtime error: {source}")]
    Runtime {
        #[from]
        /// Source engine error
        source: neuroloop_runtime::RuntimeError,
    },
}

impl IoError {
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
