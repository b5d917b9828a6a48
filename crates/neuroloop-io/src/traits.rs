//! Capability contracts for encoders, decoders, and environments
//!
//! Implementations never touch the network directly: encoders only emit
//! `(neuron_id, offset_ms)` pairs for the caller to inject, decoders only
//! consume routed spikes, and the environment exchanges opaque per-port
//! payloads.

use std::collections::HashMap;

use neuroloop_runtime::{NeuronId, SimTime};

/// Per-port observations returned by an environment
pub type Observations<O> = HashMap<String, O>;

/// Per-port actions produced by decoders
pub type Actions<A> = HashMap<String, A>;

/// External observation -> spikes targeting input neurons.
///
/// Encoders may be stateful (e.g. rate limiting) but must not mutate the
/// network; they only return `(target_neuron_id, offset_ms)` pairs with
/// `offset_ms >= 0`.
pub trait Encoder<O> {
    /// Encode one observation taken at time `t`
    fn encode(&mut self, t: SimTime, observation: &O) -> Vec<(NeuronId, f64)>;
}

/// Spikes from an output population -> typed action for a named port
pub trait Decoder<A> {
    /// Clear internal state (windows, accumulators, traces)
    fn reset(&mut self);

    /// Receive an output spike at time `t` from a neuron bound to this
    /// decoder
    fn on_spike(&mut self, t: SimTime, neuron_id: NeuronId);

    /// Produce an action at time `t`, or `None` when there is not enough
    /// evidence. Called only at the coordinator's readout cadence.
    fn readout(&mut self, t: SimTime) -> Option<A>;
}

/// World model or device the network interacts with.
///
/// Observations and actions are opaque to the coordination layer.
pub trait Environment<O, A> {
    /// Return observations keyed by input port name; ports may be absent
    /// (partial environments are supported)
    fn observe(&self, t: SimTime) -> Observations<O>;

    /// Apply per-port actions (possibly a partial mapping)
    fn apply_action(&mut self, t: SimTime, actions: &Actions<A>);
}
