//! Multi-port coordinator binding encoders and decoders to the network
//!
//! Fan-in: observations are pulled from the environment once per call and
//! offered to every input binding whose port is present. Fan-out: output
//! spikes are routed through a `neuron -> bindings` table, and each output
//! binding polls its decoder at its own readout cadence.

use std::collections::{HashMap, HashSet};

use neuroloop_runtime::{NeuronId, SimTime};

use crate::{
    error::*,
    traits::{Actions, Decoder, Encoder, Environment, Observations},
};

/// An encoder bound to a named input port
struct InputBinding<O> {
    port: String,
    encoder: Box<dyn Encoder<O>>,
    /// Informational; encoders own their own id scheme
    #[allow(dead_code)]
    target_ids: Vec<NeuronId>,
}

/// A decoder bound to a named output port
struct OutputBinding<A> {
    port: String,
    decoder: Box<dyn Decoder<A>>,
    source_ids: HashSet<NeuronId>,
    readout_period_ms: f64,
    /// Armed by the first routed spike
    next_readout_at: Option<SimTime>,
}

impl<A> OutputBinding<A> {
    fn schedule_if_needed(&mut self, t: SimTime) {
        if self.next_readout_at.is_none() {
            self.next_readout_at = Some(t + self.readout_period_ms);
        }
    }

    fn due(&self, t: SimTime) -> bool {
        matches!(self.next_readout_at, Some(at) if t >= at)
    }

    fn advance(&mut self) {
        if let Some(at) = self.next_readout_at.as_mut() {
            *at += self.readout_period_ms;
        }
    }
}

/// Coordinates multiple encoders and decoders around one environment.
///
/// Bound once per run; [`IoCoordinator::reset`] clears decoder state and
/// readout schedules without touching the network.
pub struct IoCoordinator<O, A> {
    env: Box<dyn Environment<O, A>>,
    num_neurons: u32,
    inputs: Vec<InputBinding<O>>,
    outputs: Vec<OutputBinding<A>>,
    /// Routing table: neuron id -> output binding indices listening to it
    route: HashMap<NeuronId, Vec<usize>>,
}

impl<O, A> IoCoordinator<O, A> {
    /// Create a coordinator around an environment for a network of
    /// `num_neurons` neurons.
    pub fn new(env: Box<dyn Environment<O, A>>, num_neurons: usize) -> Self {
        Self {
            env,
            num_neurons: num_neurons as u32,
            inputs: Vec::new(),
            outputs: Vec::new(),
            route: HashMap::new(),
        }
    }

    fn check_ids<'a>(&self, ids: impl Iterator<Item = &'a NeuronId>) -> Result<()> {
        for id in ids {
            if id.raw() >= self.num_neurons {
                return Err(IoError::NeuronOutOfRange {
                    neuron_id: id.raw(),
                    num_neurons: self.num_neurons,
                });
            }
        }
        Ok(())
    }

    /// Bind an encoder to a named input port.
    ///
    /// `target_ids` document the encoder's id range; they are validated
    /// against the network but the encoder owns its own mapping.
    pub fn bind_input(
        &mut self,
        port: &str,
        encoder: Box<dyn Encoder<O>>,
        target_ids: Vec<NeuronId>,
    ) -> Result<()> {
        if self.inputs.iter().any(|b| b.port == port) {
            return Err(IoError::DuplicatePort {
                port: port.to_string(),
            });
        }
        self.check_ids(target_ids.iter())?;
        log::debug!("bound input port {:?} ({} target ids)", port, target_ids.len());
        self.inputs.push(InputBinding {
            port: port.to_string(),
            encoder,
            target_ids,
        });
        Ok(())
    }

    /// Bind a decoder to a named output port, listening to `source_ids`
    /// and polled every `readout_period_ms`.
    pub fn bind_output(
        &mut self,
        port: &str,
        decoder: Box<dyn Decoder<A>>,
        source_ids: Vec<NeuronId>,
        readout_period_ms: f64,
    ) -> Result<()> {
        if self.outputs.iter().any(|b| b.port == port) {
            return Err(IoError::DuplicatePort {
                port: port.to_string(),
            });
        }
        if readout_period_ms <= 0.0 {
            return Err(IoError::invalid_parameter(
                "readout_period_ms",
                readout_period_ms.to_string(),
                "> 0.0",
            ));
        }
        self.check_ids(source_ids.iter())?;

        let idx = self.outputs.len();
        for &id in &source_ids {
            self.route.entry(id).or_default().push(idx);
        }
        log::debug!(
            "bound output port {:?} ({} source ids, readout every {}ms)",
            port,
            source_ids.len(),
            readout_period_ms
        );
        self.outputs.push(OutputBinding {
            port: port.to_string(),
            decoder,
            source_ids: source_ids.into_iter().collect(),
            readout_period_ms,
            next_readout_at: None,
        });
        Ok(())
    }

    /// Observe the environment at time `t`
    pub fn observe(&self, t: SimTime) -> Observations<O> {
        self.env.observe(t)
    }

    /// Forward actions to the environment
    pub fn apply_action(&mut self, t: SimTime, actions: &Actions<A>) {
        self.env.apply_action(t, actions);
    }

    /// Observe once and fan the observations out to all encoders.
    ///
    /// Ports missing from the observation map are skipped silently so
    /// partial environments work. The returned `(neuron_id, offset_ms)`
    /// pairs are for the caller to inject; this method never mutates the
    /// network.
    pub fn encode_observations(&mut self, t: SimTime) -> Vec<(NeuronId, f64)> {
        let obs = self.env.observe(t);
        let mut out = Vec::new();
        for binding in &mut self.inputs {
            if let Some(observation) = obs.get(&binding.port) {
                out.extend(binding.encoder.encode(t, observation));
            }
        }
        out
    }

    /// Route an output spike to every binding listening to `neuron_id`.
    ///
    /// The first routed spike arms a binding's readout schedule.
    pub fn on_output_spike(&mut self, t: SimTime, neuron_id: NeuronId) {
        if let Some(indices) = self.route.get(&neuron_id) {
            for &idx in indices {
                let binding = &mut self.outputs[idx];
                debug_assert!(binding.source_ids.contains(&neuron_id));
                binding.schedule_if_needed(t);
                binding.decoder.on_spike(t, neuron_id);
            }
        }
    }

    /// Poll decoders that are due; collect non-`None` actions by port.
    pub fn maybe_emit_actions(&mut self, t: SimTime) -> Actions<A> {
        let mut actions = Actions::new();
        for binding in &mut self.outputs {
            if !binding.due(t) {
                continue;
            }
            binding.advance();
            if let Some(action) = binding.decoder.readout(t) {
                actions.insert(binding.port.clone(), action);
            }
        }
        actions
    }

    /// Reset every decoder and clear all readout schedules
    pub fn reset(&mut self) {
        for binding in &mut self.outputs {
            binding.decoder.reset();
            binding.next_readout_at = None;
        }
    }

    /// The bound environment
    pub fn env(&self) -> &dyn Environment<O, A> {
        self.env.as_ref()
    }

    /// Mutable access to the bound environment
    pub fn env_mut(&mut self) -> &mut dyn Environment<O, A> {
        self.env.as_mut()
    }
}
