//! The closed loop: one simulation tick from observation to reward

use neuroloop_runtime::{NeuronId, SimTime, SpikingNetwork};

use crate::{
    coordinator::IoCoordinator,
    error::*,
    goal::Goal,
    traits::Actions,
};

/// What one tick produced
#[derive(Debug)]
pub struct TickOutcome<A> {
    /// Neurons that spiked this tick, ascending
    pub spikes: Vec<NeuronId>,
    /// Actions emitted by due decoders, keyed by port
    pub actions: Actions<A>,
    /// Reward applied this tick (`0.0` means no weight update)
    pub reward: f32,
}

/// Owns the network and its I/O coordinator and steps them together.
///
/// Per tick: observe, encode and inject, step the network, route output
/// spikes, poll decoders, apply actions, observe again, evaluate the
/// goal, and apply any nonzero reward. The caller drives time; wall-clock
/// pacing belongs to the driver.
pub struct ClosedLoop<O, A> {
    net: SpikingNetwork,
    io: IoCoordinator<O, A>,
}

impl<O, A> ClosedLoop<O, A> {
    /// Combine a materialized network with its bound coordinator
    pub fn new(net: SpikingNetwork, io: IoCoordinator<O, A>) -> Self {
        Self { net, io }
    }

    /// Run one tick of size `dt_ms` at time `t`.
    ///
    /// Encoded spikes are injected with strength `inject_scale` at
    /// `t + offset`. The goal sees the observations from before encoding
    /// and after action application; a nonzero reward updates the plastic
    /// weights exactly once.
    pub fn tick(
        &mut self,
        t: SimTime,
        dt_ms: f64,
        goal: &mut dyn Goal<O, A>,
        inject_scale: f32,
    ) -> Result<TickOutcome<A>> {
        let before = self.io.observe(t);

        for (neuron_id, offset_ms) in self.io.encode_observations(t) {
            self.net.inject(t + offset_ms, neuron_id, inject_scale)?;
        }

        let spikes = self.net.step(t, dt_ms)?;
        for &neuron_id in &spikes {
            self.io.on_output_spike(t, neuron_id);
        }

        let actions = self.io.maybe_emit_actions(t);
        if !actions.is_empty() {
            self.io.apply_action(t, &actions);
        }

        let after = self.io.observe(t);
        let reward = goal.evaluate(t, &before, &actions, &after);
        if reward != 0.0 {
            self.net.apply_reward(reward)?;
        }

        Ok(TickOutcome {
            spikes,
            actions,
            reward,
        })
    }

    /// Reset network state and I/O schedules; weights survive
    pub fn reset(&mut self) {
        self.net.reset();
        self.io.reset();
    }

    /// The underlying network
    pub fn network(&self) -> &SpikingNetwork {
        &self.net
    }

    /// Mutable access to the underlying network
    pub fn network_mut(&mut self) -> &mut SpikingNetwork {
        &mut self.net
    }

    /// The I/O coordinator
    pub fn io(&self) -> &IoCoordinator<O, A> {
        &self.io
    }

    /// Mutable access to the I/O coordinator
    pub fn io_mut(&mut self) -> &mut IoCoordinator<O, A> {
        &mut self.io
    }
}
