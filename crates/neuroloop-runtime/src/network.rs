//! The spiking network: neuron pool, synapses, scheduler, and plasticity
//! under one owner with a single shared time axis.

use crate::{
    error::*,
    neuron::{LifConfig, LifNeuron},
    plasticity::{PlasticityConfig, PlasticityEngine},
    scheduler::CurrentScheduler,
    synapse::{Synapse, SynapseStore},
    time_bin, NeuronId, SimTime, SynapseId,
};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// A discrete-time LIF network with delayed delivery and reward-modulated
/// plasticity.
///
/// All state belongs to the instance; its methods are the sole mutators.
/// The caller drives time by invoking [`SpikingNetwork::step`] with
/// non-decreasing tick times.
#[derive(Debug)]
pub struct SpikingNetwork {
    neurons: Vec<LifNeuron>,
    synapses: SynapseStore,
    scheduler: CurrentScheduler,
    plasticity: PlasticityEngine,
    last_step_t: Option<SimTime>,
}

impl SpikingNetwork {
    /// Create a network of `num_neurons` LIF neurons from one template.
    pub fn new(
        num_neurons: usize,
        lif: LifConfig,
        plasticity: PlasticityConfig,
    ) -> Result<Self> {
        if num_neurons == 0 {
            return Err(RuntimeError::invalid_parameter(
                "num_neurons",
                "0",
                "> 0",
            ));
        }
        lif.validate()?;
        let plasticity = PlasticityEngine::new(plasticity)?;

        let mut neurons = Vec::with_capacity(num_neurons);
        for _ in 0..num_neurons {
            neurons.push(LifNeuron::new(lif.clone())?);
        }

        Ok(Self {
            neurons,
            synapses: SynapseStore::new(num_neurons),
            scheduler: CurrentScheduler::new(),
            plasticity,
            last_step_t: None,
        })
    }

    /// Number of neurons
    pub fn neuron_count(&self) -> usize {
        self.neurons.len()
    }

    /// Number of synapses
    pub fn synapse_count(&self) -> usize {
        self.synapses.len()
    }

    /// Add a synapse; plastic synapses are registered with the engine.
    pub fn add_synapse(
        &mut self,
        pre: NeuronId,
        post: NeuronId,
        weight: f32,
        delay_ms: f64,
        plastic: bool,
    ) -> Result<SynapseId> {
        let id = self
            .synapses
            .add(Synapse::new(pre, post, weight, delay_ms, plastic))?;
        if plastic {
            self.plasticity.register(id, post);
        }
        Ok(id)
    }

    /// Accumulate an external current for neuron `post` at `bin(t)`.
    pub fn inject(&mut self, t: SimTime, post: NeuronId, current: f32) -> Result<()> {
        if post.index() >= self.neurons.len() {
            return Err(RuntimeError::NeuronNotFound {
                neuron_id: post.raw(),
            });
        }
        self.scheduler.inject(t, post, current);
        Ok(())
    }

    /// Advance the network one tick of size `dt_ms` at time `t`.
    ///
    /// Ordering within the tick: drain the current bin, integrate every
    /// neuron in ascending id order, reschedule synaptic deliveries into
    /// strictly future bins, then run plasticity (decay, pre bumps, post
    /// bumps). Returns the spiking neuron ids in ascending order.
    pub fn step(&mut self, t: SimTime, dt_ms: f64) -> Result<Vec<NeuronId>> {
        if dt_ms <= 0.0 {
            return Err(RuntimeError::invalid_parameter(
                "dt_ms",
                dt_ms.to_string(),
                "> 0.0",
            ));
        }
        if let Some(last) = self.last_step_t {
            if t < last {
                return Err(RuntimeError::TimeReversal { t, t_last: last });
            }
        }
        self.last_step_t = Some(t);

        let now_bin = time_bin(t);
        let currents = self.scheduler.drain(now_bin, self.neurons.len());

        #[cfg(feature = "parallel")]
        let fired: Vec<bool> = self
            .neurons
            .par_iter_mut()
            .zip(currents.par_iter())
            .map(|(neuron, &i_ext)| neuron.step(t, dt_ms, i_ext))
            .collect();

        #[cfg(not(feature = "parallel"))]
        let fired: Vec<bool> = self
            .neurons
            .iter_mut()
            .zip(currents.iter())
            .map(|(neuron, &i_ext)| neuron.step(t, dt_ms, i_ext))
            .collect();

        let spikes: Vec<NeuronId> = fired
            .iter()
            .enumerate()
            .filter(|(_, &f)| f)
            .map(|(i, _)| NeuronId::new(i as u32))
            .collect();

        // Synaptic delivery: round to the target bin, promoting anything
        // that would land in the already-drained bin to the next one.
        for &pre in &spikes {
            for (_, synapse) in self.synapses.iter_outgoing(pre) {
                let mut deliver_at = time_bin(t + synapse.delay_ms);
                if deliver_at <= now_bin {
                    deliver_at = now_bin + 1;
                }
                self.scheduler.schedule(deliver_at, synapse.post, synapse.weight);
            }
        }

        self.plasticity.decay(t)?;
        for &pre in &spikes {
            self.plasticity.on_pre_spike(pre, &self.synapses);
        }
        for &post in &spikes {
            self.plasticity.on_post_spike(post);
        }

        Ok(spikes)
    }

    /// Apply a scalar reward to every plastic synapse.
    pub fn apply_reward(&mut self, reward: f32) -> Result<()> {
        log::debug!("applying reward {}", reward);
        self.plasticity.apply_reward(reward, &mut self.synapses)
    }

    /// Clear neuron state, pending currents, traces, and eligibility.
    ///
    /// Weights are preserved; learning survives a reset.
    pub fn reset(&mut self) {
        for neuron in &mut self.neurons {
            neuron.reset();
        }
        self.scheduler.clear();
        self.plasticity.reset();
        self.last_step_t = None;
    }

    /// Membrane potential of a neuron
    pub fn membrane_potential(&self, id: NeuronId) -> Result<f32> {
        self.neurons
            .get(id.index())
            .map(|n| n.membrane_potential())
            .ok_or(RuntimeError::NeuronNotFound { neuron_id: id.raw() })
    }

    /// Look up a synapse by its stable index
    pub fn synapse(&self, id: SynapseId) -> Result<&Synapse> {
        self.synapses.get(id)
    }

    /// Current weight of a synapse
    pub fn weight(&self, id: SynapseId) -> Result<f32> {
        Ok(self.synapses.get(id)?.weight)
    }

    /// The plasticity engine (traces, eligibility, config)
    pub fn plasticity(&self) -> &PlasticityEngine {
        &self.plasticity
    }

    /// The synapse store
    pub fn synapses(&self) -> &SynapseStore {
        &self.synapses
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// LIF template whose gain makes a unit current spike in one tick
    fn fast_lif() -> LifConfig {
        LifConfig {
            tau_m_ms: 1.0,
            ..LifConfig::default()
        }
    }

    fn net(n: usize) -> SpikingNetwork {
        SpikingNetwork::new(n, fast_lif(), PlasticityConfig::default()).unwrap()
    }

    #[test]
    fn test_construction_validation() {
        assert!(SpikingNetwork::new(0, fast_lif(), PlasticityConfig::default()).is_err());
        let bad_lif = LifConfig {
            tau_m_ms: -1.0,
            ..LifConfig::default()
        };
        assert!(SpikingNetwork::new(1, bad_lif, PlasticityConfig::default()).is_err());
    }

    #[test]
    fn test_inject_bounds_checked() {
        let mut net = net(2);
        assert!(net.inject(0.0, NeuronId::new(1), 1.0).is_ok());
        assert!(net.inject(0.0, NeuronId::new(2), 1.0).is_err());
    }

    #[test]
    fn test_spike_list_ascending() {
        let mut net = net(4);
        net.inject(0.0, NeuronId::new(3), 2.0).unwrap();
        net.inject(0.0, NeuronId::new(0), 2.0).unwrap();
        net.inject(0.0, NeuronId::new(2), 2.0).unwrap();

        let spikes = net.step(0.0, 1.0).unwrap();
        assert_eq!(
            spikes,
            vec![NeuronId::new(0), NeuronId::new(2), NeuronId::new(3)]
        );
    }

    #[test]
    fn test_delayed_delivery() {
        let mut net = net(2);
        net.add_synapse(NeuronId::new(0), NeuronId::new(1), 1.5, 3.0, false)
            .unwrap();
        net.inject(0.0, NeuronId::new(0), 2.0).unwrap();

        assert_eq!(net.step(0.0, 1.0).unwrap(), vec![NeuronId::new(0)]);
        // Bins 1 and 2: nothing arrives at neuron 1
        for t in [1.0, 2.0] {
            net.step(t, 1.0).unwrap();
            assert_eq!(net.membrane_potential(NeuronId::new(1)).unwrap(), 0.0);
        }
        // Bin 3: the weighted current lands and neuron 1 fires
        assert_eq!(net.step(3.0, 1.0).unwrap(), vec![NeuronId::new(1)]);
    }

    #[test]
    fn test_zero_delay_promoted_to_next_bin() {
        let mut net = net(2);
        net.add_synapse(NeuronId::new(0), NeuronId::new(1), 1.5, 0.0, false)
            .unwrap();
        net.inject(5.0, NeuronId::new(0), 2.0).unwrap();

        let spikes = net.step(5.0, 1.0).unwrap();
        assert_eq!(spikes, vec![NeuronId::new(0)]);
        // Delivery promoted out of the drained bin: neuron 1 fires at bin 6
        let spikes = net.step(6.0, 1.0).unwrap();
        assert_eq!(spikes, vec![NeuronId::new(1)]);
    }

    #[test]
    fn test_step_rejects_bad_time() {
        let mut net = net(1);
        assert!(net.step(0.0, 0.0).is_err());
        net.step(5.0, 1.0).unwrap();
        assert!(matches!(
            net.step(4.0, 1.0),
            Err(RuntimeError::TimeReversal { .. })
        ));
    }

    #[test]
    fn test_reset_preserves_weights() {
        let mut net = net(2);
        let syn = net
            .add_synapse(NeuronId::new(0), NeuronId::new(1), 0.0, 0.0, true)
            .unwrap();

        // Build some eligibility and push the weight up
        net.inject(0.0, NeuronId::new(0), 2.0).unwrap();
        net.step(0.0, 1.0).unwrap();
        net.inject(1.0, NeuronId::new(1), 2.0).unwrap();
        net.step(1.0, 1.0).unwrap();
        net.apply_reward(1.0).unwrap();
        let learned = net.weight(syn).unwrap();
        assert!(learned > 0.0);

        net.reset();
        assert_eq!(net.weight(syn).unwrap(), learned);
        assert_eq!(net.plasticity().eligibility(syn).unwrap(), 0.0);
        assert_eq!(net.membrane_potential(NeuronId::new(0)).unwrap(), 0.0);
    }

    #[test]
    fn test_refractory_seal_across_ticks() {
        let mut net = net(1);
        net.inject(0.0, NeuronId::new(0), 2.0).unwrap();
        assert_eq!(net.step(0.0, 1.0).unwrap().len(), 1);

        // ref_until = 2ms: bin 1 stays sealed no matter the drive
        net.inject(1.0, NeuronId::new(0), 100.0).unwrap();
        assert!(net.step(1.0, 1.0).unwrap().is_empty());
        assert_eq!(net.membrane_potential(NeuronId::new(0)).unwrap(), 0.0);

        // At expiry the neuron integrates and fires again
        net.inject(2.0, NeuronId::new(0), 2.0).unwrap();
        assert_eq!(net.step(2.0, 1.0).unwrap().len(), 1);
    }
}
