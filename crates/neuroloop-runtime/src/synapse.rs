//! Synapse store with stable indices and outgoing adjacency

use crate::{error::*, NeuronId, SynapseId};

/// A synaptic connection between two neurons
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Synapse {
    /// Pre-synaptic neuron
    pub pre: NeuronId,
    /// Post-synaptic neuron
    pub post: NeuronId,
    /// Signed weight (current injected on delivery)
    pub weight: f32,
    /// Axonal delay (ms)
    pub delay_ms: f64,
    /// Whether the plasticity engine may update the weight
    pub plastic: bool,
}

impl Synapse {
    /// Create a new synapse
    pub fn new(pre: NeuronId, post: NeuronId, weight: f32, delay_ms: f64, plastic: bool) -> Self {
        Self {
            pre,
            post,
            weight,
            delay_ms,
            plastic,
        }
    }
}

/// Flat synapse arena plus per-neuron outgoing adjacency.
///
/// Indices are assigned on insertion and never reused or reordered, so a
/// [`SynapseId`] stays valid for the lifetime of the store. Iteration over
/// a neuron's outgoing synapses follows insertion order.
#[derive(Debug)]
pub struct SynapseStore {
    synapses: Vec<Synapse>,
    outgoing: Vec<Vec<SynapseId>>,
}

impl SynapseStore {
    /// Create an empty store for a pool of `num_neurons` neurons
    pub fn new(num_neurons: usize) -> Self {
        Self {
            synapses: Vec::new(),
            outgoing: vec![Vec::new(); num_neurons],
        }
    }

    /// Number of neurons the store was sized for
    pub fn num_neurons(&self) -> usize {
        self.outgoing.len()
    }

    /// Number of synapses in the store
    pub fn len(&self) -> usize {
        self.synapses.len()
    }

    /// Whether the store holds no synapses
    pub fn is_empty(&self) -> bool {
        self.synapses.is_empty()
    }

    /// Append a synapse; the returned index is final.
    ///
    /// Self-loops are allowed. Fails if either endpoint is out of range or
    /// the delay is negative.
    pub fn add(&mut self, synapse: Synapse) -> Result<SynapseId> {
        if synapse.pre.index() >= self.outgoing.len() {
            return Err(RuntimeError::NeuronNotFound {
                neuron_id: synapse.pre.raw(),
            });
        }
        if synapse.post.index() >= self.outgoing.len() {
            return Err(RuntimeError::NeuronNotFound {
                neuron_id: synapse.post.raw(),
            });
        }
        if synapse.delay_ms < 0.0 {
            return Err(RuntimeError::invalid_parameter(
                "delay_ms",
                synapse.delay_ms.to_string(),
                ">= 0.0",
            ));
        }

        let id = SynapseId::new(self.synapses.len() as u32);
        self.outgoing[synapse.pre.index()].push(id);
        self.synapses.push(synapse);
        Ok(id)
    }

    /// Look up a synapse by index
    pub fn get(&self, id: SynapseId) -> Result<&Synapse> {
        self.synapses
            .get(id.index())
            .ok_or(RuntimeError::SynapseNotFound {
                synapse_id: id.raw(),
            })
    }

    /// Iterate a neuron's outgoing synapses in insertion order
    pub fn iter_outgoing(&self, pre: NeuronId) -> impl Iterator<Item = (SynapseId, &Synapse)> {
        self.outgoing
            .get(pre.index())
            .into_iter()
            .flatten()
            .map(move |&id| (id, &self.synapses[id.index()]))
    }

    /// Iterate all synapses with their indices
    pub fn iter(&self) -> impl Iterator<Item = (SynapseId, &Synapse)> {
        self.synapses
            .iter()
            .enumerate()
            .map(|(i, s)| (SynapseId::new(i as u32), s))
    }

    /// Overwrite a synapse weight.
    ///
    /// Only the plasticity engine calls this; the value it commits has
    /// already been clipped to the configured weight bounds.
    pub fn update_weight(&mut self, id: SynapseId, weight: f32) -> Result<()> {
        let synapse = self
            .synapses
            .get_mut(id.index())
            .ok_or(RuntimeError::SynapseNotFound {
                synapse_id: id.raw(),
            })?;
        synapse.weight = weight;
        Ok(())
    }
}
