//! Populations and wiring helpers
//!
//! A [`CircuitLayout`] collects named populations; materializing it sizes
//! the neuron pool once and yields a [`Circuit`] that owns the network and
//! offers bulk connectivity helpers. The two-phase split makes "declare
//! after build" and "wire before build" unrepresentable.

use rand::Rng;

use crate::{
    error::*,
    network::SpikingNetwork,
    neuron::LifConfig,
    plasticity::PlasticityConfig,
    NeuronId,
};

/// A named contiguous neuron-id range
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Population {
    name: String,
    start: u32,
    size: u32,
}

impl Population {
    /// Population name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// First neuron id in the range
    pub fn start(&self) -> u32 {
        self.start
    }

    /// Number of neurons
    pub fn size(&self) -> u32 {
        self.size
    }

    /// Iterate the neuron ids of this population
    pub fn ids(&self) -> impl Iterator<Item = NeuronId> {
        (self.start..self.start + self.size).map(NeuronId::new)
    }

    /// Whether the population contains a neuron id
    pub fn contains(&self, id: NeuronId) -> bool {
        id.raw() >= self.start && id.raw() < self.start + self.size
    }
}

/// Declared populations awaiting materialization
#[derive(Debug, Default)]
pub struct CircuitLayout {
    populations: Vec<Population>,
}

impl CircuitLayout {
    /// Create an empty layout
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a population; ranges are assigned in declaration order.
    pub fn add_population(&mut self, name: &str, size: u32) -> Result<Population> {
        if size == 0 {
            return Err(RuntimeError::invalid_parameter("size", "0", "> 0"));
        }
        if self.populations.iter().any(|p| p.name == name) {
            return Err(RuntimeError::DuplicatePopulation {
                name: name.to_string(),
            });
        }
        let start = self.total_neurons();
        let pop = Population {
            name: name.to_string(),
            start,
            size,
        };
        self.populations.push(pop.clone());
        Ok(pop)
    }

    /// Total neuron count across declared populations
    pub fn total_neurons(&self) -> u32 {
        self.populations.iter().map(|p| p.size).sum()
    }

    /// Materialize the network; the layout is consumed, so no further
    /// populations can be declared.
    pub fn build(self, lif: LifConfig, plasticity: PlasticityConfig) -> Result<Circuit> {
        let total = self.total_neurons();
        if total == 0 {
            return Err(RuntimeError::invalid_config("no populations declared"));
        }
        let net = SpikingNetwork::new(total as usize, lif, plasticity)?;
        log::debug!(
            "materialized {} neurons across {} populations",
            total,
            self.populations.len()
        );
        Ok(Circuit {
            net,
            populations: self.populations,
        })
    }
}

/// A materialized network together with its population map
#[derive(Debug)]
pub struct Circuit {
    net: SpikingNetwork,
    populations: Vec<Population>,
}

impl Circuit {
    /// Look up a population by name
    pub fn population(&self, name: &str) -> Result<&Population> {
        self.populations
            .iter()
            .find(|p| p.name == name)
            .ok_or_else(|| RuntimeError::UnknownPopulation {
                name: name.to_string(),
            })
    }

    /// All populations in declaration order
    pub fn populations(&self) -> &[Population] {
        &self.populations
    }

    /// Connect every `(pre, post)` pair across two populations with
    /// weights drawn uniformly from `w_range`.
    pub fn dense<R: Rng>(
        &mut self,
        pre: &str,
        post: &str,
        w_range: (f32, f32),
        delay_ms: f64,
        plastic: bool,
        rng: &mut R,
    ) -> Result<()> {
        let (lo, hi) = w_range;
        if lo > hi {
            return Err(RuntimeError::invalid_parameter(
                "w_range",
                format!("({}, {})", lo, hi),
                "lo <= hi",
            ));
        }
        let pre = self.population(pre)?.clone();
        let post = self.population(post)?.clone();
        for i in pre.ids() {
            for j in post.ids() {
                let weight = rng.gen_range(lo..=hi);
                self.net.add_synapse(i, j, weight, delay_ms, plastic)?;
            }
        }
        Ok(())
    }

    /// Cross-connect a population with fixed inhibitory weights on every
    /// ordered pair `i != j`. Never plastic.
    pub fn lateral_inhibition(&mut self, pop: &str, w_inh: f32, delay_ms: f64) -> Result<()> {
        let pop = self.population(pop)?.clone();
        for i in pop.ids() {
            for j in pop.ids() {
                if i != j {
                    self.net.add_synapse(i, j, w_inh, delay_ms, false)?;
                }
            }
        }
        Ok(())
    }

    /// The underlying network
    pub fn network(&self) -> &SpikingNetwork {
        &self.net
    }

    /// Mutable access to the underlying network
    pub fn network_mut(&mut self) -> &mut SpikingNetwork {
        &mut self.net
    }

    /// Consume the circuit, yielding the network and population map
    pub fn into_parts(self) -> (SpikingNetwork, Vec<Population>) {
        (self.net, self.populations)
    }
}
