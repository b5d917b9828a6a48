//! Reward-modulated eligibility-trace plasticity
//!
//! Three-factor rule: pre/post spike traces mark recent coincidences,
//! eligibility accumulates them, and a scalar reward converts eligibility
//! into weight changes. Traces and eligibility decay exponentially on a
//! shared time axis; reward never resets them.

use std::collections::HashMap;

use crate::{error::*, synapse::SynapseStore, NeuronId, SimTime, SynapseId};

/// Parameters for the plasticity engine
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlasticityConfig {
    /// Learning rate applied to `reward * eligibility`
    pub eta: f32,
    /// Time constant for pre/post traces (ms)
    pub tau_trace_ms: f32,
    /// Time constant for eligibility (ms)
    pub tau_elig_ms: f32,
    /// Trace increment on a pre-synaptic spike
    pub a_pre: f32,
    /// Trace increment on a post-synaptic spike
    pub a_post: f32,
    /// Minimum weight value
    pub w_min: f32,
    /// Maximum weight value
    pub w_max: f32,
}

impl Default for PlasticityConfig {
    fn default() -> Self {
        Self {
            eta: 0.1,
            tau_trace_ms: 20.0,
            tau_elig_ms: 100.0,
            a_pre: 0.5,
            a_post: 0.5,
            w_min: -2.0,
            w_max: 2.0,
        }
    }
}

impl PlasticityConfig {
    /// Create new plasticity parameters with validation
    pub fn new(
        eta: f32,
        tau_trace_ms: f32,
        tau_elig_ms: f32,
        a_pre: f32,
        a_post: f32,
        w_min: f32,
        w_max: f32,
    ) -> Result<Self> {
        if tau_trace_ms <= 0.0 {
            return Err(RuntimeError::invalid_parameter(
                "tau_trace_ms",
                tau_trace_ms.to_string(),
                "> 0.0",
            ));
        }
        if tau_elig_ms <= 0.0 {
            return Err(RuntimeError::invalid_parameter(
                "tau_elig_ms",
                tau_elig_ms.to_string(),
                "> 0.0",
            ));
        }
        if a_pre < 0.0 {
            return Err(RuntimeError::invalid_parameter(
                "a_pre",
                a_pre.to_string(),
                ">= 0.0",
            ));
        }
        if a_post < 0.0 {
            return Err(RuntimeError::invalid_parameter(
                "a_post",
                a_post.to_string(),
                ">= 0.0",
            ));
        }
        if w_min > w_max {
            return Err(RuntimeError::invalid_parameter(
                "w_min",
                format!("{} (with w_max={})", w_min, w_max),
                "<= w_max",
            ));
        }

        Ok(Self {
            eta,
            tau_trace_ms,
            tau_elig_ms,
            a_pre,
            a_post,
            w_min,
            w_max,
        })
    }

    /// Validate parameters
    pub fn validate(&self) -> Result<()> {
        Self::new(
            self.eta,
            self.tau_trace_ms,
            self.tau_elig_ms,
            self.a_pre,
            self.a_post,
            self.w_min,
            self.w_max,
        )?;
        Ok(())
    }
}

/// Per-synapse trace state
#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct SynapseTraces {
    pre_trace: f32,
    post_trace: f32,
    eligibility: f32,
}

/// Trace and eligibility state for every plastic synapse
#[derive(Debug)]
pub struct PlasticityEngine {
    config: PlasticityConfig,
    /// Plastic synapses in registration (insertion) order
    traces: Vec<(SynapseId, SynapseTraces)>,
    /// Position of each plastic synapse in `traces`
    slots: HashMap<SynapseId, usize>,
    /// Secondary index for the post-spike pass
    by_post: HashMap<NeuronId, Vec<SynapseId>>,
    /// Timestamp of the last decay application
    t_last: SimTime,
}

impl PlasticityEngine {
    /// Create an engine with validated parameters
    pub fn new(config: PlasticityConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            traces: Vec::new(),
            slots: HashMap::new(),
            by_post: HashMap::new(),
            t_last: 0.0,
        })
    }

    /// Engine parameters
    pub fn config(&self) -> &PlasticityConfig {
        &self.config
    }

    /// Whether any plastic synapse is registered
    pub fn is_empty(&self) -> bool {
        self.traces.is_empty()
    }

    /// Number of plastic synapses
    pub fn len(&self) -> usize {
        self.traces.len()
    }

    /// Track a newly added plastic synapse
    pub fn register(&mut self, id: SynapseId, post: NeuronId) {
        let slot = self.traces.len();
        self.traces.push((id, SynapseTraces::default()));
        self.slots.insert(id, slot);
        self.by_post.entry(post).or_default().push(id);
    }

    /// Decay all traces and eligibilities to time `t`.
    ///
    /// No-op while no plastic synapse exists. Rejects time moving
    /// backwards between ticks.
    pub fn decay(&mut self, t: SimTime) -> Result<()> {
        if self.traces.is_empty() {
            return Ok(());
        }
        let dt = t - self.t_last;
        if dt < 0.0 {
            return Err(RuntimeError::TimeReversal {
                t,
                t_last: self.t_last,
            });
        }
        self.t_last = t;
        if dt == 0.0 {
            return Ok(());
        }

        let decay_trace = (-dt / self.config.tau_trace_ms as f64).exp() as f32;
        let decay_elig = (-dt / self.config.tau_elig_ms as f64).exp() as f32;
        for (_, tr) in &mut self.traces {
            tr.pre_trace = flush_subnormal(tr.pre_trace * decay_trace);
            tr.post_trace = flush_subnormal(tr.post_trace * decay_trace);
            tr.eligibility = flush_subnormal(tr.eligibility * decay_elig);
        }
        Ok(())
    }

    /// Apply the pre-side bump for a spike of `pre` in this tick.
    ///
    /// Every plastic outgoing synapse gains `a_pre` of pre-trace and
    /// `a_pre * post_trace` of eligibility.
    pub fn on_pre_spike(&mut self, pre: NeuronId, store: &SynapseStore) {
        let a_pre = self.config.a_pre;
        for (id, synapse) in store.iter_outgoing(pre) {
            if !synapse.plastic {
                continue;
            }
            if let Some(&slot) = self.slots.get(&id) {
                let tr = &mut self.traces[slot].1;
                tr.pre_trace += a_pre;
                tr.eligibility += a_pre * tr.post_trace;
            }
        }
    }

    /// Apply the post-side bump for a spike of `post` in this tick.
    ///
    /// Every plastic synapse targeting `post` gains `a_post` of post-trace
    /// and `a_post * pre_trace` of eligibility.
    pub fn on_post_spike(&mut self, post: NeuronId) {
        let a_post = self.config.a_post;
        if let Some(ids) = self.by_post.get(&post) {
            for id in ids {
                if let Some(&slot) = self.slots.get(id) {
                    let tr = &mut self.traces[slot].1;
                    tr.post_trace += a_post;
                    tr.eligibility += a_post * tr.pre_trace;
                }
            }
        }
    }

    /// Convert eligibility into weight changes under a scalar reward.
    ///
    /// `w <- clip(w + eta * r * eligibility, w_min, w_max)` for every
    /// plastic synapse. Eligibility itself is untouched; it only ever
    /// decays with time.
    pub fn apply_reward(&mut self, reward: f32, store: &mut SynapseStore) -> Result<()> {
        let cfg = &self.config;
        for (id, tr) in &self.traces {
            let weight = store.get(*id)?.weight;
            let updated =
                (weight + cfg.eta * reward * tr.eligibility).clamp(cfg.w_min, cfg.w_max);
            store.update_weight(*id, updated)?;
        }
        Ok(())
    }

    /// Clear traces, eligibility, and the decay clock; weights are untouched
    pub fn reset(&mut self) {
        for (_, tr) in &mut self.traces {
            *tr = SynapseTraces::default();
        }
        self.t_last = 0.0;
    }

    /// Pre-trace of a plastic synapse, if registered
    pub fn pre_trace(&self, id: SynapseId) -> Option<f32> {
        self.slots.get(&id).map(|&slot| self.traces[slot].1.pre_trace)
    }

    /// Post-trace of a plastic synapse, if registered
    pub fn post_trace(&self, id: SynapseId) -> Option<f32> {
        self.slots.get(&id).map(|&slot| self.traces[slot].1.post_trace)
    }

    /// Eligibility of a plastic synapse, if registered
    pub fn eligibility(&self, id: SynapseId) -> Option<f32> {
        self.slots.get(&id).map(|&slot| self.traces[slot].1.eligibility)
    }
}

/// Flush subnormal magnitudes to zero after decay
#[inline]
fn flush_subnormal(x: f32) -> f32 {
    if x != 0.0 && x.abs() < f32::MIN_POSITIVE {
        0.0
    } else {
        x
    }
}
