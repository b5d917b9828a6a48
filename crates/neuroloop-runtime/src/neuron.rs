//! Leaky integrate-and-fire neuron model

use crate::{error::*, SimTime};

/// Parameters for leaky integrate-and-fire neurons
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LifConfig {
    /// Resting potential
    pub v_rest: f32,
    /// Reset potential after a spike
    pub v_reset: f32,
    /// Threshold potential
    pub v_thresh: f32,
    /// Membrane time constant (ms)
    pub tau_m_ms: f32,
    /// Membrane resistance (scales current to voltage)
    pub r_m: f32,
    /// Refractory period (ms)
    pub tau_ref_ms: f32,
}

impl Default for LifConfig {
    fn default() -> Self {
        Self {
            v_rest: 0.0,
            v_reset: 0.0,
            v_thresh: 1.0,
            tau_m_ms: 20.0,
            r_m: 1.0,
            tau_ref_ms: 2.0,
        }
    }
}

impl LifConfig {
    /// Create new LIF parameters with validation
    pub fn new(
        v_rest: f32,
        v_reset: f32,
        v_thresh: f32,
        tau_m_ms: f32,
        r_m: f32,
        tau_ref_ms: f32,
    ) -> Result<Self> {
        if tau_m_ms <= 0.0 {
            return Err(RuntimeError::invalid_parameter(
                "tau_m_ms",
                tau_m_ms.to_string(),
                "> 0.0",
            ));
        }
        if r_m <= 0.0 {
            return Err(RuntimeError::invalid_parameter(
                "r_m",
                r_m.to_string(),
                "> 0.0",
            ));
        }
        if tau_ref_ms < 0.0 {
            return Err(RuntimeError::invalid_parameter(
                "tau_ref_ms",
                tau_ref_ms.to_string(),
                ">= 0.0",
            ));
        }
        if v_thresh <= v_rest {
            return Err(RuntimeError::invalid_parameter(
                "v_thresh",
                format!("{} (with v_rest={})", v_thresh, v_rest),
                "> v_rest",
            ));
        }
        if v_thresh <= v_reset {
            return Err(RuntimeError::invalid_parameter(
                "v_thresh",
                format!("{} (with v_reset={})", v_thresh, v_reset),
                "> v_reset",
            ));
        }

        Ok(Self {
            v_rest,
            v_reset,
            v_thresh,
            tau_m_ms,
            r_m,
            tau_ref_ms,
        })
    }

    /// Validate parameters
    pub fn validate(&self) -> Result<()> {
        Self::new(
            self.v_rest,
            self.v_reset,
            self.v_thresh,
            self.tau_m_ms,
            self.r_m,
            self.tau_ref_ms,
        )?;
        Ok(())
    }
}

/// Mutable state of a neuron
#[derive(Debug, Clone, PartialEq)]
pub struct LifState {
    /// Membrane potential
    pub v: f32,
    /// Refractory expiry time (ms); far past until the first spike
    pub ref_until: SimTime,
}

impl LifState {
    /// Create a fresh state at the resting potential
    pub fn new(v_rest: f32) -> Self {
        Self {
            v: v_rest,
            ref_until: f64::NEG_INFINITY,
        }
    }
}

/// A leaky integrate-and-fire neuron
#[derive(Debug, Clone)]
pub struct LifNeuron {
    /// Neuron parameters
    pub config: LifConfig,
    /// Current state
    pub state: LifState,
}

impl LifNeuron {
    /// Create a new neuron at rest
    pub fn new(config: LifConfig) -> Result<Self> {
        config.validate()?;
        let state = LifState::new(config.v_rest);
        Ok(Self { config, state })
    }

    /// Return state to `{v = v_rest, ref_until = -inf}`
    pub fn reset(&mut self) {
        self.state = LifState::new(self.config.v_rest);
    }

    /// Advance one tick with input current `i_ext`; returns true on spike.
    ///
    /// While refractory the membrane is pinned to `v_reset` and no spike
    /// can be emitted.
    pub fn step(&mut self, t: SimTime, dt_ms: f64, i_ext: f32) -> bool {
        if t < self.state.ref_until {
            self.state.v = self.config.v_reset;
            return false;
        }

        // Euler update: dv = dt/tau * (-(v - v_rest) + R*I)
        let alpha = (dt_ms / self.config.tau_m_ms as f64) as f32;
        let dv = alpha * (-(self.state.v - self.config.v_rest) + self.config.r_m * i_ext);
        self.state.v += dv;

        if self.state.v >= self.config.v_thresh {
            self.state.v = self.config.v_reset;
            self.state.ref_until = t + self.config.tau_ref_ms as f64;
            return true;
        }
        false
    }

    /// Current membrane potential
    pub fn membrane_potential(&self) -> f32 {
        self.state.v
    }
}
