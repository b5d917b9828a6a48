//! Property tests for the quantified simulator invariants

use proptest::prelude::*;

use neuroloop_runtime::{
    time_bin, LifConfig, NeuronId, PlasticityConfig, PlasticityEngine, SpikingNetwork,
    Synapse, SynapseStore,
};

fn fast_lif() -> LifConfig {
    LifConfig {
        tau_m_ms: 1.0,
        ..LifConfig::default()
    }
}

proptest! {
    /// After any sequence of rewards, every plastic weight stays clipped.
    #[test]
    fn weights_stay_within_bounds(
        rewards in proptest::collection::vec(-10.0f32..10.0, 1..16),
        w0 in -1.5f32..1.5,
    ) {
        let mut net = SpikingNetwork::new(
            2,
            fast_lif(),
            PlasticityConfig { eta: 1.0, ..PlasticityConfig::default() },
        ).unwrap();
        let syn = net
            .add_synapse(NeuronId::new(0), NeuronId::new(1), w0, 0.0, true)
            .unwrap();

        // Build nonzero eligibility with a pre/post pair
        net.inject(0.0, NeuronId::new(0), 2.0).unwrap();
        net.step(0.0, 1.0).unwrap();
        net.inject(1.0, NeuronId::new(1), 2.0).unwrap();
        net.step(1.0, 1.0).unwrap();

        let cfg = net.plasticity().config().clone();
        for r in rewards {
            net.apply_reward(r).unwrap();
            let w = net.weight(syn).unwrap();
            prop_assert!(w >= cfg.w_min && w <= cfg.w_max);
        }
    }

    /// A pre-spike at bin b reaches the target only at a bin strictly
    /// after b and no earlier than round(b + delay).
    #[test]
    fn delivery_respects_delay(delay_ms in 0.0f64..15.0) {
        let mut net = SpikingNetwork::new(
            2,
            fast_lif(),
            PlasticityConfig::default(),
        ).unwrap();
        // Weight below threshold so arrival is visible as a membrane bump
        net.add_synapse(NeuronId::new(0), NeuronId::new(1), 0.5, delay_ms, false)
            .unwrap();

        net.inject(0.0, NeuronId::new(0), 2.0).unwrap();
        prop_assert_eq!(net.step(0.0, 1.0).unwrap(), vec![NeuronId::new(0)]);

        let mut arrival = None;
        for bin in 1..=20i64 {
            net.step(bin as f64, 1.0).unwrap();
            if net.membrane_potential(NeuronId::new(1)).unwrap() != 0.0 {
                arrival = Some(bin);
                break;
            }
        }

        let expected = time_bin(delay_ms).max(1);
        prop_assert_eq!(arrival, Some(expected));
    }

    /// Between two ticks with no spikes, traces shrink by exactly
    /// exp(-dt / tau) within float tolerance.
    #[test]
    fn trace_decay_is_multiplicative(gap_ms in 0.1f64..50.0) {
        let mut store = SynapseStore::new(2);
        let id = store
            .add(Synapse::new(NeuronId::new(0), NeuronId::new(1), 0.0, 0.0, true))
            .unwrap();
        let config = PlasticityConfig::default();
        let tau = config.tau_trace_ms as f64;
        let mut engine = PlasticityEngine::new(config).unwrap();
        engine.register(id, NeuronId::new(1));

        engine.on_pre_spike(NeuronId::new(0), &store);
        let before = engine.pre_trace(id).unwrap();
        engine.decay(gap_ms).unwrap();

        let expected = before * (-gap_ms / tau).exp() as f32;
        prop_assert!((engine.pre_trace(id).unwrap() - expected).abs() < 1e-5);
    }

    /// Zero reward never changes any weight.
    #[test]
    fn zero_reward_is_idempotent(w0 in -2.0f32..2.0, seed_spikes in 0u32..3) {
        let mut net = SpikingNetwork::new(
            2,
            fast_lif(),
            PlasticityConfig::default(),
        ).unwrap();
        let syn = net
            .add_synapse(NeuronId::new(0), NeuronId::new(1), w0, 0.0, true)
            .unwrap();

        for k in 0..seed_spikes {
            let t = k as f64;
            net.inject(t, NeuronId::new(k % 2), 2.0).unwrap();
            net.step(t, 1.0).unwrap();
        }

        let before = net.weight(syn).unwrap();
        net.apply_reward(0.0).unwrap();
        prop_assert_eq!(net.weight(syn).unwrap(), before);
    }
}
