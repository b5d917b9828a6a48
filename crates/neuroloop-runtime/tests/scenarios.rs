//! End-to-end simulation scenarios exercising the per-tick ordering
//! between current delivery, integration, rescheduling, and plasticity.

use neuroloop_runtime::{
    LifConfig, NeuronId, PlasticityConfig, SpikingNetwork, SynapseId,
};

/// Template where one tick of unit current moves the membrane by 0.1
fn slow_lif() -> LifConfig {
    LifConfig {
        v_rest: 0.0,
        v_reset: 0.0,
        v_thresh: 1.0,
        tau_m_ms: 10.0,
        r_m: 1.0,
        tau_ref_ms: 2.0,
    }
}

/// Template whose gain makes a suprathreshold current spike in one tick
fn fast_lif() -> LifConfig {
    LifConfig {
        tau_m_ms: 1.0,
        ..slow_lif()
    }
}

fn make_net(n: usize, lif: LifConfig) -> SpikingNetwork {
    SpikingNetwork::new(n, lif, PlasticityConfig::default()).unwrap()
}

#[test]
fn single_neuron_charges_to_threshold_then_seals() {
    let mut net = make_net(1, slow_lif());
    let n0 = NeuronId::new(0);

    // Constant drive of 2.0 per bin; with alpha = 0.1 the Euler sequence
    // is 0.2, 0.38, 0.542, 0.6878, 0.81902, 0.93712 and crosses 1.0 on
    // the seventh tick.
    for bin in 0..10 {
        net.inject(bin as f64, n0, 2.0).unwrap();
    }

    let mut spike_bins = Vec::new();
    for bin in 0..10 {
        let t = bin as f64;
        let spikes = net.step(t, 1.0).unwrap();
        if !spikes.is_empty() {
            spike_bins.push(bin);
        }
        if bin == 7 {
            // Refractory: membrane pinned to reset despite ongoing drive
            assert_eq!(net.membrane_potential(n0).unwrap(), 0.0);
        }
    }
    assert_eq!(spike_bins, vec![6]);
}

#[test]
fn subthreshold_drive_never_spikes() {
    let mut net = make_net(1, slow_lif());
    let n0 = NeuronId::new(0);

    // Steady state for I = 0.2 is r_m * I = 0.2, well under threshold
    let mut prev = 0.0;
    for bin in 0..50 {
        let t = bin as f64;
        net.inject(t, n0, 0.2).unwrap();
        assert!(net.step(t, 1.0).unwrap().is_empty());
        let v = net.membrane_potential(n0).unwrap();
        assert!(v > prev);
        assert!(v < 0.2);
        prev = v;
    }
    // First two Euler steps: 0.02, then 0.02 + 0.1 * (0.2 - 0.02)
    let mut fresh = make_net(1, slow_lif());
    fresh.inject(0.0, n0, 0.2).unwrap();
    fresh.step(0.0, 1.0).unwrap();
    assert!((fresh.membrane_potential(n0).unwrap() - 0.02).abs() < 1e-6);
    fresh.inject(1.0, n0, 0.2).unwrap();
    fresh.step(1.0, 1.0).unwrap();
    assert!((fresh.membrane_potential(n0).unwrap() - 0.038).abs() < 1e-6);
}

#[test]
fn delayed_synapse_delivers_at_its_bin() {
    let mut net = make_net(2, fast_lif());
    let (n0, n1) = (NeuronId::new(0), NeuronId::new(1));
    net.add_synapse(n0, n1, 1.5, 3.0, false).unwrap();

    net.inject(0.0, n0, 2.0).unwrap();
    assert_eq!(net.step(0.0, 1.0).unwrap(), vec![n0]);

    // Nothing reaches neuron 1 before bin 3
    for t in [1.0, 2.0] {
        assert!(net.step(t, 1.0).unwrap().is_empty());
        assert_eq!(net.membrane_potential(n1).unwrap(), 0.0);
    }
    assert_eq!(net.step(3.0, 1.0).unwrap(), vec![n1]);
}

#[test]
fn zero_delay_promotes_to_next_bin() {
    let mut net = make_net(2, fast_lif());
    let (n0, n1) = (NeuronId::new(0), NeuronId::new(1));
    net.add_synapse(n0, n1, 1.5, 0.0, false).unwrap();

    // Pre-spike at bin 5 must deliver at bin 6, not the drained bin 5
    for t in [0.0, 1.0, 2.0, 3.0, 4.0] {
        assert!(net.step(t, 1.0).unwrap().is_empty());
    }
    net.inject(5.0, n0, 2.0).unwrap();
    assert_eq!(net.step(5.0, 1.0).unwrap(), vec![n0]);
    assert_eq!(net.step(6.0, 1.0).unwrap(), vec![n1]);
}

#[test]
fn lateral_inhibition_suppresses_rivals() {
    let mut net = make_net(4, fast_lif());
    for i in 0..4u32 {
        for j in 0..4u32 {
            if i != j {
                net.add_synapse(NeuronId::new(i), NeuronId::new(j), -0.6, 0.0, false)
                    .unwrap();
            }
        }
    }

    net.inject(0.0, NeuronId::new(0), 2.0).unwrap();
    net.inject(0.0, NeuronId::new(1), 2.0).unwrap();
    let spikes = net.step(0.0, 1.0).unwrap();
    assert_eq!(spikes, vec![NeuronId::new(0), NeuronId::new(1)]);

    // At bin 1 the winners hold each other down and drag the rest negative
    assert!(net.step(1.0, 1.0).unwrap().is_empty());
    // 0 and 1 are refractory (pinned to reset); 2 and 3 got -0.6 twice
    assert_eq!(net.membrane_potential(NeuronId::new(0)).unwrap(), 0.0);
    assert!((net.membrane_potential(NeuronId::new(2)).unwrap() + 1.2).abs() < 1e-6);
    assert!((net.membrane_potential(NeuronId::new(3)).unwrap() + 1.2).abs() < 1e-6);
}

#[test]
fn reward_moves_weight_in_reward_direction() {
    let mut net = SpikingNetwork::new(
        2,
        fast_lif(),
        PlasticityConfig {
            eta: 0.1,
            ..PlasticityConfig::default()
        },
    )
    .unwrap();
    let (n0, n1) = (NeuronId::new(0), NeuronId::new(1));
    let syn = net.add_synapse(n0, n1, 0.0, 0.0, true).unwrap();

    // Force a pre spike at t=0 and a post spike at t=1
    net.inject(0.0, n0, 2.0).unwrap();
    assert_eq!(net.step(0.0, 1.0).unwrap(), vec![n0]);
    net.inject(1.0, n1, 2.0).unwrap();
    assert_eq!(net.step(1.0, 1.0).unwrap(), vec![n1]);

    net.step(2.0, 1.0).unwrap();
    net.apply_reward(1.0).unwrap();
    let potentiated = net.weight(syn).unwrap();
    assert!(potentiated > 0.0);

    net.apply_reward(-1.0).unwrap();
    let depressed = net.weight(syn).unwrap();
    assert!(depressed < potentiated);

    let cfg = net.plasticity().config().clone();
    assert!(depressed >= cfg.w_min && depressed <= cfg.w_max);
}

#[test]
fn eligibility_decays_but_survives_reward() {
    let mut net = make_net(2, fast_lif());
    let (n0, n1) = (NeuronId::new(0), NeuronId::new(1));
    let syn = net.add_synapse(n0, n1, 0.0, 0.0, true).unwrap();

    net.inject(0.0, n0, 2.0).unwrap();
    net.step(0.0, 1.0).unwrap();
    net.inject(1.0, n1, 2.0).unwrap();
    net.step(1.0, 1.0).unwrap();

    let elig_early = net.plasticity().eligibility(syn).unwrap();
    assert!(elig_early > 0.0);

    net.apply_reward(1.0).unwrap();
    assert_eq!(net.plasticity().eligibility(syn).unwrap(), elig_early);

    // Quiet ticks only shrink it exponentially
    for t in [2.0, 3.0, 4.0] {
        net.step(t, 1.0).unwrap();
    }
    let elig_late = net.plasticity().eligibility(syn).unwrap();
    let expected = elig_early * (-3.0f64 / 100.0).exp() as f32;
    assert!((elig_late - expected).abs() < 1e-6);
}

#[test]
fn parallel_synapses_accumulate() {
    // Two synapses between the same pair sum their currents in one bin
    let mut net = make_net(2, fast_lif());
    let (n0, n1) = (NeuronId::new(0), NeuronId::new(1));
    let a = net.add_synapse(n0, n1, 0.3, 2.0, false).unwrap();
    let b = net.add_synapse(n0, n1, 0.4, 2.0, false).unwrap();
    assert_ne!(a, b);

    net.inject(0.0, n0, 2.0).unwrap();
    net.step(0.0, 1.0).unwrap();
    net.step(1.0, 1.0).unwrap();
    net.step(2.0, 1.0).unwrap();
    assert!((net.membrane_potential(n1).unwrap() - 0.7).abs() < 1e-6);
}

#[test]
fn synapse_ids_stay_stable() {
    let mut net = make_net(3, fast_lif());
    let a = net
        .add_synapse(NeuronId::new(0), NeuronId::new(1), 0.1, 0.0, false)
        .unwrap();
    let b = net
        .add_synapse(NeuronId::new(1), NeuronId::new(2), 0.2, 0.0, true)
        .unwrap();
    assert_eq!(a, SynapseId::new(0));
    assert_eq!(b, SynapseId::new(1));
    assert_eq!(net.synapse(b).unwrap().pre, NeuronId::new(1));
}
