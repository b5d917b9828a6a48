//! The moving-dot demo: a dot on a terminal screen, four motor neurons,
//! and center-seeking reward.

use std::thread;
use std::time::Duration;

use clap::Args;
use rand::{rngs::StdRng, SeedableRng};
use tracing::{debug, info};

use neuroloop_adapters::{
    CenterSeekingGoal, FirstToSpikeMoveDecoder, Frame, PositionEncoder, ScreenAction,
    SimpleScreen, NAV_PORT, SCREEN_PORT,
};
use neuroloop_io::{ClosedLoop, IoCoordinator};
use neuroloop_runtime::{CircuitLayout, LifConfig, NeuronId, PlasticityConfig};

use crate::render::Renderer;

/// Arguments for the moving-dot demo
#[derive(Args)]
pub struct DemoArgs {
    /// Screen width in cells
    #[arg(long, default_value_t = 16)]
    width: usize,

    /// Screen height in cells
    #[arg(long, default_value_t = 9)]
    height: usize,

    /// Number of ticks to run (0 = run until interrupted)
    #[arg(long, default_value_t = 0)]
    ticks: u64,

    /// Simulation step size (ms)
    #[arg(long, default_value_t = 1.0)]
    dt_ms: f64,

    /// Insert a plastic hidden population of this size
    #[arg(long)]
    hidden: Option<u32>,

    /// Seed for the wiring RNG
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Injection strength for encoded spikes
    #[arg(long, default_value_t = 1.3)]
    inject_scale: f32,

    /// Decoder readout period (ms)
    #[arg(long, default_value_t = 100.0)]
    readout_period_ms: f64,

    /// Disable screen rendering
    #[arg(long)]
    no_render: bool,

    /// Do not pace ticks against wall-clock time
    #[arg(long)]
    fast: bool,
}

/// Milliseconds of simulated time between renders
const RENDER_EVERY_MS: i64 = 200;

/// Run the demo loop
pub fn run(args: DemoArgs) -> anyhow::Result<()> {
    let n_in = (args.width * args.height) as u32;

    // Membrane time constant matched to the step size, so one encoded
    // spike is enough to fire an input neuron.
    let lif = LifConfig {
        v_rest: 0.0,
        v_reset: 0.0,
        v_thresh: 1.0,
        tau_m_ms: args.dt_ms as f32,
        r_m: 1.0,
        tau_ref_ms: 2.0,
    };

    let mut layout = CircuitLayout::new();
    let input = layout.add_population("in", n_in)?;
    if let Some(hidden) = args.hidden {
        layout.add_population("proc", hidden)?;
    }
    let output = layout.add_population("out", 4)?;

    let mut circuit = layout.build(lif, PlasticityConfig::default())?;
    let mut rng = StdRng::seed_from_u64(args.seed);
    if args.hidden.is_some() {
        circuit.dense("in", "proc", (0.8, 1.2), 0.0, true, &mut rng)?;
        circuit.dense("proc", "out", (0.6, 1.0), 0.0, true, &mut rng)?;
        circuit.lateral_inhibition("proc", -0.3, 0.0)?;
    } else {
        circuit.dense("in", "out", (1.1, 1.5), 0.0, true, &mut rng)?;
    }
    // Competition among outputs to encourage a single winner
    circuit.lateral_inhibition("out", -0.6, 0.0)?;

    let (net, _) = circuit.into_parts();
    info!(
        "demo network: {} neurons, {} synapses",
        net.neuron_count(),
        net.synapse_count()
    );

    let mut screen = SimpleScreen::new(args.width, args.height);
    screen.apply(&ScreenAction::DrawDot {
        x: args.width / 2,
        y: args.height / 2,
    });

    let out_ids: Vec<NeuronId> = output.ids().collect();
    let decoder = FirstToSpikeMoveDecoder::new(
        [out_ids[0]],
        [out_ids[1]],
        [out_ids[2]],
        [out_ids[3]],
        1,
    );

    let mut io = IoCoordinator::new(Box::new(screen), net.neuron_count());
    io.bind_input(
        SCREEN_PORT,
        Box::new(PositionEncoder::new(args.width, input.start(), 5.0)),
        input.ids().collect(),
    )?;
    io.bind_output(NAV_PORT, Box::new(decoder), out_ids, args.readout_period_ms)?;

    let mut closed: ClosedLoop<Frame, ScreenAction> = ClosedLoop::new(net, io);
    let mut goal = CenterSeekingGoal;
    let renderer = Renderer::new();

    let mut k: u64 = 0;
    loop {
        if args.ticks > 0 && k >= args.ticks {
            break;
        }
        let t = k as f64 * args.dt_ms;

        let outcome = closed.tick(t, args.dt_ms, &mut goal, args.inject_scale)?;
        if !outcome.actions.is_empty() {
            debug!("[{t:7.1} ms] actions: {:?}", outcome.actions);
        }
        if outcome.reward != 0.0 {
            debug!("[{t:7.1} ms] reward: {:+.2}", outcome.reward);
        }

        if !args.no_render && (t as i64) % RENDER_EVERY_MS == 0 {
            let obs = closed.io().observe(t);
            if let Some(frame) = obs.get(SCREEN_PORT) {
                renderer.render(t, frame)?;
            }
        }

        if !args.fast {
            thread::sleep(Duration::from_secs_f64(args.dt_ms / 1000.0));
        }
        k += 1;
    }

    info!("demo finished after {} ticks", k);
    Ok(())
}
