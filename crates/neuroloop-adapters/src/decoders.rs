//! Decoders turning output spikes into screen actions

use std::collections::HashSet;

use neuroloop_io::Decoder;
use neuroloop_runtime::{NeuronId, SimTime};

use crate::screen::ScreenAction;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// Picks a MOVE by whichever direction population spikes first within a
/// readout window.
///
/// The coordinator owns the cadence: `readout` is only called when the
/// binding's period elapses, and every call closes the current window.
#[derive(Debug)]
pub struct FirstToSpikeMoveDecoder {
    up: HashSet<NeuronId>,
    down: HashSet<NeuronId>,
    left: HashSet<NeuronId>,
    right: HashSet<NeuronId>,
    step: i32,
    first: Option<(Direction, SimTime)>,
}

impl FirstToSpikeMoveDecoder {
    /// Create a decoder over four direction populations moving by `step`
    /// cells per action.
    pub fn new(
        up_ids: impl IntoIterator<Item = NeuronId>,
        down_ids: impl IntoIterator<Item = NeuronId>,
        left_ids: impl IntoIterator<Item = NeuronId>,
        right_ids: impl IntoIterator<Item = NeuronId>,
        step: i32,
    ) -> Self {
        Self {
            up: up_ids.into_iter().collect(),
            down: down_ids.into_iter().collect(),
            left: left_ids.into_iter().collect(),
            right: right_ids.into_iter().collect(),
            step,
            first: None,
        }
    }

    fn classify(&self, neuron_id: NeuronId) -> Option<Direction> {
        if self.up.contains(&neuron_id) {
            Some(Direction::Up)
        } else if self.down.contains(&neuron_id) {
            Some(Direction::Down)
        } else if self.left.contains(&neuron_id) {
            Some(Direction::Left)
        } else if self.right.contains(&neuron_id) {
            Some(Direction::Right)
        } else {
            None
        }
    }
}

impl Decoder<ScreenAction> for FirstToSpikeMoveDecoder {
    fn reset(&mut self) {
        self.first = None;
    }

    fn on_spike(&mut self, t: SimTime, neuron_id: NeuronId) {
        if self.first.is_none() {
            if let Some(dir) = self.classify(neuron_id) {
                self.first = Some((dir, t));
            }
        }
    }

    fn readout(&mut self, _t: SimTime) -> Option<ScreenAction> {
        let step = self.step;
        self.first.take().map(|(dir, at)| {
            log::trace!("window closed: first spike was {:?} at {}ms", dir, at);
            match dir {
                Direction::Up => ScreenAction::Move { dx: 0, dy: -step },
                Direction::Down => ScreenAction::Move { dx: 0, dy: step },
                Direction::Left => ScreenAction::Move { dx: -step, dy: 0 },
                Direction::Right => ScreenAction::Move { dx: step, dy: 0 },
            }
        })
    }
}
