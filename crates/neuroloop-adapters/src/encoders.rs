//! Encoders turning frames into input spikes

use neuroloop_io::Encoder;
use neuroloop_runtime::{NeuronId, SimTime};

use crate::screen::Frame;

/// Encodes a single lit cell as one active input neuron `base + y*W + x`.
///
/// Emission is rate-limited: once a spike is produced, the encoder stays
/// silent for `min_interval_ms` regardless of the frame contents.
#[derive(Debug)]
pub struct PositionEncoder {
    width: usize,
    base_id: u32,
    min_interval_ms: f64,
    last_emit: SimTime,
}

impl PositionEncoder {
    /// Create an encoder for a `width`-column frame whose input
    /// population starts at `base_id`.
    pub fn new(width: usize, base_id: u32, min_interval_ms: f64) -> Self {
        Self {
            width,
            base_id,
            min_interval_ms,
            last_emit: f64::NEG_INFINITY,
        }
    }
}

impl Encoder<Frame> for PositionEncoder {
    fn encode(&mut self, t: SimTime, observation: &Frame) -> Vec<(NeuronId, f64)> {
        if t - self.last_emit < self.min_interval_ms {
            return Vec::new();
        }
        match observation.find_lit() {
            Some((x, y)) => {
                self.last_emit = t;
                let id = self.base_id + (y * self.width + x) as u32;
                vec![(NeuronId::new(id), 0.0)]
            }
            None => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_maps_cell_to_neuron() {
        let mut frame = Frame::new(16, 9);
        frame.set(3, 2, 1);
        let mut enc = PositionEncoder::new(16, 100, 5.0);

        let spikes = enc.encode(0.0, &frame);
        assert_eq!(spikes, vec![(NeuronId::new(100 + 2 * 16 + 3), 0.0)]);
    }

    #[test]
    fn test_rate_limit() {
        let mut frame = Frame::new(4, 4);
        frame.set(0, 0, 1);
        let mut enc = PositionEncoder::new(4, 0, 5.0);

        assert_eq!(enc.encode(0.0, &frame).len(), 1);
        // Quiet until the interval elapses
        assert!(enc.encode(2.0, &frame).is_empty());
        assert!(enc.encode(4.9, &frame).is_empty());
        assert_eq!(enc.encode(5.0, &frame).len(), 1);
    }

    #[test]
    fn test_empty_frame_emits_nothing() {
        let frame = Frame::new(4, 4);
        let mut enc = PositionEncoder::new(4, 0, 5.0);
        assert!(enc.encode(0.0, &frame).is_empty());
        // An empty frame does not trip the rate limiter
        let mut lit = Frame::new(4, 4);
        lit.set(1, 1, 1);
        assert_eq!(enc.encode(0.5, &lit).len(), 1);
    }
}
