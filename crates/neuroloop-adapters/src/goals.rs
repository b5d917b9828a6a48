//! Reward functions for the screen world

use neuroloop_io::{Actions, Goal, Observations};
use neuroloop_runtime::SimTime;

use crate::screen::{Frame, ScreenAction, SCREEN_PORT};

fn dist_to_wall(x: usize, y: usize, width: usize, height: usize) -> i32 {
    let x = x as i32;
    let y = y as i32;
    x.min(y).min(width as i32 - 1 - x).min(height as i32 - 1 - y)
}

/// Rewards moving the dot away from the walls.
///
/// A tick where the dot did not move (a wall bump) scores `-1.0`; any
/// actual move scores a small base reward plus a bonus proportional to
/// the gained distance from the nearest wall. Missing frames or dots
/// score zero.
#[derive(Debug, Default, Clone, Copy)]
pub struct CenterSeekingGoal;

impl Goal<Frame, ScreenAction> for CenterSeekingGoal {
    fn reset(&mut self) {}

    fn evaluate(
        &mut self,
        _t: SimTime,
        before: &Observations<Frame>,
        _actions: &Actions<ScreenAction>,
        after: &Observations<Frame>,
    ) -> f32 {
        let (before, after) = match (before.get(SCREEN_PORT), after.get(SCREEN_PORT)) {
            (Some(b), Some(a)) => (b, a),
            _ => return 0.0,
        };
        let (p0, p1) = match (before.find_lit(), after.find_lit()) {
            (Some(p0), Some(p1)) => (p0, p1),
            _ => return 0.0,
        };
        if p0 == p1 {
            return -1.0;
        }
        let (w, h) = (after.width(), after.height());
        let gain = dist_to_wall(p1.0, p1.1, w, h) - dist_to_wall(p0.0, p0.1, w, h);
        0.2 + 0.1 * gain as f32
    }
}
