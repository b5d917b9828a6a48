//! Reward signals computed from environment transitions

use crate::traits::{Actions, Observations};
use neuroloop_runtime::SimTime;

/// Computes a scalar reward from the transition observed around one tick.
///
/// The closed loop calls [`Goal::evaluate`] after actions are applied;
/// returning `0.0` suppresses weight updates for that tick.
pub trait Goal<O, A> {
    /// Clear internal state
    fn reset(&mut self);

    /// Score the transition from `before` to `after` under `actions`
    fn evaluate(
        &mut self,
        t: SimTime,
        before: &Observations<O>,
        actions: &Actions<A>,
        after: &Observations<O>,
    ) -> f32;
}

/// A goal that never rewards; useful for unsupervised or test runs
#[derive(Debug, Default, Clone, Copy)]
pub struct NullGoal;

impl<O, A> Goal<O, A> for NullGoal {
    fn reset(&mut self) {}

    fn evaluate(
        &mut self,
        _t: SimTime,
        _before: &Observations<O>,
        _actions: &Actions<A>,
        _after: &Observations<O>,
    ) -> f32 {
        0.0
    }
}
