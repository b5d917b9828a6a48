//! Concrete I/O adapters for a terminal "screen" world
//!
//! A 2-D cell grid with a single movable dot, plus the encoder, decoder,
//! and goal that close the loop around it: the dot's position becomes one
//! input spike, four output neurons steer it, and reward favors moving
//! away from the walls.

#![deny(missing_docs)]
#![warn(clippy::all)]

pub mod decoders;
pub mod encoders;
pub mod goals;
pub mod screen;

pub use decoders::FirstToSpikeMoveDecoder;
pub use encoders::PositionEncoder;
pub use goals::CenterSeekingGoal;
pub use screen::{Frame, ScreenAction, SimpleScreen, NAV_PORT, SCREEN_PORT};
