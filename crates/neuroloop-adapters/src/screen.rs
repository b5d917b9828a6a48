//! The screen world: a cell grid with one movable dot

use neuroloop_io::{Actions, Environment, Observations};
use neuroloop_runtime::SimTime;

/// Input port name the screen observation is published under
pub const SCREEN_PORT: &str = "screen";

/// Output port name movement actions are consumed from
pub const NAV_PORT: &str = "nav";

/// A rectangular cell buffer; zero means empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    width: usize,
    height: usize,
    cells: Vec<u8>,
}

impl Frame {
    /// Create an empty frame
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![0; width * height],
        }
    }

    /// Frame width in cells
    pub fn width(&self) -> usize {
        self.width
    }

    /// Frame height in cells
    pub fn height(&self) -> usize {
        self.height
    }

    /// Read a cell
    pub fn get(&self, x: usize, y: usize) -> u8 {
        self.cells[y * self.width + x]
    }

    /// Write a cell
    pub fn set(&mut self, x: usize, y: usize, value: u8) {
        self.cells[y * self.width + x] = value;
    }

    /// Position of the first lit cell in row-major order, if any
    pub fn find_lit(&self) -> Option<(usize, usize)> {
        self.cells
            .iter()
            .position(|&c| c != 0)
            .map(|i| (i % self.width, i / self.width))
    }
}

/// Typed actions destined for the screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScreenAction {
    /// Place a character code at a cell
    PutChar {
        /// Cell x
        x: usize,
        /// Cell y
        y: usize,
        /// Value to store
        code: u8,
    },
    /// Move the dot by a delta, clamped to the frame
    Move {
        /// Horizontal delta
        dx: i32,
        /// Vertical delta
        dy: i32,
    },
    /// Light a single cell as the dot
    DrawDot {
        /// Cell x
        x: usize,
        /// Cell y
        y: usize,
    },
    /// Clear the whole buffer
    Clear,
}

/// A screen with a single-dot drawing model.
///
/// Observes as `{"screen": frame}` and consumes the `"nav"` port's
/// action. Moves clamp to the frame bounds, so walking into a wall
/// leaves the dot in place.
#[derive(Debug)]
pub struct SimpleScreen {
    frame: Frame,
    dot: Option<(usize, usize)>,
}

impl SimpleScreen {
    /// Create an empty screen
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            frame: Frame::new(width, height),
            dot: None,
        }
    }

    /// Current dot position, if one is drawn
    pub fn dot(&self) -> Option<(usize, usize)> {
        self.dot
    }

    /// The current frame
    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    /// Apply one action to the buffer
    pub fn apply(&mut self, action: &ScreenAction) {
        match *action {
            ScreenAction::Clear => {
                self.frame = Frame::new(self.frame.width, self.frame.height);
                self.dot = None;
            }
            ScreenAction::PutChar { x, y, code } => {
                if x < self.frame.width && y < self.frame.height {
                    self.frame.set(x, y, code);
                }
            }
            ScreenAction::DrawDot { x, y } => {
                if x < self.frame.width && y < self.frame.height {
                    self.set_dot(x, y);
                }
            }
            ScreenAction::Move { dx, dy } => {
                if let Some((x, y)) = self.dot {
                    let nx = (x as i32 + dx).clamp(0, self.frame.width as i32 - 1) as usize;
                    let ny = (y as i32 + dy).clamp(0, self.frame.height as i32 - 1) as usize;
                    self.set_dot(nx, ny);
                }
            }
        }
    }

    fn set_dot(&mut self, x: usize, y: usize) {
        if let Some((px, py)) = self.dot {
            self.frame.set(px, py, 0);
        }
        self.frame.set(x, y, 1);
        self.dot = Some((x, y));
    }
}

impl Environment<Frame, ScreenAction> for SimpleScreen {
    fn observe(&self, _t: SimTime) -> Observations<Frame> {
        let mut obs = Observations::new();
        obs.insert(SCREEN_PORT.to_string(), self.frame.clone());
        obs
    }

    fn apply_action(&mut self, _t: SimTime, actions: &Actions<ScreenAction>) {
        if let Some(action) = actions.get(NAV_PORT) {
            self.apply(action);
        }
    }
}
