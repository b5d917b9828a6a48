//! ASCII rendering of screen frames; cosmetic, outside the causal loop

use std::fmt::Write as _;

use console::Term;

use neuroloop_adapters::Frame;

/// Renders frames to the terminal at the driver's cadence
pub struct Renderer {
    term: Term,
}

impl Renderer {
    /// Create a renderer on stdout
    pub fn new() -> Self {
        Self {
            term: Term::stdout(),
        }
    }

    /// Clear the terminal and draw one frame
    pub fn render(&self, t: f64, frame: &Frame) -> std::io::Result<()> {
        let mut out = String::new();
        for y in 0..frame.height() {
            for x in 0..frame.width() {
                out.push(if frame.get(x, y) != 0 { '#' } else { '.' });
            }
            out.push('\n');
        }
        let _ = write!(out, "sim time: {t:.1} ms");

        self.term.clear_screen()?;
        self.term.write_line(&out)
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}
