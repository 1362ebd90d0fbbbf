//! Character-grid renderer for headless runs
//!
//! Draws the glass outline, balls labelled by tier, the buttons and a score
//! line into a fixed-size text buffer.

use glam::Vec2;

use super::{ButtonView, FrameSnapshot, Renderer};

/// Samples per glass edge when tracing the outline
const OUTLINE_SAMPLES: usize = 64;

/// Renders frames into a string buffer
#[derive(Debug, Clone)]
pub struct TextRenderer {
    cols: usize,
    rows: usize,
    grid: Vec<Vec<char>>,
    buffer: String,
}

impl TextRenderer {
    pub fn new(cols: usize, rows: usize) -> Self {
        let cols = cols.max(8);
        let rows = rows.max(4);
        Self {
            cols,
            rows,
            grid: vec![vec![' '; cols]; rows],
            buffer: String::new(),
        }
    }

    /// The most recently rendered frame
    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    /// Screen position to grid cell, if on the grid
    fn cell(&self, screen: Vec2, p: Vec2) -> Option<(usize, usize)> {
        if screen.x <= 0.0 || screen.y <= 0.0 {
            return None;
        }
        let col = (p.x / screen.x * self.cols as f32).floor();
        let row = (p.y / screen.y * self.rows as f32).floor();
        if col < 0.0 || row < 0.0 || col >= self.cols as f32 || row >= self.rows as f32 {
            return None;
        }
        Some((row as usize, col as usize))
    }

    fn plot(&mut self, screen: Vec2, p: Vec2, ch: char) {
        if let Some((row, col)) = self.cell(screen, p) {
            self.grid[row][col] = ch;
        }
    }

    fn label(&mut self, screen: Vec2, center: Vec2, text: &str) {
        let Some((row, col)) = self.cell(screen, center) else {
            return;
        };
        let start = col.saturating_sub(text.len() / 2);
        for (i, ch) in text.chars().enumerate() {
            if let Some(cell) = self.grid[row].get_mut(start + i) {
                *cell = ch;
            }
        }
    }

    fn draw_button(&mut self, screen: Vec2, button: &ButtonView) {
        let text = if button.active {
            format!("[{}]", button.kind.label())
        } else {
            format!("({})", button.kind.label().to_lowercase())
        };
        self.label(screen, button.rect.center(), &text);
    }

    fn draw(&mut self, frame: &FrameSnapshot) {
        for row in &mut self.grid {
            row.fill(' ');
        }
        let screen = frame.screen;

        let outline = frame.glass.outline();
        // Rim is open; walls and floor only
        for (from, to, ch) in [
            (outline[0], outline[3], '\\'),
            (outline[3], outline[2], '_'),
            (outline[2], outline[1], '/'),
        ] {
            for i in 0..=OUTLINE_SAMPLES {
                let t = i as f32 / OUTLINE_SAMPLES as f32;
                self.plot(screen, from.lerp(to, t), ch);
            }
        }

        for ball in &frame.balls {
            let ch = if ball.tier < 10 {
                char::from_digit(ball.tier, 10).unwrap_or('o')
            } else {
                'o'
            };
            self.plot(screen, ball.pos, ch);
        }

        self.draw_button(screen, &frame.add_button);
        self.draw_button(screen, &frame.merge_button);

        self.buffer.clear();
        self.buffer.push_str(&format!(
            "frame {} | score {} ({:.0}%) | spawn tier {} | balls {}\n",
            frame.frame,
            frame.score,
            frame.progress * 100.0,
            frame.spawn_tier,
            frame.balls.len()
        ));
        for row in &self.grid {
            let line: String = row.iter().collect();
            self.buffer.push_str(line.trim_end());
            self.buffer.push('\n');
        }
    }
}

impl Renderer for TextRenderer {
    fn render(&mut self, frame: &FrameSnapshot) {
        self.draw(frame);
        log::trace!("{}", self.buffer);
    }
}
