use super::emit;
use crate::constants::RAIN_GLYPHS;
use colored::Colorize;
use rand::Rng;
use std::io::Write;
use std::time::Duration;

/// Frames a glyph stays visible while fading out
const TRAIL: u8 = 12;

/// Probability a drop that left the bottom restarts on a given frame
const RESET_CHANCE: f64 = 0.025;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Cell {
    glyph: char,
    age: u8,
}

/// Ambient falling-glyph animation
pub struct RainField {
    width: usize,
    height: usize,
    drops: Vec<i64>,
    grid: Vec<Option<Cell>>,
    glyphs: Vec<char>,
}

impl RainField {
    /// Every column starts at a random row in `[-50, 0)`
    pub fn new<R: Rng>(width: usize, height: usize, rng: &mut R) -> Self {
        let drops = (0..width).map(|_| rng.gen_range(-50..0)).collect();
        Self {
            width,
            height,
            drops,
            grid: vec![None; width * height],
            glyphs: RAIN_GLYPHS.chars().collect(),
        }
    }

    pub fn drops(&self) -> &[i64] {
        &self.drops
    }

    /// Age the trails, draw one glyph per column, advance every drop
    pub fn step<R: Rng>(&mut self, rng: &mut R) {
        for cell in self.grid.iter_mut() {
            if let Some(c) = cell {
                c.age += 1;
                if c.age >= TRAIL {
                    *cell = None;
                }
            }
        }
        for col in 0..self.width {
            let row = self.drops[col];
            if row >= 0 && (row as usize) < self.height {
                let glyph = self.glyphs[rng.gen_range(0..self.glyphs.len())];
                self.grid[row as usize * self.width + col] = Some(Cell { glyph, age: 0 });
            }
            if row > self.height as i64 && rng.gen::<f64>() < RESET_CHANCE {
                self.drops[col] = 0;
            }
            self.drops[col] += 1;
        }
    }

    /// Plain glyph rows, blanks where nothing is visible
    pub fn rows(&self) -> Vec<String> {
        self.grid
            .chunks(self.width.max(1))
            .map(|row| row.iter().map(|c| c.map_or(' ', |c| c.glyph)).collect())
            .collect()
    }

    fn painted(&self) -> String {
        let mut frame = String::new();
        for row in self.grid.chunks(self.width.max(1)) {
            for cell in row {
                match cell {
                    Some(c) if c.age == 0 => frame.push_str(&c.glyph.to_string().bright_green().to_string()),
                    Some(c) if c.age < TRAIL / 2 => frame.push_str(&c.glyph.to_string().green().to_string()),
                    Some(c) => frame.push_str(&c.glyph.to_string().green().dimmed().to_string()),
                    None => frame.push(' '),
                }
            }
            frame.push('\n');
        }
        frame
    }
}

/// Draw `frames` frames in place, then clear the area
pub async fn play_rain<W: Write, R: Rng>(
    out: &mut W,
    rng: &mut R,
    width: usize,
    height: usize,
    frames: usize,
    frame_interval: Duration,
) {
    if frames == 0 || width == 0 || height == 0 {
        return;
    }
    let mut field = RainField::new(width, height, rng);
    emit(out, "\x1b[2J");
    for _ in 0..frames {
        field.step(rng);
        emit(out, &format!("\x1b[H{}", field.painted()));
        tokio::time::sleep(frame_interval).await;
    }
    emit(out, "\x1b[2J\x1b[H");
}
