//! Headless text renderer

use super::VideoService;
use crate::sim::{Actor, Color};

/// Character grid standing in for a window. Each actor lands in the cell containing its
/// position; actors drawn in the background color are invisible.
#[derive(Debug, Clone)]
pub struct TextCanvas {
    columns: usize,
    rows: usize,
    cell_size: i32,
    back: Vec<Vec<char>>,
    front: Vec<Vec<char>>,
    frames: u64,
}

impl TextCanvas {
    pub fn new(columns: i32, rows: i32, cell_size: i32) -> Self {
        let columns = columns.max(1) as usize;
        let rows = rows.max(1) as usize;
        let blank = vec![vec![' '; columns]; rows];
        Self {
            columns,
            rows,
            cell_size: cell_size.max(1),
            back: blank.clone(),
            front: blank,
            frames: 0,
        }
    }

    /// Number of flushed frames
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Last flushed frame, one line per row with trailing blanks trimmed
    pub fn frame(&self) -> String {
        self.front
            .iter()
            .map(|row| row.iter().collect::<String>().trim_end().to_string())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Glyph at a cell of the last flushed frame
    pub fn cell(&self, column: usize, row: usize) -> Option<char> {
        self.front.get(row).and_then(|r| r.get(column)).copied()
    }

    fn put(&mut self, column: i32, row: i32, glyph: char) {
        if column < 0 || row < 0 {
            return;
        }
        if let Some(cell) = self
            .back
            .get_mut(row as usize)
            .and_then(|r| r.get_mut(column as usize))
        {
            *cell = glyph;
        }
    }
}

impl VideoService for TextCanvas {
    fn clear_buffer(&mut self) {
        for row in &mut self.back {
            row.fill(' ');
        }
    }

    fn draw_actor(&mut self, actor: &Actor, centered: bool) {
        if actor.color == Color::BACKGROUND || actor.glyph.is_empty() {
            return;
        }
        let width = actor.glyph.chars().count() as i32;
        let mut column = actor.position.x.div_euclid(self.cell_size);
        let row = actor.position.y.div_euclid(self.cell_size);
        if centered {
            column -= width / 2;
        }
        for (offset, glyph) in actor.glyph.chars().enumerate() {
            self.put(column + offset as i32, row, glyph);
        }
    }

    fn flush_buffer(&mut self) {
        self.front.clone_from(&self.back);
        self.frames += 1;
    }
}
