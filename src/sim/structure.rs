//! Composite structure builder
//!
//! Expands a declarative layout into the part actors of a multi-cell entity.

use serde::{Deserialize, Serialize};

use super::actor::{Actor, Color, Point};

/// One cell of a layout, relative to the structure origin (in cells)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutCell {
    pub glyph: String,
    pub dx: i32,
    pub dy: i32,
    /// Index into the structure's palette
    pub color: usize,
}

impl LayoutCell {
    pub fn new(glyph: &str, dx: i32, dy: i32, color: usize) -> Self {
        Self {
            glyph: glyph.to_string(),
            dx,
            dy,
            color,
        }
    }
}

/// Create one actor per layout cell at `origin + (dx, dy) * cell_size`, all sharing `velocity`.
///
/// The returned parts keep layout order. Palette indices out of range fall back to white.
pub fn generate_structure(
    origin: Point,
    velocity: Point,
    layout: &[LayoutCell],
    palette: &[Color],
    cell_size: i32,
) -> Vec<Actor> {
    layout
        .iter()
        .map(|cell| {
            let color = palette.get(cell.color).copied().unwrap_or(Color::WHITE);
            let position = origin + Point::new(cell.dx, cell.dy) * cell_size;
            Actor::new(cell.glyph.clone(), position, color).with_velocity(velocity)
        })
        .collect()
}
