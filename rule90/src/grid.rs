// grid.rs - Cell buffers and the set of constant cells

use serde::Serialize;

use crate::error::SimulationError;
use crate::step;

/// In-bounds cell coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Coord {
    pub x: usize,
    pub y: usize,
}

/// Current and next cell buffers plus the constant ("frozen") mask.
///
/// All three buffers are flat, `y * width + x`, and sized once at
/// construction. A constant cell is always populated.
#[derive(Debug, Clone)]
pub struct GridState {
    width: usize,
    height: usize,
    cells: Vec<bool>,
    next: Vec<bool>,
    constants: Vec<bool>,
}

impl GridState {
    pub fn new(width: usize, height: usize) -> Result<Self, SimulationError> {
        if width == 0 || height == 0 {
            return Err(SimulationError::EmptyGrid { width, height });
        }
        let len = width
            .checked_mul(height)
            .ok_or(SimulationError::GridTooLarge { width, height })?;
        Ok(Self {
            width,
            height,
            cells: vec![false; len],
            next: vec![false; len],
            constants: vec![false; len],
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Flat index of `(x, y)`, or `None` when it lies outside the grid.
    pub fn index(&self, x: isize, y: isize) -> Option<usize> {
        if x < 0 || y < 0 {
            return None;
        }
        let (x, y) = (x as usize, y as usize);
        (x < self.width && y < self.height).then(|| y * self.width + x)
    }

    /// Cell value; anything out of bounds reads as empty.
    pub fn get(&self, x: isize, y: isize) -> bool {
        self.index(x, y).is_some_and(|i| self.cells[i])
    }

    pub fn is_constant(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height && self.constants[y * self.width + x]
    }

    pub fn constant_count(&self) -> usize {
        self.constants.iter().filter(|&&c| c).count()
    }

    pub fn coords(&self) -> impl Iterator<Item = Coord> + '_ {
        (0..self.height).flat_map(move |y| (0..self.width).map(move |x| Coord { x, y }))
    }

    pub fn constants(&self) -> impl Iterator<Item = Coord> + '_ {
        self.coords().filter(move |c| self.is_constant(c.x, c.y))
    }

    /// Empties every cell and forgets all constants.
    pub fn reset(&mut self) {
        self.cells.fill(false);
        self.next.fill(false);
        self.constants.fill(false);
    }

    /// Flips `(x, y)` between empty and constant. Returns the new value, or
    /// `None` when the coordinate is out of bounds.
    pub fn toggle_constant(&mut self, x: isize, y: isize) -> Option<bool> {
        let i = self.index(x, y)?;
        let value = !self.cells[i];
        self.cells[i] = value;
        self.constants[i] = value;
        Some(value)
    }

    /// Computes the next generation into the spare buffer, reports every cell
    /// whose value changes, then swaps the buffers.
    pub fn advance(&mut self, mut on_change: impl FnMut(usize, usize, bool)) {
        let mut next = std::mem::take(&mut self.next);
        for y in 0..self.height {
            for x in 0..self.width {
                let i = y * self.width + x;
                let value = step::next_value(self, x, y);
                next[i] = value;
                if value != self.cells[i] {
                    on_change(x, y, value);
                }
            }
        }
        std::mem::swap(&mut self.cells, &mut next);
        self.next = next;
    }

    pub fn snapshot(&self) -> GridSnapshot {
        GridSnapshot {
            width: self.width,
            height: self.height,
            cells: self.cells.clone(),
            constants: self.constants().collect(),
        }
    }
}

/// Owned, read-only copy of a grid for rendering or export.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GridSnapshot {
    pub width: usize,
    pub height: usize,
    pub cells: Vec<bool>,
    pub constants: Vec<Coord>,
}

impl GridSnapshot {
    pub fn get(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height && self.cells[y * self.width + x]
    }

    pub fn is_constant(&self, x: usize, y: usize) -> bool {
        self.constants.contains(&Coord { x, y })
    }

    pub fn population(&self) -> usize {
        self.cells.iter().filter(|&&c| c).count()
    }
}
