//! Bounded 2D grid storage shared by the noise layers.

use crate::error::{MapError, Result};

/// A bounded 2D grid stored row-major. Access outside the grid is an error.
#[derive(Clone, Debug)]
pub struct Tilemap<T> {
    pub width: usize,
    pub height: usize,
    data: Vec<T>,
}

impl<T: Clone> Tilemap<T> {
    pub fn new_with(width: usize, height: usize, value: T) -> Self {
        Self {
            width,
            height,
            data: vec![value; width * height],
        }
    }

    /// True when `(x, y)` lies inside the grid. Never fails.
    pub fn is_valid_at(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height
    }

    fn index(&self, x: usize, y: usize) -> Result<usize> {
        if self.is_valid_at(x, y) {
            Ok(y * self.width + x)
        } else {
            Err(MapError::OutOfBounds {
                x,
                y,
                width: self.width,
                height: self.height,
            })
        }
    }

    pub fn get(&self, x: usize, y: usize) -> Result<&T> {
        let idx = self.index(x, y)?;
        Ok(&self.data[idx])
    }

    pub fn set(&mut self, x: usize, y: usize, value: T) -> Result<()> {
        let idx = self.index(x, y)?;
        self.data[idx] = value;
        Ok(())
    }

    /// Fill the entire map with a value.
    pub fn fill(&mut self, value: T) {
        self.data.fill(value);
    }

    /// Row-major view of every cell.
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Mutable row-major view, used to hand disjoint rows to workers.
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }
}
