//! Keyboard cursor over the grid and the staging tray.
//!
//! The tray is treated as one extra row below the grid. Moving down from the
//! bottom row enters it, moving up leaves it at the column the cursor left.

use crate::types::Direction;

/// What the cursor is on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Cell(usize),
    /// Index into the staged pieces, in display order
    Tray(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardCursor {
    grid_size: usize,
    row: usize,
    col: usize,
    in_tray: bool,
    tray_index: usize,
}

impl BoardCursor {
    pub fn new(grid_size: usize) -> Self {
        Self {
            grid_size: grid_size.max(1),
            row: 0,
            col: 0,
            in_tray: false,
            tray_index: 0,
        }
    }

    pub fn focus(&self) -> Focus {
        if self.in_tray {
            Focus::Tray(self.tray_index)
        } else {
            Focus::Cell(self.row * self.grid_size + self.col)
        }
    }

    pub fn grid_size(&self) -> usize {
        self.grid_size
    }

    /// Move one step. `tray_len` is the current number of staged pieces; an
    /// empty tray is still enterable so staged drops can be aimed at it.
    pub fn step(&mut self, direction: Direction, tray_len: usize) {
        let last = self.grid_size - 1;
        if self.in_tray {
            match direction {
                Direction::Up => self.in_tray = false,
                Direction::Down => {}
                Direction::Left => self.tray_index = self.tray_index.saturating_sub(1),
                Direction::Right => {
                    self.tray_index = (self.tray_index + 1).min(tray_len.saturating_sub(1));
                }
            }
            return;
        }
        match direction {
            Direction::Up => self.row = self.row.saturating_sub(1),
            Direction::Down if self.row == last => {
                self.in_tray = true;
                self.tray_index = self.tray_index.min(tray_len.saturating_sub(1));
            }
            Direction::Down => self.row += 1,
            Direction::Left => self.col = self.col.saturating_sub(1),
            Direction::Right => self.col = (self.col + 1).min(last),
        }
    }

    /// Jump to a grid cell (e.g. to follow a piece moved with the keyboard)
    pub fn set_cell(&mut self, cell: usize) {
        if cell < self.grid_size * self.grid_size {
            self.row = cell / self.grid_size;
            self.col = cell % self.grid_size;
            self.in_tray = false;
        }
    }

    /// Keep the tray index valid after pieces leave the tray
    pub fn clamp_tray(&mut self, tray_len: usize) {
        self.tray_index = self.tray_index.min(tray_len.saturating_sub(1));
    }

    /// Adopt a new grid size, clamping the position
    pub fn resize(&mut self, grid_size: usize) {
        self.grid_size = grid_size.max(1);
        let last = self.grid_size - 1;
        self.row = self.row.min(last);
        self.col = self.col.min(last);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_top_left() {
        assert_eq!(BoardCursor::new(3).focus(), Focus::Cell(0));
    }

    #[test]
    fn clamps_inside_grid() {
        let mut c = BoardCursor::new(3);
        c.step(Direction::Up, 0);
        c.step(Direction::Left, 0);
        assert_eq!(c.focus(), Focus::Cell(0));
        for _ in 0..5 {
            c.step(Direction::Right, 0);
        }
        assert_eq!(c.focus(), Focus::Cell(2));
    }

    #[test]
    fn tray_is_below_bottom_row() {
        let mut c = BoardCursor::new(3);
        c.step(Direction::Down, 2);
        c.step(Direction::Down, 2);
        assert_eq!(c.focus(), Focus::Cell(6));
        c.step(Direction::Down, 2);
        assert_eq!(c.focus(), Focus::Tray(0));
        c.step(Direction::Right, 2);
        c.step(Direction::Right, 2);
        assert_eq!(c.focus(), Focus::Tray(1));
        c.step(Direction::Up, 2);
        assert_eq!(c.focus(), Focus::Cell(6));
    }

    #[test]
    fn resize_clamps_position() {
        let mut c = BoardCursor::new(6);
        c.set_cell(35);
        c.resize(3);
        assert_eq!(c.focus(), Focus::Cell(8));
    }
}
