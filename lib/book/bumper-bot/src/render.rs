/*
 * Copyright (C) 2023 Asim Ihsan
 * SPDX-License-Identifier: AGPL-3.0-only
 *
 * This program is free software: you can redistribute it and/or modify it under
 * the terms of the GNU Affero General Public License as published by the Free
 * Software Foundation, version 3.
 *
 * This program is distributed in the hope that it will be useful, but WITHOUT ANY
 * WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A
 * PARTICULAR PURPOSE. See the GNU Affero General Public License for more details.
 *
 * You should have received a copy of the GNU Affero General Public License along
 * with this program. If not, see <https://www.gnu.org/licenses/>
 */

//! Visualization hooks.
//!
//! A [`Renderer`] only observes the simulation. It sees the true obstacles once, then every move
//! and bump, and gets a chance between steps to ask for the run to stop.

use std::ops::ControlFlow;

use crate::grid::Location;
use crate::HashSet;

/// Receives simulation events for display.
pub trait Renderer {
    /// Draw the true obstacles before the first step.
    fn draw_background(&mut self, obstacles: &HashSet<Location>);

    /// The agent moved from `from` to `to`.
    fn draw_move(&mut self, from: Location, to: Location);

    /// The agent ran into the obstacle at `at`.
    fn draw_bump(&mut self, at: Location);

    /// Handle pending events between steps. `Break` ends the run.
    fn poll_events(&mut self) -> ControlFlow<()> {
        ControlFlow::Continue(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Cell {
    Unknown,
    Obstacle,
    Bump,
    Visited,
    Agent,
}

impl Cell {
    fn glyph(self) -> char {
        match self {
            Cell::Unknown => ' ',
            Cell::Obstacle => '#',
            Cell::Bump => '!',
            Cell::Visited => '.',
            Cell::Agent => '@',
        }
    }
}

/// Text canvas with a fixed viewport centred on the origin. Events outside the viewport are
/// dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AsciiCanvas {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl Default for AsciiCanvas {
    // 640x480 screen at 4 pixels per cell.
    fn default() -> Self {
        AsciiCanvas::new(160, 120)
    }
}

impl AsciiCanvas {
    /// Empty canvas of `width` x `height` cells.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![Cell::Unknown; width * height],
        }
    }

    /// Width in cells.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height in cells.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Character drawn for `loc`, or `None` when it is outside the viewport.
    pub fn glyph_at(&self, loc: Location) -> Option<char> {
        self.index(loc).map(|i| self.cells[i].glyph())
    }

    fn index(&self, loc: Location) -> Option<usize> {
        let col = i64::from(loc.x) + (self.width / 2) as i64;
        let row = (self.height / 2) as i64 - i64::from(loc.y);
        if col < 0 || row < 0 || col >= self.width as i64 || row >= self.height as i64 {
            return None;
        }
        Some(row as usize * self.width + col as usize)
    }

    fn paint(&mut self, loc: Location, cell: Cell) {
        if let Some(i) = self.index(loc) {
            self.cells[i] = cell;
        }
    }
}

impl Renderer for AsciiCanvas {
    fn draw_background(&mut self, obstacles: &HashSet<Location>) {
        self.cells.fill(Cell::Unknown);
        for obstacle in obstacles {
            self.paint(*obstacle, Cell::Obstacle);
        }
    }

    fn draw_move(&mut self, from: Location, to: Location) {
        self.paint(from, Cell::Visited);
        self.paint(to, Cell::Agent);
    }

    fn draw_bump(&mut self, at: Location) {
        self.paint(at, Cell::Bump);
    }
}

impl std::fmt::Display for AsciiCanvas {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut s = String::with_capacity((self.width + 1) * self.height);
        for (row, cells) in self.cells.chunks(self.width.max(1)).enumerate() {
            s.extend(cells.iter().map(|c| c.glyph()));
            if row + 1 < self.height {
                s.push('\n');
            }
        }
        write!(f, "{}", s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_origin_is_centre_of_viewport() {
        let mut canvas = AsciiCanvas::new(5, 3);
        canvas.draw_move(Location::new(-1, 0), Location::ORIGIN);
        canvas.draw_bump(Location::new(1, 1));
        assert_eq!(canvas.to_string(), "   ! \n .@  \n     ");
    }

    #[test]
    fn test_background_draws_obstacles_and_clears_history() {
        let mut canvas = AsciiCanvas::new(3, 3);
        canvas.draw_move(Location::ORIGIN, Location::new(0, 1));
        let obstacles: HashSet<Location> = [Location::new(-1, -1), Location::new(1, 1)]
            .into_iter()
            .collect();
        canvas.draw_background(&obstacles);
        assert_eq!(canvas.to_string(), "  #\n   \n#  ");
    }

    #[test]
    fn test_events_outside_viewport_are_ignored() {
        let mut canvas = AsciiCanvas::new(4, 4);
        canvas.draw_bump(Location::new(100, -100));
        canvas.draw_move(Location::new(i32::MAX, 0), Location::new(i32::MIN, 0));
        assert_eq!(canvas, AsciiCanvas::new(4, 4));
        assert_eq!(canvas.glyph_at(Location::new(2, 0)), None);
        assert_eq!(canvas.glyph_at(Location::new(-2, 2)), Some(' '));
    }

    #[test]
    fn test_default_canvas_matches_screen_size() {
        let mut canvas = AsciiCanvas::default();
        assert_eq!((canvas.width(), canvas.height()), (160, 120));
        assert!(canvas.poll_events().is_continue());
    }
}
