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

//! Where true obstacle sets come from.
//!
//! Maps are plain text, one row per line. `.` and space are free cells, anything else is an
//! obstacle. The map is centred on the origin the same way a bitmap is: character `(col, row)` of
//! a `width` x `height` map lands on `(col - width / 2, height / 2 - row)`.

use crate::grid::Location;
use crate::HashSet;

/// Obstacle map error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum MapError {
    /// The map has no cells.
    #[error("obstacle map is empty")]
    Empty,

    /// The map has more rows or columns than the lattice can centre.
    #[error("obstacle map is too large: {width} x {height}")]
    TooLarge {
        /// Widest row, in characters.
        width: usize,
        /// Number of rows.
        height: usize,
    },
}

/// Parse a text map into the set of obstacle locations.
pub fn parse_obstacle_map(text: &str) -> Result<HashSet<Location>, MapError> {
    let rows: Vec<&str> = text.lines().collect();
    let widest = rows.iter().map(|r| r.chars().count()).max().unwrap_or(0);
    let (width, height) = map_size(widest, rows.len())?;

    // Both indices are below the i32 sizes checked above.
    let mut obstacles = HashSet::default();
    for (row, line) in (0..height).zip(rows.iter()) {
        for (col, c) in (0..width).zip(line.chars()) {
            if c != '.' && c != ' ' {
                obstacles.insert(Location::new(col - width / 2, height / 2 - row));
            }
        }
    }
    Ok(obstacles)
}

fn map_size(width: usize, height: usize) -> Result<(i32, i32), MapError> {
    if width == 0 {
        return Err(MapError::Empty);
    }
    match (i32::try_from(width), i32::try_from(height)) {
        (Ok(w), Ok(h)) => Ok((w, h)),
        _ => Err(MapError::TooLarge { width, height }),
    }
}

/// The four cells around the origin. Nowhere to go.
pub fn boxed() -> HashSet<Location> {
    Location::ORIGIN.neighbors().collect()
}

/// Walls of a square room centred on the origin, `half_size` cells from the centre to each wall.
pub fn room(half_size: i32) -> HashSet<Location> {
    let n = half_size.abs();
    (-n..=n)
        .flat_map(|i| {
            [
                Location::new(i, n),
                Location::new(i, -n),
                Location::new(n, i),
                Location::new(-n, i),
            ]
        })
        .collect()
}
