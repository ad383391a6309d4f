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

//! Geometry of the unbounded integer lattice the bot walks on.
//!
//! Directions follow the compass, clockwise from North: 0 = North, 1 = East, 2 = South,
//! 3 = West. Arithmetic on directions is modulo 4.

use serde::{Deserialize, Serialize};

/// Grid geometry error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum GridError {
    /// Direction value outside 0-3.
    #[error("invalid direction: {0}")]
    InvalidDirection(i32),

    /// The neighbour would lie outside the `i32` lattice.
    #[error("no neighbour {direction} of {location}: off the lattice")]
    OffLattice {
        /// Where the lookup started.
        location: Location,
        /// Direction looked in.
        direction: Direction,
    },
}

/// A cell on the lattice. Coordinates grow to the East (x) and to the North (y).
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Location {
    /// Column, positive to the East.
    pub x: i32,

    /// Row, positive to the North.
    pub y: i32,
}

impl Location {
    /// Where every run starts.
    pub const ORIGIN: Location = Location { x: 0, y: 0 };

    /// Create a location.
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The adjacent cell in `direction`, or `None` past the edge of the `i32` lattice.
    pub fn neighbor(self, direction: Direction) -> Option<Self> {
        match direction {
            Direction::North => self.y.checked_add(1).map(|y| Self::new(self.x, y)),
            Direction::East => self.x.checked_add(1).map(|x| Self::new(x, self.y)),
            Direction::South => self.y.checked_sub(1).map(|y| Self::new(self.x, y)),
            Direction::West => self.x.checked_sub(1).map(|x| Self::new(x, self.y)),
        }
    }

    /// The adjacent cells that exist, in direction order N, E, S, W.
    pub fn neighbors(self) -> impl Iterator<Item = Location> {
        Direction::ALL.into_iter().filter_map(move |d| self.neighbor(d))
    }
}

impl From<(i32, i32)> for Location {
    fn from((x, y): (i32, i32)) -> Self {
        Self::new(x, y)
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// One of the four cardinal directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// 0, towards +y.
    North,

    /// 1, towards +x.
    East,

    /// 2, towards -y.
    South,

    /// 3, towards -x.
    West,
}

impl Direction {
    /// All directions in index order.
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    /// Numeric value of the direction, 0-3.
    pub fn index(self) -> i32 {
        match self {
            Direction::North => 0,
            Direction::East => 1,
            Direction::South => 2,
            Direction::West => 3,
        }
    }

    /// Direction for any integer, taken modulo 4.
    pub fn from_index_wrapping(index: i32) -> Self {
        Self::ALL[index.rem_euclid(4) as usize]
    }

    /// Rotate clockwise by `quarter_turns`. Negative values rotate counter-clockwise.
    pub fn rotate(self, quarter_turns: i32) -> Self {
        Self::from_index_wrapping(self.index() + quarter_turns)
    }

    /// The opposite direction.
    pub fn reverse(self) -> Self {
        self.rotate(2)
    }
}

impl TryFrom<i32> for Direction {
    type Error = GridError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            0..=3 => Ok(Self::ALL[value as usize]),
            _ => Err(GridError::InvalidDirection(value)),
        }
    }
}

impl From<Direction> for i32 {
    fn from(direction: Direction) -> Self {
        direction.index()
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::North => write!(f, "N"),
            Direction::East => write!(f, "E"),
            Direction::South => write!(f, "S"),
            Direction::West => write!(f, "W"),
        }
    }
}

/// The neighbouring location in `direction`. `None` means "do not move" and returns `loc`.
pub fn neighbor(loc: Location, direction: Option<Direction>) -> Result<Location, GridError> {
    match direction {
        Some(direction) => loc.neighbor(direction).ok_or(GridError::OffLattice {
            location: loc,
            direction,
        }),
        None => Ok(loc),
    }
}

/// Like [`neighbor`], for callers that carry directions as raw integers.
pub fn get_neighbor(loc: Location, direction: Option<i32>) -> Result<Location, GridError> {
    let direction = direction.map(Direction::try_from).transpose()?;
    neighbor(loc, direction)
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn any_direction() -> impl Strategy<Value = Direction> {
        prop_oneof![
            Just(Direction::North),
            Just(Direction::East),
            Just(Direction::South),
            Just(Direction::West),
        ]
    }

    #[test]
    fn test_neighbor_offsets() {
        let loc = Location::new(3, -2);
        assert_eq!(get_neighbor(loc, Some(0)), Ok(Location::new(3, -1)));
        assert_eq!(get_neighbor(loc, Some(1)), Ok(Location::new(4, -2)));
        assert_eq!(get_neighbor(loc, Some(2)), Ok(Location::new(3, -3)));
        assert_eq!(get_neighbor(loc, Some(3)), Ok(Location::new(2, -2)));
    }

    #[test]
    fn test_no_movement_returns_same_location() {
        let loc = Location::new(-7, 11);
        assert_eq!(neighbor(loc, None), Ok(loc));
        assert_eq!(get_neighbor(loc, None), Ok(loc));
    }

    #[test]
    fn test_invalid_direction_is_an_error() {
        assert_eq!(
            get_neighbor(Location::ORIGIN, Some(4)),
            Err(GridError::InvalidDirection(4))
        );
        assert_eq!(
            get_neighbor(Location::ORIGIN, Some(-1)),
            Err(GridError::InvalidDirection(-1))
        );
        assert_eq!(Direction::try_from(9), Err(GridError::InvalidDirection(9)));
    }

    #[test]
    fn test_edge_of_lattice_has_no_neighbor() {
        let north_east = Location::new(i32::MAX, i32::MAX);
        assert_eq!(
            get_neighbor(north_east, Some(1)),
            Err(GridError::OffLattice {
                location: north_east,
                direction: Direction::East,
            })
        );
        assert_eq!(north_east.neighbor(Direction::North), None);
        assert_eq!(
            north_east.neighbor(Direction::West),
            Some(Location::new(i32::MAX - 1, i32::MAX))
        );

        let south_west = Location::new(i32::MIN, i32::MIN);
        assert_eq!(south_west.neighbor(Direction::South), None);
        assert_eq!(south_west.neighbor(Direction::West), None);
        assert_eq!(
            south_west.neighbors().collect::<Vec<_>>(),
            vec![
                Location::new(i32::MIN, i32::MIN + 1),
                Location::new(i32::MIN + 1, i32::MIN),
            ]
        );
    }

    #[test]
    fn test_rotation_wraps() {
        assert_eq!(Direction::North.rotate(-1), Direction::West);
        assert_eq!(Direction::West.rotate(1), Direction::North);
        assert_eq!(Direction::East.rotate(4), Direction::East);
        assert_eq!(Direction::South.reverse(), Direction::North);
    }

    #[test]
    fn test_neighbors_in_direction_order() {
        let neighbors: Vec<Location> = Location::ORIGIN.neighbors().collect();
        assert_eq!(
            neighbors,
            vec![
                Location::new(0, 1),
                Location::new(1, 0),
                Location::new(0, -1),
                Location::new(-1, 0),
            ]
        );
    }

    proptest! {
        #[test]
        fn test_move_then_reverse_returns_to_origin(
            x in -10_000..10_000i32,
            y in -10_000..10_000i32,
            direction in any_direction(),
        ) {
            let loc = Location::new(x, y);
            let reverse = (direction.index() + 2) % 4;
            let moved = loc.neighbor(direction).expect("inside the lattice");
            let back = get_neighbor(moved, Some(reverse)).expect("valid direction");
            prop_assert_eq!(back, loc);
        }

        #[test]
        fn test_index_round_trips_through_try_from(index in 0..4i32) {
            let direction = Direction::try_from(index).expect("valid direction");
            prop_assert_eq!(i32::from(direction), index);
        }
    }
}
