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

//! Exploration policies.
//!
//! [`BumperBot`] mimics a robot vacuum: it keeps turning around obstacles it bumps into, prefers
//! cells it has not explored yet, and picks a random direction when everything around it has
//! already been explored. [`RandomWalker`] is the baseline it is compared against.

use rand::SeedableRng;
use tracing::debug;

use crate::grid::{Direction, Location};
use crate::{Agent, HashSet, ObstacleMapper, Rng};

/// Headings tried in order, relative to the current heading: right, around, straight, left.
/// The final `+4` repeats `+0` and can never be the first unexplored match.
const FRONTIER_SCAN: [i32; 5] = [1, 2, 0, 3, 4];

/// Source of directions for the random escape.
pub trait DirectionProvider {
    /// Draw the next direction.
    fn next_direction(&mut self) -> Direction;
}

/// Uniformly random directions drawn from `R`.
#[derive(Debug, Clone)]
pub struct RandomDirections<R> {
    rng: R,
}

impl<R: rand::Rng> RandomDirections<R> {
    /// Draw directions from `rng`.
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl RandomDirections<Rng> {
    /// Reproducible directions from a seed.
    pub fn seeded(seed: u64) -> Self {
        Self::new(Rng::seed_from_u64(seed))
    }
}

impl<R: rand::Rng> DirectionProvider for RandomDirections<R> {
    fn next_direction(&mut self) -> Direction {
        Direction::ALL[self.rng.gen_range(0..Direction::ALL.len())]
    }
}

/// Replays a fixed sequence of directions, starting over when it runs out.
#[derive(Debug, Clone)]
pub struct ScriptedDirections {
    script: Vec<Direction>,
    next: usize,
}

impl ScriptedDirections {
    /// Replay `script`. An empty script always yields North.
    pub fn new(script: Vec<Direction>) -> Self {
        Self { script, next: 0 }
    }
}

impl DirectionProvider for ScriptedDirections {
    fn next_direction(&mut self) -> Direction {
        if self.script.is_empty() {
            return Direction::North;
        }
        let direction = self.script[self.next % self.script.len()];
        self.next += 1;
        direction
    }
}

/// Rotate-around-obstacle explorer with a random escape for dead ends.
///
/// The bot only ever perceives its own location. If it is still where it was on the previous
/// step, the move it attempted was blocked and the cell in that direction is recorded as an
/// obstacle.
#[derive(Debug, Clone)]
pub struct BumperBot<P = RandomDirections<Rng>> {
    explored: HashSet<Location>,
    obstacles: HashSet<Location>,
    last_location: Option<Location>,
    heading: Direction,
    directions: P,
    escapes: usize,
}

impl BumperBot<RandomDirections<Rng>> {
    /// Bot with a reproducible random escape.
    pub fn seeded(seed: u64) -> Self {
        Self::new(RandomDirections::seeded(seed))
    }
}

impl<P: DirectionProvider> BumperBot<P> {
    /// Fresh bot heading North with nothing explored.
    pub fn new(directions: P) -> Self {
        Self {
            explored: HashSet::default(),
            obstacles: HashSet::default(),
            last_location: None,
            heading: Direction::North,
            directions,
            escapes: 0,
        }
    }

    /// Start with a different heading.
    pub fn with_heading(mut self, heading: Direction) -> Self {
        self.heading = heading;
        self
    }

    /// Every cell visited or inferred to be an obstacle.
    pub fn explored(&self) -> &HashSet<Location> {
        &self.explored
    }

    /// Current heading.
    pub fn heading(&self) -> Direction {
        self.heading
    }

    /// Location seen on the previous step.
    pub fn last_location(&self) -> Option<Location> {
        self.last_location
    }

    /// How many times the random escape fired.
    pub fn escapes(&self) -> usize {
        self.escapes
    }

    /// Cells past the edge of the lattice count as explored.
    fn is_explored(&self, loc: Location, direction: Direction) -> bool {
        loc.neighbor(direction)
            .map_or(true, |neighbor| self.explored.contains(&neighbor))
    }

    /// First heading in scan order whose neighbour is unexplored.
    fn frontier_direction(&self, loc: Location) -> Option<Direction> {
        FRONTIER_SCAN
            .iter()
            .map(|turn| self.heading.rotate(*turn))
            .find(|direction| !self.is_explored(loc, *direction))
    }

    fn explored_neighbors(&self, loc: Location) -> usize {
        Direction::ALL
            .into_iter()
            .filter(|direction| self.is_explored(loc, *direction))
            .count()
    }
}

impl<P: DirectionProvider> Agent for BumperBot<P> {
    type Action = Direction;
    type Percept = Location;

    fn act(&mut self, percept: &Self::Percept) -> Self::Action {
        let loc = *percept;
        self.explored.insert(loc);

        let mut next_action = None;
        if self.last_location == Some(loc) {
            // A blocked move off the edge of the lattice is not an obstacle.
            if let Some(obstacle) = loc.neighbor(self.heading) {
                if self.obstacles.insert(obstacle) {
                    debug!(%obstacle, "inferred obstacle");
                }
                self.explored.insert(obstacle);
            }

            self.heading = self.heading.rotate(-1);
            next_action = Some(self.heading);
        }

        if let Some(direction) = self.frontier_direction(loc) {
            self.heading = direction;
            next_action = Some(direction);
        }

        if self.explored_neighbors(loc) > 3 {
            let direction = self.directions.next_direction();
            debug!(%loc, %direction, "surrounded by explored cells, escaping");
            self.escapes += 1;
            self.heading = direction;
            next_action = Some(direction);
        }

        self.last_location = Some(loc);

        // The scan looks at all four neighbours, so it only comes up empty when all four are
        // explored, in which case the escape has already chosen.
        next_action.unwrap_or(self.heading)
    }
}

impl<P> ObstacleMapper for BumperBot<P> {
    fn obstacles(&self) -> &HashSet<Location> {
        &self.obstacles
    }
}

/// Walks in uniformly random directions, recording an obstacle whenever a move fails.
#[derive(Debug, Clone)]
pub struct RandomWalker<P = RandomDirections<Rng>> {
    obstacles: HashSet<Location>,
    last_location: Option<Location>,
    last_direction: Option<Direction>,
    directions: P,
}

impl RandomWalker<RandomDirections<Rng>> {
    /// Walker with a reproducible sequence of moves.
    pub fn seeded(seed: u64) -> Self {
        Self::new(RandomDirections::seeded(seed))
    }
}

impl<P: DirectionProvider> RandomWalker<P> {
    /// Fresh walker.
    pub fn new(directions: P) -> Self {
        Self {
            obstacles: HashSet::default(),
            last_location: None,
            last_direction: None,
            directions,
        }
    }
}

impl<P: DirectionProvider> Agent for RandomWalker<P> {
    type Action = Direction;
    type Percept = Location;

    fn act(&mut self, percept: &Self::Percept) -> Self::Action {
        let loc = *percept;
        if let (Some(last), Some(direction)) = (self.last_location, self.last_direction) {
            if last == loc {
                self.obstacles.extend(loc.neighbor(direction));
            }
        }
        let direction = self.directions.next_direction();
        self.last_location = Some(loc);
        self.last_direction = Some(direction);
        direction
    }
}

impl<P> ObstacleMapper for RandomWalker<P> {
    fn obstacles(&self) -> &HashSet<Location> {
        &self.obstacles
    }
}
