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

//! The grid world: ground truth for a bumper bot.
//!
//! The world knows where the obstacles really are and where the agent really is. The agent only
//! ever sees its own location, so the one way it can learn about an obstacle is by failing to move
//! into it.

use std::ops::ControlFlow;

use tracing::{debug, info};

use crate::grid::{Direction, Location};
use crate::render::Renderer;
use crate::report::DiscoveryReport;
use crate::{Agent, Environment, HashSet, ObstacleMapper, Simulation};

/// Unbounded grid with hidden obstacles. The agent starts at the origin.
pub struct GridWorld {
    obstacles: HashSet<Location>,
    agent_location: Location,
    visited: HashSet<Location>,
    entered_new_cell: bool,
    moves: usize,
    bumps: usize,
    renderer: Option<Box<dyn Renderer>>,
}

impl std::fmt::Debug for GridWorld {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GridWorld")
            .field("obstacles", &self.obstacles.len())
            .field("agent_location", &self.agent_location)
            .field("visited", &self.visited.len())
            .field("moves", &self.moves)
            .field("bumps", &self.bumps)
            .field("headless", &self.renderer.is_none())
            .finish()
    }
}

impl GridWorld {
    /// Headless world with the given true obstacles.
    pub fn new(obstacles: HashSet<Location>) -> Self {
        let mut visited = HashSet::default();
        visited.insert(Location::ORIGIN);
        Self {
            obstacles,
            agent_location: Location::ORIGIN,
            visited,
            entered_new_cell: false,
            moves: 0,
            bumps: 0,
            renderer: None,
        }
    }

    /// Attach a renderer. The background is drawn straight away.
    pub fn with_renderer(mut self, mut renderer: Box<dyn Renderer>) -> Self {
        renderer.draw_background(&self.obstacles);
        self.renderer = Some(renderer);
        self
    }

    /// The true obstacles.
    pub fn obstacles(&self) -> &HashSet<Location> {
        &self.obstacles
    }

    /// Where the agent actually is.
    pub fn agent_location(&self) -> Location {
        self.agent_location
    }

    /// Every cell the agent has stood on.
    pub fn visited(&self) -> &HashSet<Location> {
        &self.visited
    }

    /// Successful moves so far.
    pub fn moves(&self) -> usize {
        self.moves
    }

    /// Blocked moves so far.
    pub fn bumps(&self) -> usize {
        self.bumps
    }
}

impl Environment for GridWorld {
    type Action = Direction;
    type Percept = Location;
    type Score = usize;

    fn percept(&self) -> Self::Percept {
        self.agent_location
    }

    fn execute_action(&mut self, action: &Self::Action) {
        let from = self.agent_location;
        match from.neighbor(*action) {
            Some(to) if !self.obstacles.contains(&to) => {
                self.moves += 1;
                self.agent_location = to;
                self.entered_new_cell = self.visited.insert(to);
                if let Some(renderer) = self.renderer.as_mut() {
                    renderer.draw_move(from, to);
                }
            }
            // An obstacle, or the edge of the lattice.
            blocked => {
                debug!(%from, direction = %action, "bump");
                self.bumps += 1;
                self.entered_new_cell = false;
                if let (Some(renderer), Some(at)) = (self.renderer.as_mut(), blocked) {
                    renderer.draw_bump(at);
                }
            }
        }
    }

    /// One point for stepping onto a cell for the first time.
    fn score(&self) -> Self::Score {
        usize::from(self.entered_new_cell)
    }

    fn tick(&mut self) -> ControlFlow<()> {
        match self.renderer.as_mut() {
            Some(renderer) => renderer.poll_events(),
            None => ControlFlow::Continue(()),
        }
    }
}

/// Everything left after a run.
#[derive(Debug)]
pub struct Outcome<_Agent> {
    /// The agent, with whatever it learned.
    pub agent: _Agent,

    /// The world in its final state.
    pub world: GridWorld,

    /// Steps actually executed.
    pub steps: usize,

    /// Cells entered for the first time during the run.
    pub coverage: usize,

    /// How well the agent's obstacle map matches the truth.
    pub report: DiscoveryReport,
}

/// Run `agent` in `world` for up to `num_steps` steps and score what it found.
pub fn simulate<_Agent>(agent: _Agent, world: GridWorld, num_steps: usize) -> Outcome<_Agent>
where
    _Agent: Agent<Action = Direction, Percept = Location> + ObstacleMapper,
{
    let mut simulation = Simulation::new(world, agent, num_steps);
    let steps = simulation.run();
    let coverage = simulation.score();
    let (world, agent) = simulation.into_parts();
    let report = DiscoveryReport::new(agent.obstacles(), world.obstacles());
    info!(
        steps,
        coverage,
        moves = world.moves(),
        bumps = world.bumps(),
        discovered = report.discovered,
        total = report.total,
        "simulation finished"
    );
    Outcome {
        agent,
        world,
        steps,
        coverage,
        report,
    }
}
