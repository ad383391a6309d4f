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

#![warn(missing_docs)]

//! Bumper bot: a single agent exploring an unbounded grid world.
//!
//! The agent only senses its own location. It learns where obstacles are by noticing that an
//! attempted move left it where it was, and tries to cover unexplored cells by turning around
//! obstacles, escaping at random when every neighbouring cell has already been explored.

// PEAS - Performance, Environment, Action, Sensing
//
// See:
// -  Chapter 2: Intelligent Agents, page 40

use std::ops::ControlFlow;

use num_traits::Zero;

pub mod config;
pub mod explorer;
pub mod grid;
pub mod grid_world;
pub mod obstacles;
pub mod render;
pub mod report;

pub use grid::{Direction, GridError, Location};

/// Seedable random number generator used wherever the simulation needs randomness.
pub type Rng = rand_pcg::Pcg64;

/// Set type used for every collection of locations.
pub type HashSet<T> = rustc_hash::FxHashSet<T>;

/// An Agent acts in a Performance, Environment, Action, Sensing (PEAS) cycle.
/// For a given Perception, the Agent will return an Action.
///
/// Notice that the Agent is not aware of an Environment, it's only interface
/// is the Perception coming in then the Action going out. Which Agent runs is decided when the
/// simulation is put together, never by loading code at runtime.
pub trait Agent {
    /// What the agent asks the environment to do.
    type Action;

    /// What the agent senses each step.
    type Percept;

    /// Choose the next action.
    fn act(&mut self, percept: &Self::Percept) -> Self::Action;
}

/// An Agent that builds a map of the obstacles it has run into.
pub trait ObstacleMapper {
    /// Every location the agent believes is an obstacle.
    fn obstacles(&self) -> &HashSet<Location>;
}

/// An Environment runs a single Agent in a Performance, Environment, Action, Sensing (PEAS) cycle.
///
/// Notice that the Environment is not aware of an Agent.
pub trait Environment {
    /// Actions the environment knows how to execute.
    type Action;

    /// What the environment exposes to the agent.
    type Percept;

    /// Per-step performance measure.
    type Score: num_traits::NumAssign + Copy;

    /// Current percept for the agent.
    fn percept(&self) -> Self::Percept;

    /// Apply an action chosen by the agent.
    fn execute_action(&mut self, action: &Self::Action);

    /// Returns the score of the Environment. This is not cumulative or stateful. This is the score
    /// of the Environment at the current state.
    fn score(&self) -> Self::Score;

    /// Called once after every step. Returning `Break` stops the simulation before the next step.
    fn tick(&mut self) -> ControlFlow<()> {
        ControlFlow::Continue(())
    }
}

/// A Simulation runs a single Agent in multiple Performance, Environment, Action, Sensing (PEAS)
/// cycles. The Agent's score (Performance) is continually kept up to date.
///
/// The Simulation is aware of both the Environment and the single Agent. Notice that the Agent's
/// generic Action and Percept come from the Environment. The Agent still does not need to know that
/// the Environment exists, but the Agent definitely needs the Environment's Action and Percept
/// types.
pub struct Simulation<_Environment, _Agent>
where
    _Environment: Environment,
    _Agent: Agent<Action = _Environment::Action, Percept = _Environment::Percept>,
{
    environment: _Environment,
    agent: _Agent,
    time_steps: usize,
    score: _Environment::Score,
}

impl<_Environment, _Agent> Simulation<_Environment, _Agent>
where
    _Environment: Environment,
    _Agent: Agent<Action = _Environment::Action, Percept = _Environment::Percept>,
{
    /// Create a simulation that will run for at most `time_steps` steps.
    pub fn new(environment: _Environment, agent: _Agent, time_steps: usize) -> Self {
        Self {
            environment,
            agent,
            time_steps,
            score: _Environment::Score::zero(),
        }
    }

    /// Run the simulation. Returns how many steps were executed, which is fewer than requested
    /// only when the environment asked to stop.
    pub fn run(&mut self) -> usize {
        let mut steps = 0;
        while steps < self.time_steps {
            let percept = self.environment.percept();
            let action = self.agent.act(&percept);
            self.environment.execute_action(&action);
            self.score += self.environment.score();
            steps += 1;
            if self.environment.tick().is_break() {
                break;
            }
        }
        steps
    }

    /// Accumulated score over all steps run so far.
    pub fn score(&self) -> <_Environment as Environment>::Score {
        self.score
    }

    /// The agent being simulated.
    pub fn agent(&self) -> &_Agent {
        &self.agent
    }

    /// The environment being simulated.
    pub fn environment(&self) -> &_Environment {
        &self.environment
    }

    /// Take the environment and agent back out of the simulation.
    pub fn into_parts(self) -> (_Environment, _Agent) {
        (self.environment, self.agent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Walks right along a line; every step scores one point. Stops after `stop_after` ticks.
    struct LineEnvironment {
        position: i32,
        ticks: usize,
        stop_after: Option<usize>,
    }

    struct AlwaysRight;

    impl Agent for AlwaysRight {
        type Action = i32;
        type Percept = i32;

        fn act(&mut self, _percept: &Self::Percept) -> Self::Action {
            1
        }
    }

    impl Environment for LineEnvironment {
        type Action = i32;
        type Percept = i32;
        type Score = usize;

        fn percept(&self) -> Self::Percept {
            self.position
        }

        fn execute_action(&mut self, action: &Self::Action) {
            self.position += action;
        }

        fn score(&self) -> Self::Score {
            1
        }

        fn tick(&mut self) -> ControlFlow<()> {
            self.ticks += 1;
            match self.stop_after {
                Some(limit) if self.ticks >= limit => ControlFlow::Break(()),
                _ => ControlFlow::Continue(()),
            }
        }
    }

    #[test]
    fn test_simulation_runs_all_steps_and_accumulates_score() {
        let environment = LineEnvironment {
            position: 0,
            ticks: 0,
            stop_after: None,
        };
        let mut simulation = Simulation::new(environment, AlwaysRight, 10);
        assert_eq!(simulation.run(), 10);
        assert_eq!(simulation.score(), 10);
        assert_eq!(simulation.environment().position, 10);
    }

    #[test]
    fn test_simulation_stops_between_steps_when_environment_breaks() {
        let environment = LineEnvironment {
            position: 0,
            ticks: 0,
            stop_after: Some(3),
        };
        let mut simulation = Simulation::new(environment, AlwaysRight, 10);
        assert_eq!(simulation.run(), 3);
        let (environment, _agent) = simulation.into_parts();
        assert_eq!(environment.position, 3);
        assert_eq!(environment.ticks, 3);
    }

    #[test]
    fn test_zero_steps_does_nothing() {
        let environment = LineEnvironment {
            position: 0,
            ticks: 0,
            stop_after: None,
        };
        let mut simulation = Simulation::new(environment, AlwaysRight, 0);
        assert_eq!(simulation.run(), 0);
        assert_eq!(simulation.score(), 0);
    }
}
