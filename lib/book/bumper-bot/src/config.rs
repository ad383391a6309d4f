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

//! Run configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Unknown policy name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown policy: {0} (expected one of: bumper, random)")]
pub struct UnknownPolicy(pub String);

/// Which exploration policy drives the agent.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PolicyKind {
    /// Turn around obstacles, escape dead ends at random.
    #[default]
    Bumper,

    /// Move in uniformly random directions.
    Random,
}

impl std::str::FromStr for PolicyKind {
    type Err = UnknownPolicy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "bumper" => Ok(PolicyKind::Bumper),
            "random" => Ok(PolicyKind::Random),
            _ => Err(UnknownPolicy(s.to_string())),
        }
    }
}

impl std::fmt::Display for PolicyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PolicyKind::Bumper => write!(f, "bumper"),
            PolicyKind::Random => write!(f, "random"),
        }
    }
}

/// Scalar knobs for a run. None of these affect how the agent decides.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Number of simulation steps to execute.
    pub num_steps: usize,

    /// Show the visualization.
    pub display: bool,

    /// Visualization speed in frames per second.
    pub speed_hz: u32,

    /// Seed for the random escape. Drawn from entropy when absent.
    pub seed: Option<u64>,

    /// Policy driving the agent.
    pub policy: PolicyKind,
}

impl SimulationConfig {
    fn new(
        num_steps: usize,
        display: bool,
        speed_hz: u32,
        seed: Option<u64>,
        policy: PolicyKind,
    ) -> Self {
        Self {
            num_steps,
            display,
            speed_hz,
            seed,
            policy,
        }
    }

    /// Time between two rendered frames. Zero speed means as fast as possible.
    pub fn frame_delay(&self) -> Duration {
        if self.speed_hz == 0 {
            Duration::ZERO
        } else {
            Duration::from_secs(1) / self.speed_hz
        }
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self::new(100, false, 33, None, PolicyKind::Bumper)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SimulationConfig::default();
        assert_eq!(config.num_steps, 100);
        assert!(!config.display);
        assert_eq!(config.speed_hz, 33);
        assert_eq!(config.seed, None);
        assert_eq!(config.policy, PolicyKind::Bumper);
    }

    #[test]
    fn test_frame_delay() {
        let mut config = SimulationConfig::default();
        config.speed_hz = 4;
        assert_eq!(config.frame_delay(), Duration::from_millis(250));
        config.speed_hz = 0;
        assert_eq!(config.frame_delay(), Duration::ZERO);
    }

    #[test]
    fn test_policy_names() {
        assert_eq!("bumper".parse(), Ok(PolicyKind::Bumper));
        assert_eq!("Random".parse(), Ok(PolicyKind::Random));
        assert_eq!(
            "roomba".parse::<PolicyKind>(),
            Err(UnknownPolicy("roomba".to_string()))
        );
        assert_eq!(PolicyKind::Random.to_string(), "random");
    }
}
