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

//! Scoring an agent's obstacle map against the truth.

use serde::Serialize;

use crate::grid::Location;
use crate::HashSet;

/// How much of the true obstacle set the agent found.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiscoveryReport {
    /// Inferred obstacles that really are obstacles.
    pub discovered: usize,

    /// Number of true obstacles.
    pub total: usize,

    /// `discovered / total` as a percentage. `None` when there are no true obstacles.
    pub percent: Option<f64>,

    /// Inferred obstacles that do not exist, sorted.
    pub imaginary: Vec<Location>,
}

impl DiscoveryReport {
    /// Compare the obstacles an agent `found` with the `truth`.
    pub fn new(found: &HashSet<Location>, truth: &HashSet<Location>) -> Self {
        let mut imaginary: Vec<Location> = found.difference(truth).copied().collect();
        imaginary.sort_unstable();
        let discovered = found.len() - imaginary.len();
        let total = truth.len();
        let percent = if total == 0 {
            None
        } else {
            Some(discovered as f64 / total as f64 * 100.0)
        };
        Self {
            discovered,
            total,
            percent,
            imaginary,
        }
    }
}

impl std::fmt::Display for DiscoveryReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Obstacles discovered: {}/{}: ", self.discovered, self.total)?;
        match self.percent {
            Some(percent) => write!(f, "{:.2}%", percent)?,
            None => write!(f, "undefined")?,
        }
        if !self.imaginary.is_empty() {
            let imaginary: Vec<String> = self.imaginary.iter().map(|l| l.to_string()).collect();
            writeln!(f)?;
            write!(
                f,
                "Robot has \"discovered\" non-existent obstacles:\n{{{}}}",
                imaginary.join(", ")
            )?;
        }
        Ok(())
    }
}
