// Copyright (c) 2026 The rtplan Authors
//
// SPDX-License-Identifier: BSD-3-Clause

use std::{error, fmt};

/// Errors that can occur while drawing a free point from the sampler.
#[derive(Debug, PartialEq)]
pub enum SamplerError {
    /// The bounded rejection loop did not find a free cell within the
    /// attempt budget. Rather than loop forever against a fully-blocked
    /// workspace, the sampler fails explicitly.
    Exhausted { attempts: u32 },
}

impl fmt::Display for SamplerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exhausted { attempts } => write!(
                f,
                "failed to find a free cell to sample within {attempts} attempts"
            ),
        }
    }
}

impl error::Error for SamplerError {}

/// Errors that can occur constructing a planner.
#[derive(Debug, PartialEq)]
pub enum PlannerError {
    /// No free cell could be found for the root or the endpoint seed.
    NoFreeCell(SamplerError),
}

impl fmt::Display for PlannerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoFreeCell(inner) => write!(f, "could not seed planner: {inner}"),
        }
    }
}

impl error::Error for PlannerError {}

impl From<SamplerError> for PlannerError {
    fn from(e: SamplerError) -> Self {
        PlannerError::NoFreeCell(e)
    }
}
