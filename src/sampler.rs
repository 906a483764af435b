// Copyright (c) 2026 The rtplan Authors
//
// SPDX-License-Identifier: BSD-3-Clause

//! The sampler: either uniform pseudo-random draws or a deterministic
//! low-discrepancy Halton stream, both restricted to obstacle-free cells.

use rand::Rng;

use crate::{error::SamplerError, geometry::Coord, obstacle::ObstacleMap};

/// Computes the `index`-th term of the van der Corput / Halton sequence in
/// the given prime `base`. `halton(1, b) == 1.0 / b`, so the first three
/// samples in base 19 are exactly `1/19`, `2/19`, `3/19`.
fn halton(mut index: u64, base: u64) -> f64 {
    let mut result = 0.0;
    let mut fraction = 1.0 / base as f64;
    while index > 0 {
        result += fraction * (index % base) as f64;
        index /= base;
        fraction /= base as f64;
    }
    result
}

enum Mode {
    PseudoRandom,
    /// Two independent Halton sequences, base 19 for x and base 31 for y.
    Halton { x_index: u64, y_index: u64 },
}

/// A sampler restricted to the `[0, width) x [0, height)` workspace.
pub struct Sampler {
    mode: Mode,
    width: f64,
    height: f64,
}

impl Sampler {
    /// The rejection loop's attempt budget before giving up with
    /// `SamplerError::Exhausted`.
    pub const MAX_ATTEMPTS: u32 = 10_000;

    pub fn new(use_pseudo_random: bool, width: f64, height: f64) -> Self {
        let mode = if use_pseudo_random {
            Mode::PseudoRandom
        } else {
            Mode::Halton {
                x_index: 0,
                y_index: 0,
            }
        };
        Sampler {
            mode,
            width,
            height,
        }
    }

    /// Draws one raw `(x, y)` candidate, without rejection. In Halton mode
    /// this always advances both sequences' indices by one, even when the
    /// caller is about to reject the result -- rejection does not consume a
    /// "retry slot" differently per mode.
    fn draw_raw(&mut self, rng: &mut impl Rng) -> Coord {
        match &mut self.mode {
            Mode::PseudoRandom => Coord::new(
                rng.random_range(0.0..self.width),
                rng.random_range(0.0..self.height),
            ),
            Mode::Halton { x_index, y_index } => {
                *x_index += 1;
                *y_index += 1;
                Coord::new(
                    halton(*x_index, 19) * self.width,
                    halton(*y_index, 31) * self.height,
                )
            }
        }
    }

    /// Draws points until one lands in a free cell, or gives up after
    /// `MAX_ATTEMPTS` rejections.
    pub fn random_open_area_point(
        &mut self,
        obstacles: &ObstacleMap,
        rng: &mut impl Rng,
    ) -> Result<Coord, SamplerError> {
        for attempt in 0..Self::MAX_ATTEMPTS {
            let candidate = self.draw_raw(rng);
            if !obstacles.is_blocked(candidate) {
                return Ok(candidate);
            }
            let _ = attempt;
        }
        Err(SamplerError::Exhausted {
            attempts: Self::MAX_ATTEMPTS,
        })
    }
}
