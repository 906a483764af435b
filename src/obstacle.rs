// Copyright (c) 2026 The rtplan Authors
//
// SPDX-License-Identifier: BSD-3-Clause

//! The obstacle oracle: a read-only bitmap plus the rectangles it was
//! rasterized from, and the segment/point collision checks every other
//! module consults.

use crate::geometry::{Coord, Rect};

/// A `height x width` grid of booleans, paired with the rectangles it was
/// built from. Both are read-only to the planner; obstacle *generation*
/// (randomized layouts, padding policy, rendering) stays a host concern.
pub struct ObstacleMap {
    rects: Vec<Rect>,
    bitmap: Vec<Vec<bool>>,
    width: usize,
    height: usize,
}

impl ObstacleMap {
    /// Builds a map directly from a precomputed bitmap and the rectangles it
    /// represents.
    pub fn new(bitmap: Vec<Vec<bool>>, rects: Vec<Rect>) -> Self {
        let height = bitmap.len();
        let width = bitmap.first().map_or(0, |row| row.len());
        ObstacleMap {
            rects,
            bitmap,
            width,
            height,
        }
    }

    /// Convenience constructor for hosts/tests that only have rectangles:
    /// rasterizes each inflated rect into a `height x width` bitmap, marking
    /// a cell `true` iff the integer-rounded pixel lies inside any of them.
    pub fn from_rects(rects: Vec<Rect>, width: usize, height: usize) -> Self {
        let mut bitmap = vec![vec![false; width]; height];
        for rect in &rects {
            let min_x = rect.top_left.x.floor().max(0.0) as usize;
            let max_x = (rect.bottom_right.x.ceil() as isize).clamp(0, width as isize - 1) as usize;
            let min_y = rect.top_left.y.floor().max(0.0) as usize;
            let max_y = (rect.bottom_right.y.ceil() as isize).clamp(0, height as isize - 1) as usize;
            for row in bitmap.iter_mut().take(max_y + 1).skip(min_y) {
                for cell in row.iter_mut().take(max_x + 1).skip(min_x) {
                    *cell = true;
                }
            }
        }
        ObstacleMap {
            rects,
            bitmap,
            width,
            height,
        }
    }

    pub fn rects(&self) -> &[Rect] {
        &self.rects
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Point-in-obstacle test: is the cell under `point` marked blocked?
    /// Points outside the bitmap entirely are treated as blocked, matching
    /// the segment check's "negative coordinate is always blocked" rule.
    pub fn is_blocked(&self, point: Coord) -> bool {
        if point.x < 0.0 || point.y < 0.0 {
            return true;
        }
        let (x, y) = (point.x as usize, point.y as usize);
        if y >= self.height || x >= self.width {
            return true;
        }
        self.bitmap[y][x]
    }

    /// The hot collision check: does the straight segment `p1 -> p2`
    /// cross any obstacle cell?
    ///
    /// Contract, preserved exactly from the original supercover-style sweep:
    /// - Either endpoint with a negative coordinate blocks immediately.
    /// - Zero-extent segments (both axes flat) are clear.
    /// - Otherwise the slope `m = dy/dx` is clamped to `[-20000, 20000]` to
    ///   tolerate vertical segments, and the bitmap is sampled once per
    ///   integer-x cell and once per integer-y cell crossed -- a cheap
    ///   approximation of a supercover rasterizer that guarantees no single-
    ///   pixel obstacle is skipped when `|dx|` and `|dy|` differ wildly.
    pub fn line_intersects(&self, p1: Coord, p2: Coord) -> bool {
        if p1.x < 0.0 || p1.y < 0.0 || p2.x < 0.0 || p2.y < 0.0 {
            return true;
        }

        let dx = p2.x - p1.x;
        let dy = p2.y - p1.y;

        if dx == 0.0 && dy == 0.0 {
            return false;
        }

        // `dx == 0.0` divides to +/-infinity here, which the clamp below folds
        // into the vertical-segment sentinel the same way the original does.
        let m = (dy / dx).clamp(-20000.0, 20000.0);
        let b = -m * p1.x + p1.y;

        if m.abs() != 20000.0 {
            let min_x = p1.x.min(p2.x);
            let max_x = p1.x.max(p2.x);
            let mut ix = min_x.floor() as i64;
            let max_ix = max_x.ceil() as i64;
            while ix <= max_ix {
                let y = m * ix as f64 + b;
                if y > 0.0 && y < self.height as f64 && self.bitmap[y as usize][ix as usize] {
                    return true;
                }
                ix += 1;
            }
        }

        if m != 0.0 {
            let min_y = p1.y.min(p2.y);
            let max_y = p1.y.max(p2.y);
            let mut iy = min_y.floor() as i64;
            let max_iy = max_y.ceil() as i64;
            while iy < max_iy {
                let x = (iy as f64 - b) / m;
                if x > 0.0 && x < self.width as f64 && self.bitmap[iy as usize][x as usize] {
                    return true;
                }
                iy += 1;
            }
        }

        false
    }
}
