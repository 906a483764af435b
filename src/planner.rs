// Copyright (c) 2026 The rtplan Authors
//
// SPDX-License-Identifier: BSD-3-Clause

//! The planner base: root/endpoint lifecycle, best-path extraction,
//! path-following kinematics, and the strategy-agnostic `Planner` trait
//! both `RrtStarPlanner` and `FmtStarPlanner` implement.

use std::sync::Arc;

use rand::Rng;

use crate::{
    error::PlannerError,
    geometry::{angle_between, Coord},
    node::{NodeId, Status},
    obstacle::ObstacleMap,
    sampler::Sampler,
    store::NodeStore,
};

/// Scalar configuration, and the derived quantities used throughout.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    /// Edge-length unit / step size.
    pub max_segment: f64,
    pub width: f64,
    pub height: f64,
    /// Selects the sampler mode: pseudo-random uniform vs. deterministic
    /// Halton low-discrepancy.
    pub use_pseudo_random: bool,
}

impl Config {
    /// The square half-side used for neighbor queries: `6 * max_segment`.
    pub fn rewire_neighborhood(&self) -> f64 {
        6.0 * self.max_segment
    }

    /// Bound on per-tick vehicle travel in `follow_path`; equal to
    /// `max_segment` here.
    pub fn max_travel(&self) -> f64 {
        self.max_segment
    }

    /// FMT*'s pre-sampled unvisited node count: `0.02 * width * height`.
    pub fn node_add_threshold(&self) -> usize {
        (0.02 * self.width * self.height).round() as usize
    }
}

/// The substrate shared by both strategies: the node store, sampler,
/// obstacle handle, root/endpoint, and the current best path.
pub struct PlannerCore {
    pub config: Config,
    pub obstacles: Arc<ObstacleMap>,
    pub store: NodeStore,
    pub sampler: Sampler,
    pub root: NodeId,
    pub end_node: NodeId,
    pub best_path: Vec<Coord>,
    /// The coordinate `end_node` is tracking. Persisted so that while
    /// `end_node` remains unconnected (no parent -- most commonly because
    /// it was bound to the root, which can never acquire one), every
    /// subsequent tick keeps retargeting to whichever live node is
    /// currently nearest this point, instead of being stuck with a binding
    /// made back when the tree was too sparse to offer anything better.
    goal: Coord,
    /// Tracks whether the first-solution announcement has already fired, so
    /// it prints once per endpoint rather than on every tick that happens to
    /// keep a path alive.
    announced_solution: bool,
}

impl PlannerCore {
    /// Constructs the shared substrate: seeds a root (optionally at a
    /// caller-supplied `start`, otherwise drawn from the sampler) with the
    /// given initial status (`Closed` for RRT*, `Open` for FMT*), then
    /// draws an endpoint target at least `width / 2` away and binds it to
    /// the nearest tree node -- at this point in construction that's the
    /// root itself, since it's the only node yet. The endpoint is always a
    /// pointer into the tree, never a free-floating node, from the moment
    /// the planner exists; `refresh_best_path` keeps retargeting that
    /// pointer towards `goal` every tick until growth gives it something
    /// other than the (permanently parentless) root to bind to.
    pub fn new(
        obstacles: Arc<ObstacleMap>,
        config: Config,
        start: Option<Coord>,
        root_status: Status,
        rng: &mut impl Rng,
    ) -> Result<Self, PlannerError> {
        let mut sampler = Sampler::new(config.use_pseudo_random, config.width, config.height);

        let start_coord = match start {
            Some(c) => c,
            None => sampler.random_open_area_point(&obstacles, rng)?,
        };

        let mut store = NodeStore::new();
        let root = store.insert_root(start_coord, root_status);

        let min_endpoint_distance = config.width / 2.0;
        let mut endpoint_target = sampler.random_open_area_point(&obstacles, rng)?;
        let mut attempts = 0;
        while start_coord.distance(endpoint_target) < min_endpoint_distance
            && attempts < Sampler::MAX_ATTEMPTS
        {
            endpoint_target = sampler.random_open_area_point(&obstacles, rng)?;
            attempts += 1;
        }

        let end_node = store.nearest(endpoint_target);

        let mut core = PlannerCore {
            config,
            obstacles,
            store,
            sampler,
            root,
            end_node,
            best_path: Vec::new(),
            goal: endpoint_target,
            announced_solution: false,
        };
        core.refresh_best_path();
        Ok(core)
    }

    pub fn root_coord(&self) -> Coord {
        self.store.get(self.root).coord
    }

    pub fn end_coord(&self) -> Coord {
        self.store.get(self.end_node).coord
    }

    pub fn best_path(&self) -> &[Coord] {
        &self.best_path
    }

    /// Persists `new_end` as the tracked goal, rebinds the endpoint to the
    /// tree node nearest it, then recomputes the best path.
    pub fn replan(&mut self, new_end: Coord) {
        self.goal = new_end;
        self.end_node = self.store.nearest(new_end);
        self.announced_solution = false;
        self.refresh_best_path();
    }

    /// Draws a free point and replans to it.
    pub fn random_replan(&mut self, rng: &mut impl Rng) -> Result<(), crate::error::SamplerError> {
        let p = self.sampler.random_open_area_point(&self.obstacles, rng)?;
        self.replan(p);
        Ok(())
    }

    /// Clears the current best path; if the endpoint has a parent, walks
    /// `endpoint -> root` via `parent` and stores the reversed coordinate
    /// sequence. If the endpoint is an unreached node (no parent -- only
    /// possible for the root itself, or an `Unvisited` FMT* pre-sample),
    /// the best path stays empty: an unreached endpoint has no path to
    /// report.
    pub fn refresh_best_path(&mut self) {
        self.best_path.clear();
        if self.store.get(self.end_node).parent.is_none() {
            // Endpoint isn't connected yet -- most commonly because it's
            // still bound to the (permanently parentless) root from a
            // `replan` made back when the tree was too sparse to offer
            // anything better. Retarget to whichever live node is nearest
            // the persisted goal before giving up for this tick.
            self.end_node = self.store.nearest(self.goal);
            if self.store.get(self.end_node).parent.is_none() {
                return;
            }
        }
        let mut path = Vec::new();
        let mut current = Some(self.end_node);
        while let Some(id) = current {
            path.push(self.store.get(id).coord);
            current = self.store.get(id).parent;
        }
        path.reverse();
        self.best_path = path;

        if !self.announced_solution {
            println!("Solution found after {} nodes.", self.store.len());
            self.announced_solution = true;
        }
    }

    /// If the target cell is collision-free, constructs a new `Closed`
    /// node there, re-roots the tree under it (the old root becomes its
    /// child), and rewires any `Closed` neighbor for which the new root
    /// offers a cheaper, collision-free path. A blocked target cell is a
    /// silent no-op: motion that would drive the vehicle into an obstacle
    /// simply doesn't happen.
    pub fn move_start(&mut self, dx: f64, dy: f64) {
        if dx == 0.0 && dy == 0.0 {
            return;
        }

        let old_root_coord = self.root_coord();
        let target = Coord::new(old_root_coord.x + dx, old_root_coord.y + dy)
            .clamped(self.config.width - 1.0, self.config.height - 1.0);

        if self.obstacles.is_blocked(target) {
            return;
        }

        let old_root = self.root;
        let edge = old_root_coord.distance(target);
        let new_root = self.store.insert_root(target, Status::Closed);
        self.store.rewire(old_root, new_root, edge);
        self.root = new_root;

        let neighborhood = self
            .store
            .neighbors_within(target, self.config.rewire_neighborhood());
        for neighbor in neighborhood {
            if neighbor == new_root || neighbor == old_root {
                continue;
            }
            if self.store.get(neighbor).status != Status::Closed {
                continue;
            }
            let neighbor_coord = self.store.get(neighbor).coord;
            let candidate_cost = self.store.get(new_root).cumulative_cost + target.distance(neighbor_coord);
            if candidate_cost < self.store.get(neighbor).cumulative_cost
                && !self.obstacles.line_intersects(target, neighbor_coord)
            {
                let edge = target.distance(neighbor_coord);
                self.store.rewire(neighbor, new_root, edge);
            }
        }

        self.refresh_best_path();
    }

    /// Advances the vehicle along `best_path` by at most `max_travel` total
    /// arc length, projecting the remaining travel budget along successive
    /// path segments before calling `move_start`, then overwrites
    /// `best_path[0]` with the new root coordinate.
    pub fn follow_path(&mut self) {
        if self.best_path.len() < 2 {
            return;
        }

        let mut dx = 0.0;
        let mut dy = 0.0;
        let mut distance_left = self.config.max_travel();
        let mut i = 0;

        while (self.best_path.len() - i) > 1 && distance_left > 1e-6 {
            let current = Coord::new(self.best_path[0].x + dx, self.best_path[0].y + dy);
            let dist = current.distance(self.best_path[i + 1]);
            let travel = dist.min(distance_left);
            let angle = angle_between(self.best_path[i], self.best_path[i + 1]);
            dx += travel * angle.cos();
            dy += travel * angle.sin();
            distance_left -= travel;
            i += 1;
        }

        self.move_start(dx, dy);
        if let Some(first) = self.best_path.first_mut() {
            *first = self.root_coord();
        }
    }

    /// Sum of Euclidean edge lengths of the current best path.
    pub fn calculate_path_cost(&self) -> f64 {
        self.best_path
            .windows(2)
            .map(|pair| pair[0].distance(pair[1]))
            .sum()
    }
}

/// The strategy-agnostic interface a host drives: one tick at a time,
/// rather than a run-to-completion `solve`, which is what an anytime,
/// host-ticked planner needs.
pub trait Planner {
    /// Opaque strategy name (`"ofmtstar"` for FMT*, strategy-specific for
    /// RRT*).
    fn name(&self) -> &'static str;

    fn core(&self) -> &PlannerCore;
    fn core_mut(&mut self) -> &mut PlannerCore;

    /// One growth step: delegates to the active strategy.
    fn sample(&mut self);

    /// FMT*-only; always `false` for RRT*, which has no notion of "done
    /// building" -- it keeps improving for as long as it's ticked.
    fn is_done_building(&self) -> bool {
        false
    }

    fn replan(&mut self, new_end: Coord) {
        self.core_mut().replan(new_end);
    }

    fn random_replan(&mut self, rng: &mut impl Rng) -> Result<(), crate::error::SamplerError>
    where
        Self: Sized,
    {
        self.core_mut().random_replan(rng)
    }

    fn move_start(&mut self, dx: f64, dy: f64) {
        self.core_mut().move_start(dx, dy);
    }

    fn follow_path(&mut self) {
        self.core_mut().follow_path();
    }

    fn calculate_path_cost(&self) -> f64 {
        self.core().calculate_path_cost()
    }

    fn root_coord(&self) -> Coord {
        self.core().root_coord()
    }

    fn end_coord(&self) -> Coord {
        self.core().end_coord()
    }

    fn best_path(&self) -> &[Coord] {
        self.core().best_path()
    }
}
