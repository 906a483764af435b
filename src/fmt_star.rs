// Copyright (c) 2026 The rtplan Authors
//
// SPDX-License-Identifier: BSD-3-Clause

//! Online FMT*: a lazily-grown wavefront over a fixed pre-sampled
//! point set.

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::sync::Arc;

use rand::Rng;

use crate::{
    error::PlannerError,
    geometry::Coord,
    node::{NodeId, Status},
    obstacle::ObstacleMap,
    planner::{Config, Planner, PlannerCore},
};

/// A frontier entry ordered by ascending cumulative cost. `BinaryHeap` is a
/// max-heap, so `Ord` is implemented reversed (smallest cost compares
/// greatest) to turn it into the min-priority queue FMT*'s wavefront needs.
/// `f64::total_cmp` stands in for the `Ord` plain `f64` doesn't have --
/// costs here are always finite and non-NaN, so total ordering is also the
/// natural numeric one, without pulling in a crate like `ordered-float`.
struct FrontierEntry {
    cost: f64,
    node: NodeId,
}

impl PartialEq for FrontierEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cost.total_cmp(&other.cost) == Ordering::Equal
    }
}

impl Eq for FrontierEntry {}

impl PartialOrd for FrontierEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FrontierEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        other.cost.total_cmp(&self.cost)
    }
}

/// An Online FMT* planner.
///
/// Unlike RRT*, FMT* pre-samples a fixed set of `Unvisited` candidate
/// points once at construction, then spends every subsequent `sample()`
/// tick expanding the wavefront: pop the lowest-cost `Open` node, connect
/// any `Unvisited` neighbors through the best collision-free `Open`
/// neighbor available, mark the popped node `Closed`. `is_done_building`
/// reports true once the frontier empties -- no more `Open` nodes remain
/// to expand from.
pub struct FmtStarPlanner {
    core: PlannerCore,
    frontier: BinaryHeap<FrontierEntry>,
}

impl FmtStarPlanner {
    pub fn new(
        obstacles: Arc<ObstacleMap>,
        config: Config,
        start: Option<Coord>,
        rng: &mut impl Rng,
    ) -> Result<Self, PlannerError> {
        let mut core = PlannerCore::new(obstacles, config, start, Status::Open, rng)?;

        let mut frontier = BinaryHeap::new();
        frontier.push(FrontierEntry {
            cost: 0.0,
            node: core.root,
        });

        for _ in 0..core.config.node_add_threshold() {
            let p = core.sampler.random_open_area_point(&core.obstacles, rng)?;
            core.store.insert_unvisited(p);
        }

        Ok(FmtStarPlanner { core, frontier })
    }

    /// Among `z`'s `Unvisited` neighbors, tries to connect each one through
    /// whichever of its own `Open` neighbors offers the lowest collision-free
    /// cost. Connected nodes become `Open` and join the frontier.
    fn expand_unvisited_neighbors(&mut self, z: NodeId) {
        let z_coord = self.core.store.get(z).coord;
        let radius = self.core.config.rewire_neighborhood();

        let unvisited: Vec<NodeId> = self
            .core
            .store
            .neighbors_within(z_coord, radius)
            .into_iter()
            .filter(|&n| self.core.store.get(n).status == Status::Unvisited)
            .collect();

        for x in unvisited {
            let x_coord = self.core.store.get(x).coord;
            let open_candidates: Vec<NodeId> = self
                .core
                .store
                .neighbors_within(x_coord, radius)
                .into_iter()
                .filter(|&n| self.core.store.get(n).status == Status::Open)
                .collect();

            let mut best: Option<(NodeId, f64)> = None;
            for candidate in open_candidates {
                let candidate_coord = self.core.store.get(candidate).coord;
                if self.core.obstacles.line_intersects(candidate_coord, x_coord) {
                    continue;
                }
                let cost = self.core.store.get(candidate).cumulative_cost + candidate_coord.distance(x_coord);
                if best.map_or(true, |(_, best_cost)| cost < best_cost) {
                    best = Some((candidate, cost));
                }
            }

            if let Some((parent, cost)) = best {
                let edge = self.core.store.get(parent).coord.distance(x_coord);
                self.core.store.rewire(x, parent, edge);
                let node = self.core.store.get_mut(x);
                node.status = Status::Open;
                node.heuristic = cost;
                self.frontier.push(FrontierEntry { cost, node: x });
            }
        }
    }
}

impl Planner for FmtStarPlanner {
    fn name(&self) -> &'static str {
        "ofmtstar"
    }

    fn core(&self) -> &PlannerCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut PlannerCore {
        &mut self.core
    }

    fn is_done_building(&self) -> bool {
        self.frontier.is_empty()
    }

    fn sample(&mut self) {
        let z = loop {
            match self.frontier.pop() {
                None => return,
                Some(entry) if self.core.store.get(entry.node).status == Status::Open => {
                    break entry.node;
                }
                Some(_) => continue,
            }
        };

        self.expand_unvisited_neighbors(z);
        self.core.store.get_mut(z).status = Status::Closed;
        self.core.refresh_best_path();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::obstacle::ObstacleMap;

    fn empty_planner(width: f64, height: f64, root: Coord) -> FmtStarPlanner {
        let obstacles = Arc::new(ObstacleMap::new(
            vec![vec![false; width as usize]; height as usize],
            vec![],
        ));
        let config = Config {
            max_segment: 6.0,
            width,
            height,
            use_pseudo_random: true,
        };
        let mut rng = rand::rng();
        FmtStarPlanner::new(obstacles, config, Some(root), &mut rng).unwrap()
    }

    #[test]
    fn frontier_drains_to_empty_and_stays_done() {
        let mut planner = empty_planner(60.0, 60.0, Coord::new(5.0, 5.0));
        let mut ticks = 0;
        while !planner.is_done_building() && ticks < 100_000 {
            planner.sample();
            ticks += 1;
        }
        assert!(planner.is_done_building());
        // Ticking a fully-drained frontier must be a no-op, not a panic.
        planner.sample();
        assert!(planner.is_done_building());
    }

    #[test]
    fn frontier_never_reopens_a_closed_node() {
        let mut planner = empty_planner(40.0, 40.0, Coord::new(2.0, 2.0));
        let mut closed_ids = std::collections::HashSet::new();
        for _ in 0..2000 {
            if planner.is_done_building() {
                break;
            }
            planner.sample();
            for (id, node) in planner.core().store.iter() {
                if node.status == Status::Closed {
                    closed_ids.insert(id);
                }
            }
        }
        for id in &closed_ids {
            assert_eq!(planner.core().store.get(*id).status, Status::Closed);
        }
    }

    #[test]
    fn reachable_nodes_end_up_closed_with_finite_cost() {
        let mut planner = empty_planner(40.0, 40.0, Coord::new(2.0, 2.0));
        while !planner.is_done_building() {
            planner.sample();
        }
        let mut saw_closed = false;
        for (_, node) in planner.core().store.iter() {
            if node.status == Status::Closed {
                saw_closed = true;
                assert!(node.cumulative_cost.is_finite());
            }
        }
        assert!(saw_closed);
    }

    #[test]
    fn replanning_to_a_closed_node_yields_a_well_formed_path() {
        let mut planner = empty_planner(40.0, 40.0, Coord::new(2.0, 2.0));
        while !planner.is_done_building() {
            planner.sample();
        }
        let target = {
            let (_, node) = planner
                .core()
                .store
                .iter()
                .find(|(_, n)| n.status == Status::Closed && n.parent.is_some())
                .expect("at least one non-root closed node");
            node.coord
        };
        planner.replan(target);
        assert!(!planner.best_path().is_empty());
        assert_eq!(planner.best_path().first().copied(), Some(planner.root_coord()));
        assert_eq!(planner.best_path().last().copied(), Some(planner.end_coord()));
    }
}
