// Copyright (c) 2026 The rtplan Authors
//
// SPDX-License-Identifier: BSD-3-Clause

//! The node store, its spatial index, and the `rewire` operation.
//!
//! Nodes live in a single arena (`Vec<Node>`) addressed by `NodeId`: the
//! planner owns the arena, and `parent`/`children` are non-owning
//! references into it, rather than raw pointers or shared ownership.

use std::collections::VecDeque;

use crate::{
    geometry::Coord,
    node::{Node, NodeId, Status},
};

/// Owning container of tree nodes, doubling as the spatial index.
///
/// The index itself is a linear scan over the arena. A kd-tree or R-tree
/// would scale better, but a linear scan is a simple, correct baseline for
/// the node counts this planner deals with.
pub struct NodeStore {
    nodes: Vec<Node>,
}

impl NodeStore {
    pub fn new() -> Self {
        NodeStore { nodes: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub(crate) fn get_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (NodeId(i), n))
    }

    /// Inserts a fresh root (no parent, zero cost). Used both at
    /// construction and by `move_start`'s re-rooting, where the old root is
    /// then `rewire`d underneath the node this returns.
    pub fn insert_root(&mut self, coord: Coord, status: Status) -> NodeId {
        self.nodes.push(Node {
            coord,
            parent: None,
            children: Vec::new(),
            cumulative_cost: 0.0,
            status,
            heuristic: 0.0,
        });
        NodeId(self.nodes.len() - 1)
    }

    /// Inserts a node as an immediate child of `parent`, computing its
    /// cumulative cost from the parent's. Does not check collision -- the
    /// caller must have already verified `parent -> coord` is obstacle-free.
    pub fn insert_child(
        &mut self,
        coord: Coord,
        parent: NodeId,
        edge_cost: f64,
        status: Status,
    ) -> NodeId {
        let cumulative_cost = self.nodes[parent.0].cumulative_cost + edge_cost;
        self.nodes.push(Node {
            coord,
            parent: Some(parent),
            children: Vec::new(),
            cumulative_cost,
            status,
            heuristic: 0.0,
        });
        let id = NodeId(self.nodes.len() - 1);
        self.nodes[parent.0].children.push(id);
        id
    }

    /// Inserts a free-standing `Unvisited` node: an FMT* pre-sample that is
    /// an arena/spatial-index member but not yet part of the rooted tree.
    /// It gets a parent, and joins the tree proper, the first time
    /// `rewire` attaches it to an `Open` neighbor.
    pub fn insert_unvisited(&mut self, coord: Coord) -> NodeId {
        self.nodes.push(Node {
            coord,
            parent: None,
            children: Vec::new(),
            cumulative_cost: f64::INFINITY,
            status: Status::Unvisited,
            heuristic: 0.0,
        });
        NodeId(self.nodes.len() - 1)
    }

    /// The node whose coord is closest to `center`, by Euclidean distance.
    /// Used by `replan` to bind the endpoint into the tree.
    pub fn nearest(&self, center: Coord) -> NodeId {
        let mut best = NodeId(0);
        let mut best_dist = self.nodes[0].coord.distance(center);
        for (i, node) in self.nodes.iter().enumerate().skip(1) {
            let dist = node.coord.distance(center);
            if dist < best_dist {
                best_dist = dist;
                best = NodeId(i);
            }
        }
        best
    }

    /// All nodes whose coord lies inside the axis-aligned square of
    /// half-side `radius` centered on `center`. This is an L-infinity
    /// (square) neighborhood, not a disk -- downstream cost comparisons
    /// implicitly prefer closer neighbors, so the square-vs-circle
    /// mismatch needs no extra distance filtering here.
    pub fn neighbors_within(&self, center: Coord, radius: f64) -> Vec<NodeId> {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, node)| {
                (node.coord.x - center.x).abs() <= radius && (node.coord.y - center.y).abs() <= radius
            })
            .map(|(i, _)| NodeId(i))
            .collect()
    }

    /// Atomically reattaches `node` under `new_parent` with the given edge
    /// cost, then propagates the cost delta to every descendant via an
    /// explicit worklist, never recursion, so long chains don't blow the
    /// stack.
    ///
    /// Never verifies collision; the caller must have already checked
    /// `line_intersects(new_parent.coord, node.coord) == false`.
    pub fn rewire(&mut self, node: NodeId, new_parent: NodeId, new_edge_cost: f64) {
        if let Some(old_parent) = self.nodes[node.0].parent {
            self.nodes[old_parent.0].children.retain(|&c| c != node);
        }
        self.nodes[new_parent.0].children.push(node);
        self.nodes[node.0].parent = Some(new_parent);
        self.nodes[node.0].cumulative_cost = self.nodes[new_parent.0].cumulative_cost + new_edge_cost;

        let mut worklist: VecDeque<NodeId> = self.nodes[node.0].children.iter().copied().collect();
        while let Some(id) = worklist.pop_front() {
            let parent_id = self.nodes[id.0]
                .parent
                .expect("descendant of a tree node always has a parent");
            let parent_cost = self.nodes[parent_id.0].cumulative_cost;
            let parent_coord = self.nodes[parent_id.0].coord;
            let edge = parent_coord.distance(self.nodes[id.0].coord);
            self.nodes[id.0].cumulative_cost = parent_cost + edge;
            worklist.extend(self.nodes[id.0].children.iter().copied());
        }
    }
}

impl Default for NodeStore {
    fn default() -> Self {
        Self::new()
    }
}
