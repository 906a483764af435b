// Copyright (c) 2026 The rtplan Authors
//
// SPDX-License-Identifier: BSD-3-Clause

//! The tree vertex (part of C4/C5's data model): a node's state, its place
//! in the parent/child tree, and its FMT* wavefront tag.

use crate::geometry::Coord;

/// A stable, non-owning reference into a `NodeStore`'s arena. Indices are
/// never reused or invalidated -- nodes are appended and never freed for
/// the planner's lifetime.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub(crate) usize);

/// FMT* wavefront tag. RRT* only ever uses `Closed` (every live RRT* node is
/// treated as finalized; there is no frontier to be `Open` on).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Status {
    Unvisited,
    Open,
    Closed,
}

/// A tree vertex.
#[derive(Clone, Debug)]
pub struct Node {
    pub coord: Coord,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    /// Sum of edge costs from the root to this node along `parent` links.
    /// `0.0` at the root; `parent.cumulative_cost + edge_cost(parent, self)`
    /// everywhere else.
    pub cumulative_cost: f64,
    pub status: Status,
    /// FMT* frontier priority; set to `cumulative_cost` at the moment of
    /// insertion into the frontier. Unused (left at `0.0`) by RRT*.
    pub heuristic: f64,
}
