// Copyright (c) 2026 The rtplan Authors
//
// SPDX-License-Identifier: BSD-3-Clause

//! An online, anytime sampling-based motion-planner core.
//!
//! This crate provides the shared substrate (geometry, an obstacle oracle,
//! a sampler, a node store with spatial index and rewiring) plus two
//! interchangeable growth strategies built on top of it: incremental RRT*
//! ([`rrt_star::RrtStarPlanner`]) and Online FMT*
//! ([`fmt_star::FmtStarPlanner`]). Both implement the [`planner::Planner`]
//! trait, so a host can drive either one tick at a time, move the vehicle,
//! and replan to a new endpoint without caring which strategy is active.

pub mod error;
pub mod fmt_star;
pub mod geometry;
pub mod node;
pub mod obstacle;
pub mod planner;
pub mod rrt_star;
pub mod sampler;
pub mod store;

pub use error::{PlannerError, SamplerError};
pub use fmt_star::FmtStarPlanner;
pub use geometry::{angle_between, Coord, Rect};
pub use node::{Node, NodeId, Status};
pub use obstacle::ObstacleMap;
pub use planner::{Config, Planner, PlannerCore};
pub use rrt_star::RrtStarPlanner;
pub use sampler::Sampler;
pub use store::NodeStore;
