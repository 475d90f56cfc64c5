//! Steering behaviours for agents on a toroidal 2D grid.
//!
//! Behaviours turn an agent's position and velocity into a steering force;
//! the [`world::World`] integrates those forces and wraps agents around the
//! edges of the grid.

pub mod config;
pub mod debug;
pub mod math;
pub mod movement;
pub mod world;
