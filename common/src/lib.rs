//! Common utilities for the drill applications
//!
//! This crate provides shared graphics setup, the orbit camera, and the vertex
//! types used by the apparatus renderer.

pub mod graphics;
pub mod camera;

pub use graphics::*;
pub use camera::*;
