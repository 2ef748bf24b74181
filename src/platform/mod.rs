//! Platform boundary
//!
//! Translates raw host events into the simulation's command set. Listener
//! wiring (DOM, winit, terminal) stays with the host.

pub mod input;

pub use input::{CommandBuffer, command_for_key};
