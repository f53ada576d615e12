//! Flappy-style arcade games with a pluggable jump-decision AI.
//!
//! The core is a fixed-timestep simulation ([`game`]) shared by three
//! binaries: a single-player arcade game, a human-vs-AI duel, and a
//! gameplay recorder that dumps per-frame feature rows for offline
//! training. The AI side ([`policy`], [`model`]) decides jump/no-jump
//! each frame, either from a simple gap-center heuristic or from a
//! trained classifier behind a feature scaler.

pub mod audio;
pub mod config;
pub mod game;
pub mod input;
pub mod model;
pub mod policy;
pub mod recorder;
pub mod ui;
