//! Retroloop - retro-filtered generative loops
//!
//! Captures a procedural loop scene, runs every frame through palette
//! quantization, dithering or ASCII conversion, and exports the result
//! frame-accurately to video, GIF or PNG sequences.
//! This library exposes modules for integration testing.

pub mod api;
pub mod error;
pub mod export;
pub mod models;
pub mod rendering;
pub mod server;
pub mod services;
