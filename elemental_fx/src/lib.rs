//! # elemental_fx
//!
//! Gesture-driven particle and lightning effects composited over a live
//! camera feed.  A hand-tracking provider delivers 21 landmarks per hand each
//! frame; the core classifies the hands, integrates per-hand intensity and a
//! global charge, spawns particles and bolts, and rasterizes the result.
//!
//! ## Gesture → Effect mapping
//!
//! | Mode | Hand | Open hand | Pinch |
//! |---|---|---|---|
//! | Fire & Ice | Left | Orange glow, fire particles on joints and bones | Paints fire (after warm-up) |
//! | Fire & Ice | Right | Blue glow, ice particles on joints and bones | Paints ice (after warm-up) |
//! | Lightning | Either | Builds charge; bolts arc from fingertips and bones | — |
//! | Red & Blue | Left / Right | Red / blue glow, particles on joints | Keeps the glow alive |
//!
//! ## Pipeline
//!
//! ```text
//! TrackingFrame ─► gesture ─► hand / charge ─► particle / lightning
//!                                                     │
//!              raster::Canvas ◄── render::FrameCommands ◄┘
//! ```
//!
//! [`Session`] wraps the whole pipeline for a host.

pub mod error;
pub mod config;
pub mod landmarks;
pub mod rng;
pub mod mode;
pub mod gesture;
pub mod hand;
pub mod charge;
pub mod render;
pub mod particle;
pub mod lightning;
pub mod raster;
pub mod frame;
pub mod sim;
pub mod session;
pub mod synthetic;

pub use config::FxConfig;
pub use error::{FxError, Result};
pub use frame::TrackingFrame;
pub use landmarks::{HandRecord, Handedness, Point, Viewport};
pub use mode::PowerMode;
pub use raster::CameraFrame;
pub use session::Session;
pub use sim::Simulation;
