//! A waving flag on a pole, rendered in software and drawn to the terminal.
//!
//! [`renderer::SceneRenderer`] owns the whole scene and is driven one frame at
//! a time; [`widget::FlagWidget`] maps terminal input onto its commands and
//! [`terminal::TerminalHost`] puts the result on screen.

pub mod camera;
pub mod clock;
pub mod color;
pub mod config;
pub mod controls;
pub mod easing;
pub mod error;
pub mod graphics;
pub mod hoist;
pub mod lighting;
pub mod math;
pub mod mesh;
pub mod pattern;
pub mod renderer;
pub mod scene;
pub mod shadow;
pub mod state;
pub mod terminal;
pub mod tween;
pub mod vertex;
pub mod wave;
pub mod widget;

pub use config::{Args, Settings};
pub use error::{Error, Result};
pub use hoist::HoistState;
pub use renderer::{SceneRenderer, Viewport};
