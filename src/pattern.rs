//! Procedural flag texture.
//!
//! Three horizontal bands with a 24-spoke wheel centred on the middle band.
//! Everything here is a pure function of the texture coordinate so it can be
//! evaluated per pixel by the rasterizer and checked directly in tests.

use crate::color::Rgba;
use std::f64::consts::TAU;

pub const SAFFRON: Rgba = Rgba::rgb(1.0, 0.6, 0.2);
pub const WHITE: Rgba = Rgba::rgb(1.0, 1.0, 1.0);
pub const GREEN: Rgba = Rgba::rgb(0.075, 0.5, 0.075);
pub const NAVY: Rgba = Rgba::rgb(0.0, 0.0, 0.5);

pub const EMBLEM_CENTER: (f64, f64) = (0.5, 0.5);
pub const EMBLEM_RADIUS: f64 = 0.13;
pub const RING_INNER_RADIUS: f64 = 0.115;
pub const HUB_RADIUS: f64 = 0.03;
pub const SPOKE_INNER_RADIUS: f64 = 0.04;
pub const SPOKE_OUTER_RADIUS: f64 = 0.11;
pub const SPOKE_COUNT: u32 = 24;
/// Minimum cosine between a pixel's direction and the nearest spoke axis
pub const SPOKE_COS_TOLERANCE: f64 = 0.95;

/// Which part of the flag a texture coordinate falls in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Region {
    Top,
    Middle,
    Bottom,
    Ring,
    Hub,
    Spoke,
}

impl Region {
    pub fn color(self) -> Rgba {
        match self {
            Region::Top => SAFFRON,
            Region::Middle => WHITE,
            Region::Bottom => GREEN,
            Region::Ring | Region::Hub | Region::Spoke => NAVY,
        }
    }
}

/// Classifies `(u, v)` into a flag region
pub fn region(u: f64, v: f64) -> Region {
    if v > 2.0 / 3.0 {
        return Region::Top;
    }
    if v <= 1.0 / 3.0 {
        return Region::Bottom;
    }

    let dx = u - EMBLEM_CENTER.0;
    let dy = v - EMBLEM_CENTER.1;
    let dist = (dx * dx + dy * dy).sqrt();

    if dist >= EMBLEM_RADIUS {
        Region::Middle
    } else if dist > RING_INNER_RADIUS {
        Region::Ring
    } else if dist < HUB_RADIUS {
        Region::Hub
    } else if dist > SPOKE_INNER_RADIUS
        && dist < SPOKE_OUTER_RADIUS
        && spoke_alignment(dy.atan2(dx)) > SPOKE_COS_TOLERANCE
    {
        Region::Spoke
    } else {
        Region::Middle
    }
}

/// Cosine of the angle between `angle` and the nearest spoke axis
pub fn spoke_alignment(angle: f64) -> f64 {
    let step = TAU / SPOKE_COUNT as f64;
    let nearest = (angle / step).round() * step;
    (angle - nearest).cos().abs()
}

/// Flag color at texture coordinate `(u, v)`
pub fn flag_color(u: f64, v: f64) -> Rgba {
    region(u, v).color()
}
