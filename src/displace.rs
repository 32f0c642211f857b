//! Per-vertex displacement: noise scaling followed by an optional shape modifier.
//!
//! The same function runs over both representations with the same parameters
//! and time, so the mesh and the point cloud stay in step even though they
//! share no vertices.

use glam::Vec3;
use rayon::prelude::*;

use crate::config::{Modifier, Params};
use crate::geometry::{Geometry, Kind};
use crate::noise::Noise3;

/// Scale applied to `rib_freq` inside the sine.
const RIB_FREQ_SCALE: f32 = 5.0;
/// Rib phase speed (radians per second).
const RIB_PHASE_SPEED: f32 = 2.0;
/// How far the top of a droopy blob sags.
const DROOP_SAG: f32 = 0.5;
/// How much a droopy blob widens at the top.
const DROOP_SQUISH: f32 = 0.2;

/// Displacement inputs for one frame. Copied out of [`Params`] so the kernel
/// never holds a borrow on the live parameter record.
#[derive(Clone, Copy, Debug)]
pub struct Displacement {
    pub amplitude: f32,
    pub frequency: f32,
    pub noise_speed: f32,
    pub modifier: Modifier,
    pub rib_amp: f32,
    pub rib_freq: f32,
}

impl From<&Params> for Displacement {
    fn from(p: &Params) -> Self {
        Self {
            amplitude: p.amplitude,
            frequency: p.frequency,
            noise_speed: p.noise_speed,
            modifier: p.modifier,
            rib_amp: p.rib_amp,
            rib_freq: p.rib_freq,
        }
    }
}

/// Quadratic droop weight: 0 at y = -1, 1 at y = +1.
#[inline]
pub fn droop_falloff(y: f32) -> f32 {
    let t = (y + 1.0) * 0.5;
    t * t
}

/// Azimuthal band factor for the ribbed modifier.
#[inline]
pub fn ribbing(y: f32, rib_freq: f32, rib_amp: f32, t: f32) -> f32 {
    (y * rib_freq * RIB_FREQ_SCALE + t * RIB_PHASE_SPEED).sin() * rib_amp
}

/// Apply the modifier to an already noise-scaled position. `base_y` is the
/// undisplaced height, which drives both modifiers.
#[inline]
pub fn apply_modifier(p: Vec3, base_y: f32, d: &Displacement, t: f32) -> Vec3 {
    match d.modifier {
        Modifier::None => p,
        Modifier::Ribbed => {
            let k = 1.0 + ribbing(base_y, d.rib_freq, d.rib_amp, t);
            Vec3::new(p.x * k, p.y, p.z * k)
        }
        Modifier::Droopy => {
            let falloff = droop_falloff(base_y);
            let k = 1.0 + falloff * DROOP_SQUISH;
            Vec3::new(p.x * k, p.y - falloff * DROOP_SAG, p.z * k)
        }
    }
}

/// Displaced position of one base vertex at elapsed time `t`.
#[inline]
pub fn displace_point(base: Vec3, d: &Displacement, noise: &Noise3, t: f32) -> Vec3 {
    let n = noise.sample(
        base.x * d.frequency,
        base.y * d.frequency,
        base.z * d.frequency + t * d.noise_speed,
    );
    let amp = 1.0 + n * d.amplitude;
    apply_modifier(base * amp, base.y, d, t)
}

/// Recompute every position of `geometry` from its base. Meshes also get
/// fresh smooth normals. Full recompute every call; buffer length is fixed.
pub fn displace(geometry: &mut Geometry, d: &Displacement, noise: &Noise3, t: f32) {
    let (base, positions) = geometry.split_mut();
    debug_assert_eq!(positions.len(), base.len());
    positions
        .par_iter_mut()
        .zip(base.par_iter())
        .for_each(|(dst, &src)| *dst = displace_point(src, d, noise, t));
    if geometry.kind == Kind::Mesh {
        geometry.compute_vertex_normals();
    }
}
