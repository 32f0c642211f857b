use tracing::debug;

use crate::config::{Params, SceneConfig};
use crate::displace::{Displacement, displace};
use crate::geometry::Geometry;
use crate::noise::Noise3;
use crate::scene::RenderSink;

/// Salt separating the point sampler's stream from the noise table's.
const SALT_POINTS: u64 = 0x9017_C10D_5EED_0001;

/// The two synchronized representations plus their animation clock.
pub struct Blob {
    pub mesh: Geometry,
    pub points: Geometry,
    noise: Noise3,
    elapsed: f32,
    rotation_y: f32,
}

impl Blob {
    pub fn new(config: &SceneConfig) -> Self {
        Self {
            mesh: Geometry::polar_sphere(config.radius, config.width_segments, config.height_segments),
            points: Geometry::point_cloud(config.radius, config.point_count, config.seed ^ SALT_POINTS),
            noise: Noise3::new(config.seed),
            elapsed: 0.0,
            rotation_y: 0.0,
        }
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn rotation_y(&self) -> f32 {
        self.rotation_y
    }

    /// One animation frame. Displacement runs on absolute elapsed time;
    /// only rotation integrates `dt`.
    pub fn tick(&mut self, dt: f32, params: &Params, sink: &mut dyn RenderSink) {
        self.elapsed += dt;
        let t = self.elapsed;
        let d = Displacement::from(params);

        displace(&mut self.mesh, &d, &self.noise, t);
        displace(&mut self.points, &d, &self.noise, t);

        sink.set_time_uniform(t);
        self.rotation_y += params.rotation_speed * dt;
        debug!(t, rotation = self.rotation_y, "frame");
        sink.submit(&self.mesh, &self.points, self.rotation_y);
    }
}
