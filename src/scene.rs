//! Render-side collaborators: materials, bloom, and the sink that receives
//! geometry every frame. The core only writes to these; it never reads
//! render state back.

use std::rc::Rc;

use glam::Vec3;

use crate::config::Params;
use crate::geometry::Geometry;
use crate::texture::Texture;

/// Physical material of the shaded mesh.
#[derive(Clone, Debug, PartialEq)]
pub struct MeshMaterial {
    pub color: u32,
    pub metalness: f32,
    pub roughness: f32,
    pub transmission: f32,
    pub thickness: f32,
    pub clearcoat: f32,
    pub clearcoat_roughness: f32,
    pub env_map_intensity: f32,
    pub map: Option<Rc<Texture>>,
}

impl MeshMaterial {
    pub fn from_params(p: &Params) -> Self {
        Self {
            color: p.color,
            metalness: p.metalness,
            roughness: p.roughness,
            transmission: p.transmission,
            thickness: p.thickness,
            clearcoat: p.clearcoat,
            clearcoat_roughness: p.clearcoat_roughness,
            env_map_intensity: p.env_map_intensity,
            map: None,
        }
    }

    /// Copy color and coefficients, keeping the current texture map.
    pub fn sync(&mut self, p: &Params) {
        let map = self.map.take();
        *self = Self { map, ..Self::from_params(p) };
    }
}

/// Material of the point cloud.
#[derive(Clone, Debug, PartialEq)]
pub struct PointsMaterial {
    pub color: u32,
    pub size: f32,
    pub opacity: f32,
    pub size_attenuation: bool,
    pub map: Option<Rc<Texture>>,
}

impl PointsMaterial {
    pub fn from_params(p: &Params) -> Self {
        Self {
            color: p.color,
            size: p.point_size,
            opacity: 0.8,
            size_attenuation: true,
            map: None,
        }
    }
}

/// Bloom post-process settings. Only `strength` is driven by parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BloomPass {
    pub strength: f32,
    pub radius: f32,
    pub threshold: f32,
}

impl BloomPass {
    pub fn new(strength: f32) -> Self {
        Self {
            strength,
            radius: 0.4,
            threshold: 0.85,
        }
    }
}

/// Everything the core pushes to the renderer.
pub trait RenderSink {
    fn mesh_material_mut(&mut self) -> &mut MeshMaterial;
    fn points_material_mut(&mut self) -> &mut PointsMaterial;
    fn set_bloom_strength(&mut self, strength: f32);
    fn set_clear_color(&mut self, color: u32);
    fn set_point_mode(&mut self, on: bool);
    fn set_time_uniform(&mut self, t: f32);
    /// Hand both representations over for drawing. `rotation_y` is in radians.
    fn submit(&mut self, mesh: &Geometry, points: &Geometry, rotation_y: f32);
}

/// Summary of the last submitted frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameStats {
    pub vertices: usize,
    pub min_radius: f32,
    pub max_radius: f32,
    pub rotation_y: f32,
}

impl FrameStats {
    fn measure(g: &Geometry, rotation_y: f32) -> Self {
        let (lo, hi) = g
            .positions
            .iter()
            .map(|p: &Vec3| p.length())
            .fold((f32::MAX, 0.0f32), |(lo, hi), r| (lo.min(r), hi.max(r)));
        Self {
            vertices: g.positions.len(),
            min_radius: if g.positions.is_empty() { 0.0 } else { lo },
            max_radius: hi,
            rotation_y,
        }
    }
}

/// Headless scene: records what a renderer would draw.
#[derive(Clone, Debug)]
pub struct Scene {
    pub mesh_material: MeshMaterial,
    pub points_material: PointsMaterial,
    pub bloom: BloomPass,
    pub clear_color: u32,
    pub point_mode: bool,
    pub grain_time: f32,
    pub frames: u64,
    pub last_frame: FrameStats,
    /// Bumped on every material write, like a renderer's needs-update flag.
    pub material_version: u64,
}

impl Scene {
    pub fn new(p: &Params) -> Self {
        Self {
            mesh_material: MeshMaterial::from_params(p),
            points_material: PointsMaterial::from_params(p),
            bloom: BloomPass::new(p.bloom),
            clear_color: p.background_color,
            point_mode: p.point_mode,
            grain_time: 0.0,
            frames: 0,
            last_frame: FrameStats::default(),
            material_version: 0,
        }
    }
}

impl RenderSink for Scene {
    fn mesh_material_mut(&mut self) -> &mut MeshMaterial {
        self.material_version += 1;
        &mut self.mesh_material
    }

    fn points_material_mut(&mut self) -> &mut PointsMaterial {
        self.material_version += 1;
        &mut self.points_material
    }

    fn set_bloom_strength(&mut self, strength: f32) {
        self.bloom.strength = strength;
    }

    fn set_clear_color(&mut self, color: u32) {
        self.clear_color = color;
    }

    fn set_point_mode(&mut self, on: bool) {
        self.point_mode = on;
    }

    fn set_time_uniform(&mut self, t: f32) {
        self.grain_time = t;
    }

    fn submit(&mut self, mesh: &Geometry, points: &Geometry, rotation_y: f32) {
        let active = if self.point_mode { points } else { mesh };
        self.last_frame = FrameStats::measure(active, rotation_y);
        self.frames += 1;
    }
}
