use std::f32::consts::PI;

use glam::Vec3;

use crate::rng::Rng;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Kind {
    /// Indexed triangle surface; carries smooth normals.
    Mesh,
    /// Unordered points; normals are fixed at construction.
    Points,
}

/// One geometric representation of the blob. `base` is captured at
/// construction and never mutated; `positions` always has the same length.
#[derive(Clone, Debug)]
pub struct Geometry {
    pub kind: Kind,
    base: Vec<Vec3>,
    pub positions: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub uvs: Vec<[f32; 2]>,
    pub indices: Vec<u32>,
}

impl Geometry {
    fn from_parts(kind: Kind, base: Vec<Vec3>, normals: Vec<Vec3>, uvs: Vec<[f32; 2]>, indices: Vec<u32>) -> Self {
        Self {
            kind,
            positions: base.clone(),
            base,
            normals,
            uvs,
            indices,
        }
    }

    /// UV sphere with poles on the y axis, laid out as a
    /// `(width_segments + 1) x (height_segments + 1)` vertex grid.
    pub fn polar_sphere(radius: f32, width_segments: usize, height_segments: usize) -> Self {
        let ws = width_segments.max(3);
        let hs = height_segments.max(2);
        let row = ws + 1;

        let mut base = Vec::with_capacity(row * (hs + 1));
        let mut normals = Vec::with_capacity(row * (hs + 1));
        let mut uvs = Vec::with_capacity(row * (hs + 1));
        for iy in 0..=hs {
            let v = iy as f32 / hs as f32;
            let (sin_v, cos_v) = (v * PI).sin_cos();
            for ix in 0..=ws {
                let u = ix as f32 / ws as f32;
                let (sin_u, cos_u) = (u * 2.0 * PI).sin_cos();
                let p = Vec3::new(-radius * cos_u * sin_v, radius * cos_v, radius * sin_u * sin_v);
                base.push(p);
                normals.push(p.normalize_or_zero());
                uvs.push([u, 1.0 - v]);
            }
        }

        let mut indices = Vec::with_capacity(ws * hs * 6);
        for iy in 0..hs {
            for ix in 0..ws {
                let a = (iy * row + ix + 1) as u32;
                let b = (iy * row + ix) as u32;
                let c = ((iy + 1) * row + ix) as u32;
                let d = ((iy + 1) * row + ix + 1) as u32;
                if iy != 0 {
                    indices.extend_from_slice(&[a, b, d]);
                }
                if iy != hs - 1 {
                    indices.extend_from_slice(&[b, c, d]);
                }
            }
        }

        Self::from_parts(Kind::Mesh, base, normals, uvs, indices)
    }

    /// `count` points sampled uniformly on the sphere surface.
    pub fn point_cloud(radius: f32, count: usize, seed: u64) -> Self {
        let mut rng = Rng::new(seed);
        let mut base = Vec::with_capacity(count);
        let mut normals = Vec::with_capacity(count);
        let mut uvs = Vec::with_capacity(count);
        for _ in 0..count {
            let theta = rng.range_f32(0.0, 2.0 * PI);
            let phi = (2.0 * rng.next_f32() - 1.0).clamp(-1.0, 1.0).acos();
            let (sin_phi, cos_phi) = phi.sin_cos();
            let p = Vec3::new(
                radius * sin_phi * theta.cos(),
                radius * sin_phi * theta.sin(),
                radius * cos_phi,
            );
            base.push(p);
            normals.push(p.normalize_or_zero());
            uvs.push([theta / (2.0 * PI), phi / PI]);
        }
        Self::from_parts(Kind::Points, base, normals, uvs, Vec::new())
    }

    pub fn base(&self) -> &[Vec3] {
        &self.base
    }

    /// Base positions alongside the writable buffer they displace into.
    pub fn split_mut(&mut self) -> (&[Vec3], &mut [Vec3]) {
        (&self.base, &mut self.positions)
    }

    pub fn len(&self) -> usize {
        self.base.len()
    }

    pub fn is_empty(&self) -> bool {
        self.base.is_empty()
    }

    /// Smooth normals: area-weighted face normals summed per vertex.
    /// A vertex touched only by degenerate triangles ends up as a zero vector.
    pub fn compute_vertex_normals(&mut self) {
        for n in self.normals.iter_mut() {
            *n = Vec3::ZERO;
        }
        for tri in self.indices.chunks_exact(3) {
            let (a, b, c) = (tri[0] as usize, tri[1] as usize, tri[2] as usize);
            let pa = self.positions[a];
            let pb = self.positions[b];
            let pc = self.positions[c];
            let face = (pc - pb).cross(pa - pb);
            self.normals[a] += face;
            self.normals[b] += face;
            self.normals[c] += face;
        }
        for n in self.normals.iter_mut() {
            *n = n.normalize_or_zero();
        }
    }
}
