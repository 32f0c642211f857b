use crate::rng::Rng;

#[inline]
fn smootherstep(t: f32) -> f32 {
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}

#[inline]
fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

#[inline]
fn grad(hash: u8, dx: f32, dy: f32, dz: f32) -> f32 {
    // 12 cube-edge gradients; 12..15 repeat a subset so the table stays a power of two.
    match hash & 15 {
        0 => dx + dy,
        1 => -dx + dy,
        2 => dx - dy,
        3 => -dx - dy,
        4 => dx + dz,
        5 => -dx + dz,
        6 => dx - dz,
        7 => -dx - dz,
        8 => dy + dz,
        9 => -dy + dz,
        10 => dy - dz,
        11 => -dy - dz,
        12 => dx + dy,
        13 => -dy + dz,
        14 => -dx + dy,
        _ => -dy - dz,
    }
}

/// Lattice cell (wrapped to the table period) and the offset inside it.
/// Non-finite coordinates collapse to the cell origin.
#[inline]
fn lattice(v: f32) -> (i32, f32) {
    let floor = v.floor();
    let frac = v - floor;
    if !frac.is_finite() {
        return (0, 0.0);
    }
    (floor.rem_euclid(256.0) as i32, frac)
}

/// 3D gradient noise (Perlin-style) over a permutation table shuffled once
/// from the seed. `sample` is pure: same input, same output.
#[derive(Clone)]
pub struct Noise3 {
    perm: [u8; 512],
}

impl Noise3 {
    pub fn new(seed: u64) -> Self {
        let mut table: [u8; 256] = std::array::from_fn(|i| i as u8);
        Rng::new(seed).shuffle(&mut table);
        let mut perm = [0u8; 512];
        for (i, p) in perm.iter_mut().enumerate() {
            *p = table[i & 255];
        }
        Self { perm }
    }

    #[inline]
    fn hash(&self, ix: i32, iy: i32, iz: i32) -> u8 {
        let p = &self.perm;
        let a = p[(ix & 255) as usize] as usize;
        let b = p[a + (iy & 255) as usize] as usize;
        p[b + (iz & 255) as usize]
    }

    /// Scalar in approximately [-1, 1]. Zero on every integer lattice point.
    #[inline]
    pub fn sample(&self, x: f32, y: f32, z: f32) -> f32 {
        let (ix, fx) = lattice(x);
        let (iy, fy) = lattice(y);
        let (iz, fz) = lattice(z);
        let sx = smootherstep(fx);
        let sy = smootherstep(fy);
        let sz = smootherstep(fz);

        let v000 = grad(self.hash(ix, iy, iz), fx, fy, fz);
        let v100 = grad(self.hash(ix + 1, iy, iz), fx - 1.0, fy, fz);
        let v010 = grad(self.hash(ix, iy + 1, iz), fx, fy - 1.0, fz);
        let v110 = grad(self.hash(ix + 1, iy + 1, iz), fx - 1.0, fy - 1.0, fz);
        let v001 = grad(self.hash(ix, iy, iz + 1), fx, fy, fz - 1.0);
        let v101 = grad(self.hash(ix + 1, iy, iz + 1), fx - 1.0, fy, fz - 1.0);
        let v011 = grad(self.hash(ix, iy + 1, iz + 1), fx, fy - 1.0, fz - 1.0);
        let v111 = grad(self.hash(ix + 1, iy + 1, iz + 1), fx - 1.0, fy - 1.0, fz - 1.0);

        let x00 = lerp(v000, v100, sx);
        let x10 = lerp(v010, v110, sx);
        let x01 = lerp(v001, v101, sx);
        let x11 = lerp(v011, v111, sx);
        let y0 = lerp(x00, x10, sy);
        let y1 = lerp(x01, x11, sy);
        lerp(y0, y1, sz)
    }
}

impl Default for Noise3 {
    fn default() -> Self {
        Self::new(0)
    }
}
