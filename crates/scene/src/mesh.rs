use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::f32::consts::{PI, TAU};

/// Index of a mesh in the scene's mesh table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MeshHandle(pub u32);

/// Indexed triangle mesh with per-vertex normals and UVs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MeshData {
    pub name: String,
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub uvs: Vec<[f32; 2]>,
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Axis-aligned bounds as (min, max). Empty meshes report zero bounds.
    pub fn bounds(&self) -> (Vec3, Vec3) {
        if self.positions.is_empty() {
            return (Vec3::ZERO, Vec3::ZERO);
        }
        self.positions.iter().fold(
            (Vec3::splat(f32::INFINITY), Vec3::splat(f32::NEG_INFINITY)),
            |(min, max), p| {
                let p = Vec3::from_array(*p);
                (min.min(p), max.max(p))
            },
        )
    }

    /// Box centred on the origin, subdivided `segments` = (x, y, z) times.
    ///
    /// Each face carries its own vertices so face normals stay sharp.
    pub fn cuboid(name: &str, width: f32, height: f32, depth: f32, segments: [u32; 3]) -> Self {
        let [sx, sy, sz] = segments.map(|s| s.max(1));
        let mut mesh = Self {
            name: name.into(),
            ..Self::default()
        };
        // (u axis, v axis, w axis, u dir, v dir, u size, v size, w size, u segs, v segs)
        let faces = [
            (2, 1, 0, -1.0, -1.0, depth, height, width, sz, sy),
            (2, 1, 0, 1.0, -1.0, depth, height, -width, sz, sy),
            (0, 2, 1, 1.0, 1.0, width, depth, height, sx, sz),
            (0, 2, 1, 1.0, -1.0, width, depth, -height, sx, sz),
            (0, 1, 2, 1.0, -1.0, width, height, depth, sx, sy),
            (0, 1, 2, -1.0, -1.0, width, height, -depth, sx, sy),
        ];
        for (u, v, w, udir, vdir, fw, fh, fd, gx, gy) in faces {
            mesh.push_face(u, v, w, udir, vdir, fw, fh, fd, gx, gy);
        }
        mesh
    }

    #[allow(clippy::too_many_arguments)]
    fn push_face(
        &mut self,
        u: usize,
        v: usize,
        w: usize,
        udir: f32,
        vdir: f32,
        width: f32,
        height: f32,
        depth: f32,
        grid_x: u32,
        grid_y: u32,
    ) {
        let base = self.positions.len() as u32;
        let seg_w = width / grid_x as f32;
        let seg_h = height / grid_y as f32;
        let normal_w = if depth > 0.0 { 1.0 } else { -1.0 };

        for iy in 0..=grid_y {
            let y = iy as f32 * seg_h - height / 2.0;
            for ix in 0..=grid_x {
                let x = ix as f32 * seg_w - width / 2.0;
                let mut p = [0.0; 3];
                p[u] = x * udir;
                p[v] = y * vdir;
                p[w] = depth / 2.0;
                let mut n = [0.0; 3];
                n[w] = normal_w;
                self.positions.push(p);
                self.normals.push(n);
                self.uvs
                    .push([ix as f32 / grid_x as f32, 1.0 - iy as f32 / grid_y as f32]);
            }
        }

        let row = grid_x + 1;
        for iy in 0..grid_y {
            for ix in 0..grid_x {
                let a = base + ix + row * iy;
                let b = base + ix + row * (iy + 1);
                let c = base + ix + 1 + row * (iy + 1);
                let d = base + ix + 1 + row * iy;
                self.indices.extend_from_slice(&[a, b, d, b, c, d]);
            }
        }
    }

    /// Capped cylinder along Y. A zero top radius produces a cone.
    pub fn cylinder(
        name: &str,
        radius_top: f32,
        radius_bottom: f32,
        height: f32,
        radial_segments: u32,
    ) -> Self {
        let segments = radial_segments.max(3);
        let half = height / 2.0;
        let mut mesh = Self {
            name: name.into(),
            ..Self::default()
        };

        // Side wall: two rings, slope-corrected normals.
        let slope = (radius_bottom - radius_top) / height;
        for (ring, (y, radius)) in [(half, radius_top), (-half, radius_bottom)]
            .into_iter()
            .enumerate()
        {
            for i in 0..=segments {
                let u = i as f32 / segments as f32;
                let theta = u * TAU;
                let (sin, cos) = theta.sin_cos();
                mesh.positions.push([radius * sin, y, radius * cos]);
                let n = Vec3::new(sin, slope, cos).normalize();
                mesh.normals.push(n.to_array());
                mesh.uvs.push([u, 1.0 - ring as f32]);
            }
        }
        let row = segments + 1;
        for i in 0..segments {
            let a = i;
            let b = i + row;
            let c = i + 1 + row;
            let d = i + 1;
            mesh.indices.extend_from_slice(&[a, b, d, b, c, d]);
        }

        if radius_top > 0.0 {
            mesh.push_cap(half, radius_top, segments, true);
        }
        if radius_bottom > 0.0 {
            mesh.push_cap(-half, radius_bottom, segments, false);
        }
        mesh
    }

    /// Cone along Y with its base at `-height / 2`.
    pub fn cone(name: &str, radius: f32, height: f32, radial_segments: u32) -> Self {
        Self::cylinder(name, 0.0, radius, height, radial_segments)
    }

    fn push_cap(&mut self, y: f32, radius: f32, segments: u32, top: bool) {
        let sign = if top { 1.0 } else { -1.0 };
        let center = self.positions.len() as u32;
        self.positions.push([0.0, y, 0.0]);
        self.normals.push([0.0, sign, 0.0]);
        self.uvs.push([0.5, 0.5]);
        for i in 0..=segments {
            let theta = i as f32 / segments as f32 * TAU;
            let (sin, cos) = theta.sin_cos();
            self.positions.push([radius * sin, y, radius * cos]);
            self.normals.push([0.0, sign, 0.0]);
            self.uvs.push([cos * 0.5 + 0.5, sin * 0.5 * sign + 0.5]);
        }
        for i in 0..segments {
            let a = center + 1 + i;
            let b = center + 2 + i;
            if top {
                self.indices.extend_from_slice(&[a, b, center]);
            } else {
                self.indices.extend_from_slice(&[b, a, center]);
            }
        }
    }

    /// UV sphere.
    pub fn sphere(name: &str, radius: f32, width_segments: u32, height_segments: u32) -> Self {
        let ws = width_segments.max(3);
        let hs = height_segments.max(2);
        let mut mesh = Self {
            name: name.into(),
            ..Self::default()
        };
        for iy in 0..=hs {
            let v = iy as f32 / hs as f32;
            let phi = v * PI;
            for ix in 0..=ws {
                let u = ix as f32 / ws as f32;
                let theta = u * TAU;
                let n = Vec3::new(
                    -theta.cos() * phi.sin(),
                    phi.cos(),
                    theta.sin() * phi.sin(),
                );
                mesh.positions.push((n * radius).to_array());
                mesh.normals.push(n.to_array());
                mesh.uvs.push([u, 1.0 - v]);
            }
        }
        let row = ws + 1;
        for iy in 0..hs {
            for ix in 0..ws {
                let a = iy * row + ix + 1;
                let b = iy * row + ix;
                let c = (iy + 1) * row + ix;
                let d = (iy + 1) * row + ix + 1;
                if iy != 0 {
                    mesh.indices.extend_from_slice(&[a, b, d]);
                }
                if iy != hs - 1 {
                    mesh.indices.extend_from_slice(&[b, c, d]);
                }
            }
        }
        mesh
    }

    /// Single quad in the XY plane facing +Z.
    pub fn plane(name: &str, width: f32, height: f32) -> Self {
        let (w, h) = (width / 2.0, height / 2.0);
        Self {
            name: name.into(),
            positions: vec![[-w, h, 0.0], [w, h, 0.0], [-w, -h, 0.0], [w, -h, 0.0]],
            normals: vec![[0.0, 0.0, 1.0]; 4],
            uvs: vec![[0.0, 1.0], [1.0, 1.0], [0.0, 0.0], [1.0, 0.0]],
            indices: vec![0, 2, 1, 2, 3, 1],
        }
    }

    /// Rebuild normals by accumulating area-weighted face normals per vertex.
    pub fn compute_vertex_normals(&mut self) {
        let mut acc = vec![Vec3::ZERO; self.positions.len()];
        for tri in self.indices.chunks_exact(3) {
            let [a, b, c] = [tri[0], tri[1], tri[2]].map(|i| i as usize);
            let pa = Vec3::from_array(self.positions[a]);
            let pb = Vec3::from_array(self.positions[b]);
            let pc = Vec3::from_array(self.positions[c]);
            let face = (pc - pb).cross(pa - pb);
            acc[a] += face;
            acc[b] += face;
            acc[c] += face;
        }
        self.normals = acc
            .into_iter()
            .map(|n| n.normalize_or_zero().to_array())
            .collect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_cube_counts() {
        let m = MeshData::cuboid("cube", 1.0, 1.0, 1.0, [1, 1, 1]);
        assert_eq!(m.vertex_count(), 24);
        assert_eq!(m.indices.len(), 36);
        let (min, max) = m.bounds();
        assert_eq!(min, Vec3::splat(-0.5));
        assert_eq!(max, Vec3::splat(0.5));
    }

    #[test]
    fn subdivided_box_counts() {
        let m = MeshData::cuboid("deck", 0.6, 0.05, 2.0, [12, 1, 32]);
        // +-x: 33*2, +-y: 13*33, +-z: 13*2
        assert_eq!(m.vertex_count(), 2 * 66 + 2 * 429 + 2 * 26);
        assert_eq!(m.indices.len(), 2 * 192 + 2 * 2304 + 2 * 72);
    }

    #[test]
    fn cube_normals_point_outward() {
        let m = MeshData::cuboid("cube", 2.0, 2.0, 2.0, [1, 1, 1]);
        for (p, n) in m.positions.iter().zip(&m.normals) {
            let p = Vec3::from_array(*p);
            let n = Vec3::from_array(*n);
            assert!(p.dot(n) > 0.0);
        }
    }

    #[test]
    fn recomputed_normals_match_flat_faces() {
        let mut m = MeshData::cuboid("cube", 1.0, 1.0, 1.0, [1, 1, 1]);
        let original = m.normals.clone();
        m.compute_vertex_normals();
        for (a, b) in original.iter().zip(&m.normals) {
            let d = Vec3::from_array(*a) - Vec3::from_array(*b);
            assert!(d.length() < 1e-5);
        }
    }

    #[test]
    fn cone_has_no_top_cap() {
        let cone = MeshData::cone("hat", 1.0, 0.2, 4);
        let cylinder = MeshData::cylinder("axle", 1.0, 1.0, 0.2, 4);
        assert!(cone.vertex_count() < cylinder.vertex_count());
        let (_, max) = cone.bounds();
        assert!((max.y - 0.1).abs() < 1e-6);
    }

    #[test]
    fn sphere_vertices_on_radius() {
        let s = MeshData::sphere("sun", 15.0, 8, 6);
        for p in &s.positions {
            assert!((Vec3::from_array(*p).length() - 15.0).abs() < 1e-3);
        }
        assert!(s.triangle_count() > 0);
    }

    #[test]
    fn plane_faces_positive_z() {
        let p = MeshData::plane("ground", 100.0, 1000.0);
        assert_eq!(p.triangle_count(), 2);
        let (min, max) = p.bounds();
        assert_eq!(min, Vec3::new(-50.0, -500.0, 0.0));
        assert_eq!(max, Vec3::new(50.0, 500.0, 0.0));
    }

    #[test]
    fn empty_mesh_bounds() {
        assert_eq!(MeshData::default().bounds(), (Vec3::ZERO, Vec3::ZERO));
    }
}
