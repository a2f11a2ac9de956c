//! Deck geometry: a subdivided box bent into concave and kicks.

use skatepark_scene::MeshData;

pub const DECK_LENGTH: f32 = 2.0;
pub const DECK_WIDTH: f32 = 0.6;
pub const DECK_THICKNESS: f32 = 0.05;
/// Subdivisions across width, thickness and length.
pub const DECK_SEGMENTS: [u32; 3] = [12, 1, 32];

const CONCAVE_DEPTH: f32 = 0.1;
const KICK_HEIGHT: f32 = 0.15;
/// Fraction of the half-length where nose and tail start to rise.
const KICK_START: f32 = 0.7;

/// Lift across the width: zero on the centreline, `CONCAVE_DEPTH` at the rails.
pub fn concave_offset(x: f32) -> f32 {
    (x / (DECK_WIDTH / 2.0)).powi(2) * CONCAVE_DEPTH
}

/// Lift along the length past the kick start, signed by the end it is on.
pub fn kick_offset(z: f32) -> f32 {
    let relative = z / (DECK_LENGTH / 2.0);
    if relative.abs() > KICK_START {
        let curve = ((relative.abs() - KICK_START) / (1.0 - KICK_START)).powi(2);
        curve * KICK_HEIGHT * z.signum()
    } else {
        0.0
    }
}

/// Build the shaped deck mesh with smooth normals.
pub fn deck_mesh() -> MeshData {
    let mut mesh = MeshData::cuboid(
        "deck",
        DECK_WIDTH,
        DECK_THICKNESS,
        DECK_LENGTH,
        DECK_SEGMENTS,
    );
    for p in &mut mesh.positions {
        p[1] += concave_offset(p[0]) + kick_offset(p[2]);
    }
    mesh.compute_vertex_normals();
    mesh
}
