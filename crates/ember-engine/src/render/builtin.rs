//! Built-in shader programs and quad geometry.
//!
//! World quads live in `[0, 1]²` design units and are scaled by the model
//! matrix. Fullscreen quads are in NDC. Texture coordinates have `v = 0` at
//! the top row.

use super::{ShaderSource, Vertex};

/// Declarations shared by every shader: `Globals`, `t_main`, `s_main`,
/// `VertexInput`, `VertexOutput`.
pub const PRELUDE: &str = include_str!("shaders/prelude.wgsl");

/// Vertex stage applying `projection * view * model`.
pub const WORLD_VERTEX: &str = include_str!("shaders/world.vert.wgsl");

/// Pass-through vertex stage for NDC geometry.
pub const FULLSCREEN_VERTEX: &str = include_str!("shaders/fullscreen.vert.wgsl");

pub fn sprite() -> ShaderSource {
    ShaderSource::new("ember sprite", WORLD_VERTEX, include_str!("shaders/sprite.frag.wgsl"))
}

pub fn text() -> ShaderSource {
    ShaderSource::new("ember text", WORLD_VERTEX, include_str!("shaders/text.frag.wgsl"))
}

pub fn blit() -> ShaderSource {
    ShaderSource::new("ember blit", FULLSCREEN_VERTEX, include_str!("shaders/blit.frag.wgsl"))
}

pub fn crt() -> ShaderSource {
    ShaderSource::new("ember crt", FULLSCREEN_VERTEX, include_str!("shaders/crt.frag.wgsl"))
}

pub fn chromatic() -> ShaderSource {
    ShaderSource::new(
        "ember chromatic",
        FULLSCREEN_VERTEX,
        include_str!("shaders/chromatic.frag.wgsl"),
    )
}

pub fn speed_lines() -> ShaderSource {
    ShaderSource::new(
        "ember speed lines",
        FULLSCREEN_VERTEX,
        include_str!("shaders/speed_lines.frag.wgsl"),
    )
}

/// Unit quad with optionally mirrored texture coordinates.
pub fn unit_quad(flip_x: bool, flip_y: bool) -> [Vertex; 6] {
    let v = |x: f32, y: f32| {
        let u = if flip_x { 1.0 - x } else { x };
        let w = if flip_y { 1.0 - y } else { y };
        Vertex::new(x, y, u, w)
    };

    [
        v(1.0, 1.0),
        v(1.0, 0.0),
        v(0.0, 1.0),
        v(1.0, 0.0),
        v(0.0, 0.0),
        v(0.0, 1.0),
    ]
}

/// Quad covering the whole render target.
pub fn fullscreen_quad() -> [Vertex; 6] {
    let v = |x: f32, y: f32| Vertex::new(x, y, (x + 1.0) / 2.0, (1.0 - y) / 2.0);

    [
        v(1.0, 1.0),
        v(1.0, -1.0),
        v(-1.0, 1.0),
        v(1.0, -1.0),
        v(-1.0, -1.0),
        v(-1.0, 1.0),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_quad_uv_matches_position() {
        for vert in unit_quad(false, false) {
            assert_eq!(vert.uv, [vert.pos[0], vert.pos[1]]);
        }
    }

    #[test]
    fn flipped_quad_mirrors_u_only() {
        for vert in unit_quad(true, false) {
            assert_eq!(vert.uv, [1.0 - vert.pos[0], vert.pos[1]]);
        }
    }

    #[test]
    fn fullscreen_quad_maps_top_left_to_uv_origin() {
        let quad = fullscreen_quad();
        let top_left = quad.iter().find(|v| v.pos[0] == -1.0 && v.pos[1] == 1.0).unwrap();
        assert_eq!(top_left.uv, [0.0, 0.0]);
        let bottom_right = quad.iter().find(|v| v.pos[0] == 1.0 && v.pos[1] == -1.0).unwrap();
        assert_eq!(bottom_right.uv, [1.0, 1.0]);
    }

    #[test]
    fn sources_define_entry_points() {
        for src in [sprite(), text(), blit(), crt(), chromatic(), speed_lines()] {
            assert!(src.vertex.contains("fn vs_main"), "{}", src.label);
            assert!(src.fragment.contains("fn fs_main"), "{}", src.label);
        }
    }
}
