use crate::config::QUAD_SIZE;

/// Object-space corners of the sprite quad, (x, y, z).
const VERTICES: [[f32; 3]; 4] = [
    [0.0, 0.0, 0.0],             // top left
    [0.0, QUAD_SIZE, 0.0],       // bottom left
    [QUAD_SIZE, QUAD_SIZE, 0.0], // bottom right
    [QUAD_SIZE, 0.0, 0.0],       // top right
];

/// Texture coordinates for each corner, covering the whole texture.
const TEX_COORDS: [[f32; 2]; 4] =
    [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]];

/// Two counter-clockwise triangles.
pub const QUAD_INDICES: [u16; 6] = [0, 1, 2, 0, 2, 3];

/// The vertex, index and texture-coordinate buffers for the shared sprite
/// quad, packed in native byte order the way a client-side vertex array
/// expects them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuadGeometry {
    vertices: Vec<u8>,
    indices: Vec<u8>,
    tex_coords: Vec<u8>,
}

impl QuadGeometry {
    /// Build the buffers for the 32x32 sprite quad.
    pub fn new() -> Self {
        Self {
            vertices: VERTICES
                .iter()
                .flatten()
                .flat_map(|v| v.to_ne_bytes())
                .collect(),
            indices: QUAD_INDICES
                .iter()
                .flat_map(|i| i.to_ne_bytes())
                .collect(),
            tex_coords: TEX_COORDS
                .iter()
                .flatten()
                .flat_map(|v| v.to_ne_bytes())
                .collect(),
        }
    }

    /// Three floats per vertex.
    pub fn vertex_bytes(&self) -> &[u8] {
        &self.vertices
    }

    /// One u16 per index.
    pub fn index_bytes(&self) -> &[u8] {
        &self.indices
    }

    /// Two floats per vertex.
    pub fn tex_coord_bytes(&self) -> &[u8] {
        &self.tex_coords
    }

    pub fn index_count(&self) -> usize {
        self.indices.len() / std::mem::size_of::<u16>()
    }

    /// Decode the vertex buffer.
    pub fn positions(&self) -> Vec<[f32; 3]> {
        read_f32s(&self.vertices)
            .chunks_exact(3)
            .map(|v| [v[0], v[1], v[2]])
            .collect()
    }

    /// Decode the texture-coordinate buffer.
    pub fn tex_coords(&self) -> Vec<[f32; 2]> {
        read_f32s(&self.tex_coords)
            .chunks_exact(2)
            .map(|v| [v[0], v[1]])
            .collect()
    }

    /// Decode the index buffer.
    pub fn indices(&self) -> Vec<u16> {
        self.indices
            .chunks_exact(2)
            .map(|b| u16::from_ne_bytes([b[0], b[1]]))
            .collect()
    }
}

impl Default for QuadGeometry {
    fn default() -> Self {
        Self::new()
    }
}

fn read_f32s(bytes: &[u8]) -> Vec<f32> {
    bytes
        .chunks_exact(4)
        .map(|b| f32::from_ne_bytes([b[0], b[1], b[2], b[3]]))
        .collect()
}
