//! Vertex and index buffers as the scene reads them
//!
//! The buffers mirror the GPU layout: a flat `f32` vertex array with a
//! per-vertex stride and named attribute offsets, plus a 16- or 32-bit
//! index array. Raycasts read triangles straight out of these arrays.

use thiserror::Error;

use crate::foundation::math::Vec3;
use crate::geometry::{Aabb, Triangle};

/// Errors raised while assembling mesh buffers
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GeometryError {
    /// Sub-mesh has no position attribute
    #[error("Vertex layout has no {0:?} attribute")]
    MissingAttribute(AttributeName),

    /// Stride is zero, or the data is not a whole number of vertices
    #[error("Invalid stride {stride} for {len} floats")]
    InvalidStride {
        /// Floats per vertex
        stride: usize,
        /// Total floats in the buffer
        len: usize,
    },

    /// An attribute reaches past the end of a vertex
    #[error("Attribute {name:?} at offset {offset} with {components} components exceeds stride {stride}")]
    AttributeOutOfStride {
        /// Attribute name
        name: AttributeName,
        /// Offset in floats
        offset: usize,
        /// Component count
        components: usize,
        /// Floats per vertex
        stride: usize,
    },

    /// Byte buffer length is not a multiple of the element size
    #[error("Byte buffer of length {len} is not a whole number of {element_size}-byte elements")]
    MisalignedBytes {
        /// Byte length
        len: usize,
        /// Element size in bytes
        element_size: usize,
    },

    /// Position attribute has fewer than three components
    #[error("Position attribute has {components} components, expected at least 3")]
    PositionComponents {
        /// Component count of the position attribute
        components: usize,
    },

    /// An index refers past the last vertex
    #[error("Index {index} out of bounds for {vertex_count} vertices")]
    IndexOutOfBounds {
        /// Offending index value
        index: u32,
        /// Number of vertices in the buffer
        vertex_count: usize,
    },
}

/// Semantic of a vertex attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttributeName {
    /// Object-space position (3 floats)
    Position,
    /// Normal vector
    Normal,
    /// Texture coordinates
    TexCoord,
    /// Tangent vector
    Tangent,
    /// Vertex color
    Color,
}

/// Location of one attribute inside a vertex
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexAttribute {
    /// Attribute semantic
    pub name: AttributeName,
    /// Offset from the start of the vertex, in floats
    pub offset: usize,
    /// Number of float components
    pub components: usize,
}

impl VertexAttribute {
    /// Create an attribute description
    pub fn new(name: AttributeName, offset: usize, components: usize) -> Self {
        Self { name, offset, components }
    }
}

/// Flat float vertex buffer with interleaved attributes
#[derive(Debug, Clone)]
pub struct VertexBuffer {
    data: Vec<f32>,
    stride: usize,
    attributes: Vec<VertexAttribute>,
}

impl VertexBuffer {
    /// Wrap interleaved vertex data
    ///
    /// `stride` is the number of floats per vertex.
    pub fn new(
        data: Vec<f32>,
        stride: usize,
        attributes: Vec<VertexAttribute>,
    ) -> Result<Self, GeometryError> {
        if stride == 0 || data.len() % stride != 0 {
            return Err(GeometryError::InvalidStride { stride, len: data.len() });
        }
        if let Some(attr) = attributes.iter().find(|a| a.offset + a.components > stride) {
            return Err(GeometryError::AttributeOutOfStride {
                name: attr.name,
                offset: attr.offset,
                components: attr.components,
                stride,
            });
        }

        Ok(Self { data, stride, attributes })
    }

    /// Tightly packed `xyz` positions
    pub fn positions(data: Vec<f32>) -> Result<Self, GeometryError> {
        Self::new(data, 3, vec![VertexAttribute::new(AttributeName::Position, 0, 3)])
    }

    /// Reinterpret raw native-endian bytes as float vertex data
    pub fn from_bytes(
        bytes: &[u8],
        stride: usize,
        attributes: Vec<VertexAttribute>,
    ) -> Result<Self, GeometryError> {
        Self::new(cast_bytes::<f32>(bytes)?, stride, attributes)
    }

    /// Number of whole vertices
    pub fn vertex_count(&self) -> usize {
        self.data.len() / self.stride
    }

    /// Floats per vertex
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Raw float data
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    /// Look up an attribute by semantic
    pub fn attribute(&self, name: AttributeName) -> Option<&VertexAttribute> {
        self.attributes.iter().find(|a| a.name == name)
    }

    /// Read the first three components of `attr` for vertex `index`
    ///
    /// `None` if the attribute has fewer than three components.
    pub fn read_vec3(&self, attr: &VertexAttribute, index: usize) -> Option<Vec3> {
        if attr.components < 3 {
            return None;
        }
        let start = index * self.stride + attr.offset;
        let v = self.data.get(start..start + 3)?;
        Some(Vec3::new(v[0], v[1], v[2]))
    }
}

/// Index buffer in either GPU index width
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexBuffer {
    /// 16-bit indices
    U16(Vec<u16>),
    /// 32-bit indices
    U32(Vec<u32>),
}

impl IndexBuffer {
    /// Reinterpret raw native-endian bytes as 16-bit indices
    pub fn from_u16_bytes(bytes: &[u8]) -> Result<Self, GeometryError> {
        Ok(Self::U16(cast_bytes::<u16>(bytes)?))
    }

    /// Reinterpret raw native-endian bytes as 32-bit indices
    pub fn from_u32_bytes(bytes: &[u8]) -> Result<Self, GeometryError> {
        Ok(Self::U32(cast_bytes::<u32>(bytes)?))
    }

    /// Number of indices
    pub fn len(&self) -> usize {
        match self {
            Self::U16(v) => v.len(),
            Self::U32(v) => v.len(),
        }
    }

    /// Whether the buffer holds no indices
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Index at position `i`, widened to `u32`
    pub fn get(&self, i: usize) -> Option<u32> {
        match self {
            Self::U16(v) => v.get(i).map(|&x| u32::from(x)),
            Self::U32(v) => v.get(i).copied(),
        }
    }

    /// Iterate over all indices widened to `u32`
    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        (0..self.len()).filter_map(move |i| self.get(i))
    }
}

/// How indices are assembled into primitives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveMode {
    /// Individual points
    PointList,
    /// Independent line segments
    LineList,
    /// Connected line segments
    LineStrip,
    /// Closed line loop
    LineLoop,
    /// Independent triangles, three indices each
    TriangleList,
    /// Triangle strip
    TriangleStrip,
    /// Triangle fan
    TriangleFan,
}

/// One drawable piece of a model
#[derive(Debug, Clone)]
pub struct SubMesh {
    vertices: VertexBuffer,
    indices: IndexBuffer,
    primitive: PrimitiveMode,
    double_sided: bool,
    position: VertexAttribute,
}

impl SubMesh {
    /// Pair vertex and index buffers
    ///
    /// Fails if the layout has no position attribute or an index points
    /// past the last vertex.
    pub fn new(
        vertices: VertexBuffer,
        indices: IndexBuffer,
        primitive: PrimitiveMode,
    ) -> Result<Self, GeometryError> {
        let position = *vertices
            .attribute(AttributeName::Position)
            .ok_or(GeometryError::MissingAttribute(AttributeName::Position))?;
        if position.components < 3 {
            return Err(GeometryError::PositionComponents {
                components: position.components,
            });
        }

        let vertex_count = vertices.vertex_count();
        if let Some(index) = indices.iter().find(|&i| i as usize >= vertex_count) {
            return Err(GeometryError::IndexOutOfBounds { index, vertex_count });
        }

        Ok(Self {
            vertices,
            indices,
            primitive,
            double_sided: false,
            position,
        })
    }

    /// Accept ray hits on back faces too
    pub fn with_double_sided(mut self, double_sided: bool) -> Self {
        self.double_sided = double_sided;
        self
    }

    /// Primitive assembly mode
    pub fn primitive(&self) -> PrimitiveMode {
        self.primitive
    }

    /// Whether back faces count as hits
    pub fn is_double_sided(&self) -> bool {
        self.double_sided
    }

    /// Vertex data
    pub fn vertices(&self) -> &VertexBuffer {
        &self.vertices
    }

    /// Index data
    pub fn indices(&self) -> &IndexBuffer {
        &self.indices
    }

    /// Position of vertex `index`
    pub fn position(&self, index: u32) -> Option<Vec3> {
        self.vertices.read_vec3(&self.position, index as usize)
    }

    /// Bounds of every indexed position, in model space
    pub fn local_bounds(&self) -> Option<Aabb> {
        Aabb::from_points(self.indices.iter().filter_map(|i| self.position(i)))
    }

    /// Triangles of a triangle list, read from the live buffers
    ///
    /// Yields nothing for other primitive modes. A trailing partial
    /// triangle is ignored.
    pub fn triangles(&self) -> impl Iterator<Item = Triangle> + '_ {
        let count = if self.primitive == PrimitiveMode::TriangleList {
            self.indices.len() / 3
        } else {
            0
        };
        (0..count).filter_map(move |t| {
            let base = t * 3;
            Some(Triangle::new(
                self.position(self.indices.get(base)?)?,
                self.position(self.indices.get(base + 1)?)?,
                self.position(self.indices.get(base + 2)?)?,
            ))
        })
    }
}

fn cast_bytes<T: bytemuck::Pod>(bytes: &[u8]) -> Result<Vec<T>, GeometryError> {
    let element_size = std::mem::size_of::<T>();
    if bytes.len() % element_size != 0 {
        return Err(GeometryError::MisalignedBytes {
            len: bytes.len(),
            element_size,
        });
    }

    // Buffers read back from the GPU are not guaranteed to be aligned
    Ok(match bytemuck::try_cast_slice::<u8, T>(bytes) {
        Ok(values) => values.to_vec(),
        Err(_) => bytes
            .chunks_exact(element_size)
            .map(bytemuck::pod_read_unaligned)
            .collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn quad_vertices() -> Vec<f32> {
        vec![
            0.0, 0.0, 0.0,
            1.0, 0.0, 0.0,
            1.0, 1.0, 0.0,
            0.0, 1.0, 0.0,
        ]
    }

    #[test]
    fn test_interleaved_position_lookup() {
        // position followed by a 2-float uv
        let data = vec![
            0.0, 0.0, 0.0, 0.0, 0.0,
            2.0, 3.0, 4.0, 1.0, 1.0,
        ];
        let vb = VertexBuffer::new(
            data,
            5,
            vec![
                VertexAttribute::new(AttributeName::Position, 0, 3),
                VertexAttribute::new(AttributeName::TexCoord, 3, 2),
            ],
        )
        .unwrap();

        let position = *vb.attribute(AttributeName::Position).unwrap();
        assert_eq!(vb.vertex_count(), 2);
        assert_eq!(vb.read_vec3(&position, 1), Some(Vec3::new(2.0, 3.0, 4.0)));
        assert_eq!(vb.read_vec3(&position, 2), None);
    }

    #[test]
    fn test_invalid_layouts_rejected() {
        assert!(matches!(
            VertexBuffer::new(vec![0.0; 4], 3, vec![]),
            Err(GeometryError::InvalidStride { stride: 3, len: 4 })
        ));
        assert!(matches!(
            VertexBuffer::new(vec![0.0; 4], 4, vec![VertexAttribute::new(AttributeName::Normal, 2, 3)]),
            Err(GeometryError::AttributeOutOfStride { .. })
        ));
    }

    #[test]
    fn test_sub_mesh_requires_position_and_valid_indices() {
        let no_position = VertexBuffer::new(vec![0.0; 3], 3, vec![]).unwrap();
        assert_eq!(
            SubMesh::new(no_position, IndexBuffer::U16(vec![0]), PrimitiveMode::PointList).unwrap_err(),
            GeometryError::MissingAttribute(AttributeName::Position)
        );

        let vb = VertexBuffer::positions(quad_vertices()).unwrap();
        assert_eq!(
            SubMesh::new(vb, IndexBuffer::U32(vec![0, 1, 4]), PrimitiveMode::TriangleList).unwrap_err(),
            GeometryError::IndexOutOfBounds { index: 4, vertex_count: 4 }
        );
    }

    #[test]
    fn test_two_component_positions_rejected() {
        // xy position followed by a 2-float uv
        let vb = VertexBuffer::new(
            vec![0.0; 8],
            4,
            vec![
                VertexAttribute::new(AttributeName::Position, 0, 2),
                VertexAttribute::new(AttributeName::TexCoord, 2, 2),
            ],
        )
        .unwrap();
        let position = *vb.attribute(AttributeName::Position).unwrap();
        assert_eq!(vb.read_vec3(&position, 0), None);

        assert_eq!(
            SubMesh::new(vb, IndexBuffer::U16(vec![0, 1]), PrimitiveMode::LineList).unwrap_err(),
            GeometryError::PositionComponents { components: 2 }
        );
    }

    #[test]
    fn test_triangles_and_bounds() {
        let vb = VertexBuffer::positions(quad_vertices()).unwrap();
        let mesh = SubMesh::new(
            vb,
            IndexBuffer::U16(vec![0, 1, 2, 0, 2, 3, 1]),
            PrimitiveMode::TriangleList,
        )
        .unwrap();

        let triangles: Vec<_> = mesh.triangles().collect();
        assert_eq!(triangles.len(), 2);
        assert_eq!(triangles[1].v2, Vec3::new(0.0, 1.0, 0.0));

        let bounds = mesh.local_bounds().unwrap();
        assert_relative_eq!(bounds.max, Vec3::new(1.0, 1.0, 0.0));
    }

    #[test]
    fn test_non_triangle_modes_yield_no_triangles() {
        let vb = VertexBuffer::positions(quad_vertices()).unwrap();
        let mesh = SubMesh::new(vb, IndexBuffer::U16(vec![0, 1, 2]), PrimitiveMode::LineStrip).unwrap();
        assert_eq!(mesh.triangles().count(), 0);
    }

    #[test]
    fn test_from_bytes_handles_unaligned_input() {
        let floats = [1.0f32, 2.0, 3.0];
        let mut bytes = vec![0u8];
        bytes.extend_from_slice(bytemuck::cast_slice(&floats));

        let vb = VertexBuffer::from_bytes(&bytes[1..], 3, vec![VertexAttribute::new(AttributeName::Position, 0, 3)]).unwrap();
        assert_eq!(vb.as_slice(), &floats);

        assert!(matches!(
            VertexBuffer::from_bytes(&bytes[..5], 3, vec![]),
            Err(GeometryError::MisalignedBytes { len: 5, element_size: 4 })
        ));
    }

    #[test]
    fn test_index_bytes() {
        let indices = [0u16, 1, 2];
        let ib = IndexBuffer::from_u16_bytes(bytemuck::cast_slice(&indices)).unwrap();
        assert_eq!(ib.iter().collect::<Vec<_>>(), vec![0, 1, 2]);
    }
}
