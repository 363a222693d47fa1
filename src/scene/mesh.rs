use wgpu::util::DeviceExt;

use crate::scene::source::MeshRecord;

/// CPU-side mesh arrays, fully resolved: every vertex has a position, a
/// UV and a normal, and the triangle groups are flattened into a single
/// index sequence ready for an indexed draw.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshData {
    pub name: String,
    pub positions: Vec<[f32; 3]>,
    pub uvs: Vec<[f32; 2]>,
    pub normals: Vec<[f32; 3]>,
    pub indices: Vec<u32>,
}

impl MeshData {
    /// Resolves a parser record into draw-ready arrays. Missing UV or
    /// normal channels are substituted with zero vectors of matching
    /// length: the mesh still renders, just with degenerate lighting.
    pub fn from_record(record: &MeshRecord) -> Self {
        let vertex_count = record.positions.len();

        let uvs = match &record.uvs {
            Some(uvs) => uvs.clone(),
            None => vec![[0.0; 2]; vertex_count],
        };
        let normals = match &record.normals {
            Some(normals) => normals.clone(),
            None => vec![[0.0; 3]; vertex_count],
        };

        let mut indices = Vec::with_capacity(record.triangles.len() * 3);
        for tri in &record.triangles {
            indices.extend_from_slice(tri);
        }

        Self {
            name: record.name.clone(),
            positions: record.positions.clone(),
            uvs,
            normals,
            indices,
        }
    }

    /// Highest vertex slot any index refers to, if there are indices.
    pub fn max_index(&self) -> Option<u32> {
        self.indices.iter().copied().max()
    }
}

/// A GPU-resident mesh: four buffers (positions, UVs, normals, triangle
/// indices) and the index count for the draw call. The buffers are owned
/// here and released when the mesh is dropped.
pub struct Mesh {
    pub position_buffer: wgpu::Buffer,
    pub uv_buffer: wgpu::Buffer,
    pub normal_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub index_count: u32,
}

impl Mesh {
    pub fn upload(device: &wgpu::Device, data: &MeshData) -> Self {
        let position_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{} Position Buffer", data.name)),
            contents: bytemuck::cast_slice(&data.positions),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let uv_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{} UV Buffer", data.name)),
            contents: bytemuck::cast_slice(&data.uvs),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let normal_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{} Normal Buffer", data.name)),
            contents: bytemuck::cast_slice(&data.normals),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{} Index Buffer", data.name)),
            contents: bytemuck::cast_slice(&data.indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        Self {
            position_buffer,
            uv_buffer,
            normal_buffer,
            index_buffer,
            index_count: data.indices.len() as u32,
        }
    }

    /// Binds the four buffers and issues the indexed triangle-list draw.
    pub fn draw<'pass>(&'pass self, render_pass: &mut wgpu::RenderPass<'pass>) {
        render_pass.set_vertex_buffer(0, self.position_buffer.slice(..));
        render_pass.set_vertex_buffer(1, self.uv_buffer.slice(..));
        render_pass.set_vertex_buffer(2, self.normal_buffer.slice(..));
        render_pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        render_pass.draw_indexed(0..self.index_count, 0, 0..1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_channels_are_zero_filled() {
        let record = MeshRecord {
            name: "bare".to_string(),
            positions: vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
            uvs: None,
            normals: None,
            triangles: vec![[0, 1, 2]],
        };

        let data = MeshData::from_record(&record);
        assert_eq!(data.uvs.len(), data.positions.len());
        assert_eq!(data.normals.len(), data.positions.len());
        assert!(data.uvs.iter().all(|uv| *uv == [0.0; 2]));
        assert!(data.normals.iter().all(|n| *n == [0.0; 3]));
    }

    #[test]
    fn triangle_groups_flatten_in_order() {
        let record = MeshRecord {
            name: "quad".to_string(),
            positions: vec![[0.0; 3]; 4],
            uvs: Some(vec![[0.0; 2]; 4]),
            normals: Some(vec![[0.0; 3]; 4]),
            triangles: vec![[0, 1, 2], [2, 3, 0]],
        };

        let data = MeshData::from_record(&record);
        assert_eq!(data.indices, vec![0, 1, 2, 2, 3, 0]);
        assert_eq!(data.max_index(), Some(3));
    }

    #[test]
    fn provided_channels_pass_through() {
        let record = MeshRecord {
            name: "tri".to_string(),
            positions: vec![[0.0; 3]; 3],
            uvs: Some(vec![[0.5, 0.5]; 3]),
            normals: Some(vec![[0.0, 1.0, 0.0]; 3]),
            triangles: vec![[0, 1, 2]],
        };

        let data = MeshData::from_record(&record);
        assert_eq!(data.uvs, vec![[0.5, 0.5]; 3]);
        assert_eq!(data.normals, vec![[0.0, 1.0, 0.0]; 3]);
    }
}
