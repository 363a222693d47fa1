use thiserror::Error;

use crate::scene::mesh::{Mesh, MeshData};
use crate::scene::node::{build_hierarchy, draw_order, MeshId, NodeId, SceneNode};
use crate::scene::source::SceneSource;

#[derive(Debug, Error)]
pub enum SceneError {
    #[error("scene contains no drawable geometry")]
    NoGeometry,

    #[error("node '{node}' references mesh {index} but only {count} meshes exist")]
    BadMeshReference {
        node: String,
        index: usize,
        count: usize,
    },

    #[error("mesh '{mesh}' index {index} is out of range for {vertex_count} vertices")]
    IndexOutOfRange {
        mesh: String,
        index: u32,
        vertex_count: usize,
    },
}

/// A fully uploaded scene: every mesh lives on the GPU and the node
/// hierarchy has been pruned down to drawable subtrees.
pub struct Scene {
    meshes: Vec<Mesh>,
    nodes: Vec<SceneNode>,
    root: NodeId,
}

impl Scene {
    pub fn load(device: &wgpu::Device, source: &SceneSource) -> Result<Scene, SceneError> {
        validate_mesh_references(source)?;

        let mut meshes = Vec::with_capacity(source.meshes.len());
        for record in &source.meshes {
            let data = MeshData::from_record(record);
            if let Some(max) = data.max_index() {
                let vertex_count = data.positions.len();
                if max as usize >= vertex_count {
                    return Err(SceneError::IndexOutOfRange {
                        mesh: record.name.clone(),
                        index: max,
                        vertex_count,
                    });
                }
            }
            meshes.push(Mesh::upload(device, &data));
        }

        let (nodes, root) = build_hierarchy(&source.root).ok_or(SceneError::NoGeometry)?;

        log::info!(
            "scene loaded: {} meshes, {} nodes",
            meshes.len(),
            nodes.len()
        );

        Ok(Scene {
            meshes,
            nodes,
            root,
        })
    }

    pub fn mesh_count(&self) -> usize {
        self.meshes.len()
    }

    /// Draws the whole hierarchy in depth-first pre-order.
    pub fn draw<'pass>(&'pass self, render_pass: &mut wgpu::RenderPass<'pass>) {
        for MeshId(index) in draw_order(&self.nodes, self.root) {
            self.meshes[index].draw(render_pass);
        }
    }

    /// Draws a single mesh by its flat index, skipping the hierarchy.
    pub fn draw_mesh<'pass>(&'pass self, render_pass: &mut wgpu::RenderPass<'pass>, index: usize) {
        if let Some(mesh) = self.meshes.get(index) {
            mesh.draw(render_pass);
        }
    }
}

fn validate_mesh_references(source: &SceneSource) -> Result<(), SceneError> {
    fn walk(
        node: &crate::scene::source::NodeRecord,
        mesh_count: usize,
    ) -> Result<(), SceneError> {
        for &index in &node.meshes {
            if index >= mesh_count {
                return Err(SceneError::BadMeshReference {
                    node: node.name.clone(),
                    index,
                    count: mesh_count,
                });
            }
        }
        for child in &node.children {
            walk(child, mesh_count)?;
        }
        Ok(())
    }
    walk(&source.root, source.meshes.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::source::{MeshRecord, NodeRecord};

    fn triangle_mesh(name: &str) -> MeshRecord {
        MeshRecord {
            name: name.to_string(),
            positions: vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
            uvs: None,
            normals: None,
            triangles: vec![[0, 1, 2]],
        }
    }

    #[test]
    fn dangling_mesh_reference_is_rejected() {
        let mut root = NodeRecord::new("root");
        root.meshes = vec![1];
        let source = SceneSource {
            meshes: vec![triangle_mesh("tri")],
            root,
        };

        match validate_mesh_references(&source) {
            Err(SceneError::BadMeshReference { index, count, .. }) => {
                assert_eq!(index, 1);
                assert_eq!(count, 1);
            }
            other => panic!("expected BadMeshReference, got {other:?}"),
        }
    }

    #[test]
    fn valid_references_pass() {
        let mut child = NodeRecord::new("child");
        child.meshes = vec![0];
        let mut root = NodeRecord::new("root");
        root.children = vec![child];
        let source = SceneSource {
            meshes: vec![triangle_mesh("tri")],
            root,
        };

        assert!(validate_mesh_references(&source).is_ok());
    }
}
