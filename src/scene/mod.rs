mod mesh;
mod node;
mod scene;
mod source;

pub use mesh::{Mesh, MeshData};
pub use node::{MeshId, NodeId, SceneNode, build_hierarchy, draw_order};
pub use scene::{Scene, SceneError};
pub use source::{MeshRecord, NodeRecord, SceneSource};
