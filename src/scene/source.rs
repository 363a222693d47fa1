use nalgebra_glm as glm;

/// One mesh as delivered by an asset parser: indexed vertex attributes
/// with UV/normal channels optional. Positions, UVs and normals are
/// indexed identically per vertex; triangles index into them.
#[derive(Debug, Clone, Default)]
pub struct MeshRecord {
    pub name: String,
    pub positions: Vec<[f32; 3]>,
    pub uvs: Option<Vec<[f32; 2]>>,
    pub normals: Option<Vec<[f32; 3]>>,
    pub triangles: Vec<[u32; 3]>,
}

/// One node of the source hierarchy. `meshes` are indices into the
/// owning [`SceneSource`]'s flat mesh list.
#[derive(Debug, Clone)]
pub struct NodeRecord {
    pub name: String,
    pub transform: glm::Mat4,
    pub meshes: Vec<usize>,
    pub children: Vec<NodeRecord>,
}

impl NodeRecord {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            transform: glm::Mat4::identity(),
            meshes: Vec::new(),
            children: Vec::new(),
        }
    }
}

/// Parsed scene description: a flat mesh list plus the node hierarchy
/// referencing it. This is what the asset parsers produce and what
/// [`crate::scene::Scene::load`] consumes.
#[derive(Debug, Clone)]
pub struct SceneSource {
    pub meshes: Vec<MeshRecord>,
    pub root: NodeRecord,
}
