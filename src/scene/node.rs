use nalgebra_glm as glm;

use crate::scene::source::NodeRecord;

/// Index of a node in the scene's node arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeId(pub usize);

/// Index of a mesh in the scene's flat mesh list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MeshId(pub usize);

/// One node of the loaded hierarchy. Nodes live in a flat arena and
/// address their children and meshes by index, so the tree is cheap to
/// clone and needs no owning pointers.
///
/// The local transform is carried for future animation binding but is
/// not composed into draws; every mesh renders at the identity.
#[derive(Debug, Clone)]
pub struct SceneNode {
    pub name: String,
    pub transform: glm::Mat4,
    pub children: Vec<NodeId>,
    pub meshes: Vec<MeshId>,
}

/// Mirrors the source hierarchy into an arena, pruning every subtree
/// that carries no mesh anywhere below it. Returns `None` when nothing
/// in the whole tree is drawable.
///
/// Nodes are appended parent-first, so the arena order is already a
/// pre-order of the retained tree.
pub fn build_hierarchy(root: &NodeRecord) -> Option<(Vec<SceneNode>, NodeId)> {
    let mut nodes = Vec::new();
    let root_id = build_node(root, &mut nodes)?;
    Some((nodes, root_id))
}

fn build_node(record: &NodeRecord, nodes: &mut Vec<SceneNode>) -> Option<NodeId> {
    let id = nodes.len();
    nodes.push(SceneNode {
        name: record.name.clone(),
        transform: record.transform,
        children: Vec::new(),
        meshes: record.meshes.iter().map(|&m| MeshId(m)).collect(),
    });

    let mut children = Vec::new();
    for child in &record.children {
        if let Some(child_id) = build_node(child, nodes) {
            children.push(child_id);
        }
    }

    if record.meshes.is_empty() && children.is_empty() {
        // Every pruned descendant already popped itself, so this node is
        // back on top of the arena.
        debug_assert_eq!(nodes.len(), id + 1);
        nodes.pop();
        return None;
    }

    nodes[id].children = children;
    Some(NodeId(id))
}

/// Flattens the tree into draw submission order: depth-first pre-order,
/// a node's own meshes before its children, children in declared order.
pub fn draw_order(nodes: &[SceneNode], root: NodeId) -> Vec<MeshId> {
    let mut order = Vec::new();
    visit(nodes, root, &mut order);
    order
}

fn visit(nodes: &[SceneNode], id: NodeId, order: &mut Vec<MeshId>) {
    let node = &nodes[id.0];
    order.extend(node.meshes.iter().copied());
    for &child in &node.children {
        visit(nodes, child, order);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::source::NodeRecord;

    fn leaf(name: &str, meshes: &[usize]) -> NodeRecord {
        let mut node = NodeRecord::new(name);
        node.meshes = meshes.to_vec();
        node
    }

    #[test]
    fn meshless_child_is_pruned() {
        let mut root = NodeRecord::new("root");
        root.children = vec![leaf("a", &[0]), leaf("b", &[1]), leaf("empty", &[])];

        let (nodes, root_id) = build_hierarchy(&root).unwrap();
        assert_eq!(nodes.len(), 3); // root + two mesh-bearing children
        assert_eq!(nodes[root_id.0].children.len(), 2);
        assert_eq!(draw_order(&nodes, root_id), vec![MeshId(0), MeshId(1)]);
    }

    #[test]
    fn meshless_node_with_drawable_descendant_is_kept() {
        let mut middle = NodeRecord::new("middle");
        middle.children = vec![leaf("inner", &[2])];
        let mut root = NodeRecord::new("root");
        root.children = vec![middle];

        let (nodes, root_id) = build_hierarchy(&root).unwrap();
        assert_eq!(nodes.len(), 3);
        assert_eq!(draw_order(&nodes, root_id), vec![MeshId(2)]);
    }

    #[test]
    fn fully_empty_tree_yields_nothing() {
        let mut root = NodeRecord::new("root");
        let mut helper = NodeRecord::new("helper");
        helper.children = vec![NodeRecord::new("deeper")];
        root.children = vec![helper];

        assert!(build_hierarchy(&root).is_none());
    }

    #[test]
    fn parsed_groups_flow_through_to_draw_order() {
        let text = "\
o body
v 0 0 0
v 1 0 0
v 0 1 0
f 1 2 3
o lid
v 0 0 1
v 1 0 1
v 0 1 1
f 4 5 6
";
        let source = crate::parser::obj::parse_str("model", text).unwrap();
        assert_eq!(source.meshes.len(), 2);

        let (nodes, root_id) = build_hierarchy(&source.root).unwrap();
        assert_eq!(draw_order(&nodes, root_id), vec![MeshId(0), MeshId(1)]);
    }

    #[test]
    fn loading_the_same_source_twice_gives_identical_draw_order() {
        let text = "\
o body
v 0 0 0
v 1 0 0
v 0 1 0
f 1 2 3
o lid
v 0 0 1
v 1 0 1
v 0 1 1
f 4 5 6
";
        let source = crate::parser::obj::parse_str("model", text).unwrap();

        let (first_nodes, first_root) = build_hierarchy(&source.root).unwrap();
        let (second_nodes, second_root) = build_hierarchy(&source.root).unwrap();

        let first = draw_order(&first_nodes, first_root);
        let second = draw_order(&second_nodes, second_root);
        assert_eq!(first, second);
        assert_eq!(first.len(), source.meshes.len());
    }

    #[test]
    fn own_meshes_precede_children_in_draw_order() {
        let mut root = leaf("root", &[5]);
        root.children = vec![leaf("a", &[1]), leaf("b", &[3])];

        let (nodes, root_id) = build_hierarchy(&root).unwrap();
        assert_eq!(
            draw_order(&nodes, root_id),
            vec![MeshId(5), MeshId(1), MeshId(3)]
        );
    }
}
