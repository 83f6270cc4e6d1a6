use crate::scene::{GraphScene, ItemRef};

/// The tag value a hovered item contributes to highlighting: a node's own
/// cluster, or an edge's cluster when both endpoints agree. Anything else
/// clears the highlight.
pub(super) fn hover_group(scene: &GraphScene, item: Option<ItemRef>) -> Option<u32> {
    match item? {
        ItemRef::Node(index) => scene.nodes.get(index)?.tag.group,
        ItemRef::Edge(index) => {
            let edge = scene.edges.get(index)?;
            let source = scene.nodes.get(edge.source)?.tag.group?;
            let target = scene.nodes.get(edge.target)?.tag.group?;
            (source == target).then_some(source)
        }
        ItemRef::Label(_) => None,
    }
}

/// Every node in the cluster plus the edges running inside it.
pub(super) fn collect_group_items(scene: &GraphScene, group: u32) -> Vec<ItemRef> {
    let mut items = Vec::new();
    for (index, node) in scene.nodes.iter().enumerate() {
        if node.tag.group == Some(group) {
            items.push(ItemRef::Node(index));
        }
    }
    for (index, edge) in scene.edges.iter().enumerate() {
        let source = scene.nodes.get(edge.source).and_then(|node| node.tag.group);
        let target = scene.nodes.get(edge.target).and_then(|node| node.tag.group);
        if source == Some(group) && target == Some(group) {
            items.push(ItemRef::Edge(index));
        }
    }
    items
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::tests_support::scene_fixture;

    #[test]
    fn node_hover_yields_its_cluster() {
        let scene = scene_fixture();
        assert_eq!(hover_group(&scene, Some(ItemRef::Node(0))), Some(1));
        assert_eq!(hover_group(&scene, Some(ItemRef::Node(2))), Some(2));
        assert_eq!(hover_group(&scene, None), None);
    }

    #[test]
    fn edge_hover_requires_matching_endpoints() {
        let scene = scene_fixture();
        // Edge 0 joins two cluster-1 nodes; edge 1 crosses clusters.
        assert_eq!(hover_group(&scene, Some(ItemRef::Edge(0))), Some(1));
        assert_eq!(hover_group(&scene, Some(ItemRef::Edge(1))), None);
    }

    #[test]
    fn collected_items_cover_the_cluster_and_inner_edges_only() {
        let scene = scene_fixture();
        let items = collect_group_items(&scene, 1);
        assert!(items.contains(&ItemRef::Node(0)));
        assert!(items.contains(&ItemRef::Node(1)));
        assert!(items.contains(&ItemRef::Edge(0)));
        assert!(!items.contains(&ItemRef::Node(2)));
        assert!(!items.contains(&ItemRef::Edge(1)));
    }
}
