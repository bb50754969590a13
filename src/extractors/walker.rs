//! Graph walker - pre-order traversal of the "all children" relation
//!
//! Roots are expanded but never reported. A node is visited at most once, keyed by
//! `SceneNode::key`, so a child list that loops back to an ancestor cannot trap the
//! walk. The traversal keeps its own stack and never recurses.

use std::collections::HashSet;
use tracing::debug;

use crate::document::SceneNode;

pub struct GraphWalker;

impl GraphWalker {
    /// Collect every descendant of `roots` in pre-order
    pub fn walk<N: SceneNode>(roots: &[N]) -> Vec<N> {
        let mut visited = Vec::new();
        Self::walk_with(roots, |node| visited.push(node.clone()));
        visited
    }

    /// Walk with visitor, calling `visitor` once per descendant in pre-order
    pub fn walk_with<N, F>(roots: &[N], mut visitor: F)
    where
        N: SceneNode,
        F: FnMut(&N),
    {
        let root_keys: HashSet<N::Key> = roots.iter().map(SceneNode::key).collect();
        let mut seen: HashSet<N::Key> = HashSet::new();
        let mut stack: Vec<N> = roots.iter().rev().cloned().collect();

        while let Some(node) = stack.pop() {
            let key = node.key();
            if !seen.insert(key.clone()) {
                debug!("Skipping already visited node {:?}", key);
                continue;
            }
            if !root_keys.contains(&key) {
                visitor(&node);
            }

            match node.all_children() {
                Ok(Some(children)) => {
                    // Reversed so the first child is popped first
                    for child in children.into_iter().rev() {
                        if !seen.contains(&child.key()) {
                            stack.push(child);
                        }
                    }
                }
                Ok(None) => {}
                Err(e) => debug!("Treating node {:?} as a leaf: {}", key, e),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{DocumentAccess, SceneDocument};

    fn ids<N: SceneNode>(nodes: &[N]) -> Vec<String> {
        nodes
            .iter()
            .map(|n| n.id().unwrap().unwrap_or_default())
            .collect()
    }

    #[test]
    fn test_pre_order_excludes_roots() {
        let document =
            SceneDocument::from_json_str(include_str!("../../test_samples/page.json")).unwrap();
        let roots = (&document).current_page_roots().unwrap();
        let visited = GraphWalker::walk(&roots);
        assert_eq!(ids(&visited), vec!["g1", "r1", "m1", "i1", "r2", "t1"]);
    }

    #[test]
    fn test_cycle_through_ancestor_terminates() {
        let document =
            SceneDocument::from_json_str(include_str!("../../test_samples/cyclic.json")).unwrap();
        let roots = (&document).current_page_roots().unwrap();
        let visited = GraphWalker::walk(&roots);
        assert_eq!(ids(&visited), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_no_roots_visits_nothing() {
        let roots: Vec<crate::document::NodeRef<'_>> = Vec::new();
        assert!(GraphWalker::walk(&roots).is_empty());
    }

    #[test]
    fn test_missing_or_failing_children_are_leaves() {
        let document = SceneDocument::from_json_str(
            r#"{
                "pages": [{"id": "p", "artboards": ["ab"]}],
                "nodes": [
                    {"id": "ab", "type": "ab:Artboard", "allChildren": ["x", "y"]},
                    {"id": "x", "type": "Group", "allChildren": ["z"], "throws": ["allChildren"]},
                    {"id": "y", "type": "Rectangle"},
                    {"id": "z", "type": "Rectangle"}
                ]
            }"#,
        )
        .unwrap();
        let roots = (&document).current_page_roots().unwrap();
        assert_eq!(ids(&GraphWalker::walk(&roots)), vec!["x", "y"]);
    }

    #[test]
    fn test_shared_descendant_visited_once() {
        let document = SceneDocument::from_json_str(
            r#"{
                "pages": [{"id": "p", "artboards": ["ab1", "ab2"]}],
                "nodes": [
                    {"id": "ab1", "type": "ab:Artboard", "allChildren": ["s"]},
                    {"id": "ab2", "type": "ab:Artboard", "allChildren": ["s", "t"]},
                    {"id": "s", "type": "Rectangle"},
                    {"id": "t", "type": "Text"}
                ]
            }"#,
        )
        .unwrap();
        let roots = (&document).current_page_roots().unwrap();
        assert_eq!(ids(&GraphWalker::walk(&roots)), vec!["s", "t"]);
    }

    #[test]
    fn test_deep_chain_does_not_recurse() {
        let depth = 50_000;
        let mut nodes = vec![serde_json::json!({
            "id": "root", "type": "ab:Artboard", "allChildren": ["n0"]
        })];
        for i in 0..depth {
            let mut node = serde_json::json!({"id": format!("n{}", i), "type": "Group"});
            if i + 1 < depth {
                node["allChildren"] = serde_json::json!([format!("n{}", i + 1)]);
            }
            nodes.push(node);
        }
        let document = SceneDocument::from_value(serde_json::json!({
            "pages": [{"id": "p", "artboards": ["root"]}],
            "nodes": nodes
        }))
        .unwrap();
        let roots = (&document).current_page_roots().unwrap();
        assert_eq!(GraphWalker::walk(&roots).len(), depth);
    }
}
