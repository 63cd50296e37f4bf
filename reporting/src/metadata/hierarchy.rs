// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Type hierarchy tree and traversal

use crate::model::PropertyCharacteristic;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap, HashSet};

/// A node of the resource type hierarchy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeNode {
    pub id: String,
    pub label: Option<String>,
    #[serde(default)]
    pub children: Vec<TypeNode>,
}

impl TypeNode {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: None,
            children: Vec::new(),
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_children(mut self, children: Vec<TypeNode>) -> Self {
        self.children = children;
        self
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Ids of this node and every node below it, depth first
    pub fn ids(&self) -> Vec<String> {
        let mut ids = Vec::new();
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            ids.push(node.id.clone());
            stack.extend(node.children.iter().rev());
        }
        ids
    }
}

/// Depth-first search for a node by id
pub fn find_node<'a>(tree: &'a TypeNode, id: &str) -> Option<&'a TypeNode> {
    if tree.id == id {
        return Some(tree);
    }
    tree.children.iter().find_map(|child| find_node(child, id))
}

/// Ids of every node strictly below `target`; empty if `target` is not in the tree
pub fn collect_descendant_ids(tree: &TypeNode, target: &str) -> BTreeSet<String> {
    let mut out = BTreeSet::new();
    if let Some(node) = find_node(tree, target) {
        for child in &node.children {
            collect_into(child, &mut out);
        }
    }
    out
}

fn collect_into(node: &TypeNode, out: &mut BTreeSet<String>) {
    out.insert(node.id.clone());
    for child in &node.children {
        collect_into(child, out);
    }
}

/// Leaves below a node, or the node itself when it is a leaf
pub fn leaf_ids(node: &TypeNode) -> Vec<String> {
    if node.is_leaf() {
        return vec![node.id.clone()];
    }
    node.children.iter().flat_map(leaf_ids).collect()
}

/// Sum the (draft, published) counts of every leaf type below `ancestor`
///
/// Returns (0, 0) when the ancestor is not part of the tree.
pub fn aggregate_counts(
    tree: &TypeNode,
    ancestor: &str,
    characteristics: &[PropertyCharacteristic],
) -> (u64, u64) {
    let Some(node) = find_node(tree, ancestor) else {
        return (0, 0);
    };

    let by_type: HashMap<&str, &PropertyCharacteristic> = characteristics
        .iter()
        .map(|c| (c.key.as_str(), c))
        .collect();

    leaf_ids(node)
        .iter()
        .filter_map(|id| by_type.get(id.as_str()))
        .fold((0, 0), |(draft, published), c| {
            (draft + c.draft_count, published + c.published_count)
        })
}

/// Build the tree below `root` from `(child, parent)` subclass edges
///
/// Edges whose parent is not reachable from `root` are ignored. A type that
/// already appears on the current path is not expanded again.
pub fn build_hierarchy(
    root: &str,
    edges: &[(String, String)],
    labels: &HashMap<String, String>,
) -> TypeNode {
    let mut children: HashMap<&str, Vec<&str>> = HashMap::new();
    for (child, parent) in edges {
        if child != parent {
            children.entry(parent.as_str()).or_default().push(child.as_str());
        }
    }
    for list in children.values_mut() {
        list.sort_unstable();
        list.dedup();
    }

    let mut path = HashSet::new();
    build_node(root, &children, labels, &mut path)
}

fn build_node<'a>(
    id: &'a str,
    children: &HashMap<&'a str, Vec<&'a str>>,
    labels: &HashMap<String, String>,
    path: &mut HashSet<&'a str>,
) -> TypeNode {
    path.insert(id);
    let mut kids = Vec::new();
    if let Some(ids) = children.get(id) {
        for &child in ids {
            if !path.contains(child) {
                kids.push(build_node(child, children, labels, path));
            }
        }
    }
    path.remove(id);

    TypeNode {
        id: id.to_string(),
        label: labels.get(id).cloned(),
        children: kids,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_tree() -> TypeNode {
        TypeNode::new("root").with_children(vec![
            TypeNode::new("A").with_children(vec![TypeNode::new("A1"), TypeNode::new("A2")]),
            TypeNode::new("B"),
        ])
    }

    fn sample_characteristics() -> Vec<PropertyCharacteristic> {
        vec![
            PropertyCharacteristic::new("A1", None, 2, 3),
            PropertyCharacteristic::new("A2", None, 1, 4),
            PropertyCharacteristic::new("B", None, 0, 5),
        ]
    }

    #[test]
    fn test_collect_descendant_ids() {
        let tree = sample_tree();
        let ids: Vec<_> = collect_descendant_ids(&tree, "root").into_iter().collect();
        assert_eq!(ids, vec!["A", "A1", "A2", "B"]);

        let ids: Vec<_> = collect_descendant_ids(&tree, "A").into_iter().collect();
        assert_eq!(ids, vec!["A1", "A2"]);

        assert!(collect_descendant_ids(&tree, "B").is_empty());
        assert!(collect_descendant_ids(&tree, "missing").is_empty());
    }

    #[test]
    fn test_aggregate_counts_over_leaves() {
        let tree = sample_tree();
        let characteristics = sample_characteristics();
        assert_eq!(aggregate_counts(&tree, "A", &characteristics), (3, 7));
        assert_eq!(aggregate_counts(&tree, "root", &characteristics), (3, 12));
        assert_eq!(aggregate_counts(&tree, "B", &characteristics), (0, 5));
        assert_eq!(aggregate_counts(&tree, "missing", &characteristics), (0, 0));
    }

    #[test]
    fn test_leaf_ids() {
        let tree = sample_tree();
        assert_eq!(leaf_ids(&tree), vec!["A1", "A2", "B"]);
        assert_eq!(leaf_ids(&TypeNode::new("x")), vec!["x"]);
    }

    #[test]
    fn test_build_hierarchy_from_edges() {
        let edges = vec![
            ("A".to_string(), "root".to_string()),
            ("B".to_string(), "root".to_string()),
            ("A2".to_string(), "A".to_string()),
            ("A1".to_string(), "A".to_string()),
            ("X".to_string(), "elsewhere".to_string()),
        ];
        let labels = HashMap::from([("A".to_string(), "Dataset".to_string())]);
        let tree = build_hierarchy("root", &edges, &labels);

        assert_eq!(tree.ids(), vec!["root", "A", "A1", "A2", "B"]);
        assert_eq!(find_node(&tree, "A").unwrap().label.as_deref(), Some("Dataset"));
    }

    #[test]
    fn test_build_hierarchy_survives_cycles() {
        let edges = vec![
            ("A".to_string(), "root".to_string()),
            ("root".to_string(), "A".to_string()),
        ];
        let tree = build_hierarchy("root", &edges, &HashMap::new());
        assert_eq!(tree.ids(), vec!["root", "A"]);
    }
}
