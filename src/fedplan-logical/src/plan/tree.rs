//! Arena-backed plan tree.
//!
//! Nodes are stored in a `Vec` and addressed by `NodeId`. Every node keeps
//! its parent and ordered children, so restructuring is a matter of updating
//! ids in place. Nodes removed from the tree stay in the arena but are no
//! longer reachable from the root.

use common_display::{DisplayTree, TreeNode};
use common_error::{ensure, FedplanResult};
use serde::{Deserialize, Serialize};

use super::node::{AccessNode, JoinNode, JoinType, NodeKind, NodeType, SelectNode};

/// Index of a node in its `PlanTree`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(usize);

impl NodeId {
    /// Arena index.
    pub const fn index(self) -> usize {
        self.0
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A node with its links.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanNode {
    /// Kind and payload.
    pub kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl PlanNode {
    /// Parent, if any.
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Ordered children.
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

/// A logical plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanTree {
    nodes: Vec<PlanNode>,
    root: NodeId,
}

impl PlanTree {
    /// Create a tree with a single root node.
    pub fn new(root: NodeKind) -> Self {
        Self {
            nodes: vec![PlanNode {
                kind: root,
                parent: None,
                children: Vec::new(),
            }],
            root: NodeId(0),
        }
    }

    /// Root node.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Get a node.
    ///
    /// Ids are only handed out by this tree, so a foreign id is a bug.
    pub fn node(&self, id: NodeId) -> &PlanNode {
        &self.nodes[id.0]
    }

    /// Get a node if the id belongs to this arena.
    pub fn get(&self, id: NodeId) -> Option<&PlanNode> {
        self.nodes.get(id.0)
    }

    /// Kind of a node.
    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.nodes[id.0].kind
    }

    /// Mutable kind of a node.
    pub fn kind_mut(&mut self, id: NodeId) -> &mut NodeKind {
        &mut self.nodes[id.0].kind
    }

    /// Payload-free type of a node.
    pub fn node_type(&self, id: NodeId) -> NodeType {
        self.kind(id).node_type()
    }

    /// Parent of a node.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    /// Children of a node.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    /// First child.
    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.children(id).first().copied()
    }

    /// Last child.
    pub fn last_child(&self, id: NodeId) -> Option<NodeId> {
        self.children(id).last().copied()
    }

    /// JOIN payload.
    pub fn join(&self, id: NodeId) -> Option<&JoinNode> {
        match self.kind(id) {
            NodeKind::Join(j) => Some(j),
            _ => None,
        }
    }

    /// Mutable JOIN payload.
    pub fn join_mut(&mut self, id: NodeId) -> Option<&mut JoinNode> {
        match self.kind_mut(id) {
            NodeKind::Join(j) => Some(j),
            _ => None,
        }
    }

    /// ACCESS payload.
    pub fn access(&self, id: NodeId) -> Option<&AccessNode> {
        match self.kind(id) {
            NodeKind::Access(a) => Some(a),
            _ => None,
        }
    }

    /// Mutable ACCESS payload.
    pub fn access_mut(&mut self, id: NodeId) -> Option<&mut AccessNode> {
        match self.kind_mut(id) {
            NodeKind::Access(a) => Some(a),
            _ => None,
        }
    }

    /// SELECT payload.
    pub fn select(&self, id: NodeId) -> Option<&SelectNode> {
        match self.kind(id) {
            NodeKind::Select(s) => Some(s),
            _ => None,
        }
    }

    fn push(&mut self, kind: NodeKind, parent: Option<NodeId>) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(PlanNode {
            kind,
            parent,
            children: Vec::new(),
        });
        id
    }

    /// Append a new last child under `parent`.
    pub fn add_child(&mut self, parent: NodeId, kind: NodeKind) -> NodeId {
        let id = self.push(kind, Some(parent));
        self.nodes[parent.0].children.push(id);
        id
    }

    /// Insert a new node between `child` and its parent.
    ///
    /// The new node takes `child`'s position among its parent's children, or
    /// becomes the root when `child` was the root.
    pub fn add_as_parent(&mut self, child: NodeId, kind: NodeKind) -> NodeId {
        let old_parent = self.nodes[child.0].parent;
        let id = self.push(kind, old_parent);

        match old_parent {
            Some(p) => {
                for slot in &mut self.nodes[p.0].children {
                    if *slot == child {
                        *slot = id;
                    }
                }
            }
            None => self.root = id,
        }

        self.nodes[id.0].children.push(child);
        self.nodes[child.0].parent = Some(id);
        id
    }

    /// Remove a single-child node, putting its child in its place.
    ///
    /// Returns the promoted child.
    pub fn splice_out(&mut self, id: NodeId) -> FedplanResult<NodeId> {
        ensure!(
            self.children(id).len() == 1,
            InternalError: "cannot splice out node {id} with {} children", self.children(id).len()
        );
        let child = self.nodes[id.0].children[0];
        let parent = self.nodes[id.0].parent;

        match parent {
            Some(p) => {
                for slot in &mut self.nodes[p.0].children {
                    if *slot == id {
                        *slot = child;
                    }
                }
            }
            None => self.root = child,
        }

        self.nodes[child.0].parent = parent;
        self.nodes[id.0].parent = None;
        self.nodes[id.0].children.clear();
        Ok(child)
    }

    /// Swap the inputs of a join.
    ///
    /// The left and right equality expressions are swapped along with the
    /// children and the join type is reversed, so the join keeps its meaning.
    pub fn swap_join_children(&mut self, join: NodeId) -> FedplanResult<()> {
        ensure!(
            self.children(join).len() == 2,
            InternalError: "join {join} has {} children", self.children(join).len()
        );
        let Some(payload) = self.join_mut(join) else {
            return Err(common_error::FedplanError::internal(format!(
                "node {join} is not a join"
            )));
        };
        std::mem::swap(&mut payload.left_expressions, &mut payload.right_expressions);
        payload.join_type = payload.join_type.reverse();
        self.nodes[join.0].children.swap(0, 1);
        Ok(())
    }

    /// Pre-order search from `from` for nodes whose type is in `types`.
    ///
    /// Nodes whose type is in `stop` are reported when they match but not
    /// descended into.
    pub fn find_all(&self, from: NodeId, types: &[NodeType], stop: &[NodeType]) -> Vec<NodeId> {
        let mut found = Vec::new();
        let mut stack = vec![from];
        while let Some(id) = stack.pop() {
            let ty = self.node_type(id);
            if types.contains(&ty) {
                found.push(id);
            }
            if !stop.contains(&ty) {
                stack.extend(self.children(id).iter().rev());
            }
        }
        found
    }

    /// The node a join input reads from.
    ///
    /// Skips SELECT, PROJECT, SORT and DUP-REMOVE nodes. Stops at anything
    /// else.
    pub fn find_join_source_node(&self, id: NodeId) -> NodeId {
        let mut current = id;
        loop {
            match self.node_type(current) {
                NodeType::Select | NodeType::Project | NodeType::Sort | NodeType::DupRemove => {
                    match self.first_child(current) {
                        Some(child) => current = child,
                        None => return current,
                    }
                }
                _ => return current,
            }
        }
    }

    /// The inner input of a LEFT or RIGHT outer join.
    pub fn inner_side_join_node(&self, join: NodeId) -> Option<NodeId> {
        match self.join(join)?.join_type {
            JoinType::LeftOuter => self.last_child(join),
            JoinType::RightOuter => self.first_child(join),
            _ => None,
        }
    }

    /// Number of nodes reachable from the root.
    pub fn node_count(&self) -> usize {
        let mut count = 0;
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            count += 1;
            stack.extend(self.children(id));
        }
        count
    }

    /// Human-readable tree.
    pub fn explain(&self) -> String {
        let root = PlanNodeRef {
            tree: self,
            id: self.root,
        };
        DisplayTree::new(&root).to_string()
    }
}

/// Display handle for one node of a tree.
struct PlanNodeRef<'a> {
    tree: &'a PlanTree,
    id: NodeId,
}

impl TreeNode for PlanNodeRef<'_> {
    fn name(&self) -> String {
        self.tree.node_type(self.id).name().to_string()
    }

    fn children(&self) -> Vec<Box<dyn TreeNode + '_>> {
        self.tree
            .children(self.id)
            .iter()
            .map(|&id| {
                Box::new(PlanNodeRef {
                    tree: self.tree,
                    id,
                }) as Box<dyn TreeNode + '_>
            })
            .collect()
    }

    fn details(&self) -> Option<String> {
        self.tree.kind(self.id).details()
    }
}

impl std::fmt::Display for PlanTree {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.explain())
    }
}

#[cfg(test)]
mod tests {
    use fedplan_core::{DataType, ElementSymbol, GroupSymbol};

    use super::*;
    use crate::criteria::Criteria;
    use crate::expr::{col, lit};

    fn elem(group: &str, name: &str) -> ElementSymbol {
        ElementSymbol::new(GroupSymbol::new(group), name, DataType::Int64)
    }

    fn access(group: &str) -> NodeKind {
        NodeKind::Access(AccessNode::new(GroupSymbol::new(group)))
    }

    fn join_tree(join_type: JoinType) -> (PlanTree, NodeId, NodeId, NodeId) {
        let join = JoinNode::new(join_type)
            .with_equality(col(elem("pm1.g1", "e1")), col(elem("pm2.g1", "e1")));
        let mut tree = PlanTree::new(NodeKind::Join(join));
        let root = tree.root();
        let left = tree.add_child(root, access("pm1.g1"));
        let right = tree.add_child(root, access("pm2.g1"));
        (tree, root, left, right)
    }

    #[test]
    fn test_add_as_parent_keeps_position() {
        let (mut tree, root, left, right) = join_tree(JoinType::Inner);
        let select = tree.add_as_parent(
            left,
            NodeKind::Select(SelectNode::new(Criteria::eq(col(elem("pm1.g1", "e2")), lit(1i64)))),
        );

        assert_eq!(tree.children(root), &[select, right]);
        assert_eq!(tree.parent(select), Some(root));
        assert_eq!(tree.children(select), &[left]);
        assert_eq!(tree.parent(left), Some(select));
    }

    #[test]
    fn test_add_as_parent_of_root() {
        let (mut tree, root, _, _) = join_tree(JoinType::Inner);
        let project = tree.add_as_parent(root, NodeKind::Project { select: vec![] });

        assert_eq!(tree.root(), project);
        assert_eq!(tree.parent(root), Some(project));
        assert_eq!(tree.node_count(), 4);
    }

    #[test]
    fn test_splice_out() {
        let (mut tree, root, left, right) = join_tree(JoinType::Inner);
        let select = tree.add_as_parent(
            right,
            NodeKind::Select(SelectNode::new(Criteria::eq(col(elem("pm2.g1", "e2")), lit(1i64)))),
        );

        let promoted = tree.splice_out(select).unwrap();
        assert_eq!(promoted, right);
        assert_eq!(tree.children(root), &[left, right]);
        assert_eq!(tree.parent(right), Some(root));
        assert_eq!(tree.node_count(), 3);
    }

    #[test]
    fn test_splice_out_rejects_join() {
        let (mut tree, root, _, _) = join_tree(JoinType::Inner);
        assert!(tree.splice_out(root).is_err());
    }

    #[test]
    fn test_swap_join_children() {
        let (mut tree, root, left, right) = join_tree(JoinType::LeftOuter);
        tree.swap_join_children(root).unwrap();

        assert_eq!(tree.children(root), &[right, left]);
        let join = tree.join(root).unwrap();
        assert_eq!(join.join_type, JoinType::RightOuter);
        assert_eq!(join.left_expressions, vec![col(elem("pm2.g1", "e1"))]);
        assert_eq!(join.right_expressions, vec![col(elem("pm1.g1", "e1"))]);
    }

    #[test]
    fn test_swap_rejects_non_join() {
        let (mut tree, _, left, _) = join_tree(JoinType::Inner);
        assert!(tree.swap_join_children(left).is_err());
    }

    #[test]
    fn test_find_all_respects_stop_types() {
        let (mut tree, root, left, _) = join_tree(JoinType::Inner);
        // A join hidden below an access node is not reported.
        let inner = tree.add_child(left, NodeKind::Join(JoinNode::new(JoinType::Inner)));
        tree.add_child(inner, access("pm1.g2"));
        tree.add_child(inner, access("pm1.g3"));

        assert_eq!(tree.find_all(root, &[NodeType::Join], &[NodeType::Access]), vec![root]);
        assert_eq!(tree.find_all(root, &[NodeType::Join], &[]), vec![root, inner]);
    }

    #[test]
    fn test_find_join_source_node() {
        let (mut tree, root, left, right) = join_tree(JoinType::Inner);
        let sort = tree.add_as_parent(left, NodeKind::Sort { keys: vec![] });
        let select = tree.add_as_parent(
            sort,
            NodeKind::Select(SelectNode::new(Criteria::eq(col(elem("pm1.g1", "e2")), lit(1i64)))),
        );

        assert_eq!(tree.find_join_source_node(select), left);
        assert_eq!(tree.find_join_source_node(right), right);
        assert_eq!(tree.find_join_source_node(root), root);

        let group = tree.add_as_parent(right, NodeKind::Group { group_by: vec![] });
        assert_eq!(tree.find_join_source_node(group), group);
    }

    #[test]
    fn test_inner_side_join_node() {
        let (tree, root, _, right) = join_tree(JoinType::LeftOuter);
        assert_eq!(tree.inner_side_join_node(root), Some(right));

        let (tree, root, left, _) = join_tree(JoinType::RightOuter);
        assert_eq!(tree.inner_side_join_node(root), Some(left));

        let (tree, root, _, _) = join_tree(JoinType::Inner);
        assert_eq!(tree.inner_side_join_node(root), None);
    }

    #[test]
    fn test_explain() {
        let (tree, _, _, _) = join_tree(JoinType::Inner);
        let explain = tree.explain();
        let lines: Vec<_> = explain.lines().collect();

        assert_eq!(lines[0], "Join (INNER JOIN, pm1.g1.e1 = pm2.g1.e1)");
        assert_eq!(lines[1], "├─ Access (pm1.g1)");
        assert_eq!(lines[2], "└─ Access (pm2.g1)");
    }
}
