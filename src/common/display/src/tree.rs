//! Tree display utilities for query plans.

use std::fmt;

/// A node in a display tree.
///
/// Children are returned as owned handles so that arena-backed trees, whose
/// nodes are addressed by id rather than by reference, can be rendered too.
pub trait TreeNode {
    /// Get the display name of this node.
    fn name(&self) -> String;

    /// Get child nodes.
    fn children(&self) -> Vec<Box<dyn TreeNode + '_>>;

    /// Get additional details to display.
    fn details(&self) -> Option<String> {
        None
    }
}

/// Helper for displaying tree structures.
pub struct DisplayTree<'a> {
    root: &'a dyn TreeNode,
}

impl<'a> DisplayTree<'a> {
    /// Create a new display tree.
    pub fn new(root: &'a dyn TreeNode) -> Self {
        Self { root }
    }

    fn fmt_node(
        f: &mut fmt::Formatter<'_>,
        node: &dyn TreeNode,
        prefix: &str,
        is_last: bool,
    ) -> fmt::Result {
        let connector = if is_last { "└─ " } else { "├─ " };

        write!(f, "{prefix}{connector}{}", node.name())?;
        if let Some(details) = node.details() {
            write!(f, " ({details})")?;
        }
        writeln!(f)?;

        let children = node.children();
        let child_prefix = format!("{prefix}{}", if is_last { "   " } else { "│  " });

        for (i, child) in children.iter().enumerate() {
            let is_last_child = i == children.len() - 1;
            Self::fmt_node(f, child.as_ref(), &child_prefix, is_last_child)?;
        }

        Ok(())
    }
}

impl fmt::Display for DisplayTree<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.root.name())?;
        if let Some(details) = self.root.details() {
            write!(f, " ({details})")?;
        }
        writeln!(f)?;

        let children = self.root.children();
        for (i, child) in children.iter().enumerate() {
            let is_last = i == children.len() - 1;
            Self::fmt_node(f, child.as_ref(), "", is_last)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Index-addressed tree, shaped like the plan arena.
    struct Arena {
        names: Vec<&'static str>,
        children: Vec<Vec<usize>>,
    }

    struct Handle<'a> {
        arena: &'a Arena,
        id: usize,
    }

    impl TreeNode for Handle<'_> {
        fn name(&self) -> String {
            self.arena.names[self.id].to_string()
        }

        fn children(&self) -> Vec<Box<dyn TreeNode + '_>> {
            self.arena.children[self.id]
                .iter()
                .map(|&id| {
                    Box::new(Handle {
                        arena: self.arena,
                        id,
                    }) as Box<dyn TreeNode + '_>
                })
                .collect()
        }

        fn details(&self) -> Option<String> {
            (self.id == 0).then(|| "root".to_string())
        }
    }

    #[test]
    fn test_display_tree() {
        let arena = Arena {
            names: vec!["Join", "Access", "Select", "Access"],
            children: vec![vec![1, 2], vec![], vec![3], vec![]],
        };
        let root = Handle {
            arena: &arena,
            id: 0,
        };

        let output = DisplayTree::new(&root).to_string();
        let lines: Vec<_> = output.lines().collect();

        assert_eq!(lines[0], "Join (root)");
        assert_eq!(lines[1], "├─ Access");
        assert_eq!(lines[2], "└─ Select");
        assert_eq!(lines[3], "   └─ Access");
    }
}
