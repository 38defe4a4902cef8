use std::collections::BTreeMap;

use generational_arena::{Arena, Index};
use termtree::Tree;
use tracing::instrument;

use crate::domain::entities::Folder;

/// Tree node in the arena-based folder forest.
#[derive(Debug, Clone)]
pub struct FolderTreeNode {
    /// Name segment this node is keyed by in its parent (or the root set)
    pub key: String,
    /// Folder payload, None for placeholders created ahead of their record
    pub folder: Option<Folder>,
    /// Index of parent node in the arena, None for root nodes
    pub parent: Option<Index>,
    /// Child node indices ordered by name
    pub children: BTreeMap<String, Index>,
}

/// Arena-based forest of folder trees.
///
/// Roots and children are keyed by name in `BTreeMap`s so every traversal
/// is deterministic. Nodes keep a non-owning parent index for relocation.
#[derive(Debug, Clone, Default)]
pub struct FolderArena {
    arena: Arena<FolderTreeNode>,
    roots: BTreeMap<String, Index>,
}

impl FolderArena {
    pub fn new() -> Self {
        Self::default()
    }

    #[instrument(level = "trace", skip(self, folder))]
    pub fn insert_node(&mut self, key: &str, folder: Option<Folder>, parent: Option<Index>) -> Index {
        let node = FolderTreeNode {
            key: key.to_string(),
            folder,
            parent,
            children: BTreeMap::new(),
        };
        let node_idx = self.arena.insert(node);
        self.link(node_idx, parent);
        node_idx
    }

    pub fn get_node(&self, idx: Index) -> Option<&FolderTreeNode> {
        self.arena.get(idx)
    }

    pub fn get_node_mut(&mut self, idx: Index) -> Option<&mut FolderTreeNode> {
        self.arena.get_mut(idx)
    }

    /// Root indices in name order.
    pub fn roots(&self) -> impl DoubleEndedIterator<Item = Index> + '_ {
        self.roots.values().copied()
    }

    /// Number of nodes carrying a folder.
    pub fn len(&self) -> usize {
        self.arena
            .iter()
            .filter(|(_, node)| node.folder.is_some())
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Pre-order iterator over the whole forest, roots in name order.
    pub fn iter(&self) -> PreOrderIterator<'_> {
        PreOrderIterator::new(self, self.roots.values().rev().copied().collect())
    }

    /// Pre-order iterator over the subtree rooted at `idx`, `idx` included.
    pub fn iter_from(&self, idx: Index) -> PreOrderIterator<'_> {
        PreOrderIterator::new(self, vec![idx])
    }

    #[instrument(level = "debug", skip(self))]
    pub fn depth(&self) -> usize {
        self.roots()
            .map(|root| self.calculate_depth(root))
            .max()
            .unwrap_or(0)
    }

    fn calculate_depth(&self, node_idx: Index) -> usize {
        match self.get_node(node_idx) {
            Some(node) => {
                1 + node
                    .children
                    .values()
                    .map(|&child| self.calculate_depth(child))
                    .max()
                    .unwrap_or(0)
            }
            None => 0,
        }
    }

    /// True if `ancestor` is `idx` itself or lies on its parent chain.
    pub fn is_ancestor_or_self(&self, ancestor: Index, idx: Index) -> bool {
        let mut current = Some(idx);
        while let Some(cur) = current {
            if cur == ancestor {
                return true;
            }
            current = self.get_node(cur).and_then(|node| node.parent);
        }
        false
    }

    /// Unhook a node from its parent's children (or the root set).
    /// The node and its subtree stay in the arena.
    #[instrument(level = "trace", skip(self))]
    pub fn detach(&mut self, idx: Index) {
        let Some(node) = self.arena.get(idx) else {
            return;
        };
        let key = node.key.clone();
        match node.parent {
            Some(parent_idx) => {
                if let Some(parent) = self.arena.get_mut(parent_idx) {
                    parent.children.remove(&key);
                }
            }
            None => {
                self.roots.remove(&key);
            }
        }
        if let Some(node) = self.arena.get_mut(idx) {
            node.parent = None;
        }
    }

    /// Hook a detached node under `parent`, or into the root set.
    #[instrument(level = "trace", skip(self))]
    pub fn attach(&mut self, idx: Index, parent: Option<Index>) {
        if let Some(node) = self.arena.get_mut(idx) {
            node.parent = parent;
        }
        self.link(idx, parent);
    }

    fn link(&mut self, idx: Index, parent: Option<Index>) {
        let Some(key) = self.arena.get(idx).map(|node| node.key.clone()) else {
            return;
        };
        match parent {
            Some(parent_idx) => {
                if let Some(parent) = self.arena.get_mut(parent_idx) {
                    parent.children.insert(key, idx);
                }
            }
            None => {
                self.roots.insert(key, idx);
            }
        }
    }

    /// Render the forest under a single label, one leaf per root.
    pub fn to_tree(&self, label: String) -> Tree<String> {
        let leaves: Vec<_> = self.roots().map(|root| self.subtree(root)).collect();
        Tree::new(label).with_leaves(leaves)
    }

    fn subtree(&self, idx: Index) -> Tree<String> {
        let Some(node) = self.get_node(idx) else {
            return Tree::new(String::new());
        };
        let leaves: Vec<_> = node
            .children
            .values()
            .map(|&child| self.subtree(child))
            .collect();
        Tree::new(node.key.clone()).with_leaves(leaves)
    }
}

/// Stack-based pre-order traversal.
///
/// Children are pushed in descending name order so that popping yields
/// ascending pre-order.
pub struct PreOrderIterator<'a> {
    arena: &'a FolderArena,
    stack: Vec<Index>,
}

impl<'a> PreOrderIterator<'a> {
    fn new(arena: &'a FolderArena, stack: Vec<Index>) -> Self {
        Self { arena, stack }
    }
}

impl<'a> Iterator for PreOrderIterator<'a> {
    type Item = (Index, &'a FolderTreeNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(current_idx) = self.stack.pop() {
            if let Some(node) = self.arena.get_node(current_idx) {
                self.stack.extend(node.children.values().rev().copied());
                return Some((current_idx, node));
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::OrgId;

    fn folder(name: &str, path: &str) -> Option<Folder> {
        Some(Folder::new(name, OrgId::random(), path))
    }

    fn keys(arena: &FolderArena) -> Vec<String> {
        arena.iter().map(|(_, node)| node.key.clone()).collect()
    }

    #[test]
    fn given_unordered_inserts_when_iterating_then_yields_sorted_preorder() {
        let mut arena = FolderArena::new();
        let zulu = arena.insert_node("zulu", folder("zulu", "zulu"), None);
        let alpha = arena.insert_node("alpha", folder("alpha", "alpha"), None);
        arena.insert_node("charlie", folder("charlie", "alpha.charlie"), Some(alpha));
        arena.insert_node("bravo", folder("bravo", "alpha.bravo"), Some(alpha));
        arena.insert_node("yankee", folder("yankee", "zulu.yankee"), Some(zulu));

        assert_eq!(keys(&arena), vec!["alpha", "bravo", "charlie", "zulu", "yankee"]);
        assert_eq!(arena.depth(), 2);
        assert_eq!(arena.len(), 5);
    }

    #[test]
    fn given_placeholder_when_counting_then_excluded() {
        let mut arena = FolderArena::new();
        let root = arena.insert_node("alpha", None, None);
        arena.insert_node("bravo", folder("bravo", "alpha.bravo"), Some(root));

        assert_eq!(arena.len(), 1);
        assert_eq!(arena.iter().count(), 2);
    }

    #[test]
    fn given_subtree_when_detached_and_attached_then_moves_with_children() {
        let mut arena = FolderArena::new();
        let alpha = arena.insert_node("alpha", folder("alpha", "alpha"), None);
        let bravo = arena.insert_node("bravo", folder("bravo", "alpha.bravo"), Some(alpha));
        let charlie = arena.insert_node("charlie", folder("charlie", "alpha.charlie"), Some(alpha));
        arena.insert_node("delta", folder("delta", "alpha.charlie.delta"), Some(charlie));

        arena.detach(charlie);
        arena.attach(charlie, Some(bravo));

        assert_eq!(keys(&arena), vec!["alpha", "bravo", "charlie", "delta"]);
        assert_eq!(arena.get_node(charlie).unwrap().parent, Some(bravo));
        assert!(arena.is_ancestor_or_self(alpha, charlie));
        assert!(arena.is_ancestor_or_self(bravo, charlie));
        assert!(!arena.is_ancestor_or_self(charlie, bravo));
        assert_eq!(arena.depth(), 4);
    }

    #[test]
    fn given_forest_when_rendering_then_lists_roots_as_leaves() {
        let mut arena = FolderArena::new();
        let alpha = arena.insert_node("alpha", folder("alpha", "alpha"), None);
        arena.insert_node("bravo", folder("bravo", "alpha.bravo"), Some(alpha));

        let rendered = arena.to_tree("org".to_string()).to_string();
        assert!(rendered.starts_with("org"));
        assert!(rendered.contains("alpha"));
        assert!(rendered.contains("bravo"));
    }
}
