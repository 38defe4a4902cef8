//! Per-tenant folder forest.

use std::sync::atomic::{AtomicBool, Ordering};

use generational_arena::Index;
use termtree::Tree;
use tracing::{debug, instrument};

use crate::domain::arena::{FolderArena, FolderTreeNode};
use crate::domain::entities::{Folder, OrgId};
use crate::domain::error::{DomainError, DomainResult};

/// One organization and its ordered forest of root folders.
#[derive(Debug, Clone)]
pub struct Org {
    org_id: OrgId,
    pub(crate) folders: FolderArena,
}

impl Org {
    pub fn new(org_id: OrgId) -> Self {
        Self {
            org_id,
            folders: FolderArena::new(),
        }
    }

    pub fn org_id(&self) -> OrgId {
        self.org_id
    }

    /// Number of folders in the forest.
    pub fn len(&self) -> usize {
        self.folders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.folders.is_empty()
    }

    pub fn depth(&self) -> usize {
        self.folders.depth()
    }

    pub fn node(&self, idx: Index) -> Option<&FolderTreeNode> {
        self.folders.get_node(idx)
    }

    /// All folders in root-ordered pre-order.
    #[instrument(level = "debug", skip(self), fields(org_id = %self.org_id))]
    pub fn collect_folders_in_order(&self) -> Vec<Folder> {
        collect(self.folders.iter())
    }

    /// Like [`Org::collect_folders_in_order`], but gives up once `cancel` is raised.
    /// Returns None when cancelled.
    pub fn collect_folders_until(&self, cancel: &AtomicBool) -> Option<Vec<Folder>> {
        let mut folders = Vec::new();
        for (_, node) in self.folders.iter() {
            if cancel.load(Ordering::Relaxed) {
                debug!("collect_folders_until: cancelled org={}", self.org_id);
                return None;
            }
            if let Some(folder) = &node.folder {
                folders.push(folder.clone());
            }
        }
        Some(folders)
    }

    /// The folder at `idx` and all its descendants, in pre-order.
    pub fn collect_subtree(&self, idx: Index) -> Vec<Folder> {
        collect(self.folders.iter_from(idx))
    }

    /// Locate a folder node by name with a pre-order search over this forest.
    #[instrument(level = "trace", skip(self), fields(org_id = %self.org_id))]
    pub fn get_named_folder(&self, name: &str) -> DomainResult<Index> {
        self.folders
            .iter()
            .find(|(_, node)| node.folder.as_ref().is_some_and(|f| f.name == name))
            .map(|(idx, _)| idx)
            .ok_or_else(|| DomainError::FolderNotFound(name.to_string()))
    }

    pub fn to_tree(&self) -> Tree<String> {
        self.folders.to_tree(self.org_id.to_string())
    }
}

fn collect<'a>(nodes: impl Iterator<Item = (Index, &'a FolderTreeNode)>) -> Vec<Folder> {
    nodes
        .filter_map(|(_, node)| node.folder.clone())
        .collect()
}
