//! Registry: all organizations plus the global folder-name index.

use std::collections::{BTreeMap, HashMap};

use generational_arena::Index;
use tracing::{debug, info, instrument};

use crate::domain::builder::RegistryBuilder;
use crate::domain::entities::{Folder, OrgId, PATH_SEPARATOR};
use crate::domain::error::{DomainError, DomainResult};
use crate::domain::org::Org;

/// Ordered collection of organizations keyed by id.
///
/// Folder names are unique across the whole registry, not just within an
/// organization: name lookups take no organization argument.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    orgs: BTreeMap<OrgId, Org>,
    names: HashMap<String, (OrgId, Index)>,
}

impl Registry {
    /// Build from flat folder records. See [`RegistryBuilder`].
    pub fn new(records: impl IntoIterator<Item = Folder>) -> DomainResult<Self> {
        RegistryBuilder::build_from_records(records)
    }

    pub(crate) fn from_parts(
        orgs: BTreeMap<OrgId, Org>,
        names: HashMap<String, (OrgId, Index)>,
    ) -> Self {
        Self { orgs, names }
    }

    /// Organization ids in registry order.
    pub fn org_ids(&self) -> Vec<OrgId> {
        self.orgs.keys().copied().collect()
    }

    pub fn orgs(&self) -> impl Iterator<Item = &Org> {
        self.orgs.values()
    }

    /// Total number of folders.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn get_org(&self, org_id: &OrgId) -> DomainResult<&Org> {
        self.orgs
            .get(org_id)
            .ok_or(DomainError::OrgNotFound(*org_id))
    }

    /// All folders of one organization in root-ordered pre-order.
    #[instrument(level = "debug", skip(self))]
    pub fn get_folders_by_org_id(&self, org_id: &OrgId) -> DomainResult<Vec<Folder>> {
        let org = self.get_org(org_id)?;
        Ok(org.collect_folders_in_order())
    }

    /// The named folder and all its descendants, in pre-order.
    ///
    /// The name is resolved globally first; a folder that exists but belongs
    /// to another organization is a [`DomainError::CrossTenant`].
    #[instrument(level = "debug", skip(self))]
    pub fn get_all_child_folders(&self, org_id: &OrgId, name: &str) -> DomainResult<Vec<Folder>> {
        self.get_org(org_id)?;

        let (org, idx) = self.name_to_org_folder(name)?;
        if org.org_id() != *org_id {
            return Err(DomainError::CrossTenant {
                name: name.to_string(),
                org_id: *org_id,
            });
        }
        Ok(org.collect_subtree(idx))
    }

    /// Look up a folder by name across all organizations.
    pub fn get_named_folder(&self, name: &str) -> DomainResult<&Folder> {
        let (org, idx) = self.name_to_org_folder(name)?;
        org.node(idx)
            .and_then(|node| node.folder.as_ref())
            .ok_or_else(|| DomainError::FolderNotFound(name.to_string()))
    }

    pub(crate) fn name_to_org_folder(&self, name: &str) -> DomainResult<(&Org, Index)> {
        let (org_id, idx) = self.lookup(name)?;
        let org = self.get_org(&org_id)?;
        debug_assert_eq!(
            org.get_named_folder(name).ok(),
            Some(idx),
            "name index out of sync for {name}"
        );
        Ok((org, idx))
    }

    fn lookup(&self, name: &str) -> DomainResult<(OrgId, Index)> {
        self.names
            .get(name)
            .copied()
            .ok_or_else(|| DomainError::FolderNotFound(name.to_string()))
    }

    /// Relocate the subtree rooted at `name` under `new_parent_name`.
    ///
    /// Paths of the moved folder and every descendant are rewritten to the
    /// new parent's path; names and subtree shape are kept.
    #[instrument(level = "debug", skip(self))]
    pub fn move_folder(&mut self, name: &str, new_parent_name: &str) -> DomainResult<()> {
        let (src_org_id, src_idx) = self.lookup(name)?;
        let (dst_org_id, dst_idx) = self.lookup(new_parent_name)?;

        if src_org_id != dst_org_id {
            return Err(DomainError::CrossTenant {
                name: new_parent_name.to_string(),
                org_id: src_org_id,
            });
        }

        let org = self
            .orgs
            .get_mut(&src_org_id)
            .ok_or(DomainError::OrgNotFound(src_org_id))?;
        let folders = &mut org.folders;

        if folders.is_ancestor_or_self(src_idx, dst_idx) {
            return Err(DomainError::Cycle {
                name: name.to_string(),
                new_parent: new_parent_name.to_string(),
            });
        }

        let current_parent = folders.get_node(src_idx).and_then(|node| node.parent);
        if current_parent == Some(dst_idx) {
            debug!("move_folder: {} already under {}", name, new_parent_name);
            return Ok(());
        }

        let folder_path = |idx: Index, name: &str| {
            folders
                .get_node(idx)
                .and_then(|node| node.folder.as_ref())
                .map(|folder| folder.path.clone())
                .ok_or_else(|| DomainError::FolderNotFound(name.to_string()))
        };
        let old_base = folder_path(src_idx, name)?;
        let new_base = format!(
            "{}{}{}",
            folder_path(dst_idx, new_parent_name)?,
            PATH_SEPARATOR,
            name
        );

        folders.detach(src_idx);
        folders.attach(src_idx, Some(dst_idx));

        let subtree: Vec<Index> = folders.iter_from(src_idx).map(|(idx, _)| idx).collect();
        for idx in &subtree {
            if let Some(node) = folders.get_node_mut(*idx) {
                let relocated = node.folder.as_ref().map(|folder| {
                    let suffix = folder.path.strip_prefix(&old_base).unwrap_or_default();
                    folder.with_path(format!("{new_base}{suffix}"))
                });
                if relocated.is_some() {
                    node.folder = relocated;
                }
            }
        }

        info!(
            "moved {} ({} folders): {} -> {}",
            name,
            subtree.len(),
            old_base,
            new_base
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn org1() -> OrgId {
        "c1556e17-b7c0-45a3-a6ae-9546248fb17a".parse().unwrap()
    }

    fn org2() -> OrgId {
        "38b9879b-f73b-4b0e-b9d9-4fc4c23643a7".parse().unwrap()
    }

    fn registry() -> Registry {
        Registry::new(vec![
            Folder::new("alpha", org1(), "alpha"),
            Folder::new("bravo", org1(), "alpha.bravo"),
            Folder::new("charlie", org1(), "alpha.charlie"),
            Folder::new("hotel", org2(), "hotel"),
        ])
        .unwrap()
    }

    fn path_of(registry: &Registry, name: &str) -> String {
        registry.get_named_folder(name).unwrap().path.clone()
    }

    #[test]
    fn given_registry_when_listing_org_ids_then_sorted() {
        let registry = registry();
        let ids = registry.org_ids();
        assert_eq!(ids.len(), 2);
        assert!(ids[0] < ids[1]);
        assert_eq!(registry.len(), 4);
    }

    #[test]
    fn given_sibling_move_when_moving_then_path_rewritten() {
        let mut registry = registry();
        registry.move_folder("charlie", "bravo").unwrap();

        assert_eq!(path_of(&registry, "charlie"), "alpha.bravo.charlie");
        let (org, idx) = registry.name_to_org_folder("charlie").unwrap();
        let parent = org.node(idx).unwrap().parent.unwrap();
        assert_eq!(org.node(parent).unwrap().key, "bravo");
    }

    #[test]
    fn given_root_when_moving_under_other_root_then_allowed() {
        let mut registry = Registry::new(vec![
            Folder::new("alpha", org1(), "alpha"),
            Folder::new("bravo", org1(), "bravo"),
            Folder::new("charlie", org1(), "bravo.charlie"),
        ])
        .unwrap();

        registry.move_folder("bravo", "alpha").unwrap();

        assert_eq!(path_of(&registry, "bravo"), "alpha.bravo");
        assert_eq!(path_of(&registry, "charlie"), "alpha.bravo.charlie");
        assert_eq!(registry.get_org(&org1()).unwrap().depth(), 3);
    }

    #[test]
    fn given_current_parent_when_moving_then_noop() {
        let mut registry = registry();
        registry.move_folder("bravo", "alpha").unwrap();
        assert_eq!(path_of(&registry, "bravo"), "alpha.bravo");
    }

    #[test]
    fn given_self_as_parent_when_moving_then_cycle() {
        let mut registry = registry();
        let err = registry.move_folder("alpha", "alpha").unwrap_err();
        assert!(matches!(err, DomainError::Cycle { .. }));
    }

    #[test]
    fn given_other_org_parent_when_moving_then_cross_tenant() {
        let mut registry = registry();
        let err = registry.move_folder("bravo", "hotel").unwrap_err();
        assert!(matches!(err, DomainError::CrossTenant { .. }));
        assert_eq!(path_of(&registry, "bravo"), "alpha.bravo");
    }

    #[test]
    fn given_unknown_names_when_moving_then_not_found() {
        let mut registry = registry();
        assert!(registry.move_folder("zulu", "alpha").unwrap_err().is_not_found());
        assert!(registry.move_folder("alpha", "zulu").unwrap_err().is_not_found());
    }
}
