//! Folder registry service
//!
//! Shares one [`Registry`] between concurrent readers and a single mover, and
//! aggregates folders across organizations on a dedicated rayon pool.

use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use rayon::{ThreadPool, ThreadPoolBuilder};
use tracing::{debug, info};

use crate::application::fanout::fan_out;
use crate::application::{ApplicationError, ApplicationResult};
use crate::config::Settings;
use crate::domain::{DomainError, Folder, OrgId, Registry};

/// Service wrapping the registry behind a readers-writer lock.
pub struct FolderService {
    registry: RwLock<Registry>,
    pool: ThreadPool,
}

impl FolderService {
    /// Create a service for an already built registry.
    pub fn new(registry: Registry, settings: &Settings) -> ApplicationResult<Self> {
        let pool = ThreadPoolBuilder::new()
            .num_threads(settings.workers)
            .thread_name(|i| format!("foldertree-worker-{i}"))
            .build()
            .map_err(|e| ApplicationError::OperationFailed {
                context: format!("start worker pool ({} threads)", settings.workers),
                source: Box::new(e),
            })?;
        debug!(
            "FolderService::new: {} organizations, {} worker threads",
            registry.org_ids().len(),
            pool.current_num_threads()
        );
        Ok(Self {
            registry: RwLock::new(registry),
            pool,
        })
    }

    /// Build the registry from records and wrap it.
    pub fn from_records(records: Vec<Folder>, settings: &Settings) -> ApplicationResult<Self> {
        let registry = Registry::new(records)?;
        Self::new(registry, settings)
    }

    fn read(&self, op: &'static str) -> ApplicationResult<RwLockReadGuard<'_, Registry>> {
        self.registry
            .read()
            .map_err(|_| ApplicationError::LockPoisoned(op))
    }

    fn write(&self, op: &'static str) -> ApplicationResult<RwLockWriteGuard<'_, Registry>> {
        self.registry
            .write()
            .map_err(|_| ApplicationError::LockPoisoned(op))
    }

    pub fn org_ids(&self) -> ApplicationResult<Vec<OrgId>> {
        Ok(self.read("org_ids")?.org_ids())
    }

    pub fn get_folders_by_org_id(&self, org_id: &OrgId) -> ApplicationResult<Vec<Folder>> {
        let registry = self.read("get_folders_by_org_id")?;
        Ok(registry.get_folders_by_org_id(org_id)?)
    }

    pub fn get_all_child_folders(&self, org_id: &OrgId, name: &str) -> ApplicationResult<Vec<Folder>> {
        let registry = self.read("get_all_child_folders")?;
        Ok(registry.get_all_child_folders(org_id, name)?)
    }

    pub fn get_named_folder(&self, name: &str) -> ApplicationResult<Folder> {
        let registry = self.read("get_named_folder")?;
        Ok(registry.get_named_folder(name)?.clone())
    }

    /// Relocate a subtree. Holds the write lock for the whole move so no
    /// reader sees a half-relocated subtree.
    pub fn move_folder(&self, name: &str, new_parent_name: &str) -> ApplicationResult<()> {
        let mut registry = self.write("move_folder")?;
        registry.move_folder(name, new_parent_name)?;
        info!("move_folder: {} -> {}", name, new_parent_name);
        Ok(())
    }

    /// All folders of all organizations, one worker per organization.
    ///
    /// Pre-order is kept within each organization. The first worker error
    /// aborts the aggregate and no partial result is returned.
    pub fn get_all_folders(&self) -> ApplicationResult<Vec<Folder>> {
        let guard = self.read("get_all_folders")?;
        let registry: &Registry = &guard;
        let org_ids = registry.org_ids();

        let folders = self.pool.install(|| {
            fan_out(&org_ids, |org_id, cancel| {
                registry
                    .get_org(org_id)
                    .map(|org| org.collect_folders_until(cancel))
            })
        })?;

        debug!(
            "get_all_folders: {} folders from {} organizations",
            folders.len(),
            org_ids.len()
        );
        Ok(folders)
    }

    /// Render one organization's forest as an indented tree.
    pub fn render_tree(&self, org_id: &OrgId) -> ApplicationResult<String> {
        let registry = self.read("render_tree")?;
        Ok(registry.get_org(org_id)?.to_tree().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::dataset::{sample_records, FIRST_ORG_ID, SECOND_ORG_ID};

    fn service() -> FolderService {
        FolderService::from_records(sample_records(), &Settings::default()).unwrap()
    }

    #[test]
    fn given_sample_data_when_getting_all_folders_then_every_folder_once() {
        let service = service();
        let all = service.get_all_folders().unwrap();
        assert_eq!(all.len(), 8);

        let first: Vec<_> = all
            .iter()
            .filter(|f| f.org_id == FIRST_ORG_ID)
            .map(|f| f.name.as_str())
            .collect();
        assert_eq!(
            first,
            vec!["alpha", "bravo", "delta", "echo", "charlie", "foxtrot", "gamma"]
        );
    }

    #[test]
    fn given_two_workers_setting_when_creating_then_pool_sized() {
        let settings = Settings {
            workers: 2,
            ..Settings::default()
        };
        let service = FolderService::from_records(sample_records(), &settings).unwrap();
        assert_eq!(service.pool.current_num_threads(), 2);
    }

    #[test]
    fn given_move_when_querying_then_readers_see_new_paths() {
        let service = service();
        service.move_folder("gamma", "alpha").unwrap();
        service.move_folder("bravo", "gamma").unwrap();

        assert_eq!(
            service.get_named_folder("delta").unwrap().path,
            "alpha.gamma.bravo.delta"
        );
        let all = service.get_all_folders().unwrap();
        assert!(all
            .iter()
            .any(|f| f.name == "echo" && f.path == "alpha.gamma.bravo.echo"));
    }

    #[test]
    fn given_second_org_when_rendering_tree_then_contains_root() {
        let rendered = service().render_tree(&SECOND_ORG_ID).unwrap();
        assert!(rendered.contains("hotel"));
    }

    #[test]
    fn given_unknown_org_when_listing_then_domain_not_found() {
        let err = service().get_folders_by_org_id(&OrgId::random()).unwrap_err();
        assert!(err.domain().is_some_and(DomainError::is_not_found));
    }
}
