//! Registry builder: turns flat path-encoded folder records into per-organization forests.

use std::collections::{BTreeMap, HashMap};

use generational_arena::Index;
use tracing::{debug, instrument};

use crate::domain::entities::{Folder, OrgId, PATH_SEPARATOR};
use crate::domain::error::{DomainError, DomainResult};
use crate::domain::org::Org;
use crate::domain::registry::Registry;

/// Constructs a [`Registry`] from folder records.
///
/// Records may arrive in any order: an ancestor that has not been seen yet is
/// created as a folderless placeholder and filled when its own record arrives.
/// Placeholders left empty make [`RegistryBuilder::build`] fail.
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    orgs: BTreeMap<OrgId, Org>,
    names: HashMap<String, (OrgId, Index)>,
    paths: HashMap<(OrgId, String), Index>,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry in one go.
    pub fn build_from_records(records: impl IntoIterator<Item = Folder>) -> DomainResult<Registry> {
        let mut builder = Self::new();
        for record in records {
            builder.add(record)?;
        }
        builder.build()
    }

    /// Add one record, creating its organization and missing ancestors on demand.
    #[instrument(level = "trace", skip(self), fields(name = %record.name, path = %record.path))]
    pub fn add(&mut self, record: Folder) -> DomainResult<()> {
        validate_record(&record)?;

        if let Some((other_org, _)) = self.names.get(&record.name) {
            return Err(DomainError::validation(
                &record.path,
                format!(
                    "folder name '{}' already used in organization {}",
                    record.name, other_org
                ),
            ));
        }

        let org_id = record.org_id;
        let org = self
            .orgs
            .entry(org_id)
            .or_insert_with(|| Org::new(org_id));

        let segments: Vec<&str> = record.segments().collect();
        let last = segments.len() - 1;
        let mut prefix = String::with_capacity(record.path.len());
        let mut parent: Option<Index> = None;

        for (i, segment) in segments.iter().enumerate() {
            if i > 0 {
                prefix.push(PATH_SEPARATOR);
            }
            prefix.push_str(segment);
            let payload = (i == last).then(|| record.clone());

            let idx = match self.paths.get(&(org_id, prefix.clone())) {
                Some(&idx) => {
                    if let Some(folder) = payload {
                        let node = org.folders.get_node_mut(idx).ok_or_else(|| {
                            DomainError::validation(&record.path, "dangling node index")
                        })?;
                        if node.folder.is_some() {
                            return Err(DomainError::validation(&record.path, "duplicate path"));
                        }
                        node.folder = Some(folder);
                    }
                    idx
                }
                None => {
                    let idx = org.folders.insert_node(segment, payload, parent);
                    self.paths.insert((org_id, prefix.clone()), idx);
                    idx
                }
            };
            parent = Some(idx);
        }

        if let Some(idx) = parent {
            self.names.insert(record.name, (org_id, idx));
        }
        Ok(())
    }

    /// Finish construction. Fails if any ancestor was referenced but never defined.
    pub fn build(self) -> DomainResult<Registry> {
        let mut missing: Vec<&str> = self
            .paths
            .iter()
            .filter(|((org_id, _), idx)| {
                self.orgs
                    .get(org_id)
                    .and_then(|org| org.node(**idx))
                    .is_some_and(|node| node.folder.is_none())
            })
            .map(|((_, path), _)| path.as_str())
            .collect();
        missing.sort_unstable();

        if let Some(path) = missing.first() {
            return Err(DomainError::validation(
                *path,
                "missing ancestor: no folder record defines this path",
            ));
        }

        debug!(
            "build: {} organizations, {} folders",
            self.orgs.len(),
            self.names.len()
        );
        Ok(Registry::from_parts(self.orgs, self.names))
    }
}

fn validate_record(record: &Folder) -> DomainResult<()> {
    if record.name.is_empty() {
        return Err(DomainError::validation(&record.path, "empty folder name"));
    }
    if record.name.contains(PATH_SEPARATOR) {
        return Err(DomainError::validation(
            &record.path,
            format!("folder name '{}' contains '{}'", record.name, PATH_SEPARATOR),
        ));
    }
    if record.segments().any(str::is_empty) {
        return Err(DomainError::validation(&record.path, "empty path segment"));
    }
    if record.segments().last() != Some(record.name.as_str()) {
        return Err(DomainError::validation(
            &record.path,
            format!("last path segment does not match name '{}'", record.name),
        ));
    }
    Ok(())
}
