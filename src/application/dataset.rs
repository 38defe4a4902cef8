//! Folder record datasets
//!
//! Records are read from a TOML file of `[[folders]]` tables:
//!
//! ```toml
//! [[folders]]
//! name = "alpha"
//! org_id = "c1556e17-b7c0-45a3-a6ae-9546248fb17a"
//! path = "alpha"
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::uuid;

use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::domain::{Folder, OrgId};

pub const FIRST_ORG_ID: OrgId = OrgId::new(uuid!("c1556e17-b7c0-45a3-a6ae-9546248fb17a"));
pub const SECOND_ORG_ID: OrgId = OrgId::new(uuid!("38b9879b-f73b-4b0e-b9d9-4fc4c23643a7"));

#[derive(Debug, Default, Serialize, Deserialize)]
struct Dataset {
    #[serde(default)]
    folders: Vec<Folder>,
}

/// Load folder records from a TOML dataset file.
pub fn load_records(path: &Path) -> ApplicationResult<Vec<Folder>> {
    let content = std::fs::read_to_string(path).with_path_context("read dataset", path)?;
    let records = parse_records(&content).map_err(|message| ApplicationError::Dataset {
        path: path.display().to_string(),
        message,
    })?;
    debug!("load_records: {} records from {}", records.len(), path.display());
    Ok(records)
}

fn parse_records(content: &str) -> Result<Vec<Folder>, String> {
    toml::from_str::<Dataset>(content)
        .map(|dataset| dataset.folders)
        .map_err(|e| e.to_string())
}

/// Serialize records into the dataset format read by [`load_records`].
pub fn to_toml(records: &[Folder]) -> ApplicationResult<String> {
    let dataset = Dataset {
        folders: records.to_vec(),
    };
    toml::to_string_pretty(&dataset).map_err(|e| ApplicationError::Config {
        message: format!("serialize dataset: {e}"),
    })
}

/// Built-in dataset: two organizations, eight folders.
pub fn sample_records() -> Vec<Folder> {
    let first = FIRST_ORG_ID;
    let second = SECOND_ORG_ID;
    vec![
        Folder::new("alpha", first, "alpha"),
        Folder::new("bravo", first, "alpha.bravo"),
        Folder::new("charlie", first, "alpha.charlie"),
        Folder::new("delta", first, "alpha.bravo.delta"),
        Folder::new("echo", first, "alpha.bravo.echo"),
        Folder::new("foxtrot", first, "alpha.charlie.foxtrot"),
        Folder::new("gamma", first, "alpha.charlie.gamma"),
        Folder::new("hotel", second, "hotel"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_sample_ids_when_displayed_then_canonical_form() {
        assert_eq!(FIRST_ORG_ID.to_string(), "c1556e17-b7c0-45a3-a6ae-9546248fb17a");
        assert_ne!(FIRST_ORG_ID, SECOND_ORG_ID);
    }

    #[test]
    fn given_toml_dataset_when_parsing_then_reads_all_records() {
        let content = format!(
            r#"
[[folders]]
name = "alpha"
org_id = "{FIRST_ORG_ID}"
path = "alpha"

[[folders]]
name = "hotel"
org_id = "{SECOND_ORG_ID}"
path = "hotel"
"#
        );
        let records = parse_records(&content).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].org_id, SECOND_ORG_ID);
    }

    #[test]
    fn given_bad_org_id_when_parsing_then_errors() {
        let content = r#"
[[folders]]
name = "alpha"
org_id = "nope"
path = "alpha"
"#;
        assert!(parse_records(content).is_err());
    }

    #[test]
    fn given_empty_file_when_parsing_then_no_records() {
        assert!(parse_records("").unwrap().is_empty());
    }

    #[test]
    fn given_sample_records_when_serialized_then_parses_back_identically() {
        let records = sample_records();
        let content = to_toml(&records).unwrap();
        assert_eq!(parse_records(&content).unwrap(), records);
    }
}
