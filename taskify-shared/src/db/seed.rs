/// Initial data bootstrap
///
/// Inserts the fixed priority names and the default (unowned) category
/// names from a declarative JSON file, unless any of the listed rows
/// already exist. Safe to run on every startup.
///
/// # Data file
///
/// ```json
/// {
///   "priorities_names": ["low", "medium", "high"],
///   "categories_names": ["Work", "Personal"]
/// }
/// ```
use std::path::Path;

use serde::Deserialize;
use sqlx::PgPool;
use tracing::info;

use crate::db::filter::Filter;
use crate::db::repo::Repo;
use crate::models::category::{Category, CreateCategory};
use crate::models::priority::{CreatePriority, Priority};

/// Declarative seed payload.
#[derive(Debug, Clone, Deserialize)]
pub struct SeedData {
    pub priorities_names: Vec<String>,
    pub categories_names: Vec<String>,
}

/// Error type for seeding operations.
#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    #[error("failed to read seed file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse seed file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// Loads a [`SeedData`] payload from a JSON file.
pub fn load_seed_file(path: impl AsRef<Path>) -> Result<SeedData, SeedError> {
    let raw = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

/// Applies the seed payload if none of the listed rows exist yet.
///
/// Priorities and default categories are checked independently, each by
/// name, so re-running after a partial deploy only fills the gap.
pub async fn apply_seed_data(pool: &PgPool, data: &SeedData) -> Result<(), SeedError> {
    let repo = Repo::new();

    let existing: Vec<Priority> = repo
        .get_multi(
            pool,
            Some(Filter::new().any("name", data.priorities_names.clone())),
            0,
            None,
        )
        .await?;
    if existing.is_empty() {
        for name in &data.priorities_names {
            repo.create(pool, &CreatePriority { name: name.clone() })
                .await?;
        }
        info!(count = data.priorities_names.len(), "seeded priorities");
    }

    let existing: Vec<Category> = repo
        .get_multi(
            pool,
            Some(Filter::new().any("name", data.categories_names.clone())),
            0,
            None,
        )
        .await?;
    if existing.is_empty() {
        for name in &data.categories_names {
            repo.create(
                pool,
                &CreateCategory {
                    name: name.clone(),
                    created_by_id: None,
                },
            )
            .await?;
        }
        info!(count = data.categories_names.len(), "seeded default categories");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_seed_payload() {
        let data: SeedData = serde_json::from_str(
            r#"{"priorities_names": ["low", "medium", "high"],
                "categories_names": ["Work", "Personal"]}"#,
        )
        .unwrap();
        assert_eq!(data.priorities_names.len(), 3);
        assert_eq!(data.categories_names, vec!["Work", "Personal"]);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = load_seed_file("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, SeedError::Io(_)));
    }
}
