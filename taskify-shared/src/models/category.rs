/// Category model
///
/// A label a user attaches to todos. A NULL owner marks a default category
/// visible to every user; default categories are seeded, never created
/// through the API, and can never be deleted through it either.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE categories (
///     id BIGSERIAL PRIMARY KEY,
///     name TEXT NOT NULL,
///     created_by_id UUID REFERENCES users(id),
///     CONSTRAINT unique_category UNIQUE (name, created_by_id)
/// );
/// ```
use serde::{Deserialize, Serialize};
use sqlx::postgres::PgArguments;
use sqlx::Arguments;
use uuid::Uuid;

use crate::db::repo::{Entity, HasId, Insert};

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Category {
    pub id: i64,

    pub name: String,

    /// Owning user, or `None` for a default/shared category.
    pub created_by_id: Option<Uuid>,
}

impl Category {
    /// Whether this is a default category, visible to everyone.
    pub fn is_default(&self) -> bool {
        self.created_by_id.is_none()
    }
}

impl Entity for Category {
    const TABLE: &'static str = "categories";
    const COLUMNS: &'static str = "id, name, created_by_id";
}

impl HasId for Category {
    type Id = i64;
}

/// Input for creating a category.
#[derive(Debug, Clone)]
pub struct CreateCategory {
    pub name: String,

    /// `None` only for seeded default categories.
    pub created_by_id: Option<Uuid>,
}

impl Insert for CreateCategory {
    type Entity = Category;

    const INSERT_COLUMNS: &'static str = "name, created_by_id";
    const PLACEHOLDERS: &'static str = "$1, $2";

    fn arguments(&self) -> PgArguments {
        let mut args = PgArguments::default();
        args.add(self.name.clone());
        args.add(self.created_by_id);
        args
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_default() {
        let default = Category {
            id: 1,
            name: "Work".to_string(),
            created_by_id: None,
        };
        let owned = Category {
            id: 2,
            name: "Side projects".to_string(),
            created_by_id: Some(Uuid::new_v4()),
        };
        assert!(default.is_default());
        assert!(!owned.is_default());
    }
}
