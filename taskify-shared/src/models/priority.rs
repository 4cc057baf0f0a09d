/// Priority model
///
/// Fixed reference lookup ("low"/"medium"/"high"), seeded at startup and
/// read-only from the service's perspective.
use serde::{Deserialize, Serialize};
use sqlx::postgres::PgArguments;
use sqlx::Arguments;

use crate::db::repo::{Entity, HasId, Insert};

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Priority {
    pub id: i64,

    /// Unique priority name.
    pub name: String,
}

impl Entity for Priority {
    const TABLE: &'static str = "priorities";
    const COLUMNS: &'static str = "id, name";
}

impl HasId for Priority {
    type Id = i64;
}

/// Input for seeding a priority row.
#[derive(Debug, Clone)]
pub struct CreatePriority {
    pub name: String,
}

impl Insert for CreatePriority {
    type Entity = Priority;

    const INSERT_COLUMNS: &'static str = "name";
    const PLACEHOLDERS: &'static str = "$1";

    fn arguments(&self) -> PgArguments {
        let mut args = PgArguments::default();
        args.add(self.name.clone());
        args
    }
}
