/// Todo model and its category join rows
///
/// A todo belongs to exactly one user and references exactly one priority.
/// Its category associations live in the `todos_categories` join table and
/// cascade away when either parent is deleted.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE todos (
///     id BIGSERIAL PRIMARY KEY,
///     is_completed BOOLEAN NOT NULL DEFAULT FALSE,
///     content TEXT NOT NULL,
///     created_by_id UUID NOT NULL REFERENCES users(id),
///     priority_id BIGINT NOT NULL REFERENCES priorities(id)
/// );
///
/// CREATE TABLE todos_categories (
///     todo_id BIGINT NOT NULL REFERENCES todos(id) ON DELETE CASCADE,
///     category_id BIGINT NOT NULL REFERENCES categories(id) ON DELETE CASCADE,
///     PRIMARY KEY (todo_id, category_id)
/// );
/// ```
use serde::{Deserialize, Serialize};
use sqlx::postgres::PgArguments;
use sqlx::Arguments;
use uuid::Uuid;

use crate::db::filter::Changes;
use crate::db::repo::{Entity, HasId, Insert, Update};

/// A task row.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Todo {
    pub id: i64,

    pub is_completed: bool,

    /// Free-text task content.
    pub content: String,

    /// Owning user; determines mutation rights.
    pub created_by_id: Uuid,

    /// Must reference an existing priority (enforced by the store).
    pub priority_id: i64,
}

impl Entity for Todo {
    const TABLE: &'static str = "todos";
    const COLUMNS: &'static str = "id, is_completed, content, created_by_id, priority_id";
}

impl HasId for Todo {
    type Id = i64;
}

/// Input for inserting the todo row itself. Join rows are written
/// separately, in the same transaction.
#[derive(Debug, Clone)]
pub struct CreateTodo {
    pub content: String,
    pub created_by_id: Uuid,
    pub priority_id: i64,
}

impl Insert for CreateTodo {
    type Entity = Todo;

    const INSERT_COLUMNS: &'static str = "content, created_by_id, priority_id";
    const PLACEHOLDERS: &'static str = "$1, $2, $3";

    fn arguments(&self) -> PgArguments {
        let mut args = PgArguments::default();
        args.add(self.content.clone());
        args.add(self.created_by_id);
        args.add(self.priority_id);
        args
    }
}

/// Typed partial update for a todo row.
///
/// The change set deliberately excludes `id` and `created_by_id`; an
/// update can never reassign a todo to another user.
#[derive(Debug, Clone)]
pub struct UpdateTodo {
    pub id: i64,
    pub content: String,
    pub is_completed: bool,
    pub priority_id: i64,
}

impl Update for UpdateTodo {
    type Entity = Todo;

    fn id(&self) -> i64 {
        self.id
    }

    fn changes(&self) -> Changes {
        Changes::new()
            .set("content", self.content.clone())
            .set("is_completed", self.is_completed)
            .set("priority_id", self.priority_id)
    }
}

/// One (todo, category) association. Composite primary key, so the row is
/// addressed through filters rather than a single id.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct TodoCategory {
    pub todo_id: i64,
    pub category_id: i64,
}

impl Entity for TodoCategory {
    const TABLE: &'static str = "todos_categories";
    const COLUMNS: &'static str = "todo_id, category_id";
    const ORDER_BY: &'static str = "todo_id, category_id";
}

/// Input for one join row.
#[derive(Debug, Clone)]
pub struct CreateTodoCategory {
    pub todo_id: i64,
    pub category_id: i64,
}

impl Insert for CreateTodoCategory {
    type Entity = TodoCategory;

    const INSERT_COLUMNS: &'static str = "todo_id, category_id";
    const PLACEHOLDERS: &'static str = "$1, $2";

    fn arguments(&self) -> PgArguments {
        let mut args = PgArguments::default();
        args.add(self.todo_id);
        args.add(self.category_id);
        args
    }
}
