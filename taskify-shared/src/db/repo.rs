/// Generic repository over Postgres tables
///
/// This module provides uniform CRUD primitives decoupled from business
/// meaning. Entities opt in through small traits describing their table,
/// column list, primary key, insertable columns and updatable columns; the
/// repository then builds the statements and binds the arguments.
///
/// Every operation takes any [`PgExecutor`], so the service layer can run a
/// call against the pool directly or inside a transaction when several
/// writes must commit together (a todo and its join rows, for example).
///
/// # Example
///
/// ```no_run
/// use taskify_shared::db::filter::Filter;
/// use taskify_shared::db::repo::Repo;
/// use taskify_shared::models::category::Category;
/// use sqlx::PgPool;
///
/// # async fn example(pool: PgPool) -> Result<(), sqlx::Error> {
/// let repo = Repo::new();
/// let defaults: Vec<Category> = repo
///     .get_multi(&pool, Some(Filter::new().is_null("created_by_id")), 0, None)
///     .await?;
/// # Ok(())
/// # }
/// ```
use std::fmt::Write as _;

use sqlx::postgres::{PgArguments, PgRow};
use sqlx::{Arguments, Encode, FromRow, PgExecutor, Postgres, Type};

use crate::db::filter::{Changes, Filter};

/// Default number of rows skipped by a listing call.
pub const DEFAULT_SKIP: i64 = 0;

/// Default page size for listing calls.
pub const DEFAULT_LIMIT: i64 = 100;

/// Upper bound for OFFSET/LIMIT values. They are bound as Postgres
/// integers, so anything above `i32::MAX` would overflow in the store.
pub const MAX_PAGE_PARAM: i64 = i32::MAX as i64;

/// A queryable table row.
pub trait Entity: for<'r> FromRow<'r, PgRow> + Send + Unpin {
    /// Table name.
    const TABLE: &'static str;

    /// Comma-separated column list, matching the `FromRow` fields.
    const COLUMNS: &'static str;

    /// Listing order. Primary-key ascending keeps pagination deterministic.
    const ORDER_BY: &'static str = "id";
}

/// An entity addressable by a single primary-key column named `id`.
///
/// The join table has a composite key and therefore only implements
/// [`Entity`]; its rows are removed through cascades or `delete_where`.
pub trait HasId: Entity {
    type Id: Send + for<'q> Encode<'q, Postgres> + Type<Postgres> + 'static;
}

/// An insert specification for an entity.
pub trait Insert: Send + Sync {
    type Entity: Entity;

    /// Columns written by the insert, comma-separated.
    const INSERT_COLUMNS: &'static str;

    /// Placeholder list matching `INSERT_COLUMNS`, e.g. `"$1, $2"`.
    const PLACEHOLDERS: &'static str;

    /// Binds the insert values in `INSERT_COLUMNS` order.
    fn arguments(&self) -> PgArguments;
}

/// A typed partial update for an entity.
///
/// The change set is an explicit column list; identity and ownership
/// columns are simply not part of it and can never be overwritten.
pub trait Update: Send + Sync {
    type Entity: HasId;

    /// Primary key of the row to update.
    fn id(&self) -> <Self::Entity as HasId>::Id;

    /// The columns to overwrite.
    fn changes(&self) -> Changes;
}

/// Stateless CRUD primitives over any [`Entity`].
#[derive(Debug, Clone, Copy, Default)]
pub struct Repo;

impl Repo {
    pub fn new() -> Self {
        Self
    }

    /// Retrieves the first row matching `filter`, or `None`.
    ///
    /// Zero matches is not an error.
    pub async fn get<'e, E, X>(
        &self,
        executor: X,
        filter: Option<Filter>,
    ) -> Result<Option<E>, sqlx::Error>
    where
        E: Entity,
        X: PgExecutor<'e>,
    {
        let (clause, arguments) = match filter {
            Some(f) if !f.is_empty() => {
                let (clause, arguments, _) = f.into_parts();
                (Some(clause), arguments)
            }
            _ => (None, PgArguments::default()),
        };
        let sql = select_statement(E::TABLE, E::COLUMNS, clause.as_deref(), None);

        sqlx::query_as_with::<_, E, _>(&sql, arguments)
            .fetch_optional(executor)
            .await
    }

    /// Retrieves rows matching `filter`, after `skip` and capped at `limit`.
    ///
    /// Results come back in primary-key order. Out-of-range paging values
    /// are clamped to `0..=MAX_PAGE_PARAM`; user-facing range errors are the
    /// caller's concern.
    pub async fn get_multi<'e, E, X>(
        &self,
        executor: X,
        filter: Option<Filter>,
        skip: i64,
        limit: Option<i64>,
    ) -> Result<Vec<E>, sqlx::Error>
    where
        E: Entity,
        X: PgExecutor<'e>,
    {
        let (clause, mut arguments, mut params) = match filter {
            Some(f) if !f.is_empty() => {
                let (clause, arguments, params) = f.into_parts();
                (Some(clause), arguments, params)
            }
            _ => (None, PgArguments::default(), 0),
        };

        let mut sql = select_statement(E::TABLE, E::COLUMNS, clause.as_deref(), Some(E::ORDER_BY));

        params += 1;
        let _ = write!(sql, " OFFSET ${}", params);
        arguments.add(skip.clamp(0, MAX_PAGE_PARAM));

        if let Some(limit) = limit {
            params += 1;
            let _ = write!(sql, " LIMIT ${}", params);
            arguments.add(limit.clamp(0, MAX_PAGE_PARAM));
        }

        sqlx::query_as_with::<_, E, _>(&sql, arguments)
            .fetch_all(executor)
            .await
    }

    /// Persists an insert specification and returns the stored row with its
    /// generated columns populated.
    ///
    /// Store constraint violations (foreign keys, uniqueness) surface as
    /// `sqlx::Error`; translating them into domain errors is the service
    /// layer's job.
    pub async fn create<'e, I, X>(&self, executor: X, obj: &I) -> Result<I::Entity, sqlx::Error>
    where
        I: Insert,
        X: PgExecutor<'e>,
    {
        let sql = insert_statement(
            <I::Entity as Entity>::TABLE,
            I::INSERT_COLUMNS,
            I::PLACEHOLDERS,
            <I::Entity as Entity>::COLUMNS,
        );

        sqlx::query_as_with::<_, I::Entity, _>(&sql, obj.arguments())
            .fetch_one(executor)
            .await
    }

    /// Applies a typed partial update and returns the refreshed row, or
    /// `None` when no row matched the id.
    ///
    /// An empty change set degenerates to a point lookup.
    pub async fn update<'e, U, X>(
        &self,
        executor: X,
        obj: &U,
    ) -> Result<Option<U::Entity>, sqlx::Error>
    where
        U: Update,
        X: PgExecutor<'e>,
    {
        let changes = obj.changes();
        if changes.is_empty() {
            return self
                .get(executor, Some(Filter::new().eq("id", obj.id())))
                .await;
        }

        let (set_clause, mut arguments, mut params) = changes.into_parts();
        params += 1;
        let sql = update_statement(
            <U::Entity as Entity>::TABLE,
            &set_clause,
            params,
            <U::Entity as Entity>::COLUMNS,
        );
        arguments.add(obj.id());

        sqlx::query_as_with::<_, U::Entity, _>(&sql, arguments)
            .fetch_optional(executor)
            .await
    }

    /// Deletes a row by primary key. A missing row is a no-op, not an error.
    pub async fn delete<'e, E, X>(
        &self,
        executor: X,
        id: E::Id,
    ) -> Result<(), sqlx::Error>
    where
        E: HasId,
        X: PgExecutor<'e>,
    {
        let sql = format!("DELETE FROM {} WHERE id = $1", E::TABLE);
        let mut arguments = PgArguments::default();
        arguments.add(id);

        sqlx::query_with(&sql, arguments).execute(executor).await?;
        Ok(())
    }

    /// Deletes all rows matching `filter` and returns how many went away.
    pub async fn delete_where<'e, E, X>(
        &self,
        executor: X,
        filter: Filter,
    ) -> Result<u64, sqlx::Error>
    where
        E: Entity,
        X: PgExecutor<'e>,
    {
        let (clause, arguments, _) = filter.into_parts();
        let sql = format!("DELETE FROM {} WHERE {}", E::TABLE, clause);

        let result = sqlx::query_with(&sql, arguments).execute(executor).await?;
        Ok(result.rows_affected())
    }
}

fn select_statement(
    table: &str,
    columns: &str,
    filter: Option<&str>,
    order_by: Option<&str>,
) -> String {
    let mut sql = format!("SELECT {} FROM {}", columns, table);
    if let Some(clause) = filter {
        let _ = write!(sql, " WHERE {}", clause);
    }
    if let Some(order) = order_by {
        let _ = write!(sql, " ORDER BY {}", order);
    }
    sql
}

fn insert_statement(
    table: &str,
    insert_columns: &str,
    placeholders: &str,
    returning: &str,
) -> String {
    format!(
        "INSERT INTO {} ({}) VALUES ({}) RETURNING {}",
        table, insert_columns, placeholders, returning
    )
}

fn update_statement(table: &str, set_clause: &str, id_param: usize, returning: &str) -> String {
    format!(
        "UPDATE {} SET {} WHERE id = ${} RETURNING {}",
        table, set_clause, id_param, returning
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_statement_plain() {
        assert_eq!(
            select_statement("priorities", "id, name", None, Some("id")),
            "SELECT id, name FROM priorities ORDER BY id"
        );
    }

    #[test]
    fn test_select_statement_with_filter() {
        assert_eq!(
            select_statement("categories", "id, name, created_by_id", Some("id = $1"), None),
            "SELECT id, name, created_by_id FROM categories WHERE id = $1"
        );
    }

    #[test]
    fn test_insert_statement() {
        assert_eq!(
            insert_statement("categories", "name, created_by_id", "$1, $2", "id, name, created_by_id"),
            "INSERT INTO categories (name, created_by_id) VALUES ($1, $2) \
             RETURNING id, name, created_by_id"
        );
    }

    #[test]
    fn test_update_statement() {
        assert_eq!(
            update_statement("todos", "content = $1, is_completed = $2", 3, "id, content"),
            "UPDATE todos SET content = $1, is_completed = $2 WHERE id = $3 RETURNING id, content"
        );
    }
}
