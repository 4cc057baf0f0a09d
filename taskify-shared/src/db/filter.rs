/// Composable SQL fragment builders for the generic repository
///
/// `Filter` builds a WHERE clause together with its bound arguments, and
/// `Changes` builds the SET list of an UPDATE statement. Both keep the
/// placeholder counter and the `PgArguments` buffer in lockstep so the
/// repository can splice them into a full statement and append its own
/// parameters (OFFSET/LIMIT, the id of an UPDATE) afterwards.
///
/// # Example
///
/// ```
/// use taskify_shared::db::filter::Filter;
/// use uuid::Uuid;
///
/// let owner = Uuid::new_v4();
/// let filter = Filter::new()
///     .eq("created_by_id", owner)
///     .or_is_null("created_by_id")
///     .group()
///     .any("id", vec![1i64, 2, 3]);
///
/// assert_eq!(
///     filter.clause(),
///     "(created_by_id = $1 OR created_by_id IS NULL) AND id = ANY($2)"
/// );
/// ```
use std::fmt::Write as _;

use sqlx::postgres::{PgArguments, PgHasArrayType};
use sqlx::{Arguments, Encode, Postgres, Type};

/// A WHERE-clause fragment with its bound arguments.
///
/// Conditions join with `AND` by default; the `or_*` variants join with
/// `OR`, and `group` parenthesizes everything built so far.
#[derive(Default)]
pub struct Filter {
    clause: String,
    arguments: PgArguments,
    params: usize,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when no condition has been added.
    pub fn is_empty(&self) -> bool {
        self.clause.is_empty()
    }

    /// The rendered clause, without the `WHERE` keyword.
    pub fn clause(&self) -> &str {
        &self.clause
    }

    /// `column = $n`, joined with `AND`.
    pub fn eq<T>(mut self, column: &str, value: T) -> Self
    where
        T: Send + for<'q> Encode<'q, Postgres> + Type<Postgres> + 'static,
    {
        self.push_joiner(" AND ");
        self.params += 1;
        let _ = write!(self.clause, "{} = ${}", column, self.params);
        self.arguments.add(value);
        self
    }

    /// `column = $n`, joined with `OR`.
    pub fn or_eq<T>(mut self, column: &str, value: T) -> Self
    where
        T: Send + for<'q> Encode<'q, Postgres> + Type<Postgres> + 'static,
    {
        self.push_joiner(" OR ");
        self.params += 1;
        let _ = write!(self.clause, "{} = ${}", column, self.params);
        self.arguments.add(value);
        self
    }

    /// `column IS NULL`, joined with `AND`.
    pub fn is_null(mut self, column: &str) -> Self {
        self.push_joiner(" AND ");
        let _ = write!(self.clause, "{} IS NULL", column);
        self
    }

    /// `column IS NULL`, joined with `OR`.
    pub fn or_is_null(mut self, column: &str) -> Self {
        self.push_joiner(" OR ");
        let _ = write!(self.clause, "{} IS NULL", column);
        self
    }

    /// `column = ANY($n)`, binding the values as a Postgres array.
    /// Joined with `AND`.
    pub fn any<T>(mut self, column: &str, values: Vec<T>) -> Self
    where
        T: Send + for<'q> Encode<'q, Postgres> + Type<Postgres> + PgHasArrayType + 'static,
    {
        self.push_joiner(" AND ");
        self.params += 1;
        let _ = write!(self.clause, "{} = ANY(${})", column, self.params);
        self.arguments.add(values);
        self
    }

    /// Parenthesizes everything built so far, so that a following `eq`
    /// or `any` binds tighter than the `OR`s inside the group.
    pub fn group(mut self) -> Self {
        if !self.clause.is_empty() {
            self.clause = format!("({})", self.clause);
        }
        self
    }

    pub(crate) fn into_parts(self) -> (String, PgArguments, usize) {
        (self.clause, self.arguments, self.params)
    }

    fn push_joiner(&mut self, joiner: &str) {
        if !self.clause.is_empty() {
            self.clause.push_str(joiner);
        }
    }
}

/// The SET list of an UPDATE statement.
///
/// Every updatable entity declares its change set explicitly through
/// [`crate::db::repo::Update::changes`]; there is no field reflection, so
/// identity and ownership columns can never be overwritten by accident.
#[derive(Default)]
pub struct Changes {
    clause: String,
    arguments: PgArguments,
    params: usize,
}

impl Changes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.clause.is_empty()
    }

    /// The rendered SET list, without the `SET` keyword.
    pub fn clause(&self) -> &str {
        &self.clause
    }

    /// `column = $n`, comma-joined.
    pub fn set<T>(mut self, column: &str, value: T) -> Self
    where
        T: Send + for<'q> Encode<'q, Postgres> + Type<Postgres> + 'static,
    {
        if !self.clause.is_empty() {
            self.clause.push_str(", ");
        }
        self.params += 1;
        let _ = write!(self.clause, "{} = ${}", column, self.params);
        self.arguments.add(value);
        self
    }

    pub(crate) fn into_parts(self) -> (String, PgArguments, usize) {
        (self.clause, self.arguments, self.params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_empty_filter() {
        let filter = Filter::new();
        assert!(filter.is_empty());
        assert_eq!(filter.clause(), "");
    }

    #[test]
    fn test_single_eq() {
        let filter = Filter::new().eq("id", 7i64);
        assert_eq!(filter.clause(), "id = $1");
    }

    #[test]
    fn test_and_chain_numbers_params() {
        let filter = Filter::new()
            .eq("created_by_id", Uuid::new_v4())
            .eq("is_completed", false);
        assert_eq!(filter.clause(), "created_by_id = $1 AND is_completed = $2");
    }

    #[test]
    fn test_or_with_null_does_not_consume_param() {
        let filter = Filter::new()
            .eq("created_by_id", Uuid::new_v4())
            .or_is_null("created_by_id");
        assert_eq!(filter.clause(), "created_by_id = $1 OR created_by_id IS NULL");
        let (_, _, params) = filter.into_parts();
        assert_eq!(params, 1);
    }

    #[test]
    fn test_grouped_or_then_any() {
        let filter = Filter::new()
            .eq("created_by_id", Uuid::new_v4())
            .or_is_null("created_by_id")
            .group()
            .any("id", vec![1i64, 2, 3]);
        assert_eq!(
            filter.clause(),
            "(created_by_id = $1 OR created_by_id IS NULL) AND id = ANY($2)"
        );
    }

    #[test]
    fn test_group_on_empty_filter_is_noop() {
        let filter = Filter::new().group();
        assert!(filter.is_empty());
    }

    #[test]
    fn test_changes_set_list() {
        let changes = Changes::new()
            .set("content", "buy milk".to_string())
            .set("is_completed", true)
            .set("priority_id", 2i64);
        assert_eq!(
            changes.clause(),
            "content = $1, is_completed = $2, priority_id = $3"
        );
        let (_, _, params) = changes.into_parts();
        assert_eq!(params, 3);
    }

    #[test]
    fn test_empty_changes() {
        let changes = Changes::new();
        assert!(changes.is_empty());
    }
}
