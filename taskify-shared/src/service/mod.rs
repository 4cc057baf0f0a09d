/// Domain service
///
/// `TodoService` translates user-facing intents into validated repository
/// operations. It is the seat of every business invariant: category
/// ownership, duplicate-name prevention, and the validity of the category
/// set attached to a todo. Stateless; every call receives the pool and
/// runs request-scoped.
///
/// # Error policy
///
/// Business violations surface as typed [`ServiceError`]s. Store integrity
/// violations that a request can trigger (an invalid priority reference, a
/// concurrent duplicate category insert) are caught here and re-raised as
/// domain errors; anything else propagates as a fatal `Database` error.
use std::collections::HashMap;

use sqlx::error::ErrorKind;
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::filter::Filter;
use crate::db::repo::Repo;
use crate::error::ServiceError;
use crate::models::category::{Category, CreateCategory};
use crate::models::priority::Priority;
use crate::models::todo::{
    CreateTodo, CreateTodoCategory, Todo, TodoCategory, UpdateTodo,
};

/// Intent to create a todo, including its category associations.
#[derive(Debug, Clone)]
pub struct NewTodo {
    pub content: String,
    pub created_by_id: Uuid,
    pub priority_id: i64,
    pub categories_ids: Vec<i64>,
}

/// Intent to update a todo. `created_by_id` is the requester, checked
/// against the stored owner; it is never written.
#[derive(Debug, Clone)]
pub struct TodoUpdate {
    pub id: i64,
    pub content: String,
    pub is_completed: bool,
    pub priority_id: i64,
    pub created_by_id: Uuid,
    pub categories_ids: Vec<i64>,
}

/// A todo hydrated with its priority and category rows, ready for the
/// response model.
#[derive(Debug, Clone)]
pub struct TodoDetails {
    pub todo: Todo,
    pub priority: Priority,
    pub categories: Vec<Category>,
}

/// Business-rule layer over the generic repository.
#[derive(Debug, Clone, Copy, Default)]
pub struct TodoService {
    repo: Repo,
}

impl TodoService {
    pub fn new() -> Self {
        Self { repo: Repo::new() }
    }

    /// All priority rows, unfiltered and unpaginated.
    pub async fn get_priorities(&self, pool: &PgPool) -> Result<Vec<Priority>, ServiceError> {
        Ok(self.repo.get_multi(pool, None, 0, None).await?)
    }

    /// Categories visible to `created_by_id`: their own plus the default
    /// (unowned) ones. Never another user's.
    pub async fn get_categories(
        &self,
        pool: &PgPool,
        created_by_id: Uuid,
        skip: i64,
        limit: i64,
    ) -> Result<Vec<Category>, ServiceError> {
        self.visible_categories(pool, created_by_id, skip, Some(limit))
            .await
    }

    /// Creates a category after checking the name against every category
    /// visible to the owner.
    ///
    /// The check is case-sensitive and redundant with the store's compound
    /// unique constraint; a concurrent duplicate that slips past it still
    /// comes back as `AlreadyExists` via the unique-violation mapping.
    pub async fn add_category(
        &self,
        pool: &PgPool,
        category_in: CreateCategory,
    ) -> Result<Category, ServiceError> {
        let visible = match category_in.created_by_id {
            Some(owner) => self.visible_categories(pool, owner, 0, None).await?,
            None => {
                self.repo
                    .get_multi(
                        pool,
                        Some(Filter::new().is_null("created_by_id")),
                        0,
                        None,
                    )
                    .await?
            }
        };

        if visible.iter().any(|c| c.name == category_in.name) {
            return Err(ServiceError::AlreadyExists {
                resource: "category name",
            });
        }

        self.repo.create(pool, &category_in).await.map_err(|err| {
            if unique_violation(&err) {
                ServiceError::AlreadyExists {
                    resource: "category name",
                }
            } else {
                ServiceError::Database(err)
            }
        })
    }

    /// Deletes a category owned by the requester.
    ///
    /// Default categories have no owner and therefore never match a
    /// requester id; they cannot be deleted through this path.
    pub async fn delete_category(
        &self,
        pool: &PgPool,
        id_to_delete: i64,
        created_by_id: Uuid,
    ) -> Result<(), ServiceError> {
        let category: Option<Category> = self
            .repo
            .get(pool, Some(Filter::new().eq("id", id_to_delete)))
            .await?;
        let category = category.ok_or(ServiceError::NotFound {
            resource: "category",
        })?;

        if category.created_by_id != Some(created_by_id) {
            return Err(ServiceError::NotAllowed(
                "a user can not delete a category that was not created by him".to_string(),
            ));
        }

        self.repo
            .delete::<Category, _>(pool, id_to_delete)
            .await?;
        Ok(())
    }

    /// The requester's todos, hydrated with priority and categories.
    pub async fn get_todos(
        &self,
        pool: &PgPool,
        created_by_id: Uuid,
        skip: i64,
        limit: i64,
    ) -> Result<Vec<TodoDetails>, ServiceError> {
        let todos: Vec<Todo> = self
            .repo
            .get_multi(
                pool,
                Some(Filter::new().eq("created_by_id", created_by_id)),
                skip,
                Some(limit),
            )
            .await?;
        self.load_details(pool, todos).await
    }

    /// Creates a todo with its join rows in one transaction.
    pub async fn add_todo(
        &self,
        pool: &PgPool,
        todo_in: NewTodo,
    ) -> Result<TodoDetails, ServiceError> {
        if !self
            .validate_todo_categories(pool, &todo_in.categories_ids, todo_in.created_by_id)
            .await?
        {
            return Err(ServiceError::Validation(
                "categories are not valid".to_string(),
            ));
        }

        let mut tx = pool.begin().await.map_err(ServiceError::Database)?;

        let todo: Todo = self
            .repo
            .create(
                &mut *tx,
                &CreateTodo {
                    content: todo_in.content,
                    created_by_id: todo_in.created_by_id,
                    priority_id: todo_in.priority_id,
                },
            )
            .await
            .map_err(|err| integrity_to_validation(err, "priority is not valid"))?;

        for &category_id in &todo_in.categories_ids {
            self.repo
                .create(
                    &mut *tx,
                    &CreateTodoCategory {
                        todo_id: todo.id,
                        category_id,
                    },
                )
                .await
                .map_err(|err| integrity_to_validation(err, "priority is not valid"))?;
        }

        tx.commit().await.map_err(ServiceError::Database)?;

        self.todo_details(pool, todo).await
    }

    /// Updates a todo the requester owns, replacing its category set.
    pub async fn update_todo(
        &self,
        pool: &PgPool,
        updated_todo: TodoUpdate,
    ) -> Result<TodoDetails, ServiceError> {
        let existing: Option<Todo> = self
            .repo
            .get(pool, Some(Filter::new().eq("id", updated_todo.id)))
            .await?;
        let existing = existing.ok_or(ServiceError::NotFound { resource: "todo" })?;

        if existing.created_by_id != updated_todo.created_by_id {
            return Err(ServiceError::NotAllowed(
                "a user can not update a todo that was not created by him".to_string(),
            ));
        }

        if !self
            .validate_todo_categories(
                pool,
                &updated_todo.categories_ids,
                updated_todo.created_by_id,
            )
            .await?
        {
            return Err(ServiceError::Validation(
                "categories are not valid".to_string(),
            ));
        }

        let mut tx = pool.begin().await.map_err(ServiceError::Database)?;

        let merged: Option<Todo> = self
            .repo
            .update(
                &mut *tx,
                &UpdateTodo {
                    id: updated_todo.id,
                    content: updated_todo.content,
                    is_completed: updated_todo.is_completed,
                    priority_id: updated_todo.priority_id,
                },
            )
            .await
            .map_err(|err| integrity_to_validation(err, "priority is not valid"))?;

        // The row vanished between lookup and update. Should not normally
        // happen, but a concurrent delete makes it possible.
        let merged = merged.ok_or(ServiceError::NotFound { resource: "todo" })?;

        self.repo
            .delete_where::<TodoCategory, _>(
                &mut *tx,
                Filter::new().eq("todo_id", merged.id),
            )
            .await?;
        for &category_id in &updated_todo.categories_ids {
            self.repo
                .create(
                    &mut *tx,
                    &CreateTodoCategory {
                        todo_id: merged.id,
                        category_id,
                    },
                )
                .await
                .map_err(|err| integrity_to_validation(err, "priority is not valid"))?;
        }

        tx.commit().await.map_err(ServiceError::Database)?;

        self.todo_details(pool, merged).await
    }

    /// Deletes a todo the requester owns. Join rows cascade away.
    pub async fn delete_todo(
        &self,
        pool: &PgPool,
        id_to_delete: i64,
        created_by_id: Uuid,
    ) -> Result<(), ServiceError> {
        let todo: Option<Todo> = self
            .repo
            .get(pool, Some(Filter::new().eq("id", id_to_delete)))
            .await?;
        let todo = todo.ok_or(ServiceError::NotFound { resource: "todo" })?;

        if todo.created_by_id != created_by_id {
            return Err(ServiceError::NotAllowed(
                "a user can not delete a todo that was not created by him".to_string(),
            ));
        }

        self.repo.delete::<Todo, _>(pool, id_to_delete).await?;
        Ok(())
    }

    /// Checks that every requested category id resolves to a category the
    /// user may use: their own or a default one.
    async fn validate_todo_categories(
        &self,
        pool: &PgPool,
        categories_ids: &[i64],
        created_by_id: Uuid,
    ) -> Result<bool, ServiceError> {
        if categories_ids.is_empty() {
            return Ok(true);
        }

        let filter = Filter::new()
            .eq("created_by_id", created_by_id)
            .or_is_null("created_by_id")
            .group()
            .any("id", categories_ids.to_vec());
        let matched: Vec<Category> = self.repo.get_multi(pool, Some(filter), 0, None).await?;

        Ok(request_matches_visible(categories_ids, matched.len()))
    }

    async fn visible_categories(
        &self,
        pool: &PgPool,
        created_by_id: Uuid,
        skip: i64,
        limit: Option<i64>,
    ) -> Result<Vec<Category>, ServiceError> {
        let filter = Filter::new()
            .eq("created_by_id", created_by_id)
            .or_is_null("created_by_id");
        Ok(self.repo.get_multi(pool, Some(filter), skip, limit).await?)
    }

    async fn todo_details(
        &self,
        pool: &PgPool,
        todo: Todo,
    ) -> Result<TodoDetails, ServiceError> {
        let mut details = self.load_details(pool, vec![todo]).await?;
        details
            .pop()
            .ok_or(ServiceError::Database(sqlx::Error::RowNotFound))
    }

    /// Hydrates a page of todos with their priority and category rows in
    /// three batched lookups instead of one round-trip per todo.
    async fn load_details(
        &self,
        pool: &PgPool,
        todos: Vec<Todo>,
    ) -> Result<Vec<TodoDetails>, ServiceError> {
        if todos.is_empty() {
            return Ok(Vec::new());
        }

        let todo_ids: Vec<i64> = todos.iter().map(|t| t.id).collect();
        let mut priority_ids: Vec<i64> = todos.iter().map(|t| t.priority_id).collect();
        priority_ids.sort_unstable();
        priority_ids.dedup();

        let priorities: Vec<Priority> = self
            .repo
            .get_multi(pool, Some(Filter::new().any("id", priority_ids)), 0, None)
            .await?;
        let links: Vec<TodoCategory> = self
            .repo
            .get_multi(pool, Some(Filter::new().any("todo_id", todo_ids)), 0, None)
            .await?;

        let mut category_ids: Vec<i64> = links.iter().map(|l| l.category_id).collect();
        category_ids.sort_unstable();
        category_ids.dedup();
        let categories: Vec<Category> = if category_ids.is_empty() {
            Vec::new()
        } else {
            self.repo
                .get_multi(pool, Some(Filter::new().any("id", category_ids)), 0, None)
                .await?
        };

        let priority_by_id: HashMap<i64, Priority> =
            priorities.into_iter().map(|p| (p.id, p)).collect();
        let category_by_id: HashMap<i64, Category> =
            categories.into_iter().map(|c| (c.id, c)).collect();
        let mut links_by_todo: HashMap<i64, Vec<i64>> = HashMap::new();
        for link in links {
            links_by_todo
                .entry(link.todo_id)
                .or_default()
                .push(link.category_id);
        }

        todos
            .into_iter()
            .map(|todo| {
                let priority = priority_by_id
                    .get(&todo.priority_id)
                    .cloned()
                    .ok_or(sqlx::Error::RowNotFound)?;
                let categories = links_by_todo
                    .remove(&todo.id)
                    .unwrap_or_default()
                    .into_iter()
                    .filter_map(|id| category_by_id.get(&id).cloned())
                    .collect();
                Ok(TodoDetails {
                    todo,
                    priority,
                    categories,
                })
            })
            .collect()
    }
}

/// The cardinality check behind category validation: the number of
/// requested ids must equal the number of visible matching rows.
///
/// Duplicate ids in the request under-count against the matched rows and
/// reject the request even when every id is individually valid. This
/// mirrors the long-standing behavior of the original check; see the test
/// below before "fixing" it.
fn request_matches_visible(requested: &[i64], matched: usize) -> bool {
    requested.len() == matched
}

fn integrity_to_validation(err: sqlx::Error, message: &str) -> ServiceError {
    match &err {
        sqlx::Error::Database(db_err)
            if matches!(db_err.kind(), ErrorKind::ForeignKeyViolation) =>
        {
            ServiceError::Validation(message.to_string())
        }
        _ => ServiceError::Database(err),
    }
}

fn unique_violation(err: &sqlx::Error) -> bool {
    matches!(
        err,
        sqlx::Error::Database(db_err) if matches!(db_err.kind(), ErrorKind::UniqueViolation)
    )
}
