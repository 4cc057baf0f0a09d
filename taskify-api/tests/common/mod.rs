/// Common test utilities for integration tests
///
/// This module provides shared infrastructure for integration tests:
/// - Test database setup
/// - Test user creation
/// - JWT token generation
/// - API client helpers
///
/// Integration tests require a running PostgreSQL instance reachable via
/// `DATABASE_URL` and are marked `#[ignore]` so the default test run
/// stays database-free.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use sqlx::PgPool;
use taskify_api::app::{build_router, AppState};
use taskify_api::config::Config;
use taskify_shared::auth::jwt::{create_token, Claims, TokenType};
use taskify_shared::auth::password::hash_password;
use taskify_shared::db::repo::Repo;
use taskify_shared::db::seed::{apply_seed_data, SeedData};
use taskify_shared::models::user::{CreateUser, User};
use tower::Service as _;
use uuid::Uuid;

/// Test context containing all necessary resources
pub struct TestContext {
    pub db: PgPool,
    pub app: axum::Router,
    pub config: Config,
    pub user: User,
    pub jwt_token: String,
}

impl TestContext {
    /// Creates a new test context with a fresh user against the shared
    /// test database.
    pub async fn new() -> anyhow::Result<Self> {
        // Load test configuration
        let config = Config::from_env()?;

        // Connect to database
        let db = PgPool::connect(&config.database.url).await?;

        // Run migrations (path relative to Cargo.toml, not this file)
        sqlx::migrate!("../taskify-shared/migrations").run(&db).await?;

        // Seed priorities and default categories
        apply_seed_data(
            &db,
            &SeedData {
                priorities_names: vec![
                    "low".to_string(),
                    "medium".to_string(),
                    "high".to_string(),
                ],
                categories_names: vec!["Work".to_string(), "Personal".to_string()],
            },
        )
        .await?;

        // Create test user
        let user: User = Repo::new()
            .create(
                &db,
                &CreateUser {
                    email: format!("test-{}@example.com", Uuid::new_v4()),
                    password_hash: hash_password("Test-Passw0rd")?,
                },
            )
            .await?;

        // Generate JWT token
        let claims = Claims::new(user.id, TokenType::Access);
        let jwt_token = create_token(&claims, &config.jwt.secret)?;

        // Build app
        let state = AppState::new(db.clone(), config.clone());
        let app = build_router(state);

        Ok(TestContext {
            db,
            app,
            config,
            user,
            jwt_token,
        })
    }

    /// Returns authorization header value
    pub fn auth_header(&self) -> String {
        format!("Bearer {}", self.jwt_token)
    }

    /// Creates a second, independent user in the same database and
    /// returns it along with a valid token.
    pub async fn other_user(&self) -> anyhow::Result<(User, String)> {
        let user: User = Repo::new()
            .create(
                &self.db,
                &CreateUser {
                    email: format!("other-{}@example.com", Uuid::new_v4()),
                    password_hash: hash_password("Test-Passw0rd")?,
                },
            )
            .await?;

        let claims = Claims::new(user.id, TokenType::Access);
        let token = create_token(&claims, &self.config.jwt.secret)?;

        Ok((user, token))
    }

    /// Cleans up test data. Join rows cascade away with the todos.
    pub async fn cleanup(&self) -> anyhow::Result<()> {
        const TEST_USERS: &str =
            "SELECT id FROM users WHERE email LIKE 'test-%@example.com' OR email LIKE 'other-%@example.com'";

        sqlx::query(&format!(
            "DELETE FROM todos WHERE created_by_id IN ({})",
            TEST_USERS
        ))
        .execute(&self.db)
        .await?;
        sqlx::query(&format!(
            "DELETE FROM categories WHERE created_by_id IN ({})",
            TEST_USERS
        ))
        .execute(&self.db)
        .await?;
        sqlx::query(&format!("DELETE FROM users WHERE id IN ({})", TEST_USERS))
            .execute(&self.db)
            .await?;
        Ok(())
    }
}

/// Sends an authenticated JSON request and returns status and parsed body.
pub async fn send_json(
    ctx: &TestContext,
    method: &str,
    uri: &str,
    token: &str,
    body: Option<serde_json::Value>,
) -> (StatusCode, serde_json::Value) {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("authorization", format!("Bearer {}", token));

    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = ctx.app.clone().call(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };

    (status, json)
}

/// Creates a category through the API and returns its id.
pub async fn create_category(ctx: &TestContext, token: &str, name: &str) -> i64 {
    let (status, body) = send_json(
        ctx,
        "POST",
        "/v1/categories/",
        token,
        Some(serde_json::json!({ "name": name })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "category creation failed: {}", body);
    body["id"].as_i64().unwrap()
}

/// Looks up a seeded priority id by name through the API.
pub async fn priority_id(ctx: &TestContext, token: &str, name: &str) -> i64 {
    let (status, body) = send_json(ctx, "GET", "/v1/priorities/", token, None).await;
    assert_eq!(status, StatusCode::OK);
    body.as_array()
        .unwrap()
        .iter()
        .find(|p| p["name"] == name)
        .and_then(|p| p["id"].as_i64())
        .unwrap()
}
