use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::http::HeaderMap;
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use uuid::Uuid;

use hookrelay::config::Config;
use hookrelay::deletion::{HardDelete, HardDeleteError};

pub const TEST_API_KEY: &str = "test-api-key";

/// Scripted stand-in for the upstream hard-delete RPC. Records every call;
/// fails for user ids registered via `fail_for`.
pub struct MockDeleter {
    calls: Mutex<Vec<(Uuid, Uuid)>>,
    failures: Mutex<HashMap<Uuid, String>>,
}

impl MockDeleter {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            failures: Mutex::new(HashMap::new()),
        }
    }

    pub fn fail_for(&self, user_id: Uuid, message: &str) {
        self.failures
            .lock()
            .unwrap()
            .insert(user_id, message.to_string());
    }

    pub fn calls(&self) -> Vec<(Uuid, Uuid)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl HardDelete for MockDeleter {
    async fn perform_hard_delete(
        &self,
        user_id: Uuid,
        performed_by: Uuid,
    ) -> Result<Value, HardDeleteError> {
        self.calls.lock().unwrap().push((user_id, performed_by));

        if let Some(message) = self.failures.lock().unwrap().get(&user_id) {
            return Err(HardDeleteError::from(message.clone()));
        }

        Ok(json!({ "deleted": true }))
    }
}

/// A running test server instance with a dedicated test database.
pub struct TestApp {
    pub addr: SocketAddr,
    pub pool: PgPool,
    pub client: Client,
    pub db_name: String,
    pub deleter: Arc<MockDeleter>,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// Run one processing pass via the API, return (body, status).
    pub async fn process(&self) -> (Value, StatusCode) {
        self.post_auth("/api/v1/deletions/process", &json!({})).await
    }

    /// Enqueue a deletion job via the API, return the job JSON.
    pub async fn enqueue_deletion(&self, user_id: Uuid, requested_by: Uuid) -> Value {
        let (body, status) = self
            .post_auth(
                "/api/v1/deletions",
                &json!({ "user_id": user_id, "requested_by": requested_by }),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "enqueue deletion non-200: {body}");
        body
    }

    /// Insert a job row directly, with scheduled_for offset from now in seconds.
    pub async fn insert_job(
        &self,
        user_id: Uuid,
        requested_by: Uuid,
        status: &str,
        offset_secs: f64,
    ) -> Uuid {
        sqlx::query_scalar::<_, Uuid>(
            "INSERT INTO deletion_jobs (user_id, requested_by, scheduled_for, status)
             VALUES ($1, $2, now() + make_interval(secs => $3::double precision), $4)
             RETURNING id",
        )
        .bind(user_id)
        .bind(requested_by)
        .bind(offset_secs)
        .bind(status)
        .fetch_one(&self.pool)
        .await
        .expect("insert_job failed")
    }

    /// Fetch (status, error, completed_at) for a job row.
    pub async fn job_row(
        &self,
        id: Uuid,
    ) -> (String, Option<String>, Option<chrono::DateTime<chrono::Utc>>) {
        sqlx::query_as::<_, (String, Option<String>, Option<chrono::DateTime<chrono::Utc>>)>(
            "SELECT status, error, completed_at FROM deletion_jobs WHERE id = $1",
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await
        .expect("job_row failed")
    }

    /// Make an API-key-authenticated GET request.
    pub async fn get_auth(&self, path: &str) -> (Value, StatusCode) {
        let resp = self
            .client
            .get(self.url(path))
            .header("x-api-key", TEST_API_KEY)
            .send()
            .await
            .expect("get request failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }

    /// Make an API-key-authenticated POST request with JSON body.
    pub async fn post_auth(&self, path: &str, body: &Value) -> (Value, StatusCode) {
        let resp = self
            .client
            .post(self.url(path))
            .header("x-api-key", TEST_API_KEY)
            .json(body)
            .send()
            .await
            .expect("post request failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }
}

/// Spawn a test app with a fresh temporary database.
pub async fn spawn_app() -> TestApp {
    spawn_app_with(|_| {}).await
}

/// Spawn a test app, letting the caller adjust the config first.
pub async fn spawn_app_with<F: FnOnce(&mut Config)>(customize: F) -> TestApp {
    let _ = dotenvy::dotenv();

    let base_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for tests");

    // Create a unique test database
    let db_name = format!(
        "hookrelay_test_{}",
        Uuid::now_v7().to_string().replace('-', "")
    );

    // Connect to default postgres DB to create test DB
    let admin_url = base_url
        .rsplit_once('/')
        .map(|(base, _)| format!("{base}/postgres"))
        .unwrap_or_else(|| base_url.clone());

    let admin_pool = PgPoolOptions::new()
        .max_connections(2)
        .connect(&admin_url)
        .await
        .expect("Failed to connect to postgres for test DB creation");

    sqlx::query(&format!("CREATE DATABASE \"{db_name}\""))
        .execute(&admin_pool)
        .await
        .expect("Failed to create test database");

    admin_pool.close().await;

    // Connect to test DB and run migrations
    let test_url = base_url
        .rsplit_once('/')
        .map(|(base, _)| format!("{base}/{db_name}"))
        .unwrap_or_else(|| base_url.clone());

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&test_url)
        .await
        .expect("Failed to connect to test database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations on test database");

    let mut config = Config {
        database_url: test_url,
        api_key: TEST_API_KEY.to_string(),
        upstream_admin_url: "http://127.0.0.1:9/unused".to_string(),
        upstream_service_token: "unused".to_string(),
        host: "127.0.0.1".parse().unwrap(),
        port: 0, // unused, we bind to random port
        base_url: "http://localhost:0".to_string(),
        pass_interval_secs: 0,
        launch_at: None,
        log_level: "warn".to_string(),
        signup_forward: None,
    };
    customize(&mut config);

    let deleter = Arc::new(MockDeleter::new());
    let (app, _state) = hookrelay::build_app(pool.clone(), config, deleter.clone());

    // Bind to random port
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind to random port");
    let addr = listener.local_addr().unwrap();

    // Spawn server in background
    tokio::spawn(async move {
        axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await
        .expect("Server failed");
    });

    let client = Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap();

    TestApp {
        addr,
        pool,
        client,
        db_name,
        deleter,
    }
}

/// Spawn a tiny upstream that captures forwarded requests. Returns the hook
/// URL and a receiver of (authorization header, body) pairs.
pub async fn spawn_capture_upstream() -> (
    String,
    tokio::sync::mpsc::UnboundedReceiver<(String, Value)>,
) {
    let (tx, rx) = tokio::sync::mpsc::unbounded_channel();

    let app = axum::Router::new().route(
        "/hook",
        axum::routing::post(move |headers: HeaderMap, axum::Json(body): axum::Json<Value>| {
            let tx = tx.clone();
            async move {
                let auth = headers
                    .get("authorization")
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or("")
                    .to_string();
                let _ = tx.send((auth, body));
                axum::Json(json!({ "ok": true }))
            }
        }),
    );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind capture upstream");
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Capture upstream failed");
    });

    (format!("http://{addr}/hook"), rx)
}

/// Drop the test database after tests complete.
pub async fn cleanup(app: TestApp) {
    let db_name = app.db_name.clone();
    app.pool.close().await;

    let base_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for tests");
    let admin_url = base_url
        .rsplit_once('/')
        .map(|(base, _)| format!("{base}/postgres"))
        .unwrap_or_else(|| base_url.clone());

    let admin_pool = PgPoolOptions::new()
        .max_connections(2)
        .connect(&admin_url)
        .await
        .expect("Failed to connect for cleanup");

    let _ = sqlx::query(&format!("DROP DATABASE IF EXISTS \"{db_name}\" WITH (FORCE)"))
        .execute(&admin_pool)
        .await;

    admin_pool.close().await;
}
