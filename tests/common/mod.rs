#![allow(dead_code)]

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
    response::Response,
};
use leadbox::config::Config;
use leadbox::db::SqliteStorage;
use leadbox::service::MemorySessionStore;
use serde_json::Value;
use std::{
    fs,
    path::PathBuf,
    sync::Arc,
    time::{Duration, SystemTime, UNIX_EPOCH},
};
use tower::ServiceExt;

/// A throwaway database file removed on drop.
pub struct TempDb {
    pub path: PathBuf,
}

impl TempDb {
    pub fn new(tag: &str) -> Self {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time before UNIX_EPOCH")
            .as_nanos();
        let mut path = std::env::temp_dir();
        path.push(format!(
            "leadbox-{tag}-{}-{}.sqlite",
            std::process::id(),
            nanos
        ));
        Self { path }
    }

    pub async fn open(&self, lock_timeout: Duration) -> SqliteStorage {
        let storage = SqliteStorage::open(&self.path, lock_timeout)
            .await
            .expect("failed to open database");
        storage.init_schema().await.expect("failed to init schema");
        storage
    }
}

impl Drop for TempDb {
    fn drop(&mut self) {
        for suffix in ["", "-wal", "-shm", "-journal"] {
            let mut p = self.path.clone().into_os_string();
            p.push(suffix);
            let _ = fs::remove_file(PathBuf::from(p));
        }
    }
}

/// Router over a fresh database with the default admin seeded.
pub struct TestApp {
    pub app: Router,
    pub storage: SqliteStorage,
    _db: TempDb,
}

impl TestApp {
    pub async fn new(tag: &str) -> Self {
        let db = TempDb::new(tag);
        let storage = db.open(Duration::from_secs(5)).await;

        let cfg = Config {
            secret_key: "test-secret-key".to_string(),
            ..Config::default()
        };
        let state = leadbox::LeadboxState::new(
            Arc::new(storage.clone()),
            Arc::new(MemorySessionStore::new()),
            &cfg,
        );
        state
            .gate
            .clone()
            .with_hash_cost(4 /* bcrypt minimum cost; bcrypt::MIN_COST is private */)
            .ensure_default_admin("admin", "admin123")
            .await
            .expect("failed to seed admin");

        Self {
            app: leadbox::leadbox_router(state),
            storage,
            _db: db,
        }
    }

    pub async fn send(&self, req: Request<Body>) -> Response {
        self.app.clone().oneshot(req).await.expect("request failed")
    }

    pub async fn post_json(&self, uri: &str, body: &str, cookie: Option<&str>) -> Response {
        let mut builder = Request::post(uri).header(header::CONTENT_TYPE, "application/json");
        if let Some(c) = cookie {
            builder = builder.header(header::COOKIE, c);
        }
        self.send(
            builder
                .body(Body::from(body.to_string()))
                .expect("failed to build request"),
        )
        .await
    }

    pub async fn get(&self, uri: &str, cookie: Option<&str>) -> Response {
        let mut builder = Request::get(uri);
        if let Some(c) = cookie {
            builder = builder.header(header::COOKIE, c);
        }
        self.send(builder.body(Body::empty()).expect("failed to build request"))
            .await
    }

    pub async fn delete(&self, uri: &str, cookie: Option<&str>) -> Response {
        let mut builder = Request::delete(uri);
        if let Some(c) = cookie {
            builder = builder.header(header::COOKIE, c);
        }
        self.send(builder.body(Body::empty()).expect("failed to build request"))
            .await
    }

    /// Log in as the seeded admin and return the `Cookie` header value to replay.
    pub async fn login(&self) -> String {
        let resp = self
            .post_json(
                "/api/login",
                r#"{"username":"admin","password":"admin123"}"#,
                None,
            )
            .await;
        assert_eq!(resp.status(), StatusCode::OK);
        session_cookie(&resp)
    }
}

pub fn session_cookie(resp: &Response) -> String {
    let raw = resp
        .headers()
        .get(header::SET_COOKIE)
        .expect("missing set-cookie")
        .to_str()
        .expect("set-cookie was not ascii");
    raw.split(';')
        .next()
        .expect("empty set-cookie")
        .trim()
        .to_string()
}

pub async fn body_json(resp: Response) -> Value {
    let body = to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("failed to read response body");
    serde_json::from_slice(&body).expect("response body was not json")
}

pub async fn body_text(resp: Response) -> String {
    let body = to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("failed to read response body");
    String::from_utf8(body.to_vec()).expect("response body was not utf-8")
}
