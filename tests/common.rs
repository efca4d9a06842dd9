#![allow(dead_code)]

use std::collections::HashMap;

use axum::http::StatusCode;
use axum_test::TestServer;
use learnhub::{
    build_server_with_pool,
    model::{DbConnection, ModelManager},
};
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use sqlx::{Executor, PgPool, postgres::PgPoolOptions};
use url::Url;
use uuid::Uuid;

pub static TEST_DATABASE_ADMIN_URL: &str = "TEST_DATABASE_ADMIN_URL";

/// Creates a throwaway database and migrates it. Returns `None` (and the
/// calling test passes vacuously) when `TEST_DATABASE_ADMIN_URL` is not set.
pub async fn setup_test_db() -> Option<FlowDatabase> {
    let _ = dotenvy::dotenv();
    let Ok(admin_url) = std::env::var(TEST_DATABASE_ADMIN_URL) else {
        eprintln!("{TEST_DATABASE_ADMIN_URL} is not set, skipping database test");
        return None;
    };
    let db_name = format!("test_db_{}", Uuid::new_v4());

    let mut url = Url::parse(&admin_url).unwrap();

    let admin_pool = PgPoolOptions::new()
        .max_connections(1)
        .connect(url.as_str())
        .await
        .unwrap();

    admin_pool
        .execute(format!(r#"CREATE DATABASE "{}""#, db_name).as_str())
        .await
        .unwrap();

    url.set_path(&db_name);

    let test_db_url = url.to_string();

    let pool = PgPool::connect(&test_db_url).await.unwrap();
    DbConnection::from_pool(pool.clone()).migrate().await.unwrap();

    Some(FlowDatabase {
        db_name,
        admin_url,
        pool,
    })
}

/// `FlowDatabase` represents temporary postgres database. This database deletes on `Drop`(when it
/// comes out of scope)
pub struct FlowDatabase {
    db_name: String,
    admin_url: String,
    pool: PgPool,
}

impl FlowDatabase {
    pub fn mm(&self) -> ModelManager {
        ModelManager::new(DbConnection::from_pool(self.pool.clone()))
    }
}

impl Drop for FlowDatabase {
    fn drop(&mut self) {
        let db_name = self.db_name.clone();
        let admin_url = self.admin_url.clone();

        if let Ok(handle) = tokio::runtime::Handle::try_current() {
            handle.spawn_blocking(move || {
                // fresh runtime inside this blocking thread
                let rt = tokio::runtime::Runtime::new().unwrap();
                rt.block_on(async move {
                    if let Ok(admin_pool) = PgPool::connect(&admin_url).await {
                        admin_pool
                            .execute(format!(r#"DROP DATABASE "{}" WITH (FORCE)"#, db_name).as_str())
                            .await.expect("Unable to drop database");
                    }
                });
            });
        }
    }
}

pub async fn setup_server(db: &FlowDatabase) -> TestServer {
    let pool = DbConnection::from_pool(db.pool.clone());
    let server = build_server_with_pool(pool).await.unwrap().1;
    TestServer::new(server).unwrap()
}

#[derive(Debug)]
pub struct FlowContext {
    pub store: HashMap<&'static str, Value>, // a way to pass data between steps
}

impl FlowContext {
    pub fn new() -> Self {
        Self {
            store: HashMap::new(),
        }
    }

    pub fn store(&mut self, key: &'static str, val: Value) {
        self.store.insert(key, val);
    }

    pub fn get(&self, key: &str) -> &Value {
        self.store.get(key).expect("missing store key")
    }

    pub fn get_json<T>(&self, key: &str) -> T
    where
        T: DeserializeOwned,
    {
        let obj = self.get(key);
        serde_json::from_value(obj.clone()).expect("Invalid json format")
    }

    /// `id` field of a stored response body.
    pub fn id(&self, key: &str) -> String {
        self.get(key)["id"]
            .as_str()
            .unwrap_or_else(|| panic!("`{key}` has no id"))
            .to_string()
    }
}

pub struct Action {
    #[allow(unused)]
    pub name: &'static str,
    pub method: &'static str,
    pub path: String,
    pub dyn_path: Option<Box<dyn Fn(&FlowContext) -> String + Send + Sync>>,
    pub body: Option<Value>,
    pub dyn_body: Option<Box<dyn Fn(&FlowContext) -> Value + Send + Sync>>,
    pub expect: StatusCode,
    pub query_params: Vec<(String, String)>,
    pub body_asserts: Vec<Box<dyn Fn(&Value) + Send + Sync>>,
    pub save_as: Option<&'static str>,
}

impl Action {
    pub fn new(name: &'static str, method: &'static str, path: &str) -> Self {
        Self {
            name,
            method,
            path: path.to_string(),
            dyn_path: None,
            body: None,
            dyn_body: None,
            expect: StatusCode::OK,
            query_params: vec![],
            body_asserts: vec![],
            save_as: None,
        }
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn with_expect(mut self, expect: StatusCode) -> Self {
        self.expect = expect;
        self
    }

    pub fn with_param(mut self, key: &str, val: &str) -> Self {
        self.query_params
            .push((String::from(key), String::from(val)));
        self
    }

    pub fn with_dyn_path<F>(mut self, f: F) -> Self
    where
        F: Fn(&FlowContext) -> String + Send + Sync + 'static,
    {
        self.dyn_path = Some(Box::new(f));
        self
    }

    pub fn with_dyn_body<F>(mut self, f: F) -> Self
    where
        F: Fn(&FlowContext) -> Value + Send + Sync + 'static,
    {
        self.dyn_body = Some(Box::new(f));
        self
    }

    pub fn with_save_as(mut self, key: &'static str) -> Self {
        self.save_as = Some(key);
        self
    }

    pub fn assert_body<F>(mut self, check: F) -> Self
    where
        F: Fn(&Value) + Send + Sync + 'static,
    {
        self.body_asserts.push(Box::new(check));
        self
    }
}

pub struct Flow {
    actions: Vec<Action>,
}

impl Flow {
    pub fn new() -> Self {
        Self { actions: vec![] }
    }

    pub fn step(mut self, action: Action) -> Self {
        self.actions.push(action);
        self
    }

    pub async fn run(self, server: &mut TestServer, _db: FlowDatabase) {
        let mut ctx = FlowContext::new(); // create new context for this flow
        for action in self.actions {
            println!("==> Running test action `{}`", action.name);

            let path = if let Some(dyn_path_fn) = action.dyn_path {
                dyn_path_fn(&ctx)
            } else {
                action.path.clone()
            };

            let mut req = match action.method {
                "GET" => server.get(&path),
                "POST" => server.post(&path),
                "PUT" => server.put(&path),
                "DELETE" => server.delete(&path),
                _ => panic!("unsupported method {}", action.method),
            };

            match (action.dyn_body, action.body) {
                (Some(f), _) => {
                    req = req.json(&f(&ctx));
                }
                (_, Some(json)) => req = req.json(&json),
                _ => {}
            }

            if !action.query_params.is_empty() {
                for (k, v) in action.query_params {
                    req = req.add_query_param(&k, v);
                }
            }

            let resp = req.await;
            resp.assert_status(action.expect);

            if !action.body_asserts.is_empty() {
                let body = resp.json::<Value>();
                for check in action.body_asserts {
                    check(&body);
                }
            }

            if let Some(save_key) = action.save_as {
                let body = resp.json::<Value>();
                ctx.store(save_key, body);
            }
        }
    }
}

// Common actions builders

pub fn create_user_action(name: &str, email: &str, role: &str) -> Action {
    Action::new("create_user", "POST", "/api/v1/users")
        .with_body(json!({
            "name": name,
            "email": email,
            "role": role,
        }))
        .with_expect(StatusCode::CREATED)
}

pub fn create_category_action(name: &str) -> Action {
    Action::new("create_category", "POST", "/api/v1/categories")
        .with_body(json!({ "name": name }))
        .with_expect(StatusCode::CREATED)
}

/// Course owned by the user stored under `instructor_key`, optionally in the
/// category stored under `category_key`.
pub fn create_course_action(
    title: &'static str,
    instructor_key: &'static str,
    category_key: Option<&'static str>,
) -> Action {
    Action::new("create_course", "POST", "/api/v1/courses")
        .with_dyn_body(move |ctx| {
            json!({
                "title": title,
                "description": format!("About {title}"),
                "instructor_id": ctx.id(instructor_key),
                "category_id": category_key.map(|key| ctx.id(key)),
            })
        })
        .with_expect(StatusCode::CREATED)
}

pub fn create_lesson_action(title: &'static str, course_key: &'static str) -> Action {
    Action::new("create_lesson", "POST", "/api/v1/lessons")
        .with_dyn_body(move |ctx| {
            json!({
                "course_id": ctx.id(course_key),
                "title": title,
                "video_url": format!("https://videos.example.com/{}", title.replace(' ', "-")),
            })
        })
        .with_expect(StatusCode::CREATED)
}
