//! Local stand-in for the Docker Hub repositories and login API

#![allow(dead_code)]

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{Value, json};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

pub const GOOD_TOKEN: &str = "ey...blah.blah...Sq";

#[derive(Debug, Clone)]
pub struct SeenRequest {
    pub path: String,
    pub query: String,
    pub authorization: Option<String>,
}

#[derive(Default)]
pub struct MockHub {
    base: String,
    /// qualified repository -> tag names
    repositories: HashMap<String, Vec<String>>,
    /// (qualified repository, 1-based page) answered with a 500
    failing: HashSet<(String, usize)>,
    /// qualified repositories answered with a non-JSON body
    garbage: HashSet<String>,
    requests: Mutex<Vec<SeenRequest>>,
}

impl MockHub {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tags(mut self, qualified: &str, names: &[&str]) -> Self {
        self.repositories.insert(
            qualified.to_string(),
            names.iter().map(|n| n.to_string()).collect(),
        );
        self
    }

    pub fn with_generated(mut self, qualified: &str, count: usize) -> Self {
        self.repositories.insert(
            qualified.to_string(),
            (1..=count).map(|i| format!("tag-{}", i)).collect(),
        );
        self
    }

    pub fn failing_page(mut self, qualified: &str, page: usize) -> Self {
        self.failing.insert((qualified.to_string(), page));
        self
    }

    pub fn garbage(mut self, qualified: &str) -> Self {
        self.garbage.insert(qualified.to_string());
        self
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    pub fn catalog_url(&self) -> String {
        format!("{}/v2/repositories", self.base)
    }

    pub fn auth_url(&self) -> String {
        format!("{}/v2/users/login/", self.base)
    }

    pub fn requests(&self) -> Vec<SeenRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn requests_for(&self, qualified: &str) -> Vec<SeenRequest> {
        let prefix = format!("/v2/repositories/{}/tags/", qualified);
        self.requests()
            .into_iter()
            .filter(|r| r.path == prefix)
            .collect()
    }

    /// Bind to an ephemeral port and serve in the background.
    pub async fn spawn(mut self) -> Arc<MockHub> {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        self.base = format!("http://{}", listener.local_addr().unwrap());
        let hub = Arc::new(self);

        let app = Router::new()
            .route("/v2/users/login/", post(login))
            .fallback(catalog)
            .with_state(Arc::clone(&hub));
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        hub
    }
}

fn query_param(query: &str, key: &str) -> Option<usize> {
    query
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(k, _)| *k == key)
        .and_then(|(_, v)| v.parse().ok())
}

async fn catalog(State(hub): State<Arc<MockHub>>, uri: Uri, headers: HeaderMap) -> Response {
    let path = uri.path().to_string();
    let query = uri.query().unwrap_or_default().to_string();
    hub.requests.lock().unwrap().push(SeenRequest {
        path: path.clone(),
        query: query.clone(),
        authorization: headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
    });

    let Some(qualified) = path
        .strip_prefix("/v2/repositories/")
        .and_then(|rest| rest.strip_suffix("/tags/"))
    else {
        return (StatusCode::NOT_FOUND, Json(json!({"detail": "Not found"}))).into_response();
    };

    let Some(names) = hub.repositories.get(qualified) else {
        return (StatusCode::NOT_FOUND, Json(json!({"detail": "Object not found"}))).into_response();
    };

    if hub.garbage.contains(qualified) {
        return (StatusCode::OK, "<html>maintenance</html>").into_response();
    }

    let page = query_param(&query, "page").unwrap_or(1);
    let page_size = query_param(&query, "page_size").unwrap_or(10);
    if hub.failing.contains(&(qualified.to_string(), page)) {
        return (StatusCode::INTERNAL_SERVER_ERROR, "upstream exploded").into_response();
    }

    let start = (page - 1) * page_size;
    let results: Vec<Value> = names
        .iter()
        .skip(start)
        .take(page_size)
        .enumerate()
        .map(|(i, name)| {
            json!({
                "name": name,
                "full_size": 1024,
                "last_updated": format!("2018-01-{:02}T10:00:00.000000Z", (start + i) % 28 + 1),
            })
        })
        .collect();
    let next = if start + page_size < names.len() {
        json!(format!(
            "{}/v2/repositories/{}/tags/?page={}&page_size={}",
            hub.base,
            qualified,
            page + 1,
            page_size
        ))
    } else {
        Value::Null
    };

    Json(json!({
        "count": names.len(),
        "next": next,
        "previous": null,
        "results": results,
    }))
    .into_response()
}

async fn login(Json(body): Json<Value>) -> Response {
    if body["username"] == "user" && body["password"] == "secret" {
        Json(json!({ "token": GOOD_TOKEN })).into_response()
    } else {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({"detail": "Incorrect authentication credentials."})),
        )
            .into_response()
    }
}
