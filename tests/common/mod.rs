#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use axum::extract::{Form, Path, Query, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use watch_store::config::ClientConfig;
use watch_store::session::{SessionState, SharedSession};
use watch_store::ApiClient;

const SECRET: &[u8] = b"mock-api-secret";

pub const ADMIN: (&str, &str) = ("admin", "Admin123");
pub const CUSTOMER: (&str, &str) = ("alice", "Alice1234");

#[derive(Debug, Clone)]
struct MockUser {
    id: i64,
    username: String,
    email: String,
    password: String,
    is_admin: bool,
}

impl MockUser {
    fn to_json(&self) -> Value {
        json!({
            "id": self.id,
            "username": self.username,
            "email": self.email,
            "is_admin": self.is_admin,
            "created_at": "2024-05-01T09:00:00",
        })
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    exp: i64,
}

#[derive(Default)]
pub struct MockState {
    users: Vec<MockUser>,
    watches: Vec<Value>,
    next_watch_id: i64,
    /// Content-Type of every POST /login
    pub login_content_types: Vec<String>,
    /// Authorization header of every request that carried one
    pub bearer_tokens: Vec<String>,
    /// Usernames whose tokens the API should now reject
    pub revoked: Vec<String>,
}

type Shared = Arc<Mutex<MockState>>;

/// In-process stand-in for the catalog API, one per test
pub struct MockApi {
    pub base_url: String,
    pub state: Shared,
}

impl MockApi {
    pub async fn start() -> Result<Self> {
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        let state: Shared = Arc::new(Mutex::new(seed()));
        let app = router(state.clone());

        let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
            .await
            .context("failed to bind mock api")?;
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Ok(Self { base_url, state })
    }

    /// Client against this mock with a fresh in-memory session
    pub fn client(&self) -> Result<ApiClient> {
        self.client_with(SessionState::in_memory().shared())
    }

    pub fn client_with(&self, session: SharedSession) -> Result<ApiClient> {
        let config = ClientConfig::from_env().with_base_url(self.base_url.clone());
        Ok(ApiClient::new(&config, session)?)
    }

    pub fn token_for(&self, username: &str) -> String {
        issue_token(username, chrono::Utc::now().timestamp() + 1800)
    }

    pub fn expired_token_for(&self, username: &str) -> String {
        issue_token(username, chrono::Utc::now().timestamp() - 3600)
    }

    pub fn watch_count(&self) -> usize {
        self.state.lock().unwrap().watches.len()
    }

    pub fn revoke(&self, username: &str) {
        self.state.lock().unwrap().revoked.push(username.to_string());
    }
}

fn seed() -> MockState {
    MockState {
        users: vec![
            MockUser {
                id: 1,
                username: ADMIN.0.into(),
                email: "admin@luxurywatches.com".into(),
                password: ADMIN.1.into(),
                is_admin: true,
            },
            MockUser {
                id: 2,
                username: CUSTOMER.0.into(),
                email: "alice@example.com".into(),
                password: CUSTOMER.1.into(),
                is_admin: false,
            },
        ],
        watches: vec![
            json!({
                "id": 1,
                "name": "Submariner Date",
                "brand": "Rolex",
                "description": "The ultimate diving watch, water-resistant to 300 meters.",
                "price": 14300.0,
                "image_url": "https://images.example.com/submariner.jpg",
                "stock": 3,
                "created_at": "2024-05-01T09:00:00"
            }),
            json!({
                "id": 2,
                "name": "Nautilus 5711",
                "brand": "Patek Philippe",
                "description": "An icon of luxury sports watches with an octagonal bezel.",
                "price": 52635.0,
                "image_url": "https://images.example.com/nautilus.jpg",
                "stock": 1,
                "created_at": "2024-05-01T09:00:00+00:00"
            }),
        ],
        next_watch_id: 3,
        ..Default::default()
    }
}

fn router(state: Shared) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/register", axum::routing::post(register))
        .route("/login", axum::routing::post(login))
        .route("/users/me", get(me))
        .route("/watches", get(list_watches).post(create_watch))
        .route(
            "/watches/:id",
            get(get_watch).put(update_watch).delete(delete_watch),
        )
        .with_state(state)
}

fn issue_token(username: &str, exp: i64) -> String {
    let claims = Claims { sub: username.to_string(), exp };
    encode(&Header::default(), &claims, &EncodingKey::from_secret(SECRET)).expect("encode token")
}

fn detail(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "detail": message }))).into_response()
}

fn unauthorized() -> Response {
    detail(StatusCode::UNAUTHORIZED, "Could not validate credentials")
}

fn authenticate(state: &mut MockState, headers: &HeaderMap) -> Result<MockUser, Response> {
    let raw = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| detail(StatusCode::UNAUTHORIZED, "Not authenticated"))?;
    state.bearer_tokens.push(raw.to_string());

    let token = raw.strip_prefix("Bearer ").ok_or_else(unauthorized)?;
    let claims = decode::<Claims>(token, &DecodingKey::from_secret(SECRET), &Validation::default())
        .map_err(|_| unauthorized())?
        .claims;

    if state.revoked.contains(&claims.sub) {
        return Err(unauthorized());
    }

    state
        .users
        .iter()
        .find(|u| u.username == claims.sub)
        .cloned()
        .ok_or_else(unauthorized)
}

fn require_admin(state: &mut MockState, headers: &HeaderMap) -> Result<MockUser, Response> {
    let user = authenticate(state, headers)?;
    if !user.is_admin {
        return Err(detail(StatusCode::FORBIDDEN, "Not enough permissions"));
    }
    Ok(user)
}

async fn root() -> Json<Value> {
    Json(json!({
        "message": "Welcome to Luxury Watch E-Commerce API",
        "docs": "/docs",
        "status": "operational"
    }))
}

async fn register(State(state): State<Shared>, Json(body): Json<Value>) -> Response {
    let mut state = state.lock().unwrap();
    let username = body["username"].as_str().unwrap_or_default().to_string();
    let email = body["email"].as_str().unwrap_or_default().to_string();
    let password = body["password"].as_str().unwrap_or_default().to_string();

    if password.len() < 8 {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({ "detail": [
                { "loc": ["body", "password"], "msg": "String should have at least 8 characters", "type": "string_too_short" }
            ]})),
        )
            .into_response();
    }
    if state.users.iter().any(|u| u.username == username) {
        return detail(StatusCode::BAD_REQUEST, "Username already registered");
    }

    let user = MockUser {
        id: state.users.len() as i64 + 1,
        username,
        email,
        password,
        is_admin: false,
    };
    state.users.push(user.clone());
    (StatusCode::CREATED, Json(user.to_json())).into_response()
}

async fn login(
    State(state): State<Shared>,
    headers: HeaderMap,
    Form(form): Form<HashMap<String, String>>,
) -> Response {
    let mut state = state.lock().unwrap();
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    state.login_content_types.push(content_type);

    let username = form.get("username").cloned().unwrap_or_default();
    let password = form.get("password").cloned().unwrap_or_default();
    let valid = state
        .users
        .iter()
        .any(|u| u.username == username && u.password == password);
    if !valid {
        return detail(StatusCode::UNAUTHORIZED, "Incorrect username or password");
    }

    let token = issue_token(&username, chrono::Utc::now().timestamp() + 1800);
    Json(json!({ "access_token": token, "token_type": "bearer" })).into_response()
}

async fn me(State(state): State<Shared>, headers: HeaderMap) -> Response {
    let mut state = state.lock().unwrap();
    match authenticate(&mut state, &headers) {
        Ok(user) => Json(user.to_json()).into_response(),
        Err(response) => response,
    }
}

#[derive(Deserialize)]
struct Page {
    skip: Option<usize>,
    limit: Option<usize>,
}

async fn list_watches(State(state): State<Shared>, Query(page): Query<Page>) -> Json<Value> {
    let state = state.lock().unwrap();
    let items: Vec<Value> = state
        .watches
        .iter()
        .skip(page.skip.unwrap_or(0))
        .take(page.limit.unwrap_or(100))
        .cloned()
        .collect();
    Json(Value::Array(items))
}

fn find(state: &MockState, id: i64) -> Option<usize> {
    state.watches.iter().position(|w| w["id"].as_i64() == Some(id))
}

async fn get_watch(State(state): State<Shared>, Path(id): Path<i64>) -> Response {
    let state = state.lock().unwrap();
    match find(&state, id) {
        Some(i) => Json(state.watches[i].clone()).into_response(),
        None => detail(StatusCode::NOT_FOUND, "Watch not found"),
    }
}

async fn create_watch(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let mut state = state.lock().unwrap();
    if let Err(response) = require_admin(&mut state, &headers) {
        return response;
    }

    if body["price"].as_f64().unwrap_or(0.0) <= 0.0 {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({ "detail": [
                { "loc": ["body", "price"], "msg": "Input should be greater than 0", "type": "greater_than" }
            ]})),
        )
            .into_response();
    }

    let mut watch = body;
    watch["id"] = json!(state.next_watch_id);
    watch["created_at"] = json!("2024-06-01T12:00:00");
    state.next_watch_id += 1;
    state.watches.push(watch.clone());
    (StatusCode::CREATED, Json(watch)).into_response()
}

async fn update_watch(
    State(state): State<Shared>,
    Path(id): Path<i64>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let mut state = state.lock().unwrap();
    if let Err(response) = require_admin(&mut state, &headers) {
        return response;
    }

    if let Some(price) = body.get("price").and_then(|p| p.as_f64()) {
        if price <= 0.0 {
            return detail(StatusCode::BAD_REQUEST, "Price must be positive");
        }
    }

    let Some(i) = find(&state, id) else {
        return detail(StatusCode::NOT_FOUND, "Watch not found");
    };
    if let (Some(target), Some(patch)) = (state.watches[i].as_object_mut(), body.as_object()) {
        for (k, v) in patch {
            target.insert(k.clone(), v.clone());
        }
    }
    Json(state.watches[i].clone()).into_response()
}

async fn delete_watch(
    State(state): State<Shared>,
    Path(id): Path<i64>,
    headers: HeaderMap,
) -> Response {
    let mut state = state.lock().unwrap();
    if let Err(response) = require_admin(&mut state, &headers) {
        return response;
    }

    match find(&state, id) {
        Some(i) => {
            state.watches.remove(i);
            StatusCode::NO_CONTENT.into_response()
        }
        None => detail(StatusCode::NOT_FOUND, "Watch not found"),
    }
}
