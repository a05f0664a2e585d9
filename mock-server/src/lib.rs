use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub title: String,
    pub content: String,
    pub is_completed: bool,
    pub task_priority: i32,
}

#[derive(Deserialize)]
pub struct UserData {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddTask {
    pub title: String,
    pub content: String,
    pub task_priority: i32,
}

#[derive(Deserialize)]
pub struct NoteId {
    pub id: String,
}

#[derive(Serialize, Deserialize)]
pub struct Message {
    pub message: String,
}

#[derive(Serialize, Deserialize)]
pub struct Token {
    pub token: String,
}

#[derive(Serialize, Deserialize)]
pub struct Profile {
    pub email: String,
    pub name: String,
}

#[derive(Serialize, Deserialize)]
pub struct Notes {
    pub notes: Vec<Task>,
}

struct User {
    password: String,
    name: String,
}

#[derive(Default)]
pub struct Backend {
    users: HashMap<String, User>,
    /// token -> email
    sessions: HashMap<String, String>,
    /// email -> tasks in creation order
    notes: HashMap<String, Vec<Task>>,
}

impl Backend {
    fn authorize(&self, headers: &HeaderMap) -> Result<String, StatusCode> {
        headers
            .get("authorization")
            .and_then(|value| value.to_str().ok())
            .and_then(|token| self.sessions.get(token))
            .cloned()
            .ok_or(StatusCode::UNAUTHORIZED)
    }
}

pub type Db = Arc<RwLock<Backend>>;

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Backend::default()));
    Router::new()
        .route("/api/register", post(register))
        .route("/api/login", post(login))
        .route("/api/user/profile", get(profile))
        .route(
            "/api/note",
            get(list_notes).post(add_note).delete(delete_note),
        )
        .route("/api/note/complete", post(complete_note))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn register(
    State(db): State<Db>,
    Json(input): Json<UserData>,
) -> Result<Json<Message>, StatusCode> {
    if input.email.trim().is_empty() || input.password.is_empty() {
        return Err(StatusCode::BAD_REQUEST);
    }
    let mut backend = db.write().await;
    if backend.users.contains_key(&input.email) {
        return Err(StatusCode::CONFLICT);
    }
    let name = input.name.unwrap_or_else(|| input.email.clone());
    backend.users.insert(
        input.email.clone(),
        User {
            password: input.password,
            name,
        },
    );
    tracing::info!(email = %input.email, "user registered");
    Ok(Json(Message {
        message: "Successfully registered".to_string(),
    }))
}

async fn login(
    State(db): State<Db>,
    Json(input): Json<UserData>,
) -> Result<Json<Token>, StatusCode> {
    let mut backend = db.write().await;
    let valid = backend
        .users
        .get(&input.email)
        .is_some_and(|user| user.password == input.password);
    if !valid {
        return Err(StatusCode::UNAUTHORIZED);
    }
    let token = Uuid::new_v4().to_string();
    backend.sessions.insert(token.clone(), input.email);
    Ok(Json(Token { token }))
}

async fn profile(State(db): State<Db>, headers: HeaderMap) -> Result<Json<Profile>, StatusCode> {
    let backend = db.read().await;
    let email = backend.authorize(&headers)?;
    let user = backend.users.get(&email).ok_or(StatusCode::UNAUTHORIZED)?;
    Ok(Json(Profile {
        name: user.name.clone(),
        email,
    }))
}

async fn list_notes(State(db): State<Db>, headers: HeaderMap) -> Result<Json<Notes>, StatusCode> {
    let backend = db.read().await;
    let email = backend.authorize(&headers)?;
    let notes = backend.notes.get(&email).cloned().unwrap_or_default();
    Ok(Json(Notes { notes }))
}

async fn add_note(
    State(db): State<Db>,
    headers: HeaderMap,
    Json(input): Json<AddTask>,
) -> Result<Json<Task>, StatusCode> {
    let mut backend = db.write().await;
    let email = backend.authorize(&headers)?;
    let task = Task {
        id: Uuid::new_v4().to_string(),
        title: input.title,
        content: input.content,
        is_completed: false,
        task_priority: input.task_priority,
    };
    backend.notes.entry(email).or_default().push(task.clone());
    Ok(Json(task))
}

async fn complete_note(
    State(db): State<Db>,
    headers: HeaderMap,
    Query(note): Query<NoteId>,
) -> Result<Json<Message>, StatusCode> {
    let mut backend = db.write().await;
    let email = backend.authorize(&headers)?;
    let task = backend
        .notes
        .get_mut(&email)
        .and_then(|tasks| tasks.iter_mut().find(|task| task.id == note.id))
        .ok_or(StatusCode::NOT_FOUND)?;
    task.is_completed = true;
    Ok(Json(Message {
        message: "Task completed".to_string(),
    }))
}

async fn delete_note(
    State(db): State<Db>,
    headers: HeaderMap,
    Query(note): Query<NoteId>,
) -> Result<Json<Message>, StatusCode> {
    let mut backend = db.write().await;
    let email = backend.authorize(&headers)?;
    let tasks = backend.notes.get_mut(&email).ok_or(StatusCode::NOT_FOUND)?;
    let before = tasks.len();
    tasks.retain(|task| task.id != note.id);
    if tasks.len() == before {
        return Err(StatusCode::NOT_FOUND);
    }
    Ok(Json(Message {
        message: "Task deleted".to_string(),
    }))
}
