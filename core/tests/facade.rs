//! `RemoteApi` behavior against a scripted in-memory transport.
//!
//! # Design
//! `ScriptedTransport` answers each `(method, url)` pair from a queue of
//! canned outcomes and records every request it receives, so tests can
//! assert both what the facade returns and what went over the wire.

use std::collections::{HashMap, VecDeque};
use std::future::Future;
use std::pin::pin;
use std::sync::Arc;
use std::task::{Context, Poll, Waker};

use parking_lot::Mutex;
use proptest::prelude::*;
use taskie_core::{
    AddTaskRequest, ApiError, ApiService, AuthInterceptor, CallScope, ClientConfig, HttpClient,
    HttpMethod, HttpRequest, HttpResponse, HttpTransport, RemoteApi, SessionToken, Task,
    TransportError, UserDataRequest, UserProfile,
};

const BASE_URL: &str = "http://taskie.test";

type Outcome = Result<HttpResponse, TransportError>;

#[derive(Clone, Default)]
struct ScriptedTransport {
    script: Arc<Mutex<HashMap<(HttpMethod, String), VecDeque<Outcome>>>>,
    sent: Arc<Mutex<Vec<HttpRequest>>>,
}

impl ScriptedTransport {
    fn respond(&self, method: HttpMethod, path: &str, outcome: Outcome) -> &Self {
        self.script
            .lock()
            .entry((method, format!("{BASE_URL}{path}")))
            .or_default()
            .push_back(outcome);
        self
    }

    fn json(&self, method: HttpMethod, path: &str, status: u16, body: &str) -> &Self {
        self.respond(
            method,
            path,
            Ok(HttpResponse {
                status,
                headers: Vec::new(),
                body: body.to_string(),
            }),
        )
    }

    fn sent(&self) -> Vec<HttpRequest> {
        self.sent.lock().clone()
    }

    fn calls_to(&self, method: HttpMethod, path: &str) -> usize {
        let url = format!("{BASE_URL}{path}");
        self.sent
            .lock()
            .iter()
            .filter(|req| req.method == method && req.url_without_query() == url)
            .count()
    }
}

impl HttpTransport for ScriptedTransport {
    async fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        self.sent.lock().push(request.clone());
        self.script
            .lock()
            .get_mut(&(request.method, request.url_without_query().to_string()))
            .and_then(VecDeque::pop_front)
            .unwrap_or_else(|| {
                Err(TransportError::Connection(format!(
                    "no scripted response for {} {}",
                    request.method, request.url
                )))
            })
    }
}

fn api(transport: &ScriptedTransport, session: &SessionToken) -> RemoteApi<ScriptedTransport> {
    let http = HttpClient::new(transport.clone())
        .with_interceptor(AuthInterceptor::new(session.clone()));
    RemoteApi::new(ApiService::new(BASE_URL), http, session.clone())
}

fn task_json(id: &str, completed: bool) -> String {
    format!(
        r#"{{"id":"{id}","title":"title {id}","content":"","isCompleted":{completed},"taskPriority":2}}"#
    )
}

fn notes_json(tasks: &[(&str, bool)]) -> String {
    let items: Vec<String> = tasks.iter().map(|(id, done)| task_json(id, *done)).collect();
    format!(r#"{{"notes":[{}]}}"#, items.join(","))
}

fn timeout() -> Outcome {
    Err(TransportError::Timeout)
}

// ---------------------------------------------------------------------------
// Login / register
// ---------------------------------------------------------------------------

#[tokio::test]
async fn login_yields_token_and_stores_it() {
    let transport = ScriptedTransport::default();
    transport.json(HttpMethod::Post, "/api/login", 200, r#"{"token":"abc123"}"#);
    let session = SessionToken::new();

    let token = api(&transport, &session)
        .login(&UserDataRequest::login("ann@example.com", "secret"))
        .await;

    assert_eq!(token, Ok("abc123".to_string()));
    assert_eq!(session.get().as_deref(), Some("abc123"));
    assert!(transport.sent()[0].header("authorization").is_none());
}

#[tokio::test]
async fn login_with_null_or_empty_token_is_empty_response() {
    for body in [r#"{"token":null}"#, r#"{"token":""}"#, "{}", ""] {
        let transport = ScriptedTransport::default();
        transport.json(HttpMethod::Post, "/api/login", 200, body);
        let session = SessionToken::new();

        let result = api(&transport, &session)
            .login(&UserDataRequest::login("ann@example.com", "secret"))
            .await;

        assert!(
            matches!(result, Err(ApiError::EmptyResponse(_))),
            "body {body:?} gave {result:?}"
        );
        assert!(!session.is_authenticated());
    }
}

#[tokio::test]
async fn rejected_login_is_unauthorized() {
    let transport = ScriptedTransport::default();
    transport.json(HttpMethod::Post, "/api/login", 401, "");

    let result = api(&transport, &SessionToken::new())
        .login(&UserDataRequest::login("ann@example.com", "wrong"))
        .await;

    assert_eq!(result, Err(ApiError::Unauthorized));
}

#[tokio::test]
async fn register_requires_a_message() {
    let transport = ScriptedTransport::default();
    transport
        .json(HttpMethod::Post, "/api/register", 200, r#"{"message":"welcome"}"#)
        .json(HttpMethod::Post, "/api/register", 200, r#"{"message":null}"#);
    let api = api(&transport, &SessionToken::new());
    let credentials = UserDataRequest::register("ann@example.com", "secret", "Ann");

    assert_eq!(api.register(&credentials).await, Ok("welcome".to_string()));
    assert_eq!(
        api.register(&credentials).await,
        Err(ApiError::EmptyResponse("message"))
    );
}

// ---------------------------------------------------------------------------
// Tasks
// ---------------------------------------------------------------------------

#[tokio::test]
async fn list_tasks_drops_completed_tasks() {
    let transport = ScriptedTransport::default();
    transport.json(
        HttpMethod::Get,
        "/api/note",
        200,
        &notes_json(&[("a", false), ("b", true), ("c", false)]),
    );

    let tasks = api(&transport, &SessionToken::new()).list_tasks().await.unwrap();

    let ids: Vec<&str> = tasks.iter().map(|t| t.id.as_str()).collect();
    assert_eq!(ids, vec!["a", "c"]);
}

#[tokio::test]
async fn list_tasks_timeout_is_a_transport_failure() {
    let transport = ScriptedTransport::default();
    transport.respond(HttpMethod::Get, "/api/note", timeout());

    let result = api(&transport, &SessionToken::new()).list_tasks().await;

    assert_eq!(result, Err(ApiError::Transport(TransportError::Timeout)));
}

#[test]
fn list_tasks_outside_a_runtime_is_a_transport_failure() {
    let config = ClientConfig {
        base_url: "http://127.0.0.1:9".to_string(),
        ..ClientConfig::default()
    };
    let api = RemoteApi::from_config(&config, SessionToken::new());
    let mut call = pin!(api.list_tasks());
    let mut cx = Context::from_waker(Waker::noop());

    match call.as_mut().poll(&mut cx) {
        Poll::Ready(Err(ApiError::Transport(TransportError::Connection(_)))) => {}
        other => panic!("expected a transport failure, got {other:?}"),
    }
}

#[tokio::test]
async fn add_task_returns_the_server_copy() {
    let transport = ScriptedTransport::default();
    transport.json(HttpMethod::Post, "/api/note", 200, &task_json("srv-1", false));

    let task = api(&transport, &SessionToken::new())
        .add_task(&AddTaskRequest {
            title: "client title".to_string(),
            content: String::new(),
            priority: 2,
        })
        .await
        .unwrap();

    assert_eq!(task.id, "srv-1");
    assert_eq!(task.title, "title srv-1");
}

#[tokio::test]
async fn complete_task_carries_the_session_token() {
    let transport = ScriptedTransport::default();
    transport.json(
        HttpMethod::Post,
        "/api/note/complete",
        200,
        r#"{"message":"done"}"#,
    );
    let session = SessionToken::new();
    session.set("abc123");

    let result = api(&transport, &session).complete_task("t1").await;

    assert_eq!(result, Ok("done".to_string()));
    let sent = transport.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].url, format!("{BASE_URL}/api/note/complete?id=t1"));
    let auth: Vec<&str> = sent[0].header_values("authorization").collect();
    assert_eq!(auth, vec!["abc123"]);
}

#[tokio::test]
async fn mutating_calls_turn_every_failure_into_err() {
    let transport = ScriptedTransport::default();
    transport
        .respond(HttpMethod::Post, "/api/note", timeout())
        .json(HttpMethod::Post, "/api/note", 200, "<html>")
        .respond(
            HttpMethod::Post,
            "/api/note/complete",
            Err(TransportError::Connection("reset".to_string())),
        )
        .json(HttpMethod::Post, "/api/note/complete", 200, r#"{"message":42}"#)
        .json(HttpMethod::Delete, "/api/note", 404, "")
        .json(HttpMethod::Delete, "/api/note", 200, "{}");
    let api = api(&transport, &SessionToken::new());
    let new_task = AddTaskRequest {
        title: "t".to_string(),
        content: "c".to_string(),
        priority: 1,
    };

    assert_eq!(
        api.add_task(&new_task).await,
        Err(ApiError::Transport(TransportError::Timeout))
    );
    assert!(matches!(
        api.add_task(&new_task).await,
        Err(ApiError::DeserializationError(_))
    ));
    assert!(matches!(
        api.complete_task("t1").await,
        Err(ApiError::Transport(TransportError::Connection(_)))
    ));
    assert!(matches!(
        api.complete_task("t1").await,
        Err(ApiError::DeserializationError(_))
    ));
    assert_eq!(api.delete_task("t1").await, Err(ApiError::NotFound));
    assert_eq!(
        api.delete_task("t1").await,
        Err(ApiError::EmptyResponse("message"))
    );
}

// ---------------------------------------------------------------------------
// Profile composition
// ---------------------------------------------------------------------------

#[tokio::test]
async fn profile_combines_fields_with_incomplete_count() {
    let transport = ScriptedTransport::default();
    transport
        .json(
            HttpMethod::Get,
            "/api/note",
            200,
            &notes_json(&[("a", false), ("b", true), ("c", false), ("d", false)]),
        )
        .json(
            HttpMethod::Get,
            "/api/user/profile",
            200,
            r#"{"email":"ann@example.com","name":"Ann"}"#,
        );

    let profile = api(&transport, &SessionToken::new())
        .get_user_profile()
        .await
        .unwrap();

    assert_eq!(
        profile,
        UserProfile {
            email: "ann@example.com".to_string(),
            name: "Ann".to_string(),
            task_count: 3,
        }
    );
    assert_eq!(transport.calls_to(HttpMethod::Get, "/api/note"), 1);
    assert_eq!(transport.calls_to(HttpMethod::Get, "/api/user/profile"), 1);
}

#[tokio::test]
async fn profile_short_circuits_when_listing_fails() {
    let transport = ScriptedTransport::default();
    transport
        .respond(HttpMethod::Get, "/api/note", timeout())
        .json(
            HttpMethod::Get,
            "/api/user/profile",
            200,
            r#"{"email":"ann@example.com","name":"Ann"}"#,
        );
    let api = api(&transport, &SessionToken::new());

    let result = api.get_user_profile().await;

    assert_eq!(result, Err(ApiError::Transport(TransportError::Timeout)));
    assert_eq!(transport.calls_to(HttpMethod::Get, "/api/user/profile"), 0);
    assert_eq!(transport.calls_to(HttpMethod::Get, "/api/note"), 1);
}

#[tokio::test]
async fn profile_without_email_or_name_is_empty_response() {
    for body in [
        r#"{"email":null,"name":"Ann"}"#,
        r#"{"email":"ann@example.com"}"#,
        r#"{}"#,
    ] {
        let transport = ScriptedTransport::default();
        transport
            .json(HttpMethod::Get, "/api/note", 200, &notes_json(&[("a", false)]))
            .json(HttpMethod::Get, "/api/user/profile", 200, body);

        let result = api(&transport, &SessionToken::new()).get_user_profile().await;

        assert!(
            matches!(result, Err(ApiError::EmptyResponse(_))),
            "body {body:?} gave {result:?}"
        );
    }
}

// ---------------------------------------------------------------------------
// Authorization header
// ---------------------------------------------------------------------------

#[tokio::test]
async fn login_token_is_used_by_later_calls() {
    let transport = ScriptedTransport::default();
    transport
        .json(HttpMethod::Get, "/api/note", 200, r#"{"notes":[]}"#)
        .json(HttpMethod::Post, "/api/login", 200, r#"{"token":"tok-9"}"#)
        .json(HttpMethod::Get, "/api/note", 200, r#"{"notes":[]}"#);
    let api = api(&transport, &SessionToken::new());

    api.list_tasks().await.unwrap();
    api.login(&UserDataRequest::login("ann@example.com", "secret"))
        .await
        .unwrap();
    api.list_tasks().await.unwrap();

    let sent = transport.sent();
    assert!(sent[0].header("authorization").is_none());
    assert_eq!(sent[2].header("authorization"), Some("tok-9"));
}

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

#[tokio::test]
async fn scoped_calls_deliver_results() {
    let transport = ScriptedTransport::default();
    transport.json(
        HttpMethod::Get,
        "/api/note",
        200,
        &notes_json(&[("a", false), ("b", true)]),
    );
    let api = Arc::new(api(&transport, &SessionToken::new()));
    let scope = CallScope::current();

    let rx = scope.request({
        let api = Arc::clone(&api);
        async move { api.list_tasks().await }
    });

    let tasks = rx.await.unwrap().unwrap();
    assert_eq!(tasks.len(), 1);
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

fn arb_notes() -> impl Strategy<Value = Vec<(String, bool)>> {
    prop::collection::vec(("[a-z0-9]{1,8}", any::<bool>()), 0..24)
}

proptest! {
    #[test]
    fn listed_tasks_are_never_completed(notes in arb_notes()) {
        let tasks: Vec<Task> = notes
            .iter()
            .map(|(id, done)| Task {
                id: id.clone(),
                title: String::new(),
                content: String::new(),
                is_completed: *done,
                priority: 1,
            })
            .collect();
        let body = serde_json::json!({ "notes": tasks }).to_string();

        let transport = ScriptedTransport::default();
        transport.json(HttpMethod::Get, "/api/note", 200, &body);
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        let listed = rt
            .block_on(api(&transport, &SessionToken::new()).list_tasks())
            .unwrap();

        prop_assert!(listed.iter().all(|task| !task.is_completed));
        let expected: Vec<&Task> = tasks.iter().filter(|task| !task.is_completed).collect();
        prop_assert_eq!(listed.iter().collect::<Vec<_>>(), expected);
    }
}
