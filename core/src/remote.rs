//! Use-case facade over the Taskie endpoints.
//!
//! # Design
//! `RemoteApi` pairs the stateless `ApiService` with an `HttpClient` and
//! exposes one async method per use case. Every method returns
//! `ApiResult<T>`: transport failures, non-2xx statuses, undecodable
//! bodies and missing required fields all surface as `Err(ApiError)`.
//! Nothing is retried.

use crate::client::HttpClient;
use crate::config::ClientConfig;
use crate::error::{ApiError, ApiResult};
use crate::interceptor::{AuthInterceptor, LoggingInterceptor};
use crate::service::ApiService;
use crate::session::SessionToken;
use crate::transport::{HttpTransport, UreqTransport};
use crate::types::{AddTaskRequest, Task, UserDataRequest, UserProfile};

pub struct RemoteApi<T> {
    service: ApiService,
    http: HttpClient<T>,
    session: SessionToken,
}

impl RemoteApi<UreqTransport> {
    /// Production wiring: `ureq` transport with the auth interceptor
    /// followed by HTTP logging.
    pub fn from_config(config: &ClientConfig, session: SessionToken) -> Self {
        let http = HttpClient::new(UreqTransport::new(config.timeout()))
            .with_interceptor(AuthInterceptor::new(session.clone()))
            .with_interceptor(LoggingInterceptor::new(config.http_log));
        Self::new(ApiService::new(&config.base_url), http, session)
    }
}

impl<T: HttpTransport> RemoteApi<T> {
    /// `session` receives the token on login; install an `AuthInterceptor`
    /// reading the same session in `http` for authenticated calls.
    pub fn new(service: ApiService, http: HttpClient<T>, session: SessionToken) -> Self {
        Self {
            service,
            http,
            session,
        }
    }

    pub fn session(&self) -> &SessionToken {
        &self.session
    }

    /// Log in and store the returned token in the session.
    pub async fn login(&self, credentials: &UserDataRequest) -> ApiResult<String> {
        let result = self.request_token(credentials).await;
        if let Ok(token) = &result {
            self.session.set(token.as_str());
        }
        logged("login", result)
    }

    /// Register a new account; yields the server's confirmation message.
    pub async fn register(&self, credentials: &UserDataRequest) -> ApiResult<String> {
        logged("register", self.request_registration(credentials).await)
    }

    /// Tasks that are not completed yet, in server order.
    pub async fn list_tasks(&self) -> ApiResult<Vec<Task>> {
        logged("list_tasks", self.fetch_incomplete_tasks().await)
    }

    /// Create a task. The returned task carries the server-assigned id.
    pub async fn add_task(&self, task: &AddTaskRequest) -> ApiResult<Task> {
        logged("add_task", self.create_task(task).await)
    }

    pub async fn complete_task(&self, task_id: &str) -> ApiResult<String> {
        let result = self
            .http
            .send(self.service.build_complete_task(task_id))
            .await
            .map_err(ApiError::from)
            .and_then(|response| self.service.parse_complete_task(response))
            .and_then(|body| body.message.ok_or(ApiError::EmptyResponse("message")));
        logged("complete_task", result)
    }

    pub async fn delete_task(&self, task_id: &str) -> ApiResult<String> {
        let result = self
            .http
            .send(self.service.build_delete_task(task_id))
            .await
            .map_err(ApiError::from)
            .and_then(|response| self.service.parse_delete_task(response))
            .and_then(|body| body.message.ok_or(ApiError::EmptyResponse("message")));
        logged("delete_task", result)
    }

    /// Profile fields plus the number of incomplete tasks.
    ///
    /// The task listing runs first; if it fails, its error is returned and
    /// the profile endpoint is not called.
    pub async fn get_user_profile(&self) -> ApiResult<UserProfile> {
        let tasks = self.list_tasks().await?;
        logged("get_user_profile", self.fetch_profile(tasks.len()).await)
    }

    async fn request_token(&self, credentials: &UserDataRequest) -> ApiResult<String> {
        let request = self.service.build_login(credentials)?;
        let response = self.http.send(request).await?;
        self.service
            .parse_login(response)?
            .token
            .filter(|token| !token.is_empty())
            .ok_or(ApiError::EmptyResponse("token"))
    }

    async fn request_registration(&self, credentials: &UserDataRequest) -> ApiResult<String> {
        let request = self.service.build_register(credentials)?;
        let response = self.http.send(request).await?;
        self.service
            .parse_register(response)?
            .message
            .ok_or(ApiError::EmptyResponse("message"))
    }

    async fn fetch_incomplete_tasks(&self) -> ApiResult<Vec<Task>> {
        let response = self.http.send(self.service.build_list_tasks()).await?;
        let body = self.service.parse_list_tasks(response)?;
        Ok(incomplete(body.notes))
    }

    async fn create_task(&self, task: &AddTaskRequest) -> ApiResult<Task> {
        let request = self.service.build_add_task(task)?;
        let response = self.http.send(request).await?;
        self.service.parse_add_task(response)
    }

    async fn fetch_profile(&self, task_count: usize) -> ApiResult<UserProfile> {
        let response = self.http.send(self.service.build_get_profile()).await?;
        let profile = self.service.parse_get_profile(response)?;
        let email = profile.email.ok_or(ApiError::EmptyResponse("email"))?;
        let name = profile.name.ok_or(ApiError::EmptyResponse("name"))?;
        Ok(UserProfile {
            email,
            name,
            task_count,
        })
    }
}

impl<T> std::fmt::Debug for RemoteApi<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteApi")
            .field("service", &self.service)
            .field("http", &self.http)
            .field("session", &self.session)
            .finish()
    }
}

fn incomplete(tasks: Vec<Task>) -> Vec<Task> {
    tasks.into_iter().filter(|task| !task.is_completed).collect()
}

fn logged<V>(operation: &'static str, result: ApiResult<V>) -> ApiResult<V> {
    if let Err(err) = &result {
        tracing::warn!(operation, error = %err, "remote call failed");
    }
    result
}
