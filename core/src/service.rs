//! Endpoint declaration for the Taskie backend.
//!
//! # Design
//! `Endpoint` lists every remote operation as data (method, path, whether
//! it needs a session token). `ApiService` holds only a `base_url` and,
//! per endpoint, splits the call into a `build_*` method that produces an
//! `HttpRequest` and a `parse_*` method that consumes an `HttpResponse`.
//! It performs no I/O and no business validation: required-field checks
//! live in `RemoteApi`.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{
    AddTaskRequest, CompleteNoteResponse, DeleteNoteResponse, GetTasksResponse, LoginResponse,
    RegisterResponse, Task, UserDataRequest, UserProfileResponse,
};

/// The fixed set of remote operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Register,
    Login,
    GetProfile,
    ListTasks,
    AddTask,
    CompleteTask,
    DeleteTask,
}

impl Endpoint {
    pub const ALL: [Endpoint; 7] = [
        Endpoint::Register,
        Endpoint::Login,
        Endpoint::GetProfile,
        Endpoint::ListTasks,
        Endpoint::AddTask,
        Endpoint::CompleteTask,
        Endpoint::DeleteTask,
    ];

    pub fn method(self) -> HttpMethod {
        match self {
            Endpoint::GetProfile | Endpoint::ListTasks => HttpMethod::Get,
            Endpoint::Register | Endpoint::Login | Endpoint::AddTask | Endpoint::CompleteTask => {
                HttpMethod::Post
            }
            Endpoint::DeleteTask => HttpMethod::Delete,
        }
    }

    pub fn path(self) -> &'static str {
        match self {
            Endpoint::Register => "/api/register",
            Endpoint::Login => "/api/login",
            Endpoint::GetProfile => "/api/user/profile",
            Endpoint::ListTasks | Endpoint::AddTask | Endpoint::DeleteTask => "/api/note",
            Endpoint::CompleteTask => "/api/note/complete",
        }
    }

    /// Whether the backend rejects this call without a session token.
    pub fn requires_auth(self) -> bool {
        !matches!(self, Endpoint::Register | Endpoint::Login)
    }
}

/// Stateless request builder and response parser for the Taskie API.
#[derive(Debug, Clone)]
pub struct ApiService {
    base_url: String,
}

impl ApiService {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn build_register(&self, input: &UserDataRequest) -> Result<HttpRequest, ApiError> {
        self.json_request(Endpoint::Register, input)
    }

    pub fn build_login(&self, input: &UserDataRequest) -> Result<HttpRequest, ApiError> {
        self.json_request(Endpoint::Login, input)
    }

    pub fn build_get_profile(&self) -> HttpRequest {
        self.bare_request(Endpoint::GetProfile, None)
    }

    pub fn build_list_tasks(&self) -> HttpRequest {
        self.bare_request(Endpoint::ListTasks, None)
    }

    pub fn build_add_task(&self, input: &AddTaskRequest) -> Result<HttpRequest, ApiError> {
        self.json_request(Endpoint::AddTask, input)
    }

    pub fn build_complete_task(&self, task_id: &str) -> HttpRequest {
        self.bare_request(Endpoint::CompleteTask, Some(task_id))
    }

    pub fn build_delete_task(&self, task_id: &str) -> HttpRequest {
        self.bare_request(Endpoint::DeleteTask, Some(task_id))
    }

    pub fn parse_register(&self, response: HttpResponse) -> Result<RegisterResponse, ApiError> {
        decode(response)
    }

    pub fn parse_login(&self, response: HttpResponse) -> Result<LoginResponse, ApiError> {
        decode(response)
    }

    pub fn parse_get_profile(
        &self,
        response: HttpResponse,
    ) -> Result<UserProfileResponse, ApiError> {
        decode(response)
    }

    pub fn parse_list_tasks(&self, response: HttpResponse) -> Result<GetTasksResponse, ApiError> {
        decode(response)
    }

    pub fn parse_add_task(&self, response: HttpResponse) -> Result<Task, ApiError> {
        decode(response)
    }

    pub fn parse_complete_task(
        &self,
        response: HttpResponse,
    ) -> Result<CompleteNoteResponse, ApiError> {
        decode(response)
    }

    pub fn parse_delete_task(
        &self,
        response: HttpResponse,
    ) -> Result<DeleteNoteResponse, ApiError> {
        decode(response)
    }

    fn url(&self, endpoint: Endpoint, task_id: Option<&str>) -> String {
        let mut url = format!("{}{}", self.base_url, endpoint.path());
        if let Some(id) = task_id {
            let query = url::form_urlencoded::Serializer::new(String::new())
                .append_pair("id", id)
                .finish();
            url.push('?');
            url.push_str(&query);
        }
        url
    }

    fn bare_request(&self, endpoint: Endpoint, task_id: Option<&str>) -> HttpRequest {
        HttpRequest {
            method: endpoint.method(),
            url: self.url(endpoint, task_id),
            headers: Vec::new(),
            body: None,
        }
    }

    fn json_request<B: Serialize>(
        &self,
        endpoint: Endpoint,
        input: &B,
    ) -> Result<HttpRequest, ApiError> {
        let body =
            serde_json::to_string(input).map_err(|e| ApiError::SerializationError(e.to_string()))?;
        Ok(HttpRequest {
            method: endpoint.method(),
            url: self.url(endpoint, None),
            headers: vec![("content-type".to_string(), "application/json".to_string())],
            body: Some(body),
        })
    }
}

/// Map non-success status codes to the appropriate `ApiError` variant.
fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }
    match response.status {
        401 => Err(ApiError::Unauthorized),
        404 => Err(ApiError::NotFound),
        status => Err(ApiError::HttpError {
            status,
            body: response.body.clone(),
        }),
    }
}

fn decode<T: DeserializeOwned>(response: HttpResponse) -> Result<T, ApiError> {
    check_status(&response)?;
    if response.body.trim().is_empty() {
        return Err(ApiError::EmptyResponse("body"));
    }
    Ok(serde_json::from_str(&response.body)?)
}
