//! Typed async client for the Taskie task-management API.
//!
//! # Overview
//! `RemoteApi` exposes one async method per use case (login, registration,
//! task listing, creation, completion, deletion, profile) and returns an
//! `ApiResult<T>` for each. Underneath, `ApiService` declares the endpoints
//! as request builders and response parsers, `HttpClient` runs the
//! interceptor chain (session token injection, HTTP logging) and an
//! `HttpTransport` performs the round-trip.
//!
//! # Design
//! - `ApiService` is stateless and does no I/O, so endpoint shapes are
//!   testable against plain `HttpResponse` values.
//! - The session token is the only shared mutable state and sits behind
//!   `SessionToken`.
//! - `HttpTransport` is the seam for tests; `UreqTransport` is the
//!   production implementation.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod client;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod http;
pub mod interceptor;
pub mod remote;
pub mod service;
pub mod session;
pub mod transport;
pub mod types;

pub use client::HttpClient;
pub use config::{ClientConfig, ConfigError, BASE_URL};
pub use dispatch::CallScope;
pub use error::{ApiError, ApiResult};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use interceptor::{AuthInterceptor, HttpLogLevel, Interceptor, LoggingInterceptor};
pub use remote::RemoteApi;
pub use service::{ApiService, Endpoint};
pub use session::SessionToken;
pub use transport::{HttpTransport, TransportError, UreqTransport};
pub use types::{
    AddTaskRequest, CompleteNoteResponse, DeleteNoteResponse, GetTasksResponse, LoginResponse,
    PriorityTier, RegisterResponse, Task, UserDataRequest, UserProfile, UserProfileResponse,
};
