//! Data-access core for the advisor catalog site.
//!
//! # Overview
//! Talks to a NocoDB instance over its v2 table API and keeps the
//! "currently selected advisor" shared between independent consumers.
//!
//! # Design
//! - `NocoDbClient` is stateless: it builds `HttpRequest` values and parses
//!   `HttpResponse` values without touching the network (host-does-IO).
//! - `NocoDb` binds the client to a `Transport` (blocking `ureq` by default)
//!   and exposes `get`/`post`/`patch`/`delete`. Build it once at startup and
//!   pass it to whoever needs it.
//! - Every non-2xx response becomes `ApiError::HttpError`, displayed as
//!   `[<status>] <message>`.
//! - `Selection` is an explicit observable store instead of ambient global
//!   state; consumers hold a `SelectionWatcher`.
//! - Record types are defined independently from the mock server;
//!   integration tests catch schema drift.

pub mod advisors;
pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod options;
pub mod selection;
pub mod transport;
pub mod types;

pub use advisors::{AdvisorQuery, AdvisorService};
pub use api::NocoDb;
pub use client::NocoDbClient;
pub use config::{ConfigError, NocoDbConfig};
pub use error::{ApiError, DEFAULT_ERROR_MESSAGE};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use options::{ParamValue, RequestOptions};
pub use selection::{Selection, SelectionClosed, SelectionWatcher};
pub use transport::{Transport, UreqTransport};
pub use types::{Advisor, CreateAdvisor, ListResponse, PageInfo, Record, UpdateAdvisor};
