//! Synchronous API client core for the Grain admin backend.
//!
//! # Overview
//! Builds `HttpRequest` values and parses `HttpResponse` values without
//! touching the network (host-does-IO pattern). A `Transport` executes the
//! round-trip; `Session` strings the three steps together for callers that
//! just want typed results.
//!
//! # Design
//! - `AdminClient` holds only the API root and an optional bearer token.
//! - Every resource (users, roles, menus, APIs, logs, organizations, files,
//!   projects, models, fields) shares one contract: list, get by id, create,
//!   update, delete, bulk delete. The per-resource routes live in a single
//!   table in `resource`; cells the server does not expose yield
//!   `ApiError::Unsupported` before any request is built.
//! - The server answers HTTP 200 with an `Envelope` even when an operation
//!   fails. Such replies are returned as `Ok(envelope)` with
//!   `success == false`; `Err(ApiError)` is reserved for transport, status
//!   and decoding failures.
//! - `RoleCache` memoizes role options for selection widgets and is an
//!   ordinary value, not a global.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod client;
pub mod config;
pub mod envelope;
pub mod error;
pub mod http;
pub mod multipart;
pub mod query;
pub mod resource;
pub mod role_cache;
pub mod session;
pub mod transport;
pub mod types;

pub use client::AdminClient;
pub use config::ClientConfig;
pub use envelope::{Ack, Envelope, SUCCESS_CODE};
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use multipart::UploadFile;
pub use query::{encode_query, Filter, QueryPolicy, QueryValue, ZeroPolicy};
pub use resource::{Operation, RecordId, Resource};
pub use role_cache::{RoleCache, RoleOption, RoleSource};
pub use session::Session;
pub use transport::{Transport, UreqTransport};
pub use types::{CreatePayload, Record, UpdatePayload};
