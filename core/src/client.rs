//! Stateless HTTP request builder and response parser for the Grain admin API.
//!
//! # Design
//! `AdminClient` holds the API root and an optional bearer token and carries
//! no other state between calls. Every operation is split into a `build_*`
//! method that produces an `HttpRequest` and a `parse_*` method that consumes
//! an `HttpResponse`. The caller (or a `Transport`) executes the round-trip,
//! keeping this module deterministic and free of I/O.
//!
//! Parsing has two outcomes that must not be confused: `Err(ApiError)` when
//! the exchange itself failed, and `Ok(envelope)` whenever the server produced
//! a well-formed envelope, including `success: false` ones.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::{ClientConfig, DEFAULT_API_PREFIX};
use crate::envelope::{Ack, Envelope, OneOrMany};
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::multipart::{self, UploadFile};
use crate::query::{encode_pair, encode_query, Filter, QueryPolicy};
use crate::resource::{ByIdRoute, Operation, RecordId, Resource};
use crate::types::{CasbinPolicy, CreatePayload, DefaultRole, LoginRequest, UpdatePayload};

const JSON: &str = "application/json";

/// Synchronous, stateless client for the Grain admin API.
#[derive(Debug, Clone)]
pub struct AdminClient {
    api_root: String,
    token: Option<String>,
}

impl AdminClient {
    /// Client for `base_url` with the default `/api/v1` prefix.
    pub fn new(base_url: &str) -> Self {
        Self::with_prefix(base_url, DEFAULT_API_PREFIX)
    }

    pub fn with_prefix(base_url: &str, api_prefix: &str) -> Self {
        let base = base_url.trim_end_matches('/');
        let prefix = api_prefix.trim_matches('/');
        let api_root = if prefix.is_empty() {
            base.to_string()
        } else {
            format!("{base}/{prefix}")
        };
        Self {
            api_root,
            token: None,
        }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        let mut client = Self::with_prefix(&config.base_url, &config.api_prefix);
        client.token = config.token.clone();
        client
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn set_token(&mut self, token: Option<String>) {
        self.token = token;
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    // -----------------------------------------------------------------------
    // Resource contract
    // -----------------------------------------------------------------------

    /// `GET <list>?<query>` using the resource's default zero policy.
    pub fn build_list(&self, resource: Resource, filter: &Filter) -> Result<HttpRequest, ApiError> {
        self.build_list_with(resource, filter, &resource.default_policy())
    }

    pub fn build_list_with(
        &self,
        resource: Resource,
        filter: &Filter,
        policy: &QueryPolicy,
    ) -> Result<HttpRequest, ApiError> {
        filter.pagination()?;
        let query = encode_query(filter, policy);
        let url = format!("{}?{query}", self.url(resource.routes().list));
        Ok(self.request(HttpMethod::Get, url, None))
    }

    pub fn build_get(&self, resource: Resource, id: impl Into<RecordId>) -> Result<HttpRequest, ApiError> {
        let id = id.into();
        let url = match resource.routes().get {
            Some(ByIdRoute::Path(path)) => {
                format!("{}/{}", self.url(path), urlencoding::encode(&id.to_string()))
            }
            Some(ByIdRoute::Query(path, key)) => {
                format!("{}?{}", self.url(path), encode_pair(key, &id.to_string()))
            }
            None => return Err(unsupported(resource, Operation::Get)),
        };
        Ok(self.request(HttpMethod::Get, url, None))
    }

    pub fn build_create(&self, payload: &CreatePayload) -> Result<HttpRequest, ApiError> {
        let resource = payload.resource();
        let path = resource
            .routes()
            .create
            .ok_or_else(|| unsupported(resource, Operation::Create))?;
        payload.validate()?;
        Ok(self.request(HttpMethod::Post, self.url(path), Some((JSON.to_string(), payload.to_json()?))))
    }

    pub fn build_update(&self, payload: &UpdatePayload) -> Result<HttpRequest, ApiError> {
        let resource = payload.resource();
        let path = resource
            .routes()
            .update
            .ok_or_else(|| unsupported(resource, Operation::Update))?;
        payload.validate()?;
        Ok(self.request(HttpMethod::Put, self.url(path), Some((JSON.to_string(), payload.to_json()?))))
    }

    /// `DELETE <path>?<key>=<id>`.
    pub fn build_delete(&self, resource: Resource, id: impl Into<RecordId>) -> HttpRequest {
        let (path, key) = resource.routes().delete;
        let url = format!("{}?{}", self.url(path), encode_pair(key, &id.into().to_string()));
        self.request(HttpMethod::Delete, url, None)
    }

    /// One `DELETE` whose JSON body is `{"ids": [...]}`.
    pub fn build_delete_many(&self, resource: Resource, ids: &[RecordId]) -> Result<HttpRequest, ApiError> {
        let path = resource
            .routes()
            .delete_many
            .ok_or_else(|| unsupported(resource, Operation::DeleteMany))?;
        if ids.is_empty() {
            return Err(ApiError::InvalidPayload("`ids` must not be empty".to_string()));
        }

        #[derive(Serialize)]
        struct Ids<'a> {
            ids: &'a [RecordId],
        }

        let body = to_json(&Ids { ids })?;
        Ok(self.request(HttpMethod::Delete, self.url(path), Some((JSON.to_string(), body))))
    }

    /// Multipart `POST upload` with the file in the `file` part.
    pub fn build_upload(&self, file: &UploadFile) -> HttpRequest {
        let boundary = multipart::new_boundary();
        let body = multipart::form_data(&boundary, "file", file);
        let content_type = format!("multipart/form-data; boundary={boundary}");
        self.request(HttpMethod::Post, self.url("upload"), Some((content_type, body)))
    }

    // -----------------------------------------------------------------------
    // Account, menu and permission endpoints
    // -----------------------------------------------------------------------

    pub fn build_login(&self, login: &LoginRequest) -> Result<HttpRequest, ApiError> {
        Ok(self.request(
            HttpMethod::Post,
            self.url("sysUser/login"),
            Some((JSON.to_string(), to_json(login)?)),
        ))
    }

    pub fn build_user_info(&self) -> HttpRequest {
        self.request(HttpMethod::Get, self.url("sysUser/info"), None)
    }

    pub fn build_set_default_role(&self, role: &DefaultRole) -> Result<HttpRequest, ApiError> {
        Ok(self.request(
            HttpMethod::Put,
            self.url("sysUser/setDefaultRole"),
            Some((JSON.to_string(), to_json(role)?)),
        ))
    }

    pub fn build_switch_role(&self, role: &str) -> HttpRequest {
        let url = format!("{}?{}", self.url("sysUser/switchRole"), encode_pair("role", role));
        self.request(HttpMethod::Post, url, None)
    }

    /// Menu tree of the logged-in user's current role.
    pub fn build_user_menu(&self) -> HttpRequest {
        self.request(HttpMethod::Get, self.url("sysMenu/userMenu"), None)
    }

    pub fn build_api_groups(&self) -> HttpRequest {
        self.request(HttpMethod::Get, self.url("sysApi/apiGroups"), None)
    }

    pub fn build_api_permissions(&self, role: &str) -> HttpRequest {
        let url = format!("{}?{}", self.url("sysApi/apiAndPermissions"), encode_pair("role", role));
        self.request(HttpMethod::Get, url, None)
    }

    pub fn build_update_casbin(&self, policy: &CasbinPolicy) -> Result<HttpRequest, ApiError> {
        if policy.role.trim().is_empty() {
            return Err(ApiError::InvalidPayload("`role` must not be empty".to_string()));
        }
        Ok(self.request(HttpMethod::Put, self.url("casbin"), Some((JSON.to_string(), to_json(policy)?))))
    }

    // -----------------------------------------------------------------------
    // Parsing
    // -----------------------------------------------------------------------

    pub fn parse_list<T: DeserializeOwned>(&self, response: HttpResponse) -> Result<Envelope<Vec<T>>, ApiError> {
        self.parse_envelope(response)
    }

    /// By-id replies carry either the record or a single-element array; both
    /// become `Some(record)`. A bare JSON array without an envelope is
    /// accepted as well and treated as a successful reply.
    pub fn parse_get<T: DeserializeOwned>(&self, response: HttpResponse) -> Result<Envelope<Option<T>>, ApiError> {
        let envelope: Envelope<Option<OneOrMany<T>>> = if is_2xx(&response) {
            let value: serde_json::Value = from_json(&response.body)?;
            if value.is_array() {
                Envelope::wrap(Some(from_value(value)?))
            } else {
                from_value(value)?
            }
        } else {
            status_envelope(&response)?
        };
        Ok(envelope.map(|data| data.and_then(OneOrMany::into_first)))
    }

    pub fn parse_ack(&self, response: HttpResponse) -> Result<Ack, ApiError> {
        self.parse_envelope(response)
    }

    pub fn parse_envelope<T: DeserializeOwned + Default>(
        &self,
        response: HttpResponse,
    ) -> Result<Envelope<T>, ApiError> {
        if is_2xx(&response) {
            from_json(&response.body)
        } else {
            status_envelope(&response)
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{path}", self.api_root)
    }

    fn request(&self, method: HttpMethod, path: String, body: Option<(String, Vec<u8>)>) -> HttpRequest {
        let mut headers = Vec::new();
        if let Some(token) = &self.token {
            headers.push(("authorization".to_string(), format!("Bearer {token}")));
        }
        let body = body.map(|(content_type, bytes)| {
            headers.push(("content-type".to_string(), content_type));
            bytes
        });
        HttpRequest {
            method,
            path,
            headers,
            body,
        }
    }
}

fn is_2xx(response: &HttpResponse) -> bool {
    (200..300).contains(&response.status)
}

/// Decode a non-2xx reply. A body that is an envelope (an object carrying
/// `code` or `success`) is the server's answer and comes back as data;
/// anything else maps to a status error.
fn status_envelope<T: DeserializeOwned>(response: &HttpResponse) -> Result<T, ApiError> {
    serde_json::from_str::<serde_json::Value>(&response.body)
        .ok()
        .filter(|value| value.get("code").is_some() || value.get("success").is_some())
        .and_then(|value| serde_json::from_value(value).ok())
        .ok_or_else(|| status_error(response))
}

/// Map a non-2xx status code to the appropriate `ApiError` variant.
fn status_error(response: &HttpResponse) -> ApiError {
    if response.status == 404 {
        return ApiError::NotFound;
    }
    ApiError::HttpError {
        status: response.status,
        body: response.body.clone(),
    }
}

fn unsupported(resource: Resource, operation: Operation) -> ApiError {
    ApiError::Unsupported { resource, operation }
}

fn to_json<T: Serialize>(value: &T) -> Result<Vec<u8>, ApiError> {
    serde_json::to_vec(value).map_err(|e| ApiError::SerializationError(e.to_string()))
}

fn from_json<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    serde_json::from_str(body).map_err(|e| ApiError::DeserializationError(e.to_string()))
}

fn from_value<T: DeserializeOwned>(value: serde_json::Value) -> Result<T, ApiError> {
    serde_json::from_value(value).map_err(|e| ApiError::DeserializationError(e.to_string()))
}
