//! One call per operation: build, execute, parse.
//!
//! `Session` pairs an `AdminClient` with a `Transport`. It adds no retries and
//! no caching; each method issues exactly one request.

use tracing::debug;

use crate::client::AdminClient;
use crate::config::ClientConfig;
use crate::envelope::{Ack, Envelope};
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};
use crate::multipart::UploadFile;
use crate::query::{Filter, QueryPolicy};
use crate::resource::{RecordId, Resource};
use crate::role_cache::RoleSource;
use crate::transport::{Transport, UreqTransport};
use crate::types::{
    ApiGroupName, ApiPermissions, CasbinPolicy, CreatePayload, DefaultRole, LoginRequest,
    LoginToken, Record, SysFile, SysMenu, SysRole, SysUser, UpdatePayload,
};

const ACCOUNT: &str = "account";
const CASBIN: &str = "casbin";

/// An `AdminClient` bound to the `Transport` that executes its requests.
#[derive(Debug, Clone)]
pub struct Session<T> {
    client: AdminClient,
    transport: T,
}

impl Session<UreqTransport> {
    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(AdminClient::from_config(config), UreqTransport::new(config))
    }
}

impl<T: Transport> Session<T> {
    pub fn new(client: AdminClient, transport: T) -> Self {
        Self { client, transport }
    }

    pub fn client(&self) -> &AdminClient {
        &self.client
    }

    pub fn list<R: Record>(&self, filter: &Filter) -> Result<Envelope<Vec<R>>, ApiError> {
        let request = self.client.build_list(R::RESOURCE, filter)?;
        self.call(R::RESOURCE.name(), "list", request, AdminClient::parse_list)
    }

    pub fn list_with<R: Record>(
        &self,
        filter: &Filter,
        policy: &QueryPolicy,
    ) -> Result<Envelope<Vec<R>>, ApiError> {
        let request = self.client.build_list_with(R::RESOURCE, filter, policy)?;
        self.call(R::RESOURCE.name(), "list", request, AdminClient::parse_list)
    }

    pub fn get<R: Record>(&self, id: impl Into<RecordId>) -> Result<Envelope<Option<R>>, ApiError> {
        let request = self.client.build_get(R::RESOURCE, id)?;
        self.call(R::RESOURCE.name(), "get", request, AdminClient::parse_get)
    }

    pub fn create(&self, payload: &CreatePayload) -> Result<Ack, ApiError> {
        let request = self.client.build_create(payload)?;
        self.call(payload.resource().name(), "create", request, AdminClient::parse_ack)
    }

    pub fn update(&self, payload: &UpdatePayload) -> Result<Ack, ApiError> {
        let request = self.client.build_update(payload)?;
        self.call(payload.resource().name(), "update", request, AdminClient::parse_ack)
    }

    pub fn delete(&self, resource: Resource, id: impl Into<RecordId>) -> Result<Ack, ApiError> {
        let request = self.client.build_delete(resource, id);
        self.call(resource.name(), "delete", request, AdminClient::parse_ack)
    }

    pub fn delete_many(&self, resource: Resource, ids: &[RecordId]) -> Result<Ack, ApiError> {
        let request = self.client.build_delete_many(resource, ids)?;
        self.call(resource.name(), "bulk delete", request, AdminClient::parse_ack)
    }

    pub fn upload(&self, file: &UploadFile) -> Result<Envelope<SysFile>, ApiError> {
        let request = self.client.build_upload(file);
        self.call(Resource::File.name(), "upload", request, AdminClient::parse_envelope)
    }

    /// Logs in and, on success, uses the returned token for later calls.
    pub fn login(&mut self, username: &str, password: &str) -> Result<Envelope<LoginToken>, ApiError> {
        let request = self.client.build_login(&LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
            captcha: String::new(),
        })?;
        let envelope = self.call(ACCOUNT, "login", request, AdminClient::parse_envelope)?;
        self.adopt_token(&envelope);
        Ok(envelope)
    }

    /// Switches the active role; the server answers with a fresh token.
    pub fn switch_role(&mut self, role: &str) -> Result<Envelope<LoginToken>, ApiError> {
        let request = self.client.build_switch_role(role);
        let envelope = self.call(ACCOUNT, "switch role", request, AdminClient::parse_envelope)?;
        self.adopt_token(&envelope);
        Ok(envelope)
    }

    pub fn user_info(&self) -> Result<Envelope<SysUser>, ApiError> {
        let request = self.client.build_user_info();
        self.call(ACCOUNT, "user info", request, AdminClient::parse_envelope)
    }

    pub fn set_default_role(&self, role: &DefaultRole) -> Result<Ack, ApiError> {
        let request = self.client.build_set_default_role(role)?;
        self.call(ACCOUNT, "set default role", request, AdminClient::parse_ack)
    }

    pub fn user_menu(&self) -> Result<Envelope<Vec<SysMenu>>, ApiError> {
        let request = self.client.build_user_menu();
        self.call(Resource::Menu.name(), "user menu", request, AdminClient::parse_envelope)
    }

    pub fn api_groups(&self) -> Result<Envelope<Vec<ApiGroupName>>, ApiError> {
        let request = self.client.build_api_groups();
        self.call(Resource::Api.name(), "groups", request, AdminClient::parse_envelope)
    }

    pub fn api_permissions(&self, role: &str) -> Result<Envelope<ApiPermissions>, ApiError> {
        let request = self.client.build_api_permissions(role);
        self.call(Resource::Api.name(), "permissions", request, AdminClient::parse_envelope)
    }

    pub fn update_casbin(&self, policy: &CasbinPolicy) -> Result<Ack, ApiError> {
        let request = self.client.build_update_casbin(policy)?;
        self.call(CASBIN, "update", request, AdminClient::parse_ack)
    }

    /// Executes `request`, parses the reply and logs the envelope outcome.
    /// `scope` names the resource, or the account/casbin area the call
    /// belongs to.
    fn call<D>(
        &self,
        scope: &str,
        operation: &str,
        request: HttpRequest,
        parse: impl FnOnce(&AdminClient, HttpResponse) -> Result<Envelope<D>, ApiError>,
    ) -> Result<Envelope<D>, ApiError> {
        let envelope = parse(&self.client, self.transport.execute(request)?)?;
        debug!(
            scope,
            operation,
            success = envelope.success,
            code = envelope.code,
            message = %envelope.message,
            "server replied"
        );
        Ok(envelope)
    }

    fn adopt_token(&mut self, envelope: &Envelope<LoginToken>) {
        if envelope.success && !envelope.data.token.is_empty() {
            self.client.set_token(Some(envelope.data.token.clone()));
        }
    }
}

impl<T: Transport> RoleSource for Session<T> {
    fn list_roles(&self, filter: &Filter) -> Result<Envelope<Vec<SysRole>>, ApiError> {
        self.list::<SysRole>(filter)
    }
}
