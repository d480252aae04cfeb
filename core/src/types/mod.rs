//! Domain DTOs for the Grain admin API.
//!
//! # Design
//! Records are lenient on input: every field defaults, because the server
//! omits zero values and returns `null` for empty lists. Field names follow
//! the server's JSON tags (camelCase, with a few historical exceptions marked
//! by `rename`).
//!
//! Write payloads are grouped into `CreatePayload` / `UpdatePayload`, one
//! variant per resource, so the resource a payload targets is decided by its
//! type and checked before any request is built.

mod code_assistant;
mod payload;
mod system;

use serde::de::DeserializeOwned;

use crate::resource::Resource;

pub use code_assistant::{CreateField, CreateModel, CreateProject, Field, Model, Project};
pub use payload::{CreatePayload, UpdatePayload};
pub use system::{
    ApiGroupName, ApiPermissions, CasbinPolicy, CreateApi, CreateMenu, CreateOrganize,
    CreateRole, CreateUser, DefaultRole, LoginRequest, LoginToken, MenuMeta, Organize,
    OrganizeLevel, SysApi, SysFile, SysLog, SysMenu, SysRole, SysUser, UpdateOrganize,
    UpdateUser,
};

/// A record type served by one resource's list endpoint.
pub trait Record: DeserializeOwned {
    const RESOURCE: Resource;
}

impl Record for SysUser {
    const RESOURCE: Resource = Resource::User;
}

impl Record for SysRole {
    const RESOURCE: Resource = Resource::Role;
}

impl Record for SysMenu {
    const RESOURCE: Resource = Resource::Menu;
}

impl Record for SysApi {
    const RESOURCE: Resource = Resource::Api;
}

impl Record for SysLog {
    const RESOURCE: Resource = Resource::Log;
}

impl Record for Organize {
    const RESOURCE: Resource = Resource::Organize;
}

impl Record for SysFile {
    const RESOURCE: Resource = Resource::File;
}

impl Record for Project {
    const RESOURCE: Resource = Resource::Project;
}

impl Record for Model {
    const RESOURCE: Resource = Resource::Model;
}

impl Record for Field {
    const RESOURCE: Resource = Resource::Field;
}
