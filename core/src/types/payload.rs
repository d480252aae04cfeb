use serde::Serialize;

use crate::error::ApiError;
use crate::resource::Resource;

use super::code_assistant::{CreateField, CreateModel, CreateProject, Field, Model, Project};
use super::system::{
    CreateApi, CreateMenu, CreateOrganize, CreateRole, CreateUser, SysApi, SysMenu, SysRole,
    UpdateOrganize, UpdateUser,
};

/// Body of a create call, one variant per resource that accepts creates.
#[derive(Debug, Clone, PartialEq)]
pub enum CreatePayload {
    User(CreateUser),
    Role(CreateRole),
    Menu(CreateMenu),
    Api(CreateApi),
    Organize(CreateOrganize),
    Project(CreateProject),
    Model(CreateModel),
    Field(CreateField),
}

/// Body of an update call. Updates address the record by the `id` inside it.
#[derive(Debug, Clone, PartialEq)]
pub enum UpdatePayload {
    User(UpdateUser),
    Role(SysRole),
    Menu(SysMenu),
    Api(SysApi),
    Organize(UpdateOrganize),
    Project(Project),
    Model(Model),
    Field(Field),
}

impl CreatePayload {
    pub fn resource(&self) -> Resource {
        match self {
            CreatePayload::User(_) => Resource::User,
            CreatePayload::Role(_) => Resource::Role,
            CreatePayload::Menu(_) => Resource::Menu,
            CreatePayload::Api(_) => Resource::Api,
            CreatePayload::Organize(_) => Resource::Organize,
            CreatePayload::Project(_) => Resource::Project,
            CreatePayload::Model(_) => Resource::Model,
            CreatePayload::Field(_) => Resource::Field,
        }
    }

    /// Structural checks only; business rules stay on the server.
    pub fn validate(&self) -> Result<(), ApiError> {
        match self {
            CreatePayload::User(u) => {
                require("username", &u.username)?;
                require("password", &u.password)
            }
            CreatePayload::Role(r) => {
                require("role", &r.role)?;
                require("roleName", &r.role_name)
            }
            CreatePayload::Menu(m) => require("name", &m.name),
            CreatePayload::Api(a) => {
                require("path", &a.path)?;
                require("method", &a.method)
            }
            CreatePayload::Organize(o) => require("name", &o.name),
            CreatePayload::Project(p) => require("projectName", &p.project_name),
            CreatePayload::Model(m) => {
                require_id("parentId", m.parent_id)?;
                require("structName", &m.struct_name)
            }
            CreatePayload::Field(f) => {
                require_id("parentId", f.parent_id)?;
                require("name", &f.name)
            }
        }
    }

    pub fn to_json(&self) -> Result<Vec<u8>, ApiError> {
        match self {
            CreatePayload::User(v) => to_json(v),
            CreatePayload::Role(v) => to_json(v),
            CreatePayload::Menu(v) => to_json(v),
            CreatePayload::Api(v) => to_json(v),
            CreatePayload::Organize(v) => to_json(v),
            CreatePayload::Project(v) => to_json(v),
            CreatePayload::Model(v) => to_json(v),
            CreatePayload::Field(v) => to_json(v),
        }
    }
}

impl UpdatePayload {
    pub fn resource(&self) -> Resource {
        match self {
            UpdatePayload::User(_) => Resource::User,
            UpdatePayload::Role(_) => Resource::Role,
            UpdatePayload::Menu(_) => Resource::Menu,
            UpdatePayload::Api(_) => Resource::Api,
            UpdatePayload::Organize(_) => Resource::Organize,
            UpdatePayload::Project(_) => Resource::Project,
            UpdatePayload::Model(_) => Resource::Model,
            UpdatePayload::Field(_) => Resource::Field,
        }
    }

    pub fn id(&self) -> u64 {
        match self {
            UpdatePayload::User(v) => v.id,
            UpdatePayload::Role(v) => v.id,
            UpdatePayload::Menu(v) => v.id,
            UpdatePayload::Api(v) => v.id,
            UpdatePayload::Organize(v) => v.id,
            UpdatePayload::Project(v) => v.id,
            UpdatePayload::Model(v) => v.id,
            UpdatePayload::Field(v) => v.id,
        }
    }

    pub fn validate(&self) -> Result<(), ApiError> {
        require_id("id", self.id())?;
        match self {
            UpdatePayload::Role(r) => require("role", &r.role),
            UpdatePayload::Api(a) => {
                require("path", &a.path)?;
                require("method", &a.method)
            }
            _ => Ok(()),
        }
    }

    pub fn to_json(&self) -> Result<Vec<u8>, ApiError> {
        match self {
            UpdatePayload::User(v) => to_json(v),
            UpdatePayload::Role(v) => to_json(v),
            UpdatePayload::Menu(v) => to_json(v),
            UpdatePayload::Api(v) => to_json(v),
            UpdatePayload::Organize(v) => to_json(v),
            UpdatePayload::Project(v) => to_json(v),
            UpdatePayload::Model(v) => to_json(v),
            UpdatePayload::Field(v) => to_json(v),
        }
    }
}

fn require(field: &str, value: &str) -> Result<(), ApiError> {
    if value.trim().is_empty() {
        return Err(ApiError::InvalidPayload(format!("`{field}` must not be empty")));
    }
    Ok(())
}

fn require_id(field: &str, id: u64) -> Result<(), ApiError> {
    if id == 0 {
        return Err(ApiError::InvalidPayload(format!("`{field}` must not be 0")));
    }
    Ok(())
}

fn to_json<T: Serialize>(value: &T) -> Result<Vec<u8>, ApiError> {
    serde_json::to_vec(value).map_err(|e| ApiError::SerializationError(e.to_string()))
}
