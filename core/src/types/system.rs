use serde::{Deserialize, Serialize};

use crate::envelope::null_as_default;
use crate::query::Filter;

/// An administrator or end user account.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SysUser {
    pub id: u64,
    pub uid: String,
    pub username: String,
    pub nickname: String,
    pub email: String,
    pub mobile: String,
    pub avatar: String,
    #[serde(deserialize_with = "null_as_default")]
    pub roles: Vec<String>,
    /// The role currently in effect.
    pub role: String,
    /// `yes` for active accounts, `no` for locked ones.
    pub status: String,
    pub organize: String,
    pub department: String,
    pub position: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SysRole {
    pub id: u64,
    /// Role identifier used in policies and on user accounts.
    pub role: String,
    pub role_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MenuMeta {
    #[serde(alias = "locale")]
    pub i18n: String,
    pub requires_auth: bool,
    pub icon: String,
    pub order: u32,
    #[serde(deserialize_with = "null_as_default")]
    pub roles: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SysMenu {
    pub id: u64,
    #[serde(alias = "ParentId")]
    pub parent_id: u64,
    pub path: String,
    pub name: String,
    pub meta: Option<MenuMeta>,
    #[serde(deserialize_with = "null_as_default")]
    pub children: Vec<SysMenu>,
}

/// A registered HTTP route that policies can grant.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SysApi {
    pub id: u64,
    pub path: String,
    pub method: String,
    pub description: String,
    pub group: String,
    #[serde(deserialize_with = "null_as_default", skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<SysApi>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiGroupName {
    pub group: String,
}

/// APIs granted to a role alongside the full API list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ApiPermissions {
    #[serde(deserialize_with = "null_as_default")]
    pub auth_api: Vec<u64>,
    #[serde(deserialize_with = "null_as_default")]
    pub api_list: Vec<SysApi>,
}

/// Replaces the set of APIs a role may call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CasbinPolicy {
    pub role: String,
    /// `SysApi` ids.
    pub data: Vec<u64>,
}

/// One audit log entry. Logs are stored in MongoDB, hence the string id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SysLog {
    pub id: String,
    pub uid: String,
    pub name: String,
    pub role: String,
    pub username: String,
    pub nickname: String,
    pub method: String,
    pub path: String,
    pub res_code: i64,
    #[serde(rename = "clientIP")]
    pub client_ip: String,
    pub request_at: String,
    pub response_at: String,
    pub latency: i64,
    pub status_code: i64,
    pub body_size: i64,
}

/// A node of the organization tree: organization, department or position.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Organize {
    pub id: u64,
    pub parent_id: u64,
    pub name: String,
    pub leader: String,
    pub oe_type: i32,
    #[serde(deserialize_with = "null_as_default", skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Organize>,
}

/// Depth of an organization node, sent as `qType` on list calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrganizeLevel {
    Organize = 1,
    Department = 2,
    Position = 3,
}

impl OrganizeLevel {
    /// Scope `filter` to this level. Departments and positions are listed
    /// under their parent node `id`.
    pub fn scope(self, filter: Filter, parent: Option<u64>) -> Filter {
        let filter = filter.with("qType", self as u32);
        match parent {
            Some(id) => filter.with("id", id),
            None => filter,
        }
    }
}

/// An uploaded file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SysFile {
    pub id: u64,
    pub uid: String,
    pub file_name: String,
    pub file_url: String,
    pub file_purpose: String,
    pub file_type: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUser {
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub nickname: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub mobile: String,
    #[serde(default)]
    pub roles: Vec<String>,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub organize: String,
    #[serde(default)]
    pub department: String,
}

/// Administrator edit of another account. The password is not part of it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUser {
    pub id: u64,
    #[serde(default)]
    pub nickname: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub mobile: String,
    #[serde(default)]
    pub roles: Vec<String>,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub organize: String,
    #[serde(default)]
    pub department: String,
    #[serde(default)]
    pub position: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRole {
    pub role: String,
    pub role_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMenu {
    #[serde(default)]
    pub parent_id: u64,
    pub path: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<MenuMeta>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CreateApi {
    pub path: String,
    pub method: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub group: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrganize {
    #[serde(default)]
    pub parent_id: u64,
    pub name: String,
    #[serde(default)]
    pub leader: String,
    pub oe_type: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOrganize {
    pub id: u64,
    #[serde(default)]
    pub parent_id: u64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub leader: String,
    #[serde(default)]
    pub oe_type: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub captcha: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoginToken {
    pub token: String,
    /// Expiry in epoch seconds; `0` when the server does not report it.
    pub expire: i64,
}

/// Sets the role a user acts as after login.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DefaultRole {
    pub id: u64,
    pub role: String,
}
