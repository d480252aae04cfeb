//! Resource kinds and their route table.
//!
//! Every resource shares the same list/get/create/update/delete contract but
//! the server mounts them under irregular paths (`sysUser/create`,
//! `organize/organizeById`, `codeAssistant/models?mid=`). The irregularities
//! live here and nowhere else.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::query::{QueryPolicy, ZeroPolicy};

/// One manageable entity type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    User,
    Role,
    Menu,
    Api,
    Log,
    Organize,
    File,
    Project,
    Model,
    Field,
}

/// A client operation, used in `ApiError::Unsupported`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    List,
    Get,
    Create,
    Update,
    Delete,
    DeleteMany,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Operation::List => "list",
            Operation::Get => "get by id",
            Operation::Create => "create",
            Operation::Update => "update",
            Operation::Delete => "delete",
            Operation::DeleteMany => "bulk delete",
        })
    }
}

/// How a by-id lookup addresses the record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByIdRoute {
    /// `GET <path>/{id}`
    Path(&'static str),
    /// `GET <path>?<key>={id}`
    Query(&'static str, &'static str),
}

/// Paths of one resource, relative to the API prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Routes {
    pub list: &'static str,
    pub get: Option<ByIdRoute>,
    pub create: Option<&'static str>,
    pub update: Option<&'static str>,
    /// `(path, query key)` for single deletes.
    pub delete: (&'static str, &'static str),
    /// Path of the JSON-bodied bulk delete.
    pub delete_many: Option<&'static str>,
}

impl Resource {
    pub const ALL: [Resource; 10] = [
        Resource::User,
        Resource::Role,
        Resource::Menu,
        Resource::Api,
        Resource::Log,
        Resource::Organize,
        Resource::File,
        Resource::Project,
        Resource::Model,
        Resource::Field,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Resource::User => "user",
            Resource::Role => "role",
            Resource::Menu => "menu",
            Resource::Api => "api",
            Resource::Log => "log",
            Resource::Organize => "organize",
            Resource::File => "file",
            Resource::Project => "project",
            Resource::Model => "model",
            Resource::Field => "field",
        }
    }

    pub fn routes(&self) -> Routes {
        match self {
            Resource::User => Routes {
                list: "sysUser/list",
                get: Some(ByIdRoute::Query("sysUser", "id")),
                create: Some("sysUser/create"),
                update: Some("sysUser/editUserInfo"),
                delete: ("sysUser", "id"),
                delete_many: Some("sysUser/deleteSysUserByIdList"),
            },
            Resource::Role => Routes {
                list: "sysRole/list",
                get: Some(ByIdRoute::Path("sysRole")),
                create: Some("sysRole"),
                update: Some("sysRole"),
                delete: ("sysRole", "id"),
                delete_many: Some("sysRole/deleteRoleByIds"),
            },
            Resource::Menu => Routes {
                list: "sysMenu/list",
                get: Some(ByIdRoute::Path("sysMenu")),
                create: Some("sysMenu"),
                update: Some("sysMenu"),
                delete: ("sysMenu", "id"),
                delete_many: Some("sysMenu/deleteMenuByIds"),
            },
            Resource::Api => Routes {
                list: "sysApi/list",
                get: None,
                create: Some("sysApi"),
                update: Some("sysApi"),
                delete: ("sysApi", "id"),
                delete_many: Some("sysApi/deleteApiByIds"),
            },
            Resource::Log => Routes {
                list: "sysLog/list",
                get: Some(ByIdRoute::Path("sysLog")),
                create: None,
                update: None,
                delete: ("sysLog", "id"),
                delete_many: Some("sysLog/ids"),
            },
            Resource::Organize => Routes {
                list: "organize/list",
                get: None,
                create: Some("organize"),
                update: Some("organize"),
                delete: ("organize/organizeById", "id"),
                delete_many: Some("organize/organizeByIds"),
            },
            Resource::File => Routes {
                list: "upload/list",
                get: None,
                create: None,
                update: None,
                delete: ("upload", "id"),
                delete_many: Some("upload/deleteUploadByIds"),
            },
            Resource::Project => Routes {
                list: "codeAssistant/projects/list",
                get: None,
                create: Some("codeAssistant/projects"),
                update: Some("codeAssistant/projects"),
                delete: ("codeAssistant/projects", "pid"),
                delete_many: None,
            },
            Resource::Model => Routes {
                list: "codeAssistant/models/list",
                get: Some(ByIdRoute::Path("codeAssistant/models")),
                create: Some("codeAssistant/models"),
                update: Some("codeAssistant/models"),
                delete: ("codeAssistant/models", "mid"),
                delete_many: None,
            },
            Resource::Field => Routes {
                list: "codeAssistant/fields/list",
                get: None,
                create: Some("codeAssistant/fields"),
                update: Some("codeAssistant/fields"),
                delete: ("codeAssistant/fields", "fid"),
                delete_many: None,
            },
        }
    }

    /// Zero handling of list filters for this resource.
    ///
    /// The system-management screens send `0` for untouched numeric inputs,
    /// so zero is dropped on every field there, `parentId` included; callers
    /// that mean `parentId=0` pass an explicit policy to `build_list_with`.
    /// Organization lists drop zero on filter fields but always keep the
    /// level scope (`qType`, `id`). Uploads and the code assistant scope lists
    /// by `parentId`, where `0` is a real value.
    pub fn default_policy(&self) -> QueryPolicy {
        match self {
            Resource::User | Resource::Role | Resource::Menu | Resource::Api | Resource::Log => {
                QueryPolicy::exclude_zero(true)
            }
            Resource::Organize => QueryPolicy::exclude_zero(true)
                .with_field("id", ZeroPolicy::Preserve)
                .with_field("qType", ZeroPolicy::Preserve),
            Resource::File | Resource::Project | Resource::Model | Resource::Field => {
                QueryPolicy::exclude_zero(false)
            }
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Record identifier: numeric for SQL-backed tables, an ObjectID hex string
/// for audit logs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Num(u64),
    Key(String),
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordId::Num(n) => write!(f, "{n}"),
            RecordId::Key(k) => f.write_str(k),
        }
    }
}

impl From<u64> for RecordId {
    fn from(n: u64) -> Self {
        RecordId::Num(n)
    }
}

impl From<u32> for RecordId {
    fn from(n: u32) -> Self {
        RecordId::Num(n.into())
    }
}

impl From<&str> for RecordId {
    fn from(s: &str) -> Self {
        RecordId::Key(s.to_string())
    }
}

impl From<String> for RecordId {
    fn from(s: String) -> Self {
        RecordId::Key(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_resource_has_a_list_route() {
        for resource in Resource::ALL {
            assert!(resource.routes().list.ends_with("list"), "{resource}");
        }
    }

    #[test]
    fn record_ids_serialize_untagged() {
        let ids = vec![RecordId::from(3u64), RecordId::from("65a1f0")];
        assert_eq!(serde_json::to_string(&ids).unwrap(), r#"[3,"65a1f0"]"#);
    }

    #[test]
    fn system_screens_drop_zero_everywhere() {
        for resource in [Resource::User, Resource::Role, Resource::Menu, Resource::Api, Resource::Log] {
            let policy = resource.default_policy();
            assert_eq!(policy.zero_policy_for("status"), ZeroPolicy::Exclude, "{resource}");
            assert_eq!(policy.zero_policy_for("parentId"), ZeroPolicy::Exclude, "{resource}");
        }
    }

    #[test]
    fn organize_keeps_scope_but_drops_zero_filters() {
        let policy = Resource::Organize.default_policy();
        assert_eq!(policy.zero_policy_for("id"), ZeroPolicy::Preserve);
        assert_eq!(policy.zero_policy_for("qType"), ZeroPolicy::Preserve);
        assert_eq!(policy.zero_policy_for("oeType"), ZeroPolicy::Exclude);
    }

    #[test]
    fn code_assistant_keeps_zero_parent() {
        for resource in [Resource::Project, Resource::Model, Resource::Field, Resource::File] {
            assert_eq!(
                resource.default_policy().zero_policy_for("parentId"),
                ZeroPolicy::Preserve,
                "{resource}"
            );
        }
    }
}
