//! In-memory stand-in for the Grain admin server.
//!
//! Serves the `/api/v1` routes the client core talks to. Like the real server
//! it always answers HTTP 200 with an envelope; failures are
//! `success: false` with an application code.

use std::{
    collections::HashMap,
    sync::Arc,
    time::{SystemTime, UNIX_EPOCH},
};

use axum::{
    body::Bytes,
    extract::{Multipart, Path, Query, State},
    http::{header::AUTHORIZATION, HeaderMap},
    response::{IntoResponse, Response},
    routing::{delete, get, post, put, MethodRouter},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use tower_http::trace::TraceLayer;
use tracing::{debug, info};
use uuid::Uuid;

pub mod store;

pub use store::{Row, Store, Table};
use store::{row_id, text};

pub const API_PREFIX: &str = "/api/v1";
pub const DEFAULT_PAGE_SIZE: u64 = 10;
const TOKEN_TTL_SECS: i64 = 24 * 60 * 60;

pub const SUCCESS: i64 = 2000;
pub const FORMAT_ERROR: i64 = 4000;
pub const REQUEST_FAILED: i64 = 5000;
pub const CREATE_USER_FAILED: i64 = 1001;
pub const BAD_CREDENTIALS: i64 = 1003;
pub const USER_INFO_FAILED: i64 = 1004;
pub const SET_DEFAULT_ROLE_FAILED: i64 = 1012;
pub const UPDATE_CASBIN_FAILED: i64 = 1201;
pub const CREATE_ROLE_FAILED: i64 = 1300;

pub const USERS: &str = "sysUser";
pub const ROLES: &str = "sysRole";
pub const MENUS: &str = "sysMenu";
pub const APIS: &str = "sysApi";
pub const LOGS: &str = "sysLog";
pub const ORGANIZE: &str = "organize";
pub const FILES: &str = "upload";
pub const PROJECTS: &str = "projects";
pub const MODELS: &str = "models";
pub const FIELDS: &str = "fields";

pub type Db = Arc<RwLock<Store>>;

/// The response envelope. Zero pagination fields and null data are omitted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Reply {
    pub code: i64,
    pub success: bool,
    #[serde(default)]
    pub message: String,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub data: Value,
    #[serde(default)]
    pub time: i64,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub total: u64,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub page: u64,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub page_size: u64,
}

impl Reply {
    pub fn ok(data: Value) -> Self {
        Self {
            code: SUCCESS,
            success: true,
            message: "ok".to_string(),
            data,
            time: now_millis(),
            ..Self::default()
        }
    }

    pub fn page(rows: Vec<Value>, total: u64, page: u64, page_size: u64) -> Self {
        Self {
            total,
            page,
            page_size,
            ..Self::ok(Value::Array(rows))
        }
    }

    pub fn fail(code: i64, message: impl Into<String>) -> Self {
        Self {
            code,
            success: false,
            message: message.into(),
            time: now_millis(),
            ..Self::default()
        }
    }
}

impl IntoResponse for Reply {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}

fn is_zero(n: &u64) -> bool {
    *n == 0
}

// ---------------------------------------------------------------------------
// Route table
// ---------------------------------------------------------------------------

/// How a resource answers lookups by id.
#[derive(Debug, Clone, Copy)]
pub enum ById {
    /// `GET <path>/{id}`, answered with a one-element array.
    Path(&'static str),
    /// `GET <path>?<key>=`, answered with the record itself.
    Query(&'static str, &'static str),
}

#[derive(Debug)]
pub struct Mount {
    pub table: &'static str,
    pub list: &'static str,
    pub by_id: Option<ById>,
    pub create: Option<&'static str>,
    pub update: Option<&'static str>,
    /// Path and query key of single deletes.
    pub delete: (&'static str, &'static str),
    pub delete_many: Option<&'static str>,
    /// Fields that must be present and non-blank on create.
    pub required: &'static [&'static str],
    pub unique: Option<&'static str>,
    /// List query keys stored under a different field name.
    pub aliases: &'static [(&'static str, &'static str)],
    pub fail_code: i64,
}

pub static MOUNTS: [Mount; 10] = [
    Mount {
        table: USERS,
        list: "sysUser/list",
        by_id: Some(ById::Query("sysUser", "id")),
        create: Some("sysUser/create"),
        update: Some("sysUser/editUserInfo"),
        delete: ("sysUser", "id"),
        delete_many: Some("sysUser/deleteSysUserByIdList"),
        required: &["username", "password"],
        unique: Some("username"),
        aliases: &[],
        fail_code: CREATE_USER_FAILED,
    },
    Mount {
        table: ROLES,
        list: "sysRole/list",
        by_id: Some(ById::Path("sysRole")),
        create: Some("sysRole"),
        update: Some("sysRole"),
        delete: ("sysRole", "id"),
        delete_many: Some("sysRole/deleteRoleByIds"),
        required: &["role", "roleName"],
        unique: Some("role"),
        aliases: &[],
        fail_code: CREATE_ROLE_FAILED,
    },
    Mount {
        table: MENUS,
        list: "sysMenu/list",
        by_id: Some(ById::Path("sysMenu")),
        create: Some("sysMenu"),
        update: Some("sysMenu"),
        delete: ("sysMenu", "id"),
        delete_many: Some("sysMenu/deleteMenuByIds"),
        required: &["name"],
        unique: None,
        aliases: &[],
        fail_code: REQUEST_FAILED,
    },
    Mount {
        table: APIS,
        list: "sysApi/list",
        by_id: None,
        create: Some("sysApi"),
        update: Some("sysApi"),
        delete: ("sysApi", "id"),
        delete_many: Some("sysApi/deleteApiByIds"),
        required: &["path", "method"],
        unique: None,
        aliases: &[],
        fail_code: REQUEST_FAILED,
    },
    Mount {
        table: LOGS,
        list: "sysLog/list",
        by_id: Some(ById::Path("sysLog")),
        create: None,
        update: None,
        delete: ("sysLog", "id"),
        delete_many: Some("sysLog/ids"),
        required: &[],
        unique: None,
        aliases: &[],
        fail_code: REQUEST_FAILED,
    },
    Mount {
        table: ORGANIZE,
        list: "organize/list",
        by_id: None,
        create: Some("organize"),
        update: Some("organize"),
        delete: ("organize/organizeById", "id"),
        delete_many: Some("organize/organizeByIds"),
        required: &["name"],
        unique: None,
        aliases: &[("qType", "oeType"), ("id", "parentId")],
        fail_code: REQUEST_FAILED,
    },
    Mount {
        table: FILES,
        list: "upload/list",
        by_id: None,
        create: None,
        update: None,
        delete: ("upload", "id"),
        delete_many: Some("upload/deleteUploadByIds"),
        required: &[],
        unique: None,
        aliases: &[],
        fail_code: REQUEST_FAILED,
    },
    Mount {
        table: PROJECTS,
        list: "codeAssistant/projects/list",
        by_id: None,
        create: Some("codeAssistant/projects"),
        update: Some("codeAssistant/projects"),
        delete: ("codeAssistant/projects", "pid"),
        delete_many: None,
        required: &["projectName"],
        unique: None,
        aliases: &[],
        fail_code: REQUEST_FAILED,
    },
    Mount {
        table: MODELS,
        list: "codeAssistant/models/list",
        by_id: Some(ById::Path("codeAssistant/models")),
        create: Some("codeAssistant/models"),
        update: Some("codeAssistant/models"),
        delete: ("codeAssistant/models", "mid"),
        delete_many: None,
        required: &["parentId", "structName"],
        unique: None,
        aliases: &[],
        fail_code: REQUEST_FAILED,
    },
    Mount {
        table: FIELDS,
        list: "codeAssistant/fields/list",
        by_id: None,
        create: Some("codeAssistant/fields"),
        update: Some("codeAssistant/fields"),
        delete: ("codeAssistant/fields", "fid"),
        delete_many: None,
        required: &["parentId", "name"],
        unique: None,
        aliases: &[],
        fail_code: REQUEST_FAILED,
    },
];

pub fn new_db() -> Db {
    Arc::new(RwLock::new(Store::new([(LOGS, Table::with_string_ids())])))
}

pub fn app() -> Router {
    app_with(new_db())
}

/// Router over an existing store, so tests can seed or inspect it.
pub fn app_with(db: Db) -> Router {
    let mut routes: Vec<(String, MethodRouter<Db>)> = Vec::new();
    for mount in MOUNTS.iter() {
        mount_resource(&mut routes, mount);
    }

    add(&mut routes, "upload", post(upload));
    add(&mut routes, "sysUser/login", post(login));
    add(&mut routes, "sysUser/info", get(user_info));
    add(&mut routes, "sysUser/setDefaultRole", put(set_default_role));
    add(&mut routes, "sysUser/switchRole", post(switch_role));
    add(&mut routes, "sysMenu/userMenu", get(user_menu));
    add(&mut routes, "sysApi/apiGroups", get(api_groups));
    add(&mut routes, "sysApi/apiAndPermissions", get(api_permissions));
    add(&mut routes, "casbin", put(update_casbin));

    routes
        .into_iter()
        .fold(Router::new(), |router, (path, handler)| router.route(&path, handler))
        .layer(TraceLayer::new_for_http())
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

fn mount_resource(routes: &mut Vec<(String, MethodRouter<Db>)>, mount: &'static Mount) {
    add(
        routes,
        mount.list,
        get(move |State(db): State<Db>, Query(query): Query<Vec<(String, String)>>| {
            list_rows(mount, db, query)
        }),
    );

    match mount.by_id {
        Some(ById::Path(path)) => add(
            routes,
            &format!("{path}/{{id}}"),
            get(move |State(db): State<Db>, Path(id): Path<String>| get_row(mount, db, Some(id), true)),
        ),
        Some(ById::Query(path, key)) => add(
            routes,
            path,
            get(move |State(db): State<Db>, Query(mut query): Query<HashMap<String, String>>| {
                get_row(mount, db, query.remove(key), false)
            }),
        ),
        None => {}
    }

    if let Some(path) = mount.create {
        add(
            routes,
            path,
            post(move |State(db): State<Db>, body: Bytes| create_row(mount, db, body)),
        );
    }
    if let Some(path) = mount.update {
        add(
            routes,
            path,
            put(move |State(db): State<Db>, body: Bytes| update_row(mount, db, body)),
        );
    }

    let (path, key) = mount.delete;
    add(
        routes,
        path,
        delete(move |State(db): State<Db>, Query(mut query): Query<HashMap<String, String>>| {
            delete_row(mount, db, query.remove(key))
        }),
    );

    if let Some(path) = mount.delete_many {
        add(
            routes,
            path,
            delete(move |State(db): State<Db>, body: Bytes| delete_many(mount, db, body)),
        );
    }
}

/// Register `handler` under the API prefix, merging methods that share a path.
fn add(routes: &mut Vec<(String, MethodRouter<Db>)>, path: &str, handler: MethodRouter<Db>) {
    let path = format!("{API_PREFIX}/{path}");
    match routes.iter_mut().find(|(existing, _)| *existing == path) {
        Some((_, existing)) => {
            let previous = std::mem::replace(existing, MethodRouter::new());
            *existing = previous.merge(handler);
        }
        None => routes.push((path, handler)),
    }
}

// ---------------------------------------------------------------------------
// Resource handlers
// ---------------------------------------------------------------------------

async fn list_rows(mount: &'static Mount, db: Db, query: Vec<(String, String)>) -> Reply {
    let mut page: u64 = 1;
    let mut page_size = DEFAULT_PAGE_SIZE;
    let mut filters = Vec::new();
    for (key, value) in query {
        match key.as_str() {
            "page" => match value.parse() {
                Ok(n) => page = n,
                Err(_) => return Reply::fail(FORMAT_ERROR, format!("page is not a number: {value}")),
            },
            "pageSize" => match value.parse() {
                Ok(n) => page_size = n,
                Err(_) => return Reply::fail(FORMAT_ERROR, format!("pageSize is not a number: {value}")),
            },
            _ => {
                let field = mount
                    .aliases
                    .iter()
                    .find(|(from, _)| *from == key)
                    .map_or(key, |(_, to)| to.to_string());
                filters.push((field, value));
            }
        }
    }
    let page = page.max(1);

    let store = db.read().await;
    let Some(table) = store.get(mount.table) else {
        return Reply::page(Vec::new(), 0, page, page_size);
    };
    let matched: Vec<&Row> = table.matching(&filters).collect();
    let total = matched.len() as u64;
    let skip = (page - 1).saturating_mul(page_size);
    let rows = matched
        .into_iter()
        .skip(usize::try_from(skip).unwrap_or(usize::MAX))
        .take(usize::try_from(page_size).unwrap_or(usize::MAX))
        .map(public)
        .collect();
    debug!(table = mount.table, total, page, page_size, "list");
    Reply::page(rows, total, page, page_size)
}

async fn get_row(mount: &'static Mount, db: Db, id: Option<String>, as_array: bool) -> Reply {
    let Some(id) = id else {
        return Reply::fail(FORMAT_ERROR, "id is required");
    };
    let store = db.read().await;
    match store.get(mount.table).and_then(|table| table.find(&id)) {
        Some(row) if as_array => Reply::ok(Value::Array(vec![public(row)])),
        Some(row) => Reply::ok(public(row)),
        None => Reply::fail(REQUEST_FAILED, format!("{} {id} not found", mount.table)),
    }
}

async fn create_row(mount: &'static Mount, db: Db, body: Bytes) -> Reply {
    let mut row = match parse_object(&body) {
        Ok(row) => row,
        Err(reply) => return reply,
    };
    for field in mount.required {
        if row.get(*field).map_or(true, is_blank) {
            return Reply::fail(mount.fail_code, format!("{field} is required"));
        }
    }
    row.remove("id");

    let mut store = db.write().await;
    let table = store.table(mount.table);
    if let Some(field) = mount.unique {
        if let Some(value) = row.get(field).and_then(text) {
            if table.find_by(field, &value).is_some() {
                return Reply::fail(mount.fail_code, format!("{field} {value} already exists"));
            }
        }
    }
    if mount.table == USERS {
        row.entry("status").or_insert_with(|| json!("yes"));
    }
    let id = table.insert(row);
    info!(table = mount.table, %id, "created");
    Reply::ok(Value::Null)
}

/// Blank fields in the patch keep their stored value.
async fn update_row(mount: &'static Mount, db: Db, body: Bytes) -> Reply {
    let mut patch = match parse_object(&body) {
        Ok(patch) => patch,
        Err(reply) => return reply,
    };
    let Some(id) = patch.remove("id").as_ref().and_then(text) else {
        return Reply::fail(FORMAT_ERROR, "id is required");
    };
    patch.remove("password");
    patch.retain(|_, value| !is_blank(value));

    let mut store = db.write().await;
    match store.table(mount.table).find_mut(&id) {
        Some(row) => {
            row.extend(patch);
            info!(table = mount.table, %id, "updated");
            Reply::ok(Value::Null)
        }
        None => Reply::fail(mount.fail_code, format!("{} {id} not found", mount.table)),
    }
}

async fn delete_row(mount: &'static Mount, db: Db, id: Option<String>) -> Reply {
    let Some(id) = id else {
        return Reply::fail(FORMAT_ERROR, format!("{} is required", mount.delete.1));
    };
    let mut store = db.write().await;
    if store.table(mount.table).remove_all(&[id.clone()]) == 0 {
        return Reply::fail(REQUEST_FAILED, format!("{} {id} not found", mount.table));
    }
    info!(table = mount.table, %id, "deleted");
    Reply::ok(Value::Null)
}

async fn delete_many(mount: &'static Mount, db: Db, body: Bytes) -> Reply {
    let body = match parse_object(&body) {
        Ok(body) => body,
        Err(reply) => return reply,
    };
    let ids: Vec<String> = match body.get("ids").and_then(Value::as_array) {
        Some(ids) if !ids.is_empty() => ids.iter().filter_map(text).collect(),
        _ => return Reply::fail(FORMAT_ERROR, "ids must be a non-empty array"),
    };
    let removed = db.write().await.table(mount.table).remove_all(&ids);
    info!(table = mount.table, requested = ids.len(), removed, "bulk deleted");
    Reply::ok(Value::Null)
}

async fn upload(State(db): State<Db>, mut multipart: Multipart) -> Reply {
    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => return Reply::fail(REQUEST_FAILED, e.to_string()),
        };
        if field.name() != Some("file") {
            continue;
        }
        let file_name = field.file_name().unwrap_or("upload.bin").to_string();
        let file_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let bytes = match field.bytes().await {
            Ok(bytes) => bytes,
            Err(e) => return Reply::fail(REQUEST_FAILED, e.to_string()),
        };

        let mut row = Row::new();
        row.insert("uid".to_string(), json!(""));
        row.insert("fileName".to_string(), json!(file_name));
        row.insert("fileUrl".to_string(), json!(format!("/static/uploads/{file_name}")));
        row.insert("filePurpose".to_string(), json!(""));
        row.insert("fileType".to_string(), json!(file_type));
        let id = db.write().await.table(FILES).insert(row.clone());
        row.insert("id".to_string(), id);
        info!(%file_name, size = bytes.len(), "uploaded");
        return Reply::ok(Value::Object(row));
    }
    Reply::fail(REQUEST_FAILED, "missing file part")
}

// ---------------------------------------------------------------------------
// Account, menu and permission handlers
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct Login {
    #[serde(default)]
    username: String,
    #[serde(default)]
    password: String,
}

async fn login(State(db): State<Db>, body: Bytes) -> Reply {
    let Ok(login) = serde_json::from_slice::<Login>(&body) else {
        return Reply::fail(FORMAT_ERROR, "malformed login body");
    };
    let mut store = db.write().await;
    let user_id = store
        .table(USERS)
        .find_by("username", &login.username)
        .filter(|user| user.get("password").and_then(text).as_deref() == Some(login.password.as_str()))
        .and_then(row_id);
    match user_id {
        Some(user_id) => {
            info!(username = %login.username, "logged in");
            issue_token(&mut store, user_id)
        }
        None => Reply::fail(BAD_CREDENTIALS, "The account or password is incorrect"),
    }
}

async fn user_info(State(db): State<Db>, headers: HeaderMap) -> Reply {
    let store = db.read().await;
    let user = bearer(&headers)
        .and_then(|token| store.sessions.get(token))
        .and_then(|id| store.get(USERS).and_then(|table| table.find(id)));
    match user {
        Some(user) => Reply::ok(public(user)),
        None => Reply::fail(USER_INFO_FAILED, "Failed to get user information"),
    }
}

#[derive(Deserialize)]
struct DefaultRole {
    #[serde(default)]
    id: u64,
    #[serde(default)]
    role: String,
}

async fn set_default_role(State(db): State<Db>, body: Bytes) -> Reply {
    let Ok(input) = serde_json::from_slice::<DefaultRole>(&body) else {
        return Reply::fail(FORMAT_ERROR, "malformed body");
    };
    if input.role.is_empty() {
        return Reply::fail(SET_DEFAULT_ROLE_FAILED, "role is required");
    }
    let mut store = db.write().await;
    match store.table(USERS).find_mut(&input.id.to_string()) {
        Some(user) => {
            user.insert("role".to_string(), json!(input.role));
            Reply::ok(Value::Null)
        }
        None => Reply::fail(SET_DEFAULT_ROLE_FAILED, "Setting the default role failed"),
    }
}

async fn switch_role(
    State(db): State<Db>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> Reply {
    let Some(role) = query.get("role").filter(|role| !role.is_empty()) else {
        return Reply::fail(FORMAT_ERROR, "role is required");
    };
    let mut store = db.write().await;
    let Some(token) = bearer(&headers).map(str::to_string) else {
        return Reply::fail(USER_INFO_FAILED, "Failed to get user information");
    };
    let Some(user_id) = store.sessions.remove(&token) else {
        return Reply::fail(USER_INFO_FAILED, "Failed to get user information");
    };
    if let Some(user) = store.table(USERS).find_mut(&user_id) {
        user.insert("role".to_string(), json!(role));
    }
    issue_token(&mut store, user_id)
}

async fn user_menu(State(db): State<Db>) -> Reply {
    let store = db.read().await;
    let rows = store.get(MENUS).map(Table::rows).unwrap_or_default();
    Reply::ok(Value::Array(menu_tree(rows, "0", 0)))
}

async fn api_groups(State(db): State<Db>) -> Reply {
    let store = db.read().await;
    let mut groups: Vec<String> = Vec::new();
    for row in store.get(APIS).map(Table::rows).unwrap_or_default() {
        if let Some(group) = row.get("group").and_then(text) {
            if !group.is_empty() && !groups.contains(&group) {
                groups.push(group);
            }
        }
    }
    Reply::ok(groups.into_iter().map(|group| json!({ "group": group })).collect())
}

async fn api_permissions(State(db): State<Db>, Query(query): Query<HashMap<String, String>>) -> Reply {
    let store = db.read().await;
    let granted = query
        .get("role")
        .and_then(|role| store.casbin.get(role))
        .cloned()
        .unwrap_or_default();
    let apis: Vec<Value> = store
        .get(APIS)
        .map(Table::rows)
        .unwrap_or_default()
        .iter()
        .map(public)
        .collect();
    Reply::ok(json!({ "authApi": granted, "apiList": apis }))
}

#[derive(Deserialize)]
struct Policy {
    #[serde(default)]
    role: String,
    #[serde(default)]
    data: Vec<u64>,
}

async fn update_casbin(State(db): State<Db>, body: Bytes) -> Reply {
    let Ok(policy) = serde_json::from_slice::<Policy>(&body) else {
        return Reply::fail(FORMAT_ERROR, "malformed policy");
    };
    if policy.role.is_empty() {
        return Reply::fail(UPDATE_CASBIN_FAILED, "Failed to update permissions");
    }
    info!(role = %policy.role, apis = policy.data.len(), "policy replaced");
    db.write().await.casbin.insert(policy.role, policy.data);
    Reply::ok(Value::Null)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn issue_token(store: &mut Store, user_id: String) -> Reply {
    let token = Uuid::new_v4().simple().to_string();
    store.sessions.insert(token.clone(), user_id);
    Reply::ok(json!({ "token": token, "expire": now_millis() / 1000 + TOKEN_TTL_SECS }))
}

fn bearer(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

/// Menus below `parent`, each with its own children nested.
fn menu_tree(rows: &[Row], parent: &str, depth: usize) -> Vec<Value> {
    if depth > 8 {
        return Vec::new();
    }
    rows.iter()
        .filter(|row| row.get("parentId").and_then(text).as_deref().unwrap_or("0") == parent)
        .map(|row| {
            let mut node = public(row);
            if let (Some(id), Some(object)) = (row_id(row), node.as_object_mut()) {
                object.insert("children".to_string(), Value::Array(menu_tree(rows, &id, depth + 1)));
            }
            node
        })
        .collect()
}

/// The row as sent to clients: everything but the password.
fn public(row: &Row) -> Value {
    let mut row = row.clone();
    row.remove("password");
    Value::Object(row)
}

fn parse_object(body: &[u8]) -> Result<Row, Reply> {
    match serde_json::from_slice(body) {
        Ok(Value::Object(row)) => Ok(row),
        Ok(_) => Err(Reply::fail(FORMAT_ERROR, "body must be a JSON object")),
        Err(e) => Err(Reply::fail(FORMAT_ERROR, e.to_string())),
    }
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        Value::Number(n) => n.as_f64() == Some(0.0),
        _ => false,
    }
}

fn now_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| i64::try_from(d.as_millis()).unwrap_or(i64::MAX))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(value: Value) -> Row {
        value.as_object().unwrap().clone()
    }

    #[test]
    fn success_reply_omits_null_data_and_zero_paging() {
        let json = serde_json::to_value(Reply::ok(Value::Null)).unwrap();
        assert_eq!(json["code"], 2000);
        assert_eq!(json["success"], true);
        assert!(json.get("data").is_none());
        assert!(json.get("page_size").is_none());
    }

    #[test]
    fn page_reply_uses_snake_case_page_size() {
        let json = serde_json::to_value(Reply::page(vec![json!({"id": 1})], 3, 2, 1)).unwrap();
        assert_eq!(json["total"], 3);
        assert_eq!(json["page"], 2);
        assert_eq!(json["page_size"], 1);
        assert_eq!(json["data"], json!([{"id": 1}]));
    }

    #[test]
    fn failure_reply_carries_code() {
        let reply = Reply::fail(CREATE_ROLE_FAILED, "role admin already exists");
        assert!(!reply.success);
        assert_eq!(reply.code, 1300);
        assert!(reply.data.is_null());
    }

    #[test]
    fn public_strips_password() {
        let user = row(json!({"id": 1, "username": "alice", "password": "secret"}));
        let json = public(&user);
        assert_eq!(json["username"], "alice");
        assert!(json.get("password").is_none());
    }

    #[test]
    fn blank_values() {
        assert!(is_blank(&json!("")));
        assert!(is_blank(&json!("  ")));
        assert!(is_blank(&json!(0)));
        assert!(is_blank(&Value::Null));
        assert!(!is_blank(&json!("x")));
        assert!(!is_blank(&json!(3)));
        assert!(!is_blank(&json!(false)));
    }

    #[test]
    fn menu_tree_nests_children() {
        let rows = vec![
            row(json!({"id": 1, "parentId": 0, "name": "system"})),
            row(json!({"id": 2, "parentId": 1, "name": "users"})),
            row(json!({"id": 3, "name": "dashboard"})),
        ];
        let tree = menu_tree(&rows, "0", 0);
        assert_eq!(tree.len(), 2);
        assert_eq!(tree[0]["children"][0]["name"], "users");
        assert_eq!(tree[1]["name"], "dashboard");
    }

    #[test]
    fn menu_tree_stops_on_cycles() {
        let rows = vec![row(json!({"id": 1, "parentId": 1, "name": "loop"}))];
        assert_eq!(menu_tree(&rows, "1", 0).len(), 1);
    }

    #[test]
    fn bearer_requires_scheme() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, "Bearer abc".parse().unwrap());
        assert_eq!(bearer(&headers), Some("abc"));
        headers.insert(AUTHORIZATION, "abc".parse().unwrap());
        assert_eq!(bearer(&headers), None);
    }

    #[test]
    fn mounts_have_unique_tables() {
        let mut tables: Vec<&str> = MOUNTS.iter().map(|m| m.table).collect();
        tables.sort_unstable();
        tables.dedup();
        assert_eq!(tables.len(), MOUNTS.len());
    }
}
