use serde::{Deserialize, Serialize};

/// A scaffolding project: a backend path and a web path code is generated into.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Project {
    pub id: u64,
    pub project_name: String,
    pub project_path: String,
    pub web_project_path: String,
    pub description: String,
}

/// A data model inside a project. `parent_id` is the project id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Model {
    pub id: u64,
    pub parent_id: u64,
    pub struct_name: String,
    pub description: String,
    pub nickname: String,
    /// Enables the time-range query on generated list endpoints.
    pub query_time: String,
    pub database_name: String,
}

/// A field of a model. `parent_id` is the model id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Field {
    pub id: u64,
    pub parent_id: u64,
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: String,
    pub json_tag: String,
    pub description: String,
    pub query_criteria: String,
    pub mysql_type: String,
    pub mysql_field: String,
    pub validation_rules: String,
    pub required: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProject {
    pub project_name: String,
    #[serde(default)]
    pub project_path: String,
    #[serde(default)]
    pub web_project_path: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateModel {
    pub parent_id: u64,
    pub struct_name: String,
    #[serde(default)]
    pub database_name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub query_time: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateField {
    pub parent_id: u64,
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: String,
    #[serde(default)]
    pub json_tag: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub query_criteria: String,
    #[serde(default)]
    pub mysql_type: String,
    #[serde(default)]
    pub mysql_field: String,
    #[serde(default)]
    pub validation_rules: String,
    #[serde(default)]
    pub required: String,
}
