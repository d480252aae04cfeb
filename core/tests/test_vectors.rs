//! Verify build/parse methods against JSON test vectors stored in `test-vectors/`.
//!
//! Each vector file describes inputs, expected requests, simulated responses,
//! and expected parse results. Comparing parsed JSON (not raw strings) avoids
//! false negatives from field-ordering differences. Expected results list only
//! the envelope fields a case cares about.

use grain_core::types::{
    CreateApi, CreateField, CreateMenu, CreateModel, CreateOrganize, CreateProject, CreateRole,
    CreateUser,
};
use grain_core::{
    AdminClient, ApiError, CreatePayload, Filter, HttpMethod, HttpRequest, HttpResponse, QueryValue,
    RecordId, Resource,
};
use serde_json::Value;

const BASE_URL: &str = "http://localhost:3000";

fn client() -> AdminClient {
    AdminClient::new(BASE_URL)
}

fn load(raw: &str) -> Vec<Value> {
    let vectors: Value = serde_json::from_str(raw).unwrap();
    vectors["cases"].as_array().unwrap().clone()
}

/// Parse the method string from test vectors into `HttpMethod`.
fn parse_method(s: &str) -> HttpMethod {
    match s {
        "GET" => HttpMethod::Get,
        "POST" => HttpMethod::Post,
        "PUT" => HttpMethod::Put,
        "DELETE" => HttpMethod::Delete,
        other => panic!("unknown method: {other}"),
    }
}

fn parse_resource(s: &str) -> Resource {
    Resource::ALL
        .into_iter()
        .find(|r| r.name() == s)
        .unwrap_or_else(|| panic!("unknown resource: {s}"))
}

fn parse_filter(pairs: &Value) -> Filter {
    pairs.as_array().unwrap().iter().fold(Filter::new(), |filter, pair| {
        let key = pair[0].as_str().unwrap();
        let value = match &pair[1] {
            Value::Null => QueryValue::Null,
            Value::String(s) => QueryValue::Str(s.clone()),
            Value::Bool(b) => QueryValue::Bool(*b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => QueryValue::Int(i),
                None => QueryValue::Float(n.as_f64().unwrap()),
            },
            other => panic!("unsupported filter value: {other}"),
        };
        filter.with(key, value)
    })
}

fn parse_create(kind: &str, input: Value) -> CreatePayload {
    match kind {
        "user" => CreatePayload::User(serde_json::from_value::<CreateUser>(input).unwrap()),
        "role" => CreatePayload::Role(serde_json::from_value::<CreateRole>(input).unwrap()),
        "menu" => CreatePayload::Menu(serde_json::from_value::<CreateMenu>(input).unwrap()),
        "api" => CreatePayload::Api(serde_json::from_value::<CreateApi>(input).unwrap()),
        "organize" => CreatePayload::Organize(serde_json::from_value::<CreateOrganize>(input).unwrap()),
        "project" => CreatePayload::Project(serde_json::from_value::<CreateProject>(input).unwrap()),
        "model" => CreatePayload::Model(serde_json::from_value::<CreateModel>(input).unwrap()),
        "field" => CreatePayload::Field(serde_json::from_value::<CreateField>(input).unwrap()),
        other => panic!("unknown create kind: {other}"),
    }
}

fn simulated(case: &Value) -> HttpResponse {
    let sim = &case["simulated_response"];
    HttpResponse {
        status: sim["status"].as_u64().unwrap() as u16,
        headers: Vec::new(),
        body: sim["body"].as_str().unwrap().to_string(),
    }
}

fn check_request(name: &str, req: &HttpRequest, expected: &Value) {
    assert_eq!(req.method, parse_method(expected["method"].as_str().unwrap()), "{name}: method");
    assert_eq!(req.path, format!("{BASE_URL}{}", expected["path"].as_str().unwrap()), "{name}: path");

    if let Some(headers) = expected.get("headers") {
        let expected_headers: Vec<(String, String)> = headers
            .as_array()
            .unwrap()
            .iter()
            .map(|h| {
                let arr = h.as_array().unwrap();
                (arr[0].as_str().unwrap().to_string(), arr[1].as_str().unwrap().to_string())
            })
            .collect();
        assert_eq!(req.headers, expected_headers, "{name}: headers");
    }

    match expected.get("body") {
        Some(body) => {
            let req_body: Value = serde_json::from_slice(req.body.as_deref().unwrap()).unwrap();
            assert_eq!(&req_body, body, "{name}: body");
        }
        None => assert!(req.body.is_none(), "{name}: body should be None"),
    }
}

/// Every field named in `expected_result` must match the parsed envelope.
fn check_result<T: serde::Serialize>(name: &str, envelope: &T, expected: &Value) {
    let actual = serde_json::to_value(envelope).unwrap();
    for (key, value) in expected.as_object().unwrap() {
        assert_eq!(&actual[key.as_str()], value, "{name}: {key}");
    }
}

fn check_error(name: &str, err: &ApiError, expected: &str) {
    let matched = match expected {
        "NotFound" => matches!(err, ApiError::NotFound),
        "HttpError" => matches!(err, ApiError::HttpError { .. }),
        "DeserializationError" => matches!(err, ApiError::DeserializationError(_)),
        "InvalidPagination" => matches!(err, ApiError::InvalidPagination(_)),
        "InvalidPayload" => matches!(err, ApiError::InvalidPayload(_)),
        "Unsupported" => matches!(err, ApiError::Unsupported { .. }),
        other => panic!("{name}: unknown expected error: {other}"),
    };
    assert!(matched, "{name}: expected {expected}, got {err:?}");
}

/// Run the parse half of a case: either an error or a partial envelope match.
fn check_parse<T: serde::Serialize>(name: &str, case: &Value, result: Result<T, ApiError>) {
    if let Some(expected_error) = case.get("expected_error") {
        check_error(name, &result.err().unwrap(), expected_error.as_str().unwrap());
    } else {
        check_result(name, &result.unwrap(), &case["expected_result"]);
    }
}

// ---------------------------------------------------------------------------
// List
// ---------------------------------------------------------------------------

#[test]
fn list_test_vectors() {
    let c = client();
    for case in load(include_str!("../../test-vectors/list.json")) {
        let name = case["name"].as_str().unwrap();
        let resource = parse_resource(case["resource"].as_str().unwrap());
        let filter = parse_filter(&case["filter"]);

        let built = c.build_list(resource, &filter);
        if let Some(expected) = case.get("expected_build_error") {
            check_error(name, &built.unwrap_err(), expected.as_str().unwrap());
            continue;
        }
        let req = built.unwrap();
        check_request(name, &req, &case["expected_request"]);

        check_parse(name, &case, c.parse_list::<Value>(simulated(&case)));
    }
}

// ---------------------------------------------------------------------------
// Get
// ---------------------------------------------------------------------------

#[test]
fn get_test_vectors() {
    let c = client();
    for case in load(include_str!("../../test-vectors/get.json")) {
        let name = case["name"].as_str().unwrap();
        let resource = parse_resource(case["resource"].as_str().unwrap());
        let id: RecordId = serde_json::from_value(case["id"].clone()).unwrap();

        let built = c.build_get(resource, id);
        if let Some(expected) = case.get("expected_build_error") {
            check_error(name, &built.unwrap_err(), expected.as_str().unwrap());
            continue;
        }
        check_request(name, &built.unwrap(), &case["expected_request"]);

        check_parse(name, &case, c.parse_get::<Value>(simulated(&case)));
    }
}

// ---------------------------------------------------------------------------
// Create
// ---------------------------------------------------------------------------

#[test]
fn create_test_vectors() {
    let c = client();
    for case in load(include_str!("../../test-vectors/create.json")) {
        let name = case["name"].as_str().unwrap();
        let payload = parse_create(case["kind"].as_str().unwrap(), case["input"].clone());

        let built = c.build_create(&payload);
        if let Some(expected) = case.get("expected_build_error") {
            check_error(name, &built.unwrap_err(), expected.as_str().unwrap());
            continue;
        }
        check_request(name, &built.unwrap(), &case["expected_request"]);

        check_parse(name, &case, c.parse_ack(simulated(&case)));
    }
}

// ---------------------------------------------------------------------------
// Delete
// ---------------------------------------------------------------------------

#[test]
fn delete_test_vectors() {
    let c = client();
    for case in load(include_str!("../../test-vectors/delete.json")) {
        let name = case["name"].as_str().unwrap();
        let resource = parse_resource(case["resource"].as_str().unwrap());
        let id: RecordId = serde_json::from_value(case["id"].clone()).unwrap();

        let req = c.build_delete(resource, id);
        check_request(name, &req, &case["expected_request"]);

        check_parse(name, &case, c.parse_ack(simulated(&case)));
    }
}

// ---------------------------------------------------------------------------
// Bulk delete
// ---------------------------------------------------------------------------

#[test]
fn delete_many_test_vectors() {
    let c = client();
    for case in load(include_str!("../../test-vectors/delete_many.json")) {
        let name = case["name"].as_str().unwrap();
        let resource = parse_resource(case["resource"].as_str().unwrap());
        let ids: Vec<RecordId> = serde_json::from_value(case["ids"].clone()).unwrap();

        let built = c.build_delete_many(resource, &ids);
        if let Some(expected) = case.get("expected_build_error") {
            check_error(name, &built.unwrap_err(), expected.as_str().unwrap());
            continue;
        }
        check_request(name, &built.unwrap(), &case["expected_request"]);

        check_parse(name, &case, c.parse_ack(simulated(&case)));
    }
}
