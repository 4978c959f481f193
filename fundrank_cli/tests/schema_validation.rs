use serde_json::Value;
use std::path::{Path, PathBuf};

fn workspace_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .expect("CLI crate should be inside workspace")
        .to_path_buf()
}

fn load_fixture(name: &str) -> Value {
    let path = workspace_root()
        .join("fundrank_cli/tests/fixtures")
        .join(name);
    let text = std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("read fixture {}: {}", path.display(), e));
    serde_json::from_str(&text).expect("fixture is valid JSON")
}

fn load_schema(name: &str) -> Value {
    let path = workspace_root().join("schema").join(name);
    let text = std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("read schema {}: {}", path.display(), e));
    serde_json::from_str(&text).expect("schema is valid JSON")
}

fn validator() -> jsonschema::Validator {
    let schema = load_schema("fund_data_response.schema.json");
    jsonschema::draft202012::new(&schema).expect("fund data schema compiles")
}

// ---------------------------------------------------------------------------
// Positive validation: fixtures conform to the schema
// ---------------------------------------------------------------------------

#[test]
fn test_success_fixture_conforms_to_schema() {
    let fixture = load_fixture("fund_data_success.json");
    if let Err(e) = validator().validate(&fixture) {
        panic!("success fixture failed validation: {e}");
    }
}

#[test]
fn test_error_fixture_conforms_to_schema() {
    let fixture = load_fixture("fund_data_error.json");
    if let Err(e) = validator().validate(&fixture) {
        panic!("error fixture failed validation: {e}");
    }
}

// ---------------------------------------------------------------------------
// Negative validation: schema rejects invalid responses
// ---------------------------------------------------------------------------

#[test]
fn test_schema_rejects_missing_required_field() {
    let mut data = load_fixture("fund_data_success.json");
    data.as_object_mut()
        .expect("response is an object")
        .remove("count");
    assert!(
        validator().validate(&data).is_err(),
        "schema should reject response missing count"
    );
}

#[test]
fn test_schema_rejects_unknown_code() {
    let mut data = load_fixture("fund_data_success.json");
    data["code"] = Value::from(500);
    assert!(
        validator().validate(&data).is_err(),
        "schema should reject codes other than 0 and 1"
    );
}

#[test]
fn test_schema_rejects_numeric_fund_code() {
    let mut data = load_fixture("fund_data_success.json");
    data["data"][0]["基金代码"] = Value::from(300);
    assert!(
        validator().validate(&data).is_err(),
        "fund codes must be text"
    );
}

#[test]
fn test_schema_rejects_short_fund_code() {
    let mut data = load_fixture("fund_data_success.json");
    data["data"][0]["基金代码"] = Value::String("300".to_string());
    assert!(
        validator().validate(&data).is_err(),
        "fund codes must be padded to six characters"
    );
}

#[test]
fn test_schema_rejects_error_with_rows() {
    let mut data = load_fixture("fund_data_error.json");
    data["data"] = load_fixture("fund_data_success.json")["data"].clone();
    assert!(
        validator().validate(&data).is_err(),
        "error responses carry no rows"
    );
}

// ---------------------------------------------------------------------------
// Edge cases
// ---------------------------------------------------------------------------

#[test]
fn test_blank_fund_code_is_allowed() {
    let mut data = load_fixture("fund_data_success.json");
    data["data"][0]["基金代码"] = Value::String(String::new());
    if let Err(e) = validator().validate(&data) {
        panic!("blank code should validate: {e}");
    }
}

#[test]
fn test_empty_page_conforms() {
    let mut data = load_fixture("fund_data_success.json");
    data["data"] = serde_json::json!([]);
    if let Err(e) = validator().validate(&data) {
        panic!("empty page should conform: {e}");
    }
}
