use pretty_assertions::assert_eq;
use std::fs;
use std::process::Command;

const MODELS: &str = r#"
/// A customer account.
#[serde(rename_all = "camelCase")]
pub struct Account {
    #[validate(required, length(min = 3))]
    pub user_name: String,
    pub addresses: Vec<Address>,
}

pub struct Address {
    pub city: String,
}
"#;

const ROUTES: &str = r#"
routes:
  - method: POST
    path: /accounts
    request_body:
      type: Account
      required: true
    responses:
      "201":
        description: Created
        type: Account
  - method: GET
    path: /swagger.json
    responses:
      "200":
        description: This document
"#;

#[test]
fn test_generate_to_stdout() {
    let dir = tempfile::tempdir().unwrap();
    let models_path = dir.path().join("accounts.rs");
    let routes_path = dir.path().join("routes.yaml");
    fs::write(&models_path, MODELS).unwrap();
    fs::write(&routes_path, ROUTES).unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_routedoc"))
        .arg("generate")
        .arg("--models")
        .arg(format!("{}=crm", models_path.display()))
        .arg("--routes")
        .arg(&routes_path)
        .env_remove("ROUTEDOC_CONFIG")
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["openapi"], "3.0.0");
    assert_eq!(value["info"]["title"], "API Documentation");
    assert!(value["paths"].get("/swagger.json").is_none());
    assert_eq!(
        value["paths"]["/accounts"]["post"]["requestBody"]["content"]["application/json"]
            ["schema"]["$ref"],
        "#/components/schemas/Account"
    );

    let account = &value["components"]["schemas"]["Account"];
    assert_eq!(account["required"], serde_json::json!(["userName"]));
    assert_eq!(account["properties"]["userName"]["minLength"], 3);
    assert!(value["components"]["schemas"].get("Address").is_some());
}

#[test]
fn test_schema_command() {
    let dir = tempfile::tempdir().unwrap();
    let models_path = dir.path().join("accounts.rs");
    fs::write(&models_path, MODELS).unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_routedoc"))
        .args(["schema", "--name", "Address", "--source"])
        .arg(&models_path)
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["example"], serde_json::json!({"city": "example"}));
}

#[test]
fn test_bad_status_key_fails() {
    let dir = tempfile::tempdir().unwrap();
    let routes_path = dir.path().join("routes.json");
    fs::write(
        &routes_path,
        r#"{"routes": [{"method": "GET", "path": "/", "responses": {"OK": {"description": "OK"}}}]}"#,
    )
    .unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_routedoc"))
        .arg("generate")
        .arg("--routes")
        .arg(&routes_path)
        .env_remove("ROUTEDOC_CONFIG")
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("StatusCode"));
}
