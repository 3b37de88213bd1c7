//! Common test utilities for xavyo-connector-expensify integration tests.

#![allow(dead_code)]

use serde_json::{json, Value};
use wiremock::matchers::{method, path};
use wiremock::{Match, Mock, MockServer, Request, ResponseTemplate};
use xavyo_connector::config::ConnectionSettings;
use xavyo_connector_expensify::ExpensifyConfig;

pub const ENDPOINT_PATH: &str = "/Integration-Server/ExpensifyIntegrations";
pub const PARTNER_USER_ID: &str = "partner-id";
pub const PARTNER_USER_SECRET: &str = "partner-secret";

/// Install a test subscriber when `RUST_LOG` is set.
pub fn init_test_logging() {
    if std::env::var("RUST_LOG").is_ok() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    }
}

/// Decode the JSON job description carried in the form body.
pub fn decode_job(request: &Request) -> Option<Value> {
    url::form_urlencoded::parse(&request.body)
        .find(|(key, _)| key == "requestJobDescription")
        .and_then(|(_, job)| serde_json::from_str(&job).ok())
}

/// Matches requests whose job description has `expected` at a JSON pointer,
/// or nothing there when `expected` is `None`.
pub struct JobField {
    pointer: &'static str,
    expected: Option<Value>,
}

impl Match for JobField {
    fn matches(&self, request: &Request) -> bool {
        let Some(job) = decode_job(request) else {
            return false;
        };
        job.pointer(self.pointer).cloned() == self.expected
    }
}

pub fn job_field(pointer: &'static str, expected: impl Into<Value>) -> JobField {
    JobField {
        pointer,
        expected: Some(expected.into()),
    }
}

pub fn job_field_absent(pointer: &'static str) -> JobField {
    JobField {
        pointer,
        expected: None,
    }
}

/// Test data factory for a policy record.
pub fn create_policy(id: &str, name: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "owner": "owner@example.com",
        "role": "admin",
        "type": "corporate",
        "outputCurrency": "USD"
    })
}

/// Test data factory for an employee record.
pub fn create_employee(email: &str, role: &str) -> Value {
    json!({ "email": email, "role": role, "submitsTo": "owner@example.com" })
}

/// Policy list response, optionally pointing at a next page.
pub fn create_policy_list_response(policies: Vec<Value>, next_page: Option<&str>) -> Value {
    let mut response = json!({ "responseCode": 200, "policyList": policies });
    if let Some(token) = next_page {
        response["nextPage"] = json!(token);
    }
    response
}

/// Policy info response with employees for one policy.
pub fn create_policy_info_response(policy_id: &str, employees: Vec<Value>) -> Value {
    let mut policy_info = serde_json::Map::new();
    policy_info.insert(policy_id.to_string(), json!({ "employees": employees }));
    json!({ "responseCode": 200, "policyInfo": policy_info })
}

/// Expensify error envelope.
pub fn create_error_response(code: i64, message: &str) -> Value {
    json!({ "responseCode": code, "responseMessage": message })
}

/// Mock server wrapper with common setup helpers.
pub struct MockExpensifyServer {
    pub server: MockServer,
}

impl MockExpensifyServer {
    pub async fn new() -> Self {
        init_test_logging();
        Self {
            server: MockServer::start().await,
        }
    }

    pub fn endpoint(&self) -> String {
        format!("{}{}", self.server.uri(), ENDPOINT_PATH)
    }

    /// Config pointed at this server.
    pub fn config(&self) -> ExpensifyConfig {
        ExpensifyConfig::new(PARTNER_USER_ID, PARTNER_USER_SECRET)
            .with_base_url(self.endpoint())
            .with_connection(ConnectionSettings::new().with_request_timeout(5))
    }

    /// Base mock for a job of the given `inputSettings.type`.
    pub fn job(&self, settings_type: &str) -> wiremock::MockBuilder {
        Mock::given(method("POST"))
            .and(path(ENDPOINT_PATH))
            .and(job_field("/inputSettings/type", settings_type))
    }

    /// Serve a single page of policies.
    pub async fn mock_policy_list(&self, policies: Vec<Value>) {
        self.job("policyList")
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(create_policy_list_response(policies, None)),
            )
            .mount(&self.server)
            .await;
    }

    /// Serve the employees of one policy.
    pub async fn mock_policy_employees(&self, policy_id: &str, employees: Vec<Value>) {
        self.job("policy")
            .and(job_field("/inputSettings/policyIDList/0", policy_id))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(create_policy_info_response(policy_id, employees)),
            )
            .mount(&self.server)
            .await;
    }

    /// Answer every job with the given response.
    pub async fn mock_any(&self, response: ResponseTemplate) {
        Mock::given(method("POST"))
            .and(path(ENDPOINT_PATH))
            .respond_with(response)
            .mount(&self.server)
            .await;
    }
}
