//! Expensify Integration Server client.
//!
//! Every call is a form POST to a single endpoint. The job description is
//! JSON carried in the `requestJobDescription` form field, and the kind of
//! job is selected by `inputSettings.type`.

use chrono::Utc;
use reqwest::StatusCode;
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use tracing::{debug, info, instrument, warn};
use xavyo_connector::annotations::RateLimitDescription;

use crate::config::ExpensifyConfig;
use crate::error::{ExpensifyError, ExpensifyResult};
use crate::models::{null_as_default, Policy, User};
use crate::rate_limit::describe_rate_limit;

/// Form field holding the JSON job description.
const REQUEST_FIELD: &str = "requestJobDescription";

/// `responseCode` reported on success.
const SUCCESS_CODE: i64 = 200;

/// A decoded response together with the rate-limit state the server reported.
#[derive(Debug, Clone)]
pub struct ApiResponse<T> {
    pub data: T,
    pub rate_limit: RateLimitDescription,
}

#[derive(Debug, Serialize)]
struct Credentials<'a> {
    #[serde(rename = "partnerUserID")]
    partner_user_id: &'a str,
    #[serde(rename = "partnerUserSecret")]
    partner_user_secret: &'a str,
}

#[derive(Debug, Serialize)]
struct JobDescription<'a, S> {
    #[serde(rename = "type")]
    job_type: &'static str,
    credentials: Credentials<'a>,
    #[serde(rename = "inputSettings")]
    input_settings: S,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PolicyListSettings<'a> {
    #[serde(rename = "type")]
    settings_type: &'static str,
    admin_only: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    next_page: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct PolicySettings<'a> {
    #[serde(rename = "type")]
    settings_type: &'static str,
    fields: [&'static str; 1],
    #[serde(rename = "policyIDList")]
    policy_id_list: [&'a str; 1],
}

/// Status part of every response, with the rest of the body kept for the
/// caller's shape.
#[derive(Debug, Deserialize)]
struct ResponseEnvelope {
    #[serde(rename = "responseCode", default)]
    response_code: Option<i64>,
    #[serde(rename = "responseMessage", default)]
    response_message: Option<String>,
    #[serde(flatten)]
    payload: serde_json::Map<String, serde_json::Value>,
}

impl ResponseEnvelope {
    /// Code and message when the API reported a failure.
    fn failure(&self) -> Option<(i64, String)> {
        match self.response_code {
            Some(code) if code != 0 && code != SUCCESS_CODE => {
                Some((code, self.response_message.clone().unwrap_or_default()))
            }
            _ => None,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PolicyListPage {
    #[serde(default, deserialize_with = "null_as_default")]
    policy_list: Vec<Policy>,
    #[serde(default)]
    next_page: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PolicyInfoResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    policy_info: HashMap<String, Option<PolicyInfo>>,
}

#[derive(Debug, Default, Deserialize)]
struct PolicyInfo {
    #[serde(default, deserialize_with = "null_as_default")]
    employees: Vec<User>,
}

/// Client for the Expensify Integration Server.
///
/// Holds no mutable state, so one instance can serve concurrent calls.
#[derive(Debug)]
pub struct ExpensifyClient {
    http_client: reqwest::Client,
    base_url: String,
    partner_user_id: String,
    partner_user_secret: SecretString,
    request_timeout_secs: u64,
}

impl ExpensifyClient {
    /// Creates a new client from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(config: ExpensifyConfig) -> ExpensifyResult<Self> {
        let http_client = reqwest::Client::builder()
            .connect_timeout(config.connection.connection_timeout())
            .timeout(config.connection.request_timeout())
            .build()
            .map_err(|e| ExpensifyError::Config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            http_client,
            base_url: config.base_url,
            partner_user_id: config.partner_user_id,
            partner_user_secret: config.partner_user_secret,
            request_timeout_secs: config.connection.request_timeout_secs,
        })
    }

    /// Lists every policy the partner credential administers.
    ///
    /// Follows `nextPage` until the server stops returning one. Policies are
    /// returned in server order; an id seen on an earlier page is skipped.
    /// The rate-limit state is the one reported with the last page.
    #[instrument(skip(self))]
    pub async fn list_policies(&self) -> ExpensifyResult<ApiResponse<Vec<Policy>>> {
        let mut policies = Vec::new();
        let mut seen_ids = HashSet::new();
        let mut seen_tokens = HashSet::new();
        let mut next_page: Option<String> = None;
        let mut page_number = 0u32;

        loop {
            page_number += 1;
            let settings = PolicyListSettings {
                settings_type: "policyList",
                admin_only: true,
                next_page: next_page.as_deref(),
            };

            let response: ApiResponse<PolicyListPage> = self.do_request(&settings).await?;
            let page = response.data;
            debug!(
                page = page_number,
                count = page.policy_list.len(),
                "Fetched policy page"
            );

            for policy in page.policy_list {
                if seen_ids.insert(policy.id.clone()) {
                    policies.push(policy);
                }
            }

            match page.next_page.filter(|token| !token.is_empty()) {
                Some(token) => {
                    if !seen_tokens.insert(token.clone()) {
                        return Err(ExpensifyError::Pagination(format!(
                            "nextPage token '{token}' returned twice"
                        )));
                    }
                    next_page = Some(token);
                }
                None => {
                    info!(
                        count = policies.len(),
                        pages = page_number,
                        "Listed Expensify policies"
                    );
                    return Ok(ApiResponse {
                        data: policies,
                        rate_limit: response.rate_limit,
                    });
                }
            }
        }
    }

    /// Lists the employees of one policy.
    ///
    /// A policy missing from the response yields an empty list.
    #[instrument(skip(self))]
    pub async fn list_policy_employees(
        &self,
        policy_id: &str,
    ) -> ExpensifyResult<ApiResponse<Vec<User>>> {
        let settings = PolicySettings {
            settings_type: "policy",
            fields: ["employees"],
            policy_id_list: [policy_id],
        };

        let response: ApiResponse<PolicyInfoResponse> = self.do_request(&settings).await?;
        let mut policy_info = response.data.policy_info;
        let employees = policy_info
            .remove(policy_id)
            .flatten()
            .map(|info| info.employees)
            .unwrap_or_default();

        debug!(policy_id, count = employees.len(), "Fetched policy employees");

        Ok(ApiResponse {
            data: employees,
            rate_limit: response.rate_limit,
        })
    }

    /// Posts one job and decodes the response into `T`.
    async fn do_request<S, T>(&self, input_settings: &S) -> ExpensifyResult<ApiResponse<T>>
    where
        S: Serialize,
        T: DeserializeOwned,
    {
        let job = JobDescription {
            job_type: "get",
            credentials: Credentials {
                partner_user_id: &self.partner_user_id,
                partner_user_secret: self.partner_user_secret.expose_secret(),
            },
            input_settings,
        };
        let job = serde_json::to_string(&job)?;

        let response = self
            .http_client
            .post(&self.base_url)
            .form(&[(REQUEST_FIELD, job.as_str())])
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        let rate_limit = describe_rate_limit(status, response.headers(), Utc::now());

        if status == StatusCode::TOO_MANY_REQUESTS {
            warn!(
                remaining = ?rate_limit.remaining,
                reset_at = ?rate_limit.reset_at,
                "Expensify rate limit exceeded"
            );
            return Err(ExpensifyError::RateLimited { rate_limit });
        }

        let body = response.bytes().await.map_err(|e| self.transport_error(e))?;

        if !status.is_success() {
            // Error payloads sometimes arrive with a non-2xx status.
            if let Some((code, message)) = serde_json::from_slice::<ResponseEnvelope>(&body)
                .ok()
                .and_then(|envelope| envelope.failure())
            {
                return Err(ExpensifyError::Api {
                    code,
                    message,
                    rate_limit,
                });
            }

            if status.is_server_error() {
                return Err(ExpensifyError::Unavailable {
                    status: status.as_u16(),
                    rate_limit,
                });
            }

            return Err(ExpensifyError::Status {
                status: status.as_u16(),
                body: String::from_utf8_lossy(&body).into_owned(),
                rate_limit,
            });
        }

        let envelope: ResponseEnvelope = serde_json::from_slice(&body)?;
        if let Some((code, message)) = envelope.failure() {
            return Err(ExpensifyError::Api {
                code,
                message,
                rate_limit,
            });
        }

        let data = serde_json::from_value(serde_json::Value::Object(envelope.payload))?;
        Ok(ApiResponse { data, rate_limit })
    }

    fn transport_error(&self, err: reqwest::Error) -> ExpensifyError {
        if err.is_timeout() {
            ExpensifyError::Timeout {
                timeout_secs: self.request_timeout_secs,
            }
        } else {
            ExpensifyError::Http(err)
        }
    }
}
