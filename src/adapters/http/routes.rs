use crate::adapters::http::message::{HttpRequest, HttpResponse};
use crate::adapters::http::page;
use crate::core::intake::{IntakeOutcome, LeadIntake};
use crate::core::LeadStore;
use crate::domain::model::UNKNOWN_CLIENT;
use crate::utils::error::{ErrorCategory, LeadError};
use serde::Serialize;
use serde_json::json;
use std::net::SocketAddr;

pub const LEAD_PATH: &str = "/api/lead";
pub const HEALTH_PATH: &str = "/healthz";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct LeadAccepted {
    success: bool,
    message: &'static str,
    lead_id: String,
}

/// Shared request state: the intake pipeline plus the pre-rendered page.
pub struct App<S: LeadStore> {
    intake: LeadIntake<S>,
    home: String,
}

impl<S: LeadStore> App<S> {
    pub fn new(intake: LeadIntake<S>) -> Self {
        Self {
            intake,
            home: page::render_home().into_string(),
        }
    }

    pub fn intake(&self) -> &LeadIntake<S> {
        &self.intake
    }

    pub async fn dispatch(&self, request: &HttpRequest, peer: Option<SocketAddr>) -> HttpResponse {
        match (request.method.as_str(), request.path.as_str()) {
            ("GET", "/") => HttpResponse::html(200, self.home.clone()),
            ("GET", HEALTH_PATH) => HttpResponse::json(200, &json!({ "status": "ok" })),
            ("POST", LEAD_PATH) => self.submit_lead(request, peer).await,
            (_, "/") | (_, HEALTH_PATH) => method_not_allowed("GET"),
            (_, LEAD_PATH) => method_not_allowed("POST"),
            _ => HttpResponse::json(404, &json!({ "error": "Not found" })),
        }
    }

    async fn submit_lead(&self, request: &HttpRequest, peer: Option<SocketAddr>) -> HttpResponse {
        let client_ip = client_address(request, peer);
        let outcome = self
            .intake
            .submit(&rate_key(peer), &client_ip, &request.body)
            .await;
        lead_response(outcome)
    }
}

/// First `X-Forwarded-For` entry, else the socket peer, else [`UNKNOWN_CLIENT`].
pub fn client_address(request: &HttpRequest, peer: Option<SocketAddr>) -> String {
    request
        .header("x-forwarded-for")
        .and_then(|value| value.split(',').next())
        .map(str::trim)
        .filter(|first| !first.is_empty())
        .map(str::to_string)
        .or_else(|| peer.map(|addr| addr.ip().to_string()))
        .unwrap_or_else(|| UNKNOWN_CLIENT.to_string())
}

/// Limiter key: the socket peer only. Forwarded headers are client supplied.
pub fn rate_key(peer: Option<SocketAddr>) -> String {
    peer.map(|addr| addr.ip().to_string())
        .unwrap_or_else(|| UNKNOWN_CLIENT.to_string())
}

fn lead_response(outcome: IntakeOutcome) -> HttpResponse {
    let response = match outcome.result {
        Ok(lead) => HttpResponse::json(
            200,
            &LeadAccepted {
                success: true,
                message: "Lead submitted successfully",
                lead_id: lead.id.to_string(),
            },
        ),
        Err(e) => error_response(&e),
    };

    outcome
        .rate
        .headers()
        .into_iter()
        .fold(response, |response, (name, value)| response.with_header(name, value))
}

/// Maps an error to its status code and a body that reveals nothing internal.
pub fn error_response(error: &LeadError) -> HttpResponse {
    let message = error.user_friendly_message();
    match (error.category(), error) {
        (ErrorCategory::Validation, LeadError::ValidationError { details }) => {
            HttpResponse::json(400, &json!({ "error": message, "details": details }))
        }
        (ErrorCategory::Spam, _) => HttpResponse::json(400, &json!({ "error": message })),
        (ErrorCategory::RateLimit, _) => HttpResponse::json(429, &json!({ "error": message })),
        (ErrorCategory::Protocol, LeadError::PayloadTooLarge { .. }) => {
            HttpResponse::json(413, &json!({ "error": message }))
        }
        (ErrorCategory::Protocol, _) => HttpResponse::json(400, &json!({ "error": message })),
        _ => HttpResponse::json(500, &json!({ "error": message })),
    }
}

fn method_not_allowed(allow: &str) -> HttpResponse {
    HttpResponse::json(405, &json!({ "error": "Method not allowed" })).with_header("Allow", allow)
}
