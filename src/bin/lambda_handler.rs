//! AWS Lambda handler for loan calculations
//!
//! Routes POST requests by path to the three operations:
//!   /loan_repayments, /total_sum, /effective_interest_rate
//!
//! Supports Lambda Function URLs for direct HTTP access.

use lambda_http::{run, service_fn, Body, Error, Request, Response};
use loan_calculator::{LoanError, LoanService, Operation};
use log::warn;
use serde_json::json;
use std::sync::OnceLock;

static SERVICE: OnceLock<LoanService> = OnceLock::new();

fn service() -> &'static LoanService {
    SERVICE.get_or_init(LoanService::from_env)
}

fn response(status: u16, body: Body) -> Result<Response<Body>, Error> {
    let response = Response::builder()
        .status(status)
        .header("Content-Type", "application/json")
        .header("Access-Control-Allow-Origin", "*")
        .header("Access-Control-Allow-Methods", "POST, OPTIONS")
        .header("Access-Control-Allow-Headers", "Content-Type")
        .body(body)?;
    Ok(response)
}

fn error_response(status: u16, message: &str) -> Result<Response<Body>, Error> {
    response(status, Body::Text(json!({ "error": message }).to_string()))
}

fn loan_error_response(err: &LoanError) -> Result<Response<Body>, Error> {
    warn!("Request failed: {}", err);
    error_response(err.status_code(), &err.to_string())
}

/// Lambda handler function
async fn handler(event: Request) -> Result<Response<Body>, Error> {
    // Handle CORS preflight
    if event.method().as_str() == "OPTIONS" {
        return response(200, Body::Empty);
    }

    let Some(operation) = Operation::from_path(event.uri().path()) else {
        return error_response(404, &format!("Unknown route: {}", event.uri().path()));
    };

    if event.method().as_str() != "POST" {
        return error_response(405, "Method not allowed");
    }

    // Parse request body
    let body_str = match event.body() {
        Body::Text(s) => s.clone(),
        Body::Binary(b) => String::from_utf8_lossy(b).to_string(),
        Body::Empty => String::new(),
    };

    match service().handle_json(operation, &body_str) {
        Ok(body) => response(200, Body::Text(body.to_string())),
        Err(err) => loan_error_response(&err),
    }
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    env_logger::init();
    run(service_fn(handler)).await
}
