//! A small axum service that starts payments and receives Shwary webhooks.
//!
//! ```text
//! SHWARY_MERCHANT_ID=... SHWARY_MERCHANT_KEY=... cargo run --example webhook_receiver
//! curl -X POST localhost:3000/payments -H 'content-type: application/json' \
//!      -d '{"phone":"+243972345678","amount":5000,"country":"DRC"}'
//! ```

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};

use shwary::config::LoggingConfig;
use shwary::{init_logging, install_global, ErrorKind, ShwaryAsync, ShwaryConfig, ShwaryError, WebhookPayload};

const CALLBACK_URL: &str = "http://localhost:3000/webhooks/shwary";

#[derive(Debug, Deserialize)]
struct InitiateBody {
    phone: String,
    amount: f64,
    #[serde(default = "default_country")]
    country: String,
}

fn default_country() -> String {
    "DRC".to_string()
}

type ApiResult = Result<Json<Value>, (StatusCode, Json<Value>)>;

fn reject(error: ShwaryError) -> (StatusCode, Json<Value>) {
    let status = match error.kind() {
        ErrorKind::Validation => StatusCode::BAD_REQUEST,
        ErrorKind::Authentication => StatusCode::UNAUTHORIZED,
        ErrorKind::InsufficientFunds => StatusCode::PAYMENT_REQUIRED,
        ErrorKind::RateLimited => StatusCode::TOO_MANY_REQUESTS,
        ErrorKind::Api if error.status() == Some(404) => StatusCode::NOT_FOUND,
        ErrorKind::Api => StatusCode::BAD_GATEWAY,
    };
    (status, Json(json!({ "error": error.kind().as_str(), "detail": error.to_string() })))
}

async fn initiate(State(client): State<ShwaryAsync>, Json(body): Json<InitiateBody>) -> ApiResult {
    let payment = client
        .initiate_payment(&body.country, body.amount, &body.phone, Some(CALLBACK_URL))
        .await
        .map_err(reject)?;
    Ok(Json(json!({ "transaction_id": payment.id, "status": payment.status })))
}

async fn transaction(State(client): State<ShwaryAsync>, Path(id): Path<String>) -> ApiResult {
    let tx = client.get_transaction(&id).await.map_err(reject)?;
    Ok(Json(json!({ "transaction_id": tx.id, "status": tx.status, "amount": tx.amount })))
}

async fn webhook(body: Bytes) -> StatusCode {
    match WebhookPayload::from_slice(&body) {
        Ok(payload) if payload.is_completed() => {
            tracing::info!(transaction_id = %payload.id, "Payment completed");
            StatusCode::OK
        }
        Ok(payload) => {
            tracing::info!(transaction_id = %payload.id, status = %payload.status, "Payment update");
            StatusCode::OK
        }
        Err(e) => {
            tracing::warn!(error = %e, "Rejected webhook");
            StatusCode::BAD_REQUEST
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    install_global(init_logging(&LoggingConfig::default())?)?;

    let client = ShwaryAsync::new(&ShwaryConfig::from_env()?.with_sandbox(true))?;

    let app = Router::new()
        .route("/payments", post(initiate))
        .route("/payments/{id}", get(transaction))
        .route("/webhooks/shwary", post(webhook))
        .with_state(client);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:3000").await?;
    tracing::info!(addr = %listener.local_addr()?, "Listening");
    axum::serve(listener, app).await?;
    Ok(())
}
