//! Thin adapters for the external collaborators: the payment gateway, the
//! email dispatcher and the AI completion service. Every call is attempted
//! once; failures surface as a generic error and never crash a handler.

use serde::Serialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::config::Config;

#[derive(Debug, Serialize)]
pub struct PaymentOrder {
    pub order_id: String,
    pub amount: i64,
    pub currency: String,
    pub key: String,
    pub is_mock: bool,
}

/// Creates a payment order for `amount` minor units. Falls back to a
/// synthetic order when gateway credentials are absent or placeholders,
/// mirroring the development path of the hosted gateway.
pub async fn create_payment_order(
    client: &reqwest::Client,
    config: &Config,
    amount: i64,
    currency: &str,
) -> anyhow::Result<PaymentOrder> {
    let (key_id, key_secret) = match (&config.payment_key_id, &config.payment_key_secret) {
        (Some(id), Some(secret)) if !id.contains("placeholder") => (id.clone(), secret.clone()),
        _ => {
            tracing::info!(amount, "payment credentials absent, issuing mock order");
            return Ok(PaymentOrder {
                order_id: format!("order_mock_{}", Uuid::new_v4().simple()),
                amount,
                currency: currency.to_string(),
                key: config
                    .payment_key_id
                    .clone()
                    .unwrap_or_else(|| "test_key".to_string()),
                is_mock: true,
            });
        }
    };

    let receipt = format!("receipt_{}", chrono::Utc::now().timestamp_millis());
    let resp = client
        .post("https://api.razorpay.com/v1/orders")
        .basic_auth(&key_id, Some(&key_secret))
        .json(&json!({ "amount": amount, "currency": currency, "receipt": receipt }))
        .send()
        .await?;

    if !resp.status().is_success() {
        anyhow::bail!("payment gateway returned status {}", resp.status());
    }

    let body: Value = resp.json().await?;
    let order_id = body
        .get("id")
        .and_then(|v| v.as_str())
        .ok_or_else(|| anyhow::anyhow!("payment gateway response missing order id"))?
        .to_string();

    Ok(PaymentOrder {
        order_id,
        amount: body.get("amount").and_then(|v| v.as_i64()).unwrap_or(amount),
        currency: body
            .get("currency")
            .and_then(|v| v.as_str())
            .unwrap_or(currency)
            .to_string(),
        key: key_id,
        is_mock: false,
    })
}

/// Dispatches the donation thank-you note. The transport is a logged mock;
/// callers fire-and-forget and failures are logged, never retried.
pub async fn send_thank_you_email(to: &str, name: &str, amount: f64) -> anyhow::Result<()> {
    tracing::info!(
        to,
        name,
        amount,
        "sending thank-you email for donation"
    );
    Ok(())
}

/// Asks the generative-language API to answer `message` strictly from the
/// uploaded context document.
pub async fn complete_chat(
    client: &reqwest::Client,
    config: &Config,
    message: &str,
    context: &str,
) -> anyhow::Result<String> {
    let api_key = config
        .gemini_api_key
        .as_deref()
        .ok_or_else(|| anyhow::anyhow!("AI API key not configured"))?;

    let prompt = format!(
        "You are a helpful and transparent assistant for the NGO 'HopeConnect'.\n\
         Answer the user's question strictly from the data below. If the answer\n\
         is not in the data, say you do not have that information. Use Markdown,\n\
         bold key figures, and tables for lists.\n\n\
         Data:\n{context}\n\nUser question: \"{message}\""
    );

    let url = format!(
        "https://generativelanguage.googleapis.com/v1beta/models/gemini-flash-latest:generateContent?key={api_key}"
    );
    let resp = client
        .post(&url)
        .json(&json!({ "contents": [{ "parts": [{ "text": prompt }] }] }))
        .send()
        .await?;

    if !resp.status().is_success() {
        anyhow::bail!("AI service returned status {}", resp.status());
    }

    let body: Value = resp.json().await?;
    let text = body
        .pointer("/candidates/0/content/parts/0/text")
        .and_then(|v| v.as_str())
        .ok_or_else(|| anyhow::anyhow!("AI service response missing completion text"))?
        .to_string();
    Ok(text)
}
