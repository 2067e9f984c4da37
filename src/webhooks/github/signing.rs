use hmac::{Hmac, Mac};
use rocket::{
    data::{ByteUnit, FromData, Outcome},
    http::ContentType,
    Data, Request, State,
};
use sha2::Sha256;
use tracing::trace;

use crate::webhooks::{
    github::{GitHubSecret, ACCESS_TOKEN},
    WebhookError,
};

const X_GITHUB_SIGNATURE: &str = "X-Hub-Signature-256";

type HmacSha256 = Hmac<Sha256>;

fn validate_signature(secret: &[u8], signature: &str, data: &[u8]) -> bool {
    trace!("validating signature...");

    let mut mac = match HmacSha256::new_from_slice(secret) {
        Ok(mac) => mac,
        Err(_) => return false,
    };

    mac.update(data);

    // GitHub puts a prefix in front of its hex SHA256
    let signature = match signature.strip_prefix("sha256=") {
        Some(s) => s,
        None => {
            trace!("couldn't strip prefix from signature `{}`", signature);
            return false;
        }
    };

    match hex::decode(signature) {
        // constant time comparison
        Ok(bytes) => mac.verify_slice(&bytes).is_ok(),
        Err(_) => {
            trace!("couldn't decode hex-encoded signature {}", signature);
            false
        }
    }
}

/// Computes the `X-Hub-Signature-256` header GitHub would send along `data`.
#[cfg(test)]
pub(crate) fn sign(secret: &[u8], data: &[u8]) -> String {
    let mut mac = HmacSha256::new_from_slice(secret).expect("HMAC accepts keys of any size");
    mac.update(data);
    format!("sha256={}", hex::encode(mac.finalize().into_bytes()))
}

/// Extracts the JSON document from a verified body.
///
/// GitHub sends it either as-is, or url-encoded in the `payload` field of a form. A form may also
/// carry the `access_token` meant for the chat API.
fn extract_payload(
    content_type: &ContentType,
    body: Vec<u8>,
) -> Result<SignedGitHubPayload, WebhookError> {
    if content_type.is_form() {
        let mut json = None;
        let mut access_token = None;
        for (key, value) in url::form_urlencoded::parse(&body) {
            match &*key {
                "payload" => json = Some(value.into_owned()),
                ACCESS_TOKEN if !value.is_empty() => access_token = Some(value.into_owned()),
                _ => {}
            }
        }

        let json = json.ok_or(WebhookError::Authentication("form has no payload field"))?;
        return Ok(SignedGitHubPayload { json, access_token });
    }

    let json = String::from_utf8(body)
        .map_err(|_| WebhookError::Authentication("payload isn't valid UTF-8"))?;
    Ok(SignedGitHubPayload {
        json,
        access_token: None,
    })
}

/// Verified payload of a GitHub webhook delivery
pub struct SignedGitHubPayload {
    /// The JSON document describing the event
    pub json: String,
    /// Chat API credential found in a form-encoded body
    pub access_token: Option<String>,
}

const LIMIT: ByteUnit = ByteUnit::Mebibyte(1);

// Tracking issue for chaining Data guards to avoid reimplementing all this:
// https://github.com/SergioBenitez/Rocket/issues/775
#[rocket::async_trait]
impl<'r> FromData<'r> for SignedGitHubPayload {
    type Error = WebhookError;

    async fn from_data(request: &'r Request<'_>, data: Data<'r>) -> Outcome<'r, Self> {
        trace!("received payload on GitHub webhook endpoint: {:?}", request);

        let content_type = match request.content_type() {
            Some(ct) if ct.is_json() || ct.is_form() => ct.clone(),
            other => {
                trace!(
                    "content type `{:?}` wasn't json nor a form, stopping here...",
                    other
                );
                return WebhookError::Authentication("wrong content type").outcome();
            }
        };

        let signatures = request
            .headers()
            .get(X_GITHUB_SIGNATURE)
            .collect::<Vec<_>>();
        if signatures.len() != 1 {
            trace!("couldn't locate {} header", X_GITHUB_SIGNATURE);
            return WebhookError::Authentication("request header needs exactly one signature")
                .outcome();
        }

        let size_limit = request.limits().get("json").unwrap_or(LIMIT);
        let content = match data.open(size_limit).into_bytes().await {
            Ok(bytes) if bytes.is_complete() => bytes.into_inner(),
            Ok(_) => {
                trace!("payload was too big");
                return WebhookError::Authentication("data limit exceeded").outcome();
            }
            Err(e) => {
                trace!("couldn't read payload: {}", e);
                return WebhookError::Authentication("couldn't read payload").outcome();
            }
        };

        let signature = signatures[0];
        let secret = match request.guard::<&State<GitHubSecret>>().await.succeeded() {
            Some(secret) => secret,
            None => return WebhookError::Authentication("no secret configured").outcome(),
        };

        if !validate_signature(secret.0.as_bytes(), signature, &content) {
            trace!("signature validation failed, stopping here...");
            return WebhookError::Authentication("couldn't verify signature").outcome();
        }

        trace!("validated GitHub payload");
        match extract_payload(&content_type, content) {
            Ok(payload) => Outcome::Success(payload),
            Err(e) => e.outcome(),
        }
    }
}
