use reqwest::StatusCode;
use thiserror::Error;

/// Failure of a single API call.
///
/// Every error is terminal for the call that produced it; the client never
/// retries.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Non-2xx response, or the request never got a response at all.
    #[error("{}", describe_transport(.url, .status, .body, .source))]
    Transport {
        url: String,
        /// `None` when the failure happened before a status line arrived.
        status: Option<StatusCode>,
        body: String,
        #[source]
        source: Option<reqwest::Error>,
    },

    /// The body could not be decoded as the expected JSON.
    #[error("failed to parse API JSON (url={url}): {source}")]
    Decode {
        url: String,
        text: String,
        #[source]
        source: serde_json::Error,
    },
}

impl ApiError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Transport { status, .. } => *status,
            ApiError::Decode { .. } => None,
        }
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, ApiError::Transport { .. })
    }

    pub fn is_decode(&self) -> bool {
        matches!(self, ApiError::Decode { .. })
    }

    /// Raw response text, truncated to `limit` characters.
    pub fn body_excerpt(&self, limit: usize) -> String {
        let text = match self {
            ApiError::Transport { body, .. } => body,
            ApiError::Decode { text, .. } => text,
        };
        text.chars().take(limit).collect()
    }
}

// Gateway errors look like {"statusCode": 401, "message": "Access denied ..."}
#[derive(Debug, serde::Deserialize)]
struct GatewayErrorResponse {
    #[serde(default, alias = "statusCode")]
    status_code: Option<u16>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

fn describe_transport(
    url: &str,
    status: &Option<StatusCode>,
    body: &str,
    source: &Option<reqwest::Error>,
) -> String {
    if let Some(e) = source {
        if e.is_timeout() {
            return format!("request timed out (url={})", url);
        }
    }
    let Some(status) = *status else {
        return match source {
            Some(e) => format!("could not connect (url={}): {}", url, e),
            None => format!("request failed (url={})", url),
        };
    };
    if let Some(e) = source {
        return format!("failed to read response body: HTTP {} (url={}): {}", status, url, e);
    }

    let parsed = serde_json::from_str::<GatewayErrorResponse>(body).ok();
    let message = parsed
        .as_ref()
        .and_then(|e| e.message.as_deref().or(e.error.as_deref()))
        .unwrap_or(body);
    let status_in_body = parsed
        .as_ref()
        .and_then(|e| e.status_code)
        .unwrap_or(status.as_u16());

    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        return format!(
            "SEC API rejected the subscription key (HTTP {}).\n- Check SEC_FUND_FACTSHEET_KEY / SEC_FUND_DAILY_INFO_KEY\n- Each API product (Factsheet, Daily Info) has its own key\n\nServer message: {}\nrequest: {}",
            status_in_body, message, url
        );
    }

    if status == StatusCode::NOT_FOUND {
        return format!(
            "SEC API resource not found (HTTP 404).\n- The fund id may be wrong or the fund has no data for this endpoint\n- The configured base URL should be https://api.sec.or.th\n\nServer message: {}\nrequest: {}",
            message, url
        );
    }

    format!(
        "API request failed: HTTP {} for url ({})\n{}",
        status_in_body, url, message
    )
}
