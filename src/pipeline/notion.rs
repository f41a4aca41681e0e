//! Notion publishing: create one page under the configured parent.
//!
//! The only stage that talks to Notion. The request payload is assembled by
//! [`build_page_payload`] — a pure function, so the exact wire shape is
//! unit-testable without a network — and sent with a bounded timeout.
//! 429 and 5xx responses are retried with the same exponential backoff as
//! the draft stage; 4xx responses are returned immediately as typed errors
//! since retrying cannot help.

use crate::blocks::Block;
use crate::config::NoteConfig;
use crate::error::NoteError;
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::time::{sleep, Duration};
use tracing::{debug, info, warn};

/// Page-creation endpoint of the Notion REST API.
pub const NOTION_API_URL: &str = "https://api.notion.com/v1/pages";

/// Resolved Notion credentials, config first, environment second.
#[derive(Debug, Clone)]
pub struct NotionCredentials {
    pub token: String,
    pub parent_page_id: String,
}

/// Descriptor of the created page, parsed from the API response.
#[derive(Debug, Clone, Deserialize)]
pub struct PageRef {
    pub id: String,
    #[serde(default)]
    pub url: String,
}

/// Resolve the integration token and parent page id.
///
/// Config values win; otherwise the `NOTION_TOKEN` and
/// `NOTION_PARENT_PAGE_ID` environment variables are consulted.
pub fn resolve_credentials(config: &NoteConfig) -> Result<NotionCredentials, NoteError> {
    let token = config
        .notion_token
        .clone()
        .or_else(|| non_empty_env("NOTION_TOKEN"))
        .ok_or_else(|| NoteError::NotionNotConfigured {
            hint: "Set NOTION_TOKEN or pass --notion-token (create an internal \
                   integration at https://www.notion.so/my-integrations)."
                .to_string(),
        })?;

    let parent_page_id = config
        .notion_parent_page_id
        .clone()
        .or_else(|| non_empty_env("NOTION_PARENT_PAGE_ID"))
        .ok_or_else(|| NoteError::NotionNotConfigured {
            hint: "Set NOTION_PARENT_PAGE_ID or pass --parent-page; the \
                   integration must be shared with that page."
                .to_string(),
        })?;

    Ok(NotionCredentials {
        token,
        parent_page_id,
    })
}

fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

/// Assemble the page-creation request body.
pub fn build_page_payload(parent_page_id: &str, title: &str, blocks: &[Block]) -> Value {
    json!({
        "parent": { "page_id": parent_page_id },
        "properties": {
            "title": [
                { "type": "text", "text": { "content": title } }
            ]
        },
        "children": blocks.iter().map(Block::to_api_value).collect::<Vec<Value>>(),
    })
}

/// Create one Notion page and return its descriptor.
pub async fn create_page(
    creds: &NotionCredentials,
    title: &str,
    blocks: &[Block],
    config: &NoteConfig,
) -> Result<PageRef, NoteError> {
    let client = reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(config.api_timeout_secs))
        .build()
        .map_err(|e| NoteError::Internal(format!("http client: {e}")))?;

    let payload = build_page_payload(&creds.parent_page_id, title, blocks);
    debug!(blocks = blocks.len(), "publishing page to Notion");

    let mut last_err: Option<NoteError> = None;

    for attempt in 0..=config.max_retries {
        if attempt > 0 {
            let backoff = config.retry_backoff_ms * 2u64.pow(attempt - 1);
            warn!(
                "publish: retry {}/{} after {}ms",
                attempt, config.max_retries, backoff
            );
            sleep(Duration::from_millis(backoff)).await;
        }

        let response = client
            .post(NOTION_API_URL)
            .bearer_auth(&creds.token)
            .header("Notion-Version", &config.notion_version)
            .json(&payload)
            .send()
            .await;

        match response {
            Ok(resp) => {
                let status = resp.status();

                if status.is_success() {
                    let page: PageRef = resp
                        .json()
                        .await
                        .map_err(|e| NoteError::Internal(format!("response body: {e}")))?;
                    info!("created page {} ({})", page.id, page.url);
                    return Ok(page);
                }

                if status.as_u16() == 401 || status.as_u16() == 403 {
                    return Err(NoteError::AuthError {
                        detail: api_message(resp).await,
                    });
                }

                if status.as_u16() == 429 {
                    let retry_after_secs = resp
                        .headers()
                        .get("Retry-After")
                        .and_then(|v| v.to_str().ok())
                        .and_then(|v| v.parse::<u64>().ok());
                    last_err = Some(NoteError::RateLimitExceeded { retry_after_secs });
                    if let Some(secs) = retry_after_secs {
                        warn!("publish: rate limited, server asks for {}s", secs);
                        sleep(Duration::from_secs(secs)).await;
                    }
                    continue;
                }

                if status.is_server_error() {
                    last_err = Some(NoteError::NotionApiError {
                        status: status.as_u16(),
                        message: api_message(resp).await,
                    });
                    continue;
                }

                // Remaining 4xx: malformed payload, archived parent, etc.
                return Err(NoteError::NotionApiError {
                    status: status.as_u16(),
                    message: api_message(resp).await,
                });
            }
            Err(e) if e.is_timeout() => {
                last_err = Some(NoteError::ApiTimeout {
                    secs: config.api_timeout_secs,
                });
            }
            Err(e) => {
                last_err = Some(NoteError::RequestFailed {
                    reason: e.to_string(),
                });
            }
        }
    }

    Err(last_err.unwrap_or_else(|| NoteError::Internal("publish failed".to_string())))
}

/// Pull Notion's human-readable `message` field from an error body.
async fn api_message(resp: reqwest::Response) -> String {
    let status = resp.status();
    match resp.json::<Value>().await {
        Ok(body) => body
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| format!("HTTP {status}")),
        Err(_) => format!("HTTP {status}"),
    }
}
