//! Job-description input: plain text passes through, http(s) URLs are fetched
//! and reduced to text.

use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;
use reqwest::Client;
use serde::Serialize;
use tracing::{info, warn};

use crate::errors::AppError;

/// Upper bound on extracted job-posting text, in characters.
pub const MAX_JOB_TEXT_CHARS: usize = 10_000;

const USER_AGENT: &str = concat!("resume-api/", env!("CARGO_PKG_VERSION"));

static SCRIPT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<(script|style|noscript)[^>]*>.*?</(script|style|noscript)>")
        .expect("valid script regex")
});
static TITLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<title[^>]*>(.*?)</title>").expect("valid title regex"));
static BLOCK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)<(br|/p|/li|/h[1-6]|/div|/tr)[^>]*>").expect("valid block regex")
});
static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]+>").expect("valid tag regex"));
static SPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[ \t\r\f]+").expect("valid space regex"));
static BLANK_LINES_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n\s*\n+").expect("valid blank line regex"));

#[derive(Debug, Clone, Serialize)]
pub struct FetchedJob {
    pub source: String,
    pub title: Option<String>,
    pub content: String,
}

pub fn is_url(input: &str) -> bool {
    let input = input.trim();
    ["http://", "https://"].iter().any(|scheme| {
        input
            .get(..scheme.len())
            .is_some_and(|p| p.eq_ignore_ascii_case(scheme))
            && input.len() > scheme.len()
            && !input.contains(char::is_whitespace)
    })
}

fn decode_entities(text: &str) -> String {
    text.replace("&nbsp;", " ")
        .replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&rsquo;", "'")
}

/// Strips scripts, styles and tags; keeps block breaks as newlines so the
/// job parser still sees bullet-list structure. Capped at `MAX_JOB_TEXT_CHARS`.
pub fn html_to_text(html: &str) -> FetchedJob {
    let title = TITLE_RE
        .captures(html)
        .map(|c| decode_entities(c[1].trim()))
        .filter(|t| !t.is_empty());
    let text = SCRIPT_RE.replace_all(html, " ");
    let text = BLOCK_RE.replace_all(&text, "\n");
    let text = TAG_RE.replace_all(&text, " ");
    let text = decode_entities(&text);
    let text = SPACE_RE.replace_all(&text, " ");
    let text = BLANK_LINES_RE.replace_all(&text, "\n");
    let content: String = text
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
        .chars()
        .take(MAX_JOB_TEXT_CHARS)
        .collect();
    FetchedJob {
        source: String::new(),
        title,
        content,
    }
}

/// Fetches job postings over HTTP.
#[derive(Clone)]
pub struct JobFetcher {
    client: Client,
}

impl JobFetcher {
    pub fn new(timeout: Duration) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to build HTTP client: {e}")))?;
        Ok(Self { client })
    }

    pub async fn fetch(&self, url: &str) -> Result<FetchedJob, AppError> {
        info!("Fetching job description from {url}");
        let response = self
            .client
            .get(url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| fetch_error(url, e))?;
        let html = response.text().await.map_err(|e| fetch_error(url, e))?;
        let mut job = html_to_text(&html);
        job.source = url.to_string();
        if job.content.is_empty() {
            return Err(AppError::InvalidInput(format!(
                "No readable text at {url}"
            )));
        }
        Ok(job)
    }

    /// Job text for `input`: fetched when it is a URL, otherwise as given.
    pub async fn resolve(&self, input: &str) -> Result<String, AppError> {
        if is_url(input) {
            Ok(self.fetch(input.trim()).await?.content)
        } else {
            Ok(input.to_string())
        }
    }
}

fn fetch_error(url: &str, e: reqwest::Error) -> AppError {
    warn!("Job description fetch failed for {url}: {e}");
    if e.is_timeout() {
        AppError::Timeout(format!("Fetching {url} timed out"))
    } else {
        AppError::InvalidInput(format!("Could not fetch job description from {url}: {e}"))
    }
}
