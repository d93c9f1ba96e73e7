use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use once_cell::sync::OnceCell;
use rand::Rng;
use rand::seq::SliceRandom;
use reqwest::blocking::Client;
use reqwest::header::{CONTENT_TYPE, ORIGIN, REFERER, USER_AGENT};
use serde_json::Value;

use crate::markup;

/// Offset between the human-facing Premier League week number and the
/// provider's internal match-week id.
pub const MATCH_WEEK_OFFSET: u64 = 18389;

const SITE_BASE: &str = "https://www.premierleague.com";
const STATS_API_BASE: &str = "https://footballapi.pulselive.com/football/stats";
// The stats API rejects requests without a site referer; any club page works.
const STATS_REFERER: &str = "https://www.premierleague.com/clubs/1/Arsenal/squad?se=79";

const FIXTURE_ANCHOR_CLASS: &str = "match-fixture--abridged";
const SUMMARY_INFO_CLASS: &str = "mc-summary__info";

const REQUEST_TIMEOUT_SECS: u64 = 10;

static CLIENT: OnceCell<Client> = OnceCell::new();

pub fn http_client() -> Result<&'static Client> {
    CLIENT.get_or_try_init(|| {
        Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .context("failed to build http client")
    })
}

/// Browser identities rotated across page requests. Passed into each fetch
/// together with the caller's rng; nothing here is process-global.
#[derive(Debug, Clone)]
pub struct UserAgentPool {
    agents: Vec<String>,
}

const FALLBACK_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                              (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

impl UserAgentPool {
    pub fn new(agents: Vec<String>) -> Self {
        Self { agents }
    }

    /// A small set of common desktop browser identities.
    pub fn builtin() -> Self {
        Self::new(
            [
                FALLBACK_AGENT,
                "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 \
                 (KHTML, like Gecko) Version/17.4 Safari/605.1.15",
                "Mozilla/5.0 (X11; Linux x86_64; rv:125.0) Gecko/20100101 Firefox/125.0",
                "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:125.0) Gecko/20100101 \
                 Firefox/125.0",
            ]
            .map(str::to_string)
            .to_vec(),
        )
    }

    pub fn pick(&self, rng: &mut impl Rng) -> &str {
        self.agents
            .choose(rng)
            .map(String::as_str)
            .unwrap_or(FALLBACK_AGENT)
    }
}

/// Per-match resource paths listed on the provider's match-week page.
/// An empty vec means the week simply has no fixtures posted yet.
pub fn fetch_match_paths(
    client: &Client,
    agents: &UserAgentPool,
    rng: &mut impl Rng,
    provider_week: u64,
) -> Result<Vec<String>> {
    let url = format!("{SITE_BASE}/matchweek/{provider_week}/blog?match=true");
    let html = fetch_text(client, agents, rng, &url)?;
    Ok(extract_match_paths(&html))
}

/// Referee name from the per-match markup page.
pub fn fetch_referee(
    client: &Client,
    agents: &UserAgentPool,
    rng: &mut impl Rng,
    match_path: &str,
) -> Result<String> {
    let url = format!("{SITE_BASE}{match_path}");
    let html = fetch_text(client, agents, rng, &url)?;
    extract_referee(&html).ok_or_else(|| anyhow!("no summary info block on {url}"))
}

/// The statistics document for one match, as loose JSON. The same document
/// carries both the fixture metadata (`entity`) and the per-team statistic
/// lists (`data`).
pub fn fetch_match_document(
    client: &Client,
    agents: &UserAgentPool,
    rng: &mut impl Rng,
    match_path: &str,
) -> Result<Value> {
    let url = format!("{STATS_API_BASE}{match_path}");
    let resp = client
        .get(&url)
        .header(USER_AGENT, agents.pick(rng))
        .header(ORIGIN, SITE_BASE)
        .header(REFERER, STATS_REFERER)
        .header(
            CONTENT_TYPE,
            "application/x-www-form-urlencoded; charset=UTF-8",
        )
        .send()
        .with_context(|| format!("request failed: {url}"))?;
    let status = resp.status();
    let body = resp.text().context("failed reading body")?;
    if !status.is_success() {
        return Err(anyhow!("http {status}: {url}"));
    }
    serde_json::from_str(&body).with_context(|| format!("invalid stats json from {url}"))
}

pub fn extract_match_paths(html: &str) -> Vec<String> {
    markup::anchor_hrefs_with_class(html, FIXTURE_ANCHOR_CLASS)
}

/// The referee line is the last summary-info block on the match page,
/// rendered as `"Referee: <name>"`; everything after the first `": "` is
/// the name.
pub fn extract_referee(html: &str) -> Option<String> {
    let text = markup::texts_with_class(html, SUMMARY_INFO_CLASS).pop()?;
    Some(match text.split_once(": ") {
        Some((_, name)) => name.to_string(),
        None => text,
    })
}

fn fetch_text(
    client: &Client,
    agents: &UserAgentPool,
    rng: &mut impl Rng,
    url: &str,
) -> Result<String> {
    let resp = client
        .get(url)
        .header(USER_AGENT, agents.pick(rng))
        .send()
        .with_context(|| format!("request failed: {url}"))?;
    let status = resp.status();
    let body = resp.text().context("failed reading body")?;
    if !status.is_success() {
        return Err(anyhow!("http {status}: {url}"));
    }
    Ok(body)
}
