//! Playlist ingestion
//!
//! Pages are fetched strictly one after another, each request carrying the
//! previous page's continuation token, and folded into a single list. The
//! playlist state is only touched once the whole list is in hand, and only
//! if no newer ingest was started in the meantime.

use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, info, warn};

use crate::core::youtube::{ListingSource, PAGE_SIZE, PageRequest};
use crate::error::{Result, YtFocusError};
use crate::types::{PLACEHOLDER_API_KEY, PlaylistEntry, PlaylistState};

static LIST_PARAM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[?&]list=([^&#]+)").expect("Invalid regex"));

/// Pull the `list=` query parameter out of a playlist URL
pub fn extract_list_id(url: &str) -> Result<String> {
    let raw = LIST_PARAM
        .captures(url)
        .and_then(|captures| captures.get(1))
        .map(|m| m.as_str())
        .ok_or_else(|| YtFocusError::InvalidUrl(format!("no list= parameter in {}", url)))?;

    let id = urlencoding::decode(raw)
        .map(|decoded| decoded.into_owned())
        .unwrap_or_else(|_| raw.to_string());
    Ok(id)
}

/// Reject a missing or placeholder API key
pub fn validate_credential(credential: Option<&str>) -> Result<String> {
    match credential.map(str::trim) {
        None | Some("") => Err(YtFocusError::Configuration(
            "no YouTube API key configured (set api_key or YOUTUBE_API_KEY)".into(),
        )),
        Some(PLACEHOLDER_API_KEY) => Err(YtFocusError::Configuration(
            "the YouTube API key is still the placeholder value".into(),
        )),
        Some(key) => Ok(key.to_string()),
    }
}

/// Fetch every page of a playlist, in provider order
pub async fn fetch_all<S: ListingSource>(
    source: &S,
    list_id: &str,
    credential: &str,
) -> Result<Vec<PlaylistEntry>> {
    let mut items = Vec::new();
    let mut page_token: Option<String> = None;

    loop {
        let page = source
            .fetch_page(PageRequest {
                list_id: list_id.to_string(),
                max_results: PAGE_SIZE,
                page_token: page_token.take(),
                credential: credential.to_string(),
            })
            .await?;

        debug!(list_id, count = page.items.len(), "received playlist page");
        items.extend(page.items);

        match page.next_page_token {
            Some(token) => page_token = Some(token),
            None => break,
        }
    }

    Ok(items
        .into_iter()
        .enumerate()
        .map(|(index, item)| PlaylistEntry {
            id: item.video_id,
            title: item.title,
            index,
        })
        .collect())
}

/// A started ingest, ready to run off the event loop
#[derive(Debug)]
pub struct IngestJob<S> {
    pub generation: u64,
    pub url: String,
    pub list_id: String,
    credential: String,
    source: S,
}

impl<S: ListingSource> IngestJob<S> {
    pub async fn run(self) -> IngestCompletion {
        let result = fetch_all(&self.source, &self.list_id, &self.credential).await;
        IngestCompletion {
            generation: self.generation,
            url: self.url,
            result,
        }
    }
}

/// Result of a finished ingest, tagged with the generation it belongs to
#[derive(Debug)]
pub struct IngestCompletion {
    pub generation: u64,
    pub url: String,
    pub result: Result<Vec<PlaylistEntry>>,
}

/// What applying a completion did to the playlist
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestOutcome {
    Committed { count: usize },
    /// A newer ingest was started; this result was thrown away
    Superseded,
}

/// Starts ingests and applies their completions to a [`PlaylistState`]
#[derive(Debug, Clone)]
pub struct PlaylistIngester<S> {
    source: S,
    credential: Option<String>,
}

impl<S: ListingSource> PlaylistIngester<S> {
    pub fn new(source: S, credential: Option<String>) -> Self {
        Self { source, credential }
    }

    /// Validate input and claim a new generation.
    ///
    /// Nothing is fetched and no generation is used up if the credential
    /// or the URL is bad.
    pub fn begin(&self, state: &mut PlaylistState, url: &str) -> Result<IngestJob<S>> {
        let credential = validate_credential(self.credential.as_deref())?;
        let list_id = extract_list_id(url)?;

        state.ingest_generation += 1;
        state.loading = true;
        info!(%list_id, generation = state.ingest_generation, "starting playlist ingest");

        Ok(IngestJob {
            generation: state.ingest_generation,
            url: url.to_string(),
            list_id,
            credential,
            source: self.source.clone(),
        })
    }

    /// Apply a finished ingest.
    ///
    /// Entries are replaced in full, and only when the completion belongs
    /// to the latest generation. Errors leave the entries untouched.
    pub fn commit(
        &self,
        state: &mut PlaylistState,
        completion: IngestCompletion,
    ) -> Result<IngestOutcome> {
        let current = completion.generation == state.ingest_generation;

        let entries = match completion.result {
            Ok(entries) => entries,
            Err(e) => {
                if current {
                    state.loading = false;
                }
                warn!(generation = completion.generation, error = %e, "playlist ingest failed");
                return Err(e);
            }
        };

        if !current {
            debug!(
                generation = completion.generation,
                latest = state.ingest_generation,
                "discarding superseded playlist"
            );
            return Ok(IngestOutcome::Superseded);
        }

        let count = entries.len();
        state.source_url = completion.url;
        state.entries = entries;
        state.current_index = 0;
        state.loading = false;
        info!(count, generation = completion.generation, "playlist loaded");

        Ok(IngestOutcome::Committed { count })
    }

    /// Begin, fetch and commit in one go
    pub async fn ingest(&self, state: &mut PlaylistState, url: &str) -> Result<IngestOutcome> {
        let job = self.begin(state, url)?;
        let completion = job.run().await;
        self.commit(state, completion)
    }
}
