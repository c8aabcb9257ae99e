//! EffectService - pagination synchronizer and image fetcher.

use std::sync::Arc;
use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use reqwest::Client;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::sync::{Mutex, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use effectdl_core::error::{DlError, Result};
use effectdl_core::{
    Effect, EffectCollection, EffectImage, EffectImageRepository, SessionState, SessionTokens,
};

use crate::config::ClientConfig;
use crate::wire::{ChangeRequest, ChangeResponse, ImageRequest, ImageResponse, ListRequest, ListResponse};

/// Per-record result of one dispatched image fetch, for callers that want
/// to observe individual completions. Failures are already logged.
#[derive(Debug)]
pub struct ImageFetchOutcome {
    pub effect_id: String,
    pub error: Option<DlError>,
}

impl ImageFetchOutcome {
    pub fn succeeded(&self) -> bool {
        self.error.is_none()
    }
}

/// Client for the remote effect service.
///
/// Owns the write side of the injected [`EffectCollection`] and
/// [`SessionState`]; the image repository is shared with any reader.
/// Every read-tokens/remote-call/write-tokens sequence runs under an
/// internal gate so concurrent operations cannot discard each other's
/// refreshed tokens.
pub struct EffectService {
    client: Client,
    config: ClientConfig,
    collection: Arc<EffectCollection>,
    session: Arc<SessionState>,
    images: Arc<dyn EffectImageRepository>,
    session_gate: Mutex<()>,
}

impl EffectService {
    /// Creates a service over caller-constructed state containers and an
    /// already-opened image repository.
    pub fn new(
        config: ClientConfig,
        collection: Arc<EffectCollection>,
        session: Arc<SessionState>,
        images: Arc<dyn EffectImageRepository>,
    ) -> Self {
        Self {
            client: Client::new(),
            config,
            collection,
            session,
            images,
            session_gate: Mutex::new(()),
        }
    }

    /// Synchronizes the full effect list.
    ///
    /// Pages through `get-effect-list` until the server reports no next
    /// page, merging each batch into the collection, dispatching image
    /// fetches without waiting on them, and invoking `on_progress` with
    /// each batch. Transport or decode failures abort the loop; records
    /// merged from earlier pages stay in the collection.
    ///
    /// Once the final page is merged, the dispatched image tasks are
    /// drained so a successful return means the cache is settled too.
    pub async fn fetch_all<F>(
        &self,
        email: &str,
        password: &str,
        mut on_progress: F,
        cancel: &CancellationToken,
    ) -> Result<()>
    where
        F: FnMut(&[Effect]),
    {
        // Explicit policy: every run is a fresh snapshot of the remote
        // list, starting from an unauthenticated session so the supplied
        // credentials always take effect. The persistent image cache is
        // what carries state across runs.
        self.collection.reset();
        self.session.clear();

        let mut page: u32 = 1;
        let mut image_tasks: Vec<JoinHandle<ImageFetchOutcome>> = Vec::new();

        loop {
            if cancel.is_cancelled() {
                return Err(DlError::Cancelled);
            }
            if page > self.config.max_pages {
                return Err(DlError::PageLimitExceeded {
                    pages: self.config.max_pages,
                });
            }

            let response = self.fetch_page(email, password, page).await?;

            let batch: Vec<Effect> = response.effects.into_iter().map(Effect::from).collect();
            let appended = self.collection.append(&batch);
            tracing::debug!(
                "[EffectService] Page {}: {} effects ({} new)",
                page,
                batch.len(),
                appended
            );

            image_tasks.extend(self.spawn_image_fetches(&batch, cancel));
            on_progress(&batch);

            if !response.is_next {
                break;
            }
            page += 1;
        }

        let outcomes = futures::future::join_all(image_tasks).await;
        let mut failed = 0usize;
        for outcome in &outcomes {
            match outcome {
                Ok(o) if !o.succeeded() => failed += 1,
                Err(join_err) => {
                    tracing::warn!("[EffectService] Image task panicked: {}", join_err);
                    failed += 1;
                }
                _ => {}
            }
        }
        tracing::info!(
            "[EffectService] Sync complete: {} effects, {} image fetches failed",
            self.collection.len(),
            failed
        );
        Ok(())
    }

    /// Fetches one list page under the session gate and stores refreshed
    /// tokens before releasing it.
    async fn fetch_page(&self, email: &str, password: &str, page: u32) -> Result<ListResponse> {
        let _gate = self.session_gate.lock().await;

        let tokens = self.session.get();
        let response: ListResponse = if tokens.is_established() {
            self.post_json(
                &self.config.list_url(),
                &ListRequest::next_page(&tokens.session_id, page),
            )
            .await?
        } else {
            self.post_json(&self.config.list_url(), &ListRequest::login(email, password, page))
                .await?
        };

        if !response.session_id.is_empty() {
            self.session
                .set(SessionTokens::new(&response.session_id, &response.dl_sec_key));
        } else if page == 1 {
            // The server scrapes the login form; a missing session id on
            // the first page means the credentials were rejected.
            return Err(DlError::auth("Login rejected: server returned no session id"));
        }

        Ok(response)
    }

    /// Dispatches one image fetch task per record, all issued immediately.
    /// Failures are isolated per record: each task logs its own error and
    /// resolves to an [`ImageFetchOutcome`] instead of propagating.
    pub fn spawn_image_fetches(
        &self,
        batch: &[Effect],
        cancel: &CancellationToken,
    ) -> Vec<JoinHandle<ImageFetchOutcome>> {
        batch
            .iter()
            .map(|effect| {
                let client = self.client.clone();
                let url = self.config.image_url();
                let timeout = self.config.request_timeout;
                let images = Arc::clone(&self.images);
                let effect_id = effect.id.clone();
                let cancel = cancel.clone();
                tokio::spawn(async move {
                    let error = fetch_one_image(
                        &client,
                        &url,
                        timeout,
                        images.as_ref(),
                        &effect_id,
                        &cancel,
                    )
                    .await
                    .err();
                    if let Some(e) = &error {
                        tracing::warn!(
                            "[EffectService] Image fetch failed for effect {}: {}",
                            effect_id,
                            e
                        );
                    }
                    ImageFetchOutcome { effect_id, error }
                })
            })
            .collect()
    }

    /// Selects an effect via `change-effect`, refreshing the session
    /// tokens from the response. On a reported failure the stored tokens
    /// are cleared: the server only answers `succeed: false` when the
    /// session has expired.
    pub async fn change_effect(&self, hash_id: &str) -> Result<()> {
        let _gate = self.session_gate.lock().await;

        let tokens = self.session.get();
        if !tokens.is_established() {
            return Err(DlError::auth("No active session; run fetch_all first"));
        }

        let response: ChangeResponse = self
            .post_json(
                &self.config.change_url(),
                &ChangeRequest {
                    session_id: &tokens.session_id,
                    hash_id,
                    dl_sec_key: &tokens.dl_sec_key,
                },
            )
            .await?;

        if !response.succeed {
            self.session.clear();
            return Err(DlError::auth("Session expired during change-effect"));
        }

        self.session
            .set(SessionTokens::new(response.session_id, response.dl_sec_key));
        tracing::info!("[EffectService] Selected effect {}", hash_id);
        Ok(())
    }

    /// Snapshot of the observable collection.
    pub fn effects(&self) -> Vec<Effect> {
        self.collection.snapshot()
    }

    /// Observer handle over the collection, woken after every merge.
    pub fn subscribe_effects(&self) -> watch::Receiver<Vec<Effect>> {
        self.collection.subscribe()
    }

    /// Current session token pair.
    pub fn session_tokens(&self) -> SessionTokens {
        self.session.get()
    }

    /// Looks up one cached image; `Ok(None)` for ids never fetched.
    pub async fn get_image(&self, effect_id: &str) -> Result<Option<EffectImage>> {
        self.images.get(effect_id).await
    }

    /// Returns every cached image.
    pub async fn get_all_images(&self) -> Result<Vec<EffectImage>> {
        self.images.get_all().await
    }

    async fn post_json<T: DeserializeOwned>(
        &self,
        url: &str,
        body: &impl Serialize,
    ) -> Result<T> {
        let response = self
            .client
            .post(url)
            .json(body)
            .timeout(self.config.request_timeout)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(DlError::transport(format!(
                "{} returned status {}",
                url,
                response.status()
            )));
        }

        Ok(response.json::<T>().await?)
    }
}

/// Fetches and persists a single effect image. Storage failures are
/// retried once before giving up.
async fn fetch_one_image(
    client: &Client,
    url: &str,
    timeout: Duration,
    images: &dyn EffectImageRepository,
    effect_id: &str,
    cancel: &CancellationToken,
) -> Result<()> {
    if cancel.is_cancelled() {
        return Err(DlError::Cancelled);
    }

    let response = client
        .post(url)
        .json(&ImageRequest { effect_id })
        .timeout(timeout)
        .send()
        .await?;
    if !response.status().is_success() {
        return Err(DlError::transport(format!(
            "{} returned status {}",
            url,
            response.status()
        )));
    }

    let body: ImageResponse = response.json().await?;
    if !body.succeed {
        return Err(DlError::transport(format!(
            "Image endpoint reported failure for effect {effect_id}"
        )));
    }

    let encoded = body.image.unwrap_or_default();
    let bytes = BASE64
        .decode(encoded.as_bytes())
        .map_err(|e| DlError::decode("base64", e.to_string()))?;

    let image = EffectImage::new(effect_id, bytes);
    if let Err(first) = images.upsert(&image).await {
        tracing::warn!(
            "[EffectService] Retrying image store for effect {}: {}",
            effect_id,
            first
        );
        images.upsert(&image).await?;
    }
    Ok(())
}
