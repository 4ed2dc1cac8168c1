//! The `Studio`: every generation action behind one handle.
//!
//! Each action runs through the same path:
//! 1. `begin` supersedes the action's previous request, runs the input and
//!    quota guards, and registers a fresh cancellation token.
//! 2. `call` awaits the provider, racing the token.
//! 3. `settle`/`fail` apply the outcome under the view lock, but only if the
//!    token is still live. Cancelled requests change nothing.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use studio_core::prompts;
use studio_core::schema::{analysis_schema, retirement_schema};
use studio_core::{
    decode_result, parse_script, validate_upload, AnalysisMode, AnalysisResult, BrandVoice,
    GeneratedMedia, HistoryItem, HistoryPayload, MediaKind, QuotaGuard, RetirementInputs,
    RetirementPlan, StudioError, StudioResult, Upload, UsageCounter, ViralScript,
    ANALYSIS_HISTORY_CAP, GENERATION_HISTORY_CAP,
};
use studio_llm::{GenerativeProvider, GenerativeRequest, GenerativeResponse, OutputKind};
use studio_store::{keys, HistoryList, KeyValueStore, MemoryStore, Persisted, Preferences};
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::action::{ActionError, ActionKind, ActionResult, ActionState};
use crate::machine::{ActionEvent, ActionMachine};
use crate::media::{MediaSlot, MediaSlots, MediaUrlFactory, TempFileUrls};
use crate::requests::RequestRegistry;

/// Which persisted history list to read or clear.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HistoryScope {
    /// Analysis results, capped at 50.
    Analysis,
    /// Scripts, improvements, retirement plans and media, capped at 100.
    Generation,
}

struct Ticket {
    kind: ActionKind,
    request_id: Uuid,
    token: CancellationToken,
}

/// What the front end shows.
struct ViewState {
    machines: HashMap<ActionKind, ActionMachine>,
    analysis: HashMap<AnalysisMode, AnalysisResult>,
    script: Option<ViralScript>,
    improved_text: Option<String>,
    retirement_plan: Option<RetirementPlan>,
    media: MediaSlots,
    /// Metered requests in flight, each holding one quota slot.
    reserved: HashSet<Uuid>,
}

impl ViewState {
    fn machine(&mut self, kind: ActionKind) -> &mut ActionMachine {
        self.machines.entry(kind).or_default()
    }

    fn release(&mut self, request_id: Uuid) {
        if self.reserved.remove(&request_id) {
            log::debug!("Released quota slot of request {}", request_id);
        }
    }

    fn reserved_slots(&self) -> u32 {
        u32::try_from(self.reserved.len()).unwrap_or(u32::MAX)
    }
}

/// What survives a restart (plus the session-scoped API key).
struct SavedState {
    brand_voice: Persisted<BrandVoice>,
    preferences: Persisted<Preferences>,
    tour_completed: Persisted<bool>,
    usage: Persisted<UsageCounter>,
    api_key: Persisted<Option<String>>,
    analysis_history: HistoryList<HistoryItem>,
    generation_history: HistoryList<HistoryItem>,
}

pub struct StudioBuilder {
    provider: Arc<dyn GenerativeProvider>,
    durable: Arc<dyn KeyValueStore>,
    session: Arc<dyn KeyValueStore>,
    media: Arc<dyn MediaUrlFactory>,
    guard: QuotaGuard,
}

impl StudioBuilder {
    /// Store for session-scoped keys. Defaults to a fresh `MemoryStore`.
    pub fn with_session_store(mut self, session: Arc<dyn KeyValueStore>) -> Self {
        self.session = session;
        self
    }

    /// Defaults to `TempFileUrls::in_temp_dir()`.
    pub fn with_media_urls(mut self, media: Arc<dyn MediaUrlFactory>) -> Self {
        self.media = media;
        self
    }

    pub fn with_quota(mut self, guard: QuotaGuard) -> Self {
        self.guard = guard;
        self
    }

    pub async fn build(self) -> Studio {
        let durable = self.durable;
        let saved = SavedState {
            brand_voice: Persisted::load(durable.clone(), keys::BRAND_VOICE, BrandVoice::default())
                .await,
            preferences: Persisted::load(durable.clone(), keys::PREFERENCES, Preferences::default())
                .await,
            tour_completed: Persisted::load(durable.clone(), keys::HAS_COMPLETED_TOUR, false).await,
            usage: Persisted::load(durable.clone(), keys::USAGE, UsageCounter::default()).await,
            api_key: Persisted::load(self.session.clone(), keys::API_KEY, None).await,
            analysis_history: HistoryList::load(
                durable.clone(),
                keys::ANALYSIS_HISTORY,
                ANALYSIS_HISTORY_CAP,
            )
            .await,
            generation_history: HistoryList::load(
                durable,
                keys::GENERATION_HISTORY,
                GENERATION_HISTORY_CAP,
            )
            .await,
        };

        let view = ViewState {
            machines: ActionKind::ALL
                .into_iter()
                .map(|kind| (kind, ActionMachine::new()))
                .collect(),
            analysis: HashMap::new(),
            script: None,
            improved_text: None,
            retirement_plan: None,
            media: MediaSlots::new(self.media),
            reserved: HashSet::new(),
        };

        log::info!(
            "Studio ready: plan={} monthly_limit={}",
            self.guard.plan,
            self.guard.monthly_limit
        );

        Studio {
            provider: self.provider,
            guard: self.guard,
            requests: RequestRegistry::new(),
            view: RwLock::new(view),
            saved: RwLock::new(saved),
        }
    }
}

pub struct Studio {
    provider: Arc<dyn GenerativeProvider>,
    guard: QuotaGuard,
    requests: RequestRegistry,
    view: RwLock<ViewState>,
    saved: RwLock<SavedState>,
}

fn expect_json(response: GenerativeResponse) -> StudioResult<Value> {
    match response {
        GenerativeResponse::Json(value) => Ok(value),
        other => Err(StudioError::malformed(format!(
            "expected a JSON response, got {}",
            other.variant_name()
        ))),
    }
}

fn expect_text(response: GenerativeResponse) -> StudioResult<String> {
    match response {
        GenerativeResponse::Text(text) if !text.trim().is_empty() => Ok(text),
        GenerativeResponse::Text(_) => Err(StudioError::malformed("the response was empty")),
        other => Err(StudioError::malformed(format!(
            "expected a text response, got {}",
            other.variant_name()
        ))),
    }
}

fn expect_media(response: GenerativeResponse, kind: MediaKind) -> StudioResult<GeneratedMedia> {
    let prefix = match kind {
        MediaKind::Image => "image/",
        MediaKind::Audio => "audio/",
        MediaKind::Video => "video/",
    };
    match response {
        GenerativeResponse::Binary { mime_type, bytes } if mime_type.starts_with(prefix) => {
            Ok(GeneratedMedia {
                kind,
                mime_type,
                bytes,
            })
        }
        GenerativeResponse::Binary { mime_type, .. } => Err(StudioError::malformed(format!(
            "expected {prefix}* media, got {mime_type}"
        ))),
        other => Err(StudioError::malformed(format!(
            "expected binary media, got {}",
            other.variant_name()
        ))),
    }
}

fn require(value: &str, message: &str) -> StudioResult<()> {
    if value.trim().is_empty() {
        Err(StudioError::validation(message))
    } else {
        Ok(())
    }
}

impl Studio {
    pub fn builder(
        provider: Arc<dyn GenerativeProvider>,
        durable: Arc<dyn KeyValueStore>,
    ) -> StudioBuilder {
        StudioBuilder {
            provider,
            durable,
            session: Arc::new(MemoryStore::new()),
            media: Arc::new(TempFileUrls::in_temp_dir()),
            guard: QuotaGuard::default(),
        }
    }

    // ========== Request lifecycle ==========

    async fn begin(&self, kind: ActionKind, checked: StudioResult<()>) -> ActionResult<Ticket> {
        let mut view = self.view.write().await;

        if let Some(previous) = self.requests.cancel(kind).await {
            log::debug!("[{}] Superseding request {}", kind, previous);
            view.release(previous);
        }

        if let Err(e) = checked {
            let error = ActionError::from(e);
            log::info!("[{}] Rejected before sending: {}", kind, error);
            view.machine(kind).handle_event(ActionEvent::ValidationFailed {
                message: error.to_string(),
            });
            return Err(error);
        }

        let usage = self.saved.read().await.usage.get().clone();
        if !self.guard.can_reserve(&usage, view.reserved_slots(), Utc::now()) {
            let limit = self.guard.monthly_limit;
            log::warn!("[{}] Monthly limit of {} reached", kind, limit);
            view.machine(kind)
                .handle_event(ActionEvent::QuotaExceeded { limit });
            return Err(ActionError::UpgradeRequired { limit });
        }

        let entry = self.requests.begin(kind).await;
        if self.guard.plan.is_metered() {
            view.reserved.insert(entry.request_id);
        }
        view.machine(kind).handle_event(ActionEvent::Submitted {
            request_id: entry.request_id,
        });
        log::debug!("[{}] Request {} issued", kind, entry.request_id);

        Ok(Ticket {
            kind,
            request_id: entry.request_id,
            token: entry.token,
        })
    }

    async fn call(
        &self,
        ticket: &Ticket,
        request: GenerativeRequest,
    ) -> ActionResult<GenerativeResponse> {
        let outcome = tokio::select! {
            biased;
            _ = ticket.token.cancelled() => None,
            outcome = self.provider.generate(request) => Some(outcome),
        };

        let Some(outcome) = outcome else {
            log::debug!("[{}] Request {} cancelled in flight", ticket.kind, ticket.request_id);
            return Err(ActionError::Cancelled);
        };

        match outcome {
            Ok(response) => Ok(response),
            Err(e) => {
                log::warn!("[{}] Provider error: {}", ticket.kind, e);
                Err(self.fail(ticket, ActionError::from_llm(&e)).await)
            }
        }
    }

    /// Call the provider and decode its answer.
    async fn execute<T, D>(
        &self,
        ticket: &Ticket,
        request: GenerativeRequest,
        decode: D,
    ) -> ActionResult<T>
    where
        D: FnOnce(GenerativeResponse) -> StudioResult<T>,
    {
        let response = self.call(ticket, request).await?;
        match decode(response) {
            Ok(value) => Ok(value),
            Err(e) => {
                log::warn!("[{}] Unusable response: {}", ticket.kind, e);
                Err(self.fail(ticket, e.into()).await)
            }
        }
    }

    async fn fail(&self, ticket: &Ticket, error: ActionError) -> ActionError {
        let mut view = self.view.write().await;
        if ticket.token.is_cancelled() {
            log::debug!("[{}] Discarding error of cancelled request", ticket.kind);
            return ActionError::Cancelled;
        }

        self.requests.finish(ticket.kind, ticket.request_id).await;
        view.release(ticket.request_id);
        view.machine(ticket.kind).handle_event(ActionEvent::Failed {
            request_id: ticket.request_id,
            message: error.to_string(),
        });
        error
    }

    async fn settle<F>(
        &self,
        ticket: &Ticket,
        history: Option<(HistoryScope, HistoryItem)>,
        apply: F,
    ) -> ActionResult<()>
    where
        F: FnOnce(&mut ViewState) -> StudioResult<()>,
    {
        let mut view = self.view.write().await;
        if ticket.token.is_cancelled() {
            log::debug!("[{}] Discarding result of cancelled request", ticket.kind);
            return Err(ActionError::Cancelled);
        }

        self.requests.finish(ticket.kind, ticket.request_id).await;
        // The slot turns into the real increment below, still under the view lock.
        view.release(ticket.request_id);

        if let Err(e) = apply(&mut view) {
            let error = ActionError::from(e);
            log::warn!("[{}] Failed to apply result: {}", ticket.kind, error);
            view.machine(ticket.kind).handle_event(ActionEvent::Failed {
                request_id: ticket.request_id,
                message: error.to_string(),
            });
            return Err(error);
        }

        view.machine(ticket.kind).handle_event(ActionEvent::Succeeded {
            request_id: ticket.request_id,
        });

        let mut saved = self.saved.write().await;
        match history {
            Some((HistoryScope::Analysis, item)) => saved.analysis_history.push(item).await,
            Some((HistoryScope::Generation, item)) => saved.generation_history.push(item).await,
            None => {}
        }

        let next = self.guard.record_success(saved.usage.get(), Utc::now());
        if &next != saved.usage.get() {
            saved.usage.set(next).await;
        }

        log::info!("[{}] Request {} settled", ticket.kind, ticket.request_id);
        Ok(())
    }

    async fn selected_model(&self) -> Option<String> {
        self.saved.read().await.preferences.get().selected_model.clone()
    }

    async fn voiced(&self) -> BrandVoice {
        self.saved.read().await.brand_voice.get().clone()
    }

    // ========== Actions ==========

    /// Analyze a file or pasted text in `mode`.
    pub async fn analyze(&self, mode: AnalysisMode, upload: Upload) -> ActionResult<AnalysisResult> {
        let ticket = self
            .begin(ActionKind::Analyze, validate_upload(mode, &upload))
            .await?;

        let file_name = upload.file_name().map(str::to_string);
        let request = match upload {
            Upload::Text(text) => {
                // A pasted-text analysis has no preview; drop the last file's.
                self.view.write().await.media.release(MediaSlot::Upload);
                GenerativeRequest::json(prompts::analysis_prompt(mode, Some(&text)), analysis_schema(mode))
            }
            Upload::File {
                mime_type, bytes, ..
            } => {
                if let Err(e) = self
                    .view
                    .write()
                    .await
                    .media
                    .replace(MediaSlot::Upload, &mime_type, &bytes)
                {
                    log::warn!("Failed to create upload preview: {}", e);
                }
                GenerativeRequest::json(prompts::analysis_prompt(mode, None), analysis_schema(mode))
                    .with_media(mime_type, bytes)
            }
        }
        .with_model(self.selected_model().await);

        let result = self
            .execute(&ticket, request, |response| {
                AnalysisResult::decode(mode, expect_json(response)?)
            })
            .await?;

        let item = HistoryItem::new(HistoryPayload::Analysis(result.clone()), file_name);
        let shown = result.clone();
        self.settle(&ticket, Some((HistoryScope::Analysis, item)), move |view| {
            view.analysis.insert(mode, shown);
            Ok(())
        })
        .await?;

        Ok(result)
    }

    /// Generate a viral video script blueprint for `topic`.
    pub async fn generate_script(&self, topic: &str) -> ActionResult<ViralScript> {
        let ticket = self
            .begin(
                ActionKind::Script,
                require(topic, "Please enter a topic for your video"),
            )
            .await?;

        let voice = self.voiced().await;
        let request = GenerativeRequest::text(prompts::script_prompt(topic, Some(&voice)))
            .with_model(self.selected_model().await);

        let script = self
            .execute(&ticket, request, |response| {
                let script = parse_script(&expect_text(response)?);
                if script.is_empty() {
                    return Err(StudioError::malformed(
                        "the response did not contain any script sections",
                    ));
                }
                Ok(script)
            })
            .await?;

        let item = HistoryItem::new(
            HistoryPayload::Script {
                topic: topic.trim().to_string(),
                script: script.clone(),
            },
            None,
        );
        let shown = script.clone();
        self.settle(&ticket, Some((HistoryScope::Generation, item)), move |view| {
            view.script = Some(shown);
            Ok(())
        })
        .await?;

        Ok(script)
    }

    /// Rewrite `text` in the brand voice.
    pub async fn improve_text(&self, text: &str) -> ActionResult<String> {
        let ticket = self
            .begin(ActionKind::Improve, require(text, "Please enter some text to improve"))
            .await?;

        let voice = self.voiced().await;
        let request = GenerativeRequest::text(prompts::improve_prompt(text, Some(&voice)))
            .with_model(self.selected_model().await);

        let improved = self
            .execute(&ticket, request, |response| {
                Ok(expect_text(response)?.trim().to_string())
            })
            .await?;

        let item = HistoryItem::new(
            HistoryPayload::Improvement {
                original: text.to_string(),
                improved: improved.clone(),
            },
            None,
        );
        let shown = improved.clone();
        self.settle(&ticket, Some((HistoryScope::Generation, item)), move |view| {
            view.improved_text = Some(shown);
            Ok(())
        })
        .await?;

        Ok(improved)
    }

    /// Generate an image. `aspect_ratio` falls back to the saved preference.
    pub async fn generate_image(
        &self,
        description: &str,
        aspect_ratio: Option<&str>,
    ) -> ActionResult<GeneratedMedia> {
        let checked = require(description, "Please describe the image you want");
        let aspect_ratio = self.aspect_ratio_or_default(aspect_ratio).await;
        let request = GenerativeRequest::text(prompts::image_prompt(description, &aspect_ratio))
            .with_output(OutputKind::Image {
                aspect_ratio: Some(aspect_ratio),
            });

        self.generate_media(ActionKind::Image, MediaKind::Image, description, checked, request)
            .await
    }

    /// Generate a short video. `aspect_ratio` falls back to the saved preference.
    pub async fn generate_video(
        &self,
        description: &str,
        aspect_ratio: Option<&str>,
    ) -> ActionResult<GeneratedMedia> {
        let checked = require(description, "Please describe the video you want");
        let aspect_ratio = self.aspect_ratio_or_default(aspect_ratio).await;
        let request = GenerativeRequest::text(prompts::video_prompt(description, &aspect_ratio))
            .with_output(OutputKind::Video {
                aspect_ratio: Some(aspect_ratio),
            });

        self.generate_media(ActionKind::Video, MediaKind::Video, description, checked, request)
            .await
    }

    /// Read `text` aloud. `voice` falls back to the saved preference.
    pub async fn synthesize_speech(
        &self,
        text: &str,
        voice: Option<&str>,
    ) -> ActionResult<GeneratedMedia> {
        let checked = require(text, "Please enter the text to speak");
        let voice = match voice {
            Some(voice) => voice.to_string(),
            None => self.saved.read().await.preferences.get().voice.clone(),
        };
        let request = GenerativeRequest::text(prompts::speech_prompt(text))
            .with_output(OutputKind::Audio { voice: Some(voice) });

        self.generate_media(ActionKind::Speech, MediaKind::Audio, text, checked, request)
            .await
    }

    async fn aspect_ratio_or_default(&self, aspect_ratio: Option<&str>) -> String {
        match aspect_ratio {
            Some(ratio) => ratio.to_string(),
            None => self.saved.read().await.preferences.get().aspect_ratio.clone(),
        }
    }

    async fn generate_media(
        &self,
        kind: ActionKind,
        media_kind: MediaKind,
        prompt: &str,
        checked: StudioResult<()>,
        request: GenerativeRequest,
    ) -> ActionResult<GeneratedMedia> {
        let ticket = self.begin(kind, checked).await?;

        let media = self
            .execute(&ticket, request, |response| expect_media(response, media_kind))
            .await?;

        let item = HistoryItem::new(
            HistoryPayload::Media {
                kind: media_kind,
                prompt: prompt.to_string(),
                mime_type: media.mime_type.clone(),
            },
            None,
        );
        self.settle(&ticket, Some((HistoryScope::Generation, item)), |view| {
            if let Some(slot) = kind.media_slot() {
                view.media.replace(slot, &media.mime_type, &media.bytes)?;
            }
            Ok(())
        })
        .await?;

        Ok(media)
    }

    /// Build a retirement plan from `inputs`.
    pub async fn plan_retirement(&self, inputs: RetirementInputs) -> ActionResult<RetirementPlan> {
        let ticket = self
            .begin(ActionKind::Retirement, inputs.validate())
            .await?;

        let request =
            GenerativeRequest::json(prompts::retirement_prompt(&inputs), retirement_schema())
                .with_model(self.selected_model().await);

        let plan: RetirementPlan = self
            .execute(&ticket, request, |response| {
                decode_result(expect_json(response)?)
            })
            .await?;

        let item = HistoryItem::new(HistoryPayload::Retirement(plan.clone()), None);
        let shown = plan.clone();
        self.settle(&ticket, Some((HistoryScope::Generation, item)), move |view| {
            view.retirement_plan = Some(shown);
            Ok(())
        })
        .await?;

        Ok(plan)
    }

    // ========== Cancellation ==========

    /// Cancel `kind`'s in-flight request. Other actions keep running.
    pub async fn cancel(&self, kind: ActionKind) -> bool {
        let mut view = self.view.write().await;
        match self.requests.cancel(kind).await {
            Some(request_id) => {
                view.release(request_id);
                view.machine(kind)
                    .handle_event(ActionEvent::Cancelled { request_id });
                log::info!("[{}] Request {} cancelled", kind, request_id);
                true
            }
            None => false,
        }
    }

    /// Cancel every in-flight request. Returns how many were cancelled.
    pub async fn cancel_all(&self) -> usize {
        let mut view = self.view.write().await;
        let cancelled = self.requests.cancel_all().await;
        for (kind, request_id) in &cancelled {
            view.release(*request_id);
            view.machine(*kind).handle_event(ActionEvent::Cancelled {
                request_id: *request_id,
            });
        }
        if !cancelled.is_empty() {
            log::info!("Cancelled {} in-flight request(s)", cancelled.len());
        }
        cancelled.len()
    }

    // ========== View state ==========

    pub async fn state(&self, kind: ActionKind) -> ActionState {
        self.view
            .read()
            .await
            .machines
            .get(&kind)
            .map(ActionState::from)
            .unwrap_or_default()
    }

    pub async fn analysis_result(&self, mode: AnalysisMode) -> Option<AnalysisResult> {
        self.view.read().await.analysis.get(&mode).cloned()
    }

    pub async fn script(&self) -> Option<ViralScript> {
        self.view.read().await.script.clone()
    }

    pub async fn improved_text(&self) -> Option<String> {
        self.view.read().await.improved_text.clone()
    }

    pub async fn retirement_plan(&self) -> Option<RetirementPlan> {
        self.view.read().await.retirement_plan.clone()
    }

    /// URL of the media currently shown in `slot`.
    pub async fn media_url(&self, slot: MediaSlot) -> Option<String> {
        self.view.read().await.media.url(slot).map(str::to_string)
    }

    // ========== Persisted state ==========

    pub async fn history(&self, scope: HistoryScope) -> Vec<HistoryItem> {
        let saved = self.saved.read().await;
        match scope {
            HistoryScope::Analysis => saved.analysis_history.items().to_vec(),
            HistoryScope::Generation => saved.generation_history.items().to_vec(),
        }
    }

    pub async fn clear_history(&self, scope: HistoryScope) {
        let mut saved = self.saved.write().await;
        match scope {
            HistoryScope::Analysis => saved.analysis_history.clear().await,
            HistoryScope::Generation => saved.generation_history.clear().await,
        }
    }

    pub async fn brand_voice(&self) -> BrandVoice {
        self.voiced().await
    }

    pub async fn set_brand_voice(&self, brand_voice: BrandVoice) {
        self.saved.write().await.brand_voice.set(brand_voice).await;
    }

    pub async fn preferences(&self) -> Preferences {
        self.saved.read().await.preferences.get().clone()
    }

    pub async fn set_preferences(&self, preferences: Preferences) {
        self.saved.write().await.preferences.set(preferences).await;
    }

    pub async fn has_completed_tour(&self) -> bool {
        *self.saved.read().await.tour_completed.get()
    }

    pub async fn complete_tour(&self) {
        self.saved.write().await.tour_completed.set(true).await;
    }

    pub async fn usage(&self) -> UsageCounter {
        self.saved.read().await.usage.get().clone()
    }

    /// Generations left this month, `None` on an unmetered plan.
    pub async fn remaining_generations(&self) -> Option<u32> {
        let usage = self.usage().await;
        self.guard.remaining(&usage, Utc::now())
    }

    pub fn quota(&self) -> QuotaGuard {
        self.guard
    }

    /// Check `api_key` with the provider; an accepted key is kept for the session.
    pub async fn validate_api_key(&self, api_key: &str) -> ActionResult<bool> {
        if api_key.trim().is_empty() {
            return Err(ActionError::Validation(
                "Please enter an API key".to_string(),
            ));
        }

        let valid = self
            .provider
            .validate_key(api_key.trim())
            .await
            .map_err(|e| ActionError::from_llm(&e))?;

        if valid {
            self.saved
                .write()
                .await
                .api_key
                .set(Some(api_key.trim().to_string()))
                .await;
            log::info!("API key accepted for this session");
        } else {
            log::warn!("API key rejected");
        }
        Ok(valid)
    }

    /// Key accepted by `validate_api_key` during this session.
    pub async fn session_api_key(&self) -> Option<String> {
        self.saved.read().await.api_key.get().clone()
    }

    /// Cancel everything in flight and revoke every media handle.
    pub async fn shutdown(&self) {
        self.cancel_all().await;
        self.view.write().await.media.release_all();
        log::debug!("Studio shut down");
    }
}
