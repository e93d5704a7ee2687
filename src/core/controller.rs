//! Download submission controller
//!
//! Drives one page's URL form: validates on submit and paste, picks the
//! native or asynchronous strategy, moves the submission control between its
//! ready and loading appearances and reports outcomes through the notifier.
//!
//! The controller is driven through `&mut self`, so at most one submission is
//! in flight. While `Submitting`, further submits are ignored just as a
//! disabled button would ignore clicks.

use std::path::PathBuf;
use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::core::capability::CapabilityDetector;
use crate::core::config::ControllerSettings;
use crate::core::error_handling::{
    ErrorKind, SubmissionError, DOWNLOAD_STARTED_MESSAGE, PATTERN_MISMATCH_MESSAGE,
};
use crate::core::models::{
    AppError, AppResult, ControlAppearance, Key, KeyPress, NativeSubmission, RejectReason,
    Severity, SubmissionRequest, SubmissionState, SubmitDisposition, ValidationResult,
};
use crate::core::notifier::Notifier;
use crate::core::retrieval::RetrievalClient;
use crate::core::saver::{LocalSaver, SaveHandle};
use crate::core::state_machine::SubmissionStateMachine;
use crate::core::surface::RenderingSurface;
use crate::core::validator::{matching_shape, validate};
use crate::utils::file_utils::{format_file_size, timestamped_filename};

/// Everything the controller needs from its page, created once at load
pub struct PageContext {
    pub surface: Arc<dyn RenderingSurface>,
    pub capability: Arc<dyn CapabilityDetector>,
    pub retrieval: Arc<dyn RetrievalClient>,
    pub saver: Arc<dyn LocalSaver>,
    pub settings: ControllerSettings,
}

/// Puts the submission control into its loading appearance and restores it
/// when dropped, unless told to hold it.
struct LoadingGuard {
    surface: Option<Arc<dyn RenderingSurface>>,
}

impl LoadingGuard {
    fn engage(surface: &Arc<dyn RenderingSurface>) -> Self {
        surface.set_control(ControlAppearance::Loading);
        Self {
            surface: Some(Arc::clone(surface)),
        }
    }

    /// Leave the control loading; the page is about to navigate away
    fn hold(mut self) {
        self.surface = None;
    }
}

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        if let Some(surface) = self.surface.take() {
            surface.set_control(ControlAppearance::Ready);
        }
    }
}

pub struct SubmissionController {
    context: PageContext,
    machine: SubmissionStateMachine,
    notifier: Notifier,
    pending_revocations: Vec<JoinHandle<()>>,
}

impl SubmissionController {
    /// Bind to the page. Fails if the form, input or control is missing.
    pub fn new(context: PageContext) -> AppResult<Self> {
        for id in context.settings.ids.all() {
            if !context.surface.has_element(id) {
                return Err(AppError::MissingElement(id.to_string()));
            }
        }

        let notifier = Notifier::new(
            Arc::clone(&context.surface),
            context.settings.notification_ttl,
        );

        Ok(Self {
            context,
            machine: SubmissionStateMachine::new(),
            notifier,
            pending_revocations: Vec::new(),
        })
    }

    pub fn state(&self) -> SubmissionState {
        self.machine.current()
    }

    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    /// Handle a submit event from the form, a button press or the keyboard
    pub async fn submit(&mut self) -> AppResult<SubmitDisposition> {
        match self.machine.current() {
            SubmissionState::Submitting => {
                debug!("Submission already in flight, ignoring submit");
                return Ok(SubmitDisposition::Ignored);
            }
            SubmissionState::Idle => {}
            _ => {
                self.machine.reset();
            }
        }

        let request = SubmissionRequest::new(self.context.surface.input_value());
        self.machine.transition(SubmissionState::Validating)?;

        let video_url = match validate(&request.raw_url) {
            ValidationResult::Accepted(url) => url,
            ValidationResult::Rejected(reason) => return self.reject(&request, reason),
        };
        debug!(
            "Accepted {} as {:?}",
            video_url,
            matching_shape(&video_url)
        );

        self.machine.transition(SubmissionState::Submitting)?;
        let loading = LoadingGuard::engage(&self.context.surface);

        if !self.context.capability.is_async_capable() {
            info!("Native submission for {}", video_url);
            loading.hold();
            return Ok(SubmitDisposition::Navigate(NativeSubmission {
                action: self.context.settings.form_action.clone(),
                field_name: self.context.settings.field_name.clone(),
                video_url,
            }));
        }

        info!("Asynchronous submission for {}", video_url);
        let outcome = self.retrieve_and_save(&video_url).await;
        drop(loading);

        let state = match outcome {
            Ok(saved) => {
                info!("Download of {} saved to {:?}", video_url, saved);
                self.machine.transition(SubmissionState::Succeeded)?;
                self.notify_terminal(DOWNLOAD_STARTED_MESSAGE, Severity::Success);
                SubmissionState::Succeeded
            }
            Err(err) => {
                error!("Download error for {}: {}", video_url, err);
                let state = SubmissionState::Failed(err.kind());
                self.machine.transition(state)?;
                self.notify_terminal(err.user_message(), err.kind().severity());
                state
            }
        };

        Ok(SubmitDisposition::Resolved(state))
    }

    /// The user changed the input
    pub fn input_edited(&mut self) {
        self.context.surface.set_input_invalid(false);
        self.machine.reset();
    }

    /// The user pasted into the input. Validates once the paste has landed,
    /// without submitting.
    ///
    /// A paste is an edit: a finished submission settles back to `Idle`
    /// even though its notification may be replaced below.
    pub async fn pasted(&mut self) -> ValidationResult {
        tokio::time::sleep(self.context.settings.paste_delay).await;
        self.machine.settle();

        let result = validate(&self.context.surface.input_value());
        match result {
            ValidationResult::Rejected(RejectReason::PatternMismatch) => {
                self.context.surface.set_input_invalid(true);
                self.notifier
                    .notify(PATTERN_MISMATCH_MESSAGE, Severity::Warning);
            }
            _ => self.context.surface.set_input_invalid(false),
        }
        result
    }

    /// Ctrl/Cmd+Enter submits; Escape clears and blurs the focused input
    pub async fn key_pressed(&mut self, key: KeyPress) -> AppResult<Option<SubmitDisposition>> {
        if key.is_submit_accelerator() {
            return self.submit().await.map(Some);
        }

        if key.key == Key::Escape && self.context.surface.input_focused() {
            self.context.surface.clear_input();
            self.context.surface.blur_input();
            self.input_edited();
        }
        Ok(None)
    }

    /// External reset, e.g. the page was shown again after a native
    /// navigation
    pub fn reset(&mut self) {
        self.context.surface.set_control(ControlAppearance::Ready);
        self.context.surface.set_input_invalid(false);
        self.machine.reset();
    }

    /// Wait for deferred handle revocations to finish
    pub async fn drain(&mut self) {
        for task in self.pending_revocations.drain(..) {
            if let Err(err) = task.await {
                warn!("Revocation task failed: {}", err);
            }
        }
    }

    fn reject(
        &mut self,
        request: &SubmissionRequest,
        reason: RejectReason,
    ) -> AppResult<SubmitDisposition> {
        let kind = ErrorKind::from(reason);
        warn!("Submission rejected ({:?}): {:?}", reason, request.raw_url);
        self.notifier.notify(kind.user_message(), kind.severity());
        self.machine.transition(SubmissionState::Idle)?;
        Ok(SubmitDisposition::Cancelled(reason))
    }

    async fn retrieve_and_save(&mut self, video_url: &str) -> Result<PathBuf, SubmissionError> {
        let payload = self.context.retrieval.retrieve(video_url).await?;
        let size = payload.len() as u64;

        let handle = self
            .context
            .saver
            .stage(payload)
            .await
            .map_err(|e| SubmissionError::save(e.to_string()))?;

        let filename = timestamped_filename(
            &self.context.settings.filename_prefix,
            &self.context.settings.extension,
            chrono::Utc::now(),
        );
        let dispatched = self.context.saver.dispatch(&handle, &filename).await;
        self.schedule_revoke(handle);

        let saved = dispatched.map_err(|e| SubmissionError::save(e.to_string()))?;
        info!("Dispatched save of {} ({})", filename, format_file_size(size));
        Ok(saved)
    }

    fn schedule_revoke(&mut self, handle: SaveHandle) {
        let saver = Arc::clone(&self.context.saver);
        let delay = self.context.settings.revoke_delay;

        self.pending_revocations.retain(|task| !task.is_finished());
        self.pending_revocations.push(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let id = handle.id;
            if let Err(err) = saver.revoke(handle).await {
                warn!("Failed to revoke save handle {}: {}", id, err);
            }
        }));
    }

    fn notify_terminal(&self, message: &str, severity: Severity) {
        let machine = self.machine.clone();
        self.notifier.notify_then(message, severity, move || {
            machine.settle();
        });
    }
}
