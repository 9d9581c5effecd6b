//! Audit workspace: the loaded image, the progress machine and the last
//! result, with one explicit lifecycle.
//!
//! Loading a new image or resetting orphans any in-flight attempt; its result
//! is dropped on arrival because its ticket no longer matches.

use std::sync::Arc;

use crate::credential::{Credential, CredentialStore};
use crate::error::CoreError;
use crate::progress::{AuditTicket, Outcome, ProgressState};
use crate::types::AnalysisResult;

/// An image held in memory, ready to submit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedImage {
    pub name: String,
    pub bytes: Arc<[u8]>,
}

impl LoadedImage {
    /// # Errors
    ///
    /// Returns [`CoreError::EmptyInput`] when `bytes` is empty.
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Result<Self, CoreError> {
        if bytes.is_empty() {
            return Err(CoreError::EmptyInput);
        }
        Ok(Self {
            name: name.into(),
            bytes: bytes.into(),
        })
    }
}

/// What happened to a completed call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    Applied,
    /// The ticket belonged to an abandoned attempt.
    Discarded,
}

#[derive(Debug, Default)]
pub struct AuditWorkspace {
    image: Option<LoadedImage>,
    progress: ProgressState,
    result: Option<Arc<AnalysisResult>>,
}

impl AuditWorkspace {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the image and clears any previous result or error.
    pub fn load_image(&mut self, image: LoadedImage) {
        tracing::info!(name = %image.name, bytes = image.bytes.len(), "image loaded");
        self.image = Some(image);
        self.result = None;
        self.progress.reset();
    }

    /// Starts an attempt: requires an image and a resolvable credential.
    ///
    /// The previous result is discarded, not merged.
    ///
    /// # Errors
    ///
    /// - [`CoreError::NoImageLoaded`] without an image.
    /// - [`CoreError::AuditInFlight`] while another attempt runs.
    /// - [`CoreError::NeedsCredential`] when no key resolves; progress stays
    ///   untouched so the user can enter a key and retrigger.
    pub fn begin_audit(
        &mut self,
        credentials: &CredentialStore,
    ) -> Result<(AuditTicket, Credential, LoadedImage), CoreError> {
        let image = self.image.clone().ok_or(CoreError::NoImageLoaded)?;
        if self.progress.is_analyzing() {
            return Err(CoreError::AuditInFlight);
        }
        let (credential, source) = credentials.resolve_with_source()?;
        let ticket = self.progress.start()?;
        self.result = None;
        tracing::info!(%ticket, image = %image.name, key_source = ?source, "audit started");
        Ok((ticket, credential, image))
    }

    /// Records the outcome of the call started with `ticket`.
    pub fn complete(
        &mut self,
        ticket: AuditTicket,
        outcome: Result<AnalysisResult, String>,
    ) -> Completion {
        let progress_outcome = match &outcome {
            Ok(_) => Outcome::Success,
            Err(message) => Outcome::Failed(message.clone()),
        };
        if !self.progress.settle(ticket, progress_outcome) {
            return Completion::Discarded;
        }
        match outcome {
            Ok(result) => {
                tracing::info!(%ticket, "audit complete");
                self.result = Some(Arc::new(result));
            }
            Err(message) => {
                tracing::warn!(%ticket, error = %message, "audit failed");
            }
        }
        Completion::Applied
    }

    /// Advances the simulated stage; see [`ProgressState::tick`].
    pub fn tick(&mut self) -> bool {
        self.progress.tick()
    }

    /// Drops the image, result and error.
    pub fn reset(&mut self) {
        self.image = None;
        self.result = None;
        self.progress.reset();
    }

    #[must_use]
    pub fn image(&self) -> Option<&LoadedImage> {
        self.image.as_ref()
    }

    #[must_use]
    pub fn progress(&self) -> &ProgressState {
        &self.progress
    }

    #[must_use]
    pub fn result(&self) -> Option<Arc<AnalysisResult>> {
        self.result.clone()
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.progress.error()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credential::Credential;
    use crate::fixtures::full_result;

    fn image() -> LoadedImage {
        LoadedImage::new("shot.png", vec![0x89, b'P', b'N', b'G']).expect("non-empty")
    }

    fn keyed_store() -> CredentialStore {
        CredentialStore::new(Some("env-key"))
    }

    #[test]
    fn empty_image_is_rejected() {
        assert_eq!(
            LoadedImage::new("empty.png", Vec::new()),
            Err(CoreError::EmptyInput)
        );
    }

    #[test]
    fn audit_without_image_fails() {
        let mut ws = AuditWorkspace::new();
        assert_eq!(
            ws.begin_audit(&keyed_store()).unwrap_err(),
            CoreError::NoImageLoaded
        );
    }

    #[test]
    fn audit_without_credential_does_not_start() {
        let mut ws = AuditWorkspace::new();
        ws.load_image(image());
        let err = ws.begin_audit(&CredentialStore::new(None)).unwrap_err();
        assert_eq!(err, CoreError::NeedsCredential);
        assert!(!ws.progress().is_analyzing());
    }

    #[test]
    fn saving_a_key_requires_an_explicit_retrigger() {
        let mut ws = AuditWorkspace::new();
        ws.load_image(image());
        let mut store = CredentialStore::new(None);
        assert!(ws.begin_audit(&store).is_err());

        store.save_session(Credential::new("sky123").expect("valid"));
        assert!(!ws.progress().is_analyzing());

        let (_, credential, _) = ws.begin_audit(&store).expect("retrigger starts");
        assert_eq!(credential.expose(), "sky123");
        assert!(ws.progress().is_analyzing());
    }

    #[test]
    fn success_stores_result_and_stops_analyzing() {
        let mut ws = AuditWorkspace::new();
        ws.load_image(image());
        let (ticket, _, _) = ws.begin_audit(&keyed_store()).expect("start");
        ws.tick();
        assert_eq!(ws.complete(ticket, Ok(full_result())), Completion::Applied);
        assert!(!ws.progress().is_analyzing());
        assert!(ws.result().is_some());
        assert!(ws.error().is_none());
    }

    #[test]
    fn failure_keeps_no_result() {
        let mut ws = AuditWorkspace::new();
        ws.load_image(image());
        let (ticket, _, _) = ws.begin_audit(&keyed_store()).expect("start");
        ws.complete(ticket, Err("quota exhausted".to_owned()));
        assert!(ws.result().is_none());
        assert_eq!(ws.error(), Some("quota exhausted"));
    }

    #[test]
    fn second_audit_while_running_is_refused() {
        let mut ws = AuditWorkspace::new();
        ws.load_image(image());
        ws.begin_audit(&keyed_store()).expect("start");
        assert_eq!(
            ws.begin_audit(&keyed_store()).unwrap_err(),
            CoreError::AuditInFlight
        );
    }

    #[test]
    fn result_arriving_after_reset_is_discarded() {
        let mut ws = AuditWorkspace::new();
        ws.load_image(image());
        let (ticket, _, _) = ws.begin_audit(&keyed_store()).expect("start");
        ws.reset();
        assert_eq!(ws.complete(ticket, Ok(full_result())), Completion::Discarded);
        assert!(ws.result().is_none());
        assert!(ws.image().is_none());
    }

    #[test]
    fn result_arriving_after_new_image_is_discarded() {
        let mut ws = AuditWorkspace::new();
        ws.load_image(image());
        let (stale, _, _) = ws.begin_audit(&keyed_store()).expect("start");
        ws.load_image(image());
        let (current, _, _) = ws.begin_audit(&keyed_store()).expect("restart");

        assert_eq!(ws.complete(stale, Ok(full_result())), Completion::Discarded);
        assert!(ws.progress().is_analyzing());
        assert_eq!(ws.complete(current, Ok(full_result())), Completion::Applied);
    }

    #[test]
    fn new_audit_discards_previous_result() {
        let mut ws = AuditWorkspace::new();
        ws.load_image(image());
        let (ticket, _, _) = ws.begin_audit(&keyed_store()).expect("start");
        ws.complete(ticket, Ok(full_result()));
        assert!(ws.result().is_some());

        ws.begin_audit(&keyed_store()).expect("second run");
        assert!(ws.result().is_none());
        assert_eq!(ws.progress().stage(), 0);
    }
}
