//! API key resolution: process default vs. in-memory session key.
//!
//! The session key lives only inside a [`CredentialStore`] value that the
//! caller owns and passes down explicitly. Nothing here touches the disk.

use std::fmt;

use crate::error::CoreError;

/// An API key. `Debug` and `Display` never print the token.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Wraps a trimmed, non-blank token.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::BlankCredential`] for empty or whitespace input.
    pub fn new(raw: &str) -> Result<Self, CoreError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(CoreError::BlankCredential);
        }
        Ok(Self(trimmed.to_owned()))
    }

    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential([redacted])")
    }
}

impl fmt::Display for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[redacted]")
    }
}

/// Where a resolved credential came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialSource {
    Session,
    ProcessDefault,
}

/// Holds the process default (fixed at construction) and the session slot.
#[derive(Debug, Default, Clone)]
pub struct CredentialStore {
    process_default: Option<Credential>,
    session: Option<Credential>,
}

impl CredentialStore {
    /// Builds a store around the process-wide default, usually
    /// `AppConfig::gemini_api_key`. Blank defaults count as absent.
    #[must_use]
    pub fn new(process_default: Option<&str>) -> Self {
        Self {
            process_default: process_default.and_then(|k| Credential::new(k).ok()),
            session: None,
        }
    }

    /// Resolves the key for the next request. A session key wins over the
    /// process default.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::NeedsCredential`] when neither slot is filled; the
    /// caller must collect a session key before building the request.
    pub fn resolve(&self) -> Result<Credential, CoreError> {
        self.resolve_with_source()
            .map(|(credential, _)| credential)
    }

    /// Like [`resolve`](Self::resolve), also reporting which slot was used.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::NeedsCredential`] when neither slot is filled.
    pub fn resolve_with_source(&self) -> Result<(Credential, CredentialSource), CoreError> {
        if let Some(key) = &self.session {
            return Ok((key.clone(), CredentialSource::Session));
        }
        if let Some(key) = &self.process_default {
            return Ok((key.clone(), CredentialSource::ProcessDefault));
        }
        Err(CoreError::NeedsCredential)
    }

    /// Replaces the session slot. Does not start or resume any audit.
    pub fn save_session(&mut self, credential: Credential) {
        tracing::info!("session API key stored in memory");
        self.session = Some(credential);
    }
}

/// One-shot key entry form.
///
/// Submission is refused client-side for blank input, so a blank form never
/// reaches the network.
#[derive(Debug, Default)]
pub struct SessionKeyForm {
    input: String,
}

impl SessionKeyForm {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_input(&mut self, input: impl Into<String>) {
        self.input = input.into();
    }

    /// Whether the submit action is enabled.
    #[must_use]
    pub fn can_submit(&self) -> bool {
        !self.input.trim().is_empty()
    }

    /// Consumes the form and yields the trimmed key.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::BlankCredential`] when [`can_submit`](Self::can_submit)
    /// is false.
    pub fn submit(self) -> Result<Credential, CoreError> {
        Credential::new(&self.input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_default_and_no_session_needs_credential() {
        let store = CredentialStore::new(None);
        assert_eq!(store.resolve(), Err(CoreError::NeedsCredential));
    }

    #[test]
    fn blank_default_is_treated_as_absent() {
        let store = CredentialStore::new(Some("   "));
        assert_eq!(store.resolve(), Err(CoreError::NeedsCredential));
    }

    #[test]
    fn saved_session_key_resolves_on_every_retry() {
        let mut store = CredentialStore::new(None);
        let mut form = SessionKeyForm::new();
        form.set_input("sky123");
        store.save_session(form.submit().expect("non-blank key"));

        for _ in 0..3 {
            assert_eq!(store.resolve().expect("resolved").expose(), "sky123");
        }
    }

    #[test]
    fn session_key_takes_precedence_over_default() {
        let mut store = CredentialStore::new(Some("env-key"));
        assert_eq!(
            store.resolve_with_source().expect("default").1,
            CredentialSource::ProcessDefault
        );

        store.save_session(Credential::new("sky123").expect("valid"));
        let (key, source) = store.resolve_with_source().expect("session");
        assert_eq!(key.expose(), "sky123");
        assert_eq!(source, CredentialSource::Session);
    }

    #[test]
    fn blank_form_cannot_submit() {
        let mut form = SessionKeyForm::new();
        assert!(!form.can_submit());
        form.set_input("  \t ");
        assert!(!form.can_submit());
        assert_eq!(form.submit(), Err(CoreError::BlankCredential));
    }

    #[test]
    fn form_trims_input() {
        let mut form = SessionKeyForm::new();
        form.set_input("  AIzaSy-test  ");
        assert!(form.can_submit());
        assert_eq!(form.submit().expect("valid").expose(), "AIzaSy-test");
    }

    #[test]
    fn debug_output_is_redacted() {
        let key = Credential::new("super-secret").expect("valid");
        assert!(!format!("{key:?}").contains("super-secret"));
        assert!(!format!("{key}").contains("super-secret"));
        let store = CredentialStore::new(Some("super-secret"));
        assert!(!format!("{store:?}").contains("super-secret"));
    }
}
