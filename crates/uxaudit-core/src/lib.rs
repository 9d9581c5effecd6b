//! Core of the forensic UX audit client.
//!
//! Owns the response contract with the model provider and everything that can
//! be decided without a network: the declarative payload schema, response
//! validation, API key resolution, the simulated progress machine, the audit
//! workspace lifecycle and the view-models rendered from a validated result.

pub mod app_config;
pub mod config;
pub mod credential;
pub mod error;
pub mod progress;
pub mod schema;
pub mod types;
pub mod validate;
pub mod views;
pub mod workspace;

#[cfg(test)]
mod fixtures;

pub use app_config::AppConfig;
pub use config::{load_app_config, load_app_config_from_env};
pub use credential::{Credential, CredentialSource, CredentialStore, SessionKeyForm};
pub use error::{ConfigError, CoreError};
pub use progress::{AuditTicket, Outcome, Phase, ProgressState, STATUS_STAGES};
pub use types::{
    AbTestProposal, AgentDebate, AnalysisResult, Finding, HeatmapPoint, KeyFindings,
    Methodology, PersonaTrace, ResearchReport, SaliencyMap, StrategicAction, TestSetup,
};
pub use validate::parse_analysis;
pub use views::AuditViews;
pub use workspace::{AuditWorkspace, Completion, LoadedImage};
