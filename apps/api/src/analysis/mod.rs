//! Resume analysis: prompt and schema contract with the model, mock mode, and
//! the fallback policy applied when a live call fails.
//!
//! All model traffic goes through `llm_client`; this module never builds HTTP
//! requests itself.

pub mod mock;
pub mod prompts;
pub mod schema;

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tracing::{error, info, warn};

use crate::analysis::mock::{mock_result, MOCK_LATENCY};
use crate::analysis::prompts::build_analysis_prompt;
use crate::analysis::schema::analysis_response_schema;
use crate::config::{Credential, FallbackMode};
use crate::llm_client::{generate_structured, GeminiClient, LlmError, StructuredModel};
use crate::models::analysis::AnalysisResult;

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("analysis call failed: {0}")]
    Llm(#[from] LlmError),
}

// ────────────────────────────────────────────────────────────────────────────
// Fallback policy
// ────────────────────────────────────────────────────────────────────────────

/// Decides what a failed live analysis turns into.
pub trait FallbackPolicy: Send + Sync {
    fn recover(&self, error: AnalysisError) -> Result<AnalysisResult, AnalysisError>;
}

/// Default policy: log the failure and serve the mock result. Callers never
/// see an error.
pub struct AlwaysMock;

impl FallbackPolicy for AlwaysMock {
    fn recover(&self, error: AnalysisError) -> Result<AnalysisResult, AnalysisError> {
        error!("Gemini analysis failed, serving mock result: {error}");
        Ok(mock_result())
    }
}

/// Diagnostic policy: hand the failure back to the caller untouched.
pub struct SurfaceErrors;

impl FallbackPolicy for SurfaceErrors {
    fn recover(&self, error: AnalysisError) -> Result<AnalysisResult, AnalysisError> {
        warn!("Gemini analysis failed: {error}");
        Err(error)
    }
}

pub fn fallback_policy(mode: FallbackMode) -> Arc<dyn FallbackPolicy> {
    match mode {
        FallbackMode::Mock => Arc::new(AlwaysMock),
        FallbackMode::Surface => Arc::new(SurfaceErrors),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Analyzer
// ────────────────────────────────────────────────────────────────────────────

enum Backend {
    Live(Arc<dyn StructuredModel>),
    Mock,
}

/// Runs one analysis per call: a single model attempt, or the mock after a
/// simulated delay when no credential is configured.
pub struct Analyzer {
    backend: Backend,
    fallback: Arc<dyn FallbackPolicy>,
    mock_latency: Duration,
}

impl Analyzer {
    /// Builds the analyzer for the startup credential.
    pub fn from_credential(credential: &Credential) -> Result<Self, LlmError> {
        match credential {
            Credential::Configured(key) => {
                let client = GeminiClient::new(key.clone())?;
                Ok(Self::live(Arc::new(client)))
            }
            Credential::Unconfigured => Ok(Self::mock()),
        }
    }

    pub fn live(model: Arc<dyn StructuredModel>) -> Self {
        Self {
            backend: Backend::Live(model),
            fallback: Arc::new(AlwaysMock),
            mock_latency: MOCK_LATENCY,
        }
    }

    pub fn mock() -> Self {
        Self {
            backend: Backend::Mock,
            fallback: Arc::new(AlwaysMock),
            mock_latency: MOCK_LATENCY,
        }
    }

    pub fn with_fallback(mut self, fallback: Arc<dyn FallbackPolicy>) -> Self {
        self.fallback = fallback;
        self
    }

    pub fn with_mock_latency(mut self, latency: Duration) -> Self {
        self.mock_latency = latency;
        self
    }

    /// `false` in mock (demo) mode.
    pub fn is_live(&self) -> bool {
        matches!(self.backend, Backend::Live(_))
    }

    /// Analyses a resume for a target role. Under `AlwaysMock` this always
    /// resolves to a result.
    pub async fn analyze(
        &self,
        resume_text: &str,
        target_role: &str,
    ) -> Result<AnalysisResult, AnalysisError> {
        let model = match &self.backend {
            Backend::Live(model) => model,
            Backend::Mock => {
                warn!("Gemini API key missing, using mock analysis");
                tokio::time::sleep(self.mock_latency).await;
                return Ok(mock_result());
            }
        };

        let prompt = build_analysis_prompt(resume_text, target_role);
        match generate_structured::<AnalysisResult>(
            model.as_ref(),
            &prompt,
            analysis_response_schema(),
        )
        .await
        {
            Ok(result) => {
                info!(
                    "Analysis complete: score={} label={} keywords_missing={}",
                    result.overall_score,
                    result.overall_label,
                    result.missing_keywords.len()
                );
                Ok(result)
            }
            Err(e) => self.fallback.recover(e.into()),
        }
    }
}
