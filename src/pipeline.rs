/*!
 * Translation pipeline around the enforcement engine.
 *
 * The translator and the fluency post-editor are external services; this
 * module only models them through the [`Translator`] and [`PostEditor`]
 * traits. A run translates the text, enforces the current glossary on the
 * raw translation, and optionally lets the post-editor polish the result.
 * The post-edited text is only accepted when every protected term survived;
 * otherwise the enforced text is returned.
 */

use std::fmt::Debug;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use log::{debug, warn};
use serde::Serialize;

use crate::app_config::Config;
use crate::errors::{ProviderError, TranslationError};
use crate::language_utils::is_supported_language;
use crate::terminology::audit::{AppliedTerm, AuditCollector};
use crate::terminology::enforcer::enforce;
use crate::terminology::matcher::{BoundaryMatcher, Matcher};
use crate::terminology::store::GlossaryStore;

/// Upstream machine translation service
#[async_trait]
pub trait Translator: Send + Sync + Debug {
    /// Translate `text` into `target_language`
    async fn translate(
        &self,
        text: &str,
        source_language: &str,
        target_language: &str,
    ) -> Result<String, ProviderError>;
}

/// Downstream fluency editor
#[async_trait]
pub trait PostEditor: Send + Sync + Debug {
    /// Improve fluency of `text` without touching `protected_terms`
    async fn post_edit(&self, text: &str, protected_terms: &[String]) -> Result<String, ProviderError>;

    /// Whether the editor is configured and reachable
    fn is_available(&self) -> bool {
        true
    }
}

/// Protected terms whose occurrence count changed during post-editing
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct PreservationReport {
    pub changed_terms: Vec<String>,
}

impl PreservationReport {
    pub fn is_preserved(&self) -> bool {
        self.changed_terms.is_empty()
    }
}

/// Compare whole-word, case-insensitive occurrence counts of each term
/// before and after editing.
pub fn verify_term_preservation(before: &str, after: &str, terms: &[String]) -> PreservationReport {
    let matcher = BoundaryMatcher;
    let mut changed_terms: Vec<String> = Vec::new();
    for term in terms {
        if changed_terms.iter().any(|seen| seen.to_lowercase() == term.to_lowercase()) {
            continue;
        }
        let expected = matcher.find_matches(before, term).len();
        let actual = matcher.find_matches(after, term).len();
        if expected != actual {
            debug!("Protected term '{}' occurs {} times, expected {}", term, actual, expected);
            changed_terms.push(term.clone());
        }
    }
    PreservationReport { changed_terms }
}

/// Options of a pipeline run
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineOptions {
    pub target_language: String,
    pub supported_source_languages: Vec<String>,
    pub enable_post_editor: bool,
    pub timeout: Duration,
}

impl PipelineOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            target_language: config.target_language.clone(),
            supported_source_languages: config.supported_source_languages.clone(),
            enable_post_editor: config.pipeline.enable_post_editor,
            timeout: Duration::from_secs(config.pipeline.timeout_secs),
        }
    }
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

/// Every stage of one pipeline run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PipelineOutcome {
    pub raw_translation: String,
    pub enforced_text: String,
    pub final_text: String,
    pub post_edited: bool,
    pub applied_terms: Vec<AppliedTerm>,
}

/// Translate → enforce → optional post-edit
#[derive(Debug)]
pub struct TerminologyPipeline {
    store: Arc<GlossaryStore>,
    translator: Arc<dyn Translator>,
    post_editor: Option<Arc<dyn PostEditor>>,
    audit: Option<Arc<AuditCollector>>,
    options: PipelineOptions,
}

impl TerminologyPipeline {
    pub fn new(store: Arc<GlossaryStore>, translator: Arc<dyn Translator>, options: PipelineOptions) -> Self {
        Self {
            store,
            translator,
            post_editor: None,
            audit: None,
            options,
        }
    }

    pub fn with_post_editor(mut self, post_editor: Arc<dyn PostEditor>) -> Self {
        self.post_editor = Some(post_editor);
        self
    }

    /// Record every enforcement in `collector`
    pub fn with_audit_collector(mut self, collector: Arc<AuditCollector>) -> Self {
        self.audit = Some(collector);
        self
    }

    pub fn store(&self) -> &Arc<GlossaryStore> {
        &self.store
    }

    pub fn options(&self) -> &PipelineOptions {
        &self.options
    }

    /// Run the whole pipeline for `text` written in `source_language`.
    ///
    /// Translator failures and timeouts are returned as errors. Post-editor
    /// failures never are: the enforced text is used instead.
    pub async fn run(&self, text: &str, source_language: &str) -> Result<PipelineOutcome, TranslationError> {
        if !is_supported_language(source_language, &self.options.supported_source_languages) {
            return Err(TranslationError::UnsupportedLanguage(source_language.to_string()));
        }

        let raw_translation = self
            .with_timeout(self.translator.translate(text, source_language, &self.options.target_language))
            .await?;

        let snapshot = self.store.snapshot();
        let enforcement = enforce(&raw_translation, &snapshot);
        if let Some(collector) = &self.audit {
            collector.record(&raw_translation, &enforcement, Some(snapshot.fingerprint()));
        }
        let protected_terms = enforcement.protected_terms();
        let (enforced_text, applied_terms) = enforcement.into_parts();

        let (final_text, post_edited) = match &self.post_editor {
            Some(editor) if self.options.enable_post_editor && editor.is_available() => {
                self.post_edit(editor.as_ref(), &enforced_text, &protected_terms).await
            }
            _ => (enforced_text.clone(), false),
        };

        Ok(PipelineOutcome {
            raw_translation,
            enforced_text,
            final_text,
            post_edited,
            applied_terms,
        })
    }

    async fn post_edit(&self, editor: &dyn PostEditor, enforced_text: &str, protected_terms: &[String]) -> (String, bool) {
        let edited = match self.with_timeout(editor.post_edit(enforced_text, protected_terms)).await {
            Ok(edited) => edited,
            Err(e) => {
                warn!("Post-editing failed, using enforced text: {}", e);
                return (enforced_text.to_string(), false);
            }
        };

        let report = verify_term_preservation(enforced_text, &edited, protected_terms);
        if !report.is_preserved() {
            warn!(
                "Post-editor changed protected terms {:?}, using enforced text",
                report.changed_terms
            );
            return (enforced_text.to_string(), false);
        }

        (edited, true)
    }

    async fn with_timeout<F>(&self, call: F) -> Result<String, ProviderError>
    where
        F: Future<Output = Result<String, ProviderError>>,
    {
        tokio::time::timeout(self.options.timeout, call)
            .await
            .map_err(|_| ProviderError::Timeout(self.options.timeout.as_secs()))?
    }
}
