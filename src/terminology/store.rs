/*!
 * Shared access to the current glossary snapshot.
 *
 * Readers clone the `Arc` of the current snapshot and enforce against it
 * without holding any lock. A reload parses a complete new snapshot first and
 * only then swaps the reference, so no call ever sees a half-built glossary
 * and calls already running finish against the snapshot they started with.
 */

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use log::{error, info};
use parking_lot::RwLock;

use crate::errors::ConfigError;
use crate::terminology::enforcer::{EnforcementEngine, EnforcementResult};
use crate::terminology::glossary::{GlossarySnapshot, LoadOptions};
use crate::terminology::matcher::{BoundaryMatcher, Matcher};

/// Holder of the glossary snapshot currently in service
#[derive(Debug)]
pub struct GlossaryStore<M: Matcher = BoundaryMatcher> {
    current: RwLock<Arc<GlossarySnapshot>>,
    source: Option<(PathBuf, LoadOptions)>,
    generation: AtomicU64,
    engine: EnforcementEngine<M>,
}

impl GlossaryStore<BoundaryMatcher> {
    /// Serve a snapshot that was built in memory
    pub fn new(snapshot: GlossarySnapshot) -> Self {
        Self::with_matcher(snapshot, BoundaryMatcher)
    }

    /// Load a glossary file and remember it for later reloads
    pub fn from_path<P: AsRef<Path>>(path: P, options: LoadOptions) -> Result<Self, ConfigError> {
        Self::from_path_with_matcher(path, options, BoundaryMatcher)
    }
}

impl<M: Matcher> GlossaryStore<M> {
    /// Serve a snapshot, locating terms with `matcher`
    pub fn with_matcher(snapshot: GlossarySnapshot, matcher: M) -> Self {
        Self {
            current: RwLock::new(Arc::new(snapshot)),
            source: None,
            generation: AtomicU64::new(1),
            engine: EnforcementEngine::with_matcher(matcher),
        }
    }

    pub fn from_path_with_matcher<P: AsRef<Path>>(
        path: P,
        options: LoadOptions,
        matcher: M,
    ) -> Result<Self, ConfigError> {
        let path = path.as_ref().to_path_buf();
        let snapshot = GlossarySnapshot::load(&path, &options)?;
        let mut store = Self::with_matcher(snapshot, matcher);
        store.source = Some((path, options));
        Ok(store)
    }

    pub fn engine(&self) -> &EnforcementEngine<M> {
        &self.engine
    }

    /// The snapshot new calls should use
    pub fn snapshot(&self) -> Arc<GlossarySnapshot> {
        Arc::clone(&*self.current.read())
    }

    /// Number of snapshots published so far, starting at 1
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    pub fn source_path(&self) -> Option<&Path> {
        self.source.as_ref().map(|(path, _)| path.as_path())
    }

    /// Publish a new snapshot and return it
    pub fn replace(&self, snapshot: GlossarySnapshot) -> Arc<GlossarySnapshot> {
        let snapshot = Arc::new(snapshot);
        {
            let mut current = self.current.write();
            *current = Arc::clone(&snapshot);
            self.generation.fetch_add(1, Ordering::AcqRel);
        }
        self.engine.matcher().glossary_changed(&snapshot);
        info!(
            "Glossary snapshot {} is now in service ({} terms)",
            snapshot.short_fingerprint(),
            snapshot.len()
        );
        snapshot
    }

    /// Re-read the glossary file. On failure the previous snapshot stays in
    /// service and the error is returned.
    pub fn reload(&self) -> Result<Arc<GlossarySnapshot>, ConfigError> {
        let Some((path, options)) = &self.source else {
            return Err(ConfigError::InvalidOptions(
                "glossary store was not created from a file".to_string(),
            ));
        };

        match GlossarySnapshot::load(path, options) {
            Ok(snapshot) => Ok(self.replace(snapshot)),
            Err(e) => {
                error!("Glossary reload failed, keeping the current snapshot: {}", e);
                Err(e)
            }
        }
    }

    /// Enforce the current snapshot on `text`
    pub fn enforce(&self, text: &str) -> EnforcementResult {
        let snapshot = self.snapshot();
        self.engine.enforce(text, &snapshot)
    }
}

impl Default for GlossaryStore {
    fn default() -> Self {
        Self::new(GlossarySnapshot::empty())
    }
}
