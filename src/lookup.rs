use std::sync::Arc;

use log::{debug, warn};

use crate::api::DirectoryApi;
use crate::cache::LookupCache;
use crate::cascade::CascadeController;
use crate::types::LookupOutcome;

/// Normalize a free-text IFSC code: trimmed and uppercased. No structural
/// validation beyond that.
pub fn normalize_code(input: &str) -> String {
    input.trim().to_uppercase()
}

/// One user-facing lookup session: the cascade controller, the free-text code
/// input, and the currently displayed result.
///
/// Only one result source is visible at a time: the direct path clears the
/// cascade selections when invoked, and the cascade path clears the direct
/// input. Final records are never cached; every lookup hits the network.
pub struct LookupSession {
    api: Arc<dyn DirectoryApi>,
    cascade: CascadeController,
    code_input: String,
    outcome: Option<LookupOutcome>,
}

impl LookupSession {
    /// Build a session around one API client and one cache instance. The
    /// cache is injected rather than global; it lives as long as the session
    /// owner keeps it.
    pub fn new(api: Arc<dyn DirectoryApi>, cache: Arc<LookupCache>) -> Self {
        Self {
            cascade: CascadeController::new(Arc::clone(&api), cache),
            api,
            code_input: String::new(),
            outcome: None,
        }
    }

    /// Load the root bank list. Call once at startup.
    pub async fn init(&mut self) {
        self.cascade.init().await;
    }

    pub fn cascade(&self) -> &CascadeController {
        &self.cascade
    }

    pub fn cascade_mut(&mut self) -> &mut CascadeController {
        &mut self.cascade
    }

    /// Current free-text input, kept uppercased as the user types.
    pub fn code_input(&self) -> &str {
        &self.code_input
    }

    pub fn set_code_input(&mut self, input: &str) {
        self.code_input = input.to_uppercase();
    }

    /// Direct lookup path: normalize the given code and fetch its record.
    ///
    /// Independent of cascade state, but clears the cascade selections so
    /// only one result source is visible. An input that is empty after
    /// trimming issues no request. Every failure collapses into the generic
    /// error placeholder.
    pub async fn lookup_code(&mut self, raw: &str) -> Option<&LookupOutcome> {
        let code = normalize_code(raw);
        if code.is_empty() {
            debug!("lookup: empty code input, skipping");
            return None;
        }

        self.cascade.reset();
        self.outcome = None;

        let outcome = match self.api.lookup_ifsc(&code).await {
            Ok(record) => LookupOutcome::Record(record),
            Err(e) => {
                warn!("lookup: direct lookup for '{}' failed: {}", code, e);
                LookupOutcome::error()
            }
        };
        self.outcome = Some(outcome);
        self.outcome.as_ref()
    }

    /// Direct lookup using the stored free-text input.
    pub async fn search_by_input(&mut self) -> Option<&LookupOutcome> {
        let raw = self.code_input.clone();
        self.lookup_code(&raw).await
    }

    /// Cascade lookup path: fetch the record for the selected branch's IFSC.
    ///
    /// Requires a complete cascade; otherwise a no-op. Clears the free-text
    /// input so only one result source is visible.
    pub async fn lookup_selected(&mut self) -> Option<&LookupOutcome> {
        let Some(code) = self.cascade.selected_ifsc().map(str::to_string) else {
            debug!("lookup: cascade incomplete, skipping final lookup");
            return None;
        };

        self.code_input.clear();
        self.outcome = None;

        let outcome = match self.api.lookup_ifsc(&code).await {
            Ok(record) => LookupOutcome::Record(record),
            Err(e) => {
                warn!("lookup: branch lookup for '{}' failed: {}", code, e);
                LookupOutcome::error()
            }
        };
        self.outcome = Some(outcome);
        self.outcome.as_ref()
    }

    pub fn outcome(&self) -> Option<&LookupOutcome> {
        self.outcome.as_ref()
    }

    /// Return everything to initial empty values: selections, displayed
    /// result, and input. The cache is deliberately retained. Idempotent.
    pub fn reset(&mut self) {
        self.cascade.reset();
        self.outcome = None;
        self.code_input.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_trims_and_uppercases() {
        assert_eq!(normalize_code("  sbin0000001 "), "SBIN0000001");
        assert_eq!(normalize_code("HDFC0000128"), "HDFC0000128");
        assert_eq!(normalize_code("   "), "");
    }
}
