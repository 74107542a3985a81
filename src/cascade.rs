use std::sync::Arc;

use log::{debug, info, warn};

use crate::api::DirectoryApi;
use crate::cache::{cache_key, LookupCache, BANKS_KEY};
use crate::error::ApiError;
use crate::types::{OptionItem, OptionList};

/// One of the four dependent selection levels.
///
/// The dependency order is fixed and linear: bank is the root, each later
/// level is keyed by all of its ancestors' selected values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum CascadeLevel {
    Bank,
    State,
    District,
    Branch,
}

impl CascadeLevel {
    pub const ALL: [CascadeLevel; 4] = [
        CascadeLevel::Bank,
        CascadeLevel::State,
        CascadeLevel::District,
        CascadeLevel::Branch,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    /// The next dependent level, if any.
    pub fn child(self) -> Option<CascadeLevel> {
        match self {
            CascadeLevel::Bank => Some(CascadeLevel::State),
            CascadeLevel::State => Some(CascadeLevel::District),
            CascadeLevel::District => Some(CascadeLevel::Branch),
            CascadeLevel::Branch => None,
        }
    }

    pub fn parent(self) -> Option<CascadeLevel> {
        match self {
            CascadeLevel::Bank => None,
            CascadeLevel::State => Some(CascadeLevel::Bank),
            CascadeLevel::District => Some(CascadeLevel::State),
            CascadeLevel::Branch => Some(CascadeLevel::District),
        }
    }
}

/// A fetch obligation produced by [`CascadeController::begin_select`] or
/// [`CascadeController::begin_init`]: the level whose option list must be
/// loaded, the ancestor values keying the request, and the generation the
/// controller was at when the selection was recorded.
///
/// [`CascadeController::resolve`] borrows the controller shared, so several
/// pending fetches can be in flight at once; [`CascadeController::apply`]
/// lands only the one issued under the current generation.
#[derive(Debug, Clone)]
pub struct PendingOptions {
    level: CascadeLevel,
    ancestors: Vec<String>,
    generation: u64,
}

impl PendingOptions {
    /// The level this fetch populates.
    pub fn level(&self) -> CascadeLevel {
        self.level
    }

    /// Cache key for this fetch: the ordered ancestor values joined by `|`,
    /// or the fixed root key for the bank list.
    pub fn cache_key(&self) -> String {
        if self.level == CascadeLevel::Bank {
            BANKS_KEY.to_string()
        } else {
            let parts: Vec<&str> = self.ancestors.iter().map(String::as_str).collect();
            cache_key(&parts)
        }
    }
}

/// Dependent-selection state machine over the four cascade levels.
///
/// Owns the selection slots and the per-level option lists; fetches option
/// lists through the injected [`LookupCache`] (cache-then-fetch) and the
/// injected [`DirectoryApi`]. Invariants:
///
/// - a slot is non-empty only if all ancestor slots are non-empty;
/// - changing the selection at level *i* empties selections and option lists
///   at every level > *i*.
///
/// A failed fetch at any level yields an empty option list for that level,
/// logged but not surfaced.
pub struct CascadeController {
    api: Arc<dyn DirectoryApi>,
    cache: Arc<LookupCache>,
    options: [OptionList; 4],
    selected: [Option<OptionItem>; 4],
    // Bumped on every mutation; a fetch issued under an older generation is
    // discarded by apply() instead of overwriting newer state.
    generation: u64,
}

impl CascadeController {
    pub fn new(api: Arc<dyn DirectoryApi>, cache: Arc<LookupCache>) -> Self {
        Self {
            api,
            cache,
            options: Default::default(),
            selected: Default::default(),
            generation: 0,
        }
    }

    /// Fetch the root bank list. Called once at startup; later calls are
    /// served from the cache.
    pub async fn init(&mut self) {
        let pending = self.begin_init();
        let banks = self.resolve(&pending).await;
        if self.apply(&pending, banks) {
            info!(
                "cascade: bank list ready ({} banks)",
                self.options(CascadeLevel::Bank).len()
            );
        }
    }

    /// Select an option at `level`, clearing every descendant level and then
    /// fetching the child level's option list via the cache-then-fetch
    /// policy. Composes [`begin_select`](Self::begin_select),
    /// [`resolve`](Self::resolve) and [`apply`](Self::apply) for the common
    /// sequential case.
    ///
    /// Selecting at a level whose ancestors are not all populated is a no-op;
    /// the slot invariant is never violated.
    pub async fn select(&mut self, level: CascadeLevel, option: OptionItem) {
        let Some(pending) = self.begin_select(level, option) else {
            return;
        };
        let list = self.resolve(&pending).await;
        self.apply(&pending, list);
    }

    /// Start the root bank-list fetch, tagged with a fresh generation.
    pub fn begin_init(&mut self) -> PendingOptions {
        PendingOptions {
            level: CascadeLevel::Bank,
            ancestors: Vec::new(),
            generation: self.bump_generation(),
        }
    }

    /// Record a selection at `level` and return the child-level fetch it
    /// requires, tagged with the new generation. Descendant levels are
    /// cleared immediately, before any fetch completes.
    ///
    /// Returns `None` when the selection is ignored (unpopulated ancestors)
    /// or when `level` is the leaf and has no child list to fetch.
    pub fn begin_select(
        &mut self,
        level: CascadeLevel,
        option: OptionItem,
    ) -> Option<PendingOptions> {
        if !self.ancestors_populated(level) {
            debug!(
                "cascade: ignoring selection at {:?} with unpopulated ancestors",
                level
            );
            return None;
        }

        let generation = self.bump_generation();
        self.clear_descendants(level);
        debug!("cascade: {:?} = '{}'", level, option.value);
        self.selected[level.index()] = Some(option);

        let child = level.child()?;
        Some(PendingOptions {
            level: child,
            ancestors: self.ancestor_values(level),
            generation,
        })
    }

    /// Fetch the option list for a pending selection through the cache.
    ///
    /// Borrows the controller shared, so a fetch from a superseded selection
    /// can still run to completion; [`apply`](Self::apply) decides which
    /// result lands. A failed fetch resolves to an empty list, logged but not
    /// surfaced.
    pub async fn resolve(&self, pending: &PendingOptions) -> OptionList {
        match self.fetch_options(pending).await {
            Ok(list) => list,
            Err(e) => {
                warn!(
                    "cascade: fetch for {:?} (key '{}') failed, leaving level empty: {}",
                    pending.level,
                    pending.cache_key(),
                    e
                );
                Vec::new()
            }
        }
    }

    /// Apply a resolved option list unless a newer mutation superseded the
    /// selection that issued it. Returns whether the list was applied.
    pub fn apply(&mut self, pending: &PendingOptions, list: OptionList) -> bool {
        if pending.generation != self.generation {
            debug!(
                "cascade: discarding superseded options for {:?} (generation {} != {})",
                pending.level, pending.generation, self.generation
            );
            return false;
        }
        self.options[pending.level.index()] = list;
        true
    }

    /// Empty selections and option lists at every level strictly below
    /// `level`.
    pub fn clear_descendants(&mut self, level: CascadeLevel) {
        for i in (level.index() + 1)..4 {
            self.selected[i] = None;
            self.options[i] = Vec::new();
        }
    }

    /// Return all state to its initial empty values. The bank option list is
    /// retained (it was fetched once at startup and is parent-independent),
    /// as is the cache. Idempotent.
    pub fn reset(&mut self) {
        self.bump_generation();
        self.selected = Default::default();
        self.clear_descendants(CascadeLevel::Bank);
        debug!("cascade: reset");
    }

    pub fn options(&self, level: CascadeLevel) -> &OptionList {
        &self.options[level.index()]
    }

    pub fn selected(&self, level: CascadeLevel) -> Option<&OptionItem> {
        self.selected[level.index()].as_ref()
    }

    /// A level is enabled once its parent holds a selection; the root bank
    /// level is always enabled.
    pub fn is_enabled(&self, level: CascadeLevel) -> bool {
        match level.parent() {
            None => true,
            Some(parent) => self.selected(parent).is_some(),
        }
    }

    /// All four slots populated; the final lookup key is available.
    pub fn is_complete(&self) -> bool {
        self.selected.iter().all(Option::is_some)
    }

    /// The IFSC code of the selected branch, once the cascade is complete.
    pub fn selected_ifsc(&self) -> Option<&str> {
        self.selected(CascadeLevel::Branch)
            .map(|option| option.value.as_str())
    }

    fn bump_generation(&mut self) -> u64 {
        self.generation += 1;
        self.generation
    }

    fn ancestors_populated(&self, level: CascadeLevel) -> bool {
        (0..level.index()).all(|i| self.selected[i].is_some())
    }

    /// Ordered selected values from the root through `level`. Every slot is
    /// populated when this runs: `begin_select` checks the ancestors first.
    fn ancestor_values(&self, level: CascadeLevel) -> Vec<String> {
        self.selected[..=level.index()]
            .iter()
            .filter_map(|slot| slot.as_ref().map(|option| option.value.clone()))
            .collect()
    }

    async fn fetch_options(&self, pending: &PendingOptions) -> Result<OptionList, ApiError> {
        let api = Arc::clone(&self.api);
        let key = pending.cache_key();
        // The request parameters come from the pending snapshot, not current
        // selections; those may have moved on while this fetch runs.
        let ancestors = pending.ancestors.clone();

        match pending.level {
            CascadeLevel::Bank => {
                self.cache
                    .get_or_fetch(&key, || async move {
                        let names = api.banks().await?;
                        Ok(names.into_iter().map(OptionItem::plain).collect())
                    })
                    .await
            }
            CascadeLevel::State => {
                self.cache
                    .get_or_fetch(&key, || async move {
                        let names = api.states(&ancestors[0]).await?;
                        Ok(names.into_iter().map(OptionItem::plain).collect())
                    })
                    .await
            }
            CascadeLevel::District => {
                self.cache
                    .get_or_fetch(&key, || async move {
                        let names = api.cities(&ancestors[0], &ancestors[1]).await?;
                        Ok(names.into_iter().map(OptionItem::plain).collect())
                    })
                    .await
            }
            CascadeLevel::Branch => {
                self.cache
                    .get_or_fetch(&key, || async move {
                        let entries = api
                            .branches(&ancestors[0], &ancestors[1], &ancestors[2])
                            .await?;
                        Ok(entries.into_iter().map(OptionItem::from).collect())
                    })
                    .await
            }
        }
    }
}
