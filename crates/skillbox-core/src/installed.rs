//! Installed skills merged with update availability.
//!
//! Two CLI calls run side by side: the installed listing and the update
//! check. The listing is required; the update check is best effort and
//! degrades to "no updates" when it fails.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::watch;
use tracing::{debug, warn};

use crate::error::{Result, SkillsError};
use crate::gateway::{SkillsCli, UpdateReport};
use crate::skills::InstalledSkill;

/// Outcome of a sub-fetch that is allowed to fail softly.
#[derive(Debug)]
pub enum SubFetch<T> {
    Fetched(T),
    /// The fetch failed; `fallback` stands in for its value.
    Degraded { fallback: T, error: SkillsError },
}

impl<T> SubFetch<T> {
    /// Turn a failure into a degraded result carrying `fallback()`.
    pub fn tolerate(result: Result<T>, fallback: impl FnOnce() -> T) -> Self {
        match result {
            Ok(value) => Self::Fetched(value),
            Err(error) => Self::Degraded {
                fallback: fallback(),
                error,
            },
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, Self::Degraded { .. })
    }

    /// Split into the usable value and the error that was absorbed, if any.
    pub fn into_parts(self) -> (T, Option<SkillsError>) {
        match self {
            Self::Fetched(value) => (value, None),
            Self::Degraded { fallback, error } => (fallback, Some(error)),
        }
    }
}

/// One consistent view of installed skills.
#[derive(Debug, Clone)]
pub struct InstalledSnapshot {
    /// Skills in CLI order, annotated with `has_update`
    pub skills: Arc<Vec<InstalledSkill>>,
    /// Set when the update check failed and every `has_update` is false
    pub update_check_error: Option<Arc<SkillsError>>,
}

impl InstalledSnapshot {
    pub fn updatable_count(&self) -> usize {
        self.skills.iter().filter(|s| s.has_update).count()
    }
}

/// Mark each skill whose name is in `updatable`. Order is preserved.
pub fn merge_update_status(
    skills: Vec<InstalledSkill>,
    updatable: &[String],
) -> Vec<InstalledSkill> {
    let updatable: HashSet<&str> = updatable.iter().map(String::as_str).collect();
    skills
        .into_iter()
        .map(|mut skill| {
            skill.has_update = updatable.contains(skill.name());
            skill
        })
        .collect()
}

/// Fetch installed skills and update status concurrently and merge them.
///
/// Fails only if the installed listing fails.
pub async fn fetch_with_update_status(cli: &dyn SkillsCli) -> Result<InstalledSnapshot> {
    let (installed, updates) = tokio::join!(cli.list_installed(), cli.check_updates());

    let (updatable, update_error) = SubFetch::tolerate(updates, Vec::new).into_parts();
    if let Some(err) = &update_error {
        warn!(error = %err, "update check failed; treating all skills as current");
    }

    let skills = merge_update_status(installed?, &updatable);
    Ok(InstalledSnapshot {
        skills: Arc::new(skills),
        update_check_error: update_error.map(Arc::new),
    })
}

/// Observable installed-skills state.
#[derive(Debug, Clone, Default)]
pub struct InstalledState {
    /// Last successful snapshot; kept when a later listing fails
    pub data: Option<InstalledSnapshot>,
    pub is_loading: bool,
    /// Listing error from the most recent completed call
    pub error: Option<Arc<SkillsError>>,
}

impl InstalledState {
    pub fn skills(&self) -> &[InstalledSkill] {
        self.data
            .as_ref()
            .map(|d| d.skills.as_slice())
            .unwrap_or_default()
    }
}

/// Stale-while-revalidate holder for the installed-skills view.
pub struct InstalledSkills {
    cli: Arc<dyn SkillsCli>,
    generation: Mutex<u64>,
    state: watch::Sender<InstalledState>,
}

impl InstalledSkills {
    pub fn new(cli: Arc<dyn SkillsCli>) -> Self {
        let (state, _) = watch::channel(InstalledState::default());
        Self {
            cli,
            generation: Mutex::new(0),
            state,
        }
    }

    fn generation(&self) -> MutexGuard<'_, u64> {
        self.generation.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Refetch and merge. Results from a call that was overtaken by a newer
    /// one are dropped.
    pub async fn revalidate(&self) -> InstalledState {
        let generation = {
            let mut current = self.generation();
            *current += 1;
            self.state.send_modify(|state| state.is_loading = true);
            *current
        };

        let result = fetch_with_update_status(self.cli.as_ref()).await;

        {
            let current = self.generation();
            if *current != generation {
                debug!(generation, latest = *current, "discarding stale installed-skills result");
            } else {
                self.state.send_modify(|state| {
                    state.is_loading = false;
                    match result {
                        Ok(snapshot) => {
                            state.data = Some(snapshot);
                            state.error = None;
                        }
                        Err(err) => {
                            warn!(error = %err, "failed to list installed skills");
                            state.error = Some(Arc::new(err));
                        }
                    }
                });
            }
        }

        self.state()
    }

    /// Run the bulk update, then refresh on success.
    ///
    /// A failed update is returned to the caller and leaves the current
    /// state untouched.
    pub async fn update_all(&self) -> Result<UpdateReport> {
        let report = self.cli.update_all().await?;
        self.revalidate().await;
        Ok(report)
    }

    pub fn state(&self) -> InstalledState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<InstalledState> {
        self.state.subscribe()
    }
}
