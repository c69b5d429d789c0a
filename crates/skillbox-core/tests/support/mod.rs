//! Scripted fakes for the registry and the skills CLI.
#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use skillbox_core::gateway::{SkillsCli, UpdateReport};
use skillbox_core::registry::SkillSearch;
use skillbox_core::skills::{InstalledSkill, Skill};
use skillbox_core::{Result, SkillsError};

pub const REGISTRY_URL: &str = "https://skills.sh";

pub fn registry_skill(name: &str, source: &str) -> Skill {
    Skill::from_source(
        format!("{source}/{name}"),
        name,
        name,
        Some(source),
        REGISTRY_URL,
    )
}

pub fn installed(name: &str, agents: &[&str]) -> InstalledSkill {
    InstalledSkill::new(
        name,
        Some("acme/skills"),
        agents.iter().map(|a| a.to_string()),
        REGISTRY_URL,
    )
}

pub fn cli_error(stderr: &str) -> SkillsError {
    SkillsError::Cli {
        command: "npx -y skills".to_string(),
        code: Some(1),
        stderr: stderr.to_string(),
    }
}

/// Registry that answers every query with one skill named after it.
pub struct FakeRegistry {
    default_delay: Duration,
    delays: HashMap<String, Duration>,
    failures: HashMap<String, u16>,
    calls: Mutex<Vec<String>>,
    completed: Mutex<Vec<String>>,
}

impl FakeRegistry {
    pub fn new() -> Self {
        Self {
            default_delay: Duration::from_millis(20),
            delays: HashMap::new(),
            failures: HashMap::new(),
            calls: Mutex::new(Vec::new()),
            completed: Mutex::new(Vec::new()),
        }
    }

    pub fn with_delay(mut self, query: &str, delay: Duration) -> Self {
        self.delays.insert(query.to_string(), delay);
        self
    }

    pub fn failing(mut self, query: &str, status: u16) -> Self {
        self.failures.insert(query.to_string(), status);
        self
    }

    /// Queries that reached the registry, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// Queries whose request ran to completion (was not cancelled).
    pub fn completed(&self) -> Vec<String> {
        self.completed.lock().unwrap().clone()
    }
}

#[async_trait]
impl SkillSearch for FakeRegistry {
    async fn search(&self, query: &str) -> Result<Vec<Skill>> {
        self.calls.lock().unwrap().push(query.to_string());

        let delay = self
            .delays
            .get(query)
            .copied()
            .unwrap_or(self.default_delay);
        tokio::time::sleep(delay).await;

        self.completed.lock().unwrap().push(query.to_string());

        if let Some(status) = self.failures.get(query) {
            return Err(SkillsError::Http {
                status: *status,
                url: format!("{REGISTRY_URL}/api/search?q={query}"),
            });
        }
        Ok(vec![registry_skill(query, "acme/skills")])
    }
}

struct Scripted<T> {
    delay: Duration,
    result: Result<T>,
}

/// CLI whose responses are queued per call. An empty queue answers with
/// an empty success.
#[derive(Default)]
pub struct FakeCli {
    listings: Mutex<VecDeque<Scripted<Vec<InstalledSkill>>>>,
    updates: Mutex<VecDeque<Scripted<Vec<String>>>>,
    update_all: Mutex<VecDeque<Result<UpdateReport>>>,
    pub list_calls: AtomicUsize,
    pub check_calls: AtomicUsize,
    pub update_calls: AtomicUsize,
}

impl FakeCli {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_listing(&self, delay: Duration, result: Result<Vec<InstalledSkill>>) {
        self.listings
            .lock()
            .unwrap()
            .push_back(Scripted { delay, result });
    }

    pub fn push_updates(&self, delay: Duration, result: Result<Vec<String>>) {
        self.updates
            .lock()
            .unwrap()
            .push_back(Scripted { delay, result });
    }

    pub fn push_update_all(&self, result: Result<UpdateReport>) {
        self.update_all.lock().unwrap().push_back(result);
    }
}

async fn play<T: Default>(queue: &Mutex<VecDeque<Scripted<T>>>) -> Result<T> {
    let next = queue.lock().unwrap().pop_front();
    match next {
        Some(Scripted { delay, result }) => {
            tokio::time::sleep(delay).await;
            result
        }
        None => Ok(T::default()),
    }
}

#[async_trait]
impl SkillsCli for FakeCli {
    async fn list_installed(&self) -> Result<Vec<InstalledSkill>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        play(&self.listings).await
    }

    async fn check_updates(&self) -> Result<Vec<String>> {
        self.check_calls.fetch_add(1, Ordering::SeqCst);
        play(&self.updates).await
    }

    async fn update_all(&self) -> Result<UpdateReport> {
        self.update_calls.fetch_add(1, Ordering::SeqCst);
        let next = self.update_all.lock().unwrap().pop_front();
        next.unwrap_or_else(|| Ok(UpdateReport::default()))
    }
}
