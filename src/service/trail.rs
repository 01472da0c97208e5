/*!
 * Decision Trail
 * Bounded in-memory record of authorization decisions for monitoring
 */

use crate::core::limits::{MAX_ACTOR_DECISION_EVENTS, MAX_DECISION_EVENTS};
use crate::core::UserId;
use crate::roles::Role;
use ahash::RandomState;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, TimestampSeconds};
use std::collections::VecDeque;
use std::time::SystemTime;

/// Decision event severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionSeverity {
    Info,
    Warning,
    Critical,
}

/// One recorded authorization decision
#[serde_as]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionEvent {
    pub actor: UserId,
    pub roles: Vec<Role>,
    pub module: String,
    pub action: String,
    pub allowed: bool,
    pub reason: String,
    pub severity: DecisionSeverity,
    #[serde_as(as = "TimestampSeconds<i64>")]
    pub logged_at: SystemTime,
}

impl DecisionEvent {
    pub fn new(
        actor: impl Into<UserId>,
        roles: &[Role],
        module: &str,
        action: &str,
        allowed: bool,
        reason: impl Into<String>,
    ) -> Self {
        let severity = if allowed {
            DecisionSeverity::Info
        } else {
            // Denied attempts on privileged surfaces are more severe
            match module {
                "audit" | "payroll" => DecisionSeverity::Critical,
                _ => DecisionSeverity::Warning,
            }
        };
        Self {
            actor: actor.into(),
            roles: roles.to_vec(),
            module: module.to_string(),
            action: action.to_string(),
            allowed,
            reason: reason.into(),
            severity,
            logged_at: SystemTime::now(),
        }
    }
}

/// Trail statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrailStats {
    pub total_events: usize,
    pub total_denials: u64,
    pub actors_tracked: usize,
}

/// Bounded decision log
///
/// A global ring buffer plus per-actor logs and denial counters; the
/// alerting surface for repeated denials and fail-closed store outages.
pub struct DecisionTrail {
    events: parking_lot::RwLock<VecDeque<DecisionEvent>>,
    actor_events: DashMap<UserId, VecDeque<DecisionEvent>, RandomState>,
    denial_counts: DashMap<UserId, u64, RandomState>,
}

impl DecisionTrail {
    pub fn new() -> Self {
        Self {
            events: parking_lot::RwLock::new(VecDeque::with_capacity(MAX_DECISION_EVENTS)),
            actor_events: DashMap::with_hasher(RandomState::new()),
            denial_counts: DashMap::with_hasher(RandomState::new()),
        }
    }

    /// Record a decision
    pub fn record(&self, event: DecisionEvent) {
        let actor = event.actor.clone();
        let is_denied = !event.allowed;

        {
            let mut events = self.events.write();
            if events.len() >= MAX_DECISION_EVENTS {
                events.pop_front();
            }
            events.push_back(event.clone());
        }

        let mut entry = self
            .actor_events
            .entry(actor.clone())
            .or_insert_with(|| VecDeque::with_capacity(MAX_ACTOR_DECISION_EVENTS));
        if entry.len() >= MAX_ACTOR_DECISION_EVENTS {
            entry.pop_front();
        }
        entry.push_back(event);
        drop(entry);

        if is_denied {
            self.denial_counts
                .entry(actor)
                .and_modify(|count| *count += 1)
                .or_insert(1);
        }
    }

    /// Most recent events, newest first
    pub fn recent(&self, limit: usize) -> Vec<DecisionEvent> {
        let events = self.events.read();
        events.iter().rev().take(limit).cloned().collect()
    }

    /// Most recent events for one actor, newest first
    pub fn for_actor(&self, actor: &str, limit: usize) -> Vec<DecisionEvent> {
        self.actor_events
            .get(actor)
            .map(|entry| entry.iter().rev().take(limit).cloned().collect())
            .unwrap_or_default()
    }

    /// Denials recorded for one actor
    pub fn denial_count(&self, actor: &str) -> u64 {
        self.denial_counts.get(actor).map(|e| *e).unwrap_or(0)
    }

    /// Actors with at least one denial
    pub fn actors_with_denials(&self) -> Vec<(UserId, u64)> {
        self.denial_counts
            .iter()
            .map(|entry| (entry.key().clone(), *entry.value()))
            .collect()
    }

    pub fn stats(&self) -> TrailStats {
        TrailStats {
            total_events: self.events.read().len(),
            total_denials: self.denial_counts.iter().map(|e| *e.value()).sum(),
            actors_tracked: self.actor_events.len(),
        }
    }

    pub fn clear(&self) {
        self.events.write().clear();
        self.actor_events.clear();
        self.denial_counts.clear();
    }
}

impl Default for DecisionTrail {
    fn default() -> Self {
        Self::new()
    }
}
