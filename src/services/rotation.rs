//! Category rotation engine
//!
//! Per-group state machine over the configured category list. After each
//! fetch+filter cycle the engine records the outcome: empty cycles advance
//! the page and, once the empty-result threshold is reached, put the current
//! category into cooldown and move the cursor to the next one. Successful
//! cycles keep the cursor in place so pagination progress is preserved.
//!
//! The state is owned by the group row; every function here mutates it in
//! place and the caller persists it atomically with the group.

use chrono::{DateTime, Duration, Utc};
use crate::models::{Group, RotationState};

/// Rotation policy knobs copied off the group row
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotationPolicy {
    pub enabled: bool,
    pub empty_threshold: u32,
    pub cooldown_minutes: i64,
}

impl RotationPolicy {
    pub fn from_group(group: &Group) -> Self {
        Self {
            enabled: group.rotation_enabled,
            empty_threshold: group.rotation_empty_threshold.max(1) as u32,
            cooldown_minutes: group.rotation_cooldown_minutes,
        }
    }

    /// Rotation only applies with the flag on and at least two categories
    fn applies(&self, categories: &[i64]) -> bool {
        self.enabled && categories.len() >= 2
    }
}

/// The (category, page) pair to query next
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    pub category_id: Option<i64>,
    pub page: u32,
}

/// What `record_empty` did to the state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyOutcome {
    /// Below threshold: same category, next page
    PageAdvanced(u32),
    /// Threshold reached: category cooled down, cursor moved
    Rotated { from: i64, to: i64 },
    /// Rotation inapplicable for this group
    Noop,
}

/// Determine the cursor for the next fetch
///
/// With rotation inapplicable this is a passthrough: the single configured
/// category (or none, meaning an unconstrained fetch). Otherwise the current
/// category, skipping any category still cooling down; when every category
/// is cooling down the first configured one is used so a group is never
/// fully blocked.
pub fn cursor(
    policy: &RotationPolicy,
    categories: &[i64],
    state: &mut RotationState,
    now: DateTime<Utc>,
) -> Cursor {
    prune_expired(state, now);

    if !policy.applies(categories) {
        // Invariant: category_id stays null when rotation is inapplicable
        state.category_id = None;
        return Cursor {
            category_id: categories.first().copied(),
            page: state.page.max(1),
        };
    }

    let current = match state.category_id {
        Some(id) if categories.contains(&id) => id,
        // First cycle, or the configuration changed under the state
        _ => {
            state.category_id = Some(categories[0]);
            state.page = 1;
            state.empty_count = 0;
            categories[0]
        }
    };

    if is_cooling(state, current, now) {
        let next = next_available(categories, current, state, now);
        if next != current {
            state.category_id = Some(next);
            state.page = 1;
            state.empty_count = 0;
        }
    }

    Cursor {
        category_id: state.category_id,
        page: state.page.max(1),
    }
}

/// Record a fetch+filter cycle that produced no accepted offer
pub fn record_empty(
    policy: &RotationPolicy,
    categories: &[i64],
    state: &mut RotationState,
    now: DateTime<Utc>,
) -> EmptyOutcome {
    if !policy.applies(categories) {
        return EmptyOutcome::Noop;
    }

    let current = match state.category_id {
        Some(id) if categories.contains(&id) => id,
        _ => return EmptyOutcome::Noop,
    };

    state.empty_count += 1;

    if state.empty_count < policy.empty_threshold {
        // Try deeper pages of the same category before giving up on it
        state.page += 1;
        return EmptyOutcome::PageAdvanced(state.page);
    }

    state.cooldowns.insert(current, now + Duration::minutes(policy.cooldown_minutes));

    let next = next_available(categories, current, state, now);
    state.category_id = Some(next);
    state.page = 1;
    state.empty_count = 0;

    EmptyOutcome::Rotated { from: current, to: next }
}

/// Record a fetch+filter cycle that produced an accepted offer
///
/// Only the empty counter resets; category and page are left unchanged so
/// subsequent cycles continue from the same position.
pub fn record_match(state: &mut RotationState) {
    state.empty_count = 0;
}

/// Next category after `current` in list order whose cooldown has passed;
/// falls back to the first configured category when all are cooling down
fn next_available(
    categories: &[i64],
    current: i64,
    state: &RotationState,
    now: DateTime<Utc>,
) -> i64 {
    let start = categories.iter().position(|&c| c == current).unwrap_or(0);

    for offset in 1..=categories.len() {
        let candidate = categories[(start + offset) % categories.len()];
        if !is_cooling(state, candidate, now) {
            return candidate;
        }
    }

    categories[0]
}

fn is_cooling(state: &RotationState, category: i64, now: DateTime<Utc>) -> bool {
    state.cooldowns.get(&category).is_some_and(|until| *until > now)
}

fn prune_expired(state: &mut RotationState, now: DateTime<Utc>) {
    state.cooldowns.retain(|_, until| *until > now);
}
