//! Dispatch scheduler
//!
//! Runs the fetch → filter → rotate → dispatch pipeline over all active
//! groups. Two entry points converge on `run_batch`: the timer loop
//! (`run`) and a manual run-once trigger; they differ only in the
//! inter-group delay. A batch-in-progress latch keeps the two from
//! interleaving, which would corrupt per-group rotation state under
//! concurrent read-modify-write. Groups are processed strictly
//! sequentially as backpressure against the upstream API and the
//! channel's own rate limits.

use std::sync::Arc;
use std::time::Duration;
use chrono::Utc;
use rand::Rng;
use tokio::sync::Mutex;
use tracing::{info, warn, error, debug};

use crate::config::settings::Settings;
use crate::database::DatabaseService;
use crate::models::{Group, LogStatus};
use crate::services::{ServiceFactory, FilterCriteria, select_offer, resolve_category};
use crate::services::rotation::{self, RotationPolicy, EmptyOutcome};
use crate::utils::errors::{ZapOfertasError, Result};
use crate::utils::logging::log_rotation;

/// What started this batch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchTrigger {
    Scheduled,
    Manual,
}

/// Outcome counters for one full pass over the active groups
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub processed: usize,
    pub dispatched: usize,
    pub empty: usize,
    pub errors: usize,
}

/// Per-group cycle outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GroupOutcome {
    Dispatched(LogStatus),
    NoMatch,
}

pub struct Scheduler {
    settings: Settings,
    db: DatabaseService,
    services: ServiceFactory,
    batch_lock: Mutex<()>,
}

impl Scheduler {
    pub fn new(settings: Settings, db: DatabaseService, services: ServiceFactory) -> Self {
        Self {
            settings,
            db,
            services,
            batch_lock: Mutex::new(()),
        }
    }

    /// Run one batch over all active groups
    ///
    /// Rejects with `BatchInProgress` when another batch holds the latch.
    /// Every per-group failure is caught here and the batch continues with
    /// the next group.
    pub async fn run_batch(&self, trigger: BatchTrigger) -> Result<BatchSummary> {
        let _guard = self.batch_lock
            .try_lock()
            .map_err(|_| ZapOfertasError::BatchInProgress)?;

        let groups = self.db.groups.get_active_groups().await?;
        info!(trigger = ?trigger, groups = groups.len(), "Dispatch batch started");

        let mut summary = BatchSummary::default();

        for (index, mut group) in groups.into_iter().enumerate() {
            if index > 0 {
                tokio::time::sleep(self.inter_group_delay(trigger)).await;
            }

            summary.processed += 1;

            match self.process_group(&mut group).await {
                Ok(GroupOutcome::Dispatched(LogStatus::Sent)) => summary.dispatched += 1,
                Ok(GroupOutcome::Dispatched(_)) => summary.errors += 1,
                Ok(GroupOutcome::NoMatch) => summary.empty += 1,
                Err(e) => {
                    summary.errors += 1;
                    warn!(
                        group_id = group.id,
                        group = %group.name,
                        error = %e,
                        recoverable = e.is_recoverable(),
                        "Group processing failed, continuing with next group"
                    );
                }
            }
        }

        info!(
            trigger = ?trigger,
            processed = summary.processed,
            dispatched = summary.dispatched,
            empty = summary.empty,
            errors = summary.errors,
            "Dispatch batch finished"
        );

        Ok(summary)
    }

    /// One group's fetch → filter → rotate → dispatch cycle
    async fn process_group(&self, group: &mut Group) -> Result<GroupOutcome> {
        let categories = self.resolved_categories(group);
        let policy = RotationPolicy::from_group(group);
        let now = Utc::now();

        let cursor = rotation::cursor(&policy, &categories, &mut group.rotation_state.0, now);

        // Upstream failures propagate before any rotation-state mutation:
        // a failed fetch must not count as an empty result
        let offers = self.services.offers_client
            .fetch_offers(
                cursor.category_id,
                group.sort_type,
                cursor.page,
                self.settings.shopee.page_size,
            )
            .await?;

        let criteria = FilterCriteria::from_group(group, &self.settings.scheduler.default_keywords);

        match select_offer(&offers, &criteria) {
            Some(offer) => {
                rotation::record_match(&mut group.rotation_state.0);

                let entry = self.services.dispatch_service.dispatch(group, &offer).await?;
                if entry.status != LogStatus::Sent {
                    // The success path persisted state together with
                    // last_sent_at; the failure path still owes a persist
                    self.db.groups.update_rotation_state(group.id, &group.rotation_state.0).await?;
                }

                Ok(GroupOutcome::Dispatched(entry.status))
            }
            None => {
                debug!(
                    group_id = group.id,
                    category = cursor.category_id,
                    page = cursor.page,
                    offers = offers.len(),
                    "No offer matched this cycle"
                );

                let outcome = rotation::record_empty(&policy, &categories, &mut group.rotation_state.0, now);
                if let EmptyOutcome::Rotated { from, to } = outcome {
                    log_rotation(&group.name, Some(from), Some(to), policy.cooldown_minutes);
                }

                self.db.groups.update_rotation_state(group.id, &group.rotation_state.0).await?;
                Ok(GroupOutcome::NoMatch)
            }
        }
    }

    /// Resolve the group's configured categories to numeric ids
    ///
    /// An unresolvable name fails that category, not the group; with no
    /// resolvable category left the group falls back to keyword-only
    /// fetching without a category constraint.
    fn resolved_categories(&self, group: &Group) -> Vec<i64> {
        group.product_categories.0
            .iter()
            .filter_map(|category| match resolve_category(category) {
                Ok(id) => Some(id),
                Err(e) => {
                    warn!(group_id = group.id, error = %e, "Skipping unresolvable category");
                    None
                }
            })
            .collect()
    }

    fn inter_group_delay(&self, trigger: BatchTrigger) -> Duration {
        let base_seconds = match trigger {
            BatchTrigger::Scheduled => self.settings.scheduler.scheduled_delay_seconds,
            BatchTrigger::Manual => self.settings.scheduler.manual_delay_seconds,
        };

        let jitter_ms = rand::thread_rng().gen_range(0..1000);
        Duration::from_secs(base_seconds) + Duration::from_millis(jitter_ms)
    }

    /// Timer loop: sleep the configured interval, re-read the automation
    /// record, and run a scheduled batch when automation is active
    ///
    /// The record is read fresh each tick, so toggling the active flag or
    /// the interval takes effect before the next tick without interrupting
    /// an in-flight batch.
    pub async fn run(self: Arc<Self>) {
        let default_interval = self.settings.scheduler.default_interval_minutes;

        loop {
            let interval_minutes = match self.db.automation.get_or_init(default_interval).await {
                Ok(config) => config.interval_minutes,
                Err(e) => {
                    error!(error = %e, "Failed to read automation config, using default interval");
                    default_interval
                }
            };

            tokio::time::sleep(Duration::from_secs(interval_minutes as u64 * 60)).await;

            let active = match self.db.automation.get_or_init(default_interval).await {
                Ok(config) => config.active,
                Err(e) => {
                    error!(error = %e, "Failed to read automation config, skipping tick");
                    continue;
                }
            };

            if !active {
                debug!("Automation inactive, skipping scheduled tick");
                continue;
            }

            match self.run_batch(BatchTrigger::Scheduled).await {
                Ok(_) => {}
                Err(ZapOfertasError::BatchInProgress) => {
                    debug!("Batch already in progress, skipping scheduled tick");
                }
                Err(e) => {
                    error!(error = %e, "Scheduled batch failed");
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Build a scheduler without touching the network: the lazy pool only
    /// connects when a query actually runs
    fn test_scheduler() -> Scheduler {
        let pool = sqlx::postgres::PgPoolOptions::new()
            .connect_lazy("postgresql://localhost/zapofertas")
            .unwrap();

        let settings = Settings::default();
        let db = DatabaseService::new(pool);
        let services = ServiceFactory::new(&settings, db.clone()).unwrap();
        Scheduler::new(settings, db, services)
    }

    #[test]
    fn batch_summary_starts_empty() {
        let summary = BatchSummary::default();
        assert_eq!(summary.processed, 0);
        assert_eq!(summary.dispatched, 0);
        assert_eq!(summary.empty, 0);
        assert_eq!(summary.errors, 0);
    }

    #[tokio::test]
    async fn scheduled_delay_is_longer_than_manual() {
        let scheduler = test_scheduler();

        let scheduled = scheduler.inter_group_delay(BatchTrigger::Scheduled);
        let manual = scheduler.inter_group_delay(BatchTrigger::Manual);
        assert!(scheduled > manual);
    }

    #[tokio::test]
    async fn concurrent_trigger_is_rejected_while_a_batch_holds_the_latch() {
        let scheduler = test_scheduler();

        // Simulate an in-flight batch: the latch is taken before any
        // database access, so a second trigger must bounce immediately
        let guard = scheduler.batch_lock.try_lock().unwrap();

        let err = scheduler.run_batch(BatchTrigger::Manual).await.unwrap_err();
        assert!(matches!(err, ZapOfertasError::BatchInProgress));
        assert!(err.is_recoverable());

        let err = scheduler.run_batch(BatchTrigger::Scheduled).await.unwrap_err();
        assert!(matches!(err, ZapOfertasError::BatchInProgress));

        // Releasing the latch frees the next trigger
        drop(guard);
        assert!(scheduler.batch_lock.try_lock().is_ok());
    }
}
