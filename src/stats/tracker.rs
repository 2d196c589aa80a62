//! Per-day mastery counters

use std::sync::Arc;
use std::time::Duration;

use chrono::{Local, NaiveDate};

use crate::flush::{start_save_scheduler, AfterSave, SaveScheduler};
use crate::storage::{keys, KeyValueStorage};

use super::models::DailyStat;
use super::observers::{ObserverRegistry, SubscriberId};

/// Quiet window before counter changes reach storage. Shorter than the word
/// flag window because stats drive visible progress charts.
pub const SAVE_DEBOUNCE: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MasteryEvent {
    Mastered,
    Unmastered,
}

/// Tracks how many words were mastered per local calendar day.
///
/// Counters change through two events: a word mastered bumps today's count,
/// a word unmastered decrements it but never below zero. Observers are
/// notified synchronously on every effective change and again after each
/// completed save.
pub struct StatsTracker {
    storage: Arc<dyn KeyValueStorage>,
    days: Vec<DailyStat>,
    ready: bool,
    /// At most one event recorded before init, latest wins
    deferred: Option<MasteryEvent>,
    observers: ObserverRegistry,
    saves: SaveScheduler,
}

impl StatsTracker {
    pub fn new(storage: Arc<dyn KeyValueStorage>) -> Self {
        let observers = ObserverRegistry::new();
        let after_save: AfterSave = {
            let observers = observers.clone();
            Box::new(move || observers.notify_all())
        };
        let saves = start_save_scheduler(
            Arc::clone(&storage),
            keys::DAILY_STATS,
            SAVE_DEBOUNCE,
            Some(after_save),
        );

        Self {
            storage,
            days: Vec::new(),
            ready: false,
            deferred: None,
            observers,
            saves,
        }
    }

    /// Load persisted counters, then apply the deferred event if one was
    /// recorded while loading. A second call is a no-op.
    pub async fn init(&mut self) {
        if self.ready {
            return;
        }

        self.days = self.load_days().await;
        // Today starts at zero in memory; nothing is written until a counter
        // actually changes.
        self.ensure_today_exists();
        self.ready = true;

        if let Some(event) = self.deferred.take() {
            self.apply(event);
        }

        log::info!("daily stats ready: {} days tracked", self.days.len());
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }

    async fn load_days(&self) -> Vec<DailyStat> {
        let raw = match self.storage.get(keys::DAILY_STATS).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                log::warn!(
                    "failed to read '{}': {} — starting empty",
                    keys::DAILY_STATS,
                    e,
                );
                return Vec::new();
            }
        };

        match serde_json::from_str(&raw) {
            Ok(days) => days,
            Err(e) => {
                log::warn!("discarding malformed daily stats: {}", e);
                Vec::new()
            }
        }
    }

    /// Count one word mastered today.
    pub fn record_mastered(&mut self) {
        if !self.ready {
            self.deferred = Some(MasteryEvent::Mastered);
            return;
        }
        self.apply(MasteryEvent::Mastered);
    }

    /// Count one word un-mastered today. Today's counter floors at zero.
    pub fn record_unmastered(&mut self) {
        if !self.ready {
            self.deferred = Some(MasteryEvent::Unmastered);
            return;
        }
        self.apply(MasteryEvent::Unmastered);
    }

    fn apply(&mut self, event: MasteryEvent) {
        if event == MasteryEvent::Mastered {
            self.ensure_today_exists();
        }

        // For an unmastered event right after a midnight rollover there is
        // no entry to decrement, and none gets created.
        let today = today();
        let Some(entry) = self.days.iter_mut().find(|day| day.date == today) else {
            return;
        };

        let before = entry.mastered_count;
        entry.mastered_count = match event {
            MasteryEvent::Mastered => before.saturating_add(1),
            MasteryEvent::Unmastered => before.saturating_sub(1),
        };

        // Saturated in either direction means nothing observable changed.
        if entry.mastered_count != before {
            self.observers.notify_all();
            self.schedule_save();
        }
    }

    fn ensure_today_exists(&mut self) {
        let today = today();
        if !self.days.iter().any(|day| day.date == today) {
            self.days.push(DailyStat::empty(today));
        }
    }

    /// Today's counters. Never inserts an entry; absent means zero.
    pub fn today_stats(&self) -> DailyStat {
        let today = today();
        self.days
            .iter()
            .find(|day| day.date == today)
            .cloned()
            .unwrap_or_else(|| DailyStat::empty(today))
    }

    /// The last seven days, oldest first, ending with today. Days with no
    /// activity come back as zero entries.
    pub fn week_stats(&self) -> Vec<DailyStat> {
        let today = today();
        (0i64..7)
            .rev()
            .map(|back| {
                let date = today - chrono::Duration::days(back);
                self.days
                    .iter()
                    .find(|day| day.date == date)
                    .cloned()
                    .unwrap_or_else(|| DailyStat::empty(date))
            })
            .collect()
    }

    /// Register `callback` to run on every stats change.
    pub fn subscribe(&self, callback: impl Fn() + Send + Sync + 'static) -> SubscriberId {
        self.observers.subscribe(callback)
    }

    pub fn unsubscribe(&self, id: SubscriberId) {
        self.observers.unsubscribe(id);
    }

    fn schedule_save(&self) {
        match serde_json::to_string(&self.days) {
            Ok(payload) => self.saves.schedule(payload),
            Err(e) => log::error!("failed to serialize daily stats: {}", e),
        }
    }

    /// Flush any staged write and stop the flush task.
    pub async fn shutdown(&mut self) {
        self.saves.shutdown().await;
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}
