use chrono::{Duration, Local, Offset};
use serde::de::DeserializeOwned;
use std::collections::{btree_map::Entry, BTreeMap};
use tracing::{debug, error, info};

use crate::backup;
use crate::calendar::{format_local_date, parse_date_key};
use crate::config;
use crate::models::{AppData, DayRecord, StateKey, StateUpdate};
use crate::storage::Storage;

/// Handle returned by [`Store::subscribe`]; pass back to
/// [`Store::unsubscribe`] to drop the listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn Fn(&AppData, StateKey) + Send>;

/// The state container. Holds the full [`AppData`], persists every changed
/// top-level field under its own storage key, and fans changes out to
/// subscribers.
///
/// Constructed once at startup and shared by reference; there is no global
/// instance. `set_state` is synchronous end-to-end (merge, persist, notify —
/// no suspension point), so two calls can never interleave. Listeners run
/// inside the `set_state` call and cannot re-enter the store: every mutating
/// method takes `&mut self`, so a reentrant call fails to borrow at compile
/// time rather than looping at run time.
pub struct Store {
    storage: Storage,
    data: AppData,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_listener_id: u64,
    auto_backup: bool,
}

impl Store {
    /// Loads state from storage, using the process-local UTC offset for the
    /// one-time date-key migration.
    pub fn load(storage: Storage) -> Self {
        let offset = Local::now().offset().fix().local_minus_utc();
        Self::load_with_utc_offset(storage, offset)
    }

    /// Like [`Store::load`] with the UTC offset injected, so both migration
    /// branches are testable without touching the process timezone.
    ///
    /// Each persisted key loads independently; a missing or malformed value
    /// falls back to the empty default for that key and never fails startup.
    pub fn load_with_utc_offset(storage: Storage, utc_offset_secs: i32) -> Self {
        let data = AppData {
            day_records: load_key(&storage, config::keys::DAY_RECORDS),
            period_goals: load_key(&storage, config::keys::PERIOD_GOALS),
            custom_emotions: load_key(&storage, config::keys::CUSTOM_EMOTIONS),
            custom_nourishments: load_key(&storage, config::keys::CUSTOM_NOURISHMENTS),
            ..AppData::default()
        };
        let auto_backup =
            storage.get(config::keys::AUTO_BACKUP_ENABLED).as_deref() == Some("true");

        let mut store = Self {
            storage,
            data,
            listeners: Vec::new(),
            next_listener_id: 0,
            auto_backup,
        };
        store.run_date_key_migration(utc_offset_secs);
        store
    }

    /// Read-only view of the current state. The borrow ends before the next
    /// `set_state`, so callers cannot hold a stale snapshot.
    pub fn state(&self) -> &AppData {
        &self.data
    }

    pub fn auto_backup_enabled(&self) -> bool {
        self.auto_backup
    }

    pub fn storage(&self) -> &Storage {
        &self.storage
    }

    /// Shallow-merges `update` into the state, persists every changed
    /// persisted field immediately, then notifies subscribers once per
    /// changed top-level key. Subscribers must not rely on any ordering
    /// across keys.
    pub fn set_state(&mut self, update: StateUpdate) {
        let mut changed = Vec::new();

        if let Some(day_records) = update.day_records {
            self.data.day_records = day_records;
            changed.push(StateKey::DayRecords);
        }
        if let Some(period_goals) = update.period_goals {
            self.data.period_goals = period_goals;
            changed.push(StateKey::PeriodGoals);
        }
        if let Some(custom_emotions) = update.custom_emotions {
            self.data.custom_emotions = custom_emotions;
            changed.push(StateKey::CustomEmotions);
        }
        if let Some(custom_nourishments) = update.custom_nourishments {
            self.data.custom_nourishments = custom_nourishments;
            changed.push(StateKey::CustomNourishments);
        }
        if let Some(current_view) = update.current_view {
            self.data.current_view = current_view;
            changed.push(StateKey::CurrentView);
        }
        if let Some(viewed_period_index) = update.viewed_period_index {
            self.data.viewed_period_index = Some(viewed_period_index);
            changed.push(StateKey::ViewedPeriodIndex);
        }

        let mut data_changed = false;
        for key in &changed {
            if let Some(storage_key) = key.storage_key() {
                self.persist_field(*key, storage_key);
                data_changed = true;
            }
        }

        if data_changed && self.auto_backup {
            let timestamp = Local::now().to_rfc3339();
            backup::record_auto_backup(&self.storage, &self.data, &timestamp);
        }

        for key in &changed {
            debug!(key = ?key, "state changed");
            for (_, listener) in &self.listeners {
                listener(&self.data, *key);
            }
        }
    }

    /// Registers a listener invoked with `(new_state, changed_key)` on every
    /// `set_state` touching any key.
    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: Fn(&AppData, StateKey) + Send + 'static,
    {
        let id = SubscriptionId(self.next_listener_id);
        self.next_listener_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) {
        self.listeners.retain(|(listener_id, _)| *listener_id != id);
    }

    fn persist_field(&self, key: StateKey, storage_key: &str) {
        let serialized = match key {
            StateKey::DayRecords => serde_json::to_string(&self.data.day_records),
            StateKey::PeriodGoals => serde_json::to_string(&self.data.period_goals),
            StateKey::CustomEmotions => serde_json::to_string(&self.data.custom_emotions),
            StateKey::CustomNourishments => {
                serde_json::to_string(&self.data.custom_nourishments)
            }
            StateKey::CurrentView | StateKey::ViewedPeriodIndex => return,
        };
        match serialized {
            Ok(json) => self.storage.set(storage_key, &json),
            Err(err) => error!("failed to serialize {storage_key}: {err}"),
        }
    }

    /// One-time repair for date keys written by the old UTC-based formatter,
    /// which landed one day early in zones behind UTC. Gated by a persisted
    /// flag; a no-op (flag still written) when the offset is non-negative or
    /// there is nothing to migrate.
    fn run_date_key_migration(&mut self, utc_offset_secs: i32) {
        if self.storage.get(config::keys::MIGRATION_FLAG).as_deref() == Some("1") {
            return;
        }

        if utc_offset_secs >= 0 || self.data.day_records.is_empty() {
            self.storage.set(config::keys::MIGRATION_FLAG, "1");
            return;
        }

        info!("shifting stored date keys forward one day");
        let records = std::mem::take(&mut self.data.day_records);
        let migrated = shift_date_keys_forward(records);
        self.set_state(StateUpdate::day_records(migrated));
        self.storage.set(config::keys::MIGRATION_FLAG, "1");
    }
}

fn load_key<T>(storage: &Storage, key: &str) -> T
where
    T: DeserializeOwned + Default,
{
    match storage.get(key) {
        Some(raw) => match serde_json::from_str(&raw) {
            Ok(value) => value,
            Err(err) => {
                error!("failed to parse stored {key}, starting empty: {err}");
                T::default()
            }
        },
        None => T::default(),
    }
}

/// Shifts every well-formed date key forward one calendar day. Keys that are
/// not date keys pass through untouched. When two entries land on the same
/// key the records merge field-by-field, the later entry overwriting
/// same-named fields.
fn shift_date_keys_forward(
    records: impl IntoIterator<Item = (String, DayRecord)>,
) -> BTreeMap<String, DayRecord> {
    let mut migrated: BTreeMap<String, DayRecord> = BTreeMap::new();
    for (key, record) in records {
        let new_key = match parse_date_key(&key) {
            Some(date) => format_local_date(date + Duration::days(1)),
            None => key,
        };
        match migrated.entry(new_key) {
            Entry::Occupied(mut existing) => existing.get_mut().merge_from(record),
            Entry::Vacant(slot) => {
                slot.insert(record);
            }
        }
    }
    migrated
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PeriodGoal, TagOption, View};
    use std::sync::{Arc, Mutex};

    const BEHIND_UTC: i32 = -5 * 3600;
    const AHEAD_OF_UTC: i32 = 8 * 3600;

    fn record_with_journal(text: &str) -> DayRecord {
        DayRecord {
            journal: text.to_string(),
            ..DayRecord::default()
        }
    }

    fn store_in(dir: &tempfile::TempDir) -> Store {
        Store::load_with_utc_offset(Storage::new(dir.path()), AHEAD_OF_UTC)
    }

    #[test]
    fn set_state_merges_and_reads_back() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store_in(&dir);

        let mut records = BTreeMap::new();
        records.insert("2026-01-05".to_string(), record_with_journal("first"));
        store.set_state(StateUpdate::day_records(records.clone()));

        let mut goals = BTreeMap::new();
        goals.insert(
            1,
            PeriodGoal {
                goal: "start strong".to_string(),
                ..PeriodGoal::default()
            },
        );
        store.set_state(StateUpdate::period_goals(goals.clone()));

        assert_eq!(store.state().day_records, records);
        assert_eq!(store.state().period_goals, goals);
    }

    #[test]
    fn each_field_persists_under_its_own_key_and_reloads() {
        let dir = tempfile::tempdir().unwrap();
        {
            let mut store = store_in(&dir);
            let mut records = BTreeMap::new();
            records.insert("2026-02-01".to_string(), record_with_journal("note"));
            store.set_state(StateUpdate {
                day_records: Some(records),
                custom_emotions: Some(vec![TagOption::new("🔥 Fired up", "fired-up")]),
                ..StateUpdate::default()
            });
        }

        let storage = Storage::new(dir.path());
        assert!(storage.get(config::keys::DAY_RECORDS).is_some());
        assert!(storage.get(config::keys::CUSTOM_EMOTIONS).is_some());
        assert!(storage.get(config::keys::PERIOD_GOALS).is_none());

        let reloaded = store_in(&dir);
        assert_eq!(
            reloaded.state().day_records["2026-02-01"].journal,
            "note"
        );
        assert_eq!(reloaded.state().custom_emotions.len(), 1);
    }

    #[test]
    fn malformed_stored_json_falls_back_to_empty() {
        let dir = tempfile::tempdir().unwrap();
        let storage = Storage::new(dir.path());
        storage.set(config::keys::DAY_RECORDS, "{definitely not json");
        storage.set(config::keys::PERIOD_GOALS, "[]");

        let store = Store::load_with_utc_offset(storage, AHEAD_OF_UTC);
        assert!(store.state().day_records.is_empty());
        assert!(store.state().period_goals.is_empty());
    }

    #[test]
    fn subscribers_see_one_notification_per_changed_key() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store_in(&dir);

        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        store.subscribe(move |_, key| sink.lock().unwrap().push(key));

        store.set_state(StateUpdate {
            day_records: Some(BTreeMap::new()),
            custom_nourishments: Some(Vec::new()),
            current_view: Some(View::Summary),
            ..StateUpdate::default()
        });

        let mut keys = seen.lock().unwrap().clone();
        keys.sort_by_key(|key| format!("{key:?}"));
        assert_eq!(
            keys,
            vec![
                StateKey::CurrentView,
                StateKey::CustomNourishments,
                StateKey::DayRecords,
            ]
        );
    }

    #[test]
    fn unsubscribe_stops_notifications() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store_in(&dir);

        let count = Arc::new(Mutex::new(0));
        let sink = Arc::clone(&count);
        let id = store.subscribe(move |_, _| *sink.lock().unwrap() += 1);

        store.set_state(StateUpdate::day_records(BTreeMap::new()));
        store.unsubscribe(id);
        store.set_state(StateUpdate::day_records(BTreeMap::new()));

        assert_eq!(*count.lock().unwrap(), 1);
    }

    #[test]
    fn migration_shifts_date_keys_behind_utc() {
        let dir = tempfile::tempdir().unwrap();
        {
            let mut seeded = store_in(&dir);
            let mut records = BTreeMap::new();
            records.insert("2026-01-05".to_string(), record_with_journal("shift me"));
            records.insert("2026-12-31".to_string(), record_with_journal("year edge"));
            records.insert("not-a-date".to_string(), record_with_journal("keep key"));
            seeded.set_state(StateUpdate::day_records(records));
        }
        // simulate pre-migration storage
        Storage::new(dir.path()).remove(config::keys::MIGRATION_FLAG);

        let store = Store::load_with_utc_offset(Storage::new(dir.path()), BEHIND_UTC);
        let records = &store.state().day_records;
        assert!(records.contains_key("2026-01-06"));
        assert!(!records.contains_key("2026-01-05"));
        assert!(records.contains_key("2027-01-01"));
        assert!(records.contains_key("not-a-date"));
        assert_eq!(records["not-a-date"].journal, "keep key");
    }

    #[test]
    fn migration_runs_at_most_once() {
        let dir = tempfile::tempdir().unwrap();
        {
            let mut seeded = store_in(&dir);
            let mut records = BTreeMap::new();
            records.insert("2026-03-10".to_string(), record_with_journal("once"));
            seeded.set_state(StateUpdate::day_records(records));
        }
        Storage::new(dir.path()).remove(config::keys::MIGRATION_FLAG);

        let first = Store::load_with_utc_offset(Storage::new(dir.path()), BEHIND_UTC);
        let after_first = first.state().day_records.clone();
        drop(first);

        // flag is now set, so a second load with the same offset must not
        // shift again
        let second = Store::load_with_utc_offset(Storage::new(dir.path()), BEHIND_UTC);
        assert_eq!(second.state().day_records, after_first);
        assert!(second.state().day_records.contains_key("2026-03-11"));
        assert!(!second.state().day_records.contains_key("2026-03-12"));
    }

    #[test]
    fn migration_is_a_no_op_for_non_negative_offsets() {
        let dir = tempfile::tempdir().unwrap();
        {
            let mut seeded = store_in(&dir);
            let mut records = BTreeMap::new();
            records.insert("2026-03-10".to_string(), record_with_journal("stay"));
            seeded.set_state(StateUpdate::day_records(records));
        }
        Storage::new(dir.path()).remove(config::keys::MIGRATION_FLAG);

        let store = Store::load_with_utc_offset(Storage::new(dir.path()), AHEAD_OF_UTC);
        assert!(store.state().day_records.contains_key("2026-03-10"));
        // the flag is written even on the no-op path
        assert_eq!(
            store.storage().get(config::keys::MIGRATION_FLAG).as_deref(),
            Some("1")
        );
    }

    #[test]
    fn shift_merges_colliding_records_field_by_field() {
        let entries = vec![
            (
                "2026-05-01".to_string(),
                DayRecord {
                    mood: Some(3),
                    journal: "survives".to_string(),
                    ..DayRecord::default()
                },
            ),
            (
                "2026-05-01".to_string(),
                DayRecord {
                    mood: Some(5),
                    blockers: "added".to_string(),
                    ..DayRecord::default()
                },
            ),
        ];

        let migrated = shift_date_keys_forward(entries);
        assert_eq!(migrated.len(), 1);
        let merged = &migrated["2026-05-02"];
        assert_eq!(merged.mood, Some(5), "later entry overwrites");
        assert_eq!(merged.journal, "survives");
        assert_eq!(merged.blockers, "added");
    }

    #[test]
    fn auto_backup_records_on_data_changes_when_enabled() {
        let dir = tempfile::tempdir().unwrap();
        let storage = Storage::new(dir.path());
        storage.set(config::keys::AUTO_BACKUP_ENABLED, "true");

        let mut store = Store::load_with_utc_offset(storage, AHEAD_OF_UTC);
        assert!(store.auto_backup_enabled());

        let mut records = BTreeMap::new();
        records.insert("2026-07-01".to_string(), record_with_journal("backed up"));
        store.set_state(StateUpdate::day_records(records));
        // transient-only updates must not add a backup
        store.set_state(StateUpdate {
            current_view: Some(View::Overview),
            ..StateUpdate::default()
        });

        let backups = backup::auto_backups(store.storage());
        assert_eq!(backups.len(), 1);
        assert!(backups[0].data.day_records.contains_key("2026-07-01"));
    }

    #[test]
    fn auto_backup_stays_off_without_the_flag() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store_in(&dir);
        assert!(!store.auto_backup_enabled());

        store.set_state(StateUpdate::day_records(BTreeMap::new()));
        assert!(backup::auto_backups(store.storage()).is_empty());
    }

    #[test]
    fn shift_handles_month_and_leap_boundaries() {
        let mut records = BTreeMap::new();
        records.insert("2024-02-28".to_string(), record_with_journal("leap"));
        records.insert("2026-01-31".to_string(), record_with_journal("month"));

        let migrated = shift_date_keys_forward(records);
        assert!(migrated.contains_key("2024-02-29"));
        assert!(migrated.contains_key("2026-02-01"));
    }
}
