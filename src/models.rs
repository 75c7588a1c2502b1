use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::config;

/// Number of tracked indicator slots per period.
pub const INDICATOR_SLOTS: usize = 3;

/// Numeric metrics tracked per day. Zero or empty means "not recorded".
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct Metrics {
    pub sleep_hours: f64,
    pub exercise_minutes: u32,
    pub reading_minutes: u32,
    pub wealth_delta: f64,
    pub social_note: String,
}

/// A user-defined activity logged for a day.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct CustomActivity {
    pub name: String,
    pub value: String,
}

/// Everything tracked for one calendar date. Every field is optional; a
/// record with nothing meaningful set does not count as a data day.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct DayRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mood: Option<u8>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub emotions: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub keywords: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weather: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub energy_level: Option<u8>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub nourishments: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metrics: Option<Metrics>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub three_good_things: Vec<String>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub journal: String,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub goal_checkin: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub indicator_checkins: Vec<bool>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub checkin_texts: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub custom_activities: Vec<CustomActivity>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub blockers: String,
}

impl DayRecord {
    /// Whether the i-th indicator slot (0-based) is checked. Absent entries
    /// read as unchecked; the array is positional against the period's
    /// indicator definitions.
    pub fn indicator_checked(&self, slot: usize) -> bool {
        self.indicator_checkins.get(slot).copied().unwrap_or(false)
    }

    /// A day counts as recorded when any of: mood set, journal non-empty,
    /// weather set, goal checked in, any indicator checked, any keyword,
    /// any custom activity, blockers present. Tag selections and bare
    /// metric numbers alone do not make a data day.
    pub fn is_empty(&self) -> bool {
        !(self.mood.is_some()
            || !self.journal.is_empty()
            || self.weather.is_some()
            || self.goal_checkin
            || (0..INDICATOR_SLOTS).any(|slot| self.indicator_checked(slot))
            || !self.keywords.is_empty()
            || !self.custom_activities.is_empty()
            || !self.blockers.is_empty())
    }

    /// Field-by-field merge: fields set on `incoming` overwrite, fields set
    /// only on `self` survive. Used when migrated date keys collide.
    pub fn merge_from(&mut self, incoming: DayRecord) {
        if incoming.mood.is_some() {
            self.mood = incoming.mood;
        }
        if !incoming.emotions.is_empty() {
            self.emotions = incoming.emotions;
        }
        if !incoming.keywords.is_empty() {
            self.keywords = incoming.keywords;
        }
        if incoming.weather.is_some() {
            self.weather = incoming.weather;
        }
        if incoming.energy_level.is_some() {
            self.energy_level = incoming.energy_level;
        }
        if !incoming.nourishments.is_empty() {
            self.nourishments = incoming.nourishments;
        }
        if incoming.metrics.is_some() {
            self.metrics = incoming.metrics;
        }
        if !incoming.three_good_things.is_empty() {
            self.three_good_things = incoming.three_good_things;
        }
        if !incoming.journal.is_empty() {
            self.journal = incoming.journal;
        }
        if incoming.goal_checkin {
            self.goal_checkin = true;
        }
        if !incoming.indicator_checkins.is_empty() {
            self.indicator_checkins = incoming.indicator_checkins;
        }
        if !incoming.checkin_texts.is_empty() {
            self.checkin_texts = incoming.checkin_texts;
        }
        if !incoming.custom_activities.is_empty() {
            self.custom_activities = incoming.custom_activities;
        }
        if !incoming.blockers.is_empty() {
            self.blockers = incoming.blockers;
        }
    }
}

/// Goal and indicator definitions for one period, created lazily on first
/// edit. `indicators` is positional: a day's check-in slot i refers to
/// `indicators[i]`.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct PeriodGoal {
    pub goal: String,
    pub remarks: String,
    pub indicators: Vec<String>,
}

impl PeriodGoal {
    /// Pads or truncates the indicator list to exactly three slots.
    pub fn normalize(&mut self) {
        self.indicators.resize(INDICATOR_SLOTS, String::new());
    }
}

/// Display label plus canonical value for an emotion/nourishment tag.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct TagOption {
    pub text: String,
    pub value: String,
}

impl TagOption {
    pub fn new(text: &str, value: &str) -> Self {
        Self {
            text: text.to_string(),
            value: value.to_string(),
        }
    }
}

/// Which page of the UI is active. Held in state for subscribers but never
/// persisted.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum View {
    #[default]
    Macro,
    Overview,
    Detail,
    Summary,
}

/// The full application state. The four data fields persist under their own
/// storage keys; `current_view` and `viewed_period_index` are transient UI
/// conveniences carried alongside.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct AppData {
    pub day_records: BTreeMap<String, DayRecord>,
    pub period_goals: BTreeMap<u32, PeriodGoal>,
    pub custom_emotions: Vec<TagOption>,
    pub custom_nourishments: Vec<TagOption>,
    #[serde(skip)]
    pub current_view: View,
    #[serde(skip)]
    pub viewed_period_index: Option<u32>,
}

/// Shallow-merge partial for [`crate::store::Store::set_state`]: only the
/// fields present are applied.
#[derive(Debug, Clone, Default)]
pub struct StateUpdate {
    pub day_records: Option<BTreeMap<String, DayRecord>>,
    pub period_goals: Option<BTreeMap<u32, PeriodGoal>>,
    pub custom_emotions: Option<Vec<TagOption>>,
    pub custom_nourishments: Option<Vec<TagOption>>,
    pub current_view: Option<View>,
    pub viewed_period_index: Option<u32>,
}

impl StateUpdate {
    pub fn day_records(records: BTreeMap<String, DayRecord>) -> Self {
        Self {
            day_records: Some(records),
            ..Self::default()
        }
    }

    pub fn period_goals(goals: BTreeMap<u32, PeriodGoal>) -> Self {
        Self {
            period_goals: Some(goals),
            ..Self::default()
        }
    }
}

/// Top-level state fields, used to tag change notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StateKey {
    DayRecords,
    PeriodGoals,
    CustomEmotions,
    CustomNourishments,
    CurrentView,
    ViewedPeriodIndex,
}

impl StateKey {
    /// The durable-storage key for this field, if it persists at all.
    pub fn storage_key(self) -> Option<&'static str> {
        match self {
            StateKey::DayRecords => Some(config::keys::DAY_RECORDS),
            StateKey::PeriodGoals => Some(config::keys::PERIOD_GOALS),
            StateKey::CustomEmotions => Some(config::keys::CUSTOM_EMOTIONS),
            StateKey::CustomNourishments => Some(config::keys::CUSTOM_NOURISHMENTS),
            StateKey::CurrentView | StateKey::ViewedPeriodIndex => None,
        }
    }
}

/// One period as it crosses the API boundary; dates travel as `YYYY-MM-DD`
/// strings.
#[derive(Debug, Serialize, Deserialize)]
pub struct PeriodResponse {
    pub index: u32,
    pub start_date: String,
    pub end_date: String,
    pub day_count: u32,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PeriodsResponse {
    pub year: i32,
    pub today: String,
    pub current_index: Option<u32>,
    pub periods: Vec<PeriodResponse>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DayResponse {
    pub date: String,
    pub has_data: bool,
    pub record: DayRecord,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ViewUpdateRequest {
    #[serde(default)]
    pub current_view: Option<View>,
    #[serde(default)]
    pub viewed_period_index: Option<u32>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TagsUpdateRequest {
    #[serde(default)]
    pub custom_emotions: Option<Vec<TagOption>>,
    #[serde(default)]
    pub custom_nourishments: Option<Vec<TagOption>>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StateResponse {
    pub day_records: BTreeMap<String, DayRecord>,
    pub period_goals: BTreeMap<u32, PeriodGoal>,
    pub custom_emotions: Vec<TagOption>,
    pub custom_nourishments: Vec<TagOption>,
    pub default_emotions: Vec<TagOption>,
    pub default_nourishments: Vec<TagOption>,
}
