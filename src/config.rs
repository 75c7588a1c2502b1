//! Fixed configuration for the planning year.
//!
//! The calendar covers exactly one year, split into `PERIOD_COUNT` xun of
//! `PERIOD_DAYS` nominal days each; the last xun absorbs the remainder.

/// The year the calendar is built for.
pub const YEAR: i32 = 2026;

/// Number of xun periods in the year.
pub const PERIOD_COUNT: u32 = 36;

/// Nominal length of a xun in days. The last period is longer.
pub const PERIOD_DAYS: u32 = 10;

/// Storage keys, one file per key under the data directory.
pub mod keys {
    pub const DAY_RECORDS: &str = "xun_calendar_data_v2";
    pub const PERIOD_GOALS: &str = "xun_macro_goals";
    pub const CUSTOM_EMOTIONS: &str = "xun_custom_emotions";
    pub const CUSTOM_NOURISHMENTS: &str = "xun_custom_nourishments";
    pub const MIGRATION_FLAG: &str = "xun_calendar_data_v2_local_date_migrated_v1";
    pub const AUTO_BACKUP_ENABLED: &str = "auto_backup_enabled";
    pub const AUTO_BACKUPS: &str = "auto_backups";
}

/// Built-in emotion tag vocabulary; users can extend it at runtime.
pub const DEFAULT_EMOTIONS: &[(&str, &str)] = &[
    ("😄 Joyful", "joyful"),
    ("😆 Excited", "excited"),
    ("🙏 Grateful", "grateful"),
    ("🌟 Hopeful", "hopeful"),
    ("🦁 Proud", "proud"),
    ("💪 Fulfilled", "fulfilled"),
    ("😌 Calm", "calm"),
    ("🧠 Focused", "focused"),
    ("😶‍🌫️ Lost", "lost"),
    ("😰 Anxious", "anxious"),
    ("😫 Drained", "drained"),
    ("😠 Angry", "angry"),
    ("🍂 Lonely", "lonely"),
    ("😞 Down", "down"),
];

/// Built-in nourishment tag vocabulary.
pub const DEFAULT_NOURISHMENTS: &[(&str, &str)] = &[
    ("📚 Reading", "reading"),
    ("🧘 Meditation", "meditation"),
    ("🏃 Exercise", "exercise"),
    ("🥗 Healthy food", "healthy-food"),
    ("🌲 Nature", "nature"),
    ("☕ Social time", "social-time"),
    ("🎨 Creating", "creating"),
];
