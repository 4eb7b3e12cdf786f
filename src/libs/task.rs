use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, Serialize};

/// A task row as stored and served, in canonical field order.
///
/// `position` establishes the total order among tasks; ties left over from
/// legacy data are broken by `created_at`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: i64,
    pub title: String,
    pub timer_enabled: bool,
    pub hours: u32,
    pub minutes: u32,
    pub seconds: u32,
    pub position: i64,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Task {
    /// Total countdown duration in seconds. Zero when the timer is disabled.
    pub fn duration_secs(&self) -> u32 {
        if !self.timer_enabled {
            return 0;
        }
        self.hours * 3600 + self.minutes * 60 + self.seconds
    }

    /// Whether the playback engine can run a countdown for this task.
    pub fn has_runnable_timer(&self) -> bool {
        self.timer_enabled && self.duration_secs() > 0
    }
}

/// Creation payload. Missing timer fields default to a disabled zero timer,
/// matching the form the frontend submits.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTask {
    pub title: String,
    #[serde(default)]
    pub timer_enabled: bool,
    #[serde(default)]
    pub hours: u32,
    #[serde(default)]
    pub minutes: u32,
    #[serde(default)]
    pub seconds: u32,
}

/// Partial update payload where an absent field and an explicit `null` are
/// distinguishable: `None` means "leave unchanged", `Some(None)` means the
/// client sent `null` (rejected for these non-nullable fields).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskUpdate {
    #[serde(default, deserialize_with = "double_option")]
    pub title: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub timer_enabled: Option<Option<bool>>,
    #[serde(default, deserialize_with = "double_option")]
    pub hours: Option<Option<u32>>,
    #[serde(default, deserialize_with = "double_option")]
    pub minutes: Option<Option<u32>>,
    #[serde(default, deserialize_with = "double_option")]
    pub seconds: Option<Option<u32>>,
}

fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}

/// Direction for single-step reordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
}

/// One entry of a bulk reorder request: the task and its new position.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskOrder {
    pub id: i64,
    pub position: i64,
}
