use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub const ALL: [Priority; 3] = [Priority::Low, Priority::Medium, Priority::High];

    pub fn as_str(self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            other => Err(format!("unknown priority '{other}' (expected low, medium or high)")),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub due_date: Option<String>,
    #[serde(default)]
    pub priority: Priority,
    pub status: String, // column id, e.g. "todo"
    #[serde(serialize_with = "millis_rfc3339")]
    pub created_at: DateTime<Utc>,
}

/// Field values submitted by the form layer. Everything but `id` and
/// `created_at` comes from here.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TaskDraft {
    pub title: String,
    pub description: String,
    pub due_date: Option<String>,
    pub priority: Priority,
    pub status: String,
}

impl Task {
    /// Builds a new task with a fresh id and the current time.
    pub fn from_draft(draft: TaskDraft) -> Self {
        Self::with_identity(generate_id(), Utc::now(), draft)
    }

    pub fn with_identity(id: String, created_at: DateTime<Utc>, draft: TaskDraft) -> Self {
        let mut task = Task {
            id,
            created_at: created_at.trunc_subsecs(3),
            title: String::new(),
            description: String::new(),
            due_date: None,
            priority: Priority::default(),
            status: String::new(),
        };
        task.apply_draft(draft);
        task
    }

    /// Replaces every mutable field, keeping `id` and `created_at`.
    pub fn apply_draft(&mut self, draft: TaskDraft) {
        self.title = draft.title.trim().to_string();
        self.description = draft.description.trim().to_string();
        self.due_date = draft.due_date.filter(|d| !d.trim().is_empty());
        self.priority = draft.priority;
        self.status = draft.status;
    }

    pub fn to_draft(&self) -> TaskDraft {
        TaskDraft {
            title: self.title.clone(),
            description: self.description.clone(),
            due_date: self.due_date.clone(),
            priority: self.priority,
            status: self.status.clone(),
        }
    }
}

/// `2024-05-01T10:00:00.000Z`, always three fractional digits.
fn millis_rfc3339<S>(at: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&at.to_rfc3339_opts(SecondsFormat::Millis, true))
}

fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.trim().is_empty()))
}

/// Time component plus 64 random bits, both base-36. Not collision-free,
/// just unlikely to collide for one local user.
pub fn generate_id() -> String {
    let millis = Utc::now().timestamp_millis().max(0) as u128;
    let random = Uuid::new_v4().as_u128() as u64;
    format!("{}{}", to_base36(millis), to_base36(random as u128))
}

fn to_base36(mut n: u128) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if n == 0 {
        return "0".to_string();
    }
    let mut out = Vec::new();
    while n > 0 {
        out.push(DIGITS[(n % 36) as usize]);
        n /= 36;
    }
    out.reverse();
    String::from_utf8_lossy(&out).into_owned()
}
