use std::fmt;

use chrono::{DateTime, SecondsFormat, Utc};
use uuid::Uuid;

/// The association between a user's graph and the site deployed for it.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct WebsiteRecord {
    pub graph: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// Body accepted by the launch endpoint. Both fields are optional on the
/// wire so that a missing graph is reported as a validation failure rather
/// than a parse failure.
#[derive(Deserialize, Debug, Clone, Default)]
pub struct LaunchRequest {
    #[serde(default)]
    pub graph: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleStatus {
    Initializing,
    ShuttingDown,
    Live,
    Failure,
}

impl LifecycleStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LifecycleStatus::Initializing => "INITIALIZING",
            LifecycleStatus::ShuttingDown => "SHUTTING DOWN",
            LifecycleStatus::Live => "LIVE",
            LifecycleStatus::Failure => "FAILURE",
        }
    }
}

impl fmt::Display for LifecycleStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One append-only audit row in the status table.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusEntry {
    pub id: Uuid,
    pub action_key: String,
    pub timestamp: DateTime<Utc>,
    pub status: LifecycleStatus,
}

impl StatusEntry {
    pub fn new(graph: &str, status: LifecycleStatus) -> StatusEntry {
        StatusEntry {
            id: Uuid::new_v4(),
            action_key: action_key(graph),
            timestamp: Utc::now(),
            status,
        }
    }

    /// `2021-03-04T05:06:07.890Z`
    pub fn date(&self) -> String {
        self.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
    }
}

/// Launch and shutdown share the `launch_` namespace.
pub fn action_key(graph: &str) -> String {
    format!("launch_{}", graph)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Job {
    Launch,
    Shutdown,
}

impl Job {
    pub fn name(&self) -> &'static str {
        match self {
            Job::Launch => "launch",
            Job::Shutdown => "shutdown",
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct JobPayload {
    pub roam_graph: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subscription {
    pub subscription_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn website_record_wire_shape() {
        let record = WebsiteRecord {
            graph: "notes".into(),
            url: Some("https://notes.example.com".into()),
        };
        assert_eq!(
            serde_json::to_value(&record).unwrap(),
            json!({"graph": "notes", "url": "https://notes.example.com"})
        );

        let bare: WebsiteRecord = serde_json::from_value(json!({"graph": "notes"})).unwrap();
        assert_eq!(bare.url, None);
        assert_eq!(serde_json::to_value(&bare).unwrap(), json!({"graph": "notes"}));
    }

    #[test]
    fn status_entry_uses_launch_prefix() {
        let entry = StatusEntry::new("notes", LifecycleStatus::ShuttingDown);
        assert_eq!(entry.action_key, "launch_notes");
        assert_eq!(entry.status.as_str(), "SHUTTING DOWN");
        assert!(entry.date().ends_with('Z'));
        assert_eq!(entry.date().len(), "2021-03-04T05:06:07.890Z".len());
    }

    #[test]
    fn job_payload_is_camel_case() {
        let payload = JobPayload {
            roam_graph: "notes".into(),
        };
        assert_eq!(serde_json::to_string(&payload).unwrap(), r#"{"roamGraph":"notes"}"#);
    }
}
