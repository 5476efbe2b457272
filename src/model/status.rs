use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Liveness and bandwidth report for the agent.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AgentStatus {
    pub active: bool,
    pub current_task: String,
    /// When the agent promises to check in next, in milliseconds since epoch.
    pub next_heartbeat: i64,
    /// Share of the agent's capacity currently committed, 0-100.
    pub bandwidth: u8,
    pub last_update: DateTime<Utc>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatusPatch {
    pub active: Option<bool>,
    pub current_task: Option<String>,
    pub next_heartbeat: Option<i64>,
    pub bandwidth: Option<u8>,
}

impl AgentStatus {
    /// The value a fresh deployment starts with.
    pub fn initial(now: DateTime<Utc>) -> Self {
        Self {
            active: true,
            current_task: "Starting opsboard".to_string(),
            next_heartbeat: (now + TimeDelta::minutes(10)).timestamp_millis(),
            bandwidth: 20,
            last_update: now,
        }
    }

    /// Merge the supplied fields and stamp `last_update`.
    pub fn apply(&mut self, patch: StatusPatch, now: DateTime<Utc>) {
        if let Some(active) = patch.active {
            self.active = active;
        }
        if let Some(current_task) = patch.current_task {
            self.current_task = current_task;
        }
        if let Some(next_heartbeat) = patch.next_heartbeat {
            self.next_heartbeat = next_heartbeat;
        }
        if let Some(bandwidth) = patch.bandwidth {
            self.bandwidth = bandwidth.min(100);
        }
        self.last_update = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn apply_merges_and_stamps() {
        let start = Utc::now();
        let mut status = AgentStatus::initial(start);
        let later = start + TimeDelta::seconds(30);

        status.apply(
            StatusPatch {
                active: Some(false),
                current_task: Some("Refilling queue".to_string()),
                next_heartbeat: None,
                bandwidth: Some(55),
            },
            later,
        );

        assert!(!status.active);
        assert_eq!(status.current_task, "Refilling queue");
        assert_eq!(status.bandwidth, 55);
        assert_eq!(status.last_update, later);
        // Untouched field survives the merge.
        assert_eq!(
            status.next_heartbeat,
            (start + TimeDelta::minutes(10)).timestamp_millis()
        );
    }

    #[test]
    fn wire_format_is_camel_case() {
        let value = serde_json::to_value(AgentStatus::initial(Utc::now())).unwrap();
        assert!(value.get("currentTask").is_some());
        assert!(value.get("nextHeartbeat").is_some());
        assert!(value.get("lastUpdate").is_some());
    }
}
