use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ulid::Ulid;
use utoipa::ToSchema;

/// Retention cap: only the most recent calls are kept.
pub const MAX_COST_ENTRIES: usize = 100;

/// One billed call to an external API.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CostEntry {
    pub id: String,
    pub api: String,
    pub cost: f64,
    pub description: String,
    pub timestamp: DateTime<Utc>,
}

/// Cost ledger with incrementally maintained aggregates.
///
/// `today` and `month` are bumped on insert and never recomputed from the
/// entry list, so they survive the retention eviction.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CostLedger {
    pub today: f64,
    pub month: f64,
    pub api_calls: Vec<CostEntry>,
    pub last_update: DateTime<Utc>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewCost {
    pub api: String,
    pub cost: f64,
    pub description: Option<String>,
}

impl CostLedger {
    pub fn initial(now: DateTime<Utc>) -> Self {
        Self {
            today: 0.0,
            month: 0.0,
            api_calls: Vec::new(),
            last_update: now,
        }
    }

    /// Prepend a call, bump both aggregates, and evict beyond the cap.
    pub fn record(&mut self, new: NewCost, now: DateTime<Utc>) -> CostEntry {
        let entry = CostEntry {
            id: Ulid::new().to_string(),
            api: new.api,
            cost: new.cost,
            description: new.description.unwrap_or_default(),
            timestamp: now,
        };

        self.api_calls.insert(0, entry.clone());
        self.today += entry.cost;
        self.month += entry.cost;
        self.last_update = now;

        self.api_calls.truncate(MAX_COST_ENTRIES);

        entry
    }

    /// Number of recorded calls made today (UTC).
    pub fn calls_today(&self, now: DateTime<Utc>) -> usize {
        self.api_calls
            .iter()
            .filter(|call| call.timestamp.date_naive() == now.date_naive())
            .count()
    }
}
