use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// One LDD entry from the structured (JSON) export. Every attribute is
/// optional; attributes not listed here are ignored.
///
/// Numbers and booleans are kept in their JSON text form; nulls, arrays and
/// objects read as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct HostRecord {
    #[serde(default, deserialize_with = "lenient_string")]
    pub vdi_owner_email: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub vdi_owner_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub hostname: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub citrix_last_connection_date: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub home_directory: Option<String>,
}

fn lenient_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    })
}

/// Host records in input-file key order.
#[derive(Debug, Clone, Default)]
pub struct StructuredRecords {
    pub entries: Vec<(String, HostRecord)>,
}

impl StructuredRecords {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn records(&self) -> impl Iterator<Item = &HostRecord> {
        self.entries.iter().map(|(_, r)| r)
    }
}

/// A user from the tabular export and the hostnames assigned to them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    pub user: String,
    pub hostnames: Vec<String>,
}

/// Users holding more than one LDD, in first-seen order.
#[derive(Debug, Clone, Default)]
pub struct AssignmentTable {
    pub assignments: Vec<Assignment>,
}

impl AssignmentTable {
    pub fn len(&self) -> usize {
        self.assignments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }

    pub fn get(&self, user: &str) -> Option<&[String]> {
        self.assignments
            .iter()
            .find(|a| a.user == user)
            .map(|a| a.hostnames.as_slice())
    }

    /// Insert or replace. A repeated user keeps its original position.
    pub fn upsert(&mut self, user: String, hostnames: Vec<String>) {
        match self.assignments.iter_mut().find(|a| a.user == user) {
            Some(existing) => existing.hostnames = hostnames,
            None => self.assignments.push(Assignment { user, hostnames }),
        }
    }
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub recipient: String,
    pub subject: String,
    pub body: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DeliveryStats {
    pub delivered: usize,
    pub failed: usize,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct PipelineReport {
    pub pipeline: String,
    pub channel: String,
    /// Entries read from the input source.
    pub loaded: usize,
    /// Owners (or users) holding more than one LDD.
    pub multi_owners: usize,
    /// Notifications rendered and handed to the channel.
    pub eligible: usize,
    pub delivered: usize,
    pub failed: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl PipelineReport {
    pub fn new(pipeline: &str, channel: &str) -> Self {
        Self {
            pipeline: pipeline.to_string(),
            channel: channel.to_string(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub reference_date: String,
    pub stale_days_threshold: i64,
    pub structured: PipelineReport,
    pub tabular: PipelineReport,
}
