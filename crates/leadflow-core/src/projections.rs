//! Read projections over leads for downstream views.
//!
//! These sit outside the engine: they read custom data the engine treats as
//! opaque and never feed back into catalog or transition logic.

use std::fmt;

use jiff::{
    civil::{Date, DateTime},
    tz::TimeZone,
    Timestamp,
};
use serde::Serialize;
use serde_json::Value;

use crate::models::Lead;

/// Custom-data key holding a lead's next follow-up.
pub const NEXT_FOLLOW_UP_KEY: &str = "nextFollowUpAt";

/// Follow-up bucket relative to a reference date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FollowUpBucket {
    Today,
    Tomorrow,
    Upcoming,
    Overdue,
}

impl FollowUpBucket {
    pub const ALL: [FollowUpBucket; 4] = [
        FollowUpBucket::Overdue,
        FollowUpBucket::Today,
        FollowUpBucket::Tomorrow,
        FollowUpBucket::Upcoming,
    ];

    /// Bucket of a follow-up due on `due`, seen from `reference`.
    pub fn classify(due: Date, reference: Date) -> Self {
        if due < reference {
            FollowUpBucket::Overdue
        } else if due == reference {
            FollowUpBucket::Today
        } else if reference.tomorrow().is_ok_and(|t| t == due) {
            FollowUpBucket::Tomorrow
        } else {
            FollowUpBucket::Upcoming
        }
    }
}

impl fmt::Display for FollowUpBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            FollowUpBucket::Today => "Today",
            FollowUpBucket::Tomorrow => "Tomorrow",
            FollowUpBucket::Upcoming => "Upcoming",
            FollowUpBucket::Overdue => "Overdue",
        };
        f.write_str(label)
    }
}

/// A lead with a parsed follow-up date.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FollowUp {
    pub lead: Lead,
    pub due: Date,
}

/// Leads partitioned by follow-up date, each bucket sorted by due date.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FollowUpBuckets {
    pub reference_date: Option<Date>,
    pub today: Vec<FollowUp>,
    pub tomorrow: Vec<FollowUp>,
    pub upcoming: Vec<FollowUp>,
    pub overdue: Vec<FollowUp>,
}

impl FollowUpBuckets {
    pub fn get(&self, bucket: FollowUpBucket) -> &[FollowUp] {
        match bucket {
            FollowUpBucket::Today => &self.today,
            FollowUpBucket::Tomorrow => &self.tomorrow,
            FollowUpBucket::Upcoming => &self.upcoming,
            FollowUpBucket::Overdue => &self.overdue,
        }
    }

    fn get_mut(&mut self, bucket: FollowUpBucket) -> &mut Vec<FollowUp> {
        match bucket {
            FollowUpBucket::Today => &mut self.today,
            FollowUpBucket::Tomorrow => &mut self.tomorrow,
            FollowUpBucket::Upcoming => &mut self.upcoming,
            FollowUpBucket::Overdue => &mut self.overdue,
        }
    }

    pub fn len(&self) -> usize {
        FollowUpBucket::ALL.iter().map(|b| self.get(*b).len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Date of a follow-up value in `tz`. Accepts an RFC 3339 instant, a civil
/// `YYYY-MM-DDTHH:MM[:SS]` datetime, or a plain date.
pub fn follow_up_date(value: &Value, tz: &TimeZone) -> Option<Date> {
    let raw = value.as_str()?.trim();
    if let Ok(instant) = raw.parse::<Timestamp>() {
        return Some(instant.to_zoned(tz.clone()).date());
    }
    if let Ok(datetime) = raw.parse::<DateTime>() {
        return Some(datetime.date());
    }
    raw.parse::<Date>().ok()
}

/// Partitions `leads` into follow-up buckets around `reference`. Leads
/// without a parseable [`NEXT_FOLLOW_UP_KEY`] value are left out.
pub fn partition_follow_ups<'a>(
    leads: impl IntoIterator<Item = &'a Lead>,
    reference: Date,
    tz: &TimeZone,
) -> FollowUpBuckets {
    let mut buckets = FollowUpBuckets {
        reference_date: Some(reference),
        ..Default::default()
    };
    for lead in leads {
        let Some(due) = lead
            .custom_data
            .get(NEXT_FOLLOW_UP_KEY)
            .and_then(|value| follow_up_date(value, tz))
        else {
            continue;
        };
        buckets
            .get_mut(FollowUpBucket::classify(due, reference))
            .push(FollowUp {
                lead: lead.clone(),
                due,
            });
    }
    for bucket in FollowUpBucket::ALL {
        buckets
            .get_mut(bucket)
            .sort_by(|a, b| a.due.cmp(&b.due).then_with(|| a.lead.id.cmp(&b.lead.id)));
    }
    buckets
}

#[cfg(test)]
mod tests {
    use jiff::civil::date;
    use serde_json::json;

    use super::*;
    use crate::models::FieldData;

    fn lead(id: &str, follow_up: Option<Value>) -> Lead {
        let mut custom_data = FieldData::new();
        if let Some(value) = follow_up {
            custom_data.insert(NEXT_FOLLOW_UP_KEY.to_string(), value);
        }
        Lead {
            id: id.to_string(),
            owner_id: "u1".to_string(),
            watchers: Vec::new(),
            project: None,
            current_status_id: None,
            custom_data,
            status_history: Vec::new(),
            created_at: Timestamp::UNIX_EPOCH,
            updated_at: Timestamp::UNIX_EPOCH,
        }
    }

    #[test]
    fn test_partition_by_reference_date() {
        let leads = vec![
            lead("a", Some(json!("2024-03-01"))),
            lead("b", Some(json!("2024-03-02T09:00"))),
            lead("c", Some(json!("2024-03-10"))),
            lead("d", Some(json!("2024-02-27"))),
            lead("e", None),
            lead("f", Some(json!("next week"))),
            lead("g", Some(json!("2024-03-01T23:30:00Z"))),
        ];

        let buckets = partition_follow_ups(&leads, date(2024, 3, 1), &TimeZone::UTC);
        let ids = |bucket: FollowUpBucket| {
            buckets
                .get(bucket)
                .iter()
                .map(|f| f.lead.id.as_str())
                .collect::<Vec<_>>()
        };

        assert_eq!(ids(FollowUpBucket::Today), vec!["a", "g"]);
        assert_eq!(ids(FollowUpBucket::Tomorrow), vec!["b"]);
        assert_eq!(ids(FollowUpBucket::Upcoming), vec!["c"]);
        assert_eq!(ids(FollowUpBucket::Overdue), vec!["d"]);
        assert_eq!(buckets.len(), 5);
    }

    #[test]
    fn test_instant_is_read_in_given_timezone() {
        let tz = TimeZone::fixed(jiff::tz::offset(5));
        let value = json!("2024-03-01T20:00:00Z");
        assert_eq!(follow_up_date(&value, &tz), Some(date(2024, 3, 2)));
        assert_eq!(follow_up_date(&json!(42), &tz), None);
    }
}
