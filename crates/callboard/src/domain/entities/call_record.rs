//! CallRecord - Finalized outcome of one call session
//!
//! Pure domain entity without infrastructure dependencies.
//! A record is immutable once built; every constructor (including
//! deserialization) checks the outcome/status pairing and the order total.

use std::collections::HashSet;

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use uuid::{NoContext, Timestamp, Uuid};

use crate::domain::entities::{order_total, OrderLine};
use crate::domain::errors::DomainError;
use crate::domain::value_objects::{CallOutcome, MissedAttempt, OrderStatus, RoomNumber};

/// Attempt number stamped on every record; attempts are not correlated per room.
pub const DEFAULT_ATTEMPT_NUMBER: u32 = 1;

/// The legal combinations of outcome and order status
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallDisposition {
    /// Nobody answered (status `NoResponse`)
    NotPicked(MissedAttempt),
    /// Guest answered but did not order
    NotOrdered,
    /// Guest answered and ordered these lines (never empty)
    Ordered(Vec<OrderLine>),
}

impl CallDisposition {
    pub fn outcome(&self) -> CallOutcome {
        match self {
            CallDisposition::NotPicked(attempt) => CallOutcome::from(*attempt),
            CallDisposition::NotOrdered | CallDisposition::Ordered(_) => CallOutcome::Picked,
        }
    }

    pub fn order_status(&self) -> OrderStatus {
        match self {
            CallDisposition::NotPicked(_) => OrderStatus::NoResponse,
            CallDisposition::NotOrdered => OrderStatus::NotOrdered,
            CallDisposition::Ordered(_) => OrderStatus::Ordered,
        }
    }

    pub fn lines(&self) -> &[OrderLine] {
        match self {
            CallDisposition::Ordered(lines) => lines,
            _ => &[],
        }
    }
}

/// CallRecord - What happened on one call to a room
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "CallRecordData", into = "CallRecordData")]
pub struct CallRecord {
    id: Uuid,
    room_number: RoomNumber,
    created_at: DateTime<Utc>,
    attempt_number: u32,
    disposition: CallDisposition,
    total_amount: u64,
}

impl CallRecord {
    /// Build a record; `created_at` is kept at millisecond precision and the
    /// id is a UUIDv7 derived from it
    pub fn new(
        room_number: RoomNumber,
        disposition: CallDisposition,
        created_at: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        let created_at = created_at.trunc_subsecs(3);
        Self::assemble(
            time_derived_id(created_at),
            room_number,
            created_at,
            DEFAULT_ATTEMPT_NUMBER,
            disposition,
        )
    }

    /// Record for a call nobody answered
    pub fn missed(room_number: RoomNumber, attempt: MissedAttempt, created_at: DateTime<Utc>) -> Self {
        let created_at = created_at.trunc_subsecs(3);
        Self {
            id: time_derived_id(created_at),
            room_number,
            created_at,
            attempt_number: DEFAULT_ATTEMPT_NUMBER,
            disposition: CallDisposition::NotPicked(attempt),
            total_amount: 0,
        }
    }

    /// Record for an answered call without an order
    pub fn not_ordered(room_number: RoomNumber, created_at: DateTime<Utc>) -> Self {
        let created_at = created_at.trunc_subsecs(3);
        Self {
            id: time_derived_id(created_at),
            room_number,
            created_at,
            attempt_number: DEFAULT_ATTEMPT_NUMBER,
            disposition: CallDisposition::NotOrdered,
            total_amount: 0,
        }
    }

    /// Record for an answered call with an order; fails on empty or
    /// malformed lines
    pub fn ordered(
        room_number: RoomNumber,
        lines: Vec<OrderLine>,
        created_at: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        Self::new(room_number, CallDisposition::Ordered(lines), created_at)
    }

    fn assemble(
        id: Uuid,
        room_number: RoomNumber,
        created_at: DateTime<Utc>,
        attempt_number: u32,
        disposition: CallDisposition,
    ) -> Result<Self, DomainError> {
        if attempt_number == 0 {
            return Err(DomainError::validation("attempt number must be positive"));
        }
        if let CallDisposition::Ordered(lines) = &disposition {
            validate_lines(lines)?;
        }

        let total_amount = order_total(disposition.lines());
        Ok(Self {
            id,
            room_number,
            created_at,
            attempt_number,
            disposition,
            total_amount,
        })
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn room_number(&self) -> &RoomNumber {
        &self.room_number
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn attempt_number(&self) -> u32 {
        self.attempt_number
    }

    pub fn disposition(&self) -> &CallDisposition {
        &self.disposition
    }

    pub fn outcome(&self) -> CallOutcome {
        self.disposition.outcome()
    }

    pub fn order_status(&self) -> OrderStatus {
        self.disposition.order_status()
    }

    pub fn ordered_lines(&self) -> &[OrderLine] {
        self.disposition.lines()
    }

    pub fn total_amount(&self) -> u64 {
        self.total_amount
    }
}

fn time_derived_id(created_at: DateTime<Utc>) -> Uuid {
    let seconds = u64::try_from(created_at.timestamp()).unwrap_or(0);
    let ts = Timestamp::from_unix(NoContext, seconds, created_at.timestamp_subsec_nanos());
    Uuid::new_v7(ts)
}

fn validate_lines(lines: &[OrderLine]) -> Result<(), DomainError> {
    if lines.is_empty() {
        return Err(DomainError::validation("an order needs at least one line"));
    }

    let mut seen = HashSet::new();
    for line in lines {
        if line.quantity == 0 {
            return Err(DomainError::validation(format!(
                "line '{}' has zero quantity",
                line.id
            )));
        }
        if !seen.insert(line.id.as_str()) {
            return Err(DomainError::validation(format!(
                "item '{}' appears on two lines",
                line.id
            )));
        }
    }
    Ok(())
}

/// Flat stored shape of a record
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallRecordData {
    pub id: Uuid,
    pub room_number: RoomNumber,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
    pub attempt_number: u32,
    pub outcome: CallOutcome,
    pub order_status: OrderStatus,
    #[serde(default)]
    pub ordered_lines: Vec<OrderLine>,
    pub total_amount: u64,
}

impl TryFrom<CallRecordData> for CallRecord {
    type Error = DomainError;

    fn try_from(data: CallRecordData) -> Result<Self, Self::Error> {
        let disposition = match (data.outcome.missed_attempt(), data.order_status) {
            (Some(attempt), OrderStatus::NoResponse) => CallDisposition::NotPicked(attempt),
            (None, OrderStatus::NotOrdered) => CallDisposition::NotOrdered,
            (None, OrderStatus::Ordered) => CallDisposition::Ordered(data.ordered_lines.clone()),
            (_, status) => {
                return Err(DomainError::validation(format!(
                    "record {}: status '{}' is not allowed with outcome '{}'",
                    data.id, status, data.outcome
                )))
            }
        };

        if !matches!(disposition, CallDisposition::Ordered(_)) && !data.ordered_lines.is_empty() {
            return Err(DomainError::validation(format!(
                "record {}: only ordered calls carry lines",
                data.id
            )));
        }

        let record = Self::assemble(
            data.id,
            data.room_number,
            data.created_at,
            data.attempt_number,
            disposition,
        )?;

        if record.total_amount != data.total_amount {
            return Err(DomainError::validation(format!(
                "record {}: total {} does not match its lines ({})",
                data.id, data.total_amount, record.total_amount
            )));
        }

        Ok(record)
    }
}

impl From<CallRecord> for CallRecordData {
    fn from(record: CallRecord) -> Self {
        let outcome = record.outcome();
        let order_status = record.order_status();
        let ordered_lines = match record.disposition {
            CallDisposition::Ordered(lines) => lines,
            _ => Vec::new(),
        };

        Self {
            id: record.id,
            room_number: record.room_number,
            created_at: record.created_at,
            attempt_number: record.attempt_number,
            outcome,
            order_status,
            ordered_lines,
            total_amount: record.total_amount,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::MenuItem;
    use chrono::TimeZone;

    fn room() -> RoomNumber {
        RoomNumber::parse("101").unwrap()
    }

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 14, 9, 30, 0).unwrap()
    }

    fn line(id: &str, price: u64, quantity: u32) -> OrderLine {
        let mut line = OrderLine::from_item(&MenuItem::new(id, "DESSERT", id, price));
        line.quantity = quantity;
        line
    }

    #[test]
    fn test_ordered_total_is_derived_from_lines() {
        let record =
            CallRecord::ordered(room(), vec![line("ds1", 25, 2), line("hb2", 10, 1)], at()).unwrap();
        assert_eq!(record.total_amount(), 60);
        assert_eq!(record.outcome(), CallOutcome::Picked);
        assert_eq!(record.order_status(), OrderStatus::Ordered);
        assert_eq!(record.attempt_number(), 1);
    }

    #[test]
    fn test_ordered_rejects_empty_and_zero_lines() {
        assert!(CallRecord::ordered(room(), vec![], at()).is_err());
        assert!(CallRecord::ordered(room(), vec![line("ds1", 25, 0)], at()).is_err());
        assert!(
            CallRecord::ordered(room(), vec![line("ds1", 25, 1), line("ds1", 25, 1)], at()).is_err()
        );
    }

    #[test]
    fn test_missed_record_has_no_response() {
        let record = CallRecord::missed(room(), MissedAttempt::Final, at());
        assert_eq!(record.outcome(), CallOutcome::NotPickedFinal);
        assert_eq!(record.order_status(), OrderStatus::NoResponse);
        assert!(record.ordered_lines().is_empty());
        assert_eq!(record.total_amount(), 0);
    }

    #[test]
    fn test_id_is_time_ordered() {
        let first = CallRecord::not_ordered(room(), at());
        let second = CallRecord::not_ordered(room(), at() + chrono::Duration::milliseconds(5));
        assert_ne!(first.id(), second.id());
        assert!(first.id() < second.id());
    }

    #[test]
    fn test_json_shape_round_trips() {
        let record = CallRecord::ordered(room(), vec![line("ds1", 25, 2)], at()).unwrap();
        let json = serde_json::to_value(&record).unwrap();

        assert_eq!(json["roomNumber"], "101");
        assert_eq!(json["createdAt"], at().timestamp_millis());
        assert_eq!(json["outcome"], "picked");
        assert_eq!(json["orderStatus"], "ordered");
        assert_eq!(json["totalAmount"], 50);

        let decoded: CallRecord = serde_json::from_value(json).unwrap();
        assert_eq!(decoded, record);
    }

    #[test]
    fn test_decode_rejects_mismatched_total() {
        let record = CallRecord::ordered(room(), vec![line("ds1", 25, 2)], at()).unwrap();
        let mut json = serde_json::to_value(&record).unwrap();
        json["totalAmount"] = serde_json::json!(49);
        assert!(serde_json::from_value::<CallRecord>(json).is_err());
    }

    #[test]
    fn test_decode_rejects_illegal_status_pairs() {
        let record = CallRecord::not_ordered(room(), at());
        let mut json = serde_json::to_value(&record).unwrap();
        json["orderStatus"] = serde_json::json!("no_response");
        assert!(serde_json::from_value::<CallRecord>(json).is_err());

        let record = CallRecord::missed(room(), MissedAttempt::First, at());
        let mut json = serde_json::to_value(&record).unwrap();
        json["orderStatus"] = serde_json::json!("not_ordered");
        assert!(serde_json::from_value::<CallRecord>(json).is_err());
    }
}
