//! Staff attendance records.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{Resource, ResourceKind};
use crate::domain::EntityId;

/// Attendance outcome for one actor on one day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttendanceStatus {
    /// Worked the shift.
    Present,
    /// Missed the shift.
    Absent,
    /// On approved leave.
    Leave,
}

/// One attendance entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attendance {
    /// Server-assigned id.
    pub id: EntityId,
    /// Actor the entry is about.
    pub user_id: EntityId,
    /// Shop the shift belongs to.
    pub shop_id: EntityId,
    /// Shift date.
    pub date: NaiveDate,
    /// Recorded outcome.
    pub status: AttendanceStatus,
}

/// Payload for `POST /attendance/create`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttendanceDraft {
    /// Actor the entry is about.
    pub user_id: EntityId,
    /// Shop the shift belongs to.
    pub shop_id: EntityId,
    /// Shift date.
    pub date: NaiveDate,
    /// Recorded outcome.
    pub status: AttendanceStatus,
}

/// Partial update for `PATCH /attendance/{id}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AttendancePatch {
    /// Corrected outcome.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<AttendanceStatus>,
}

impl Resource for Attendance {
    type Draft = AttendanceDraft;
    type Patch = AttendancePatch;

    const KIND: ResourceKind = ResourceKind::Attendance;

    fn id(&self) -> EntityId {
        self.id
    }

    fn scope_id(&self) -> EntityId {
        self.shop_id
    }
}
