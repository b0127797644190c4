// Reference data for the point planner: resorts, their room types and point charts.
// The serialized shape matches the records kept in the resort store (PascalCase keys,
// RFC 3339 timestamps), so the same types back every reference-data provider.

use chrono::{DateTime, Datelike, FixedOffset, TimeZone, Weekday};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

pub type Points = u32;

// A resort and the room types that can be booked there
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Resort {
    pub name: String,
    #[serde(default)]
    pub room_types: Vec<RoomType>,
}

// A room size and view combination with its point chart
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct RoomType {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub view_type: String,
    #[serde(default)]
    pub point_chart: Vec<PointBlock>,
}

// Points needed per night for a room type over a range of dates
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct PointBlock {
    pub start_date: DateTime<FixedOffset>,
    pub end_date: DateTime<FixedOffset>,
    pub weekday_points: Points,
    pub weekend_points: Points,
}

impl PointBlock {
    /// True when `date` lies strictly after the block start and strictly before its end.
    ///
    /// A date sitting exactly on either boundary is not covered by this block.
    pub fn contains<Z: TimeZone>(&self, date: &DateTime<Z>) -> bool {
        let instant = date.naive_utc();
        instant > self.start_date.naive_utc() && instant < self.end_date.naive_utc()
    }

    /// Cost of the night starting on `date`. Friday and Saturday nights use the
    /// weekend rate; the weekday is read in the zone `date` carries.
    pub fn points_on<Z: TimeZone>(&self, date: &DateTime<Z>) -> Points {
        match date.weekday() {
            Weekday::Fri | Weekday::Sat => self.weekend_points,
            _ => self.weekday_points,
        }
    }

    // An end before the start can never match anything and marks a broken chart
    pub fn is_inverted(&self) -> bool {
        self.end_date < self.start_date
    }
}

// A candidate stay found by the scanner. Not persisted, reported as soon as it is built.
#[derive(Debug, Clone, PartialEq)]
pub struct Trip {
    pub resort: String,
    pub room_type: String,
    pub view_type: String,
    pub start: DateTime<Tz>,
    // first night not included in the trip
    pub end: DateTime<Tz>,
    pub nights: i64,
    pub points: Points,
}

impl Trip {
    pub fn new(
        resort: &Resort,
        room_type: &RoomType,
        start: DateTime<Tz>,
        end: DateTime<Tz>,
        points: Points,
    ) -> Self {
        // calendar days, not elapsed hours: a DST change must not add or drop a night
        let nights = (end.date_naive() - start.date_naive()).num_days();
        Self {
            resort: resort.name.clone(),
            room_type: room_type.name.clone(),
            view_type: room_type.view_type.clone(),
            start,
            end,
            nights,
            points,
        }
    }
}
