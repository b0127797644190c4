// Point lookups: the cost of one night for a room type on a given date.

use crate::resort::{Points, RoomType};
use chrono::DateTime;
use chrono_tz::Tz;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PointsError {
    // Expected once the scan walks past the published chart or the lookahead horizon
    #[error("Points not available")]
    Unavailable,

    #[error("Lookup failed for {room_type}: {reason}")]
    Lookup { room_type: String, reason: String },
}

// Anything that can price a single night for a room type
pub trait PointSource: Send + Sync {
    fn points_for_night(
        &self,
        room_type: &RoomType,
        date: &DateTime<Tz>,
    ) -> Result<Points, PointsError>;
}

impl<S: PointSource + ?Sized> PointSource for &S {
    fn points_for_night(
        &self,
        room_type: &RoomType,
        date: &DateTime<Tz>,
    ) -> Result<Points, PointsError> {
        (**self).points_for_night(room_type, date)
    }
}

impl<S: PointSource + ?Sized> PointSource for Box<S> {
    fn points_for_night(
        &self,
        room_type: &RoomType,
        date: &DateTime<Tz>,
    ) -> Result<Points, PointsError> {
        (**self).points_for_night(room_type, date)
    }
}

/// Prices nights from the room type's own point chart.
///
/// Blocks are checked in chart order and the first block strictly containing the date
/// wins. Charts are not required to be sorted.
#[derive(Debug, Default, Clone, Copy)]
pub struct ChartPointSource;

impl PointSource for ChartPointSource {
    fn points_for_night(
        &self,
        room_type: &RoomType,
        date: &DateTime<Tz>,
    ) -> Result<Points, PointsError> {
        for block in &room_type.point_chart {
            if block.is_inverted() {
                return Err(PointsError::Lookup {
                    room_type: room_type.name.clone(),
                    reason: format!(
                        "point block ends ({}) before it starts ({})",
                        block.end_date, block.start_date
                    ),
                });
            }

            if block.contains(date) {
                return Ok(block.points_on(date));
            }
        }

        Err(PointsError::Unavailable)
    }
}

// Same cost every night up to and including `horizon`, ignoring the room's chart.
// Pairs with the stub provider, whose room types carry no chart at all.
#[derive(Debug, Clone)]
pub struct FlatRatePointSource {
    pub points: Points,
    pub horizon: DateTime<Tz>,
}

impl FlatRatePointSource {
    pub fn new(points: Points, horizon: DateTime<Tz>) -> Self {
        Self { points, horizon }
    }
}

impl PointSource for FlatRatePointSource {
    fn points_for_night(
        &self,
        _room_type: &RoomType,
        date: &DateTime<Tz>,
    ) -> Result<Points, PointsError> {
        if *date > self.horizon {
            return Err(PointsError::Unavailable);
        }
        Ok(self.points)
    }
}

// Caps another source at a fixed horizon so a scan always ends
#[derive(Debug, Clone)]
pub struct Lookahead<S> {
    inner: S,
    horizon: DateTime<Tz>,
}

impl<S: PointSource> Lookahead<S> {
    pub fn new(inner: S, horizon: DateTime<Tz>) -> Self {
        Self { inner, horizon }
    }
}

impl<S: PointSource> PointSource for Lookahead<S> {
    fn points_for_night(
        &self,
        room_type: &RoomType,
        date: &DateTime<Tz>,
    ) -> Result<Points, PointsError> {
        if *date > self.horizon {
            return Err(PointsError::Unavailable);
        }
        self.inner.points_for_night(room_type, date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resort::PointBlock;
    use chrono::TimeZone;
    use chrono_tz::America::New_York;

    fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Tz> {
        New_York.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    fn block(start: DateTime<Tz>, end: DateTime<Tz>, weekday: Points, weekend: Points) -> PointBlock {
        PointBlock {
            start_date: start.fixed_offset(),
            end_date: end.fixed_offset(),
            weekday_points: weekday,
            weekend_points: weekend,
        }
    }

    fn room(chart: Vec<PointBlock>) -> RoomType {
        RoomType {
            name: "Deluxe Studio".to_string(),
            description: "Sleeps 4".to_string(),
            view_type: "Preferred View".to_string(),
            point_chart: chart,
        }
    }

    fn two_season_room() -> RoomType {
        room(vec![
            block(at(2026, 9, 1, 0), at(2026, 10, 1, 0), 14, 18),
            block(at(2026, 10, 1, 0), at(2026, 11, 1, 0), 17, 20),
        ])
    }

    #[test]
    fn test_chart_lookup_picks_containing_block() {
        let room = two_season_room();
        let source = ChartPointSource;

        // 2026-09-16 is a Wednesday, 2026-10-16 a Friday
        assert_eq!(source.points_for_night(&room, &at(2026, 9, 16, 15)), Ok(14));
        assert_eq!(source.points_for_night(&room, &at(2026, 10, 16, 15)), Ok(20));
    }

    #[test]
    fn test_shared_boundary_is_unavailable() {
        let room = two_season_room();
        let source = ChartPointSource;

        assert_eq!(
            source.points_for_night(&room, &at(2026, 10, 1, 0)),
            Err(PointsError::Unavailable)
        );
        assert_eq!(
            source.points_for_night(&room, &at(2026, 9, 1, 0)),
            Err(PointsError::Unavailable)
        );
    }

    #[test]
    fn test_outside_chart_is_unavailable() {
        let source = ChartPointSource;
        assert_eq!(
            source.points_for_night(&two_season_room(), &at(2027, 1, 5, 12)),
            Err(PointsError::Unavailable)
        );
        assert_eq!(
            source.points_for_night(&room(vec![]), &at(2026, 9, 16, 12)),
            Err(PointsError::Unavailable)
        );
    }

    #[test]
    fn test_lookup_is_repeatable() {
        let room = two_season_room();
        let date = at(2026, 10, 17, 8);
        let first = ChartPointSource.points_for_night(&room, &date);
        let second = ChartPointSource.points_for_night(&room, &date);
        assert_eq!(first, second);
    }

    #[test]
    fn test_overlapping_blocks_first_match_wins() {
        let room = room(vec![
            block(at(2026, 9, 1, 0), at(2026, 9, 30, 0), 10, 10),
            block(at(2026, 9, 15, 0), at(2026, 10, 15, 0), 99, 99),
        ]);
        assert_eq!(ChartPointSource.points_for_night(&room, &at(2026, 9, 20, 12)), Ok(10));
        assert_eq!(ChartPointSource.points_for_night(&room, &at(2026, 10, 5, 12)), Ok(99));
    }

    #[test]
    fn test_inverted_block_is_lookup_error() {
        let room = room(vec![block(at(2026, 10, 1, 0), at(2026, 9, 1, 0), 14, 18)]);
        let result = ChartPointSource.points_for_night(&room, &at(2026, 9, 16, 12));
        assert!(matches!(result, Err(PointsError::Lookup { ref room_type, .. }) if room_type == "Deluxe Studio"));
    }

    #[test]
    fn test_flat_rate_stops_after_horizon() {
        let source = FlatRatePointSource::new(19, at(2026, 11, 19, 12));
        let room = room(vec![]);

        assert_eq!(source.points_for_night(&room, &at(2026, 10, 19, 12)), Ok(19));
        assert_eq!(source.points_for_night(&room, &at(2026, 11, 19, 12)), Ok(19));
        assert_eq!(
            source.points_for_night(&room, &at(2026, 11, 20, 12)),
            Err(PointsError::Unavailable)
        );
    }

    #[test]
    fn test_lookahead_caps_inner_source() {
        let room = two_season_room();
        let source = Lookahead::new(ChartPointSource, at(2026, 10, 10, 0));

        assert_eq!(source.points_for_night(&room, &at(2026, 10, 5, 12)), Ok(17));
        assert_eq!(
            source.points_for_night(&room, &at(2026, 10, 12, 12)),
            Err(PointsError::Unavailable)
        );
    }
}
