// Resort data compiled into the binary. Charts are built from a shared season calendar
// and a per-room table of (weekday, weekend) costs for each travel period.

use crate::provider::{ReferenceDataError, ReferenceDataProvider};
use crate::resort::{PointBlock, Points, Resort, RoomType};
use chrono::{DateTime, FixedOffset, NaiveDate, TimeZone};
use chrono_tz::Tz;

pub const CHART_YEARS: [i32; 2] = [2026, 2027];

// Season start (month, day) and its travel period; each season runs until the next
// one starts, the last until January 1st of the following year
const SEASONS: [(u32, u32, usize); 9] = [
    (1, 1, 1),
    (2, 1, 3),
    (4, 1, 4),
    (6, 1, 3),
    (8, 15, 1),
    (10, 1, 2),
    (11, 22, 3),
    (12, 1, 2),
    (12, 24, 5),
];

type Tiers = [(Points, Points); 5];

struct RoomSpec {
    name: &'static str,
    description: &'static str,
    view_type: &'static str,
    tiers: Tiers,
}

struct ResortSpec {
    name: &'static str,
    rooms: &'static [RoomSpec],
}

const RESORTS: &[ResortSpec] = &[
    ResortSpec {
        name: "Bay Lake Tower",
        rooms: &[
            RoomSpec {
                name: "Deluxe Studio",
                description: "Sleeps up to 4",
                view_type: "Standard View",
                tiers: [(13, 17), (15, 19), (17, 20), (19, 23), (22, 26)],
            },
            RoomSpec {
                name: "Deluxe Studio",
                description: "Sleeps up to 4",
                view_type: "Lake View",
                tiers: [(16, 21), (18, 23), (21, 25), (23, 28), (27, 32)],
            },
            RoomSpec {
                name: "One-Bedroom Villa",
                description: "Sleeps up to 5",
                view_type: "Standard View",
                tiers: [(27, 33), (31, 38), (35, 42), (39, 47), (45, 54)],
            },
        ],
    },
    ResortSpec {
        name: "Saratoga Springs",
        rooms: &[
            RoomSpec {
                name: "Deluxe Studio",
                description: "Sleeps up to 4",
                view_type: "Preferred View",
                tiers: [(11, 14), (12, 16), (14, 18), (16, 20), (18, 23)],
            },
            RoomSpec {
                name: "Two-Bedroom Villa",
                description: "Sleeps up to 9",
                view_type: "Standard View",
                tiers: [(28, 36), (32, 41), (36, 46), (40, 51), (46, 58)],
            },
        ],
    },
    ResortSpec {
        name: "Old Key West",
        rooms: &[RoomSpec {
            name: "Deluxe Studio",
            description: "Sleeps up to 4",
            view_type: "Standard View",
            tiers: [(9, 12), (11, 14), (12, 16), (14, 18), (16, 21)],
        }],
    },
];

// Built-in resorts with block boundaries at local midnight in `time_zone`
#[derive(Debug, Clone, Copy)]
pub struct EmbeddedProvider {
    time_zone: Tz,
}

impl EmbeddedProvider {
    pub fn new(time_zone: Tz) -> Self {
        Self { time_zone }
    }

    fn midnight(
        &self,
        year: i32,
        month: u32,
        day: u32,
    ) -> Result<DateTime<FixedOffset>, ReferenceDataError> {
        let date = NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| {
            ReferenceDataError::InvalidEmbeddedData(format!("no such date {year}-{month}-{day}"))
        })?;
        let midnight = date.and_hms_opt(0, 0, 0).ok_or_else(|| {
            ReferenceDataError::InvalidEmbeddedData(format!("no midnight on {date}"))
        })?;

        self.time_zone
            .from_local_datetime(&midnight)
            .earliest()
            .map(|local| local.fixed_offset())
            .ok_or_else(|| {
                ReferenceDataError::InvalidEmbeddedData(format!(
                    "{midnight} does not exist in {}",
                    self.time_zone
                ))
            })
    }

    fn chart(&self, tiers: &Tiers) -> Result<Vec<PointBlock>, ReferenceDataError> {
        let mut chart = Vec::with_capacity(CHART_YEARS.len() * SEASONS.len());

        for year in CHART_YEARS {
            for (i, &(month, day, period)) in SEASONS.iter().enumerate() {
                let end_date = match SEASONS.get(i + 1) {
                    Some(&(next_month, next_day, _)) => self.midnight(year, next_month, next_day)?,
                    None => self.midnight(year + 1, 1, 1)?,
                };
                let (weekday_points, weekend_points) = tiers[period - 1];

                chart.push(PointBlock {
                    start_date: self.midnight(year, month, day)?,
                    end_date,
                    weekday_points,
                    weekend_points,
                });
            }
        }

        Ok(chart)
    }
}

impl ReferenceDataProvider for EmbeddedProvider {
    fn load_resorts(&self) -> Result<Vec<Resort>, ReferenceDataError> {
        RESORTS
            .iter()
            .map(|resort| -> Result<Resort, ReferenceDataError> {
                let room_types = resort
                    .rooms
                    .iter()
                    .map(|room| -> Result<RoomType, ReferenceDataError> {
                        Ok(RoomType {
                            name: room.name.to_string(),
                            description: room.description.to_string(),
                            view_type: room.view_type.to_string(),
                            point_chart: self.chart(&room.tiers)?,
                        })
                    })
                    .collect::<Result<Vec<_>, ReferenceDataError>>()?;

                Ok(Resort {
                    name: resort.name.to_string(),
                    room_types,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::point_source::{ChartPointSource, PointSource, PointsError};
    use chrono_tz::America::New_York;

    #[test]
    fn test_embedded_resorts_keep_source_order() {
        let resorts = EmbeddedProvider::new(New_York).load_resorts().unwrap();
        let names: Vec<_> = resorts.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Bay Lake Tower", "Saratoga Springs", "Old Key West"]);
        assert_eq!(resorts[0].room_types[1].view_type, "Lake View");
    }

    #[test]
    fn test_embedded_chart_is_contiguous() {
        let resorts = EmbeddedProvider::new(New_York).load_resorts().unwrap();
        let chart = &resorts[0].room_types[0].point_chart;

        assert_eq!(chart.len(), CHART_YEARS.len() * SEASONS.len());
        for pair in chart.windows(2) {
            assert_eq!(pair[0].end_date, pair[1].start_date);
            assert!(!pair[0].is_inverted());
        }
    }

    #[test]
    fn test_embedded_chart_prices_nights() {
        let resorts = EmbeddedProvider::new(New_York).load_resorts().unwrap();
        let studio = &resorts[0].room_types[0];

        // Wednesday 2026-10-21 falls in period 2, Christmas Eve 2027 (a Friday) in period 5
        let wednesday = New_York.with_ymd_and_hms(2026, 10, 21, 15, 0, 0).unwrap();
        let christmas_eve = New_York.with_ymd_and_hms(2027, 12, 24, 15, 0, 0).unwrap();
        assert_eq!(ChartPointSource.points_for_night(studio, &wednesday), Ok(15));
        assert_eq!(ChartPointSource.points_for_night(studio, &christmas_eve), Ok(26));

        let after_charts = New_York.with_ymd_and_hms(2028, 1, 3, 15, 0, 0).unwrap();
        assert_eq!(
            ChartPointSource.points_for_night(studio, &after_charts),
            Err(PointsError::Unavailable)
        );
    }
}
