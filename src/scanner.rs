// Trip scanner: walks each room type's nights forward from a start date, accumulating
// points until the next night would push the total over the goal, then reports the
// window and starts a new one on that same night.

use crate::point_source::{PointSource, PointsError};
use crate::report::TripReporter;
use crate::resort::{Points, Resort, RoomType, Trip};
use chrono::{DateTime, Days, Duration, NaiveDate, TimeZone, Utc};
use chrono_tz::Tz;
use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Failed to report trip: {0}")]
    Report(#[from] std::io::Error),

    #[error("Scan task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

// Settings shared by every pair in a run
#[derive(Debug, Clone, Copy)]
pub struct ScanContext {
    pub goal_points: Points,
    pub time_zone: Tz,
}

impl ScanContext {
    pub fn new(goal_points: Points, time_zone: Tz) -> Self {
        Self {
            goal_points,
            time_zone,
        }
    }

    pub fn now(&self) -> DateTime<Tz> {
        Utc::now().with_timezone(&self.time_zone)
    }

    // Same wall-clock time one calendar day from now
    pub fn tomorrow(&self) -> DateTime<Tz> {
        let now = self.now();
        now.checked_add_days(Days::new(1))
            .unwrap_or_else(|| now + Duration::days(1))
    }

    /// Scan start for an explicit calendar date.
    ///
    /// Anchored at noon so charts whose blocks change over at midnight still strictly
    /// contain the first night.
    pub fn anchor(&self, date: NaiveDate) -> Option<DateTime<Tz>> {
        let noon = date.and_hms_opt(12, 0, 0)?;
        self.time_zone.from_local_datetime(&noon).earliest()
    }
}

// Why a pair's scan ended
#[derive(Debug, Clone, PartialEq)]
pub enum ScanStop {
    Unavailable,
    LookupFailed(PointsError),
    // a night costs more than the goal on its own, so no window can start on it
    NightExceedsGoal { date: DateTime<Tz>, points: Points },
    CalendarOverflow { date: DateTime<Tz> },
}

impl ScanStop {
    pub fn is_error(&self) -> bool {
        !matches!(self, ScanStop::Unavailable)
    }
}

#[derive(Debug, Clone, Copy)]
struct Cursor {
    current: DateTime<Tz>,
    trip_start: DateTime<Tz>,
    running: u64,
}

#[derive(Debug, Clone)]
enum ScanState {
    Scanning(Cursor),
    Stopped(ScanStop),
}

enum Step {
    Emit(Trip),
    Advanced,
    Stopped,
}

/// The trips found for one resort and room type, in chronological order.
///
/// Each call to `next` drives the scan until a trip is emitted or the point source
/// runs out; afterwards [`TripWindows::stop`] tells why the scan ended.
pub struct TripWindows<'a, S: ?Sized> {
    source: &'a S,
    resort: &'a Resort,
    room_type: &'a RoomType,
    goal_points: Points,
    state: ScanState,
}

impl<'a, S: PointSource + ?Sized> TripWindows<'a, S> {
    pub fn new(
        source: &'a S,
        context: &ScanContext,
        resort: &'a Resort,
        room_type: &'a RoomType,
        start: DateTime<Tz>,
    ) -> Self {
        Self {
            source,
            resort,
            room_type,
            goal_points: context.goal_points,
            state: ScanState::Scanning(Cursor {
                current: start,
                trip_start: start,
                running: 0,
            }),
        }
    }

    pub fn stop(&self) -> Option<&ScanStop> {
        match &self.state {
            ScanState::Stopped(stop) => Some(stop),
            ScanState::Scanning(_) => None,
        }
    }

    fn halt(&mut self, stop: ScanStop) -> Step {
        self.state = ScanState::Stopped(stop);
        Step::Stopped
    }

    fn step(&mut self) -> Step {
        let mut cursor = match &self.state {
            ScanState::Scanning(cursor) => *cursor,
            ScanState::Stopped(_) => return Step::Stopped,
        };

        let points = match self.source.points_for_night(self.room_type, &cursor.current) {
            Ok(points) => points,
            Err(PointsError::Unavailable) => return self.halt(ScanStop::Unavailable),
            Err(err) => {
                tracing::error!(
                    resort = %self.resort.name,
                    room_type = %self.room_type.name,
                    date = %cursor.current.format("%Y-%m-%d"),
                    error = %err,
                    "Error getting points"
                );
                return self.halt(ScanStop::LookupFailed(err));
            }
        };

        if cursor.running + u64::from(points) > u64::from(self.goal_points) {
            if cursor.trip_start == cursor.current {
                tracing::warn!(
                    resort = %self.resort.name,
                    room_type = %self.room_type.name,
                    date = %cursor.current.format("%Y-%m-%d"),
                    points,
                    goal_points = self.goal_points,
                    "Single night exceeds goal, ending scan"
                );
                return self.halt(ScanStop::NightExceedsGoal {
                    date: cursor.current,
                    points,
                });
            }

            // running never exceeds the goal, so it fits in Points
            let trip = Trip::new(
                self.resort,
                self.room_type,
                cursor.trip_start,
                cursor.current,
                cursor.running as Points,
            );

            // the overflowing night is re-evaluated as the first night of the next window
            cursor.running = 0;
            cursor.trip_start = cursor.current;
            self.state = ScanState::Scanning(cursor);
            return Step::Emit(trip);
        }

        cursor.running += u64::from(points);
        match cursor.current.checked_add_days(Days::new(1)) {
            Some(next) => {
                cursor.current = next;
                self.state = ScanState::Scanning(cursor);
                Step::Advanced
            }
            None => self.halt(ScanStop::CalendarOverflow {
                date: cursor.current,
            }),
        }
    }
}

impl<'a, S: PointSource + ?Sized> Iterator for TripWindows<'a, S> {
    type Item = Trip;

    fn next(&mut self) -> Option<Trip> {
        loop {
            match self.step() {
                Step::Emit(trip) => return Some(trip),
                Step::Advanced => continue,
                Step::Stopped => return None,
            }
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ScanSummary {
    pub pairs: usize,
    pub trips: usize,
    pub stopped_early: usize,
}

impl ScanSummary {
    fn record(&mut self, trips: usize, stop: Option<&ScanStop>) {
        self.pairs += 1;
        self.trips += trips;
        if stop.is_some_and(ScanStop::is_error) {
            self.stopped_early += 1;
        }
    }
}

// Runs every (resort, room type) pair in source order, reporting trips as they are found
pub struct TripScanner<'a, S: ?Sized> {
    source: &'a S,
    context: &'a ScanContext,
}

impl<'a, S: PointSource + ?Sized> TripScanner<'a, S> {
    pub fn new(source: &'a S, context: &'a ScanContext) -> Self {
        Self { source, context }
    }

    pub fn windows<'r>(
        &self,
        resort: &'r Resort,
        room_type: &'r RoomType,
        start: DateTime<Tz>,
    ) -> TripWindows<'r, S>
    where
        'a: 'r,
    {
        TripWindows::new(self.source, self.context, resort, room_type, start)
    }

    pub fn scan<R: TripReporter + ?Sized>(
        &self,
        resorts: &[Resort],
        start: DateTime<Tz>,
        reporter: &mut R,
    ) -> Result<ScanSummary, ScanError> {
        let mut summary = ScanSummary::default();

        for resort in resorts {
            for room_type in &resort.room_types {
                let mut windows = self.windows(resort, room_type, start);
                let mut trips = 0;
                for trip in windows.by_ref() {
                    reporter.report(&trip)?;
                    trips += 1;
                }

                tracing::debug!(
                    resort = %resort.name,
                    room_type = %room_type.name,
                    trips,
                    stop = ?windows.stop(),
                    "Finished room type"
                );
                summary.record(trips, windows.stop());
            }
        }

        Ok(summary)
    }
}

/// Scans every pair on the blocking thread pool and reports once all are done.
///
/// Pairs share no state, so they run independently; trips are still reported in the
/// same order as [`TripScanner::scan`] would produce them.
pub async fn scan_concurrently<S, R>(
    source: Arc<S>,
    context: ScanContext,
    resorts: Arc<Vec<Resort>>,
    start: DateTime<Tz>,
    reporter: &mut R,
) -> Result<ScanSummary, ScanError>
where
    S: PointSource + 'static,
    R: TripReporter + ?Sized,
{
    let mut tasks = Vec::new();
    for (resort_idx, resort) in resorts.iter().enumerate() {
        for room_idx in 0..resort.room_types.len() {
            let source = Arc::clone(&source);
            let resorts = Arc::clone(&resorts);

            tasks.push(tokio::task::spawn_blocking(move || {
                let resort = &resorts[resort_idx];
                let room_type = &resort.room_types[room_idx];
                let mut windows = TripWindows::new(&*source, &context, resort, room_type, start);
                let trips: Vec<Trip> = windows.by_ref().collect();
                (trips, windows.stop().cloned())
            }));
        }
    }

    let mut summary = ScanSummary::default();
    for result in futures::future::join_all(tasks).await {
        let (trips, stop) = result?;
        for trip in &trips {
            reporter.report(trip)?;
        }
        summary.record(trips.len(), stop.as_ref());
    }

    Ok(summary)
}
