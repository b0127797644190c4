// Planner configuration, read from the environment (and a `.env` file when present).

use crate::point_source::{ChartPointSource, FlatRatePointSource, Lookahead, PointSource};
use crate::provider::DEFAULT_BUCKET;
use crate::resort::Points;
use crate::scanner::ScanContext;
use chrono::{DateTime, Days, Months, NaiveDate};
use chrono_tz::Tz;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("Invalid {key} value: {value}")]
    InvalidValue { key: &'static str, value: String },

    #[error("No valid scan start on {0}")]
    InvalidStart(NaiveDate),

    #[error("{0} horizon is out of range")]
    HorizonOutOfRange(&'static str),
}

// Where resort data comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataSource {
    Store,
    Embedded,
    Stub,
}

impl FromStr for DataSource {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "store" => Ok(DataSource::Store),
            "embedded" => Ok(DataSource::Embedded),
            "stub" => Ok(DataSource::Stub),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct PlannerConfig {
    pub goal_points: Points,
    // None scans from tomorrow
    pub start_date: Option<NaiveDate>,
    pub time_zone: Tz,
    pub data_source: DataSource,
    pub store_path: PathBuf,
    pub store_bucket: String,
    pub lookahead_days: Option<u64>,
    // nightly cost used with the stub data source
    pub stub_points: Points,
    pub concurrent: bool,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            goal_points: 120,
            start_date: None,
            time_zone: chrono_tz::America::New_York,
            data_source: DataSource::Embedded,
            store_path: PathBuf::from("../dvc-points.db.json"),
            store_bucket: DEFAULT_BUCKET.to_string(),
            lookahead_days: None,
            stub_points: 19,
            concurrent: false,
        }
    }
}

fn parse<T: FromStr>(key: &'static str, value: String) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidValue { key, value })
}

impl PlannerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    // Build from any key lookup; unset keys keep their defaults
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(value) = lookup("PLANNER_GOAL_POINTS") {
            config.goal_points = parse("PLANNER_GOAL_POINTS", value)?;
        }
        if let Some(value) = lookup("PLANNER_START_DATE") {
            config.start_date = Some(parse("PLANNER_START_DATE", value)?);
        }
        if let Some(value) = lookup("PLANNER_TIMEZONE") {
            config.time_zone = parse("PLANNER_TIMEZONE", value)?;
        }
        if let Some(value) = lookup("PLANNER_DATA_SOURCE") {
            config.data_source = parse("PLANNER_DATA_SOURCE", value)?;
        }
        if let Some(value) = lookup("PLANNER_STORE_PATH") {
            config.store_path = PathBuf::from(value);
        }
        if let Some(value) = lookup("PLANNER_STORE_BUCKET") {
            config.store_bucket = value;
        }
        if let Some(value) = lookup("PLANNER_LOOKAHEAD_DAYS") {
            config.lookahead_days = Some(parse("PLANNER_LOOKAHEAD_DAYS", value)?);
        }
        if let Some(value) = lookup("PLANNER_STUB_POINTS") {
            config.stub_points = parse("PLANNER_STUB_POINTS", value)?;
        }
        if let Some(value) = lookup("PLANNER_CONCURRENT") {
            config.concurrent = parse("PLANNER_CONCURRENT", value)?;
        }

        Ok(config)
    }

    pub fn scan_context(&self) -> ScanContext {
        ScanContext::new(self.goal_points, self.time_zone)
    }

    pub fn scan_start(&self, context: &ScanContext) -> Result<DateTime<Tz>, ConfigError> {
        match self.start_date {
            Some(date) => context.anchor(date).ok_or(ConfigError::InvalidStart(date)),
            None => Ok(context.tomorrow()),
        }
    }

    /// Point source for this run.
    ///
    /// The stub data source has no charts, so it is priced at `stub_points` a night up to
    /// one month from now. Chart-backed sources are capped `lookahead_days` after `start`
    /// when a lookahead is configured.
    pub fn point_source(
        &self,
        context: &ScanContext,
        start: DateTime<Tz>,
    ) -> Result<Box<dyn PointSource>, ConfigError> {
        let source: Box<dyn PointSource> = match self.data_source {
            DataSource::Stub => {
                let horizon = context
                    .now()
                    .checked_add_months(Months::new(1))
                    .ok_or(ConfigError::HorizonOutOfRange("Stub"))?;
                Box::new(FlatRatePointSource::new(self.stub_points, horizon))
            }
            DataSource::Store | DataSource::Embedded => Box::new(ChartPointSource),
        };

        match self.lookahead_days {
            Some(days) => {
                let horizon = start
                    .checked_add_days(Days::new(days))
                    .ok_or(ConfigError::HorizonOutOfRange("Lookahead"))?;
                Ok(Box::new(Lookahead::new(source, horizon)))
            }
            None => Ok(source),
        }
    }
}
