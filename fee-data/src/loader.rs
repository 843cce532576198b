use std::collections::BTreeMap;
use std::io::Read;

use fee_core::{Bracket, RateSchedule, ScheduleError, ServiceCategory};
use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

/// Rate table shipped with the crate, used when no schedule file is given.
const DEFAULT_SCHEDULE_CSV: &str = include_str!("../data/rate_schedule.csv");

/// Errors that can occur when loading rate schedule data.
#[derive(Debug, Error)]
pub enum RateScheduleLoaderError {
    #[error("CSV parse error: {0}")]
    CsvParse(String),

    #[error("rate schedule file contains no rows")]
    Empty,

    /// `row` is 1-based and excludes the header.
    #[error("unknown category '{code}' on row {row}")]
    UnknownCategory { code: String, row: usize },

    #[error("category '{category}' bracket {index} does not match the other categories' bounds")]
    BracketMismatch {
        category: ServiceCategory,
        index: usize,
    },

    #[error("invalid rate schedule: {0}")]
    Schedule(#[from] ScheduleError),
}

impl From<csv::Error> for RateScheduleLoaderError {
    fn from(err: csv::Error) -> Self {
        RateScheduleLoaderError::CsvParse(err.to_string())
    }
}

/// A single record from a rate schedule CSV file.
///
/// - `category`: service category code (`goods`, `services`, `works`)
/// - `upper_bound`: exclusive upper edge of the bracket (empty for unbounded)
/// - `label`: display label for the bracket
/// - `rate`: marginal rate in percent (e.g. `1.50` for 1.5%)
///
/// Rows for one category list its brackets lowest first.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct RateScheduleRecord {
    pub category: String,
    #[serde(deserialize_with = "deserialize_optional_decimal")]
    pub upper_bound: Option<Decimal>,
    pub label: String,
    pub rate: Decimal,
}

fn deserialize_optional_decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s {
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => s
            .trim()
            .parse::<Decimal>()
            .map(Some)
            .map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

/// Loader that turns rate schedule CSV data into a validated [`RateSchedule`].
///
/// Every category must share the same bracket bounds; the first category
/// (in enumeration order) supplies the bracket labels.
pub struct RateScheduleLoader;

impl RateScheduleLoader {
    /// Parse rate schedule records from a CSV reader.
    ///
    /// Whitespace around values is ignored.
    pub fn parse<R: Read>(reader: R) -> Result<Vec<RateScheduleRecord>, RateScheduleLoaderError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut records = Vec::new();

        for result in csv_reader.deserialize() {
            let record: RateScheduleRecord = result?;
            records.push(record);
        }

        Ok(records)
    }

    /// Build a schedule from parsed records.
    ///
    /// # Errors
    ///
    /// - [`RateScheduleLoaderError::Empty`] if there are no records.
    /// - [`RateScheduleLoaderError::UnknownCategory`] for an unrecognised code.
    /// - [`RateScheduleLoaderError::BracketMismatch`] if categories disagree
    ///   on bracket bounds.
    /// - [`RateScheduleLoaderError::Schedule`] if the assembled schedule
    ///   breaks an invariant (ordering, unbounded last bracket, rate range).
    pub fn build(records: &[RateScheduleRecord]) -> Result<RateSchedule, RateScheduleLoaderError> {
        if records.is_empty() {
            return Err(RateScheduleLoaderError::Empty);
        }

        let mut groups: BTreeMap<ServiceCategory, Vec<&RateScheduleRecord>> = BTreeMap::new();
        for (index, record) in records.iter().enumerate() {
            let category = ServiceCategory::parse(&record.category).ok_or_else(|| {
                RateScheduleLoaderError::UnknownCategory {
                    code: record.category.clone(),
                    row: index + 1,
                }
            })?;
            groups.entry(category).or_default().push(record);
        }

        let mut groups = groups.into_iter();
        let Some((reference_category, reference)) = groups.next() else {
            return Err(RateScheduleLoaderError::Empty);
        };

        let brackets: Vec<Bracket> = reference
            .iter()
            .map(|r| Bracket {
                upper_bound: r.upper_bound,
                label: r.label.clone(),
            })
            .collect();

        let mut rates = BTreeMap::new();
        rates.insert(
            reference_category,
            reference.iter().map(|r| r.rate).collect::<Vec<_>>(),
        );

        for (category, group) in groups {
            if let Some(index) = first_bound_mismatch(&brackets, &group) {
                return Err(RateScheduleLoaderError::BracketMismatch { category, index });
            }
            rates.insert(category, group.iter().map(|r| r.rate).collect());
        }

        let schedule = RateSchedule::new(brackets, rates)?;
        debug!(
            brackets = schedule.brackets().len(),
            categories = schedule.categories().count(),
            "loaded rate schedule"
        );
        Ok(schedule)
    }

    /// Parse and build in one step.
    pub fn load<R: Read>(reader: R) -> Result<RateSchedule, RateScheduleLoaderError> {
        let records = Self::parse(reader)?;
        Self::build(&records)
    }
}

/// Loads the rate schedule bundled with this crate.
pub fn default_schedule() -> Result<RateSchedule, RateScheduleLoaderError> {
    RateScheduleLoader::load(DEFAULT_SCHEDULE_CSV.as_bytes())
}

fn first_bound_mismatch(
    brackets: &[Bracket],
    group: &[&RateScheduleRecord],
) -> Option<usize> {
    let longest = brackets.len().max(group.len());
    (0..longest).find(|&i| {
        let expected = brackets.get(i).map(|b| b.upper_bound);
        let actual = group.get(i).map(|r| r.upper_bound);
        expected != actual
    })
}
