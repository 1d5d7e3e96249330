//! Coverage arithmetic for the spray campaign.
//!
//! Everything here is a pure function over borrowed counts. Upstream data is
//! untrusted, so missing or zero denominators degrade to defaults instead of
//! producing NaN or an error.

use crate::domain::{HexColor, SprayStatus, ThresholdScheme};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// Highest spray day the cumulative counters support.
pub const MAX_SPRAY_DAY: u32 = 4;

/// Visit counters for one target area, or a roll-up of several.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TargetAreaStats {
    pub target_id: String,
    pub structures: u64,
    pub visited_total: u64,
    pub visited_sprayed: u64,
    pub visited_not_sprayed: u64,
    pub visited_refused: u64,
    pub visited_other: u64,
    pub not_visited: u64,
}

impl TargetAreaStats {
    fn accumulate(&mut self, other: &Self) {
        self.structures = self.structures.saturating_add(other.structures);
        self.visited_total = self.visited_total.saturating_add(other.visited_total);
        self.visited_sprayed = self.visited_sprayed.saturating_add(other.visited_sprayed);
        self.visited_not_sprayed = self
            .visited_not_sprayed
            .saturating_add(other.visited_not_sprayed);
        self.visited_refused = self.visited_refused.saturating_add(other.visited_refused);
        self.visited_other = self.visited_other.saturating_add(other.visited_other);
        self.not_visited = self.not_visited.saturating_add(other.not_visited);
    }
}

/// Incremental sprayed count for a single spray day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DailySprayCount {
    pub day: u32,
    pub count: u64,
}

/// Lays daily counts out by day (index 0 is day 1). Days outside the
/// supported range are dropped; repeated days add up.
pub fn per_day_counts(daily: &[DailySprayCount]) -> [u64; MAX_SPRAY_DAY as usize] {
    let mut slots = [0_u64; MAX_SPRAY_DAY as usize];
    for entry in daily {
        if (1..=MAX_SPRAY_DAY).contains(&entry.day) {
            let slot = &mut slots[(entry.day - 1) as usize];
            *slot = slot.saturating_add(entry.count);
        }
    }
    slots
}

/// Total sprayed as of `day`, summing days 1 through `day` inclusive.
///
/// Day 0 and days past [`MAX_SPRAY_DAY`] yield 0. Days missing from the end
/// of `per_day_counts` count as 0.
pub fn cumulative_spray_count(day: u32, per_day_counts: &[u64]) -> u64 {
    if day == 0 || day > MAX_SPRAY_DAY {
        return 0;
    }

    per_day_counts
        .iter()
        .take(day as usize)
        .fold(0_u64, |total, count| total.saturating_add(*count))
}

/// Share of structures sprayed as of `day`; 0 when there are no structures.
#[allow(clippy::cast_precision_loss)]
pub fn spray_rate(day: u32, per_day_counts: &[u64], structures: Option<u64>) -> f64 {
    match structures {
        Some(structures) if structures > 0 => {
            cumulative_spray_count(day, per_day_counts) as f64 / structures as f64
        }
        _ => 0.0,
    }
}

/// Sprayed points per campaign day. A point's day is the 1-based position
/// of its spray date in `spray_dates`; points from unknown dates are skipped.
pub fn daily_spray_counts<T: SprayOutcome>(
    features: &[T],
    spray_dates: &[String],
) -> Vec<DailySprayCount> {
    let mut daily: Vec<DailySprayCount> = Vec::new();
    for feature in features {
        if feature.status() != Some(SprayStatus::Sprayed) {
            continue;
        }
        let Some(day) = feature
            .spray_date()
            .and_then(|date| spray_dates.iter().position(|d| d == date.trim()))
            .and_then(|index| u32::try_from(index + 1).ok())
        else {
            continue;
        };
        match daily.iter_mut().find(|entry| entry.day == day) {
            Some(entry) => entry.count += 1,
            None => daily.push(DailySprayCount { day, count: 1 }),
        }
    }
    daily
}

/// Sprayed totals for a target area as of one campaign day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyProgress {
    pub day: u32,
    pub per_day: [u64; MAX_SPRAY_DAY as usize],
    pub cumulative: u64,
    /// Share of structures sprayed by `day`, `0.0..` with 1.0 meaning all.
    pub rate: f64,
}

impl DailyProgress {
    /// `None` for day 0 and days past [`MAX_SPRAY_DAY`].
    pub fn as_of<T: SprayOutcome>(
        day: u32,
        features: &[T],
        spray_dates: &[String],
        structures: Option<u64>,
    ) -> Option<Self> {
        if !(1..=MAX_SPRAY_DAY).contains(&day) {
            return None;
        }
        let per_day = per_day_counts(&daily_spray_counts(features, spray_dates));
        Some(Self {
            day,
            per_day,
            cumulative: cumulative_spray_count(day, &per_day),
            rate: spray_rate(day, &per_day, structures),
        })
    }

    #[allow(clippy::cast_possible_truncation)]
    pub fn rate_percentage(&self) -> Percentage {
        Percentage((self.rate * 100.0).round() as i64)
    }
}

/// Whole-number percentage. Displays as `N%`; [`Percentage::value`] gives
/// the bare number.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Percentage(i64);

impl Percentage {
    pub const ZERO: Self = Self(0);

    pub const fn value(self) -> i64 {
        self.0
    }

    #[allow(clippy::cast_precision_loss)]
    pub fn as_f64(self) -> f64 {
        self.0 as f64
    }

    /// Fraction for gauges, clamped to `0.0..=1.0`.
    pub fn ratio(self) -> f64 {
        (self.as_f64() / 100.0).clamp(0.0, 1.0)
    }
}

impl fmt::Display for Percentage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

/// `round(numerator / denominator * 100)`.
///
/// A missing numerator counts as 0; a missing or zero denominator counts as
/// 1, so `calculate_percentage(Some(5), None)` is 500.
#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
pub fn calculate_percentage(numerator: Option<u64>, denominator: Option<u64>) -> Percentage {
    let numerator = numerator.unwrap_or(0);
    let denominator = match denominator {
        None | Some(0) => 1,
        Some(value) => value,
    };

    Percentage(((numerator as f64 / denominator as f64) * 100.0).round() as i64)
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ThresholdParseError {
    #[error("threshold entry `{0}` is not of the form bound:#rrggbb")]
    MalformedEntry(String),
    #[error("threshold bound `{0}` is not a number")]
    InvalidBound(String),
    #[error("threshold color `{0}` is not a hex color")]
    InvalidColor(String),
    #[error("threshold table has no entries")]
    Empty,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Threshold {
    pub lower_bound: f64,
    pub color: HexColor,
}

/// Ordered color buckets. A percentage lands in the first row (highest bound
/// first) whose lower bound it reaches, otherwise in the fallback.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ThresholdTable {
    rows: Vec<Threshold>,
    fallback: HexColor,
}

impl ThresholdTable {
    pub fn new(rows: impl IntoIterator<Item = (f64, HexColor)>, fallback: HexColor) -> Self {
        let mut rows: Vec<Threshold> = rows
            .into_iter()
            .filter(|(bound, _)| bound.is_finite())
            .map(|(lower_bound, color)| Threshold { lower_bound, color })
            .collect();
        rows.sort_by(|a, b| b.lower_bound.total_cmp(&a.lower_bound));
        Self { rows, fallback }
    }

    pub fn for_scheme(scheme: ThresholdScheme) -> Self {
        match scheme {
            ThresholdScheme::Current => Self::new(
                [
                    (100.0, HexColor::new(0x2E, 0xCC, 0x40)),
                    (85.0, HexColor::new(0x31, 0xA3, 0x54)),
                    (75.0, HexColor::new(0x78, 0xC6, 0x79)),
                    (40.0, HexColor::new(0xC2, 0xE6, 0x99)),
                    (20.0, HexColor::new(0xFF, 0xFF, 0xCC)),
                ],
                HexColor::new(0xFF, 0xA5, 0x00),
            ),
            ThresholdScheme::Legacy => Self::new(
                [
                    (90.0, HexColor::new(0x31, 0xA3, 0x54)),
                    (80.0, HexColor::new(0x78, 0xC6, 0x79)),
                    (40.0, HexColor::new(0xC2, 0xE6, 0x99)),
                    (30.0, HexColor::new(0xFF, 0xFF, 0xCC)),
                ],
                HexColor::new(0xFF, 0xA5, 0x00),
            ),
            ThresholdScheme::Legend => Self::new(
                [
                    (100.0, HexColor::new(0x2E, 0xCC, 0x40)),
                    (66.0, HexColor::new(0xFF, 0xDC, 0x00)),
                    (33.0, HexColor::new(0xFF, 0x85, 0x1B)),
                    (1.0, HexColor::new(0xFF, 0x41, 0x36)),
                ],
                HexColor::new(0xCC, 0xCC, 0xCC),
            ),
        }
    }

    /// Parses `100:#2ECC40,85:#31A354,else:#FFA500`. The `else` entry is
    /// optional and defaults to gray.
    pub fn parse(raw: &str) -> Result<Self, ThresholdParseError> {
        let mut rows = Vec::new();
        let mut fallback = HexColor::new(0xCC, 0xCC, 0xCC);

        for entry in raw.split(',').map(str::trim).filter(|e| !e.is_empty()) {
            let (bound, color) = entry
                .split_once(':')
                .ok_or_else(|| ThresholdParseError::MalformedEntry(entry.to_string()))?;
            let color = HexColor::parse(color)
                .ok_or_else(|| ThresholdParseError::InvalidColor(color.trim().to_string()))?;
            let bound = bound.trim();
            if bound.eq_ignore_ascii_case("else") {
                fallback = color;
                continue;
            }
            let bound = bound
                .parse::<f64>()
                .ok()
                .filter(|value| value.is_finite())
                .ok_or_else(|| ThresholdParseError::InvalidBound(bound.to_string()))?;
            rows.push((bound, color));
        }

        if rows.is_empty() {
            return Err(ThresholdParseError::Empty);
        }
        Ok(Self::new(rows, fallback))
    }

    /// Rows from the highest bound down.
    pub fn rows(&self) -> &[Threshold] {
        &self.rows
    }

    pub const fn fallback(&self) -> HexColor {
        self.fallback
    }

    /// Bucket rank counted from the bottom: 0 is the fallback, `rows().len()`
    /// the top bucket.
    pub fn rank(&self, percent: f64) -> usize {
        self.rows
            .iter()
            .position(|row| percent >= row.lower_bound)
            .map_or(0, |index| self.rows.len() - index)
    }

    pub fn color_for(&self, percent: f64) -> HexColor {
        self.rows
            .iter()
            .find(|row| percent >= row.lower_bound)
            .map_or(self.fallback, |row| row.color)
    }
}

impl Default for ThresholdTable {
    fn default() -> Self {
        Self::for_scheme(ThresholdScheme::default())
    }
}

pub fn color_for_percentage(percent: f64, thresholds: &ThresholdTable) -> HexColor {
    thresholds.color_for(percent)
}

/// Field-wise sum of `records`. An empty input gives all-zero stats.
pub fn aggregate<'a, I>(records: I) -> TargetAreaStats
where
    I: IntoIterator<Item = &'a TargetAreaStats>,
{
    records
        .into_iter()
        .fold(TargetAreaStats::default(), |mut total, record| {
            total.accumulate(record);
            total
        })
}

/// What the tallies need from a spray-day point.
pub trait SprayOutcome {
    fn status(&self) -> Option<SprayStatus>;
    fn reason(&self) -> Option<&str>;

    fn spray_date(&self) -> Option<&str> {
        None
    }
}

const REFUSED: &str = "refused";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReasonCode {
    pub code: String,
    pub label: String,
}

/// Maps reason codes reported by field teams to display labels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReasonTable {
    entries: Vec<ReasonCode>,
    refused_code: String,
}

impl ReasonTable {
    pub fn new<I, C, L>(entries: I, refused_code: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = (C, L)>,
        C: Into<String>,
        L: Into<String>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(|(code, label)| ReasonCode {
                    code: code.into(),
                    label: label.into(),
                })
                .collect(),
            refused_code: refused_code.into(),
        }
    }

    /// Parses `code=label` pairs separated by `;`. A bare `code` labels
    /// itself. The refused reason is the entry labelled or coded `refused`,
    /// whatever its code.
    pub fn parse(raw: &str) -> Self {
        let entries: Vec<(String, String)> = raw
            .split(';')
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .map(|entry| match entry.split_once('=') {
                Some((code, label)) => (code.trim().to_string(), label.trim().to_string()),
                None => (entry.to_string(), entry.to_string()),
            })
            .collect();
        let refused_code = entries
            .iter()
            .find(|(_, label)| label.eq_ignore_ascii_case(REFUSED))
            .or_else(|| {
                entries
                    .iter()
                    .find(|(code, _)| code.eq_ignore_ascii_case(REFUSED))
            })
            .map_or_else(|| REFUSED.to_string(), |(code, _)| code.clone());
        Self::new(entries, refused_code)
    }

    pub fn entries(&self) -> &[ReasonCode] {
        &self.entries
    }

    pub fn refused_code(&self) -> &str {
        &self.refused_code
    }

    pub fn lookup(&self, code: &str) -> Option<&ReasonCode> {
        let code = code.trim();
        self.entries
            .iter()
            .find(|entry| entry.code.eq_ignore_ascii_case(code))
    }
}

impl Default for ReasonTable {
    fn default() -> Self {
        Self::new(
            [
                ("sick", "sick"),
                ("locked", "locked"),
                ("funeral", "funeral"),
                ("refused", "refused"),
                ("no one home/missed", "no one home/missed"),
                ("other", "other"),
            ],
            REFUSED,
        )
    }
}

/// Not-sprayed counts keyed by reason code.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ReasonTally(BTreeMap<String, u64>);

impl ReasonTally {
    pub fn get(&self, code: &str) -> u64 {
        self.0.get(code).copied().unwrap_or(0)
    }

    pub fn total(&self) -> u64 {
        self.0.values().sum()
    }

    pub fn total_excluding(&self, code: &str) -> u64 {
        self.0
            .iter()
            .filter(|(key, _)| key.as_str() != code)
            .map(|(_, count)| count)
            .sum()
    }
}

/// Counts reasons among not-sprayed features. Reasons missing from `table`
/// and features without a reason are skipped.
pub fn reason_tally<T: SprayOutcome>(features: &[T], table: &ReasonTable) -> ReasonTally {
    let mut tally = BTreeMap::new();
    for feature in features {
        if feature.status() != Some(SprayStatus::NotSprayed) {
            continue;
        }
        if let Some(entry) = feature.reason().and_then(|reason| table.lookup(reason)) {
            *tally.entry(entry.code.clone()).or_insert(0) += 1;
        }
    }
    ReasonTally(tally)
}

/// One line of a district or target-area coverage table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CoverageRow {
    pub label: String,
    pub stats: TargetAreaStats,
    /// Sprayed structures as a share of all structures; drives the row color.
    pub coverage: Percentage,
    pub visited: Percentage,
    pub sprayed: Percentage,
    pub not_sprayed: Percentage,
    pub refused: Percentage,
    pub other: Percentage,
    pub not_visited: Percentage,
}

/// Visits and not-visited are shares of structures; visit outcomes are
/// shares of visited structures.
pub fn coverage_row(label: impl Into<String>, stats: &TargetAreaStats) -> CoverageRow {
    let structures = Some(stats.structures);
    let visited = Some(stats.visited_total);

    CoverageRow {
        label: label.into(),
        stats: stats.clone(),
        coverage: calculate_percentage(Some(stats.visited_sprayed), structures),
        visited: calculate_percentage(visited, structures),
        sprayed: calculate_percentage(Some(stats.visited_sprayed), visited),
        not_sprayed: calculate_percentage(Some(stats.visited_not_sprayed), visited),
        refused: calculate_percentage(Some(stats.visited_refused), visited),
        other: calculate_percentage(Some(stats.visited_other), visited),
        not_visited: calculate_percentage(Some(stats.not_visited), structures),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReasonCount {
    pub code: String,
    pub label: String,
    pub count: u64,
}

/// Spray-day points for a target area reduced to what the stats panel shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SpraySummary {
    pub sprayed: u64,
    pub not_sprayed: u64,
    pub not_sprayable: u64,
    pub reasons: Vec<ReasonCount>,
    pub sprayed_percentage: Percentage,
    pub refused_percentage: Percentage,
    pub other_percentage: Percentage,
}

/// Percentages are of `visited_total`, or of the visited points themselves
/// when the target area has not reported a visit count. This intentionally
/// differs from [`calculate_percentage`]'s divide-by-1 default, which would
/// report raw counts as percentages here. "Other" is every configured reason
/// except refused; every configured reason is listed, zero or not.
pub fn spray_summary<T: SprayOutcome>(
    features: &[T],
    visited_total: Option<u64>,
    table: &ReasonTable,
) -> SpraySummary {
    let (mut sprayed, mut not_sprayed, mut not_sprayable) = (0_u64, 0_u64, 0_u64);
    for feature in features {
        match feature.status() {
            Some(SprayStatus::Sprayed) => sprayed += 1,
            Some(SprayStatus::NotSprayed) => not_sprayed += 1,
            Some(SprayStatus::NotSprayable) => not_sprayable += 1,
            None => {}
        }
    }
    let visited_total = visited_total
        .filter(|visited| *visited > 0)
        .or(Some(sprayed + not_sprayed));

    let tally = reason_tally(features, table);
    let reasons = table
        .entries()
        .iter()
        .map(|entry| ReasonCount {
            code: entry.code.clone(),
            label: entry.label.clone(),
            count: tally.get(&entry.code),
        })
        .collect();

    SpraySummary {
        sprayed,
        not_sprayed,
        not_sprayable,
        reasons,
        sprayed_percentage: calculate_percentage(Some(sprayed), visited_total),
        refused_percentage: calculate_percentage(
            Some(tally.get(table.refused_code())),
            visited_total,
        ),
        other_percentage: calculate_percentage(
            Some(tally.total_excluding(table.refused_code())),
            visited_total,
        ),
    }
}
