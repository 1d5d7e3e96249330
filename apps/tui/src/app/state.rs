use crate::api::{
    BufferSummary, DistrictSummary, FeatureCollection, HouseholdProperties, SprayDayProperties,
    TargetAreaDetail, TargetAreaRow,
};
use crate::app::actions::{DistrictRows, FetchPayload, FetchRequest, FetchResponse};
use crate::config::DashboardConfig;
use crate::coverage::{
    aggregate, coverage_row, spray_summary, CoverageRow, DailyProgress, SpraySummary,
};
use crate::route::{Cutoff, DistrictScope, Route};
use chrono::NaiveDate;
use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;
use std::time::{Duration, Instant};
use throbber_widgets_tui::ThrobberState;
use tracing::{debug, info, warn};

const THROBBER_TICK: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppScreen {
    Overview,
    District,
    TargetArea,
}

/// What the dashboard is currently looking at. Every fetch is keyed on it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub district: DistrictScope,
    pub target_area: Option<String>,
    /// Cutoff date; spray data up to and including it is shown.
    pub spray_date: Option<String>,
}

/// Everything shown for one target area.
#[derive(Debug, Clone, Default)]
pub struct TargetAreaPanel {
    pub target_id: String,
    pub detail: Option<TargetAreaDetail>,
    pub spray_points: Vec<SprayDayProperties>,
    pub summary: Option<SpraySummary>,
    pub progress: Option<DailyProgress>,
    pub buffers: Vec<BufferSummary>,
    pub households: usize,
    pub household_structures: u64,
}

impl TargetAreaPanel {
    fn new(target_id: impl Into<String>) -> Self {
        Self {
            target_id: target_id.into(),
            ..Self::default()
        }
    }

    pub fn row(&self) -> Option<CoverageRow> {
        self.detail
            .as_ref()
            .map(|detail| coverage_row(self.target_id.clone(), &detail.row.stats()))
    }
}

#[derive(Debug)]
pub struct App {
    pub running: bool,
    pub screen: AppScreen,
    pub show_help: bool,
    pub status_message: String,
    pub last_error: Option<String>,
    pub config: DashboardConfig,
    pub selection: Selection,
    /// A `day=N` cutoff waiting for the spray date list to resolve.
    pub pending_cutoff: Option<Cutoff>,
    pub districts: Vec<DistrictSummary>,
    pub overview_rows: Vec<CoverageRow>,
    pub grand_total: Option<CoverageRow>,
    pub district_rows: Vec<CoverageRow>,
    pub district_total: Option<CoverageRow>,
    pub target_panel: Option<TargetAreaPanel>,
    pub spray_dates: Vec<String>,
    pub selected_index: usize,
    pub filter: String,
    pub filtering: bool,
    pub in_flight: usize,
    pub throbber: ThrobberState,
    pub last_frame: Instant,
    outbox: Vec<FetchRequest>,
}

impl App {
    pub fn new(config: DashboardConfig) -> Self {
        let route = config.initial_fragment.as_deref().map_or_else(
            || Route::from_defaults(&config.route),
            |fragment| Route::parse(fragment, &config.route),
        );

        let mut app = Self {
            running: true,
            screen: AppScreen::Overview,
            show_help: false,
            status_message: String::new(),
            last_error: None,
            selection: Selection {
                district: route.district.clone(),
                target_area: route.target_area.clone(),
                spray_date: config.spray_date.clone(),
            },
            config,
            pending_cutoff: None,
            districts: Vec::new(),
            overview_rows: Vec::new(),
            grand_total: None,
            district_rows: Vec::new(),
            district_total: None,
            target_panel: None,
            spray_dates: Vec::new(),
            selected_index: 0,
            filter: String::new(),
            filtering: false,
            in_flight: 0,
            throbber: ThrobberState::default(),
            last_frame: Instant::now(),
            outbox: Vec::new(),
        };
        app.apply_route(route);
        app
    }

    /// Queues the lists every screen needs plus the current selection.
    pub fn start(&mut self) {
        self.outbox.push(FetchRequest::Districts);
        self.outbox.push(FetchRequest::SprayDates);
        self.request_selection();
    }

    pub fn navigate(&mut self, route: Route) {
        info!(fragment = %route.to_fragment(), "navigating");
        self.apply_route(route);
        self.request_selection();
    }

    fn apply_route(&mut self, route: Route) {
        match route.cutoff {
            Some(cutoff @ Cutoff::Date(_)) => {
                self.selection.spray_date = cutoff.resolve(&self.spray_dates);
                self.pending_cutoff = None;
            }
            Some(cutoff @ Cutoff::Day(_)) => match cutoff.resolve(&self.spray_dates) {
                Some(date) => {
                    self.selection.spray_date = Some(date);
                    self.pending_cutoff = None;
                }
                None => self.pending_cutoff = Some(cutoff),
            },
            None => {}
        }

        self.selection.district = route.district;
        self.selection.target_area = route.target_area;
        self.screen = match (&self.selection.target_area, &self.selection.district) {
            (Some(_), _) => AppScreen::TargetArea,
            (None, DistrictScope::Named(_)) => AppScreen::District,
            (None, DistrictScope::All) => AppScreen::Overview,
        };

        self.selected_index = 0;
        self.filter.clear();
        self.filtering = false;
        self.target_panel = self
            .selection
            .target_area
            .as_ref()
            .map(TargetAreaPanel::new);
    }

    fn request_selection(&mut self) {
        match self.screen {
            AppScreen::Overview => self.outbox.push(FetchRequest::Overview),
            AppScreen::District => {
                if let Some(name) = self.selection.district.name() {
                    self.outbox.push(FetchRequest::District(name.to_string()));
                }
            }
            AppScreen::TargetArea => {
                if let Some(target) = self.selection.target_area.clone() {
                    self.outbox.push(FetchRequest::TargetArea(target.clone()));
                    self.outbox.push(FetchRequest::Households(target));
                    self.request_spray_data();
                }
            }
        }
    }

    fn request_spray_data(&mut self) {
        let Some(target_area) = self.selection.target_area.clone() else {
            return;
        };
        let spray_date = self.selection.spray_date.clone();
        self.outbox.push(FetchRequest::SprayPoints {
            target_area: target_area.clone(),
            spray_date: spray_date.clone(),
        });
        self.outbox.push(FetchRequest::Buffers {
            target_area,
            spray_date,
        });
    }

    pub fn current_route(&self) -> Route {
        Route {
            district: self.selection.district.clone(),
            target_area: self.selection.target_area.clone(),
            cutoff: self.pending_cutoff.or_else(|| {
                self.selection
                    .spray_date
                    .as_deref()
                    .and_then(|date| NaiveDate::parse_from_str(date, "%Y-%m-%d").ok())
                    .map(Cutoff::Date)
            }),
        }
    }

    /// Drills into the highlighted row.
    pub fn open_selected(&mut self) {
        match self.screen {
            AppScreen::Overview => {
                let Some(row) = self.overview_rows.get(self.selected_index) else {
                    return;
                };
                let district = DistrictScope::Named(row.label.clone());
                self.navigate(Route {
                    district,
                    target_area: None,
                    cutoff: None,
                });
            }
            AppScreen::District => {
                let Some(target) = self
                    .visible_rows()
                    .get(self.selected_index)
                    .map(|row| row.label.clone())
                else {
                    return;
                };
                let mut route = self.current_route();
                route.target_area = Some(target);
                self.navigate(route);
            }
            AppScreen::TargetArea => {}
        }
    }

    pub fn back(&mut self) {
        let mut route = self.current_route();
        match self.screen {
            AppScreen::TargetArea if route.district != DistrictScope::All => {
                route.target_area = None;
            }
            AppScreen::TargetArea | AppScreen::District => {
                route.district = DistrictScope::All;
                route.target_area = None;
            }
            AppScreen::Overview => return,
        }
        self.navigate(route);
    }

    /// Steps through "all dates" followed by each known spray date.
    pub fn cycle_spray_date(&mut self, forward: bool) {
        let len = self.spray_dates.len() + 1;
        let current = self
            .selection
            .spray_date
            .as_ref()
            .and_then(|date| self.spray_dates.iter().position(|d| d == date))
            .map_or(0, |index| index + 1);
        let next = if forward {
            (current + 1) % len
        } else {
            (current + len - 1) % len
        };
        let date = next
            .checked_sub(1)
            .and_then(|index| self.spray_dates.get(index))
            .cloned();
        self.set_spray_date(date);
    }

    pub fn set_spray_date(&mut self, spray_date: Option<String>) {
        if self.selection.spray_date == spray_date {
            return;
        }
        self.selection.spray_date = spray_date;
        self.pending_cutoff = None;
        if let Some(panel) = &mut self.target_panel {
            panel.spray_points.clear();
            panel.summary = None;
            panel.progress = None;
            panel.buffers.clear();
        }
        if self.screen == AppScreen::TargetArea {
            self.request_spray_data();
        }
    }

    pub fn refresh(&mut self) {
        self.status_message = "Refreshing...".to_string();
        self.last_error = None;
        self.request_selection();
    }

    pub fn cycle_scheme(&mut self) {
        self.config.set_scheme(self.config.scheme.next());
        self.status_message = format!("Coverage scheme: {}", self.config.scheme.label());
    }

    /// Hands queued fetches to the caller, counting them as in flight.
    pub fn take_requests(&mut self) -> Vec<FetchRequest> {
        let requests = std::mem::take(&mut self.outbox);
        self.in_flight += requests.len();
        requests
    }

    /// Applies a completed fetch. Returns `false` when the response belongs
    /// to a selection the user has already left, or when it failed.
    pub fn apply(&mut self, response: FetchResponse) -> bool {
        self.in_flight = self.in_flight.saturating_sub(1);

        let FetchResponse { request, payload } = response;
        if !request.is_current(&self.selection) {
            debug!(%request, "discarding stale response");
            return false;
        }

        let payload = match payload {
            Ok(payload) => payload,
            Err(error) => {
                warn!(%request, %error, "fetch failed");
                self.status_message = format!("Could not load {}", request.label());
                self.last_error = Some(error.to_string());
                return false;
            }
        };

        match payload {
            FetchPayload::Districts(districts) => self.districts = districts,
            FetchPayload::SprayDates(dates) => self.apply_spray_dates(dates),
            FetchPayload::Overview(districts) => self.apply_overview(&districts),
            FetchPayload::District(rows) => self.apply_district(&rows),
            FetchPayload::TargetArea(detail) => {
                if detail.is_none() {
                    warn!(%request, "target area not found");
                    self.status_message = "No data for this target area".to_string();
                }
                if let Some(panel) = &mut self.target_panel {
                    panel.detail = detail;
                }
                self.update_summary();
            }
            FetchPayload::Households(households) => self.apply_households(&households),
            FetchPayload::SprayPoints(points) => {
                if let Some(panel) = &mut self.target_panel {
                    panel.spray_points = points;
                }
                self.update_summary();
            }
            FetchPayload::Buffers(buffers) => {
                if let Some(panel) = &mut self.target_panel {
                    panel.buffers = buffers;
                }
            }
        }

        if self.in_flight == 0 && self.last_error.is_none() {
            self.status_message.clear();
        }
        true
    }

    fn apply_spray_dates(&mut self, mut dates: Vec<String>) {
        dates.sort();
        dates.dedup();
        self.spray_dates = dates;

        if let Some(cutoff) = self.pending_cutoff {
            match cutoff.resolve(&self.spray_dates) {
                Some(date) => self.set_spray_date(Some(date)),
                None => {
                    warn!(?cutoff, "cutoff day is past the last spray date");
                    self.pending_cutoff = None;
                }
            }
        }
        self.update_summary();
    }

    /// Campaign day the current cutoff falls on. Without a cutoff every
    /// known spray date counts.
    pub fn cutoff_day(&self) -> Option<u32> {
        let day = match &self.selection.spray_date {
            Some(date) => self.spray_dates.iter().position(|d| d == date)? + 1,
            None => self.spray_dates.len(),
        };
        u32::try_from(day).ok().filter(|day| *day > 0)
    }

    /// Target areas across every listed district.
    pub fn target_area_count(&self) -> u64 {
        self.districts
            .iter()
            .fold(0_u64, |total, district| {
                total.saturating_add(district.num_target_areas)
            })
    }

    fn apply_overview(&mut self, districts: &[DistrictRows]) {
        self.overview_rows = districts
            .iter()
            .map(|district| {
                let stats: Vec<_> = district.rows.iter().map(TargetAreaRow::stats).collect();
                coverage_row(district.district.clone(), &aggregate(&stats))
            })
            .collect();
        let total = aggregate(self.overview_rows.iter().map(|row| &row.stats));
        self.grand_total = Some(coverage_row("Grand Total", &total));
        self.clamp_selection(self.overview_rows.len());
    }

    fn apply_district(&mut self, rows: &[TargetAreaRow]) {
        self.district_rows = rows
            .iter()
            .map(|row| coverage_row(row.targetid.clone(), &row.stats()))
            .collect();
        let total = aggregate(self.district_rows.iter().map(|row| &row.stats));
        self.district_total = Some(coverage_row("Totals", &total));
        let visible = self.visible_rows().len();
        self.clamp_selection(visible);
    }

    fn apply_households(&mut self, households: &FeatureCollection<HouseholdProperties>) {
        if households.is_empty() {
            debug!(target_area = ?self.selection.target_area, "no households recorded");
        }
        if let Some(panel) = &mut self.target_panel {
            panel.households = households.len();
            panel.household_structures = households
                .features
                .iter()
                .fold(0_u64, |total, feature| {
                    total.saturating_add(feature.properties.structures)
                });
        }
    }

    fn update_summary(&mut self) {
        let day = self.cutoff_day();
        let reasons = &self.config.reasons;
        let spray_dates = &self.spray_dates;
        if let Some(panel) = &mut self.target_panel {
            let visited_total = panel.detail.as_ref().map(|detail| detail.row.visited_total);
            panel.summary = (!panel.spray_points.is_empty() || panel.detail.is_some())
                .then(|| spray_summary(&panel.spray_points, visited_total, reasons));

            let structures = panel.detail.as_ref().map(|detail| detail.row.structures);
            panel.progress = day.and_then(|day| {
                DailyProgress::as_of(day, &panel.spray_points, spray_dates, structures)
            });
            if panel.progress.is_none() && day.is_some() {
                debug!(?day, "cutoff day outside the tracked spray days");
            }
        }
    }

    fn clamp_selection(&mut self, len: usize) {
        if self.selected_index >= len {
            self.selected_index = len.saturating_sub(1);
        }
    }

    /// District rows matching the target-area filter, best match first.
    pub fn visible_rows(&self) -> Vec<&CoverageRow> {
        let pattern = self.filter.trim();
        if pattern.is_empty() {
            return self.district_rows.iter().collect();
        }

        let matcher = SkimMatcherV2::default();
        let mut scored: Vec<(i64, &CoverageRow)> = self
            .district_rows
            .iter()
            .filter_map(|row| {
                matcher
                    .fuzzy_match(&row.label, pattern)
                    .map(|score| (score, row))
            })
            .collect();
        scored.sort_by(|a, b| b.0.cmp(&a.0));
        scored.into_iter().map(|(_, row)| row).collect()
    }

    /// Number of selectable rows on the current screen.
    pub fn row_count(&self) -> usize {
        match self.screen {
            AppScreen::Overview => self.overview_rows.len(),
            AppScreen::District => self.visible_rows().len(),
            AppScreen::TargetArea => self.target_panel.as_ref().map_or(0, |p| p.buffers.len()),
        }
    }

    pub fn set_filter(&mut self, filter: String) {
        self.filter = filter;
        self.selected_index = 0;
    }

    pub const fn is_loading(&self) -> bool {
        self.in_flight > 0
    }

    pub fn update(&mut self) {
        let now = Instant::now();
        if now.duration_since(self.last_frame) < THROBBER_TICK {
            return;
        }
        self.last_frame = now;

        if self.is_loading() {
            self.throbber.calc_next();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiError;
    use pretty_assertions::assert_eq;

    fn row(target: &str, structures: u64, sprayed: u64) -> TargetAreaRow {
        TargetAreaRow {
            targetid: target.to_string(),
            structures,
            visited_total: sprayed,
            visited_sprayed: sprayed,
            ..TargetAreaRow::default()
        }
    }

    fn respond(app: &mut App, request: FetchRequest, payload: FetchPayload) -> bool {
        app.apply(FetchResponse {
            request,
            payload: Ok(payload),
        })
    }

    #[test]
    fn starts_on_the_default_district() {
        let mut app = App::new(DashboardConfig::default());
        app.start();
        assert_eq!(app.screen, AppScreen::District);
        assert_eq!(
            app.take_requests(),
            vec![
                FetchRequest::Districts,
                FetchRequest::SprayDates,
                FetchRequest::District("Chienge".to_string()),
            ]
        );
        assert_eq!(app.in_flight, 3);
    }

    #[test]
    fn district_rows_roll_up_into_totals() {
        let mut app = App::new(DashboardConfig::default());
        let applied = respond(
            &mut app,
            FetchRequest::District("Chienge".to_string()),
            FetchPayload::District(vec![row("1", 20, 10), row("2", 30, 15)]),
        );
        assert!(applied);

        let percentages: Vec<i64> = app
            .district_rows
            .iter()
            .map(|row| row.sprayed.value())
            .collect();
        assert_eq!(percentages, vec![100, 100]);
        let total = app.district_total.as_ref().map(|row| row.visited.value());
        assert_eq!(total, Some(50));
        assert_eq!(
            app.district_total.as_ref().map(|row| row.label.as_str()),
            Some("Totals")
        );
    }

    #[test]
    fn stale_responses_are_discarded() {
        let mut app = App::new(DashboardConfig::default());
        app.navigate(Route::parse("#!Chienge/1203", &app.config.route));
        app.navigate(Route::parse("#!Chienge/1204", &app.config.route));

        let applied = respond(
            &mut app,
            FetchRequest::SprayPoints {
                target_area: "1203".to_string(),
                spray_date: None,
            },
            FetchPayload::SprayPoints(vec![SprayDayProperties {
                sprayed: Some("yes".to_string()),
                ..SprayDayProperties::default()
            }]),
        );
        assert!(!applied);
        let panel = app.target_panel.as_ref();
        assert_eq!(panel.map(|p| p.target_id.as_str()), Some("1204"));
        assert!(panel.is_some_and(|p| p.spray_points.is_empty()));

        let applied = respond(
            &mut app,
            FetchRequest::SprayPoints {
                target_area: "1204".to_string(),
                spray_date: None,
            },
            FetchPayload::SprayPoints(vec![SprayDayProperties {
                sprayed: Some("yes".to_string()),
                ..SprayDayProperties::default()
            }]),
        );
        assert!(applied);
        let sprayed = app
            .target_panel
            .as_ref()
            .and_then(|p| p.summary.as_ref())
            .map(|s| s.sprayed);
        assert_eq!(sprayed, Some(1));
    }

    #[test]
    fn failures_keep_prior_state() {
        let mut app = App::new(DashboardConfig::default());
        respond(
            &mut app,
            FetchRequest::District("Chienge".to_string()),
            FetchPayload::District(vec![row("1", 20, 10)]),
        );

        let applied = app.apply(FetchResponse {
            request: FetchRequest::District("Chienge".to_string()),
            payload: Err(ApiError::Status {
                url: "http://localhost/districts.json".to_string(),
                status: reqwest::StatusCode::BAD_GATEWAY,
            }),
        });
        assert!(!applied);
        assert_eq!(app.district_rows.len(), 1);
        assert!(app.last_error.is_some());
        assert_eq!(app.status_message, "Could not load target areas");
    }

    #[test]
    fn day_cutoff_waits_for_spray_dates() {
        let config = DashboardConfig {
            initial_fragment: Some("#!Chienge/1203?day=2".to_string()),
            ..DashboardConfig::default()
        };
        let mut app = App::new(config);
        app.start();
        app.take_requests();
        assert_eq!(app.selection.spray_date, None);
        assert_eq!(app.pending_cutoff, Some(Cutoff::Day(2)));

        respond(
            &mut app,
            FetchRequest::SprayDates,
            FetchPayload::SprayDates(vec!["2015-09-30".to_string(), "2015-09-29".to_string()]),
        );
        assert_eq!(app.selection.spray_date.as_deref(), Some("2015-09-30"));
        assert_eq!(app.pending_cutoff, None);
        assert!(app.take_requests().contains(&FetchRequest::Buffers {
            target_area: "1203".to_string(),
            spray_date: Some("2015-09-30".to_string()),
        }));
    }

    #[test]
    fn day_cutoff_covers_every_day_up_to_it() {
        let config = DashboardConfig {
            initial_fragment: Some("#!Chienge/1203?day=2".to_string()),
            ..DashboardConfig::default()
        };
        let mut app = App::new(config);
        app.start();
        app.take_requests();
        respond(
            &mut app,
            FetchRequest::SprayDates,
            FetchPayload::SprayDates(vec!["2015-09-29".to_string(), "2015-09-30".to_string()]),
        );
        assert_eq!(app.cutoff_day(), Some(2));

        let point = |date: &str| SprayDayProperties {
            sprayed: Some("yes".to_string()),
            spray_date: Some(date.to_string()),
            ..SprayDayProperties::default()
        };
        let applied = respond(
            &mut app,
            FetchRequest::SprayPoints {
                target_area: "1203".to_string(),
                spray_date: Some("2015-09-30".to_string()),
            },
            FetchPayload::SprayPoints(vec![
                point("2015-09-29"),
                point("2015-09-29"),
                point("2015-09-30"),
            ]),
        );
        assert!(applied);

        let progress = app.target_panel.as_ref().and_then(|p| p.progress.as_ref());
        assert_eq!(progress.map(|p| p.per_day), Some([2, 1, 0, 0]));
        assert_eq!(progress.map(|p| p.cumulative), Some(3));

        app.cycle_spray_date(false);
        assert_eq!(app.cutoff_day(), Some(1));
        assert!(app.target_panel.as_ref().is_some_and(|p| p.progress.is_none()));
    }

    #[test]
    fn header_counts_target_areas_across_districts() {
        let mut app = App::new(DashboardConfig::default());
        respond(
            &mut app,
            FetchRequest::Districts,
            FetchPayload::Districts(vec![
                DistrictSummary {
                    district_name: "Chienge".to_string(),
                    num_target_areas: 12,
                },
                DistrictSummary {
                    district_name: "Nchelenge".to_string(),
                    num_target_areas: 30,
                },
            ]),
        );
        assert_eq!(app.target_area_count(), 42);
    }

    #[test]
    fn overview_adds_a_grand_total() {
        let mut app = App::new(DashboardConfig::default());
        app.navigate(Route::parse("#!All", &app.config.route));
        assert_eq!(app.screen, AppScreen::Overview);

        respond(
            &mut app,
            FetchRequest::Overview,
            FetchPayload::Overview(vec![
                DistrictRows {
                    district: "Chienge".to_string(),
                    rows: vec![row("1", 20, 10)],
                },
                DistrictRows {
                    district: "Nchelenge".to_string(),
                    rows: vec![row("2", 30, 15)],
                },
            ]),
        );
        assert_eq!(app.overview_rows.len(), 2);
        let grand = app.grand_total.as_ref();
        assert_eq!(grand.map(|row| row.stats.structures), Some(50));
        assert_eq!(grand.map(|row| row.label.as_str()), Some("Grand Total"));

        app.selected_index = 1;
        app.open_selected();
        assert_eq!(app.screen, AppScreen::District);
        assert_eq!(
            app.take_requests().last(),
            Some(&FetchRequest::District("Nchelenge".to_string()))
        );
    }

    #[test]
    fn filter_narrows_target_areas() {
        let mut app = App::new(DashboardConfig::default());
        respond(
            &mut app,
            FetchRequest::District("Chienge".to_string()),
            FetchPayload::District(vec![row("1203", 20, 10), row("88", 30, 15)]),
        );
        app.set_filter("12".to_string());
        let labels: Vec<&str> = app.visible_rows().iter().map(|r| r.label.as_str()).collect();
        assert_eq!(labels, vec!["1203"]);
    }

    #[test]
    fn spray_dates_cycle_through_all_dates() {
        let mut app = App::new(DashboardConfig::default());
        app.navigate(Route::parse("#!Chienge/1203", &app.config.route));
        app.spray_dates = vec!["2015-09-29".to_string(), "2015-09-30".to_string()];

        app.cycle_spray_date(true);
        assert_eq!(app.selection.spray_date.as_deref(), Some("2015-09-29"));
        app.cycle_spray_date(false);
        assert_eq!(app.selection.spray_date, None);
        app.cycle_spray_date(false);
        assert_eq!(app.selection.spray_date.as_deref(), Some("2015-09-30"));
        assert_eq!(
            app.current_route().to_fragment(),
            "#!Chienge/1203?spray_date=2015-09-30"
        );
    }

    #[test]
    fn back_walks_up_to_the_overview() {
        let mut app = App::new(DashboardConfig::default());
        app.navigate(Route::parse("#!Chienge/1203", &app.config.route));
        app.back();
        assert_eq!(app.screen, AppScreen::District);
        app.back();
        assert_eq!(app.screen, AppScreen::Overview);
        assert_eq!(app.selection.district, DistrictScope::All);
    }
}
