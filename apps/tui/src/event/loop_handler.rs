use color_eyre::eyre::eyre;
use color_eyre::Result;
use crossterm::event::{self, Event, KeyEventKind};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use serde::Serialize;
use std::io::Stdout;
use std::time::Duration;
use tokio::sync::mpsc::error::TryRecvError;
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::{debug, info};

use crate::api::{ApiClient, BufferSummary};
use crate::app::actions::execute;
use crate::app::{handle_input, App, AppActions, AppScreen, FetchResponse};
use crate::coverage::{CoverageRow, DailyProgress, Percentage, SpraySummary};
use crate::domain::{HexColor, SprayStatus};
use crate::ui;

/// Run the dashboard without a terminal: fetch what the current route needs,
/// then print it.
pub async fn run_headless(app: &mut App, client: &ApiClient, json: bool) -> Result<()> {
    loop {
        let requests = app.take_requests();
        if requests.is_empty() {
            break;
        }
        for request in requests {
            let payload = execute(client, &request).await;
            app.apply(FetchResponse { request, payload });
        }
    }

    if let Some(error) = &app.last_error {
        return Err(eyre!("{} ({error})", app.status_message));
    }

    let report = build_headless_report(app);
    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        render_headless_text(&report);
    }

    Ok(())
}

fn render_headless_text(report: &HeadlessReport) {
    println!("\nSpray Coverage {}", report.route);
    println!("==============={}", "=".repeat(report.route.len()));
    println!(
        "As of: {}",
        report.spray_date.as_deref().unwrap_or("all dates")
    );
    println!("Scheme: {}", report.scheme);

    if !report.rows.is_empty() {
        println!(
            "\n{:<20} {:>10} {:>8} {:>8} {:>8} {:>8} {:>8}",
            "Area", "Structures", "Visited", "Sprayed", "Refused", "Other", "Coverage"
        );
        for row in report.rows.iter().chain(report.total.iter()) {
            println!(
                "{:<20} {:>10} {:>8} {:>8} {:>8} {:>8} {:>8}",
                row.label,
                row.structures,
                row.visited.to_string(),
                row.sprayed.to_string(),
                row.refused.to_string(),
                row.other.to_string(),
                row.coverage.to_string()
            );
        }
    }

    if let Some(target) = &report.target_area {
        println!("\nTarget area {}", target.target_id);
        if let Some(row) = &target.row {
            println!(
                "- Structures: {} (visited {}, coverage {})",
                row.structures, row.visited, row.coverage
            );
        }
        println!(
            "- Households: {} ({} structures)",
            target.households, target.household_structures
        );
        if let Some(summary) = &target.summary {
            println!(
                "- {}: {} ({}), {}: {}, {}: {}",
                SprayStatus::Sprayed.label(),
                summary.sprayed,
                summary.sprayed_percentage,
                SprayStatus::NotSprayed.label(),
                summary.not_sprayed,
                SprayStatus::NotSprayable.label(),
                summary.not_sprayable
            );
            println!(
                "- Refused: {}, other reasons: {}",
                summary.refused_percentage, summary.other_percentage
            );
            println!("\nNot sprayed reasons:");
            for reason in &summary.reasons {
                println!("- {}: {}", reason.label, reason.count);
            }
        }
        if let Some(progress) = &target.progress {
            println!(
                "- Sprayed by day {}: {} ({} of structures), per day {:?}",
                progress.day,
                progress.cumulative,
                progress.rate_percentage(),
                progress.per_day
            );
        }
        if !target.buffers.is_empty() {
            println!("\nBuffers:");
            for buffer in &target.buffers {
                println!("- {}", buffer.caption());
            }
        }
    }
}

pub fn build_headless_report(app: &App) -> HeadlessReport {
    let headless_row = |row: &CoverageRow| HeadlessRow::from_row(row, app);

    let (rows, total) = match app.screen {
        AppScreen::Overview => (&app.overview_rows, app.grand_total.as_ref()),
        AppScreen::District | AppScreen::TargetArea => {
            (&app.district_rows, app.district_total.as_ref())
        }
    };
    let (rows, total) = if app.screen == AppScreen::TargetArea {
        (Vec::new(), None)
    } else {
        (rows.iter().map(headless_row).collect(), total.map(headless_row))
    };

    let target_area = app.target_panel.as_ref().map(|panel| HeadlessTargetArea {
        target_id: panel.target_id.clone(),
        row: panel.row().as_ref().map(headless_row),
        households: panel.households,
        household_structures: panel.household_structures,
        summary: panel.summary.clone(),
        progress: panel.progress.clone(),
        buffers: panel.buffers.clone(),
    });

    HeadlessReport {
        route: app.current_route().to_fragment(),
        scheme: app.config.scheme.as_str(),
        spray_date: app.selection.spray_date.clone(),
        rows,
        total,
        target_area,
    }
}

#[derive(Debug, Serialize)]
pub struct HeadlessReport {
    pub route: String,
    pub scheme: &'static str,
    pub spray_date: Option<String>,
    pub rows: Vec<HeadlessRow>,
    pub total: Option<HeadlessRow>,
    pub target_area: Option<HeadlessTargetArea>,
}

#[derive(Debug, Serialize)]
pub struct HeadlessRow {
    pub label: String,
    pub structures: u64,
    pub visited_total: u64,
    pub visited_sprayed: u64,
    pub visited: Percentage,
    pub sprayed: Percentage,
    pub refused: Percentage,
    pub other: Percentage,
    pub not_visited: Percentage,
    pub coverage: Percentage,
    pub color: HexColor,
}

impl HeadlessRow {
    fn from_row(row: &CoverageRow, app: &App) -> Self {
        Self {
            label: row.label.clone(),
            structures: row.stats.structures,
            visited_total: row.stats.visited_total,
            visited_sprayed: row.stats.visited_sprayed,
            visited: row.visited,
            sprayed: row.sprayed,
            refused: row.refused,
            other: row.other,
            not_visited: row.not_visited,
            coverage: row.coverage,
            color: app.config.thresholds.color_for(row.coverage.as_f64()),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HeadlessTargetArea {
    pub target_id: String,
    pub row: Option<HeadlessRow>,
    pub households: usize,
    pub household_structures: u64,
    pub summary: Option<SpraySummary>,
    pub progress: Option<DailyProgress>,
    pub buffers: Vec<BufferSummary>,
}

/// Run the main dashboard event loop
pub async fn run(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    app: &mut App,
    actions: &AppActions,
    responses: &mut UnboundedReceiver<FetchResponse>,
) -> Result<()> {
    // Configure event poll timeout (ms)
    const EVENT_POLL_TIMEOUT: u64 = 50;

    loop {
        for request in app.take_requests() {
            actions.dispatch(request);
        }

        loop {
            match responses.try_recv() {
                Ok(response) => {
                    app.apply(response);
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    return Err(eyre!("Fetch channel closed unexpectedly"));
                }
            }
        }

        app.update();

        if let Err(e) = terminal.draw(|f| ui::ui(app, f)) {
            return Err(eyre!("Terminal draw error: {e}"));
        }

        if matches!(
            event::poll(Duration::from_millis(EVENT_POLL_TIMEOUT)),
            Ok(true)
        ) {
            match event::read() {
                Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => {
                    handle_input(app, key.code);
                    if !app.running {
                        info!("quit requested");
                        break;
                    }
                }
                Ok(Event::Resize(width, height)) => {
                    debug!(width, height, "terminal resized");
                }
                Ok(_) | Err(_) => {
                    // Ignore non-key events
                }
            }
        }

        // Let spawned fetches make progress between frames.
        tokio::task::yield_now().await;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::TargetAreaRow;
    use crate::app::{FetchPayload, FetchRequest};
    use crate::config::DashboardConfig;
    use pretty_assertions::assert_eq;

    #[test]
    fn headless_report_covers_the_district_table() {
        let mut app = App::new(DashboardConfig::default());
        app.apply(FetchResponse {
            request: FetchRequest::District("Chienge".to_string()),
            payload: Ok(FetchPayload::District(vec![
                TargetAreaRow {
                    targetid: "1".to_string(),
                    structures: 20,
                    visited_total: 10,
                    visited_sprayed: 10,
                    ..TargetAreaRow::default()
                },
                TargetAreaRow {
                    targetid: "2".to_string(),
                    structures: 30,
                    visited_total: 15,
                    visited_sprayed: 15,
                    ..TargetAreaRow::default()
                },
            ])),
        });

        let report = build_headless_report(&app);
        assert_eq!(report.route, "#!Chienge");
        assert_eq!(report.rows.len(), 2);
        let total = report.total.as_ref();
        assert_eq!(total.map(|row| row.coverage.value()), Some(50));
        assert_eq!(
            total.map(|row| row.color.to_string()),
            Some("#C2E699".to_string())
        );
        assert!(report.target_area.is_none());

        let json = serde_json::to_value(&report).unwrap_or_default();
        assert_eq!(json["total"]["coverage"], 50);
        assert_eq!(json["total"]["color"], "#C2E699");
    }

    #[test]
    fn headless_report_carries_progress_as_of_the_cutoff() {
        use crate::api::SprayDayProperties;

        let config = DashboardConfig {
            initial_fragment: Some("#!Chienge/1203?day=2".to_string()),
            ..DashboardConfig::default()
        };
        let mut app = App::new(config);
        app.start();
        app.take_requests();
        app.apply(FetchResponse {
            request: FetchRequest::SprayDates,
            payload: Ok(FetchPayload::SprayDates(vec![
                "2015-09-29".to_string(),
                "2015-09-30".to_string(),
            ])),
        });
        let point = |date: &str| SprayDayProperties {
            sprayed: Some("yes".to_string()),
            spray_date: Some(date.to_string()),
            ..SprayDayProperties::default()
        };
        app.apply(FetchResponse {
            request: FetchRequest::SprayPoints {
                target_area: "1203".to_string(),
                spray_date: Some("2015-09-30".to_string()),
            },
            payload: Ok(FetchPayload::SprayPoints(vec![
                point("2015-09-29"),
                point("2015-09-30"),
            ])),
        });

        let report = build_headless_report(&app);
        assert_eq!(report.spray_date.as_deref(), Some("2015-09-30"));
        let json = serde_json::to_value(&report).unwrap_or_default();
        assert_eq!(json["target_area"]["progress"]["day"], 2);
        assert_eq!(json["target_area"]["progress"]["cumulative"], 2);
        assert_eq!(
            json["target_area"]["progress"]["per_day"],
            serde_json::json!([1, 1, 0, 0])
        );
    }

    #[tokio::test]
    async fn headless_run_reports_fetch_failures() -> Result<()> {
        // Nothing listens on a freshly released port.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let base_url = format!("http://{}", listener.local_addr()?);
        drop(listener);

        let client = ApiClient::new(base_url, Duration::from_secs(2))?;
        let mut app = App::new(DashboardConfig::default());
        app.start();

        let result = run_headless(&mut app, &client, true).await;
        assert!(result.is_err());
        assert!(app.last_error.is_some());
        Ok(())
    }
}
