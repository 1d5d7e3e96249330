use crate::coverage::Percentage;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line as TextLine, Span};
use ratatui::widgets::canvas::{Canvas, Circle, Points};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;
use std::f64::consts::{FRAC_PI_2, TAU};

const ARC_STEPS: usize = 180;

/// Points along a clockwise arc starting at twelve o'clock, covering
/// `ratio` of a full turn.
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
pub fn arc_points(ratio: f64, center: (f64, f64), radius: f64) -> Vec<(f64, f64)> {
    let ratio = ratio.clamp(0.0, 1.0);
    let steps = (ARC_STEPS as f64 * ratio).ceil() as usize;
    (0..=steps)
        .map(|step| {
            let angle = FRAC_PI_2 - TAU * ratio * (step as f64 / steps.max(1) as f64);
            (
                angle.cos().mul_add(radius, center.0),
                angle.sin().mul_add(radius, center.1),
            )
        })
        .collect()
}

/// Circular spray coverage gauge with the percentage in the middle.
pub fn render_coverage_gauge(
    f: &mut Frame<'_>,
    area: Rect,
    percentage: Percentage,
    color: Color,
    caption: &str,
) {
    let block = Block::default()
        .title("Spray Coverage")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(area);
    f.render_widget(block, area);

    if inner.width < 6 || inner.height < 4 {
        return;
    }

    // Terminal cells are about twice as tall as wide.
    let size = inner.width.min(inner.height.saturating_mul(2));
    let square = Rect {
        x: inner.x + (inner.width - size) / 2,
        y: inner.y,
        width: size,
        height: inner.height.saturating_sub(1),
    };

    let ratio = percentage.ratio();
    f.render_widget(
        Canvas::default()
            .paint(move |ctx| {
                let center = (50.0, 50.0);
                ctx.draw(&Circle {
                    x: center.0,
                    y: center.1,
                    radius: 40.0,
                    color: Color::DarkGray,
                });
                for radius in [36.0, 38.0, 40.0, 42.0] {
                    let coords = arc_points(ratio, center, radius);
                    ctx.draw(&Points {
                        coords: &coords,
                        color,
                    });
                }
            })
            .x_bounds([0.0, 100.0])
            .y_bounds([0.0, 100.0]),
        square,
    );

    let label = Paragraph::new(TextLine::from(Span::styled(
        percentage.to_string(),
        Style::default().fg(color).add_modifier(Modifier::BOLD),
    )))
    .alignment(Alignment::Center);
    let middle = Rect {
        y: square.y + square.height / 2,
        height: 1,
        ..square
    };
    f.render_widget(label, middle);

    let caption_area = Rect {
        y: inner.bottom().saturating_sub(1),
        height: 1,
        ..inner
    };
    f.render_widget(
        Paragraph::new(caption.to_string())
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::Gray)),
        caption_area,
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn arc_starts_at_twelve_and_runs_clockwise() {
        let points = arc_points(0.25, (0.0, 0.0), 10.0);
        let first = points.first().copied().unwrap_or_default();
        let last = points.last().copied().unwrap_or_default();
        assert!(close(first.0, 0.0) && close(first.1, 10.0));
        assert!(close(last.0, 10.0) && close(last.1, 0.0));
    }

    #[test]
    fn empty_arc_is_a_single_point() {
        assert_eq!(arc_points(0.0, (5.0, 5.0), 3.0).len(), 1);
        assert_eq!(arc_points(2.0, (5.0, 5.0), 3.0).len(), ARC_STEPS + 1);
    }
}
