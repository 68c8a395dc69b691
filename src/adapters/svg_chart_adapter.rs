//! SVG chart of a signal run: close price with buy/sell markers above,
//! portfolio value below.

use crate::domain::error::SigtraderError;
use crate::ports::chart_port::{ChartData, ChartPort};
use std::fmt::Write as _;
use std::fs;
use std::path::Path;
use tracing::info;

const WIDTH: f64 = 900.0;
const PADDING: f64 = 50.0;
const TITLE_HEIGHT: f64 = 40.0;
const PRICE_HEIGHT: f64 = 320.0;
const VALUE_HEIGHT: f64 = 180.0;
const PANEL_GAP: f64 = 30.0;
const MARKER: f64 = 6.0;
const FRAME_COLOUR: &str = "#ccc";

#[derive(Debug, Default)]
pub struct SvgChartAdapter;

impl SvgChartAdapter {
    pub fn new() -> Self {
        Self
    }
}

impl ChartPort for SvgChartAdapter {
    fn render(&self, chart: &ChartData<'_>, output_path: &Path) -> Result<(), SigtraderError> {
        let svg = render_svg(chart);
        if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| SigtraderError::Chart {
                reason: format!("failed to create {}: {}", parent.display(), e),
            })?;
        }
        fs::write(output_path, svg).map_err(|e| SigtraderError::Chart {
            reason: format!("failed to write {}: {}", output_path.display(), e),
        })?;
        info!(path = %output_path.display(), "chart written");
        Ok(())
    }
}

/// Vertical placement of one panel.
struct Panel {
    top: f64,
    height: f64,
    min: f64,
    max: f64,
}

impl Panel {
    fn new(top: f64, height: f64, values: impl Iterator<Item = f64>) -> Self {
        let (min, max) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
        let (min, max) = if min.is_finite() { (min, max) } else { (0.0, 0.0) };
        Self {
            top,
            height,
            min,
            max,
        }
    }

    fn y(&self, value: f64) -> f64 {
        let range = self.max - self.min;
        if range > 0.0 {
            self.top + self.height - (value - self.min) / range * self.height
        } else {
            self.top + self.height / 2.0
        }
    }
}

fn x_at(index: usize, len: usize) -> f64 {
    let plot_width = WIDTH - 2.0 * PADDING;
    if len > 1 {
        PADDING + index as f64 * plot_width / (len - 1) as f64
    } else {
        PADDING + plot_width / 2.0
    }
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn polyline(points: impl Iterator<Item = (f64, f64)>, colour: &str) -> String {
    let pts: Vec<String> = points.map(|(x, y)| format!("{:.1},{:.1}", x, y)).collect();
    format!(
        r#"<polyline fill="none" stroke="{}" stroke-width="1.5" points="{}"/>"#,
        colour,
        pts.join(" ")
    )
}

fn axis_labels(svg: &mut String, panel: &Panel, label: &str) {
    let _ = write!(
        svg,
        r#"<rect x="{:.1}" y="{:.1}" width="{:.1}" height="{:.1}" fill="none" stroke="{}"/>"#,
        PADDING,
        panel.top,
        WIDTH - 2.0 * PADDING,
        panel.height,
        FRAME_COLOUR
    );
    let _ = write!(
        svg,
        r#"<text x="{:.1}" y="{:.1}" font-size="11" text-anchor="end">{:.2}</text>"#,
        PADDING - 4.0,
        panel.top + 10.0,
        panel.max
    );
    let _ = write!(
        svg,
        r#"<text x="{:.1}" y="{:.1}" font-size="11" text-anchor="end">{:.2}</text>"#,
        PADDING - 4.0,
        panel.top + panel.height,
        panel.min
    );
    let _ = write!(
        svg,
        r#"<text x="{:.1}" y="{:.1}" font-size="12">{}</text>"#,
        PADDING + 4.0,
        panel.top + 14.0,
        label
    );
}

/// Build the SVG document for a run.
pub fn render_svg(chart: &ChartData<'_>) -> String {
    let bars = chart.series.bars();
    let len = bars.len();
    let height = TITLE_HEIGHT + PRICE_HEIGHT + PANEL_GAP + VALUE_HEIGHT + PADDING;

    let price = Panel::new(TITLE_HEIGHT, PRICE_HEIGHT, bars.iter().map(|b| b.close));
    let value = Panel::new(
        TITLE_HEIGHT + PRICE_HEIGHT + PANEL_GAP,
        VALUE_HEIGHT,
        chart.equity_curve.iter().map(|p| p.equity),
    );

    let mut svg = String::new();
    let _ = write!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{:.0}" height="{:.0}" viewBox="0 0 {:.0} {:.0}" font-family="sans-serif">"#,
        WIDTH, height, WIDTH, height
    );
    let _ = write!(
        svg,
        r#"<rect width="100%" height="100%" fill="white"/><text x="{:.1}" y="24" font-size="15" text-anchor="middle">{}</text>"#,
        WIDTH / 2.0,
        escape(&chart.title)
    );

    axis_labels(&mut svg, &price, "Close");
    svg.push_str(&polyline(
        bars.iter()
            .enumerate()
            .map(|(i, b)| (x_at(i, len), price.y(b.close))),
        "#1f77b4",
    ));

    for (i, bar) in bars.iter().enumerate() {
        let x = x_at(i, len);
        let y = price.y(bar.close);
        if chart.signals.buy.get(i).copied().unwrap_or(false) {
            let _ = write!(
                svg,
                r#"<polygon class="buy" fill="green" points="{:.1},{:.1} {:.1},{:.1} {:.1},{:.1}"/>"#,
                x,
                y + 2.0,
                x - MARKER,
                y + 2.0 + 2.0 * MARKER,
                x + MARKER,
                y + 2.0 + 2.0 * MARKER
            );
        }
        if chart.signals.sell.get(i).copied().unwrap_or(false) {
            let _ = write!(
                svg,
                r#"<polygon class="sell" fill="red" points="{:.1},{:.1} {:.1},{:.1} {:.1},{:.1}"/>"#,
                x,
                y - 2.0,
                x - MARKER,
                y - 2.0 - 2.0 * MARKER,
                x + MARKER,
                y - 2.0 - 2.0 * MARKER
            );
        }
    }

    axis_labels(&mut svg, &value, "Portfolio value");
    let value_len = chart.equity_curve.len();
    svg.push_str(&polyline(
        chart
            .equity_curve
            .iter()
            .enumerate()
            .map(|(i, p)| (x_at(i, value_len), value.y(p.equity))),
        "#2ca02c",
    ));

    if let (Some(first), Some(last)) = (bars.first(), bars.last()) {
        let axis_y = value.top + value.height + 16.0;
        let _ = write!(
            svg,
            r#"<text x="{:.1}" y="{:.1}" font-size="11">{}</text><text x="{:.1}" y="{:.1}" font-size="11" text-anchor="end">{}</text>"#,
            PADDING,
            axis_y,
            first.date,
            WIDTH - PADDING,
            axis_y,
            last.date
        );
    }

    svg.push_str("</svg>\n");
    svg
}
