use std::fmt::Write as _;

use serde::Serialize;

use crate::models::{RiskResult, ScaleId};
use crate::severity::ColorClass;

pub const SERIES_TITLE: &str = "Riesgo (%)";
/// Display ceiling for the y axis; larger values expand the axis.
pub const SUGGESTED_MAX: f64 = 40.0;

pub type TooltipFn = fn(&Bar) -> String;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bar {
    pub scale: ScaleId,
    pub label: String,
    pub value: f64,
    pub category: String,
    pub color: ColorClass,
}

impl Bar {
    /// Value used for bar geometry; negative or non-finite input draws flat.
    pub fn height_value(&self) -> f64 {
        if self.value.is_finite() && self.value > 0.0 {
            self.value
        } else {
            0.0
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct YAxis {
    pub begin_at_zero: bool,
    pub suggested_max: f64,
    pub tick_suffix: &'static str,
}

impl Default for YAxis {
    fn default() -> Self {
        Self {
            begin_at_zero: true,
            suggested_max: SUGGESTED_MAX,
            tick_suffix: "%",
        }
    }
}

impl YAxis {
    pub fn effective_max(&self, values: impl IntoIterator<Item = f64>) -> f64 {
        values
            .into_iter()
            .filter(|value| value.is_finite())
            .fold(self.suggested_max, f64::max)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BarSeries {
    pub title: String,
    pub bars: Vec<Bar>,
    pub y_axis: YAxis,
    #[serde(skip)]
    pub tooltip: TooltipFn,
}

impl BarSeries {
    pub fn tooltip_for(&self, index: usize) -> Option<String> {
        self.bars.get(index).map(|bar| (self.tooltip)(bar))
    }

    pub fn axis_max(&self) -> f64 {
        self.y_axis
            .effective_max(self.bars.iter().map(Bar::height_value))
    }
}

pub fn tooltip_text(bar: &Bar) -> String {
    format!("{}% — {}", bar.value, bar.category)
}

/// Builds the three-bar series in Framingham, SCORE, ACC/AHA order.
pub fn build_series(result: &RiskResult) -> BarSeries {
    let bars = result
        .iter()
        .map(|(id, scale)| Bar {
            scale: id,
            label: format!("{} ({})", id.chart_label(), scale.category),
            value: scale.percent,
            category: scale.category.clone(),
            color: scale.color_class(),
        })
        .collect();
    BarSeries {
        title: SERIES_TITLE.to_string(),
        bars,
        y_axis: YAxis::default(),
        tooltip: tooltip_text,
    }
}

/// Drawing capability owned by the presentation layer.
pub trait ChartSink {
    /// Tears down whatever the previous render left on the surface.
    fn clear(&mut self);
    fn draw(&mut self, series: &BarSeries);
}

pub fn draw_series<S: ChartSink + ?Sized>(series: &BarSeries, sink: &mut S) {
    sink.clear();
    sink.draw(series);
}

pub fn render<S: ChartSink + ?Sized>(result: &RiskResult, sink: &mut S) {
    draw_series(&build_series(result), sink);
}

const MARGIN_LEFT: f64 = 56.0;
const MARGIN_RIGHT: f64 = 24.0;
const MARGIN_TOP: f64 = 40.0;
const MARGIN_BOTTOM: f64 = 56.0;
const BAR_FILL_RATIO: f64 = 0.6;

/// Renders the series as a standalone SVG document. Tooltips are `<title>` children.
#[derive(Debug, Clone)]
pub struct SvgChartSink {
    width: u32,
    height: u32,
    document: String,
}

impl Default for SvgChartSink {
    fn default() -> Self {
        Self::new(640, 360)
    }
}

impl SvgChartSink {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            document: String::new(),
        }
    }

    pub fn document(&self) -> &str {
        &self.document
    }

    pub fn into_document(self) -> String {
        self.document
    }
}

impl ChartSink for SvgChartSink {
    fn clear(&mut self) {
        self.document.clear();
    }

    fn draw(&mut self, series: &BarSeries) {
        let width = f64::from(self.width);
        let height = f64::from(self.height);
        let plot_width = (width - MARGIN_LEFT - MARGIN_RIGHT).max(1.0);
        let plot_height = (height - MARGIN_TOP - MARGIN_BOTTOM).max(1.0);
        let baseline = MARGIN_TOP + plot_height;

        let (step, top, ticks) = axis_scale(series.axis_max());

        let mut grid = String::new();
        for i in 0..=ticks {
            let tick = i as f64 * step;
            let y = baseline - tick / top * plot_height;
            let _ = write!(
                grid,
                r##"<line x1="{:.1}" y1="{:.1}" x2="{:.1}" y2="{:.1}" stroke="#e5e7eb" stroke-width="1"/>"##,
                MARGIN_LEFT,
                y,
                MARGIN_LEFT + plot_width,
                y
            );
            let _ = write!(
                grid,
                r##"<text x="{:.1}" y="{:.1}" text-anchor="end" font-size="11" fill="#6b7280">{}{}</text>"##,
                MARGIN_LEFT - 8.0,
                y + 4.0,
                tick,
                escape_xml(series.y_axis.tick_suffix)
            );
        }

        let slot = plot_width / series.bars.len().max(1) as f64;
        let bar_width = slot * BAR_FILL_RATIO;
        let mut bars = String::new();
        for (i, bar) in series.bars.iter().enumerate() {
            let x = MARGIN_LEFT + i as f64 * slot + (slot - bar_width) / 2.0;
            let bar_height = bar.height_value() / top * plot_height;
            let _ = write!(
                bars,
                r##"<rect x="{:.1}" y="{:.1}" width="{:.1}" height="{:.1}" fill="{}"><title>{}</title></rect>"##,
                x,
                baseline - bar_height,
                bar_width,
                bar_height,
                bar.color.hex(),
                escape_xml(&(series.tooltip)(bar))
            );
            let _ = write!(
                bars,
                r##"<text x="{:.1}" y="{:.1}" text-anchor="middle" font-size="12" fill="#374151">{}</text>"##,
                x + bar_width / 2.0,
                baseline + 20.0,
                escape_xml(&bar.label)
            );
        }

        self.document = format!(
            r##"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}" style="background:white">
  <text x="{cx:.1}" y="22" text-anchor="middle" font-size="14" font-weight="600" fill="#374151">{title}</text>
  {grid}
  <line x1="{left:.1}" y1="{base:.1}" x2="{right:.1}" y2="{base:.1}" stroke="#9ca3af" stroke-width="1.5"/>
  {bars}
</svg>
"##,
            w = self.width,
            h = self.height,
            cx = width / 2.0,
            title = escape_xml(&series.title),
            grid = grid,
            left = MARGIN_LEFT,
            right = MARGIN_LEFT + plot_width,
            base = baseline,
            bars = bars,
        );
    }
}

const MAX_TICKS: usize = 10;

/// Tick interval, axis top and number of intervals for an axis reaching `axis_max`.
/// The top is rounded up to a whole step unless that would overflow.
fn axis_scale(axis_max: f64) -> (f64, f64, usize) {
    let step = nice_step(axis_max / 4.0);
    let rounded = (axis_max / step).ceil() * step;
    let top = if rounded.is_finite() { rounded } else { axis_max };
    let ticks = ((top / step) + 1e-9).floor() as usize;
    (step, top, ticks.min(MAX_TICKS))
}

/// Rounds a raw tick interval up to 1, 2 or 5 times a power of ten.
fn nice_step(raw: f64) -> f64 {
    if !raw.is_finite() || raw <= 0.0 {
        return 1.0;
    }
    let magnitude = 10f64.powf(raw.log10().floor());
    let normalized = raw / magnitude;
    let nice = if normalized <= 1.0 {
        1.0
    } else if normalized <= 2.0 {
        2.0
    } else if normalized <= 5.0 {
        5.0
    } else {
        10.0
    };
    nice * magnitude
}

fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            other => out.push(other),
        }
    }
    out
}
