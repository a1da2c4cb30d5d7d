//! Chart models built from query frames, and the file renderer.
//!
//! Rendering goes through plotters. PNG is the default format and comes from
//! the default `png` feature; SVG is always available and needs no system fonts.

use std::path::{Path, PathBuf};

use chrono::{Duration, NaiveDate};
use plotters::coord::Shift;
use plotters::drawing::DrawingAreaErrorKind;
use plotters::element::Pie;
use plotters::prelude::*;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::frame::Frame;

const FONT: &str = "sans-serif";

pub const TEAL: RGBColor = RGBColor(0, 128, 128);
pub const PURPLE: RGBColor = RGBColor(128, 0, 128);
pub const DARK_ORANGE: RGBColor = RGBColor(255, 140, 0);

/// Slice colors, cycled when there are more slices than entries.
const PALETTE: [RGBColor; 10] = [
    RGBColor(31, 119, 180),
    RGBColor(255, 127, 14),
    RGBColor(44, 160, 44),
    RGBColor(214, 39, 40),
    RGBColor(148, 103, 189),
    RGBColor(140, 86, 75),
    RGBColor(227, 119, 194),
    RGBColor(127, 127, 127),
    RGBColor(188, 189, 34),
    RGBColor(23, 190, 207),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartFormat {
    Svg,
    Png,
}

impl ChartFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ChartFormat::Svg => "svg",
            ChartFormat::Png => "png",
        }
    }
}

impl Default for ChartFormat {
    fn default() -> Self {
        if cfg!(feature = "png") {
            ChartFormat::Png
        } else {
            ChartFormat::Svg
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    CustomerTotals,
    CustomerAverages,
    SpendingDistribution,
    DailySpending,
}

impl ChartKind {
    pub const ALL: [ChartKind; 4] = [
        ChartKind::CustomerTotals,
        ChartKind::CustomerAverages,
        ChartKind::SpendingDistribution,
        ChartKind::DailySpending,
    ];

    pub fn file_stem(self) -> &'static str {
        match self {
            ChartKind::CustomerTotals => "customer_spent_bar",
            ChartKind::CustomerAverages => "customer_avg_spend",
            ChartKind::SpendingDistribution => "customer_spending_pie",
            ChartKind::DailySpending => "daily_spending_line",
        }
    }

    pub fn file_name(self, format: ChartFormat) -> String {
        format!("{}.{}", self.file_stem(), format.extension())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BarChart {
    pub title: String,
    pub y_label: String,
    pub color: RGBColor,
    pub categories: Vec<String>,
    pub values: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PieChart {
    pub title: String,
    pub labels: Vec<String>,
    pub values: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LineChart {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub color: RGBColor,
    pub points: Vec<(NaiveDate, f64)>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Chart {
    Bar(BarChart),
    Pie(PieChart),
    Line(LineChart),
}

impl Chart {
    fn is_empty(&self) -> bool {
        match self {
            Chart::Bar(c) => c.values.is_empty(),
            Chart::Pie(c) => c.values.is_empty(),
            Chart::Line(c) => c.points.is_empty(),
        }
    }
}

fn customer_bar(frame: &Frame, column: &str, title: &str, y_label: &str, color: RGBColor) -> Result<BarChart> {
    Ok(BarChart {
        title: title.to_string(),
        y_label: y_label.to_string(),
        color,
        categories: frame.text_column("customer_name")?,
        values: frame.real_column(column)?,
    })
}

pub fn customer_totals_bar(totals: &Frame) -> Result<BarChart> {
    customer_bar(totals, "total_spent", "Total Spending by Customer", "Total Spent", TEAL)
}

pub fn customer_averages_bar(averages: &Frame) -> Result<BarChart> {
    customer_bar(averages, "avg_spent", "Average Spend per Customer", "Avg. Spend", PURPLE)
}

pub fn spending_pie(totals: &Frame) -> Result<PieChart> {
    Ok(PieChart {
        title: "Spending Distribution".to_string(),
        labels: totals.text_column("customer_name")?,
        values: totals.real_column("total_spent")?,
    })
}

pub fn parse_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|source| Error::DateParse {
        value: value.to_string(),
        source,
    })
}

pub fn daily_spending_line(daily: &Frame) -> Result<LineChart> {
    let dates = daily.text_column("transaction_date")?;
    let totals = daily.real_column("daily_total")?;
    let points = dates
        .iter()
        .zip(totals)
        .map(|(date, total)| Ok((parse_date(date)?, total)))
        .collect::<Result<Vec<_>>>()?;
    Ok(LineChart {
        title: "Daily Spending Over Time".to_string(),
        x_label: "Date".to_string(),
        y_label: "Amount Spent".to_string(),
        color: DARK_ORANGE,
        points,
    })
}

fn value_ceiling(values: impl Iterator<Item = f64>) -> f64 {
    let max = values.fold(0.0, f64::max);
    if max > 0.0 {
        max * 1.1
    } else {
        1.0
    }
}

fn draw_bar<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    chart: &BarChart,
) -> std::result::Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
    root.fill(&WHITE)?;
    let n = chart.values.len() as u32;
    // Integer ranges are inclusive here, so n categories span 0..n-1.
    let x_range = 0u32..n.saturating_sub(1).max(1);
    let mut ctx = ChartBuilder::on(root)
        .caption(&chart.title, (FONT, 24))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(x_range.into_segmented(), 0f64..value_ceiling(chart.values.iter().copied()))?;

    let label = |v: &SegmentValue<u32>| match v {
        SegmentValue::CenterOf(i) => chart.categories.get(*i as usize).cloned().unwrap_or_default(),
        _ => String::new(),
    };
    ctx.configure_mesh()
        .disable_x_mesh()
        .x_labels(chart.categories.len())
        .x_label_formatter(&label)
        .y_desc(chart.y_label.as_str())
        .axis_desc_style((FONT, 15))
        .draw()?;

    ctx.draw_series(
        Histogram::vertical(&ctx)
            .style(chart.color.filled())
            .margin(12)
            .data(chart.values.iter().enumerate().map(|(i, v)| (i as u32, *v))),
    )?;
    Ok(())
}

fn draw_pie<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    chart: &PieChart,
) -> std::result::Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
    root.fill(&WHITE)?;
    let area = root.titled(&chart.title, (FONT, 24))?;
    let (w, h) = area.dim_in_pixel();
    let center = (w as i32 / 2, h as i32 / 2);
    let radius = f64::from(w.min(h)) * 0.35;
    let colors: Vec<RGBColor> = (0..chart.values.len())
        .map(|i| PALETTE[i % PALETTE.len()])
        .collect();

    let mut pie = Pie::new(&center, &radius, &chart.values, &colors, &chart.labels);
    // Angles run clockwise from 3 o'clock; -90 puts the first slice at the top.
    pie.start_angle(-90.0);
    pie.label_style((FONT, 16).into_font().color(&BLACK));
    pie.percentages((FONT, 14).into_font().color(&WHITE));
    area.draw(&pie)?;
    Ok(())
}

fn draw_line<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    chart: &LineChart,
) -> std::result::Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
    root.fill(&WHITE)?;
    let first = chart.points.iter().map(|(d, _)| *d).min().unwrap_or_default();
    let last = chart.points.iter().map(|(d, _)| *d).max().unwrap_or_default();
    let x_range = (first - Duration::days(1))..(last + Duration::days(1));

    let mut ctx = ChartBuilder::on(root)
        .caption(&chart.title, (FONT, 24))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(x_range, 0f64..value_ceiling(chart.points.iter().map(|(_, v)| *v)))?;

    ctx.configure_mesh()
        .x_labels(6)
        .x_label_formatter(&|d: &NaiveDate| d.format("%Y-%m-%d").to_string())
        .x_desc(chart.x_label.as_str())
        .y_desc(chart.y_label.as_str())
        .axis_desc_style((FONT, 15))
        .draw()?;

    ctx.draw_series(LineSeries::new(chart.points.iter().copied(), chart.color.stroke_width(2)))?;
    ctx.draw_series(
        chart
            .points
            .iter()
            .map(|&point| Circle::new(point, 4, chart.color.filled())),
    )?;
    Ok(())
}

fn draw<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    chart: &Chart,
) -> std::result::Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
    match chart {
        Chart::Bar(c) => draw_bar(root, c),
        Chart::Pie(c) => draw_pie(root, c),
        Chart::Line(c) => draw_line(root, c),
    }?;
    root.present()
}

fn chart_error<E: std::error::Error + Send + Sync>(err: DrawingAreaErrorKind<E>) -> Error {
    Error::Chart(err.to_string())
}

/// Writes charts as files under one output directory.
#[derive(Debug, Clone)]
pub struct ChartRenderer {
    output_dir: PathBuf,
    format: ChartFormat,
}

impl ChartRenderer {
    pub fn new(output_dir: impl Into<PathBuf>, format: ChartFormat) -> Self {
        Self {
            output_dir: output_dir.into(),
            format,
        }
    }

    pub fn path_for(&self, kind: ChartKind) -> PathBuf {
        self.output_dir.join(kind.file_name(self.format))
    }

    /// Draw `chart` to the file for `kind`, replacing any previous file.
    pub fn render(&self, kind: ChartKind, chart: &Chart, size: (u32, u32)) -> Result<PathBuf> {
        if chart.is_empty() {
            return Err(Error::EmptyResult(kind.file_stem().to_string()));
        }
        if let Chart::Pie(pie) = chart {
            if pie.values.iter().sum::<f64>() <= 0.0 {
                return Err(Error::Chart(format!("{}: slices sum to zero", kind.file_stem())));
            }
        }

        let path = self.path_for(kind);
        debug!(path = %path.display(), ?size, "rendering chart");
        self.render_to(&path, chart, size)?;
        show(&path);
        Ok(path)
    }

    fn render_to(&self, path: &Path, chart: &Chart, size: (u32, u32)) -> Result<()> {
        match self.format {
            ChartFormat::Svg => {
                let root = SVGBackend::new(path, size).into_drawing_area();
                draw(&root, chart).map_err(chart_error)
            }
            #[cfg(feature = "png")]
            ChartFormat::Png => {
                let root = BitMapBackend::new(path, size).into_drawing_area();
                draw(&root, chart).map_err(chart_error)
            }
            #[cfg(not(feature = "png"))]
            ChartFormat::Png => Err(Error::Chart(
                "PNG output requires the `png` feature".to_string(),
            )),
        }
    }
}

/// There is no viewer in a headless run; showing a chart reports where it went.
fn show(path: &Path) {
    info!(path = %path.display(), "chart written");
}
