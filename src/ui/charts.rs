use std::f64::consts::{FRAC_PI_2, TAU};

use eframe::egui::{self, Color32, RichText, ScrollArea, Stroke, Ui};
use egui_extras::{Column, TableBuilder};
use egui_plot::{Bar, BarChart, Legend, Plot, PlotPoint, Points, Polygon, Text};

use crate::color::{ColorMap, BAR_COLOR, POINT_COLOR};
use crate::data::aggregate::KpiSummary;
use crate::data::filter::FilteredView;
use crate::data::model::SaleRecord;
use crate::data::pipeline::{DashboardReport, Evaluation};
use crate::state::AppState;

const CHART_HEIGHT: f32 = 300.0;

// ---------------------------------------------------------------------------
// Central panel
// ---------------------------------------------------------------------------

/// Render the dashboard body: KPIs, charts, banner and the filtered table.
pub fn dashboard(ui: &mut Ui, state: &AppState) {
    if let Some(err) = &state.load_error {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading(RichText::new(format!("Load error\n\n{err}")).color(Color32::RED));
        });
        return;
    }

    let (Some(dataset), Some(evaluation)) = (&state.dataset, &state.evaluation) else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a file to view sales  (File → Open…)");
        });
        return;
    };

    let report = match evaluation {
        Evaluation::NoData => {
            ui.add_space(12.0);
            ui.label(
                RichText::new("⚠ No data available based on the current filter settings!")
                    .color(Color32::from_rgb(0xE0, 0xA0, 0x00))
                    .size(16.0),
            );
            return;
        }
        Evaluation::Ready(report) => report,
    };

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.heading("📊 Sales Dashboard");
            ui.add_space(8.0);
            kpi_row(ui, &report.kpis);
            ui.separator();
            chart_grid(ui, report);
            ui.separator();

            if let Some(uri) = &state.banner_uri {
                ui.add(egui::Image::new(uri.as_str()).max_width(1000.0));
                ui.separator();
            }

            ui.heading("Dataset");
            records_table(ui, &report.view(dataset));
        });
}

// ---------------------------------------------------------------------------
// KPIs
// ---------------------------------------------------------------------------

fn kpi_row(ui: &mut Ui, kpis: &KpiSummary) {
    ui.columns(3, |cols| {
        cols[0].label(RichText::new("💰 Total Sales:").strong().size(18.0));
        cols[0].label(RichText::new(format!("US $ {}", format_thousands(kpis.total_sales))).size(18.0));

        cols[1].label(RichText::new("Average Rating:").strong().size(18.0));
        cols[1].label(
            RichText::new(format!(
                "{} {}",
                kpis.average_rating,
                "⭐".repeat(kpis.star_count as usize)
            ))
            .size(18.0),
        );

        cols[2].label(RichText::new("💵 Average Sales Per Transaction:").strong().size(18.0));
        cols[2].label(RichText::new(format!("US $ {}", kpis.average_sale)).size(18.0));
    });
}

/// `1234567` → `"1,234,567"`.
pub fn format_thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    if value < 0 {
        out.insert(0, '-');
    }
    out
}

// ---------------------------------------------------------------------------
// Charts
// ---------------------------------------------------------------------------

fn chart_grid(ui: &mut Ui, report: &DashboardReport) {
    let charts = &report.charts;

    ui.columns(2, |cols| {
        hourly_chart(&mut cols[0], &charts.sales_by_hour);
        product_line_chart(&mut cols[1], &charts.sales_by_product_line);
    });
    ui.columns(2, |cols| {
        pie_chart(&mut cols[0], "gender_pie", "Gender wise sales", &charts.gender_share, 0.5);
        income_scatter(&mut cols[1], &charts.income_scatter);
    });
    ui.columns(2, |cols| {
        pie_chart(&mut cols[0], "product_pie", "Product type wise sales", &charts.product_line_share, 0.0);
        pie_chart(&mut cols[1], "city_pie", "City wise sales", &charts.city_share, 0.0);
    });
}

fn hourly_chart(ui: &mut Ui, series: &[(u8, f64)]) {
    ui.strong("⏳ Sales by hours");
    let bars = series
        .iter()
        .map(|&(hour, total)| Bar::new(hour as f64, total).name(format!("{hour}h")).width(0.8))
        .collect();

    Plot::new("hourly_sales")
        .height(CHART_HEIGHT)
        .x_axis_label("hour")
        .y_axis_label("Total")
        .show_grid([true, false])
        .allow_drag(false)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).color(BAR_COLOR).name("Total"));
        });
}

fn product_line_chart(ui: &mut Ui, series: &[(String, f64)]) {
    ui.strong("🔖 Sales by Product type");
    let labels: Vec<String> = series.iter().map(|(name, _)| name.clone()).collect();
    let bars = series
        .iter()
        .enumerate()
        .map(|(i, (name, total))| Bar::new(i as f64, *total).name(name).width(0.7))
        .collect();

    Plot::new("product_line_sales")
        .height(CHART_HEIGHT)
        .x_axis_label("Total")
        .y_axis_formatter(move |mark, _range| category_label(&labels, mark.value))
        .show_grid([false, true])
        .allow_drag(false)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(
                BarChart::new(bars)
                    .horizontal()
                    .color(BAR_COLOR)
                    .name("Total"),
            );
        });
}

/// Axis label for a category axis: only integer ticks map to a label.
fn category_label(labels: &[String], value: f64) -> String {
    let idx = value.round();
    if idx < 0.0 || (value - idx).abs() > 1e-6 {
        return String::new();
    }
    labels.get(idx as usize).cloned().unwrap_or_default()
}

fn income_scatter(ui: &mut Ui, points: &[[f64; 2]]) {
    ui.strong("Relationship between Total and gross income");
    Plot::new("income_scatter")
        .height(CHART_HEIGHT)
        .x_axis_label("Total")
        .y_axis_label("Gross Income")
        .show(ui, |plot_ui| {
            plot_ui.points(
                Points::new(points.to_vec())
                    .radius(2.5)
                    .color(POINT_COLOR)
                    .name("sales"),
            );
        });
}

fn pie_chart(ui: &mut Ui, id: &str, title: &str, series: &[(String, f64)], hole: f64) {
    ui.strong(title);
    let colors = ColorMap::new(series.iter().map(|(k, _)| k.as_str()));
    let slices = pie_slices(series);

    Plot::new(id)
        .height(CHART_HEIGHT)
        .data_aspect(1.0)
        .show_axes(false)
        .show_grid(false)
        .show_x(false)
        .show_y(false)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
        .include_x(-1.4)
        .include_x(1.4)
        .include_y(-1.3)
        .include_y(1.3)
        .legend(Legend::default())
        .show(ui, |plot_ui| {
            for slice in &slices {
                let color = colors.color_for(&slice.label);
                for segment in wedge_segments(slice.start, slice.end, hole, 1.0) {
                    plot_ui.polygon(
                        Polygon::new(segment)
                            .fill_color(color)
                            .stroke(Stroke::new(1.0, color))
                            .name(&slice.label),
                    );
                }
                let [x, y] = polar(slice.mid(), 1.18);
                plot_ui.text(Text::new(
                    PlotPoint::new(x, y),
                    format!("{:.1}%", slice.share() * 100.0),
                ));
            }
        });
}

/// One pie slice as fractions of the full turn.
#[derive(Debug, Clone, PartialEq)]
struct Slice {
    label: String,
    start: f64,
    end: f64,
}

impl Slice {
    fn mid(&self) -> f64 {
        (self.start + self.end) / 2.0
    }

    fn share(&self) -> f64 {
        self.end - self.start
    }
}

/// Turn `(label, value)` pairs into consecutive slices. Non-positive values
/// are dropped; an all-zero series yields no slices.
fn pie_slices(series: &[(String, f64)]) -> Vec<Slice> {
    let total: f64 = series.iter().map(|(_, v)| v.max(0.0)).sum();
    if total <= 0.0 {
        return Vec::new();
    }
    let mut start = 0.0;
    series
        .iter()
        .filter(|(_, v)| *v > 0.0)
        .map(|(label, v)| {
            let end = start + v / total;
            let slice = Slice {
                label: label.clone(),
                start,
                end,
            };
            start = end;
            slice
        })
        .collect()
}

/// Point at `fraction` of a clockwise turn starting from 12 o'clock.
fn polar(fraction: f64, radius: f64) -> [f64; 2] {
    let angle = FRAC_PI_2 - TAU * fraction;
    [radius * angle.cos(), radius * angle.sin()]
}

/// Split a ring sector into small convex quads (triangles when `inner` is 0)
/// so each piece fills correctly.
fn wedge_segments(start: f64, end: f64, inner: f64, outer: f64) -> Vec<Vec<[f64; 2]>> {
    let steps = ((end - start) * 96.0).ceil().max(1.0) as usize;
    let step = (end - start) / steps as f64;
    (0..steps)
        .map(|i| {
            let a = start + step * i as f64;
            let b = a + step;
            if inner > 0.0 {
                vec![polar(a, outer), polar(b, outer), polar(b, inner), polar(a, inner)]
            } else {
                vec![[0.0, 0.0], polar(a, outer), polar(b, outer)]
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Table
// ---------------------------------------------------------------------------

const TABLE_COLUMNS: [&str; 11] = [
    "City",
    "Customer_type",
    "Gender",
    "Branch",
    "Payment",
    "Product_line",
    "Total",
    "Rating",
    "gross income",
    "Time",
    "hour",
];

fn record_cells(rec: &SaleRecord) -> [String; 11] {
    [
        rec.city.clone(),
        rec.customer_type.clone(),
        rec.gender.clone(),
        rec.branch.clone(),
        rec.payment.clone(),
        rec.product_line.clone(),
        format!("{:.4}", rec.total),
        format!("{:.1}", rec.rating),
        format!("{:.4}", rec.gross_income),
        rec.time.clone(),
        rec.hour.to_string(),
    ]
}

fn records_table(ui: &mut Ui, view: &FilteredView<'_>) {
    let rows: Vec<&SaleRecord> = view.records().collect();

    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .vscroll(false)
        .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
        .columns(Column::auto().at_least(60.0), TABLE_COLUMNS.len())
        .header(20.0, |mut header| {
            for name in TABLE_COLUMNS {
                header.col(|ui: &mut Ui| {
                    ui.strong(name);
                });
            }
        })
        .body(|body| {
            body.rows(18.0, rows.len(), |mut row| {
                let cells = record_cells(rows[row.index()]);
                for cell in cells {
                    row.col(|ui: &mut Ui| {
                        ui.label(cell);
                    });
                }
            });
        });
}
