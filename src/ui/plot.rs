use eframe::egui::{self, Color32, Ui};
use egui_plot::{Bar, BarChart, GridMark, Legend, Line, Plot, PlotPoint, PlotPoints, Points};

use crate::color::ChartColors;
use crate::data::aggregate::{
    GenderBodyPrices, RegionBreakdown, SalesTrend, SuvSedanTrend, SEDAN, SUV,
};
use crate::data::model::Gender;
use crate::state::AppState;
use crate::ui::format;

/// Total width of one bar group along the category axis.
const GROUP_WIDTH: f64 = 0.8;

// ---------------------------------------------------------------------------
// Dashboard grid (central panel)
// ---------------------------------------------------------------------------

/// Render the four charts in a 2×2 grid.
pub fn chart_grid(ui: &mut Ui, state: &AppState, height: f32) {
    let snap = &state.snapshot;
    let colors = &state.colors;

    ui.columns(2, |cols: &mut [Ui]| {
        cols[0].strong("Monthly Sales by Body Style");
        sales_trend_chart(&mut cols[0], &snap.sales_trend, colors, height);
        cols[1].strong("SUV vs Sedan Trend (3-month average, all data)");
        suv_sedan_chart(&mut cols[1], &snap.suv_sedan, colors, height);
    });
    ui.add_space(8.0);
    ui.columns(2, |cols: &mut [Ui]| {
        cols[0].strong("Quarterly Sales by Dealer Region");
        region_chart(&mut cols[0], &snap.regions, colors, height);
        cols[1].strong("Average Price by Body Style and Gender");
        gender_body_chart(&mut cols[1], &snap.gender_body, colors, height);
    });
}

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

fn no_data(ui: &mut Ui, height: f32) {
    ui.allocate_ui(egui::vec2(ui.available_width(), height), |ui: &mut Ui| {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.label("No data for the current filters");
        });
    });
}

fn base_plot(id: &str, height: f32) -> Plot {
    Plot::new(id)
        .legend(Legend::default())
        .height(height)
        .include_y(0.0)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
}

/// Category axis: integer positions map to `labels`, every `step`-th one shown.
fn category_axis(labels: Vec<String>, step: usize) -> impl Fn(GridMark, &std::ops::RangeInclusive<f64>) -> String {
    move |mark: GridMark, _range: &std::ops::RangeInclusive<f64>| {
        let pos = mark.value.round();
        if (mark.value - pos).abs() > 1e-6 || pos < 0.0 {
            return String::new();
        }
        let idx = pos as usize;
        if idx % step.max(1) != 0 {
            return String::new();
        }
        labels.get(idx).cloned().unwrap_or_default()
    }
}

/// Offset of member `j` of `n` inside a group centred on `center`.
fn grouped_position(center: f64, j: usize, n: usize) -> (f64, f64) {
    let width = GROUP_WIDTH / n.max(1) as f64;
    (center - GROUP_WIDTH / 2.0 + (j as f64 + 0.5) * width, width)
}

// ---------------------------------------------------------------------------
// Stacked bars: monthly sales per body style
// ---------------------------------------------------------------------------

pub fn sales_trend_chart(ui: &mut Ui, trend: &SalesTrend, colors: &ChartColors, height: f32) {
    if trend.is_empty() {
        no_data(ui, height);
        return;
    }

    let labels: Vec<String> = trend.months.iter().map(|m| m.bucket.label()).collect();
    let mut charts: Vec<BarChart> = Vec::with_capacity(trend.body_styles.len());

    for style in &trend.body_styles {
        let bars: Vec<Bar> = trend
            .months
            .iter()
            .enumerate()
            .map(|(i, m)| {
                Bar::new(i as f64, m.count(style) as f64)
                    .width(GROUP_WIDTH)
                    .name(m.bucket.label())
            })
            .collect();

        let key = style.clone();
        let below: Vec<&BarChart> = charts.iter().collect();
        let chart = BarChart::new(bars)
            .name(style)
            .color(colors.body_styles.color_for(style))
            .element_formatter(Box::new(move |bar: &Bar, _chart: &BarChart| {
                format!("{key}\nSales: {}\nMonth: {}", bar.value, bar.name)
            }))
            .stack_on(&below);
        charts.push(chart);
    }

    base_plot("sales_trend", height)
        .x_axis_formatter(category_axis(labels, 3))
        .y_axis_label("Sales")
        .show(ui, |plot_ui| {
            for chart in charts {
                plot_ui.bar_chart(chart);
            }
        });
}

// ---------------------------------------------------------------------------
// Smoothed lines: SUV vs Sedan
// ---------------------------------------------------------------------------

pub fn suv_sedan_chart(ui: &mut Ui, trend: &SuvSedanTrend, colors: &ChartColors, height: f32) {
    if trend.is_empty() {
        no_data(ui, height);
        return;
    }

    let labels: Vec<String> = trend.months.iter().map(|m| m.label()).collect();
    let tooltip_labels = labels.clone();
    let series = [
        (SUV, &trend.suv_smoothed, colors.primary),
        (SEDAN, &trend.sedan_smoothed, colors.secondary),
    ];

    base_plot("suv_sedan", height)
        .x_axis_formatter(category_axis(labels, 3))
        .y_axis_label("Sales")
        .label_formatter(move |name: &str, value: &PlotPoint| {
            if name.is_empty() {
                return String::new();
            }
            let month = tooltip_labels
                .get(value.x.round().max(0.0) as usize)
                .map(String::as_str)
                .unwrap_or("");
            format!("{name}\n{month}\nSales: {}", value.y.round())
        })
        .show(ui, |plot_ui| {
            for (name, values, color) in series {
                let points: Vec<[f64; 2]> = values
                    .iter()
                    .enumerate()
                    .map(|(i, &v)| [i as f64, v])
                    .collect();
                plot_ui.line(
                    Line::new(PlotPoints::from(points.clone()))
                        .name(name)
                        .color(color)
                        .width(2.5),
                );
                plot_ui.points(
                    Points::new(PlotPoints::from(points))
                        .name(name)
                        .color(color)
                        .radius(4.0),
                );
            }
        });
}

// ---------------------------------------------------------------------------
// Grouped bars: quarterly sales per region
// ---------------------------------------------------------------------------

pub fn region_chart(ui: &mut Ui, breakdown: &RegionBreakdown, colors: &ChartColors, height: f32) {
    if breakdown.is_empty() {
        no_data(ui, height);
        return;
    }

    let labels: Vec<String> = breakdown
        .quarters
        .iter()
        .map(|q| q.bucket.to_string())
        .collect();
    let n = breakdown.regions.len();

    let charts: Vec<BarChart> = breakdown
        .regions
        .iter()
        .enumerate()
        .map(|(j, region)| {
            let bars: Vec<Bar> = breakdown
                .quarters
                .iter()
                .enumerate()
                .map(|(i, q)| {
                    let (x, width) = grouped_position(i as f64, j, n);
                    Bar::new(x, q.count(region) as f64)
                        .width(width)
                        .name(q.bucket.to_string())
                })
                .collect();
            let key = region.clone();
            BarChart::new(bars)
                .name(region)
                .color(colors.regions.color_for(region))
                .element_formatter(Box::new(move |bar: &Bar, _chart: &BarChart| {
                    format!("{key}\nQuarter: {}\nSales: {}", bar.name, bar.value)
                }))
        })
        .collect();

    base_plot("region_breakdown", height)
        .x_axis_formatter(category_axis(labels, 1))
        .y_axis_label("Sales")
        .show(ui, |plot_ui| {
            for chart in charts {
                plot_ui.bar_chart(chart);
            }
        });
}

// ---------------------------------------------------------------------------
// Grouped bars: average price per body style and gender
// ---------------------------------------------------------------------------

pub fn gender_body_chart(
    ui: &mut Ui,
    prices: &GenderBodyPrices,
    colors: &ChartColors,
    height: f32,
) {
    if prices.is_empty() {
        no_data(ui, height);
        return;
    }

    let labels: Vec<String> = prices.rows.iter().map(|r| r.body_style.clone()).collect();
    let n = Gender::ALL.len();

    let charts: Vec<BarChart> = Gender::ALL
        .iter()
        .map(|&gender| {
            let bars: Vec<Bar> = prices
                .rows
                .iter()
                .enumerate()
                .map(|(i, row)| {
                    let (x, width) = grouped_position(i as f64, gender.index(), n);
                    Bar::new(x, row.price_for(gender))
                        .width(width)
                        .name(&row.body_style)
                })
                .collect();
            BarChart::new(bars)
                .name(gender.as_str())
                .color(gender_color(gender, colors))
                .element_formatter(Box::new(move |bar: &Bar, _chart: &BarChart| {
                    format!(
                        "{gender}\nBody: {}\nAvg Price: {}",
                        bar.name,
                        format::dollars(bar.value)
                    )
                }))
        })
        .collect();

    base_plot("gender_body", height)
        .x_axis_formatter(category_axis(labels, 1))
        .y_axis_label("Average price ($)")
        .show(ui, |plot_ui| {
            for chart in charts {
                plot_ui.bar_chart(chart);
            }
        });
}

fn gender_color(gender: Gender, colors: &ChartColors) -> Color32 {
    match gender {
        Gender::Male => colors.primary,
        Gender::Female => colors.secondary,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grouped_positions_fill_the_group() {
        let (first, w) = grouped_position(2.0, 0, 4);
        let (last, _) = grouped_position(2.0, 3, 4);
        assert!((w - 0.2).abs() < 1e-12);
        assert!((first - 1.7).abs() < 1e-12);
        assert!((last - 2.3).abs() < 1e-12);
    }

    #[test]
    fn single_member_group_is_centred() {
        let (x, w) = grouped_position(5.0, 0, 1);
        assert!((x - 5.0).abs() < 1e-12);
        assert!((w - GROUP_WIDTH).abs() < 1e-12);
    }
}
