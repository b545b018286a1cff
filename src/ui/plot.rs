use std::collections::BTreeMap;

use eframe::egui::{Color32, RichText, Ui};
use egui_plot::{
    Bar, BarChart, BoxElem, BoxPlot, BoxSpread, Legend, Line, MarkerShape, Plot, PlotPoints, Points,
};

use ipl_statzone::analysis::compare::{metric, ComparisonKind, MetricValue, ResultBundle};
use ipl_statzone::analysis::metrics::{five_number_summary, MarginPoint, SeasonOutcomes};
use ipl_statzone::data::model::MarginUnit;

use crate::color;
use crate::ui::tables;

const CHART_HEIGHT: f32 = 280.0;

// ---------------------------------------------------------------------------
// Trends tab
// ---------------------------------------------------------------------------

/// Season-by-season lines, one per selected entity.
pub fn trends(ui: &mut Ui, bundle: &ResultBundle) {
    if bundle.kind == ComparisonKind::Season {
        ui.heading("Scoring by season");
        scalar_bars(
            ui,
            "season_scoring",
            bundle,
            &[metric::AVG_TARGET, metric::AVG_MARGIN_RUNS, metric::AVG_MARGIN_WICKETS],
        );
        return;
    }

    let y_label = match bundle.kind {
        ComparisonKind::Team => "Win %",
        ComparisonKind::Player => "Player of the match awards",
        _ => "Matches hosted",
    };
    ui.heading(format!("{y_label} by season"));

    let total = bundle.entities.len();
    Plot::new("season_trend")
        .legend(Legend::default())
        .height(CHART_HEIGHT)
        .x_axis_label("Season")
        .y_axis_label(y_label)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            for (i, entity) in bundle.entities.iter().enumerate() {
                let Some(MetricValue::Series(series)) = bundle.metric(entity, metric::SEASON_TREND)
                else {
                    continue;
                };
                // Seasons with an undefined value are left out of the line.
                let points: Vec<[f64; 2]> = series
                    .iter()
                    .filter_map(|p| Some([p.season as f64, p.value?]))
                    .collect();
                let c = color::entity_color(i, total);

                plot_ui.line(
                    Line::new(PlotPoints::from(points.clone()))
                        .name(entity)
                        .color(c)
                        .width(2.0),
                );
                plot_ui.points(Points::new(PlotPoints::from(points)).radius(3.0).color(c));
            }
        });
}

// ---------------------------------------------------------------------------
// Results tab
// ---------------------------------------------------------------------------

pub fn results(ui: &mut Ui, bundle: &ResultBundle) {
    let charts = [
        (metric::RESULTS, "How matches were decided"),
        (metric::TOP_TEAMS, "Most successful teams"),
        (metric::WINS_BY_TEAM, "Wins by team"),
    ];
    for (name, title) in charts {
        if bundle.entities.iter().any(|e| bundle.metric(e, name).is_some()) {
            ui.heading(title);
            tally_bars(ui, name, bundle, name);
            ui.add_space(12.0);
        }
    }

    if bundle.entities.iter().any(|e| bundle.metric(e, metric::MATCH_MARGINS).is_some()) {
        for unit in [MarginUnit::Runs, MarginUnit::Wickets] {
            ui.heading(format!("Winning margins ({})", unit.label()));
            margin_histogram(ui, bundle, unit);
            ui.add_space(12.0);
        }
        if bundle.kind == ComparisonKind::Venue {
            ui.heading("Margin spread by venue");
            ui.columns(2, |cols| {
                margin_boxes(&mut cols[0], bundle, MarginUnit::Runs);
                margin_boxes(&mut cols[1], bundle, MarginUnit::Wickets);
            });
            ui.add_space(12.0);
        }
        ui.heading("Target against margin");
        target_scatter(ui, bundle);
        ui.add_space(12.0);
    }

    for (i, entity) in bundle.entities.iter().enumerate() {
        if let Some(MetricValue::SeasonTallies(tallies)) =
            bundle.metric(entity, metric::RESULTS_BY_SEASON)
        {
            ui.heading(format!("Results by season at {entity}"));
            season_results(ui, ("season_results", i), tallies);
            ui.add_space(12.0);
        }
    }

    tables::metric_tables(ui, bundle, &[metric::SEASON_BREAKDOWN, metric::TOSS_IMPACT]);
}

// ---------------------------------------------------------------------------
// Margin charts
// ---------------------------------------------------------------------------

fn margin_points<'b>(bundle: &'b ResultBundle, entity: &str) -> &'b [MarginPoint] {
    match bundle.metric(entity, metric::MATCH_MARGINS) {
        Some(MetricValue::Points(points)) => points,
        _ => &[],
    }
}

fn margins_in(points: &[MarginPoint], unit: MarginUnit) -> Vec<f64> {
    points
        .iter()
        .filter(|p| p.unit == Some(unit))
        .filter_map(|p| p.margin)
        .collect()
}

/// Bin width: ten runs, or a single wicket.
fn bin_width(unit: MarginUnit) -> f64 {
    match unit {
        MarginUnit::Runs => 10.0,
        MarginUnit::Wickets => 1.0,
    }
}

/// Counts keyed by the lower edge of each bin.
fn histogram(values: &[f64], width: f64) -> BTreeMap<i64, usize> {
    let mut bins = BTreeMap::new();
    for v in values.iter().filter(|v| v.is_finite()) {
        *bins.entry((v / width).floor() as i64).or_insert(0) += 1;
    }
    bins
}

fn margin_histogram(ui: &mut Ui, bundle: &ResultBundle, unit: MarginUnit) {
    let width = bin_width(unit);
    let total = bundle.entities.len();
    let n = total.max(1) as f64;
    let bar_width = width * 0.8 / n;

    let charts: Vec<BarChart> = bundle
        .entities
        .iter()
        .enumerate()
        .map(|(i, entity)| {
            let offset = (i as f64 - (n - 1.0) / 2.0) * bar_width;
            let bars = histogram(&margins_in(margin_points(bundle, entity), unit), width)
                .into_iter()
                .map(|(bin, count)| {
                    let centre = (bin as f64 + 0.5) * width;
                    Bar::new(centre + offset, count as f64).width(bar_width)
                })
                .collect();
            BarChart::new(bars)
                .name(entity)
                .color(color::entity_color(i, total))
        })
        .collect();

    Plot::new(("margin_histogram", unit.label()))
        .legend(Legend::default())
        .height(CHART_HEIGHT)
        .x_axis_label(format!("Margin ({})", unit.label()))
        .y_axis_label("Matches")
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            for chart in charts {
                plot_ui.bar_chart(chart);
            }
        });
}

/// One box per entity: min, quartiles and max of its margins in `unit`.
fn margin_boxes(ui: &mut Ui, bundle: &ResultBundle, unit: MarginUnit) {
    let total = bundle.entities.len();
    let boxes: Vec<BoxPlot> = bundle
        .entities
        .iter()
        .enumerate()
        .filter_map(|(i, entity)| {
            let s = five_number_summary(&margins_in(margin_points(bundle, entity), unit))?;
            let c = color::entity_color(i, total);
            let elem = BoxElem::new(i as f64, BoxSpread::new(s.min, s.q1, s.median, s.q3, s.max))
                .name(entity)
                .box_width(0.5)
                .fill(c.gamma_multiply(0.4));
            Some(BoxPlot::new(vec![elem]).name(entity).color(c))
        })
        .collect();
    if boxes.is_empty() {
        ui.label(RichText::new(format!("No {} margins", unit.label())).italics());
        return;
    }

    Plot::new(("margin_boxes", unit.label()))
        .legend(Legend::default())
        .height(CHART_HEIGHT)
        .y_axis_label(format!("Margin ({})", unit.label()))
        .allow_scroll(false)
        .allow_drag(false)
        .show_axes([false, true])
        .show(ui, |plot_ui| {
            for b in boxes {
                plot_ui.box_plot(b);
            }
        });
}

fn target_scatter(ui: &mut Ui, bundle: &ResultBundle) {
    let total = bundle.entities.len();
    Plot::new("target_vs_margin")
        .legend(Legend::default())
        .height(CHART_HEIGHT)
        .x_axis_label("Target runs")
        .y_axis_label("Margin")
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            for (i, entity) in bundle.entities.iter().enumerate() {
                let c = color::entity_color(i, total);
                for (unit, shape) in [
                    (MarginUnit::Runs, MarkerShape::Circle),
                    (MarginUnit::Wickets, MarkerShape::Diamond),
                ] {
                    let xy: Vec<[f64; 2]> = margin_points(bundle, entity)
                        .iter()
                        .filter(|p| p.unit == Some(unit))
                        .filter_map(|p| Some([p.target_runs?, p.margin?]))
                        .collect();
                    if xy.is_empty() {
                        continue;
                    }
                    plot_ui.points(
                        Points::new(PlotPoints::from(xy))
                            .name(format!("{entity} ({})", unit.label()))
                            .shape(shape)
                            .radius(3.0)
                            .color(c),
                    );
                }
            }
        });
}

/// Season on the x axis, one stacked segment per outcome.
fn season_results(
    ui: &mut Ui,
    id: (&str, usize),
    tallies: &[SeasonOutcomes],
) {
    let mut outcomes: Vec<&str> = Vec::new();
    for t in tallies {
        for (label, _) in &t.outcomes {
            if !outcomes.contains(&label.as_str()) {
                outcomes.push(label);
            }
        }
    }

    let mut charts: Vec<BarChart> = Vec::new();
    for label in outcomes {
        let bars: Vec<Bar> = tallies
            .iter()
            .filter_map(|t| {
                let n = t.outcomes.iter().find(|(l, _)| l == label)?.1;
                Some(Bar::new(t.season as f64, n as f64).width(0.6))
            })
            .collect();
        let below: Vec<&BarChart> = charts.iter().collect();
        let chart = BarChart::new(bars)
            .name(label)
            .color(color::outcome_color(label))
            .stack_on(&below);
        charts.push(chart);
    }

    Plot::new(id)
        .legend(Legend::default())
        .height(CHART_HEIGHT)
        .x_axis_label("Season")
        .y_axis_label("Matches")
        .allow_scroll(false)
        .allow_drag(false)
        .show(ui, |plot_ui| {
            for chart in charts {
                plot_ui.bar_chart(chart);
            }
        });
}

// ---------------------------------------------------------------------------
// Bar charts
// ---------------------------------------------------------------------------

/// Grouped bars: one group per category label, one bar per entity.
pub fn tally_bars(ui: &mut Ui, id: &str, bundle: &ResultBundle, name: &str) {
    let mut categories: Vec<String> = Vec::new();
    for entity in &bundle.entities {
        if let Some(MetricValue::Tally(rows)) = bundle.metric(entity, name) {
            for (label, _) in rows {
                if !categories.contains(label) {
                    categories.push(label.clone());
                }
            }
        }
    }
    if categories.is_empty() {
        ui.label(RichText::new("No data").italics());
        return;
    }

    let single = bundle.entities.len() == 1;
    let charts: Vec<BarChart> = grouped(bundle, &categories, |entity| {
        match bundle.metric(entity, name) {
            Some(MetricValue::Tally(rows)) => rows
                .iter()
                .map(|(label, n)| (label.clone(), *n as f64))
                .collect(),
            _ => Vec::new(),
        }
    })
    .into_iter()
    .map(|(entity, i, bars)| {
        // A single entity gets per-category colours for result breakdowns.
        let bars = if single && name == metric::RESULTS {
            bars.into_iter()
                .map(|b| {
                    let fill = color::outcome_color(&b.name);
                    b.fill(fill)
                })
                .collect()
        } else {
            bars
        };
        BarChart::new(bars)
            .name(entity)
            .color(color::entity_color(i, bundle.entities.len()))
    })
    .collect();

    show_bars(ui, id, categories, charts);
}

/// Compare single-valued metrics across entities.
pub fn scalar_bars(ui: &mut Ui, id: &str, bundle: &ResultBundle, names: &[&str]) {
    let categories: Vec<String> = names.iter().map(|n| tables::metric_label(n)).collect();
    let charts: Vec<BarChart> = grouped(bundle, &categories, |entity| {
        names
            .iter()
            .zip(&categories)
            .filter_map(|(name, label)| match bundle.metric(entity, name) {
                Some(MetricValue::Scalar(Some(v))) => Some((label.clone(), *v)),
                Some(MetricValue::Count(n)) => Some((label.clone(), *n as f64)),
                _ => None,
            })
            .collect()
    })
    .into_iter()
    .map(|(entity, i, bars)| {
        BarChart::new(bars)
            .name(entity)
            .color(color::entity_color(i, bundle.entities.len()))
    })
    .collect();

    show_bars(ui, id, categories, charts);
}

/// Lay out `(label, value)` pairs from every entity side by side within
/// each category slot.
fn grouped<'b, F>(
    bundle: &'b ResultBundle,
    categories: &[String],
    values: F,
) -> Vec<(&'b str, usize, Vec<Bar>)>
where
    F: Fn(&str) -> Vec<(String, f64)>,
{
    let n = bundle.entities.len().max(1) as f64;
    let width = 0.8 / n;
    bundle
        .entities
        .iter()
        .enumerate()
        .map(|(i, entity)| {
            let offset = (i as f64 - (n - 1.0) / 2.0) * width;
            let bars = values(entity)
                .into_iter()
                .filter_map(|(label, v)| {
                    let slot = categories.iter().position(|c| *c == label)?;
                    Some(Bar::new(slot as f64 + offset, v).width(width).name(label))
                })
                .collect();
            (entity.as_str(), i, bars)
        })
        .collect()
}

fn show_bars(ui: &mut Ui, id: &str, categories: Vec<String>, charts: Vec<BarChart>) {
    Plot::new(id)
        .legend(Legend::default())
        .height(CHART_HEIGHT)
        .allow_scroll(false)
        .allow_drag(false)
        .show_grid([false, true])
        .x_axis_formatter(move |mark, _range| {
            let slot = mark.value.round();
            if (mark.value - slot).abs() > 1e-6 || slot < 0.0 {
                return String::new();
            }
            categories.get(slot as usize).cloned().unwrap_or_default()
        })
        .show(ui, |plot_ui| {
            for chart in charts {
                plot_ui.bar_chart(chart);
            }
        });
}

/// Head-to-head wins as a three-bar chart.
pub fn head_to_head_bars(ui: &mut Ui, id: &str, rows: &[(String, usize, Color32)]) {
    let categories: Vec<String> = rows.iter().map(|(l, _, _)| l.clone()).collect();
    let bars: Vec<Bar> = rows
        .iter()
        .enumerate()
        .map(|(i, (label, n, fill))| {
            Bar::new(i as f64, *n as f64)
                .width(0.6)
                .name(label)
                .fill(*fill)
        })
        .collect();
    show_bars(ui, id, categories, vec![BarChart::new(bars).name("Wins")]);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn margins_fall_into_their_bins() {
        let runs = histogram(&[1.0, 9.9, 10.0, 45.0, f64::NAN], bin_width(MarginUnit::Runs));
        assert_eq!(runs.into_iter().collect::<Vec<_>>(), vec![(0, 2), (1, 1), (4, 1)]);
        let wickets = histogram(&[3.0, 3.0, 7.0], bin_width(MarginUnit::Wickets));
        assert_eq!(wickets.get(&3), Some(&2));
        assert_eq!(wickets.get(&7), Some(&1));
    }
}
