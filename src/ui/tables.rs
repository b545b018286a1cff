use eframe::egui::{self, RichText, Ui};
use egui_extras::{Column, TableBuilder};

use ipl_statzone::analysis::compare::{fmt_pct, metric, MetricValue, ResultBundle, Table};

use crate::color;
use crate::ui::plot;

const ROW_HEIGHT: f32 = 20.0;

/// `bat_first_win_pct` → `Bat first win %`.
pub fn metric_label(name: &str) -> String {
    let text = name.replace("_pct", " %").replace('_', " ");
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Display text for single-valued metrics; `None` for tables and series.
pub fn fmt_value(name: &str, value: &MetricValue) -> Option<String> {
    match value {
        MetricValue::Count(n) => Some(n.to_string()),
        MetricValue::Scalar(v) if name.ends_with("_pct") => Some(match v {
            Some(_) => format!("{}%", fmt_pct(*v)),
            None => fmt_pct(None),
        }),
        MetricValue::Scalar(v) => Some(fmt_pct(*v)),
        MetricValue::Text(t) => Some(t.clone().unwrap_or_else(|| "-".to_string())),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Overview tab
// ---------------------------------------------------------------------------

pub fn overview(ui: &mut Ui, bundle: &ResultBundle) {
    let total = bundle.entities.len();
    for (i, entity) in bundle.entities.iter().enumerate() {
        let Some(metrics) = bundle.per_entity.get(entity) else {
            continue;
        };
        ui.group(|ui: &mut Ui| {
            ui.heading(RichText::new(entity).color(color::entity_color(i, total)).strong());
            egui::Grid::new(("overview", i))
                .num_columns(2)
                .striped(true)
                .show(ui, |ui: &mut Ui| {
                    for (name, value) in metrics {
                        if let Some(text) = fmt_value(name, value) {
                            ui.label(metric_label(name));
                            ui.strong(text);
                            ui.end_row();
                        }
                    }
                });
        });
        ui.add_space(8.0);
    }
    warnings(ui, bundle, None);
}

/// Placeholder notes for metrics with nothing to show.
pub fn warnings(ui: &mut Ui, bundle: &ResultBundle, scope: Option<&str>) {
    for w in &bundle.warnings {
        if scope.is_some_and(|s| s != w.scope) {
            continue;
        }
        ui.label(RichText::new(format!("⚠ {w}")).color(color::GOLD));
    }
}

// ---------------------------------------------------------------------------
// Compare tab
// ---------------------------------------------------------------------------

pub fn compare(ui: &mut Ui, bundle: &ResultBundle) {
    if bundle.entities.len() < 2 {
        ui.label(format!("Select a second {} to compare.", bundle.kind));
        return;
    }

    let first = &bundle.entities[0];
    let Some(reference) = bundle.per_entity.get(first) else {
        return;
    };
    let total = bundle.entities.len();

    egui::Grid::new("compare_grid")
        .num_columns(total + 1)
        .striped(true)
        .show(ui, |ui: &mut Ui| {
            ui.strong("Metric");
            for (i, entity) in bundle.entities.iter().enumerate() {
                ui.label(RichText::new(entity).color(color::entity_color(i, total)).strong());
            }
            ui.end_row();

            for (name, value) in reference {
                if fmt_value(name, value).is_none() {
                    continue;
                }
                ui.label(metric_label(name));
                for entity in &bundle.entities {
                    let text = bundle
                        .metric(entity, name)
                        .and_then(|v| fmt_value(name, v))
                        .unwrap_or_else(|| "-".to_string());
                    ui.label(text);
                }
                ui.end_row();
            }
        });

    for (key, pair) in &bundle.pairwise {
        let Some(MetricValue::HeadToHead(h)) = pair.get(metric::HEAD_TO_HEAD) else {
            continue;
        };
        ui.add_space(12.0);
        ui.heading(format!("Head to head: {key}"));
        if h.total == 0 {
            warnings(ui, bundle, Some(key.as_str()));
            continue;
        }
        ui.label(format!(
            "{} played, {} won {} ({}%), {} won {} ({}%), {} without a result",
            h.total,
            h.team_a,
            h.wins_a,
            fmt_pct(h.win_pct_a()),
            h.team_b,
            h.wins_b,
            fmt_pct(h.win_pct_b()),
            h.no_results,
        ));
        plot::head_to_head_bars(
            ui,
            key,
            &[
                (h.team_a.clone(), h.wins_a, color::PRIMARY),
                (h.team_b.clone(), h.wins_b, color::GOLD),
                ("No result".to_string(), h.no_results, color::NEUTRAL),
            ],
        );
    }
}

// ---------------------------------------------------------------------------
// Records tab and tabular metrics
// ---------------------------------------------------------------------------

pub fn records(ui: &mut Ui, bundle: &ResultBundle) {
    for entity in &bundle.entities {
        let Some(MetricValue::Table(table)) = bundle.metric(entity, metric::RECORDS) else {
            continue;
        };
        egui::CollapsingHeader::new(
            RichText::new(format!("{entity}  ({} matches)", table.rows.len())).strong(),
        )
        .id_salt(("records", entity))
        .default_open(bundle.entities.len() == 1)
        .show(ui, |ui: &mut Ui| {
            data_table(ui, ("records_table", entity), table);
        });
    }
}

/// Render each named table metric for every entity that has rows.
pub fn metric_tables(ui: &mut Ui, bundle: &ResultBundle, names: &[&str]) {
    for name in names {
        for entity in &bundle.entities {
            let Some(MetricValue::Table(table)) = bundle.metric(entity, name) else {
                continue;
            };
            if table.is_empty() {
                continue;
            }
            ui.heading(format!("{}: {entity}", metric_label(name)));
            data_table(ui, (*name, entity), table);
            ui.add_space(12.0);
        }
    }
}

fn data_table(ui: &mut Ui, id: impl std::hash::Hash, table: &Table) {
    ui.push_id(id, |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .resizable(true)
            .vscroll(false)
            .columns(Column::auto().at_least(60.0), table.columns.len())
            .header(ROW_HEIGHT, |mut header| {
                for col in &table.columns {
                    header.col(|ui: &mut Ui| {
                        ui.strong(col);
                    });
                }
            })
            .body(|body| {
                body.rows(ROW_HEIGHT, table.rows.len(), |mut row| {
                    let cells = &table.rows[row.index()];
                    for cell in cells {
                        row.col(|ui: &mut Ui| {
                            ui.label(cell);
                        });
                    }
                });
            });
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_read_naturally() {
        assert_eq!(metric_label("bat_first_win_pct"), "Bat first win %");
        assert_eq!(metric_label("matches"), "Matches");
    }

    #[test]
    fn percentages_get_a_sign() {
        assert_eq!(fmt_value("win_pct", &MetricValue::Scalar(Some(66.666))).unwrap(), "66.7%");
        assert_eq!(fmt_value("win_pct", &MetricValue::Scalar(None)).unwrap(), "-");
        assert_eq!(fmt_value("avg_target", &MetricValue::Scalar(Some(160.0))).unwrap(), "160.0");
        assert!(fmt_value("records", &MetricValue::Table(Table::default())).is_none());
    }
}
