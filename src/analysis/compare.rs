use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::data::aliases::{canonical_team, canonical_venue, clean_name};
use crate::data::filter::{select, MatchFilter};
use crate::data::model::{CanonicalDataset, MatchRecord, ResultType};
use crate::error::{ComparisonError, EmptyResultWarning, UnknownEntityError};

use super::metrics::{self, HeadToHead, MarginPoint, MarginSummary, SeasonOutcomes, SeasonPoint};

// ---------------------------------------------------------------------------
// Request
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum ComparisonKind {
    Player,
    Team,
    Venue,
    Season,
}

impl ComparisonKind {
    pub const ALL: [ComparisonKind; 4] = [
        ComparisonKind::Player,
        ComparisonKind::Team,
        ComparisonKind::Venue,
        ComparisonKind::Season,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ComparisonKind::Player => "Player",
            ComparisonKind::Team => "Team",
            ComparisonKind::Venue => "Venue",
            ComparisonKind::Season => "Season",
        }
    }
}

impl fmt::Display for ComparisonKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label().to_ascii_lowercase())
    }
}

/// A comparison type plus the selected identifiers, in selection order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComparisonRequest {
    pub kind: ComparisonKind,
    pub entities: Vec<String>,
}

impl ComparisonRequest {
    /// Blank selections are dropped and repeated ones collapsed.
    pub fn new<I, S>(kind: ComparisonKind, entities: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut out: Vec<String> = Vec::new();
        for e in entities {
            let e: String = e.into();
            let e = clean_name(&e);
            if !e.is_empty() && !out.contains(&e) {
                out.push(e);
            }
        }
        ComparisonRequest { kind, entities: out }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComparisonOptions {
    /// Rows kept in ranked tables ("most successful teams" and friends).
    pub top_n: usize,
}

impl Default for ComparisonOptions {
    fn default() -> Self {
        Self { top_n: 10 }
    }
}

// ---------------------------------------------------------------------------
// Result bundle
// ---------------------------------------------------------------------------

/// Metric names used as bundle keys.
pub mod metric {
    pub const MATCHES: &str = "matches";
    pub const WINS: &str = "wins";
    pub const LOSSES: &str = "losses";
    pub const TIES: &str = "ties";
    pub const NO_RESULTS: &str = "no_results";
    pub const WIN_PCT: &str = "win_pct";
    pub const SEASON_TREND: &str = "season_trend";
    pub const SEASON_BREAKDOWN: &str = "season_breakdown";
    pub const TOSS_IMPACT: &str = "toss_impact";
    pub const RESULTS: &str = "results";
    pub const RECORDS: &str = "records";
    pub const AWARDS: &str = "awards";
    pub const TEAMS: &str = "teams";
    pub const FIRST_AWARD: &str = "first_award";
    pub const LATEST_AWARD: &str = "latest_award";
    pub const CITY: &str = "city";
    pub const FIRST_MATCH: &str = "first_match";
    pub const BAT_FIRST_WINS: &str = "bat_first_wins";
    pub const CHASE_WINS: &str = "chase_wins";
    pub const BAT_FIRST_WIN_PCT: &str = "bat_first_win_pct";
    pub const TOSS_WIN_PCT: &str = "toss_win_pct";
    pub const TOP_TEAMS: &str = "top_teams";
    pub const AVG_TARGET: &str = "avg_target";
    pub const AVG_MARGIN: &str = "avg_margin";
    pub const AVG_MARGIN_RUNS: &str = "avg_margin_runs";
    pub const AVG_MARGIN_WICKETS: &str = "avg_margin_wickets";
    pub const SUPER_OVERS: &str = "super_overs";
    pub const WINS_BY_TEAM: &str = "wins_by_team";
    pub const CHAMPION: &str = "champion";
    pub const HEAD_TO_HEAD: &str = "head_to_head";
    pub const MATCH_MARGINS: &str = "match_margins";
    pub const RESULTS_BY_SEASON: &str = "results_by_season";
    pub const VENUE_RANK: &str = "venue_rank";
}

/// Plain rows of display text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    fn new(columns: &[&str]) -> Self {
        Table {
            columns: columns.iter().map(|c| c.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum MetricValue {
    Count(usize),
    /// `None` when undefined (e.g. win % with no decisive match).
    Scalar(Option<f64>),
    Text(Option<String>),
    /// Labelled counts, in meaningful order (ranked or categorical).
    Tally(Vec<(String, usize)>),
    Table(Table),
    Series(Vec<SeasonPoint>),
    HeadToHead(HeadToHead),
    /// One point per match, for margin and target charts.
    Points(Vec<MarginPoint>),
    SeasonTallies(Vec<SeasonOutcomes>),
}

pub type EntityMetrics = BTreeMap<String, MetricValue>;

/// Everything one comparison request produced, keyed by entity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultBundle {
    pub kind: ComparisonKind,
    /// Canonical identifiers, in request order.
    pub entities: Vec<String>,
    pub per_entity: BTreeMap<String, EntityMetrics>,
    /// Metrics over a pair of entities, keyed `"A vs B"`.
    pub pairwise: BTreeMap<String, EntityMetrics>,
    pub warnings: Vec<EmptyResultWarning>,
}

impl ResultBundle {
    pub fn metric(&self, entity: &str, name: &str) -> Option<&MetricValue> {
        self.per_entity.get(entity)?.get(name)
    }

    pub fn pair_key(a: &str, b: &str) -> String {
        format!("{a} vs {b}")
    }
}

// ---------------------------------------------------------------------------
// Entry points
// ---------------------------------------------------------------------------

/// Sorted identifiers offered for a comparison type.
pub fn available_entities(dataset: &CanonicalDataset, kind: ComparisonKind) -> Vec<String> {
    match kind {
        ComparisonKind::Player => dataset.players().iter().cloned().collect(),
        ComparisonKind::Team => dataset.teams().iter().cloned().collect(),
        ComparisonKind::Venue => dataset.venues().iter().cloned().collect(),
        ComparisonKind::Season => dataset.seasons().iter().map(|s| s.to_string()).collect(),
    }
}

pub fn compute_comparison(
    dataset: &CanonicalDataset,
    request: &ComparisonRequest,
) -> Result<ResultBundle, ComparisonError> {
    compute_comparison_with(dataset, request, &ComparisonOptions::default())
}

/// Validate the selection, then compute every metric for the comparison
/// type independently per entity. Nothing is cached between calls.
pub fn compute_comparison_with(
    dataset: &CanonicalDataset,
    request: &ComparisonRequest,
    options: &ComparisonOptions,
) -> Result<ResultBundle, ComparisonError> {
    let kind = request.kind;
    if request.entities.is_empty() {
        return Err(ComparisonError::EmptySelection(kind));
    }

    let resolved = resolve_entities(dataset, request)?;
    let entities: Vec<String> = resolved.iter().map(Entity::id).collect();
    log::debug!("computing {kind} comparison for {entities:?}");

    let mut bundle = ResultBundle {
        kind,
        entities: entities.clone(),
        per_entity: BTreeMap::new(),
        pairwise: BTreeMap::new(),
        warnings: Vec::new(),
    };

    for entity in &resolved {
        let warnings = &mut bundle.warnings;
        let metrics = match entity {
            Entity::Team(team) => team_metrics(dataset, team, warnings),
            Entity::Player(player) => player_metrics(dataset, player, warnings),
            Entity::Venue(venue) => venue_metrics(dataset, venue, options, warnings),
            Entity::Season(season) => season_metrics(dataset, *season, options, warnings),
        };
        bundle.per_entity.insert(entity.id(), metrics);
    }

    if kind == ComparisonKind::Team {
        for (i, a) in entities.iter().enumerate() {
            for b in &entities[i + 1..] {
                let key = ResultBundle::pair_key(a, b);
                let h2h = metrics::head_to_head(dataset, a, b);
                if h2h.total == 0 {
                    bundle.warnings.push(EmptyResultWarning::new(
                        key.clone(),
                        metric::HEAD_TO_HEAD,
                        format!("{a} and {b} have never played each other"),
                    ));
                }
                let mut pair = EntityMetrics::new();
                pair.insert(metric::MATCHES.into(), MetricValue::Count(h2h.total));
                pair.insert(metric::HEAD_TO_HEAD.into(), MetricValue::HeadToHead(h2h));
                bundle.pairwise.insert(key, pair);
            }
        }
    }

    Ok(bundle)
}

/// A selection resolved against the dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Entity {
    Team(String),
    Player(String),
    Venue(String),
    Season(i32),
}

impl Entity {
    fn id(&self) -> String {
        match self {
            Entity::Team(name) | Entity::Player(name) | Entity::Venue(name) => name.clone(),
            Entity::Season(season) => season.to_string(),
        }
    }
}

/// Map every requested identifier to its canonical form, collecting all
/// the ones the dataset does not know.
fn resolve_entities(
    dataset: &CanonicalDataset,
    request: &ComparisonRequest,
) -> Result<Vec<Entity>, UnknownEntityError> {
    let mut resolved: Vec<Entity> = Vec::new();
    let mut unknown: Vec<String> = Vec::new();

    for raw in &request.entities {
        match resolve_entity(dataset, request.kind, raw) {
            Some(id) => {
                if !resolved.contains(&id) {
                    resolved.push(id);
                }
            }
            None => unknown.push(raw.clone()),
        }
    }

    if !unknown.is_empty() {
        log::warn!("unknown {} selection: {unknown:?}", request.kind);
        return Err(UnknownEntityError {
            kind: request.kind,
            identifiers: unknown,
        });
    }
    Ok(resolved)
}

fn resolve_entity(dataset: &CanonicalDataset, kind: ComparisonKind, raw: &str) -> Option<Entity> {
    let raw = clean_name(raw);
    match kind {
        ComparisonKind::Team => {
            let id = canonical_team(&raw);
            dataset.teams().contains(&id).then_some(Entity::Team(id))
        }
        ComparisonKind::Player => dataset.players().contains(&raw).then_some(Entity::Player(raw)),
        ComparisonKind::Venue => {
            if dataset.venues().contains(&raw) {
                return Some(Entity::Venue(raw));
            }
            let id = canonical_venue(&raw, None);
            dataset.venues().contains(&id).then_some(Entity::Venue(id))
        }
        ComparisonKind::Season => {
            let season: i32 = raw.parse().ok()?;
            dataset.seasons().contains(&season).then_some(Entity::Season(season))
        }
    }
}

// ---------------------------------------------------------------------------
// Per-kind metric sets
// ---------------------------------------------------------------------------

fn insert(metrics: &mut EntityMetrics, name: &str, value: MetricValue) {
    metrics.insert(name.to_string(), value);
}

fn insert_margins(metrics: &mut EntityMetrics, margins: &MarginSummary) {
    insert(metrics, metric::AVG_MARGIN, MetricValue::Scalar(margins.overall));
    insert(metrics, metric::AVG_MARGIN_RUNS, MetricValue::Scalar(margins.runs));
    insert(metrics, metric::AVG_MARGIN_WICKETS, MetricValue::Scalar(margins.wickets));
}

fn team_metrics(
    dataset: &CanonicalDataset,
    team: &str,
    warnings: &mut Vec<EmptyResultWarning>,
) -> EntityMetrics {
    let mut m = EntityMetrics::new();
    let record = metrics::team_record(dataset, team);
    let win_pct = record.win_pct();
    if win_pct.is_none() {
        warnings.push(EmptyResultWarning::new(
            team,
            metric::WIN_PCT,
            "no decisive matches, win percentage is undefined",
        ));
    }

    insert(&mut m, metric::MATCHES, MetricValue::Count(record.played));
    insert(&mut m, metric::WINS, MetricValue::Count(record.won));
    insert(&mut m, metric::LOSSES, MetricValue::Count(record.lost));
    insert(&mut m, metric::TIES, MetricValue::Count(record.tied));
    insert(&mut m, metric::NO_RESULTS, MetricValue::Count(record.no_result));
    insert(&mut m, metric::WIN_PCT, MetricValue::Scalar(win_pct));
    insert(
        &mut m,
        metric::SEASON_TREND,
        MetricValue::Series(metrics::team_win_trend(dataset, team)),
    );

    let mut breakdown = Table::new(&["season", "won", "lost", "no result", "win %"]);
    for row in metrics::season_breakdown(dataset, team) {
        breakdown.rows.push(vec![
            row.season.to_string(),
            row.record.won.to_string(),
            row.record.lost.to_string(),
            row.record.no_result.to_string(),
            fmt_pct(row.record.win_pct()),
        ]);
    }
    insert(&mut m, metric::SEASON_BREAKDOWN, MetricValue::Table(breakdown));

    let mut toss = Table::new(&["toss decision", "won", "lost", "no result"]);
    for row in metrics::toss_impact(dataset, team) {
        toss.rows.push(vec![
            row.decision,
            row.won.to_string(),
            row.lost.to_string(),
            row.no_result.to_string(),
        ]);
    }
    insert(&mut m, metric::TOSS_IMPACT, MetricValue::Table(toss));

    let matches = select(dataset, &MatchFilter::Team(team));
    insert(&mut m, metric::RESULTS, MetricValue::Tally(metrics::result_breakdown(&matches)));
    insert_margins(&mut m, &metrics::average_margins(&matches));
    insert(&mut m, metric::MATCH_MARGINS, MetricValue::Points(metrics::margin_points(&matches)));
    insert(&mut m, metric::RECORDS, MetricValue::Table(records_table(&matches, true)));
    m
}

fn player_metrics(
    dataset: &CanonicalDataset,
    player: &str,
    warnings: &mut Vec<EmptyResultWarning>,
) -> EntityMetrics {
    let mut m = EntityMetrics::new();
    let summary = metrics::player_summary(dataset, player);
    if summary.awards == 0 {
        warnings.push(EmptyResultWarning::new(
            player,
            metric::AWARDS,
            "no player of the match awards recorded",
        ));
    }

    insert(&mut m, metric::AWARDS, MetricValue::Count(summary.awards));
    insert(&mut m, metric::TEAMS, MetricValue::Count(summary.teams.len()));
    insert(
        &mut m,
        metric::FIRST_AWARD,
        MetricValue::Text(summary.first_award.map(|d| d.to_string())),
    );
    insert(
        &mut m,
        metric::LATEST_AWARD,
        MetricValue::Text(summary.latest_award.map(|d| d.to_string())),
    );
    insert(
        &mut m,
        metric::SEASON_TREND,
        MetricValue::Series(metrics::award_trend(dataset, player)),
    );
    insert(&mut m, metric::RESULTS, MetricValue::Tally(summary.results));
    insert_margins(&mut m, &summary.margins);

    let matches = select(dataset, &MatchFilter::PlayerOfMatch(player));
    insert(&mut m, metric::MATCH_MARGINS, MetricValue::Points(metrics::margin_points(&matches)));
    insert(&mut m, metric::RECORDS, MetricValue::Table(records_table(&matches, true)));
    m
}

fn venue_metrics(
    dataset: &CanonicalDataset,
    venue: &str,
    options: &ComparisonOptions,
    warnings: &mut Vec<EmptyResultWarning>,
) -> EntityMetrics {
    let mut m = EntityMetrics::new();
    let summary = metrics::venue_summary(dataset, venue, options.top_n);
    if summary.bat_first_win_pct.is_none() {
        warnings.push(EmptyResultWarning::new(
            venue,
            metric::BAT_FIRST_WIN_PCT,
            "no decisive match with a known margin at this venue",
        ));
    }

    insert(&mut m, metric::MATCHES, MetricValue::Count(summary.matches));
    if let Some((rank, _)) = metrics::venue_rank(dataset, venue) {
        insert(&mut m, metric::VENUE_RANK, MetricValue::Count(rank));
    }
    insert(&mut m, metric::CITY, MetricValue::Text(summary.city));
    insert(
        &mut m,
        metric::FIRST_MATCH,
        MetricValue::Text(summary.first_match.map(|d| d.to_string())),
    );
    insert(&mut m, metric::BAT_FIRST_WINS, MetricValue::Count(summary.bat_first_wins));
    insert(&mut m, metric::CHASE_WINS, MetricValue::Count(summary.chase_wins));
    insert(&mut m, metric::BAT_FIRST_WIN_PCT, MetricValue::Scalar(summary.bat_first_win_pct));
    insert(&mut m, metric::TOSS_WIN_PCT, MetricValue::Scalar(summary.toss_win_pct));
    insert(&mut m, metric::AVG_TARGET, MetricValue::Scalar(summary.avg_target));
    insert_margins(&mut m, &summary.margins);
    insert(&mut m, metric::RESULTS, MetricValue::Tally(summary.results));
    insert(&mut m, metric::TOP_TEAMS, MetricValue::Tally(summary.top_teams));
    insert(
        &mut m,
        metric::SEASON_TREND,
        MetricValue::Series(metrics::venue_trend(dataset, venue)),
    );

    let matches = select(dataset, &MatchFilter::Venue(venue));
    insert(&mut m, metric::MATCH_MARGINS, MetricValue::Points(metrics::margin_points(&matches)));
    insert(
        &mut m,
        metric::RESULTS_BY_SEASON,
        MetricValue::SeasonTallies(metrics::results_by_season(&matches)),
    );
    insert(&mut m, metric::RECORDS, MetricValue::Table(records_table(&matches, true)));
    m
}

fn season_metrics(
    dataset: &CanonicalDataset,
    season: i32,
    options: &ComparisonOptions,
    warnings: &mut Vec<EmptyResultWarning>,
) -> EntityMetrics {
    let mut m = EntityMetrics::new();
    let summary = metrics::season_summary(dataset, season, options.top_n);
    if summary.avg_target.is_none() {
        warnings.push(EmptyResultWarning::new(
            season.to_string(),
            metric::AVG_TARGET,
            "no target runs recorded for this season",
        ));
    }

    insert(&mut m, metric::MATCHES, MetricValue::Count(summary.matches));
    insert(&mut m, metric::TEAMS, MetricValue::Count(summary.teams.len()));
    insert(&mut m, metric::SUPER_OVERS, MetricValue::Count(summary.super_overs));
    insert(&mut m, metric::AVG_TARGET, MetricValue::Scalar(summary.avg_target));
    insert_margins(&mut m, &summary.margins);
    insert(&mut m, metric::WINS_BY_TEAM, MetricValue::Tally(summary.wins_by_team));
    insert(&mut m, metric::CHAMPION, MetricValue::Text(summary.champion));

    let matches = select(dataset, &MatchFilter::Season(season));
    insert(&mut m, metric::RESULTS, MetricValue::Tally(metrics::result_breakdown(&matches)));
    insert(&mut m, metric::MATCH_MARGINS, MetricValue::Points(metrics::margin_points(&matches)));
    insert(&mut m, metric::RECORDS, MetricValue::Table(records_table(&matches, false)));
    m
}

// ---------------------------------------------------------------------------
// Detailed records
// ---------------------------------------------------------------------------

const RECORD_COLUMNS: &[&str] = &[
    "date",
    "season",
    "venue",
    "team1",
    "team2",
    "toss",
    "winner",
    "result",
    "player of match",
];

/// One row per match; newest first unless `newest_first` is false.
fn records_table(matches: &[&MatchRecord], newest_first: bool) -> Table {
    let mut table = Table::new(RECORD_COLUMNS);
    let mut ordered: Vec<&MatchRecord> = matches.to_vec();
    if newest_first {
        ordered.reverse();
    }
    for m in ordered {
        let toss = match (&m.toss_winner, m.toss_decision) {
            (Some(t), Some(d)) => format!("{t} ({})", d.label()),
            (Some(t), None) => t.clone(),
            _ => String::new(),
        };
        let result = match (m.result_type, m.margin) {
            (ResultType::Normal, Some(margin)) => format!("won by {margin}"),
            (rt, _) => rt.label().to_string(),
        };
        table.rows.push(vec![
            m.date.to_string(),
            m.season.to_string(),
            m.venue.clone().unwrap_or_default(),
            m.team_a.clone(),
            m.team_b.clone(),
            toss,
            m.winner.clone().unwrap_or_default(),
            result,
            m.player_of_match.clone().unwrap_or_default(),
        ]);
    }
    table
}

/// `66.7` style, `-` when undefined.
pub fn fmt_pct(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{v:.1}"),
        None => "-".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{LoadReport, Margin, MarginUnit};
    use chrono::NaiveDate;

    fn m(season: i32, day: u32, a: &str, b: &str, winner: Option<&str>, venue: &str) -> MatchRecord {
        MatchRecord {
            id: None,
            season,
            date: NaiveDate::from_ymd_opt(season, 4, day).unwrap(),
            venue: Some(venue.to_string()),
            city: None,
            match_type: None,
            team_a: a.to_string(),
            team_b: b.to_string(),
            toss_winner: None,
            toss_decision: None,
            winner: winner.map(str::to_string),
            result_type: if winner.is_some() {
                ResultType::Normal
            } else {
                ResultType::NoResult
            },
            margin: winner.map(|_| Margin {
                value: 10.0,
                unit: Some(MarginUnit::Runs),
            }),
            target_runs: Some(170.0),
            target_overs: Some(20.0),
            super_over: false,
            method: None,
            player_of_match: winner.map(|w| format!("{w} Star")),
        }
    }

    fn sample() -> CanonicalDataset {
        CanonicalDataset::from_matches(
            vec![
                m(2010, 1, "Mumbai Indians", "Chennai Super Kings", Some("Mumbai Indians"), "Wankhede Stadium"),
                m(2010, 5, "Chennai Super Kings", "Mumbai Indians", Some("Mumbai Indians"), "Chepauk"),
                m(2011, 3, "Mumbai Indians", "Chennai Super Kings", Some("Chennai Super Kings"), "Wankhede Stadium"),
                m(2011, 9, "Delhi Capitals", "Punjab Kings", None, "Feroz Shah Kotla"),
            ],
            LoadReport::default(),
        )
    }

    #[test]
    fn request_drops_blank_and_repeated_selections() {
        let req = ComparisonRequest::new(ComparisonKind::Team, ["A", " ", "A ", "B"]);
        assert_eq!(req.entities, vec!["A", "B"]);
    }

    #[test]
    fn unknown_team_is_rejected() {
        let ds = sample();
        let req = ComparisonRequest::new(ComparisonKind::Team, ["Team Z"]);
        let err = compute_comparison(&ds, &req).unwrap_err();
        assert_eq!(
            err,
            ComparisonError::UnknownEntity(UnknownEntityError {
                kind: ComparisonKind::Team,
                identifiers: vec!["Team Z".to_string()],
            })
        );
    }

    #[test]
    fn every_unknown_identifier_is_reported() {
        let ds = sample();
        let req = ComparisonRequest::new(ComparisonKind::Season, ["2010", "1999", "abc"]);
        match compute_comparison(&ds, &req) {
            Err(ComparisonError::UnknownEntity(e)) => assert_eq!(e.identifiers, vec!["1999", "abc"]),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn empty_selection_is_an_error() {
        let ds = sample();
        let req = ComparisonRequest::new(ComparisonKind::Venue, Vec::<String>::new());
        assert_eq!(
            compute_comparison(&ds, &req).unwrap_err(),
            ComparisonError::EmptySelection(ComparisonKind::Venue)
        );
    }

    #[test]
    fn team_aliases_resolve_to_canonical_names() {
        let ds = sample();
        let req = ComparisonRequest::new(ComparisonKind::Team, ["Kings XI Punjab", "Punjab Kings"]);
        let bundle = compute_comparison(&ds, &req).unwrap();
        assert_eq!(bundle.entities, vec!["Punjab Kings"]);
        assert!(bundle.pairwise.is_empty());
    }

    #[test]
    fn team_pair_gets_head_to_head() {
        let ds = sample();
        let req = ComparisonRequest::new(
            ComparisonKind::Team,
            ["Mumbai Indians", "Chennai Super Kings"],
        );
        let bundle = compute_comparison(&ds, &req).unwrap();
        let key = ResultBundle::pair_key("Mumbai Indians", "Chennai Super Kings");
        match bundle.pairwise[&key].get(metric::HEAD_TO_HEAD) {
            Some(MetricValue::HeadToHead(h)) => {
                assert_eq!((h.wins_a, h.wins_b, h.no_results), (2, 1, 0));
                assert_eq!(fmt_pct(h.win_pct_a()), "66.7");
            }
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(
            bundle.metric("Mumbai Indians", metric::WINS),
            Some(&MetricValue::Count(2))
        );
    }

    #[test]
    fn teams_that_never_met_produce_a_warning() {
        let ds = sample();
        let req = ComparisonRequest::new(ComparisonKind::Team, ["Mumbai Indians", "Delhi Capitals"]);
        let bundle = compute_comparison(&ds, &req).unwrap();
        let key = ResultBundle::pair_key("Mumbai Indians", "Delhi Capitals");
        assert_eq!(bundle.pairwise[&key][metric::MATCHES], MetricValue::Count(0));
        assert!(bundle
            .warnings
            .iter()
            .any(|w| w.scope == key && w.metric == metric::HEAD_TO_HEAD));
        // Delhi only has a washout, so its win % is undefined.
        assert_eq!(
            bundle.metric("Delhi Capitals", metric::WIN_PCT),
            Some(&MetricValue::Scalar(None))
        );
        assert!(bundle.warnings.iter().any(|w| w.scope == "Delhi Capitals"));
    }

    #[test]
    fn recomputation_is_idempotent() {
        let ds = sample();
        let req = ComparisonRequest::new(ComparisonKind::Venue, ["Wankhede Stadium", "Chepauk"]);
        let first = compute_comparison(&ds, &req).unwrap();
        let second = compute_comparison(&ds, &req).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn season_records_are_chronological() {
        let ds = sample();
        let req = ComparisonRequest::new(ComparisonKind::Season, ["2011"]);
        let bundle = compute_comparison(&ds, &req).unwrap();
        match bundle.metric("2011", metric::RECORDS) {
            Some(MetricValue::Table(t)) => {
                assert_eq!(t.rows.len(), 2);
                assert_eq!(t.rows[0][0], "2011-04-03");
                assert_eq!(t.rows[1][0], "2011-04-09");
            }
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(bundle.metric("2011", metric::MATCHES), Some(&MetricValue::Count(2)));
    }

    #[test]
    fn player_records_are_newest_first() {
        let ds = sample();
        let req = ComparisonRequest::new(ComparisonKind::Player, ["Mumbai Indians Star"]);
        let bundle = compute_comparison(&ds, &req).unwrap();
        assert_eq!(
            bundle.metric("Mumbai Indians Star", metric::AWARDS),
            Some(&MetricValue::Count(2))
        );
        match bundle.metric("Mumbai Indians Star", metric::RECORDS) {
            Some(MetricValue::Table(t)) => assert_eq!(t.rows[0][0], "2010-04-05"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn season_selection_carries_its_matches() {
        let ds = sample();
        let req = ComparisonRequest::new(ComparisonKind::Season, [" 2010 "]);
        let bundle = compute_comparison(&ds, &req).unwrap();
        assert_eq!(bundle.entities, vec!["2010"]);
        match bundle.metric("2010", metric::MATCH_MARGINS) {
            Some(MetricValue::Points(points)) => {
                assert_eq!(points.len(), 2);
                assert!(points.iter().all(|p| p.season == 2010));
                assert!(points.iter().all(|p| p.margin == Some(10.0)));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn venue_comparison_has_rank_and_season_results() {
        let ds = sample();
        let req = ComparisonRequest::new(ComparisonKind::Venue, ["Wankhede Stadium", "Chepauk"]);
        let bundle = compute_comparison(&ds, &req).unwrap();
        assert_eq!(
            bundle.metric("Wankhede Stadium", metric::VENUE_RANK),
            Some(&MetricValue::Count(1))
        );
        // Chepauk and Feroz Shah Kotla host one match each; ties go by name.
        assert_eq!(bundle.metric("Chepauk", metric::VENUE_RANK), Some(&MetricValue::Count(2)));
        match bundle.metric("Wankhede Stadium", metric::RESULTS_BY_SEASON) {
            Some(MetricValue::SeasonTallies(t)) => {
                let seasons: Vec<i32> = t.iter().map(|s| s.season).collect();
                assert_eq!(seasons, vec![2010, 2011]);
                assert_eq!(t[0].outcomes, vec![("runs".to_string(), 1)]);
            }
            other => panic!("unexpected {other:?}"),
        }
        assert!(matches!(
            bundle.metric("Chepauk", metric::MATCH_MARGINS),
            Some(MetricValue::Points(p)) if p.len() == 1
        ));
    }

    #[test]
    fn player_margins_cover_award_matches() {
        let ds = sample();
        let req = ComparisonRequest::new(ComparisonKind::Player, ["Mumbai Indians Star"]);
        let bundle = compute_comparison(&ds, &req).unwrap();
        match bundle.metric("Mumbai Indians Star", metric::MATCH_MARGINS) {
            Some(MetricValue::Points(points)) => {
                assert_eq!(points.len(), 2);
                assert!(points.iter().all(|p| p.unit == Some(MarginUnit::Runs)));
                assert!(points.iter().all(|p| p.target_runs == Some(170.0)));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn available_entities_are_sorted() {
        let ds = sample();
        assert_eq!(available_entities(&ds, ComparisonKind::Season), vec!["2010", "2011"]);
        let teams = available_entities(&ds, ComparisonKind::Team);
        assert_eq!(teams.first().map(String::as_str), Some("Chennai Super Kings"));
        assert_eq!(teams.len(), 4);
    }
}
