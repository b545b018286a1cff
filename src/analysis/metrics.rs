//! Pure aggregate queries over a [`CanonicalDataset`].
//!
//! Nothing here mutates the dataset or keeps state between calls; every
//! function takes the dataset explicitly so it can be exercised on a
//! hand-built table in tests.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use chrono::NaiveDate;
use serde::Serialize;

use crate::data::filter::{select, MatchFilter};
use crate::data::model::{CanonicalDataset, MarginUnit, MatchRecord, ResultType};

// ---------------------------------------------------------------------------
// Win percentage
// ---------------------------------------------------------------------------

/// `won / decisive × 100`, undefined when nothing was decided.
pub fn win_percentage(won: usize, decisive: usize) -> Option<f64> {
    if decisive == 0 {
        return None;
    }
    Some(won.min(decisive) as f64 / decisive as f64 * 100.0)
}

/// Win/loss tally for one team. `played = won + lost + no_result`; ties
/// settled by a super over count as won/lost and are also counted in `tied`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TeamRecord {
    pub played: usize,
    pub won: usize,
    pub lost: usize,
    pub tied: usize,
    pub no_result: usize,
}

impl TeamRecord {
    fn add(&mut self, m: &MatchRecord, team: &str) {
        self.played += 1;
        if m.result_type == ResultType::Tie {
            self.tied += 1;
        }
        match m.winner.as_deref() {
            Some(w) if w == team => self.won += 1,
            Some(_) => self.lost += 1,
            None => self.no_result += 1,
        }
    }

    pub fn decisive(&self) -> usize {
        self.won + self.lost
    }

    pub fn win_pct(&self) -> Option<f64> {
        win_percentage(self.won, self.decisive())
    }
}

pub fn team_record(dataset: &CanonicalDataset, team: &str) -> TeamRecord {
    let mut record = TeamRecord::default();
    for m in select(dataset, &MatchFilter::Team(team)) {
        record.add(m, team);
    }
    record
}

// ---------------------------------------------------------------------------
// Head-to-head
// ---------------------------------------------------------------------------

/// Results between two teams. Every match without a declared winner lands
/// in `no_results`, so `wins_a + wins_b + no_results == total`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeadToHead {
    pub team_a: String,
    pub team_b: String,
    pub wins_a: usize,
    pub wins_b: usize,
    pub no_results: usize,
    pub total: usize,
}

impl HeadToHead {
    pub fn win_pct_a(&self) -> Option<f64> {
        win_percentage(self.wins_a, self.wins_a + self.wins_b)
    }

    pub fn win_pct_b(&self) -> Option<f64> {
        win_percentage(self.wins_b, self.wins_a + self.wins_b)
    }
}

pub fn head_to_head(dataset: &CanonicalDataset, team_a: &str, team_b: &str) -> HeadToHead {
    let mut h2h = HeadToHead {
        team_a: team_a.to_string(),
        team_b: team_b.to_string(),
        wins_a: 0,
        wins_b: 0,
        no_results: 0,
        total: 0,
    };
    for m in select(dataset, &MatchFilter::Pair(team_a, team_b)) {
        h2h.total += 1;
        match m.winner.as_deref() {
            Some(w) if w == team_a => h2h.wins_a += 1,
            Some(_) => h2h.wins_b += 1,
            None => h2h.no_results += 1,
        }
    }
    h2h
}

// ---------------------------------------------------------------------------
// Ranking helpers
// ---------------------------------------------------------------------------

/// Sort `(label, count)` pairs by count descending; equal counts fall back
/// to alphabetical label so output is stable across runs.
pub fn rank_counts<I>(counts: I) -> Vec<(String, usize)>
where
    I: IntoIterator<Item = (String, usize)>,
{
    let mut ranked: Vec<(String, usize)> = counts.into_iter().collect();
    ranked.sort_by(|(la, ca), (lb, cb)| cb.cmp(ca).then_with(|| la.cmp(lb)));
    ranked
}

fn count_by<'m, F>(matches: &[&'m MatchRecord], key: F) -> Vec<(String, usize)>
where
    F: Fn(&'m MatchRecord) -> Option<&'m str>,
{
    let mut counts: HashMap<String, usize> = HashMap::new();
    for m in matches {
        if let Some(k) = key(*m) {
            *counts.entry(k.to_string()).or_default() += 1;
        }
    }
    rank_counts(counts)
}

/// Wins per team, ranked.
pub fn wins_by_team(matches: &[&MatchRecord]) -> Vec<(String, usize)> {
    count_by(matches, |m| m.winner.as_deref())
}

/// Outcome label per match: "runs", "wickets", "tie", "no result", or
/// "normal" when the margin unit is unknown.
pub fn outcome_label(m: &MatchRecord) -> &'static str {
    match m.result_type {
        ResultType::Tie => "tie",
        ResultType::NoResult => "no result",
        ResultType::Normal => match m.margin.and_then(|x| x.unit) {
            Some(unit) => unit.label(),
            None => "normal",
        },
    }
}

pub fn result_breakdown(matches: &[&MatchRecord]) -> Vec<(String, usize)> {
    count_by(matches, |m| Some(outcome_label(m)))
}

// ---------------------------------------------------------------------------
// Margins and targets
// ---------------------------------------------------------------------------

fn mean(values: impl IntoIterator<Item = f64>) -> Option<f64> {
    let (sum, n) = values
        .into_iter()
        .fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    (n > 0).then(|| sum / n as f64)
}

/// Average victory margin per unit. `overall` mixes runs and wickets the
/// way a single "average margin" column does.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct MarginSummary {
    pub runs: Option<f64>,
    pub wickets: Option<f64>,
    pub overall: Option<f64>,
}

pub fn average_margins(matches: &[&MatchRecord]) -> MarginSummary {
    let decided = || {
        matches
            .iter()
            .filter(|m| m.is_decisive())
            .filter_map(|m| m.margin)
    };
    MarginSummary {
        runs: mean(
            decided()
                .filter(|x| x.unit == Some(MarginUnit::Runs))
                .map(|x| x.value),
        ),
        wickets: mean(
            decided()
                .filter(|x| x.unit == Some(MarginUnit::Wickets))
                .map(|x| x.value),
        ),
        overall: mean(decided().map(|x| x.value)),
    }
}

pub fn average_target(matches: &[&MatchRecord]) -> Option<f64> {
    mean(matches.iter().filter_map(|m| m.target_runs))
}

/// One match reduced to what the margin and target charts plot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarginPoint {
    pub season: i32,
    pub date: NaiveDate,
    pub target_runs: Option<f64>,
    pub margin: Option<f64>,
    pub unit: Option<MarginUnit>,
    pub outcome: &'static str,
}

/// Per-match margins and targets, in date order.
pub fn margin_points(matches: &[&MatchRecord]) -> Vec<MarginPoint> {
    matches
        .iter()
        .map(|m| MarginPoint {
            season: m.season,
            date: m.date,
            target_runs: m.target_runs,
            margin: m.margin.filter(|_| m.is_decisive()).map(|x| x.value),
            unit: m.margin.and_then(|x| x.unit),
            outcome: outcome_label(m),
        })
        .collect()
}

/// Minimum, lower quartile, median, upper quartile and maximum.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FiveNumber {
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
}

/// Quartiles by linear interpolation between closest ranks. `None` for an
/// empty input; non-finite values are ignored.
pub fn five_number_summary(values: &[f64]) -> Option<FiveNumber> {
    let mut sorted: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if sorted.is_empty() {
        return None;
    }
    sorted.sort_by(f64::total_cmp);
    let quantile = |q: f64| {
        let pos = q * (sorted.len() - 1) as f64;
        let lo = pos.floor() as usize;
        let hi = pos.ceil() as usize;
        sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
    };
    Some(FiveNumber {
        min: sorted[0],
        q1: quantile(0.25),
        median: quantile(0.5),
        q3: quantile(0.75),
        max: sorted[sorted.len() - 1],
    })
}

/// Outcome counts for one season.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeasonOutcomes {
    pub season: i32,
    pub outcomes: Vec<(String, usize)>,
}

/// Season by outcome tally. Seasons without a match are omitted.
pub fn results_by_season(matches: &[&MatchRecord]) -> Vec<SeasonOutcomes> {
    let mut by_season: BTreeMap<i32, Vec<&MatchRecord>> = BTreeMap::new();
    for m in matches {
        by_season.entry(m.season).or_default().push(*m);
    }
    by_season
        .into_iter()
        .map(|(season, ms)| SeasonOutcomes {
            season,
            outcomes: result_breakdown(&ms),
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Season trends
// ---------------------------------------------------------------------------

/// One season of an entity's trend. Only seasons with at least one match
/// produce a point; `value` is `None` when the aggregate is undefined for
/// that season (e.g. win % with no decisive match).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SeasonPoint {
    pub season: i32,
    pub matches: usize,
    pub value: Option<f64>,
}

fn season_series<F>(matches: &[&MatchRecord], value: F) -> Vec<SeasonPoint>
where
    F: Fn(&[&MatchRecord]) -> Option<f64>,
{
    let mut by_season: BTreeMap<i32, Vec<&MatchRecord>> = BTreeMap::new();
    for m in matches {
        by_season.entry(m.season).or_default().push(*m);
    }
    by_season
        .into_iter()
        .map(|(season, ms)| SeasonPoint {
            season,
            matches: ms.len(),
            value: value(&ms),
        })
        .collect()
}

/// Per-season win percentage for a team.
pub fn team_win_trend(dataset: &CanonicalDataset, team: &str) -> Vec<SeasonPoint> {
    let matches = select(dataset, &MatchFilter::Team(team));
    season_series(&matches, |ms| {
        let mut record = TeamRecord::default();
        for m in ms {
            record.add(m, team);
        }
        record.win_pct()
    })
}

/// Player of the match awards per season.
pub fn award_trend(dataset: &CanonicalDataset, player: &str) -> Vec<SeasonPoint> {
    let matches = select(dataset, &MatchFilter::PlayerOfMatch(player));
    season_series(&matches, |ms| Some(ms.len() as f64))
}

/// Matches hosted per season.
pub fn venue_trend(dataset: &CanonicalDataset, venue: &str) -> Vec<SeasonPoint> {
    let matches = select(dataset, &MatchFilter::Venue(venue));
    season_series(&matches, |ms| Some(ms.len() as f64))
}

/// Wins / losses / no results per season for a team.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SeasonRecord {
    pub season: i32,
    pub record: TeamRecord,
}

pub fn season_breakdown(dataset: &CanonicalDataset, team: &str) -> Vec<SeasonRecord> {
    let mut by_season: BTreeMap<i32, TeamRecord> = BTreeMap::new();
    for m in select(dataset, &MatchFilter::Team(team)) {
        by_season.entry(m.season).or_default().add(m, team);
    }
    by_season
        .into_iter()
        .map(|(season, record)| SeasonRecord { season, record })
        .collect()
}

// ---------------------------------------------------------------------------
// Toss impact
// ---------------------------------------------------------------------------

/// Outcomes of the matches where `team` won the toss, split by decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TossImpact {
    pub decision: String,
    pub won: usize,
    pub lost: usize,
    pub no_result: usize,
}

pub fn toss_impact(dataset: &CanonicalDataset, team: &str) -> Vec<TossImpact> {
    let mut by_decision: BTreeMap<&'static str, TossImpact> = BTreeMap::new();
    for m in select(dataset, &MatchFilter::Team(team)) {
        if m.toss_winner.as_deref() != Some(team) {
            continue;
        }
        let Some(decision) = m.toss_decision else {
            continue;
        };
        let entry = by_decision
            .entry(decision.label())
            .or_insert_with(|| TossImpact {
                decision: decision.label().to_string(),
                won: 0,
                lost: 0,
                no_result: 0,
            });
        match m.winner.as_deref() {
            Some(w) if w == team => entry.won += 1,
            Some(_) => entry.lost += 1,
            None => entry.no_result += 1,
        }
    }
    by_decision.into_values().collect()
}

// ---------------------------------------------------------------------------
// Venue analysis
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VenueSummary {
    pub venue: String,
    pub city: Option<String>,
    pub matches: usize,
    pub first_match: Option<NaiveDate>,
    /// Decisive matches won by the side batting first.
    pub bat_first_wins: usize,
    /// Decisive matches won chasing.
    pub chase_wins: usize,
    pub bat_first_win_pct: Option<f64>,
    pub toss_winner_won: usize,
    pub toss_winner_lost: usize,
    pub toss_win_pct: Option<f64>,
    pub margins: MarginSummary,
    pub avg_target: Option<f64>,
    pub results: Vec<(String, usize)>,
    pub top_teams: Vec<(String, usize)>,
}

pub fn venue_summary(dataset: &CanonicalDataset, venue: &str, top_n: usize) -> VenueSummary {
    let matches = select(dataset, &MatchFilter::Venue(venue));
    summarize_venue(venue, &matches, top_n)
}

fn summarize_venue(venue: &str, matches: &[&MatchRecord], top_n: usize) -> VenueSummary {
    let mut bat_first_wins = 0;
    let mut chase_wins = 0;
    let mut toss_winner_won = 0;
    let mut toss_winner_lost = 0;
    for m in matches {
        match m.batting_first_won() {
            Some(true) => bat_first_wins += 1,
            Some(false) => chase_wins += 1,
            None => {}
        }
        match m.toss_winner_won() {
            Some(true) => toss_winner_won += 1,
            Some(false) => toss_winner_lost += 1,
            None => {}
        }
    }

    let mut top_teams = wins_by_team(matches);
    top_teams.truncate(top_n);

    VenueSummary {
        venue: venue.to_string(),
        city: matches.iter().find_map(|m| m.city.clone()),
        matches: matches.len(),
        first_match: matches.iter().map(|m| m.date).min(),
        bat_first_wins,
        chase_wins,
        bat_first_win_pct: win_percentage(bat_first_wins, bat_first_wins + chase_wins),
        toss_winner_won,
        toss_winner_lost,
        toss_win_pct: win_percentage(toss_winner_won, toss_winner_won + toss_winner_lost),
        margins: average_margins(matches),
        avg_target: average_target(matches),
        results: result_breakdown(matches),
        top_teams,
    }
}

/// Every venue, busiest first (ties alphabetical). Matches without a venue
/// are skipped.
pub fn venue_table(dataset: &CanonicalDataset, top_n: usize) -> Vec<VenueSummary> {
    let mut by_venue: BTreeMap<&str, Vec<&MatchRecord>> = BTreeMap::new();
    for m in dataset.matches() {
        if let Some(v) = m.venue.as_deref() {
            by_venue.entry(v).or_default().push(m);
        }
    }
    let mut table: Vec<VenueSummary> = by_venue
        .into_iter()
        .map(|(venue, ms)| summarize_venue(venue, &ms, top_n))
        .collect();
    table.sort_by(|a, b| b.matches.cmp(&a.matches).then_with(|| a.venue.cmp(&b.venue)));
    table
}

/// 1-based position of `venue` in [`venue_table`], with the number of
/// venues ranked.
pub fn venue_rank(dataset: &CanonicalDataset, venue: &str) -> Option<(usize, usize)> {
    let table = venue_table(dataset, 0);
    let pos = table.iter().position(|v| v.venue == venue)?;
    Some((pos + 1, table.len()))
}

// ---------------------------------------------------------------------------
// Season summary
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeasonSummary {
    pub season: i32,
    pub matches: usize,
    pub teams: Vec<String>,
    pub super_overs: usize,
    pub avg_target: Option<f64>,
    pub margins: MarginSummary,
    pub wins_by_team: Vec<(String, usize)>,
    /// Winner of the match typed "Final", when the source has match types.
    pub champion: Option<String>,
}

pub fn season_summary(dataset: &CanonicalDataset, season: i32, top_n: usize) -> SeasonSummary {
    let matches = select(dataset, &MatchFilter::Season(season));
    let teams: BTreeSet<String> = matches
        .iter()
        .flat_map(|m| [m.team_a.clone(), m.team_b.clone()])
        .collect();
    let mut wins = wins_by_team(&matches);
    wins.truncate(top_n);

    SeasonSummary {
        season,
        matches: matches.len(),
        teams: teams.into_iter().collect(),
        super_overs: matches.iter().filter(|m| m.super_over).count(),
        avg_target: average_target(&matches),
        margins: average_margins(&matches),
        wins_by_team: wins,
        champion: matches
            .iter()
            .rev()
            .find(|m| m.is_final())
            .and_then(|m| m.winner.clone()),
    }
}

// ---------------------------------------------------------------------------
// Player of the match
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerSummary {
    pub player: String,
    pub awards: usize,
    /// Every side that took part in the player's award matches.
    pub teams: Vec<String>,
    pub first_award: Option<NaiveDate>,
    pub latest_award: Option<NaiveDate>,
    pub results: Vec<(String, usize)>,
    pub margins: MarginSummary,
}

pub fn player_summary(dataset: &CanonicalDataset, player: &str) -> PlayerSummary {
    let matches = select(dataset, &MatchFilter::PlayerOfMatch(player));
    let teams: BTreeSet<String> = matches
        .iter()
        .flat_map(|m| [m.team_a.clone(), m.team_b.clone()])
        .collect();

    PlayerSummary {
        player: player.to_string(),
        awards: matches.len(),
        teams: teams.into_iter().collect(),
        first_award: matches.iter().map(|m| m.date).min(),
        latest_award: matches.iter().map(|m| m.date).max(),
        results: result_breakdown(&matches),
        margins: average_margins(&matches),
    }
}
