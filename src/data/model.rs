use std::collections::BTreeSet;
use std::fmt;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::Serialize;

// ---------------------------------------------------------------------------
// Cell – a single raw value read from the source table
// ---------------------------------------------------------------------------

/// Tokens that source files use for "no value".
const NULL_TOKENS: &[&str] = &["na", "n/a", "nan", "null", "none", "-"];

/// A raw cell as read from CSV, JSON or Parquet, before the schema gives
/// it a meaning. CSV cells always arrive as text; JSON and Parquet keep
/// their native types.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Null,
}

impl Cell {
    /// Build a cell from raw text, mapping blanks to [`Cell::Null`].
    pub fn from_text(raw: &str) -> Self {
        if raw.trim().is_empty() {
            Cell::Null
        } else {
            Cell::Text(raw.to_string())
        }
    }

    /// Trimmed, non-empty text, with null tokens treated as missing.
    pub fn text(&self) -> Option<String> {
        match self {
            Cell::Text(s) => {
                let t = s.trim();
                if t.is_empty() || is_null_token(t) {
                    None
                } else {
                    Some(t.to_string())
                }
            }
            Cell::Integer(i) => Some(i.to_string()),
            Cell::Float(f) if f.is_nan() => None,
            Cell::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => Some(format!("{}", *f as i64)),
            Cell::Float(f) => Some(f.to_string()),
            Cell::Bool(b) => Some(b.to_string()),
            Cell::Null => None,
        }
    }

    pub fn number(&self) -> Option<f64> {
        let v = match self {
            Cell::Integer(i) => *i as f64,
            Cell::Float(f) => *f,
            Cell::Text(_) => self.text()?.parse::<f64>().ok()?,
            Cell::Bool(_) | Cell::Null => return None,
        };
        v.is_finite().then_some(v)
    }

    pub fn integer(&self) -> Option<i64> {
        match self {
            Cell::Integer(i) => Some(*i),
            _ => {
                let v = self.number()?;
                (v.fract() == 0.0).then_some(v as i64)
            }
        }
    }

    /// Y/N style flags (`super_over` uses `Y`/`N`).
    pub fn flag(&self) -> Option<bool> {
        match self {
            Cell::Bool(b) => Some(*b),
            Cell::Integer(i) => Some(*i != 0),
            _ => match self.text()?.to_ascii_lowercase().as_str() {
                "y" | "yes" | "true" | "1" => Some(true),
                "n" | "no" | "false" | "0" => Some(false),
                _ => None,
            },
        }
    }
}

fn is_null_token(s: &str) -> bool {
    NULL_TOKENS.iter().any(|tok| s.eq_ignore_ascii_case(tok))
}

// ---------------------------------------------------------------------------
// Match-level enums
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum ResultType {
    Normal,
    Tie,
    NoResult,
}

impl ResultType {
    pub fn label(self) -> &'static str {
        match self {
            ResultType::Normal => "normal",
            ResultType::Tie => "tie",
            ResultType::NoResult => "no result",
        }
    }
}

impl fmt::Display for ResultType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum MarginUnit {
    Runs,
    Wickets,
}

impl MarginUnit {
    pub fn label(self) -> &'static str {
        match self {
            MarginUnit::Runs => "runs",
            MarginUnit::Wickets => "wickets",
        }
    }
}

/// Victory margin. The unit tells who won: a margin in runs means the side
/// batting first defended its total, a margin in wickets means the chase
/// succeeded.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Margin {
    pub value: f64,
    pub unit: Option<MarginUnit>,
}

impl fmt::Display for Margin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.unit {
            Some(unit) => write!(f, "{} {}", self.value, unit.label()),
            None => write!(f, "{}", self.value),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum TossDecision {
    Bat,
    Field,
}

impl TossDecision {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "bat" | "batting" => Some(TossDecision::Bat),
            "field" | "fielding" | "bowl" | "bowling" => Some(TossDecision::Field),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TossDecision::Bat => "bat",
            TossDecision::Field => "field",
        }
    }
}

// ---------------------------------------------------------------------------
// MatchRecord – one row of the canonical table
// ---------------------------------------------------------------------------

/// One IPL match after cleaning. Team names are canonical.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchRecord {
    pub id: Option<String>,
    pub season: i32,
    pub date: NaiveDate,
    /// `None` when the source row had no venue (flagged at load time).
    pub venue: Option<String>,
    pub city: Option<String>,
    pub match_type: Option<String>,
    pub team_a: String,
    pub team_b: String,
    pub toss_winner: Option<String>,
    pub toss_decision: Option<TossDecision>,
    /// Always one of `team_a` / `team_b` when present.
    pub winner: Option<String>,
    pub result_type: ResultType,
    pub margin: Option<Margin>,
    pub target_runs: Option<f64>,
    pub target_overs: Option<f64>,
    pub super_over: bool,
    pub method: Option<String>,
    pub player_of_match: Option<String>,
}

impl MatchRecord {
    pub fn involves(&self, team: &str) -> bool {
        self.team_a == team || self.team_b == team
    }

    /// Both teams took part, in either order.
    pub fn is_between(&self, a: &str, b: &str) -> bool {
        (self.team_a == a && self.team_b == b) || (self.team_a == b && self.team_b == a)
    }

    /// A match with a declared winner.
    pub fn is_decisive(&self) -> bool {
        self.winner.is_some()
    }

    pub fn won_by(&self, team: &str) -> bool {
        self.winner.as_deref() == Some(team)
    }

    /// `Some(true)` when the side batting first won, `Some(false)` when the
    /// chasing side won, `None` when the margin unit is unknown.
    pub fn batting_first_won(&self) -> Option<bool> {
        self.winner.as_ref()?;
        match self.margin?.unit? {
            MarginUnit::Runs => Some(true),
            MarginUnit::Wickets => Some(false),
        }
    }

    pub fn toss_winner_won(&self) -> Option<bool> {
        let toss = self.toss_winner.as_deref()?;
        let winner = self.winner.as_deref()?;
        Some(toss == winner)
    }

    pub fn is_final(&self) -> bool {
        self.match_type
            .as_deref()
            .is_some_and(|t| t.eq_ignore_ascii_case("final"))
    }
}

// ---------------------------------------------------------------------------
// LoadReport – what the loader kept, flagged and dropped
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RejectedRow {
    /// 1-based data row number (header excluded).
    pub row: usize,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LoadReport {
    pub rows_read: usize,
    pub duplicates: usize,
    pub rejected: Vec<RejectedRow>,
    /// Rows kept without a venue; skipped by venue analysis.
    pub missing_venue: usize,
    /// Rows kept without a winner although the result was not a no-result.
    pub missing_winner: usize,
    /// Rows whose season was taken from the match date.
    pub season_from_date: usize,
}

// ---------------------------------------------------------------------------
// CanonicalDataset – the complete loaded dataset
// ---------------------------------------------------------------------------

/// The cleaned, deduplicated, date-ordered match table. Built once by the
/// loader and only ever read afterwards.
#[derive(Debug, Clone)]
pub struct CanonicalDataset {
    matches: Vec<MatchRecord>,
    teams: BTreeSet<String>,
    venues: BTreeSet<String>,
    players: BTreeSet<String>,
    seasons: BTreeSet<i32>,
    report: LoadReport,
    source: Option<PathBuf>,
}

impl CanonicalDataset {
    /// Build lookup sets from already-cleaned matches.
    pub fn from_matches(mut matches: Vec<MatchRecord>, report: LoadReport) -> Self {
        matches.sort_by_key(|m| m.date);

        let mut teams = BTreeSet::new();
        let mut venues = BTreeSet::new();
        let mut players = BTreeSet::new();
        let mut seasons = BTreeSet::new();
        for m in &matches {
            teams.insert(m.team_a.clone());
            teams.insert(m.team_b.clone());
            if let Some(v) = &m.venue {
                venues.insert(v.clone());
            }
            if let Some(p) = &m.player_of_match {
                players.insert(p.clone());
            }
            seasons.insert(m.season);
        }

        CanonicalDataset {
            matches,
            teams,
            venues,
            players,
            seasons,
            report,
            source: None,
        }
    }

    pub fn with_source(mut self, path: &Path) -> Self {
        self.source = Some(path.to_path_buf());
        self
    }

    pub fn matches(&self) -> &[MatchRecord] {
        &self.matches
    }

    /// Canonical names of every team that appears as a side.
    pub fn teams(&self) -> &BTreeSet<String> {
        &self.teams
    }

    pub fn venues(&self) -> &BTreeSet<String> {
        &self.venues
    }

    pub fn players(&self) -> &BTreeSet<String> {
        &self.players
    }

    pub fn seasons(&self) -> &BTreeSet<i32> {
        &self.seasons
    }

    pub fn report(&self) -> &LoadReport {
        &self.report
    }

    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub fn len(&self) -> usize {
        self.matches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cell_text_treats_null_tokens_as_missing() {
        assert_eq!(Cell::from_text("  NA ").text(), None);
        assert_eq!(Cell::from_text("").text(), None);
        assert_eq!(Cell::Float(f64::NAN).text(), None);
        assert_eq!(Cell::Float(2008.0).text().as_deref(), Some("2008"));
        assert_eq!(Cell::from_text(" Eden Gardens ").text().as_deref(), Some("Eden Gardens"));
    }

    #[test]
    fn cell_numbers_and_flags() {
        assert_eq!(Cell::from_text("140").integer(), Some(140));
        assert_eq!(Cell::from_text("6.0").integer(), Some(6));
        assert_eq!(Cell::from_text("6.5").integer(), None);
        assert_eq!(Cell::from_text("nan").number(), None);
        assert_eq!(Cell::from_text("Y").flag(), Some(true));
        assert_eq!(Cell::from_text("N").flag(), Some(false));
        assert_eq!(Cell::Null.flag(), None);
    }

    #[test]
    fn batting_first_follows_margin_unit() {
        let date = NaiveDate::from_ymd_opt(2010, 3, 12).unwrap();
        let mut m = MatchRecord {
            id: None,
            season: 2010,
            date,
            venue: None,
            city: None,
            match_type: None,
            team_a: "A".into(),
            team_b: "B".into(),
            toss_winner: Some("B".into()),
            toss_decision: Some(TossDecision::Field),
            winner: Some("A".into()),
            result_type: ResultType::Normal,
            margin: Some(Margin {
                value: 12.0,
                unit: Some(MarginUnit::Runs),
            }),
            target_runs: None,
            target_overs: None,
            super_over: false,
            method: None,
            player_of_match: None,
        };
        assert_eq!(m.batting_first_won(), Some(true));
        assert_eq!(m.toss_winner_won(), Some(false));
        m.margin = Some(Margin {
            value: 4.0,
            unit: Some(MarginUnit::Wickets),
        });
        assert_eq!(m.batting_first_won(), Some(false));
        m.winner = None;
        assert_eq!(m.batting_first_won(), None);
        assert!(m.is_between("B", "A"));
    }
}
