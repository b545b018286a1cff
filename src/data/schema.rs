use std::path::Path;

use crate::error::DataIntegrityError;

use super::model::Cell;

// ---------------------------------------------------------------------------
// Fixed match-table schema
// ---------------------------------------------------------------------------

/// Every column the loader understands. The set is fixed; header names are
/// matched case-insensitively against each column's accepted aliases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    Id,
    Season,
    City,
    Date,
    MatchType,
    PlayerOfMatch,
    Venue,
    TeamA,
    TeamB,
    TossWinner,
    TossDecision,
    Winner,
    Result,
    ResultMargin,
    TargetRuns,
    TargetOvers,
    SuperOver,
    Method,
}

const COLUMN_COUNT: usize = 18;

static NULL_CELL: Cell = Cell::Null;

impl Column {
    pub const ALL: [Column; COLUMN_COUNT] = [
        Column::Id,
        Column::Season,
        Column::City,
        Column::Date,
        Column::MatchType,
        Column::PlayerOfMatch,
        Column::Venue,
        Column::TeamA,
        Column::TeamB,
        Column::TossWinner,
        Column::TossDecision,
        Column::Winner,
        Column::Result,
        Column::ResultMargin,
        Column::TargetRuns,
        Column::TargetOvers,
        Column::SuperOver,
        Column::Method,
    ];

    /// Canonical header name (first alias).
    pub fn name(self) -> &'static str {
        self.aliases()[0]
    }

    pub fn aliases(self) -> &'static [&'static str] {
        match self {
            Column::Id => &["id", "match_id"],
            Column::Season => &["season", "year"],
            Column::City => &["city"],
            Column::Date => &["date", "match_date"],
            Column::MatchType => &["match_type"],
            Column::PlayerOfMatch => &["player_of_match", "potm"],
            Column::Venue => &["venue"],
            Column::TeamA => &["team1", "team_a"],
            Column::TeamB => &["team2", "team_b"],
            Column::TossWinner => &["toss_winner"],
            Column::TossDecision => &["toss_decision"],
            Column::Winner => &["winner"],
            Column::Result => &["result", "result_type"],
            Column::ResultMargin => &["result_margin", "margin"],
            Column::TargetRuns => &["target_runs"],
            Column::TargetOvers => &["target_overs"],
            Column::SuperOver => &["super_over"],
            Column::Method => &["method"],
        }
    }

    pub fn required(self) -> bool {
        matches!(
            self,
            Column::Season
                | Column::Date
                | Column::Venue
                | Column::TeamA
                | Column::TeamB
                | Column::Winner
                | Column::Result
                | Column::ResultMargin
                | Column::PlayerOfMatch
        )
    }
}

// ---------------------------------------------------------------------------
// ColumnIndex – header positions resolved once per file
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct ColumnIndex {
    positions: [Option<usize>; COLUMN_COUNT],
}

impl ColumnIndex {
    /// Resolve header positions. Fails listing every missing required column.
    pub fn resolve(headers: &[String], path: &Path) -> Result<Self, DataIntegrityError> {
        let normalized: Vec<String> = headers
            .iter()
            .map(|h| h.trim().trim_start_matches('\u{feff}').to_ascii_lowercase())
            .collect();

        let mut positions = [None; COLUMN_COUNT];
        let mut missing = Vec::new();
        for (slot, column) in positions.iter_mut().zip(Column::ALL) {
            *slot = column
                .aliases()
                .iter()
                .find_map(|alias| normalized.iter().position(|h| h == alias));
            if slot.is_none() && column.required() {
                missing.push(column.name().to_string());
            }
        }

        if !missing.is_empty() {
            return Err(DataIntegrityError::MissingColumns {
                path: path.to_path_buf(),
                columns: missing,
            });
        }
        Ok(ColumnIndex { positions })
    }

    pub fn position(&self, column: Column) -> Option<usize> {
        self.positions[column as usize]
    }

    /// The cell for `column` in `row`; absent optional columns read as null.
    pub fn cell<'a>(&self, row: &'a [Cell], column: Column) -> &'a Cell {
        self.position(column)
            .and_then(|i| row.get(i))
            .unwrap_or(&NULL_CELL)
    }

    pub fn text(&self, row: &[Cell], column: Column) -> Option<String> {
        self.cell(row, column).text()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn columns_are_listed_in_discriminant_order() {
        for (i, column) in Column::ALL.iter().enumerate() {
            assert_eq!(*column as usize, i);
        }
    }

    #[test]
    fn resolves_aliases_case_insensitively() {
        let h = headers(&[
            "Season", "date", "venue", "team_a", "TEAM_B", "winner", "result_type", "margin",
            "player_of_match",
        ]);
        let idx = ColumnIndex::resolve(&h, Path::new("x.csv")).unwrap();
        assert_eq!(idx.position(Column::TeamA), Some(3));
        assert_eq!(idx.position(Column::TeamB), Some(4));
        assert_eq!(idx.position(Column::City), None);
        assert_eq!(idx.cell(&[], Column::City), &Cell::Null);
    }

    #[test]
    fn reports_every_missing_required_column() {
        let h = headers(&["season", "date", "team1", "team2", "result"]);
        let err = ColumnIndex::resolve(&h, Path::new("x.csv")).unwrap_err();
        match err {
            DataIntegrityError::MissingColumns { columns, .. } => {
                assert_eq!(columns, vec!["player_of_match", "venue", "winner", "result_margin"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
