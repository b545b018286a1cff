use std::collections::HashSet;
use std::io::Read;
use std::path::Path;

use arrow::array::{Array, ArrayRef, AsArray};
use arrow::datatypes::{DataType, Float32Type, Float64Type, Int32Type, Int64Type};
use arrow::util::display::{ArrayFormatter, FormatOptions};
use chrono::{Datelike, NaiveDate, NaiveDateTime};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use crate::error::DataIntegrityError;

use super::aliases::{canonical_team, canonical_venue, clean_name};
use super::model::{
    CanonicalDataset, Cell, LoadReport, Margin, MarginUnit, MatchRecord, RejectedRow, ResultType,
    TossDecision,
};
use super::schema::{Column, ColumnIndex};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load the match table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row, one match per line (the processed IPL export)
/// * `.json`    – `[{ "season": 2008, "team1": "...", ... }, ...]`
/// * `.parquet` – flat columns, as written by `df.to_parquet()`
///
/// Fails when the file cannot be read, a required column is missing, or no
/// row survives cleaning. Individual bad rows are dropped and listed in the
/// dataset's [`LoadReport`].
pub fn load_dataset(path: &Path) -> Result<CanonicalDataset, DataIntegrityError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let table = match ext.as_str() {
        "csv" => {
            let file = std::fs::File::open(path).map_err(|source| DataIntegrityError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            read_csv(file, path)?
        }
        "json" => {
            let text = std::fs::read_to_string(path).map_err(|source| DataIntegrityError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            read_json(&text, path)?
        }
        "parquet" | "pq" => read_parquet(path)?,
        other => return Err(DataIntegrityError::UnsupportedFormat(other.to_string())),
    };

    let dataset = build_dataset(table, path)?.with_source(path);
    let report = dataset.report();
    log::info!(
        "Loaded {} matches ({} teams, {} venues, seasons {:?}..{:?}) from {}; {} duplicates, {} rejected",
        dataset.len(),
        dataset.teams().len(),
        dataset.venues().len(),
        dataset.seasons().first(),
        dataset.seasons().last(),
        path.display(),
        report.duplicates,
        report.rejected.len(),
    );
    Ok(dataset)
}

// ---------------------------------------------------------------------------
// RawTable – header + untyped cells, shared by every format
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

// ---------------------------------------------------------------------------
// CSV reader
// ---------------------------------------------------------------------------

/// Read CSV text. Every cell stays text; the schema decides how to parse it.
pub fn read_csv<R: Read>(source: R, path: &Path) -> Result<RawTable, DataIntegrityError> {
    let csv_err = |source| DataIntegrityError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(source);
    let headers: Vec<String> = reader
        .headers()
        .map_err(csv_err)?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result.map_err(csv_err)?;
        rows.push(record.iter().map(Cell::from_text).collect());
    }

    Ok(RawTable { headers, rows })
}

// ---------------------------------------------------------------------------
// JSON reader
// ---------------------------------------------------------------------------

/// Records-oriented JSON (`df.to_json(orient='records')`). The header is the
/// union of keys across records; columns are matched by name, not position.
pub fn read_json(text: &str, path: &Path) -> Result<RawTable, DataIntegrityError> {
    let root: JsonValue = serde_json::from_str(text).map_err(|source| DataIntegrityError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    let records = root.as_array().ok_or_else(|| DataIntegrityError::Malformed {
        path: path.to_path_buf(),
        reason: "expected a top-level JSON array".to_string(),
    })?;

    let mut objects = Vec::with_capacity(records.len());
    let mut headers: Vec<String> = Vec::new();
    for (i, rec) in records.iter().enumerate() {
        let obj = rec.as_object().ok_or_else(|| DataIntegrityError::Malformed {
            path: path.to_path_buf(),
            reason: format!("row {} is not a JSON object", i + 1),
        })?;
        for key in obj.keys() {
            if !headers.contains(key) {
                headers.push(key.clone());
            }
        }
        objects.push(obj);
    }

    let rows = objects
        .iter()
        .map(|obj| {
            headers
                .iter()
                .map(|h| obj.get(h).map(json_to_cell).unwrap_or(Cell::Null))
                .collect()
        })
        .collect();

    Ok(RawTable { headers, rows })
}

fn json_to_cell(val: &JsonValue) -> Cell {
    match val {
        JsonValue::String(s) => Cell::from_text(s),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                Cell::Integer(i)
            } else if let Some(f) = n.as_f64() {
                Cell::Float(f)
            } else {
                Cell::Text(n.to_string())
            }
        }
        JsonValue::Bool(b) => Cell::Bool(*b),
        JsonValue::Null => Cell::Null,
        other => Cell::Text(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet reader
// ---------------------------------------------------------------------------

/// Load a Parquet match table. Strings, integers, floats and booleans keep
/// their types; anything else (dates, timestamps) is rendered to text and
/// parsed by the schema like a CSV cell.
fn read_parquet(path: &Path) -> Result<RawTable, DataIntegrityError> {
    let parquet_err = |source| DataIntegrityError::Parquet {
        path: path.to_path_buf(),
        source,
    };
    let arrow_err = |source| DataIntegrityError::Arrow {
        path: path.to_path_buf(),
        source,
    };

    let file = std::fs::File::open(path).map_err(|source| DataIntegrityError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file).map_err(parquet_err)?;
    let headers: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    let reader = builder.build().map_err(parquet_err)?;

    let options = FormatOptions::default();
    let mut rows = Vec::new();
    for batch_result in reader {
        let batch = batch_result.map_err(arrow_err)?;
        let columns = batch.columns();
        let formatters = columns
            .iter()
            .map(|col| ArrayFormatter::try_new(col.as_ref(), &options))
            .collect::<Result<Vec<_>, _>>()
            .map_err(arrow_err)?;

        for row in 0..batch.num_rows() {
            rows.push(
                columns
                    .iter()
                    .zip(&formatters)
                    .map(|(col, fmt)| extract_cell(col, fmt, row))
                    .collect(),
            );
        }
    }

    Ok(RawTable { headers, rows })
}

/// Extract a single cell from an Arrow column at a given row.
fn extract_cell(col: &ArrayRef, fmt: &ArrayFormatter<'_>, row: usize) -> Cell {
    if col.is_null(row) {
        return Cell::Null;
    }
    let typed = match col.data_type() {
        DataType::Utf8 => col
            .as_string_opt::<i32>()
            .map(|a| Cell::from_text(a.value(row))),
        DataType::LargeUtf8 => col
            .as_string_opt::<i64>()
            .map(|a| Cell::from_text(a.value(row))),
        DataType::Int32 => col
            .as_primitive_opt::<Int32Type>()
            .map(|a| Cell::Integer(a.value(row) as i64)),
        DataType::Int64 => col
            .as_primitive_opt::<Int64Type>()
            .map(|a| Cell::Integer(a.value(row))),
        DataType::Float32 => col
            .as_primitive_opt::<Float32Type>()
            .map(|a| Cell::Float(a.value(row) as f64)),
        DataType::Float64 => col
            .as_primitive_opt::<Float64Type>()
            .map(|a| Cell::Float(a.value(row))),
        DataType::Boolean => col.as_boolean_opt().map(|a| Cell::Bool(a.value(row))),
        _ => None,
    };
    typed.unwrap_or_else(|| Cell::from_text(&fmt.value(row).to_string()))
}

// ---------------------------------------------------------------------------
// Cleaning: RawTable → CanonicalDataset
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum DedupKey {
    Id(String),
    Fixture(NaiveDate, String, String),
}

impl DedupKey {
    fn of(m: &MatchRecord) -> Self {
        match &m.id {
            Some(id) => DedupKey::Id(id.clone()),
            None => {
                let (lo, hi) = if m.team_a <= m.team_b {
                    (&m.team_a, &m.team_b)
                } else {
                    (&m.team_b, &m.team_a)
                };
                DedupKey::Fixture(m.date, lo.clone(), hi.clone())
            }
        }
    }
}

struct ParsedRow {
    record: MatchRecord,
    season_from_date: bool,
    missing_winner: bool,
}

/// Validate the header once, then clean every row against the fixed schema.
pub fn build_dataset(table: RawTable, path: &Path) -> Result<CanonicalDataset, DataIntegrityError> {
    let index = ColumnIndex::resolve(&table.headers, path)?;

    let mut report = LoadReport {
        rows_read: table.rows.len(),
        ..LoadReport::default()
    };
    let mut seen: HashSet<DedupKey> = HashSet::new();
    let mut matches = Vec::with_capacity(table.rows.len());

    for (i, row) in table.rows.iter().enumerate() {
        let row_no = i + 1;
        let parsed = match parse_row(&index, row) {
            Ok(parsed) => parsed,
            Err(reason) => {
                log::warn!("{}: dropping row {row_no}: {reason}", path.display());
                report.rejected.push(RejectedRow { row: row_no, reason });
                continue;
            }
        };

        if !seen.insert(DedupKey::of(&parsed.record)) {
            log::debug!("{}: row {row_no} duplicates an earlier match", path.display());
            report.duplicates += 1;
            continue;
        }

        if parsed.season_from_date {
            report.season_from_date += 1;
        }
        if parsed.record.venue.is_none() {
            log::debug!("{}: row {row_no} has no venue", path.display());
            report.missing_venue += 1;
        }
        if parsed.missing_winner {
            log::debug!("{}: row {row_no} has a result but no winner", path.display());
            report.missing_winner += 1;
        }
        matches.push(parsed.record);
    }

    if matches.is_empty() {
        return Err(DataIntegrityError::Empty {
            path: path.to_path_buf(),
        });
    }
    Ok(CanonicalDataset::from_matches(matches, report))
}

fn parse_row(index: &ColumnIndex, row: &[Cell]) -> Result<ParsedRow, String> {
    let team_a = index
        .text(row, Column::TeamA)
        .map(|t| canonical_team(&t))
        .ok_or("missing team1")?;
    let team_b = index
        .text(row, Column::TeamB)
        .map(|t| canonical_team(&t))
        .ok_or("missing team2")?;
    if team_a == team_b {
        return Err(format!("both sides are {team_a}"));
    }

    let date_raw = index.text(row, Column::Date).ok_or("missing date")?;
    let date = parse_match_date(&date_raw).ok_or_else(|| format!("unparseable date '{date_raw}'"))?;

    let (season, season_from_date) = match parse_season(index.cell(row, Column::Season), date)? {
        Some(season) => (season, false),
        None => (date.year(), true),
    };

    let city = index.text(row, Column::City);
    let venue = index
        .text(row, Column::Venue)
        .map(|v| canonical_venue(&v, city.as_deref()));

    let winner = index.text(row, Column::Winner).map(|w| canonical_team(&w));
    if let Some(w) = &winner {
        if *w != team_a && *w != team_b {
            return Err(format!("winner '{w}' is neither {team_a} nor {team_b}"));
        }
    }

    let result_raw = index
        .text(row, Column::Result)
        .map(|r| r.to_ascii_lowercase());
    let (result_type, unit) = match result_raw.as_deref() {
        Some("runs") => (ResultType::Normal, Some(MarginUnit::Runs)),
        Some("wickets") => (ResultType::Normal, Some(MarginUnit::Wickets)),
        Some("normal") => (ResultType::Normal, None),
        Some("tie") => (ResultType::Tie, None),
        Some("no result" | "no_result" | "noresult" | "nr" | "abandoned") => {
            (ResultType::NoResult, None)
        }
        Some(other) => return Err(format!("unknown result '{other}'")),
        None if winner.is_some() => (ResultType::Normal, None),
        None => (ResultType::NoResult, None),
    };
    if result_type == ResultType::NoResult && winner.is_some() {
        return Err("no-result match declares a winner".to_string());
    }
    let missing_winner = result_type == ResultType::Normal && winner.is_none();

    let margin = index
        .cell(row, Column::ResultMargin)
        .number()
        .map(|value| Margin { value, unit });

    Ok(ParsedRow {
        record: MatchRecord {
            id: index.text(row, Column::Id),
            season,
            date,
            venue,
            city,
            match_type: index.text(row, Column::MatchType),
            toss_winner: index.text(row, Column::TossWinner).map(|t| canonical_team(&t)),
            toss_decision: index
                .text(row, Column::TossDecision)
                .and_then(|d| TossDecision::parse(&d)),
            team_a,
            team_b,
            winner,
            result_type,
            margin,
            target_runs: index.cell(row, Column::TargetRuns).number(),
            target_overs: index.cell(row, Column::TargetOvers).number(),
            super_over: index.cell(row, Column::SuperOver).flag().unwrap_or(false),
            method: index.text(row, Column::Method),
            player_of_match: index.text(row, Column::PlayerOfMatch).map(|p| clean_name(&p)),
        },
        season_from_date,
        missing_winner,
    })
}

// -- Field parsers --

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%d/%m/%Y",
    "%Y/%m/%d",
    "%d-%m-%Y",
    "%d %b %Y",
    "%d %B %Y",
    "%B %d, %Y",
    "%b %d, %Y",
];

const DATETIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f"];

/// Parse the date formats seen in IPL exports. Day-first wins over
/// month-first for slash dates.
pub fn parse_match_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    DATE_FORMATS
        .iter()
        .find_map(|f| NaiveDate::parse_from_str(raw, f).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|f| NaiveDateTime::parse_from_str(raw, f).ok())
                .map(|dt| dt.date())
        })
        .or_else(|| {
            // Trailing zone / offset after an ISO date.
            raw.get(..10)
                .filter(|_| raw.len() > 10)
                .and_then(|head| NaiveDate::parse_from_str(head, "%Y-%m-%d").ok())
        })
}

/// `Ok(None)` when the cell is empty. Split seasons such as `2007/08` resolve
/// to the match date's year when it falls inside the span.
pub fn parse_season(cell: &Cell, date: NaiveDate) -> Result<Option<i32>, String> {
    if let Some(year) = cell.integer() {
        return i32::try_from(year)
            .ok()
            .filter(|y| (1900..=2100).contains(y))
            .map(Some)
            .ok_or_else(|| format!("season {year} out of range"));
    }
    let Some(raw) = cell.text() else {
        return Ok(None);
    };

    let bad = || format!("unparseable season '{raw}'");
    let (first, second) = raw.split_once(['/', '-']).ok_or_else(bad)?;
    let first: i32 = first.trim().parse().map_err(|_| bad())?;
    let second = second.trim();
    let mut last: i32 = second.parse().map_err(|_| bad())?;
    if second.len() <= 2 {
        let century = first.checked_sub(first.rem_euclid(100)).ok_or_else(bad)?;
        last = last.checked_add(century).ok_or_else(bad)?;
        if last < first {
            last = last.checked_add(100).ok_or_else(bad)?;
        }
    }
    if last < first {
        return Err(bad());
    }
    let season = if (first..=last).contains(&date.year()) {
        date.year()
    } else {
        last
    };
    if !(1900..=2100).contains(&season) {
        return Err(format!("season {season} out of range"));
    }
    Ok(Some(season))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    const HEADER: &str =
        "id,season,city,date,match_type,player_of_match,venue,team1,team2,toss_winner,toss_decision,winner,result,result_margin,target_runs,target_overs,super_over,method";

    fn table(rows: &[&str]) -> RawTable {
        let text = format!("{HEADER}\n{}\n", rows.join("\n"));
        read_csv(text.as_bytes(), Path::new("inline.csv")).unwrap()
    }

    #[test]
    fn parses_common_date_formats() {
        assert_eq!(parse_match_date("2008-04-18"), Some(date(2008, 4, 18)));
        assert_eq!(parse_match_date("18/04/2008"), Some(date(2008, 4, 18)));
        assert_eq!(parse_match_date("2008/04/18"), Some(date(2008, 4, 18)));
        assert_eq!(parse_match_date("18-04-2008"), Some(date(2008, 4, 18)));
        assert_eq!(parse_match_date("18 Apr 2008"), Some(date(2008, 4, 18)));
        assert_eq!(parse_match_date("April 18, 2008"), Some(date(2008, 4, 18)));
        assert_eq!(parse_match_date("2008-04-18T00:00:00"), Some(date(2008, 4, 18)));
        assert_eq!(parse_match_date("2008-04-18 00:00:00+05:30"), Some(date(2008, 4, 18)));
        assert_eq!(parse_match_date("yesterday"), None);
    }

    #[test]
    fn split_seasons_follow_the_match_date() {
        let s = |raw: &str, d| parse_season(&Cell::from_text(raw), d);
        assert_eq!(s("2008", date(2008, 4, 18)), Ok(Some(2008)));
        assert_eq!(s("2007/08", date(2008, 4, 18)), Ok(Some(2008)));
        assert_eq!(s("2009/10", date(2010, 3, 12)), Ok(Some(2010)));
        assert_eq!(s("2020/21", date(2020, 9, 19)), Ok(Some(2020)));
        assert_eq!(s("1999/00", date(2000, 1, 1)), Ok(Some(2000)));
        assert_eq!(s("", date(2011, 4, 8)), Ok(None));
        assert!(s("early", date(2011, 4, 8)).is_err());
        assert!(s("2147483647/08", date(2011, 4, 8)).is_err());
        assert!(s("1000/1001", date(2011, 4, 8)).is_err());
        assert!(s("1001", date(2011, 4, 8)).is_err());
        assert_eq!(parse_season(&Cell::Integer(2024), date(2024, 3, 22)), Ok(Some(2024)));
    }

    #[test]
    fn cleans_names_and_flags_missing_fields() {
        let t = table(&[
            "1,2007/08,Bangalore,2008-04-18,League,BB McCullum,\"M Chinnaswamy Stadium, Bengaluru\",Royal Challengers Bangalore,Kolkata Knight Riders,Royal Challengers Bangalore,field,Kolkata Knight Riders,runs,140,223,20,N,NA",
            "2,2008,Mohali,2008-04-19,League,MEK Hussey,,Kings XI Punjab,Chennai Super Kings,Chennai Super Kings,bat,Chennai Super Kings,runs,33,241,20,N,NA",
            "3,2008,Delhi,2008-04-19,League,,Feroz Shah Kotla,Delhi Daredevils,Rajasthan Royals,Rajasthan Royals,bat,,no result,,,,N,NA",
        ]);
        let ds = build_dataset(t, Path::new("inline.csv")).unwrap();
        assert_eq!(ds.len(), 3);
        let first = &ds.matches()[0];
        assert_eq!(first.team_a, "Royal Challengers Bengaluru");
        assert_eq!(first.venue.as_deref(), Some("M Chinnaswamy Stadium"));
        assert_eq!(first.season, 2008);
        assert_eq!(first.toss_decision, Some(TossDecision::Field));
        assert_eq!(first.margin.and_then(|m| m.unit), Some(MarginUnit::Runs));
        assert!(first.method.is_none());

        let report = ds.report();
        assert_eq!(report.missing_venue, 1);
        assert_eq!(report.missing_winner, 0);
        assert!(ds.teams().contains("Delhi Capitals"));
        assert!(ds.teams().contains("Punjab Kings"));
        assert!(!ds.teams().contains("Delhi Daredevils"));
        let nr = ds.matches().iter().find(|m| m.id.as_deref() == Some("3")).unwrap();
        assert_eq!(nr.result_type, ResultType::NoResult);
        assert!(nr.player_of_match.is_none());
    }

    #[test]
    fn rejects_inconsistent_rows_and_drops_duplicates() {
        let t = table(&[
            "1,2008,Kolkata,2008-04-18,League,X,Eden Gardens,A,B,A,bat,A,runs,10,150,20,N,NA",
            "1,2008,Kolkata,2008-04-18,League,X,Eden Gardens,A,B,A,bat,A,runs,10,150,20,N,NA",
            "2,2008,Kolkata,2008-04-20,League,Y,Eden Gardens,A,B,A,bat,C,runs,10,150,20,N,NA",
            "3,2008,Kolkata,someday,League,Y,Eden Gardens,A,B,A,bat,A,runs,10,150,20,N,NA",
            "4,2008,Kolkata,2008-04-22,League,Y,Eden Gardens,A,A,A,bat,A,runs,10,150,20,N,NA",
            "5,2008,Kolkata,2008-04-23,League,Y,Eden Gardens,A,B,A,bat,A,no result,,,,N,NA",
        ]);
        let ds = build_dataset(t, Path::new("inline.csv")).unwrap();
        assert_eq!(ds.len(), 1);
        let report = ds.report();
        assert_eq!(report.rows_read, 6);
        assert_eq!(report.duplicates, 1);
        let rejected: Vec<usize> = report.rejected.iter().map(|r| r.row).collect();
        assert_eq!(rejected, vec![3, 4, 5, 6]);
    }

    #[test]
    fn only_rejected_rows_is_an_empty_dataset() {
        let t = table(&["1,2008,Kolkata,never,League,X,Eden Gardens,A,B,A,bat,A,runs,10,150,20,N,NA"]);
        let err = build_dataset(t, Path::new("inline.csv")).unwrap_err();
        assert!(matches!(err, DataIntegrityError::Empty { .. }));
    }

    #[test]
    fn json_records_keep_native_types() {
        let text = r#"[
            {"season": 2019, "date": "2019-03-23", "venue": "MA Chidambaram Stadium, Chepauk, Chennai",
             "city": "Chennai", "team1": "Royal Challengers Bangalore", "team2": "Chennai Super Kings",
             "winner": "Chennai Super Kings", "result": "wickets", "result_margin": 7.0,
             "player_of_match": "Harbhajan Singh", "super_over": false}
        ]"#;
        let t = read_json(text, Path::new("inline.json")).unwrap();
        assert_eq!(t.headers.len(), 11);
        let ds = build_dataset(t, Path::new("inline.json")).unwrap();
        let m = &ds.matches()[0];
        assert_eq!(m.venue.as_deref(), Some("MA Chidambaram Stadium"));
        assert_eq!(m.margin.map(|x| x.value), Some(7.0));
        assert_eq!(m.batting_first_won(), Some(false));
    }

    #[test]
    fn json_must_be_an_array_of_objects() {
        let err = read_json(r#"{"season": 2008}"#, Path::new("x.json")).unwrap_err();
        assert!(matches!(err, DataIntegrityError::Malformed { .. }));
        let err = read_json("[1, 2]", Path::new("x.json")).unwrap_err();
        assert!(matches!(err, DataIntegrityError::Malformed { .. }));
    }
}
