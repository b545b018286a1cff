use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{Array, ArrayRef, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{Field, Schema};
use arrow::record_batch::RecordBatch;
use chrono::{Duration, NaiveDate};
use parquet::arrow::ArrowWriter;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

const CSV_PATH: &str = "processed_ipl_dataset.csv";
const PARQUET_PATH: &str = "sample_ipl.parquet";

const SEASONS: std::ops::RangeInclusive<i32> = 2008..=2015;
const MATCHES_PER_SEASON: usize = 40;

/// (name used in the file, home city, home venue). Early names exercise the
/// alias tables.
const TEAMS: &[(&str, &str, &str)] = &[
    ("Mumbai Indians", "Mumbai", "Wankhede Stadium"),
    ("Chennai Super Kings", "Chennai", "MA Chidambaram Stadium, Chepauk"),
    ("Kolkata Knight Riders", "Kolkata", "Eden Gardens"),
    ("Delhi Daredevils", "Delhi", "Feroz Shah Kotla"),
    ("Kings XI Punjab", "Chandigarh", "Punjab Cricket Association Stadium, Mohali"),
    ("Royal Challengers Bangalore", "Bangalore", "M Chinnaswamy Stadium"),
    ("Rajasthan Royals", "Jaipur", "Sawai Mansingh Stadium"),
    ("Deccan Chargers", "Hyderabad", "Rajiv Gandhi International Stadium, Uppal"),
];

const PLAYERS: &[&str] = &[
    "AB de Villiers",
    "CH Gayle",
    "MS Dhoni",
    "RG Sharma",
    "SK Raina",
    "V Kohli",
    "YK Pathan",
    "DA Warner",
    "SR Watson",
    "G Gambhir",
    "AM Rahane",
    "SL Malinga",
];

/// One synthetic row in the column layout of the public IPL match table.
struct Row {
    id: i64,
    season: String,
    city: String,
    date: NaiveDate,
    match_type: &'static str,
    player_of_match: Option<String>,
    venue: String,
    team1: String,
    team2: String,
    toss_winner: String,
    toss_decision: &'static str,
    winner: Option<String>,
    result: &'static str,
    result_margin: Option<f64>,
    target_runs: Option<f64>,
    target_overs: Option<f64>,
    super_over: &'static str,
}

fn season_label(season: i32) -> String {
    // The public table labels a few early seasons by their split year.
    match season {
        2008 => "2007/08".to_string(),
        2010 => "2009/10".to_string(),
        s => s.to_string(),
    }
}

fn generate(rng: &mut StdRng) -> Vec<Row> {
    let mut rows = Vec::new();
    let mut id = 335_982_i64;

    for season in SEASONS {
        let Some(opening) = NaiveDate::from_ymd_opt(season, 4, 1) else {
            continue;
        };
        for n in 0..MATCHES_PER_SEASON {
            let mut pair: Vec<&(&str, &str, &str)> = TEAMS.choose_multiple(rng, 2).collect();
            pair.shuffle(rng);
            let (home, away) = (pair[0], pair[1]);
            let is_final = n + 1 == MATCHES_PER_SEASON;

            let toss_winner = if rng.gen_bool(0.5) { home.0 } else { away.0 };
            let toss_decision = if rng.gen_bool(0.6) { "field" } else { "bat" };
            // The side batting first is listed as team1.
            let bat_first_is_toss_winner = toss_decision == "bat";
            let (team1, team2) = if bat_first_is_toss_winner == (toss_winner == home.0) {
                (home.0, away.0)
            } else {
                (away.0, home.0)
            };

            let target = rng.gen_range(120..=230) as f64;
            let roll: f64 = rng.gen();
            let (result, winner, margin, super_over) = if roll < 0.02 {
                ("no result", None, None, "N")
            } else if roll < 0.04 {
                let w = if rng.gen_bool(0.5) { team1 } else { team2 };
                ("tie", Some(w), None, "Y")
            } else if rng.gen_bool(0.45) {
                ("runs", Some(team1), Some(rng.gen_range(1..=80) as f64), "N")
            } else {
                ("wickets", Some(team2), Some(rng.gen_range(1..=10) as f64), "N")
            };

            rows.push(Row {
                id,
                season: season_label(season),
                city: home.1.to_string(),
                date: opening + Duration::days(n as i64 + 1),
                match_type: if is_final { "Final" } else { "League" },
                player_of_match: winner.and_then(|_| PLAYERS.choose(rng).map(|p| p.to_string())),
                venue: home.2.to_string(),
                team1: team1.to_string(),
                team2: team2.to_string(),
                toss_winner: toss_winner.to_string(),
                toss_decision,
                winner: winner.map(str::to_string),
                result,
                result_margin: margin,
                target_runs: (result != "no result").then_some(target + 1.0),
                target_overs: (result != "no result").then_some(20.0),
                super_over,
            });
            id += 1;
        }
    }
    rows
}

const HEADERS: [&str; 17] = [
    "id",
    "season",
    "city",
    "date",
    "match_type",
    "player_of_match",
    "venue",
    "team1",
    "team2",
    "toss_winner",
    "toss_decision",
    "winner",
    "result",
    "result_margin",
    "target_runs",
    "target_overs",
    "super_over",
];

fn write_csv(rows: &[Row]) -> Result<()> {
    let mut writer = csv::Writer::from_path(CSV_PATH).context("Failed to create CSV file")?;
    writer.write_record(HEADERS)?;
    let opt = |v: Option<f64>| v.map(|x| x.to_string()).unwrap_or_else(|| "NA".to_string());
    for r in rows {
        writer.write_record([
            r.id.to_string(),
            r.season.clone(),
            r.city.clone(),
            r.date.format("%Y-%m-%d").to_string(),
            r.match_type.to_string(),
            r.player_of_match.clone().unwrap_or_else(|| "NA".to_string()),
            r.venue.clone(),
            r.team1.clone(),
            r.team2.clone(),
            r.toss_winner.clone(),
            r.toss_decision.to_string(),
            r.winner.clone().unwrap_or_else(|| "NA".to_string()),
            r.result.to_string(),
            opt(r.result_margin),
            opt(r.target_runs),
            opt(r.target_overs),
            r.super_over.to_string(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

fn write_parquet(rows: &[Row]) -> Result<()> {
    let text = |f: &dyn Fn(&Row) -> Option<String>| -> ArrayRef {
        Arc::new(StringArray::from(rows.iter().map(f).collect::<Vec<_>>()))
    };
    let float = |f: &dyn Fn(&Row) -> Option<f64>| -> ArrayRef {
        Arc::new(Float64Array::from(rows.iter().map(f).collect::<Vec<_>>()))
    };

    let columns: Vec<ArrayRef> = vec![
        Arc::new(Int64Array::from(rows.iter().map(|r| r.id).collect::<Vec<_>>())),
        text(&|r: &Row| Some(r.season.clone())),
        text(&|r: &Row| Some(r.city.clone())),
        text(&|r: &Row| Some(r.date.format("%Y-%m-%d").to_string())),
        text(&|r: &Row| Some(r.match_type.to_string())),
        text(&|r: &Row| r.player_of_match.clone()),
        text(&|r: &Row| Some(r.venue.clone())),
        text(&|r: &Row| Some(r.team1.clone())),
        text(&|r: &Row| Some(r.team2.clone())),
        text(&|r: &Row| Some(r.toss_winner.clone())),
        text(&|r: &Row| Some(r.toss_decision.to_string())),
        text(&|r: &Row| r.winner.clone()),
        text(&|r: &Row| Some(r.result.to_string())),
        float(&|r: &Row| r.result_margin),
        float(&|r: &Row| r.target_runs),
        float(&|r: &Row| r.target_overs),
        text(&|r: &Row| Some(r.super_over.to_string())),
    ];

    let fields: Vec<Field> = HEADERS
        .iter()
        .zip(&columns)
        .map(|(name, col)| Field::new(*name, col.data_type().clone(), *name != "id"))
        .collect();
    let schema = Arc::new(Schema::new(fields));

    let batch = RecordBatch::try_new(schema.clone(), columns).context("Failed to create RecordBatch")?;
    let file = std::fs::File::create(PARQUET_PATH).context("Failed to create output file")?;
    let mut writer = ArrowWriter::try_new(file, schema, None)?;
    writer.write(&batch)?;
    writer.close()?;
    Ok(())
}

fn main() -> Result<()> {
    let mut rng = StdRng::seed_from_u64(42);
    let rows = generate(&mut rng);

    write_csv(&rows)?;
    write_parquet(&rows)?;

    println!(
        "Wrote {} matches over {} seasons to {CSV_PATH} and {PARQUET_PATH}",
        rows.len(),
        SEASONS.count()
    );
    Ok(())
}
