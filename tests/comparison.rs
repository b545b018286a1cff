use std::path::PathBuf;

use ipl_statzone::analysis::compare::{fmt_pct, metric, ComparisonOptions};
use ipl_statzone::{
    available_entities, compute_comparison, compute_comparison_with, load_dataset,
    CanonicalDataset, ComparisonError, ComparisonKind, ComparisonRequest, MetricValue,
    ResultBundle, UnknownEntityError,
};

fn fixture() -> CanonicalDataset {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push("ipl_small.csv");
    load_dataset(&path).expect("fixture should load")
}

fn team_request(teams: &[&str]) -> ComparisonRequest {
    ComparisonRequest::new(ComparisonKind::Team, teams.iter().copied())
}

#[test]
fn unknown_team_is_reported_by_name() {
    let ds = fixture();
    let err = compute_comparison(&ds, &team_request(&["Mumbai Indians", "Team Z"])).unwrap_err();
    assert_eq!(
        err,
        ComparisonError::UnknownEntity(UnknownEntityError {
            kind: ComparisonKind::Team,
            identifiers: vec!["Team Z".to_string()],
        })
    );
    assert_eq!(err.to_string(), "unknown team selection: Team Z");
}

#[test]
fn head_to_head_matches_the_fixture() {
    let ds = fixture();
    let bundle = compute_comparison(&ds, &team_request(&["Mumbai Indians", "Chennai Super Kings"]))
        .expect("valid teams");
    let key = ResultBundle::pair_key("Mumbai Indians", "Chennai Super Kings");
    let Some(MetricValue::HeadToHead(h2h)) = bundle.pairwise[&key].get(metric::HEAD_TO_HEAD) else {
        panic!("head to head missing");
    };
    assert_eq!((h2h.wins_a, h2h.wins_b, h2h.no_results), (2, 1, 0));
    assert_eq!(h2h.wins_a + h2h.wins_b + h2h.no_results, h2h.total);
    assert_eq!(fmt_pct(h2h.win_pct_a()), "66.7");
    assert!(bundle.warnings.iter().all(|w| w.scope != key));
}

#[test]
fn historical_team_names_resolve() {
    let ds = fixture();
    let bundle = compute_comparison(&ds, &team_request(&["Delhi Daredevils"])).expect("alias resolves");
    assert_eq!(bundle.entities, vec!["Delhi Capitals"]);
    assert_eq!(bundle.metric("Delhi Capitals", metric::MATCHES), Some(&MetricValue::Count(2)));
    assert_eq!(bundle.metric("Delhi Capitals", metric::NO_RESULTS), Some(&MetricValue::Count(1)));
    // The washout is excluded from the denominator.
    assert_eq!(
        bundle.metric("Delhi Capitals", metric::WIN_PCT),
        Some(&MetricValue::Scalar(Some(100.0)))
    );
}

#[test]
fn teams_that_never_met_get_a_placeholder() {
    let ds = fixture();
    let bundle = compute_comparison(&ds, &team_request(&["Delhi Capitals", "Mumbai Indians"]))
        .expect("valid teams");
    let key = ResultBundle::pair_key("Delhi Capitals", "Mumbai Indians");
    assert_eq!(bundle.pairwise[&key][metric::MATCHES], MetricValue::Count(0));
    assert!(bundle
        .warnings
        .iter()
        .any(|w| w.scope == key && w.metric == metric::HEAD_TO_HEAD));
}

#[test]
fn three_teams_get_every_pair() {
    let ds = fixture();
    let bundle = compute_comparison(
        &ds,
        &team_request(&["Mumbai Indians", "Chennai Super Kings", "Royal Challengers Bengaluru"]),
    )
    .expect("valid teams");
    assert_eq!(bundle.per_entity.len(), 3);
    assert_eq!(bundle.pairwise.len(), 3);
}

#[test]
fn comparison_is_repeatable() {
    let ds = fixture();
    let request = ComparisonRequest::new(ComparisonKind::Venue, ["Wankhede Stadium", "MA Chidambaram Stadium"]);
    let first = compute_comparison(&ds, &request).expect("valid venues");
    let second = compute_comparison(&ds, &request).expect("valid venues");
    assert_eq!(first, second);
}

#[test]
fn venue_spelling_variants_resolve() {
    let ds = fixture();
    let request = ComparisonRequest::new(ComparisonKind::Venue, ["MA Chidambaram Stadium, Chepauk"]);
    let bundle = compute_comparison(&ds, &request).expect("venue alias resolves");
    assert_eq!(bundle.entities, vec!["MA Chidambaram Stadium"]);
    assert_eq!(
        bundle.metric("MA Chidambaram Stadium", metric::MATCHES),
        Some(&MetricValue::Count(2))
    );
}

#[test]
fn season_comparison_names_the_champion() {
    let ds = fixture();
    let request = ComparisonRequest::new(ComparisonKind::Season, ["2011", "2008"]);
    let bundle = compute_comparison(&ds, &request).expect("valid seasons");
    assert_eq!(bundle.entities, vec!["2011", "2008"]);
    assert_eq!(
        bundle.metric("2011", metric::CHAMPION),
        Some(&MetricValue::Text(Some("Chennai Super Kings".to_string())))
    );
    assert_eq!(bundle.metric("2008", metric::MATCHES), Some(&MetricValue::Count(4)));
}

#[test]
fn player_awards_are_counted() {
    let ds = fixture();
    let request = ComparisonRequest::new(ComparisonKind::Player, ["MS Dhoni"]);
    let bundle = compute_comparison(&ds, &request).expect("valid player");
    assert_eq!(bundle.metric("MS Dhoni", metric::AWARDS), Some(&MetricValue::Count(1)));
}

#[test]
fn top_n_limits_ranked_tables() {
    let ds = fixture();
    let request = ComparisonRequest::new(ComparisonKind::Season, ["2008"]);
    let bundle = compute_comparison_with(&ds, &request, &ComparisonOptions { top_n: 2 })
        .expect("valid season");
    match bundle.metric("2008", metric::WINS_BY_TEAM) {
        Some(MetricValue::Tally(rows)) => assert_eq!(rows.len(), 2),
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn available_entities_cover_each_kind() {
    let ds = fixture();
    assert_eq!(available_entities(&ds, ComparisonKind::Team).len(), 7);
    assert_eq!(available_entities(&ds, ComparisonKind::Venue).len(), 8);
    assert_eq!(
        available_entities(&ds, ComparisonKind::Season),
        vec!["2008", "2009", "2010", "2011"]
    );
    assert!(available_entities(&ds, ComparisonKind::Player).contains(&"SR Tendulkar".to_string()));
}

fn assert_every_offered_entity_resolves(ds: &CanonicalDataset) {
    for kind in ComparisonKind::ALL {
        for id in available_entities(ds, kind) {
            let bundle = compute_comparison(ds, &ComparisonRequest::new(kind, [id.as_str()]))
                .unwrap_or_else(|e| panic!("{kind} {id:?} was offered but rejected: {e}"));
            assert_eq!(bundle.entities, vec![id.clone()]);
        }
    }
}

#[test]
fn every_offered_entity_can_be_compared() {
    assert_every_offered_entity_resolves(&fixture());
}

#[test]
fn irregular_spacing_in_names_still_resolves() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("spaced.csv");
    std::fs::write(
        &path,
        "id,season,city,date,player_of_match,venue,team1,team2,toss_winner,toss_decision,winner,result,result_margin,target_runs\n\
         1,2011,Bangalore,2011-04-12,AB  de Villiers,M  Chinnaswamy Stadium,Royal Challengers  Bangalore,Mumbai Indians,Mumbai Indians,field,Royal Challengers  Bangalore,runs,20,180\n\
         2,2011,Mumbai,2011-04-20, SR   Tendulkar ,Wankhede Stadium,Mumbai  Indians,Royal Challengers Bangalore,Mumbai Indians,bat,Mumbai Indians,runs,8,171\n",
    )
    .expect("write csv");

    let ds = load_dataset(&path).expect("spaced names load");
    let players = available_entities(&ds, ComparisonKind::Player);
    assert_eq!(players, vec!["AB de Villiers", "SR Tendulkar"]);
    assert_every_offered_entity_resolves(&ds);

    let bundle = compute_comparison(
        &ds,
        &ComparisonRequest::new(ComparisonKind::Player, ["AB  de Villiers"]),
    )
    .expect("double-spaced selection resolves");
    assert_eq!(bundle.metric("AB de Villiers", metric::AWARDS), Some(&MetricValue::Count(1)));
}
