//! Static alias tables for franchise renames and venue spellings.
//!
//! Team names drift across seasons (rebrands, spelling updates). Aggregates spanning several seasons must not be
//! fragmented by that drift, so every name is mapped to one canonical
//! identifier before it reaches the dataset.

/// Historical team name → canonical franchise name.
const TEAM_ALIASES: &[(&str, &str)] = &[
    ("Delhi Daredevils", "Delhi Capitals"),
    ("Kings XI Punjab", "Punjab Kings"),
    ("Kings Xi Punjab", "Punjab Kings"),
    ("Royal Challengers Bangalore", "Royal Challengers Bengaluru"),
    ("Rising Pune Supergiants", "Rising Pune Supergiant"),
    ("Pune Warriors India", "Pune Warriors"),
];

/// Venue spelling/rename → canonical venue name. Checked both before and
/// after the trailing locality is stripped.
const VENUE_ALIASES: &[(&str, &str)] = &[
    ("M.Chinnaswamy Stadium", "M Chinnaswamy Stadium"),
    ("M. Chinnaswamy Stadium", "M Chinnaswamy Stadium"),
    ("Feroz Shah Kotla", "Arun Jaitley Stadium"),
    ("Feroz Shah Kotla Ground", "Arun Jaitley Stadium"),
    ("Sardar Patel Stadium, Motera", "Narendra Modi Stadium"),
    ("Sardar Patel Stadium", "Narendra Modi Stadium"),
    ("Punjab Cricket Association Stadium", "Punjab Cricket Association IS Bindra Stadium"),
    ("Punjab Cricket Association IS Bindra Stadium, Mohali", "Punjab Cricket Association IS Bindra Stadium"),
    ("Dr. DY Patil Sports Academy", "Dr DY Patil Sports Academy"),
    ("MA Chidambaram Stadium, Chepauk", "MA Chidambaram Stadium"),
    ("M.A. Chidambaram Stadium", "MA Chidambaram Stadium"),
    ("Rajiv Gandhi International Stadium, Uppal", "Rajiv Gandhi International Stadium"),
    ("Rajiv Gandhi Intl. Cricket Stadium", "Rajiv Gandhi International Stadium"),
    ("Dr. Y.S. Rajasekhara Reddy ACA-VDCA Cricket Stadium", "Dr YS Rajasekhara Reddy ACA-VDCA Cricket Stadium"),
    ("Vidarbha Cricket Association Stadium, Jamtha", "Vidarbha Cricket Association Stadium"),
    ("Zayed Cricket Stadium, Abu Dhabi", "Sheikh Zayed Stadium"),
];

/// Localities that appear as a ", <place>" suffix on venue names.
const VENUE_LOCALITIES: &[&str] = &[
    "Abu Dhabi",
    "Ahmedabad",
    "Bangalore",
    "Bengaluru",
    "Chandigarh",
    "Chennai",
    "Chepauk",
    "Cuttack",
    "Delhi",
    "Dharamsala",
    "Dubai",
    "Guwahati",
    "Hyderabad",
    "Indore",
    "Jaipur",
    "Kanpur",
    "Kolkata",
    "Lucknow",
    "Mohali",
    "Mullanpur",
    "Mumbai",
    "Navi Mumbai",
    "New Chandigarh",
    "Pune",
    "Raipur",
    "Rajkot",
    "Ranchi",
    "Sharjah",
    "Uppal",
    "Visakhapatnam",
];

/// Trim and collapse internal whitespace.
pub fn clean_name(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn lookup(table: &[(&str, &'static str)], name: &str) -> Option<&'static str> {
    table
        .iter()
        .find(|(alias, _)| alias.eq_ignore_ascii_case(name))
        .map(|(_, canonical)| *canonical)
}

/// Map a team name to its canonical franchise name. Names missing from the
/// alias table are returned cleaned but otherwise unchanged.
pub fn canonical_team(raw: &str) -> String {
    let cleaned = clean_name(raw);
    match lookup(TEAM_ALIASES, &cleaned) {
        Some(canonical) => canonical.to_string(),
        None => cleaned,
    }
}

/// Map a venue name to its canonical form, dropping trailing
/// ", <locality>" suffixes (and the row's own city).
pub fn canonical_venue(raw: &str, city: Option<&str>) -> String {
    let mut name = clean_name(raw);
    if let Some(canonical) = lookup(VENUE_ALIASES, &name) {
        return canonical.to_string();
    }

    while let Some((head, tail)) = name.rsplit_once(',') {
        let tail = tail.trim();
        let is_city = city.is_some_and(|c| c.trim().eq_ignore_ascii_case(tail));
        let is_locality = VENUE_LOCALITIES.iter().any(|l| l.eq_ignore_ascii_case(tail));
        if !(is_city || is_locality) || head.trim().is_empty() {
            break;
        }
        name = head.trim().to_string();
        if let Some(canonical) = lookup(VENUE_ALIASES, &name) {
            return canonical.to_string();
        }
    }
    name
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renamed_franchises_resolve_to_current_name() {
        assert_eq!(canonical_team("Delhi Daredevils"), "Delhi Capitals");
        assert_eq!(canonical_team("  Kings XI   Punjab "), "Punjab Kings");
        assert_eq!(canonical_team("royal challengers bangalore"), "Royal Challengers Bengaluru");
        assert_eq!(canonical_team("Chennai Super Kings"), "Chennai Super Kings");
    }

    #[test]
    fn deccan_chargers_stay_separate_from_sunrisers() {
        assert_eq!(canonical_team("Deccan Chargers"), "Deccan Chargers");
    }

    #[test]
    fn venue_suffixes_are_stripped() {
        assert_eq!(canonical_venue("Wankhede Stadium, Mumbai", Some("Mumbai")), "Wankhede Stadium");
        assert_eq!(canonical_venue("Eden Gardens, Kolkata", None), "Eden Gardens");
        assert_eq!(
            canonical_venue("MA Chidambaram Stadium, Chepauk, Chennai", Some("Chennai")),
            "MA Chidambaram Stadium"
        );
        assert_eq!(
            canonical_venue("M Chinnaswamy Stadium, Bengaluru", Some("Bangalore")),
            "M Chinnaswamy Stadium"
        );
        assert_eq!(canonical_venue("M.Chinnaswamy Stadium", None), "M Chinnaswamy Stadium");
        assert_eq!(canonical_venue("Feroz Shah Kotla", Some("Delhi")), "Arun Jaitley Stadium");
    }

    #[test]
    fn unknown_suffix_is_kept() {
        assert_eq!(
            canonical_venue("Stadium A, Somewhere Else", Some("Elsewhere")),
            "Stadium A, Somewhere Else"
        );
    }
}
