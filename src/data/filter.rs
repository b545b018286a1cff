use super::model::{CanonicalDataset, MatchRecord};

// ---------------------------------------------------------------------------
// Match selection predicates
// ---------------------------------------------------------------------------

/// Which matches belong to an entity. Every metric starts from one of these.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchFilter<'a> {
    /// Matches where the team is either side.
    Team(&'a str),
    /// Matches between the two teams, in either order.
    Pair(&'a str, &'a str),
    Venue(&'a str),
    Season(i32),
    /// Matches where the player was named player of the match.
    PlayerOfMatch(&'a str),
}

impl MatchFilter<'_> {
    pub fn accepts(&self, m: &MatchRecord) -> bool {
        match self {
            MatchFilter::Team(team) => m.involves(team),
            MatchFilter::Pair(a, b) => m.is_between(a, b),
            MatchFilter::Venue(venue) => m.venue.as_deref() == Some(*venue),
            MatchFilter::Season(season) => m.season == *season,
            MatchFilter::PlayerOfMatch(player) => m.player_of_match.as_deref() == Some(*player),
        }
    }
}

/// Borrow the matching records, in dataset (date) order.
pub fn select<'d>(dataset: &'d CanonicalDataset, filter: &MatchFilter<'_>) -> Vec<&'d MatchRecord> {
    dataset
        .matches()
        .iter()
        .filter(|m| filter.accepts(m))
        .collect()
}
