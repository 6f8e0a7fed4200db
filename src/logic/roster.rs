//! Roster rules: joining, withdrawing, and trimming the field to an exact capacity.

use crate::logic::rules::ALLOWED_CAPACITIES;
use crate::models::{ConfigurationError, Participant, Tournament, TournamentError};
use chrono::{DateTime, Utc};
use std::io::Read;
use thiserror::Error;

/// Check that `name` may join. Names are unique (case-insensitive) within a tournament.
pub fn check_join(
    tournament: &Tournament,
    roster: &[Participant],
    name: &str,
    started: bool,
) -> Result<(), TournamentError> {
    if started {
        return Err(TournamentError::invalid_state(
            "The tournament has already started",
        ));
    }
    if name.trim().is_empty() {
        return Err(TournamentError::invalid_state("A participant needs a name"));
    }
    if tournament.is_full(roster.len()) {
        return Err(TournamentError::invalid_state("Tournament is full"));
    }
    if roster.iter().any(|p| p.name.eq_ignore_ascii_case(name.trim())) {
        return Err(TournamentError::invalid_state(
            "You are already enrolled in the tournament",
        ));
    }
    Ok(())
}

/// Withdrawal is only possible before the deadline and before the first round.
pub fn check_withdraw(
    tournament: &Tournament,
    now: DateTime<Utc>,
    started: bool,
) -> Result<(), TournamentError> {
    if started || now >= tournament.deadline {
        return Err(TournamentError::invalid_state(
            "You cannot withdraw from the tournament as the deadline has passed",
        ));
    }
    Ok(())
}

/// Roster after trimming, and who had to make way.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FittedRoster {
    pub capacity: usize,
    pub kept: Vec<Participant>,
    pub removed: Vec<Participant>,
}

/// Shrink an underfilled roster to the largest allowed capacity it can fill.
///
/// `roster` must be in registration order; the latest joiners are the ones removed.
/// A roster smaller than every allowed capacity is returned unchanged.
pub fn fit_to_capacity(
    capacity: usize,
    mut roster: Vec<Participant>,
) -> Result<FittedRoster, TournamentError> {
    let mut idx = ALLOWED_CAPACITIES
        .iter()
        .position(|&c| c == capacity)
        .ok_or(ConfigurationError::CapacityNotAllowed(capacity))?;

    while roster.len() < ALLOWED_CAPACITIES[idx] {
        if idx == 0 {
            return Ok(FittedRoster {
                capacity,
                kept: roster,
                removed: Vec::new(),
            });
        }
        idx -= 1;
    }

    let fitted = ALLOWED_CAPACITIES[idx];
    let removed = roster.split_off(fitted);
    Ok(FittedRoster {
        capacity: fitted,
        kept: roster,
        removed,
    })
}

/// Errors reading a roster from CSV.
#[derive(Debug, Error)]
pub enum RosterImportError {
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error("the roster has no `name` column")]
    MissingNameColumn,
}

/// Read participant names from CSV with a `name` header column. Blank names are skipped.
pub fn read_roster_csv<R: Read>(reader: R) -> Result<Vec<String>, RosterImportError> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);
    let column = rdr
        .headers()?
        .iter()
        .position(|h| h.eq_ignore_ascii_case("name"))
        .ok_or(RosterImportError::MissingNameColumn)?;

    let mut names = Vec::new();
    for record in rdr.records() {
        let record = record?;
        if let Some(name) = record.get(column).filter(|n| !n.is_empty()) {
            names.push(name.to_string());
        }
    }
    Ok(names)
}
