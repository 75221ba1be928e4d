//! Ranking of [`Pilot`]s suitable to guide a [`Trip`].

use crate::domain::{destination::Requirements, Pilot, Trip};

/// Score of a [`Pilot`] suitability to guide some [`Trip`].
pub type Score = i32;

/// [`Pilot`] recommended to guide a [`Trip`].
#[derive(Clone, Copy, Debug)]
pub struct Candidate<'p> {
    /// Recommended [`Pilot`].
    pub pilot: &'p Pilot,

    /// [`Score`] of the [`Pilot`].
    pub score: Score,
}

/// Scores how well the provided [`Pilot`] suits the [`Requirements`], given
/// the `trips` they have guided so far.
///
/// - `+20` for a [lifetime experience][1];
/// - `+15` for speaking the required language;
/// - `+10` for having the expected specialization;
/// - `+5` for at least 10 trips completed in the `year`, or `+3` for at
///   least 5 of them;
/// - `-10` for more than 25 trips in the `year`, as being overloaded.
///
/// [1]: Pilot::is_lifetime_experienced
#[must_use]
pub fn score(
    pilot: &Pilot,
    trips: &[Trip],
    requirements: &Requirements,
    year: i32,
) -> Score {
    let mut score = 0;
    if pilot.is_lifetime_experienced(trips) {
        score += 20;
    }
    if pilot.knows_language(&requirements.language) {
        score += 15;
    }
    if pilot.has_specialization(&requirements.specialization) {
        score += 10;
    }

    let this_year = pilot.completed_trips_this_year(trips, year);
    if this_year >= 10 {
        score += 5;
    } else if this_year >= 5 {
        score += 3;
    }
    if this_year > 25 {
        score -= 10;
    }
    score
}

/// Recommends at most `limit` of the `candidates` to guide the provided
/// [`Trip`], best [`Score`]d first.
///
/// Only the [`Pilot`]s available for the [`Trip`] and speaking the required
/// language are recommended. [`Pilot`]s of the same [`Score`] keep their
/// order in the `candidates`.
#[must_use]
pub fn recommend<'p>(
    candidates: impl IntoIterator<Item = &'p Pilot>,
    trip: &Trip,
    trips: &[Trip],
    requirements: &Requirements,
    limit: usize,
    year: i32,
) -> Vec<Candidate<'p>> {
    let mut recommended = candidates
        .into_iter()
        .filter(|p| {
            p.knows_language(&requirements.language)
                && p.is_available(
                    &trip.period,
                    trips.iter().filter(|t| t.id != trip.id),
                )
        })
        .map(|pilot| Candidate {
            pilot,
            score: score(pilot, trips, requirements, year),
        })
        .collect::<Vec<_>>();

    recommended.sort_by(|a, b| b.score.cmp(&a.score));
    recommended.truncate(limit);
    recommended
}

/// Picks the best of the `candidates` to guide the provided [`Trip`].
///
/// See [`recommend()`] for details.
#[must_use]
pub fn best<'p>(
    candidates: impl IntoIterator<Item = &'p Pilot>,
    trip: &Trip,
    trips: &[Trip],
    requirements: &Requirements,
    year: i32,
) -> Option<Candidate<'p>> {
    recommend(candidates, trip, trips, requirements, 1, year)
        .into_iter()
        .next()
}
