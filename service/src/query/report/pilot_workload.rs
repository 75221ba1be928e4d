//! [`PilotWorkload`] definition.

use common::operations::{By, Select};
use tracerr::Traced;

use crate::{
    domain::{pilot, Pilot, Trip},
    infra::{database, Database},
    Query, Service,
};

/// [`Query`] reporting the number of [`Trip`]s completed by every
/// [`pilot::Status::Active`] [`Pilot`] within a year, the busiest first.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct PilotWorkload {
    /// Reported year.
    pub year: i32,
}

/// Row in the output of the [`PilotWorkload`] [`Query`].
#[derive(Clone, Debug)]
pub struct Row {
    /// Reported [`Pilot`].
    pub pilot: Pilot,

    /// Number of [`Trip`]s completed by the [`Pilot`] within the year.
    pub trips: usize,

    /// [`Level`] of the [`Pilot`] workload.
    pub level: Level,
}

/// Level of a [`Pilot`] workload.
#[derive(Clone, Copy, Debug, Eq, PartialEq, strum::Display)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum Level {
    /// Up to 10 [`Trip`]s.
    Low,

    /// From 11 to 20 [`Trip`]s.
    Medium,

    /// More than 20 [`Trip`]s.
    High,
}

impl Level {
    /// Returns the [`Level`] of the provided number of completed `trips`.
    #[must_use]
    pub fn of(trips: usize) -> Self {
        match trips {
            21.. => Self::High,
            11..=20 => Self::Medium,
            _ => Self::Low,
        }
    }
}

impl<Db> Query<PilotWorkload> for Service<Db>
where
    Db: Database<
            Select<By<Vec<Pilot>, ()>>,
            Ok = Vec<Pilot>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Vec<Trip>, ()>>,
            Ok = Vec<Trip>,
            Err = Traced<database::Error>,
        >,
{
    type Ok = Vec<Row>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        PilotWorkload { year }: PilotWorkload,
    ) -> Result<Self::Ok, Self::Err> {
        let pilots = self
            .database()
            .execute(Select(By::<Vec<Pilot>, _>::new(())))
            .await
            .map_err(tracerr::wrap!())?;
        let trips = self
            .database()
            .execute(Select(By::<Vec<Trip>, _>::new(())))
            .await
            .map_err(tracerr::wrap!())?;

        let mut rows = pilots
            .into_iter()
            .filter(|p| p.status == pilot::Status::Active)
            .map(|pilot| {
                let count = pilot.completed_trips_this_year(&trips, year);
                Row {
                    pilot,
                    trips: count,
                    level: Level::of(count),
                }
            })
            .collect::<Vec<_>>();
        rows.sort_by(|a, b| b.trips.cmp(&a.trips));
        Ok(rows)
    }
}
