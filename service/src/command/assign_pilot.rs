//! [`Command`] for assigning a [`Pilot`] to a [`Trip`].

use common::operations::{By, Commit, Select, Transact, Transacted, Update};
use derive_more::{Display, Error, From};
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::{offer, pilot, trip, Offer, Pilot, Trip},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for assigning a [`Pilot`] to guide a [`Trip`].
#[derive(Clone, Copy, Debug)]
pub struct AssignPilot {
    /// ID of the [`Trip`] to be guided.
    pub trip_id: trip::Id,

    /// ID of the [`Pilot`] to guide the [`Trip`].
    pub pilot_id: pilot::Id,
}

/// Outcome of the [`AssignPilot`] [`Command`].
#[derive(Clone, Debug)]
pub struct Output {
    /// [`Trip`] guided by the [`Pilot`] now.
    pub trip: Trip,

    /// Details of the [`pilot::Assignment`].
    pub assignment: pilot::Assignment,
}

impl<Db> Command<AssignPilot> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Select<By<Option<Trip>, trip::Id>>,
            Ok = Option<Trip>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Pilot>, pilot::Id>>,
            Ok = Option<Pilot>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Offer>, offer::Id>>,
            Ok = Option<Offer>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Vec<Trip>, pilot::Id>>,
            Ok = Vec<Trip>,
            Err = Traced<database::Error>,
        > + Database<Update<Trip>, Ok = (), Err = Traced<database::Error>>
        + Database<Commit, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = Output;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: AssignPilot) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let AssignPilot { trip_id, pilot_id } = cmd;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        let mut trip = tx
            .execute(Select(By::<Option<Trip>, _>::new(trip_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::TripNotExists(trip_id))
            .map_err(tracerr::wrap!())?;
        let pilot = tx
            .execute(Select(By::<Option<Pilot>, _>::new(pilot_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::PilotNotExists(pilot_id))
            .map_err(tracerr::wrap!())?;
        let offer = tx
            .execute(Select(By::<Option<Offer>, _>::new(trip.offer_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::OfferNotExists(trip.offer_id))
            .map_err(tracerr::wrap!())?;
        let trips = tx
            .execute(Select(By::<Vec<Trip>, _>::new(pilot_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        let assignment =
            pilot.assign_to_trip(&mut trip, &offer, &trips).map_err(|e| {
                log::warn!(
                    "`Pilot(id: {pilot_id})` cannot guide \
                     `Trip(id: {trip_id})`: {e}",
                );
                tracerr::new!(E::from(e))
            })?;

        tx.execute(Update(trip.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        log::info!("`Pilot(id: {pilot_id})` guides `Trip(id: {trip_id})`");
        Ok(Output { trip, assignment })
    }
}

/// Error of [`AssignPilot`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Offer`] realized by the [`Trip`] doesn't exist.
    #[display("`Offer(id: {_0})` does not exist")]
    OfferNotExists(#[error(not(source))] offer::Id),

    /// [`Pilot`] cannot guide the [`Trip`].
    #[display("Assignment refused: {_0}")]
    #[from]
    Pilot(pilot::Error),

    /// [`Pilot`] doesn't exist.
    #[display("`Pilot(id: {_0})` does not exist")]
    PilotNotExists(#[error(not(source))] pilot::Id),

    /// [`Trip`] doesn't exist.
    #[display("`Trip(id: {_0})` does not exist")]
    TripNotExists(#[error(not(source))] trip::Id),
}

#[cfg(all(test, feature = "memory"))]
mod spec {
    use common::operations::{By, Insert, Select};

    use crate::{
        command::spec::service,
        domain::{
            offer::spec::offer,
            pilot::{self, spec::pilot},
            Specialization, Trip,
        },
        infra::Database as _,
    };

    use super::{AssignPilot, Command as _, ExecutionError};

    #[tokio::test]
    async fn assigns_speaking_pilot() {
        let svc = service();
        let o = offer(10, "1000", 30);
        let t = Trip::new(o.id, o.period().unwrap());
        let p = pilot("Nowak", &["Croatian"]);
        svc.database().execute(Insert(o)).await.unwrap();
        svc.database().execute(Insert(t.clone())).await.unwrap();
        svc.database().execute(Insert(p.clone())).await.unwrap();

        let out = svc
            .execute(AssignPilot {
                trip_id: t.id,
                pilot_id: p.id,
            })
            .await
            .unwrap();

        assert_eq!(out.trip.pilot_id, Some(p.id));
        assert_eq!(
            out.assignment.missing_specialization,
            Specialization::new("Balkans"),
        );
        let stored = svc
            .database()
            .execute(Select(By::<Option<Trip>, _>::new(t.id)))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.pilot_id, Some(p.id));
    }

    #[tokio::test]
    async fn refuses_busy_pilot() {
        let svc = service();
        let o = offer(10, "1000", 30);
        let t = Trip::new(o.id, o.period().unwrap());
        let p = pilot("Nowak", &["Croatian"]);
        let mut other = Trip::new(o.id, o.period().unwrap());
        other.pilot_id = Some(p.id);
        svc.database().execute(Insert(o)).await.unwrap();
        svc.database().execute(Insert(t.clone())).await.unwrap();
        svc.database().execute(Insert(other)).await.unwrap();
        svc.database().execute(Insert(p.clone())).await.unwrap();

        let err = svc
            .execute(AssignPilot {
                trip_id: t.id,
                pilot_id: p.id,
            })
            .await
            .unwrap_err();
        assert!(matches!(
            err.as_ref(),
            ExecutionError::Pilot(pilot::Error::Busy(_)),
        ));
    }
}
