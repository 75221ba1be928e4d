//! [`Command`] for completing a [`Trip`].

use common::operations::{By, Commit, Select, Transact, Transacted, Update};
use derive_more::{Display, Error, From};
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::{contract, offer, trip, Contract, Trip},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for completing a [`Trip`] which is in progress.
///
/// Fully paid [`Contract`]s of the realized [`Offer`] are fulfilled along.
///
/// [`Offer`]: crate::domain::Offer
#[derive(Clone, Copy, Debug, From)]
pub struct CompleteTrip {
    /// ID of the [`Trip`] to complete.
    pub trip_id: trip::Id,
}

/// Outcome of the [`CompleteTrip`] [`Command`].
#[derive(Clone, Debug)]
pub struct Output {
    /// Completed [`Trip`].
    pub trip: Trip,

    /// [`Contract`]s fulfilled by the [`Trip`].
    pub fulfilled: Vec<Contract>,
}

impl<Db> Command<CompleteTrip> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Select<By<Option<Trip>, trip::Id>>,
            Ok = Option<Trip>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Vec<Contract>, offer::Id>>,
            Ok = Vec<Contract>,
            Err = Traced<database::Error>,
        > + Database<Update<Trip>, Ok = (), Err = Traced<database::Error>>
        + Database<Update<Contract>, Ok = (), Err = Traced<database::Error>>
        + Database<Commit, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = Output;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: CompleteTrip,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CompleteTrip { trip_id } = cmd;

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

        trip.complete().map_err(tracerr::from_and_wrap!(=> E))?;
        tx.execute(Update(trip.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        let mut fulfilled = tx
            .execute(Select(By::<Vec<Contract>, _>::new(trip.offer_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        fulfilled.retain(|c| c.status == contract::Status::Paid);
        for c in &mut fulfilled {
            c.complete().map_err(tracerr::from_and_wrap!(=> E))?;
            tx.execute(Update(c.clone()))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))?;
        }

        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        log::info!(
            "`Trip(id: {trip_id})` completed, {} `Contract`(s) fulfilled",
            fulfilled.len(),
        );
        Ok(Output { trip, fulfilled })
    }
}

/// Error of [`CompleteTrip`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Contract`] cannot be fulfilled.
    #[display("Fulfillment refused: {_0}")]
    #[from]
    Contract(contract::Error),

    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Trip`] cannot be completed.
    #[display("Completion refused: {_0}")]
    #[from]
    Trip(trip::Error),

    /// [`Trip`] doesn't exist.
    #[display("`Trip(id: {_0})` does not exist")]
    TripNotExists(#[error(not(source))] trip::Id),
}

#[cfg(all(test, feature = "memory"))]
mod spec {
    use common::operations::Insert;

    use crate::{
        command::spec::{method, service},
        domain::{
            contract::{self, spec::contract},
            offer::spec::{offer, pln, today},
            trip::{self, Trip},
        },
        infra::Database as _,
    };

    use super::{Command as _, CompleteTrip, ExecutionError};

    #[tokio::test]
    async fn fulfills_paid_contracts() {
        let svc = service();
        let o = offer(10, "1000", 30);
        let mut paid = contract(&o, 2);
        paid.record_deposit(pln("2000"), method(), today()).unwrap();
        let mut unpaid = contract(&o, 1);
        unpaid.number = "UM/2025/0002".parse().unwrap();
        let mut t = Trip::new(o.id, o.period().unwrap());
        t.start().unwrap();
        for k in [&paid, &unpaid] {
            svc.database().execute(Insert(k.clone())).await.unwrap();
        }
        svc.database().execute(Insert(t.clone())).await.unwrap();

        let out = svc.execute(CompleteTrip::from(t.id)).await.unwrap();

        assert_eq!(out.trip.status, trip::Status::Completed);
        assert_eq!(out.fulfilled.len(), 1);
        assert_eq!(out.fulfilled[0].number, paid.number);
        assert_eq!(out.fulfilled[0].status, contract::Status::Completed);
    }

    #[tokio::test]
    async fn requires_started_trip() {
        let svc = service();
        let o = offer(10, "1000", 30);
        let t = Trip::new(o.id, o.period().unwrap());
        svc.database().execute(Insert(t.clone())).await.unwrap();

        let err = svc.execute(CompleteTrip::from(t.id)).await.unwrap_err();
        assert!(matches!(err.as_ref(), ExecutionError::Trip(_)));
    }
}
