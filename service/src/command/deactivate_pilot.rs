//! [`Command`] for deactivating a [`Pilot`].

use common::operations::{By, Commit, Select, Transact, Transacted, Update};
use derive_more::{Display, Error, From};
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::{pilot, Pilot, Trip},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for deactivating a [`Pilot`] leaving the agency.
///
/// [`Pilot`]s are never removed, so their [`Trip`]s history is kept.
#[derive(Clone, Copy, Debug, From)]
pub struct DeactivatePilot {
    /// ID of the [`Pilot`] to deactivate.
    pub pilot_id: pilot::Id,
}

impl<Db> Command<DeactivatePilot> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Select<By<Option<Pilot>, pilot::Id>>,
            Ok = Option<Pilot>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Vec<Trip>, pilot::Id>>,
            Ok = Vec<Trip>,
            Err = Traced<database::Error>,
        > + Database<Update<Pilot>, Ok = (), Err = Traced<database::Error>>
        + Database<Commit, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = Pilot;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: DeactivatePilot,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let DeactivatePilot { pilot_id } = cmd;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        let mut pilot = tx
            .execute(Select(By::<Option<Pilot>, _>::new(pilot_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::PilotNotExists(pilot_id))
            .map_err(tracerr::wrap!())?;
        let trips = tx
            .execute(Select(By::<Vec<Trip>, _>::new(pilot_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        pilot.deactivate(&trips).map_err(|e| {
            log::warn!("`Pilot(id: {pilot_id})` cannot be deactivated: {e}");
            tracerr::new!(E::from(e))
        })?;

        tx.execute(Update(pilot.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        log::info!("`Pilot(id: {pilot_id})` deactivated");
        Ok(pilot)
    }
}

/// Error of [`DeactivatePilot`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Pilot`] refused the deactivation.
    #[display("Deactivation refused: {_0}")]
    #[from]
    Pilot(pilot::Error),

    /// [`Pilot`] doesn't exist.
    #[display("`Pilot(id: {_0})` does not exist")]
    PilotNotExists(#[error(not(source))] pilot::Id),
}

#[cfg(all(test, feature = "memory"))]
mod spec {
    use common::operations::{Insert, Update};

    use crate::{
        command::spec::service,
        domain::{
            pilot::{self, spec::pilot},
            trip::spec::trip,
        },
        infra::Database as _,
    };

    use super::{Command as _, DeactivatePilot, ExecutionError};

    #[tokio::test]
    async fn refuses_while_trips_are_scheduled() {
        let svc = service();
        let p = pilot("Nowak", &[]);
        let mut t = trip(10, 7);
        t.pilot_id = Some(p.id);
        svc.database().execute(Insert(p.clone())).await.unwrap();
        svc.database().execute(Insert(t.clone())).await.unwrap();

        let err = svc.execute(DeactivatePilot::from(p.id)).await.unwrap_err();
        assert!(matches!(
            err.as_ref(),
            ExecutionError::Pilot(pilot::Error::Busy(_)),
        ));

        t.start().unwrap();
        t.complete().unwrap();
        svc.database().execute(Update(t)).await.unwrap();

        let inactive = svc.execute(DeactivatePilot::from(p.id)).await.unwrap();
        assert_eq!(inactive.status, pilot::Status::Inactive);
    }
}
