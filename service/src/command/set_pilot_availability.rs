//! [`Command`] for limiting the availability of a [`Pilot`].

use common::{
    operations::{By, Commit, Select, Transact, Transacted, Update},
    Period,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::{pilot, Pilot},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for setting the [`Period`] a [`Pilot`] may be booked within.
#[derive(Clone, Copy, Debug)]
pub struct SetPilotAvailability {
    /// ID of the [`Pilot`] to set the availability of.
    pub pilot_id: pilot::Id,

    /// [`Period`] the [`Pilot`] is available within, or [`None`] if not
    /// limited.
    pub period: Option<Period>,
}

impl<Db> Command<SetPilotAvailability> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Select<By<Option<Pilot>, pilot::Id>>,
            Ok = Option<Pilot>,
            Err = Traced<database::Error>,
        > + Database<Update<Pilot>, Ok = (), Err = Traced<database::Error>>
        + Database<Commit, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = Pilot;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: SetPilotAvailability,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let SetPilotAvailability { pilot_id, period } = cmd;

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
        if pilot.availability == period {
            return Ok(pilot);
        }

        pilot.set_availability(period);
        tx.execute(Update(pilot.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        if let Some(p) = period {
            log::info!("`Pilot(id: {pilot_id})` is available within {p} only");
        } else {
            log::info!("`Pilot(id: {pilot_id})` is available any time");
        }
        Ok(pilot)
    }
}

/// Error of [`SetPilotAvailability`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),

    /// [`Pilot`] doesn't exist.
    #[display("`Pilot(id: {_0})` does not exist")]
    #[from(ignore)]
    PilotNotExists(#[error(not(source))] pilot::Id),
}

#[cfg(all(test, feature = "memory"))]
mod spec {
    use common::operations::{By, Insert, Select};

    use crate::{
        command::spec::service,
        domain::{pilot::spec::pilot, trip::spec::period, Pilot},
        infra::Database as _,
    };

    use super::{Command as _, SetPilotAvailability};

    #[tokio::test]
    async fn limits_and_lifts_availability() {
        let svc = service();
        let p = pilot("Nowak", &[]);
        svc.database().execute(Insert(p.clone())).await.unwrap();

        let limited = svc
            .execute(SetPilotAvailability {
                pilot_id: p.id,
                period: Some(period(0, 14)),
            })
            .await
            .unwrap();
        assert!(!limited.is_available(&period(10, 7), &[]));

        _ = svc
            .execute(SetPilotAvailability {
                pilot_id: p.id,
                period: None,
            })
            .await
            .unwrap();
        let stored = svc
            .database()
            .execute(Select(By::<Option<Pilot>, _>::new(p.id)))
            .await
            .unwrap()
            .unwrap();
        assert!(stored.availability.is_none());
    }
}
