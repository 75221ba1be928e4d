//! [`Command`] for reactivating a [`Pilot`].

use common::{
    operations::{By, Commit, Select, Transact, Transacted, Update},
    Date,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;
use tracing as log;

#[cfg(doc)]
use crate::domain::pilot::Status;
use crate::{
    domain::{pilot, Pilot},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for bringing a [`Status::Inactive`] [`Pilot`] back.
#[derive(Clone, Copy, Debug)]
pub struct ReactivatePilot {
    /// ID of the [`Pilot`] to reactivate.
    pub pilot_id: pilot::Id,

    /// Current [`Date`].
    pub today: Date,
}

impl<Db> Command<ReactivatePilot> for Service<Db>
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
        cmd: ReactivatePilot,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let ReactivatePilot { pilot_id, today } = cmd;

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

        pilot
            .reactivate(today)
            .map_err(tracerr::from_and_wrap!(=> E))?;

        tx.execute(Update(pilot.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        log::info!("`Pilot(id: {pilot_id})` reactivated");
        Ok(pilot)
    }
}

/// Error of [`ReactivatePilot`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Pilot`] refused the reactivation.
    #[display("Reactivation refused: {_0}")]
    #[from]
    Pilot(pilot::Error),

    /// [`Pilot`] doesn't exist.
    #[display("`Pilot(id: {_0})` does not exist")]
    PilotNotExists(#[error(not(source))] pilot::Id),
}
