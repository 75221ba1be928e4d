//! [`Command`] for registering a new [`Pilot`].

use common::{
    operations::{By, Commit, Insert, Select, Transact, Transacted},
    Date,
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

/// [`Command`] for hiring a new [`Pilot`].
#[derive(Clone, Debug)]
pub struct RegisterPilot {
    /// [`pilot::Draft`] of the new [`Pilot`].
    pub draft: pilot::Draft,

    /// Current [`Date`].
    pub today: Date,
}

impl<Db> Command<RegisterPilot> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: for<'n> Database<
            Select<By<Option<Pilot>, &'n pilot::LicenseNumber>>,
            Ok = Option<Pilot>,
            Err = Traced<database::Error>,
        > + Database<Insert<Pilot>, Ok = (), Err = Traced<database::Error>>
        + Database<Commit, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = Pilot;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: RegisterPilot,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let RegisterPilot { draft, today } = cmd;

        let pilot =
            Pilot::new(draft, today).map_err(tracerr::from_and_wrap!(=> E))?;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        let number = &pilot.license_number;
        let existing = tx
            .execute(Select(By::<Option<Pilot>, _>::new(number)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        if let Some(p) = existing {
            log::warn!("license `{number}` belongs to `Pilot(id: {})`", p.id);
            return Err(tracerr::new!(E::LicenseOccupied(number.clone())));
        }

        tx.execute(Insert(pilot.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        log::info!("`Pilot(id: {})` hired", pilot.id);
        Ok(pilot)
    }
}

/// Error of [`RegisterPilot`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`pilot::LicenseNumber`] is occupied by another [`Pilot`].
    #[display("License `{_0}` is occupied")]
    LicenseOccupied(#[error(not(source))] pilot::LicenseNumber),

    /// [`Pilot`] is invalid.
    #[display("Invalid `Pilot`: {_0}")]
    #[from]
    Pilot(pilot::Error),
}
