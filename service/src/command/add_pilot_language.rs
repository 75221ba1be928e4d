//! [`Command`] for adding a [`Language`] to a [`Pilot`].

use common::operations::{By, Commit, Select, Transact, Transacted, Update};
use derive_more::{Display, Error, From};
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::{pilot, Language, Pilot},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for adding a spoken [`Language`] to a [`Pilot`].
#[derive(Clone, Debug)]
pub struct AddPilotLanguage {
    /// ID of the [`Pilot`] speaking the [`Language`].
    pub pilot_id: pilot::Id,

    /// [`Language`] to add.
    pub language: Language,
}

impl<Db> Command<AddPilotLanguage> for Service<Db>
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
        cmd: AddPilotLanguage,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let AddPilotLanguage { pilot_id, language } = cmd;

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
        if !pilot.add_language(language) {
            return Ok(pilot);
        }

        tx.execute(Update(pilot.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        log::info!("`Pilot(id: {pilot_id})` speaks a new language");
        Ok(pilot)
    }
}

/// Error of [`AddPilotLanguage`] [`Command`] execution.
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
