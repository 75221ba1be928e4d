//! [`Command`] for registering a new [`Client`].

use common::{
    operations::{By, Commit, Insert, Select, Transact, Transacted},
    Date,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::{client, Client},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for registering a new [`Client`].
#[derive(Clone, Debug)]
pub struct RegisterClient {
    /// [`client::Draft`] of the new [`Client`].
    pub draft: client::Draft,

    /// Current [`Date`].
    pub today: Date,
}

impl<Db> Command<RegisterClient> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: for<'n> Database<
            Select<By<Option<Client>, &'n client::NationalId>>,
            Ok = Option<Client>,
            Err = Traced<database::Error>,
        > + Database<Insert<Client>, Ok = (), Err = Traced<database::Error>>
        + Database<Commit, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = Client;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: RegisterClient,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let RegisterClient { draft, today } = cmd;

        let client = Client::new(draft, today)
            .map_err(tracerr::from_and_wrap!(=> E))?;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        if let Some(national_id) = &client.national_id {
            let existing = tx
                .execute(Select(By::<Option<Client>, _>::new(national_id)))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))?;
            if existing.is_some() {
                log::warn!("`Client` with `{national_id}` PESEL exists");
                return Err(tracerr::new!(E::NationalIdOccupied(
                    national_id.clone()
                )));
            }
        }

        tx.execute(Insert(client.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        log::info!("`Client(id: {})` registered", client.id);
        Ok(client)
    }
}

/// Error of [`RegisterClient`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Client`] is invalid.
    #[display("Invalid `Client`: {_0}")]
    #[from]
    Client(client::Error),

    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`client::NationalId`] is occupied by another [`Client`].
    #[display("`{_0}` PESEL is occupied")]
    NationalIdOccupied(#[error(not(source))] client::NationalId),
}
