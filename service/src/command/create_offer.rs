//! [`Command`] for creating a new [`Offer`].

use common::{
    operations::{Commit, Insert, Transact, Transacted},
    Date,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::{offer, Offer},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for creating a new [`Offer`].
#[derive(Clone, Debug)]
pub struct CreateOffer {
    /// [`offer::Draft`] of the new [`Offer`].
    pub draft: offer::Draft,

    /// Current [`Date`].
    pub today: Date,
}

impl<Db> Command<CreateOffer> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Insert<Offer>,
            Ok = (),
            Err = Traced<database::Error>,
        > + Database<Commit, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = Offer;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: CreateOffer) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CreateOffer { draft, today } = cmd;

        let offer = Offer::new(draft, today)
            .map_err(tracerr::from_and_wrap!(=> E))?;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        tx.execute(Insert(offer.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        log::info!("`Offer(id: {})` created: {}", offer.id, offer.name);
        Ok(offer)
    }
}

/// Error of [`CreateOffer`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Offer`] is invalid.
    #[display("Invalid `Offer`: {_0}")]
    #[from]
    Offer(offer::Error),
}
