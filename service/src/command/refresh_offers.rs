//! [`Command`] for refreshing availability of all the active [`Offer`]s.

use common::{
    operations::{By, Commit, Select, Transact, Transacted, Update},
    Date,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::{offer, Contract, Offer},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for recomputing the remaining seats of all the
/// [`offer::Status::Active`] [`Offer`]s out of their [`Contract`]s, and
/// deactivating the departed ones.
#[derive(Clone, Copy, Debug)]
pub struct RefreshOffers {
    /// Current [`Date`].
    pub today: Date,
}

impl<Db> Command<RefreshOffers> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Select<By<Vec<Offer>, offer::Status>>,
            Ok = Vec<Offer>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Vec<Contract>, offer::Id>>,
            Ok = Vec<Contract>,
            Err = Traced<database::Error>,
        > + Database<Update<Offer>, Ok = (), Err = Traced<database::Error>>
        + Database<Commit, Ok = (), Err = Traced<database::Error>>,
{
    /// Refreshed [`Offer`]s, including the deactivated ones.
    type Ok = Vec<Offer>;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: RefreshOffers,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let RefreshOffers { today } = cmd;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        let mut offers = tx
            .execute(Select(By::<Vec<Offer>, _>::new(offer::Status::Active)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        for offer in &mut offers {
            let contracts = tx
                .execute(Select(By::<Vec<Contract>, _>::new(offer.id)))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))?;
            _ = offer.check_availability(&contracts, today);

            tx.execute(Update(offer.clone()))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))?;
        }

        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        let deactivated = offers
            .iter()
            .filter(|o| o.status == offer::Status::Inactive)
            .count();
        log::info!(
            "{} `Offer`(s) refreshed, {deactivated} deactivated",
            offers.len(),
        );
        Ok(offers)
    }
}

/// Error of [`RefreshOffers`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),
}
