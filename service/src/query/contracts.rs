//! [`Query`] collection related to the multiple [`Contract`]s.

use std::ops::RangeInclusive;

use common::operations::{By, Select};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{client, contract, offer, Client, Contract},
    infra::{database, Database},
    Query, Service,
};

use super::DatabaseQuery;

/// Queries [`Contract`]s of the [`Client`] with the provided [`client::Id`].
pub type OfClient = DatabaseQuery<By<Vec<Contract>, client::Id>>;

/// Queries [`Contract`]s of the [`Offer`] with the provided [`offer::Id`].
///
/// [`Offer`]: crate::domain::Offer
pub type OfOffer = DatabaseQuery<By<Vec<Contract>, offer::Id>>;

/// Queries [`Contract`]s in the provided [`contract::Status`].
pub type WithStatus = DatabaseQuery<By<Vec<Contract>, contract::Status>>;

/// Queries [`Contract`]s concluded within the provided range of
/// [`contract::ConclusionDate`]s.
pub type ConcludedWithin = DatabaseQuery<
    By<Vec<Contract>, RangeInclusive<contract::ConclusionDate>>,
>;

/// [`Query`] for the history of [`Contract`]s of a [`Client`] identified by
/// their [`client::NationalId`].
#[derive(Clone, Debug, From)]
pub struct ClientContracts {
    /// [`client::NationalId`] of the [`Client`].
    pub national_id: client::NationalId,
}

impl<Db> Query<ClientContracts> for Service<Db>
where
    Db: for<'n> Database<
            Select<By<Option<Client>, &'n client::NationalId>>,
            Ok = Option<Client>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Vec<Contract>, client::Id>>,
            Ok = Vec<Contract>,
            Err = Traced<database::Error>,
        >,
{
    type Ok = Vec<Contract>;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        ClientContracts { national_id }: ClientContracts,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let client = self
            .database()
            .execute(Select(By::<Option<Client>, _>::new(&national_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::ClientNotExists(national_id))
            .map_err(tracerr::wrap!())?;

        self.database()
            .execute(Select(By::<Vec<Contract>, _>::new(client.id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
    }
}

/// Error of [`ClientContracts`] [`Query`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Client`] with the provided [`client::NationalId`] doesn't exist.
    #[display("`Client` with `{_0}` PESEL does not exist")]
    #[from(ignore)]
    ClientNotExists(#[error(not(source))] client::NationalId),

    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),
}

/// [`Query`] for [`contract::Status::DepositPaid`] [`Contract`]s waiting for
/// their balance, the soonest due first.
#[derive(Clone, Copy, Debug, Default)]
pub struct AwaitingBalance;

impl<Db> Query<AwaitingBalance> for Service<Db>
where
    Db: Database<
        Select<By<Vec<Contract>, contract::Status>>,
        Ok = Vec<Contract>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = Vec<Contract>;
    type Err = Traced<database::Error>;

    async fn execute(&self, _: AwaitingBalance) -> Result<Self::Ok, Self::Err> {
        let mut contracts = self
            .database()
            .execute(Select(By::<Vec<Contract>, _>::new(
                contract::Status::DepositPaid,
            )))
            .await
            .map_err(tracerr::wrap!())?;
        contracts.sort_by_key(|c| c.balance_due_on);
        Ok(contracts)
    }
}
