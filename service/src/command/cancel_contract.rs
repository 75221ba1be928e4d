//! [`Command`] for cancelling a [`Contract`].

use common::{
    operations::{By, Commit, Select, Transact, Transacted, Update},
    Date,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::{contact::Text, contract, offer, Contract, Offer},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for cancelling a [`Contract`] on behalf of its client,
/// returning its seats to the [`Offer`].
#[derive(Clone, Debug)]
pub struct CancelContract {
    /// [`contract::Number`] of the [`Contract`] to be cancelled.
    pub number: contract::Number,

    /// Reason of the cancellation.
    pub reason: Text,

    /// Current [`Date`].
    pub today: Date,
}

impl<Db> Command<CancelContract> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: for<'n> Database<
            Select<By<Option<Contract>, &'n contract::Number>>,
            Ok = Option<Contract>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Offer>, offer::Id>>,
            Ok = Option<Offer>,
            Err = Traced<database::Error>,
        > + Database<Update<Contract>, Ok = (), Err = Traced<database::Error>>
        + Database<Update<Offer>, Ok = (), Err = Traced<database::Error>>
        + Database<Commit, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = Contract;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: CancelContract,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CancelContract {
            number,
            reason,
            today,
        } = cmd;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        let mut contract = tx
            .execute(Select(By::<Option<Contract>, _>::new(&number)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or_else(|| E::ContractNotExists(number.clone()))
            .map_err(tracerr::wrap!())?;
        let mut offer = tx
            .execute(Select(By::<Option<Offer>, _>::new(contract.offer_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::OfferNotExists(contract.offer_id))
            .map_err(tracerr::wrap!())?;

        let cancellation = contract
            .cancel(reason, &mut offer, today)
            .map_err(tracerr::from_and_wrap!(=> E))?;
        log::info!(
            "`Contract(number: {number})` cancelled: penalty {}, refund {}",
            cancellation.penalty,
            cancellation.refund,
        );

        tx.execute(Update(contract.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        tx.execute(Update(offer))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        Ok(contract)
    }
}

/// Error of [`CancelContract`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Contract`] refused the cancellation.
    #[display("Cancellation refused: {_0}")]
    #[from]
    Contract(contract::Error),

    /// [`Contract`] with the provided [`contract::Number`] does not exist.
    #[display("`Contract(number: {_0})` does not exist")]
    ContractNotExists(#[error(not(source))] contract::Number),

    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Offer`] of the [`Contract`] does not exist.
    #[display("`Offer(id: {_0})` does not exist")]
    OfferNotExists(#[error(not(source))] offer::Id),
}

#[cfg(all(test, feature = "memory"))]
mod spec {
    use common::operations::{By, Insert, Select};

    use crate::{
        command::spec::{method, reason, service},
        domain::{
            contract::{self, spec::contract},
            offer::spec::{offer, pln, today},
            Offer,
        },
        infra::Database as _,
    };

    use super::{CancelContract, Command as _, ExecutionError};

    #[tokio::test]
    async fn cancels_and_releases_seats() {
        let svc = service();
        let mut o = offer(10, "1000", 45);
        let mut k = contract(&o, 2);
        o.remaining_seats = 8;
        k.record_deposit(pln("600"), method(), today()).unwrap();
        svc.database().execute(Insert(o.clone())).await.unwrap();
        svc.database().execute(Insert(k.clone())).await.unwrap();
        let cmd = CancelContract {
            number: k.number.clone(),
            reason: reason(),
            today: today(),
        };

        let cancelled = svc.execute(cmd.clone()).await.unwrap();
        assert_eq!(cancelled.status, contract::Status::Cancelled);
        let c = cancelled.cancellation.unwrap();
        assert_eq!(c.penalty, pln("200"));
        assert_eq!(c.refund, pln("400"));

        let stored = svc
            .database()
            .execute(Select(By::<Option<Offer>, _>::new(o.id)))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.remaining_seats, 10);

        let err = svc.execute(cmd).await.unwrap_err();
        assert!(matches!(
            err.as_ref(),
            ExecutionError::Contract(contract::Error::AlreadyCancelled),
        ));
    }
}
