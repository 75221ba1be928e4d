//! [`Command`] for concluding a new [`Contract`].

use common::{
    operations::{By, Commit, Insert, Select, Transact, Transacted, Update},
    Date,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::{client, contract, offer, Client, Contract, Offer},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for concluding a new [`Contract`] of a [`Client`] booking
/// seats of an [`Offer`].
#[derive(Clone, Copy, Debug)]
pub struct CreateContract {
    /// ID of the [`Client`] concluding the [`Contract`].
    pub client_id: client::Id,

    /// ID of the booked [`Offer`].
    pub offer_id: offer::Id,

    /// Number of participants to book seats for.
    pub participants: u32,

    /// Current [`Date`].
    pub today: Date,
}

impl<Db> Command<CreateContract> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Select<By<Option<Client>, client::Id>>,
            Ok = Option<Client>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Offer>, offer::Id>>,
            Ok = Option<Offer>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Vec<Contract>, offer::Id>>,
            Ok = Vec<Contract>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<contract::Sequence, contract::Year>>,
            Ok = contract::Sequence,
            Err = Traced<database::Error>,
        > + Database<Insert<Contract>, Ok = (), Err = Traced<database::Error>>
        + Database<Update<Offer>, Ok = (), Err = Traced<database::Error>>
        + Database<Commit, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = Contract;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: CreateContract,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CreateContract {
            client_id,
            offer_id,
            participants,
            today,
        } = cmd;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        let client = tx
            .execute(Select(By::<Option<Client>, _>::new(client_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::ClientNotExists(client_id))
            .map_err(tracerr::wrap!())?;
        let mut offer = tx
            .execute(Select(By::<Option<Offer>, _>::new(offer_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::OfferNotExists(offer_id))
            .map_err(tracerr::wrap!())?;

        let contracts = tx
            .execute(Select(By::<Vec<Contract>, _>::new(offer_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        _ = offer.check_availability(&contracts, today);

        let year = contract::Year::of(today);
        let sequence = tx
            .execute(Select(By::<contract::Sequence, _>::new(year)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        let prefix = &self.config().contracts.number_prefix;
        let number = contract::Number::new(prefix.clone(), year, sequence)
            .ok_or_else(|| E::InvalidNumberPrefix(prefix.clone()))
            .map_err(tracerr::wrap!())?;

        let contract =
            Contract::create(number, &client, &mut offer, participants, today)
                .map_err(|e| {
                    log::warn!(
                        "`Contract` of `Client(id: {client_id})` for \
                         `Offer(id: {offer_id})` refused: {e}",
                    );
                    tracerr::new!(E::from(e))
                })?;

        tx.execute(Insert(contract.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        tx.execute(Update(offer))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        log::info!(
            "`Contract(number: {})` concluded for {}",
            contract.number,
            contract.total_price,
        );
        Ok(contract)
    }
}

/// Error of [`CreateContract`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Client`] with the provided ID does not exist.
    #[display("`Client(id: {_0})` does not exist")]
    ClientNotExists(#[error(not(source))] client::Id),

    /// [`Contract`] cannot be concluded.
    #[display("`Contract` refused: {_0}")]
    #[from]
    Contract(contract::Error),

    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// Configured prefix cannot start a [`contract::Number`].
    #[display("`{_0}` is not a valid `contract::Number` prefix")]
    InvalidNumberPrefix(#[error(not(source))] String),

    /// [`Offer`] with the provided ID does not exist.
    #[display("`Offer(id: {_0})` does not exist")]
    OfferNotExists(#[error(not(source))] offer::Id),
}

#[cfg(all(test, feature = "memory"))]
mod spec {
    use common::operations::{By, Insert, Select};

    use crate::{
        command::spec::service,
        domain::{
            client::{self, spec::client},
            contract,
            offer::{
                self,
                spec::{offer, pln, today},
            },
            Offer,
        },
        infra::Database as _,
    };

    use super::{Command as _, CreateContract, ExecutionError};

    #[tokio::test]
    async fn numbers_contracts_and_books_seats() {
        let svc = service();
        let (c, o) = (client(), offer(10, "1000", 30));
        svc.database().execute(Insert(c.clone())).await.unwrap();
        svc.database().execute(Insert(o.clone())).await.unwrap();
        let cmd = CreateContract {
            client_id: c.id,
            offer_id: o.id,
            participants: 3,
            today: today(),
        };

        let first = svc.execute(cmd).await.unwrap();
        let second = svc.execute(cmd).await.unwrap();

        assert_eq!(first.number.to_string(), "UM/2025/0001");
        assert_eq!(second.number.to_string(), "UM/2025/0002");
        assert_eq!(first.status, contract::Status::Signed);
        assert_eq!(first.total_price, pln("3000"));

        let stored = svc
            .database()
            .execute(Select(By::<Option<Offer>, _>::new(o.id)))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.remaining_seats, 4);
    }

    #[tokio::test]
    async fn refuses_overbooking() {
        let svc = service();
        let (c, o) = (client(), offer(2, "1000", 30));
        svc.database().execute(Insert(c.clone())).await.unwrap();
        svc.database().execute(Insert(o.clone())).await.unwrap();

        let err = svc
            .execute(CreateContract {
                client_id: c.id,
                offer_id: o.id,
                participants: 3,
                today: today(),
            })
            .await
            .unwrap_err();
        assert!(matches!(
            err.as_ref(),
            ExecutionError::Contract(contract::Error::Offer(
                offer::Error::NotEnoughSeats { .. }
            )),
        ));

        let stored = svc
            .database()
            .execute(Select(By::<Option<Offer>, _>::new(o.id)))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.remaining_seats, 2);
    }

    #[tokio::test]
    async fn requires_existing_parties() {
        let svc = service();
        let o = offer(2, "1000", 30);
        svc.database().execute(Insert(o.clone())).await.unwrap();

        let err = svc
            .execute(CreateContract {
                client_id: client::Id::new(),
                offer_id: o.id,
                participants: 1,
                today: today(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err.as_ref(), ExecutionError::ClientNotExists(_)));
    }
}
