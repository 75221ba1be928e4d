//! [`Command`] for starting a partnership with a [`Hotel`].

use common::{
    operations::{Commit, Insert, Transact, Transacted},
    Date,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::{hotel, Hotel},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for starting a partnership with a new [`Hotel`].
#[derive(Clone, Debug)]
pub struct AddHotel {
    /// [`hotel::Draft`] of the new [`Hotel`].
    pub draft: hotel::Draft,

    /// Current [`Date`].
    pub today: Date,
}

impl<Db> Command<AddHotel> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Insert<Hotel>,
            Ok = (),
            Err = Traced<database::Error>,
        > + Database<Commit, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = Hotel;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: AddHotel) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let AddHotel { draft, today } = cmd;

        let hotel =
            Hotel::new(draft, today).map_err(tracerr::from_and_wrap!(=> E))?;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        tx.execute(Insert(hotel.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        log::info!("partnership with `{}` started", hotel.full_name());
        Ok(hotel)
    }
}

/// Error of [`AddHotel`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Hotel`] is invalid.
    #[display("Invalid `Hotel`: {_0}")]
    #[from]
    Hotel(hotel::Error),
}

#[cfg(all(test, feature = "memory"))]
mod spec {
    use common::operations::{By, Select};

    use crate::{
        command::spec::service,
        domain::{
            hotel::{self, spec::draft},
            offer::spec::today,
            Hotel,
        },
        infra::Database as _,
    };

    use super::{AddHotel, Command as _, ExecutionError};

    #[tokio::test]
    async fn stores_valid_hotel() {
        let svc = service();

        let h = svc
            .execute(AddHotel {
                draft: draft(),
                today: today(),
            })
            .await
            .unwrap();
        assert_eq!(h.status, hotel::Status::Active);

        let stored = svc
            .database()
            .execute(Select(By::<Option<Hotel>, _>::new(h.id)))
            .await
            .unwrap();
        assert!(stored.is_some());

        let err = svc
            .execute(AddHotel {
                draft: hotel::Draft {
                    category: 6,
                    ..draft()
                },
                today: today(),
            })
            .await
            .unwrap_err();
        assert!(matches!(
            err.as_ref(),
            ExecutionError::Hotel(hotel::Error::InvalidCategory(6)),
        ));
    }
}
