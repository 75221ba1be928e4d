//! [`Command`] for reviewing a [`Hotel`].

use common::{
    operations::{By, Commit, Select, Transact, Transacted, Update},
    Date,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;
use tracing as log;

#[cfg(doc)]
use crate::domain::hotel::Review;
use crate::{
    domain::{
        contact::{Name, Text},
        hotel, Hotel,
    },
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for adding a [`Review`] of a [`Hotel`].
#[derive(Clone, Debug)]
pub struct ReviewHotel {
    /// ID of the reviewed [`Hotel`].
    pub hotel_id: hotel::Id,

    /// Score from `1` to `10`.
    pub score: u8,

    /// Comment of the [`Review`], if any.
    pub comment: Option<Text>,

    /// Author of the [`Review`], if known.
    pub author: Option<Name>,

    /// Current [`Date`].
    pub today: Date,
}

impl<Db> Command<ReviewHotel> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Select<By<Option<Hotel>, hotel::Id>>,
            Ok = Option<Hotel>,
            Err = Traced<database::Error>,
        > + Database<Update<Hotel>, Ok = (), Err = Traced<database::Error>>
        + Database<Commit, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = Hotel;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: ReviewHotel,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let ReviewHotel {
            hotel_id,
            score,
            comment,
            author,
            today,
        } = cmd;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        let mut hotel = tx
            .execute(Select(By::<Option<Hotel>, _>::new(hotel_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::HotelNotExists(hotel_id))
            .map_err(tracerr::wrap!())?;

        hotel
            .add_review(score, comment, author, today)
            .map_err(tracerr::from_and_wrap!(=> E))?;

        tx.execute(Update(hotel.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        log::info!(
            "`Hotel(id: {hotel_id})` reviewed with {score}, rated {} now",
            hotel.rating(),
        );
        Ok(hotel)
    }
}

/// Error of [`ReviewHotel`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Hotel`] refused the [`Review`].
    #[display("Review refused: {_0}")]
    #[from]
    Hotel(hotel::Error),

    /// [`Hotel`] doesn't exist.
    #[display("`Hotel(id: {_0})` does not exist")]
    HotelNotExists(#[error(not(source))] hotel::Id),
}

#[cfg(all(test, feature = "memory"))]
mod spec {
    use common::operations::Insert;

    use crate::{
        command::spec::service,
        domain::{hotel::spec::hotel, offer::spec::today, ErrorKind},
        infra::Database as _,
    };

    use super::{Command as _, ExecutionError, ReviewHotel};

    #[tokio::test]
    async fn recomputes_rating() {
        let svc = service();
        let h = hotel();
        svc.database().execute(Insert(h.clone())).await.unwrap();
        let review = |score| ReviewHotel {
            hotel_id: h.id,
            score,
            comment: None,
            author: None,
            today: today(),
        };

        _ = svc.execute(review(7)).await.unwrap();
        let rated = svc.execute(review(8)).await.unwrap();
        assert_eq!(rated.rating().to_string(), "7.50");
        assert_eq!(rated.reviews().len(), 2);

        let err = svc.execute(review(11)).await.unwrap_err();
        let ExecutionError::Hotel(e) = err.as_ref() else {
            panic!("unexpected error: {err}");
        };
        assert_eq!(e.kind(), ErrorKind::Validation);
    }
}
