//! Domain definitions.

pub mod client;
pub mod contact;
pub mod contract;
pub mod destination;
pub mod hotel;
pub mod offer;
pub mod pilot;
pub mod trip;

use derive_more::Display;

pub use self::{
    client::Client,
    contract::Contract,
    destination::{Country, Language, Specialization},
    hotel::Hotel,
    offer::Offer,
    pilot::Pilot,
    trip::Trip,
};

/// Kind of a domain rule violation.
#[derive(Clone, Copy, Debug, Display, Eq, PartialEq)]
pub enum ErrorKind {
    /// Input is malformed or out of its allowed range.
    Validation,

    /// Operation is not allowed in the current state of an entity.
    State,
}

#[cfg(test)]
mod spec {
    use std::error::Error as StdError;

    use super::{
        contract::{self, cancellation, payment},
        hotel, offer, trip, ErrorKind,
    };

    #[test]
    fn errors_chain_as_std_errors() {
        let refused = trip::Error::Transition {
            from: trip::Status::Planned,
            to: trip::Status::Completed,
        };
        let err: Box<dyn StdError> = Box::new(hotel::Error::from(refused));
        assert!(err.source().is_some());

        let errors: [Box<dyn StdError>; 4] = [
            Box::new(offer::Error::NoParticipants),
            Box::new(contract::Error::DepositAlreadyPaid),
            Box::new(payment::Error::AlreadyCancelled),
            Box::new(cancellation::Error {
                expected: cancellation::Status::Approved,
                actual: cancellation::Status::Registered,
            }),
        ];
        for e in errors {
            assert!(!e.to_string().is_empty());
            assert!(e.source().is_none());
        }
        assert_eq!(hotel::Error::from(refused).kind(), ErrorKind::State);
    }
}
