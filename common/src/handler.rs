//! [`Handler`] abstractions.

use std::future::Future;

/// Something executing `Args` asynchronously.
///
/// The single seam between the layers: domain services handle commands and
/// queries, while storages handle [`operations`] issued by those services.
/// Each handled `Args` type picks its own [`Handler::Ok`] and
/// [`Handler::Err`], so one type may handle many unrelated `Args`.
///
/// [`operations`]: crate::operations
pub trait Handler<Args = ()> {
    /// Outcome of a successful execution.
    type Ok;

    /// Error of a failed execution.
    type Err;

    /// Executes the provided `args`.
    fn execute(
        &self,
        args: Args,
    ) -> impl Future<Output = Result<Self::Ok, Self::Err>>;
}
