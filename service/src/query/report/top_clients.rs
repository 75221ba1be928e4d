//! [`TopClients`] definition.

use common::{
    operations::{By, Select},
    Money,
};
use tracerr::Traced;

use crate::{
    domain::{Client, Contract},
    infra::{database, Database},
    Query, Service,
};

/// [`Query`] ranking [`Client`]s by the total value of their not cancelled
/// [`Contract`]s.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct TopClients {
    /// Maximum number of [`Row`]s to report.
    pub limit: usize,
}

/// Row in the output of the [`TopClients`] [`Query`].
#[derive(Clone, Debug)]
pub struct Row {
    /// Reported [`Client`].
    pub client: Client,

    /// Number of all the [`Contract`]s of the [`Client`].
    pub contracts: usize,

    /// Total value of the not cancelled [`Contract`]s of the [`Client`].
    pub total: Money,
}

impl<Db> Query<TopClients> for Service<Db>
where
    Db: Database<
            Select<By<Vec<Client>, ()>>,
            Ok = Vec<Client>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Vec<Contract>, ()>>,
            Ok = Vec<Contract>,
            Err = Traced<database::Error>,
        >,
{
    type Ok = Vec<Row>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        TopClients { limit }: TopClients,
    ) -> Result<Self::Ok, Self::Err> {
        let clients = self
            .database()
            .execute(Select(By::<Vec<Client>, _>::new(())))
            .await
            .map_err(tracerr::wrap!())?;
        let contracts = self
            .database()
            .execute(Select(By::<Vec<Contract>, _>::new(())))
            .await
            .map_err(tracerr::wrap!())?;

        let mut rows = clients
            .into_iter()
            .filter_map(|client| {
                let total = client
                    .total_contracts_value(&contracts)
                    .filter(Money::is_positive)?;
                let count = contracts
                    .iter()
                    .filter(|c| c.client_id == client.id)
                    .count();
                Some(Row {
                    client,
                    contracts: count,
                    total,
                })
            })
            .collect::<Vec<_>>();
        rows.sort_by(|a, b| b.total.amount.cmp(&a.total.amount));
        rows.truncate(limit);
        Ok(rows)
    }
}
