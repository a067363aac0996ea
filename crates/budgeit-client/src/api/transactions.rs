use tracing::instrument;

use budgeit_core::models::{NewTransaction, Transaction};
use budgeit_core::{ApiRequest, Result, Transport};

use crate::endpoints::TRANSACTIONS;
use crate::session_client::SessionClient;

impl<T: Transport> SessionClient<T> {
    #[instrument(skip(self))]
    pub async fn list_transactions(&self) -> Result<Vec<Transaction>> {
        self.send(ApiRequest::get(TRANSACTIONS)).await?.into_json()
    }

    /// Record a transfer from `inflow` to `outflow`.
    #[instrument(skip(self, transaction), fields(name = %transaction.name))]
    pub async fn add_transaction(&self, transaction: &NewTransaction) -> Result<Transaction> {
        let request = ApiRequest::post(TRANSACTIONS).json(transaction)?;
        self.send(request).await?.into_json()
    }
}
