use tracing::instrument;

use budgeit_core::models::{NewPocket, Pocket, PocketUpdate};
use budgeit_core::{ApiRequest, Result, Transport};

use crate::endpoints::{POCKETS, item};
use crate::session_client::SessionClient;

impl<T: Transport> SessionClient<T> {
    #[instrument(skip(self))]
    pub async fn list_pockets(&self) -> Result<Vec<Pocket>> {
        self.send(ApiRequest::get(POCKETS)).await?.into_json()
    }

    #[instrument(skip(self, pocket), fields(name = %pocket.name))]
    pub async fn create_pocket(&self, pocket: &NewPocket) -> Result<Pocket> {
        let request = ApiRequest::post(POCKETS).json(pocket)?;
        self.send(request).await?.into_json()
    }

    /// Rename a pocket or move it between groups. A `None` group ungroups it.
    #[instrument(skip(self, update))]
    pub async fn update_pocket(&self, id: &str, update: &PocketUpdate) -> Result<Pocket> {
        let request = ApiRequest::put(item(POCKETS, id)).json(update)?;
        self.send(request).await?.into_json()
    }

    #[instrument(skip(self))]
    pub async fn delete_pocket(&self, id: &str) -> Result<()> {
        self.send(ApiRequest::delete(item(POCKETS, id))).await?;
        Ok(())
    }
}
