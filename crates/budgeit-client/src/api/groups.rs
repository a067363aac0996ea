use tracing::instrument;

use budgeit_core::models::{NewPocketGroup, PocketGroup};
use budgeit_core::{ApiRequest, Result, Transport};

use crate::endpoints::{POCKET_GROUPS, item};
use crate::session_client::SessionClient;

impl<T: Transport> SessionClient<T> {
    /// List pocket groups with their pockets.
    #[instrument(skip(self))]
    pub async fn list_groups(&self) -> Result<Vec<PocketGroup>> {
        self.send(ApiRequest::get(POCKET_GROUPS)).await?.into_json()
    }

    #[instrument(skip(self, group), fields(name = %group.name))]
    pub async fn create_group(&self, group: &NewPocketGroup) -> Result<PocketGroup> {
        let request = ApiRequest::post(POCKET_GROUPS).json(group)?;
        self.send(request).await?.into_json()
    }

    /// Delete a group. Its pockets are kept and become ungrouped.
    #[instrument(skip(self))]
    pub async fn delete_group(&self, id: &str) -> Result<()> {
        self.send(ApiRequest::delete(item(POCKET_GROUPS, id))).await?;
        Ok(())
    }
}
