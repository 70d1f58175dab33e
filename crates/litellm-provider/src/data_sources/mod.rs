pub mod model;

pub use model::ModelDataSource;

use async_trait::async_trait;
use litellm_client::LitellmClient;

use crate::error::Result;
use crate::schema::Schema;
use crate::state::ResourceData;

/// Read-only lookup of an existing remote object.
#[async_trait]
pub trait DataSource: Send + Sync {
    fn type_name(&self) -> &'static str;

    fn schema(&self) -> Schema;

    async fn read(&self, client: &LitellmClient, data: &mut ResourceData) -> Result<()>;
}
