use async_trait::async_trait;
use litellm_client::LitellmClient;
use litellm_core::ValidationError;

use crate::data_sources::DataSource;
use crate::error::Result;
use crate::resource::{fetch, RemoteResource};
use crate::resources::model::{apply_model, model_attributes, ModelResource};
use crate::schema::Schema;
use crate::state::ResourceData;

const KEY: &str = "model_info_id";

/// Looks up an existing model deployment by `model_info_id`.
#[derive(Debug, Default)]
pub struct ModelDataSource;

#[async_trait]
impl DataSource for ModelDataSource {
    fn type_name(&self) -> &'static str {
        ModelResource::TYPE_NAME
    }

    fn schema(&self) -> Schema {
        let attributes = model_attributes()
            .into_iter()
            .map(|mut attr| {
                if attr.name != KEY {
                    attr.required = false;
                    attr.optional = true;
                    attr.computed = true;
                    attr.default = None;
                }
                attr
            })
            .collect();
        Schema::new(attributes)
    }

    async fn read(&self, client: &LitellmClient, data: &mut ResourceData) -> Result<()> {
        let key = data
            .string(KEY)
            .ok_or_else(|| ValidationError::MissingAttribute(KEY.to_string()))?;
        let remote = fetch::<ModelResource>(client, &key).await?;
        apply_model(remote.data, data);
        Ok(())
    }
}
