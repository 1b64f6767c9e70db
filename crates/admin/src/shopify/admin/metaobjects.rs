//! Metaobject operations for the Admin API.

use tracing::instrument;

use super::{
    AdminClient, AdminShopifyError, check_user_errors, missing,
    queries::{
        self, GetMetaobject, GetMetaobjectDefinition, GetMetaobjectNodes, GetMetaobjects,
        MetaobjectCreate, MetaobjectDefinitionCreate, MetaobjectUpdate,
    },
};
use crate::shopify::types::{
    Metaobject, MetaobjectDefinition, MetaobjectDefinitionInput, MetaobjectFieldInput,
};

impl AdminClient {
    /// Definition registered for a metaobject type, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn get_metaobject_definition(
        &self,
        kind: &str,
    ) -> Result<Option<MetaobjectDefinition>, AdminShopifyError> {
        let variables = queries::get_metaobject_definition::Variables {
            kind: kind.to_string(),
        };
        let response = self.execute::<GetMetaobjectDefinition>(variables).await?;
        Ok(response.metaobject_definition_by_type)
    }

    /// Register a metaobject definition.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or returns user errors.
    #[instrument(skip(self, definition), fields(kind = %definition.kind))]
    pub async fn create_metaobject_definition(
        &self,
        definition: MetaobjectDefinitionInput,
    ) -> Result<MetaobjectDefinition, AdminShopifyError> {
        let variables = queries::metaobject_definition_create::Variables { definition };
        let response = self.execute::<MetaobjectDefinitionCreate>(variables).await?;
        let payload = response
            .metaobject_definition_create
            .ok_or_else(|| missing("Failed to create metaobject definition"))?;
        check_user_errors(payload.user_errors)?;

        payload
            .metaobject_definition
            .ok_or_else(|| missing("Failed to create metaobject definition"))
    }

    /// Create a metaobject entry.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or returns user errors.
    #[instrument(skip(self, fields))]
    pub async fn create_metaobject(
        &self,
        kind: &str,
        fields: Vec<MetaobjectFieldInput>,
    ) -> Result<Metaobject, AdminShopifyError> {
        use queries::metaobject_create::{MetaobjectCreateInput, Variables};

        let variables = Variables {
            metaobject: MetaobjectCreateInput {
                kind: kind.to_string(),
                fields,
            },
        };
        let response = self.execute::<MetaobjectCreate>(variables).await?;
        let payload = response
            .metaobject_create
            .ok_or_else(|| missing("Failed to create metaobject"))?;
        check_user_errors(payload.user_errors)?;

        payload
            .metaobject
            .ok_or_else(|| missing("Failed to create metaobject"))
    }

    /// Overwrite the given fields of a metaobject.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or returns user errors.
    #[instrument(skip(self, fields))]
    pub async fn update_metaobject(
        &self,
        id: &str,
        fields: Vec<MetaobjectFieldInput>,
    ) -> Result<Metaobject, AdminShopifyError> {
        use queries::metaobject_update::{MetaobjectUpdateInput, Variables};

        let variables = Variables {
            id: id.to_string(),
            metaobject: MetaobjectUpdateInput { fields },
        };
        let response = self.execute::<MetaobjectUpdate>(variables).await?;
        let payload = response
            .metaobject_update
            .ok_or_else(|| missing("Failed to update metaobject"))?;
        check_user_errors(payload.user_errors)?;

        payload
            .metaobject
            .ok_or_else(|| AdminShopifyError::NotFound(format!("Metaobject {id}")))
    }

    /// Get one metaobject.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn get_metaobject(&self, id: &str) -> Result<Option<Metaobject>, AdminShopifyError> {
        let variables = queries::get_metaobject::Variables { id: id.to_string() };
        let response = self.execute::<GetMetaobject>(variables).await?;
        Ok(response.metaobject)
    }

    /// Most recently updated metaobjects of a type.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn list_metaobjects(
        &self,
        kind: &str,
        first: i64,
    ) -> Result<Vec<Metaobject>, AdminShopifyError> {
        let variables = queries::get_metaobjects::Variables {
            kind: kind.to_string(),
            first,
        };
        let response = self.execute::<GetMetaobjects>(variables).await?;
        Ok(response.metaobjects.nodes)
    }

    /// Fetch several metaobjects by id; ids that are not metaobjects are skipped.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, ids), fields(count = ids.len()))]
    pub async fn get_metaobjects(&self, ids: &[String]) -> Result<Vec<Metaobject>, AdminShopifyError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let variables = queries::get_metaobject_nodes::Variables { ids: ids.to_vec() };
        let response = self.execute::<GetMetaobjectNodes>(variables).await?;

        Ok(response
            .nodes
            .into_iter()
            .flatten()
            .filter_map(|node| serde_json::from_value::<Metaobject>(node).ok())
            .collect())
    }
}
