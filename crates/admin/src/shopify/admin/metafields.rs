//! Shop identity and metafield operations for the Admin API.

use tracing::instrument;

use super::{
    AdminClient, AdminShopifyError, check_user_errors, missing,
    queries::{self, GetShop, GetShopMetafields, MetafieldsSet},
};
use crate::shopify::types::{Metafield, MetafieldInput, ShopInfo};

/// Most metafields `metafieldsSet` accepts per call.
const METAFIELDS_SET_LIMIT: usize = 25;

impl AdminClient {
    /// Shop id, name, contact email and myshopify domain.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn shop_info(&self) -> Result<ShopInfo, AdminShopifyError> {
        let response = self.execute::<GetShop>(queries::get_shop::Variables).await?;
        Ok(response.shop)
    }

    /// GID of the shop, the owner of shop-level metafields.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    pub async fn shop_id(&self) -> Result<String, AdminShopifyError> {
        Ok(self.shop_info().await?.id)
    }

    /// Shop id and the shop metafields in `namespace`.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn get_shop_metafields(
        &self,
        namespace: &str,
    ) -> Result<(String, Vec<Metafield>), AdminShopifyError> {
        let variables = queries::get_shop_metafields::Variables {
            namespace: namespace.to_string(),
        };
        let response = self.execute::<GetShopMetafields>(variables).await?;
        Ok((response.shop.id, response.shop.metafields.nodes))
    }

    /// Write metafields, in batches of 25.
    ///
    /// Batches run in order and stop at the first failure; earlier batches
    /// stay written.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or returns user errors.
    #[instrument(skip(self, metafields), fields(count = metafields.len()))]
    pub async fn set_metafields(
        &self,
        metafields: Vec<MetafieldInput>,
    ) -> Result<Vec<Metafield>, AdminShopifyError> {
        let mut written = Vec::with_capacity(metafields.len());

        for batch in metafields.chunks(METAFIELDS_SET_LIMIT) {
            let variables = queries::metafields_set::Variables {
                metafields: batch.to_vec(),
            };
            let response = self.execute::<MetafieldsSet>(variables).await?;
            let payload = response
                .metafields_set
                .ok_or_else(|| missing("Failed to set metafields"))?;
            check_user_errors(payload.user_errors)?;
            written.extend(payload.metafields.unwrap_or_default());
        }

        Ok(written)
    }
}
