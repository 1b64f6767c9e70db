//! GraphQL operation definitions for Shopify Admin API.
//!
//! Each operation lives in its own module with the query text, a
//! `Variables` struct and a `ResponseData` struct, the same layout
//! `graphql_client` generates. The unit struct next to it implements
//! [`GraphQLQuery`] so [`AdminClient::execute`](super::AdminClient) can run it.

use graphql_client::{GraphQLQuery, QueryBody};

/// Declare the `GraphQLQuery` marker for an operation module.
macro_rules! graphql_operation {
    ($name:ident => $module:ident) => {
        pub struct $name;

        impl GraphQLQuery for $name {
            type Variables = $module::Variables;
            type ResponseData = $module::ResponseData;

            fn build_query(variables: Self::Variables) -> QueryBody<Self::Variables> {
                QueryBody {
                    variables,
                    query: $module::QUERY,
                    operation_name: $module::OPERATION_NAME,
                }
            }
        }
    };
}

macro_rules! user_errors {
    () => {
        "userErrors { field message }"
    };
}

macro_rules! variant_fields {
    () => {
        "id title price sku inventoryQuantity selectedOptions { name value }"
    };
}

macro_rules! metaobject_fields {
    () => {
        "id handle type updatedAt fields { key value }"
    };
}

macro_rules! order_fields {
    () => {
        "id name email createdAt displayFulfillmentStatus displayFinancialStatus \
         totalPriceSet { shopMoney { amount currencyCode } } \
         customer { id displayName email } \
         shippingAddress { name address1 address2 city province country zip } \
         lineItems(first: 10) { nodes { id title quantity variantTitle customAttributes { key value } } } \
         metafield(namespace: \"custom\", key: \"design_ids\") { value }"
    };
}

// =============================================================================
// Shop
// =============================================================================

pub mod get_shop {
    use serde::{Deserialize, Serialize};

    use crate::shopify::types::ShopInfo;

    pub const OPERATION_NAME: &str = "GetShop";
    pub const QUERY: &str = "query GetShop { shop { id name email myshopifyDomain } }";

    #[derive(Debug, Serialize)]
    pub struct Variables;

    #[derive(Debug, Deserialize)]
    pub struct ResponseData {
        pub shop: ShopInfo,
    }
}
graphql_operation!(GetShop => get_shop);

pub mod get_shop_metafields {
    use serde::{Deserialize, Serialize};

    use crate::shopify::types::{Metafield, Nodes};

    pub const OPERATION_NAME: &str = "GetShopMetafields";
    pub const QUERY: &str = "query GetShopMetafields($namespace: String!) { \
        shop { id metafields(first: 50, namespace: $namespace) { nodes { namespace key value } } } }";

    #[derive(Debug, Serialize)]
    pub struct Variables {
        pub namespace: String,
    }

    #[derive(Debug, Deserialize)]
    pub struct ResponseData {
        pub shop: Shop,
    }

    #[derive(Debug, Deserialize)]
    pub struct Shop {
        pub id: String,
        pub metafields: Nodes<Metafield>,
    }
}
graphql_operation!(GetShopMetafields => get_shop_metafields);

// =============================================================================
// Products
// =============================================================================

pub mod get_products {
    use serde::{Deserialize, Serialize};

    use crate::shopify::types::{Nodes, ProductSortKey, ProductSummary};

    pub const OPERATION_NAME: &str = "GetProducts";
    pub const QUERY: &str = "query GetProducts($first: Int!, $query: String, $sortKey: ProductSortKeys) { \
        products(first: $first, query: $query, sortKey: $sortKey) { \
        nodes { id title handle status productType vendor } } }";

    #[derive(Debug, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Variables {
        pub first: i64,
        pub query: Option<String>,
        pub sort_key: Option<ProductSortKey>,
    }

    #[derive(Debug, Deserialize)]
    pub struct ResponseData {
        pub products: Nodes<ProductSummary>,
    }
}
graphql_operation!(GetProducts => get_products);

pub mod get_product_option_values {
    use serde::{Deserialize, Serialize};

    use crate::shopify::types::{Nodes, ProductOption};

    pub const OPERATION_NAME: &str = "GetProductOptionValues";
    pub const QUERY: &str = "query GetProductOptionValues($first: Int!) { \
        products(first: $first) { nodes { options { name values } } } }";

    #[derive(Debug, Serialize)]
    pub struct Variables {
        pub first: i64,
    }

    #[derive(Debug, Deserialize)]
    pub struct ResponseData {
        pub products: Nodes<Product>,
    }

    #[derive(Debug, Deserialize)]
    pub struct Product {
        #[serde(default)]
        pub options: Vec<ProductOption>,
    }
}
graphql_operation!(GetProductOptionValues => get_product_option_values);

pub mod get_product_configuration {
    use serde::{Deserialize, Serialize};

    use crate::shopify::types::{Metafield, Nodes, ProductOption, ProductVariant};

    pub const OPERATION_NAME: &str = "GetProductConfiguration";
    pub const QUERY: &str = concat!(
        "query GetProductConfiguration($id: ID!) { product(id: $id) { id title ",
        "options { id name values } ",
        "variants(first: 250) { nodes { ",
        variant_fields!(),
        " } } ",
        "configurator: metafields(first: 10, namespace: \"product_configurator\") { nodes { namespace key value } } ",
        "legacy: metafields(first: 20, namespace: \"custom\") { nodes { namespace key value } } ",
        "} }"
    );

    #[derive(Debug, Serialize)]
    pub struct Variables {
        pub id: String,
    }

    #[derive(Debug, Deserialize)]
    pub struct ResponseData {
        pub product: Option<Product>,
    }

    #[derive(Debug, Deserialize)]
    pub struct Product {
        pub id: String,
        pub title: String,
        #[serde(default)]
        pub options: Vec<ProductOption>,
        pub variants: Nodes<ProductVariant>,
        #[serde(default)]
        pub configurator: Nodes<Metafield>,
        #[serde(default)]
        pub legacy: Nodes<Metafield>,
    }
}
graphql_operation!(GetProductConfiguration => get_product_configuration);

pub mod get_product_details {
    use serde::{Deserialize, Serialize};

    use crate::shopify::types::{Image, Metafield, Nodes, ProductOption, ProductVariant};

    pub const OPERATION_NAME: &str = "GetProductDetails";
    pub const QUERY: &str = concat!(
        "query GetProductDetails($id: ID!, $keys: [String!]) { product(id: $id) { ",
        "id title handle description productType vendor tags ",
        "options { id name values } ",
        "metafields(first: 20, keys: $keys) { nodes { namespace key value } } ",
        "images(first: 10) { nodes { id url altText } } ",
        "variants(first: 10) { nodes { ",
        variant_fields!(),
        " } } } }"
    );

    #[derive(Debug, Serialize)]
    pub struct Variables {
        pub id: String,
        pub keys: Vec<String>,
    }

    #[derive(Debug, Deserialize)]
    pub struct ResponseData {
        pub product: Option<Product>,
    }

    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Product {
        pub id: String,
        pub title: String,
        pub handle: String,
        #[serde(default)]
        pub description: String,
        #[serde(default)]
        pub product_type: String,
        #[serde(default)]
        pub vendor: String,
        #[serde(default)]
        pub tags: Vec<String>,
        #[serde(default)]
        pub options: Vec<ProductOption>,
        #[serde(default)]
        pub metafields: Nodes<Metafield>,
        #[serde(default)]
        pub images: Nodes<Image>,
        #[serde(default)]
        pub variants: Nodes<ProductVariant>,
    }
}
graphql_operation!(GetProductDetails => get_product_details);

pub mod get_product_by_handle {
    use serde::{Deserialize, Serialize};

    use crate::shopify::types::{Nodes, ProductVariant};

    pub const OPERATION_NAME: &str = "GetProductByHandle";
    pub const QUERY: &str = concat!(
        "query GetProductByHandle($handle: String!) { productByHandle(handle: $handle) { ",
        "id title variants(first: 250) { nodes { ",
        variant_fields!(),
        " } } } }"
    );

    #[derive(Debug, Serialize)]
    pub struct Variables {
        pub handle: String,
    }

    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ResponseData {
        pub product_by_handle: Option<Product>,
    }

    #[derive(Debug, Deserialize)]
    pub struct Product {
        pub id: String,
        pub title: String,
        pub variants: Nodes<ProductVariant>,
    }
}
graphql_operation!(GetProductByHandle => get_product_by_handle);

pub mod product_create {
    use serde::{Deserialize, Serialize};

    use crate::shopify::UserError;
    use crate::shopify::types::{CreatedProduct, ProductStatus};

    pub const OPERATION_NAME: &str = "ProductCreate";
    pub const QUERY: &str = concat!(
        "mutation ProductCreate($product: ProductCreateInput!) { productCreate(product: $product) { ",
        "product { id title handle } ",
        user_errors!(),
        " } }"
    );

    #[derive(Debug, Serialize)]
    pub struct Variables {
        pub product: ProductCreateInput,
    }

    #[derive(Debug, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ProductCreateInput {
        pub title: String,
        pub product_type: String,
        pub vendor: String,
        pub status: ProductStatus,
        pub description_html: String,
        #[serde(skip_serializing_if = "Vec::is_empty")]
        pub product_options: Vec<OptionCreateInput>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub handle: Option<String>,
        #[serde(skip_serializing_if = "Vec::is_empty")]
        pub tags: Vec<String>,
    }

    #[derive(Debug, Serialize)]
    pub struct OptionCreateInput {
        pub name: String,
        pub values: Vec<OptionValueCreateInput>,
    }

    #[derive(Debug, Serialize)]
    pub struct OptionValueCreateInput {
        pub name: String,
    }

    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ResponseData {
        pub product_create: Option<Payload>,
    }

    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Payload {
        pub product: Option<CreatedProduct>,
        #[serde(default)]
        pub user_errors: Vec<UserError>,
    }
}
graphql_operation!(ProductCreate => product_create);

pub mod product_update {
    use serde::{Deserialize, Serialize};

    use crate::shopify::UserError;
    use crate::shopify::types::{CreatedProduct, ProductStatus};

    pub const OPERATION_NAME: &str = "ProductUpdate";
    pub const QUERY: &str = concat!(
        "mutation ProductUpdate($product: ProductUpdateInput!) { productUpdate(product: $product) { ",
        "product { id title handle } ",
        user_errors!(),
        " } }"
    );

    #[derive(Debug, Serialize)]
    pub struct Variables {
        pub product: ProductUpdateInput,
    }

    #[derive(Debug, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ProductUpdateInput {
        pub id: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub title: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub description_html: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub vendor: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub product_type: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub status: Option<ProductStatus>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub tags: Option<Vec<String>>,
    }

    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ResponseData {
        pub product_update: Option<Payload>,
    }

    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Payload {
        pub product: Option<CreatedProduct>,
        #[serde(default)]
        pub user_errors: Vec<UserError>,
    }
}
graphql_operation!(ProductUpdate => product_update);

pub mod product_options_create {
    use serde::{Deserialize, Serialize};

    use super::product_create::OptionCreateInput;
    use crate::shopify::UserError;

    pub const OPERATION_NAME: &str = "ProductOptionsCreate";
    pub const QUERY: &str = concat!(
        "mutation ProductOptionsCreate($productId: ID!, $options: [OptionCreateInput!]!) { ",
        "productOptionsCreate(productId: $productId, options: $options) { product { id } ",
        user_errors!(),
        " } }"
    );

    #[derive(Debug, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Variables {
        pub product_id: String,
        pub options: Vec<OptionCreateInput>,
    }

    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ResponseData {
        pub product_options_create: Option<Payload>,
    }

    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Payload {
        #[serde(default)]
        pub user_errors: Vec<UserError>,
    }
}
graphql_operation!(ProductOptionsCreate => product_options_create);

pub mod product_variants_bulk_create {
    use serde::{Deserialize, Serialize};

    use crate::shopify::UserError;
    use crate::shopify::types::InventoryPolicy;

    pub const OPERATION_NAME: &str = "ProductVariantsBulkCreate";
    pub const QUERY: &str = concat!(
        "mutation ProductVariantsBulkCreate($productId: ID!, $variants: [ProductVariantsBulkInput!]!, ",
        "$strategy: ProductVariantsBulkCreateStrategy) { ",
        "productVariantsBulkCreate(productId: $productId, variants: $variants, strategy: $strategy) { ",
        "productVariants { id title } ",
        user_errors!(),
        " } }"
    );

    #[derive(Debug, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Variables {
        pub product_id: String,
        pub variants: Vec<ProductVariantsBulkInput>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub strategy: Option<Strategy>,
    }

    /// What happens to the product's standalone "Default Title" variant.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
    #[serde(rename_all = "SCREAMING_SNAKE_CASE")]
    pub enum Strategy {
        Default,
        RemoveStandaloneVariant,
    }

    #[derive(Debug, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ProductVariantsBulkInput {
        pub option_values: Vec<VariantOptionValueInput>,
        pub price: String,
        pub inventory_policy: InventoryPolicy,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub inventory_item: Option<InventoryItemInput>,
    }

    #[derive(Debug, Serialize)]
    pub struct InventoryItemInput {
        pub sku: String,
    }

    #[derive(Debug, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct VariantOptionValueInput {
        pub option_name: String,
        pub name: String,
    }

    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ResponseData {
        pub product_variants_bulk_create: Option<Payload>,
    }

    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Payload {
        #[serde(default)]
        pub product_variants: Option<Vec<CreatedVariant>>,
        #[serde(default)]
        pub user_errors: Vec<UserError>,
    }

    #[derive(Debug, Deserialize)]
    pub struct CreatedVariant {
        pub id: String,
        pub title: String,
    }
}
graphql_operation!(ProductVariantsBulkCreate => product_variants_bulk_create);

// =============================================================================
// Metafields
// =============================================================================

pub mod metafields_set {
    use serde::{Deserialize, Serialize};

    use crate::shopify::UserError;
    use crate::shopify::types::{Metafield, MetafieldInput};

    pub const OPERATION_NAME: &str = "MetafieldsSet";
    pub const QUERY: &str = concat!(
        "mutation MetafieldsSet($metafields: [MetafieldsSetInput!]!) { ",
        "metafieldsSet(metafields: $metafields) { metafields { namespace key value } ",
        user_errors!(),
        " } }"
    );

    #[derive(Debug, Serialize)]
    pub struct Variables {
        pub metafields: Vec<MetafieldInput>,
    }

    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ResponseData {
        pub metafields_set: Option<Payload>,
    }

    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Payload {
        #[serde(default)]
        pub metafields: Option<Vec<Metafield>>,
        #[serde(default)]
        pub user_errors: Vec<UserError>,
    }
}
graphql_operation!(MetafieldsSet => metafields_set);

// =============================================================================
// Metaobjects
// =============================================================================

pub mod get_metaobject_definition {
    use serde::{Deserialize, Serialize};

    use crate::shopify::types::MetaobjectDefinition;

    pub const OPERATION_NAME: &str = "GetMetaobjectDefinition";
    pub const QUERY: &str = "query GetMetaobjectDefinition($type: String!) { \
        metaobjectDefinitionByType(type: $type) { id type } }";

    #[derive(Debug, Serialize)]
    pub struct Variables {
        #[serde(rename = "type")]
        pub kind: String,
    }

    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ResponseData {
        pub metaobject_definition_by_type: Option<MetaobjectDefinition>,
    }
}
graphql_operation!(GetMetaobjectDefinition => get_metaobject_definition);

pub mod metaobject_definition_create {
    use serde::{Deserialize, Serialize};

    use crate::shopify::UserError;
    use crate::shopify::types::{MetaobjectDefinition, MetaobjectDefinitionInput};

    pub const OPERATION_NAME: &str = "MetaobjectDefinitionCreate";
    pub const QUERY: &str = concat!(
        "mutation MetaobjectDefinitionCreate($definition: MetaobjectDefinitionCreateInput!) { ",
        "metaobjectDefinitionCreate(definition: $definition) { metaobjectDefinition { id type } ",
        user_errors!(),
        " } }"
    );

    #[derive(Debug, Serialize)]
    pub struct Variables {
        pub definition: MetaobjectDefinitionInput,
    }

    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ResponseData {
        pub metaobject_definition_create: Option<Payload>,
    }

    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Payload {
        pub metaobject_definition: Option<MetaobjectDefinition>,
        #[serde(default)]
        pub user_errors: Vec<UserError>,
    }
}
graphql_operation!(MetaobjectDefinitionCreate => metaobject_definition_create);

pub mod metaobject_create {
    use serde::{Deserialize, Serialize};

    use crate::shopify::UserError;
    use crate::shopify::types::{Metaobject, MetaobjectFieldInput};

    pub const OPERATION_NAME: &str = "MetaobjectCreate";
    pub const QUERY: &str = concat!(
        "mutation MetaobjectCreate($metaobject: MetaobjectCreateInput!) { ",
        "metaobjectCreate(metaobject: $metaobject) { metaobject { ",
        metaobject_fields!(),
        " } ",
        user_errors!(),
        " } }"
    );

    #[derive(Debug, Serialize)]
    pub struct Variables {
        pub metaobject: MetaobjectCreateInput,
    }

    #[derive(Debug, Serialize)]
    pub struct MetaobjectCreateInput {
        #[serde(rename = "type")]
        pub kind: String,
        pub fields: Vec<MetaobjectFieldInput>,
    }

    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ResponseData {
        pub metaobject_create: Option<Payload>,
    }

    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Payload {
        pub metaobject: Option<Metaobject>,
        #[serde(default)]
        pub user_errors: Vec<UserError>,
    }
}
graphql_operation!(MetaobjectCreate => metaobject_create);

pub mod metaobject_update {
    use serde::{Deserialize, Serialize};

    use crate::shopify::UserError;
    use crate::shopify::types::{Metaobject, MetaobjectFieldInput};

    pub const OPERATION_NAME: &str = "MetaobjectUpdate";
    pub const QUERY: &str = concat!(
        "mutation MetaobjectUpdate($id: ID!, $metaobject: MetaobjectUpdateInput!) { ",
        "metaobjectUpdate(id: $id, metaobject: $metaobject) { metaobject { ",
        metaobject_fields!(),
        " } ",
        user_errors!(),
        " } }"
    );

    #[derive(Debug, Serialize)]
    pub struct Variables {
        pub id: String,
        pub metaobject: MetaobjectUpdateInput,
    }

    #[derive(Debug, Serialize)]
    pub struct MetaobjectUpdateInput {
        pub fields: Vec<MetaobjectFieldInput>,
    }

    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ResponseData {
        pub metaobject_update: Option<Payload>,
    }

    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Payload {
        pub metaobject: Option<Metaobject>,
        #[serde(default)]
        pub user_errors: Vec<UserError>,
    }
}
graphql_operation!(MetaobjectUpdate => metaobject_update);

pub mod get_metaobject {
    use serde::{Deserialize, Serialize};

    use crate::shopify::types::Metaobject;

    pub const OPERATION_NAME: &str = "GetMetaobject";
    pub const QUERY: &str = concat!(
        "query GetMetaobject($id: ID!) { metaobject(id: $id) { ",
        metaobject_fields!(),
        " } }"
    );

    #[derive(Debug, Serialize)]
    pub struct Variables {
        pub id: String,
    }

    #[derive(Debug, Deserialize)]
    pub struct ResponseData {
        pub metaobject: Option<Metaobject>,
    }
}
graphql_operation!(GetMetaobject => get_metaobject);

pub mod get_metaobjects {
    use serde::{Deserialize, Serialize};

    use crate::shopify::types::{Metaobject, Nodes};

    pub const OPERATION_NAME: &str = "GetMetaobjects";
    pub const QUERY: &str = concat!(
        "query GetMetaobjects($type: String!, $first: Int!) { ",
        "metaobjects(type: $type, first: $first, sortKey: \"updated_at\", reverse: true) { nodes { ",
        metaobject_fields!(),
        " } } }"
    );

    #[derive(Debug, Serialize)]
    pub struct Variables {
        #[serde(rename = "type")]
        pub kind: String,
        pub first: i64,
    }

    #[derive(Debug, Deserialize)]
    pub struct ResponseData {
        pub metaobjects: Nodes<Metaobject>,
    }
}
graphql_operation!(GetMetaobjects => get_metaobjects);

pub mod get_metaobject_nodes {
    use serde::{Deserialize, Serialize};

    pub const OPERATION_NAME: &str = "GetMetaobjectNodes";
    pub const QUERY: &str = concat!(
        "query GetMetaobjectNodes($ids: [ID!]!) { nodes(ids: $ids) { ... on Metaobject { ",
        metaobject_fields!(),
        " } } }"
    );

    #[derive(Debug, Serialize)]
    pub struct Variables {
        pub ids: Vec<String>,
    }

    /// Nodes that are not metaobjects come back as empty objects.
    #[derive(Debug, Deserialize)]
    pub struct ResponseData {
        pub nodes: Vec<Option<serde_json::Value>>,
    }
}
graphql_operation!(GetMetaobjectNodes => get_metaobject_nodes);

// =============================================================================
// Files
// =============================================================================

pub mod staged_uploads_create {
    use serde::{Deserialize, Serialize};

    use crate::shopify::UserError;
    use crate::shopify::types::{StagedUploadResource, StagedUploadTarget};

    pub const OPERATION_NAME: &str = "StagedUploadsCreate";
    pub const QUERY: &str = concat!(
        "mutation StagedUploadsCreate($input: [StagedUploadInput!]!) { ",
        "stagedUploadsCreate(input: $input) { stagedTargets { url resourceUrl parameters { name value } } ",
        user_errors!(),
        " } }"
    );

    #[derive(Debug, Serialize)]
    pub struct Variables {
        pub input: Vec<StagedUploadInput>,
    }

    #[derive(Debug, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct StagedUploadInput {
        pub filename: String,
        pub mime_type: String,
        pub resource: StagedUploadResource,
        pub file_size: String,
        pub http_method: &'static str,
    }

    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ResponseData {
        pub staged_uploads_create: Option<Payload>,
    }

    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Payload {
        #[serde(default)]
        pub staged_targets: Option<Vec<StagedUploadTarget>>,
        #[serde(default)]
        pub user_errors: Vec<UserError>,
    }
}
graphql_operation!(StagedUploadsCreate => staged_uploads_create);

pub mod file_create {
    use serde::{Deserialize, Serialize};

    use crate::shopify::UserError;

    pub const OPERATION_NAME: &str = "FileCreate";
    pub const QUERY: &str = concat!(
        "mutation FileCreate($files: [FileCreateInput!]!) { fileCreate(files: $files) { ",
        "files { id ... on GenericFile { url } ... on MediaImage { image { url } } } ",
        user_errors!(),
        " } }"
    );

    #[derive(Debug, Serialize)]
    pub struct Variables {
        pub files: Vec<FileCreateInput>,
    }

    #[derive(Debug, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct FileCreateInput {
        pub original_source: String,
        pub content_type: &'static str,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub alt: Option<String>,
    }

    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ResponseData {
        pub file_create: Option<Payload>,
    }

    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Payload {
        #[serde(default)]
        pub files: Option<Vec<File>>,
        #[serde(default)]
        pub user_errors: Vec<UserError>,
    }

    #[derive(Debug, Deserialize)]
    pub struct File {
        pub id: String,
        #[serde(default)]
        pub url: Option<String>,
        #[serde(default)]
        pub image: Option<FileImage>,
    }

    #[derive(Debug, Deserialize)]
    pub struct FileImage {
        pub url: String,
    }
}
graphql_operation!(FileCreate => file_create);

// =============================================================================
// Orders
// =============================================================================

pub mod get_orders {
    use serde::{Deserialize, Serialize};

    use crate::shopify::types::{Nodes, Order};

    pub const OPERATION_NAME: &str = "GetOrders";
    pub const QUERY: &str = concat!(
        "query GetOrders($first: Int!, $query: String) { ",
        "orders(first: $first, query: $query, sortKey: CREATED_AT, reverse: true) { nodes { ",
        order_fields!(),
        " } } }"
    );

    #[derive(Debug, Serialize)]
    pub struct Variables {
        pub first: i64,
        pub query: Option<String>,
    }

    #[derive(Debug, Deserialize)]
    pub struct ResponseData {
        pub orders: Nodes<Order>,
    }
}
graphql_operation!(GetOrders => get_orders);

pub mod get_order {
    use serde::{Deserialize, Serialize};

    use crate::shopify::types::Order;

    pub const OPERATION_NAME: &str = "GetOrder";
    pub const QUERY: &str = concat!(
        "query GetOrder($id: ID!) { order(id: $id) { ",
        order_fields!(),
        " } }"
    );

    #[derive(Debug, Serialize)]
    pub struct Variables {
        pub id: String,
    }

    #[derive(Debug, Deserialize)]
    pub struct ResponseData {
        pub order: Option<Order>,
    }
}
graphql_operation!(GetOrder => get_order);

pub mod get_fulfillment_orders {
    use serde::{Deserialize, Serialize};

    use crate::shopify::types::{FulfillmentOrder, Nodes};

    pub const OPERATION_NAME: &str = "GetFulfillmentOrders";
    pub const QUERY: &str = "query GetFulfillmentOrders($id: ID!) { order(id: $id) { \
        fulfillmentOrders(first: 10) { nodes { id status } } } }";

    #[derive(Debug, Serialize)]
    pub struct Variables {
        pub id: String,
    }

    #[derive(Debug, Deserialize)]
    pub struct ResponseData {
        pub order: Option<Order>,
    }

    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Order {
        pub fulfillment_orders: Nodes<FulfillmentOrder>,
    }
}
graphql_operation!(GetFulfillmentOrders => get_fulfillment_orders);

pub mod fulfillment_create {
    use serde::{Deserialize, Serialize};

    use crate::shopify::UserError;

    pub const OPERATION_NAME: &str = "FulfillmentCreate";
    pub const QUERY: &str = concat!(
        "mutation FulfillmentCreate($fulfillment: FulfillmentInput!) { ",
        "fulfillmentCreate(fulfillment: $fulfillment) { fulfillment { id status } ",
        user_errors!(),
        " } }"
    );

    #[derive(Debug, Serialize)]
    pub struct Variables {
        pub fulfillment: FulfillmentInput,
    }

    #[derive(Debug, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct FulfillmentInput {
        pub line_items_by_fulfillment_order: Vec<FulfillmentOrderLineItems>,
        pub notify_customer: bool,
    }

    #[derive(Debug, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct FulfillmentOrderLineItems {
        pub fulfillment_order_id: String,
    }

    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ResponseData {
        pub fulfillment_create: Option<Payload>,
    }

    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Payload {
        pub fulfillment: Option<Fulfillment>,
        #[serde(default)]
        pub user_errors: Vec<UserError>,
    }

    #[derive(Debug, Deserialize)]
    pub struct Fulfillment {
        pub id: String,
        pub status: String,
    }
}
graphql_operation!(FulfillmentCreate => fulfillment_create);

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_build_query_carries_operation_name() {
        let body = GetMetaobject::build_query(get_metaobject::Variables {
            id: "gid://shopify/Metaobject/1".to_string(),
        });
        assert_eq!(body.operation_name, "GetMetaobject");
        assert!(body.query.starts_with("query GetMetaobject($id: ID!)"));
        assert!(body.query.contains("fields { key value }"));
    }

    #[test]
    fn test_order_fields_select_design_ids() {
        assert!(get_orders::QUERY.contains("key: \"design_ids\""));
        assert!(get_order::QUERY.contains("customAttributes { key value }"));
    }

    #[test]
    fn test_product_update_sends_only_changed_fields() {
        let body = ProductUpdate::build_query(product_update::Variables {
            product: product_update::ProductUpdateInput {
                id: "gid://shopify/Product/1".to_string(),
                title: Some("Classic Tee".to_string()),
                description_html: None,
                vendor: None,
                product_type: None,
                status: Some(crate::shopify::ProductStatus::Archived),
                tags: Some(Vec::new()),
            },
        });
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(
            json["variables"]["product"],
            serde_json::json!({
                "id": "gid://shopify/Product/1",
                "title": "Classic Tee",
                "status": "ARCHIVED",
                "tags": []
            })
        );
        assert!(body.query.contains("productUpdate(product: $product)"));
    }

    #[test]
    fn test_bulk_create_strategy_is_optional() {
        let variables = product_variants_bulk_create::Variables {
            product_id: "gid://shopify/Product/1".to_string(),
            variants: Vec::new(),
            strategy: None,
        };
        let json = serde_json::to_value(&variables).unwrap();
        assert!(json.get("strategy").is_none());

        let variables = product_variants_bulk_create::Variables {
            strategy: Some(product_variants_bulk_create::Strategy::RemoveStandaloneVariant),
            ..variables
        };
        let json = serde_json::to_value(&variables).unwrap();
        assert_eq!(json["strategy"], "REMOVE_STANDALONE_VARIANT");
    }

    #[test]
    fn test_unit_variables_serialize_as_null() {
        let body = GetShop::build_query(get_shop::Variables);
        let json = serde_json::to_value(&body).unwrap();
        assert!(json["variables"].is_null());
        assert_eq!(json["operationName"], "GetShop");
    }
}
