use chrono::Utc;
use configuration::CatalogConfig;
use core_types::{rank_products, Product};
use std::collections::BTreeMap;
use std::sync::Arc;

pub mod auth;
pub mod error;
pub mod responses;
pub mod transport;

// --- Public API ---
pub use auth::{canonical_query_string, sign_request, SignedQuery};
pub use error::CatalogError;
pub use transport::{CatalogTransport, HttpResponse, ReqwestTransport, TransportError};

/// Default search category when the caller does not name one.
pub const DEFAULT_CATEGORY: &str = "All";
/// Default keywords for the recommended-products listing.
pub const DEFAULT_KEYWORDS: &str = "bestsellers";

/// A client for the affiliate product catalog API.
///
/// Each call builds a parameter set, signs it with the shared-secret scheme
/// in [`auth`], issues one GET against the configured endpoint and parses
/// the XML body. Holds no mutable state, so concurrent calls are safe.
pub struct CatalogClient {
    transport: Arc<dyn CatalogTransport>,
    config: CatalogConfig,
}

impl CatalogClient {
    /// Creates a client backed by the live, timeout-hardened HTTP transport.
    pub fn new(config: CatalogConfig) -> Result<Self, CatalogError> {
        let transport = ReqwestTransport::new()
            .map_err(|e| CatalogError::Unavailable(e.to_string()))?;
        Ok(Self::with_transport(config, Arc::new(transport)))
    }

    /// Creates a client over an arbitrary transport. Used by tests to
    /// substitute a canned-response mock.
    pub fn with_transport(config: CatalogConfig, transport: Arc<dyn CatalogTransport>) -> Self {
        Self { transport, config }
    }

    /// Searches the catalog and returns products ranked by descending
    /// rating, ties broken by descending price.
    pub async fn search(
        &self,
        keywords: &str,
        category: &str,
    ) -> Result<Vec<Product>, CatalogError> {
        let mut params = self.base_params("ItemSearch");
        params.insert("SearchIndex".to_string(), category.to_string());
        params.insert("Keywords".to_string(), keywords.to_string());

        let body = self.get_signed(params).await?;
        let mut products = responses::parse_items(&body)?;
        rank_products(&mut products);
        Ok(products)
    }

    /// Looks up a single product by its catalog identifier.
    pub async fn lookup(&self, item_id: &str) -> Result<Option<Product>, CatalogError> {
        let mut params = self.base_params("ItemLookup");
        params.insert("ItemId".to_string(), item_id.to_string());

        let body = self.get_signed(params).await?;
        let products = responses::parse_items(&body)?;
        Ok(products.into_iter().next())
    }

    /// The default recommended-products listing.
    pub async fn recommended(&self) -> Result<Vec<Product>, CatalogError> {
        self.search(DEFAULT_KEYWORDS, DEFAULT_CATEGORY).await
    }

    /// Most recently listed products.
    pub async fn latest(&self) -> Result<Vec<Product>, CatalogError> {
        self.search("new arrivals", DEFAULT_CATEGORY).await
    }

    /// Highest-rated products.
    pub async fn top_rated(&self) -> Result<Vec<Product>, CatalogError> {
        self.search("top rated", DEFAULT_CATEGORY).await
    }

    /// Parameters common to every catalog operation, including the UTC
    /// timestamp the signature covers.
    fn base_params(&self, operation: &str) -> BTreeMap<String, String> {
        let mut params = BTreeMap::new();
        params.insert("Service".to_string(), "AWSECommerceService".to_string());
        params.insert("Operation".to_string(), operation.to_string());
        params.insert("AWSAccessKeyId".to_string(), self.config.access_key.clone());
        params.insert("AssociateTag".to_string(), self.config.associate_tag.clone());
        params.insert(
            "ResponseGroup".to_string(),
            "Images,ItemAttributes,Offers".to_string(),
        );
        params.insert(
            "Timestamp".to_string(),
            Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string(),
        );
        params
    }

    /// Signs the parameter set and issues a single GET. One attempt only;
    /// retry policy belongs to the caller.
    async fn get_signed(&self, params: BTreeMap<String, String>) -> Result<String, CatalogError> {
        let signed = auth::sign_request(
            &self.config.secret_key,
            &params,
            "GET",
            &self.config.host,
            &self.config.path,
        );
        let url = format!("{}?{}", self.config.endpoint(), signed.into_query_string());

        let response = self
            .transport
            .get(&url)
            .await
            .map_err(|e| CatalogError::Unavailable(e.to_string()))?;

        if !response.is_success() {
            return Err(CatalogError::Unavailable(format!(
                "catalog returned HTTP {}",
                response.status
            )));
        }
        Ok(response.body)
    }
}
