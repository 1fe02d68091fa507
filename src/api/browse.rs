//
//  ebay-browse
//  api/browse.rs
//

//! # Browse API Client
//!
//! This module provides the HTTP client for the eBay Buy Browse API.
//!
//! The client is a thin binding: each operation builds a URL against the
//! sandbox or production endpoint, attaches the bearer token and affiliate
//! context headers, issues exactly one request, and hands the raw
//! [`reqwest::Response`] back to the caller. No response parsing, no
//! status-code branching, and no retry happen here.
//!
//! ## Features
//!
//! - Sandbox/production endpoint selection, re-evaluated on every call
//! - Lazy, memoized access token minting via [`AccessTokenProvider`]
//! - Affiliate context header assembly with percent-encoded buyer location
//! - Pass-through query parameters and JSON bodies

use reqwest::{Client, Method, RequestBuilder, Response};
use serde::{Deserialize, Serialize};
use tokio::sync::OnceCell;

use crate::api::context::EnduserContext;
use crate::auth::AccessTokenProvider;
use crate::env::{Environment, Production};
use crate::error::{Error, Result};

/// Base endpoint for the production Browse API.
pub const PRODUCTION_ENDPOINT: &str = "https://api.ebay.com/buy/browse/v1";

/// Base endpoint for the sandbox Browse API.
pub const SANDBOX_ENDPOINT: &str = "https://api.sandbox.ebay.com/buy/browse/v1";

/// Header carrying the affiliate end-user context.
const ENDUSER_CONTEXT_HEADER: &str = "X-EBAY-C-ENDUSERCTX";

/// Header selecting the marketplace for compatibility checks.
const MARKETPLACE_HEADER: &str = "X-EBAY-C-MARKETPLACE-ID";

/// A name/value pair for vehicle compatibility checks.
///
/// Passed through to the API as given; the client does not validate which
/// property names a category accepts.
///
/// # Example
///
/// ```rust
/// use ebay_browse::CompatibilityProperty;
///
/// let year = CompatibilityProperty {
///     name: "Year".to_string(),
///     value: "2020".to_string(),
/// };
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompatibilityProperty {
    /// Property name (e.g. `Year`, `Make`, `Model`).
    pub name: String,
    /// Property value (e.g. `2020`, `Subaru`).
    pub value: String,
}

#[derive(Serialize)]
struct ImageBody<'a> {
    image: &'a str,
}

#[derive(Serialize)]
struct CompatibilityBody<'a> {
    #[serde(rename = "compatibilityProperties")]
    compatibility_properties: &'a [CompatibilityProperty],
}

/// The HTTP client for the eBay Buy Browse API.
///
/// # Creating a Client
///
/// A client needs an affiliate campaign id (mandatory, validated at
/// construction) and either a pre-minted access token or a token provider.
/// Everything else is optional and configured with the builder-style
/// `with_*` methods:
///
/// ```rust,no_run
/// use ebay_browse::{BrowseClient, ClientCredentialsGrant, Sandbox};
///
/// # fn example() -> ebay_browse::Result<()> {
/// let client = BrowseClient::new("campaign-5338")?
///     .with_reference_id("summer-promo")
///     .with_country("US")
///     .with_zip("19406")
///     .with_environment(Sandbox)
///     .with_token_provider(ClientCredentialsGrant::new("app-id", "cert-id")?);
/// # Ok(())
/// # }
/// ```
///
/// # Responses
///
/// Every operation returns the transport's raw [`reqwest::Response`]
/// unmodified. The caller owns all JSON parsing and HTTP status handling,
/// including 4xx/5xx interpretation.
///
/// # Concurrency
///
/// The only shared mutable state is the memoized access token. The first
/// access mints through the provider exactly once (concurrent first
/// accesses coalesce into a single mint); a failed mint is not cached and
/// is retried on the next access.
pub struct BrowseClient {
    http: Client,
    campaign_id: String,
    reference_id: Option<String>,
    country: Option<String>,
    zip: Option<String>,
    token: OnceCell<String>,
    provider: Option<Box<dyn AccessTokenProvider>>,
    environment: Box<dyn Environment>,
    /// Test seam; production code always resolves the base by mode.
    base_url_override: Option<String>,
}

impl BrowseClient {
    /// Creates a client for the given affiliate campaign, targeting the
    /// production environment.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] if `campaign_id` is empty or
    /// blank, or [`Error::Transport`] if the HTTP client cannot be built.
    ///
    /// # Example
    ///
    /// ```rust
    /// use ebay_browse::BrowseClient;
    ///
    /// assert!(BrowseClient::new("campaign-5338").is_ok());
    /// assert!(BrowseClient::new("  ").is_err());
    /// ```
    pub fn new(campaign_id: impl Into<String>) -> Result<Self> {
        let campaign_id = campaign_id.into();
        if campaign_id.trim().is_empty() {
            return Err(Error::Configuration(
                "affiliate campaign id must not be empty".to_string(),
            ));
        }

        Ok(Self {
            http: Client::builder()
                .user_agent(format!("ebay-browse/{}", crate::VERSION))
                .build()?,
            campaign_id,
            reference_id: None,
            country: None,
            zip: None,
            token: OnceCell::new(),
            provider: None,
            environment: Box::new(Production),
            base_url_override: None,
        })
    }

    /// Sets the affiliate reference id included in the end-user context.
    pub fn with_reference_id(mut self, reference_id: impl Into<String>) -> Self {
        self.reference_id = Some(reference_id.into());
        self
    }

    /// Sets the buyer country code included in the contextual location.
    pub fn with_country(mut self, country: impl Into<String>) -> Self {
        self.country = Some(country.into());
        self
    }

    /// Sets the buyer postal code included in the contextual location.
    pub fn with_zip(mut self, zip: impl Into<String>) -> Self {
        self.zip = Some(zip.into());
        self
    }

    /// Supplies a pre-minted access token.
    ///
    /// A client with a supplied token never calls its token provider.
    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.token = OnceCell::new_with(Some(token.into()));
        self
    }

    /// Installs the collaborator that mints an access token on first use.
    pub fn with_token_provider(mut self, provider: impl AccessTokenProvider + 'static) -> Self {
        self.provider = Some(Box::new(provider));
        self
    }

    /// Sets the environment that selects the base endpoint.
    ///
    /// The environment is consulted on every request, not captured once:
    /// an injected source whose answer changes between calls changes the
    /// endpoint accordingly.
    pub fn with_environment(mut self, environment: impl Environment + 'static) -> Self {
        self.environment = Box::new(environment);
        self
    }

    #[cfg(test)]
    fn with_base_url(mut self, base: impl Into<String>) -> Self {
        self.base_url_override = Some(base.into());
        self
    }

    /// Returns the access token, minting and memoizing it on first use.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Credential`] if no token was supplied and no
    /// provider is installed, or whatever error the provider produced.
    /// Mint failures are not memoized; the next call mints again.
    pub async fn access_token(&self) -> Result<&str> {
        let token = self
            .token
            .get_or_try_init(|| async {
                let provider = self.provider.as_deref().ok_or_else(|| {
                    Error::Credential(
                        "no access token supplied and no token provider installed".to_string(),
                    )
                })?;
                provider.mint_access_token().await
            })
            .await?;
        Ok(token)
    }

    /// Returns the base endpoint for the current environment.
    pub fn base_url(&self) -> &str {
        if let Some(base) = &self.base_url_override {
            return base;
        }
        if self.environment.is_sandbox() {
            SANDBOX_ENDPOINT
        } else {
            PRODUCTION_ENDPOINT
        }
    }

    /// Joins the base endpoint and an operation path with `/`.
    ///
    /// Path segments are not escaped; callers supply URL-safe identifiers
    /// (Browse API item ids already are).
    fn build_url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url(), path)
    }

    fn enduser_context(&self) -> String {
        EnduserContext {
            campaign_id: &self.campaign_id,
            reference_id: self.reference_id.as_deref(),
            country: self.country.as_deref(),
            zip: self.zip.as_deref(),
        }
        .render()
    }

    /// Starts a request with the bearer and end-user context headers applied.
    async fn prepare(&self, method: Method, path: &str) -> Result<RequestBuilder> {
        let token = self.access_token().await?;
        let url = self.build_url(path);
        tracing::debug!("Browse request: {} {}", method, url);

        Ok(self
            .http
            .request(method, url)
            .bearer_auth(token)
            .header(ENDUSER_CONTEXT_HEADER, self.enduser_context()))
    }

    async fn search_request(&self, params: &[(&str, &str)]) -> Result<RequestBuilder> {
        Ok(self
            .prepare(Method::GET, "item_summary/search")
            .await?
            .query(params))
    }

    /// Searches for item summaries.
    ///
    /// Caller-supplied `params` (e.g. `q`, `category_ids`, `filter`,
    /// `limit`) are passed through verbatim as the query string.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use ebay_browse::BrowseClient;
    ///
    /// # async fn example() -> ebay_browse::Result<()> {
    /// let client = BrowseClient::new("campaign-5338")?.with_access_token("token");
    /// let response = client.search(&[("q", "drone"), ("limit", "3")]).await?;
    /// let body: serde_json::Value = response.json().await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn search(&self, params: &[(&str, &str)]) -> Result<Response> {
        Ok(self.search_request(params).await?.send().await?)
    }

    async fn search_by_image_request(
        &self,
        image: &str,
        params: &[(&str, &str)],
    ) -> Result<RequestBuilder> {
        Ok(self
            .prepare(Method::POST, "item_summary/search_by_image")
            .await?
            .query(params)
            .json(&ImageBody { image }))
    }

    /// Searches for item summaries matching a Base64-encoded image.
    ///
    /// `params` are passed through as the query string; the image goes in
    /// the JSON body as `{"image": "<base64>"}` and is not validated here.
    pub async fn search_by_image(
        &self,
        image: &str,
        params: &[(&str, &str)],
    ) -> Result<Response> {
        Ok(self
            .search_by_image_request(image, params)
            .await?
            .send()
            .await?)
    }

    async fn get_item_request(
        &self,
        item_id: &str,
        params: &[(&str, &str)],
    ) -> Result<RequestBuilder> {
        Ok(self
            .prepare(Method::GET, &format!("item/{}", item_id))
            .await?
            .query(params)
            .query(&[("item_id", item_id)]))
    }

    /// Retrieves the details of a specific item.
    ///
    /// # Parameters
    ///
    /// * `item_id` - RESTful item id (e.g. `v1|110012345|0`)
    /// * `params` - extra query parameters such as `fieldgroups`
    pub async fn get_item(&self, item_id: &str, params: &[(&str, &str)]) -> Result<Response> {
        Ok(self.get_item_request(item_id, params).await?.send().await?)
    }

    async fn get_item_by_legacy_id_request(
        &self,
        legacy_item_id: &str,
        params: &[(&str, &str)],
    ) -> Result<RequestBuilder> {
        Ok(self
            .prepare(Method::GET, "item/get_item_by_legacy_id")
            .await?
            .query(params)
            .query(&[("legacy_item_id", legacy_item_id)]))
    }

    /// Retrieves an item by its legacy (pre-RESTful) id.
    pub async fn get_item_by_legacy_id(
        &self,
        legacy_item_id: &str,
        params: &[(&str, &str)],
    ) -> Result<Response> {
        Ok(self
            .get_item_by_legacy_id_request(legacy_item_id, params)
            .await?
            .send()
            .await?)
    }

    async fn get_items_by_item_group_request(&self, item_group_id: &str) -> Result<RequestBuilder> {
        Ok(self
            .prepare(Method::GET, "item/get_items_by_item_group")
            .await?
            .query(&[("item_group_id", item_group_id)]))
    }

    /// Retrieves all items in an item group (e.g. size/color variations).
    pub async fn get_items_by_item_group(&self, item_group_id: &str) -> Result<Response> {
        Ok(self
            .get_items_by_item_group_request(item_group_id)
            .await?
            .send()
            .await?)
    }

    async fn check_compatibility_request(
        &self,
        item_id: &str,
        marketplace_id: &str,
        compatibility_properties: &[CompatibilityProperty],
    ) -> Result<RequestBuilder> {
        Ok(self
            .prepare(Method::POST, &format!("item/{}/check_compatibility", item_id))
            .await?
            .header(MARKETPLACE_HEADER, marketplace_id)
            .json(&CompatibilityBody {
                compatibility_properties,
            }))
    }

    /// Checks whether an item is compatible with a product (e.g. a vehicle).
    ///
    /// # Parameters
    ///
    /// * `item_id` - RESTful item id of the part to check
    /// * `marketplace_id` - marketplace the item is listed on (e.g. `EBAY_US`),
    ///   sent as the `X-EBAY-C-MARKETPLACE-ID` header
    /// * `compatibility_properties` - attributes identifying the product,
    ///   sent as the JSON body `{"compatibilityProperties": [...]}`
    pub async fn check_compatibility(
        &self,
        item_id: &str,
        marketplace_id: &str,
        compatibility_properties: &[CompatibilityProperty],
    ) -> Result<Response> {
        Ok(self
            .check_compatibility_request(item_id, marketplace_id, compatibility_properties)
            .await?
            .send()
            .await?)
    }

    /// Placeholder for the shopping-cart add operation.
    ///
    /// # Errors
    ///
    /// Always returns [`Error::NotImplemented`]; no network call is made.
    pub async fn add_item(&self) -> Result<Response> {
        Err(Error::NotImplemented("add_item"))
    }

    /// Placeholder for the shopping-cart retrieval operation.
    ///
    /// # Errors
    ///
    /// Always returns [`Error::NotImplemented`]; no network call is made.
    pub async fn get_shopping_cart(&self) -> Result<Response> {
        Err(Error::NotImplemented("get_shopping_cart"))
    }

    /// Placeholder for the shopping-cart remove operation.
    ///
    /// # Errors
    ///
    /// Always returns [`Error::NotImplemented`]; no network call is made.
    pub async fn remove_item(&self) -> Result<Response> {
        Err(Error::NotImplemented("remove_item"))
    }

    /// Placeholder for the shopping-cart quantity-update operation.
    ///
    /// # Errors
    ///
    /// Always returns [`Error::NotImplemented`]; no network call is made.
    pub async fn update_quantity(&self) -> Result<Response> {
        Err(Error::NotImplemented("update_quantity"))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::Arc;

    use async_trait::async_trait;

    use super::*;

    /// Environment fake whose answer can change between calls.
    struct SwitchableEnvironment(Arc<AtomicBool>);

    impl Environment for SwitchableEnvironment {
        fn is_sandbox(&self) -> bool {
            self.0.load(Ordering::SeqCst)
        }
    }

    /// Provider that counts mints and can be told to fail.
    struct CountingProvider {
        mints: Arc<AtomicUsize>,
        fail_first: bool,
    }

    #[async_trait]
    impl AccessTokenProvider for CountingProvider {
        async fn mint_access_token(&self) -> Result<String> {
            let attempt = self.mints.fetch_add(1, Ordering::SeqCst);
            if self.fail_first && attempt == 0 {
                return Err(Error::Credential("mint rejected".to_string()));
            }
            Ok(format!("minted-{}", attempt))
        }
    }

    fn client() -> BrowseClient {
        BrowseClient::new("cmp-5338")
            .unwrap()
            .with_access_token("token123")
    }

    fn query_pairs(request: &reqwest::Request) -> Vec<(String, String)> {
        request
            .url()
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect()
    }

    #[test]
    fn test_empty_campaign_id_is_rejected() {
        assert!(matches!(
            BrowseClient::new(""),
            Err(Error::Configuration(_))
        ));
        assert!(matches!(
            BrowseClient::new("   "),
            Err(Error::Configuration(_))
        ));
    }

    #[test]
    fn test_base_url_follows_environment_per_call() {
        let sandbox = Arc::new(AtomicBool::new(true));
        let client = BrowseClient::new("cmp-5338")
            .unwrap()
            .with_environment(SwitchableEnvironment(sandbox.clone()));

        assert_eq!(client.base_url(), SANDBOX_ENDPOINT);
        sandbox.store(false, Ordering::SeqCst);
        assert_eq!(client.base_url(), PRODUCTION_ENDPOINT);
    }

    #[test]
    fn test_build_url_joins_segments_without_escaping() {
        let client = client();
        assert_eq!(
            client.build_url("item/v1|110012345|0"),
            "https://api.ebay.com/buy/browse/v1/item/v1|110012345|0"
        );
    }

    #[tokio::test]
    async fn test_supplied_token_skips_provider() {
        let mints = Arc::new(AtomicUsize::new(0));
        let client = BrowseClient::new("cmp-5338")
            .unwrap()
            .with_access_token("token123")
            .with_token_provider(CountingProvider {
                mints: mints.clone(),
                fail_first: false,
            });

        assert_eq!(client.access_token().await.unwrap(), "token123");
        assert_eq!(client.access_token().await.unwrap(), "token123");
        assert_eq!(mints.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_token_is_minted_at_most_once() {
        let mints = Arc::new(AtomicUsize::new(0));
        let client = BrowseClient::new("cmp-5338")
            .unwrap()
            .with_token_provider(CountingProvider {
                mints: mints.clone(),
                fail_first: false,
            });

        assert_eq!(client.access_token().await.unwrap(), "minted-0");
        assert_eq!(client.access_token().await.unwrap(), "minted-0");
        assert_eq!(mints.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_failed_mint_is_retried_on_next_access() {
        let mints = Arc::new(AtomicUsize::new(0));
        let client = BrowseClient::new("cmp-5338")
            .unwrap()
            .with_token_provider(CountingProvider {
                mints: mints.clone(),
                fail_first: true,
            });

        assert!(matches!(
            client.access_token().await,
            Err(Error::Credential(_))
        ));
        assert_eq!(client.access_token().await.unwrap(), "minted-1");
        assert_eq!(mints.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_missing_token_and_provider_is_a_credential_error() {
        let client = BrowseClient::new("cmp-5338").unwrap();
        assert!(matches!(
            client.access_token().await,
            Err(Error::Credential(_))
        ));
    }

    #[tokio::test]
    async fn test_get_item_injects_item_id_parameter() {
        let request = client()
            .get_item_request("v1|110012345|0", &[])
            .await
            .unwrap()
            .build()
            .unwrap();

        assert_eq!(
            query_pairs(&request),
            vec![("item_id".to_string(), "v1|110012345|0".to_string())]
        );
        assert!(request.url().path().ends_with("/item/v1|110012345|0"));
    }

    #[tokio::test]
    async fn test_get_item_by_legacy_id_injects_parameter() {
        let request = client()
            .get_item_by_legacy_id_request("110012345", &[])
            .await
            .unwrap()
            .build()
            .unwrap();

        assert_eq!(
            query_pairs(&request),
            vec![("legacy_item_id".to_string(), "110012345".to_string())]
        );
        assert!(request
            .url()
            .path()
            .ends_with("/item/get_item_by_legacy_id"));
    }

    #[tokio::test]
    async fn test_get_items_by_item_group_query_is_exact() {
        let request = client()
            .get_items_by_item_group_request("8888")
            .await
            .unwrap()
            .build()
            .unwrap();

        assert_eq!(
            query_pairs(&request),
            vec![("item_group_id".to_string(), "8888".to_string())]
        );
    }

    #[tokio::test]
    async fn test_search_passes_params_verbatim_and_sets_headers() {
        let request = client()
            .search_request(&[("q", "drone"), ("limit", "3")])
            .await
            .unwrap()
            .build()
            .unwrap();

        assert_eq!(
            query_pairs(&request),
            vec![
                ("q".to_string(), "drone".to_string()),
                ("limit".to_string(), "3".to_string()),
            ]
        );
        assert_eq!(
            request.headers()["authorization"].to_str().unwrap(),
            "Bearer token123"
        );
        assert_eq!(
            request.headers()["X-EBAY-C-ENDUSERCTX"].to_str().unwrap(),
            "affiliateCampaignId=cmp-5338"
        );
    }

    #[tokio::test]
    async fn test_search_by_image_sends_json_body() {
        let request = client()
            .search_by_image_request("aGVsbG8=", &[("limit", "5")])
            .await
            .unwrap()
            .build()
            .unwrap();

        assert_eq!(request.method(), Method::POST);
        assert_eq!(
            request.headers()["content-type"].to_str().unwrap(),
            "application/json"
        );
        let body = request.body().and_then(|b| b.as_bytes()).unwrap();
        assert_eq!(body, br#"{"image":"aGVsbG8="}"#);
    }

    #[tokio::test]
    async fn test_check_compatibility_request_shape() {
        let properties = vec![
            CompatibilityProperty {
                name: "Year".to_string(),
                value: "2020".to_string(),
            },
            CompatibilityProperty {
                name: "Make".to_string(),
                value: "Subaru".to_string(),
            },
        ];
        let request = client()
            .check_compatibility_request("v1|110012345|0", "EBAY_US", &properties)
            .await
            .unwrap()
            .build()
            .unwrap();

        assert_eq!(request.method(), Method::POST);
        assert!(request
            .url()
            .path()
            .ends_with("/item/v1|110012345|0/check_compatibility"));
        assert_eq!(
            request.headers()["X-EBAY-C-MARKETPLACE-ID"]
                .to_str()
                .unwrap(),
            "EBAY_US"
        );
        let body = request.body().and_then(|b| b.as_bytes()).unwrap();
        let expected = r#"{"compatibilityProperties":[{"name":"Year","value":"2020"},{"name":"Make","value":"Subaru"}]}"#;
        assert_eq!(body, expected.as_bytes());
    }

    #[tokio::test]
    async fn test_cart_operations_are_not_implemented() {
        let client = BrowseClient::new("cmp-5338").unwrap();

        assert!(matches!(
            client.add_item().await,
            Err(Error::NotImplemented("add_item"))
        ));
        assert!(matches!(
            client.get_shopping_cart().await,
            Err(Error::NotImplemented("get_shopping_cart"))
        ));
        assert!(matches!(
            client.remove_item().await,
            Err(Error::NotImplemented("remove_item"))
        ));
        assert!(matches!(
            client.update_quantity().await,
            Err(Error::NotImplemented("update_quantity"))
        ));
    }

    #[tokio::test]
    async fn test_search_dispatches_one_request() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/item_summary/search")
            .match_query(mockito::Matcher::UrlEncoded("q".into(), "drone".into()))
            .match_header("authorization", "Bearer token123")
            .match_header(
                "x-ebay-c-enduserctx",
                "affiliateCampaignId=cmp-5338,contextualLocation=country%3DUS%2Czip%3D19406",
            )
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"total":0,"itemSummaries":[]}"#)
            .expect(1)
            .create_async()
            .await;

        let client = BrowseClient::new("cmp-5338")
            .unwrap()
            .with_country("US")
            .with_zip("19406")
            .with_access_token("token123")
            .with_base_url(server.url());

        let response = client.search(&[("q", "drone")]).await.unwrap();
        assert!(response.status().is_success());
        mock.assert_async().await;
    }
}
