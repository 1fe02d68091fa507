//
//  ebay-browse
//  api/context.rs
//

//! End-user context header assembly.
//!
//! Every Browse API request carries an `X-EBAY-C-ENDUSERCTX` header with
//! affiliate tracking metadata: the campaign id, an optional reference id,
//! and an optional buyer location. The header value is a comma-joined list
//! of `key=value` pairs in a fixed order, with absent fields omitted
//! entirely rather than rendered empty.
//!
//! The location sub-value is itself a `key=value` list (`country`, `zip`)
//! which is percent-encoded as one opaque token before being embedded, so
//! its `=` and `,` do not collide with the outer pair syntax.

/// Affiliate context rendered into the `X-EBAY-C-ENDUSERCTX` header.
///
/// Borrowed from the client's configuration and rebuilt fresh on every
/// request; nothing here is cached.
#[derive(Debug, Clone, Copy)]
pub struct EnduserContext<'a> {
    /// Affiliate campaign id, always present.
    pub campaign_id: &'a str,
    /// Optional affiliate reference id.
    pub reference_id: Option<&'a str>,
    /// Optional buyer country code (e.g. `US`).
    pub country: Option<&'a str>,
    /// Optional buyer postal code.
    pub zip: Option<&'a str>,
}

impl EnduserContext<'_> {
    /// Renders the header value.
    ///
    /// Pair order is fixed: `affiliateCampaignId`, `affiliateReferenceId`,
    /// `contextualLocation`. Absent fields produce no pair.
    pub fn render(&self) -> String {
        let mut pairs = vec![format!("affiliateCampaignId={}", self.campaign_id)];
        if let Some(reference_id) = self.reference_id {
            pairs.push(format!("affiliateReferenceId={}", reference_id));
        }
        if let Some(location) = self.contextual_location() {
            pairs.push(format!("contextualLocation={}", location));
        }
        pairs.join(",")
    }

    /// Builds the percent-encoded location token, or `None` when both
    /// country and zip are absent.
    fn contextual_location(&self) -> Option<String> {
        let mut pairs = Vec::new();
        if let Some(country) = self.country {
            pairs.push(format!("country={}", country));
        }
        if let Some(zip) = self.zip {
            pairs.push(format!("zip={}", zip));
        }
        if pairs.is_empty() {
            None
        } else {
            Some(urlencoding::encode(&pairs.join(",")).into_owned())
        }
    }
}
