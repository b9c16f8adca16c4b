//! Thin REST wrappers around the accounting connector and the economic
//! indicator service. Both speak JSON matching our signal structs.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use super::traits::{FinancialSource, MarketSource};
use crate::data::signals::{FinancialSignal, MarketSignal};
use crate::error::{SourceError, SourceResult};

fn parse_base(base_url: &str) -> SourceResult<Url> {
    let mut base = Url::parse(base_url)?;
    if base.cannot_be_a_base() {
        return Err(SourceError::Url(url::ParseError::RelativeUrlWithCannotBeABaseBase));
    }
    // Treat the base as a directory so appended segments land under it
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    Ok(base)
}

fn endpoint(base: &Url, segments: &[&str]) -> SourceResult<Url> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| SourceError::Url(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

/// GET a JSON document; 404 maps to `None`
async fn get_optional_json<T: DeserializeOwned>(client: &Client, url: Url) -> SourceResult<Option<T>> {
    debug!("🌐 [HTTP] GET {}", url);
    let resp = client.get(url).send().await?;
    let status = resp.status();

    if status == StatusCode::NOT_FOUND {
        return Ok(None);
    }
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(SourceError::Http {
            status: status.as_u16(),
            body,
        });
    }

    let text = resp.text().await?;
    Ok(Some(serde_json::from_str(&text)?))
}

#[derive(Clone)]
pub struct HttpFinancialSource {
    client: Client,
    base: Url,
}

impl HttpFinancialSource {
    pub fn new(base_url: &str) -> SourceResult<Self> {
        Ok(Self {
            client: Client::new(),
            base: parse_base(base_url)?,
        })
    }

    pub fn financials_url(&self, prospect_id: &str) -> SourceResult<Url> {
        endpoint(&self.base, &["prospects", prospect_id, "financials"])
    }
}

#[async_trait]
impl FinancialSource for HttpFinancialSource {
    fn name(&self) -> &'static str {
        "http-financials"
    }

    async fn fetch_financials(&self, prospect_id: &str) -> SourceResult<Option<FinancialSignal>> {
        let url = self.financials_url(prospect_id)?;
        get_optional_json(&self.client, url).await
    }
}

#[derive(Clone)]
pub struct HttpMarketSource {
    client: Client,
    base: Url,
}

impl HttpMarketSource {
    pub fn new(base_url: &str) -> SourceResult<Self> {
        Ok(Self {
            client: Client::new(),
            base: parse_base(base_url)?,
        })
    }

    pub fn indicators_url(&self, industry: &str) -> SourceResult<Url> {
        let industry = industry.trim().to_lowercase();
        endpoint(&self.base, &["industries", industry.as_str(), "indicators"])
    }
}

#[async_trait]
impl MarketSource for HttpMarketSource {
    fn name(&self) -> &'static str {
        "http-market"
    }

    async fn fetch_market(&self, industry: &str) -> SourceResult<Option<MarketSignal>> {
        let url = self.indicators_url(industry)?;
        get_optional_json(&self.client, url).await
    }
}
