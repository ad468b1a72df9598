//! HTTP access to the PX-Web and Digitraffic APIs.
//!
//! Every call returns an explicit [`Result`] so a failed fetch can be told
//! apart from a table that simply has no rows.

use crate::config::{ApiConfig, TableRef};
use crate::error::{Result, StatError};
use crate::json_stat::DimensionedResponse;
use crate::keyed::KeyedResponse;
use crate::metadata::TableMetadata;
use crate::query::QueryDocument;
use crate::sensor::StationsPayload;
use crate::stations::SensorFeed;
use log::{info, warn};
use reqwest::header::ACCEPT;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;

const USER_AGENT: &str = concat!("tid-stat/", env!("CARGO_PKG_VERSION"));

/// A client honouring the configured timeout.
pub fn build_client(config: &ApiConfig) -> Result<Client> {
    let mut builder = Client::builder().user_agent(USER_AGENT);
    if let Some(timeout) = config.timeout {
        builder = builder.timeout(timeout);
    }
    builder
        .build()
        .map_err(|e| StatError::Transport(e.to_string()))
}

/// POST a query document and decode the JSON answer.
pub async fn post_query<T: DeserializeOwned>(
    client: &Client,
    url: &str,
    query: &QueryDocument,
) -> Result<T> {
    info!("POST {} ({} dimensions)", url, query.query.len());
    let response = client
        .post(url)
        .header(ACCEPT, "application/json")
        .json(query)
        .send()
        .await
        .map_err(|e| {
            warn!("Request failed for {}: {}", url, e);
            StatError::from(e)
        })?;
    read_json(url, response).await
}

pub async fn get_json<T: DeserializeOwned>(client: &Client, url: &str) -> Result<T> {
    info!("GET {}", url);
    let response = client
        .get(url)
        .header(ACCEPT, "application/json")
        .send()
        .await
        .map_err(|e| {
            warn!("Request failed for {}: {}", url, e);
            StatError::from(e)
        })?;
    read_json(url, response).await
}

async fn read_json<T: DeserializeOwned>(url: &str, response: Response) -> Result<T> {
    let status = response.status();
    if !status.is_success() {
        warn!("Bad response status for {}: {}", url, status);
        return Err(StatError::Status(status.as_u16()));
    }
    let body = response.text().await.map_err(|e| {
        warn!("Failed to read response body for {}: {}", url, e);
        StatError::Transport(e.to_string())
    })?;
    info!("Received {} bytes from {}", body.len(), url);
    serde_json::from_str(&body).map_err(|e| {
        warn!("Unexpected response shape from {}: {}", url, e);
        StatError::MalformedResponse(e.to_string())
    })
}

pub async fn fetch_dimensioned(
    client: &Client,
    config: &ApiConfig,
    table: &TableRef,
    query: &QueryDocument,
) -> Result<DimensionedResponse> {
    post_query(client, &config.table_url(table), query).await
}

pub async fn fetch_keyed(
    client: &Client,
    config: &ApiConfig,
    table: &TableRef,
    query: &QueryDocument,
) -> Result<KeyedResponse> {
    post_query(client, &config.table_url(table), query).await
}

pub async fn fetch_metadata(client: &Client, config: &ApiConfig, table: &TableRef) -> Result<TableMetadata> {
    get_json(client, &config.table_url(table)).await
}

pub async fn fetch_stations(client: &Client, config: &ApiConfig, feed: SensorFeed) -> Result<StationsPayload> {
    get_json(client, &config.digitraffic_url(feed.path())).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_build_client_with_timeout() {
        let config = ApiConfig {
            timeout: Some(Duration::from_secs(5)),
            ..ApiConfig::default()
        };
        assert!(build_client(&config).is_ok());
        assert!(build_client(&ApiConfig::default()).is_ok());
    }
}
