//! M2O ledger HTTP client implementation.

use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;

use crate::error::ClientError;
use crate::types::{
    ApiErrorResponse, BalanceView, ConversionReceipt, ConvertRequest, HistoricalEntry,
    InvokeRequest, InvokeResponse, RateUpdate,
};

/// M2O ledger API client.
#[derive(Debug, Clone)]
pub struct M2oClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    service_name: String,
}

impl M2oClient {
    /// Create a new client.
    ///
    /// # Arguments
    ///
    /// * `base_url` - Base URL of the ledger service (e.g., `"http://m2o-ledger:8080"`)
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Configuration` if the HTTP client cannot be built.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        Self::with_options(base_url, ClientOptions::default())
    }

    /// Create a new client with custom options.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Configuration` if the HTTP client cannot be built.
    pub fn with_options(
        base_url: impl Into<String>,
        options: ClientOptions,
    ) -> Result<Self, ClientError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(options.timeout_seconds))
            .build()
            .map_err(|e| ClientError::Configuration(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: options.api_key,
            service_name: options.service_name,
        })
    }

    /// Invoke a chaincode function by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server returns an error.
    pub async fn invoke(
        &self,
        function: &str,
        args: &[&str],
    ) -> Result<InvokeResponse, ClientError> {
        self.invoke_as(function, args).await
    }

    /// Set a partner's exchange rate.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::InvalidInput` if the rate is rejected, or another
    /// error if the request fails.
    pub async fn update_exchange_rate(
        &self,
        partner_name: &str,
        rate: f64,
    ) -> Result<RateUpdate, ClientError> {
        let rate = rate.to_string();
        let response: InvokeResponse<RateUpdate> = self
            .invoke_as("updateExchangeRate", &[partner_name, rate.as_str()])
            .await?;
        Ok(response.payload)
    }

    /// Convert a user's partner points into tokens.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::UnknownPartner` if the partner has no rate, or
    /// another error if the request fails.
    pub async fn convert(&self, request: &ConvertRequest) -> Result<ConversionReceipt, ClientError> {
        let points = request.points.to_string();
        let response: InvokeResponse<ConversionReceipt> = self
            .invoke_as(
                "convertToM2OToken",
                &[
                    request.user_id.as_str(),
                    request.partner_name.as_str(),
                    request.partner_user_id.as_str(),
                    points.as_str(),
                    request.date.as_str(),
                ],
            )
            .await?;
        Ok(response.payload)
    }

    /// Get a user's cumulative token total.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::NotFound` if the user has never converted, or
    /// another error if the request fails.
    pub async fn query_user_total(&self, user_id: &str) -> Result<BalanceView, ClientError> {
        let response: InvokeResponse<BalanceView> =
            self.invoke_as("queryUserTotal", &[user_id]).await?;
        Ok(response.payload)
    }

    /// Get every version of a user's record, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server returns an error.
    pub async fn query_user_history(
        &self,
        user_id: &str,
    ) -> Result<Vec<HistoricalEntry>, ClientError> {
        let response: InvokeResponse<Vec<HistoricalEntry>> = self
            .invoke_as("queryUserTransactionsForAll", &[user_id])
            .await?;
        Ok(response.payload)
    }

    /// Get the versions of a user's record produced by one partner.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server returns an error.
    pub async fn query_user_history_for_partner(
        &self,
        user_id: &str,
        partner_name: &str,
    ) -> Result<Vec<HistoricalEntry>, ClientError> {
        let response: InvokeResponse<Vec<HistoricalEntry>> = self
            .invoke_as("queryUserTransactionsForPartner", &[user_id, partner_name])
            .await?;
        Ok(response.payload)
    }

    async fn invoke_as<T: DeserializeOwned>(
        &self,
        function: &str,
        args: &[&str],
    ) -> Result<InvokeResponse<T>, ClientError> {
        let url = format!("{}/v1/invoke", self.base_url);
        let request = InvokeRequest {
            function: function.to_string(),
            args: args.iter().map(ToString::to_string).collect(),
        };

        tracing::debug!(function, args = args.len(), "Invoking M2O chaincode");

        let mut builder = self
            .client
            .post(&url)
            .header("x-service-name", &self.service_name)
            .json(&request);
        if let Some(api_key) = &self.api_key {
            builder = builder.header("x-api-key", api_key);
        }

        let response = builder.send().await?;
        self.handle_response(response).await
    }

    /// Handle API response and convert errors.
    async fn handle_response<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, ClientError> {
        let status = response.status();

        if status.is_success() {
            let bytes = response.bytes().await?;
            return Ok(serde_json::from_slice(&bytes)?);
        }

        // Try to parse error response
        let error_body: Result<ApiErrorResponse, _> = response.json().await;

        match error_body {
            Ok(api_error) => Err(ClientError::from_api(
                &api_error.error.code,
                api_error.error.message,
                status.as_u16(),
            )),
            Err(_) => Err(ClientError::Api {
                code: "unknown".to_string(),
                message: format!("HTTP {status}"),
                status: status.as_u16(),
            }),
        }
    }
}

/// Client options for customization.
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// Request timeout in seconds (default: 30).
    pub timeout_seconds: u64,
    /// API key sent as `x-api-key`, if the service requires one.
    pub api_key: Option<String>,
    /// Service name to include in requests.
    pub service_name: String,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            timeout_seconds: 30,
            api_key: None,
            service_name: "unknown".to_string(),
        }
    }
}

impl ClientOptions {
    /// Create options with an API key.
    #[must_use]
    pub fn with_api_key(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Some(api_key.into()),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_creation() {
        let client = M2oClient::new("http://localhost:8080").unwrap();
        assert_eq!(client.base_url, "http://localhost:8080");
        assert!(client.api_key.is_none());
    }

    #[test]
    fn client_trims_trailing_slash() {
        let client = M2oClient::new("http://localhost:8080/").unwrap();
        assert_eq!(client.base_url, "http://localhost:8080");
    }

    #[test]
    fn client_options() {
        let options = ClientOptions::with_api_key("secret");
        let client = M2oClient::with_options("http://localhost:8080", options).unwrap();
        assert_eq!(client.api_key.as_deref(), Some("secret"));
    }
}
