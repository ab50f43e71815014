use anyhow::Result;
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};

use crate::backend::Backend;
use crate::client::{auth::Credential, types::*};
use crate::config::BackendConfig;
use crate::lists::{CatalogItem, Ingredient, IngredientList, ListCollection};

pub struct HttpBackend {
    config: BackendConfig,
    client: Client,
}

impl HttpBackend {
    pub fn new(config: BackendConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()?;
        Ok(Self { config, client })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    fn list_url(&self, list: &str) -> String {
        format!(
            "{}/{}",
            self.url(&self.config.lists_path),
            urlencoding::encode(list)
        )
    }

    fn ingredients_url(&self, list: &str) -> String {
        format!("{}/ingredients", self.list_url(list))
    }

    /// Sends a mutation and maps the status: 2xx is success, 404 and 409 are a
    /// refusal, anything else is an error.
    async fn send_mutation(
        &self,
        operation: &str,
        credential: &Credential,
        request: RequestBuilder,
    ) -> Result<bool> {
        let auth_header = credential.auth_header()?;

        let response = request
            .header("Authorization", auth_header)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Network error during {}: {}", operation, e);
                anyhow::anyhow!(
                    "Failed to connect to lists backend at {}: {}",
                    self.config.base_url,
                    e
                )
            })?;

        let status = response.status();
        tracing::debug!("{} response status: {}", operation, status);

        if status.is_success() {
            return Ok(true);
        }

        let error_body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unable to read error response".to_string());

        match status {
            StatusCode::NOT_FOUND | StatusCode::CONFLICT => {
                tracing::warn!("Backend refused {} ({}): {}", operation, status, error_body);
                Ok(false)
            }
            StatusCode::UNAUTHORIZED => {
                anyhow::bail!("Access token expired or invalid. Please sign in again.")
            }
            StatusCode::FORBIDDEN => anyhow::bail!("Access denied to {}", operation),
            _ => anyhow::bail!("Failed to {} with status {}: {}", operation, status, error_body),
        }
    }

    async fn fetch_results<T>(
        &self,
        operation: &str,
        credential: &Credential,
        path: &str,
    ) -> Result<Vec<T>>
    where
        T: serde::de::DeserializeOwned,
    {
        let auth_header = credential.auth_header()?;
        let url = self.url(path);

        tracing::debug!("Making request to {}: {}", operation, url);

        let response = self
            .client
            .get(&url)
            .header("Authorization", auth_header)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Network error during {}: {}", operation, e);
                anyhow::anyhow!(
                    "Failed to connect to lists backend at {}: {}",
                    self.config.base_url,
                    e
                )
            })?;

        let status = response.status();
        tracing::debug!("{} response status: {}", operation, status);

        if !status.is_success() {
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read error response".to_string());
            tracing::error!("Failed to {} with status {}: {}", operation, status, error_body);

            match status.as_u16() {
                401 => anyhow::bail!("Access token expired or invalid. Please sign in again."),
                403 => anyhow::bail!("Access denied to {}. Check user permissions.", operation),
                404 => anyhow::bail!(
                    "Endpoint for {} not found. Check your base URL: {}",
                    operation,
                    self.config.base_url
                ),
                500..=599 => anyhow::bail!(
                    "Lists backend error during {} ({}): {}",
                    operation,
                    status,
                    error_body
                ),
                _ => anyhow::bail!(
                    "Failed to {} with status {}: {}",
                    operation,
                    status,
                    error_body
                ),
            }
        }

        let envelope: ResultEnvelope<T> = response.json().await.map_err(|e| {
            tracing::error!("Failed to parse {} response: {}", operation, e);
            anyhow::anyhow!("Invalid response format from lists backend: {}", e)
        })?;

        tracing::debug!("Successfully retrieved {} items for {}", envelope.result.len(), operation);
        Ok(envelope.result)
    }
}

#[async_trait]
impl Backend for HttpBackend {
    async fn create_user(&self, credential: &Credential) -> Result<bool> {
        let auth_header = credential.auth_header()?;
        let url = self.url(&self.config.create_user_path);

        tracing::info!("Registering user: {}", credential.username());

        let response = self
            .client
            .post(&url)
            .header("Authorization", auth_header)
            .send()
            .await?;

        if !response.status().is_success() {
            tracing::warn!("Create user failed with status {}", response.status());
            return Ok(false);
        }

        let body = response.text().await?;
        Ok(body.contains(USER_CREATED) || body.contains(USER_EXISTS))
    }

    async fn fetch_catalog(&self, credential: &Credential) -> Result<Vec<CatalogItem>> {
        self.fetch_results("fetch catalog", credential, &self.config.catalog_path)
            .await
    }

    async fn fetch_units(&self, credential: &Credential) -> Result<Vec<String>> {
        self.fetch_results("fetch measurement units", credential, &self.config.units_path)
            .await
    }

    async fn fetch_lists(&self, credential: &Credential) -> Result<ListCollection> {
        let records: Vec<ListRecord> = self
            .fetch_results("fetch lists", credential, &self.config.lists_path)
            .await?;
        Ok(ListCollection::from_lists(
            records.into_iter().map(IngredientList::from),
        ))
    }

    async fn create_list(&self, credential: &Credential, name: &str) -> Result<bool> {
        let request = self
            .client
            .post(self.url(&self.config.lists_path))
            .json(&ListNameRequest { name: name.to_string() });
        self.send_mutation("create list", credential, request).await
    }

    async fn delete_list(&self, credential: &Credential, name: &str) -> Result<bool> {
        let request = self.client.delete(self.list_url(name));
        self.send_mutation("delete list", credential, request).await
    }

    async fn rename_list(
        &self,
        credential: &Credential,
        old_name: &str,
        new_name: &str,
    ) -> Result<bool> {
        let request = self
            .client
            .patch(self.list_url(old_name))
            .json(&ListNameRequest { name: new_name.to_string() });
        self.send_mutation("rename list", credential, request).await
    }

    async fn add_ingredient(
        &self,
        credential: &Credential,
        list: &str,
        ingredient: &Ingredient,
    ) -> Result<bool> {
        let request = self.client.post(self.ingredients_url(list)).json(ingredient);
        self.send_mutation("add ingredient", credential, request).await
    }

    async fn remove_ingredient(
        &self,
        credential: &Credential,
        list: &str,
        ingredient: &Ingredient,
    ) -> Result<bool> {
        let request = self.client.delete(self.ingredients_url(list)).json(ingredient);
        self.send_mutation("remove ingredient", credential, request).await
    }

    async fn edit_ingredient(
        &self,
        credential: &Credential,
        list: &str,
        old: &Ingredient,
        new: &Ingredient,
    ) -> Result<bool> {
        let request = self
            .client
            .put(self.ingredients_url(list))
            .json(&EditIngredientRequest {
                old: old.clone(),
                new: new.clone(),
            });
        self.send_mutation("edit ingredient", credential, request).await
    }
}
