use std::time::Duration;

use reqwest::{Client, RequestBuilder};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use shared::{
    domain::{Template, TemplateAttributes, TemplateId},
    error::ApiError,
    protocol::{BulkRecord, FilterRequest, ListResponse, SearchFilter},
};
use tracing::{debug, warn};
use url::Url;

use crate::error::{Result, TemplateError};

const API_PREFIX: &str = "api/v1/";
const BULK_PATH: &str = "_bulk/";

#[derive(Debug, Clone, Default)]
pub struct ApiOptions {
    pub timeout: Option<Duration>,
    pub username: Option<String>,
    pub password: Option<String>,
}

/// Thin typed wrapper over the REST endpoints the templates views use.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: Url,
    username: Option<String>,
    password: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_options(base_url, ApiOptions::default())
    }

    pub fn with_options(base_url: &str, options: ApiOptions) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = options.timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            http: builder.build()?,
            base_url: normalize_base_url(base_url)?,
            username: options.username,
            password: options.password,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        Ok(self.base_url.join(API_PREFIX)?.join(path)?)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.username {
            Some(username) => request.basic_auth(username, self.password.as_deref()),
            None => request,
        }
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let res = self.authorize(request).send().await?;
        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), body = %body, "api request rejected");
            let err = ApiError::from_response(status.as_u16(), &body);
            return Err(TemplateError::Api {
                status: status.as_u16(),
                code: err.code,
                detail: err.message,
            });
        }
        Ok(res.json().await?)
    }

    pub async fn get_item(&self, resource: &str, id: TemplateId) -> Result<Template> {
        let url = self.endpoint(&format!("{resource}/{id}/"))?;
        debug!(%url, "loading item");
        self.send(self.http.get(url)).await
    }

    pub async fn create_item(
        &self,
        resource: &str,
        attributes: &TemplateAttributes,
    ) -> Result<Template> {
        let url = self.endpoint(&format!("{resource}/"))?;
        debug!(%url, name = ?attributes.name(), "creating item");
        self.send(self.http.post(url).json(attributes)).await
    }

    pub async fn list_items(
        &self,
        resource: &str,
        filter: &SearchFilter,
    ) -> Result<ListResponse<Template>> {
        let url = self.endpoint(&format!("{resource}/"))?;
        debug!(%url, ?filter, "listing items");
        self.send(self.http.get(url).query(filter)).await
    }

    /// `POST <resource>/filter/?detail=1`, returning full item bodies.
    pub async fn filter_detail(
        &self,
        resource: &str,
        ids: &[TemplateId],
    ) -> Result<ListResponse<Template>> {
        let url = self.endpoint(&format!("{resource}/filter/"))?;
        debug!(%url, count = ids.len(), "fetching item details");
        let request = self
            .http
            .post(url)
            .query(&[("detail", "1")])
            .json(&FilterRequest::by_ids(ids));
        self.send(request).await
    }

    /// Submits all records in one request. Per-operation results are
    /// returned as the server sent them.
    pub async fn bulk(&self, records: &[BulkRecord]) -> Result<Vec<Value>> {
        self.post_json(BULK_PATH, records).await
    }

    async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.endpoint(path)?;
        debug!(%url, "posting");
        self.send(self.http.post(url).json(body)).await
    }
}

fn normalize_base_url(raw: &str) -> Result<Url> {
    let trimmed = raw.trim();
    if trimmed.ends_with('/') {
        Ok(Url::parse(trimmed)?)
    } else {
        Ok(Url::parse(&format!("{trimmed}/"))?)
    }
}
