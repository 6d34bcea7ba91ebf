//! Storage API client.
//!
//! Thin wrappers over `gloo-net` for the endpoints the explorer talks to.
//! Every scoped request carries the active profile in [`PROFILE_HEADER`].
//! Nothing here retries; failed calls surface as [`FetchError`].

use bucketview_core::ListingError;
use bucketview_core::models::{ListingPage, SearchPage, TransferRequest};
use gloo_net::http::{Request, RequestBuilder, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::config::{
    API_BASE, DOWNLOAD_URL_TTL_SECS, LIST_PAGE_SIZE, PROFILE_HEADER, SEARCH_PAGE_SIZE,
};
use crate::models::{
    Bucket, FavoritesResponse, IndexSummary, JobCreated, Meta, PresignedUrl, Profile,
    UploadCreated,
};

/// Failures of an API call.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FetchError {
    #[error("network error: {0}")]
    Network(String),
    #[error("unexpected response: {0}")]
    Decode(String),
    #[error(transparent)]
    Api(#[from] ListingError),
}

impl FetchError {
    /// Whether the server reported a missing search index.
    pub fn is_not_indexed(&self) -> bool {
        matches!(self, Self::Api(e) if e.is_not_indexed())
    }
}

impl From<gloo_net::Error> for FetchError {
    fn from(e: gloo_net::Error) -> Self {
        match e {
            gloo_net::Error::SerdeError(e) => Self::Decode(e.to_string()),
            other => Self::Network(other.to_string()),
        }
    }
}

fn url(path: &str) -> String {
    format!("{API_BASE}{path}")
}

fn segment(value: &str) -> String {
    js_sys::encode_uri_component(value).into()
}

async fn read_json<T: DeserializeOwned>(response: Response, bucket: &str) -> Result<T, FetchError> {
    let response = check(response, bucket).await?;
    Ok(response.json::<T>().await?)
}

async fn check(response: Response, bucket: &str) -> Result<Response, FetchError> {
    if response.ok() {
        return Ok(response);
    }
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    Err(ListingError::from_response(bucket, status, &body).into())
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct KeyBody<'a> {
    key: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct NameBody<'a> {
    name: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct UploadBody<'a> {
    bucket: &'a str,
    prefix: &'a str,
    mode: &'a str,
}

/// Client bound to one profile.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ApiClient {
    profile_id: String,
}

impl ApiClient {
    pub fn new(profile_id: impl Into<String>) -> Self {
        Self {
            profile_id: profile_id.into(),
        }
    }

    fn scoped(&self, builder: RequestBuilder) -> RequestBuilder {
        builder.header(PROFILE_HEADER, &self.profile_id)
    }

    fn objects_path(bucket: &str, rest: &str) -> String {
        url(&format!("/buckets/{}/objects{rest}", segment(bucket)))
    }

    // =========================================================================
    // Session
    // =========================================================================

    pub async fn profiles() -> Result<Vec<Profile>, FetchError> {
        let response = Request::get(&url("/profiles")).send().await?;
        read_json(response, "").await
    }

    pub async fn meta() -> Result<Meta, FetchError> {
        let response = Request::get(&url("/meta")).send().await?;
        read_json(response, "").await
    }

    pub async fn buckets(&self) -> Result<Vec<Bucket>, FetchError> {
        let response = self.scoped(Request::get(&url("/buckets"))).send().await?;
        read_json(response, "").await
    }

    pub async fn create_bucket(&self, name: &str) -> Result<(), FetchError> {
        let response = self
            .scoped(Request::post(&url("/buckets")))
            .json(&NameBody { name })?
            .send()
            .await?;
        check(response, name).await.map(|_| ())
    }

    // =========================================================================
    // Listing and Search
    // =========================================================================

    /// One delimiter listing page; `token` continues a previous page.
    pub async fn list_objects(
        &self,
        bucket: &str,
        prefix: &str,
        token: Option<&str>,
    ) -> Result<ListingPage, FetchError> {
        let max_keys = LIST_PAGE_SIZE.to_string();
        let mut query = vec![("prefix", prefix), ("delimiter", "/"), ("maxKeys", max_keys.as_str())];
        if let Some(token) = token {
            query.push(("continuationToken", token));
        }
        let request = Request::get(&Self::objects_path(bucket, "")).query(query);
        let response = self.scoped(request).send().await?;
        read_json(response, bucket).await
    }

    /// One page of indexed search results under `prefix`.
    pub async fn search_objects(
        &self,
        bucket: &str,
        prefix: &str,
        q: &str,
        cursor: Option<&str>,
    ) -> Result<SearchPage, FetchError> {
        let limit = SEARCH_PAGE_SIZE.to_string();
        let mut query = vec![("q", q), ("prefix", prefix), ("limit", limit.as_str())];
        if let Some(cursor) = cursor {
            query.push(("cursor", cursor));
        }
        let request = Request::get(&Self::objects_path(bucket, "/search")).query(query);
        let response = self.scoped(request).send().await?;
        read_json(response, bucket).await
    }

    pub async fn index_summary(&self, bucket: &str, prefix: &str) -> Result<IndexSummary, FetchError> {
        let request =
            Request::get(&Self::objects_path(bucket, "/index-summary")).query([("prefix", prefix)]);
        let response = self.scoped(request).send().await?;
        read_json(response, bucket).await
    }

    // =========================================================================
    // Objects
    // =========================================================================

    pub async fn download_url(&self, bucket: &str, key: &str) -> Result<String, FetchError> {
        let ttl = DOWNLOAD_URL_TTL_SECS.to_string();
        let request = Request::get(&Self::objects_path(bucket, "/download-url"))
            .query([("key", key), ("expiresSeconds", ttl.as_str())]);
        let response = self.scoped(request).send().await?;
        let presigned: PresignedUrl = read_json(response, bucket).await?;
        Ok(presigned.url)
    }

    pub async fn create_folder(&self, bucket: &str, key: &str) -> Result<(), FetchError> {
        let response = self
            .scoped(Request::post(&Self::objects_path(bucket, "/folder")))
            .json(&KeyBody { key })?
            .send()
            .await?;
        check(response, bucket).await.map(|_| ())
    }

    /// Upload files into `prefix` through a direct upload session.
    pub async fn upload(
        &self,
        bucket: &str,
        prefix: &str,
        files: &web_sys::FileList,
    ) -> Result<usize, FetchError> {
        let response = self
            .scoped(Request::post(&url("/uploads")))
            .json(&UploadBody {
                bucket,
                prefix,
                mode: "direct",
            })?
            .send()
            .await?;
        let session: UploadCreated = read_json(response, bucket).await?;
        let session_path = format!("/uploads/{}", segment(&session.upload_id));

        let form = web_sys::FormData::new().map_err(|_| FetchError::Decode("FormData".to_string()))?;
        let mut count = 0;
        for idx in 0..files.length() {
            if let Some(file) = files.get(idx) {
                form.append_with_blob_and_filename("files", &file, &file.name())
                    .map_err(|_| FetchError::Decode(file.name()))?;
                count += 1;
            }
        }
        let response = self
            .scoped(Request::post(&url(&format!("{session_path}/files"))))
            .body(form)?
            .send()
            .await?;
        check(response, bucket).await?;

        let response = self
            .scoped(Request::post(&url(&format!("{session_path}/commit"))))
            .json(&serde_json::json!({}))?
            .send()
            .await?;
        check(response, bucket).await?;
        Ok(count)
    }

    // =========================================================================
    // Favorites
    // =========================================================================

    pub async fn favorites(&self, bucket: &str) -> Result<FavoritesResponse, FetchError> {
        let response = self
            .scoped(Request::get(&Self::objects_path(bucket, "/favorites")))
            .send()
            .await?;
        read_json(response, bucket).await
    }

    pub async fn add_favorite(&self, bucket: &str, key: &str) -> Result<(), FetchError> {
        let response = self
            .scoped(Request::post(&Self::objects_path(bucket, "/favorites")))
            .json(&KeyBody { key })?
            .send()
            .await?;
        check(response, bucket).await.map(|_| ())
    }

    pub async fn remove_favorite(&self, bucket: &str, key: &str) -> Result<(), FetchError> {
        let request = Request::delete(&Self::objects_path(bucket, "/favorites")).query([("key", key)]);
        let response = self.scoped(request).send().await?;
        check(response, bucket).await.map(|_| ())
    }

    // =========================================================================
    // Jobs
    // =========================================================================

    /// Submit a validated transfer; returns the job id.
    pub async fn create_job(&self, request: &TransferRequest) -> Result<String, FetchError> {
        let response = self
            .scoped(Request::post(&url("/jobs")))
            .json(request)?
            .send()
            .await?;
        let created: JobCreated = read_json(response, "").await?;
        Ok(created.job_id)
    }
}
