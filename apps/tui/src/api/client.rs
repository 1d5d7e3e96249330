use crate::api::error::ApiError;
use crate::api::models::{
    BufferProperties, BufferSummary, DistrictSummary, FeatureCollection, HouseholdProperties,
    SprayDayProperties, TargetAreaDetail, TargetAreaRow,
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Districts,
    TargetAreas,
    Households,
    SprayDays,
    Buffers,
}

impl Endpoint {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Districts => "districts.json",
            Self::TargetAreas => "targetareas.json",
            Self::Households => "households.json",
            Self::SprayDays => "spraydays.json",
            Self::Buffers => "buffers.json",
        }
    }
}

/// Read-only client for the spray campaign API. Cheap to clone; clones share
/// the connection pool.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(ApiError::Client)?;

        Ok(Self {
            http,
            base_url: base_url.into(),
        })
    }

    pub fn url(&self, endpoint: Endpoint) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            endpoint.as_str()
        )
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: Endpoint,
        query: &[(&str, &str)],
    ) -> Result<T, ApiError> {
        let url = self.url(endpoint);
        debug!(%url, ?query, "GET");

        let response = self
            .http
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(|source| ApiError::Request {
                url: url.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status { url, status });
        }

        let body = response
            .bytes()
            .await
            .map_err(|source| ApiError::Request {
                url: url.clone(),
                source,
            })?;

        serde_json::from_slice(&body).map_err(|source| ApiError::Decode { url, source })
    }

    pub async fn districts(&self) -> Result<Vec<DistrictSummary>, ApiError> {
        self.get_json(Endpoint::Districts, &[]).await
    }

    /// Per-target-area stat rows for one district.
    pub async fn district_target_areas(
        &self,
        district: &str,
    ) -> Result<Vec<TargetAreaRow>, ApiError> {
        self.get_json(Endpoint::Districts, &[("district", district)])
            .await
    }

    pub async fn target_area(&self, target_area: &str) -> Result<Option<TargetAreaDetail>, ApiError> {
        let url = self.url(Endpoint::TargetAreas);
        let value: Value = self
            .get_json(Endpoint::TargetAreas, &[("target_area", target_area)])
            .await?;
        TargetAreaDetail::from_value(value).map_err(|source| ApiError::Decode { url, source })
    }

    pub async fn households(
        &self,
        target_area: &str,
    ) -> Result<FeatureCollection<HouseholdProperties>, ApiError> {
        self.get_json(Endpoint::Households, &[("target_area", target_area)])
            .await
    }

    /// Points recorded on or before `spray_date`, or all of them.
    pub async fn spray_points(
        &self,
        target_area: &str,
        spray_date: Option<&str>,
    ) -> Result<FeatureCollection<SprayDayProperties>, ApiError> {
        let mut query = vec![("target_area", target_area)];
        if let Some(date) = spray_date {
            query.push(("spray_date__lte", date));
        }
        self.get_json(Endpoint::SprayDays, &query).await
    }

    /// Dates on which spraying was recorded, as the API formats them.
    pub async fn spray_dates(&self) -> Result<Vec<String>, ApiError> {
        self.get_json(Endpoint::SprayDays, &[("dates_only", "true")])
            .await
    }

    /// Buffer polygons. The server applies `spray_date` as an upper bound.
    pub async fn buffers(
        &self,
        target_area: &str,
        spray_date: Option<&str>,
    ) -> Result<Vec<BufferSummary>, ApiError> {
        let mut query = vec![("target_area", target_area)];
        if let Some(date) = spray_date {
            query.push(("spray_date", date));
        }
        let collection: FeatureCollection<BufferProperties> =
            self.get_json(Endpoint::Buffers, &query).await?;

        Ok(collection
            .features
            .iter()
            .map(BufferSummary::from_feature)
            .collect())
    }
}
