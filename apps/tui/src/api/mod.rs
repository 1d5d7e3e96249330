// API module for spray-dashboard
// Read-only client for the spray campaign REST endpoints

pub mod client;
pub mod error;
pub mod lenient;
pub mod models;

pub use client::{ApiClient, Endpoint};
pub use error::ApiError;
pub use models::{
    BufferProperties, BufferSummary, DistrictSummary, Feature, FeatureCollection,
    HouseholdProperties, SprayDayProperties, TargetAreaDetail, TargetAreaRow,
};
