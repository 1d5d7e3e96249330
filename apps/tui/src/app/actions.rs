use crate::api::{
    ApiClient, ApiError, BufferSummary, DistrictSummary, FeatureCollection, HouseholdProperties,
    SprayDayProperties, TargetAreaDetail, TargetAreaRow,
};
use crate::app::state::Selection;
use crate::route::DistrictScope;
use std::fmt;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinSet;
use tracing::{debug, warn};

/// One upstream fetch, carrying the parameters that make up its key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchRequest {
    Districts,
    SprayDates,
    Overview,
    District(String),
    TargetArea(String),
    Households(String),
    SprayPoints {
        target_area: String,
        spray_date: Option<String>,
    },
    Buffers {
        target_area: String,
        spray_date: Option<String>,
    },
}

impl FetchRequest {
    /// Whether a response to this request still belongs to `selection`.
    /// Lists that do not depend on the selection always do.
    pub fn is_current(&self, selection: &Selection) -> bool {
        match self {
            Self::Districts | Self::SprayDates => true,
            Self::Overview => selection.district == DistrictScope::All,
            Self::District(name) => selection.district.name() == Some(name.as_str()),
            Self::TargetArea(target) | Self::Households(target) => {
                selection.target_area.as_deref() == Some(target.as_str())
            }
            Self::SprayPoints {
                target_area,
                spray_date,
            }
            | Self::Buffers {
                target_area,
                spray_date,
            } => {
                selection.target_area.as_deref() == Some(target_area.as_str())
                    && selection.spray_date == *spray_date
            }
        }
    }

    pub const fn label(&self) -> &'static str {
        match self {
            Self::Districts => "districts",
            Self::SprayDates => "spray dates",
            Self::Overview => "district totals",
            Self::District(_) => "target areas",
            Self::TargetArea(_) => "target area",
            Self::Households(_) => "households",
            Self::SprayPoints { .. } => "spray points",
            Self::Buffers { .. } => "buffer areas",
        }
    }
}

impl fmt::Display for FetchRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::District(name) => write!(f, "{}({name})", self.label()),
            Self::TargetArea(target) | Self::Households(target) => {
                write!(f, "{}({target})", self.label())
            }
            Self::SprayPoints {
                target_area,
                spray_date,
            }
            | Self::Buffers {
                target_area,
                spray_date,
            } => write!(
                f,
                "{}({target_area}, {})",
                self.label(),
                spray_date.as_deref().unwrap_or("all dates")
            ),
            _ => write!(f, "{}", self.label()),
        }
    }
}

/// Target-area rows of one district.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DistrictRows {
    pub district: String,
    pub rows: Vec<TargetAreaRow>,
}

#[derive(Debug, Clone)]
pub enum FetchPayload {
    Districts(Vec<DistrictSummary>),
    SprayDates(Vec<String>),
    Overview(Vec<DistrictRows>),
    District(Vec<TargetAreaRow>),
    TargetArea(Option<TargetAreaDetail>),
    Households(FeatureCollection<HouseholdProperties>),
    SprayPoints(Vec<SprayDayProperties>),
    Buffers(Vec<BufferSummary>),
}

#[derive(Debug)]
pub struct FetchResponse {
    pub request: FetchRequest,
    pub payload: Result<FetchPayload, ApiError>,
}

/// Runs fetches against the API and reports completions on a channel, in
/// whatever order they finish.
#[derive(Debug, Clone)]
pub struct AppActions {
    client: ApiClient,
    sender: UnboundedSender<FetchResponse>,
}

impl AppActions {
    pub fn new(client: ApiClient) -> (Self, UnboundedReceiver<FetchResponse>) {
        let (sender, receiver) = unbounded_channel();
        (Self { client, sender }, receiver)
    }

    /// Spawns `request`; the response arrives on the receiver from [`Self::new`].
    pub fn dispatch(&self, request: FetchRequest) {
        let client = self.client.clone();
        let sender = self.sender.clone();
        debug!(%request, "dispatching fetch");
        tokio::spawn(async move {
            let payload = execute(&client, &request).await;
            if sender.send(FetchResponse { request, payload }).is_err() {
                debug!("dashboard closed before fetch completed");
            }
        });
    }
}

pub async fn execute(client: &ApiClient, request: &FetchRequest) -> Result<FetchPayload, ApiError> {
    let payload = match request {
        FetchRequest::Districts => FetchPayload::Districts(client.districts().await?),
        FetchRequest::SprayDates => FetchPayload::SprayDates(client.spray_dates().await?),
        FetchRequest::Overview => FetchPayload::Overview(fetch_overview(client).await?),
        FetchRequest::District(name) => {
            FetchPayload::District(client.district_target_areas(name).await?)
        }
        FetchRequest::TargetArea(target) => {
            FetchPayload::TargetArea(client.target_area(target).await?)
        }
        FetchRequest::Households(target) => {
            FetchPayload::Households(client.households(target).await?)
        }
        FetchRequest::SprayPoints {
            target_area,
            spray_date,
        } => FetchPayload::SprayPoints(
            client
                .spray_points(target_area, spray_date.as_deref())
                .await?
                .into_properties(),
        ),
        FetchRequest::Buffers {
            target_area,
            spray_date,
        } => FetchPayload::Buffers(client.buffers(target_area, spray_date.as_deref()).await?),
    };

    Ok(payload)
}

/// Rows for every district, fetched concurrently. A district whose rows fail
/// to load is left out of the totals rather than failing the whole view.
async fn fetch_overview(client: &ApiClient) -> Result<Vec<DistrictRows>, ApiError> {
    let districts = client.districts().await?;

    let mut tasks = JoinSet::new();
    for (index, district) in districts.into_iter().enumerate() {
        let client = client.clone();
        tasks.spawn(async move {
            let rows = client
                .district_target_areas(&district.district_name)
                .await;
            (index, district.district_name, rows)
        });
    }

    let mut loaded = Vec::new();
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((index, district, Ok(rows))) => loaded.push((index, DistrictRows { district, rows })),
            Ok((_, district, Err(error))) => {
                warn!(%district, %error, "skipping district in totals");
            }
            Err(error) => warn!(%error, "district fetch task failed"),
        }
    }

    loaded.sort_by_key(|(index, _)| *index);
    Ok(loaded.into_iter().map(|(_, rows)| rows).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn selection(district: DistrictScope, target: Option<&str>, date: Option<&str>) -> Selection {
        Selection {
            district,
            target_area: target.map(str::to_string),
            spray_date: date.map(str::to_string),
        }
    }

    #[test]
    fn keys_follow_the_selection() {
        let chienge = DistrictScope::Named("Chienge".to_string());
        let current = selection(chienge.clone(), Some("1203"), Some("2015-09-30"));

        assert!(FetchRequest::Districts.is_current(&current));
        assert!(!FetchRequest::Overview.is_current(&current));
        assert!(FetchRequest::District("Chienge".to_string()).is_current(&current));
        assert!(!FetchRequest::District("Nchelenge".to_string()).is_current(&current));
        assert!(FetchRequest::TargetArea("1203".to_string()).is_current(&current));
        assert!(!FetchRequest::Households("1204".to_string()).is_current(&current));
        assert!(FetchRequest::SprayPoints {
            target_area: "1203".to_string(),
            spray_date: Some("2015-09-30".to_string()),
        }
        .is_current(&current));
        assert!(!FetchRequest::Buffers {
            target_area: "1203".to_string(),
            spray_date: None,
        }
        .is_current(&current));

        let all = selection(DistrictScope::All, None, None);
        assert!(FetchRequest::Overview.is_current(&all));
        assert!(!FetchRequest::TargetArea("1203".to_string()).is_current(&all));
    }

    #[test]
    fn requests_describe_themselves_for_logs() {
        let request = FetchRequest::SprayPoints {
            target_area: "1203".to_string(),
            spray_date: None,
        };
        assert_eq!(request.to_string(), "spray points(1203, all dates)");
        assert_eq!(FetchRequest::Overview.to_string(), "district totals");
    }
}
