use crate::api::lenient;
use crate::coverage::{calculate_percentage, Percentage, SprayOutcome, TargetAreaStats};
use crate::domain::{HexColor, SprayStatus};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A row of `districts.json`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct DistrictSummary {
    #[serde(deserialize_with = "lenient::label")]
    pub district_name: String,
    #[serde(default, deserialize_with = "lenient::count")]
    pub num_target_areas: u64,
}

/// A row of `districts.json?district=<name>`, one per target area.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct TargetAreaRow {
    #[serde(default, alias = "target_id", deserialize_with = "lenient::label")]
    pub targetid: String,
    #[serde(default, deserialize_with = "lenient::count")]
    pub structures: u64,
    #[serde(default, deserialize_with = "lenient::count")]
    pub visited_total: u64,
    #[serde(default, deserialize_with = "lenient::count")]
    pub visited_sprayed: u64,
    #[serde(default, deserialize_with = "lenient::count")]
    pub visited_not_sprayed: u64,
    #[serde(default, deserialize_with = "lenient::count")]
    pub visited_refused: u64,
    #[serde(default, deserialize_with = "lenient::count")]
    pub visited_other: u64,
    #[serde(default, deserialize_with = "lenient::count")]
    pub not_visited: u64,
}

impl TargetAreaRow {
    pub fn stats(&self) -> TargetAreaStats {
        TargetAreaStats {
            target_id: self.targetid.clone(),
            structures: self.structures,
            visited_total: self.visited_total,
            visited_sprayed: self.visited_sprayed,
            visited_not_sprayed: self.visited_not_sprayed,
            visited_refused: self.visited_refused,
            visited_other: self.visited_other,
            not_visited: self.not_visited,
        }
    }
}

/// `targetareas.json?target_area=<id>`: counts plus the area's bounding box.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct TargetAreaDetail {
    #[serde(flatten)]
    pub row: TargetAreaRow,
    #[serde(default, alias = "bbox")]
    pub bounds: Option<[f64; 4]>,
}

impl TargetAreaDetail {
    /// The endpoint has answered with a bare object, a one-element list and
    /// a GeoJSON feature collection over time; take the first record of any.
    pub fn from_value(value: Value) -> Result<Option<Self>, serde_json::Error> {
        let record = match value {
            Value::Array(items) => items.into_iter().next(),
            Value::Object(mut object) => match object.remove("features") {
                Some(Value::Array(features)) => features.into_iter().next().map(|feature| {
                    let bbox = feature.get("bbox").cloned();
                    let mut properties = feature
                        .get("properties")
                        .cloned()
                        .unwrap_or(Value::Null);
                    if let (Value::Object(props), Some(bbox)) = (&mut properties, bbox) {
                        props.entry("bounds").or_insert(bbox);
                    }
                    properties
                }),
                _ => Some(Value::Object(object)),
            },
            _ => None,
        };

        match record {
            Some(record @ Value::Object(_)) => serde_json::from_value(record).map(Some),
            _ => Ok(None),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Geometry {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub coordinates: Value,
}

impl Geometry {
    /// Longitude/latitude of a point geometry.
    pub fn point(&self) -> Option<(f64, f64)> {
        if self.kind != "Point" {
            return None;
        }
        let coordinates = self.coordinates.as_array()?;
        Some((coordinates.first()?.as_f64()?, coordinates.get(1)?.as_f64()?))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct FeatureStyle {
    #[serde(default, rename = "fillColor")]
    pub fill_color: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(bound(deserialize = "P: DeserializeOwned + Default"))]
pub struct Feature<P> {
    #[serde(default)]
    pub geometry: Option<Geometry>,
    #[serde(default, deserialize_with = "nullable")]
    pub properties: P,
    #[serde(default)]
    pub style: Option<FeatureStyle>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(bound(deserialize = "P: DeserializeOwned + Default"))]
pub struct FeatureCollection<P> {
    #[serde(default)]
    pub features: Vec<Feature<P>>,
}

impl<P> Default for FeatureCollection<P> {
    fn default() -> Self {
        Self {
            features: Vec::new(),
        }
    }
}

impl<P> FeatureCollection<P> {
    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn into_properties(self) -> Vec<P> {
        self.features.into_iter().map(|f| f.properties).collect()
    }
}

fn nullable<'de, D, P>(deserializer: D) -> Result<P, D::Error>
where
    D: serde::Deserializer<'de>,
    P: DeserializeOwned + Default,
{
    Ok(Option::<P>::deserialize(deserializer)?.unwrap_or_default())
}

/// Household point from `households.json`
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct HouseholdProperties {
    #[serde(default, deserialize_with = "lenient::optional_label")]
    pub orig_fid: Option<String>,
    #[serde(default, deserialize_with = "lenient::optional_label")]
    pub hh_type: Option<String>,
    #[serde(default, deserialize_with = "lenient::count")]
    pub visited_total: u64,
    #[serde(default, deserialize_with = "lenient::count")]
    pub structures: u64,
    #[serde(default, deserialize_with = "lenient::optional_label")]
    pub district_name: Option<String>,
    #[serde(default, deserialize_with = "lenient::optional_label")]
    pub level: Option<String>,
}

/// Spray-status point from `spraydays.json`
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct SprayDayProperties {
    #[serde(default, deserialize_with = "lenient::optional_label")]
    pub sprayed: Option<String>,
    #[serde(default, deserialize_with = "lenient::optional_label")]
    pub reason: Option<String>,
    #[serde(default, deserialize_with = "lenient::optional_label")]
    pub spray_date: Option<String>,
}

impl SprayOutcome for SprayDayProperties {
    fn status(&self) -> Option<SprayStatus> {
        self.sprayed.as_deref().and_then(SprayStatus::parse)
    }

    fn reason(&self) -> Option<&str> {
        self.reason.as_deref()
    }

    fn spray_date(&self) -> Option<&str> {
        self.spray_date.as_deref()
    }
}

/// Buffer polygon properties from `buffers.json`
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct BufferProperties {
    #[serde(default, deserialize_with = "lenient::ratio")]
    pub percentage_sprayed: f64,
    #[serde(default, deserialize_with = "lenient::count")]
    pub spray_points: u64,
    #[serde(default, deserialize_with = "lenient::count")]
    pub num_households: u64,
}

/// A buffer polygon reduced to its popup line and fill.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BufferSummary {
    pub percentage_sprayed: Percentage,
    pub spray_points: u64,
    pub num_households: u64,
    pub fill_color: Option<HexColor>,
}

impl BufferSummary {
    /// The upstream `percentage_sprayed` is kept when present; otherwise it
    /// is derived from the point counts.
    #[allow(clippy::cast_possible_truncation)]
    pub fn from_feature(feature: &Feature<BufferProperties>) -> Self {
        let props = &feature.properties;
        let percentage_sprayed = if props.percentage_sprayed.is_finite()
            && props.percentage_sprayed > 0.0
        {
            calculate_percentage(Some(props.percentage_sprayed.round() as u64), Some(100))
        } else {
            calculate_percentage(Some(props.spray_points), Some(props.num_households))
        };

        Self {
            percentage_sprayed,
            spray_points: props.spray_points,
            num_households: props.num_households,
            fill_color: feature
                .style
                .as_ref()
                .and_then(|style| style.fill_color.as_deref())
                .and_then(HexColor::parse),
        }
    }

    pub fn caption(&self) -> String {
        format!(
            "{} ({}/{}) Found",
            self.percentage_sprayed, self.spray_points, self.num_households
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coverage::aggregate;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn district_rows_tolerate_strings_and_nulls() -> Result<(), serde_json::Error> {
        let rows: Vec<TargetAreaRow> = serde_json::from_value(json!([
            {
                "targetid": 1203,
                "structures": "20",
                "visited_total": 12,
                "visited_sprayed": 10,
                "visited_refused": null,
                "visited_other": 2,
                "not_visited": 8
            },
            { "target_id": "1204", "structures": 30, "visited_sprayed": "15" }
        ]))?;

        assert_eq!(rows[0].targetid, "1203");
        assert_eq!(rows[0].structures, 20);
        assert_eq!(rows[0].visited_refused, 0);
        assert_eq!(rows[1].targetid, "1204");
        assert_eq!(rows[1].visited_total, 0);

        let stats: Vec<_> = rows.iter().map(TargetAreaRow::stats).collect();
        let total = aggregate(&stats);
        assert_eq!(total.structures, 50);
        assert_eq!(total.visited_sprayed, 25);
        Ok(())
    }

    #[test]
    fn target_area_detail_accepts_list_object_and_geojson() -> Result<(), serde_json::Error> {
        let listed = TargetAreaDetail::from_value(json!([
            { "targetid": "7", "structures": 40, "bounds": [28.1, -9.2, 28.4, -9.0] }
        ]))?;
        assert_eq!(listed.as_ref().map(|d| d.row.structures), Some(40));
        assert_eq!(
            listed.and_then(|d| d.bounds),
            Some([28.1, -9.2, 28.4, -9.0])
        );

        let bare = TargetAreaDetail::from_value(json!({ "targetid": "7", "visited_total": 3 }))?;
        assert_eq!(bare.map(|d| d.row.visited_total), Some(3));

        let geojson = TargetAreaDetail::from_value(json!({
            "type": "FeatureCollection",
            "features": [{
                "type": "Feature",
                "bbox": [1.0, 2.0, 3.0, 4.0],
                "properties": { "targetid": 7, "structures": 11 }
            }]
        }))?;
        assert_eq!(geojson.as_ref().map(|d| d.row.targetid.as_str()), Some("7"));
        assert_eq!(geojson.and_then(|d| d.bounds), Some([1.0, 2.0, 3.0, 4.0]));

        assert_eq!(TargetAreaDetail::from_value(json!([]))?, None);
        Ok(())
    }

    #[test]
    fn spray_points_expose_status_and_reason() -> Result<(), serde_json::Error> {
        let collection: FeatureCollection<SprayDayProperties> = serde_json::from_value(json!({
            "type": "FeatureCollection",
            "features": [
                {
                    "type": "Feature",
                    "geometry": { "type": "Point", "coordinates": [28.3, -9.1] },
                    "properties": { "sprayed": "no", "reason": "refused" }
                },
                { "type": "Feature", "geometry": null, "properties": null }
            ]
        }))?;

        assert_eq!(collection.len(), 2);
        assert_eq!(
            collection.features[0].geometry.as_ref().and_then(Geometry::point),
            Some((28.3, -9.1))
        );
        let props = collection.into_properties();
        assert_eq!(props[0].status(), Some(SprayStatus::NotSprayed));
        assert_eq!(props[0].reason(), Some("refused"));
        assert_eq!(props[1].status(), None);
        Ok(())
    }

    #[test]
    fn buffer_summary_reads_style_and_caption() -> Result<(), serde_json::Error> {
        let feature: Feature<BufferProperties> = serde_json::from_value(json!({
            "type": "Feature",
            "properties": { "percentage_sprayed": "75.4", "spray_points": 3, "num_households": 4 },
            "style": { "fillColor": "#78C679" }
        }))?;
        let summary = BufferSummary::from_feature(&feature);

        assert_eq!(summary.percentage_sprayed.value(), 75);
        assert_eq!(summary.fill_color, Some(HexColor::new(0x78, 0xC6, 0x79)));
        assert_eq!(summary.caption(), "75% (3/4) Found");

        let derived: Feature<BufferProperties> = serde_json::from_value(json!({
            "properties": { "spray_points": 1, "num_households": 2 }
        }))?;
        assert_eq!(BufferSummary::from_feature(&derived).percentage_sprayed.value(), 50);
        Ok(())
    }
}
