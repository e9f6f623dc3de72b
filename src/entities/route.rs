use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::entities::wire;
use crate::listing::Searchable;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RoutePoint {
    pub lat: f64,
    pub lng: f64,
    #[serde(default)]
    pub label: String,
}

impl RoutePoint {
    pub fn new(lat: f64, lng: f64, label: impl Into<String>) -> Self {
        Self {
            lat,
            lng,
            label: label.into(),
        }
    }

    pub fn coordinates(&self) -> Coordinates {
        Coordinates {
            lat: self.lat,
            lng: self.lng,
        }
    }

    fn from_value(value: &Value) -> Option<Self> {
        let object = value.as_object()?;
        let lat = wire::number_from_value(object.get("lat")?)?;
        let lng = wire::number_from_value(object.get("lng")?)?;
        let label = match object.get("label") {
            Some(Value::String(s)) => s.clone(),
            _ => String::new(),
        };

        Some(Self { lat, lng, label })
    }
}

/// `route_coordinates` as the backend hands it out: sometimes the JSON text
/// that was stored, sometimes already parsed.
#[derive(Clone, Debug, Deserialize)]
#[serde(untagged)]
pub enum RouteCoordinates {
    Encoded(String),
    Points(Vec<Value>),
    Other(Value),
}

impl RouteCoordinates {
    /// Normalizes to the ordered point list. Anything malformed degrades to
    /// an empty path.
    pub fn into_points(self) -> Vec<RoutePoint> {
        let values = match self {
            Self::Encoded(text) => match serde_json::from_str::<Vec<Value>>(&text) {
                Ok(values) => values,
                Err(err) => {
                    tracing::warn!(%err, "route coordinates are not a JSON array");
                    return vec![];
                }
            },
            Self::Points(values) => values,
            Self::Other(Value::Null) => return vec![],
            Self::Other(value) => {
                tracing::warn!(%value, "route coordinates have an unexpected shape");
                return vec![];
            }
        };

        let points: Option<Vec<RoutePoint>> = values.iter().map(RoutePoint::from_value).collect();

        points.unwrap_or_else(|| {
            tracing::warn!(count = values.len(), "route coordinates contain a malformed point");
            vec![]
        })
    }
}

impl Default for RouteCoordinates {
    fn default() -> Self {
        Self::Other(Value::Null)
    }
}

fn coordinates<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<RoutePoint>, D::Error> {
    Ok(RouteCoordinates::deserialize(deserializer)?.into_points())
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Route {
    #[serde(deserialize_with = "wire::integer")]
    pub id: i64,
    #[serde(deserialize_with = "wire::integer")]
    pub program_id: i64,
    #[serde(default, deserialize_with = "wire::string_or_empty")]
    pub start_point: String,
    #[serde(default, deserialize_with = "wire::string_or_empty")]
    pub end_point: String,
    #[serde(
        rename = "route_coordinates",
        default,
        deserialize_with = "coordinates"
    )]
    pub coordinates: Vec<RoutePoint>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RouteForm {
    pub program_id: i64,
    pub start_point: String,
    pub end_point: String,
    #[serde(
        rename = "route_coordinates",
        default,
        deserialize_with = "coordinates"
    )]
    pub coordinates: Vec<RoutePoint>,
}

impl Searchable for Route {
    fn id(&self) -> i64 {
        self.id
    }

    fn search_fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("program_id", self.program_id.to_string()),
            ("start_point", self.start_point.clone()),
            ("end_point", self.end_point.clone()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_encoded_coordinates() {
        let route: Route = serde_json::from_value(json!({
            "id": 3,
            "program_id": "7",
            "start_point": "Benteng Kuto Besak",
            "end_point": null,
            "route_coordinates": "[{\"lat\":-2.99,\"lng\":104.75,\"label\":\"BKB\"},{\"lat\":\"-2.98\",\"lng\":\"104.76\"}]"
        }))
        .unwrap();

        assert_eq!(route.program_id, 7);
        assert_eq!(route.end_point, "");
        assert_eq!(
            route.coordinates,
            vec![
                RoutePoint::new(-2.99, 104.75, "BKB"),
                RoutePoint::new(-2.98, 104.76, ""),
            ]
        );
    }

    #[test]
    fn decodes_parsed_coordinates() {
        let route: Route = serde_json::from_value(json!({
            "id": 3,
            "program_id": 7,
            "route_coordinates": [{"lat": -2.99, "lng": 104.75, "label": "A"}]
        }))
        .unwrap();

        assert_eq!(route.coordinates, vec![RoutePoint::new(-2.99, 104.75, "A")]);
    }

    #[test]
    fn malformed_coordinates_degrade_to_empty() {
        for raw in [
            json!("not json"),
            json!("{\"lat\": 1}"),
            json!([{"lat": "north", "lng": 104.75}]),
            json!(42),
            json!(null),
        ] {
            let route: Route = serde_json::from_value(json!({
                "id": 1,
                "program_id": 1,
                "route_coordinates": raw
            }))
            .unwrap();

            assert!(route.coordinates.is_empty());
        }
    }

    #[test]
    fn form_serializes_coordinates_as_array() {
        let form = RouteForm {
            program_id: 2,
            start_point: "A".into(),
            end_point: "B".into(),
            coordinates: vec![RoutePoint::new(-2.99, 104.75, "A")],
        };

        let value = serde_json::to_value(&form).unwrap();
        assert_eq!(
            value["route_coordinates"],
            json!([{"lat": -2.99, "lng": 104.75, "label": "A"}])
        );
    }
}
