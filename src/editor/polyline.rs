use geo_types::{Geometry, LineString};
use geozero::ToJson;
use serde_json::Value;

use super::RouteEditor;
use crate::entities::RoutePoint;
use crate::error::Error;

/// GeoJSON `LineString` of the path in drawing order, `[lng, lat]` per vertex.
pub fn polyline(points: &[RoutePoint]) -> Result<Value, Error> {
    let line: LineString<f64> = points
        .iter()
        .map(|p| (p.lng, p.lat))
        .collect::<Vec<_>>()
        .into();

    let json = Geometry::LineString(line).to_json()?;

    Ok(serde_json::from_str(&json)?)
}

impl RouteEditor {
    pub fn polyline(&self) -> Result<Value, Error> {
        polyline(self.points())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn vertices_follow_point_order() {
        let geometry = polyline(&[
            RoutePoint::new(-2.99, 104.75, "A"),
            RoutePoint::new(-2.98, 104.76, "B"),
        ])
        .unwrap();

        assert_eq!(geometry["type"], "LineString");
        assert_eq!(
            geometry["coordinates"],
            json!([[104.75, -2.99], [104.76, -2.98]])
        );
    }
}
