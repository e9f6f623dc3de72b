//! Route coordinate editor.
//!
//! Keeps the ordered list of labeled points that make up a walking-tour
//! path. The first point is the start and the last point is the end; new
//! interior points always go in right before the end so they never displace
//! it. Picking a point on the map is a two-step interaction: the caller
//! first announces which role the next click fills ([`RouteEditor::begin_pick`]),
//! then delivers the click ([`RouteEditor::click`]).

mod events;
mod polyline;

pub use events::{drain, EditorEvent, Observers};
pub use polyline::polyline;

use async_channel::Receiver;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::entities::{RouteCoordinates, RoutePoint};
use crate::error::{invalid_input_error, invalid_state_error, Error};

/// Decimal places kept for picked coordinates, in both create and edit flows.
pub const COORDINATE_PRECISION: i32 = 6;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointRole {
    Start,
    End,
    Interior,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "name", rename_all = "snake_case")]
pub enum Mode {
    Idle,
    AwaitingClick { role: PointRole },
}

impl Default for Mode {
    fn default() -> Self {
        Mode::Idle
    }
}

pub fn round_coordinate(value: f64) -> f64 {
    let factor = 10f64.powi(COORDINATE_PRECISION);
    (value * factor).round() / factor
}

/// Placeholder shown for a point whose stored label is empty.
pub fn placeholder(index: usize) -> String {
    format!("Point {}", index + 1)
}

pub fn serialize(points: &[RoutePoint]) -> Value {
    Value::Array(
        points
            .iter()
            .map(|p| serde_json::json!({ "lat": p.lat, "lng": p.lng, "label": p.label }))
            .collect(),
    )
}

pub fn deserialize(coordinates: RouteCoordinates) -> Vec<RoutePoint> {
    coordinates.into_points()
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct RouteEditor {
    points: Vec<RoutePoint>,
    #[serde(default)]
    start_label: String,
    #[serde(default)]
    end_label: String,
    #[serde(default)]
    mode: Mode,
    #[serde(skip)]
    observers: Observers,
}

impl RouteEditor {
    pub fn new(start_label: impl Into<String>, end_label: impl Into<String>) -> Self {
        Self {
            start_label: start_label.into(),
            end_label: end_label.into(),
            ..Self::default()
        }
    }

    /// Rebuilds an editor from a stored route.
    pub fn load(
        coordinates: RouteCoordinates,
        start_label: impl Into<String>,
        end_label: impl Into<String>,
    ) -> Self {
        Self::from_points(deserialize(coordinates), start_label, end_label)
    }

    pub fn from_points(
        points: Vec<RoutePoint>,
        start_label: impl Into<String>,
        end_label: impl Into<String>,
    ) -> Self {
        let mut editor = Self::new(start_label, end_label);
        editor.points = points;
        editor.publish(EditorEvent::Loaded {
            len: editor.points.len(),
        });
        editor
    }

    pub fn subscribe(&mut self) -> Receiver<EditorEvent> {
        self.observers.subscribe()
    }

    pub fn points(&self) -> &[RoutePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn start_label(&self) -> &str {
        &self.start_label
    }

    pub fn end_label(&self) -> &str {
        &self.end_label
    }

    /// Changes the text used for future start/end placements. Points already
    /// placed keep their stored labels.
    pub fn set_labels(&mut self, start_label: Option<String>, end_label: Option<String>) {
        if let Some(label) = start_label {
            self.start_label = label;
        }
        if let Some(label) = end_label {
            self.end_label = label;
        }
        self.publish(EditorEvent::LabelsChanged);
    }

    /// Label as displayed: the stored one, or the positional placeholder.
    pub fn display_label(&self, index: usize) -> Option<String> {
        self.points.get(index).map(|p| match p.label.is_empty() {
            true => placeholder(index),
            false => p.label.clone(),
        })
    }

    /// Places a coordinate according to `role` and returns the index it landed on.
    pub fn set_point(&mut self, role: PointRole, lat: f64, lng: f64) -> usize {
        let (lat, lng) = (round_coordinate(lat), round_coordinate(lng));

        let index = match role {
            PointRole::Start => {
                let point = RoutePoint::new(lat, lng, self.start_label.clone());
                match self.points.first_mut() {
                    Some(first) => *first = point,
                    None => self.points.push(point),
                }
                0
            }
            PointRole::End => {
                let point = RoutePoint::new(lat, lng, self.end_label.clone());
                if self.points.len() < 2 {
                    self.points.push(point);
                } else if let Some(last) = self.points.last_mut() {
                    *last = point;
                }
                self.points.len() - 1
            }
            PointRole::Interior => {
                let index = self.points.len().saturating_sub(1);
                self.points
                    .insert(index, RoutePoint::new(lat, lng, placeholder(index)));
                index
            }
        };

        self.publish(EditorEvent::PointSet { role, index });
        index
    }

    pub fn relabel(&mut self, index: usize, label: impl Into<String>) -> Result<(), Error> {
        let point = self
            .points
            .get_mut(index)
            .ok_or_else(|| out_of_range(index))?;

        point.label = label.into();
        self.publish(EditorEvent::PointRelabeled { index });
        Ok(())
    }

    pub fn remove_point(&mut self, index: usize) -> Result<RoutePoint, Error> {
        if index >= self.points.len() {
            return Err(out_of_range(index));
        }

        let removed = self.points.remove(index);
        self.publish(EditorEvent::PointRemoved { index });
        Ok(removed)
    }

    pub fn begin_pick(&mut self, role: PointRole) {
        self.set_mode(Mode::AwaitingClick { role });
    }

    pub fn cancel_pick(&mut self) {
        self.set_mode(Mode::Idle);
    }

    /// Delivers a map click to the pending pick. Fails when nothing is pending.
    pub fn click(&mut self, lat: f64, lng: f64) -> Result<usize, Error> {
        let role = match self.mode {
            Mode::AwaitingClick { role } => role,
            Mode::Idle => {
                return Err(invalid_state_error().with_message("no point selection in progress"))
            }
        };

        let index = self.set_point(role, lat, lng);
        self.set_mode(Mode::Idle);
        Ok(index)
    }

    pub fn serialize(&self) -> Value {
        serialize(&self.points)
    }

    pub fn into_points(self) -> Vec<RoutePoint> {
        self.points
    }

    fn set_mode(&mut self, mode: Mode) {
        self.mode = mode;
        self.publish(EditorEvent::ModeChanged { mode });
    }

    fn publish(&mut self, event: EditorEvent) {
        self.observers.publish(event);
    }
}

fn out_of_range(index: usize) -> Error {
    invalid_input_error().with_message(format!("point index {} out of range", index))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(lat: f64, lng: f64, label: &str) -> RoutePoint {
        RoutePoint::new(lat, lng, label)
    }

    #[test]
    fn walkthrough_from_empty() {
        let mut editor = RouteEditor::default();

        editor.set_point(PointRole::Start, -2.99, 104.75);
        assert_eq!(editor.points(), &[point(-2.99, 104.75, "")]);

        editor.set_point(PointRole::End, -2.98, 104.76);
        assert_eq!(
            editor.points(),
            &[point(-2.99, 104.75, ""), point(-2.98, 104.76, "")]
        );

        editor.set_point(PointRole::Interior, -2.985, 104.755);
        assert_eq!(
            editor.points(),
            &[
                point(-2.99, 104.75, ""),
                point(-2.985, 104.755, "Point 2"),
                point(-2.98, 104.76, ""),
            ]
        );
    }

    #[test]
    fn start_on_empty_uses_start_label() {
        let mut editor = RouteEditor::new("Benteng Kuto Besak", "Ampera");
        editor.set_point(PointRole::Start, -2.9917, 104.7595);

        assert_eq!(
            editor.points(),
            &[point(-2.9917, 104.7595, "Benteng Kuto Besak")]
        );
    }

    #[test]
    fn start_replaces_first() {
        let mut editor =
            RouteEditor::from_points(vec![point(1.0, 1.0, "old"), point(2.0, 2.0, "B")], "A", "B");
        editor.set_point(PointRole::Start, 3.0, 3.0);

        assert_eq!(editor.points(), &[point(3.0, 3.0, "A"), point(2.0, 2.0, "B")]);
    }

    #[test]
    fn end_appends_to_single_point() {
        let mut editor = RouteEditor::from_points(vec![point(1.0, 1.0, "A")], "A", "B");
        let index = editor.set_point(PointRole::End, 2.0, 2.0);

        assert_eq!(index, 1);
        assert_eq!(editor.points(), &[point(1.0, 1.0, "A"), point(2.0, 2.0, "B")]);
    }

    #[test]
    fn end_on_empty_creates_sole_point() {
        let mut editor = RouteEditor::new("A", "B");
        editor.set_point(PointRole::End, 2.0, 2.0);

        assert_eq!(editor.points(), &[point(2.0, 2.0, "B")]);
    }

    #[test]
    fn end_replaces_last_of_many() {
        let mut editor = RouteEditor::from_points(
            vec![point(1.0, 1.0, "A"), point(1.5, 1.5, "mid"), point(2.0, 2.0, "B")],
            "A",
            "Ampera",
        );
        editor.set_point(PointRole::End, 9.0, 9.0);

        assert_eq!(editor.len(), 3);
        assert_eq!(editor.points()[2], point(9.0, 9.0, "Ampera"));
        assert_eq!(editor.points()[1], point(1.5, 1.5, "mid"));
    }

    #[test]
    fn interior_goes_before_end() {
        let mut editor =
            RouteEditor::from_points(vec![point(1.0, 1.0, "A"), point(2.0, 2.0, "B")], "A", "B");
        editor.set_point(PointRole::Interior, 1.2, 1.2);
        editor.set_point(PointRole::Interior, 1.4, 1.4);

        let labels: Vec<&str> = editor.points().iter().map(|p| p.label.as_str()).collect();
        assert_eq!(labels, vec!["A", "Point 2", "Point 3", "B"]);
        assert_eq!(editor.points()[3], point(2.0, 2.0, "B"));
    }

    #[test]
    fn interior_on_empty_is_first_point() {
        let mut editor = RouteEditor::default();
        editor.set_point(PointRole::Interior, 1.0, 1.0);

        assert_eq!(editor.points(), &[point(1.0, 1.0, "Point 1")]);
    }

    #[test]
    fn duplicates_are_kept() {
        let mut editor = RouteEditor::default();
        editor.set_point(PointRole::Start, 1.0, 1.0);
        editor.set_point(PointRole::End, 1.0, 1.0);
        editor.set_point(PointRole::Interior, 1.0, 1.0);

        assert_eq!(editor.len(), 3);
    }

    #[test]
    fn coordinates_are_rounded() {
        let mut editor = RouteEditor::default();
        editor.set_point(PointRole::Start, -2.990912345, 104.756649999);

        assert_eq!(editor.points()[0].lat, -2.990912);
        assert_eq!(editor.points()[0].lng, 104.75665);
    }

    #[test]
    fn relabel_keeps_coordinates() {
        let mut editor = RouteEditor::from_points(vec![point(1.0, 2.0, "A")], "", "");
        editor.relabel(0, "Pasar 16 Ilir").unwrap();

        assert_eq!(editor.points(), &[point(1.0, 2.0, "Pasar 16 Ilir")]);
        assert!(editor.relabel(1, "nope").unwrap_err().is_invalid_input_error());
    }

    #[test]
    fn remove_keeps_order_and_labels() {
        let mut editor = RouteEditor::from_points(
            vec![
                point(1.0, 1.0, "A"),
                point(2.0, 2.0, ""),
                point(3.0, 3.0, "Point 3"),
                point(4.0, 4.0, "D"),
            ],
            "",
            "",
        );

        let removed = editor.remove_point(1).unwrap();
        assert_eq!(removed, point(2.0, 2.0, ""));
        assert_eq!(
            editor.points(),
            &[point(1.0, 1.0, "A"), point(3.0, 3.0, "Point 3"), point(4.0, 4.0, "D")]
        );
        assert!(editor.remove_point(3).is_err());
        assert_eq!(editor.len(), 3);
    }

    #[test]
    fn display_label_falls_back_to_position() {
        let editor = RouteEditor::from_points(
            vec![point(1.0, 1.0, "A"), point(2.0, 2.0, "")],
            "",
            "",
        );

        assert_eq!(editor.display_label(0).as_deref(), Some("A"));
        assert_eq!(editor.display_label(1).as_deref(), Some("Point 2"));
        assert_eq!(editor.display_label(2), None);
    }

    #[test]
    fn pick_then_click() {
        let mut editor = RouteEditor::new("A", "B");
        assert!(editor.click(1.0, 1.0).is_err());

        editor.begin_pick(PointRole::Start);
        assert_eq!(
            editor.mode(),
            Mode::AwaitingClick {
                role: PointRole::Start
            }
        );

        assert_eq!(editor.click(1.0, 1.0).unwrap(), 0);
        assert_eq!(editor.mode(), Mode::Idle);
        assert_eq!(editor.points(), &[point(1.0, 1.0, "A")]);

        editor.begin_pick(PointRole::End);
        editor.cancel_pick();
        assert!(editor.click(2.0, 2.0).is_err());
        assert_eq!(editor.len(), 1);
    }

    #[test]
    fn round_trip_through_json() {
        let points = vec![
            point(-2.99, 104.75, "Benteng Kuto Besak"),
            point(-2.985, 104.755, ""),
            point(-2.98, 104.76, "Jembatan Ampera"),
        ];

        let encoded = serialize(&points);
        let from_array: Vec<serde_json::Value> = encoded.as_array().unwrap().clone();

        assert_eq!(
            deserialize(RouteCoordinates::Encoded(encoded.to_string())),
            points
        );
        assert_eq!(deserialize(RouteCoordinates::Points(from_array)), points);
    }

    #[test]
    fn malformed_text_deserializes_empty() {
        assert!(deserialize(RouteCoordinates::Encoded("[{\"lat\":".into())).is_empty());
        assert!(deserialize(RouteCoordinates::Encoded("".into())).is_empty());
    }

    #[test]
    fn observers_see_mutations() {
        let mut editor = RouteEditor::new("A", "B");
        let rx = editor.subscribe();

        editor.begin_pick(PointRole::Interior);
        editor.click(1.0, 1.0).unwrap();
        editor.remove_point(0).unwrap();

        assert_eq!(
            drain(&rx),
            vec![
                EditorEvent::ModeChanged {
                    mode: Mode::AwaitingClick {
                        role: PointRole::Interior
                    }
                },
                EditorEvent::PointSet {
                    role: PointRole::Interior,
                    index: 0
                },
                EditorEvent::ModeChanged { mode: Mode::Idle },
                EditorEvent::PointRemoved { index: 0 },
            ]
        );
    }

    #[test]
    fn dropped_subscribers_are_pruned() {
        let mut editor = RouteEditor::default();
        drop(editor.subscribe());

        editor.set_point(PointRole::Start, 0.0, 0.0);
        assert!(editor.observers.is_empty());
    }

    #[test]
    fn stored_state_survives_json() {
        let mut editor = RouteEditor::new("A", "B");
        editor.set_point(PointRole::Start, 1.0, 1.0);
        editor.begin_pick(PointRole::End);

        let restored: RouteEditor =
            serde_json::from_value(serde_json::to_value(&editor).unwrap()).unwrap();

        assert_eq!(restored.points(), editor.points());
        assert_eq!(restored.mode(), editor.mode());
        assert_eq!(restored.end_label(), "B");
    }
}
