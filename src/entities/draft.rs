use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::editor::{EditorEvent, RouteEditor};
use crate::entities::{Route, RouteForm};
use crate::error::{invalid_input_error, Error};

/// A route editing session held between requests until it is saved or
/// discarded.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Draft {
    pub token: Uuid,
    /// Backend route being edited; `None` while creating a new one.
    pub route_id: Option<i64>,
    pub program_id: Option<i64>,
    pub editor: RouteEditor,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct DraftDetails {
    pub program_id: Option<i64>,
    pub start_point: Option<String>,
    pub end_point: Option<String>,
}

/// A draft after a mutation, with the changes the editor published.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DraftUpdate {
    pub draft: Draft,
    pub changes: Vec<EditorEvent>,
}

impl DraftDetails {
    pub fn required_program(&self) -> Result<i64, Error> {
        self.program_id
            .ok_or_else(|| invalid_input_error().with_message("program is required"))
    }
}

impl Draft {
    pub fn new(details: DraftDetails) -> Self {
        Self {
            token: Uuid::new_v4(),
            route_id: None,
            program_id: details.program_id,
            editor: RouteEditor::new(
                details.start_point.unwrap_or_default(),
                details.end_point.unwrap_or_default(),
            ),
            created_at: Utc::now(),
        }
    }

    pub fn from_route(route: Route) -> Self {
        Self {
            token: Uuid::new_v4(),
            route_id: Some(route.id),
            program_id: Some(route.program_id),
            editor: RouteEditor::from_points(
                route.coordinates,
                route.start_point,
                route.end_point,
            ),
            created_at: Utc::now(),
        }
    }

    pub fn apply_details(&mut self, details: DraftDetails) {
        if details.program_id.is_some() {
            self.program_id = details.program_id;
        }
        self.editor
            .set_labels(details.start_point, details.end_point);
    }

    pub fn to_form(&self) -> Result<RouteForm, Error> {
        let program_id = self
            .program_id
            .ok_or_else(|| invalid_input_error().with_message("program is required"))?;

        Ok(RouteForm {
            program_id,
            start_point: self.editor.start_label().to_string(),
            end_point: self.editor.end_label().to_string(),
            coordinates: self.editor.points().to_vec(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::PointRole;
    use crate::entities::RoutePoint;

    #[test]
    fn form_requires_program() {
        let draft = Draft::new(DraftDetails::default());
        assert!(draft.to_form().unwrap_err().is_invalid_input_error());
    }

    #[test]
    fn opening_needs_a_program() {
        let err = DraftDetails::default().required_program().unwrap_err();
        assert!(err.is_invalid_input_error());

        let details = DraftDetails {
            program_id: Some(4),
            ..DraftDetails::default()
        };
        assert_eq!(details.required_program().unwrap(), 4);
    }

    #[test]
    fn form_carries_points_in_order() {
        let mut draft = Draft::new(DraftDetails {
            program_id: Some(4),
            start_point: Some("BKB".into()),
            end_point: Some("Ampera".into()),
        });
        draft.editor.set_point(PointRole::Start, -2.99, 104.75);
        draft.editor.set_point(PointRole::End, -2.98, 104.76);
        draft.editor.set_point(PointRole::Interior, -2.985, 104.755);

        let form = draft.to_form().unwrap();
        assert_eq!(form.program_id, 4);
        assert_eq!(form.start_point, "BKB");
        assert_eq!(
            form.coordinates,
            vec![
                RoutePoint::new(-2.99, 104.75, "BKB"),
                RoutePoint::new(-2.985, 104.755, "Point 2"),
                RoutePoint::new(-2.98, 104.76, "Ampera"),
            ]
        );
    }

    #[test]
    fn editing_existing_route_keeps_id() {
        let route = Route {
            id: 12,
            program_id: 3,
            start_point: "A".into(),
            end_point: "B".into(),
            coordinates: vec![RoutePoint::new(1.0, 1.0, "A")],
        };

        let mut draft = Draft::from_route(route);
        draft.apply_details(DraftDetails {
            start_point: Some("Alpha".into()),
            ..DraftDetails::default()
        });

        assert_eq!(draft.route_id, Some(12));
        assert_eq!(draft.program_id, Some(3));
        assert_eq!(draft.editor.start_label(), "Alpha");
        assert_eq!(draft.editor.points()[0].label, "A");
    }
}
