//! Pointer gestures that draw roads.
//!
//! A road is drawn by pressing, dragging and releasing. Releases that moved
//! no further than the minimum road length count as clicks and add nothing.

use crate::geometry::Point;
use crate::road::Road;
use serde::{Deserialize, Serialize};

/// Default minimum drag distance. Drags of this length or shorter are clicks.
pub const MIN_ROAD_LENGTH: f64 = 5.0;

/// A pointer event delivered by the host, in drawing-surface coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum InputEvent {
    PointerDown(Point),
    PointerMove(Point),
    PointerUp(Point),
}

impl InputEvent {
    pub fn point(&self) -> Point {
        match *self {
            InputEvent::PointerDown(p) | InputEvent::PointerMove(p) | InputEvent::PointerUp(p) => p,
        }
    }
}

/// A road being dragged out but not yet committed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Draft {
    pub start: Point,
    pub current: Point,
}

/// Outcome of releasing the pointer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureResult {
    /// No gesture was in progress.
    None,
    /// The drag was too short to be a road.
    TooShort { length: f64 },
    /// A road to append, with its endpoints exactly as pressed and released.
    Road(Road),
}

/// Tracks one press-drag-release gesture.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DrawGesture {
    draft: Option<Draft>,
}

impl DrawGesture {
    pub fn new() -> Self {
        Self::default()
    }

    /// The in-progress road, for preview rendering.
    pub fn draft(&self) -> Option<Draft> {
        self.draft
    }

    pub fn is_drawing(&self) -> bool {
        self.draft.is_some()
    }

    /// Start a new draft at `at`, discarding any unfinished one.
    pub fn pointer_down(&mut self, at: Point) {
        self.draft = Some(Draft {
            start: at,
            current: at,
        });
    }

    /// Move the live end of the draft. Ignored when not drawing.
    pub fn pointer_move(&mut self, at: Point) {
        if let Some(draft) = self.draft.as_mut() {
            draft.current = at;
        }
    }

    /// Finish the gesture. Drags strictly longer than `min_length` yield a
    /// road from the press point to `at`.
    pub fn pointer_up(&mut self, at: Point, min_length: f64) -> GestureResult {
        let Some(draft) = self.draft.take() else {
            return GestureResult::None;
        };
        let length = draft.start.distance(&at);
        if length > min_length {
            GestureResult::Road(Road::new(draft.start, at))
        } else {
            GestureResult::TooShort { length }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: f64, y: f64) -> Point {
        Point::new(x, y)
    }

    #[test]
    fn drag_produces_road_with_verbatim_endpoints() {
        let mut gesture = DrawGesture::new();
        gesture.pointer_down(p(10.5, 20.25));
        gesture.pointer_move(p(40.0, 20.0));
        let result = gesture.pointer_up(p(80.75, 21.0), MIN_ROAD_LENGTH);
        assert_eq!(result, GestureResult::Road(Road::new(p(10.5, 20.25), p(80.75, 21.0))));
        assert!(!gesture.is_drawing());
    }

    #[test]
    fn drag_of_exactly_min_length_is_a_click() {
        let mut gesture = DrawGesture::new();
        gesture.pointer_down(p(0.0, 0.0));
        let result = gesture.pointer_up(p(3.0, 4.0), MIN_ROAD_LENGTH);
        assert_eq!(result, GestureResult::TooShort { length: 5.0 });
    }

    #[test]
    fn drag_just_over_min_length_is_a_road() {
        let mut gesture = DrawGesture::new();
        gesture.pointer_down(p(0.0, 0.0));
        let result = gesture.pointer_up(p(5.01, 0.0), MIN_ROAD_LENGTH);
        assert!(matches!(result, GestureResult::Road(_)));
    }

    #[test]
    fn release_uses_up_point_not_last_move() {
        let mut gesture = DrawGesture::new();
        gesture.pointer_down(p(0.0, 0.0));
        gesture.pointer_move(p(100.0, 100.0));
        let result = gesture.pointer_up(p(2.0, 0.0), MIN_ROAD_LENGTH);
        assert!(matches!(result, GestureResult::TooShort { .. }));
    }

    #[test]
    fn move_updates_draft_only_while_drawing() {
        let mut gesture = DrawGesture::new();
        gesture.pointer_move(p(5.0, 5.0));
        assert!(gesture.draft().is_none());

        gesture.pointer_down(p(1.0, 1.0));
        gesture.pointer_move(p(9.0, 9.0));
        assert_eq!(
            gesture.draft(),
            Some(Draft {
                start: p(1.0, 1.0),
                current: p(9.0, 9.0),
            })
        );
    }

    #[test]
    fn release_without_press_is_ignored() {
        let mut gesture = DrawGesture::new();
        assert_eq!(gesture.pointer_up(p(50.0, 50.0), MIN_ROAD_LENGTH), GestureResult::None);
    }

    #[test]
    fn event_point_accessor() {
        assert_eq!(InputEvent::PointerMove(p(3.0, 2.0)).point(), p(3.0, 2.0));
    }
}
