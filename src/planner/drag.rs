//! Drag-and-drop reassignment of a dish card to another day row.
//!
//! All coordinates are viewport-relative (what `getBoundingClientRect` and
//! pointer `clientX/clientY` report). Callers must hand in row rectangles
//! measured in the same space as the pointer positions.

use std::time::{Duration, Instant};

use chrono::NaiveDate;
use uuid::Uuid;

/// Max distance (px) between the card centre and a row centre for the row to
/// count as a drop target.
pub const SNAP_THRESHOLD: f64 = 48.0;

/// Pointer travel (px) after a press before it becomes a drag.
pub const DRAG_START_DISTANCE: f64 = 5.0;

/// Clicks on the card are ignored for this long after a drop.
pub const CLICK_SUPPRESSION: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    fn distance_to(self, other: Point) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

/// Vertical extent of one day row on screen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DayRowRect {
    pub date: NaiveDate,
    pub top: f64,
    pub height: f64,
}

impl DayRowRect {
    pub fn center_y(&self) -> f64 {
        self.top + self.height / 2.0
    }
}

/// The dish being dragged and the day it currently belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DraggedDish {
    pub id: Uuid,
    pub date: NaiveDate,
}

/// Row whose centre is closest to `card_center_y`, if within `threshold`.
/// Equal distances resolve to the earlier row in `rows`.
pub fn hover_target(card_center_y: f64, rows: &[DayRowRect], threshold: f64) -> Option<&DayRowRect> {
    let mut best: Option<(&DayRowRect, f64)> = None;
    for row in rows {
        let distance = (card_center_y - row.center_y()).abs();
        match best {
            Some((_, min)) if distance >= min => {}
            _ => best = Some((row, distance)),
        }
    }
    best.filter(|(_, distance)| *distance <= threshold)
        .map(|(row, _)| row)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Press {
    pub dish: DraggedDish,
    pub origin: Point,
    pub card_center: Point,
    pub container: Size,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragSession {
    pub dish: DraggedDish,
    /// Card centre minus pointer at grab time.
    pub grab_offset: Point,
    /// Container size frozen for the duration of the drag.
    pub container: Size,
    pub hover: Option<NaiveDate>,
}

impl DragSession {
    fn card_center(&self, pointer: Point) -> Point {
        Point::new(pointer.x + self.grab_offset.x, pointer.y + self.grab_offset.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropOutcome {
    /// Reassign the dish to another day.
    MoveToDay { dish_id: Uuid, from: NaiveDate, to: NaiveDate },
    /// Released over its own day or away from every row; in-lane reorder applies.
    StayInLane { dish_id: Uuid, date: NaiveDate },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragState {
    Idle,
    /// Pointer is down on a card but has not travelled far enough to drag.
    Pressed(Press),
    Dragging(DragSession),
    Dropped(DropOutcome),
    Cancelled,
}

#[derive(Debug)]
pub struct DragEngine {
    state: DragState,
    snap_threshold: f64,
    suppress_clicks_until: Option<Instant>,
}

impl Default for DragEngine {
    fn default() -> Self {
        Self::new(SNAP_THRESHOLD)
    }
}

impl DragEngine {
    pub fn new(snap_threshold: f64) -> Self {
        Self {
            state: DragState::Idle,
            snap_threshold,
            suppress_clicks_until: None,
        }
    }

    pub fn state(&self) -> &DragState {
        &self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging(_))
    }

    /// Current highlighted row, if any.
    pub fn hover(&self) -> Option<NaiveDate> {
        match &self.state {
            DragState::Dragging(session) => session.hover,
            _ => None,
        }
    }

    /// Container size to pin while dragging so the lane does not reflow.
    pub fn frozen_container_size(&self) -> Option<Size> {
        match &self.state {
            DragState::Dragging(session) => Some(session.container),
            _ => None,
        }
    }

    /// Pointer went down on a card. Any finished gesture is discarded.
    pub fn press(&mut self, dish: DraggedDish, pointer: Point, card_center: Point, container: Size) {
        if self.is_dragging() {
            return;
        }
        self.state = DragState::Pressed(Press {
            dish,
            origin: pointer,
            card_center,
            container,
        });
    }

    /// Explicit drag start signalled by the card itself.
    pub fn start(&mut self, dish: DraggedDish, pointer: Point, card_center: Point, container: Size) {
        self.state = DragState::Dragging(DragSession {
            dish,
            grab_offset: Point::new(card_center.x - pointer.x, card_center.y - pointer.y),
            container,
            hover: None,
        });
    }

    /// Feed a pointer move. Returns the hover target to highlight (or `None`
    /// to clear any highlight).
    pub fn pointer_move(&mut self, pointer: Point, rows: &[DayRowRect]) -> Option<NaiveDate> {
        if let DragState::Pressed(press) = self.state {
            if press.origin.distance_to(pointer) < DRAG_START_DISTANCE {
                return None;
            }
            self.start(press.dish, press.origin, press.card_center, press.container);
        }

        let threshold = self.snap_threshold;
        match &mut self.state {
            DragState::Dragging(session) => {
                let center = session.card_center(pointer);
                session.hover = hover_target(center.y, rows, threshold).map(|row| row.date);
                session.hover
            }
            _ => None,
        }
    }

    /// Pointer released. Returns the drop outcome when a drag was in progress;
    /// a release without a drag is an ordinary tap and yields `None`.
    pub fn release(&mut self, pointer: Point, rows: &[DayRowRect], now: Instant) -> Option<DropOutcome> {
        let session = match self.state {
            DragState::Dragging(session) => session,
            DragState::Pressed(_) => {
                self.state = DragState::Idle;
                return None;
            }
            _ => return None,
        };

        let center = session.card_center(pointer);
        let target = hover_target(center.y, rows, self.snap_threshold).map(|row| row.date);
        let dish = session.dish;
        let outcome = match target {
            Some(to) if to != dish.date => DropOutcome::MoveToDay {
                dish_id: dish.id,
                from: dish.date,
                to,
            },
            _ => DropOutcome::StayInLane {
                dish_id: dish.id,
                date: dish.date,
            },
        };

        tracing::debug!(?outcome, "drag released");
        self.state = DragState::Dropped(outcome);
        self.suppress_clicks_until = Some(now + CLICK_SUPPRESSION);
        Some(outcome)
    }

    /// Abort the gesture without any mutation.
    pub fn cancel(&mut self) {
        if !matches!(self.state, DragState::Idle) {
            self.state = DragState::Cancelled;
        }
    }

    pub fn reset(&mut self) {
        self.state = DragState::Idle;
    }

    /// Whether a click on a card at `now` should open the dish.
    pub fn accepts_click(&self, now: Instant) -> bool {
        if self.is_dragging() {
            return false;
        }
        match self.suppress_clicks_until {
            Some(until) => now >= until,
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, d).unwrap()
    }

    /// Rows centred at the given y positions, 80px tall, Monday first.
    fn rows_centered(centers: &[f64]) -> Vec<DayRowRect> {
        centers
            .iter()
            .enumerate()
            .map(|(i, c)| DayRowRect {
                date: day(9 + i as u32),
                top: c - 40.0,
                height: 80.0,
            })
            .collect()
    }

    fn dish_on(d: u32) -> DraggedDish {
        DraggedDish { id: Uuid::new_v4(), date: day(d) }
    }

    const CONTAINER: Size = Size { width: 320.0, height: 96.0 };

    #[test]
    fn test_hover_target_within_threshold() {
        let rows = rows_centered(&[100.0, 300.0, 500.0]);
        let hit = hover_target(340.0, &rows, 50.0).unwrap();
        assert_eq!(hit.center_y(), 300.0);
    }

    #[test]
    fn test_hover_target_outside_threshold() {
        let rows = rows_centered(&[100.0, 300.0, 500.0]);
        assert!(hover_target(200.0, &rows, 50.0).is_none());
    }

    #[test]
    fn test_hover_target_threshold_is_inclusive() {
        let rows = rows_centered(&[100.0]);
        assert!(hover_target(150.0, &rows, 50.0).is_some());
        assert!(hover_target(150.5, &rows, 50.0).is_none());
    }

    #[test]
    fn test_hover_target_tie_picks_first_row() {
        let rows = rows_centered(&[100.0, 200.0]);
        let hit = hover_target(150.0, &rows, 50.0).unwrap();
        assert_eq!(hit.date, day(9));
    }

    #[test]
    fn test_hover_target_no_rows() {
        assert!(hover_target(10.0, &[], SNAP_THRESHOLD).is_none());
    }

    #[test]
    fn test_small_move_stays_pressed() {
        let rows = rows_centered(&[100.0, 300.0]);
        let mut engine = DragEngine::default();
        engine.press(dish_on(9), Point::new(50.0, 100.0), Point::new(50.0, 100.0), CONTAINER);

        assert_eq!(engine.pointer_move(Point::new(52.0, 102.0), &rows), None);
        assert!(matches!(engine.state(), DragState::Pressed(_)));
        assert!(engine.frozen_container_size().is_none());
    }

    #[test]
    fn test_move_past_start_distance_begins_drag() {
        let rows = rows_centered(&[100.0, 300.0]);
        let mut engine = DragEngine::default();
        engine.press(dish_on(9), Point::new(50.0, 100.0), Point::new(50.0, 100.0), CONTAINER);

        assert_eq!(engine.pointer_move(Point::new(50.0, 110.0), &rows), Some(day(9)));
        assert!(engine.is_dragging());
        assert_eq!(engine.frozen_container_size(), Some(CONTAINER));
    }

    #[test]
    fn test_grab_offset_tracks_card_center() {
        // Grabbed 30px below the card centre: pointer at 330 puts the card at 300.
        let rows = rows_centered(&[100.0, 300.0, 500.0]);
        let mut engine = DragEngine::new(50.0);
        engine.start(dish_on(9), Point::new(10.0, 130.0), Point::new(10.0, 100.0), CONTAINER);

        assert_eq!(engine.pointer_move(Point::new(10.0, 330.0), &rows), Some(day(10)));
        // Pointer at 230 -> card at 200, 100px from both neighbours.
        assert_eq!(engine.pointer_move(Point::new(10.0, 230.0), &rows), None);
        assert_eq!(engine.hover(), None);
    }

    #[test]
    fn test_drop_on_other_day_moves() {
        let rows = rows_centered(&[100.0, 300.0, 500.0]);
        let dish = dish_on(9);
        let mut engine = DragEngine::default();
        engine.start(dish, Point::new(0.0, 100.0), Point::new(0.0, 100.0), CONTAINER);
        engine.pointer_move(Point::new(0.0, 480.0), &rows);

        let outcome = engine.release(Point::new(0.0, 490.0), &rows, Instant::now());
        assert_eq!(
            outcome,
            Some(DropOutcome::MoveToDay { dish_id: dish.id, from: day(9), to: day(11) })
        );
        assert_eq!(engine.hover(), None);
    }

    #[test]
    fn test_drop_uses_final_pointer_not_last_hover() {
        let rows = rows_centered(&[100.0, 300.0, 500.0]);
        let dish = dish_on(9);
        let mut engine = DragEngine::default();
        engine.start(dish, Point::new(0.0, 100.0), Point::new(0.0, 100.0), CONTAINER);
        assert_eq!(engine.pointer_move(Point::new(0.0, 300.0), &rows), Some(day(10)));

        let outcome = engine.release(Point::new(0.0, 400.0), &rows, Instant::now());
        assert_eq!(outcome, Some(DropOutcome::StayInLane { dish_id: dish.id, date: day(9) }));
    }

    #[test]
    fn test_drop_on_own_day_stays_in_lane() {
        let rows = rows_centered(&[100.0, 300.0]);
        let dish = dish_on(10);
        let mut engine = DragEngine::default();
        engine.start(dish, Point::new(0.0, 300.0), Point::new(0.0, 300.0), CONTAINER);

        let outcome = engine.release(Point::new(80.0, 310.0), &rows, Instant::now());
        assert_eq!(outcome, Some(DropOutcome::StayInLane { dish_id: dish.id, date: day(10) }));
    }

    #[test]
    fn test_tap_without_drag_is_not_a_drop() {
        let rows = rows_centered(&[100.0]);
        let mut engine = DragEngine::default();
        let now = Instant::now();
        engine.press(dish_on(9), Point::new(0.0, 100.0), Point::new(0.0, 100.0), CONTAINER);

        assert_eq!(engine.release(Point::new(1.0, 100.0), &rows, now), None);
        assert_eq!(engine.state(), &DragState::Idle);
        assert!(engine.accepts_click(now));
    }

    #[test]
    fn test_clicks_suppressed_briefly_after_drop() {
        let rows = rows_centered(&[100.0, 300.0]);
        let mut engine = DragEngine::default();
        let now = Instant::now();
        engine.start(dish_on(9), Point::new(0.0, 100.0), Point::new(0.0, 100.0), CONTAINER);
        assert!(!engine.accepts_click(now));

        engine.release(Point::new(0.0, 300.0), &rows, now);
        assert!(!engine.accepts_click(now));
        assert!(!engine.accepts_click(now + Duration::from_millis(50)));
        assert!(engine.accepts_click(now + CLICK_SUPPRESSION));
    }

    #[test]
    fn test_cancel_clears_hover_and_yields_nothing() {
        let rows = rows_centered(&[100.0, 300.0]);
        let mut engine = DragEngine::default();
        engine.start(dish_on(9), Point::new(0.0, 100.0), Point::new(0.0, 100.0), CONTAINER);
        engine.pointer_move(Point::new(0.0, 300.0), &rows);
        assert_eq!(engine.hover(), Some(day(10)));

        engine.cancel();
        assert_eq!(engine.state(), &DragState::Cancelled);
        assert_eq!(engine.hover(), None);
        assert_eq!(engine.release(Point::new(0.0, 300.0), &rows, Instant::now()), None);
    }
}
