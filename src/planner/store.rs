use chrono::NaiveDate;
use uuid::Uuid;

use crate::models::dish::{Dish, UpdateDishRequest};
use crate::planner::{calendar, drag::DropOutcome, reorder};
use crate::services::image::PLACEHOLDER_IMAGE_URL;

/// Name and link of a copied dish, waiting to be pasted onto a day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DishDraft {
    pub name: String,
    pub link: Option<String>,
}

/// Local edit of a dish. `None` leaves a field as is; `link: Some(None)` clears it.
#[derive(Debug, Clone, Default)]
pub struct DishEdit {
    pub name: Option<String>,
    pub link: Option<Option<String>>,
    pub date: Option<NaiveDate>,
}

/// Client-side copy of the planner: every dish of the user plus the note of
/// the week on screen. Mutations apply immediately and return what needs to
/// be persisted; the server copy wins on the next poll.
#[derive(Debug, Clone)]
pub struct PlannerStore {
    week_start: NaiveDate,
    dishes: Vec<Dish>,
    note: String,
    clipboard: Option<DishDraft>,
}

impl PlannerStore {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            week_start: calendar::week_start(today),
            dishes: Vec::new(),
            note: String::new(),
            clipboard: None,
        }
    }

    pub fn week_start(&self) -> NaiveDate {
        self.week_start
    }

    pub fn week_days(&self) -> [NaiveDate; 7] {
        calendar::week_days(self.week_start)
    }

    /// Navigate by whole weeks. The note belongs to the old week and is cleared
    /// until the new one is fetched.
    pub fn shift_week(&mut self, weeks: i64) {
        if weeks != 0 {
            self.week_start = calendar::shift_weeks(self.week_start, weeks);
            self.note.clear();
        }
    }

    pub fn dishes(&self) -> &[Dish] {
        &self.dishes
    }

    pub fn dish(&self, id: Uuid) -> Option<&Dish> {
        self.dishes.iter().find(|d| d.id == id)
    }

    /// Dishes of one day in display order.
    pub fn dishes_for_day(&self, date: NaiveDate) -> Vec<&Dish> {
        let mut day: Vec<&Dish> = self.dishes.iter().filter(|d| d.date == date).collect();
        day.sort_by_key(|d| d.order);
        day
    }

    /// Adopt the server's list if it differs from ours. Returns whether
    /// anything changed; local edits not yet persisted are lost.
    pub fn reconcile(&mut self, fetched: Vec<Dish>) -> bool {
        if fetched == self.dishes {
            return false;
        }
        self.dishes = fetched;
        true
    }

    pub fn insert(&mut self, dish: Dish) {
        self.dishes.retain(|d| d.id != dish.id);
        self.dishes.push(dish);
    }

    /// Returns the request persisting the edit, or `None` for an unknown dish.
    pub fn apply_edit(&mut self, id: Uuid, edit: DishEdit) -> Option<UpdateDishRequest> {
        let dish = self.dishes.iter_mut().find(|d| d.id == id)?;
        if let Some(name) = &edit.name {
            dish.name = name.clone();
        }
        if let Some(link) = &edit.link {
            dish.link = link.clone();
        }
        if let Some(date) = edit.date {
            dish.date = date;
        }
        Some(UpdateDishRequest {
            id: Some(id),
            name: edit.name,
            link: edit.link,
            date: edit.date,
            order: None,
        })
    }

    /// Move a dish to the end of another day. Remaining dishes of the source
    /// day keep their ranks.
    pub fn apply_move(&mut self, id: Uuid, to: NaiveDate) -> Option<UpdateDishRequest> {
        let order = reorder::append_order(
            self.dishes
                .iter()
                .filter(|d| d.date == to && d.id != id)
                .map(|d| d.order),
        );
        let dish = self.dishes.iter_mut().find(|d| d.id == id)?;
        if dish.date == to {
            return None;
        }
        dish.date = to;
        dish.order = order;
        Some(UpdateDishRequest {
            id: Some(id),
            date: Some(to),
            order: Some(order),
            ..Default::default()
        })
    }

    /// Apply a finished drag. Only cross-day drops mutate here; in-lane drops
    /// go through [`PlannerStore::apply_reorder`].
    pub fn apply_drop(&mut self, outcome: DropOutcome) -> Option<UpdateDishRequest> {
        match outcome {
            DropOutcome::MoveToDay { dish_id, to, .. } => self.apply_move(dish_id, to),
            DropOutcome::StayInLane { .. } => None,
        }
    }

    /// Rank the given dishes of `date` 0..n in sequence order. Ids that are not
    /// on that day are skipped. Returns every (id, order) to persist.
    pub fn apply_reorder(&mut self, date: NaiveDate, sequence: &[Uuid]) -> Vec<(Uuid, i32)> {
        let on_day: Vec<Uuid> = sequence
            .iter()
            .copied()
            .filter(|id| self.dishes.iter().any(|d| d.id == *id && d.date == date))
            .collect();
        let orders = reorder::dense_orders(&on_day);
        for (id, order) in &orders {
            if let Some(dish) = self.dishes.iter_mut().find(|d| d.id == *id) {
                dish.order = *order;
            }
        }
        orders
    }

    pub fn remove(&mut self, id: Uuid) -> Option<Dish> {
        let index = self.dishes.iter().position(|d| d.id == id)?;
        Some(self.dishes.remove(index))
    }

    /// Swap in the generic placeholder after the dish image failed to load.
    pub fn mark_image_broken(&mut self, id: Uuid) {
        if let Some(dish) = self.dishes.iter_mut().find(|d| d.id == id) {
            dish.image = PLACEHOLDER_IMAGE_URL.to_string();
        }
    }

    pub fn note(&self) -> &str {
        &self.note
    }

    pub fn set_note(&mut self, content: impl Into<String>) {
        self.note = content.into();
    }

    /// Copy a dish for pasting onto another day.
    pub fn copy(&mut self, id: Uuid) -> bool {
        match self.dish(id) {
            Some(dish) => {
                self.clipboard = Some(DishDraft {
                    name: dish.name.clone(),
                    link: dish.link.clone(),
                });
                true
            }
            None => false,
        }
    }

    pub fn clipboard(&self) -> Option<&DishDraft> {
        self.clipboard.as_ref()
    }

    /// Paste consumes the clipboard.
    pub fn take_clipboard(&mut self) -> Option<DishDraft> {
        self.clipboard.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, d).unwrap()
    }

    fn dish(name: &str, date: NaiveDate, order: i32) -> Dish {
        let now = Utc::now();
        Dish {
            id: Uuid::new_v4(),
            user_id: Uuid::nil(),
            name: name.into(),
            link: None,
            image: format!("https://img.test/{name}.jpg"),
            date,
            order,
            created_at: now,
            updated_at: now,
        }
    }

    fn store_with(dishes: Vec<Dish>) -> PlannerStore {
        let mut store = PlannerStore::new(day(11));
        store.reconcile(dishes);
        store
    }

    fn names(dishes: Vec<&Dish>) -> Vec<&str> {
        dishes.into_iter().map(|d| d.name.as_str()).collect()
    }

    #[test]
    fn test_new_store_views_current_week() {
        let store = PlannerStore::new(day(15));
        assert_eq!(store.week_start(), day(9));
        assert_eq!(store.week_days()[6], day(15));
    }

    #[test]
    fn test_shift_week_clears_note() {
        let mut store = PlannerStore::new(day(11));
        store.set_note("shopping on friday");
        store.shift_week(1);
        assert_eq!(store.week_start(), day(16));
        assert_eq!(store.note(), "");
    }

    #[test]
    fn test_dishes_for_day_sorted_by_order() {
        let store = store_with(vec![
            dish("b", day(10), 1),
            dish("x", day(11), 0),
            dish("a", day(10), 0),
        ]);
        assert_eq!(names(store.dishes_for_day(day(10))), vec!["a", "b"]);
    }

    #[test]
    fn test_move_appends_and_leaves_source_ranks() {
        let a = dish("a", day(10), 0);
        let b = dish("b", day(10), 1);
        let c = dish("c", day(10), 2);
        let t = dish("t", day(12), 4);
        let b_id = b.id;
        let mut store = store_with(vec![a, b, c, t]);

        let update = store.apply_move(b_id, day(12)).unwrap();
        assert_eq!(update.date, Some(day(12)));
        assert_eq!(update.order, Some(5));

        let source: Vec<i32> = store.dishes_for_day(day(10)).iter().map(|d| d.order).collect();
        assert_eq!(source, vec![0, 2]);
        assert_eq!(names(store.dishes_for_day(day(12))), vec!["t", "b"]);
    }

    #[test]
    fn test_move_to_empty_day_gets_rank_zero() {
        let a = dish("a", day(10), 3);
        let id = a.id;
        let mut store = store_with(vec![a]);
        assert_eq!(store.apply_move(id, day(14)).unwrap().order, Some(0));
    }

    #[test]
    fn test_move_onto_max_rank_does_not_wrap() {
        let a = dish("a", day(10), 0);
        let t = dish("t", day(12), i32::MAX);
        let id = a.id;
        let mut store = store_with(vec![a, t]);

        assert_eq!(store.apply_move(id, day(12)).unwrap().order, Some(i32::MAX));
        assert_eq!(store.dish(id).unwrap().order, i32::MAX);
    }

    #[test]
    fn test_move_to_same_day_is_noop() {
        let a = dish("a", day(10), 3);
        let id = a.id;
        let mut store = store_with(vec![a]);
        assert!(store.apply_move(id, day(10)).is_none());
        assert_eq!(store.dish(id).unwrap().order, 3);
    }

    #[test]
    fn test_apply_drop_stay_in_lane_does_nothing() {
        let a = dish("a", day(10), 0);
        let id = a.id;
        let mut store = store_with(vec![a.clone()]);
        let outcome = DropOutcome::StayInLane { dish_id: id, date: day(10) };
        assert!(store.apply_drop(outcome).is_none());
        assert_eq!(store.dish(id), Some(&a));
    }

    #[test]
    fn test_reorder_is_dense_and_idempotent() {
        let a = dish("A", day(10), 5);
        let b = dish("B", day(10), 5);
        let c = dish("C", day(10), 9);
        let (ia, ib, ic) = (a.id, b.id, c.id);
        let mut store = store_with(vec![a, b, c]);

        let changes = store.apply_reorder(day(10), &[ic, ia, ib]);
        assert_eq!(changes, vec![(ic, 0), (ia, 1), (ib, 2)]);
        assert_eq!(names(store.dishes_for_day(day(10))), vec!["C", "A", "B"]);

        let snapshot = store.dishes().to_vec();
        let again = store.apply_reorder(day(10), &[ic, ia, ib]);
        assert_eq!(again, changes);
        assert_eq!(store.dishes(), snapshot.as_slice());
    }

    #[test]
    fn test_reorder_skips_other_days() {
        let a = dish("A", day(10), 0);
        let other = dish("O", day(11), 0);
        let (ia, io) = (a.id, other.id);
        let mut store = store_with(vec![a, other]);
        assert_eq!(store.apply_reorder(day(10), &[io, ia]), vec![(ia, 0)]);
    }

    #[test]
    fn test_edit_only_touches_given_fields() {
        let mut a = dish("Tacos", day(10), 2);
        a.link = Some("https://r.test".into());
        let id = a.id;
        let mut store = store_with(vec![a]);

        let update = store
            .apply_edit(id, DishEdit { name: Some("Fish tacos".into()), ..Default::default() })
            .unwrap();
        let edited = store.dish(id).unwrap();
        assert_eq!(edited.name, "Fish tacos");
        assert_eq!(edited.link.as_deref(), Some("https://r.test"));
        assert_eq!(edited.date, day(10));
        assert_eq!(edited.order, 2);
        assert!(update.link.is_none() && update.date.is_none() && update.order.is_none());

        store.apply_edit(id, DishEdit { link: Some(None), ..Default::default() });
        assert_eq!(store.dish(id).unwrap().link, None);
    }

    #[test]
    fn test_reconcile_last_fetch_wins() {
        let a = dish("a", day(10), 0);
        let mut store = store_with(vec![a.clone()]);
        assert!(!store.reconcile(vec![a.clone()]));

        // Local optimistic change is overwritten by the fetch.
        store.apply_move(a.id, day(12));
        assert!(store.reconcile(vec![a.clone()]));
        assert_eq!(store.dish(a.id).unwrap().date, day(10));
    }

    #[test]
    fn test_remove_and_insert() {
        let a = dish("a", day(10), 0);
        let id = a.id;
        let mut store = store_with(vec![a.clone()]);
        assert_eq!(store.remove(id).map(|d| d.id), Some(id));
        assert!(store.remove(id).is_none());

        store.insert(a.clone());
        store.insert(a);
        assert_eq!(store.dishes().len(), 1);
    }

    #[test]
    fn test_copy_then_take_clipboard() {
        let mut a = dish("Ramen", day(10), 0);
        a.link = Some("https://youtu.be/dQw4w9WgXcQ".into());
        let id = a.id;
        let mut store = store_with(vec![a]);

        assert!(!store.copy(Uuid::new_v4()));
        assert!(store.copy(id));
        let draft = store.take_clipboard().unwrap();
        assert_eq!(draft.name, "Ramen");
        assert!(store.clipboard().is_none());
    }

    #[test]
    fn test_mark_image_broken_uses_placeholder() {
        let a = dish("a", day(10), 0);
        let id = a.id;
        let mut store = store_with(vec![a]);
        store.mark_image_broken(id);
        assert_eq!(store.dish(id).unwrap().image, PLACEHOLDER_IMAGE_URL);
    }
}
