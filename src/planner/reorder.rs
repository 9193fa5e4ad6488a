use uuid::Uuid;

/// Dense 0-based ranks for a day's dishes in their new sequence.
///
/// This is a full reassignment, so applying it twice changes nothing the
/// second time.
pub fn dense_orders(sequence: &[Uuid]) -> Vec<(Uuid, i32)> {
    sequence
        .iter()
        .enumerate()
        .map(|(index, id)| (*id, index as i32))
        .collect()
}

/// Insertion index for a card dragged horizontally within its lane: the number
/// of sibling cards whose centre lies left of the dragged card's centre.
/// `sibling_centers_x` excludes the dragged card.
pub fn lane_slot(card_center_x: f64, sibling_centers_x: &[f64]) -> usize {
    sibling_centers_x
        .iter()
        .filter(|center| **center < card_center_x)
        .count()
}

/// Sequence after moving the item at `from` to position `to`.
/// Out-of-range `from` leaves the sequence untouched; `to` is clamped.
pub fn move_within(sequence: &[Uuid], from: usize, to: usize) -> Vec<Uuid> {
    let mut next = sequence.to_vec();
    if from >= next.len() {
        return next;
    }
    let item = next.remove(from);
    let to = to.min(next.len());
    next.insert(to, item);
    next
}

/// Rank for a dish appended to the end of a day. Saturates at `i32::MAX`, so
/// the appended dish ties with the last one instead of wrapping to the front.
pub fn append_order<I>(existing: I) -> i32
where
    I: IntoIterator<Item = i32>,
{
    existing.into_iter().max().map_or(0, |max| max.saturating_add(1))
}
