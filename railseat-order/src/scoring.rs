use std::collections::BTreeMap;
use railseat_core::{CoachClass, CoreResult, Seat, SeatError, SeatFeature, SeatPreference, SeatType};

const WINDOW_BONUS: f64 = 10.0;
const AISLE_BONUS: f64 = 8.0;
const LEGROOM_BONUS: f64 = 5.0;
const POWER_BONUS: f64 = 3.0;
const PRICE_DIVISOR: f64 = 5.0;

/// How a party ended up seated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupingPolicy {
    /// Everyone shares one row of one coach
    SameRow,
    /// No row had room for the whole party
    Scattered,
}

#[derive(Debug, Clone)]
pub struct Selection {
    pub seats: Vec<Seat>,
    pub policy: GroupingPolicy,
}

/// Preference score of a seat; premium seats get a soft bonus from their surcharge.
pub fn score(seat: &Seat, preferences: &[SeatPreference]) -> f64 {
    let mut total = seat.price_adjustment / PRICE_DIVISOR;
    for preference in preferences {
        total += match preference {
            SeatPreference::Window if seat.seat_type == SeatType::Window => WINDOW_BONUS,
            SeatPreference::Aisle if seat.seat_type == SeatType::Aisle => AISLE_BONUS,
            SeatPreference::ExtraLegroom if seat.has_feature(SeatFeature::ExtraLegroom) => LEGROOM_BONUS,
            SeatPreference::PowerOutlet if seat.has_feature(SeatFeature::PowerOutlet) => POWER_BONUS,
            SeatPreference::Window
            | SeatPreference::Aisle
            | SeatPreference::ExtraLegroom
            | SeatPreference::PowerOutlet => 0.0,
        };
    }
    total
}

/// Pick `count` seats out of `candidates`.
///
/// Rows are scanned in (coach, row) order and the first row with room for
/// the whole party wins, taking its best-scoring seats. Without such a row
/// the globally best-scoring seats are taken. Equal scores keep seat order.
pub fn select_seats(
    class: CoachClass,
    mut candidates: Vec<Seat>,
    count: usize,
    preferences: &[SeatPreference],
) -> CoreResult<Selection> {
    if candidates.len() < count {
        return Err(SeatError::Insufficient {
            class,
            requested: count,
            available: candidates.len(),
        });
    }

    candidates.sort_by_key(|s| (s.coach, s.row, s.position()));
    let scored: Vec<(f64, Seat)> = candidates
        .into_iter()
        .map(|seat| (score(&seat, preferences), seat))
        .collect();

    let mut rows: BTreeMap<(u32, u32), Vec<&(f64, Seat)>> = BTreeMap::new();
    for entry in &scored {
        rows.entry((entry.1.coach, entry.1.row)).or_default().push(entry);
    }

    for group in rows.values_mut() {
        if group.len() >= count {
            group.sort_by(|a, b| b.0.total_cmp(&a.0));
            return Ok(Selection {
                seats: in_seat_order(group.iter().take(count).map(|(_, seat)| seat.clone()).collect()),
                policy: GroupingPolicy::SameRow,
            });
        }
    }

    let mut ranked: Vec<&(f64, Seat)> = scored.iter().collect();
    ranked.sort_by(|a, b| b.0.total_cmp(&a.0));
    Ok(Selection {
        seats: in_seat_order(ranked.into_iter().take(count).map(|(_, seat)| seat.clone()).collect()),
        policy: GroupingPolicy::Scattered,
    })
}

fn in_seat_order(mut seats: Vec<Seat>) -> Vec<Seat> {
    seats.sort_by_key(|s| (s.coach, s.row, s.position()));
    seats
}
