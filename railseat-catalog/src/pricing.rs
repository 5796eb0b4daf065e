use serde::{Deserialize, Serialize};
use railseat_core::{CoachClass, Seat, SeatType};

/// Fixed seat surcharge table keyed by class and seat type
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeatPricing {
    /// Surcharge for a window seat, per class
    pub window: ClassAdjustments,
    pub aisle: ClassAdjustments,
    pub middle: ClassAdjustments,
    pub single: ClassAdjustments,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ClassAdjustments {
    pub first_class: f64,
    pub business: f64,
    pub economy: f64,
}

impl ClassAdjustments {
    fn for_class(&self, class: CoachClass) -> f64 {
        match class {
            CoachClass::FirstClass => self.first_class,
            CoachClass::Business => self.business,
            CoachClass::Economy => self.economy,
        }
    }
}

impl Default for SeatPricing {
    fn default() -> Self {
        Self {
            window: ClassAdjustments { first_class: 25.0, business: 15.0, economy: 5.0 },
            aisle: ClassAdjustments { first_class: 15.0, business: 10.0, economy: 3.0 },
            middle: ClassAdjustments { first_class: 0.0, business: 0.0, economy: -5.0 },
            single: ClassAdjustments { first_class: 30.0, business: 20.0, economy: 8.0 },
        }
    }
}

impl SeatPricing {
    /// Price delta from the base fare for a seat of this class and type
    pub fn adjustment(&self, class: CoachClass, seat_type: SeatType) -> f64 {
        let row = match seat_type {
            SeatType::Window => &self.window,
            SeatType::Aisle => &self.aisle,
            SeatType::Middle => &self.middle,
            SeatType::Single => &self.single,
        };
        row.for_class(class)
    }

    /// Total fare for a set of seats: base fare plus each seat's adjustment
    pub fn fare(&self, base_fare: f64, seats: &[Seat]) -> f64 {
        let total: f64 = seats.iter().map(|seat| base_fare + seat.price_adjustment).sum();
        // Round to cents
        (total * 100.0).round() / 100.0
    }
}
