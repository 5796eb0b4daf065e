use serde::{Deserialize, Serialize};
use railseat_core::{CoachClass, CoreResult, SeatError, SeatType};

/// Declarative coach template for one travel class
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClassLayout {
    pub class: CoachClass,
    pub coach_prefix: String,
    pub coach_count: u32,
    pub rows: u32,
    pub seats_per_row: u32,
    pub pattern: String,
}

impl ClassLayout {
    /// Layout table used when the configuration does not provide one
    pub fn standard() -> Vec<ClassLayout> {
        vec![
            ClassLayout {
                class: CoachClass::FirstClass,
                coach_prefix: "F".to_string(),
                coach_count: 1,
                rows: 8,
                seats_per_row: 3,
                pattern: "2-1".to_string(),
            },
            ClassLayout {
                class: CoachClass::Business,
                coach_prefix: "B".to_string(),
                coach_count: 2,
                rows: 10,
                seats_per_row: 4,
                pattern: "2-2".to_string(),
            },
            ClassLayout {
                class: CoachClass::Economy,
                coach_prefix: "E".to_string(),
                coach_count: 3,
                rows: 16,
                seats_per_row: 5,
                pattern: "3-2".to_string(),
            },
        ]
    }

    /// Check the template is internally consistent and parse its pattern
    pub fn validate(&self) -> CoreResult<LayoutPattern> {
        let pattern: LayoutPattern = self.pattern.parse()?;
        if pattern.seats_per_row() != self.seats_per_row {
            return Err(SeatError::Configuration(format!(
                "{} layout '{}' has {} seats per row but seats_per_row is {}",
                self.class,
                self.pattern,
                pattern.seats_per_row(),
                self.seats_per_row
            )));
        }
        if self.rows == 0 || self.coach_count == 0 {
            return Err(SeatError::Configuration(format!(
                "{} layout needs at least one row and one coach",
                self.class
            )));
        }
        if self.seats_per_row > 26 {
            return Err(SeatError::Configuration(format!(
                "{} layout has {} seats per row, at most 26 column letters exist",
                self.class, self.seats_per_row
            )));
        }
        Ok(pattern)
    }
}

/// Parsed "left-right" grouping of seats around the aisle, e.g. `2-1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutPattern {
    pub left: u32,
    pub right: u32,
}

impl LayoutPattern {
    pub fn seats_per_row(&self) -> u32 {
        self.left + self.right
    }

    /// Derive the seat type for a 1-based position within the row
    pub fn seat_type(&self, position: u32) -> SeatType {
        // Index 0 of each block is the window side for the left block and
        // the aisle side for the right block.
        let (block, other, index) = if position <= self.left {
            (self.left, self.right, position - 1)
        } else {
            (self.right, self.left, position - self.left - 1)
        };

        if block == 1 {
            return if other == 1 { SeatType::Window } else { SeatType::Single };
        }

        let (window_index, aisle_index) = if position <= self.left {
            (0, block - 1)
        } else {
            (block - 1, 0)
        };

        if index == window_index {
            SeatType::Window
        } else if index == aisle_index {
            SeatType::Aisle
        } else {
            SeatType::Middle
        }
    }
}

impl std::str::FromStr for LayoutPattern {
    type Err = SeatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || SeatError::Configuration(format!("layout pattern '{}' must look like '2-2'", s));
        let (left, right) = s.trim().split_once('-').ok_or_else(invalid)?;
        let left: u32 = left.trim().parse().map_err(|_| invalid())?;
        let right: u32 = right.trim().parse().map_err(|_| invalid())?;
        if left == 0 || right == 0 {
            return Err(invalid());
        }
        Ok(Self { left, right })
    }
}

/// Column letter for a 1-based seat position (1 → A)
pub fn column_letter(position: u32) -> char {
    char::from_u32('A' as u32 + position - 1).unwrap_or('?')
}
