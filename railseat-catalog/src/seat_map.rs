use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::debug;
use railseat_core::{CoachClass, CoreResult, Seat, SeatError, SeatFeature, SeatStatus, SeatType};

use crate::layout::{column_letter, ClassLayout};
use crate::pricing::SeatPricing;

/// Descriptor of one physical coach
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Coach {
    pub number: u32,
    pub label: String,
    pub class: CoachClass,
    pub rows: u32,
    pub seats_per_row: u32,
    pub layout: String,
}

/// Immutable shape of a train: its coaches and every seat in them
#[derive(Debug, Clone, PartialEq)]
pub struct SeatMap {
    pub train_id: String,
    pub coaches: Vec<Coach>,
    pub seats: Vec<Seat>,
}

/// Generates seat inventories from class layout templates
pub struct SeatMapBuilder {
    pricing: SeatPricing,
}

impl SeatMapBuilder {
    pub fn new(pricing: SeatPricing) -> Self {
        Self { pricing }
    }

    /// Build the seat map for `train_id` covering every class in `classes`.
    ///
    /// Coaches are numbered from 1 in the order the classes are given,
    /// continuing across classes.
    pub fn build(&self, train_id: &str, classes: &[CoachClass], layouts: &[ClassLayout]) -> CoreResult<SeatMap> {
        let mut coaches = Vec::new();
        let mut seats = Vec::new();
        let mut next_coach = 1;

        for class in classes {
            let layout = layouts.iter().find(|l| l.class == *class).ok_or_else(|| {
                SeatError::Configuration(format!("train {} offers {} but no layout exists for it", train_id, class))
            })?;
            let pattern = layout.validate()?;

            for _ in 0..layout.coach_count {
                let number = next_coach;
                next_coach += 1;
                let label = format!("{}{}", layout.coach_prefix, number);

                for row in 1..=layout.rows {
                    for position in 1..=layout.seats_per_row {
                        let column = column_letter(position);
                        let seat_type = pattern.seat_type(position);
                        seats.push(Seat {
                            train_id: train_id.to_string(),
                            coach: number,
                            coach_label: label.clone(),
                            code: format!("{}{}", row, column),
                            row,
                            column,
                            class: *class,
                            seat_type,
                            status: SeatStatus::Available,
                            price_adjustment: self.pricing.adjustment(*class, seat_type),
                            features: seat_features(*class, seat_type, row),
                        });
                    }
                }

                coaches.push(Coach {
                    number,
                    label,
                    class: *class,
                    rows: layout.rows,
                    seats_per_row: layout.seats_per_row,
                    layout: layout.pattern.clone(),
                });
            }
        }

        debug!(train_id, coaches = coaches.len(), seats = seats.len(), "Seat map built");

        Ok(SeatMap {
            train_id: train_id.to_string(),
            coaches,
            seats,
        })
    }
}

impl Default for SeatMapBuilder {
    fn default() -> Self {
        Self::new(SeatPricing::default())
    }
}

fn seat_features(class: CoachClass, seat_type: SeatType, row: u32) -> BTreeSet<SeatFeature> {
    let mut features = BTreeSet::new();
    if row == 1 {
        features.insert(SeatFeature::ExtraLegroom);
    }
    match class {
        CoachClass::FirstClass => {
            features.insert(SeatFeature::PowerOutlet);
            features.insert(SeatFeature::Headrest);
            features.insert(SeatFeature::Footrest);
            features.insert(SeatFeature::Screen);
        }
        CoachClass::Business => {
            features.insert(SeatFeature::PowerOutlet);
        }
        CoachClass::Economy => {}
    }
    if !(class == CoachClass::Economy && seat_type == SeatType::Middle) {
        features.insert(SeatFeature::UsbPort);
    }
    features
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_classes() -> Vec<CoachClass> {
        CoachClass::ALL.to_vec()
    }

    #[test]
    fn test_build_standard_map() {
        let map = SeatMapBuilder::default()
            .build("TRN001", &all_classes(), &ClassLayout::standard())
            .unwrap();

        // 1 first + 2 business + 3 economy coaches
        assert_eq!(map.coaches.len(), 6);
        let numbers: Vec<u32> = map.coaches.iter().map(|c| c.number).collect();
        assert_eq!(numbers, vec![1, 2, 3, 4, 5, 6]);
        assert_eq!(map.coaches[0].label, "F1");
        assert_eq!(map.coaches[1].label, "B2");
        assert_eq!(map.coaches[5].label, "E6");
        assert_eq!(map.seats.len(), 8 * 3 + 2 * 10 * 4 + 3 * 16 * 5);

        let first = &map.seats[0];
        assert_eq!(first.code, "1A");
        assert_eq!(first.seat_type, SeatType::Window);
        assert_eq!(first.price_adjustment, 25.0);
        assert!(first.has_feature(SeatFeature::ExtraLegroom));
        assert!(first.has_feature(SeatFeature::Screen));
        assert!(first.has_feature(SeatFeature::UsbPort));

        let single = map.seats.iter().find(|s| s.coach == 1 && s.code == "2C").unwrap();
        assert_eq!(single.seat_type, SeatType::Single);
        assert!(!single.has_feature(SeatFeature::ExtraLegroom));
    }

    #[test]
    fn test_economy_middle_has_no_usb() {
        let map = SeatMapBuilder::default()
            .build("TRN001", &[CoachClass::Economy], &ClassLayout::standard())
            .unwrap();
        let middle = map.seats.iter().find(|s| s.code == "3B").unwrap();
        assert_eq!(middle.seat_type, SeatType::Middle);
        assert!(!middle.has_feature(SeatFeature::UsbPort));
        assert!(!middle.has_feature(SeatFeature::PowerOutlet));
        assert_eq!(map.coaches[0].number, 1);
    }

    #[test]
    fn test_identical_layouts_build_identical_maps() {
        let builder = SeatMapBuilder::default();
        let a = builder.build("TRN003", &all_classes(), &ClassLayout::standard()).unwrap();
        let b = builder.build("TRN003", &all_classes(), &ClassLayout::standard()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_missing_layout_is_configuration_error() {
        let layouts: Vec<ClassLayout> = ClassLayout::standard()
            .into_iter()
            .filter(|l| l.class != CoachClass::Business)
            .collect();
        let result = SeatMapBuilder::default().build("TRN001", &all_classes(), &layouts);
        assert!(matches!(result, Err(SeatError::Configuration(_))));
    }

    #[test]
    fn test_fare_uses_seat_adjustments() {
        let pricing = SeatPricing::default();
        let map = SeatMapBuilder::new(pricing.clone())
            .build("TRN001", &[CoachClass::Business], &ClassLayout::standard())
            .unwrap();
        // 1A window (+15) and 1B aisle (+10) on a 100.0 base
        let fare = pricing.fare(100.0, &map.seats[0..2]);
        assert_eq!(fare, 225.0);
    }
}
