use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use railseat_core::{CoachClass, CoreResult, SeatError};

/// Timetable entry for a train service
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TrainInfo {
    pub train_number: String,
    pub name: String,
    pub source: String,
    pub destination: String,
    pub departure_time: String,
    pub arrival_time: String,
    pub available_classes: Vec<CoachClass>,
    /// Base fare per passenger for each offered class
    pub base_price: BTreeMap<CoachClass, f64>,
}

impl TrainInfo {
    pub fn offers(&self, class: CoachClass) -> bool {
        self.available_classes.contains(&class)
    }

    pub fn base_fare(&self, class: CoachClass) -> CoreResult<f64> {
        self.base_price.get(&class).copied().ok_or_else(|| {
            SeatError::InvalidRequest(format!(
                "train {} does not offer {}",
                self.train_number, class
            ))
        })
    }

    pub fn validate(&self) -> CoreResult<()> {
        if self.train_number.trim().is_empty() {
            return Err(SeatError::Configuration("train number must not be empty".to_string()));
        }
        if self.available_classes.is_empty() {
            return Err(SeatError::Configuration(format!(
                "train {} offers no classes",
                self.train_number
            )));
        }
        for class in &self.available_classes {
            if !self.base_price.contains_key(class) {
                return Err(SeatError::Configuration(format!(
                    "train {} offers {} but has no base price for it",
                    self.train_number, class
                )));
            }
        }
        Ok(())
    }

    /// The three services the booking desk has always sold
    pub fn standard() -> Vec<TrainInfo> {
        use CoachClass::*;
        let train = |number: &str, name: &str, source: &str, destination: &str, dep: &str, arr: &str, fares: &[(CoachClass, f64)]| TrainInfo {
            train_number: number.to_string(),
            name: name.to_string(),
            source: source.to_string(),
            destination: destination.to_string(),
            departure_time: dep.to_string(),
            arrival_time: arr.to_string(),
            available_classes: fares.iter().map(|(class, _)| *class).collect(),
            base_price: fares.iter().copied().collect(),
        };

        vec![
            train("TRN001", "Express 505", "New York", "Washington DC", "08:30", "12:00",
                &[(FirstClass, 150.0), (Business, 100.0), (Economy, 50.0)]),
            train("TRN002", "Coastal Link", "Boston", "New York", "10:15", "13:45",
                &[(FirstClass, 120.0), (Economy, 45.0)]),
            train("TRN003", "Western Eagle", "Chicago", "Denver", "14:20", "22:35",
                &[(FirstClass, 280.0), (Business, 180.0), (Economy, 120.0)]),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_trains_are_valid() {
        for train in TrainInfo::standard() {
            train.validate().unwrap();
        }
        let coastal = &TrainInfo::standard()[1];
        assert!(!coastal.offers(CoachClass::Business));
        assert!(coastal.base_fare(CoachClass::Business).is_err());
    }

    #[test]
    fn test_missing_base_price_is_configuration_error() {
        let mut train = TrainInfo::standard().remove(0);
        train.base_price.remove(&CoachClass::Economy);
        assert!(matches!(train.validate(), Err(SeatError::Configuration(_))));
    }
}
