pub mod layout;
pub mod pricing;
pub mod registry;
pub mod seat_map;
pub mod train;

pub use layout::{ClassLayout, LayoutPattern};
pub use pricing::SeatPricing;
pub use registry::SeatRegistry;
pub use seat_map::{Coach, SeatMap, SeatMapBuilder};
pub use train::TrainInfo;

use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::info;
use railseat_core::{CoreResult, SeatError};

/// A train's timetable entry together with its seat registry
pub struct TrainEntry {
    pub info: TrainInfo,
    pub registry: SeatRegistry,
}

/// All trains known to this allocator, each built exactly once
pub struct TrainCatalog {
    trains: BTreeMap<String, Arc<TrainEntry>>,
    pricing: SeatPricing,
}

impl TrainCatalog {
    /// Build seat maps for every train from the shared layout table
    pub fn build(trains: Vec<TrainInfo>, layouts: &[ClassLayout], pricing: SeatPricing) -> CoreResult<Self> {
        let builder = SeatMapBuilder::new(pricing.clone());
        let mut catalog = BTreeMap::new();

        for info in trains {
            info.validate()?;
            if catalog.contains_key(&info.train_number) {
                return Err(SeatError::Configuration(format!(
                    "train {} is configured twice",
                    info.train_number
                )));
            }
            let map = builder.build(&info.train_number, &info.available_classes, layouts)?;
            info!(train = %info.train_number, seats = map.seats.len(), "Registered train");
            let registry = SeatRegistry::new(map);
            catalog.insert(info.train_number.clone(), Arc::new(TrainEntry { info, registry }));
        }

        Ok(Self { trains: catalog, pricing })
    }

    pub fn get(&self, train_id: &str) -> CoreResult<Arc<TrainEntry>> {
        self.trains
            .get(train_id)
            .cloned()
            .ok_or_else(|| SeatError::NotFound(format!("train {}", train_id)))
    }

    pub fn list(&self) -> Vec<TrainInfo> {
        self.trains.values().map(|entry| entry.info.clone()).collect()
    }

    pub fn train_ids(&self) -> impl Iterator<Item = &str> {
        self.trains.keys().map(String::as_str)
    }

    pub fn pricing(&self) -> &SeatPricing {
        &self.pricing
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_rejects_duplicate_trains() {
        let mut trains = TrainInfo::standard();
        trains.push(trains[0].clone());
        let result = TrainCatalog::build(trains, &ClassLayout::standard(), SeatPricing::default());
        assert!(matches!(result, Err(SeatError::Configuration(_))));
    }

    #[test]
    fn test_catalog_lookup() {
        let catalog = TrainCatalog::build(TrainInfo::standard(), &ClassLayout::standard(), SeatPricing::default()).unwrap();
        assert_eq!(catalog.list().len(), 3);
        assert_eq!(catalog.get("TRN002").unwrap().registry.coaches().len(), 4);
        assert!(matches!(catalog.get("TRN999"), Err(SeatError::NotFound(_))));
    }
}
