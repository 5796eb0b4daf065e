pub mod health;
pub mod reservations;
pub mod trains;

use chrono::{NaiveDate, Utc};
use serde::Deserialize;

/// `?travel_date=YYYY-MM-DD`, defaulting to today (UTC)
#[derive(Debug, Deserialize)]
pub struct TravelDateQuery {
    pub travel_date: Option<NaiveDate>,
}

impl TravelDateQuery {
    pub fn date(&self) -> NaiveDate {
        self.travel_date.unwrap_or_else(|| Utc::now().date_naive())
    }
}
