use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use crate::SeatError;

/// Travel class of a coach
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CoachClass {
    #[serde(rename = "First Class", alias = "FIRST_CLASS", alias = "first class")]
    FirstClass,
    #[serde(rename = "Business", alias = "BUSINESS", alias = "business")]
    Business,
    #[serde(rename = "Economy", alias = "ECONOMY", alias = "economy")]
    Economy,
}

impl CoachClass {
    pub const ALL: [CoachClass; 3] = [CoachClass::FirstClass, CoachClass::Business, CoachClass::Economy];

    pub fn as_str(&self) -> &'static str {
        match self {
            CoachClass::FirstClass => "First Class",
            CoachClass::Business => "Business",
            CoachClass::Economy => "Economy",
        }
    }
}

impl fmt::Display for CoachClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CoachClass {
    type Err = SeatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace(['_', '-'], " ").as_str() {
            "first class" | "first" => Ok(CoachClass::FirstClass),
            "business" => Ok(CoachClass::Business),
            "economy" => Ok(CoachClass::Economy),
            other => Err(SeatError::InvalidRequest(format!("unknown coach class '{}'", other))),
        }
    }
}

/// Position of a seat relative to windows and the aisle
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum SeatType {
    Window,
    Aisle,
    Middle,
    Single,
}

impl SeatType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SeatType::Window => "window",
            SeatType::Aisle => "aisle",
            SeatType::Middle => "middle",
            SeatType::Single => "single",
        }
    }
}

/// Seat lifecycle status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum SeatStatus {
    Available,
    Reserved,
    Occupied,
    Maintenance,
    Blocked,
}

impl SeatStatus {
    pub const ALL: [SeatStatus; 5] = [
        SeatStatus::Available,
        SeatStatus::Reserved,
        SeatStatus::Occupied,
        SeatStatus::Maintenance,
        SeatStatus::Blocked,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SeatStatus::Available => "available",
            SeatStatus::Reserved => "reserved",
            SeatStatus::Occupied => "occupied",
            SeatStatus::Maintenance => "maintenance",
            SeatStatus::Blocked => "blocked",
        }
    }

    /// Whether the state machine permits moving from `self` to `to`.
    ///
    /// `Reserved` is entered only from `Available` and left only back to
    /// `Available`; the reservation ledger owns both edges.
    pub fn can_transition_to(&self, to: SeatStatus) -> bool {
        use SeatStatus::*;
        match (*self, to) {
            (Available, Reserved | Occupied | Maintenance | Blocked) => true,
            (Reserved, Available) => true,
            (Reserved, Occupied | Maintenance | Blocked | Reserved) => false,
            (Occupied, Available | Maintenance | Blocked) => true,
            (Maintenance, Available | Blocked) => true,
            (Blocked, Available | Maintenance) => true,
            (Available, Available) | (Occupied, Occupied | Reserved) => false,
            (Maintenance, Maintenance | Reserved | Occupied) => false,
            (Blocked, Blocked | Reserved | Occupied) => false,
        }
    }
}

impl fmt::Display for SeatStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Amenity tags attached to a seat
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "kebab-case")]
pub enum SeatFeature {
    ExtraLegroom,
    PowerOutlet,
    UsbPort,
    Headrest,
    Footrest,
    Screen,
}

/// Preferences a passenger party can express when asking for seats
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SeatPreference {
    Window,
    Aisle,
    ExtraLegroom,
    PowerOutlet,
}

/// Seat identity within a train: coach number plus seat code, e.g. `3-12B`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SeatId {
    pub coach: u32,
    pub code: String,
}

impl SeatId {
    pub fn new(coach: u32, code: impl Into<String>) -> Self {
        Self { coach, code: code.into() }
    }
}

impl fmt::Display for SeatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.coach, self.code)
    }
}

impl FromStr for SeatId {
    type Err = SeatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (coach, code) = s
            .split_once('-')
            .ok_or_else(|| SeatError::InvalidRequest(format!("seat id '{}' must look like <coach>-<seat>", s)))?;
        let coach = coach
            .trim()
            .parse::<u32>()
            .map_err(|_| SeatError::InvalidRequest(format!("seat id '{}' has a non-numeric coach", s)))?;
        let code = code.trim().to_ascii_uppercase();
        if code.is_empty() {
            return Err(SeatError::InvalidRequest(format!("seat id '{}' has an empty seat code", s)));
        }
        Ok(SeatId { coach, code })
    }
}

impl Serialize for SeatId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for SeatId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// A single seat record as seen on one travel date
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Seat {
    pub train_id: String,
    pub coach: u32,
    pub coach_label: String,
    pub code: String,
    pub row: u32,
    pub column: char,
    pub class: CoachClass,
    pub seat_type: SeatType,
    pub status: SeatStatus,
    pub price_adjustment: f64,
    pub features: BTreeSet<SeatFeature>,
}

impl Seat {
    pub fn id(&self) -> SeatId {
        SeatId::new(self.coach, self.code.clone())
    }

    /// 1-based position of the seat within its row
    pub fn position(&self) -> u32 {
        (self.column as u32).saturating_sub('A' as u32) + 1
    }

    pub fn has_feature(&self, feature: SeatFeature) -> bool {
        self.features.contains(&feature)
    }
}
