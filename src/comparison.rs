use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::models::{InspectionPhoto, InspectionWithPhotos};

/// Photos taken at the same position during pickup and return
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhotoPair {
    pub position: String,
    pub pickup: Vec<InspectionPhoto>,
    #[serde(rename = "return")]
    pub return_photos: Vec<InspectionPhoto>,
    /// Damage noted on return that was not noted at pickup
    pub new_damage: bool,
}

/// Differences between the pickup and return inspections of a booking
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InspectionComparison {
    pub booking_id: String,
    pub pickup_inspection_id: String,
    pub return_inspection_id: String,
    pub pairs: Vec<PhotoPair>,
    /// Positions with new damage
    pub new_damage: Vec<String>,
    /// Positions photographed at pickup but not on return
    pub missing_on_return: Vec<String>,
    /// Positions photographed on return but not at pickup
    pub missing_on_pickup: Vec<String>,
    /// Return mileage minus pickup mileage, when both were recorded
    pub mileage_driven: Option<i32>,
    /// Return fuel level minus pickup fuel level, in percentage points
    pub fuel_delta: Option<i32>,
}

impl InspectionComparison {
    pub fn has_new_damage(&self) -> bool {
        !self.new_damage.is_empty()
    }
}

/// Positions are matched ignoring case and surrounding whitespace
fn position_key(position: &str) -> String {
    position.trim().to_lowercase()
}

/// Pairs pickup and return photos by position and reports what changed
pub fn compare_inspections(pickup: &InspectionWithPhotos, ret: &InspectionWithPhotos) -> InspectionComparison {
    let mut by_position: BTreeMap<String, (Vec<InspectionPhoto>, Vec<InspectionPhoto>)> = BTreeMap::new();
    for photo in &pickup.photos {
        by_position.entry(position_key(&photo.get_position())).or_default().0.push(photo.clone());
    }
    for photo in &ret.photos {
        by_position.entry(position_key(&photo.get_position())).or_default().1.push(photo.clone());
    }

    let mut pairs = Vec::with_capacity(by_position.len());
    let mut new_damage = Vec::new();
    let mut missing_on_return = Vec::new();
    let mut missing_on_pickup = Vec::new();

    for (position, (pickup_photos, return_photos)) in by_position {
        let damaged_before = pickup_photos.iter().any(InspectionPhoto::get_damage_noted);
        let damaged_after = return_photos.iter().any(InspectionPhoto::get_damage_noted);
        let is_new = damaged_after && !damaged_before;

        if is_new {
            new_damage.push(position.clone());
        }
        if return_photos.is_empty() {
            missing_on_return.push(position.clone());
        }
        if pickup_photos.is_empty() {
            missing_on_pickup.push(position.clone());
        }

        pairs.push(PhotoPair {
            position,
            pickup: pickup_photos,
            return_photos,
            new_damage: is_new,
        });
    }

    let mileage_driven = match (pickup.inspection.get_mileage(), ret.inspection.get_mileage()) {
        (Some(before), Some(after)) => Some(after - before),
        _ => None,
    };
    let fuel_delta = match (pickup.inspection.get_fuel_level(), ret.inspection.get_fuel_level()) {
        (Some(before), Some(after)) => Some(after - before),
        _ => None,
    };

    InspectionComparison {
        booking_id: pickup.inspection.get_booking_id(),
        pickup_inspection_id: pickup.inspection.get_id(),
        return_inspection_id: ret.inspection.get_id(),
        pairs,
        new_damage,
        missing_on_return,
        missing_on_pickup,
        mileage_driven,
        fuel_delta,
    }
}
