/// Shared data structures for the application state
///
/// These structs mirror the JSON contract of the photographies backend.
/// The client only ever holds read-only copies; the printed fields change
/// exclusively through the confirm-printed round trip.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single uploaded photograph with its print-tracking metadata
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Photography {
    /// Backend identity
    pub id: String,
    /// Short display code printed next to the photo
    pub code: String,
    /// Where the full-size image lives
    pub url: String,
    /// Pixel dimensions as reported by the backend
    pub width: u32,
    pub height: u32,
    /// Storage provider identifier
    pub public_id: String,
    /// When the photo was last confirmed as printed (None = never)
    #[serde(rename = "printedAt", default)]
    pub printed_at: Option<DateTime<Utc>>,
    /// How many copies were printed in total
    #[serde(rename = "printedQuantity", default)]
    pub printed_quantity: Option<u32>,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

impl Photography {
    /// Whether this photo has ever been confirmed as printed
    pub fn is_printed(&self) -> bool {
        self.printed_at.is_some()
    }
}

/// One entry of a confirm-printed request: how many copies of a photo
/// were just printed. Quantities are aggregated per id before sending.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PrintItem {
    pub id: String,
    pub quantity: u32,
}
