//! Label scanning stub.
//!
//! There is no OCR engine behind this yet: the payload is searched for a
//! couple of keywords and a canned result is returned.

use chrono::{Days, NaiveDate};

/// What was read off an image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OcrResult {
    pub name: String,
    pub quantity: i32,
    pub expiration_date: Option<NaiveDate>,
}

/// "Read" an item from a base64-encoded image.
///
/// Matching is case-sensitive on the raw payload.
#[must_use]
pub fn process_image(image_base64: &str, today: NaiveDate) -> OcrResult {
    let (name, shelf_life_days) = if image_base64.contains("milk") {
        ("Milk (OCR)", Some(10))
    } else if image_base64.contains("bread") {
        ("Bread (OCR)", Some(5))
    } else {
        ("Unknown Item (OCR)", None)
    };

    tracing::debug!(name, payload_len = image_base64.len(), "Processed image");

    OcrResult {
        name: name.to_owned(),
        quantity: 1,
        expiration_date: shelf_life_days.and_then(|days| today.checked_add_days(Days::new(days))),
    }
}
