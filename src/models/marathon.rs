// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Marathon update body.

use mongodb::bson::{doc, Bson, Document};
use serde::Deserialize;
use serde_json::Value;
use validator::Validate;

use crate::error::AppError;

/// The four fields `PUT /marathons/{id}` overwrites. Anything else in the
/// body is ignored.
///
/// Only `title` is checked. The others are stored as sent, whatever their
/// JSON type: clients post `distance` as kilometres or as a label like "10k".
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct MarathonUpdate {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[serde(default)]
    pub location: Option<Value>,
    #[serde(default)]
    pub distance: Option<Value>,
    #[serde(default)]
    pub description: Option<Value>,
}

fn field_to_bson(name: &str, value: Option<Value>) -> Result<Bson, AppError> {
    match value {
        Some(value) => mongodb::bson::to_bson(&value)
            .map_err(|e| AppError::BadRequest(format!("Invalid {}: {}", name, e))),
        None => Ok(Bson::Null),
    }
}

impl MarathonUpdate {
    /// Build the `$set` field map. Absent optional fields are set to null.
    pub fn into_patch(self) -> Result<Document, AppError> {
        Ok(doc! {
            "title": self.title,
            "location": field_to_bson("location", self.location)?,
            "distance": field_to_bson("distance", self.distance)?,
            "description": field_to_bson("description", self.description)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_patch_has_exactly_four_fields() {
        let update: MarathonUpdate = serde_json::from_value(json!({
            "title": "Spring Run",
            "location": "Palo Alto",
            "distance": 21.1,
            "description": "Half marathon",
            "email": "someone@else.com",
        }))
        .unwrap();

        let patch = update.into_patch().unwrap();
        let keys: Vec<&str> = patch.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["title", "location", "distance", "description"]);
        assert_eq!(patch.get_f64("distance").unwrap(), 21.1);
    }

    #[test]
    fn test_missing_optionals_become_null() {
        let update: MarathonUpdate = serde_json::from_value(json!({ "title": "Trail" })).unwrap();
        let patch = update.into_patch().unwrap();
        assert_eq!(patch.get("location"), Some(&Bson::Null));
        assert_eq!(patch.get("distance"), Some(&Bson::Null));
    }

    #[test]
    fn test_non_string_fields_kept_as_sent() {
        let update: MarathonUpdate = serde_json::from_value(json!({
            "title": "Trail",
            "location": 5,
            "description": { "terrain": "hills", "aid": [5, 10] },
        }))
        .unwrap();

        let patch = update.into_patch().unwrap();
        assert_eq!(patch.get("location"), Some(&Bson::Int64(5)));
        let description = patch.get_document("description").unwrap();
        assert_eq!(description.get_str("terrain").unwrap(), "hills");
        assert_eq!(description.get_array("aid").unwrap().len(), 2);
    }

    #[test]
    fn test_empty_title_fails_validation() {
        let update: MarathonUpdate = serde_json::from_value(json!({ "title": "" })).unwrap();
        assert!(update.validate().is_err());
    }
}
