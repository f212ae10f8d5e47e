//! Real-estate listings.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::fields::{at_least, check_not_emptied, eq_ignore_case, set_text, Patch, Required};
use super::{Listing, ValidationError};
use crate::store::Resource;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RealEstate {
    pub id: u64,
    /// Property kind, e.g. "apartment" or "house"
    #[serde(rename = "type")]
    pub kind: String,
    pub title: String,
    pub description: String,
    pub price: Option<f64>,
    pub location: Option<String>,
    pub date_created: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewRealEstate {
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub location: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RealEstateUpdate {
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub price: Patch<f64>,
    #[serde(default)]
    pub location: Patch<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RealEstateFilter {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub min_price: Option<f64>,
}

impl Resource for RealEstate {
    const COLLECTION: &'static str = "real-estate";

    fn id(&self) -> u64 {
        self.id
    }
}

impl Listing for RealEstate {
    const PATH: &'static str = "real-estate";
    const PLURAL_KEY: &'static str = "realEstate";
    const SINGULAR_KEY: &'static str = "realEstate";
    const LABEL: &'static str = "Real estate listing";

    type Create = NewRealEstate;
    type Update = RealEstateUpdate;
    type Filter = RealEstateFilter;

    fn build(id: u64, input: NewRealEstate, now: DateTime<Utc>) -> Result<Self, ValidationError> {
        let mut required = Required::new();
        let kind = required.take("type", input.kind);
        let title = required.take("title", input.title);
        let description = required.take("description", input.description);
        required.finish()?;

        Ok(Self {
            id,
            kind,
            title,
            description,
            price: input.price,
            location: input.location,
            date_created: now,
        })
    }

    fn check_update(update: &RealEstateUpdate) -> Result<(), ValidationError> {
        check_not_emptied("type", &update.kind)?;
        check_not_emptied("title", &update.title)?;
        check_not_emptied("description", &update.description)
    }

    fn apply_update(&mut self, update: RealEstateUpdate) {
        set_text(&mut self.kind, update.kind);
        set_text(&mut self.title, update.title);
        set_text(&mut self.description, update.description);
        update.price.apply_to(&mut self.price);
        update.location.apply_to(&mut self.location);
    }

    /// `type` is an exact match, ignoring case
    fn matches(&self, filter: &RealEstateFilter) -> bool {
        filter
            .kind
            .as_deref()
            .map_or(true, |k| eq_ignore_case(&self.kind, k))
            && at_least(self.price, filter.min_price)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn flat() -> RealEstate {
        let input: NewRealEstate = serde_json::from_value(json!({
            "type": "Apartment",
            "title": "Two rooms",
            "description": "Near the park",
            "price": 120000,
            "location": "Riverside"
        }))
        .unwrap();
        RealEstate::build(1, input, Utc::now()).unwrap()
    }

    #[test]
    fn test_type_serializes_under_its_own_name() {
        let value = serde_json::to_value(flat()).unwrap();
        assert_eq!(value["type"], "Apartment");
        assert!(value.get("kind").is_none());
    }

    #[test]
    fn test_type_filter_is_exact_ignoring_case() {
        let listing = flat();
        let exact = RealEstateFilter {
            kind: Some("apartment".into()),
            ..Default::default()
        };
        let partial = RealEstateFilter {
            kind: Some("apart".into()),
            ..Default::default()
        };

        assert!(listing.matches(&exact));
        assert!(!listing.matches(&partial));
    }

    #[test]
    fn test_update_location_and_price_independently() {
        let mut listing = flat();
        let update: RealEstateUpdate =
            serde_json::from_value(json!({"location": null})).unwrap();
        listing.apply_update(update);

        assert_eq!(listing.location, None);
        assert_eq!(listing.price, Some(120000.0));
    }

    #[test]
    fn test_type_filter_ignores_non_ascii_case() {
        let mut listing = flat();
        listing.kind = "Квартира".to_string();
        let filter = RealEstateFilter {
            kind: Some("квартира".into()),
            ..Default::default()
        };
        assert!(listing.matches(&filter));
    }

    #[test]
    fn test_min_price_filter() {
        let listing = flat();
        let filter = RealEstateFilter {
            min_price: Some(200000.0),
            ..Default::default()
        };
        assert!(!listing.matches(&filter));
    }
}
