//! Classified ads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::fields::{at_least, check_not_emptied, contains_ignore_case, set_text, Patch, Required};
use super::{Listing, ValidationError};
use crate::store::Resource;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Classified {
    pub id: u64,
    pub title: String,
    pub description: String,
    pub category: String,
    pub price: Option<f64>,
    pub date_created: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewClassified {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClassifiedUpdate {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub price: Patch<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassifiedFilter {
    pub category: Option<String>,
    pub min_price: Option<f64>,
}

impl Resource for Classified {
    const COLLECTION: &'static str = "classifieds";

    fn id(&self) -> u64 {
        self.id
    }
}

impl Listing for Classified {
    const PATH: &'static str = "classifieds";
    const PLURAL_KEY: &'static str = "classifieds";
    const SINGULAR_KEY: &'static str = "classified";
    const LABEL: &'static str = "Classified";
    const CREATE_REQUIRES_SESSION: bool = true;

    type Create = NewClassified;
    type Update = ClassifiedUpdate;
    type Filter = ClassifiedFilter;

    fn build(id: u64, input: NewClassified, now: DateTime<Utc>) -> Result<Self, ValidationError> {
        let mut required = Required::new();
        let title = required.take("title", input.title);
        let description = required.take("description", input.description);
        let category = required.take("category", input.category);
        required.finish()?;

        Ok(Self {
            id,
            title,
            description,
            category,
            price: input.price,
            date_created: now,
        })
    }

    fn check_update(update: &ClassifiedUpdate) -> Result<(), ValidationError> {
        check_not_emptied("title", &update.title)?;
        check_not_emptied("description", &update.description)?;
        check_not_emptied("category", &update.category)
    }

    fn apply_update(&mut self, update: ClassifiedUpdate) {
        set_text(&mut self.title, update.title);
        set_text(&mut self.description, update.description);
        set_text(&mut self.category, update.category);
        update.price.apply_to(&mut self.price);
    }

    fn matches(&self, filter: &ClassifiedFilter) -> bool {
        filter
            .category
            .as_deref()
            .map_or(true, |c| contains_ignore_case(&self.category, c))
            && at_least(self.price, filter.min_price)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn bike() -> Classified {
        let input: NewClassified = serde_json::from_value(json!({
            "title": "Bike",
            "description": "Red road bike",
            "category": "Sports",
            "price": 100
        }))
        .unwrap();
        Classified::build(1, input, Utc::now()).unwrap()
    }

    #[test]
    fn test_build_requires_all_text_fields() {
        let input = NewClassified {
            title: Some("Bike".into()),
            ..Default::default()
        };
        let err = Classified::build(1, input, Utc::now()).unwrap_err();
        assert_eq!(err.0, "Title, description and category are required");
    }

    #[test]
    fn test_zero_price_is_kept_on_create() {
        let input = NewClassified {
            title: Some("Free chair".into()),
            description: Some("Pick up only".into()),
            category: Some("Furniture".into()),
            price: Some(0.0),
        };
        let ad = Classified::build(2, input, Utc::now()).unwrap();
        assert_eq!(ad.price, Some(0.0));
    }

    #[test]
    fn test_update_keeps_omitted_price() {
        let mut ad = bike();
        let update: ClassifiedUpdate = serde_json::from_value(json!({"title": "New"})).unwrap();
        ad.apply_update(update);

        assert_eq!(ad.title, "New");
        assert_eq!(ad.price, Some(100.0));
    }

    #[test]
    fn test_update_sets_zero_price() {
        let mut ad = bike();
        let update: ClassifiedUpdate = serde_json::from_value(json!({"price": 0})).unwrap();
        ad.apply_update(update);

        assert_eq!(ad.price, Some(0.0));
        assert_eq!(ad.title, "Bike");
    }

    #[test]
    fn test_update_rejects_emptied_title() {
        let update: ClassifiedUpdate = serde_json::from_value(json!({"title": ""})).unwrap();
        assert!(Classified::check_update(&update).is_err());
    }

    #[test]
    fn test_filter_by_category_and_price() {
        let ad = bike();
        let by_category = ClassifiedFilter {
            category: Some("sport".into()),
            ..Default::default()
        };
        let too_pricey = ClassifiedFilter {
            min_price: Some(150.0),
            ..Default::default()
        };

        assert!(ad.matches(&ClassifiedFilter::default()));
        assert!(ad.matches(&by_category));
        assert!(!ad.matches(&too_pricey));
    }
}
