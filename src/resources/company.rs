//! Company profiles.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::fields::{at_least, check_not_emptied, contains_ignore_case, set_text, Patch, Required};
use super::{Listing, ValidationError};
use crate::store::Resource;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    pub id: u64,
    pub name: String,
    pub category: String,
    pub description: String,
    pub rating: Option<f64>,
    pub date_created: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewCompany {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub rating: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CompanyUpdate {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub rating: Patch<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyFilter {
    pub category: Option<String>,
    pub min_rating: Option<f64>,
}

impl Resource for Company {
    const COLLECTION: &'static str = "companies";

    fn id(&self) -> u64 {
        self.id
    }
}

impl Listing for Company {
    const PATH: &'static str = "companies";
    const PLURAL_KEY: &'static str = "companies";
    const SINGULAR_KEY: &'static str = "company";
    const LABEL: &'static str = "Company";

    type Create = NewCompany;
    type Update = CompanyUpdate;
    type Filter = CompanyFilter;

    fn build(id: u64, input: NewCompany, now: DateTime<Utc>) -> Result<Self, ValidationError> {
        let mut required = Required::new();
        let name = required.take("name", input.name);
        let category = required.take("category", input.category);
        let description = required.take("description", input.description);
        required.finish()?;

        Ok(Self {
            id,
            name,
            category,
            description,
            rating: input.rating,
            date_created: now,
        })
    }

    fn check_update(update: &CompanyUpdate) -> Result<(), ValidationError> {
        check_not_emptied("name", &update.name)?;
        check_not_emptied("category", &update.category)?;
        check_not_emptied("description", &update.description)
    }

    fn apply_update(&mut self, update: CompanyUpdate) {
        set_text(&mut self.name, update.name);
        set_text(&mut self.category, update.category);
        set_text(&mut self.description, update.description);
        update.rating.apply_to(&mut self.rating);
    }

    fn matches(&self, filter: &CompanyFilter) -> bool {
        filter
            .category
            .as_deref()
            .map_or(true, |c| contains_ignore_case(&self.category, c))
            && at_least(self.rating, filter.min_rating)
    }
}
