//! Job vacancies.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::fields::{at_least, check_not_emptied, contains_ignore_case, set_text, Patch, Required};
use super::{Listing, ValidationError};
use crate::store::Resource;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vacancy {
    pub id: u64,
    pub title: String,
    pub company: String,
    pub description: String,
    pub salary: Option<f64>,
    pub date_created: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewVacancy {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub salary: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VacancyUpdate {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub salary: Patch<f64>,
}

/// `category` matches against the company name; `company` is accepted as
/// an alias.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VacancyFilter {
    #[serde(alias = "company")]
    pub category: Option<String>,
    pub min_salary: Option<f64>,
}

impl Resource for Vacancy {
    const COLLECTION: &'static str = "vacancies";

    fn id(&self) -> u64 {
        self.id
    }
}

impl Listing for Vacancy {
    const PATH: &'static str = "vacancies";
    const PLURAL_KEY: &'static str = "vacancies";
    const SINGULAR_KEY: &'static str = "vacancy";
    const LABEL: &'static str = "Vacancy";

    type Create = NewVacancy;
    type Update = VacancyUpdate;
    type Filter = VacancyFilter;

    fn build(id: u64, input: NewVacancy, now: DateTime<Utc>) -> Result<Self, ValidationError> {
        let mut required = Required::new();
        let title = required.take("title", input.title);
        let company = required.take("company", input.company);
        let description = required.take("description", input.description);
        required.finish()?;

        Ok(Self {
            id,
            title,
            company,
            description,
            salary: input.salary,
            date_created: now,
        })
    }

    fn check_update(update: &VacancyUpdate) -> Result<(), ValidationError> {
        check_not_emptied("title", &update.title)?;
        check_not_emptied("company", &update.company)?;
        check_not_emptied("description", &update.description)
    }

    fn apply_update(&mut self, update: VacancyUpdate) {
        set_text(&mut self.title, update.title);
        set_text(&mut self.company, update.company);
        set_text(&mut self.description, update.description);
        update.salary.apply_to(&mut self.salary);
    }

    fn matches(&self, filter: &VacancyFilter) -> bool {
        filter
            .category
            .as_deref()
            .map_or(true, |c| contains_ignore_case(&self.company, c))
            && at_least(self.salary, filter.min_salary)
    }
}
