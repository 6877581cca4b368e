use chrono::{Datelike, Local, NaiveDate};
use serde::{Deserialize, Serialize};

/// Property bag for constructing a [`Person`]. Required attributes are
/// plain fields; everything else is optional and absent by default.
#[derive(Debug, Clone)]
pub struct PersonProps {
    /// Store-assigned identifier; leave empty for a not-yet-persisted person
    pub id: Option<String>,
    pub name: String,
    pub birth_date: NaiveDate,
    pub gender: String,
    pub birth_place: Option<String>,
    pub province: Option<String>,
    pub municipality: Option<String>,
    pub commune: Option<String>,
    pub address: Option<String>,
    pub phone_number: Option<String>,
    pub baptism_date: Option<NaiveDate>,
    pub baptism_church: Option<String>,
}

impl Default for PersonProps {
    fn default() -> Self {
        Self {
            id: None,
            name: String::new(),
            birth_date: NaiveDate::default(),
            gender: String::new(),
            birth_place: None,
            province: None,
            municipality: None,
            commune: None,
            address: None,
            phone_number: None,
            baptism_date: None,
            baptism_church: None,
        }
    }
}

/// Domain model for an individual's biographical record, independent of
/// any scouting membership.
///
/// Absent optional attributes are `None`, never empty strings, so partial
/// storage mappings can omit them instead of overwriting with blanks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Person {
    pub id: String,
    pub name: String,
    pub birth_date: NaiveDate,
    pub gender: String,
    pub birth_place: Option<String>,
    pub province: Option<String>,
    pub municipality: Option<String>,
    pub commune: Option<String>,
    pub address: Option<String>,
    pub phone_number: Option<String>,
    pub baptism_date: Option<NaiveDate>,
    pub baptism_church: Option<String>,
}

impl Person {
    pub fn new(props: PersonProps) -> Self {
        Self {
            id: props.id.unwrap_or_default(),
            name: props.name,
            birth_date: props.birth_date,
            gender: props.gender,
            birth_place: props.birth_place,
            province: props.province,
            municipality: props.municipality,
            commune: props.commune,
            address: props.address,
            phone_number: props.phone_number,
            baptism_date: props.baptism_date,
            baptism_church: props.baptism_church,
        }
    }

    /// Age in full years on the given date. Never stored.
    pub fn age_on(&self, today: NaiveDate) -> i32 {
        let mut age = today.year() - self.birth_date.year();
        let birthday_passed = (today.month(), today.day())
            >= (self.birth_date.month(), self.birth_date.day());
        if !birthday_passed {
            age -= 1;
        }
        age
    }

    /// Age in full years as of the local current date.
    pub fn age(&self) -> i32 {
        self.age_on(Local::now().date_naive())
    }
}
