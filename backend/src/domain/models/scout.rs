use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::models::person::Person;

/// Property bag for constructing a [`Scout`]. The owning person is the
/// only required attribute and must already be persisted before the
/// scout record can be stored.
#[derive(Debug, Clone)]
pub struct ScoutProps {
    pub id: Option<String>,
    pub person: Person,
    pub group_number: Option<String>,
    pub unit_name: Option<String>,
    pub previous_scout_unit: Option<String>,
    pub previous_association: Option<String>,
    pub proposal_number: Option<String>,
    pub registration_date: Option<DateTime<Utc>>,
    pub matriculation_number: Option<String>,
    pub has_contagious_disease: Option<bool>,
    pub has_physical_robustness: Option<bool>,
    pub medical_observations: Option<String>,
}

impl ScoutProps {
    /// Props with only the owning person set.
    pub fn for_person(person: Person) -> Self {
        Self {
            id: None,
            person,
            group_number: None,
            unit_name: None,
            previous_scout_unit: None,
            previous_association: None,
            proposal_number: None,
            registration_date: None,
            matriculation_number: None,
            has_contagious_disease: None,
            has_physical_robustness: None,
            medical_observations: None,
        }
    }
}

/// Domain model for a scouting-program membership record, attached to
/// exactly one [`Person`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scout {
    pub id: String,
    pub person: Person,
    pub group_number: Option<String>,
    pub unit_name: Option<String>,
    pub previous_scout_unit: Option<String>,
    pub previous_association: Option<String>,
    pub proposal_number: Option<String>,
    pub registration_date: Option<DateTime<Utc>>,
    pub matriculation_number: Option<String>,
    pub has_contagious_disease: Option<bool>,
    pub has_physical_robustness: Option<bool>,
    pub medical_observations: Option<String>,
}

impl Scout {
    pub fn new(props: ScoutProps) -> Self {
        Self {
            id: props.id.unwrap_or_default(),
            person: props.person,
            group_number: props.group_number,
            unit_name: props.unit_name,
            previous_scout_unit: props.previous_scout_unit,
            previous_association: props.previous_association,
            proposal_number: props.proposal_number,
            registration_date: props.registration_date,
            matriculation_number: props.matriculation_number,
            has_contagious_disease: props.has_contagious_disease,
            has_physical_robustness: props.has_physical_robustness,
            medical_observations: props.medical_observations,
        }
    }

    /// A scout is active once both the matriculation number and the
    /// registration date are on record.
    pub fn is_active(&self) -> bool {
        self.matriculation_number.is_some() && self.registration_date.is_some()
    }

    /// Medical eligibility: the contagious-disease flag must be an
    /// explicit "no" and the robustness flag an explicit "yes". An
    /// unanswered flag is not approval.
    pub fn medically_approved(&self) -> bool {
        self.has_contagious_disease == Some(false) && self.has_physical_robustness == Some(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::person::PersonProps;
    use chrono::NaiveDate;

    fn test_person() -> Person {
        Person::new(PersonProps {
            id: Some("person-1".to_string()),
            name: "Mário dos Santos".to_string(),
            birth_date: NaiveDate::from_ymd_opt(2011, 4, 2).unwrap(),
            gender: "Masculino".to_string(),
            ..Default::default()
        })
    }

    #[test]
    fn test_is_active_requires_both_fields() {
        let mut scout = Scout::new(ScoutProps::for_person(test_person()));
        assert!(!scout.is_active());

        scout.matriculation_number = Some("123".to_string());
        assert!(!scout.is_active());

        scout.registration_date = Some(Utc::now());
        assert!(scout.is_active());

        scout.matriculation_number = None;
        assert!(!scout.is_active());
    }

    #[test]
    fn test_medically_approved_strictness() {
        let mut scout = Scout::new(ScoutProps::for_person(test_person()));
        assert!(!scout.medically_approved());

        // Robustness unanswered is not approval
        scout.has_contagious_disease = Some(false);
        scout.has_physical_robustness = None;
        assert!(!scout.medically_approved());

        // Disease unanswered is not approval either
        scout.has_contagious_disease = None;
        scout.has_physical_robustness = Some(true);
        assert!(!scout.medically_approved());

        scout.has_contagious_disease = Some(false);
        scout.has_physical_robustness = Some(true);
        assert!(scout.medically_approved());

        scout.has_contagious_disease = Some(true);
        assert!(!scout.medically_approved());
    }
}
