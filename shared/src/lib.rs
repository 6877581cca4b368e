use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Wire representation of a person record.
///
/// Dates travel as strings: `birthDate`/`baptismDate` in `YYYY-MM-DD` form.
/// Optional attributes that were never filled in are omitted from the JSON
/// entirely rather than sent as empty strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonDto {
    /// Store-assigned identifier; empty before the record is persisted
    #[serde(default)]
    pub id: String,
    pub name: String,
    pub birth_date: String,
    pub gender: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birth_place: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub province: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub municipality: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commune: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub baptism_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub baptism_church: Option<String>,
}

/// Wire representation of a scout record with its owning person embedded.
///
/// `registrationDate` travels as an RFC 3339 timestamp. The two derived
/// flags are computed by the backend at mapping time and are never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoutDto {
    #[serde(default)]
    pub id: String,
    pub person: PersonDto,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_scout_unit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_association: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proposal_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registration_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matriculation_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_contagious_disease: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_physical_robustness: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub medical_observations: Option<String>,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub medically_approved: bool,
}

/// Response containing all persons, ordered by name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonListResponse {
    pub persons: Vec<PersonDto>,
}

/// Response after creating or updating a person.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonResponse {
    pub person: PersonDto,
    pub success_message: String,
}

/// Response containing all scouts, most recently registered first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoutListResponse {
    pub scouts: Vec<ScoutDto>,
}

/// Response after creating or updating a scout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoutResponse {
    pub scout: ScoutDto,
    pub success_message: String,
}

/// Response after a delete operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteResponse {
    pub deleted: bool,
}

/// Credentials for the sign-in operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// The authenticated user as exposed to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: String,
    pub email: String,
}

/// Session payload returned by a successful sign-in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub expires_at: DateTime<Utc>,
    pub user: SessionUser,
}

/// A short-lived user-facing message. The backend only produces the
/// content; rendering is the client's concern.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Notification {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
        }
    }

    pub fn with_description(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: Some(description.into()),
        }
    }
}

/// Which step of the intake dialog is being collected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RegistrationStep {
    /// Collecting the person's biographical data
    Person,
    /// Collecting the scouting-specific data
    Scout,
}

/// Raw person-step input, exactly as typed. Blank strings are converted
/// to absent values only when the entity is built at submission time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonFormData {
    pub name: String,
    pub birth_date: String,
    pub gender: String,
    pub birth_place: String,
    pub province: String,
    pub municipality: String,
    pub commune: String,
    pub address: String,
    pub phone_number: String,
    pub baptism_date: String,
    pub baptism_church: String,
}

/// Raw scout-step input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoutFormData {
    pub group_number: String,
    pub unit_name: String,
    pub previous_scout_unit: String,
    pub previous_association: String,
    pub proposal_number: String,
    pub has_contagious_disease: bool,
    pub has_physical_robustness: bool,
    pub medical_observations: String,
}

impl Default for ScoutFormData {
    fn default() -> Self {
        Self {
            group_number: String::new(),
            unit_name: String::new(),
            previous_scout_unit: String::new(),
            previous_association: String::new(),
            proposal_number: String::new(),
            has_contagious_disease: false,
            // Candidates start out marked fit; the medical section can say otherwise
            has_physical_robustness: true,
            medical_observations: String::new(),
        }
    }
}

/// Complete state of one intake dialog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationForm {
    pub step: RegistrationStep,
    pub person: PersonFormData,
    pub scout: ScoutFormData,
    /// True while a submission is in flight; submit and cancel are ignored
    pub submitting: bool,
}

impl Default for RegistrationForm {
    fn default() -> Self {
        Self {
            step: RegistrationStep::Person,
            person: PersonFormData::default(),
            scout: ScoutFormData::default(),
            submitting: false,
        }
    }
}

/// The closed set of input kinds the intake dialog renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldKind {
    Text,
    Date,
    Select,
    Checkbox,
}

/// A typed field value. Applying a value of the wrong kind to a field is
/// rejected by the workflow rather than coerced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "camelCase")]
pub enum FieldValue {
    Text(String),
    Date(String),
    Select(String),
    Checkbox(bool),
}

impl FieldValue {
    pub fn kind(&self) -> FieldKind {
        match self {
            FieldValue::Text(_) => FieldKind::Text,
            FieldValue::Date(_) => FieldKind::Date,
            FieldValue::Select(_) => FieldKind::Select,
            FieldValue::Checkbox(_) => FieldKind::Checkbox,
        }
    }
}

/// Rendering contract for one dialog field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldSpec {
    pub id: String,
    pub label: String,
    pub kind: FieldKind,
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
}

/// One field assignment sent by the dialog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldUpdate {
    pub field: String,
    pub value: FieldValue,
}

/// Batch of field assignments for the current step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegistrationFieldsRequest {
    pub fields: Vec<FieldUpdate>,
}

/// Snapshot of an intake dialog returned by every workflow operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationFormResponse {
    pub registration_id: String,
    pub step_title: String,
    pub step_description: String,
    pub fields: Vec<FieldSpec>,
    pub form: RegistrationForm,
    pub can_advance: bool,
    pub can_submit: bool,
}

/// Outcome of a submission attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationSubmitResponse {
    /// True when both records were persisted and the dialog was reset;
    /// the list view refreshes on this signal
    pub completed: bool,
    /// Absent when the attempt was a silent no-op (guard unsatisfied or
    /// a submission already in flight)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notification: Option<Notification>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scout: Option<ScoutDto>,
    pub form: RegistrationForm,
}

/// Column specification consumed by the table collaborator. Sorting and
/// selection machinery live on the client; the backend only guarantees
/// stable accessor keys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableColumn {
    pub key: String,
    pub header: String,
    pub sortable: bool,
}

/// One formatted row of the persons table. Cell values are display-ready
/// strings; the original entity rides along for row actions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberRow {
    pub id: String,
    pub name: String,
    pub gender: String,
    pub birth_date: String,
    /// Parent names are not captured by the registration form; the
    /// cells render empty but the accessor keys stay stable
    pub father_name: String,
    pub mother_name: String,
    pub address: String,
    pub phone_number: String,
    pub age: i32,
    pub person: PersonDto,
}

/// Response for the persons table view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberTableResponse {
    pub columns: Vec<TableColumn>,
    pub rows: Vec<MemberRow>,
}

/// Age-group sections the dashboard is organized into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Section {
    Lobito,
    Junior,
    Senior,
    Trucker,
}

impl Section {
    /// Display label shown as the panel title.
    pub fn label(&self) -> &'static str {
        match self {
            Section::Lobito => "Lobito",
            Section::Junior => "Junior",
            Section::Senior => "Senior",
            Section::Trucker => "Caminheiro",
        }
    }

    /// URL slug used to address a panel.
    pub fn slug(&self) -> &'static str {
        match self {
            Section::Lobito => "lobito",
            Section::Junior => "junior",
            Section::Senior => "senior",
            Section::Trucker => "trucker",
        }
    }

    pub fn from_slug(slug: &str) -> Option<Section> {
        match slug {
            "lobito" => Some(Section::Lobito),
            "junior" => Some(Section::Junior),
            "senior" => Some(Section::Senior),
            "trucker" => Some(Section::Trucker),
            _ => None,
        }
    }
}

/// One formatted row of an age-group panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PanelRow {
    pub id: String,
    pub name: String,
    pub age: i32,
    pub group_number: String,
    pub unit_name: String,
    pub is_active: bool,
    pub medically_approved: bool,
    pub scout: ScoutDto,
}

/// Response for one age-group panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PanelResponse {
    pub section: Section,
    pub title: String,
    pub rows: Vec<PanelRow>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_section_labels() {
        assert_eq!(Section::Lobito.label(), "Lobito");
        assert_eq!(Section::Junior.label(), "Junior");
        assert_eq!(Section::Senior.label(), "Senior");
        assert_eq!(Section::Trucker.label(), "Caminheiro");
    }

    #[test]
    fn test_section_slug_round_trip() {
        for section in [
            Section::Lobito,
            Section::Junior,
            Section::Senior,
            Section::Trucker,
        ] {
            assert_eq!(Section::from_slug(section.slug()), Some(section));
        }

        assert_eq!(Section::from_slug("pioneiro"), None);
    }

    #[test]
    fn test_field_value_kind() {
        assert_eq!(FieldValue::Text("x".to_string()).kind(), FieldKind::Text);
        assert_eq!(
            FieldValue::Date("2010-06-15".to_string()).kind(),
            FieldKind::Date
        );
        assert_eq!(
            FieldValue::Select("Masculino".to_string()).kind(),
            FieldKind::Select
        );
        assert_eq!(FieldValue::Checkbox(true).kind(), FieldKind::Checkbox);
    }

    #[test]
    fn test_field_value_serde_tagging() {
        let value = FieldValue::Checkbox(true);
        let json = serde_json::to_string(&value).unwrap();
        assert_eq!(json, r#"{"kind":"checkbox","value":true}"#);

        let parsed: FieldValue = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, value);
    }

    #[test]
    fn test_scout_form_defaults() {
        let form = ScoutFormData::default();

        assert!(!form.has_contagious_disease);
        assert!(form.has_physical_robustness);
        assert!(form.group_number.is_empty());
    }

    #[test]
    fn test_person_dto_omits_absent_fields() {
        let dto = PersonDto {
            id: "p1".to_string(),
            name: "Ana Paula".to_string(),
            birth_date: "2012-03-01".to_string(),
            gender: "Feminino".to_string(),
            birth_place: None,
            province: None,
            municipality: None,
            commune: None,
            address: None,
            phone_number: None,
            baptism_date: None,
            baptism_church: None,
        };

        let json = serde_json::to_string(&dto).unwrap();
        assert!(json.contains(r#""birthDate":"2012-03-01""#));
        assert!(!json.contains("birthPlace"));
        assert!(!json.contains("baptismDate"));
    }
}
