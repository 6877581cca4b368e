//! Two-step intake workflow for registering a person as a scout.
//!
//! The dialog collects the person's biographical data, then the
//! scouting-specific data, and finally persists the two records in order:
//! the person first, then the scout referencing the created person. All
//! dialog state is held here so the client only ever sends typed field
//! assignments and step transitions.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{NaiveDate, Utc};
use tracing::{info, warn};
use uuid::Uuid;

use shared::{
    FieldKind, FieldSpec, FieldUpdate, FieldValue, Notification, PersonFormData,
    RegistrationForm, RegistrationStep, ScoutFormData,
};

use crate::domain::crud::CrudService;
use crate::domain::models::{Person, PersonProps, Scout, ScoutProps, SessionContext};
use crate::domain::person_service::PersonService;
use crate::domain::scout_service::ScoutService;

const DATE_FORMAT: &str = "%Y-%m-%d";
const GENERIC_FAILURE: &str = "Não foi possível concluir o cadastro. Tente novamente.";

/// Errors for misuse of the workflow API. Guard failures are not errors;
/// they are silent no-ops.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistrationError {
    #[error("unknown registration: {0}")]
    UnknownRegistration(String),
    #[error("unknown field: {0}")]
    UnknownField(String),
    #[error("field '{field}' expects a {expected:?} value")]
    WrongFieldKind { field: String, expected: FieldKind },
}

/// Person-step fields, one variant per dialog input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PersonField {
    Name,
    BirthDate,
    Gender,
    BirthPlace,
    Province,
    Municipality,
    Commune,
    Address,
    PhoneNumber,
    BaptismDate,
    BaptismChurch,
}

/// Scout-step fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScoutField {
    GroupNumber,
    UnitName,
    PreviousScoutUnit,
    PreviousAssociation,
    ProposalNumber,
    HasContagiousDisease,
    HasPhysicalRobustness,
    MedicalObservations,
}

impl PersonField {
    fn from_id(id: &str) -> Option<Self> {
        match id {
            "name" => Some(Self::Name),
            "birthDate" => Some(Self::BirthDate),
            "gender" => Some(Self::Gender),
            "birthPlace" => Some(Self::BirthPlace),
            "province" => Some(Self::Province),
            "municipality" => Some(Self::Municipality),
            "commune" => Some(Self::Commune),
            "address" => Some(Self::Address),
            "phoneNumber" => Some(Self::PhoneNumber),
            "baptismDate" => Some(Self::BaptismDate),
            "baptismChurch" => Some(Self::BaptismChurch),
            _ => None,
        }
    }

    fn kind(&self) -> FieldKind {
        match self {
            Self::BirthDate | Self::BaptismDate => FieldKind::Date,
            Self::Gender => FieldKind::Select,
            _ => FieldKind::Text,
        }
    }

    fn slot<'a>(&self, data: &'a mut PersonFormData) -> &'a mut String {
        match self {
            Self::Name => &mut data.name,
            Self::BirthDate => &mut data.birth_date,
            Self::Gender => &mut data.gender,
            Self::BirthPlace => &mut data.birth_place,
            Self::Province => &mut data.province,
            Self::Municipality => &mut data.municipality,
            Self::Commune => &mut data.commune,
            Self::Address => &mut data.address,
            Self::PhoneNumber => &mut data.phone_number,
            Self::BaptismDate => &mut data.baptism_date,
            Self::BaptismChurch => &mut data.baptism_church,
        }
    }
}

impl ScoutField {
    fn from_id(id: &str) -> Option<Self> {
        match id {
            "groupNumber" => Some(Self::GroupNumber),
            "unitName" => Some(Self::UnitName),
            "previousScoutUnit" => Some(Self::PreviousScoutUnit),
            "previousAssociation" => Some(Self::PreviousAssociation),
            "proposalNumber" => Some(Self::ProposalNumber),
            "hasContagiousDisease" => Some(Self::HasContagiousDisease),
            "hasPhysicalRobustness" => Some(Self::HasPhysicalRobustness),
            "medicalObservations" => Some(Self::MedicalObservations),
            _ => None,
        }
    }

    fn kind(&self) -> FieldKind {
        match self {
            Self::HasContagiousDisease | Self::HasPhysicalRobustness => FieldKind::Checkbox,
            _ => FieldKind::Text,
        }
    }
}

/// Outcome of a submission attempt.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmitOutcome {
    /// Both records were persisted and the dialog was reset
    pub completed: bool,
    /// Absent when the attempt was a silent no-op
    pub notification: Option<Notification>,
    pub scout: Option<Scout>,
    pub form: RegistrationForm,
}

/// Service orchestrating the intake dialogs. Open dialogs are held
/// in-process, keyed by a registration id handed to the client.
#[derive(Clone)]
pub struct RegistrationService {
    persons: PersonService,
    scouts: ScoutService,
    open_forms: Arc<Mutex<HashMap<String, RegistrationForm>>>,
}

impl RegistrationService {
    pub fn new(persons: PersonService, scouts: ScoutService) -> Self {
        Self {
            persons,
            scouts,
            open_forms: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Open a fresh intake dialog.
    pub fn open(&self) -> (String, RegistrationForm) {
        let id = Uuid::new_v4().to_string();
        let form = RegistrationForm::default();
        self.open_forms
            .lock()
            .unwrap()
            .insert(id.clone(), form.clone());

        info!("Opened registration {}", id);
        (id, form)
    }

    /// Current state of an open dialog.
    pub fn form(&self, id: &str) -> Result<RegistrationForm, RegistrationError> {
        self.open_forms
            .lock()
            .unwrap()
            .get(id)
            .cloned()
            .ok_or_else(|| RegistrationError::UnknownRegistration(id.to_string()))
    }

    /// Apply a batch of typed field assignments. A value of the wrong
    /// kind is rejected; nothing is partially applied before the faulty
    /// assignment.
    pub fn set_fields(
        &self,
        id: &str,
        updates: &[FieldUpdate],
    ) -> Result<RegistrationForm, RegistrationError> {
        let mut forms = self.open_forms.lock().unwrap();
        let form = forms
            .get_mut(id)
            .ok_or_else(|| RegistrationError::UnknownRegistration(id.to_string()))?;

        for update in updates {
            apply_field(form, update)?;
        }

        Ok(form.clone())
    }

    /// Move from the person step to the scout step. A no-op unless the
    /// person-step guard is satisfied.
    pub fn next(&self, id: &str) -> Result<RegistrationForm, RegistrationError> {
        let mut forms = self.open_forms.lock().unwrap();
        let form = forms
            .get_mut(id)
            .ok_or_else(|| RegistrationError::UnknownRegistration(id.to_string()))?;

        if form.step == RegistrationStep::Person && Self::can_advance(form) {
            form.step = RegistrationStep::Scout;
        }

        Ok(form.clone())
    }

    /// Return to the person step. Unconditional; scout-step input is
    /// preserved across the transition.
    pub fn back(&self, id: &str) -> Result<RegistrationForm, RegistrationError> {
        let mut forms = self.open_forms.lock().unwrap();
        let form = forms
            .get_mut(id)
            .ok_or_else(|| RegistrationError::UnknownRegistration(id.to_string()))?;

        form.step = RegistrationStep::Person;

        Ok(form.clone())
    }

    /// Discard the dialog and everything entered in it. Ignored while a
    /// submission is in flight.
    pub fn cancel(&self, id: &str) -> Result<RegistrationForm, RegistrationError> {
        let mut forms = self.open_forms.lock().unwrap();
        let form = forms
            .get_mut(id)
            .ok_or_else(|| RegistrationError::UnknownRegistration(id.to_string()))?;

        if form.submitting {
            return Ok(form.clone());
        }

        forms.remove(id);
        info!("Cancelled registration {}", id);

        Ok(RegistrationForm::default())
    }

    /// Person-step guard: name, birth date and gender must all be filled.
    pub fn can_advance(form: &RegistrationForm) -> bool {
        let person = &form.person;
        !person.name.trim().is_empty()
            && !person.birth_date.trim().is_empty()
            && !person.gender.trim().is_empty()
    }

    /// Scout-step guard: group number and unit name must both be filled.
    pub fn can_submit(form: &RegistrationForm) -> bool {
        let scout = &form.scout;
        !scout.group_number.trim().is_empty() && !scout.unit_name.trim().is_empty()
    }

    /// Submit the dialog: create the person, then the scout referencing
    /// it. A no-op unless the dialog is on the scout step with its guard
    /// satisfied and no submission already in flight. On failure the
    /// entered data is kept so the user can retry; a person created
    /// before a failed scout create stays persisted.
    pub async fn submit(
        &self,
        ctx: &SessionContext,
        id: &str,
    ) -> Result<SubmitOutcome, RegistrationError> {
        let (person_data, scout_data) = {
            let mut forms = self.open_forms.lock().unwrap();
            let form = forms
                .get_mut(id)
                .ok_or_else(|| RegistrationError::UnknownRegistration(id.to_string()))?;

            if form.submitting
                || form.step != RegistrationStep::Scout
                || !Self::can_submit(form)
            {
                return Ok(SubmitOutcome {
                    completed: false,
                    notification: None,
                    scout: None,
                    form: form.clone(),
                });
            }

            form.submitting = true;
            (form.person.clone(), form.scout.clone())
        };

        let result = self.create_records(ctx, &person_data, &scout_data).await;

        let mut forms = self.open_forms.lock().unwrap();
        let form = forms
            .get_mut(id)
            .ok_or_else(|| RegistrationError::UnknownRegistration(id.to_string()))?;

        match result {
            Ok(scout) => {
                info!("Registration {} completed for '{}'", id, scout.person.name);
                let notification = Notification::with_description(
                    "Cadastro concluído",
                    format!("O escuteiro {} foi cadastrado com sucesso.", scout.person.name),
                );
                forms.remove(id);

                Ok(SubmitOutcome {
                    completed: true,
                    notification: Some(notification),
                    scout: Some(scout),
                    form: RegistrationForm::default(),
                })
            }
            Err(message) => {
                warn!("Registration {} failed", id);
                form.submitting = false;
                let description = message.unwrap_or_else(|| GENERIC_FAILURE.to_string());

                Ok(SubmitOutcome {
                    completed: false,
                    notification: Some(Notification::with_description(
                        "Erro no cadastro",
                        description,
                    )),
                    scout: None,
                    form: form.clone(),
                })
            }
        }
    }

    /// Create the person and then the scout. `Err` carries the
    /// user-facing message when one is available.
    async fn create_records(
        &self,
        ctx: &SessionContext,
        person_data: &PersonFormData,
        scout_data: &ScoutFormData,
    ) -> Result<Scout, Option<String>> {
        let person = build_person(person_data).ok_or(None)?;

        let person = self
            .persons
            .create(ctx, person)
            .await
            .map_err(|e| Some(e.to_string()))?;

        let scout = build_scout(person, scout_data);

        self.scouts
            .create(ctx, scout)
            .await
            .map_err(|e| Some(e.to_string()))
    }

    /// Title of the dialog's current step.
    pub fn step_title(step: RegistrationStep) -> &'static str {
        match step {
            RegistrationStep::Person => "Dados Pessoais",
            RegistrationStep::Scout => "Dados do Escuteiro",
        }
    }

    /// Helper line shown beneath the title.
    pub fn step_description(step: RegistrationStep) -> &'static str {
        match step {
            RegistrationStep::Person => "Preencha as informações pessoais do candidato",
            RegistrationStep::Scout => "Preencha as informações específicas do escuteiro",
        }
    }

    /// Rendering contract for the current step's fields.
    pub fn step_fields(step: RegistrationStep) -> Vec<FieldSpec> {
        match step {
            RegistrationStep::Person => person_field_specs(),
            RegistrationStep::Scout => scout_field_specs(),
        }
    }
}

fn apply_field(form: &mut RegistrationForm, update: &FieldUpdate) -> Result<(), RegistrationError> {
    if let Some(field) = PersonField::from_id(&update.field) {
        let expected = field.kind();
        if update.value.kind() != expected {
            return Err(RegistrationError::WrongFieldKind {
                field: update.field.clone(),
                expected,
            });
        }
        let value = match &update.value {
            FieldValue::Text(v) | FieldValue::Date(v) | FieldValue::Select(v) => v.clone(),
            FieldValue::Checkbox(_) => unreachable!("person fields have no checkbox kind"),
        };
        *field.slot(&mut form.person) = value;
        return Ok(());
    }

    if let Some(field) = ScoutField::from_id(&update.field) {
        let expected = field.kind();
        if update.value.kind() != expected {
            return Err(RegistrationError::WrongFieldKind {
                field: update.field.clone(),
                expected,
            });
        }
        match (field, &update.value) {
            (ScoutField::GroupNumber, FieldValue::Text(v)) => {
                form.scout.group_number = v.clone();
            }
            (ScoutField::UnitName, FieldValue::Text(v)) => form.scout.unit_name = v.clone(),
            (ScoutField::PreviousScoutUnit, FieldValue::Text(v)) => {
                form.scout.previous_scout_unit = v.clone();
            }
            (ScoutField::PreviousAssociation, FieldValue::Text(v)) => {
                form.scout.previous_association = v.clone();
            }
            (ScoutField::ProposalNumber, FieldValue::Text(v)) => {
                form.scout.proposal_number = v.clone();
            }
            (ScoutField::MedicalObservations, FieldValue::Text(v)) => {
                form.scout.medical_observations = v.clone();
            }
            (ScoutField::HasContagiousDisease, FieldValue::Checkbox(v)) => {
                form.scout.has_contagious_disease = *v;
            }
            (ScoutField::HasPhysicalRobustness, FieldValue::Checkbox(v)) => {
                form.scout.has_physical_robustness = *v;
            }
            _ => unreachable!("kind already checked against the field"),
        }
        return Ok(());
    }

    Err(RegistrationError::UnknownField(update.field.clone()))
}

/// Build the person entity from raw input: blank optionals become
/// absent, date strings become calendar dates. `None` when a date does
/// not parse.
fn build_person(data: &PersonFormData) -> Option<Person> {
    let birth_date = NaiveDate::parse_from_str(data.birth_date.trim(), DATE_FORMAT).ok()?;

    let baptism_date = match optional(&data.baptism_date) {
        Some(raw) => Some(NaiveDate::parse_from_str(&raw, DATE_FORMAT).ok()?),
        None => None,
    };

    Some(Person::new(PersonProps {
        id: None,
        name: data.name.trim().to_string(),
        birth_date,
        gender: data.gender.trim().to_string(),
        birth_place: optional(&data.birth_place),
        province: optional(&data.province),
        municipality: optional(&data.municipality),
        commune: optional(&data.commune),
        address: optional(&data.address),
        phone_number: optional(&data.phone_number),
        baptism_date,
        baptism_church: optional(&data.baptism_church),
    }))
}

/// Build the scout entity referencing the created person. The
/// registration date defaults to the current moment.
fn build_scout(person: Person, data: &ScoutFormData) -> Scout {
    let mut props = ScoutProps::for_person(person);
    props.group_number = optional(&data.group_number);
    props.unit_name = optional(&data.unit_name);
    props.previous_scout_unit = optional(&data.previous_scout_unit);
    props.previous_association = optional(&data.previous_association);
    props.proposal_number = optional(&data.proposal_number);
    props.registration_date = Some(Utc::now());
    props.has_contagious_disease = Some(data.has_contagious_disease);
    props.has_physical_robustness = Some(data.has_physical_robustness);
    props.medical_observations = optional(&data.medical_observations);
    Scout::new(props)
}

/// Blank strings map to absent values, never to empty strings.
fn optional(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn text_field(id: &str, label: &str, required: bool, placeholder: Option<&str>) -> FieldSpec {
    FieldSpec {
        id: id.to_string(),
        label: label.to_string(),
        kind: FieldKind::Text,
        required,
        placeholder: placeholder.map(str::to_string),
        options: Vec::new(),
    }
}

fn person_field_specs() -> Vec<FieldSpec> {
    vec![
        text_field("name", "Nome Completo", true, Some("Nome completo do candidato")),
        FieldSpec {
            id: "birthDate".to_string(),
            label: "Data de Nascimento".to_string(),
            kind: FieldKind::Date,
            required: true,
            placeholder: None,
            options: Vec::new(),
        },
        FieldSpec {
            id: "gender".to_string(),
            label: "Género".to_string(),
            kind: FieldKind::Select,
            required: true,
            placeholder: Some("Selecione".to_string()),
            options: vec!["Masculino".to_string(), "Feminino".to_string()],
        },
        text_field("commune", "Comuna", false, Some("Comuna")),
        text_field("municipality", "Município", false, Some("Município")),
        text_field("province", "Província", false, Some("Província")),
        text_field("address", "Residência", false, Some("Endereço de residência")),
        text_field("phoneNumber", "Telefone", false, Some("+244 XXX XXX XXX")),
        FieldSpec {
            id: "baptismDate".to_string(),
            label: "Data de Baptismo".to_string(),
            kind: FieldKind::Date,
            required: false,
            placeholder: None,
            options: Vec::new(),
        },
        text_field("baptismChurch", "Igreja", false, Some("Nome da igreja")),
    ]
}

fn scout_field_specs() -> Vec<FieldSpec> {
    vec![
        text_field(
            "groupNumber",
            "Número do Agrupamento",
            true,
            Some("Nº do Agrupamento"),
        ),
        text_field("proposalNumber", "Nº da Proposta", false, Some("Nº da proposta")),
        text_field("unitName", "Unidade Escutista", true, Some("Nome da Unidade")),
        text_field(
            "previousScoutUnit",
            "Unidade Anterior",
            false,
            Some("Já pertenceu a outra unidade?"),
        ),
        text_field(
            "previousAssociation",
            "Associação Anterior",
            false,
            Some("Já pertenceu a outra associação?"),
        ),
        FieldSpec {
            id: "hasContagiousDisease".to_string(),
            label: "Sofre de doença contagiosa".to_string(),
            kind: FieldKind::Checkbox,
            required: false,
            placeholder: None,
            options: Vec::new(),
        },
        FieldSpec {
            id: "hasPhysicalRobustness".to_string(),
            label: "Tem robustez física necessária".to_string(),
            kind: FieldKind::Checkbox,
            required: false,
            placeholder: None,
            options: Vec::new(),
        },
        text_field(
            "medicalObservations",
            "Observações Médicas",
            false,
            Some("Observações adicionais..."),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{DbConnection, PersonRepository, ScoutRepository};

    async fn setup_test() -> (RegistrationService, DbConnection) {
        let db = DbConnection::init_test()
            .await
            .expect("Failed to create test database");
        let persons = PersonService::new(PersonRepository::new(db.clone()));
        let scouts = ScoutService::new(ScoutRepository::new(db.clone()));
        (RegistrationService::new(persons, scouts), db)
    }

    fn text(field: &str, value: &str) -> FieldUpdate {
        FieldUpdate {
            field: field.to_string(),
            value: FieldValue::Text(value.to_string()),
        }
    }

    fn person_step_updates() -> Vec<FieldUpdate> {
        vec![
            text("name", "Ernesto Kiala"),
            FieldUpdate {
                field: "birthDate".to_string(),
                value: FieldValue::Date("2012-05-09".to_string()),
            },
            FieldUpdate {
                field: "gender".to_string(),
                value: FieldValue::Select("Masculino".to_string()),
            },
        ]
    }

    fn scout_step_updates() -> Vec<FieldUpdate> {
        vec![
            text("groupNumber", "104"),
            text("unitName", "Unidade São Jorge"),
        ]
    }

    #[tokio::test]
    async fn test_advance_blocked_until_required_fields() {
        let (service, _db) = setup_test().await;
        let (id, _) = service.open();

        // Nothing filled in yet: the transition silently does not happen
        let form = service.next(&id).expect("next failed");
        assert_eq!(form.step, RegistrationStep::Person);

        service
            .set_fields(&id, &[text("name", "Ernesto Kiala")])
            .expect("set_fields failed");
        let form = service.next(&id).expect("next failed");
        assert_eq!(form.step, RegistrationStep::Person);

        service
            .set_fields(&id, &person_step_updates())
            .expect("set_fields failed");
        let form = service.next(&id).expect("next failed");
        assert_eq!(form.step, RegistrationStep::Scout);
    }

    #[tokio::test]
    async fn test_back_preserves_scout_data() {
        let (service, _db) = setup_test().await;
        let (id, _) = service.open();

        service
            .set_fields(&id, &person_step_updates())
            .expect("set_fields failed");
        service.next(&id).expect("next failed");
        service
            .set_fields(&id, &scout_step_updates())
            .expect("set_fields failed");

        let form = service.back(&id).expect("back failed");
        assert_eq!(form.step, RegistrationStep::Person);
        assert_eq!(form.scout.group_number, "104");

        let form = service.next(&id).expect("next failed");
        assert_eq!(form.step, RegistrationStep::Scout);
        assert_eq!(form.scout.unit_name, "Unidade São Jorge");
    }

    #[tokio::test]
    async fn test_cancel_discards_everything() {
        let (service, _db) = setup_test().await;
        let (id, _) = service.open();

        service
            .set_fields(&id, &person_step_updates())
            .expect("set_fields failed");
        service.next(&id).expect("next failed");

        let form = service.cancel(&id).expect("cancel failed");
        assert_eq!(form, RegistrationForm::default());

        // The dialog is gone; reopening starts from the initial state
        assert!(matches!(
            service.form(&id),
            Err(RegistrationError::UnknownRegistration(_))
        ));
        let (_, fresh) = service.open();
        assert_eq!(fresh, RegistrationForm::default());
    }

    #[tokio::test]
    async fn test_typed_field_mismatch_is_rejected() {
        let (service, _db) = setup_test().await;
        let (id, _) = service.open();

        let err = service
            .set_fields(
                &id,
                &[FieldUpdate {
                    field: "hasContagiousDisease".to_string(),
                    value: FieldValue::Text("sim".to_string()),
                }],
            )
            .expect_err("checkbox field must reject text values");
        assert_eq!(
            err,
            RegistrationError::WrongFieldKind {
                field: "hasContagiousDisease".to_string(),
                expected: FieldKind::Checkbox,
            }
        );

        let err = service
            .set_fields(&id, &[text("favouriteColour", "verde")])
            .expect_err("unknown fields must be rejected");
        assert_eq!(
            err,
            RegistrationError::UnknownField("favouriteColour".to_string())
        );
    }

    #[tokio::test]
    async fn test_submit_blocked_without_scout_guard() {
        let (service, _db) = setup_test().await;
        let ctx = SessionContext::test();
        let (id, _) = service.open();

        service
            .set_fields(&id, &person_step_updates())
            .expect("set_fields failed");
        service.next(&id).expect("next failed");

        let outcome = service.submit(&ctx, &id).await.expect("submit failed");
        assert!(!outcome.completed);
        assert!(outcome.notification.is_none());
        assert!(outcome.scout.is_none());
    }

    #[tokio::test]
    async fn test_submit_creates_person_then_scout() {
        let (service, db) = setup_test().await;
        let ctx = SessionContext::test();
        let (id, _) = service.open();

        service
            .set_fields(&id, &person_step_updates())
            .expect("set_fields failed");
        service.next(&id).expect("next failed");
        service
            .set_fields(&id, &scout_step_updates())
            .expect("set_fields failed");

        let outcome = service.submit(&ctx, &id).await.expect("submit failed");
        assert!(outcome.completed);
        assert_eq!(outcome.form, RegistrationForm::default());

        let notification = outcome.notification.expect("missing success notification");
        assert_eq!(notification.title, "Cadastro concluído");
        assert!(notification
            .description
            .as_deref()
            .unwrap()
            .contains("Ernesto Kiala"));

        let scout = outcome.scout.expect("missing created scout");
        assert_eq!(scout.person.name, "Ernesto Kiala");
        assert_eq!(scout.group_number.as_deref(), Some("104"));
        assert!(scout.registration_date.is_some());
        // Blank optionals became absent values, not empty strings
        assert_eq!(scout.person.address, None);
        assert_eq!(scout.proposal_number, None);

        // The dialog is closed after a successful submission
        assert!(service.form(&id).is_err());

        let scouts = ScoutService::new(ScoutRepository::new(db));
        assert_eq!(scouts.find_all(&ctx).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_scout_failure_keeps_person_and_form() {
        let (service, db) = setup_test().await;
        let ctx = SessionContext::test();
        let (id, _) = service.open();

        service
            .set_fields(&id, &person_step_updates())
            .expect("set_fields failed");
        service.next(&id).expect("next failed");
        service
            .set_fields(&id, &scout_step_updates())
            .expect("set_fields failed");

        // Make the scout create fail while person creation still works
        sqlx::query("DROP TABLE scouts")
            .execute(db.pool())
            .await
            .expect("Failed to drop scouts table");

        let outcome = service.submit(&ctx, &id).await.expect("submit failed");
        assert!(!outcome.completed);

        let notification = outcome.notification.expect("missing failure notification");
        assert_eq!(notification.title, "Erro no cadastro");
        assert_eq!(
            notification.description.as_deref(),
            Some("Não foi possível criar o escuteiro")
        );

        // Entered data is preserved for retry, and no longer marked in flight
        let form = service.form(&id).expect("dialog should still be open");
        assert_eq!(form.person.name, "Ernesto Kiala");
        assert_eq!(form.scout.group_number, "104");
        assert!(!form.submitting);

        // The person created before the failure stays persisted
        let persons = PersonService::new(PersonRepository::new(db));
        let listed = persons.find_all(&ctx).await.expect("Failed to list persons");
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].name, "Ernesto Kiala");
    }

    #[tokio::test]
    async fn test_invalid_birth_date_fails_with_generic_message() {
        let (service, _db) = setup_test().await;
        let ctx = SessionContext::test();
        let (id, _) = service.open();

        service
            .set_fields(
                &id,
                &[
                    text("name", "Ernesto Kiala"),
                    FieldUpdate {
                        field: "birthDate".to_string(),
                        value: FieldValue::Date("amanhã".to_string()),
                    },
                    FieldUpdate {
                        field: "gender".to_string(),
                        value: FieldValue::Select("Masculino".to_string()),
                    },
                ],
            )
            .expect("set_fields failed");
        service.next(&id).expect("next failed");
        service
            .set_fields(&id, &scout_step_updates())
            .expect("set_fields failed");

        let outcome = service.submit(&ctx, &id).await.expect("submit failed");
        assert!(!outcome.completed);
        assert_eq!(
            outcome.notification.unwrap().description.as_deref(),
            Some(GENERIC_FAILURE)
        );
    }

    #[test]
    fn test_step_descriptor_content() {
        let fields = RegistrationService::step_fields(RegistrationStep::Person);
        let name = fields.iter().find(|f| f.id == "name").unwrap();
        assert_eq!(name.label, "Nome Completo");
        assert!(name.required);

        let gender = fields.iter().find(|f| f.id == "gender").unwrap();
        assert_eq!(gender.kind, FieldKind::Select);
        assert_eq!(gender.options, vec!["Masculino", "Feminino"]);

        let fields = RegistrationService::step_fields(RegistrationStep::Scout);
        let robustness = fields.iter().find(|f| f.id == "hasPhysicalRobustness").unwrap();
        assert_eq!(robustness.kind, FieldKind::Checkbox);

        assert_eq!(
            RegistrationService::step_title(RegistrationStep::Person),
            "Dados Pessoais"
        );
        assert_eq!(
            RegistrationService::step_description(RegistrationStep::Scout),
            "Preencha as informações específicas do escuteiro"
        );
    }
}
