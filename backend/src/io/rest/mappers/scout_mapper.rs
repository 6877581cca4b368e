use anyhow::{Context, Result};
use chrono::{DateTime, Utc};

use shared::{PanelRow, ScoutDto, ScoutListResponse, ScoutResponse};

use crate::domain::member_table::MemberTableService;
use crate::domain::models::{Scout, ScoutProps};
use crate::io::rest::mappers::person_mapper::PersonMapper;

/// Mapper between the scout wire DTO and the domain model.
pub struct ScoutMapper;

impl ScoutMapper {
    /// Converts a scout DTO to the domain model. The embedded person is
    /// mapped along with it.
    pub fn to_domain(dto: ScoutDto) -> Result<Scout> {
        let person = PersonMapper::to_domain(dto.person)?;

        let registration_date = dto
            .registration_date
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map(|d| {
                DateTime::parse_from_rfc3339(d).map(|parsed| parsed.with_timezone(&Utc))
            })
            .transpose()
            .context("Failed to parse registrationDate from DTO")?;

        Ok(Scout::new(ScoutProps {
            id: if dto.id.is_empty() { None } else { Some(dto.id) },
            person,
            group_number: none_if_blank(dto.group_number),
            unit_name: none_if_blank(dto.unit_name),
            previous_scout_unit: none_if_blank(dto.previous_scout_unit),
            previous_association: none_if_blank(dto.previous_association),
            proposal_number: none_if_blank(dto.proposal_number),
            registration_date,
            matriculation_number: none_if_blank(dto.matriculation_number),
            has_contagious_disease: dto.has_contagious_disease,
            has_physical_robustness: dto.has_physical_robustness,
            medical_observations: none_if_blank(dto.medical_observations),
        }))
    }

    /// Converts a domain scout to its wire DTO, computing the derived
    /// flags at mapping time.
    pub fn to_dto(scout: &Scout) -> ScoutDto {
        ScoutDto {
            id: scout.id.clone(),
            person: PersonMapper::to_dto(&scout.person),
            group_number: scout.group_number.clone(),
            unit_name: scout.unit_name.clone(),
            previous_scout_unit: scout.previous_scout_unit.clone(),
            previous_association: scout.previous_association.clone(),
            proposal_number: scout.proposal_number.clone(),
            registration_date: scout.registration_date.map(|d| d.to_rfc3339()),
            matriculation_number: scout.matriculation_number.clone(),
            has_contagious_disease: scout.has_contagious_disease,
            has_physical_robustness: scout.has_physical_robustness,
            medical_observations: scout.medical_observations.clone(),
            is_active: scout.is_active(),
            medically_approved: scout.medically_approved(),
        }
    }

    /// Formats a scout as one row of an age-group panel.
    pub fn to_panel_row(scout: &Scout, table: &MemberTableService) -> PanelRow {
        PanelRow {
            id: scout.id.clone(),
            name: scout.person.name.clone(),
            age: scout.person.age(),
            group_number: table.display_optional(&scout.group_number),
            unit_name: table.display_optional(&scout.unit_name),
            is_active: scout.is_active(),
            medically_approved: scout.medically_approved(),
            scout: Self::to_dto(scout),
        }
    }

    pub fn to_list_dto(scouts: Vec<Scout>) -> ScoutListResponse {
        ScoutListResponse {
            scouts: scouts.iter().map(Self::to_dto).collect(),
        }
    }

    pub fn to_scout_response(scout: &Scout, message: &str) -> ScoutResponse {
        ScoutResponse {
            scout: Self::to_dto(scout),
            success_message: message.to_string(),
        }
    }
}

fn none_if_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::PersonDto;

    fn sample_dto() -> ScoutDto {
        ScoutDto {
            id: String::new(),
            person: PersonDto {
                id: "person-9".to_string(),
                name: "Nelson Cafussa".to_string(),
                birth_date: "2010-06-15".to_string(),
                gender: "Masculino".to_string(),
                birth_place: None,
                province: None,
                municipality: None,
                commune: None,
                address: None,
                phone_number: None,
                baptism_date: None,
                baptism_church: None,
            },
            group_number: Some("77".to_string()),
            unit_name: Some("Unidade Kimbo".to_string()),
            previous_scout_unit: None,
            previous_association: None,
            proposal_number: Some(" ".to_string()),
            registration_date: Some("2025-02-03T10:15:00+00:00".to_string()),
            matriculation_number: Some("M-11".to_string()),
            has_contagious_disease: Some(false),
            has_physical_robustness: Some(true),
            medical_observations: None,
            is_active: false,
            medically_approved: false,
        }
    }

    #[test]
    fn test_to_domain_parses_timestamp_and_drops_blanks() {
        let scout = ScoutMapper::to_domain(sample_dto()).expect("Failed to map DTO");

        assert_eq!(scout.person.id, "person-9");
        assert_eq!(scout.proposal_number, None);
        assert!(scout.registration_date.is_some());
    }

    #[test]
    fn test_to_dto_computes_derived_flags() {
        let scout = ScoutMapper::to_domain(sample_dto()).expect("Failed to map DTO");
        let dto = ScoutMapper::to_dto(&scout);

        // Matriculation and registration date are both present
        assert!(dto.is_active);
        // Explicit no-disease and explicit robustness
        assert!(dto.medically_approved);
    }

    #[test]
    fn test_to_domain_rejects_bad_timestamp() {
        let mut dto = sample_dto();
        dto.registration_date = Some("03/02/2025".to_string());
        assert!(ScoutMapper::to_domain(dto).is_err());
    }
}
