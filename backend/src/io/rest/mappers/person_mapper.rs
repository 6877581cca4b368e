use anyhow::{Context, Result};
use chrono::NaiveDate;

use shared::{MemberRow, PersonDto, PersonListResponse, PersonResponse};

use crate::domain::member_table::MemberTableService;
use crate::domain::models::{Person, PersonProps};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Mapper between the person wire DTO and the domain model.
pub struct PersonMapper;

impl PersonMapper {
    /// Converts a person DTO to the domain model, parsing wire dates
    /// into calendar dates. Blank optional strings become absent values.
    pub fn to_domain(dto: PersonDto) -> Result<Person> {
        let birth_date = NaiveDate::parse_from_str(&dto.birth_date, DATE_FORMAT)
            .context("Failed to parse birthDate from DTO")?;
        let baptism_date = dto
            .baptism_date
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map(|d| NaiveDate::parse_from_str(d, DATE_FORMAT))
            .transpose()
            .context("Failed to parse baptismDate from DTO")?;

        Ok(Person::new(PersonProps {
            id: if dto.id.is_empty() { None } else { Some(dto.id) },
            name: dto.name,
            birth_date,
            gender: dto.gender,
            birth_place: none_if_blank(dto.birth_place),
            province: none_if_blank(dto.province),
            municipality: none_if_blank(dto.municipality),
            commune: none_if_blank(dto.commune),
            address: none_if_blank(dto.address),
            phone_number: none_if_blank(dto.phone_number),
            baptism_date,
            baptism_church: none_if_blank(dto.baptism_church),
        }))
    }

    /// Converts a domain person to its wire DTO.
    pub fn to_dto(person: &Person) -> PersonDto {
        PersonDto {
            id: person.id.clone(),
            name: person.name.clone(),
            birth_date: person.birth_date.format(DATE_FORMAT).to_string(),
            gender: person.gender.clone(),
            birth_place: person.birth_place.clone(),
            province: person.province.clone(),
            municipality: person.municipality.clone(),
            commune: person.commune.clone(),
            address: person.address.clone(),
            phone_number: person.phone_number.clone(),
            baptism_date: person
                .baptism_date
                .map(|d| d.format(DATE_FORMAT).to_string()),
            baptism_church: person.baptism_church.clone(),
        }
    }

    /// Formats a person as one row of the members table.
    pub fn to_member_row(person: &Person, table: &MemberTableService) -> MemberRow {
        MemberRow {
            id: person.id.clone(),
            name: person.name.clone(),
            gender: person.gender.clone(),
            birth_date: table.format_date(person.birth_date),
            father_name: String::new(),
            mother_name: String::new(),
            address: table.display_optional(&person.address),
            phone_number: table.display_optional(&person.phone_number),
            age: person.age(),
            person: Self::to_dto(person),
        }
    }

    pub fn to_list_dto(persons: Vec<Person>) -> PersonListResponse {
        PersonListResponse {
            persons: persons.iter().map(Self::to_dto).collect(),
        }
    }

    pub fn to_person_response(person: &Person, message: &str) -> PersonResponse {
        PersonResponse {
            person: Self::to_dto(person),
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

    fn sample_dto() -> PersonDto {
        PersonDto {
            id: String::new(),
            name: "Joana Sebastião".to_string(),
            birth_date: "2013-11-30".to_string(),
            gender: "Feminino".to_string(),
            birth_place: Some("Huambo".to_string()),
            province: Some("".to_string()),
            municipality: None,
            commune: None,
            address: Some("Bairro Académico".to_string()),
            phone_number: None,
            baptism_date: Some("2014-01-12".to_string()),
            baptism_church: None,
        }
    }

    #[test]
    fn test_to_domain_parses_dates_and_drops_blanks() {
        let person = PersonMapper::to_domain(sample_dto()).expect("Failed to map DTO");

        assert!(person.id.is_empty());
        assert_eq!(
            person.birth_date,
            NaiveDate::from_ymd_opt(2013, 11, 30).unwrap()
        );
        assert_eq!(
            person.baptism_date,
            Some(NaiveDate::from_ymd_opt(2014, 1, 12).unwrap())
        );
        // Blank strings are absent values, not empty ones
        assert_eq!(person.province, None);
        assert_eq!(person.birth_place.as_deref(), Some("Huambo"));
    }

    #[test]
    fn test_to_domain_rejects_bad_dates() {
        let mut dto = sample_dto();
        dto.birth_date = "30/11/2013".to_string();
        assert!(PersonMapper::to_domain(dto).is_err());
    }

    #[test]
    fn test_round_trip() {
        let person = PersonMapper::to_domain(sample_dto()).expect("Failed to map DTO");
        let dto = PersonMapper::to_dto(&person);

        assert_eq!(dto.name, "Joana Sebastião");
        assert_eq!(dto.birth_date, "2013-11-30");
        assert_eq!(dto.baptism_date.as_deref(), Some("2014-01-12"));
        assert_eq!(dto.province, None);
    }
}
