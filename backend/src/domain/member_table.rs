//! Data contract for the member tables and age-group panels.
//!
//! Sorting, row selection and row actions belong to the table
//! collaborator on the client; this module only guarantees stable
//! accessor keys, display-ready cell values and the age-group
//! classification the panels filter by.

use chrono::{Local, NaiveDate};

use shared::{Section, TableColumn};

use crate::domain::models::Scout;

/// Formats entities for the data tables and classifies scouts into
/// age-group sections.
#[derive(Clone, Default)]
pub struct MemberTableService;

impl MemberTableService {
    pub fn new() -> Self {
        Self
    }

    /// Column specification for the persons table. Keys are the stable
    /// accessor keys the table machinery sorts and selects by.
    pub fn columns(&self) -> Vec<TableColumn> {
        vec![
            column("name", "Nome", true),
            column("gender", "Gênero", false),
            column("birthDate", "Data de Nascimento", true),
            column("fatherName", "Nome do Pai", false),
            column("motherName", "Nome da Mãe", false),
            column("address", "Endereço", false),
            column("phoneNumber", "Telefone", false),
            column("age", "Idade", true),
        ]
    }

    /// Dates render as dd/mm/yyyy (pt-AO).
    pub fn format_date(&self, date: NaiveDate) -> String {
        date.format("%d/%m/%Y").to_string()
    }

    /// Absent optional attributes render as empty cells.
    pub fn display_optional(&self, value: &Option<String>) -> String {
        value.clone().unwrap_or_default()
    }

    /// The age range covered by a section, inclusive on both ends.
    pub fn age_range(&self, section: Section) -> (i32, i32) {
        match section {
            Section::Lobito => (6, 10),
            Section::Junior => (11, 14),
            Section::Senior => (15, 17),
            Section::Trucker => (18, 22),
        }
    }

    /// Which section an age falls into, if any.
    pub fn section_for_age(&self, age: i32) -> Option<Section> {
        [
            Section::Lobito,
            Section::Junior,
            Section::Senior,
            Section::Trucker,
        ]
        .into_iter()
        .find(|section| {
            let (min, max) = self.age_range(*section);
            (min..=max).contains(&age)
        })
    }

    /// Scouts whose person's age falls into the section on the given day.
    pub fn panel_scouts_on<'a>(
        &self,
        section: Section,
        scouts: &'a [Scout],
        today: NaiveDate,
    ) -> Vec<&'a Scout> {
        scouts
            .iter()
            .filter(|scout| self.section_for_age(scout.person.age_on(today)) == Some(section))
            .collect()
    }

    /// Scouts in the section as of the local current date.
    pub fn panel_scouts<'a>(&self, section: Section, scouts: &'a [Scout]) -> Vec<&'a Scout> {
        self.panel_scouts_on(section, scouts, Local::now().date_naive())
    }
}

fn column(key: &str, header: &str, sortable: bool) -> TableColumn {
    TableColumn {
        key: key.to_string(),
        header: header.to_string(),
        sortable,
    }
}
