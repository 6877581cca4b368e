use async_trait::async_trait;
use tracing::info;

use crate::domain::crud::{crud_failure, CrudError, CrudOp, CrudService, PERSON_LABELS};
use crate::domain::models::{Person, SessionContext};
use crate::storage::PersonRepository;

/// CRUD service for person records.
#[derive(Clone)]
pub struct PersonService {
    repo: PersonRepository,
}

impl PersonService {
    pub fn new(repo: PersonRepository) -> Self {
        Self { repo }
    }
}

#[async_trait]
impl CrudService<Person> for PersonService {
    async fn find_all(&self, ctx: &SessionContext) -> Result<Vec<Person>, CrudError> {
        info!("Listing persons for {}", ctx.email);

        self.repo
            .list_persons()
            .await
            .map_err(|e| crud_failure(CrudOp::FindAll, PERSON_LABELS, e))
    }

    async fn create(&self, ctx: &SessionContext, entity: Person) -> Result<Person, CrudError> {
        info!("Creating person '{}' for {}", entity.name, ctx.email);

        self.repo
            .store_person(&entity)
            .await
            .map_err(|e| crud_failure(CrudOp::Create, PERSON_LABELS, e))
    }

    async fn update(
        &self,
        ctx: &SessionContext,
        entity: Person,
        id: &str,
    ) -> Result<Person, CrudError> {
        info!("Updating person {} for {}", id, ctx.email);

        self.repo
            .update_person(&entity, id)
            .await
            .map_err(|e| crud_failure(CrudOp::Update, PERSON_LABELS, e))
    }

    async fn delete(&self, ctx: &SessionContext, entity: &Person) -> Result<bool, CrudError> {
        info!("Deleting person {} for {}", entity.id, ctx.email);

        self.repo
            .delete_person(&entity.id)
            .await
            .map_err(|e| crud_failure(CrudOp::Delete, PERSON_LABELS, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::PersonProps;
    use crate::storage::DbConnection;
    use chrono::NaiveDate;

    async fn setup_test() -> PersonService {
        let db = DbConnection::init_test()
            .await
            .expect("Failed to create test database");
        PersonService::new(PersonRepository::new(db))
    }

    fn sample_person(name: &str) -> Person {
        Person::new(PersonProps {
            name: name.to_string(),
            birth_date: NaiveDate::from_ymd_opt(2012, 9, 21).unwrap(),
            gender: "Feminino".to_string(),
            province: Some("Luanda".to_string()),
            ..Default::default()
        })
    }

    #[tokio::test]
    async fn test_create_assigns_identifier() {
        let service = setup_test().await;
        let ctx = SessionContext::test();

        let created = service
            .create(&ctx, sample_person("Luena Cassoma"))
            .await
            .expect("Failed to create person");

        assert!(!created.id.is_empty());
        assert_eq!(created.name, "Luena Cassoma");
        assert_eq!(created.province.as_deref(), Some("Luanda"));
    }

    #[tokio::test]
    async fn test_create_then_find_all_round_trip() {
        let service = setup_test().await;
        let ctx = SessionContext::test();

        let created = service
            .create(&ctx, sample_person("Domingas Van-Dúnem"))
            .await
            .expect("Failed to create person");

        let listed = service.find_all(&ctx).await.expect("Failed to list persons");
        assert_eq!(listed.len(), 1);
        // Field-for-field equal, including the assigned identifier
        assert_eq!(listed[0], created);
    }

    #[tokio::test]
    async fn test_find_all_orders_by_name() {
        let service = setup_test().await;
        let ctx = SessionContext::test();

        for name in ["Zeferino Lopes", "Adélia Campos", "Mateus Quissanga"] {
            service
                .create(&ctx, sample_person(name))
                .await
                .expect("Failed to create person");
        }

        let listed = service.find_all(&ctx).await.expect("Failed to list persons");
        let names: Vec<&str> = listed.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["Adélia Campos", "Mateus Quissanga", "Zeferino Lopes"]
        );
    }

    #[tokio::test]
    async fn test_update_person() {
        let service = setup_test().await;
        let ctx = SessionContext::test();

        let created = service
            .create(&ctx, sample_person("Isabel Tchingufo"))
            .await
            .expect("Failed to create person");

        let mut changed = created.clone();
        changed.address = Some("Rua da Missão, 14".to_string());
        changed.phone_number = Some("+244 923 000 111".to_string());

        let updated = service
            .update(&ctx, changed, &created.id)
            .await
            .expect("Failed to update person");

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.address.as_deref(), Some("Rua da Missão, 14"));
        assert_eq!(updated.phone_number.as_deref(), Some("+244 923 000 111"));
    }

    #[tokio::test]
    async fn test_update_missing_person_fails_with_fixed_message() {
        let service = setup_test().await;
        let ctx = SessionContext::test();

        let err = service
            .update(&ctx, sample_person("Ninguém"), "missing-id")
            .await
            .expect_err("update of a missing person should fail");

        assert_eq!(err.to_string(), "Não foi possível atualizar a pessoa");
    }

    #[tokio::test]
    async fn test_delete_person() {
        let service = setup_test().await;
        let ctx = SessionContext::test();

        let created = service
            .create(&ctx, sample_person("Paulo Ndala"))
            .await
            .expect("Failed to create person");

        let deleted = service
            .delete(&ctx, &created)
            .await
            .expect("Failed to delete person");
        assert!(deleted);

        let listed = service.find_all(&ctx).await.expect("Failed to list persons");
        assert!(listed.is_empty());

        // Deleting again removes nothing
        let deleted_again = service
            .delete(&ctx, &created)
            .await
            .expect("Failed to re-delete person");
        assert!(!deleted_again);
    }
}
