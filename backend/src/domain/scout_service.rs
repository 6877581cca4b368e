use async_trait::async_trait;
use tracing::info;

use crate::domain::crud::{crud_failure, CrudError, CrudOp, CrudService, SCOUT_LABELS};
use crate::domain::models::{Scout, SessionContext};
use crate::storage::ScoutRepository;

/// CRUD service for scout records. Reads embed the owning person; writes
/// carry only the person's identifier.
#[derive(Clone)]
pub struct ScoutService {
    repo: ScoutRepository,
}

impl ScoutService {
    pub fn new(repo: ScoutRepository) -> Self {
        Self { repo }
    }
}

#[async_trait]
impl CrudService<Scout> for ScoutService {
    async fn find_all(&self, ctx: &SessionContext) -> Result<Vec<Scout>, CrudError> {
        info!("Listing scouts for {}", ctx.email);

        self.repo
            .list_scouts()
            .await
            .map_err(|e| crud_failure(CrudOp::FindAll, SCOUT_LABELS, e))
    }

    async fn create(&self, ctx: &SessionContext, entity: Scout) -> Result<Scout, CrudError> {
        info!(
            "Creating scout for person {} requested by {}",
            entity.person.id, ctx.email
        );

        self.repo
            .store_scout(&entity)
            .await
            .map_err(|e| crud_failure(CrudOp::Create, SCOUT_LABELS, e))
    }

    async fn update(
        &self,
        ctx: &SessionContext,
        entity: Scout,
        id: &str,
    ) -> Result<Scout, CrudError> {
        info!("Updating scout {} for {}", id, ctx.email);

        self.repo
            .update_scout(&entity, id)
            .await
            .map_err(|e| crud_failure(CrudOp::Update, SCOUT_LABELS, e))
    }

    async fn delete(&self, ctx: &SessionContext, entity: &Scout) -> Result<bool, CrudError> {
        info!("Deleting scout {} for {}", entity.id, ctx.email);

        self.repo
            .delete_scout(&entity.id)
            .await
            .map_err(|e| crud_failure(CrudOp::Delete, SCOUT_LABELS, e))
    }
}
