use async_trait::async_trait;
use tracing::error;

use crate::domain::models::SessionContext;

/// The four operations of the uniform CRUD contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrudOp {
    FindAll,
    Create,
    Update,
    Delete,
}

impl CrudOp {
    fn verb(&self) -> &'static str {
        match self {
            CrudOp::FindAll => "buscar",
            CrudOp::Create => "criar",
            CrudOp::Update => "atualizar",
            CrudOp::Delete => "deletar",
        }
    }
}

/// Portuguese noun forms for one entity, used for logging and for the
/// fixed user-facing failure messages.
#[derive(Debug, Clone, Copy)]
pub struct EntityLabels {
    pub singular: &'static str,
    pub plural: &'static str,
    pub singular_article: &'static str,
    pub plural_article: &'static str,
}

pub const PERSON_LABELS: EntityLabels = EntityLabels {
    singular: "pessoa",
    plural: "pessoas",
    singular_article: "a pessoa",
    plural_article: "as pessoas",
};

pub const SCOUT_LABELS: EntityLabels = EntityLabels {
    singular: "escuteiro",
    plural: "escuteiros",
    singular_article: "o escuteiro",
    plural_article: "os escuteiros",
};

/// Domain error surfaced by every CRUD operation. Carries only the fixed
/// user-facing message; the storage cause is logged, never propagated, so
/// callers cannot distinguish a constraint violation from a network
/// failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Não foi possível {verb} {noun}")]
pub struct CrudError {
    verb: &'static str,
    noun: &'static str,
}

impl CrudError {
    pub fn new(op: CrudOp, labels: EntityLabels) -> Self {
        let noun = match op {
            CrudOp::FindAll => labels.plural_article,
            _ => labels.singular_article,
        };
        Self {
            verb: op.verb(),
            noun,
        }
    }
}

/// Log a storage failure with its entity-specific context and turn it
/// into the fixed-message domain error.
pub(crate) fn crud_failure(op: CrudOp, labels: EntityLabels, err: anyhow::Error) -> CrudError {
    let noun = match op {
        CrudOp::FindAll => labels.plural,
        _ => labels.singular,
    };
    error!("Erro ao {} {}: {:#}", op.verb(), noun, err);
    CrudError::new(op, labels)
}

/// Uniform CRUD capability, parameterized by entity type. The session
/// context is threaded explicitly into every call so the credential
/// dependency stays visible and testable.
#[async_trait]
pub trait CrudService<T>: Send + Sync {
    /// Retrieve all records in the entity's canonical order.
    async fn find_all(&self, ctx: &SessionContext) -> Result<Vec<T>, CrudError>;

    /// Persist a new record and return it with store-assigned fields set.
    async fn create(&self, ctx: &SessionContext, entity: T) -> Result<T, CrudError>;

    /// Persist changes to the record identified by `id`.
    async fn update(&self, ctx: &SessionContext, entity: T, id: &str) -> Result<T, CrudError>;

    /// Remove the record identified by the entity's identifier.
    async fn delete(&self, ctx: &SessionContext, entity: &T) -> Result<bool, CrudError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_person_error_messages() {
        assert_eq!(
            CrudError::new(CrudOp::FindAll, PERSON_LABELS).to_string(),
            "Não foi possível buscar as pessoas"
        );
        assert_eq!(
            CrudError::new(CrudOp::Create, PERSON_LABELS).to_string(),
            "Não foi possível criar a pessoa"
        );
        assert_eq!(
            CrudError::new(CrudOp::Update, PERSON_LABELS).to_string(),
            "Não foi possível atualizar a pessoa"
        );
        assert_eq!(
            CrudError::new(CrudOp::Delete, PERSON_LABELS).to_string(),
            "Não foi possível deletar a pessoa"
        );
    }

    #[test]
    fn test_scout_error_messages() {
        assert_eq!(
            CrudError::new(CrudOp::FindAll, SCOUT_LABELS).to_string(),
            "Não foi possível buscar os escuteiros"
        );
        assert_eq!(
            CrudError::new(CrudOp::Create, SCOUT_LABELS).to_string(),
            "Não foi possível criar o escuteiro"
        );
    }
}
