//! # Domain Module
//!
//! Business logic for the membership system, independent of any UI
//! framework or storage mechanism.
//!
//! ## Module Organization
//!
//! - **models**: Person, Scout and auth entities with their derived
//!   attributes (age, active status, medical approval)
//! - **crud**: the uniform four-operation service contract and its
//!   fixed-message error taxonomy
//! - **person_service / scout_service**: the contract implemented per
//!   entity against the storage layer
//! - **registration**: the two-step intake workflow that creates a
//!   person and its scout record
//! - **member_table**: formatting and age-group classification behind
//!   the tables and panels
//! - **auth_service**: sign-in, session resolution and account bootstrap
//!
//! ## Business Rules
//!
//! - A scout always references an already-persisted person
//! - Identifiers are assigned by the storage layer, never by callers
//! - Derived attributes are computed, never stored
//! - Storage failures surface as fixed Portuguese user messages; the
//!   cause is only logged

pub mod auth_service;
pub mod crud;
pub mod member_table;
pub mod models;
pub mod person_service;
pub mod registration;
pub mod scout_service;

pub use auth_service::{AuthError, AuthService, AuthSession};
pub use crud::{CrudError, CrudService};
pub use member_table::MemberTableService;
pub use person_service::PersonService;
pub use registration::{RegistrationError, RegistrationService, SubmitOutcome};
pub use scout_service::ScoutService;
