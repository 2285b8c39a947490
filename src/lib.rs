// src/lib.rs


pub mod client;
pub mod config;
pub mod error;
pub mod generator;
pub mod model;
mod paths;
pub mod publish;
pub mod registration;

/// The public prelude for the `nila-oidcc` crate.
///
/// This module re-exports the most commonly used types for convenience.
pub mod prelude {
    pub use crate::client::{BatchCreateOutcome, PlanApiClient};
    pub use crate::config::{ApiClientConfig, ApiClientConfigBuilder, DeletePolicy};
    pub use crate::error::OidccError;
    pub use crate::generator::{
        certification_profile_plans, comprehensive_plans, CertificationProfile, ClientAuthType, ResponseMode,
        ResponseType,
    };
    pub use crate::model::{
        Plan, PlanClient, PlanConfig, PlanCreateResponse, PlanListQuery, PlanMetadataResponse, PlanServer, Variant,
    };
    pub use crate::publish::Publish;
    pub use crate::registration::{ClientRegistration, ClientRegistrationDocument};
}
