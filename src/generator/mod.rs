// src/generator/mod.rs

pub mod comprehensive;

pub use comprehensive::{comprehensive_plans, ClientAuthType, ResponseMode, ResponseType};

use crate::error::OidccError;
use crate::model::{Plan, PlanClient, PlanConfig, PlanServer, Variant};
use crate::paths::{is_path_safe, join_path};
use crate::publish::Publish;
use url::Url;

/// The fixed OpenID Connect certification profiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CertificationProfile {
    Basic,
    Hybrid,
    Implicit,
    FormPostBasic,
    FormPostHybrid,
    FormPostImplicit,
    /// Checks the provider's discovery document only. Has no clients and no variant.
    Config,
}

/// Which client slots of the plan config a profile fills.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ClientSlots {
    None,
    PrimaryOnly,
    All,
}

impl CertificationProfile {
    /// Every profile, in the order the suite's certification programme lists them.
    pub const ALL: [CertificationProfile; 7] = [
        CertificationProfile::Basic,
        CertificationProfile::Hybrid,
        CertificationProfile::Implicit,
        CertificationProfile::FormPostBasic,
        CertificationProfile::FormPostHybrid,
        CertificationProfile::FormPostImplicit,
        CertificationProfile::Config,
    ];

    /// The suite's plan template name.
    pub fn plan_name(&self) -> &'static str {
        match self {
            CertificationProfile::Basic => "oidcc-basic-certification-test-plan",
            CertificationProfile::Hybrid => "oidcc-hybrid-certification-test-plan",
            CertificationProfile::Implicit => "oidcc-implicit-certification-test-plan",
            CertificationProfile::FormPostBasic => "oidcc-formpost-basic-certification-test-plan",
            CertificationProfile::FormPostHybrid => "oidcc-formpost-hybrid-certification-test-plan",
            CertificationProfile::FormPostImplicit => "oidcc-formpost-implicit-certification-test-plan",
            CertificationProfile::Config => "oidcc-config-certification-test-plan",
        }
    }

    pub fn key(&self) -> &'static str {
        match self {
            CertificationProfile::Basic => "basic",
            CertificationProfile::Hybrid => "hybrid",
            CertificationProfile::Implicit => "implicit",
            CertificationProfile::FormPostBasic => "formpost-basic",
            CertificationProfile::FormPostHybrid => "formpost-hybrid",
            CertificationProfile::FormPostImplicit => "formpost-implicit",
            CertificationProfile::Config => "config",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            CertificationProfile::Basic => "Basic",
            CertificationProfile::Hybrid => "Hybrid",
            CertificationProfile::Implicit => "Implicit",
            CertificationProfile::FormPostBasic => "Form Post Basic",
            CertificationProfile::FormPostHybrid => "Form Post Hybrid",
            CertificationProfile::FormPostImplicit => "Form Post Implicit",
            CertificationProfile::Config => "Config",
        }
    }

    /// `certification-profile-<key>`
    pub fn default_alias(&self) -> String {
        format!("certification-profile-{}", self.key())
    }

    /// `Certification Profile: <label>`
    pub fn default_description(&self) -> String {
        format!("Certification Profile: {}", self.label())
    }

    fn client_slots(&self) -> ClientSlots {
        match self {
            CertificationProfile::Implicit | CertificationProfile::FormPostImplicit => ClientSlots::PrimaryOnly,
            CertificationProfile::Config => ClientSlots::None,
            _ => ClientSlots::All,
        }
    }

    /// Builds the plan for this profile.
    ///
    /// `secret` is shared by every generated client; the config profile has no clients and ignores it.
    ///
    /// # Errors
    ///
    /// Returns `InvalidIssuer` when `issuer` is not an absolute URL, and `Validation` when `alias`
    /// cannot be embedded in a callback path.
    pub fn plan(
        &self,
        alias: &str,
        description: &str,
        secret: &str,
        issuer: &str,
        publish: Publish,
    ) -> Result<Plan, OidccError> {
        ensure_path_safe_alias(alias)?;
        let discovery = discovery_url(issuer)?;

        let client = |suffix: &str| Some(plan_client(alias, suffix, secret, ""));
        let clients = match self.client_slots() {
            ClientSlots::None => ClientSet::default(),
            ClientSlots::PrimaryOnly => ClientSet {
                client: client("1"),
                ..ClientSet::default()
            },
            ClientSlots::All => ClientSet {
                client: client("1"),
                client2: client("2"),
                client_secret_post: client("post"),
            },
        };

        let variant = match self {
            CertificationProfile::Config => None,
            _ => Some(Variant::discovery_static_client()),
        };

        Ok(plan_discovery(
            self.plan_name(),
            variant,
            publish,
            alias,
            description,
            &discovery,
            clients,
        ))
    }
}

pub fn certification_profile_basic_plan(
    alias: &str,
    description: &str,
    secret: &str,
    issuer: &str,
    publish: Publish,
) -> Result<Plan, OidccError> {
    CertificationProfile::Basic.plan(alias, description, secret, issuer, publish)
}

pub fn certification_profile_hybrid_plan(
    alias: &str,
    description: &str,
    secret: &str,
    issuer: &str,
    publish: Publish,
) -> Result<Plan, OidccError> {
    CertificationProfile::Hybrid.plan(alias, description, secret, issuer, publish)
}

pub fn certification_profile_implicit_plan(
    alias: &str,
    description: &str,
    secret: &str,
    issuer: &str,
    publish: Publish,
) -> Result<Plan, OidccError> {
    CertificationProfile::Implicit.plan(alias, description, secret, issuer, publish)
}

pub fn certification_profile_formpost_basic_plan(
    alias: &str,
    description: &str,
    secret: &str,
    issuer: &str,
    publish: Publish,
) -> Result<Plan, OidccError> {
    CertificationProfile::FormPostBasic.plan(alias, description, secret, issuer, publish)
}

pub fn certification_profile_formpost_hybrid_plan(
    alias: &str,
    description: &str,
    secret: &str,
    issuer: &str,
    publish: Publish,
) -> Result<Plan, OidccError> {
    CertificationProfile::FormPostHybrid.plan(alias, description, secret, issuer, publish)
}

pub fn certification_profile_formpost_implicit_plan(
    alias: &str,
    description: &str,
    secret: &str,
    issuer: &str,
    publish: Publish,
) -> Result<Plan, OidccError> {
    CertificationProfile::FormPostImplicit.plan(alias, description, secret, issuer, publish)
}

/// The config profile only inspects the provider's discovery document, so it takes no secret.
pub fn certification_profile_config_plan(
    alias: &str,
    description: &str,
    issuer: &str,
    publish: Publish,
) -> Result<Plan, OidccError> {
    CertificationProfile::Config.plan(alias, description, "", issuer, publish)
}

/// Builds all seven certification profile plans with their canonical aliases and descriptions.
///
/// The first failure aborts the batch.
pub fn certification_profile_plans(secret: &str, issuer: &str, publish: Publish) -> Result<Vec<Plan>, OidccError> {
    let plans = CertificationProfile::ALL
        .iter()
        .map(|profile| {
            profile.plan(
                &profile.default_alias(),
                &profile.default_description(),
                secret,
                issuer,
                publish,
            )
        })
        .collect::<Result<Vec<_>, _>>()?;

    tracing::debug!(count = plans.len(), issuer = %issuer, "Built certification profile plans.");
    Ok(plans)
}

/// The optional clients of a plan config.
#[derive(Debug, Default)]
pub(crate) struct ClientSet {
    pub client: Option<PlanClient>,
    pub client2: Option<PlanClient>,
    pub client_secret_post: Option<PlanClient>,
}

/// `conformance-<alias>-<suffix>` with the shared secret and signing algorithm.
pub(crate) fn plan_client(alias: &str, suffix: &str, secret: &str, secret_alg: &str) -> PlanClient {
    PlanClient {
        client_id: format!("conformance-{}-{}", alias, suffix),
        client_secret: secret.to_string(),
        client_secret_jwt_alg: secret_alg.to_string(),
    }
}

/// Parses the issuer and joins the discovery document path onto it.
pub(crate) fn discovery_url(issuer: &str) -> Result<Url, OidccError> {
    let issuer_url = Url::parse(issuer).map_err(|e| OidccError::InvalidIssuer(format!("{}: {}", issuer, e)))?;

    join_path(&issuer_url, &[".well-known", "openid-configuration"])
        .ok_or_else(|| OidccError::InvalidIssuer(format!("{}: cannot be used as a base URL", issuer)))
}

pub(crate) fn ensure_path_safe_alias(alias: &str) -> Result<(), OidccError> {
    if is_path_safe(alias) {
        Ok(())
    } else {
        Err(OidccError::Validation(format!(
            "alias '{}' must be a non-empty URL path segment",
            alias
        )))
    }
}

/// Assembles a plan whose server is described by a discovery URL.
pub(crate) fn plan_discovery(
    name: &str,
    variant: Option<Variant>,
    publish: Publish,
    alias: &str,
    description: &str,
    discovery: &Url,
    clients: ClientSet,
) -> Plan {
    Plan {
        name: name.to_string(),
        variant,
        config: Some(PlanConfig {
            alias: alias.to_string(),
            description: description.to_string(),
            publish,
            server: Some(PlanServer {
                discovery_url: Some(discovery.to_string()),
                ..PlanServer::default()
            }),
            client: clients.client,
            client2: clients.client2,
            client_secret_post: clients.client_secret_post,
        }),
        publish,
        ..Plan::default()
    }
}
