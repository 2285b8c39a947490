// src/registration.rs

use crate::error::OidccError;
use crate::model::{Plan, PlanClient};
use crate::paths::join_path;
use serde::Serialize;
use url::Url;

const SCOPES: [&str; 7] = ["openid", "offline_access", "profile", "email", "phone", "address", "all"];
const GRANT_TYPES: [&str; 2] = ["authorization_code", "refresh_token"];
const RESPONSE_MODES: [&str; 7] = [
    "form_post",
    "query",
    "fragment",
    "jwt",
    "form_post.jwt",
    "query.jwt",
    "fragment.jwt",
];

/// A relying-party registration for the identity provider under test.
///
/// Derived from a listed plan; never sent back to the conformance suite.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClientRegistration {
    pub client_id: String,
    /// `$plaintext$<secret>`, so the identity provider reads it as an unhashed secret.
    pub client_secret: String,
    pub public: bool,
    pub redirect_uris: Vec<String>,
    pub scopes: Vec<String>,
    pub grant_types: Vec<String>,
    pub response_types: Vec<String>,
    pub response_modes: Vec<String>,
    pub authorization_policy: String,
    pub consent_mode: String,
    pub request_object_signing_alg: String,
    pub token_endpoint_auth_method: String,
}

/// The client slot of a plan config a registration is built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientRole {
    Primary,
    Secondary,
    SecretPost,
}

impl ClientRole {
    pub fn token_endpoint_auth_method(&self) -> &'static str {
        match self {
            ClientRole::Primary | ClientRole::Secondary => "client_secret_basic",
            ClientRole::SecretPost => "client_secret_post",
        }
    }
}

/// Which extra response and grant types a plan's clients need, decided by the plan name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrationFlow {
    Standard,
    Hybrid,
    Implicit,
}

impl RegistrationFlow {
    /// `-hybrid-` wins over `-implicit-` when a name contains both.
    pub fn from_plan_name(name: &str) -> Self {
        if name.contains("-hybrid-") {
            RegistrationFlow::Hybrid
        } else if name.contains("-implicit-") {
            RegistrationFlow::Implicit
        } else {
            RegistrationFlow::Standard
        }
    }

    fn extra_response_types(&self) -> &'static [&'static str] {
        match self {
            RegistrationFlow::Standard => &[],
            RegistrationFlow::Hybrid => &["code id_token", "code token", "code id_token token"],
            RegistrationFlow::Implicit => &["id_token", "token", "id_token token"],
        }
    }

    fn extra_grant_types(&self) -> &'static [&'static str] {
        match self {
            RegistrationFlow::Standard => &[],
            RegistrationFlow::Hybrid | RegistrationFlow::Implicit => &["implicit"],
        }
    }
}

fn owned(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| value.to_string()).collect()
}

/// Builds the registration for one plan client.
pub fn build_registration(
    role: ClientRole,
    client: &PlanClient,
    flow: RegistrationFlow,
    redirect_uri: &str,
) -> ClientRegistration {
    let mut grant_types = owned(&GRANT_TYPES);
    grant_types.extend(owned(flow.extra_grant_types()));

    let mut response_types = vec!["code".to_string()];
    response_types.extend(owned(flow.extra_response_types()));

    ClientRegistration {
        client_id: client.client_id.clone(),
        client_secret: format!("$plaintext${}", client.client_secret),
        public: false,
        redirect_uris: vec![redirect_uri.to_string()],
        scopes: owned(&SCOPES),
        grant_types,
        response_types,
        response_modes: owned(&RESPONSE_MODES),
        authorization_policy: "one_factor".to_string(),
        consent_mode: "implicit".to_string(),
        request_object_signing_alg: "none".to_string(),
        token_endpoint_auth_method: role.token_endpoint_auth_method().to_string(),
    }
}

impl Plan {
    /// Derives the relying-party registrations the identity provider needs for this plan.
    ///
    /// One registration per configured client, in `client`, `client2`, `client_secret_post`
    /// order. Every registration redirects to `<root>/test/a/<alias>/callback`. A plan
    /// without a config yields no registrations.
    ///
    /// # Errors
    ///
    /// Returns `InvalidUrl` when `root` cannot be used as a base URL.
    pub fn client_registrations(&self, root: &Url) -> Result<Vec<ClientRegistration>, OidccError> {
        let Some(config) = &self.config else {
            return Ok(Vec::new());
        };

        let redirect_uri = join_path(root, &["test", "a", config.alias.as_str(), "callback"])
            .ok_or_else(|| OidccError::InvalidUrl(format!("{} cannot be used as a base URL", root)))?;
        let flow = RegistrationFlow::from_plan_name(&self.name);

        let slots = [
            (ClientRole::Primary, &config.client),
            (ClientRole::Secondary, &config.client2),
            (ClientRole::SecretPost, &config.client_secret_post),
        ];

        Ok(slots
            .into_iter()
            .filter_map(|(role, client)| client.as_ref().map(|client| (role, client)))
            .map(|(role, client)| build_registration(role, client, flow, redirect_uri.as_str()))
            .collect())
    }
}

/// The registrations document consumed by the identity provider's configuration store:
/// `identity_providers.oidc.clients`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ClientRegistrationDocument {
    pub identity_providers: IdentityProviders,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IdentityProviders {
    pub oidc: OpenIdConnectProvider,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OpenIdConnectProvider {
    pub clients: Vec<ClientRegistration>,
}

impl ClientRegistrationDocument {
    pub fn new(clients: Vec<ClientRegistration>) -> Self {
        Self {
            identity_providers: IdentityProviders {
                oidc: OpenIdConnectProvider { clients },
            },
        }
    }

    /// Collects the registrations of every plan into one document.
    pub fn from_plans<'a>(plans: impl IntoIterator<Item = &'a Plan>, root: &Url) -> Result<Self, OidccError> {
        let mut clients = Vec::new();
        for plan in plans {
            clients.extend(plan.client_registrations(root)?);
        }
        Ok(Self::new(clients))
    }
}
