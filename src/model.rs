// src/model.rs

use crate::error::OidccError;
use crate::publish::Publish;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Treats an explicit JSON `null` the same as a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// A conformance test plan.
///
/// The same type is used to describe a plan before it is created and to decode
/// the plan records returned by the suite's listing endpoint. Only `name`,
/// `variant` and `config` are sent when creating a plan; the remaining fields
/// are populated by the suite.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    /// Assigned by the suite. Empty until the plan has been created.
    #[serde(rename = "_id", default, deserialize_with = "null_as_default", skip_serializing_if = "String::is_empty")]
    pub id: String,
    /// The plan template name, e.g. `oidcc-basic-certification-test-plan`.
    #[serde(rename = "planName", default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant: Option<Variant>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<PlanConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<PlanOwner>,
    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(rename = "certificationProfileName", default, skip_serializing_if = "Option::is_none")]
    pub certification_profile_name: Option<Value>,
    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "Vec::is_empty")]
    pub modules: Vec<PlanModule>,
    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "String::is_empty")]
    pub version: String,
    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "String::is_empty")]
    pub summary: String,
    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "Publish::is_none")]
    pub publish: Publish,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub immutable: Option<Value>,
}

impl Plan {
    /// Checks the invariants a plan must hold before it is submitted for creation.
    ///
    /// The name must be non-empty. When a config is present it must agree with the
    /// variant: a `discovery` server-metadata variant needs a discovery URL, and a
    /// `client_secret_jwt` auth type needs a signing algorithm on every client.
    pub fn validate(&self) -> Result<(), OidccError> {
        if self.name.trim().is_empty() {
            return Err(OidccError::Validation("plan has no name".to_string()));
        }

        let (Some(variant), Some(config)) = (&self.variant, &self.config) else {
            return Ok(());
        };

        if variant.server_metadata.as_deref() == Some(Variant::SERVER_METADATA_DISCOVERY) {
            let has_discovery_url = config
                .server
                .as_ref()
                .and_then(|server| server.discovery_url.as_deref())
                .is_some_and(|url| !url.is_empty());
            if !has_discovery_url {
                return Err(OidccError::Validation(format!(
                    "plan '{}' uses discovery server metadata but its config has no discoveryUrl",
                    self.name
                )));
            }
        }

        if variant.client_auth_type.as_deref() == Some("client_secret_jwt") {
            if let Some(client) = config.clients().find(|client| client.client_secret_jwt_alg.is_empty()) {
                return Err(OidccError::Validation(format!(
                    "client '{}' uses client_secret_jwt but has no client_secret_jwt_alg",
                    client.client_id
                )));
            }
        }

        Ok(())
    }
}

/// Selects which facet of a plan template applies.
/// Absent fields are omitted on the wire and leave the template default in place.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variant {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server_metadata: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_registration: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_auth_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_mode: Option<String>,
}

impl Variant {
    pub const SERVER_METADATA_DISCOVERY: &'static str = "discovery";
    pub const CLIENT_REGISTRATION_STATIC: &'static str = "static_client";

    /// Server metadata from discovery with statically registered clients.
    pub fn discovery_static_client() -> Self {
        Self {
            server_metadata: Some(Self::SERVER_METADATA_DISCOVERY.to_string()),
            client_registration: Some(Self::CLIENT_REGISTRATION_STATIC.to_string()),
            ..Self::default()
        }
    }
}

/// The body submitted when creating a plan.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlanConfig {
    /// Embedded verbatim in the suite's callback path, so it must be URL-path-safe.
    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "String::is_empty")]
    pub alias: String,
    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "Publish::is_none")]
    pub publish: Publish,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server: Option<PlanServer>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client: Option<PlanClient>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client2: Option<PlanClient>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_secret_post: Option<PlanClient>,
}

impl PlanConfig {
    /// The configured clients in `client`, `client2`, `client_secret_post` order.
    pub fn clients(&self) -> impl Iterator<Item = &PlanClient> + '_ {
        [&self.client, &self.client2, &self.client_secret_post]
            .into_iter()
            .flatten()
    }
}

/// How the suite reaches the OpenID Provider under test: a discovery URL or explicit endpoints.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanServer {
    #[serde(rename = "discoveryUrl", default, skip_serializing_if = "Option::is_none")]
    pub discovery_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issuer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authorization_endpoint: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_endpoint: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub userinfo_endpoint: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jwks_uri: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub acr_values: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub login_hint: Option<String>,
}

/// Relying-party credentials the suite uses while running the plan's tests.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanClient {
    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "String::is_empty")]
    pub client_id: String,
    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "String::is_empty")]
    pub client_secret: String,
    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "String::is_empty")]
    pub client_secret_jwt_alg: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanOwner {
    pub sub: String,
    pub iss: String,
}

/// A test module of a created plan. Opaque to this crate.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlanModule {
    #[serde(rename = "testModule")]
    pub test_module: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant: Option<Variant>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub instances: Vec<Value>,
}

/// The suite's answer to a successful plan creation.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PlanCreateResponse {
    pub id: String,
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub modules: Vec<PlanModule>,
}

/// One page of the plan listing, following the server-side table pagination contract.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PlanMetadataResponse {
    #[serde(default)]
    pub draw: u64,
    #[serde(rename = "recordsTotal", default)]
    pub records_total: u64,
    #[serde(rename = "recordsFiltered", default)]
    pub records_filtered: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub data: Vec<Plan>,
}

/// Parameters of a plan listing request.
///
/// Zero counters and empty strings are left out of the query; `public` is always sent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlanListQuery {
    pub draw: u32,
    pub start: u32,
    pub length: u32,
    pub public: bool,
    pub search: String,
    pub order: String,
}

impl PlanListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn draw(mut self, draw: u32) -> Self {
        self.draw = draw;
        self
    }

    pub fn start(mut self, start: u32) -> Self {
        self.start = start;
        self
    }

    pub fn length(mut self, length: u32) -> Self {
        self.length = length;
        self
    }

    pub fn public(mut self, public: bool) -> Self {
        self.public = public;
        self
    }

    pub fn search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    pub fn order(mut self, order: impl Into<String>) -> Self {
        self.order = order.into();
        self
    }

    /// The query string pairs for this listing request.
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![("public", self.public.to_string())];

        for (key, value) in [("draw", self.draw), ("start", self.start), ("length", self.length)] {
            if value != 0 {
                pairs.push((key, value.to_string()));
            }
        }
        if !self.search.is_empty() {
            pairs.push(("search", self.search.clone()));
        }
        if !self.order.is_empty() {
            pairs.push(("order", self.order.clone()));
        }

        pairs
    }
}
