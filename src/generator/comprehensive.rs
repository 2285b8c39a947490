// src/generator/comprehensive.rs

use super::{discovery_url, plan_client, plan_discovery, ClientSet};
use crate::error::OidccError;
use crate::model::{Plan, Variant};
use crate::publish::Publish;
use std::fmt;
use url::Url;

/// The suite's generic plan template, narrowed by the variant.
pub const COMPREHENSIVE_PLAN_NAME: &str = "oidcc-test-plan";

/// How the relying party authenticates at the token endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClientAuthType {
    None,
    ClientSecretBasic,
    ClientSecretPost,
    ClientSecretJwt,
}

impl ClientAuthType {
    pub const ALL: [ClientAuthType; 4] = [
        ClientAuthType::None,
        ClientAuthType::ClientSecretBasic,
        ClientAuthType::ClientSecretPost,
        ClientAuthType::ClientSecretJwt,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ClientAuthType::None => "none",
            ClientAuthType::ClientSecretBasic => "client_secret_basic",
            ClientAuthType::ClientSecretPost => "client_secret_post",
            ClientAuthType::ClientSecretJwt => "client_secret_jwt",
        }
    }

    /// Short label used in plan descriptions.
    pub fn label(&self) -> &'static str {
        match self {
            ClientAuthType::None => "Public",
            ClientAuthType::ClientSecretBasic => "Basic",
            ClientAuthType::ClientSecretPost => "Post",
            ClientAuthType::ClientSecretJwt => "JWT",
        }
    }

    /// Public clients carry no secret.
    fn effective_secret<'a>(&self, secret: &'a str) -> &'a str {
        match self {
            ClientAuthType::None => "",
            _ => secret,
        }
    }

    fn secret_alg(&self) -> &'static str {
        match self {
            ClientAuthType::ClientSecretJwt => "HS256",
            _ => "",
        }
    }
}

impl fmt::Display for ClientAuthType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The OAuth 2.0 `response_type` requested at the authorization endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResponseType {
    Code,
    IdToken,
    IdTokenToken,
    CodeIdToken,
    CodeToken,
    CodeIdTokenToken,
}

impl ResponseType {
    pub const ALL: [ResponseType; 6] = [
        ResponseType::Code,
        ResponseType::IdToken,
        ResponseType::IdTokenToken,
        ResponseType::CodeIdToken,
        ResponseType::CodeToken,
        ResponseType::CodeIdTokenToken,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ResponseType::Code => "code",
            ResponseType::IdToken => "id_token",
            ResponseType::IdTokenToken => "id_token token",
            ResponseType::CodeIdToken => "code id_token",
            ResponseType::CodeToken => "code token",
            ResponseType::CodeIdTokenToken => "code id_token token",
        }
    }

    /// Human name of the flow this response type selects.
    pub fn flow_description(&self) -> &'static str {
        match self {
            ResponseType::Code => "Authorization Code",
            ResponseType::IdToken => "Implicit",
            ResponseType::IdTokenToken => "Implicit (Token)",
            ResponseType::CodeIdToken => "Hybrid (ID Token)",
            ResponseType::CodeToken => "Hybrid (Token)",
            ResponseType::CodeIdTokenToken => "Hybrid (Both)",
        }
    }
}

impl fmt::Display for ResponseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResponseMode {
    Default,
    FormPost,
}

impl ResponseMode {
    pub const ALL: [ResponseMode; 2] = [ResponseMode::Default, ResponseMode::FormPost];

    pub fn as_str(&self) -> &'static str {
        match self {
            ResponseMode::Default => "default",
            ResponseMode::FormPost => "form_post",
        }
    }
}

impl fmt::Display for ResponseMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Generates one plan for every (auth type, response type, response mode) combination.
///
/// Plans come out in auth type, response type, response mode nesting order, 48 in total.
/// The issuer is parsed once up front; a malformed issuer fails the whole batch.
///
/// The server-metadata facet is cleared on every generated variant, so the suite
/// falls back to its template default for it.
pub fn comprehensive_plans(secret: &str, issuer: &str, publish: Publish) -> Result<Vec<Plan>, OidccError> {
    let discovery = discovery_url(issuer)?;

    let mut plans = Vec::with_capacity(ClientAuthType::ALL.len() * ResponseType::ALL.len() * ResponseMode::ALL.len());
    for auth_type in ClientAuthType::ALL {
        for response_type in ResponseType::ALL {
            for response_mode in ResponseMode::ALL {
                let mut plan = comprehensive_plan(secret, &discovery, auth_type, response_type, response_mode, publish);
                // TODO: confirm with the suite maintainers whether "discovery" was meant to stay set here.
                if let Some(variant) = plan.variant.as_mut() {
                    variant.server_metadata = None;
                }
                plans.push(plan);
            }
        }
    }

    tracing::debug!(count = plans.len(), issuer = %issuer, "Built comprehensive plan matrix.");
    Ok(plans)
}

/// `conformance-<auth>-<response type>` with `formpost` appended for form post.
pub fn comprehensive_alias(auth_type: ClientAuthType, response_type: ResponseType, response_mode: ResponseMode) -> String {
    let mut alias = format!(
        "conformance-{}-{}",
        auth_type.as_str().replace("client_secret_", ""),
        response_type.as_str().replace(' ', "-"),
    );
    if response_mode == ResponseMode::FormPost {
        alias.push_str("formpost");
    }
    alias
}

pub fn comprehensive_description(auth_type: ClientAuthType, response_type: ResponseType, response_mode: ResponseMode) -> String {
    let form_post = match response_mode {
        ResponseMode::FormPost => " Form Post",
        ResponseMode::Default => "",
    };
    format!(
        "Comprehensive: {} {}{}",
        response_type.flow_description(),
        auth_type.label(),
        form_post
    )
}

fn comprehensive_plan(
    secret: &str,
    discovery: &Url,
    auth_type: ClientAuthType,
    response_type: ResponseType,
    response_mode: ResponseMode,
    publish: Publish,
) -> Plan {
    let alias = comprehensive_alias(auth_type, response_type, response_mode);
    let description = comprehensive_description(auth_type, response_type, response_mode);
    let secret = auth_type.effective_secret(secret);
    let secret_alg = auth_type.secret_alg();

    let clients = ClientSet {
        client: Some(plan_client(&alias, "1", secret, secret_alg)),
        client2: Some(plan_client(&alias, "2", secret, secret_alg)),
        client_secret_post: None,
    };

    let variant = Variant {
        client_auth_type: Some(auth_type.as_str().to_string()),
        response_type: Some(response_type.as_str().to_string()),
        response_mode: Some(response_mode.as_str().to_string()),
        ..Variant::discovery_static_client()
    };

    plan_discovery(
        COMPREHENSIVE_PLAN_NAME,
        Some(variant),
        publish,
        &alias,
        &description,
        discovery,
        clients,
    )
}
