use nila_oidcc::generator::{
    certification_profile_basic_plan, certification_profile_config_plan, certification_profile_formpost_hybrid_plan,
    certification_profile_implicit_plan, comprehensive::comprehensive_alias, comprehensive::comprehensive_description,
};
use nila_oidcc::prelude::*;
use std::collections::HashSet;

const ISSUER: &str = "https://idp.example";
const SECRET: &str = "s3cr3t";

fn discovery_url_of(plan: &Plan) -> String {
    plan.config
        .as_ref()
        .and_then(|config| config.server.as_ref())
        .and_then(|server| server.discovery_url.clone())
        .expect("plan should carry a discovery URL")
}

fn client_ids(plan: &Plan) -> Vec<String> {
    plan.config
        .as_ref()
        .map(|config| config.clients().map(|client| client.client_id.clone()).collect())
        .unwrap_or_default()
}

#[test]
fn test_basic_profile_matches_certification_example() {
    let plan = certification_profile_basic_plan("cp-basic", "Basic", SECRET, ISSUER, Publish::Summary)
        .expect("basic profile should build");

    assert_eq!(plan.name, "oidcc-basic-certification-test-plan");
    assert_eq!(discovery_url_of(&plan), "https://idp.example/.well-known/openid-configuration");
    assert_eq!(
        client_ids(&plan),
        vec!["conformance-cp-basic-1", "conformance-cp-basic-2", "conformance-cp-basic-post"]
    );
    assert_eq!(plan.publish, Publish::Summary);
    assert_eq!(plan.publish.as_str(), "summary");
    assert!(plan.id.is_empty(), "id is assigned by the suite");

    let config = plan.config.as_ref().unwrap();
    assert_eq!(config.alias, "cp-basic");
    assert_eq!(config.description, "Basic");
    assert!(config.clients().all(|client| client.client_secret == SECRET));

    let variant = plan.variant.as_ref().unwrap();
    assert_eq!(variant.server_metadata.as_deref(), Some("discovery"));
    assert_eq!(variant.client_registration.as_deref(), Some("static_client"));
    assert_eq!(variant.client_auth_type, None);
    println!("✅ Basic profile plan matches the certification example.");
}

#[test]
fn test_discovery_url_ignores_trailing_slash_for_every_profile() {
    for issuer in ["https://idp.example", "https://idp.example/", "https://idp.example//"] {
        for profile in CertificationProfile::ALL {
            let plan = profile
                .plan("alias", "Description", SECRET, issuer, Publish::None)
                .expect("profile should build");
            assert_eq!(
                discovery_url_of(&plan),
                "https://idp.example/.well-known/openid-configuration",
                "profile {:?} with issuer {}",
                profile,
                issuer
            );
        }
    }

    for issuer in ["https://idp.example/realms/test/", "https://idp.example/realms/test//"] {
        let nested = certification_profile_basic_plan("alias", "Nested", SECRET, issuer, Publish::None).unwrap();
        assert_eq!(
            discovery_url_of(&nested),
            "https://idp.example/realms/test/.well-known/openid-configuration",
            "issuer {}",
            issuer
        );
    }
    println!("✅ Discovery URL is stable regardless of trailing slashes.");
}

#[test]
fn test_profile_client_layouts() {
    let implicit = certification_profile_implicit_plan("imp", "Implicit", SECRET, ISSUER, Publish::None).unwrap();
    assert_eq!(implicit.name, "oidcc-implicit-certification-test-plan");
    assert_eq!(client_ids(&implicit), vec!["conformance-imp-1"]);

    let hybrid = certification_profile_formpost_hybrid_plan("fph", "Form Post Hybrid", SECRET, ISSUER, Publish::None).unwrap();
    assert_eq!(hybrid.name, "oidcc-formpost-hybrid-certification-test-plan");
    assert_eq!(client_ids(&hybrid).len(), 3);

    let config = certification_profile_config_plan("cfg", "Config", ISSUER, Publish::Everything).unwrap();
    assert_eq!(config.name, "oidcc-config-certification-test-plan");
    assert!(config.variant.is_none());
    assert!(client_ids(&config).is_empty());
    assert_eq!(config.config.as_ref().unwrap().publish, Publish::Everything);
    println!("✅ Each profile fills the expected client slots.");
}

#[test]
fn test_all_certification_profile_plans() {
    let plans = certification_profile_plans(SECRET, ISSUER, Publish::Summary).unwrap();

    assert_eq!(plans.len(), 7);
    let aliases: Vec<&str> = plans
        .iter()
        .map(|plan| plan.config.as_ref().unwrap().alias.as_str())
        .collect();
    assert_eq!(aliases[0], "certification-profile-basic");
    assert_eq!(aliases[3], "certification-profile-formpost-basic");
    assert_eq!(aliases[6], "certification-profile-config");
    assert_eq!(
        plans[5].config.as_ref().unwrap().description,
        "Certification Profile: Form Post Implicit"
    );
    assert!(plans.iter().all(|plan| plan.validate().is_ok()));
}

#[test]
fn test_invalid_issuer_is_rejected() {
    for issuer in ["", "not a url", "/relative/path", "mailto:admin@idp.example"] {
        let result = certification_profile_basic_plan("alias", "Basic", SECRET, issuer, Publish::None);
        assert!(
            matches!(result, Err(OidccError::InvalidIssuer(_))),
            "issuer {:?} should be rejected, got {:?}",
            issuer,
            result
        );
    }

    assert!(matches!(
        comprehensive_plans(SECRET, "::broken::", Publish::None),
        Err(OidccError::InvalidIssuer(_))
    ));
    assert!(matches!(
        certification_profile_plans(SECRET, "idp.example", Publish::None),
        Err(OidccError::InvalidIssuer(_))
    ));
    println!("✅ Malformed issuers abort plan construction.");
}

#[test]
fn test_alias_must_be_path_safe() {
    let result = certification_profile_basic_plan("cp/basic", "Basic", SECRET, ISSUER, Publish::None);
    assert!(matches!(result, Err(OidccError::Validation(_))));

    let result = certification_profile_basic_plan("", "Basic", SECRET, ISSUER, Publish::None);
    assert!(matches!(result, Err(OidccError::Validation(_))));
}

#[test]
fn test_comprehensive_matrix_covers_every_combination_once() {
    let plans = comprehensive_plans(SECRET, ISSUER, Publish::Summary).unwrap();
    assert_eq!(plans.len(), 48);

    let combinations: HashSet<(String, String, String)> = plans
        .iter()
        .map(|plan| {
            let variant = plan.variant.as_ref().unwrap();
            (
                variant.client_auth_type.clone().unwrap(),
                variant.response_type.clone().unwrap(),
                variant.response_mode.clone().unwrap(),
            )
        })
        .collect();
    assert_eq!(combinations.len(), 48);

    for auth_type in ClientAuthType::ALL {
        for response_type in ResponseType::ALL {
            for response_mode in ResponseMode::ALL {
                let key = (
                    auth_type.as_str().to_string(),
                    response_type.as_str().to_string(),
                    response_mode.as_str().to_string(),
                );
                assert!(combinations.contains(&key), "missing combination {:?}", key);
            }
        }
    }

    let aliases: HashSet<&str> = plans
        .iter()
        .map(|plan| plan.config.as_ref().unwrap().alias.as_str())
        .collect();
    assert_eq!(aliases.len(), 48, "aliases must be unique");
    println!("✅ Comprehensive matrix has 48 unique plans.");
}

#[test]
fn test_comprehensive_secrets_and_signing_algorithms() {
    let plans = comprehensive_plans(SECRET, ISSUER, Publish::None).unwrap();

    for plan in &plans {
        let variant = plan.variant.as_ref().unwrap();
        let config = plan.config.as_ref().unwrap();
        let auth_type = variant.client_auth_type.as_deref().unwrap();

        assert_eq!(plan.name, "oidcc-test-plan");
        assert_eq!(variant.server_metadata, None, "server metadata is cleared in the matrix");
        assert_eq!(variant.client_registration.as_deref(), Some("static_client"));
        assert!(config.client_secret_post.is_none());
        assert_eq!(config.clients().count(), 2);

        for client in config.clients() {
            match auth_type {
                "none" => assert!(client.client_secret.is_empty()),
                _ => assert_eq!(client.client_secret, SECRET),
            }
            match auth_type {
                "client_secret_jwt" => assert_eq!(client.client_secret_jwt_alg, "HS256"),
                _ => assert!(client.client_secret_jwt_alg.is_empty()),
            }
        }
    }
}

#[test]
fn test_comprehensive_naming() {
    assert_eq!(
        comprehensive_alias(ClientAuthType::ClientSecretBasic, ResponseType::CodeIdTokenToken, ResponseMode::Default),
        "conformance-basic-code-id_token-token"
    );
    assert_eq!(
        comprehensive_alias(ClientAuthType::None, ResponseType::Code, ResponseMode::FormPost),
        "conformance-none-codeformpost"
    );
    assert_eq!(
        comprehensive_description(ClientAuthType::ClientSecretJwt, ResponseType::IdTokenToken, ResponseMode::FormPost),
        "Comprehensive: Implicit (Token) JWT Form Post"
    );
    assert_eq!(
        comprehensive_description(ClientAuthType::None, ResponseType::Code, ResponseMode::Default),
        "Comprehensive: Authorization Code Public"
    );

    let plans = comprehensive_plans(SECRET, ISSUER, Publish::None).unwrap();
    let first = &plans[0];
    assert_eq!(first.config.as_ref().unwrap().alias, "conformance-none-code");
    assert_eq!(client_ids(first), vec!["conformance-conformance-none-code-1", "conformance-conformance-none-code-2"]);
    assert_eq!(first.variant.as_ref().unwrap().response_mode.as_deref(), Some("default"));
    assert_eq!(plans[1].variant.as_ref().unwrap().response_mode.as_deref(), Some("form_post"));
}

#[test]
fn test_plan_validation() {
    let mut plan = certification_profile_basic_plan("alias", "Basic", SECRET, ISSUER, Publish::None).unwrap();
    assert!(plan.validate().is_ok());

    plan.config.as_mut().unwrap().server = None;
    assert!(matches!(plan.validate(), Err(OidccError::Validation(_))));

    let unnamed = Plan::default();
    assert!(matches!(unnamed.validate(), Err(OidccError::Validation(_))));

    let mut jwt = comprehensive_plans(SECRET, ISSUER, Publish::None)
        .unwrap()
        .into_iter()
        .find(|plan| plan.variant.as_ref().unwrap().client_auth_type.as_deref() == Some("client_secret_jwt"))
        .unwrap();
    assert!(jwt.validate().is_ok());
    jwt.config.as_mut().unwrap().client2.as_mut().unwrap().client_secret_jwt_alg.clear();
    assert!(matches!(jwt.validate(), Err(OidccError::Validation(_))));
}
