use nila_oidcc::prelude::*;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use tracing_subscriber::EnvFilter;
use url::Url;

#[derive(Debug, Deserialize)]
struct DemoConfig {
    issuer: String,
    secret: String,
    #[serde(default)]
    publish: Publish,
    /// Defaults to https://localhost:8443/api
    api_root: Option<String>,
    /// Where the suite serves its callbacks. Defaults to https://localhost:8443
    suite_root: Option<String>,
    #[serde(default)]
    headers: HashMap<String, String>,
    #[serde(default)]
    best_effort_delete: bool,
}

fn usage() {
    eprintln!("usage: conformance_plans <config.yaml> <create-profiles|create-comprehensive|list|clients|purge> [search]");
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut args = std::env::args().skip(1);
    let (Some(config_path), Some(command)) = (args.next(), args.next()) else {
        usage();
        return Ok(());
    };
    let search = args.next().unwrap_or_default();

    let demo: DemoConfig = serde_yaml::from_str(&fs::read_to_string(&config_path)?)?;

    let mut builder = ApiClientConfigBuilder::new();
    if let Some(root) = &demo.api_root {
        builder = builder.root_url(root)?;
    }
    for (name, value) in &demo.headers {
        builder = builder.header(name, value)?;
    }
    if demo.best_effort_delete {
        builder = builder.delete_policy(DeletePolicy::BestEffort);
    }
    let client = PlanApiClient::new(builder.build())?;

    match command.as_str() {
        "create-profiles" | "create-comprehensive" => {
            let plans = if command == "create-profiles" {
                certification_profile_plans(&demo.secret, &demo.issuer, demo.publish)?
            } else {
                comprehensive_plans(&demo.secret, &demo.issuer, demo.publish)?
            };

            let outcome = client.create_plans(&plans).await;
            for created in &outcome.created {
                println!("created {} ({})", created.id, created.name);
            }
            if let Some(e) = outcome.last_error {
                eprintln!("{} of {} plans failed, last error: {}", outcome.failed, plans.len(), e);
            }
        }
        "list" => {
            let listing = client
                .list_plans(&PlanListQuery::new().length(100).search(search))
                .await?;
            println!("{} of {} plans", listing.data.len(), listing.records_total);
            for plan in &listing.data {
                let alias = plan.config.as_ref().map(|config| config.alias.as_str()).unwrap_or("-");
                println!("{}\t{}\t{}", plan.id, plan.name, alias);
            }
        }
        "clients" => {
            let listing = client
                .list_plans(&PlanListQuery::new().length(40).search(search))
                .await?;
            let suite_root = Url::parse(demo.suite_root.as_deref().unwrap_or("https://localhost:8443"))?;
            let document = ClientRegistrationDocument::from_plans(&listing.data, &suite_root)?;
            print!("{}", serde_yaml::to_string(&document)?);
        }
        "purge" => {
            let deleted = client.delete_all_plans().await?;
            println!("deleted {} plans", deleted);
        }
        _ => usage(),
    }

    Ok(())
}
