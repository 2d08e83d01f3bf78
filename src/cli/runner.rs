//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands, OutputFormat, QueryArgs};
use crate::client::ResourceClient;
use crate::config::{load_config, ClientConfig};
use crate::error::{Error, Result};
use crate::pagination::Pager;
use crate::request::{
    NameAvailabilityParameters, ResourceIdentity, ResourceType, TrackedResourceParameters,
    UpdateParameters,
};
use futures::TryStreamExt;
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::io::Write;
use tracing::info;

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command, printing to stdout
    pub async fn run(&self) -> Result<()> {
        let mut stdout = std::io::stdout();
        self.run_to(&mut stdout).await
    }

    /// Run the CLI command, printing to `out`
    pub async fn run_to(&self, out: &mut (dyn Write + Send)) -> Result<()> {
        let config = self.resolve_config()?;
        let client = config.build_client()?;
        let scope = self.scope(&config)?;

        match &self.cli.command {
            Commands::List { query } => {
                let pager = client.list(&scope, &query.to_query())?;
                self.print_pager(out, pager, query).await
            }
            Commands::ListChildren {
                account,
                child_type,
                query,
            } => {
                let pager = client
                    .children(child_type.as_str())
                    .list_by_account(&scope.clone().account(account.as_str()), &query.to_query())?;
                self.print_pager(out, pager, query).await
            }
            Commands::Get {
                account,
                child_type,
                child,
            } => {
                let id = scope.clone().account(account.as_str());
                let value: Value = match (child_type, child) {
                    (Some(child_type), Some(child)) => {
                        client
                            .children(child_type.as_str())
                            .get(&id.child(child.as_str()))
                            .await?
                    }
                    _ => client.get(&id).await?,
                };
                self.emit(out, &value)
            }
            Commands::Create {
                account,
                location,
                tags,
                properties,
                no_wait,
            } => {
                let mut params = TrackedResourceParameters::new(location.as_str());
                for (key, value) in tags {
                    params = params.tag(key.as_str(), value.as_str());
                }
                if let Some(raw) = properties {
                    params = params.properties(parse_json("properties", raw)?);
                }
                let id = scope.clone().account(account.as_str());
                if *no_wait {
                    let accepted = client.begin_create::<_, Value>(&id, &params).await?;
                    self.emit_accepted(out, accepted.status(), accepted.body())
                } else {
                    let created: Value = client.create(&id, &params).await?;
                    self.emit(out, &created)
                }
            }
            Commands::Update {
                account,
                tags,
                properties,
                no_wait,
            } => {
                let params = UpdateParameters {
                    tags: (!tags.is_empty()).then(|| tags.iter().cloned().collect::<BTreeMap<_, _>>()),
                    properties: properties
                        .as_deref()
                        .map(|raw| parse_json("properties", raw))
                        .transpose()?,
                };
                let id = scope.clone().account(account.as_str());
                if *no_wait {
                    let accepted = client.begin_update::<_, Value>(&id, &params).await?;
                    self.emit_accepted(out, accepted.status(), accepted.body())
                } else {
                    let updated: Value = client.update(&id, &params).await?;
                    self.emit(out, &updated)
                }
            }
            Commands::Delete { account, no_wait } => {
                let id = scope.clone().account(account.as_str());
                if *no_wait {
                    let accepted = client.begin_delete(&id).await?;
                    self.emit(out, &json!({"status": accepted.status(), "complete": accepted.is_complete()}))
                } else {
                    client.delete(&id).await?;
                    self.emit(out, &json!({"deleted": account}))
                }
            }
            Commands::CheckName { name, location } => {
                let params = NameAvailabilityParameters::new(
                    name.as_str(),
                    format!(
                        "{}/{}",
                        client.resource_type().namespace,
                        client.resource_type().collection
                    ),
                );
                let result: Value = client
                    .check_name_availability(&scope, location, &params)
                    .await?;
                self.emit(out, &result)
            }
        }
    }

    /// Config file (or bare defaults), then environment, then flags
    fn resolve_config(&self) -> Result<ClientConfig> {
        let mut config = match &self.cli.config {
            Some(path) => load_config(path)?,
            None => {
                let namespace = self.cli.namespace.clone().unwrap_or_default();
                let collection = self.cli.resource_type.clone().unwrap_or_default();
                let mut config = ClientConfig::new(
                    ResourceType::new(namespace, collection),
                    self.cli.api_version.clone().unwrap_or_default(),
                );
                config.apply_env();
                config
            }
        };

        if let Some(url) = &self.cli.base_url {
            config.base_url.clone_from(url);
        }
        if let Some(namespace) = &self.cli.namespace {
            config.resource_type.namespace.clone_from(namespace);
        }
        if let Some(collection) = &self.cli.resource_type {
            config.resource_type.collection.clone_from(collection);
        }
        if let Some(version) = &self.cli.api_version {
            config.api_version.clone_from(version);
        }
        if let Some(sub) = &self.cli.subscription {
            config.subscription_id = Some(sub.clone());
        }
        config.validate()?;
        Ok(config)
    }

    fn scope(&self, config: &ClientConfig) -> Result<ResourceIdentity> {
        let mut id = config.subscription()?;
        if let Some(group) = &self.cli.resource_group {
            id = id.resource_group(group.as_str());
        }
        Ok(id)
    }

    async fn print_pager(
        &self,
        out: &mut (dyn Write + Send),
        pager: Pager<Value>,
        query: &QueryArgs,
    ) -> Result<()> {
        if query.stream {
            let mut pages = pager.pages();
            let mut total = 0usize;
            while let Some(page) = pages.try_next().await? {
                total += page.len();
                for item in page.items() {
                    self.emit(out, item)?;
                }
                out.flush()?;
            }
            info!(items = total, "List complete");
            Ok(())
        } else {
            let items = pager.collect_all().await?;
            info!(items = items.len(), "List complete");
            for item in &items {
                self.emit(out, item)?;
            }
            Ok(())
        }
    }

    fn emit_accepted(
        &self,
        out: &mut (dyn Write + Send),
        status: u16,
        body: Option<&Value>,
    ) -> Result<()> {
        self.emit(out, &json!({"status": status, "body": body}))
    }

    /// Output one value
    fn emit(&self, out: &mut (dyn Write + Send), value: &Value) -> Result<()> {
        let line = match self.cli.format {
            OutputFormat::Json => serde_json::to_string(value),
            OutputFormat::Pretty => serde_json::to_string_pretty(value),
        }
        .map_err(Error::Serialize)?;
        writeln!(out, "{line}")?;
        Ok(())
    }
}

fn parse_json(parameter: &str, raw: &str) -> Result<Value> {
    serde_json::from_str(raw)
        .map_err(|e| Error::invalid_argument(parameter, format!("invalid JSON: {e}")))
}

/// Process exit code for an error
///
/// | Error                          | Code |
/// |--------------------------------|------|
/// | `InvalidArgument`, config      | 2    |
/// | `Fault`                        | 3    |
/// | `MalformedResponse`            | 4    |
/// | anything else                  | 1    |
pub fn exit_code(error: &Error) -> i32 {
    match error {
        Error::InvalidArgument { .. } | Error::Config { .. } | Error::YamlParse(_) => 2,
        Error::Fault { .. } => 3,
        Error::MalformedResponse { .. } => 4,
        _ => 1,
    }
}
