//! CLI commands and argument parsing

use crate::request::QueryOptions;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Paged ARM resource client
#[derive(Parser, Debug)]
#[command(name = "resource-pager")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Client configuration file (YAML)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Management endpoint (overrides config and environment)
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Provider namespace, e.g. Microsoft.DataLakeAnalytics
    #[arg(long, global = true)]
    pub namespace: Option<String>,

    /// Resource collection, e.g. accounts
    #[arg(long = "type", global = true)]
    pub resource_type: Option<String>,

    /// api-version query parameter
    #[arg(long, global = true)]
    pub api_version: Option<String>,

    /// Subscription id
    #[arg(short, long, global = true)]
    pub subscription: Option<String>,

    /// Resource group
    #[arg(short = 'g', long, global = true)]
    pub resource_group: Option<String>,

    /// Output format
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// OData list options
#[derive(Args, Debug, Clone, Default)]
pub struct QueryArgs {
    /// $filter expression
    #[arg(long)]
    pub filter: Option<String>,

    /// $top page size hint
    #[arg(long)]
    pub top: Option<u32>,

    /// $skip count
    #[arg(long)]
    pub skip: Option<u32>,

    /// $select field list
    #[arg(long)]
    pub select: Option<String>,

    /// $orderby expression
    #[arg(long)]
    pub orderby: Option<String>,

    /// Request $count=true
    #[arg(long)]
    pub count: bool,

    /// Print each page as it arrives instead of after the full walk
    #[arg(long)]
    pub stream: bool,
}

impl QueryArgs {
    pub fn to_query(&self) -> QueryOptions {
        QueryOptions {
            filter: self.filter.clone(),
            top: self.top,
            skip: self.skip,
            select: self.select.clone(),
            orderby: self.orderby.clone(),
            count: self.count.then_some(true),
        }
    }
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List accounts in the subscription, or in the resource group if given
    List {
        #[command(flatten)]
        query: QueryArgs,
    },

    /// List a child collection of an account
    ListChildren {
        /// Account name
        account: String,

        /// Child collection, e.g. firewallRules
        child_type: String,

        #[command(flatten)]
        query: QueryArgs,
    },

    /// Show an account, or one of its children
    Get {
        /// Account name
        account: String,

        /// Child collection
        #[arg(long, requires = "child")]
        child_type: Option<String>,

        /// Child name
        #[arg(long, requires = "child_type")]
        child: Option<String>,
    },

    /// Create an account
    Create {
        /// Account name
        account: String,

        /// Azure region
        #[arg(short, long)]
        location: String,

        /// Tag as key=value (repeatable)
        #[arg(long = "tag", value_parser = parse_tag)]
        tags: Vec<(String, String)>,

        /// Properties object as inline JSON
        #[arg(long)]
        properties: Option<String>,

        /// Return once the service accepts, without polling
        #[arg(long)]
        no_wait: bool,
    },

    /// Update an account's tags or properties
    Update {
        /// Account name
        account: String,

        /// Tag as key=value (repeatable)
        #[arg(long = "tag", value_parser = parse_tag)]
        tags: Vec<(String, String)>,

        /// Properties object as inline JSON
        #[arg(long)]
        properties: Option<String>,

        /// Return once the service accepts, without polling
        #[arg(long)]
        no_wait: bool,
    },

    /// Delete an account
    Delete {
        /// Account name
        account: String,

        /// Return once the service accepts, without polling
        #[arg(long)]
        no_wait: bool,
    },

    /// Check whether an account name is available
    CheckName {
        /// Candidate name
        name: String,

        /// Azure region
        #[arg(short, long)]
        location: String,
    },
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output (one item per line)
    Json,
    /// Human-readable output
    Pretty,
}

fn parse_tag(raw: &str) -> std::result::Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected key=value, got '{raw}'")),
    }
}
