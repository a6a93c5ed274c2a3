//! Command line surface
//!
//! Every command logs in once, runs a single operation and prints the result
//! as JSON on stdout. Logs go to stderr.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use qip_core::api::rr;
use qip_core::{AddressRange, AddressSelector, Client};
use qip_provision::{
    AddressManager, AddressSpec, DEFAULT_OBJECT_CLASS, RecordManager, RecordSpec, SubnetLookup,
};
use serde::Serialize;

/// Manage IPv4 addresses, subnets and A records in QIP
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// IPv4 address objects
    #[command(subcommand)]
    Address(AddressCommand),

    /// IPv4 subnets
    #[command(subcommand)]
    Subnet(SubnetCommand),

    /// Extra A records attached to address objects
    #[command(subcommand)]
    Rr(RecordCommand),
}

#[derive(Subcommand, Debug)]
pub enum AddressCommand {
    /// Show an address object
    Show { address: String },

    /// Create an address object, selecting a free address when none is given
    Create(AddressArgs),

    /// Change name, description, class or domain of an address object
    Update {
        #[arg(value_name = "ADDRESS")]
        id: String,
        #[command(flatten)]
        args: AddressArgs,
    },

    /// Delete an address object
    Delete { address: String },

    /// Reserve a free address without creating an object
    Select {
        #[arg(long)]
        subnet: String,
        #[command(flatten)]
        range: RangeArgs,
    },

    /// Release a reserved address
    Release { address: String },
}

#[derive(Args, Debug)]
pub struct AddressArgs {
    #[arg(long)]
    pub subnet: String,

    /// Hostname
    #[arg(long)]
    pub name: String,

    /// Explicit address; omit to select a free one
    #[arg(long)]
    pub address: Option<String>,

    #[arg(long, default_value = "")]
    pub description: String,

    #[arg(long, default_value = DEFAULT_OBJECT_CLASS)]
    pub object_class: String,

    /// DNS zone of the address
    #[arg(long = "domain", default_value = "")]
    pub domain_name: String,

    #[command(flatten)]
    pub range: RangeArgs,
}

#[derive(Args, Debug)]
pub struct RangeArgs {
    /// First address of the range to select from
    #[arg(long, requires = "range_end")]
    pub range_start: Option<String>,

    /// Last address of the range to select from
    #[arg(long, requires = "range_start")]
    pub range_end: Option<String>,
}

impl RangeArgs {
    fn to_range(&self) -> Option<AddressRange> {
        match (&self.range_start, &self.range_end) {
            (Some(start), Some(end)) => Some(AddressRange::new(start.as_str(), end.as_str())),
            _ => None,
        }
    }
}

impl AddressArgs {
    fn to_spec(&self) -> AddressSpec {
        AddressSpec {
            address: self.address.clone(),
            subnet: self.subnet.clone(),
            name: self.name.clone(),
            description: self.description.clone(),
            object_class: self.object_class.clone(),
            domain_name: self.domain_name.clone(),
            range: self.range.to_range(),
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum SubnetCommand {
    /// Show a subnet with its CIDR notation
    Show { address: String },
}

#[derive(Subcommand, Debug)]
pub enum RecordCommand {
    /// List all records attached to an address object
    List { address: String },

    /// Create an A record and print its id
    Create(RecordArgs),

    /// Show the record behind an id
    Show { id: String },

    /// Rename a record and print its new id
    Update {
        id: String,
        #[command(flatten)]
        args: RecordArgs,
    },

    /// Delete the record behind an id
    Delete { id: String },
}

#[derive(Args, Debug)]
pub struct RecordArgs {
    #[arg(long)]
    pub address: String,

    /// Host part of the owner (e.g. `www` or `*.apps`)
    #[arg(long)]
    pub name: String,

    #[arg(long = "domain")]
    pub domain_name: String,
}

impl RecordArgs {
    fn to_spec(&self) -> RecordSpec {
        RecordSpec::new(
            self.address.as_str(),
            self.name.as_str(),
            self.domain_name.as_str(),
        )
    }
}

#[derive(Serialize)]
struct RecordId {
    id: String,
}

#[derive(Serialize)]
struct Done<'a> {
    action: &'static str,
    target: &'a str,
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Run one command against an authenticated client
pub async fn execute(command: Command, client: Arc<Client>) -> Result<()> {
    match command {
        Command::Address(command) => execute_address(command, client).await,
        Command::Subnet(SubnetCommand::Show { address }) => {
            let info = SubnetLookup::new(client).lookup(&address).await?;
            print_json(&info)
        }
        Command::Rr(command) => execute_record(command, client).await,
    }
}

async fn execute_address(command: AddressCommand, client: Arc<Client>) -> Result<()> {
    let manager = AddressManager::new(Arc::clone(&client));

    match command {
        AddressCommand::Show { address } => {
            let stored = manager
                .read(&address)
                .await?
                .with_context(|| format!("V4Address {} not found", address))?;
            print_json(&stored)
        }
        AddressCommand::Create(args) => {
            let stored = manager.create(&args.to_spec()).await?;
            print_json(&stored)
        }
        AddressCommand::Update { id, args } => {
            let updated = manager.update(&id, &args.to_spec()).await?;
            print_json(&updated)
        }
        AddressCommand::Delete { address } => {
            manager.delete(&address).await?;
            print_json(&Done { action: "deleted", target: &address })
        }
        AddressCommand::Select { subnet, range } => {
            let selected = AddressSelector::default()
                .select_free(&client, &subnet, range.to_range().as_ref())
                .await?;
            print_json(&selected)
        }
        AddressCommand::Release { address } => {
            AddressSelector::default()
                .release_selected(&client, &address)
                .await?;
            print_json(&Done { action: "released", target: &address })
        }
    }
}

async fn execute_record(command: RecordCommand, client: Arc<Client>) -> Result<()> {
    match command {
        RecordCommand::List { address } => {
            let records = rr::load_all_for_object(&client, &address).await?;
            print_json(&records)
        }
        RecordCommand::Create(args) => {
            let id = RecordManager::new(client).create(&args.to_spec()).await?;
            print_json(&RecordId { id })
        }
        RecordCommand::Show { id } => {
            let record = RecordManager::new(client)
                .read(&id)
                .await?
                .context("could not find a record for this id")?;
            print_json(&record)
        }
        RecordCommand::Update { id, args } => {
            let id = RecordManager::new(client).update(&id, &args.to_spec()).await?;
            print_json(&RecordId { id })
        }
        RecordCommand::Delete { id } => {
            RecordManager::new(client).delete(&id).await?;
            print_json(&Done { action: "deleted", target: &id })
        }
    }
}
