mod args;
mod config;

use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use colored::Colorize;
use serde_json::Value;
use tracing::debug;

use args::{Cli, Command};
use config::Profile;
use rpcl_core::{
    parse_command, resolve_method, suggest, usage_args, CallRequest, DryRunInvoker, Invoker, Schema,
    ShimRegistry,
};

fn main() {
    let cli = Cli::parse();

    if cli.no_color {
        colored::control::set_override(false);
    }
    init_tracing(cli.verbose);

    if let Err(err) = run(cli) {
        eprintln!("{} {:#}", "Error:".red().bold(), err);
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        "rpcl=debug,rpcl_core=debug"
    } else {
        "rpcl=warn,rpcl_core=warn"
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let profile = resolve_profile(&cli)?;
    let descriptor = profile.descriptor_path()?;
    let schema = Schema::load(&descriptor)
        .with_context(|| format!("cannot load descriptor {}", descriptor.display()))?;

    match cli.command {
        Command::Rpc { service, method, args } => {
            let command = parse_command(&schema, ShimRegistry::well_known(), &service, &method, &args)
                .context("cannot build request")?;

            let call = CallRequest {
                method: command.method_path(),
                target: profile.target,
                metadata: profile.metadata,
                request: command.request,
            };
            debug!("Invoking {} on {:?}", call.method, call.target);

            let response = DryRunInvoker
                .invoke(&call)
                .with_context(|| format!("error while invoking rpc {}", call.method))?;
            print_json(&response, cli.raw)
        }
        Command::Describe { service, method } => describe(&schema, service.as_deref(), method.as_deref()),
        Command::Complete { mut words } => {
            let current = words.pop().unwrap_or_default();
            let words: Vec<&str> = words.iter().map(String::as_str).collect();
            for suggestion in suggest(&schema, &ShimRegistry::well_known(), &words, &current) {
                println!("{suggestion}");
            }
            Ok(())
        }
    }
}

/// Config file profile, overridden by command line flags.
fn resolve_profile(cli: &Cli) -> Result<Profile> {
    let path = cli
        .config
        .clone()
        .or_else(config::default_config_path)
        .unwrap_or_else(|| PathBuf::from("rpcl.toml"));
    debug!("Loading profile {} from {}", cli.profile, path.display());

    let mut profile = config::load_profile(&path, &cli.profile)?.merge(Profile {
        target: cli.target.clone(),
        descriptor: cli.descriptor.clone(),
        ..Profile::default()
    });
    profile.append_metadata(cli.metadata.iter().cloned());
    Ok(profile)
}

fn describe(schema: &Schema, service: Option<&str>, method: Option<&str>) -> Result<()> {
    match (service, method) {
        (None, _) => {
            println!("{}", "Services:".bold());
            for service in schema.services() {
                println!("  {}", service.full_name());
            }
        }
        (Some(service), None) => {
            let descriptor = schema
                .find_service(service)
                .ok_or_else(|| anyhow!("unknown service {service}"))?;
            println!("{}", "Methods:".bold());
            for method in descriptor.methods() {
                println!(
                    "  {}({}) returns {}",
                    method.name(),
                    schema.message(method.input()).full_name(),
                    schema.message(method.output()).full_name()
                );
            }
        }
        (Some(service), Some(method)) => {
            let descriptor = resolve_method(schema, service, method)?;
            println!("{} {}/{}", "Usage:".bold(), service, descriptor.name());
            println!("  input:  {}", schema.message(descriptor.input()).full_name());
            println!("  output: {}", schema.message(descriptor.output()).full_name());

            let usage = usage_args(schema, descriptor.input());
            if !usage.is_empty() {
                println!();
                println!("{}", "ARGS:".bold());
                println!("{usage}");
            }
        }
    }
    Ok(())
}

fn print_json(value: &Value, raw: bool) -> Result<()> {
    let json = if raw {
        serde_json::to_string(value)?
    } else {
        serde_json::to_string_pretty(value)?
    };
    println!("{json}");
    Ok(())
}
