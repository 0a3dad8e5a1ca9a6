use crate::cli::{Cli, Command, CreateArgs};
use anyhow::{Context, bail};
use chrono::{DateTime, Utc};
use registry::Registry;
use registry::datastore::Fixtures;
use registry::domain::command::CreateCommand;
use registry::domain::config::RegistryConfig;
use registry::domain::registrar::Registrar;
use registry::features::flows::{AdmissionRequest, DomainCreatePlan, EppException, HostDeleteRequest};
use registry::features::tmch::TmchVerifier;
use registry::kernel::{Clock, FakeClock, SystemClock};
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(cli: Cli, config: RegistryConfig) -> anyhow::Result<()> {
    let clock: Arc<dyn Clock> = match cli.at {
        Some(at) => Arc::new(FakeClock::new(at)),
        None => Arc::new(SystemClock),
    };
    let now = clock.now();

    match cli.command {
        Command::VerifySmd { path, label } => verify_smd(&config, &path, label.as_deref(), now),
        Command::Check(args) => {
            let registry = load_registry(config, clock, cli.fixtures.as_deref())?;
            check(&registry, &args, now)
        },
        Command::Create(args) => {
            let registry = load_registry(config, clock, cli.fixtures.as_deref())?;
            create(&registry, &args, now)
        },
        Command::DeleteHost { host, registrar, superuser } => {
            let registry = load_registry(config, clock, cli.fixtures.as_deref())?;
            delete_host(&registry, &host, &registrar, superuser, now).await
        },
    }
}

fn load_registry(
    config: RegistryConfig,
    clock: Arc<dyn Clock>,
    fixtures: Option<&Path>,
) -> anyhow::Result<Registry> {
    let registry = Registry::bootstrap(config, clock).context("Registry bootstrap failed")?;
    if let Some(path) = fixtures {
        registry.store().seed(Fixtures::from_path(path)?);
    }
    Ok(registry)
}

fn registrar(registry: &Registry, client_id: &str) -> anyhow::Result<Registrar> {
    registry.config().registrar(client_id).with_context(|| format!("Unknown registrar '{client_id}'"))
}

fn read_command(path: &Path) -> anyhow::Result<CreateCommand> {
    let raw = std::fs::read_to_string(path).with_context(|| format!("Reading {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("Malformed create command in {}", path.display()))
}

fn rejected(err: &EppException) -> anyhow::Error {
    anyhow::anyhow!("{} {}: {err}", err.code(), err.name())
}

fn check(registry: &Registry, args: &CreateArgs, now: DateTime<Utc>) -> anyhow::Result<()> {
    let command = read_command(&args.command)?;
    let registrar = registrar(registry, &args.registrar)?;
    let request = AdmissionRequest { command: &command, registrar: &registrar, is_superuser: args.superuser, now };

    let plan = registry.create_flow().dry_run(&request).map_err(|e| rejected(&e))?;
    print_plan(&plan)
}

fn create(registry: &Registry, args: &CreateArgs, now: DateTime<Utc>) -> anyhow::Result<()> {
    let command = read_command(&args.command)?;
    let registrar = registrar(registry, &args.registrar)?;
    let request = AdmissionRequest { command: &command, registrar: &registrar, is_superuser: args.superuser, now };

    let created = registry.create_flow().run(&request).map_err(|e| rejected(&e))?;
    print_plan(&created.plan)?;

    let mut out = std::io::stdout().lock();
    writeln!(out, "repo id:      {}", created.repo_id)?;
    writeln!(out, "created:      {}", created.creation_time)?;
    writeln!(out, "expires:      {}", created.expiration_time)?;
    writeln!(out, "dns queued:   {}", registry.queues().dns.len())?;
    Ok(())
}

async fn delete_host(
    registry: &Registry,
    host: &str,
    client_id: &str,
    is_superuser: bool,
    now: DateTime<Utc>,
) -> anyhow::Result<()> {
    let request = HostDeleteRequest { fully_qualified_host_name: host, client_id, is_superuser, now };
    let job = registry.host_delete_flow().run(&request).map_err(|e| rejected(&e))?;
    info!(job_id = %job.job_id, repo_id = %job.target, "Host delete requested");

    let results = registry.async_delete_worker().drain().await;
    registry.shutdown();

    let mut out = std::io::stdout().lock();
    for (request, outcome) in &results {
        writeln!(out, "{} {}: {outcome}", request.job_id, request.target)?;
    }
    if results.iter().any(|(_, outcome)| !outcome.is_deleted()) {
        bail!("Host {host} was not deleted");
    }
    Ok(())
}

fn verify_smd(
    config: &RegistryConfig,
    path: &Path,
    label: Option<&str>,
    now: DateTime<Utc>,
) -> anyhow::Result<()> {
    let verifier = TmchVerifier::from_config(&config.tmch).context("Loading TMCH trust material")?;
    let encoded = std::fs::read_to_string(path).with_context(|| format!("Reading {}", path.display()))?;
    let mark = match label {
        Some(label) => verifier.verify_for_label(&encoded, label, now)?,
        None => verifier.verify(&encoded, now)?,
    };

    let mut out = std::io::stdout().lock();
    writeln!(out, "smd id:       {}", mark.data.id)?;
    writeln!(out, "mark:         {} ({})", mark.data.mark_name, mark.data.holder)?;
    writeln!(out, "labels:       {}", mark.data.labels.join(", "))?;
    writeln!(out, "valid:        {} .. {}", mark.data.not_before, mark.data.not_after)?;
    writeln!(out, "certificate:  #{} {}", mark.certificate.data.serial, mark.certificate.data.subject)?;
    Ok(())
}

fn print_plan(plan: &DomainCreatePlan) -> anyhow::Result<()> {
    let mut out = std::io::stdout().lock();
    writeln!(out, "domain:       {}", plan.fully_qualified_domain_name)?;
    writeln!(out, "years:        {}", plan.years)?;
    writeln!(out, "cost:         {}{}", plan.cost, if plan.is_premium { " (premium)" } else { "" })?;
    writeln!(out, "reservation:  {}", plan.reservation_type)?;
    writeln!(out, "sunrise:      {}", plan.is_sunrise)?;
    writeln!(out, "anchor:       {}", plan.is_anchor_tenant)?;
    if let Some(table) = &plan.idn_table {
        writeln!(out, "idn table:    {table}")?;
    }
    if let Some(smd_id) = &plan.smd_id {
        writeln!(out, "smd id:       {smd_id}")?;
    }
    if let Some(notice) = &plan.notice {
        writeln!(out, "claims notice: {} accepted {}", notice.tcn_id, notice.accepted_time)?;
    }
    Ok(())
}
