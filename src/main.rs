//! Deep Research CLI entry point
//!
//! - `deep-research run <query>` - Research a query and print the report
//! - `deep-research domains list|show` - Inspect configured domains
//! - `deep-research config` - Show or validate the configuration

mod cli;

use anyhow::{Context, Result};
use cli::output::Output;
use cli::{Cli, Commands, DomainCommands};
use deep_research::agents::LogNotifier;
use deep_research::research::ResearchEvent;
use deep_research::{ResearchConfig, ResearchManager, Stage};
use futures::StreamExt;
use std::sync::Arc;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Status lines of a full run: trace, planned, searched, written, notified
const TOTAL_STEPS: u32 = 5;

#[tokio::main]
async fn main() {
    let cli = Cli::parse_args();
    let output = if cli.no_color {
        Output::no_color()
    } else {
        Output::new()
    };

    if let Err(e) = run(cli, &output).await {
        output.error(&format!("{:#}", e));
        std::process::exit(1);
    }
}

async fn run(cli: Cli, output: &Output) -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing(cli.verbose, cli.json_logs);

    let config = ResearchConfig::load(&cli.config)
        .with_context(|| format!("loading {}", cli.config.display()))?;

    match cli.command {
        Commands::Run {
            query,
            domain,
            no_email,
        } => research(&config, output, query, domain, no_email).await,
        Commands::Domains(DomainCommands::List) => {
            list_domains(&config, output);
            Ok(())
        }
        Commands::Domains(DomainCommands::Show { name }) => show_domain(&config, output, &name),
        Commands::Config { validate } => show_config(&config, output, validate),
    }
}

fn init_tracing(verbose: bool, json: bool) {
    let default_level = if verbose {
        "deep_research=debug,info"
    } else {
        "deep_research=warn"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
            .init();
    }
}

async fn research(
    config: &ResearchConfig,
    output: &Output,
    query: String,
    domain: Option<String>,
    no_email: bool,
) -> Result<()> {
    let domain = domain
        .map(|name| config.domain_registry().require(&name))
        .transpose()?;

    let mut manager = ResearchManager::from_config(config)?;
    if no_email {
        manager = manager.with_notifier(Arc::new(LogNotifier));
    }

    output.banner();
    if let Some(domain) = &domain {
        output.info(&format!("Domain: {}", domain.title()));
    }

    let run = manager.new_run(domain);
    let cancel = run.cancellation_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            cancel.cancel();
        }
    });

    let mut events = run.events(query);
    let mut step = 0;
    while let Some(event) = events.next().await {
        match event? {
            ResearchEvent::TraceStarted(trace) => output.trace(&trace.id),
            ResearchEvent::Completed(report) => {
                output.success(&report.short_summary);
                output.report(&report.markdown_report);
                output.follow_ups(&report.follow_up_questions);
            }
            event @ ResearchEvent::NotificationFailed { .. } => {
                step += 1;
                output.warning(&format!("[{}/{}] {}", step, TOTAL_STEPS, event.status()));
            }
            event => {
                step += 1;
                output.step(step, TOTAL_STEPS, &event.status());
            }
        }
    }

    Ok(())
}

fn list_domains(config: &ResearchConfig, output: &Output) {
    let registry = config.domain_registry();
    output.header("Domains");
    if registry.is_empty() {
        output.info("No domains configured; runs use the default instructions");
        return;
    }
    for domain in registry.iter() {
        match &domain.description {
            Some(description) => output.list_item(&format!("{} - {}", domain.name, description)),
            None => output.list_item(&domain.name),
        }
    }
    output.usage("deep-research run --domain <name> \"your question\"");
}

fn show_domain(config: &ResearchConfig, output: &Output, name: &str) -> Result<()> {
    let domain = config.domain_registry().require(name)?;

    output.header(domain.title());
    output.kv("name", &domain.name);
    if let Some(description) = &domain.description {
        output.kv("description", description);
    }
    if let Some(label) = &domain.ui.input_label {
        output.kv("input", label);
    }

    output.subheader("Instruction overrides");
    for stage in [Stage::Planner, Stage::Searcher, Stage::Writer] {
        let state = match domain.instructions_for(stage) {
            Some(text) => format!("custom ({} chars)", text.chars().count()),
            None => "default".to_string(),
        };
        output.kv(stage.as_str(), &state);
    }

    if !domain.ui.examples.is_empty() {
        output.subheader("Example queries");
        for example in &domain.ui.examples {
            output.list_item(example);
        }
    }
    Ok(())
}

fn show_config(config: &ResearchConfig, output: &Output, validate: bool) -> Result<()> {
    output.header("Stages");
    for stage in [Stage::Planner, Stage::Searcher, Stage::Writer, Stage::Notifier] {
        output.kv(stage.as_str(), config.stages.model_for(stage));
    }

    output.header("Search");
    output.kv(
        "searches per plan",
        &config.search.searches_per_plan.to_string(),
    );
    output.kv(
        "results per search",
        &config.search.results_per_search.to_string(),
    );
    output.kv(
        "max concurrency",
        &config
            .search
            .max_concurrency
            .map_or_else(|| "unbounded".to_string(), |n| n.to_string()),
    );
    output.kv("search timeout", &format!("{}s", config.search.timeout_secs));
    output.kv(
        "notification policy",
        &format!("{:?}", config.pipeline.notification_policy),
    );
    output.kv(
        "email",
        config.email.as_ref().map_or("disabled", |e| e.to.as_str()),
    );

    output.header("Domains");
    output.kv("configured", &config.domain_registry().names().join(", "));

    if validate {
        for stage in [Stage::Planner, Stage::Searcher, Stage::Writer, Stage::Notifier] {
            let provider = config.provider_for(stage)?;
            if !provider.is_implemented() {
                anyhow::bail!(
                    "provider '{}' for stage {} is not available in this build",
                    provider.name(),
                    stage
                );
            }
        }
        if let Some(email) = &config.email {
            config.resolve_env(&email.api_key_env)?;
        }
        output.success("Configuration is valid");
    }
    Ok(())
}
