use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, Level};

use hotfix_propagator::cli::orchestration::{run_workflow, WorkflowOutcome};
use hotfix_propagator::cli::{resolve_workflow_args, Mode, RawInputs};
use hotfix_propagator::config;
use hotfix_propagator::gateway::github::{GithubGateway, RepoSlug};
use hotfix_propagator::orchestrator::HotfixOrchestrator;
use hotfix_propagator::outputs::OutputSink;
use hotfix_propagator::telemetry::init_tracing;
use hotfix_propagator::ui;

#[derive(clap::Parser)]
#[command(
    name = "hotfix-propagator",
    about = "Create hotfix branches from release tags and propagate them through pull requests"
)]
struct Args {
    #[arg(long, env = "INPUT_MODE", help = "Operation mode: branch-create or auto-merge")]
    mode: String,

    #[arg(long, env = "INPUT_VERSION", help = "Release version the hotfix is based on")]
    version: String,

    #[arg(long, env = "INPUT_HOTFIX-SUFFIX", help = "Suffix of the hotfix branch name")]
    hotfix_suffix: Option<String>,

    #[arg(
        long,
        env = "INPUT_GITHUB-TOKEN",
        hide_env_values = true,
        help = "Token used for GitHub API calls (falls back to GITHUB_TOKEN)"
    )]
    github_token: Option<String>,

    #[arg(
        long,
        env = "INPUT_DIRECT-MERGE-BRANCHES",
        help = "Comma-separated branches that receive a direct PR"
    )]
    direct_merge_branches: Option<String>,

    #[arg(
        long,
        env = "INPUT_UPDATE-THEN-MERGE-BRANCHES",
        help = "Comma-separated branches merged into the hotfix branch before their PR"
    )]
    update_then_merge_branches: Option<String>,

    #[arg(
        long,
        env = "INPUT_AUTO-CLEANUP",
        help = "Delete the hotfix branch after a fully successful run ('true' to enable)"
    )]
    auto_cleanup: Option<String>,

    #[arg(long, env = "GITHUB_REPOSITORY", help = "Target repository as owner/repo")]
    repository: Option<String>,

    #[arg(short, long, help = "Custom configuration file path")]
    config: Option<String>,

    #[arg(long, help = "Emit logs as JSON lines")]
    log_json: bool,
}

impl Args {
    fn inputs(&self) -> RawInputs {
        RawInputs {
            version: self.version.clone(),
            hotfix_suffix: self.hotfix_suffix.clone(),
            direct_merge_branches: self.direct_merge_branches.clone(),
            update_then_merge_branches: self.update_then_merge_branches.clone(),
            auto_cleanup: self.auto_cleanup.clone(),
        }
    }

    fn token(&self) -> Option<String> {
        self.github_token
            .clone()
            .or_else(|| std::env::var("GITHUB_TOKEN").ok())
            .filter(|token| !token.trim().is_empty())
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.log_json, Level::INFO);

    match run(&args) {
        Ok(WorkflowOutcome::Failed(_)) => std::process::exit(1),
        Ok(_) => Ok(()),
        Err(e) => {
            ui::display_error(&format!("Action failed: {:#}", e));
            std::process::exit(1);
        }
    }
}

fn run(args: &Args) -> Result<WorkflowOutcome> {
    let mode: Mode = args.mode.parse()?;
    info!(%mode, "starting hotfix-propagator");

    let config = config::load_config(args.config.as_deref()).context("Error loading config")?;
    let workflow = resolve_workflow_args(mode, &args.inputs(), &config)?;

    let token = args
        .token()
        .context("Input required and not supplied: github-token")?;
    let repository = args
        .repository
        .as_deref()
        .context("Repository not set: pass --repository or GITHUB_REPOSITORY")?;
    let slug = RepoSlug::parse(repository)?;

    let gateway = GithubGateway::new(&config.github.api_url, slug, &token, &config.github.user_agent)?;
    let orchestrator = HotfixOrchestrator::new(gateway)
        .with_poll_policy(config.polling.policy())
        .with_merge_method(config.defaults.merge_method)
        .with_page_size(config.github.per_page);

    ui::display_status(&format!("Running {} for {} on {}", mode, args.version.trim(), repository));
    let result = run_workflow(&orchestrator, &workflow)?;
    result
        .outputs
        .write_to(&OutputSink::from_env())
        .context("Failed to write action outputs")?;
    ui::report_workflow(mode, &result);

    Ok(result.outcome)
}
