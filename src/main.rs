use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use colored::Colorize;
use tracing::{error, info};

use lesson_planner::cli::Args;
use lesson_planner::config::{ApiKey, Config, GenerationConfig, ProviderKind};
use lesson_planner::{log, planner, provider, ux};

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    match run(args).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            error!("{e:#}");
            eprintln!("{} {e:#}", "error:".red().bold());
            ExitCode::FAILURE
        }
    }
}

/// Environment credential, or hidden terminal entry when interactive.
fn resolve_api_key(cfg: &Config, interactive: bool) -> anyhow::Result<ApiKey> {
    let from_env = std::env::var(&cfg.api_key_env).map(ApiKey::new).unwrap_or_default();
    if !from_env.is_empty() || !interactive {
        return Ok(from_env);
    }
    let label = match cfg.provider {
        ProviderKind::Gemini => "Enter your Gemini API key:",
        ProviderKind::OpenAI => "Enter your OpenAI API key:",
        ProviderKind::Ollama => "Enter any token for the local Ollama server:",
    };
    ux::read_secret(label)
}

/// Returns whether the last submission produced a lesson plan.
async fn run(args: Args) -> anyhow::Result<bool> {
    let mut cfg = Config::load(args.config.as_deref())?;
    args.apply_to(&mut cfg);

    log::init(cfg.log_level.as_deref(), args.debug)?;

    let interactive = !args.no_input;
    let model = cfg.model();
    let prov = provider::make_provider(
        cfg.provider,
        model.clone(),
        cfg.api_base(),
        Duration::from_secs(cfg.timeout_secs),
    )?;

    info!(
        provider = %cfg.provider,
        model = %model,
        temperature = cfg.temperature.value(),
        timeout_secs = cfg.timeout_secs,
        output_dir = %cfg.output_dir.display(),
        interactive,
        "config loaded"
    );

    let mut prompter = ux::Prompter::stdio();
    if interactive {
        ux::print_header();
        ux::print_tips();
    }

    let mut session = GenerationConfig::new(resolve_api_key(&cfg, interactive)?, cfg.temperature);
    if interactive && args.temperature.is_none() {
        session.temperature = prompter.temperature(session.temperature)?;
    }

    loop {
        let form = if interactive {
            prompter.fill_form(args.prefilled_form(), &args.open_fields())?
        } else {
            args.prefilled_form()
        };
        let request = form.submit();

        let spinner = ux::spinner("Generating your customized lesson plan...");
        let result = planner::generate(&request, &session, prov.as_ref()).await;
        spinner.finish_and_clear();

        ux::show_result(request.subject(), request.grade_level(), &result);

        if let Some(artifact) = planner::download_artifact(&request, &result) {
            let saved = if interactive {
                prompter.offer_download(&cfg.output_dir, &artifact, args.save)?
            } else if args.save {
                Some(ux::save_artifact(&cfg.output_dir, &artifact)?)
            } else {
                None
            };
            if let Some(path) = saved {
                info!(path = %path.display(), "lesson plan saved");
            }
        }

        if !interactive {
            return Ok(result.is_success());
        }
        if !prompter.confirm("Generate another lesson plan?")? {
            return Ok(result.is_success());
        }
        if session.api_key.is_empty() {
            session.api_key = resolve_api_key(&cfg, interactive)?;
        }
    }
}
