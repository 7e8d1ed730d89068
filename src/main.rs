//! `github-agent`: build the GitHub API agent once and report the outcome.
//!
//! Usage:
//!   github-agent --spec api.github.com.fixed.json --print
//!
//! The token is read from `GITHUB_TOKEN` (or `--token-env`), optionally via a
//! `.env` file in the working directory.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use github_agent::runtime::{init_logging, run_bootstrap};
use github_agent::{AgentResult, AgentSettings, create_github_agent};

#[derive(Parser, Debug)]
#[command(
    name = "github-agent",
    version,
    about = "Build a GitHub REST API agent from the published OpenAPI description"
)]
struct Args {
    /// Settings file (.json, .yaml or .yml).
    #[arg(long, env = "GITHUB_AGENT_CONFIG")]
    config: Option<PathBuf>,

    /// Path to the GitHub OpenAPI description.
    #[arg(long)]
    spec: Option<PathBuf>,

    /// Environment variable holding the GitHub token.
    #[arg(long)]
    token_env: Option<String>,

    /// Prefix placed before the token in the `Authorization` header.
    #[arg(long)]
    auth_prefix: Option<String>,

    /// Model identifier for the agent.
    #[arg(long)]
    model: Option<String>,

    /// Maximum number of tools handed to the agent.
    #[arg(long)]
    max_tools: Option<usize>,

    /// Seconds to wait for the build before giving up.
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Print the assembled agent as JSON on success.
    #[arg(long)]
    print: bool,
}

impl Args {
    /// Defaults, then the settings file, then `GITHUB_AGENT_*`, then flags
    fn into_settings(self) -> AgentResult<AgentSettings> {
        let base = match &self.config {
            Some(path) => AgentSettings::from_file(path)?,
            None => AgentSettings::default(),
        };
        let mut settings = base.apply_env_overrides()?;

        if let Some(spec) = self.spec {
            settings.spec_path = spec;
        }
        if let Some(token_env) = self.token_env {
            settings.token_env_var = token_env;
        }
        if let Some(prefix) = self.auth_prefix {
            settings.auth_prefix = prefix;
        }
        if let Some(model) = self.model {
            settings.model = model;
        }
        if let Some(max_tools) = self.max_tools {
            settings.max_tools = max_tools;
        }
        if let Some(secs) = self.timeout_secs {
            settings.bootstrap_timeout_secs = secs;
        }

        settings.validate()?;
        Ok(settings)
    }
}

fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    init_logging();

    run(Args::parse())
}

fn run(args: Args) -> ExitCode {
    let print = args.print;

    let settings = match args.into_settings() {
        Ok(settings) => settings,
        Err(e) => {
            tracing::error!("{e}");
            return ExitCode::FAILURE;
        }
    };

    let timeout = settings.bootstrap_timeout();
    let agent = run_bootstrap(
        move || async move { create_github_agent(&settings).await },
        timeout,
    );

    // The bootstrap has already logged the failure with its stage
    let Some(agent) = agent else {
        return ExitCode::FAILURE;
    };

    tracing::info!(
        name = agent.name(),
        model = agent.model(),
        tools = agent.tools().len(),
        "GitHub agent created successfully"
    );

    if print {
        match serde_json::to_string_pretty(&agent.summary()) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                tracing::error!("Failed to render agent summary: {e}");
                return ExitCode::FAILURE;
            }
        }
    }

    ExitCode::SUCCESS
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl CapturedLogs {
        fn text(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    #[test]
    fn failed_build_logs_a_single_error() {
        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_ansi(false)
            .with_max_level(tracing::Level::INFO)
            .with_writer(move || writer.clone())
            .finish();

        let args = Args::parse_from([
            "github-agent",
            "--spec",
            "tests/fixtures/github_mini.json",
            "--token-env",
            "GITHUB_AGENT_MAIN_TEST_UNSET_TOKEN",
        ]);
        let code = tracing::subscriber::with_default(subscriber, || run(args));

        assert_eq!(format!("{code:?}"), format!("{:?}", ExitCode::FAILURE));
        let text = logs.text();
        let errors: Vec<&str> = text.lines().filter(|l| l.contains("ERROR")).collect();
        assert_eq!(errors.len(), 1, "{text}");
        assert!(errors[0].contains("Bootstrap failed"));
        assert!(errors[0].contains("stage="));
    }
}
