use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use neon_demo::cli::{Cli, MenuKind};
use neon_demo::config::DemoConfig;
use neon_demo::console::{run_demo, Transcript};
use neon_demo::menus::{ElementsMenu, PetMenu};
use neon_demo::script;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so stdout stays a clean JSON transcript
    let env_filter = EnvFilter::builder()
        .with_default_directive(cli.level_filter().into())
        .from_env_lossy();
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let config =
        DemoConfig::load(cli.config.as_deref())?.with_overrides(cli.timeout, cli.allow_anyone);
    config.menu.validate()?;

    let script = match &cli.script {
        Some(path) => script::load(path)?,
        None => script::builtin(cli.menu),
    };
    info!(
        menu = ?cli.menu,
        interactions = script.len(),
        timeout_secs = config.menu.timeout_secs,
        author_only = config.menu.author_only,
        "Starting demo"
    );

    let transcript = Transcript::printing();
    match cli.menu {
        MenuKind::Pets => {
            let run = run_demo(
                PetMenu::default(),
                PetMenu::PROMPT,
                &config.menu,
                script,
                cli.linger,
                transcript,
            )
            .await?;
            info!(state = %run.state, picks = run.definition.picks(), "Demo finished");
        }
        MenuKind::Elements => {
            let run = run_demo(
                ElementsMenu::default(),
                ElementsMenu::PROMPT,
                &config.menu,
                script,
                cli.linger,
                transcript,
            )
            .await?;
            info!(state = %run.state, chosen = ?run.definition.chosen(), "Demo finished");
        }
    }

    Ok(())
}
