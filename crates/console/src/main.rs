mod commands;
mod render;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use helpdesk_core::{
    load_config, load_config_from_env, validate_config, AppShell, Config, HttpTicketApi,
    TicketApi,
};

use commands::{Command, FilterChange, HELP};

/// Config file used when `HELPDESK_CONFIG` is unset.
const DEFAULT_CONFIG_PATH: &str = "helpdesk.toml";

#[tokio::main(flavor = "current_thread")]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Logs go to stderr; stdout carries the rendered views.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = load()?;
    validate_config(&config).context("Configuration validation failed")?;
    info!(base_url = %config.api.base_url, "Configuration loaded");

    let api: Arc<dyn TicketApi> =
        Arc::new(HttpTicketApi::new(&config.api).context("Failed to create API client")?);
    let mut shell = AppShell::new(api, &config.timing);
    let colored = std::env::var_os("NO_COLOR").is_none();

    println!("{HELP}\n");
    print!("{}", render::render(&shell, colored));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("Failed to read input")? else {
                    break;
                };
                match line.parse::<Command>() {
                    Ok(Command::Quit) => break,
                    Ok(command) => execute(&mut shell, command),
                    Err(e) => {
                        println!("{e}");
                        continue;
                    }
                }
            }
            Some(message) = shell.next_message() => shell.handle(message),
        }
        print!("{}", render::render(&shell, colored));
    }

    info!("Shutting down");
    Ok(())
}

fn load() -> Result<Config> {
    let path = match std::env::var("HELPDESK_CONFIG") {
        Ok(path) => Some(PathBuf::from(path)),
        Err(_) => Some(PathBuf::from(DEFAULT_CONFIG_PATH)).filter(|p| p.exists()),
    };

    match path {
        Some(path) => {
            info!("Loading configuration from {:?}", path);
            load_config(&path)
                .with_context(|| format!("Failed to load config from {:?}", path))
        }
        None => load_config_from_env().context("Failed to load config from environment"),
    }
}

fn execute(shell: &mut AppShell, command: Command) {
    match command {
        Command::Tab(tab) => shell.select_tab(tab),
        Command::Title(title) => shell.form_mut().set_title(title),
        Command::Description(text) => shell.form_mut().set_description(text),
        Command::Category(category) => shell.form_mut().set_category(category),
        Command::Priority(priority) => shell.form_mut().set_priority(priority),
        Command::Submit => {
            if let Err(e) = shell.form_mut().submit() {
                println!("{e}");
            }
        }
        Command::Search(text) => shell.board_mut().set_search_input(text),
        Command::Filter(change) => {
            let board = shell.board_mut();
            match change {
                FilterChange::Category(value) => board.set_category_filter(value),
                FilterChange::Priority(value) => board.set_priority_filter(value),
                FilterChange::Status(value) => board.set_status_filter(value),
            }
        }
        Command::Advance(id) => match shell.board_mut().advance_ticket(id) {
            Ok(next) => println!("Moving #{id} to {}", next.label()),
            Err(e) => println!("{e}"),
        },
        Command::Refresh => shell.refresh_active(),
        Command::Show => {}
        Command::Help => println!("{HELP}"),
        Command::Quit => {}
    }
}
