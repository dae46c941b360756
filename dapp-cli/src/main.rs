//! Terminal front-end of the transfer dApp.
//!
//! Drives the same controller as the browser build against a local-key
//! wallet and prints the same view models as text.

mod config;
mod types;

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use config::{DappConfig, CONFIG_FILE, PRIVATE_KEY_VAR};
use dapp_core::DappController;
use dapp_ethereum::RpcEnvironment;
use tracing::warn;
use tracing_subscriber::EnvFilter;
use types::{CliResponse, DialogAction, MenuAction};

type App = DappController<RpcEnvironment>;

#[derive(Parser)]
#[command(name = "dapp")]
#[command(about = "Send ETH and manage networks from the terminal", version)]
struct Cli {
    /// Config file
    #[arg(long, default_value = CONFIG_FILE)]
    config: PathBuf,
    /// RPC endpoint of the starting chain, overrides the config file
    #[arg(long)]
    rpc_url: Option<String>,
    /// Log filter, e.g. `info` or `dapp_core=debug`
    #[arg(long)]
    log: Option<String>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), anyhow::Error> {
    let cli = Cli::parse();
    dotenvy::dotenv().ok();

    let mut config = DappConfig::load(&cli.config);
    config.apply_overrides(cli.rpc_url, cli.log);
    init_logging(&config.log_filter)?;
    if let Err(e) = config.save(&cli.config) {
        warn!(error = %e, path = %cli.config.display(), "could not save config");
    }

    let private_key = std::env::var(PRIVATE_KEY_VAR).ok();
    if private_key.is_none() {
        warn!("{PRIVATE_KEY_VAR} is not set, connecting will fail");
    }
    let environment = config
        .environment(private_key.as_deref())
        .context("invalid wallet configuration")?;
    let mut app = DappController::new(environment);

    loop {
        println!("\n{}", app.view());
        print_main_menu(&app);

        let choice = prompt("\nYour choice")?;
        match handle_main_menu_choice(&mut app, &choice).await {
            Ok(CliResponse::Exit) => {
                println!("\nBye!");
                return Ok(());
            }
            Ok(CliResponse::Continue) => {}
            Err(e) => eprintln!("Error: {e}"),
        }
        print_notices(&mut app);
    }
}

fn init_logging(filter: &str) -> anyhow::Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(filter).with_context(|| format!("invalid log filter {filter:?}"))?,
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
    Ok(())
}

fn prompt(label: &str) -> io::Result<String> {
    print!("{label}: ");
    io::stdout().flush()?;
    let mut line = String::new();
    if io::stdin().read_line(&mut line)? == 0 {
        return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "stdin closed"));
    }
    Ok(line.trim().to_string())
}

fn print_main_menu(app: &App) {
    let connection = if app.session().is_connected() {
        "Disconnect"
    } else {
        "Connect wallet"
    };
    let advanced = if app.form().is_advanced() { "off" } else { "on" };
    let send = if app.can_send() { "" } else { " (unavailable)" };

    println!("\n[1] {connection}");
    println!("[2] Refresh account");
    println!("[3] Target address");
    println!("[4] Nonce");
    println!("[5] Amount (ETH)");
    println!("[6] Turn advanced mode {advanced}");
    if app.form().is_advanced() {
        println!("[7] Gas limit");
        println!("[8] Max priority fee (gwei)");
        println!("[9] Max fee (gwei)");
    }
    println!("[10] Clear");
    println!("[11] Send{send}");
    println!("[12] Add / switch network");
    println!("[13] Transaction history");
    println!("[0] Quit");
}

fn print_notices(app: &mut App) {
    for notice in app.take_notices() {
        println!("\n!! {notice}");
    }
}

async fn handle_main_menu_choice(app: &mut App, choice: &str) -> anyhow::Result<CliResponse> {
    let action: MenuAction = choice.parse().map_err(anyhow::Error::msg)?;
    match action {
        MenuAction::ToggleConnection => {
            if app.session().is_connected() {
                app.disconnect();
            } else if app.connect().await {
                println!("Connected");
            }
        }
        MenuAction::Refresh => {
            if !app.refresh().await {
                println!("Nothing refreshed");
            }
        }
        MenuAction::TargetAddress => {
            let value = prompt("Target address")?;
            app.form_mut().set_target_address(value);
        }
        MenuAction::Nonce => {
            let value = prompt("Nonce")?;
            app.form_mut().set_nonce(value);
        }
        MenuAction::Amount => {
            let value = prompt("Amount (ETH)")?;
            app.form_mut().set_amount(value);
        }
        MenuAction::ToggleAdvanced => app.form_mut().toggle_advanced(),
        MenuAction::GasLimit => {
            let value = prompt("Gas limit")?;
            ensure_advanced(app.form_mut().set_gas_limit(value));
        }
        MenuAction::MaxPriorityFee => {
            let value = prompt("Max priority fee (gwei)")?;
            ensure_advanced(app.form_mut().set_max_priority_fee_per_gas(value));
        }
        MenuAction::MaxFee => {
            let value = prompt("Max fee (gwei)")?;
            ensure_advanced(app.form_mut().set_max_fee_per_gas(value));
        }
        MenuAction::Clear => app.form_mut().clear(),
        MenuAction::Send => {
            if !app.can_send() {
                println!("Fill in target address, nonce and amount after connecting");
            } else if app.send_transaction().await {
                println!("Transaction confirmed");
            }
        }
        MenuAction::Network => network_dialog(app).await?,
        MenuAction::History => print_history(app),
        MenuAction::Quit => return Ok(CliResponse::Exit),
    }
    Ok(CliResponse::Continue)
}

fn ensure_advanced(accepted: bool) {
    if !accepted {
        println!("Turn advanced mode on first");
    }
}

fn print_history(app: &App) {
    let view = app.view();
    if view.history.is_empty() {
        println!("No transactions yet");
        return;
    }
    for row in &view.history {
        println!("{row}");
    }
}

async fn network_dialog(app: &mut App) -> anyhow::Result<()> {
    app.open_network_dialog();
    loop {
        println!("\n{}", app.view().network_dialog);
        println!("\n[1] Chain name");
        println!("[2] RPC URL");
        println!("[3] Chain ID");
        println!("[4] Currency decimals");
        println!("[5] Currency symbol");
        if app.can_switch_network() {
            println!("[6] Switch");
        }
        println!("[0] Cancel");

        let choice = prompt("\nYour choice")?;
        let action: DialogAction = match choice.parse() {
            Ok(action) => action,
            Err(e) => {
                eprintln!("Error: {e}");
                continue;
            }
        };
        match action {
            DialogAction::ChainName => {
                app.network_form_mut().chain_name = prompt("Chain name")?;
            }
            DialogAction::RpcUrl => {
                app.network_form_mut().rpc_url = prompt("RPC URL")?;
            }
            DialogAction::ChainId => {
                app.network_form_mut().chain_id = prompt("Chain ID")?;
            }
            DialogAction::CurrencyDecimals => {
                app.network_form_mut().currency_decimals = prompt("Currency decimals")?;
            }
            DialogAction::CurrencySymbol => {
                app.network_form_mut().currency_symbol = prompt("Currency symbol")?;
            }
            DialogAction::Switch => {
                let switched = app.switch_network().await;
                print_notices(app);
                if switched {
                    println!("Network switched");
                    return Ok(());
                }
            }
            DialogAction::Cancel => {
                app.cancel_network_dialog();
                return Ok(());
            }
        }
    }
}
