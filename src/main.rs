//! jsonstore - inspect and edit a JSON file store from the command line.

use std::{env, error::Error, fs, process};

use jsonfile_store::{
    cli::{
        CliService,
        formatting::{format_command_list, format_error},
    },
    config::{ConfigPaths, TomlSettingsHost},
    store::JsonFileStore,
    tracing_config,
};
use tracing::{debug, info, instrument};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let args: Vec<String> = env::args().collect();

    if env::var_os("JSONSTORE_LOG_TO_FILE").is_some() {
        tracing_config::init_with_file(&ConfigPaths::log_dir()?)?;
    } else {
        tracing_config::init()?;
    }

    ensure_config_dir()?;

    let store = JsonFileStore::new(Some(ConfigPaths::default_store()?));
    let host = TomlSettingsHost::new(ConfigPaths::settings_file()?);
    store.init(&host)?;
    debug!(settings = ?store.settings(), "Store ready");

    let cli_service = CliService::new(store);

    let category = args.get(1).map(|s| s.as_str()).unwrap_or("help");
    if matches!(category, "help" | "--help" | "-h") {
        println!("{}", format_command_list(&cli_service.list_all()));
        return Ok(());
    }

    let command = args.get(2).map(|s| s.as_str()).unwrap_or("");
    let command_args = args.get(3..).unwrap_or(&[]);

    match cli_service
        .execute_command(category, command, command_args)
        .await
    {
        Ok(output) => {
            if !output.trim().is_empty() {
                println!("{output}");
            }
            Ok(())
        }
        Err(e) => {
            eprintln!("{}: {e}", format_error("Error"));
            process::exit(1);
        }
    }
}

#[instrument]
fn ensure_config_dir() -> Result<(), Box<dyn Error>> {
    let config_dir = ConfigPaths::config_dir()?;
    if !config_dir.exists() {
        info!("Creating config directory: {}", config_dir.display());
        fs::create_dir_all(&config_dir)?;
    }
    Ok(())
}
