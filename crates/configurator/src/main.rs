use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;

use configurator_lib::command::execute_json_batch;
use configurator_lib::harness::TestHarness;
use configurator_lib::settings::AppSettings;

/// Command line: `box-configurator [--settings <path>] [--save-settings] [--script <path>]`
#[derive(Debug, Default)]
struct Args {
    settings: Option<PathBuf>,
    /// Store the effective settings in the user config dir
    save_settings: bool,
    script: Option<PathBuf>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "box_configurator=info,configurator_lib=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = match parse_args() {
        Ok(args) => args,
        Err(e) => {
            tracing::error!("{e}");
            eprintln!("usage: box-configurator [--settings <path>] [--save-settings] [--script <path>]");
            return ExitCode::from(2);
        }
    };

    let settings = match &args.settings {
        Some(path) => match AppSettings::load_from(path) {
            Ok(settings) => {
                tracing::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(e) => {
                tracing::error!("{e}");
                return ExitCode::FAILURE;
            }
        },
        None => AppSettings::load(),
    };

    if args.save_settings {
        match settings.save() {
            Ok(path) => tracing::info!("Saved settings to {}", path.display()),
            Err(e) => tracing::warn!("{e}"),
        }
    }

    let mut harness = match TestHarness::with_settings(&settings) {
        Ok(harness) => harness,
        Err(e) => {
            tracing::error!("Failed to start session: {e}");
            return ExitCode::FAILURE;
        }
    };

    let script = match read_script(args.script.as_ref()) {
        Ok(script) => script,
        Err(e) => {
            tracing::error!("{e}");
            return ExitCode::FAILURE;
        }
    };

    match execute_json_batch(&mut harness, &script) {
        Ok(responses) => {
            let failed = responses.iter().filter(|r| !r.success).count();
            match serde_json::to_string_pretty(&responses) {
                Ok(json) => println!("{json}"),
                Err(e) => {
                    tracing::error!("Failed to serialize responses: {e}");
                    return ExitCode::FAILURE;
                }
            }
            tracing::info!("Executed {} commands ({} failed)", responses.len(), failed);
            if failed > 0 {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            }
        }
        Err(e) => {
            tracing::error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn parse_args() -> Result<Args, String> {
    let mut args = Args::default();
    let mut iter = std::env::args().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--settings" => {
                let path = iter.next().ok_or("--settings needs a path")?;
                args.settings = Some(PathBuf::from(path));
            }
            "--save-settings" => args.save_settings = true,
            "--script" => {
                let path = iter.next().ok_or("--script needs a path")?;
                args.script = Some(PathBuf::from(path));
            }
            other => return Err(format!("Unknown argument '{other}'")),
        }
    }
    Ok(args)
}

/// Command batch from a file, or from stdin when no path is given
fn read_script(path: Option<&PathBuf>) -> Result<String, String> {
    match path {
        Some(path) => std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read script {}: {e}", path.display())),
        None => {
            let mut script = String::new();
            std::io::stdin()
                .read_to_string(&mut script)
                .map_err(|e| format!("Failed to read script from stdin: {e}"))?;
            Ok(script)
        }
    }
}
