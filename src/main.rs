use clap::Parser;
use credvault::cli::{Cli, Commands};
use credvault::config::Settings;

fn main() {
    let cli = Cli::parse();

    // Key generation needs neither config nor a vault.
    if let Commands::Keygen = cli.command {
        exit_on_error(credvault::cli::commands::keygen::execute());
        return;
    }

    let settings = match std::env::current_dir()
        .map_err(credvault::VaultError::from)
        .and_then(|cwd| Settings::load(&cwd))
    {
        Ok(settings) => settings,
        Err(e) => {
            credvault::cli::output::error(&e.to_string());
            std::process::exit(1);
        }
    };

    credvault::logging::init(&settings.log_level);

    let result = match cli.command {
        Commands::Keygen => credvault::cli::commands::keygen::execute(),
        Commands::Init => credvault::cli::commands::init::execute(&cli, &settings),
        Commands::Verify => credvault::cli::commands::verify::execute(&cli, &settings),
        Commands::Store {
            ref service,
            ref value,
        } => credvault::cli::commands::store::execute(&cli, &settings, service, value.as_deref()),
        Commands::Get { ref service } => {
            credvault::cli::commands::get::execute(&cli, &settings, service)
        }
        Commands::Update {
            ref service,
            ref value,
        } => {
            credvault::cli::commands::update::execute(&cli, &settings, service, value.as_deref())
        }
        Commands::Delete { ref service, force } => {
            credvault::cli::commands::delete::execute(&cli, &settings, service, force)
        }
        Commands::List => credvault::cli::commands::list::execute(&cli, &settings),
        Commands::Export {
            ref format,
            ref output,
        } => credvault::cli::commands::export::execute(
            &cli,
            &settings,
            format,
            output.as_deref(),
        ),
        Commands::Destroy { force } => {
            credvault::cli::commands::destroy::execute(&cli, &settings, force)
        }
    };

    exit_on_error(result);
}

fn exit_on_error(result: credvault::Result<()>) {
    if let Err(e) = result {
        credvault::cli::output::error(&e.to_string());
        std::process::exit(1);
    }
}
