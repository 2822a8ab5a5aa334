use clap::Parser;
use notebox::cli::{handle_serve, handle_user_add, handle_user_list, Cli, Commands, UserAction};

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Serve { listen } => handle_serve(cli.config, cli.database, listen),
        Commands::User(user_cmd) => match user_cmd.action {
            UserAction::Add { username, password } => {
                handle_user_add(cli.config, cli.database, username, password)
            }
            UserAction::List { json } => handle_user_list(cli.config, cli.database, json),
        },
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
