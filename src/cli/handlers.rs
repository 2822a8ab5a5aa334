use std::path::PathBuf;

use tracing_subscriber::EnvFilter;

use crate::auth::hash_password;
use crate::config::Config;
use crate::error::{NoteboxError, Result};
use crate::forms::{SignupForm, Validated};
use crate::storage::SqliteStore;

/// Load the config and apply command-line overrides
fn load_config(config_path: Option<PathBuf>, database: Option<PathBuf>) -> Result<Config> {
    let mut config = Config::load(config_path.as_deref())?;
    if let Some(database) = database {
        config.database = database;
    }
    Ok(config)
}

fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_filter));
    // A subscriber may already be installed when embedded; keep that one.
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

pub fn handle_serve(
    config_path: Option<PathBuf>,
    database: Option<PathBuf>,
    listen: Option<String>,
) -> Result<()> {
    let mut config = load_config(config_path, database)?;
    if let Some(listen) = listen {
        config.listen = listen;
    }
    config.validate()?;
    init_tracing(&config);

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(crate::web::serve(config))
}

pub fn handle_user_add(
    config_path: Option<PathBuf>,
    database: Option<PathBuf>,
    username: String,
    password: String,
) -> Result<()> {
    let config = load_config(config_path, database)?;
    let store = SqliteStore::open(&config.database)?;

    let form = SignupForm {
        username,
        password1: password.clone(),
        password2: password,
    };
    let account = match form.validate(&store)? {
        Validated::Valid(account) => account,
        Validated::Invalid(errors) => {
            let messages: Vec<String> = ["username", "password1", "password2"]
                .iter()
                .flat_map(|field| {
                    errors
                        .field(field)
                        .iter()
                        .map(move |message| format!("{}: {}", field, message))
                })
                .collect();
            return Err(NoteboxError::InvalidInput(messages.join("; ")));
        }
    };

    let user = store.create_user(&account.username, &hash_password(&account.password))?;
    println!("Created user {} (id {})", user.username, user.id);
    Ok(())
}

pub fn handle_user_list(
    config_path: Option<PathBuf>,
    database: Option<PathBuf>,
    json: bool,
) -> Result<()> {
    let config = load_config(config_path, database)?;
    let store = SqliteStore::open(&config.database)?;
    let users = store.list_users()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&users)?);
        return Ok(());
    }

    if users.is_empty() {
        println!("No users.");
        return Ok(());
    }

    for user in &users {
        let notes = store.count_notes_for_author(user.id)?;
        println!(
            "{:>4}  {:<30}  {:>5} notes  joined {}",
            user.id,
            user.username,
            notes,
            user.date_joined.format("%Y-%m-%d")
        );
    }
    Ok(())
}
