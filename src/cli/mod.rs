mod commands;
mod handlers;

pub use commands::{Cli, Commands, UserAction, UserCommand};
pub use handlers::{handle_serve, handle_user_add, handle_user_list};
