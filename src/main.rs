//! CLI entry point for graph-users — a Microsoft Graph user-management demo.
//!
//! Loads credentials from the environment (optionally via `.env` /
//! `.env.local`), authenticates with OAuth2 client credentials, then runs a
//! numeric console menu dispatching to the four user operations.
//!
//! Exit codes:
//! - 0: normal termination (menu option 0, or stdin closed)
//! - 1: startup failure (unreadable env file, missing credentials)
//! - 2: argument validation error (clap handles this automatically)

use std::io::{self, Write};
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use graph_users::auth::TokenProvider;
use graph_users::client::GraphClient;
use graph_users::config::{self, GraphConfig};
use graph_users::users::{self, NewUser, UpdateUser};

#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Explicit env file to load before the credential variables are read.
    /// Without this flag, `.env.local` and `.env` are discovered in the
    /// working directory (`.env.local` wins).
    #[arg(long)]
    env_file: Option<std::path::PathBuf>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    // An explicitly named env file must exist; the discovered defaults
    // are optional.
    if let Some(path) = &args.env_file {
        if let Err(e) = dotenvy::from_path(path) {
            eprintln!("Error loading env file {}: {e}", path.display());
            return ExitCode::FAILURE;
        }
    } else {
        config::load_env_files();
    }

    let config = match GraphConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::FAILURE;
        }
    };

    // One client for the whole session. The bearer token is fetched lazily
    // on the first operation and reused until it expires.
    let client = GraphClient::new(TokenProvider::new(&config));

    loop {
        print_menu();

        match read_choice() {
            0 => {
                println!("Goodbye...");
                break;
            }
            1 => list_users_option(&client).await,
            2 => create_user_option(&client).await,
            3 => delete_user_option(&client).await,
            4 => update_user_option(&client).await,
            _ => println!("Invalid choice! Please try again."),
        }
    }

    ExitCode::SUCCESS
}

fn print_menu() {
    println!();
    println!("Please choose one of the following options:");
    println!("0. Exit");
    println!("1. List all user");
    println!("2. Create a user");
    println!("3. Delete a specific user");
    println!("4. Update user credentials");
    println!();
}

/// Reads one menu choice from stdin. Unparseable input maps to -1 so the
/// loop prints the invalid-choice message; EOF maps to 0 so a closed stdin
/// exits cleanly instead of spinning on the menu.
fn read_choice() -> i64 {
    let mut line = String::new();
    match io::stdin().read_line(&mut line) {
        Ok(0) => 0,
        Ok(_) => parse_choice(&line),
        Err(_) => -1,
    }
}

fn parse_choice(input: &str) -> i64 {
    input.trim().parse().unwrap_or(-1)
}

/// Prompts for and reads one trimmed line from stdin. `None` on EOF or
/// read failure.
fn prompt(label: &str) -> Option<String> {
    print!("{label}");
    io::stdout().flush().ok()?;
    let mut line = String::new();
    match io::stdin().read_line(&mut line) {
        Ok(0) | Err(_) => None,
        Ok(_) => Some(line.trim().to_string()),
    }
}

async fn list_users_option(client: &GraphClient) {
    match users::list_users(client).await {
        Ok(page) => {
            for user in &page.value {
                println!("User: {}", user.display_name.as_deref().unwrap_or(""));
                println!("  ID: {}", user.id);
                println!("  Email: {}", user.mail.as_deref().unwrap_or("NO EMAIL"));
            }

            println!();
            println!("More users available? {}", page.has_more());
            println!();
        }
        Err(e) => eprintln!("Error getting users: {e}"),
    }
}

async fn create_user_option(client: &GraphClient) {
    match users::create_user(client, &NewUser::demo()).await {
        Ok(user) => println!(
            "Created user: {} ({})",
            user.display_name.as_deref().unwrap_or(""),
            user.id
        ),
        Err(e) => println!("{e}"),
    }
}

async fn delete_user_option(client: &GraphClient) {
    let Some(username) = prompt("Display name: ") else {
        return;
    };

    // Exact legacy output strings, misspellings included.
    match users::delete_user_by_name(client, &username).await {
        Ok(true) => println!("User deleted succesfully"),
        Ok(false) => println!("User deletion unsuccesful"),
        Err(e) => eprintln!("Error deleting user: {e}"),
    }
}

async fn update_user_option(client: &GraphClient) {
    let Some(username) = prompt("Display name: ") else {
        return;
    };

    match users::update_user_by_name(client, &username, &UpdateUser::demo_contact()).await {
        Ok(true) => println!("User updated successfully"),
        Ok(false) => println!("User update unsuccessful"),
        Err(e) => eprintln!("Error updating user: {e}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_arguments_parse_successfully() {
        let cli = Cli::try_parse_from(["graph-users"]).expect("bare invocation should parse");
        assert!(cli.env_file.is_none(), "--env-file should default to None");
    }

    #[test]
    fn env_file_flag_is_accepted() {
        let cli = Cli::try_parse_from(["graph-users", "--env-file", "/tmp/demo.env"])
            .expect("should parse with --env-file");
        assert_eq!(
            cli.env_file.as_ref().unwrap().to_str().unwrap(),
            "/tmp/demo.env"
        );
    }

    #[test]
    fn menu_choices_parse_to_their_numbers() {
        assert_eq!(parse_choice("0\n"), 0);
        assert_eq!(parse_choice("1\n"), 1);
        assert_eq!(parse_choice("  4  "), 4);
    }

    #[test]
    fn unparseable_choice_maps_to_invalid() {
        // -1 never matches a menu arm, so the loop prints the
        // invalid-choice message and re-prompts.
        assert_eq!(parse_choice("list\n"), -1);
        assert_eq!(parse_choice(""), -1);
        assert_eq!(parse_choice("1.5"), -1);
    }

    #[test]
    fn negative_choices_are_passed_through() {
        // Negative numbers parse fine and simply hit the invalid arm.
        assert_eq!(parse_choice("-3"), -3);
    }
}
