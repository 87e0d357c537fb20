//! ava CLI: Command-line interface for the Ava chat client

use ava_core::{ApiClient, Config, Message, SalesContext, ASSISTANT_ID};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Chat with Ava, the AI sales assistant
#[derive(Parser)]
#[command(name = "ava")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Backend base URL (overrides the config file)
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Path to the config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the chat TUI (default when no command specified)
    Tui,

    /// Print the conversation history
    History {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Send a message and print the assistant's reply
    Send {
        /// The message text
        text: String,

        /// Sales context for the message
        #[arg(long, default_value = "onboarding")]
        context: SalesContext,

        /// Output the full updated history as JSON
        #[arg(long)]
        json: bool,
    },

    /// Replace the text of a previously sent message
    Update {
        /// Id of the message to update
        id: i64,

        /// The new text
        text: String,

        /// Output the full updated history as JSON
        #[arg(long)]
        json: bool,
    },

    /// Delete a previously sent message
    Delete {
        /// Id of the message to delete
        id: i64,

        /// Output the full updated history as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    let config = load_config(cli.config.as_deref(), cli.base_url);

    match cli.command {
        None | Some(Commands::Tui) => {
            let rt = tokio::runtime::Runtime::new().expect("Failed to create tokio runtime");
            if let Err(e) = rt.block_on(ava_tui::run_tui(&config)) {
                eprintln!("Error: {e}");
                std::process::exit(1);
            }
        }
        Some(Commands::History { json }) => {
            let messages = run_api(&config, |client| async move {
                client.fetch_history().await
            });
            print_messages(&messages, json);
        }
        Some(Commands::Send {
            text,
            context,
            json,
        }) => {
            let messages = run_api(&config, |client| async move {
                client.send_message(&text, context).await
            });
            if json {
                print_messages(&messages, true);
            } else if let Some(reply) = messages.iter().rev().find(|m| !m.is_from_customer()) {
                println!("{}", reply.text);
            }
        }
        Some(Commands::Update { id, text, json }) => {
            let messages = run_api(&config, |client| async move {
                client
                    .update_message(ava_core::MessageId::Confirmed(id), &text)
                    .await
            });
            print_messages(&messages, json);
        }
        Some(Commands::Delete { id, json }) => {
            let messages = run_api(&config, |client| async move {
                client
                    .delete_message(ava_core::MessageId::Confirmed(id))
                    .await
            });
            print_messages(&messages, json);
        }
    }
}

/// Load the config, applying CLI overrides.
fn load_config(path: Option<&std::path::Path>, base_url: Option<String>) -> Config {
    let mut config = match path {
        Some(path) => match Config::load(path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Error loading config: {e}");
                std::process::exit(1);
            }
        },
        None => Config::default(),
    };
    if let Some(base_url) = base_url {
        config.base_url = base_url;
    }
    config
}

/// Run a single API call to completion, exiting on failure.
fn run_api<F, Fut>(config: &Config, f: F) -> Vec<Message>
where
    F: FnOnce(ApiClient) -> Fut,
    Fut: std::future::Future<Output = Result<Vec<Message>, ava_core::ApiError>>,
{
    let client = ApiClient::new(config);
    let rt = tokio::runtime::Runtime::new().expect("Failed to create tokio runtime");
    match rt.block_on(f(client)) {
        Ok(messages) => messages,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}

/// Print a message list, either as labeled lines or JSON.
fn print_messages(messages: &[Message], json: bool) {
    if json {
        let values: Vec<serde_json::Value> = messages
            .iter()
            .map(|m| {
                serde_json::json!({
                    "id": m.id.confirmed(),
                    "senderId": m.sender_id,
                    "text": m.text,
                })
            })
            .collect();
        println!(
            "{}",
            serde_json::to_string_pretty(&values).expect("failed to serialize")
        );
        return;
    }

    for msg in messages {
        let who = if msg.sender_id == ASSISTANT_ID {
            "ava"
        } else {
            "you"
        };
        match msg.id.confirmed() {
            Some(id) => println!("[{id}] {who}: {}", msg.text),
            None => println!("[-] {who}: {}", msg.text),
        }
    }
}
