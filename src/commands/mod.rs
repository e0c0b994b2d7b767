/*!
Command handlers for the CLI

This module provides command handlers invoked by the CLI entrypoint.

It exposes three top-level command modules:

- `chat` - Interactive chat with the captain
- `ask`  - Run a single prompt and print the reply
- `name` - Offline preview of the naming and style rules

plus `gallery` for table rendering and image export, and
`special_commands` for the `/` commands of the chat.
*/

use crate::config::Config;
use crate::error::{CruiseSimError, Result};
use crate::providers::{create_provider, Provider};
use crate::session::{ConversationStore, Orchestrator};
use std::sync::Arc;

// Gallery table, ship details and image export
pub mod gallery;

// Special commands parser for the chat
pub mod special_commands;

/// Builds an orchestrator and a fresh store from configuration
///
/// The store opens with the configured greeting, if any.
///
/// # Errors
///
/// Returns error if the provider type is unknown or the provider fails to
/// initialize
pub fn build_orchestrator(config: &Config) -> Result<Orchestrator> {
    let provider: Arc<dyn Provider> =
        Arc::from(create_provider(&config.provider.provider_type, &config.provider)?);

    let store = match &config.session.greeting {
        Some(greeting) => ConversationStore::with_greeting(greeting.clone()),
        None => ConversationStore::new(),
    };

    Ok(Orchestrator::new(provider, store.into_shared())
        .with_call_timeout(config.session.call_timeout())
        .with_aspect_ratio(config.session.aspect_ratio.clone()))
}

// Chat command handler
pub mod chat {
    //! Interactive chat handler.
    //!
    //! Creates the provider and the conversation store, then runs a
    //! readline loop. Each prompt runs one generation cycle while store
    //! events are rendered as they arrive.

    use super::*;
    use crate::commands::gallery;
    use crate::commands::special_commands::{parse_special_command, print_help, SpecialCommand};
    use crate::session::{
        read_store, CycleOutcome, GeneratedShip, GenerationStatus, Message, Role, StoreEvent,
    };
    use colored::Colorize;
    use rustyline::error::ReadlineError;
    use rustyline::DefaultEditor;
    use tokio::sync::broadcast::error::{RecvError, TryRecvError};

    /// Start interactive chat mode
    ///
    /// # Arguments
    ///
    /// * `config` - Global configuration (consumed)
    ///
    /// # Errors
    ///
    /// Returns error if the provider or the line editor cannot be created
    pub async fn run_chat(config: Config) -> Result<()> {
        tracing::info!("Starting interactive chat mode");

        let orchestrator = build_orchestrator(&config)?;
        let mut events = read_store(orchestrator.store())?.subscribe();

        let mut rl = DefaultEditor::new()
            .map_err(|e| CruiseSimError::Command(format!("Failed to start line editor: {}", e)))?;

        print_welcome_banner(&config);
        for message in read_store(orchestrator.store())?.transcript() {
            render_message(message);
        }

        loop {
            let prompt = format!("{} > ", GenerationStatus::Idle.colored_tag());
            match rl.readline(&prompt) {
                Ok(line) => {
                    let trimmed = line.trim();
                    if trimmed.is_empty() {
                        continue;
                    }

                    match parse_special_command(trimmed) {
                        Ok(SpecialCommand::None) => {}
                        Ok(SpecialCommand::Exit) => break,
                        Ok(command) => {
                            if let Err(e) = handle_special_command(&orchestrator, &config, command)
                            {
                                eprintln!("{}", format!("Error: {}", e).red());
                            }
                            continue;
                        }
                        Err(e) => {
                            eprintln!("{}", e.to_string().yellow());
                            continue;
                        }
                    }

                    if let Err(e) = rl.add_history_entry(trimmed) {
                        tracing::debug!("Could not record history entry: {}", e);
                    }

                    let submit = orchestrator.submit(&line);
                    tokio::pin!(submit);
                    let outcome = loop {
                        tokio::select! {
                            outcome = &mut submit => break outcome?,
                            event = events.recv() => render_event(event),
                        }
                    };
                    loop {
                        match events.try_recv() {
                            Ok(event) => render_event(Ok(event)),
                            Err(TryRecvError::Lagged(n)) => render_event(Err(RecvError::Lagged(n))),
                            Err(_) => break,
                        }
                    }
                    if let CycleOutcome::Rejected(reason) = outcome {
                        tracing::debug!("Submission rejected: {:?}", reason);
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    println!("CTRL-C");
                    break;
                }
                Err(ReadlineError::Eof) => {
                    println!("CTRL-D");
                    break;
                }
                Err(err) => {
                    tracing::error!("Readline error: {:?}", err);
                    break;
                }
            }
        }

        println!("Fair winds, Captain!");
        Ok(())
    }

    fn handle_special_command(
        orchestrator: &Orchestrator,
        config: &Config,
        command: SpecialCommand,
    ) -> Result<()> {
        match command {
            SpecialCommand::Gallery => {
                gallery::print_gallery(read_store(orchestrator.store())?.gallery());
            }
            SpecialCommand::View(index) => {
                let ship = ship_at(orchestrator, index)?;
                gallery::print_ship_details(&ship);
            }
            SpecialCommand::Save { index, dir } => {
                let ship = ship_at(orchestrator, index)?;
                let dir = match dir {
                    Some(dir) => dir,
                    None => config.gallery_dir()?,
                };
                let path = gallery::save_ship_image(&ship, &dir)?;
                println!("{} {}", "Saved".green(), path.display());
            }
            SpecialCommand::ShowStatus => print_status(orchestrator, config)?,
            SpecialCommand::Help => print_help(),
            SpecialCommand::Exit | SpecialCommand::None => {}
        }
        Ok(())
    }

    /// Clones the ship at a 1-based gallery position
    fn ship_at(orchestrator: &Orchestrator, index: usize) -> Result<GeneratedShip> {
        let store = read_store(orchestrator.store())?;
        store
            .gallery()
            .get(index.saturating_sub(1))
            .cloned()
            .ok_or_else(|| {
                CruiseSimError::Command(format!(
                    "No ship #{} (gallery has {})",
                    index,
                    store.gallery().len()
                ))
                .into()
            })
    }

    fn render_event(event: std::result::Result<StoreEvent, RecvError>) {
        match event {
            Ok(StoreEvent::MessageAppended(message)) => render_message(&message),
            Ok(StoreEvent::ShipAdded(ship)) => {
                println!(
                    "{} {} {}",
                    "⚓".blue(),
                    ship.name.cyan().bold(),
                    "joined the gallery (/view 1)".dimmed()
                );
            }
            Ok(StoreEvent::StatusChanged(status)) => {
                if let Some(label) = status.activity_label() {
                    println!("{} {}", status.colored_tag(), label.dimmed());
                }
            }
            Err(RecvError::Lagged(n)) => {
                tracing::warn!("Renderer fell behind, skipped {} events", n);
            }
            Err(RecvError::Closed) => {}
        }
    }

    fn render_message(message: &Message) {
        match message.role() {
            // The user's own line is already on screen
            Role::User => {}
            Role::Assistant => {
                println!("\n{} {}", "Captain Block:".cyan().bold(), message.content());
                if let Some(name) = message.ship_name() {
                    println!("{} {}", "Rendered:".dimmed(), name.cyan());
                }
                println!();
            }
            Role::System => println!("{}", message.content().dimmed()),
        }
    }

    fn print_welcome_banner(config: &Config) {
        println!("\n╔══════════════════════════════════════════════════════════════╗");
        println!("║          Cruise Ship Simulator - Captain's Bridge            ║");
        println!("╚══════════════════════════════════════════════════════════════╝\n");
        println!(
            "Provider: {} (chat: {}, images: {})",
            config.provider.provider_type.cyan(),
            config.provider.gemini.chat_model,
            config.provider.gemini.image_model
        );
        println!("Type '/help' for available commands, 'exit' to quit\n");
    }

    fn print_status(orchestrator: &Orchestrator, config: &Config) -> Result<()> {
        let store = read_store(orchestrator.store())?;
        println!();
        println!("Status:    {}", store.status().colored_tag());
        println!("Provider:  {}", orchestrator.provider_name());
        println!("Chat:      {}", config.provider.gemini.chat_model);
        println!("Images:    {} ({})", config.provider.gemini.image_model, config.session.aspect_ratio);
        println!("Messages:  {}", store.transcript().len());
        println!("Ships:     {}", store.gallery().len());
        println!();
        Ok(())
    }
}

// One-shot prompt handler
pub mod ask {
    //! Runs a single generation cycle and prints the outcome.

    use super::*;
    use crate::commands::gallery;
    use crate::session::{CycleOutcome, RejectReason};
    use colored::Colorize;
    use std::path::PathBuf;

    /// Send one prompt to the captain
    ///
    /// # Arguments
    ///
    /// * `config` - Global configuration (consumed)
    /// * `prompt` - Prompt text
    /// * `save` - Directory to save a generated image into
    ///
    /// # Errors
    ///
    /// Returns error if the prompt is empty, the cycle fails, or the image
    /// cannot be saved
    pub async fn run_ask(config: Config, prompt: String, save: Option<PathBuf>) -> Result<()> {
        let orchestrator = build_orchestrator(&config)?;

        match orchestrator.submit(&prompt).await? {
            CycleOutcome::Rejected(RejectReason::Empty) => {
                Err(CruiseSimError::Command("Prompt cannot be empty".to_string()).into())
            }
            CycleOutcome::Rejected(RejectReason::Busy) => {
                Err(CruiseSimError::Session("A cycle is already running".to_string()).into())
            }
            CycleOutcome::Failed { notice, error } => {
                eprintln!("{}", notice.content().red());
                Err(CruiseSimError::Provider(error).into())
            }
            CycleOutcome::Completed { reply, ship } => {
                println!("{}", reply.content());

                match (ship, save) {
                    (Some(ship), Some(dir)) => {
                        let path = gallery::save_ship_image(&ship, &dir)?;
                        println!("{} {} -> {}", "Saved".green(), ship.name, path.display());
                    }
                    (Some(ship), None) => {
                        println!("{} {}", "Rendered:".dimmed(), ship.name.cyan());
                    }
                    (None, Some(_)) => {
                        println!("{}", "No ship image was produced; nothing saved.".yellow());
                    }
                    (None, None) => {}
                }
                Ok(())
            }
        }
    }
}

// Offline name preview handler
pub mod name {
    //! Shows what the session rules make of a prompt without calling a
    //! provider.

    use crate::error::{CruiseSimError, Result};
    use crate::session::rules::{classify_style, derive_ship_name, should_generate_image};
    use crate::style::StyleHint;
    use colored::Colorize;
    use serde::Serialize;

    /// Rule results for one prompt
    #[derive(Debug, Clone, PartialEq, Eq, Serialize)]
    pub struct NamePreview {
        pub prompt: String,
        pub ship_name: String,
        pub generates_image: bool,
        pub style: StyleHint,
    }

    /// Applies the naming, trigger and style rules to a prompt
    ///
    /// # Examples
    ///
    /// ```
    /// use cruisesim::commands::name::preview;
    ///
    /// let preview = preview("Build a futuristic neon cruise ship");
    /// assert_eq!(preview.ship_name, "SS Futuristic Neon Cruise");
    /// assert!(preview.generates_image);
    /// ```
    pub fn preview(prompt: &str) -> NamePreview {
        NamePreview {
            prompt: prompt.to_string(),
            ship_name: derive_ship_name(prompt),
            generates_image: should_generate_image(prompt),
            style: classify_style(prompt),
        }
    }

    /// Print the preview for the joined prompt words
    ///
    /// # Errors
    ///
    /// Returns error if JSON serialization fails
    pub fn run_name(words: Vec<String>, json: bool) -> Result<()> {
        let result = preview(&words.join(" "));

        if json {
            let out = serde_json::to_string_pretty(&result).map_err(CruiseSimError::from)?;
            println!("{}", out);
            return Ok(());
        }

        println!("Ship name: {}", result.ship_name.cyan().bold());
        println!(
            "Image:     {}",
            if result.generates_image { "yes" } else { "no" }
        );
        println!(
            "Style:     {} ({})",
            result.style.colored_tag(),
            result.style.description()
        );
        Ok(())
    }
}
