//! REPL session management

use std::sync::Arc;

use colored::Colorize;
use eyre::Result;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tracing::debug;

use crate::domain::{CategoryId, CategoryRegistry, Decision, Mood};
use crate::service::DecisionService;
use crate::session::{DecisionOutcome, SessionError, SessionHandle, SessionSnapshot, parse_category};

/// Interactive REPL session
pub struct ReplSession {
    handle: SessionHandle,
    service: Arc<dyn DecisionService>,
}

impl ReplSession {
    pub fn new(handle: SessionHandle, service: Arc<dyn DecisionService>) -> Self {
        Self { handle, service }
    }

    /// Run the REPL main loop
    pub async fn run(&mut self) -> Result<()> {
        self.print_welcome();

        let mut rl = DefaultEditor::new().map_err(|e| eyre::eyre!("Failed to initialize readline: {}", e))?;

        loop {
            let active = self.handle.snapshot().await?.active_category;
            let category = CategoryRegistry::new().get(active);
            let readline = rl.readline(&format!("{} {} ", category.icon, ">".bright_green()));

            match readline {
                Ok(line) => {
                    let input = line.trim();
                    if input.is_empty() {
                        continue;
                    }

                    let _ = rl.add_history_entry(input);

                    if input.starts_with('/') {
                        match self.handle_slash_command(input).await? {
                            SlashResult::Continue => continue,
                            SlashResult::Quit => break,
                        }
                    } else {
                        println!(
                            "{} Commands start with '/'. Type {} for help.",
                            "?".yellow(),
                            "/help".yellow()
                        );
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    println!("^C");
                    continue;
                }
                Err(ReadlineError::Eof) => {
                    println!();
                    break;
                }
                Err(err) => {
                    return Err(eyre::eyre!("Readline error: {}", err));
                }
            }
        }

        println!("Goodbye!");
        Ok(())
    }

    fn print_welcome(&self) {
        println!();
        println!("{}", "Decide - less deciding, more doing".bright_cyan().bold());
        println!("Decision service: {}", self.service.name());
        println!("Type {} for help, {} to quit", "/help".yellow(), "/quit".yellow());
        println!();
    }

    /// Handle slash commands
    ///
    /// Session errors are printed, never propagated; only a dead actor ends the loop.
    async fn handle_slash_command(&mut self, input: &str) -> Result<SlashResult> {
        let (cmd, rest) = match input.split_once(char::is_whitespace) {
            Some((cmd, rest)) => (cmd, rest.trim()),
            None => (input, ""),
        };
        debug!(%cmd, %rest, "handle_slash_command: called");

        let result = match cmd {
            "/help" | "/h" => {
                self.print_help();
                Ok(())
            }
            "/quit" | "/q" | "/exit" => return Ok(SlashResult::Quit),
            "/categories" | "/c" => self.cmd_categories().await,
            "/use" | "/u" => self.cmd_use(rest).await,
            "/decide" | "/d" => self.cmd_decide(rest).await,
            "/accept" | "/a" => self.cmd_accept(rest).await,
            "/again" => self.cmd_again(rest).await,
            "/add" => self.cmd_add(rest).await,
            "/remove" | "/rm" => self.cmd_remove(rest).await,
            "/mood" | "/m" => self.cmd_mood(rest).await,
            "/log" | "/l" => self.cmd_log().await,
            "/status" | "/s" => self.cmd_status().await,
            _ => {
                println!("{} Unknown command: {}", "?".yellow(), cmd);
                println!("Type {} for available commands", "/help".yellow());
                Ok(())
            }
        };

        match result {
            Ok(()) => Ok(SlashResult::Continue),
            Err(SessionError::ChannelClosed) => Err(eyre::eyre!("Session ended unexpectedly")),
            Err(e) => {
                print_error(&e);
                Ok(SlashResult::Continue)
            }
        }
    }

    fn print_help(&self) {
        println!();
        println!("{}", "Available Commands:".bright_cyan());
        println!("  {:18} Show this help", "/help".yellow());
        println!("  {:18} Exit the session", "/quit".yellow());
        println!("  {:18} List categories and their state", "/categories".yellow());
        println!("  {:18} Switch the active category", "/use <cat>".yellow());
        println!("  {:18} Decide the active category, another, or all", "/decide [cat|all]".yellow());
        println!("  {:18} Lock in the current decision", "/accept [cat]".yellow());
        println!("  {:18} Throw out the decision and decide again", "/again [cat]".yellow());
        println!("  {:18} Add an option to your custom list", "/add <option>".yellow());
        println!("  {:18} Remove an option from your custom list", "/remove <option>".yellow());
        println!("  {:18} Set or toggle your mood; no name clears it", "/mood [name]".yellow());
        println!("  {:18} Show today's decision log", "/log".yellow());
        println!("  {:18} Show the whole session", "/status".yellow());
        println!();
        println!(
            "{} {}",
            "Moods:".bright_cyan(),
            Mood::ALL.iter().map(|m| m.label()).collect::<Vec<_>>().join("  ")
        );
        println!();
    }

    async fn target(&self, arg: &str) -> Result<CategoryId, SessionError> {
        if arg.is_empty() {
            Ok(self.handle.snapshot().await?.active_category)
        } else {
            parse_category(arg)
        }
    }

    async fn cmd_categories(&self) -> Result<(), SessionError> {
        let snapshot = self.handle.snapshot().await?;
        println!();
        for category in &snapshot.categories {
            let marker = if category.id == snapshot.active_category { "*" } else { " " };
            let state = match category.state.as_str() {
                "committed" => category.state.green(),
                "decided" => category.state.bright_blue(),
                "pending" => category.state.yellow(),
                _ => category.state.dimmed(),
            };
            println!(
                "{} {} {:10} {:7} {}",
                marker.bright_green(),
                category.icon,
                category.id.as_str(),
                category.label,
                state
            );
        }
        println!();
        Ok(())
    }

    async fn cmd_use(&self, arg: &str) -> Result<(), SessionError> {
        if !require_arg(arg, "/use <category>") {
            return Ok(());
        }
        let category = parse_category(arg)?;
        self.handle.select_category(category).await?;
        let definition = CategoryRegistry::new().get(category);
        println!("{} {} selected", definition.icon, definition.label.bold());
        Ok(())
    }

    async fn cmd_decide(&self, arg: &str) -> Result<(), SessionError> {
        if arg.eq_ignore_ascii_case("all") {
            println!("{}", "Deciding everything...".dimmed());
            let results = self.handle.decide_all_core(self.service.as_ref()).await;
            for (category, result) in results {
                match result {
                    Ok(DecisionOutcome::Decided(decision)) => print_decision(category, &decision),
                    Ok(DecisionOutcome::Stale) => {}
                    Err(SessionError::ChannelClosed) => return Err(SessionError::ChannelClosed),
                    Err(e) => print_error(&e),
                }
            }
            return Ok(());
        }

        let category = self.target(arg).await?;
        self.decide_one(category).await
    }

    async fn decide_one(&self, category: CategoryId) -> Result<(), SessionError> {
        println!("{}", "Thinking...".dimmed());
        match self.handle.request_decision(category, self.service.as_ref()).await? {
            DecisionOutcome::Decided(decision) => {
                print_decision(category, &decision);
                println!("  {} to lock it in, {} for another", "/accept".yellow(), "/again".yellow());
            }
            DecisionOutcome::Stale => println!("{}", "That answer arrived too late and was dropped.".dimmed()),
        }
        Ok(())
    }

    async fn cmd_accept(&self, arg: &str) -> Result<(), SessionError> {
        let category = self.target(arg).await?;
        let entry = self.handle.accept_current_decision(category).await?;
        println!("{} {} {}", "✓".green(), entry.icon(), entry.choice().bold());

        if self.handle.snapshot().await?.all_core_committed {
            println!();
            println!("{}", "Day sorted. Every decision is locked in.".bright_green().bold());
        }
        Ok(())
    }

    async fn cmd_again(&self, arg: &str) -> Result<(), SessionError> {
        let category = self.target(arg).await?;
        let snapshot = self.handle.snapshot().await?;
        if snapshot.category(category).is_some_and(|c| c.committed) {
            self.handle.reset_category(category).await?;
        }
        self.decide_one(category).await
    }

    async fn cmd_add(&self, arg: &str) -> Result<(), SessionError> {
        if !require_arg(arg, "/add <option>") {
            return Ok(());
        }
        if self.handle.add_custom_option(arg).await? {
            println!("{} Added {}", "+".green(), arg.bold());
        } else {
            println!("{}", "Already on your list.".dimmed());
        }
        Ok(())
    }

    async fn cmd_remove(&self, arg: &str) -> Result<(), SessionError> {
        if !require_arg(arg, "/remove <option>") {
            return Ok(());
        }
        if self.handle.remove_custom_option(arg).await? {
            println!("{} Removed {}", "-".red(), arg.bold());
        } else {
            println!("{}", "Not on your list.".dimmed());
        }
        Ok(())
    }

    async fn cmd_mood(&self, arg: &str) -> Result<(), SessionError> {
        if arg.is_empty() {
            self.handle.clear_mood().await?;
            println!("{}", "Mood cleared.".dimmed());
            return Ok(());
        }

        let mood = match arg.parse::<Mood>() {
            Ok(mood) => mood,
            Err(e) => {
                println!("{} {}", "?".yellow(), e);
                return Ok(());
            }
        };
        match self.handle.toggle_mood(mood).await? {
            Some(active) => println!("Mood: {}", active.label()),
            None => println!("{}", "Mood cleared.".dimmed()),
        }
        Ok(())
    }

    async fn cmd_log(&self) -> Result<(), SessionError> {
        let snapshot = self.handle.snapshot().await?;
        if snapshot.history.is_empty() {
            println!("{}", "Nothing committed yet.".dimmed());
            return Ok(());
        }

        println!();
        println!("{}", "Today's Log:".bright_cyan());
        for entry in &snapshot.history {
            println!(
                "  {} {} {:7} {}  {}",
                entry.time.dimmed(),
                entry.icon,
                entry.label,
                entry.choice.bold(),
                entry.date.dimmed()
            );
        }
        println!();
        Ok(())
    }

    async fn cmd_status(&self) -> Result<(), SessionError> {
        let snapshot = self.handle.snapshot().await?;
        print_status(&snapshot);
        Ok(())
    }
}

/// Print a usage line when a required argument is missing
fn require_arg(arg: &str, usage: &str) -> bool {
    if arg.is_empty() {
        println!("Usage: {}", usage.yellow());
        return false;
    }
    true
}

fn print_decision(category: CategoryId, decision: &Decision) {
    let definition = CategoryRegistry::new().get(category);
    println!("{} {}: {}", definition.icon, definition.label, decision.choice.bold());
    if let Some(reasoning) = &decision.reasoning {
        println!("  {}", reasoning.italic().dimmed());
    }
}

fn print_error(err: &SessionError) {
    let message = err.user_message().map(str::to_string).unwrap_or_else(|| err.to_string());
    println!("{} {}", "!".red(), message);
}

fn print_status(snapshot: &SessionSnapshot) {
    println!();
    for category in &snapshot.categories {
        let choice = category
            .decision
            .as_ref()
            .map(|d| d.choice.as_str())
            .unwrap_or("-");
        println!(
            "  {} {:7} {:10} {}",
            category.icon,
            category.label,
            category.state,
            if category.committed { choice.green() } else { choice.normal() }
        );
    }
    if !snapshot.custom_options.is_empty() {
        println!("  {} {}", "Custom list:".dimmed(), snapshot.custom_options.join(", "));
    }
    if let Some(mood) = snapshot.mood {
        println!("  {} {}", "Mood:".dimmed(), mood.label());
    }
    if let Some(error) = &snapshot.error {
        println!("  {} {} ({})", "!".red(), error.message, error.category);
    }
    println!("  {} {} committed today", "Log:".dimmed(), snapshot.history.len());
    if snapshot.all_core_committed {
        println!("  {}", "Day sorted.".bright_green());
    }
    println!();
}

/// Result of handling a slash command
enum SlashResult {
    Continue,
    Quit,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::RandomDecisionService;
    use crate::session::SessionController;

    #[test]
    fn test_require_arg() {
        assert!(!require_arg("", "/remove <option>"));
        assert!(require_arg("Gym", "/remove <option>"));
    }

    #[tokio::test]
    async fn test_missing_argument_never_reaches_session() {
        let handle = SessionHandle::spawn(SessionController::new());
        let session = ReplSession::new(handle.clone(), Arc::new(RandomDecisionService::seeded(1)));
        handle.shutdown().await.unwrap();

        // A closed session would fail any command that got through
        assert!(session.cmd_remove("").await.is_ok());
        assert!(session.cmd_add("").await.is_ok());
        assert!(session.cmd_use("").await.is_ok());
        assert!(matches!(
            session.cmd_remove("Gym").await,
            Err(SessionError::ChannelClosed)
        ));
    }
}
