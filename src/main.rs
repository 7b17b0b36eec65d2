use std::io;
use std::time::Duration;

use clap::{ArgGroup, Parser};
use crossterm::event::KeyEventKind;
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;

use wiki_quiz::app::App;
use wiki_quiz::config::Config;
use wiki_quiz::error::Result;
use wiki_quiz::services::QuizClient;
use wiki_quiz::tui::{draw, handle_key_event};

/// Terminal client for the AI Wiki Quiz service.
///
/// Without a command it starts the interactive terminal UI.
#[derive(Parser, Debug)]
#[command(name = "wiki-quiz", author, version, about, long_about = None)]
#[command(group(ArgGroup::new("mode").args(["generate", "history", "quiz"])))]
struct Cli {
    /// Generate a quiz for a Wikipedia article and print it as JSON
    #[arg(long, value_name = "URL")]
    generate: Option<String>,
    /// List previously generated quizzes
    #[arg(long)]
    history: bool,
    /// Print a stored quiz as JSON
    #[arg(long, value_name = "ID")]
    quiz: Option<i64>,
    /// Use the local service URL from the config file
    #[arg(long)]
    local: bool,
}

#[derive(Debug, PartialEq)]
enum Command {
    Interactive,
    Generate(String),
    History,
    Quiz(i64),
}

impl Cli {
    fn mode(&self) -> Command {
        if let Some(url) = &self.generate {
            Command::Generate(url.clone())
        } else if let Some(id) = self.quiz {
            Command::Quiz(id)
        } else if self.history {
            Command::History
        } else {
            Command::Interactive
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging (only show warnings and errors by default)
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    // Load configuration
    let config = Config::load()?;
    let base_url = config.resolve_base_url(cli.local)?;
    tracing::debug!("Using quiz service at {}", base_url);
    let client = QuizClient::new(base_url, config.request_timeout())?;

    match cli.mode() {
        Command::Generate(url) => {
            let quiz = client.generate_quiz(&url).await?;
            println!("{}", serde_json::to_string_pretty(&quiz)?);
            return Ok(());
        }
        Command::Quiz(id) => {
            let quiz = client.fetch_quiz_by_id(id).await?;
            println!("{}", serde_json::to_string_pretty(&quiz)?);
            return Ok(());
        }
        Command::History => {
            let mut entries = client.fetch_history().await?;
            entries.sort_by_key(|e| e.id);
            for entry in &entries {
                println!(
                    "{:>5}  {:<20}  {}  {}",
                    entry.id,
                    entry.date_generated.label(),
                    entry.title,
                    entry.url
                );
            }
            return Ok(());
        }
        Command::Interactive => {}
    }

    let mut app = App::new(client);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run the app
    let result = run_app(&mut terminal, &mut app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(e) = result {
        eprintln!("Error: {}", e);
    }

    Ok(())
}

async fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()> {
    loop {
        terminal.draw(|frame| draw(frame, app))?;

        // Advance spinner animation
        app.tick_spinner();

        // Pick up finished service calls
        app.poll_service_results();

        // Poll for events with timeout to allow async operations
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    if let Some(action) = handle_key_event(key, app.mode()) {
                        if app.handle_action(action) {
                            return Ok(());
                        }
                    }
                }
            }
        }

        tokio::task::yield_now().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> std::result::Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("wiki-quiz").chain(args.iter().copied()))
    }

    #[test]
    fn test_no_arguments_is_interactive() {
        let cli = parse(&[]).unwrap();
        assert_eq!(cli.mode(), Command::Interactive);
        assert!(!cli.local);
    }

    #[test]
    fn test_commands() {
        let cli = parse(&["--generate", "https://en.wikipedia.org/wiki/Rust"]).unwrap();
        assert_eq!(
            cli.mode(),
            Command::Generate("https://en.wikipedia.org/wiki/Rust".to_string())
        );

        let cli = parse(&["--local", "--quiz", "12"]).unwrap();
        assert_eq!(cli.mode(), Command::Quiz(12));
        assert!(cli.local);

        let cli = parse(&["--history", "--local"]).unwrap();
        assert_eq!(cli.mode(), Command::History);
        assert!(cli.local);
    }

    #[test]
    fn test_bad_arguments() {
        assert!(parse(&["--generate"]).is_err());
        assert!(parse(&["--quiz", "twelve"]).is_err());
        assert!(parse(&["--history", "--quiz", "1"]).is_err());
        assert!(parse(&["--refresh"]).is_err());
    }

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
