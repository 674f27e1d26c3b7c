// One search session: the coordinator plus the screens that react to it
use std::sync::Arc;

use codecheck_core::providers::GitHubProvider;
use codecheck_core::{
    Config, CoordinatorEvents, RepositorySummary, SearchCoordinator, SystemClock, UserMessage,
};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

use crate::render;

/// What happened when the user hit "search"
#[derive(Debug)]
pub enum SearchOutcome {
    EmptyInput,
    Results(Vec<RepositorySummary>),
    Failed(UserMessage),
}

pub struct Session {
    coordinator: SearchCoordinator,
    events: CoordinatorEvents,
}

impl Session {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let provider = GitHubProvider::from_config(&config.github)?;
        let (coordinator, events) = SearchCoordinator::with_options(
            Box::new(provider),
            Arc::new(SystemClock),
            config.search.min_interval(),
        );
        Ok(Self {
            coordinator,
            events,
        })
    }

    /// Validate and run a search the way the search screen does
    pub async fn submit(&mut self, input: &str) -> SearchOutcome {
        self.coordinator.on_input_changed(input);
        if !SearchCoordinator::is_valid_input(input) {
            self.coordinator.set_empty_input_flag(true);
            return SearchOutcome::EmptyInput;
        }

        self.coordinator.search(input.trim()).await;

        match self.events.messages.try_recv() {
            Ok(message) => SearchOutcome::Failed(message),
            Err(_) => SearchOutcome::Results(self.coordinator.items()),
        }
    }

    /// Select a result by 1-based position and follow the navigation request
    pub fn open(&mut self, position: usize) -> Option<RepositorySummary> {
        let item = self
            .coordinator
            .items()
            .get(position.checked_sub(1)?)?
            .clone();
        self.coordinator.select_item(item);
        self.events.navigation.try_recv_latest()
    }

    pub fn clear(&self) {
        self.coordinator.clear_results();
    }
}

/// A line typed at the interactive prompt
#[derive(Debug, PartialEq, Eq)]
pub enum Command {
    Search(String),
    Open(usize),
    Clear,
    Quit,
    Unknown(String),
}

impl Command {
    pub fn parse(line: &str) -> Self {
        let line = line.trim_end_matches(&['\r', '\n'][..]);
        match line.trim().strip_prefix(':') {
            None => Command::Search(line.to_string()),
            Some("q") | Some("quit") => Command::Quit,
            Some("clear") => Command::Clear,
            Some(rest) => match rest.trim().parse() {
                Ok(position) => Command::Open(position),
                Err(_) => Command::Unknown(rest.to_string()),
            },
        }
    }
}

/// Line-oriented loop: type to search, `:<n>` to open, `:clear`, `:q`
pub async fn run_interactive(mut session: Session) -> anyhow::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    println!("Type a keyword to search. :<n> opens a result, :clear empties the list, :q quits.");
    loop {
        stdout.write_all(b"> ").await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };

        match Command::parse(&line) {
            Command::Quit => break,
            Command::Clear => {
                session.clear();
                println!("{}", render::result_list(&[]));
            }
            Command::Open(position) => match session.open(position) {
                Some(item) => println!("{}", render::detail(&item)),
                None => println!("No result at position {}", position),
            },
            Command::Search(query) => print_outcome(&session.submit(&query).await),
            Command::Unknown(cmd) => println!("Unknown command :{}", cmd),
        }
    }

    Ok(())
}

pub fn print_outcome(outcome: &SearchOutcome) {
    match outcome {
        SearchOutcome::EmptyInput => eprintln!("{}", render::EMPTY_INPUT),
        SearchOutcome::Results(items) => println!("{}", render::result_list(items)),
        SearchOutcome::Failed(message) => eprintln!("{}", render::message(message)),
    }
}
