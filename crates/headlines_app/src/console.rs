//! Line-oriented stand-in for the search screen.
//!
//! Each stdin line is fed to the registered listener as a text change,
//! so rapid pastes exercise the debounce just like typing would.

use std::io::{self, BufRead};
use std::sync::{Arc, Mutex};
use std::thread;

use headlines_core::{SearchResultItem, SearchSettings, SearchView};
use headlines_engine::{
    QueryBridge, Schedulers, SearchHost, SearchPresenter, SearchResultProvider, SearchService,
};
use headlines_logging::{headlines_debug, headlines_info};
use tokio::runtime::Handle;
use tokio::sync::mpsc;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Type(String),
    Submit(String),
    List,
    Quit,
}

pub fn parse_command(line: &str) -> Command {
    let trimmed = line.trim();
    match trimmed {
        ":q" | ":quit" => Command::Quit,
        ":list" => Command::List,
        _ => match trimmed.strip_prefix(":submit") {
            Some(query) => Command::Submit(query.trim().to_string()),
            None => Command::Type(trimmed.to_string()),
        },
    }
}

/// Rows of the most recent result list.
#[derive(Debug, Default)]
pub struct ResultBoard {
    rows: Mutex<Vec<String>>,
}

impl ResultBoard {
    fn replace(&self, rows: Vec<String>) {
        *self.rows.lock().unwrap_or_else(|p| p.into_inner()) = rows;
    }

    pub fn rows(&self) -> Vec<String> {
        self.rows.lock().unwrap_or_else(|p| p.into_inner()).clone()
    }
}

fn render_row(item: &SearchResultItem) -> String {
    let title = item.title.as_deref().unwrap_or("(untitled)");
    match &item.content_url {
        Some(url) => format!("{title} <{url}> [{} subscribers]", item.subscribers),
        None => format!("{title} (no feed url) [{} subscribers]", item.subscribers),
    }
}

pub struct ConsoleView {
    board: Arc<ResultBoard>,
}

impl ConsoleView {
    pub fn new(board: Arc<ResultBoard>) -> Self {
        Self { board }
    }
}

impl SearchView for ConsoleView {
    fn toggle_loading_indicator(&self, active: bool) {
        if active {
            println!("searching...");
        }
    }

    fn show_search_results(&self, items: Vec<SearchResultItem>) {
        let rows: Vec<String> = items.iter().map(render_row).collect();
        for (n, row) in rows.iter().enumerate() {
            println!("{:>3}. {row}", n + 1);
        }
        self.board.replace(rows);
    }

    fn show_no_search_results(&self) {
        println!("no feeds found");
        self.board.replace(Vec::new());
    }

    fn show_search_results_error(&self) {
        println!("search failed");
    }
}

type Provider = Arc<dyn SearchResultProvider<Arc<ResultBoard>>>;

#[derive(Default)]
pub struct ConsoleScreen {
    provider: Mutex<Option<Provider>>,
}

impl ConsoleScreen {
    fn current(&self) -> Option<Provider> {
        self.provider
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .clone()
    }

    pub fn dispatch(&self, command: &Command) {
        let Some(provider) = self.current() else {
            headlines_debug!("No search listener registered; ignoring {:?}", command);
            return;
        };
        match command {
            Command::Type(text) => {
                provider.on_query_text_change(text);
            }
            Command::Submit(text) => {
                provider.on_query_text_submit(text);
            }
            Command::List => {
                for (n, row) in provider.results().rows().iter().enumerate() {
                    println!("{:>3}. {row}", n + 1);
                }
            }
            Command::Quit => {}
        }
    }
}

impl SearchHost for ConsoleScreen {
    type Results = Arc<ResultBoard>;

    fn set_search_result_provider(&self, provider: Option<Provider>) {
        *self.provider.lock().unwrap_or_else(|p| p.into_inner()) = provider;
    }
}

fn spawn_stdin_reader() -> mpsc::UnboundedReceiver<String> {
    let (tx, rx) = mpsc::unbounded_channel();
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if tx.send(line).is_err() {
                break;
            }
        }
    });
    rx
}

/// Runs the search screen until `:quit` or end of input.
///
/// Must be driven by the UI runtime; `background` runs the searches.
pub async fn run(settings: SearchSettings, service: Arc<dyn SearchService>, background: Handle) {
    let board = Arc::new(ResultBoard::default());
    let screen = Arc::new(ConsoleScreen::default());
    let view = Arc::new(ConsoleView::new(board.clone()));
    let queries = QueryBridge::new(&screen, board).subscribe();
    let schedulers = Schedulers::new(Handle::current(), background);
    let presenter = SearchPresenter::new(view, queries, service, settings, schedulers);

    println!(
        "Type to search feeds (min {} chars). Commands: :submit <query>, :list, :quit",
        presenter.settings().search_text_min_length
    );

    let mut lines = spawn_stdin_reader();
    while let Some(line) = lines.recv().await {
        let command = parse_command(&line);
        if command == Command::Quit {
            break;
        }
        screen.dispatch(&command);
    }

    headlines_info!("Closing search screen");
    presenter.detach_view();
}

#[cfg(test)]
mod tests {
    use super::*;
    use headlines_core::{normalize_feed_item, FeedItem};

    #[test]
    fn commands_parse() {
        assert_eq!(parse_command(":quit"), Command::Quit);
        assert_eq!(parse_command(" :q "), Command::Quit);
        assert_eq!(parse_command(":list"), Command::List);
        assert_eq!(
            parse_command(":submit  world news "),
            Command::Submit("world news".to_string())
        );
        assert_eq!(parse_command("  tech "), Command::Type("tech".to_string()));
    }

    #[test]
    fn view_records_rows_on_board() {
        let board = Arc::new(ResultBoard::default());
        let view = ConsoleView::new(board.clone());
        let item = normalize_feed_item(&FeedItem {
            feed_id: "feed/https://example.com/rss".to_string(),
            title: Some("Example".to_string()),
            subscribers: Some(4),
            ..FeedItem::default()
        });

        view.show_search_results(vec![item]);
        assert_eq!(
            board.rows(),
            vec!["Example <https://example.com/rss> [4 subscribers]".to_string()]
        );

        view.show_no_search_results();
        assert!(board.rows().is_empty());
    }
}
