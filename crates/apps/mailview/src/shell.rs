//! Command loop driving the controller
//!
//! Every load runs as its own local task, so a slow search does not block
//! opening a thread, and responses settle in whatever order they arrive.

use anyhow::Result;
use log::{debug, warn};
use mailview::history::url_for_query;
use mailview::{
    Action, ElementKey, HistoryState, InMemoryPage, LoadOutcome, MemoryHistory, QueryController,
    ViewerConfig,
};
use std::rc::Rc;
use tokio::io::{AsyncBufReadExt, BufReader};

const HELP: &str = "\
commands:
  search <query>   run a top-level search (alias: /)
  open <key>       activate a rendered element, e.g. `open mv-3`
  back | forward   navigate history
  show             print every rendered region
  keys             list clickable elements
  status           print status, active query and history position
  help             this text
  quit";

/// A parsed input line
#[derive(Debug, PartialEq, Eq)]
pub enum Command {
    Search(String),
    Open(ElementKey),
    Back,
    Forward,
    Show,
    Keys,
    Status,
    Help,
    Quit,
}

impl Command {
    pub fn parse(line: &str) -> Result<Self, String> {
        let line = line.trim();
        let (word, rest) = line
            .split_once(char::is_whitespace)
            .map(|(w, r)| (w, r.trim()))
            .unwrap_or((line, ""));

        match word {
            "search" | "/" if !rest.is_empty() => Ok(Command::Search(rest.to_string())),
            "search" | "/" => Err("search needs a query".to_string()),
            "open" if !rest.is_empty() => Ok(Command::Open(ElementKey::new(rest))),
            "open" => Err("open needs an element key (see `keys`)".to_string()),
            "back" => Ok(Command::Back),
            "forward" => Ok(Command::Forward),
            "show" => Ok(Command::Show),
            "keys" => Ok(Command::Keys),
            "status" => Ok(Command::Status),
            "help" | "?" => Ok(Command::Help),
            "quit" | "exit" => Ok(Command::Quit),
            other => Err(format!("unknown command: {}", other)),
        }
    }
}

/// Starting URL from the first argument: a location (`/?q=...`), or a bare
/// query that is encoded into one
pub fn initial_location(arg: Option<String>) -> String {
    match arg {
        Some(arg) if arg.starts_with('/') || arg.starts_with('?') => arg,
        Some(query) if !query.is_empty() => url_for_query(&query),
        _ => "/".to_string(),
    }
}

struct Shell {
    controller: Rc<QueryController>,
    page: Rc<InMemoryPage>,
    history: Rc<MemoryHistory>,
}

pub async fn run(config: ViewerConfig, location: String) -> Result<()> {
    let page = Rc::new(InMemoryPage::new());
    let history = Rc::new(MemoryHistory::new(location));
    let controller = Rc::new(QueryController::new(
        config.transport()?,
        page.clone(),
        history.clone(),
        &config,
    ));
    let shell = Shell {
        controller,
        page,
        history,
    };

    shell.spawn("initial load", |c| async move { Some(c.start().await) });
    println!("{}", HELP);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        match Command::parse(&line) {
            Ok(Command::Quit) => break,
            Ok(command) => shell.execute(command),
            Err(message) => println!("{}", message),
        }
    }
    Ok(())
}

impl Shell {
    fn execute(&self, command: Command) {
        match command {
            Command::Search(query) => {
                let label = format!("search {:?}", query);
                self.spawn(&label, |c| async move { c.search(&query).await });
            }
            Command::Open(key) => {
                let label = match self.controller.bindings().into_iter().find(|(k, _)| *k == key) {
                    Some((_, action)) => describe_action(&action),
                    None => format!("element {}", key),
                };
                self.spawn(&label, |c| async move { c.activate(&key).await });
            }
            Command::Back => self.navigate("back", self.history.back()),
            Command::Forward => self.navigate("forward", self.history.forward()),
            Command::Show => {
                for (region, html) in self.page.regions() {
                    println!("── {} ──\n{}", region, html.trim_end());
                }
            }
            Command::Keys => {
                for (key, action) in self.controller.bindings() {
                    println!("{:>6}  {}", key, describe_action(&action));
                }
            }
            Command::Status => {
                println!(
                    "status: {:?}, query: {:?}, loading: {}, url: {}, ordering: {:?}",
                    self.controller.status(),
                    self.controller.active_query(),
                    self.controller.is_loading(),
                    self.history.current_url(),
                    self.controller.response_ordering()
                );
            }
            Command::Help => println!("{}", HELP),
            Command::Quit => {}
        }
    }

    /// Deliver a popstate for the entry the cursor moved to
    fn navigate(&self, direction: &str, popped: Option<Option<HistoryState>>) {
        let Some(state) = popped else {
            println!("nothing to go {} to", direction);
            return;
        };
        debug!("popstate {:?}", state);
        self.spawn(direction, move |c| async move { c.restore(state.as_ref()).await });
    }

    /// Run a load on the event loop and report how it ended
    fn spawn<F, Fut>(&self, label: &str, load: F)
    where
        F: FnOnce(Rc<QueryController>) -> Fut,
        Fut: std::future::Future<Output = Option<LoadOutcome>> + 'static,
    {
        let label = label.to_string();
        let fut = load(self.controller.clone());
        tokio::task::spawn_local(async move {
            match fut.await {
                Some(LoadOutcome::Rendered) => println!("{}: done", label),
                Some(LoadOutcome::Stale) => println!("{}: superseded, discarded", label),
                Some(LoadOutcome::Detached) => println!("{}: panel closed, discarded", label),
                Some(LoadOutcome::Failed(e)) => {
                    warn!("{} failed: {}", label, e);
                    println!("{}: failed ({})", label, e);
                }
                None => println!("{}: skipped", label),
            }
        });
    }
}

fn describe_action(action: &Action) -> String {
    match action {
        Action::OpenThread(id) => format!("open thread {}", id.as_str()),
        Action::ShowContent(id) => format!("show message {}", id.as_str()),
    }
}
