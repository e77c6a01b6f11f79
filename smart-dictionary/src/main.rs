use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use dictionary::{
    Autocomplete, Dialect, Dictionary, LookupController, PickerIntent, PickerReducer, Reducer,
    SuggestionPicker,
};
use tracing::warn;

use audio::{Pronouncer, Pronunciation};
use config::Config;
use storage::Storage;
use theme::Theme;
use utilities::{input, split_command};

mod audio;
mod config;
mod logging;
mod render;
mod storage;
mod theme;
mod utilities;

const SUGGESTION_WAIT: Duration = Duration::from_secs(10);

const HELP: &str = "\
define <word>     look a word up (alias: find); with no word, the highlighted suggestion
suggest <text>    list suggestions for partial input
next | prev       move the suggestion highlight
pick <n>          look up the n-th suggestion
play              pronounce the shown word
theme [light|dark]  switch colours
clear             forget the current result
quit              leave (aliases: exit, q)";

/// Look words up in the free dictionary API from the terminal.
#[derive(Debug, Parser)]
#[command(name = "smart-dictionary", version, about)]
struct Args {
    /// Look this up, print the result and exit
    word: Vec<String>,

    /// Config file to use instead of the default location
    #[arg(long)]
    config: Option<PathBuf>,

    /// Language code for entry lookups
    #[arg(long)]
    language: Option<String>,

    /// Preferred pronunciation: us, uk, au or any
    #[arg(long)]
    dialect: Option<Dialect>,

    /// sqlite URL for saved preferences
    #[arg(long)]
    database: Option<String>,
}

impl Args {
    fn apply(&self, config: &mut Config) {
        if let Some(language) = &self.language {
            config.api.language = language.clone();
        }
        if let Some(dialect) = self.dialect {
            config.lookup.dialect = dialect;
        }
        if let Some(database) = &self.database {
            config.storage.database_url = database.clone();
        }
    }
}

/// Everything the prompt needs between commands.
struct Session {
    controller: LookupController<Arc<Dictionary>>,
    autocomplete: Autocomplete<Dictionary>,
    picker: SuggestionPicker,
    pronouncer: Pronouncer,
    storage: Storage,
    theme: Theme,
    dialect: Dialect,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    logging::init_tracing();
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    args.apply(&mut config);
    config.validate()?;

    let mut session = Session::open(&config).await?;

    if !args.word.is_empty() {
        session.define(&args.word.join(" ")).await;
        let failed = session.controller.state().error.is_some();
        session.storage.close().await;
        return Ok(if failed {
            ExitCode::FAILURE
        } else {
            ExitCode::SUCCESS
        });
    }

    while let Some(line) = input(">> ")? {
        let Some((command, rest)) = split_command(&line) else {
            continue;
        };
        match command.as_str() {
            "exit" | "leave" | "quit" | "e" | "q" | "l" => {
                break;
            }
            "define" | "find" => {
                if !rest.is_empty() {
                    session.update_picker(PickerIntent::Dismiss);
                }
                match session.picker.commit(&rest).map(str::to_owned) {
                    Some(word) => session.define(&word).await,
                    None => println!("Type a word to look up."),
                }
            }
            "suggest" => {
                session.suggest(&rest).await;
            }
            "next" | "prev" => {
                let intent = if command == "next" {
                    PickerIntent::MoveDown
                } else {
                    PickerIntent::MoveUp
                };
                session.update_picker(intent);
                render::print_suggestions(&session.picker, session.theme);
            }
            "pick" => match rest.parse::<usize>() {
                Ok(number) if number >= 1 && number <= session.picker.items.len() => {
                    session.update_picker(PickerIntent::Select(number - 1));
                    if let Some(word) = session.picker.selected_item().map(str::to_owned) {
                        session.define(&word).await;
                    }
                }
                _ => println!("Pick a number from the last suggestion list."),
            },
            "play" => {
                session.play().await;
            }
            "theme" => {
                session.change_theme(&rest).await;
            }
            "clear" => {
                session.controller.clear();
                session.update_picker(PickerIntent::Dismiss);
            }
            "help" | "?" => {
                println!("{HELP}");
            }
            _ => {
                println!("Unknown command {command}. Type help for a list.");
            }
        }
    }
    session.storage.close().await;
    Ok(ExitCode::SUCCESS)
}

impl Session {
    async fn open(config: &Config) -> anyhow::Result<Self> {
        let dict = Arc::new(Dictionary::with_endpoints(config.endpoints()?));
        let controller = LookupController::new(Arc::clone(&dict))
            .with_max_candidates(config.lookup.max_candidates);
        let storage = Storage::initialize(&config.storage.database_url).await?;
        let theme = storage.theme().await?;

        Ok(Self {
            controller,
            autocomplete: Autocomplete::new(dict)
                .with_debounce(Duration::from_millis(config.lookup.debounce_ms)),
            picker: SuggestionPicker::default(),
            pronouncer: Pronouncer::new(&config.audio),
            storage,
            theme,
            dialect: config.lookup.dialect,
        })
    }

    async fn define(&mut self, word: &str) {
        self.autocomplete.cancel();
        self.update_picker(PickerIntent::Dismiss);
        render::print_searching(self.theme);
        self.controller.resolve(word).await;
        render::print_state(&self.controller.state(), self.theme, self.dialect);
    }

    async fn suggest(&mut self, partial: &str) {
        let mut suggestions = self.autocomplete.subscribe();
        self.autocomplete.request(partial);
        if tokio::time::timeout(SUGGESTION_WAIT, suggestions.changed())
            .await
            .is_err()
        {
            self.autocomplete.cancel();
            println!("Suggestions took too long.");
            return;
        }
        let items = suggestions.borrow_and_update().clone();
        self.update_picker(PickerIntent::Load(items));
        render::print_suggestions(&self.picker, self.theme);
    }

    async fn play(&self) {
        match self
            .pronouncer
            .pronounce(&self.controller.state(), self.dialect)
            .await
        {
            Pronunciation::Recorded(url) => println!("Playing {url}"),
            Pronunciation::Spoken(word) => println!("No recording, speaking \"{word}\""),
            Pronunciation::Nothing => println!("Look a word up first."),
        }
    }

    /// Switches colours for this session even when saving the choice fails.
    async fn change_theme(&mut self, requested: &str) {
        let theme = if requested.is_empty() {
            self.theme.toggled()
        } else {
            match requested.to_ascii_lowercase().parse::<Theme>() {
                Ok(theme) => theme,
                Err(message) => {
                    println!("{message}");
                    return;
                }
            }
        };
        self.theme = theme;
        match self.storage.set_theme(theme).await {
            Ok(()) => println!("Theme set to {theme}."),
            Err(error) => {
                warn!(%error, "could not save theme");
                println!("Theme set to {theme} for this session; it could not be saved.");
            }
        }
    }

    fn update_picker(&mut self, intent: PickerIntent) {
        self.picker = PickerReducer::reduce(std::mem::take(&mut self.picker), intent);
    }
}
