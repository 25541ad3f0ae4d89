//! Game Randomizer text menu.
//!
//! Loads a catalog, opens the stats directory and loops on a small menu:
//! roll, change player count, show stats, quit.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use game_randomizer::{
    open_stats_dir, Catalog, CatalogItem, ItemId, OccurrenceStore, Pick, Randomizer, RandomizerError, StatsKey,
    StorageConfig,
};

const WELCOME_MESSAGE: &str = "\n*****************\nGame Randomizer!\n*****************\n";
const MENU: &str = "\nMenu\n-----\n r - Roll\n p - Change Player Count\n s - Show Stats\n q - Quit\n";
const INVALID_NUMBER_MESSAGE: &str = "That didn't seem like a number...";

/// Pick a random game from a JSON catalog, favouring games that have come up least.
#[derive(Parser, Debug)]
#[command(name = "game-randomizer", version, about, long_about = None)]
struct Args {
    /// Path to the catalog JSON file
    catalog: PathBuf,

    /// Number of players (prompted for if omitted)
    #[arg(short, long)]
    players: Option<u32>,

    /// Directory for occurrence stats [env: GAME_RANDOMIZER_DATA_DIR]
    #[arg(short, long)]
    data_dir: Option<PathBuf>,

    /// Storage key for this catalog's stats (defaults to the file name)
    #[arg(short, long)]
    key: Option<String>,

    /// Seed for reproducible picks
    #[arg(long)]
    seed: Option<u64>,

    /// Skip fsync after each save
    #[arg(long)]
    no_sync: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "game_randomizer=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn build_randomizer(args: &Args) -> Result<Randomizer, Box<dyn std::error::Error>> {
    let catalog = Catalog::from_path(&args.catalog).map_err(RandomizerError::from)?;

    let mut config = StorageConfig::from_env()?;
    if let Some(dir) = &args.data_dir {
        config = config.with_data_dir(dir);
    }
    if args.no_sync {
        config.sync_on_write = false;
    }

    let key = match &args.key {
        Some(key) => StatsKey::new(key.as_str())?,
        None => StatsKey::for_catalog(&args.catalog)?,
    };
    let backend = open_stats_dir(&config)?;
    tracing::debug!(dir = %config.data_dir.display(), key = %key, "using stats directory");
    let store = OccurrenceStore::new(Arc::new(backend), key);

    let randomizer = match args.seed {
        Some(seed) => Randomizer::seeded(catalog, store, seed)?,
        None => Randomizer::new(catalog, store)?,
    };
    Ok(randomizer)
}

/// Interactive menu state over any input and output.
struct Menu<I, O> {
    input: I,
    output: O,
    players: u32,
    max_players: Option<u32>,
    last: Option<ItemId>,
}

enum Action {
    Continue,
    Quit,
}

impl<I: BufRead, O: Write> Menu<I, O> {
    fn new(input: I, output: O, players: u32) -> Self {
        Self {
            input,
            output,
            players,
            max_players: None,
            last: None,
        }
    }

    /// Caps the player counts accepted at the prompt.
    fn with_max_players(mut self, max_players: Option<u32>) -> Self {
        self.max_players = max_players;
        self
    }

    /// Reads one trimmed line, `None` on end of input.
    fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    /// Prompts until a positive number within the catalog's maximum is
    /// entered, `None` on end of input.
    fn prompt_players(&mut self) -> io::Result<Option<u32>> {
        loop {
            write!(self.output, "\nHow many players? ")?;
            self.output.flush()?;
            let Some(line) = self.read_line()? else {
                return Ok(None);
            };
            match (line.parse::<u32>(), self.max_players) {
                (Ok(n), Some(max)) if n > max => {
                    writeln!(self.output, "This catalog allows at most {max} players.")?;
                }
                (Ok(n), _) if n > 0 => return Ok(Some(n)),
                _ => writeln!(self.output, "{INVALID_NUMBER_MESSAGE}")?,
            }
        }
    }

    fn run<R: rand::Rng>(&mut self, randomizer: &mut Randomizer<R>) -> io::Result<()> {
        if let Some(title) = randomizer.settings().title {
            writeln!(self.output, "{title}")?;
        }
        loop {
            if let Action::Quit = self.step(randomizer)? {
                return Ok(());
            }
        }
    }

    fn step<R: rand::Rng>(&mut self, randomizer: &mut Randomizer<R>) -> io::Result<Action> {
        write!(self.output, "{MENU}")?;
        self.output.flush()?;
        let Some(choice) = self.read_line()? else {
            return Ok(Action::Quit);
        };

        match choice.as_str() {
            "q" => return Ok(Action::Quit),
            "r" => self.roll(randomizer)?,
            "p" => match self.prompt_players()? {
                Some(n) => self.players = n,
                None => return Ok(Action::Quit),
            },
            "s" => self.show_stats(randomizer)?,
            _ => {}
        }
        Ok(Action::Continue)
    }

    fn roll<R: rand::Rng>(&mut self, randomizer: &mut Randomizer<R>) -> io::Result<()> {
        let exclude = self.last.as_ref().map(ItemId::as_str);
        match randomizer.pick(self.players, exclude) {
            Ok(pick) => {
                self.show_pick(&pick)?;
                self.last = Some(pick.id);
            }
            Err(err) if err.is_persistence_write() => {
                // The pick stands; only the saved history is behind.
                if let Some(id) = err.picked_item().cloned() {
                    if let Some(item) = randomizer.catalog().get(id.as_str()) {
                        self.show_item(&id, item)?;
                    }
                    self.last = Some(id);
                }
                writeln!(self.output, "Warning: {err}")?;
            }
            Err(err) if err.is_no_eligible_items() => {
                writeln!(self.output, "\n{err}. Try a different player count.")?;
            }
            Err(err) => writeln!(self.output, "\nError: {err}")?,
        }
        Ok(())
    }

    fn show_pick(&mut self, pick: &Pick) -> io::Result<()> {
        self.show_item(&pick.id, &pick.item)
    }

    fn show_item(&mut self, id: &ItemId, item: &CatalogItem) -> io::Result<()> {
        writeln!(self.output, "\n**********\n{id}")?;
        writeln!(self.output, "Pack: {}", item.pack.as_deref().unwrap_or("-"))?;
        writeln!(self.output, "Players: {}", item.min_players)?;
        writeln!(self.output, "Description: {}", item.description.as_deref().unwrap_or(""))?;
        writeln!(self.output, "**********")?;
        write!(self.output, "\nHit enter to continue...")?;
        self.output.flush()?;
        self.read_line()?;
        Ok(())
    }

    fn show_stats<R: rand::Rng>(&mut self, randomizer: &Randomizer<R>) -> io::Result<()> {
        let stats = randomizer.view_stats();
        writeln!(self.output, "\nTimes picked:")?;
        for (id, count) in stats.iter().filter(|(id, _)| randomizer.catalog().contains(id.as_str())) {
            writeln!(self.output, " {count:>4}  {id}")?;
        }
        Ok(())
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let mut randomizer = build_randomizer(&args)?;

    let stdin = io::stdin();
    let stdout = io::stdout();
    let settings = randomizer.settings();
    let default_players = args.players.or(settings.default_players);
    let mut menu = Menu::new(stdin.lock(), stdout.lock(), default_players.unwrap_or(1))
        .with_max_players(settings.max_players);

    writeln!(menu.output, "{WELCOME_MESSAGE}")?;
    if args.players.is_none() {
        match menu.prompt_players()? {
            Some(n) => menu.players = n,
            None => return Ok(()),
        }
    }

    menu.run(&mut randomizer)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use game_randomizer::{InMemoryStatsStore, Settings};

    fn randomizer() -> Randomizer {
        let catalog = Catalog::new(
            [
                (
                    ItemId::from("Game1"),
                    CatalogItem::new(4, 1.0).with_pack("Pack1").with_description("For four."),
                ),
                (ItemId::from("Game2"), CatalogItem::new(2, 1.0).with_pack("Pack2")),
            ],
            Settings::default(),
        )
        .unwrap();
        let store = OccurrenceStore::new(
            Arc::new(InMemoryStatsStore::new()),
            StatsKey::new("menu").unwrap(),
        );
        Randomizer::seeded(catalog, store, 1).unwrap()
    }

    fn run_script(script: &str, players: u32) -> (String, Randomizer) {
        let mut r = randomizer();
        let mut out = Vec::new();
        {
            let mut menu = Menu::new(script.as_bytes(), &mut out, players);
            menu.run(&mut r).unwrap();
        }
        (String::from_utf8(out).unwrap(), r)
    }

    #[test]
    fn test_roll_prints_game() {
        let (out, r) = run_script("r\n\nq\n", 2);
        assert!(out.contains("Game2"));
        assert!(out.contains("Pack: Pack2"));
        assert_eq!(r.view_stats().get("Game2"), 1);
    }

    #[test]
    fn test_change_player_count_reprompts_on_garbage() {
        let (out, r) = run_script("p\nlots\n4\nr\n\nq\n", 2);
        assert!(out.contains(INVALID_NUMBER_MESSAGE));
        assert_eq!(r.view_stats().total(), 1);
    }

    #[test]
    fn test_player_prompt_respects_catalog_maximum() {
        let mut r = randomizer();
        let mut out = Vec::new();
        {
            let script = "p\n9\n4\nr\n\nq\n";
            let mut menu = Menu::new(script.as_bytes(), &mut out, 2).with_max_players(Some(4));
            menu.run(&mut r).unwrap();
            assert_eq!(menu.players, 4);
        }
        let out = String::from_utf8(out).unwrap();
        assert!(out.contains("at most 4 players"));
        assert_eq!(r.view_stats().total(), 1);
    }

    #[test]
    fn test_unsupported_player_count_is_reported() {
        let (out, r) = run_script("r\nq\n", 1);
        assert!(out.contains("No game supports 1 player"));
        assert_eq!(r.view_stats().total(), 0);
    }

    #[test]
    fn test_end_of_input_quits() {
        let (_, r) = run_script("r\n", 2);
        assert_eq!(r.view_stats().total(), 1);
    }

    #[test]
    fn test_show_stats() {
        let (out, _) = run_script("r\n\ns\nq\n", 2);
        assert!(out.contains("Times picked:"));
        assert!(out.contains("   1  Game2"));
    }
}
