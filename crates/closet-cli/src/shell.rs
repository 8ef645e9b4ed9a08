//! Interactive session over stdin.
//!
//! The one-shot subcommands cannot hold anything between invocations, so the
//! pieces of state that are never persisted live here: the current
//! suggestion, the search/filter settings, the custom-outfit selection and
//! the assistant conversation. Every command that changes persisted state
//! goes through [`Wardrobe`], which writes its own snapshot.

use std::io::{BufRead, IsTerminal, Write};
use std::path::Path;

use anyhow::Context;
use closet_assistant::{ChatClient, Conversation, Role};
use closet_core::config::Config;
use closet_core::item::{SUGGESTED_COLORS, SUGGESTED_OCCASIONS, SUGGESTED_SEASONS};
use closet_core::upload::{BlobStore, ImageUpload};
use closet_core::{Category, ClosetError, Filter, ItemDraft, Outfit, Wardrobe};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::output::{describe_item, describe_outfit, describe_saved, item_table};

const HELP: &str = "\
Commands:
  list                          show items matching the current search and filters
  search [TERM]                 set the search term (no TERM clears it)
  filter [clear | color=C occasion=O season=S]
                                show, clear or set attribute filters
  add NAME | CATEGORY | COLOR [| OCCASION [| SEASON [| IMAGE]]]
                                add an item (fields separated by '|')
  remove N                      remove the item at position N
  suggest                       compose an outfit from the filtered items
  save                          save the current suggestion to favorites
  favorites                     list favorite outfits
  unfavorite N                  remove favorite N
  select N                      select or deselect item N for a custom outfit
  selection                     show the selected items
  create                        build a custom outfit from the selection
  customs                       list custom outfits
  uncustom N                    remove custom outfit N
  dark [on | off]               toggle or set dark mode
  chat MESSAGE                  ask the assistant
  chat [close | reset]          show, close or restart the conversation
  options                       suggested colors, occasions and seasons
  help                          this text
  quit                          leave the shell";

/// Result of one shell line.
#[derive(Debug, PartialEq, Eq)]
pub enum Flow {
    Continue(String),
    Quit,
}

pub struct Shell {
    wardrobe: Wardrobe,
    filter: Filter,
    suggestion: Option<Outfit>,
    conversation: Conversation,
    client: ChatClient,
    blob_store: Box<dyn BlobStore>,
    runtime: Option<tokio::runtime::Runtime>,
    rng: StdRng,
}

impl Shell {
    pub fn new(wardrobe: Wardrobe, config: &Config, root: &Path) -> Self {
        Self {
            wardrobe,
            filter: Filter::default(),
            suggestion: None,
            conversation: Conversation::new(),
            client: ChatClient::from_config(&config.assistant),
            blob_store: config.blob_store(root),
            runtime: None,
            rng: StdRng::from_entropy(),
        }
    }

    /// Fix the composer's randomness.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn prompt(&self) -> &'static str {
        if self.wardrobe.dark_mode() {
            "closet (dark)> "
        } else {
            "closet> "
        }
    }

    /// Read commands from `input` until EOF or `quit`.
    pub fn run<R: BufRead, W: Write>(
        &mut self,
        input: R,
        out: &mut W,
        interactive: bool,
    ) -> anyhow::Result<()> {
        if interactive {
            writeln!(out, "Wardrobe shell. Type `help` for commands.")?;
            write!(out, "{}", self.prompt())?;
            out.flush()?;
        }
        for line in input.lines() {
            let line = line.context("failed to read input")?;
            match self.execute(&line) {
                Ok(Flow::Quit) => break,
                Ok(Flow::Continue(text)) if text.is_empty() => {}
                Ok(Flow::Continue(text)) => writeln!(out, "{text}")?,
                Err(e) => writeln!(out, "error: {e:#}")?,
            }
            if interactive {
                write!(out, "{}", self.prompt())?;
                out.flush()?;
            }
        }
        Ok(())
    }

    /// Execute one command line.
    pub fn execute(&mut self, line: &str) -> anyhow::Result<Flow> {
        let line = line.trim();
        let (cmd, rest) = match line.split_once(char::is_whitespace) {
            Some((cmd, rest)) => (cmd, rest.trim()),
            None => (line, ""),
        };

        let text = match cmd {
            "" => String::new(),
            "quit" | "exit" => return Ok(Flow::Quit),
            "help" => HELP.to_string(),
            "options" => options(),
            "list" => self.list(),
            "search" => {
                self.filter.search = rest.to_string();
                self.list()
            }
            "filter" => self.set_filter(rest)?,
            "add" => self.add(rest)?,
            "remove" => self.remove(parse_index(rest)?)?,
            "suggest" => self.suggest()?,
            "save" => self.save()?,
            "favorites" => describe_saved(self.wardrobe.favorites().list(), "No favorites yet."),
            "unfavorite" => {
                let index = parse_index(rest)?;
                match self.wardrobe.remove_favorite_at(index)? {
                    Some(_) => format!("Removed favorite {index}."),
                    None => format!("No favorite at position {index}."),
                }
            }
            "select" => self.select(parse_index(rest)?),
            "selection" => self.selection(),
            "create" => self.create()?,
            "customs" => {
                describe_saved(self.wardrobe.custom_outfits().list(), "No custom outfits yet.")
            }
            "uncustom" => {
                let index = parse_index(rest)?;
                match self.wardrobe.remove_custom_at(index)? {
                    Some(_) => format!("Removed custom outfit {index}."),
                    None => format!("No custom outfit at position {index}."),
                }
            }
            "dark" => self.dark(rest)?,
            "chat" => self.chat(rest)?,
            other => format!("Unknown command '{other}'. Type `help` for commands."),
        };
        Ok(Flow::Continue(text))
    }

    // -----------------------------------------------------------------------
    // Catalog
    // -----------------------------------------------------------------------

    fn list(&self) -> String {
        let rows = self.wardrobe.filtered(&self.filter);
        if rows.is_empty() {
            return if self.wardrobe.items().is_empty() {
                "No items yet.".to_string()
            } else {
                "No items match.".to_string()
            };
        }
        item_table(&rows).trim_end().to_string()
    }

    fn set_filter(&mut self, args: &str) -> anyhow::Result<String> {
        if args == "clear" {
            self.filter = Filter {
                search: std::mem::take(&mut self.filter.search),
                ..Filter::default()
            };
        } else {
            for pair in args.split_whitespace() {
                let (key, value) = pair
                    .split_once('=')
                    .with_context(|| format!("expected key=value, got '{pair}'"))?;
                match key {
                    "color" => self.filter.color = value.to_string(),
                    "occasion" => self.filter.occasion = value.to_string(),
                    "season" => self.filter.season = value.to_string(),
                    other => anyhow::bail!("unknown filter '{other}'"),
                }
            }
        }
        let shown = |v: &str| if v.is_empty() { "any".to_string() } else { v.to_string() };
        Ok(format!(
            "Filters: color={} occasion={} season={}",
            shown(&self.filter.color),
            shown(&self.filter.occasion),
            shown(&self.filter.season),
        ))
    }

    fn add(&mut self, args: &str) -> anyhow::Result<String> {
        let fields: Vec<&str> = args.split('|').map(str::trim).collect();
        let field = |i: usize| fields.get(i).copied().unwrap_or_default().to_string();
        let mut draft = ItemDraft {
            name: field(0),
            category: field(1),
            color: field(2),
            occasion: field(3),
            season: field(4),
            image: ImageUpload::Empty,
        };
        draft.build()?;

        let image = field(5);
        if !image.is_empty() {
            let path = Path::new(&image);
            let bytes = std::fs::read(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            draft.image.run(self.blob_store.as_ref(), &bytes, &image);
            if let ImageUpload::Failed(reason) = &draft.image {
                return Ok(format!(
                    "Image upload failed: {reason}. The item was not added; try again."
                ));
            }
        }

        let id = self.wardrobe.add_item(draft.build()?)?;
        let position = self.wardrobe.items().position(id).unwrap_or_default();
        Ok(format!("Added '{}' at position {position}.", draft.name.trim()))
    }

    fn remove(&mut self, index: usize) -> anyhow::Result<String> {
        Ok(match self.wardrobe.remove_item_at(index)? {
            Some(item) => format!("Removed '{}'.", item.name),
            None => format!("No item at position {index}."),
        })
    }

    // -----------------------------------------------------------------------
    // Suggestions and favorites
    // -----------------------------------------------------------------------

    fn suggest(&mut self) -> anyhow::Result<String> {
        match self.wardrobe.suggest_outfit(&self.filter, &mut self.rng) {
            Ok(outfit) => {
                let text = format!("Suggested outfit:\n{}", describe_outfit(&outfit));
                self.suggestion = Some(outfit);
                Ok(text)
            }
            Err(ClosetError::NoMatchingItems) => {
                self.suggestion = None;
                Ok("No matching items found!".to_string())
            }
            Err(e) => Err(e.into()),
        }
    }

    fn save(&mut self) -> anyhow::Result<String> {
        let Some(outfit) = &self.suggestion else {
            return Ok("Nothing to save. Run `suggest` first.".to_string());
        };
        Ok(match self.wardrobe.save_favorite(outfit)? {
            Some(_) => format!(
                "Saved to favorites ({} total).",
                self.wardrobe.favorites().len()
            ),
            None => "Nothing to save. Run `suggest` first.".to_string(),
        })
    }

    // -----------------------------------------------------------------------
    // Selection and custom outfits
    // -----------------------------------------------------------------------

    fn select(&mut self, index: usize) -> String {
        match self.wardrobe.toggle_selection_at(index) {
            Some(true) => format!(
                "Selected item {index} ({} selected).",
                self.wardrobe.selection().len()
            ),
            Some(false) => format!(
                "Deselected item {index} ({} selected).",
                self.wardrobe.selection().len()
            ),
            None => format!("No item at position {index}."),
        }
    }

    fn selection(&self) -> String {
        let selected = self.wardrobe.selected_items();
        if selected.is_empty() {
            return "Nothing selected.".to_string();
        }
        selected
            .iter()
            .enumerate()
            .map(|(n, item)| format!("{}. {}", n + 1, describe_item(item)))
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn create(&mut self) -> anyhow::Result<String> {
        match self.wardrobe.create_custom_outfit() {
            Ok(_) => Ok(format!(
                "Created custom outfit {}.",
                self.wardrobe.custom_outfits().len() - 1
            )),
            Err(e @ ClosetError::NotEnoughSelections { .. }) => Ok(format!("{e}.")),
            Err(e) => Err(e.into()),
        }
    }

    // -----------------------------------------------------------------------
    // Preferences
    // -----------------------------------------------------------------------

    fn dark(&mut self, arg: &str) -> anyhow::Result<String> {
        match arg {
            "" | "toggle" => {
                self.wardrobe.toggle_dark_mode()?;
            }
            "on" => self.wardrobe.set_dark_mode(true)?,
            "off" => self.wardrobe.set_dark_mode(false)?,
            other => anyhow::bail!("expected on, off or toggle, got '{other}'"),
        }
        Ok(format!(
            "Dark mode {}.",
            if self.wardrobe.dark_mode() { "on" } else { "off" }
        ))
    }

    // -----------------------------------------------------------------------
    // Assistant
    // -----------------------------------------------------------------------

    fn chat(&mut self, arg: &str) -> anyhow::Result<String> {
        match arg {
            "" => {
                self.conversation.open();
                return Ok(self.transcript());
            }
            "close" => {
                self.conversation.close();
                return Ok("Chat closed.".to_string());
            }
            "reset" => {
                self.conversation.reset();
                return Ok(self.transcript());
            }
            _ => {}
        }

        self.conversation.open();
        let Some(pending) = self.conversation.send(arg, self.wardrobe.items().list()) else {
            return Ok(String::new());
        };
        if self.runtime.is_none() {
            self.runtime =
                Some(tokio::runtime::Runtime::new().context("failed to start async runtime")?);
        }
        let Some(rt) = &self.runtime else {
            return Ok(String::new());
        };
        let text = rt.block_on(self.client.reply(&pending.request));
        Ok(if self.conversation.receive(pending, text.clone()) {
            format!("assistant: {text}")
        } else {
            String::new()
        })
    }

    fn transcript(&self) -> String {
        self.conversation
            .messages()
            .iter()
            .map(|m| {
                let who = match m.role {
                    Role::User => "you",
                    _ => "assistant",
                };
                format!("{who}: {}", m.content)
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

fn parse_index(arg: &str) -> anyhow::Result<usize> {
    arg.parse()
        .with_context(|| format!("expected a position number, got '{arg}'"))
}

fn options() -> String {
    let categories: Vec<&str> = Category::all().iter().map(|c| c.as_str()).collect();
    format!(
        "Categories: {}\nColors: {}\nOccasions: {}\nSeasons: {}",
        categories.join(", "),
        SUGGESTED_COLORS.join(", "),
        SUGGESTED_OCCASIONS.join(", "),
        SUGGESTED_SEASONS.join(", "),
    )
}

/// Entry point for `closet shell`.
pub fn run(root: &Path) -> anyhow::Result<()> {
    let config = Config::load(root).context("failed to load config")?;
    let wardrobe = crate::cmd::open_wardrobe(root)?;
    let mut shell = Shell::new(wardrobe, &config, root);

    let stdin = std::io::stdin();
    let interactive = stdin.is_terminal();
    let mut stdout = std::io::stdout();
    shell.run(stdin.lock(), &mut stdout, interactive)
}
