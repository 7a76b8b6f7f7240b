//! Interactive swap session driven by line commands on stdin.

use super::quote::fetch_pair_prices;
use super::{search, ui, view};
use crate::AppContext;
use crate::core::picker::{PickerError, TokenPicker};
use crate::core::recent::RecencyList;
use crate::core::search::FuzzySearch;
use crate::core::sync::{EditOutcome, ExchangeRates, InputPair};
use crate::core::{Quote, Side, Token, TokenPair};
use anyhow::{Context, Result, anyhow, bail};
use std::io::Write;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{debug, info, warn};

const HELP: &str = "\
Commands:
  from <amount>    set the amount to pay
  to <amount>      set the amount to receive
  pick from|to     open the token picker for a side
  find <query>     search tokens by symbol
  choose <n>       pick the n-th listed token
  recent <n>       pick the n-th recent token
  close            close the token picker
  refresh          refetch prices
  show             show the swap
  submit           swap
  settings         open settings
  help             show this help
  quit             leave the session";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

#[derive(Debug, PartialEq, Eq)]
enum Command<'l> {
    Edit(Side, &'l str),
    Pick(Side),
    Find(&'l str),
    Choose(usize),
    Recent(usize),
    Close,
    Refresh,
    Show,
    Submit,
    Settings,
    Help,
    Quit,
}

/// Parses a 1-based list position.
fn parse_position(raw: &str) -> Result<usize> {
    match raw.parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => bail!("Expected a position starting at 1, got '{raw}'"),
    }
}

fn parse_command(line: &str) -> Result<Command<'_>> {
    let line = line.trim();
    let (word, rest) = line.split_once(' ').unwrap_or((line, ""));
    let rest = rest.trim();

    let command = match word {
        "from" => Command::Edit(Side::From, rest),
        "to" => Command::Edit(Side::To, rest),
        "pick" => Command::Pick(rest.parse()?),
        "find" => Command::Find(rest),
        "choose" => Command::Choose(parse_position(rest)?),
        "recent" => Command::Recent(parse_position(rest)?),
        "close" => Command::Close,
        "refresh" => Command::Refresh,
        "show" => Command::Show,
        "submit" => Command::Submit,
        "settings" => Command::Settings,
        "help" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => bail!("Unknown command '{other}', type 'help' for a list"),
    };
    Ok(command)
}

/// State of one swap form: the selected pair, both amounts, the latest
/// quote of each slot and the token picker.
pub struct SwapSession<'a> {
    ctx: &'a AppContext,
    pair: TokenPair,
    inputs: InputPair,
    quotes: [(String, Quote); 2],
    picker: TokenPicker,
    recent: RecencyList,
    universe: Option<Vec<Token>>,
    listed: Vec<Token>,
}

impl<'a> SwapSession<'a> {
    pub fn new(ctx: &'a AppContext) -> Self {
        let pair = ctx.config.pair.to_pair();
        let quotes = [
            (pair.from_token().id.clone(), Quote::Pending),
            (pair.to_token().id.clone(), Quote::Pending),
        ];
        Self {
            ctx,
            pair,
            inputs: InputPair::new(),
            quotes,
            picker: TokenPicker::new(FuzzySearch::new(ctx.config.search.threshold)),
            recent: RecencyList::load(ctx.storage.as_ref()),
            universe: None,
            listed: Vec::new(),
        }
    }

    pub fn pair(&self) -> &TokenPair {
        &self.pair
    }

    pub fn inputs(&self) -> &InputPair {
        &self.inputs
    }

    pub fn quote(&self, side: Side) -> &Quote {
        &self.quotes[side.index()].1
    }

    pub fn render(&self) -> String {
        let quotes = [self.quotes[0].1.clone(), self.quotes[1].1.clone()];
        view::render_swap(&self.pair, &self.inputs, &quotes)
    }

    /// Records a price result for `token_id` in the `side` slot. A result
    /// for a token that is no longer in the slot is dropped.
    pub fn apply_quote(&mut self, side: Side, token_id: &str, result: &Result<f64>) -> bool {
        if self.pair.get(side).id != token_id {
            debug!(%side, token_id, "Dropping price of a token no longer selected");
            return false;
        }
        if let Err(e) = result {
            warn!(%side, token_id, error = %e, "Price fetch failed");
        }
        self.quotes[side.index()] = (token_id.to_string(), Quote::from_result(result));
        true
    }

    fn sync_rates(&mut self) {
        let rates = ExchangeRates::new(self.quote(Side::From).usd(), self.quote(Side::To).usd());
        self.inputs.apply_rates(rates);
    }

    pub async fn refresh_quotes(&mut self) {
        let pb = ui::new_spinner("Fetching prices...");
        let [(from_id, from_result), (to_id, to_result)] =
            fetch_pair_prices(self.ctx.price_provider.as_ref(), &self.pair).await;
        pb.finish_and_clear();

        self.apply_quote(Side::From, &from_id, &from_result);
        self.apply_quote(Side::To, &to_id, &to_result);
        self.sync_rates();
    }

    async fn on_token_changed(&mut self, side: Side) {
        info!(%side, token = %self.pair.get(side).id, "Token changed");
        self.quotes[side.index()] = (self.pair.get(side).id.clone(), Quote::Pending);
        self.listed.clear();
        self.sync_rates();
        self.refresh_quotes().await;
    }

    async fn load_universe(&mut self) -> Result<()> {
        if self.universe.is_some() {
            return Ok(());
        }
        let pb = ui::new_spinner("Fetching token list...");
        let tokens = self.ctx.token_list.fetch_tokens().await;
        pb.finish_and_clear();
        self.universe = Some(tokens.context("Token list unavailable")?);
        Ok(())
    }

    fn update_listed(&mut self) {
        self.listed = match &self.universe {
            Some(universe) => self
                .picker
                .candidates(universe)
                .into_iter()
                .cloned()
                .collect(),
            None => Vec::new(),
        };
    }

    fn render_picker(&self) -> String {
        let side = self.picker.target().unwrap_or(Side::From);
        let mut output = ui::style_text(
            &format!("Select a token to {}", match side {
                Side::From => "pay with",
                Side::To => "receive",
            }),
            ui::StyleType::Title,
        );

        let recents: Vec<String> = self
            .recent
            .iter()
            .enumerate()
            .filter(|(_, t)| !t.is_placeholder())
            .map(|(i, t)| format!("{} {}", i + 1, t.display_symbol()))
            .collect();
        if !recents.is_empty() {
            output.push_str(&format!("\nRecent: {}", recents.join("  ")));
        }

        if self.universe.is_some() {
            if self.listed.is_empty() {
                output.push_str(&format!("\nNo tokens match '{}'", self.picker.query()));
            } else {
                let listed: Vec<&Token> = self.listed.iter().collect();
                let selected = self.pair.get(side).id.as_str();
                output.push('\n');
                output.push_str(&search::render_token_table(
                    &listed,
                    self.ctx.config.search.limit,
                    Some(selected),
                ));
            }
        }
        output
    }

    fn save_recent(&self) {
        if let Err(e) = self.recent.save(self.ctx.storage.as_ref()) {
            warn!(error = %e, "Failed to save recent tokens");
        }
    }

    /// Runs one input line and returns what to print.
    pub async fn handle(&mut self, line: &str) -> (Flow, String) {
        if line.trim().is_empty() {
            return (Flow::Continue, String::new());
        }
        match self.execute(line).await {
            Ok(Some(output)) => (Flow::Continue, output),
            Ok(None) => (Flow::Quit, String::new()),
            Err(e) => (
                Flow::Continue,
                ui::style_text(&format!("Error: {e:#}"), ui::StyleType::Error),
            ),
        }
    }

    async fn execute(&mut self, line: &str) -> Result<Option<String>> {
        let command = parse_command(line)?;
        debug!(?command, "Handling command");

        // Anything but a picker interaction closes the picker.
        if !matches!(
            command,
            Command::Pick(_)
                | Command::Find(_)
                | Command::Choose(_)
                | Command::Recent(_)
                | Command::Help
        ) {
            self.picker.dismiss();
        }

        let output = match command {
            Command::Edit(side, raw) => match self.inputs.edit(side, raw)? {
                EditOutcome::Unchanged => "No change".to_string(),
                EditOutcome::Updated { .. } => self.render(),
            },
            Command::Pick(side) => {
                self.picker.open(side);
                let loaded = self.load_universe().await;
                self.update_listed();
                let mut output = self.render_picker();
                if let Err(e) = loaded {
                    warn!(error = %e, "Token list unavailable");
                    output.push_str(&format!(
                        "\n{}",
                        ui::style_text(&format!("{e:#}"), ui::StyleType::Error)
                    ));
                }
                output
            }
            Command::Find(query) => {
                if !self.picker.is_open() {
                    return Err(PickerError::NotOpen.into());
                }
                self.picker.set_query(query);
                self.update_listed();
                self.render_picker()
            }
            Command::Choose(position) => {
                // Only rows the table showed can be chosen.
                let shown = self.listed.len().min(self.ctx.config.search.limit);
                let token = self
                    .listed
                    .get(position - 1)
                    .filter(|_| position <= shown)
                    .cloned()
                    .ok_or_else(|| anyhow!("No listed token at position {position}"))?;
                let side =
                    self.picker
                        .select_listed(&token, &mut self.pair, &mut self.recent)?;
                self.save_recent();
                self.on_token_changed(side).await;
                self.render()
            }
            Command::Recent(position) => {
                let side = self
                    .picker
                    .select_recent(position - 1, &mut self.pair, &self.recent)
                    .map_err(|e| match e {
                        PickerError::EmptyRecentSlot(_) => {
                            anyhow!("No recent token at position {position}")
                        }
                        e => e.into(),
                    })?;
                self.on_token_changed(side).await;
                self.render()
            }
            Command::Close => "Token picker closed".to_string(),
            Command::Refresh => {
                self.refresh_quotes().await;
                self.render()
            }
            Command::Show => self.render(),
            Command::Submit => {
                if !self.inputs.can_submit() {
                    bail!("Enter an amount before swapping");
                }
                "Swapping is not available yet".to_string()
            }
            Command::Settings => "Settings are not available yet".to_string(),
            Command::Help => HELP.to_string(),
            Command::Quit => return Ok(None),
        };
        Ok(Some(output))
    }
}

pub async fn run<R, W>(ctx: &AppContext, reader: R, writer: &mut W) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut session = SwapSession::new(ctx);
    session.refresh_quotes().await;
    writeln!(writer, "{}", session.render())?;
    writeln!(writer, "Type 'help' for commands")?;

    let mut lines = reader.lines();
    while let Some(line) = lines.next_line().await.context("Failed to read input")? {
        let (flow, output) = session.handle(&line).await;
        if !output.is_empty() {
            writeln!(writer, "{output}")?;
        }
        if flow == Flow::Quit {
            break;
        }
    }
    Ok(())
}
