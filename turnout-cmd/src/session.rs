//! Interactive session: line commands change the selection and toggles, and
//! a debounced render prints after each burst of changes.

use crate::load::Loader;
use crate::schedule::Debouncer;
use anyhow::{anyhow, bail};
use log::info;
use serde_json::json;
use std::io::Write;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use turnout_core::Registry;
use turnout_data::table::render_table;
use turnout_data::{
    render, ChartUpdate, DataPresentation, DisplayAs, PipelineConfig, Rendered, Selection,
    Toggles,
};
use turnout_store::Repository;

/// One parsed input line.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionCommand {
    Years(Vec<String>),
    Locations(Vec<String>),
    EarlyVoting(bool),
    ElectionDay(bool),
    Mode(DataPresentation),
    Extended(bool),
    Display(DisplayAs),
    Reload,
    Quit,
}

fn parse_switch(value: &str) -> anyhow::Result<bool> {
    match value.to_ascii_lowercase().as_str() {
        "on" | "true" | "yes" | "1" => Ok(true),
        "off" | "false" | "no" | "0" => Ok(false),
        other => bail!("expected on or off, got '{}'", other),
    }
}

fn parse_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Parse one input line. Blank lines and `#` comments yield `None`.
///
/// ```text
/// years 2025_1,2021_2
/// locations total,Central Library
/// early off
/// election on
/// mode cumulative
/// extended on
/// display table
/// reload
/// quit
/// ```
pub fn parse_command(line: &str) -> anyhow::Result<Option<SessionCommand>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }
    let (verb, rest) = line
        .split_once(char::is_whitespace)
        .map(|(v, r)| (v, r.trim()))
        .unwrap_or((line, ""));
    let command = match verb.to_ascii_lowercase().as_str() {
        "years" => SessionCommand::Years(parse_list(rest)),
        "locations" => SessionCommand::Locations(parse_list(rest)),
        "early" => SessionCommand::EarlyVoting(parse_switch(rest)?),
        "election" => SessionCommand::ElectionDay(parse_switch(rest)?),
        "mode" => SessionCommand::Mode(rest.parse().map_err(|e: String| anyhow!(e))?),
        "extended" => SessionCommand::Extended(parse_switch(rest)?),
        "display" => SessionCommand::Display(rest.parse().map_err(|e: String| anyhow!(e))?),
        "reload" => SessionCommand::Reload,
        "quit" | "exit" => SessionCommand::Quit,
        other => bail!("unknown command '{}'", other),
    };
    Ok(Some(command))
}

/// What the view shows for the current selection.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewState {
    /// At least one selected year is still being fetched.
    Loading { years: Vec<String> },
    Ready(Rendered),
}

/// Side effect requested by a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    Rerender,
    Fetch { refresh: bool },
    Quit,
}

/// Selection, toggles and the last render, over a shared store.
pub struct Session {
    pub store: Repository,
    pub registry: Registry,
    pub selection: Selection,
    pub toggles: Toggles,
    pub config: PipelineConfig,
    previous: Option<Rendered>,
}

impl Session {
    pub fn new(
        store: Repository,
        registry: Registry,
        selection: Selection,
        toggles: Toggles,
        config: PipelineConfig,
    ) -> Self {
        Session {
            store,
            registry,
            selection,
            toggles,
            config,
            previous: None,
        }
    }

    pub fn apply(&mut self, command: SessionCommand) -> Effect {
        match command {
            SessionCommand::Years(years) => {
                self.selection.years = years;
                return Effect::Fetch { refresh: false };
            }
            SessionCommand::Locations(locations) => self.selection.locations = locations,
            SessionCommand::EarlyVoting(on) => self.toggles.show_early_voting = on,
            SessionCommand::ElectionDay(on) => self.toggles.show_election_day = on,
            SessionCommand::Mode(mode) => self.toggles.data_presentation = mode,
            SessionCommand::Extended(on) => self.toggles.include_extended_days = on,
            SessionCommand::Display(display) => self.toggles.display_as = display,
            SessionCommand::Reload => return Effect::Fetch { refresh: true },
            SessionCommand::Quit => return Effect::Quit,
        }
        Effect::Rerender
    }

    pub fn view_state(&self) -> ViewState {
        let pending = self.store.pending_years(&self.selection.years);
        if !pending.is_empty() {
            return ViewState::Loading { years: pending };
        }
        ViewState::Ready(render(
            &self.store.snapshot(),
            &self.registry,
            &self.selection,
            &self.toggles,
            &self.config,
        ))
    }

    /// Render the current state and format it for output.
    ///
    /// A ready render becomes the baseline for the next update decision.
    pub fn present(&mut self) -> anyhow::Result<String> {
        let rendered = match self.view_state() {
            ViewState::Loading { years } => {
                return Ok(format!("Loading: {}", years.join(", ")));
            }
            ViewState::Ready(rendered) => rendered,
        };
        let update = ChartUpdate::between(self.previous.as_ref(), &rendered);
        let body = match self.toggles.display_as {
            DisplayAs::Table => render_table(&rendered.dataset),
            DisplayAs::Chart => serde_json::to_string_pretty(&json!({
                "update": update,
                "render": &rendered,
            }))?,
        };
        let out = format!("[{:?}] {}\n{}", update, rendered.summary, body);
        self.previous = Some(rendered);
        Ok(out)
    }
}

/// Drive a session from `input` until it ends or `quit` is read.
///
/// Fetch completions and commands both schedule a debounced render; each
/// render is written to `out`.
pub async fn run_session<R, W>(
    mut session: Session,
    mut loader: Loader,
    input: R,
    mut debouncer: Debouncer,
    out: &mut W,
) -> anyhow::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut lines = input.lines();
    let mut input_open = true;

    loader.request(&session.store, &session.selection.years, false);
    debouncer.trigger();

    loop {
        if !input_open && loader.in_flight() == 0 && !debouncer.is_pending() {
            break;
        }
        tokio::select! {
            line = lines.next_line(), if input_open => {
                let Some(line) = line? else {
                    input_open = false;
                    continue;
                };
                match parse_command(&line) {
                    Ok(None) => {}
                    Ok(Some(command)) => match session.apply(command) {
                        Effect::Quit => break,
                        Effect::Rerender => debouncer.trigger(),
                        Effect::Fetch { refresh } => {
                            loader.request(&session.store, &session.selection.years, refresh);
                            debouncer.trigger();
                        }
                    },
                    Err(e) => writeln!(out, "error: {}", e)?,
                }
            }
            Some(outcome) = loader.next_result(&session.store), if loader.in_flight() > 0 => {
                info!("session: {:?}", outcome);
                debouncer.trigger();
            }
            _ = debouncer.wait(), if debouncer.is_pending() => {
                writeln!(out, "{}", session.present()?)?;
                out.flush()?;
            }
            else => break,
        }
    }
    Ok(())
}
