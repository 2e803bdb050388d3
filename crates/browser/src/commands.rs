//! Line commands read from standard input.

use common::{BrowserError, BrowserResult};
use std::str::FromStr;
use ui::engine::Modifiers;

/// Help text listing every command.
pub const HELP: &str = "\
go <text>          resolve text and load it in the active tab
back | forward     move through the active tab's session history
reload | home      reload, or load the home page
new                open a new tab
close <n>          close tab n
tab <n>            activate tab n
tabs               list tabs
history            open the history dialog
select <n>...      toggle history rows
unselect           clear the history selection
delete | clear     delete selected rows, or all rows
open <n>           load history row n and close the dialog
done               close the history dialog
shift-open <url>   page asks to open url with shift held
open-link <url>    page asks to open url without modifiers
quit";

/// One shell command.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Go(String),
    Back,
    Forward,
    Reload,
    Home,
    NewTab,
    Close(usize),
    Activate(usize),
    Tabs,
    History,
    Select(Vec<usize>),
    Unselect,
    Delete,
    Clear,
    Open(usize),
    Done,
    /// A page asking for a new window with `modifiers` held.
    OpenLink { url: String, modifiers: Modifiers },
    Help,
    Quit,
}

impl FromStr for Command {
    type Err = BrowserError;

    fn from_str(line: &str) -> BrowserResult<Self> {
        let line = line.trim();
        let (name, rest) = match line.split_once(char::is_whitespace) {
            Some((name, rest)) => (name, rest.trim()),
            None => (line, ""),
        };

        let command = match name {
            "go" => Command::Go(required(name, rest)?.to_string()),
            "back" => Command::Back,
            "forward" => Command::Forward,
            "reload" => Command::Reload,
            "home" => Command::Home,
            "new" => Command::NewTab,
            "close" => Command::Close(index(name, rest)?),
            "tab" => Command::Activate(index(name, rest)?),
            "tabs" => Command::Tabs,
            "history" => Command::History,
            "select" => {
                let rows = required(name, rest)?
                    .split_whitespace()
                    .map(|row| index(name, row))
                    .collect::<BrowserResult<Vec<_>>>()?;
                Command::Select(rows)
            }
            "unselect" => Command::Unselect,
            "delete" => Command::Delete,
            "clear" => Command::Clear,
            "open" => Command::Open(index(name, rest)?),
            "done" => Command::Done,
            "shift-open" => Command::OpenLink {
                url: required(name, rest)?.to_string(),
                modifiers: Modifiers::SHIFT,
            },
            "open-link" => Command::OpenLink {
                url: required(name, rest)?.to_string(),
                modifiers: Modifiers::empty(),
            },
            "help" | "?" => Command::Help,
            "quit" | "exit" => Command::Quit,
            "" => return Err(BrowserError::invalid("empty command")),
            other => return Err(BrowserError::invalid(format!("unknown command `{other}`"))),
        };
        Ok(command)
    }
}

fn required<'a>(name: &str, rest: &'a str) -> BrowserResult<&'a str> {
    if rest.is_empty() {
        Err(BrowserError::invalid(format!("`{name}` needs an argument")))
    } else {
        Ok(rest)
    }
}

fn index(name: &str, rest: &str) -> BrowserResult<usize> {
    required(name, rest)?
        .parse()
        .map_err(|_| BrowserError::invalid(format!("`{name}` expects a number, got `{rest}`")))
}
