// REPL command layer: parses operator input lines and drives the console
// from a single event loop.
//
// The loop is the host event loop from the console's point of view:
// stdin lines and transport events are multiplexed by `tokio::select!`,
// so console callbacks run one at a time in delivery order.

use anyhow::Result;
use tokio::io::{AsyncBufReadExt, BufReader};

use vaultsock_common::protocol::methods;

use crate::console::Console;
use crate::transport::{TransportEvent, WsTransport};
use crate::view::TermView;

/// One operator action, parsed from an input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Connect { url: Option<String> },
    Send { payload: String },
    GetVaultInfo,
    GetKeychains,
    GetKeychainInfo { name: String },
    NewKeychain { name: String },
    RenameKeychain { oldname: String, newname: String },
    GetAccounts,
    GetAccountInfo { name: String },
    GetChainTip,
    GetBlockHeaderByHeight { height: u64 },
    GetBlockHeaderByHash { hash: String },
    Autoscroll { enabled: bool },
    Status,
    Help,
    Quit,
}

/// Parse one input line. Empty lines are `None`; unknown commands and
/// wrong arity are usage errors.
pub fn parse_command(line: &str) -> Result<Option<Command>> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    let (word, rest) = match trimmed.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (trimmed, ""),
    };

    let command = match word {
        "connect" => Command::Connect {
            url: if rest.is_empty() { None } else { Some(rest.to_string()) },
        },
        "send" => {
            if rest.is_empty() {
                anyhow::bail!("usage: send <raw json>");
            }
            Command::Send { payload: rest.to_string() }
        }
        "getvaultinfo" => Command::GetVaultInfo,
        "getkeychains" => Command::GetKeychains,
        "getkeychaininfo" => {
            Command::GetKeychainInfo { name: one_arg(rest, "getkeychaininfo <name>")? }
        }
        "newkeychain" => Command::NewKeychain { name: one_arg(rest, "newkeychain <name>")? },
        "renamekeychain" => {
            let (oldname, newname) = two_args(rest, "renamekeychain <oldname> <newname>")?;
            Command::RenameKeychain { oldname, newname }
        }
        "getaccounts" => Command::GetAccounts,
        "getaccountinfo" => {
            Command::GetAccountInfo { name: one_arg(rest, "getaccountinfo <name>")? }
        }
        "getchaintip" => Command::GetChainTip,
        "getblockheader" => {
            // An argument that parses as an unsigned integer selects the
            // height variant, anything else the hash variant.
            let arg = one_arg(rest, "getblockheader <height|hash>")?;
            match arg.parse::<u64>() {
                Ok(height) => Command::GetBlockHeaderByHeight { height },
                Err(_) => Command::GetBlockHeaderByHash { hash: arg },
            }
        }
        "autoscroll" => match rest {
            "on" => Command::Autoscroll { enabled: true },
            "off" => Command::Autoscroll { enabled: false },
            _ => anyhow::bail!("usage: autoscroll on|off"),
        },
        "status" => Command::Status,
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => anyhow::bail!("unknown command `{other}` (try `help`)"),
    };

    Ok(Some(command))
}

fn one_arg(rest: &str, usage: &str) -> Result<String> {
    if rest.is_empty() {
        anyhow::bail!("usage: {usage}");
    }
    Ok(rest.to_string())
}

fn two_args(rest: &str, usage: &str) -> Result<(String, String)> {
    let mut parts = rest.split_whitespace();
    match (parts.next(), parts.next(), parts.next()) {
        (Some(first), Some(second), None) => Ok((first.to_string(), second.to_string())),
        _ => anyhow::bail!("usage: {usage}"),
    }
}

/// Run the interactive console until EOF or `quit`.
pub async fn run(default_url: Option<String>, autoscroll: bool) -> Result<()> {
    let (transport, mut events) = WsTransport::new();
    let mut console = Console::new(transport, TermView::new(autoscroll));
    let mut last_url = default_url;

    println!("vaultsock console — `help` lists commands");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                match parse_command(&line) {
                    Ok(Some(command)) => match dispatch(&mut console, command, &mut last_url) {
                        Ok(true) => {}
                        Ok(false) => break,
                        Err(error) => eprintln!("error: {error:#}"),
                    },
                    Ok(None) => {}
                    Err(error) => eprintln!("error: {error}"),
                }
            }
            event = events.recv() => {
                let Some(event) = event else { break };
                handle_event(&mut console, event);
            }
        }
    }

    Ok(())
}

fn handle_event(console: &mut Console<WsTransport, TermView>, event: TransportEvent) {
    match event {
        TransportEvent::Opened => console.on_open(),
        TransportEvent::Message(payload) => {
            // Fail-loud: a malformed frame is reported, never appended to
            // the log as plain text.
            if let Err(error) = console.on_message(&payload) {
                eprintln!("error: {error}");
            }
        }
        TransportEvent::Closed => console.on_close(),
    }
}

/// Apply one command. Returns `false` when the loop should stop.
fn dispatch(
    console: &mut Console<WsTransport, TermView>,
    command: Command,
    last_url: &mut Option<String>,
) -> Result<bool> {
    match command {
        Command::Connect { url } => {
            if let Some(url) = url {
                *last_url = Some(url);
            }
            match last_url.as_deref() {
                Some(url) => console.connect(url)?,
                None => anyhow::bail!("no server url configured; usage: connect <ws-url>"),
            }
        }
        Command::Send { payload } => console.send_request(&payload)?,
        Command::GetVaultInfo => console.get_vault_info()?,
        Command::GetKeychains => console.get_keychains()?,
        Command::GetKeychainInfo { name } => console.get_keychain_info(&name)?,
        Command::NewKeychain { name } => console.new_keychain(&name)?,
        Command::RenameKeychain { oldname, newname } => {
            console.rename_keychain(&oldname, &newname)?
        }
        Command::GetAccounts => console.get_accounts()?,
        Command::GetAccountInfo { name } => console.get_account_info(&name)?,
        Command::GetChainTip => console.get_chain_tip()?,
        Command::GetBlockHeaderByHeight { height } => console.get_block_header_by_height(height)?,
        Command::GetBlockHeaderByHash { hash } => console.get_block_header_by_hash(&hash)?,
        Command::Autoscroll { enabled } => console.view_mut().set_autoscroll(enabled),
        Command::Status => {
            println!("state: {:?}", console.state());
            if !console.view().status().is_empty() {
                println!("status: {}", console.view().status());
            }
            println!("toggle: {}", console.view().toggle_label());
        }
        Command::Help => print_help(),
        Command::Quit => return Ok(false),
    }
    Ok(true)
}

fn print_help() {
    println!("commands:");
    println!("  connect [url]       open the connection, or close it if one exists");
    println!("  send <raw json>     transmit a payload verbatim");
    println!("  autoscroll on|off   follow the newest log entry");
    println!("  status              show connection state");
    println!("  quit                leave the console");
    println!("requests:");
    for entry in methods::CATALOG {
        if entry.params.is_empty() {
            println!("  {}", entry.method);
        } else {
            let params: Vec<String> =
                entry.params.iter().map(|param| format!("<{param}>")).collect();
            println!("  {} {}", entry.method, params.join(" "));
        }
    }
}
