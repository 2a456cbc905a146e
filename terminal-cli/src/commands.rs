//! Slash-command palette and line parsing for the interactive client.

use std::collections::HashMap;

use anyhow::{anyhow, Result};
use hitstand_client::controller::{coerce_num_hands, coerce_seed};
use hitstand_client::{Command, Tab};
use lazy_static::lazy_static;

#[derive(Clone)]
pub struct CommandDef {
    pub name: &'static str,
    pub usage: &'static str,
    pub desc: &'static str,
    pub group: &'static str,
}

const fn cmd(name: &'static str, usage: &'static str, desc: &'static str, group: &'static str) -> CommandDef {
    CommandDef { name, usage, desc, group }
}

lazy_static! {
    pub static ref COMMANDS: Vec<CommandDef> = vec![
        // Session
        cmd("help", "/help", "Show grouped palette", "Session"),
        cmd("agents", "/agents", "List agents offered by the service", "Session"),
        cmd("reload", "/reload", "Fetch the agent list again", "Session"),
        cmd("agent", "/agent <id>", "Select the agent for single hands", "Session"),
        cmd("tab", "/tab <hand|match>", "Switch tab", "Session"),
        cmd("quit", "/quit", "Exit", "Session"),
        // Play
        cmd("play", "/play [seed]", "Play one hand with the selected agent (F5)", "Play"),
        cmd("match", "/match [hands] [seed]", "Run a tournament between both agents (F6)", "Play"),
    ];
    static ref HINTS: HashMap<String, String> = COMMANDS
        .iter()
        .map(|c| (format!("/{}", c.name), format!("{} · {}", c.usage, c.desc)))
        .collect();
    static ref TEMPLATES: HashMap<&'static str, &'static str> = HashMap::from([
        ("play", "/play 42"),
        ("match", "/match 500 | /match 1000 7"),
        ("agent", "/agent NAIVE"),
        ("tab", "/tab match"),
    ]);
}

/// Key bindings listed under `/help`.
const KEYS: [(&str, &str); 5] = [
    ("F5", "Play a hand with the selected agent"),
    ("F6", "Run a tournament with the default size"),
    ("Tab, Alt-1/2", "Switch tab"),
    ("Up/Down, Enter", "Move through and pick agents"),
    ("Ctrl-C", "Quit"),
];

pub const IDLE_HINT: &str = "Type /help, Tab to switch views, F5 to play, F6 for a tournament";

/// What a typed line asks for.
#[derive(Debug, PartialEq, Eq)]
pub enum Action {
    Dispatch(Command),
    Local(String),
    ListAgents,
    Quit,
}

pub fn handle_line(line: &str, default_hands: i64) -> Result<Action> {
    let Some(body) = line.strip_prefix('/') else {
        return Err(anyhow!("Commands start with '/'"));
    };
    let mut parts = body.split_whitespace();
    let Some(cmd) = parts.next().map(str::to_lowercase) else {
        return Ok(Action::Local(String::new()));
    };
    let args: Vec<&str> = parts.collect();
    match cmd.as_str() {
        "quit" | "exit" => Ok(Action::Quit),
        "help" => Ok(Action::Local(render_help())),
        "agents" => Ok(Action::ListAgents),
        "reload" => Ok(Action::Dispatch(Command::LoadAgents)),
        "agent" => {
            let id = args.first().ok_or_else(|| anyhow!("Usage: /agent <id>"))?;
            Ok(Action::Dispatch(Command::SelectAgent(id.to_string())))
        }
        "tab" => {
            let name = args.first().ok_or_else(|| anyhow!("Usage: /tab <hand|match>"))?;
            let tab = Tab::from_name(name).ok_or_else(|| anyhow!("Unknown tab {name}"))?;
            Ok(Action::Dispatch(Command::SwitchTab(tab)))
        }
        "play" => Ok(Action::Dispatch(Command::PlayHand {
            seed: coerce_seed(args.first().copied()),
        })),
        "match" => {
            let num_hands = match args.first() {
                Some(hands) => coerce_num_hands(Some(*hands)),
                None => default_hands,
            };
            Ok(Action::Dispatch(Command::RunTournament {
                num_hands,
                seed: coerce_seed(args.get(1).copied()),
            }))
        }
        _ => Err(anyhow!("Unknown command /{cmd}")),
    }
}

/// Commands grouped in palette order, followed by the key bindings.
pub fn render_help() -> String {
    let mut groups: Vec<(&str, Vec<&CommandDef>)> = Vec::new();
    for c in COMMANDS.iter() {
        match groups.iter_mut().find(|(group, _)| *group == c.group) {
            Some((_, cmds)) => cmds.push(c),
            None => groups.push((c.group, vec![c])),
        }
    }
    let mut out = String::new();
    for (group, cmds) in groups {
        out.push_str(&format!("\n[{group}]\n"));
        for c in cmds {
            out.push_str(&format!("  {:<22} {}\n", c.usage, c.desc));
        }
    }
    out.push_str("\n[Keys]\n");
    for (key, desc) in KEYS {
        out.push_str(&format!("  {key:<22} {desc}\n"));
    }
    out
}

/// Complete the command word of `input`, keeping any arguments already typed.
///
/// An exact name wins; otherwise the first palette entry with a matching prefix is used.
pub fn autocomplete(input: &str) -> Option<String> {
    let trimmed = input.trim_start();
    let (head, tail) = match trimmed.split_once(' ') {
        Some((head, tail)) => (head, Some(tail)),
        None => (trimmed, None),
    };
    let word = head.strip_prefix('/')?.to_lowercase();
    let found = COMMANDS
        .iter()
        .find(|c| c.name == word)
        .or_else(|| COMMANDS.iter().find(|c| c.name.starts_with(&word)))?;
    Some(match tail {
        Some(rest) => format!("/{} {rest}", found.name),
        None => format!("/{}", found.name),
    })
}

/// Palette entries whose name starts with the typed command word.
pub fn filter_commands(trimmed: &str) -> Vec<usize> {
    let Some(needle) = trimmed.strip_prefix('/') else {
        return Vec::new();
    };
    let needle = needle.split_whitespace().next().unwrap_or("").to_lowercase();
    COMMANDS
        .iter()
        .enumerate()
        .filter(|(_, cmd)| cmd.name.starts_with(&needle))
        .map(|(idx, _)| idx)
        .collect()
}

pub fn hint_for(input: &str) -> String {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return IDLE_HINT.to_string();
    }
    let first = trimmed.split_whitespace().next().unwrap_or("").to_lowercase();
    match HINTS.get(&first) {
        Some(hint) => match TEMPLATES.get(first.trim_start_matches('/')) {
            Some(tpl) => format!("{hint} | {tpl}"),
            None => hint.clone(),
        },
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_play_seed_coercion() {
        assert_eq!(
            handle_line("/play", 1000).unwrap(),
            Action::Dispatch(Command::PlayHand { seed: None })
        );
        assert_eq!(
            handle_line("/play 42", 1000).unwrap(),
            Action::Dispatch(Command::PlayHand { seed: Some(42) })
        );
        assert_eq!(
            handle_line("/PLAY abc", 1000).unwrap(),
            Action::Dispatch(Command::PlayHand { seed: None })
        );
    }

    #[test]
    fn test_match_hands() {
        let run = |line: &str| match handle_line(line, 300).unwrap() {
            Action::Dispatch(Command::RunTournament { num_hands, seed }) => (num_hands, seed),
            other => panic!("unexpected {other:?}"),
        };
        assert_eq!(run("/match"), (300, None));
        assert_eq!(run("/match 0"), (1000, None));
        assert_eq!(run("/match lots"), (1000, None));
        assert_eq!(run("/match 50 9"), (50, Some(9)));
        assert_eq!(run("/match -4"), (-4, None));
    }

    #[test]
    fn test_agent_and_tab() {
        assert_eq!(
            handle_line("/agent NAIVE", 1000).unwrap(),
            Action::Dispatch(Command::SelectAgent("NAIVE".into()))
        );
        assert!(handle_line("/agent", 1000).is_err());
        assert_eq!(
            handle_line("/tab match", 1000).unwrap(),
            Action::Dispatch(Command::SwitchTab(Tab::Tournament))
        );
        assert!(handle_line("/tab lobby", 1000).is_err());
    }

    #[test]
    fn test_rejects_non_commands() {
        assert!(handle_line("play", 1000).is_err());
        assert!(handle_line("/deal 10", 1000).is_err());
        assert_eq!(handle_line("/quit", 1000).unwrap(), Action::Quit);
        assert_eq!(handle_line("/agents", 1000).unwrap(), Action::ListAgents);
        assert_eq!(
            handle_line("/reload", 1000).unwrap(),
            Action::Dispatch(Command::LoadAgents)
        );
    }

    #[test]
    fn test_autocomplete_keeps_arguments() {
        assert_eq!(autocomplete("/ma 10").as_deref(), Some("/match 10"));
        assert_eq!(autocomplete("/pl").as_deref(), Some("/play"));
        assert_eq!(autocomplete("/zzz"), None);
        assert_eq!(autocomplete("play"), None);
        // Palette order decides between prefixes; an exact name always wins.
        assert_eq!(autocomplete("/ag").as_deref(), Some("/agents"));
        assert_eq!(autocomplete("/agent EV").as_deref(), Some("/agent EV"));
    }

    #[test]
    fn test_filter_and_hints() {
        let names: Vec<_> = filter_commands("/a").iter().map(|&i| COMMANDS[i].name).collect();
        assert_eq!(names, ["agents", "agent"]);
        assert!(filter_commands("play").is_empty());
        assert!(hint_for("/match").contains("/match 500"));
        assert_eq!(hint_for(""), IDLE_HINT);
        let help = render_help();
        let session = help.find("[Session]").unwrap();
        let play = help.find("[Play]").unwrap();
        let keys = help.find("[Keys]").unwrap();
        assert!(session < play && play < keys);
        assert!(help.contains("Alt-1/2"));
    }
}
