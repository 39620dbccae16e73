//! Line-oriented board session for `pie play`.
//!
//! Groups, circles and slices are addressed by 1-based display position,
//! the way they appear in `show` output. Blank lines and `#` comments are
//! ignored so scripts can be annotated.

use std::io::{BufRead, Write};

use anyhow::{Context, Result, anyhow, bail};
use pie_core::{Board, CircleId, GroupId, Key, Mode, Notice};

use crate::config::Config;
use crate::render;

pub const HELP: &str = "\
commands:
  add                      add a new circle
  mode <select|erase|drag|amplify>
  key <v|e|d|a|n|esc>      keyboard shortcut
  slice <group> <circle> <slice>
  container <group>        click a group's card
  handle <group>           drag-handle under a group (drag mode)
  background               click empty workspace
  divide <group> <delta>   e.g. divide 1 +2
  dup <group>              duplicate a group
  amplify <factor>         answer the open amplify prompt
  dismiss                  close the amplify prompt
  show | json | help";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Add,
    Mode(Mode),
    Key(Key),
    Slice {
        group: usize,
        circle: usize,
        slice: usize,
    },
    Container(usize),
    Handle(usize),
    Background,
    Divide {
        group: usize,
        delta: i64,
    },
    Duplicate(usize),
    Amplify(String),
    Dismiss,
    Show,
    Json,
    Help,
}

fn position(arg: Option<&str>, what: &str) -> Result<usize> {
    let raw = arg.ok_or_else(|| anyhow!("missing {what} position"))?;
    let n: usize = raw
        .parse()
        .with_context(|| format!("invalid {what} position: {raw}"))?;
    if n == 0 {
        bail!("{what} positions start at 1");
    }
    Ok(n)
}

fn parse_key(raw: &str) -> Result<Key> {
    if raw.eq_ignore_ascii_case("esc") || raw.eq_ignore_ascii_case("escape") {
        return Ok(Key::Escape);
    }
    let mut chars = raw.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(Key::Char(c)),
        _ => bail!("unknown key: {raw}"),
    }
}

/// Parse one input line. `Ok(None)` for blank lines and comments.
pub fn parse_command(line: &str) -> Result<Option<Command>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }
    let mut parts = line.split_whitespace();
    let verb = parts.next().unwrap_or_default().to_ascii_lowercase();
    let cmd = match verb.as_str() {
        "add" => Command::Add,
        "mode" => {
            let raw = parts.next().ok_or_else(|| anyhow!("missing mode"))?;
            Command::Mode(raw.parse().map_err(|e: String| anyhow!(e))?)
        }
        "key" => Command::Key(parse_key(parts.next().ok_or_else(|| anyhow!("missing key"))?)?),
        "slice" => Command::Slice {
            group: position(parts.next(), "group")?,
            circle: position(parts.next(), "circle")?,
            slice: position(parts.next(), "slice")?,
        },
        "container" => Command::Container(position(parts.next(), "group")?),
        "handle" => Command::Handle(position(parts.next(), "group")?),
        "background" => Command::Background,
        "divide" => {
            let group = position(parts.next(), "group")?;
            let raw = parts.next().ok_or_else(|| anyhow!("missing delta"))?;
            let delta = raw.parse().with_context(|| format!("invalid delta: {raw}"))?;
            Command::Divide { group, delta }
        }
        "dup" | "duplicate" => Command::Duplicate(position(parts.next(), "group")?),
        "amplify" => Command::Amplify(parts.collect::<Vec<_>>().join(" ")),
        "dismiss" => Command::Dismiss,
        "show" => Command::Show,
        "json" => Command::Json,
        "help" | "?" => Command::Help,
        other => bail!("unknown command: {other} (try `help`)"),
    };
    Ok(Some(cmd))
}

pub struct Session {
    board: Board,
}

impl Session {
    pub fn new(config: &Config) -> Self {
        Self {
            board: Board::new(config.max_divisions),
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    fn group_id(&self, position: usize) -> Result<GroupId> {
        self.board
            .workspace()
            .groups
            .get(position - 1)
            .map(|g| g.id)
            .ok_or_else(|| anyhow!("no group at position {position}"))
    }

    fn circle_id(&self, group: usize, circle: usize) -> Result<(GroupId, CircleId)> {
        let gid = self.group_id(group)?;
        let cid = self
            .board
            .workspace()
            .groups[group - 1]
            .circles
            .get(circle - 1)
            .map(|c| c.id)
            .ok_or_else(|| anyhow!("group {group} has no circle {circle}"))?;
        Ok((gid, cid))
    }

    /// Run one command and return what should be printed.
    pub fn execute(&mut self, cmd: Command) -> Result<String> {
        tracing::debug!(?cmd, "play command");
        let notices: Vec<Notice> = match cmd {
            Command::Add => {
                let id = self.board.add_circle();
                tracing::debug!(%id, "added group");
                Vec::new()
            }
            Command::Mode(mode) => self.board.set_mode(mode),
            Command::Key(key) => self.board.press_key(key),
            Command::Slice {
                group,
                circle,
                slice,
            } => {
                let (gid, cid) = self.circle_id(group, circle)?;
                self.board.click_slice(gid, cid, slice - 1)
            }
            Command::Container(group) => {
                let gid = self.group_id(group)?;
                self.board.click_container(gid)
            }
            Command::Handle(group) => {
                let gid = self.group_id(group)?;
                self.board.click_handle(gid)
            }
            Command::Background => self.board.click_background(),
            Command::Divide { group, delta } => {
                let gid = self.group_id(group)?;
                let (divisions, notices) = self.board.divide(gid, delta);
                tracing::debug!(?divisions, "divided group");
                notices
            }
            Command::Duplicate(group) => {
                let gid = self.group_id(group)?;
                self.board.duplicate(gid)
            }
            Command::Amplify(input) => {
                if self.board.amplifying().is_none() {
                    bail!("no amplify prompt is open (click a group in amplify mode first)");
                }
                match self.board.confirm_amplify(&input) {
                    Ok(notices) => notices,
                    Err(e) => return Ok(format!("invalid factor: {e}\n")),
                }
            }
            Command::Dismiss => {
                self.board.dismiss_amplify();
                Vec::new()
            }
            Command::Show => return Ok(render::board(&self.board.snapshot())),
            Command::Json => {
                let json = self.board.snapshot().to_json()?;
                return Ok(format!("{json}\n"));
            }
            Command::Help => return Ok(format!("{HELP}\n")),
        };
        let mut out = String::new();
        for n in &notices {
            out.push_str(&render::notice(n));
            out.push('\n');
        }
        Ok(out)
    }
}

/// Feed every line of `input` through the session. Bad lines are reported
/// on `err` and skipped; returns how many there were.
pub fn run(
    session: &mut Session,
    input: impl BufRead,
    out: &mut impl Write,
    err: &mut impl Write,
) -> Result<usize> {
    let mut failures = 0;
    for (lineno, line) in input.lines().enumerate() {
        let line = line.context("failed to read input")?;
        let result = parse_command(&line).and_then(|cmd| match cmd {
            Some(cmd) => session.execute(cmd),
            None => Ok(String::new()),
        });
        match result {
            Ok(text) => out.write_all(text.as_bytes())?,
            Err(e) => {
                failures += 1;
                tracing::warn!(line = lineno + 1, "command failed: {e:#}");
                writeln!(err, "line {}: {e:#}", lineno + 1)?;
            }
        }
    }
    out.flush()?;
    Ok(failures)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> Session {
        Session::new(&Config::default())
    }

    fn run_script(script: &str) -> (String, String, usize) {
        let mut s = session();
        let mut out = Vec::new();
        let mut err = Vec::new();
        let failures = run(&mut s, script.as_bytes(), &mut out, &mut err).unwrap();
        (
            String::from_utf8(out).unwrap(),
            String::from_utf8(err).unwrap(),
            failures,
        )
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(parse_command("  # note").unwrap(), None);
        assert_eq!(parse_command("").unwrap(), None);
        assert_eq!(parse_command("ADD").unwrap(), Some(Command::Add));
        assert_eq!(
            parse_command("divide 2 +3").unwrap(),
            Some(Command::Divide { group: 2, delta: 3 })
        );
        assert_eq!(
            parse_command("divide 1 -1").unwrap(),
            Some(Command::Divide { group: 1, delta: -1 })
        );
        assert_eq!(
            parse_command("key esc").unwrap(),
            Some(Command::Key(Key::Escape))
        );
        assert_eq!(
            parse_command("mode drag").unwrap(),
            Some(Command::Mode(Mode::Drag))
        );
        assert_eq!(
            parse_command("amplify 2.5").unwrap(),
            Some(Command::Amplify("2.5".to_string()))
        );
    }

    #[test]
    fn test_parse_errors() {
        assert!(parse_command("slice 0 1 1").is_err());
        assert!(parse_command("slice 1 1").is_err());
        assert!(parse_command("mode paint").is_err());
        assert!(parse_command("fly").is_err());
        assert!(parse_command("key ctrl").is_err());
        assert!(parse_command("divide 1 ++3").is_err());
    }

    #[test]
    fn test_script_merge() {
        let (out, err, failures) = run_script(
            "add\ndivide 1 +1\nadd\ndivide 2 +3\nmode drag\nhandle 1\ncontainer 2\nshow\n",
        );
        assert_eq!(failures, 0, "{err}");
        assert!(out.contains("[info] Drag tool active (D)"));
        assert!(out.contains("[ok] Fractions added!"));
        // group 1 was swept, so the quarters moved up to position 1
        assert!(out.contains("[1]     3/4  ●●●○"));
    }

    #[test]
    fn test_script_reports_bad_lines() {
        let (_, err, failures) = run_script("add\nslice 4 1 1\nnonsense\n");
        assert_eq!(failures, 2);
        assert!(err.contains("line 2: no group at position 4"));
        assert!(err.contains("line 3: unknown command"));
    }

    #[test]
    fn test_amplify_field_message() {
        let (out, _, failures) =
            run_script("add\ndivide 1 +1\nmode amplify\ncontainer 1\namplify 1\namplify 3\nshow\n");
        assert_eq!(failures, 0);
        assert!(out.contains("invalid factor: factor must be greater than 1"));
        assert!(out.contains("[ok] Fraction amplified: 1/2 = 3/6"));
        assert!(out.contains("●●●○○○"));
    }

    #[test]
    fn test_dismiss_closes_prompt() {
        let mut s = session();
        for line in ["add", "mode amplify", "container 1", "dismiss"] {
            s.execute(parse_command(line).unwrap().unwrap()).unwrap();
        }
        assert_eq!(s.board().amplifying(), None);
        assert!(s.execute(Command::Amplify("2".into())).is_err());
    }

    #[test]
    fn test_amplify_without_prompt_fails() {
        let (_, err, failures) = run_script("add\namplify 2\n");
        assert_eq!(failures, 1);
        assert!(err.contains("no amplify prompt"));
    }
}
