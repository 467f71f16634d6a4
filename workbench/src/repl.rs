//! Interactive session loop for `workbench repl`.
//!
//! Plain lines go to the terminal interpreter. Lines starting with `:` drive the
//! editor side of the workspace (open, edit, save, close tabs) the way toolbar
//! and tab clicks would. Errors from either side are printed and the session
//! continues.

use std::io::{BufRead, Write};

use anyhow::{Context, Result, anyhow, bail};
use tracing::debug;

use crate::core::path::node_path;
use crate::io::preview::BlobPreview;
use crate::workspace::Workspace;

const META_HELP: &str = "\
Editor commands:
  :open <id>       open a node in a tab
  :activate <id>   switch to an open tab
  :edit <text>     replace the active tab's content
  :append <text>   append a line to the active tab
  :save            save the active tab into the project
  :close [id]      close a tab (default: active)
  :tabs            list open tabs
  :run             render the project in the preview
  :preview         show and release the current preview
  :toggle <id>     expand or collapse a folder
  :explorer        show the file explorer
  :quit            leave the session";

/// Outcome of one REPL line.
#[derive(Debug, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

/// Read lines from `input` until EOF or `:quit`, writing results to `out`.
pub fn run_repl<R: BufRead, W: Write>(
    workspace: &mut Workspace<BlobPreview>,
    input: R,
    out: &mut W,
) -> Result<()> {
    for entry in workspace.transcript().entries() {
        writeln!(out, "{}", entry.text).context("write greeting")?;
    }

    for line in input.lines() {
        let line = line.context("read input line")?;
        if handle_line(workspace, &line, out)? == Flow::Quit {
            break;
        }
    }
    out.flush().context("flush output")?;
    Ok(())
}

fn handle_line<W: Write>(
    workspace: &mut Workspace<BlobPreview>,
    line: &str,
    out: &mut W,
) -> Result<Flow> {
    if line.trim().is_empty() {
        return Ok(Flow::Continue);
    }

    if let Some(meta) = line.trim_start().strip_prefix(':') {
        let (verb, rest) = meta.split_once(' ').unwrap_or((meta, ""));
        if matches!(verb, "quit" | "q") {
            return Ok(Flow::Quit);
        }
        match run_meta(workspace, verb, rest) {
            Ok(text) if text.is_empty() => {}
            Ok(text) => writeln!(out, "{text}").context("write output")?,
            Err(err) => writeln!(out, "error: {err:#}").context("write output")?,
        }
        return Ok(Flow::Continue);
    }

    if let Some(text) = workspace.submit(line).output {
        writeln!(out, "{text}").context("write output")?;
    }
    Ok(Flow::Continue)
}

fn run_meta(workspace: &mut Workspace<BlobPreview>, verb: &str, rest: &str) -> Result<String> {
    debug!(verb, "editor command");
    match verb {
        "help" => Ok(META_HELP.to_string()),
        "open" => {
            let id = required(rest, "usage: :open <id>")?;
            workspace.open(id)?;
            Ok(format!("opened {id}"))
        }
        "activate" => {
            let id = required(rest, "usage: :activate <id>")?;
            workspace.activate(id)?;
            Ok(String::new())
        }
        "edit" => {
            let id = active_id(workspace)?;
            workspace.edit(&id, rest)?;
            Ok(String::new())
        }
        "append" => {
            let id = active_id(workspace)?;
            let mut content = workspace
                .buffers()
                .active()
                .map(|buffer| buffer.current_content.clone())
                .unwrap_or_default();
            if !content.is_empty() && !content.ends_with('\n') {
                content.push('\n');
            }
            content.push_str(rest);
            workspace.edit(&id, &content)?;
            Ok(String::new())
        }
        "save" => match workspace.save_active()? {
            Some(id) => Ok(format!("saved {id}")),
            None => Ok("nothing to save".to_string()),
        },
        "close" => {
            let id = match rest.trim() {
                "" => active_id(workspace)?,
                id => id.to_string(),
            };
            let closed = workspace.close(&id)?;
            Ok(format!("closed {}", closed.id))
        }
        "tabs" => Ok(render_tabs(workspace)),
        "run" => {
            if workspace.run_project() {
                Ok(preview_notice(workspace))
            } else {
                bail!("no document to preview")
            }
        }
        "preview" => {
            let handle = workspace
                .preview()
                .current()
                .ok_or_else(|| anyhow!("nothing has been rendered"))?;
            workspace
                .preview_mut()
                .consume(handle)
                .ok_or_else(|| anyhow!("{handle} has been released"))
        }
        "toggle" => {
            let id = required(rest, "usage: :toggle <id>")?;
            let expanded = workspace.toggle_folder(id)?;
            Ok(format!(
                "{id} {}",
                if expanded { "expanded" } else { "collapsed" }
            ))
        }
        "explorer" => Ok(workspace.explorer().trim_end().to_string()),
        other => bail!("unknown editor command ':{other}' (try :help)"),
    }
}

fn required<'a>(rest: &'a str, usage: &str) -> Result<&'a str> {
    match rest.trim() {
        "" => bail!("{usage}"),
        value => Ok(value),
    }
}

fn active_id(workspace: &Workspace<BlobPreview>) -> Result<String> {
    workspace
        .buffers()
        .active_id()
        .map(str::to_string)
        .ok_or_else(|| anyhow!("no active tab"))
}

fn preview_notice(workspace: &Workspace<BlobPreview>) -> String {
    match workspace.preview().current() {
        Some(handle) => format!("preview ready at {handle}"),
        None => String::new(),
    }
}

fn render_tabs(workspace: &Workspace<BlobPreview>) -> String {
    let active = workspace.buffers().active_id();
    let lines: Vec<String> = workspace
        .buffers()
        .buffers()
        .iter()
        .map(|buffer| {
            let marker = if active == Some(buffer.id.as_str()) { "*" } else { " " };
            let dirty = if workspace.is_dirty(&buffer.id).unwrap_or(false) {
                " (modified)"
            } else {
                ""
            };
            let location = buffer
                .source_ref
                .as_deref()
                .and_then(|source| node_path(workspace.tree().root(), source))
                .unwrap_or_else(|| "-".to_string());
            format!(
                "{marker} {}  {}  [{}]{dirty}  {location}",
                buffer.id,
                buffer.display_name,
                buffer.language()
            )
        })
        .collect();
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::config::WorkbenchConfig;

    fn session(script: &str) -> (Workspace<BlobPreview>, String) {
        let mut workspace = Workspace::from_config(&WorkbenchConfig::default()).expect("workspace");
        let mut out = Vec::new();
        run_repl(&mut workspace, script.as_bytes(), &mut out).expect("repl");
        (workspace, String::from_utf8(out).expect("utf8"))
    }

    #[test]
    fn greeting_and_command_output_are_printed() {
        let (_, out) = session("pwd\n");
        assert!(out.starts_with("Welcome to the workbench terminal\n"));
        assert!(out.ends_with("/home/user/my-project\n"));
    }

    #[test]
    fn blank_lines_are_skipped() {
        let (workspace, _) = session("\n   \npwd\n");
        assert_eq!(workspace.transcript().len(), 4);
    }

    #[test]
    fn editor_commands_round_trip_through_the_tree() {
        let script = ":open style-css\n:edit body {}\n:append p {}\n:tabs\n:save\ncat style.css\n";
        let (workspace, out) = session(script);
        assert!(out.contains("* style-css  style.css  [CSS] (modified)  my-project/style.css"));
        assert!(out.contains("saved style-css"));
        assert!(out.contains("Contents of style.css:\n\nbody {}\np {}"));
        assert_eq!(
            workspace.tree().lookup("style-css").expect("css").content(),
            Some("body {}\np {}")
        );
    }

    #[test]
    fn errors_are_reported_and_session_continues() {
        let (_, out) = session(":open ghost\n:bogus\npwd\n");
        assert!(out.contains("error: node 'ghost' not found"));
        assert!(out.contains("error: unknown editor command ':bogus'"));
        assert!(out.contains("/home/user/my-project"));
    }

    #[test]
    fn multibyte_line_does_not_end_the_session() {
        let (workspace, out) = session("pwd\nİİİİİİ\npwd\n");
        assert!(out.contains("unrecognized command: İİİİİİ"));
        assert_eq!(out.matches("/home/user/my-project").count(), 2);
        assert_eq!(workspace.transcript().len(), 8);
    }

    #[test]
    fn quit_stops_reading() {
        let (workspace, _) = session(":quit\npwd\n");
        assert_eq!(workspace.transcript().len(), 2);
    }

    #[test]
    fn npm_start_then_preview_consumes_handle() {
        let (workspace, out) = session("npm start\n:preview\n:preview\n");
        assert!(out.contains("<!DOCTYPE html>"));
        assert!(out.contains("error: blob:preview/1 has been released"));
        assert_eq!(workspace.preview().live_count(), 0);
    }

    #[test]
    fn close_defaults_to_active_tab() {
        let (workspace, out) = session(":open script-js\n:close\n:close\n:close\n");
        assert!(out.contains("closed script-js"));
        assert!(out.contains("closed welcome"));
        assert!(out.contains("error: no active tab"));
        assert!(workspace.buffers().is_empty());
    }
}
