use std::io::{self, IsTerminal, Write};

use anyhow::anyhow;
use chrono::Local;
use unicode_width::UnicodeWidthStr;
use uuid::Uuid;

use crate::config::Config;
use crate::controller::RenderState;

/// First UUID segment, enough to address a task from the command line.
pub fn short_id(id: Uuid) -> String {
    id.to_string().chars().take(8).collect()
}

#[derive(Debug, Clone)]
pub struct Renderer {
    color: bool,
}

impl Renderer {
    pub fn new(cfg: &Config) -> anyhow::Result<Self> {
        let color_cfg = cfg.get("color").unwrap_or_else(|| "on".to_string());
        let color = match color_cfg.to_ascii_lowercase().as_str() {
            "on" | "yes" | "true" | "1" => true,
            "off" | "no" | "false" | "0" => false,
            other => return Err(anyhow!("invalid color setting: {other}")),
        };

        Ok(Self { color })
    }

    /// Renders the visible task list plus the count line the view shows
    /// after every mutation.
    #[tracing::instrument(skip(self, state))]
    pub fn print_task_list(&mut self, state: &RenderState) -> anyhow::Result<()> {
        let mut out = io::stdout().lock();

        let Some(group) = &state.selected_group else {
            writeln!(out, "No groups. Create one with: tally mkgroup <name>")?;
            return Ok(());
        };

        if state.tasks.is_empty() {
            writeln!(
                out,
                "No tasks in '{}' (filter: {}).",
                group,
                state.filter.label()
            )?;
            return Ok(());
        }

        let headers = vec![
            "ID".to_string(),
            "Done".to_string(),
            "Title".to_string(),
            "Created".to_string(),
        ];

        let mut rows = Vec::with_capacity(state.tasks.len());
        for task in &state.tasks {
            let id = self.paint(&short_id(task.id), "33");
            let done = if task.completed { "x" } else { "" }.to_string();
            let title = if task.completed {
                self.paint(&task.title, "32")
            } else {
                task.title.clone()
            };
            let created = task
                .created
                .with_timezone(&Local)
                .format("%Y-%m-%d")
                .to_string();

            rows.push(vec![id, done, title, created]);
        }

        write_table(&mut out, headers, rows)?;
        writeln!(
            out,
            "\n{} task{} shown in '{}' (filter: {})",
            state.count,
            if state.count == 1 { "" } else { "s" },
            group,
            state.filter.label()
        )?;
        Ok(())
    }

    /// Renders the group list with the selected group marked.
    #[tracing::instrument(skip(self, state))]
    pub fn print_groups(&mut self, state: &RenderState) -> anyhow::Result<()> {
        let mut out = io::stdout().lock();

        if state.groups.is_empty() {
            writeln!(out, "No groups.")?;
            return Ok(());
        }

        for group in &state.groups {
            if group.selected {
                let marked = self.paint(&format!("* {}", group.id), "33");
                writeln!(out, "{marked}")?;
            } else {
                writeln!(out, "  {}", group.id)?;
            }
        }
        Ok(())
    }

    fn paint(&self, text: &str, code: &str) -> String {
        if !self.color || !io::stdout().is_terminal() {
            return text.to_string();
        }
        format!("\x1b[{code}m{text}\x1b[0m")
    }
}

fn write_table<W: Write>(
    mut writer: W,
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
) -> anyhow::Result<()> {
    let column_count = headers.len();
    let mut widths = vec![0usize; column_count];

    for (idx, header) in headers.iter().enumerate() {
        widths[idx] = widths[idx].max(UnicodeWidthStr::width(header.as_str()));
    }

    for row in &rows {
        for (idx, cell) in row.iter().enumerate() {
            widths[idx] = widths[idx].max(UnicodeWidthStr::width(strip_ansi(cell).as_str()));
        }
    }

    for idx in 0..column_count {
        write!(writer, "{:width$} ", headers[idx], width = widths[idx])?;
    }
    writeln!(writer)?;

    for idx in 0..column_count {
        write!(writer, "{:-<width$} ", "", width = widths[idx])?;
    }
    writeln!(writer)?;

    for row in rows {
        for idx in 0..column_count {
            let cell = &row[idx];
            let visible_width = UnicodeWidthStr::width(strip_ansi(cell).as_str());
            let padding = widths[idx].saturating_sub(visible_width);
            write!(writer, "{}{} ", cell, " ".repeat(padding))?;
        }
        writeln!(writer)?;
    }

    Ok(())
}

fn strip_ansi(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut escaped = false;

    for ch in s.chars() {
        if escaped {
            if ch == 'm' {
                escaped = false;
            }
            continue;
        }

        if ch == '\x1b' {
            escaped = true;
            continue;
        }

        out.push(ch);
    }

    out
}
