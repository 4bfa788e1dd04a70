use anyhow::anyhow;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::cli::Invocation;
use crate::controller::SyncController;
use crate::filter::FilterMode;
use crate::render::{Renderer, short_id};

pub fn known_command_names() -> Vec<&'static str> {
    vec![
        "add", "done", "undone", "delete", "clear", "list", "filter", "groups", "mkgroup",
        "rmgroup", "switch", "help", "version",
    ]
}

pub fn expand_command_abbrev<'a>(token: &'a str, known: &[&'a str]) -> Option<&'a str> {
    if known.contains(&token) {
        return Some(token);
    }

    let mut matches = known.iter().copied().filter(|name| name.starts_with(token));
    let first = matches.next()?;
    if matches.next().is_some() {
        None
    } else {
        Some(first)
    }
}

#[instrument(skip(controller, renderer, inv))]
pub fn dispatch(
    controller: &mut SyncController,
    renderer: &mut Renderer,
    inv: Invocation,
) -> anyhow::Result<()> {
    let command = inv.command.as_str();
    debug!(command, args = ?inv.args, "dispatching command");

    match command {
        "add" => cmd_add(controller, renderer, &inv.args),
        "done" => cmd_set_completion(controller, renderer, &inv.args, true),
        "undone" => cmd_set_completion(controller, renderer, &inv.args, false),
        "delete" => cmd_delete(controller, renderer, &inv.args),
        "clear" => cmd_clear(controller, renderer),
        "list" => cmd_list(controller, renderer, &inv.args),
        "filter" => cmd_filter(controller, renderer, &inv.args),
        "groups" => renderer.print_groups(&controller.render_state()),
        "mkgroup" => cmd_mkgroup(controller, renderer, &inv.args),
        "rmgroup" => cmd_rmgroup(controller, renderer, &inv.args),
        "switch" => cmd_switch(controller, renderer, &inv.args),
        "help" => cmd_help(),
        "version" => {
            println!("{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        other => Err(anyhow!("unknown command: {other}")),
    }
}

/// Resolves a user-typed token to a stable task id: a full UUID, or a
/// unique prefix of one. All store lookups downstream take the full id.
fn resolve_task_id(controller: &SyncController, token: &str) -> anyhow::Result<Uuid> {
    if let Ok(id) = token.parse::<Uuid>() {
        return Ok(id);
    }

    let needle = token.to_ascii_lowercase();
    let mut candidates = controller
        .tasks()
        .iter()
        .filter(|task| task.id.to_string().starts_with(&needle));

    let first = candidates
        .next()
        .ok_or_else(|| anyhow!("no task matching id '{token}'"))?;
    if candidates.next().is_some() {
        return Err(anyhow!("task id '{token}' is ambiguous"));
    }

    Ok(first.id)
}

fn cmd_add(
    controller: &mut SyncController,
    renderer: &mut Renderer,
    args: &[String],
) -> anyhow::Result<()> {
    let title = args.join(" ");
    let task = controller.add_task(&title)?;

    info!(id = %task.id, "command add");
    println!("Created task {}.", short_id(task.id));
    renderer.print_task_list(&controller.render_state())
}

fn cmd_set_completion(
    controller: &mut SyncController,
    renderer: &mut Renderer,
    args: &[String],
    completed: bool,
) -> anyhow::Result<()> {
    let token = args
        .first()
        .ok_or_else(|| anyhow!("expected a task id"))?;
    let id = resolve_task_id(controller, token)?;

    controller.set_task_completion(id, completed)?;
    println!(
        "Task {} marked {}.",
        short_id(id),
        if completed { "done" } else { "not done" }
    );
    renderer.print_task_list(&controller.render_state())
}

fn cmd_delete(
    controller: &mut SyncController,
    renderer: &mut Renderer,
    args: &[String],
) -> anyhow::Result<()> {
    let token = args
        .first()
        .ok_or_else(|| anyhow!("expected a task id"))?;
    let id = resolve_task_id(controller, token)?;

    controller.remove_task(id)?;
    println!("Deleted task {}.", short_id(id));
    renderer.print_task_list(&controller.render_state())
}

fn cmd_clear(controller: &mut SyncController, renderer: &mut Renderer) -> anyhow::Result<()> {
    let removed = controller.clear_completed()?;
    println!(
        "Removed {removed} completed task{}.",
        if removed == 1 { "" } else { "s" }
    );
    renderer.print_task_list(&controller.render_state())
}

fn cmd_list(
    controller: &mut SyncController,
    renderer: &mut Renderer,
    args: &[String],
) -> anyhow::Result<()> {
    let state = match args.first() {
        Some(token) => {
            let mode = FilterMode::parse(token)
                .ok_or_else(|| anyhow!("unknown filter: {token} (all, active, completed)"))?;
            controller.apply_filter(mode)
        }
        None => controller.render_state(),
    };
    renderer.print_task_list(&state)
}

fn cmd_filter(
    controller: &mut SyncController,
    renderer: &mut Renderer,
    args: &[String],
) -> anyhow::Result<()> {
    let token = args
        .first()
        .ok_or_else(|| anyhow!("expected a filter mode (all, active, completed)"))?;
    let mode = FilterMode::parse(token)
        .ok_or_else(|| anyhow!("unknown filter: {token} (all, active, completed)"))?;

    renderer.print_task_list(&controller.apply_filter(mode))
}

fn cmd_mkgroup(
    controller: &mut SyncController,
    renderer: &mut Renderer,
    args: &[String],
) -> anyhow::Result<()> {
    let name = args.join(" ");
    let id = controller.add_group(&name)?;

    println!("Created group '{id}'.");
    renderer.print_groups(&controller.render_state())
}

fn cmd_rmgroup(
    controller: &mut SyncController,
    renderer: &mut Renderer,
    args: &[String],
) -> anyhow::Result<()> {
    let id = args
        .first()
        .ok_or_else(|| anyhow!("expected a group id"))?;
    let state = controller.delete_group(id)?;

    println!("Deleted group '{id}' and its tasks.");
    renderer.print_groups(&state)?;
    renderer.print_task_list(&state)
}

fn cmd_switch(
    controller: &mut SyncController,
    renderer: &mut Renderer,
    args: &[String],
) -> anyhow::Result<()> {
    let id = args
        .first()
        .ok_or_else(|| anyhow!("expected a group id"))?;
    let state = controller.switch_group(id)?;

    println!("Switched to group '{id}'.");
    renderer.print_task_list(&state)
}

fn cmd_help() -> anyhow::Result<()> {
    println!(
        "\
tally <command> [args]

  add <title...>              add a task to the selected group
  done <task-id>              mark a task completed
  undone <task-id>            mark a task not completed
  delete <task-id>            delete a task
  clear                       remove completed tasks of the selected group
  list [all|active|completed] show tasks under a filter
  filter <all|active|completed>
  groups                      show groups, selected group marked
  mkgroup <name...>           create a group (does not select it)
  rmgroup <group-id>          delete a group and its tasks
  switch <group-id>           select another group
  help, version

Task ids accept any unique prefix of the full id."
    );
    Ok(())
}
