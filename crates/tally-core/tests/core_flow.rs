use std::path::Path;

use tally_core::controller::SyncController;
use tally_core::error::Error;
use tally_core::filter::FilterMode;
use tally_core::storage::Storage;
use tally_core::task::SEED_GROUP_ID;
use tempfile::tempdir;
use uuid::Uuid;

fn open_controller(path: &Path) -> SyncController {
    let storage = Storage::open(path).expect("open storage");
    SyncController::bootstrap(storage).expect("bootstrap controller")
}

#[test]
fn bootstrap_seeds_default_group() {
    let temp = tempdir().expect("tempdir");
    let controller = open_controller(temp.path());

    let state = controller.render_state();
    assert_eq!(state.groups.len(), 1);
    assert_eq!(state.groups[0].id, SEED_GROUP_ID);
    assert!(state.groups[0].selected);
    assert_eq!(state.selected_group.as_deref(), Some(SEED_GROUP_ID));
    assert_eq!(state.count, 0);
}

#[test]
fn add_toggle_filter_delete_group_scenario() {
    let temp = tempdir().expect("tempdir");
    let mut controller = open_controller(temp.path());

    let task = controller.add_task("Buy milk").expect("add task");
    assert_eq!(task.title, "Buy milk");
    assert!(!task.completed);
    assert_eq!(task.group_id, SEED_GROUP_ID);

    controller
        .set_task_completion(task.id, true)
        .expect("complete task");

    let completed = controller.apply_filter(FilterMode::Completed);
    assert_eq!(completed.count, 1);
    assert_eq!(completed.tasks[0].title, "Buy milk");

    let active = controller.apply_filter(FilterMode::Active);
    assert_eq!(active.count, 0);

    let state = controller
        .delete_group(SEED_GROUP_ID)
        .expect("delete last group");
    assert!(state.groups.is_empty());
    assert!(state.selected_group.is_none());
    assert!(state.tasks.is_empty());

    let err = controller
        .add_task("orphan")
        .expect_err("adding with no groups left must fail");
    assert!(matches!(err, Error::NoGroupSelected));
}

#[test]
fn duplicate_group_is_rejected() {
    let temp = tempdir().expect("tempdir");
    let mut controller = open_controller(temp.path());

    let id = controller.add_group("Work Stuff").expect("create group");
    assert_eq!(id, "work-stuff");

    let err = controller
        .add_group("Work Stuff")
        .expect_err("same slug again must fail");
    assert!(matches!(err, Error::DuplicateGroup(id) if id == "work-stuff"));
}

#[test]
fn new_group_is_not_auto_selected() {
    let temp = tempdir().expect("tempdir");
    let mut controller = open_controller(temp.path());

    controller.add_group("Work Stuff").expect("create group");

    let state = controller.render_state();
    assert_eq!(state.selected_group.as_deref(), Some(SEED_GROUP_ID));
    let group = state
        .groups
        .iter()
        .find(|g| g.id == "work-stuff")
        .expect("group present");
    assert!(!group.selected);
}

#[test]
fn completion_round_trip_restores_state() {
    let temp = tempdir().expect("tempdir");
    let mut controller = open_controller(temp.path());

    let task = controller.add_task("water plants").expect("add task");

    controller
        .set_task_completion(task.id, true)
        .expect("mark done");
    controller
        .set_task_completion(task.id, true)
        .expect("marking done twice is a no-op");
    controller
        .set_task_completion(task.id, false)
        .expect("mark not done");

    let state = controller.render_state();
    assert_eq!(state.count, 1);
    assert!(!state.tasks[0].completed);
}

#[test]
fn deleting_unknown_task_leaves_store_unchanged() {
    let temp = tempdir().expect("tempdir");
    let mut controller = open_controller(temp.path());

    controller.add_task("one").expect("add task");
    controller.add_task("two").expect("add task");

    let err = controller
        .remove_task(Uuid::new_v4())
        .expect_err("unknown id must fail");
    assert!(matches!(err, Error::TaskNotFound(_)));
    assert_eq!(controller.render_state().count, 2);
}

#[test]
fn duplicate_titles_are_distinct_tasks() {
    let temp = tempdir().expect("tempdir");
    let mut controller = open_controller(temp.path());

    let first = controller.add_task("pay rent").expect("add task");
    let second = controller.add_task("pay rent").expect("add task");
    assert_ne!(first.id, second.id);

    controller.remove_task(first.id).expect("delete first copy");

    let state = controller.render_state();
    assert_eq!(state.count, 1);
    assert_eq!(state.tasks[0].id, second.id);
}

#[test]
fn all_filter_renders_incomplete_before_completed() {
    let temp = tempdir().expect("tempdir");
    let mut controller = open_controller(temp.path());

    controller.add_task("one").expect("add task");
    let middle = controller.add_task("two").expect("add task");
    controller.add_task("three").expect("add task");
    controller
        .set_task_completion(middle.id, true)
        .expect("complete middle");

    let titles: Vec<String> = controller
        .render_state()
        .tasks
        .iter()
        .map(|t| t.title.clone())
        .collect();
    assert_eq!(titles, vec!["one", "three", "two"]);
}

#[test]
fn group_delete_cascades_and_reassigns_selection() {
    let temp = tempdir().expect("tempdir");
    let mut controller = open_controller(temp.path());

    controller.add_task("seed task").expect("add task");
    controller.add_group("Work Stuff").expect("create group");
    controller.switch_group("work-stuff").expect("switch");

    let report = controller.add_task("write report").expect("add task");
    controller.add_task("send mail").expect("add task");
    controller
        .set_task_completion(report.id, true)
        .expect("complete one");

    let state = controller.delete_group("work-stuff").expect("delete group");
    assert_eq!(state.groups.len(), 1);
    assert_eq!(state.selected_group.as_deref(), Some(SEED_GROUP_ID));
    assert_eq!(state.count, 1);
    assert_eq!(state.tasks[0].title, "seed task");

    let err = controller
        .switch_group("work-stuff")
        .expect_err("deleted group is gone");
    assert!(matches!(err, Error::GroupNotFound(_)));
}

#[test]
fn clear_completed_is_scoped_to_the_selected_group() {
    let temp = tempdir().expect("tempdir");
    let mut controller = open_controller(temp.path());

    controller.add_task("keep me").expect("add task");
    let done_here = controller.add_task("done here").expect("add task");
    controller
        .set_task_completion(done_here.id, true)
        .expect("complete");

    controller.add_group("work").expect("create group");
    controller.switch_group("work").expect("switch");
    let done_there = controller.add_task("done there").expect("add task");
    controller
        .set_task_completion(done_there.id, true)
        .expect("complete");

    let removed = controller.clear_completed().expect("clear work");
    assert_eq!(removed, 1);

    let state = controller.switch_group(SEED_GROUP_ID).expect("switch back");
    assert_eq!(state.count, 2);

    let removed = controller.clear_completed().expect("clear reminders");
    assert_eq!(removed, 1);
    let removed = controller.clear_completed().expect("nothing left is a no-op");
    assert_eq!(removed, 0);
    assert_eq!(controller.render_state().tasks[0].title, "keep me");
}

#[test]
fn switching_groups_resets_the_filter() {
    let temp = tempdir().expect("tempdir");
    let mut controller = open_controller(temp.path());

    let task = controller.add_task("Buy milk").expect("add task");
    controller
        .set_task_completion(task.id, true)
        .expect("complete");
    assert_eq!(controller.apply_filter(FilterMode::Completed).count, 1);

    controller.add_group("work").expect("create group");
    let state = controller.switch_group("work").expect("switch");
    assert_eq!(controller.filter_mode(), FilterMode::All);
    assert_eq!(state.count, 0);

    let state = controller.switch_group(SEED_GROUP_ID).expect("switch back");
    assert_eq!(state.count, 1);
}

#[test]
fn titles_are_sanitized_and_blank_titles_rejected() {
    let temp = tempdir().expect("tempdir");
    let mut controller = open_controller(temp.path());

    let err = controller
        .add_task("   ")
        .expect_err("whitespace-only title must fail");
    assert!(matches!(err, Error::InvalidInput));

    let task = controller
        .add_task("  <b>milk</b> & eggs  ")
        .expect("add task");
    assert_eq!(task.title, "&lt;b&gt;milk&lt;&#x2F;b&gt; &amp; eggs");
    assert_eq!(controller.render_state().tasks[0].title, task.title);
}

#[test]
fn state_survives_reopen() {
    let temp = tempdir().expect("tempdir");
    {
        let mut controller = open_controller(temp.path());
        controller.add_group("errands").expect("create group");
        let task = controller.add_task("Buy milk").expect("add task");
        controller
            .set_task_completion(task.id, true)
            .expect("complete");
    }

    let controller = open_controller(temp.path());
    let state = controller.render_state();
    assert_eq!(state.groups.len(), 2);
    assert_eq!(state.selected_group.as_deref(), Some(SEED_GROUP_ID));
    assert_eq!(state.count, 1);
    assert_eq!(state.tasks[0].title, "Buy milk");
    assert!(state.tasks[0].completed);
}

#[test]
fn malformed_task_data_degrades_to_empty() {
    let temp = tempdir().expect("tempdir");
    {
        let mut controller = open_controller(temp.path());
        controller.add_task("will be dropped").expect("add task");
    }

    std::fs::write(temp.path().join("tasks.data"), "{not json\n").expect("corrupt data file");

    let storage = Storage::open(temp.path()).expect("open storage");
    assert!(storage.load_tasks().is_empty());

    let controller = SyncController::bootstrap(storage).expect("bootstrap still works");
    assert_eq!(controller.render_state().count, 0);
}
