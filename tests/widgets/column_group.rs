use search_config_sync::store::{CUSTOM_GROUP_KEY, DEFAULT_GROUP_KEY};
use search_config_sync::widget::{ColumnGroupWidget, SelectionChanged, WidgetError};
use search_config_sync::{Column, InMemorySearchConfigApi};

use crate::fakes::{Collected, RecordingNotifier, ScriptedDialog};
use crate::Host;

type Widget = ColumnGroupWidget<InMemorySearchConfigApi, ScriptedDialog, RecordingNotifier>;

fn widget(host: &Host) -> Widget {
    ColumnGroupWidget::new(
        host.group_store(),
        host.api.clone(),
        host.dialog.clone(),
        host.notifier.clone(),
        host.context(),
    )
}

fn columns() -> Vec<Column> {
    vec![
        Column::new("id").in_groups([DEFAULT_GROUP_KEY, "extended"]),
        Column::new("title").in_groups([DEFAULT_GROUP_KEY]),
        Column::new("owner").in_groups(["extended"]),
    ]
}

fn ids(columns: &[Column]) -> Vec<&str> {
    columns.iter().map(|c| c.id.as_str()).collect()
}

#[test]
fn columns_define_groups_and_the_starting_selection() {
    let host = Host::new();
    let widget = widget(&host);
    let changes = Collected::<SelectionChanged>::new();
    widget.on_selection_changed(changes.sink());

    widget.set_columns(columns());

    assert_eq!(widget.store().state().group_keys, vec![DEFAULT_GROUP_KEY, "extended"]);
    assert_eq!(widget.store().selected_group_key(), DEFAULT_GROUP_KEY);
    assert_eq!(ids(&widget.active_columns()), vec!["id", "title"]);

    let events = changes.wait_for(1);
    assert_eq!(events[0].group_key, DEFAULT_GROUP_KEY);
    assert_eq!(ids(&events[0].active_columns), vec!["id", "title"]);
}

#[test]
fn selecting_a_predefined_group_shows_its_columns() {
    let host = Host::new();
    let widget = widget(&host);
    widget.set_columns(columns());

    assert_eq!(widget.select_group("extended"), Ok(true));

    assert_eq!(widget.store().selected_group_key(), "extended");
    assert_eq!(ids(&widget.active_columns()), vec!["id", "owner"]);
}

#[test]
fn diverging_from_a_group_switches_to_custom() {
    let host = Host::new();
    let widget = widget(&host);
    widget.set_columns(columns());

    assert!(widget.set_displayed_columns(vec!["owner".into()]));

    assert_eq!(widget.store().selected_group_key(), CUSTOM_GROUP_KEY);
    assert_eq!(ids(&widget.active_columns()), vec!["owner"]);
}

#[test]
fn reordering_a_group_keeps_it_selected() {
    let host = Host::new();
    let widget = widget(&host);
    widget.set_columns(columns());

    widget.set_displayed_columns(vec!["title".into(), "id".into()]);

    assert_eq!(widget.store().selected_group_key(), DEFAULT_GROUP_KEY);
    assert_eq!(ids(&widget.active_columns()), vec!["title", "id"]);
}

#[test]
fn saved_column_preset_becomes_the_group_key() {
    let host = Host::new();
    let widget = widget(&host);
    widget.set_columns(columns());
    widget.set_displayed_columns(vec!["owner".into(), "title".into()]);
    host.dialog.save_columns_as("triage");

    let created = widget.save_new().unwrap();

    assert_eq!(created.columns, vec!["owner", "title"]);
    assert!(created.values.is_empty());
    assert_eq!(widget.store().selected_group_key(), "triage");
    assert!(widget.view().all_group_keys.contains(&"triage".to_string()));

    widget.set_displayed_columns(vec!["owner".into()]);
    assert_eq!(widget.store().current_preset(), None);
    assert_eq!(widget.store().selected_group_key(), CUSTOM_GROUP_KEY);
}

#[test]
fn selecting_a_column_preset_by_name() {
    let host = Host::new();
    host.seed("3", "config-3", |c| c.columns = vec!["owner".into()]);
    let widget = widget(&host);
    widget.set_columns(columns());
    widget.load().unwrap();

    assert_eq!(widget.select_group("config-3"), Ok(true));

    assert_eq!(
        widget.store().current_preset().map(|p| p.id),
        Some("3".to_string())
    );
    assert_eq!(ids(&widget.active_columns()), vec!["owner"]);
}

#[test]
fn deleting_the_active_preset_falls_back_to_custom() {
    let host = Host::new();
    host.seed("3", "config-3", |c| c.columns = vec!["owner".into()]);
    let widget = widget(&host);
    widget.set_columns(columns());
    widget.load().unwrap();
    widget.select_group("config-3").unwrap();
    let preset = widget.store().current_preset().unwrap();
    host.dialog.confirm();

    widget.delete(&preset).unwrap();

    assert_eq!(widget.store().selected_group_key(), CUSTOM_GROUP_KEY);
    assert_eq!(widget.store().current_preset(), None);
    assert_eq!(host.notifier.successes(), vec!["COLUMN_GROUP.DELETE.SUCCESS"]);
}

#[test]
fn unknown_group_is_rejected() {
    let host = Host::new();
    let widget = widget(&host);
    widget.set_columns(columns());

    assert_eq!(
        widget.select_group("nope"),
        Err(WidgetError::NotFound("nope".into()))
    );
    assert_eq!(widget.store().selected_group_key(), DEFAULT_GROUP_KEY);
}
