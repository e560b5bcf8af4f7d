use std::collections::BTreeMap;

use search_config_sync::api::{ApiError, SearchConfigApi};
use search_config_sync::widget::{PresetSelected, SearchConfigWidget, WidgetError};
use search_config_sync::{FieldValue, ViewMode};

use crate::fakes::{Collected, RecordingNotifier, ScriptedDialog, UnlabelledApi};
use crate::Host;

type Widget = SearchConfigWidget<
    search_config_sync::InMemorySearchConfigApi,
    ScriptedDialog,
    RecordingNotifier,
>;

fn widget(host: &Host) -> Widget {
    SearchConfigWidget::new(
        host.store(),
        host.api.clone(),
        host.dialog.clone(),
        host.notifier.clone(),
        host.context(),
    )
}

fn seed_open(host: &Host) {
    host.seed("1", "open", |c| {
        c.values.insert("status".into(), "open".into());
    });
}

fn raw(pairs: &[(&str, FieldValue)]) -> BTreeMap<String, FieldValue> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
}

#[test]
fn load_fills_the_store() {
    let host = Host::new();
    seed_open(&host);
    let widget = widget(&host);

    assert_eq!(widget.load(), Ok(1));
    assert_eq!(widget.view().presets.len(), 1);
}

#[test]
fn failed_load_notifies_and_keeps_state() {
    let host = Host::new();
    seed_open(&host);
    let widget = widget(&host);
    host.api.fail_next(ApiError::Unavailable("offline".into()));

    let err = widget.load().unwrap_err();

    assert!(matches!(err, WidgetError::Api(ApiError::Unavailable(_))));
    assert_eq!(host.notifier.errors(), vec!["SEARCH_CONFIG.LOAD.ERROR"]);
    assert!(widget.store().all_presets().is_empty());
}

#[test]
fn save_new_stores_and_selects_live_values() {
    let host = Host::new();
    let widget = widget(&host);
    let selected = Collected::<PresetSelected>::new();
    widget.on_preset_selected(selected.sink());

    widget.set_field_values(&raw(&[
        ("status", FieldValue::from("open")),
        ("assignee", FieldValue::Null),
        ("limit", FieldValue::from(25i64)),
    ]));
    host.dialog.save_values_as("open");

    let created = widget.save_new().unwrap();

    assert_eq!(created.name, "open");
    assert_eq!(created.values.len(), 2);
    assert_eq!(created.values.get("limit").map(String::as_str), Some("25"));
    assert!(created.columns.is_empty());
    assert_eq!(widget.store().current_preset(), Some(created.clone()));
    assert_eq!(host.api.len(), 1);
    assert_eq!(host.notifier.successes(), vec!["SEARCH_CONFIG.CREATE.SUCCESS"]);

    let events = selected.wait_for(1);
    assert_eq!(events[0].input_values, created.values);
    assert_eq!(events[0].view_mode, ViewMode::Basic);
}

#[test]
fn dismissed_dialog_cancels_quietly() {
    let host = Host::new();
    let widget = widget(&host);

    assert_eq!(widget.save_new(), Err(WidgetError::Cancelled));
    assert!(host.api.is_empty());
    assert!(host.notifier.errors().is_empty());
    assert_eq!(host.dialog.opened().len(), 1);
}

#[test]
fn failed_create_leaves_the_session_untouched() {
    let host = Host::new();
    let widget = widget(&host);
    widget.set_field_values(&raw(&[("status", FieldValue::from("open"))]));
    let revision = widget.store().revision();
    host.dialog.save_values_as("open");
    host.api.fail_next(ApiError::Unavailable("offline".into()));

    assert!(matches!(widget.save_new(), Err(WidgetError::Api(_))));

    assert_eq!(widget.store().revision(), revision);
    assert!(widget.store().all_presets().is_empty());
    assert_eq!(host.notifier.errors(), vec!["SEARCH_CONFIG.CREATE.ERROR"]);
}

#[test]
fn create_without_the_new_id_reloads_and_reports() {
    let host = Host::new();
    let widget = SearchConfigWidget::new(
        host.store(),
        UnlabelledApi(host.api.clone()),
        host.dialog.clone(),
        host.notifier.clone(),
        host.context(),
    );
    widget.set_field_values(&raw(&[("status", FieldValue::from("open"))]));
    host.dialog.save_values_as("open");

    let err = widget.save_new().unwrap_err();

    assert_eq!(err, WidgetError::NotFound(String::new()));
    assert_eq!(host.api.len(), 1);
    let presets = widget.store().all_presets();
    assert_eq!(presets.len(), 1);
    assert_eq!(presets[0].name, "open");
    assert_eq!(widget.store().current_preset(), None);
    assert_eq!(host.notifier.errors(), vec!["SEARCH_CONFIG.CREATE.ERROR"]);
    assert!(host.notifier.successes().is_empty());
}

#[test]
fn peer_selection_reaches_the_host_page() {
    let host = Host::new();
    seed_open(&host);
    let peer = host.store();
    let widget = widget(&host);
    let selected = Collected::<PresetSelected>::new();
    widget.on_preset_selected(selected.sink());
    widget.load().unwrap();

    let open = peer.all_presets().remove(0);
    peer.set_current_config(Some(open.clone()));

    let events = selected.wait_for(1);
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].input_values, open.values);
}

#[test]
fn readonly_presets_cannot_be_deleted() {
    let host = Host::new();
    host.seed("1", "locked", |c| {
        c.values.insert("status".into(), "open".into());
        c.is_readonly = true;
    });
    let widget = widget(&host);
    widget.load().unwrap();
    let locked = widget.store().all_presets().remove(0);

    assert_eq!(
        widget.delete(&locked),
        Err(WidgetError::Readonly("1".into()))
    );
    assert!(host.dialog.opened().is_empty());
    assert_eq!(host.api.len(), 1);
}

#[test]
fn confirmed_delete_removes_everywhere() {
    let host = Host::new();
    seed_open(&host);
    let peer = host.store();
    let widget = widget(&host);
    widget.load().unwrap();
    let open = widget.store().all_presets().remove(0);
    host.dialog.confirm();

    widget.delete(&open).unwrap();

    assert!(host.api.is_empty());
    assert!(widget.store().all_presets().is_empty());
    assert!(peer.all_presets().is_empty());
    assert_eq!(host.notifier.successes(), vec!["SEARCH_CONFIG.DELETE.SUCCESS"]);
}

#[test]
fn edit_and_save_updates_the_backend() {
    let host = Host::new();
    seed_open(&host);
    let widget = widget(&host);
    widget.load().unwrap();
    let open = widget.store().all_presets().remove(0);

    widget.begin_edit(&open).unwrap();
    widget.set_field_values(&raw(&[("status", FieldValue::from("closed"))]));
    widget.set_view_mode(ViewMode::Advanced);
    let saved = widget.save_edit().unwrap();

    assert_eq!(saved.values.get("status").map(String::as_str), Some("closed"));
    assert!(saved.is_advanced);
    assert!(!widget.store().is_edit_mode());
    assert_eq!(widget.store().current_preset(), Some(saved.clone()));
    let stored = host.api.get("1").unwrap().config;
    assert_eq!(stored.values, saved.values);
    assert_eq!(host.notifier.successes(), vec!["SEARCH_CONFIG.EDIT.SUCCESS"]);
}

#[test]
fn failed_save_keeps_editing() {
    let host = Host::new();
    seed_open(&host);
    let widget = widget(&host);
    widget.load().unwrap();
    let open = widget.store().all_presets().remove(0);
    widget.begin_edit(&open).unwrap();
    host.api.fail_next(ApiError::Unavailable("offline".into()));

    assert!(widget.save_edit().is_err());

    assert!(widget.store().is_edit_mode());
    assert_eq!(host.notifier.errors(), vec!["SEARCH_CONFIG.EDIT.ERROR"]);
}

#[test]
fn cancel_edit_repaints_the_pre_edit_inputs() {
    let host = Host::new();
    seed_open(&host);
    let widget = widget(&host);
    widget.load().unwrap();
    let open = widget.store().all_presets().remove(0);
    widget.set_field_values(&raw(&[("priority", FieldValue::from("high"))]));
    let before = widget.store().page_data();

    let selected = Collected::<PresetSelected>::new();
    widget.on_preset_selected(selected.sink());
    widget.begin_edit(&open).unwrap();
    widget.cancel_edit().unwrap();

    assert_eq!(widget.store().page_data(), before);
    let events = selected.wait_for(2);
    assert!(events.contains(&PresetSelected::from(before)));
}

#[test]
fn rename_into_a_taken_name_conflicts() {
    let host = Host::new();
    seed_open(&host);
    host.seed("2", "closed", |c| {
        c.values.insert("status".into(), "closed".into());
    });
    let widget = widget(&host);
    widget.load().unwrap();
    let closed = widget.store().state().preset("2").cloned().unwrap();
    host.dialog.save_values_as("open");

    let err = widget.rename(&closed).unwrap_err();

    assert_eq!(
        err,
        WidgetError::Api(ApiError::Conflict {
            name: "open".into()
        })
    );
    assert_eq!(widget.store().state().preset("2"), Some(&closed));
    assert_eq!(host.notifier.errors(), vec!["SEARCH_CONFIG.RENAME.ERROR"]);
}
