use search_config_sync::store::{CUSTOM_GROUP_KEY, DEFAULT_GROUP_KEY};

use crate::{config_3, group_store, open_tickets, topic};

#[test]
fn selecting_a_column_preset_by_key_and_diverging() {
    let topic = topic();
    let store = group_store(&topic);
    store.set_search_configs(vec![config_3()]);

    assert!(store.set_selected_group_key("config-3"));
    assert_eq!(store.current_preset(), Some(config_3()));
    assert_eq!(store.state().displayed_column_ids, vec!["col-3"]);

    assert!(store.update_displayed_columns_ids(vec!["other".into()]));
    assert_eq!(store.current_preset(), None);
    assert_eq!(store.selected_group_key(), CUSTOM_GROUP_KEY);
}

#[test]
fn deleting_the_active_column_preset_falls_back_to_custom() {
    let topic = topic();
    let store = group_store(&topic);
    store.set_search_configs(vec![config_3()]);
    store.set_selected_group_key("config-3");

    assert!(store.delete_search_config(&config_3()));

    assert_eq!(store.current_preset(), None);
    assert_eq!(store.selected_group_key(), CUSTOM_GROUP_KEY);
}

#[test]
fn deleting_an_inactive_preset_keeps_the_key() {
    let topic = topic();
    let store = group_store(&topic);
    store.set_group_keys(vec![DEFAULT_GROUP_KEY.into(), "basic".into()]);
    store.set_search_configs(vec![config_3()]);
    store.set_selected_group_key("basic");

    assert!(store.delete_search_config(&config_3()));

    assert_eq!(store.selected_group_key(), "basic");
}

#[test]
fn peers_follow_the_group_key() {
    let topic = topic();
    let a = group_store(&topic);
    let b = group_store(&topic);
    a.set_search_configs(vec![config_3()]);

    a.set_selected_group_key("config-3");

    assert_eq!(b.selected_group_key(), "config-3");
    assert_eq!(b.current_preset(), Some(config_3()));
    assert_eq!(b.state().displayed_column_ids, vec!["col-3"]);
}

#[test]
fn unknown_keys_fall_back_to_custom() {
    let topic = topic();
    let store = group_store(&topic);

    store.set_selected_group_key("no-such-group");

    assert_eq!(store.selected_group_key(), CUSTOM_GROUP_KEY);
}

#[test]
fn group_keys_list_predefined_then_column_presets() {
    let topic = topic();
    let store = group_store(&topic);
    store.set_group_keys(vec![DEFAULT_GROUP_KEY.into(), "basic".into()]);
    store.set_search_configs(vec![open_tickets(), config_3()]);

    assert_eq!(
        store.all_group_keys(),
        vec![DEFAULT_GROUP_KEY, "basic", "config-3"]
    );
}

#[test]
fn predefined_group_selection_is_one_step() {
    let topic = topic();
    let store = group_store(&topic);
    store.set_group_keys(vec![DEFAULT_GROUP_KEY.into(), "basic".into()]);
    let revision = store.revision();
    let published = topic.published_count();

    assert!(store.select_group("basic", vec!["a".into(), "b".into()]));

    assert_eq!(store.revision(), revision + 1);
    assert_eq!(topic.published_count(), published + 2);
    assert_eq!(store.selected_group_key(), "basic");
    assert_eq!(store.state().displayed_column_ids, vec!["a", "b"]);
}

#[test]
fn peers_follow_a_predefined_group_away_from_a_preset() {
    let topic = topic();
    let a = group_store(&topic);
    let b = group_store(&topic);
    for store in [&a, &b] {
        store.set_group_keys(vec![DEFAULT_GROUP_KEY.into(), "basic".into()]);
    }
    a.set_search_configs(vec![config_3()]);
    a.set_selected_group_key("config-3");
    assert_eq!(b.selected_group_key(), "config-3");

    assert!(a.select_group("basic", vec!["a".into(), "b".into()]));

    for store in [&a, &b] {
        let state = store.state();
        assert_eq!(state.selected_group_key, "basic");
        assert_eq!(state.current_preset, None);
        assert_eq!(state.displayed_column_ids, vec!["a", "b"]);
    }
}

#[test]
fn cancelled_edit_restores_the_group_key_on_peers() {
    let topic = topic();
    let a = group_store(&topic);
    let b = group_store(&topic);
    for store in [&a, &b] {
        store.set_group_keys(vec![DEFAULT_GROUP_KEY.into(), "basic".into()]);
    }
    a.set_search_configs(vec![config_3()]);
    a.select_group("basic", vec!["a".into()]);

    a.enter_edit_mode(&config_3());
    assert_eq!(b.selected_group_key(), "config-3");
    assert!(a.cancel_edit());

    assert_eq!(a.selected_group_key(), "basic");
    assert_eq!(b.selected_group_key(), "basic");
    assert_eq!(b.state().displayed_column_ids, vec!["a"]);
}
