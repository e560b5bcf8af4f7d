//! Stores sharing one page topic.
//!
//! Every test builds its own topic, so suites never observe each other's
//! traffic.

mod groups;

use search_config_sync::store::{GroupConfig, SearchConfigStore, StoreConfig};
use search_config_sync::topic::{InMemoryTopic, TopicMessage};
use search_config_sync::SearchConfigInfo;

pub const PAGE: &str = "tickets";

pub fn topic() -> InMemoryTopic<TopicMessage> {
    InMemoryTopic::new()
}

pub fn store(topic: &InMemoryTopic<TopicMessage>) -> SearchConfigStore {
    SearchConfigStore::new(StoreConfig::new(PAGE), topic.shared())
}

pub fn group_store(topic: &InMemoryTopic<TopicMessage>) -> SearchConfigStore {
    SearchConfigStore::new(
        StoreConfig::new(PAGE).with_groups(GroupConfig::default()),
        topic.shared(),
    )
}

pub fn open_tickets() -> SearchConfigInfo {
    SearchConfigInfo::new("1", "open").with_value("status", "open")
}

pub fn mine() -> SearchConfigInfo {
    SearchConfigInfo::new("2", "mine")
        .with_value("assignee", "me")
        .with_value("status", "open")
        .advanced()
}

pub fn config_3() -> SearchConfigInfo {
    SearchConfigInfo::new("3", "config-3").with_columns(["col-3"])
}
