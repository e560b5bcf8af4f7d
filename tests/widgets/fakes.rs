//! Scripted host collaborators.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use search_config_sync::api::{
    ApiError, CreateSearchConfigRequest, CreateSearchConfigResponse, GetSearchConfigResponse,
    SearchConfigApi, UpdateSearchConfigRequest, UpdateSearchConfigResponse,
};
use search_config_sync::widget::{Dialog, DialogContent, DialogOutput, DialogResult, Notifier};
use search_config_sync::{InMemorySearchConfigApi, SearchConfigInfo};

/// Answers dialogs from a queue; an empty queue dismisses.
#[derive(Clone, Default)]
pub struct ScriptedDialog {
    answers: Arc<Mutex<VecDeque<DialogResult>>>,
    opened: Arc<Mutex<Vec<DialogContent>>>,
}

impl ScriptedDialog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn answer(&self, result: DialogResult) {
        self.answers.lock().unwrap().push_back(result);
    }

    pub fn save_values_as(&self, name: &str) {
        self.answer(DialogResult::confirmed(DialogOutput {
            name: name.into(),
            save_input_values: true,
            save_columns: false,
        }));
    }

    pub fn save_columns_as(&self, name: &str) {
        self.answer(DialogResult::confirmed(DialogOutput {
            name: name.into(),
            save_input_values: false,
            save_columns: true,
        }));
    }

    pub fn confirm(&self) {
        self.answer(DialogResult::confirmed(DialogOutput::default()));
    }

    pub fn opened(&self) -> Vec<DialogContent> {
        self.opened.lock().unwrap().clone()
    }
}

impl Dialog for ScriptedDialog {
    fn open(&self, content: DialogContent) -> DialogResult {
        self.opened.lock().unwrap().push(content);
        self.answers
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(DialogResult::dismissed)
    }
}

#[derive(Clone, Default)]
pub struct RecordingNotifier {
    successes: Arc<Mutex<Vec<String>>>,
    errors: Arc<Mutex<Vec<String>>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn successes(&self) -> Vec<String> {
        self.successes.lock().unwrap().clone()
    }

    pub fn errors(&self) -> Vec<String> {
        self.errors.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn success(&self, key: &str) {
        self.successes.lock().unwrap().push(key.to_string());
    }

    fn error(&self, key: &str) {
        self.errors.lock().unwrap().push(key.to_string());
    }
}

/// Backend that stores presets but leaves the new id out of create
/// responses.
#[derive(Clone)]
pub struct UnlabelledApi(pub InMemorySearchConfigApi);

impl SearchConfigApi for UnlabelledApi {
    fn list(
        &self,
        app_id: &str,
        page: &str,
        product_name: &str,
    ) -> Result<Vec<SearchConfigInfo>, ApiError> {
        self.0.list(app_id, page, product_name)
    }

    fn create(
        &self,
        request: CreateSearchConfigRequest,
    ) -> Result<CreateSearchConfigResponse, ApiError> {
        let mut response = self.0.create(request)?;
        response.id.clear();
        Ok(response)
    }

    fn update(
        &self,
        id: &str,
        request: UpdateSearchConfigRequest,
    ) -> Result<UpdateSearchConfigResponse, ApiError> {
        self.0.update(id, request)
    }

    fn get(&self, id: &str) -> Result<GetSearchConfigResponse, ApiError> {
        self.0.get(id)
    }

    fn delete(&self, id: &str) -> Result<(), ApiError> {
        self.0.delete(id)
    }
}

/// Collects events delivered on emitter threads.
#[derive(Clone)]
pub struct Collected<T> {
    events: Arc<Mutex<Vec<T>>>,
}

impl<T: Clone + Send + 'static> Collected<T> {
    pub fn new() -> Self {
        Self {
            events: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn sink(&self) -> impl Fn(T) + Send + Sync + 'static {
        let events = Arc::clone(&self.events);
        move |event: T| events.lock().unwrap().push(event)
    }

    /// Wait until at least `count` events arrived.
    pub fn wait_for(&self, count: usize) -> Vec<T> {
        let deadline = Instant::now() + Duration::from_secs(2);
        loop {
            let events = self.events.lock().unwrap().clone();
            if events.len() >= count || Instant::now() >= deadline {
                return events;
            }
            thread::sleep(Duration::from_millis(5));
        }
    }

    /// Give emitter threads time to run and return what arrived.
    pub fn settle(&self) -> Vec<T> {
        thread::sleep(Duration::from_millis(100));
        self.events.lock().unwrap().clone()
    }
}
