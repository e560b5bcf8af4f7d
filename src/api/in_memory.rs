//! In-memory backend for tests and single-process hosts.

use std::sync::{Arc, Mutex, PoisonError, RwLock};

use super::{
    ApiError, CreateSearchConfigRequest, CreateSearchConfigResponse, GetSearchConfigResponse,
    SearchConfig, SearchConfigApi, UpdateSearchConfigRequest, UpdateSearchConfigResponse,
};
use crate::preset::SearchConfigInfo;

/// `SearchConfigApi` backed by a `Vec`.
///
/// Clone-friendly via `Arc`. Preset names are unique per
/// (app, product, page); creating or renaming into a taken name fails with
/// `ApiError::Conflict`. Readonly presets cannot be updated or deleted.
#[derive(Clone, Default)]
pub struct InMemorySearchConfigApi {
    storage: Arc<RwLock<Vec<SearchConfig>>>,
    fail_next: Arc<Mutex<Option<ApiError>>>,
}

impl InMemorySearchConfigApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a stored preset directly, bypassing validation.
    pub fn seed(&self, config: SearchConfig) {
        self.storage
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(config);
    }

    /// Make the next call fail with `error`.
    pub fn fail_next(&self, error: ApiError) {
        *self
            .fail_next
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(error);
    }

    pub fn len(&self) -> usize {
        self.storage
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn check_failure(&self) -> Result<(), ApiError> {
        match self
            .fail_next
            .lock()
            .map_err(|_| ApiError::Unavailable("lock poisoned".into()))?
            .take()
        {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, Vec<SearchConfig>>, ApiError> {
        self.storage
            .read()
            .map_err(|_| ApiError::Unavailable("lock poisoned".into()))
    }

    fn write(&self) -> Result<std::sync::RwLockWriteGuard<'_, Vec<SearchConfig>>, ApiError> {
        self.storage
            .write()
            .map_err(|_| ApiError::Unavailable("lock poisoned".into()))
    }
}

fn page_configs(storage: &[SearchConfig], scope: &SearchConfig) -> Vec<SearchConfigInfo> {
    storage
        .iter()
        .filter(|c| c.in_scope(&scope.app_id, &scope.product_name, &scope.page))
        .map(SearchConfig::info)
        .collect()
}

fn name_taken(storage: &[SearchConfig], scope: &SearchConfig, name: &str, except: &str) -> bool {
    storage.iter().any(|c| {
        c.id != except
            && c.name == name
            && c.in_scope(&scope.app_id, &scope.product_name, &scope.page)
    })
}

impl SearchConfigApi for InMemorySearchConfigApi {
    fn list(
        &self,
        app_id: &str,
        page: &str,
        product_name: &str,
    ) -> Result<Vec<SearchConfigInfo>, ApiError> {
        self.check_failure()?;
        let storage = self.read()?;
        Ok(storage
            .iter()
            .filter(|c| c.in_scope(app_id, product_name, page))
            .map(SearchConfig::info)
            .collect())
    }

    fn create(
        &self,
        request: CreateSearchConfigRequest,
    ) -> Result<CreateSearchConfigResponse, ApiError> {
        self.check_failure()?;
        let name = request.name.trim().to_string();
        if name.is_empty() {
            return Err(ApiError::Rejected("name must not be empty".into()));
        }

        let config = SearchConfig {
            id: uuid::Uuid::new_v4().to_string(),
            app_id: request.app_id,
            product_name: request.product_name,
            page: request.page,
            name,
            field_list_version: request.field_list_version,
            is_readonly: request.is_readonly,
            is_advanced: request.is_advanced,
            columns: request.columns,
            values: request.values,
        };

        let mut storage = self.write()?;
        if name_taken(&storage, &config, &config.name, "") {
            return Err(ApiError::Conflict { name: config.name });
        }
        let id = config.id.clone();
        storage.push(config.clone());

        Ok(CreateSearchConfigResponse {
            id,
            configs: page_configs(&storage, &config),
        })
    }

    fn update(
        &self,
        id: &str,
        request: UpdateSearchConfigRequest,
    ) -> Result<UpdateSearchConfigResponse, ApiError> {
        self.check_failure()?;
        let mut storage = self.write()?;
        let index = storage
            .iter()
            .position(|c| c.id == id)
            .ok_or_else(|| ApiError::NotFound(id.to_string()))?;

        if storage[index].is_readonly {
            return Err(ApiError::Rejected(format!("search config {} is readonly", id)));
        }
        let name = request.name.trim().to_string();
        if name.is_empty() {
            return Err(ApiError::Rejected("name must not be empty".into()));
        }
        if name_taken(&storage, &storage[index], &name, id) {
            return Err(ApiError::Conflict { name });
        }

        let config = &mut storage[index];
        config.name = name;
        config.field_list_version = request.field_list_version;
        config.is_readonly = request.is_readonly;
        config.is_advanced = request.is_advanced;
        config.columns = request.columns;
        config.values = request.values;
        let scope = config.clone();

        Ok(UpdateSearchConfigResponse {
            configs: page_configs(&storage, &scope),
        })
    }

    fn get(&self, id: &str) -> Result<GetSearchConfigResponse, ApiError> {
        self.check_failure()?;
        let storage = self.read()?;
        storage
            .iter()
            .find(|c| c.id == id)
            .cloned()
            .map(|config| GetSearchConfigResponse { config })
            .ok_or_else(|| ApiError::NotFound(id.to_string()))
    }

    fn delete(&self, id: &str) -> Result<(), ApiError> {
        self.check_failure()?;
        let mut storage = self.write()?;
        let index = storage
            .iter()
            .position(|c| c.id == id)
            .ok_or_else(|| ApiError::NotFound(id.to_string()))?;
        if storage[index].is_readonly {
            return Err(ApiError::Rejected(format!("search config {} is readonly", id)));
        }
        storage.remove(index);
        Ok(())
    }
}
