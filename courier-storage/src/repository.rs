//! Entity repositories over the local store.

use std::collections::HashMap;
use std::marker::PhantomData;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use courier_core::{CourierResult, StorageError, Todo};
use serde::de::DeserializeOwned;
use serde::Serialize;
use uuid::Uuid;

use crate::store::{LocalStore, LocalStoreExt};

/// An entity that can live in a repository.
///
/// Implementations must return a consistent id for the lifetime of the
/// entity; a nil id means "not yet persisted" and is replaced on add.
pub trait StoredEntity: Clone + Serialize + DeserializeOwned + Send + Sync + 'static {
    fn entity_id(&self) -> Uuid;
    fn assign_entity_id(&mut self, id: Uuid);
}

impl StoredEntity for Todo {
    fn entity_id(&self) -> Uuid {
        self.id
    }

    fn assign_entity_id(&mut self, id: Uuid) {
        self.id = id;
    }
}

/// Data access operations for one entity type.
///
/// Handlers depend on this trait, never on a concrete backend.
#[async_trait]
pub trait Repository<T: StoredEntity>: Send + Sync {
    async fn list(&self) -> CourierResult<Vec<T>>;
    async fn get(&self, id: Uuid) -> CourierResult<Option<T>>;
    async fn add(&self, entity: T) -> CourierResult<T>;
    /// Replace the stored entity with the same id. No-op when absent.
    async fn update(&self, entity: T) -> CourierResult<T>;
    /// Returns whether anything was removed.
    async fn delete(&self, id: Uuid) -> CourierResult<bool>;
}

/// Repository persisting its entities as one flat list under a store key.
///
/// Every operation is a load-modify-save over the whole list; lookups are
/// linear scans. That matches the small collections this store is for.
pub struct StoreRepository<T> {
    store: Arc<dyn LocalStore>,
    storage_key: String,
    _marker: PhantomData<fn() -> T>,
}

impl<T: StoredEntity> StoreRepository<T> {
    pub fn new(store: Arc<dyn LocalStore>, storage_key: impl Into<String>) -> Self {
        Self {
            store,
            storage_key: storage_key.into(),
            _marker: PhantomData,
        }
    }

    async fn load_items(&self) -> CourierResult<Vec<T>> {
        Ok(self
            .store
            .load_as::<Vec<T>>(&self.storage_key)
            .await?
            .unwrap_or_default())
    }

    async fn save_items(&self, items: &Vec<T>) -> CourierResult<()> {
        self.store.save_as(&self.storage_key, items).await
    }
}

#[async_trait]
impl<T: StoredEntity> Repository<T> for StoreRepository<T> {
    async fn list(&self) -> CourierResult<Vec<T>> {
        self.load_items().await
    }

    async fn get(&self, id: Uuid) -> CourierResult<Option<T>> {
        Ok(self
            .load_items()
            .await?
            .into_iter()
            .find(|item| item.entity_id() == id))
    }

    async fn add(&self, mut entity: T) -> CourierResult<T> {
        if entity.entity_id().is_nil() {
            entity.assign_entity_id(Uuid::now_v7());
        }
        let mut items = self.load_items().await?;
        items.push(entity.clone());
        self.save_items(&items).await?;
        Ok(entity)
    }

    async fn update(&self, entity: T) -> CourierResult<T> {
        let mut items = self.load_items().await?;
        if let Some(slot) = items
            .iter_mut()
            .find(|item| item.entity_id() == entity.entity_id())
        {
            *slot = entity.clone();
            self.save_items(&items).await?;
        }
        Ok(entity)
    }

    async fn delete(&self, id: Uuid) -> CourierResult<bool> {
        let mut items = self.load_items().await?;
        let before = items.len();
        items.retain(|item| item.entity_id() != id);
        let removed = items.len() != before;
        if removed {
            self.save_items(&items).await?;
        }
        Ok(removed)
    }
}

/// Session-only repository. Data is gone when the process exits.
pub struct MemoryRepository<T> {
    items: RwLock<HashMap<Uuid, T>>,
}

impl<T: StoredEntity> MemoryRepository<T> {
    pub fn new() -> Self {
        Self {
            items: RwLock::new(HashMap::new()),
        }
    }
}

impl<T: StoredEntity> Default for MemoryRepository<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<T: StoredEntity> Repository<T> for MemoryRepository<T> {
    async fn list(&self) -> CourierResult<Vec<T>> {
        Ok(self
            .items
            .read()
            .map_err(|_| StorageError::LockPoisoned)?
            .values()
            .cloned()
            .collect())
    }

    async fn get(&self, id: Uuid) -> CourierResult<Option<T>> {
        Ok(self
            .items
            .read()
            .map_err(|_| StorageError::LockPoisoned)?
            .get(&id)
            .cloned())
    }

    async fn add(&self, mut entity: T) -> CourierResult<T> {
        if entity.entity_id().is_nil() {
            entity.assign_entity_id(Uuid::now_v7());
        }
        self.items
            .write()
            .map_err(|_| StorageError::LockPoisoned)?
            .insert(entity.entity_id(), entity.clone());
        Ok(entity)
    }

    async fn update(&self, entity: T) -> CourierResult<T> {
        let mut items = self.items.write().map_err(|_| StorageError::LockPoisoned)?;
        if items.contains_key(&entity.entity_id()) {
            items.insert(entity.entity_id(), entity.clone());
        }
        Ok(entity)
    }

    async fn delete(&self, id: Uuid) -> CourierResult<bool> {
        Ok(self
            .items
            .write()
            .map_err(|_| StorageError::LockPoisoned)?
            .remove(&id)
            .is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use courier_core::Priority;

    fn repository() -> StoreRepository<Todo> {
        StoreRepository::new(Arc::new(MemoryStore::new()), "todos")
    }

    #[tokio::test]
    async fn add_assigns_id_when_nil() {
        let repo = repository();
        let mut todo = Todo::new("title", "", Priority::Medium);
        todo.id = Uuid::nil();
        let added = repo.add(todo).await.unwrap();
        assert!(!added.id.is_nil());
        assert_eq!(repo.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn get_finds_by_id() {
        let repo = repository();
        let todo = repo
            .add(Todo::new("title", "", Priority::Medium))
            .await
            .unwrap();
        let found = repo.get(todo.id).await.unwrap();
        assert_eq!(found, Some(todo));
        assert_eq!(repo.get(Uuid::now_v7()).await.unwrap(), None);
    }

    #[tokio::test]
    async fn update_replaces_matching_entity() {
        let repo = repository();
        let mut todo = repo
            .add(Todo::new("before", "", Priority::Medium))
            .await
            .unwrap();
        todo.title = "after".to_string();
        repo.update(todo.clone()).await.unwrap();
        assert_eq!(repo.get(todo.id).await.unwrap().unwrap().title, "after");
    }

    #[tokio::test]
    async fn update_of_unknown_id_is_a_noop() {
        let repo = repository();
        repo.update(Todo::new("ghost", "", Priority::Medium))
            .await
            .unwrap();
        assert!(repo.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn delete_reports_whether_anything_was_removed() {
        let repo = repository();
        let todo = repo
            .add(Todo::new("title", "", Priority::Medium))
            .await
            .unwrap();
        assert!(repo.delete(todo.id).await.unwrap());
        assert!(!repo.delete(todo.id).await.unwrap());
    }

    #[tokio::test]
    async fn memory_repository_round_trips() {
        let repo = MemoryRepository::<Todo>::new();
        let todo = repo
            .add(Todo::new("title", "", Priority::High))
            .await
            .unwrap();
        assert_eq!(repo.get(todo.id).await.unwrap(), Some(todo.clone()));
        assert!(repo.delete(todo.id).await.unwrap());
        assert!(repo.list().await.unwrap().is_empty());
    }
}
