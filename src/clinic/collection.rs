//! In-memory record collections with optional write-through to the local store.
//!
//! Every dashboard list (appointments, doctors, patients, invoices) is a
//! `Collection`. Mutations are staged on a copy and hold the collection lock
//! across the store write. Memory changes only once the write succeeds, so a
//! failed write leaves both the store and the in-memory list untouched.

use serde::{de::DeserializeOwned, Serialize};
use std::fmt::Display;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::models::next_numeric_id;
use crate::storage::{LocalStore, StoreError};

pub trait Record: Clone + Serialize + DeserializeOwned + Send + Sync + 'static {
    type Id: Clone + PartialEq + Display + Send + Sync;

    /// Resource name used in errors and logs
    const KIND: &'static str;

    fn id(&self) -> &Self::Id;
}

#[derive(Debug)]
struct Backing {
    store: LocalStore,
    key: &'static str,
}

#[derive(Debug)]
pub struct Collection<T: Record> {
    items: RwLock<Vec<T>>,
    backing: Option<Backing>,
}

impl<T: Record> Collection<T> {
    /// Collection that lives only in memory.
    pub fn in_memory(seed: Vec<T>) -> Self {
        Self {
            items: RwLock::new(seed),
            backing: None,
        }
    }

    /// Collection persisted as a JSON array under `key`.
    ///
    /// An absent key starts from `seed` (and writes it); a malformed value
    /// starts empty.
    pub async fn persisted(store: LocalStore, key: &'static str, seed: Vec<T>) -> Result<Self, StoreError> {
        let items = match store.get_item(key).await? {
            None => {
                store.write_json(key, &seed).await?;
                seed
            }
            Some(_) => store.read_json::<Vec<T>>(key).await?.unwrap_or_default(),
        };

        info!(kind = T::KIND, key = key, count = items.len(), "Loaded collection from local store");

        Ok(Self {
            items: RwLock::new(items),
            backing: Some(Backing { store, key }),
        })
    }

    pub async fn list(&self) -> Vec<T> {
        self.items.read().await.clone()
    }

    pub async fn filter(&self, predicate: impl Fn(&T) -> bool) -> Vec<T> {
        self.items
            .read()
            .await
            .iter()
            .filter(|item| predicate(item))
            .cloned()
            .collect()
    }

    pub async fn get(&self, id: &T::Id) -> Option<T> {
        self.items.read().await.iter().find(|item| item.id() == id).cloned()
    }

    pub async fn len(&self) -> usize {
        self.items.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.items.read().await.is_empty()
    }

    /// Append a record whose id must not already be present.
    pub async fn insert(&self, item: T) -> Result<T, StoreError> {
        let mut items = self.items.write().await;
        if items.iter().any(|existing| existing.id() == item.id()) {
            return Err(StoreError::Duplicate {
                kind: T::KIND,
                id: item.id().to_string(),
            });
        }

        let mut next = items.clone();
        next.push(item.clone());
        self.commit(&mut items, next).await?;
        debug!(kind = T::KIND, id = %item.id(), "Record created");
        Ok(item)
    }

    /// Apply `edit` to the record with `id`. The record keeps its id whatever
    /// the closure does.
    pub async fn update(&self, id: &T::Id, edit: impl FnOnce(&mut T)) -> Result<T, StoreError> {
        self.try_update(id, |item| {
            edit(item);
            Ok(())
        })
        .await
    }

    /// Like [`Collection::update`], but the edit may reject the change. A
    /// rejected edit leaves the collection untouched.
    pub async fn try_update<E>(&self, id: &T::Id, edit: impl FnOnce(&mut T) -> Result<(), E>) -> Result<T, E>
    where
        E: From<StoreError>,
    {
        let mut items = self.items.write().await;
        let index = items
            .iter()
            .position(|item| item.id() == id)
            .ok_or_else(|| StoreError::not_found(T::KIND, id))?;

        let mut updated = items[index].clone();
        edit(&mut updated)?;
        if updated.id() != id {
            // ids are immutable; discard the edit
            return Err(StoreError::Duplicate {
                kind: T::KIND,
                id: updated.id().to_string(),
            }
            .into());
        }

        let mut next = items.clone();
        next[index] = updated.clone();
        self.commit(&mut items, next).await?;
        debug!(kind = T::KIND, id = %id, "Record updated");
        Ok(updated)
    }

    pub async fn remove(&self, id: &T::Id) -> Result<T, StoreError> {
        let mut items = self.items.write().await;
        let index = items
            .iter()
            .position(|item| item.id() == id)
            .ok_or_else(|| StoreError::not_found(T::KIND, id))?;

        let mut next = items.clone();
        let removed = next.remove(index);
        self.commit(&mut items, next).await?;
        debug!(kind = T::KIND, id = %id, "Record deleted");
        Ok(removed)
    }

    /// Persist `next`, then make it the in-memory list.
    async fn commit(&self, items: &mut Vec<T>, next: Vec<T>) -> Result<(), StoreError> {
        if let Some(ref backing) = self.backing {
            backing.store.write_json(backing.key, &next).await?;
        }
        *items = next;
        Ok(())
    }
}

impl<T: Record<Id = i64>> Collection<T> {
    /// Insert a record built around the next free numeric id.
    pub async fn insert_with_next_id(&self, build: impl FnOnce(i64) -> T) -> Result<T, StoreError> {
        let mut items = self.items.write().await;
        let id = next_numeric_id(items.iter().map(|item| *item.id()));
        let item = build(id);

        let mut next = items.clone();
        next.push(item.clone());
        self.commit(&mut items, next).await?;
        debug!(kind = T::KIND, id = id, "Record created");
        Ok(item)
    }
}
