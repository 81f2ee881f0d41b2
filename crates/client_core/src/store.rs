use std::{collections::HashMap, sync::Arc};

use shared::domain::{Template, TemplateId};
use tokio::sync::RwLock;

/// Item cache shared between the list views. Cloning hands out another
/// handle to the same cache.
#[derive(Debug, Clone, Default)]
pub struct ItemStore {
    items: Arc<RwLock<HashMap<TemplateId, Template>>>,
}

impl ItemStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, item: Template) {
        self.items.write().await.insert(item.id, item);
    }

    pub async fn extend(&self, items: impl IntoIterator<Item = Template>) {
        let mut guard = self.items.write().await;
        for item in items {
            guard.insert(item.id, item);
        }
    }

    pub async fn get(&self, id: TemplateId) -> Option<Template> {
        self.items.read().await.get(&id).cloned()
    }

    pub async fn contains(&self, id: TemplateId) -> bool {
        self.items.read().await.contains_key(&id)
    }

    pub async fn len(&self) -> usize {
        self.items.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.items.read().await.is_empty()
    }

    pub async fn clear(&self) {
        self.items.write().await.clear();
    }
}
