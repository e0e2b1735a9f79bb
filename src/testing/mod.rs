use std::collections::VecDeque;
use std::str::FromStr;
use std::sync::Mutex;

use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::api::CatalogApi;
use crate::error::{ClientError, ClientResult};
use crate::types::{Watch, WatchId, WatchInput, WatchUpdate};

/// Build a catalog item with plausible defaults
pub fn sample_watch(id: WatchId, brand: &str, name: &str) -> Watch {
    Watch {
        id,
        name: name.to_string(),
        brand: brand.to_string(),
        description: format!("The {} {} in steel", brand, name),
        price: Decimal::from_str("9950.00").unwrap(),
        image_url: format!("https://images.example.com/{}.jpg", id),
        stock: 2,
        created_at: None,
    }
}

#[derive(Default)]
struct FakeState {
    watches: Vec<Watch>,
    next_id: WatchId,
    failures: VecDeque<(u16, String)>,
    list_calls: usize,
    mutation_calls: usize,
}

/// In-memory stand-in for the catalog API.
///
/// Queued failures are returned, in order, by the next calls of any kind.
pub struct FakeCatalog {
    state: Mutex<FakeState>,
}

impl FakeCatalog {
    pub fn new(watches: Vec<Watch>) -> Self {
        let next_id = watches.iter().map(|w| w.id).max().unwrap_or(0) + 1;
        Self {
            state: Mutex::new(FakeState {
                watches,
                next_id,
                ..Default::default()
            }),
        }
    }

    pub fn fail_next(&self, status: u16, body: &str) {
        self.lock().failures.push_back((status, body.to_string()));
    }

    pub fn list_calls(&self) -> usize {
        self.lock().list_calls
    }

    pub fn mutation_calls(&self) -> usize {
        self.lock().mutation_calls
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, FakeState> {
        self.state.lock().unwrap()
    }
}

impl FakeState {
    fn take_failure(&mut self) -> ClientResult<()> {
        match self.failures.pop_front() {
            Some((status, body)) => Err(ClientError::remote(status, body)),
            None => Ok(()),
        }
    }

    fn not_found() -> ClientError {
        ClientError::remote(404, r#"{"detail":"Watch not found"}"#)
    }
}

#[async_trait]
impl CatalogApi for FakeCatalog {
    async fn list_watches(&self) -> ClientResult<Vec<Watch>> {
        let mut state = self.lock();
        state.list_calls += 1;
        state.take_failure()?;
        Ok(state.watches.clone())
    }

    async fn get_watch(&self, id: WatchId) -> ClientResult<Watch> {
        let mut state = self.lock();
        state.take_failure()?;
        state
            .watches
            .iter()
            .find(|w| w.id == id)
            .cloned()
            .ok_or_else(FakeState::not_found)
    }

    async fn create_watch(&self, input: &WatchInput) -> ClientResult<Watch> {
        let mut state = self.lock();
        state.mutation_calls += 1;
        state.take_failure()?;

        let watch = Watch {
            id: state.next_id,
            name: input.name.clone(),
            brand: input.brand.clone(),
            description: input.description.clone(),
            price: input.price,
            image_url: input.image_url.clone(),
            stock: input.stock,
            created_at: Some(chrono::Utc::now()),
        };
        state.next_id += 1;
        state.watches.push(watch.clone());
        Ok(watch)
    }

    async fn update_watch(&self, id: WatchId, update: &WatchUpdate) -> ClientResult<Watch> {
        let mut state = self.lock();
        state.mutation_calls += 1;
        state.take_failure()?;

        let watch = state
            .watches
            .iter_mut()
            .find(|w| w.id == id)
            .ok_or_else(FakeState::not_found)?;
        if let Some(name) = &update.name {
            watch.name = name.clone();
        }
        if let Some(brand) = &update.brand {
            watch.brand = brand.clone();
        }
        if let Some(description) = &update.description {
            watch.description = description.clone();
        }
        if let Some(price) = update.price {
            watch.price = price;
        }
        if let Some(image_url) = &update.image_url {
            watch.image_url = image_url.clone();
        }
        if let Some(stock) = update.stock {
            watch.stock = stock;
        }
        Ok(watch.clone())
    }

    async fn delete_watch(&self, id: WatchId) -> ClientResult<()> {
        let mut state = self.lock();
        state.mutation_calls += 1;
        state.take_failure()?;

        let before = state.watches.len();
        state.watches.retain(|w| w.id != id);
        if state.watches.len() == before {
            return Err(FakeState::not_found());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn queued_failures_apply_in_order() {
        let fake = FakeCatalog::new(vec![sample_watch(1, "Rolex", "Daytona")]);
        fake.fail_next(503, "");
        assert!(fake.list_watches().await.is_err());
        assert_eq!(fake.list_watches().await.unwrap().len(), 1);
        assert_eq!(fake.list_calls(), 2);
    }

    #[tokio::test]
    async fn unknown_id_is_not_found() {
        let fake = FakeCatalog::new(vec![]);
        assert!(fake.get_watch(99).await.unwrap_err().is_not_found());
        assert!(fake.delete_watch(99).await.unwrap_err().is_not_found());
    }
}
