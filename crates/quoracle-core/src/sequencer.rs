//! Serialized async access to an oracle.
//!
//! The monotonicity check only holds if no two mutations interleave. An
//! [`OracleHandle`] funnels every call through one async mutex, so at most
//! one operation is in flight at any time, and publishes the notifications of
//! each committed operation on an [`EventBus`] before releasing the lock.

use std::sync::Arc;

use tokio::sync::{broadcast, Mutex};

use quoracle_types::{Address, OracleEvent, PriceCacheEntry, PriceResponse, PriceWithProof};

use crate::cache::PriceStore;
use crate::events::EventBus;
use crate::oracle::PriceOracle;
use crate::Result;

/// Cloneable, serialized handle to a shared [`PriceOracle`].
pub struct OracleHandle<S> {
    inner: Arc<Mutex<PriceOracle<S>>>,
    bus: EventBus,
}

impl<S> Clone for OracleHandle<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            bus: self.bus.clone(),
        }
    }
}

impl<S: PriceStore> OracleHandle<S> {
    pub fn new(oracle: PriceOracle<S>, bus: EventBus) -> Self {
        Self {
            inner: Arc::new(Mutex::new(oracle)),
            bus,
        }
    }

    /// Subscribe to committed notifications.
    pub fn subscribe(&self) -> broadcast::Receiver<OracleEvent> {
        self.bus.subscribe()
    }

    pub fn event_bus(&self) -> &EventBus {
        &self.bus
    }

    pub async fn update_price(
        &self,
        base: Address,
        quote: Address,
        update: &PriceWithProof,
        now_ms: u64,
    ) -> Result<PriceCacheEntry> {
        self.mutate(|o| o.update_price(base, quote, update, now_ms))
            .await
    }

    pub async fn initialize(&self, caller: Address) -> Result<()> {
        self.mutate(|o| o.initialize(caller)).await
    }

    pub async fn transfer_ownership(&self, caller: Address, new_owner: Address) -> Result<()> {
        self.mutate(|o| o.transfer_ownership(caller, new_owner))
            .await
    }

    pub async fn get_price(&self, base: Address, quote: Address, now_ms: u64) -> Result<PriceResponse> {
        self.inner.lock().await.get_price(base, quote, now_ms)
    }

    pub async fn price_in_bound(
        &self,
        base: Address,
        quote: Address,
        price: u128,
        now_ms: u64,
    ) -> Result<bool> {
        self.inner
            .lock()
            .await
            .price_in_bound(base, quote, price, now_ms)
    }

    /// Run `f` with exclusive access to the oracle, for reads not covered above.
    pub async fn with_oracle<T>(&self, f: impl FnOnce(&PriceOracle<S>) -> T) -> T {
        f(&*self.inner.lock().await)
    }

    async fn mutate<T>(&self, f: impl FnOnce(&mut PriceOracle<S>) -> Result<T>) -> Result<T> {
        let mut oracle = self.inner.lock().await;
        let result = f(&mut oracle);
        for event in oracle.drain_events() {
            self.bus.emit(event);
        }
        result
    }
}
