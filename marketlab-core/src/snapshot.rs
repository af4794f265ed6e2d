//! SnapshotStore — publishes datasets by swapping a single pointer.
//!
//! Readers take an `Arc<MarketDataset>` and keep it for as long as they like;
//! `regenerate` builds the next generation off to the side and swaps it in.
//! A reader therefore sees either the old snapshot or the new one, never a mix.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use arc_swap::ArcSwap;
use tracing::{debug, info};

use crate::config::GeneratorConfig;
use crate::dataset::{DatasetBuilder, MarketDataset};
use crate::error::MarketError;
use crate::query::QueryService;
use crate::universe::Universe;

pub struct SnapshotStore {
    builder: DatasetBuilder,
    universe: Universe,
    current: ArcSwap<MarketDataset>,
    next_generation: AtomicU64,
}

impl SnapshotStore {
    /// Build generation 0 and publish it.
    pub fn new(builder: DatasetBuilder, universe: Universe) -> Result<Self, MarketError> {
        let initial = builder.build_universe(0, &universe)?;
        Ok(Self {
            builder,
            universe,
            current: ArcSwap::from_pointee(initial),
            next_generation: AtomicU64::new(1),
        })
    }

    pub fn from_config(config: &GeneratorConfig) -> Result<Self, MarketError> {
        Self::new(DatasetBuilder::from_config(config), config.universe.clone())
    }

    pub fn current(&self) -> Arc<MarketDataset> {
        self.current.load_full()
    }

    /// A query service bound to the snapshot published right now.
    pub fn query(&self) -> QueryService {
        QueryService::new(self.current())
    }

    pub fn universe(&self) -> &Universe {
        &self.universe
    }

    /// Build the next generation and publish it.
    ///
    /// On failure the previous snapshot stays published. Concurrent calls may
    /// finish out of order; the published generation never moves backwards, so
    /// a build overtaken by a newer one is returned but not published.
    pub fn regenerate(&self) -> Result<Arc<MarketDataset>, MarketError> {
        let generation = self.next_generation.fetch_add(1, Ordering::SeqCst);
        let fresh = Arc::new(self.builder.build_universe(generation, &self.universe)?);
        let previous = self.current.rcu(|current| {
            if current.generation > generation {
                Arc::clone(current)
            } else {
                Arc::clone(&fresh)
            }
        });
        if previous.generation > generation {
            debug!(generation, published = previous.generation, "snapshot superseded");
        } else {
            info!(generation, "snapshot published");
        }
        Ok(fresh)
    }
}
