//! Poll runner
//!
//! Drives every entity on its own cadence and keeps a status board with the
//! latest state of each. Entities only ever talk to their handler, so the
//! runner's tick rate has no bearing on how often the gateway is contacted.

use crate::config::MAX_SCAN_INTERVAL_SECS;
use crate::entity::{Entity, EntityState, HvacMode, Platform, ThermostatCommander};
use crate::error::{BridgeError, Result};
use crate::logging::{StructuredLogger, get_logger};
use crate::platform::PlatformSetup;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{RwLock, watch};
use tokio::time::{MissedTickBehavior, interval};

/// Latest known state of one entity
#[derive(Debug, Clone, PartialEq)]
pub struct EntityStatus {
    pub unique_id: String,
    pub name: String,
    pub platform: Platform,
    pub state: EntityState,
    /// When `state` last changed value
    pub changed_at: DateTime<Utc>,
}

/// Shared map of unique id to status
pub type StatusBoard = Arc<RwLock<BTreeMap<String, EntityStatus>>>;

pub struct Bridge {
    entities: Vec<Box<dyn Entity>>,
    commanders: BTreeMap<String, ThermostatCommander>,
    board: StatusBoard,
    logger: StructuredLogger,
}

impl Bridge {
    pub fn new(setup: PlatformSetup) -> Self {
        let now = Utc::now();
        let board = setup
            .entities
            .iter()
            .map(|e| {
                (
                    e.unique_id().to_string(),
                    EntityStatus {
                        unique_id: e.unique_id().to_string(),
                        name: e.name().to_string(),
                        platform: e.platform(),
                        state: EntityState::Unknown,
                        changed_at: now,
                    },
                )
            })
            .collect();
        Self {
            entities: setup.entities,
            commanders: setup.commanders,
            board: Arc::new(RwLock::new(board)),
            logger: get_logger("bridge"),
        }
    }

    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Handle on the status board, e.g. for a front end
    pub fn board(&self) -> StatusBoard {
        self.board.clone()
    }

    /// Update every entity once, in order
    pub async fn poll_once(&mut self) {
        for entity in self.entities.iter_mut() {
            entity.update().await;
            record(&self.board, entity.as_ref(), &self.logger).await;
        }
    }

    /// `(unique_id, state)` of every entity, sorted by id
    pub async fn states(&self) -> Vec<(String, EntityState)> {
        self.board
            .read()
            .await
            .values()
            .map(|s| (s.unique_id.clone(), s.state.clone()))
            .collect()
    }

    pub async fn status(&self, unique_id: &str) -> Option<EntityStatus> {
        self.board.read().await.get(unique_id).cloned()
    }

    /// Send a target temperature to the climate entity `unique_id`.
    /// `Ok(false)` means the gateway command failed.
    pub async fn set_temperature(&self, unique_id: &str, temperature: Option<f64>) -> Result<bool> {
        Ok(self
            .commander(unique_id)?
            .set_temperature(temperature)
            .await)
    }

    pub async fn set_hvac_mode(&self, unique_id: &str, mode: HvacMode) -> Result<bool> {
        Ok(self.commander(unique_id)?.set_hvac_mode(mode).await)
    }

    fn commander(&self, unique_id: &str) -> Result<&ThermostatCommander> {
        self.commanders
            .get(unique_id)
            .ok_or_else(|| BridgeError::not_found(unique_id))
    }

    /// Poll every entity on its own interval until `shutdown` turns true (or
    /// its sender is dropped). The entities are handed back afterwards, so
    /// `run` may be called again.
    pub async fn run(&mut self, shutdown: watch::Receiver<bool>) -> Result<()> {
        self.logger.info(&format!(
            "Starting poll loop for {} entities",
            self.entities.len()
        ));

        let tasks: Vec<_> = std::mem::take(&mut self.entities)
            .into_iter()
            .map(|entity| {
                tokio::spawn(poll_entity(
                    entity,
                    self.board.clone(),
                    shutdown.clone(),
                    self.logger.clone(),
                ))
            })
            .collect();

        for task in tasks {
            match task.await {
                Ok(entity) => self.entities.push(entity),
                Err(e) => self.logger.error(&format!("Entity task failed: {}", e)),
            }
        }

        self.logger.info("Poll loop stopped");
        Ok(())
    }
}

async fn poll_entity(
    mut entity: Box<dyn Entity>,
    board: StatusBoard,
    mut shutdown: watch::Receiver<bool>,
    logger: StructuredLogger,
) -> Box<dyn Entity> {
    // interval() panics on zero and on instants past the clock's range
    let period = entity
        .poll_interval()
        .clamp(Duration::from_millis(1), Duration::from_secs(MAX_SCAN_INTERVAL_SECS));
    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    while !*shutdown.borrow() {
        tokio::select! {
            _ = ticker.tick() => {
                entity.update().await;
                record(&board, entity.as_ref(), &logger).await;
            }
            changed = shutdown.changed() => {
                if changed.is_err() {
                    break;
                }
            }
        }
    }
    entity
}

async fn record(board: &StatusBoard, entity: &dyn Entity, logger: &StructuredLogger) {
    let state = entity.state();
    let mut board = board.write().await;
    let status = board
        .entry(entity.unique_id().to_string())
        .or_insert_with(|| EntityStatus {
            unique_id: entity.unique_id().to_string(),
            name: entity.name().to_string(),
            platform: entity.platform(),
            state: EntityState::Unknown,
            changed_at: Utc::now(),
        });
    if status.state != state {
        logger.info(&format!("{}: {} -> {}", status.name, status.state, state));
        status.state = state;
        status.changed_at = Utc::now();
    }
}
