//! In-memory, insertion-ordered goal store.

use std::sync::Arc;

use serde_json::Value;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use super::types::Goal;
use super::validation::validate_goal;
use crate::error::GoalError;

/// Process-lifetime goal collection.
///
/// Cloning shares the same underlying list; construct a new store for
/// isolated state.
#[derive(Debug, Clone, Default)]
pub struct GoalStore {
    goals: Arc<RwLock<Vec<Goal>>>,
}

impl GoalStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// All goals in insertion order.
    pub async fn list(&self) -> Vec<Goal> {
        self.goals.read().await.clone()
    }

    /// Number of stored goals.
    pub async fn len(&self) -> usize {
        self.goals.read().await.len()
    }

    /// Whether the store is empty.
    pub async fn is_empty(&self) -> bool {
        self.goals.read().await.is_empty()
    }

    /// Whether a goal with `id` exists.
    pub async fn contains(&self, id: &str) -> bool {
        position(&self.goals.read().await, id).is_some()
    }

    /// Validate a payload and append it under a fresh id.
    pub async fn create(&self, payload: &Value) -> Result<Goal, GoalError> {
        let fields = validate_goal(payload)?;
        let goal = Goal::from_fields(Uuid::new_v4().to_string(), fields);

        self.goals.write().await.push(goal.clone());
        debug!(id = %goal.id, "goal created");
        Ok(goal)
    }

    /// Fully replace the goal with `id`, keeping its id and position.
    ///
    /// The id is looked up before the payload is validated, so an unknown id
    /// yields `NotFound` even for an invalid payload.
    pub async fn replace(&self, id: &str, payload: &Value) -> Result<Goal, GoalError> {
        let mut goals = self.goals.write().await;
        let index = position(&goals, id).ok_or(GoalError::NotFound)?;

        let fields = validate_goal(payload)?;
        let goal = Goal::from_fields(id, fields);
        goals[index] = goal.clone();

        debug!(id, index, "goal replaced");
        Ok(goal)
    }

    /// Remove the goal with `id`, preserving the order of the rest.
    pub async fn remove(&self, id: &str) -> Result<Goal, GoalError> {
        let mut goals = self.goals.write().await;
        let index = position(&goals, id).ok_or(GoalError::NotFound)?;

        let goal = goals.remove(index);
        debug!(id, index, "goal removed");
        Ok(goal)
    }
}

fn position(goals: &[Goal], id: &str) -> Option<usize> {
    goals.iter().position(|goal| goal.id == id)
}
