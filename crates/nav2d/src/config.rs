//! Configuration for a navigation mesh instance

use nav2d_common::{Accuracy, Error, Rect, Result, Vec2};

/// Configuration parameters for a [`crate::Nav2d`] instance
#[derive(Debug, Clone, Copy)]
pub struct Nav2dConfig {
    /// Minimum corner of the authored world rectangle
    pub world_min: Vec2,
    /// Maximum corner of the authored world rectangle
    pub world_max: Vec2,
    /// Effective size of the mover; every authored polygon is inflated by it
    pub agent_radius: f32,
    /// Scaling factor of the integer coordinate domain
    pub accuracy: Accuracy,
}

impl Nav2dConfig {
    /// Creates a configuration with the default agent radius and accuracy
    pub fn new(world_min: Vec2, world_max: Vec2) -> Self {
        Self {
            world_min,
            world_max,
            agent_radius: 0.5,
            accuracy: Accuracy::Hundred,
        }
    }

    pub fn with_agent_radius(mut self, agent_radius: f32) -> Self {
        self.agent_radius = agent_radius;
        self
    }

    pub fn with_accuracy(mut self, accuracy: Accuracy) -> Self {
        self.accuracy = accuracy;
        self
    }

    pub fn with_world_bounds(mut self, world_min: Vec2, world_max: Vec2) -> Self {
        self.world_min = world_min;
        self.world_max = world_max;
        self
    }

    /// The authored world rectangle
    pub fn world_rect(&self) -> Rect {
        Rect::from_corners(self.world_min, self.world_max)
    }

    /// Validates the configuration parameters
    pub fn validate(&self) -> Result<()> {
        let size = self.world_max - self.world_min;
        if size.x <= 0.0 || size.y <= 0.0 || size.x * size.y < 1.0 {
            return Err(Error::InvalidWorld(format!(
                "world rectangle must span at least one square unit, got {} x {}",
                size.x, size.y
            )));
        }
        if self.agent_radius < 0.0 {
            return Err(Error::InvalidWorld(
                "agent radius must be non-negative".to_string(),
            ));
        }
        Ok(())
    }
}
