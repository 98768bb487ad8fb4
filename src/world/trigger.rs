//! Axis-aligned trigger regions and the one-shot proximity latch.

use bevy::prelude::*;
use crate::shared::SequenceError;

/// Rectangle given by its centre and full size, in world coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Region {
    center: Vec2,
    size: Vec2,
}

impl Region {
    pub fn new(center: Vec2, size: Vec2) -> Result<Self, SequenceError> {
        if !(size.x > 0.0 && size.y > 0.0) {
            return Err(SequenceError::Configuration(format!(
                "trigger region needs a positive size, got {}x{}",
                size.x, size.y
            )));
        }
        Ok(Self { center, size })
    }

    /// Edges count as inside.
    pub fn contains(&self, point: Vec2) -> bool {
        let half = self.size / 2.0;
        (point.x - self.center.x).abs() <= half.x && (point.y - self.center.y).abs() <= half.y
    }

    pub fn center(&self) -> Vec2 {
        self.center
    }

    pub fn size(&self) -> Vec2 {
        self.size
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerCheck {
    Fire,
    Idle,
}

/// Fires the first time the player is seen inside its region, then never
/// again. Lives on an entity scoped to its scene, so a fresh scene
/// instance gets a fresh latch.
#[derive(Component, Debug, Clone)]
pub struct ProximityTrigger {
    region: Region,
    fired: bool,
}

impl ProximityTrigger {
    pub fn new(region: Region) -> Self {
        Self {
            region,
            fired: false,
        }
    }

    /// Feed one position sample (once per tick).
    pub fn check(&mut self, player_position: Vec2) -> TriggerCheck {
        if self.fired {
            return TriggerCheck::Idle;
        }
        if self.region.contains(player_position) {
            self.fired = true;
            return TriggerCheck::Fire;
        }
        TriggerCheck::Idle
    }

    pub fn has_fired(&self) -> bool {
        self.fired
    }

    pub fn region(&self) -> &Region {
        &self.region
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn altar() -> ProximityTrigger {
        ProximityTrigger::new(Region::new(Vec2::new(195.0, 674.0), Vec2::new(200.0, 60.0)).unwrap())
    }

    #[test]
    fn test_region_rejects_non_positive_size() {
        assert!(Region::new(Vec2::ZERO, Vec2::new(0.0, 10.0)).is_err());
        assert!(Region::new(Vec2::ZERO, Vec2::new(10.0, -1.0)).is_err());
        assert!(Region::new(Vec2::ZERO, Vec2::new(f32::NAN, 1.0)).is_err());
    }

    #[test]
    fn test_region_contains_edges() {
        let region = Region::new(Vec2::new(10.0, 10.0), Vec2::new(4.0, 2.0)).unwrap();
        assert!(region.contains(Vec2::new(12.0, 11.0)));
        assert!(region.contains(Vec2::new(8.0, 9.0)));
        assert!(!region.contains(Vec2::new(12.1, 10.0)));
        assert!(!region.contains(Vec2::new(10.0, 8.9)));
    }

    #[test]
    fn test_trigger_idle_outside_region() {
        let mut trigger = altar();
        assert_eq!(trigger.check(Vec2::new(195.0, 100.0)), TriggerCheck::Idle);
        assert!(!trigger.has_fired());
    }

    #[test]
    fn test_trigger_fires_at_most_once() {
        let mut trigger = altar();
        let inside = Vec2::new(200.0, 680.0);
        let fires = (0..50)
            .map(|i| {
                let pos = if i % 3 == 0 { Vec2::new(195.0, 100.0) } else { inside };
                trigger.check(pos)
            })
            .filter(|c| *c == TriggerCheck::Fire)
            .count();
        assert_eq!(fires, 1);
        assert!(trigger.has_fired());
    }
}
