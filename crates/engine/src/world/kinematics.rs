use serde::Deserialize;

use super::geometry::{Aabb, Vec2};
use crate::app::{InputAction, InputSnapshot};
use crate::sprite_keys::SpriteKey;

/// Movement constants, all in pixels per logical tick.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct PlayerTuning {
    pub speed: f32,
    pub gravity: f32,
    pub jump_impulse: f32,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            speed: 5.0,
            gravity: 0.5,
            jump_impulse: 10.0,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KinematicsReport {
    pub jumped: bool,
    pub floor_contact: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    /// Top-left corner of the bounding box.
    pub position: Vec2,
    pub size: Vec2,
    pub velocity: Vec2,
    pub tuning: PlayerTuning,
    pub grounded: bool,
    pub sprite: SpriteKey,
}

impl Player {
    pub fn new(position: Vec2, size: Vec2, tuning: PlayerTuning, sprite: SpriteKey) -> Self {
        Self {
            position,
            size,
            velocity: Vec2::ZERO,
            tuning,
            grounded: false,
            sprite,
        }
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::from_position_size(self.position, self.size)
    }

    pub fn bottom(&self) -> f32 {
        self.position.y + self.size.y
    }

    /// Advances the player by one tick: input sets horizontal velocity,
    /// gravity or grounding drives vertical velocity, a held jump fires only
    /// from the ground, then the position is integrated and clamped to the
    /// floor. `grounded` afterwards reflects floor contact alone; tile
    /// collision runs separately and may only raise it.
    pub fn update(&mut self, input: &InputSnapshot, floor_y: f32) -> KinematicsReport {
        self.velocity.x = if input.is_down(InputAction::MoveRight) {
            self.tuning.speed
        } else if input.is_down(InputAction::MoveLeft) {
            -self.tuning.speed
        } else {
            0.0
        };

        if self.grounded {
            self.velocity.y = 0.0;
        } else {
            self.velocity.y += self.tuning.gravity;
        }

        let jumped = input.is_down(InputAction::Jump) && self.grounded;
        if jumped {
            self.velocity.y = -self.tuning.jump_impulse;
            self.grounded = false;
        }

        self.position.x += self.velocity.x;
        self.position.y += self.velocity.y;

        let floor_contact = self.bottom() >= floor_y;
        if floor_contact {
            self.position.y = floor_y - self.size.y;
        }
        self.grounded = floor_contact;

        KinematicsReport {
            jumped,
            floor_contact,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FLOOR_Y: f32 = 750.0;

    fn fish_at(x: f32, y: f32) -> Player {
        Player::new(
            Vec2::new(x, y),
            Vec2::new(50.0, 50.0),
            PlayerTuning::default(),
            SpriteKey::parse("actors/fish").expect("key"),
        )
    }

    fn held(actions: &[InputAction]) -> InputSnapshot {
        actions
            .iter()
            .fold(InputSnapshot::empty(), |snapshot, action| {
                snapshot.with_action_down(*action, true)
            })
    }

    #[test]
    fn airborne_tick_adds_gravity_and_stops_horizontal_motion() {
        let mut player = fish_at(50.0, 100.0);
        player.velocity = Vec2::new(5.0, 2.0);

        for expected_vy in [2.5, 3.0, 3.5] {
            player.update(&InputSnapshot::empty(), FLOOR_Y);
            assert_eq!(player.velocity.x, 0.0);
            assert!((player.velocity.y - expected_vy).abs() < 1e-6);
            assert!(!player.grounded);
        }
    }

    #[test]
    fn horizontal_velocity_follows_input_with_right_priority() {
        let mut player = fish_at(100.0, 100.0);

        player.update(&held(&[InputAction::MoveRight]), FLOOR_Y);
        assert_eq!(player.velocity.x, 5.0);
        assert_eq!(player.position.x, 105.0);

        player.update(&held(&[InputAction::MoveLeft]), FLOOR_Y);
        assert_eq!(player.velocity.x, -5.0);
        assert_eq!(player.position.x, 100.0);

        player.update(
            &held(&[InputAction::MoveLeft, InputAction::MoveRight]),
            FLOOR_Y,
        );
        assert_eq!(player.velocity.x, 5.0);
    }

    #[test]
    fn bottom_exactly_on_floor_is_clamped_and_grounded() {
        let mut player = fish_at(50.0, FLOOR_Y - 50.0);
        player.grounded = true;

        let report = player.update(&InputSnapshot::empty(), FLOOR_Y);

        assert!(report.floor_contact);
        assert!(player.grounded);
        assert_eq!(player.position.y, FLOOR_Y - 50.0);
        assert_eq!(player.velocity.y, 0.0);
    }

    #[test]
    fn bottom_one_unit_above_floor_is_not_grounded() {
        let mut player = fish_at(50.0, FLOOR_Y - 51.0);
        player.grounded = true;

        let report = player.update(&InputSnapshot::empty(), FLOOR_Y);

        assert!(!report.floor_contact);
        assert!(!player.grounded);
        assert_eq!(player.bottom(), FLOOR_Y - 1.0);
    }

    #[test]
    fn overshooting_the_floor_snaps_back_onto_it() {
        let mut player = fish_at(50.0, FLOOR_Y - 52.0);
        player.velocity.y = 9.0;

        player.update(&InputSnapshot::empty(), FLOOR_Y);

        assert!(player.grounded);
        assert_eq!(player.bottom(), FLOOR_Y);
    }

    #[test]
    fn grounded_jump_launches_upward() {
        let mut player = fish_at(50.0, FLOOR_Y - 50.0);
        player.grounded = true;
        let before_y = player.position.y;

        let report = player.update(&held(&[InputAction::Jump]), FLOOR_Y);

        assert!(report.jumped);
        assert!(!report.floor_contact);
        assert_eq!(player.velocity.y, -10.0);
        assert!(!player.grounded);
        assert_eq!(player.position.y, before_y - 10.0);
    }

    #[test]
    fn airborne_jump_is_ignored() {
        let mut player = fish_at(50.0, 100.0);

        let report = player.update(&held(&[InputAction::Jump]), FLOOR_Y);

        assert!(!report.jumped);
        assert_eq!(player.velocity.y, 0.5);
    }

    #[test]
    fn fall_from_spawn_is_monotonic_and_grounds_on_arrival() {
        let mut player = fish_at(50.0, FLOOR_Y - 150.0);
        let rest_y = FLOOR_Y - 50.0;
        let mut previous_y = player.position.y;
        let mut arrived_at = None;

        for tick in 0..200 {
            player.update(&InputSnapshot::empty(), FLOOR_Y);
            assert!(player.position.y >= previous_y, "tick={tick}");
            assert!(player.position.y <= rest_y, "tick={tick}");
            let at_rest = player.position.y == rest_y;
            assert_eq!(player.grounded, at_rest, "tick={tick}");
            if at_rest && arrived_at.is_none() {
                arrived_at = Some(tick);
            }
            previous_y = player.position.y;
        }

        assert!(arrived_at.is_some(), "player never reached the floor");
        assert!(player.grounded);
    }
}
