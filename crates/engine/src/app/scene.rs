use crate::world::{PlayState, Playfield, StepReport};

use super::InputSnapshot;

/// Game content plugged into the loop. A scene builds the play state once the
/// playfield is known and may wrap each tick with its own bookkeeping.
pub trait Scene {
    fn load(&mut self, playfield: Playfield) -> PlayState;

    fn update(&mut self, input: &InputSnapshot, state: &mut PlayState) -> StepReport {
        state.step(input)
    }

    fn unload(&mut self, _state: &PlayState) {}
}

/// The loop's single scene together with the state it owns.
pub(crate) struct SceneRuntime {
    scene: Box<dyn Scene>,
    state: PlayState,
    is_loaded: bool,
}

impl SceneRuntime {
    pub(crate) fn load(mut scene: Box<dyn Scene>, playfield: Playfield) -> Self {
        let state = scene.load(playfield);
        Self {
            scene,
            state,
            is_loaded: true,
        }
    }

    pub(crate) fn state(&self) -> &PlayState {
        &self.state
    }

    pub(crate) fn update(&mut self, input: &InputSnapshot) -> StepReport {
        self.scene.update(input, &mut self.state)
    }

    pub(crate) fn shutdown(&mut self) {
        if !self.is_loaded {
            return;
        }
        self.scene.unload(&self.state);
        self.is_loaded = false;
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::*;
    use crate::app::InputAction;
    use crate::sprite_keys::SpriteKey;
    use crate::world::tile_fixtures::brick_def;
    use crate::world::{PlayerSpawn, PlayerTuning, TileGrid, Vec2};

    #[derive(Default)]
    struct Counters {
        loads: Cell<u32>,
        updates: Cell<u32>,
        unloads: Cell<u32>,
    }

    struct CountingScene {
        counters: Rc<Counters>,
    }

    impl Scene for CountingScene {
        fn load(&mut self, playfield: Playfield) -> PlayState {
            self.counters.loads.set(self.counters.loads.get() + 1);
            let grid = TileGrid::new(vec![vec![0; 4]; 4], 50.0, vec![brick_def()]).expect("grid");
            let spawn = PlayerSpawn {
                x: 50.0,
                height_above_floor: 50.0,
                size: Vec2::new(50.0, 50.0),
                tuning: PlayerTuning::default(),
                sprite: SpriteKey::parse("actors/fish").expect("key"),
            };
            PlayState::new(playfield, grid, &spawn)
        }

        fn update(&mut self, input: &InputSnapshot, state: &mut PlayState) -> StepReport {
            self.counters.updates.set(self.counters.updates.get() + 1);
            state.step(input)
        }

        fn unload(&mut self, _state: &PlayState) {
            self.counters.unloads.set(self.counters.unloads.get() + 1);
        }
    }

    struct DefaultScene;

    impl Scene for DefaultScene {
        fn load(&mut self, playfield: Playfield) -> PlayState {
            CountingScene {
                counters: Rc::default(),
            }
            .load(playfield)
        }
    }

    #[test]
    fn runtime_loads_once_and_forwards_ticks() {
        let counters = Rc::new(Counters::default());
        let mut runtime = SceneRuntime::load(
            Box::new(CountingScene {
                counters: Rc::clone(&counters),
            }),
            Playfield::new(400, 300),
        );

        runtime.update(&InputSnapshot::empty());
        runtime.update(&InputSnapshot::empty());

        assert_eq!(counters.loads.get(), 1);
        assert_eq!(counters.updates.get(), 2);
        assert_eq!(runtime.state().playfield(), Playfield::new(400, 300));
    }

    #[test]
    fn shutdown_unloads_exactly_once() {
        let counters = Rc::new(Counters::default());
        let mut runtime = SceneRuntime::load(
            Box::new(CountingScene {
                counters: Rc::clone(&counters),
            }),
            Playfield::new(400, 300),
        );

        runtime.shutdown();
        runtime.shutdown();

        assert_eq!(counters.unloads.get(), 1);
    }

    #[test]
    fn default_update_steps_the_play_state() {
        let mut runtime = SceneRuntime::load(Box::new(DefaultScene), Playfield::new(400, 300));
        let start_x = runtime.state().player().position.x;

        let right = InputSnapshot::empty().with_action_down(InputAction::MoveRight, true);
        let report = runtime.update(&right);

        assert!(!report.jumped);
        assert_eq!(runtime.state().player().position.x, start_x + 5.0);
    }
}
