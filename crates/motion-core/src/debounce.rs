//! Hysteresis debouncing of per-frame zone signals.
//!
//! Each key owns a counter clamped to `[-frames_to_leave, +frames_to_enter]`.
//! Motion frames push it up, still frames push it down. A key goes down the
//! first time the counter *equals* the upper bound while released, and up the
//! first time it equals the lower bound while held. Comparing with equality
//! against the clamped bound is what makes each transition fire once: while
//! the counter sits on the bound, `held` already matches and nothing is
//! emitted.

use jumpcam_common::config::DebounceSettings;

use crate::keys::{GameKey, KeyAction, KeyTransition};
use crate::zones::ZoneSignals;

/// Debounce state for a single key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyDebouncer {
    counter: i32,
    held: bool,
    frames_to_enter: i32,
    frames_to_leave: i32,
}

impl KeyDebouncer {
    /// Thresholds below 1 are raised to 1.
    pub fn new(frames_to_enter: u32, frames_to_leave: u32) -> Self {
        Self {
            counter: 0,
            held: false,
            frames_to_enter: frames_to_enter.max(1) as i32,
            frames_to_leave: frames_to_leave.max(1) as i32,
        }
    }

    /// Advance one frame with this frame's signal.
    pub fn update(&mut self, signal: bool) -> Option<KeyAction> {
        if signal {
            self.counter = (self.counter + 1).min(self.frames_to_enter);
        } else {
            self.counter = (self.counter - 1).max(-self.frames_to_leave);
        }

        if self.counter == self.frames_to_enter && !self.held {
            self.held = true;
            Some(KeyAction::Down)
        } else if self.counter == -self.frames_to_leave && self.held {
            self.held = false;
            Some(KeyAction::Up)
        } else {
            None
        }
    }

    /// Drop the key unconditionally and return to the initial state.
    /// Returns whether the key was held.
    pub fn force_release(&mut self) -> bool {
        let was_held = self.held;
        self.held = false;
        self.counter = 0;
        was_held
    }

    pub fn counter(&self) -> i32 {
        self.counter
    }

    pub fn is_held(&self) -> bool {
        self.held
    }
}

/// One debouncer per game key.
#[derive(Debug, Clone)]
pub struct DebounceBank {
    slots: [(GameKey, KeyDebouncer); 3],
}

impl DebounceBank {
    pub fn new(settings: &DebounceSettings) -> Self {
        let debouncer = KeyDebouncer::new(settings.frames_to_enter, settings.frames_to_leave);
        Self {
            slots: GameKey::ALL.map(|key| (key, debouncer)),
        }
    }

    /// Replace the thresholds of a single key.
    pub fn with_key_thresholds(
        mut self,
        key: GameKey,
        frames_to_enter: u32,
        frames_to_leave: u32,
    ) -> Self {
        self.slots[key as usize].1 = KeyDebouncer::new(frames_to_enter, frames_to_leave);
        self
    }

    /// Advance every key by one frame. Transitions come out in key order.
    pub fn update(&mut self, signals: &ZoneSignals) -> Vec<KeyTransition> {
        self.slots
            .iter_mut()
            .filter_map(|(key, debouncer)| {
                debouncer
                    .update(signals.get(*key))
                    .map(|action| KeyTransition { key: *key, action })
            })
            .collect()
    }

    /// Release every held key, returning the key-up transitions owed.
    pub fn release_all(&mut self) -> Vec<KeyTransition> {
        self.slots
            .iter_mut()
            .filter_map(|(key, debouncer)| {
                debouncer
                    .force_release()
                    .then(|| KeyTransition::up(*key))
            })
            .collect()
    }

    pub fn state(&self, key: GameKey) -> &KeyDebouncer {
        // Slots are laid out in `GameKey::ALL` order.
        &self.slots[key as usize].1
    }

    pub fn is_held(&self, key: GameKey) -> bool {
        self.state(key).is_held()
    }

    pub fn held_keys(&self) -> Vec<GameKey> {
        self.slots
            .iter()
            .filter(|(_, d)| d.is_held())
            .map(|(key, _)| *key)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn run(debouncer: &mut KeyDebouncer, signals: &[bool]) -> Vec<(usize, KeyAction)> {
        signals
            .iter()
            .enumerate()
            .filter_map(|(i, s)| debouncer.update(*s).map(|a| (i + 1, a)))
            .collect()
    }

    #[test]
    fn enters_on_exactly_the_second_motion_frame() {
        let mut d = KeyDebouncer::new(2, 4);
        assert_eq!(run(&mut d, &[true, true]), vec![(2, KeyAction::Down)]);
        assert!(d.is_held());
        assert_eq!(d.counter(), 2);
    }

    #[test]
    fn held_key_is_not_pressed_again() {
        let mut d = KeyDebouncer::new(2, 4);
        let events = run(&mut d, &[true; 10]);
        assert_eq!(events, vec![(2, KeyAction::Down)]);
        assert_eq!(d.counter(), 2);
    }

    #[test]
    fn short_still_tail_does_not_release() {
        let mut d = KeyDebouncer::new(2, 4);
        let events = run(&mut d, &[true, true, false, false, false, false]);
        assert_eq!(events, vec![(2, KeyAction::Down)]);
        assert_eq!(d.counter(), -2);
        assert!(d.is_held());
    }

    #[test]
    fn long_still_tail_releases_once_at_lower_bound() {
        let mut d = KeyDebouncer::new(2, 4);
        let mut signals = vec![true, true];
        signals.extend([false; 8]);
        let events = run(&mut d, &signals);
        // 2 -> 1 -> 0 -> -1 -> -2 -> -3 -> -4 on the sixth still frame.
        assert_eq!(events, vec![(2, KeyAction::Down), (8, KeyAction::Up)]);
        assert_eq!(d.counter(), -4);
    }

    #[test]
    fn leave_threshold_counts_from_the_bottom() {
        let mut d = KeyDebouncer::new(2, 4);
        run(&mut d, &[true, true]);
        // Walk down to -3 without releasing.
        run(&mut d, &[false; 5]);
        assert!(d.is_held());
        assert_eq!(d.update(false), Some(KeyAction::Up));
    }

    #[test]
    fn motion_blip_delays_release() {
        let mut d = KeyDebouncer::new(2, 4);
        run(&mut d, &[true, true, false, false, false]); // counter -1
        assert_eq!(d.update(true), None); // back to 0
        let events = run(&mut d, &[false, false, false]);
        assert!(events.is_empty());
        assert_eq!(d.counter(), -3);
        assert_eq!(d.update(false), Some(KeyAction::Up));
    }

    #[test]
    fn single_motion_frame_never_presses() {
        let mut d = KeyDebouncer::new(2, 4);
        let events = run(&mut d, &[true, false, true, false, true, false]);
        assert!(events.is_empty());
    }

    #[test]
    fn released_key_needs_full_climb_from_bottom() {
        let mut d = KeyDebouncer::new(2, 4);
        let mut signals = vec![true, true];
        signals.extend([false; 6]);
        run(&mut d, &signals);
        assert!(!d.is_held());
        // From -4 it takes six motion frames to reach +2.
        let events = run(&mut d, &[true; 6]);
        assert_eq!(events, vec![(6, KeyAction::Down)]);
    }

    #[test]
    fn bank_keys_are_independent() {
        let mut bank = DebounceBank::new(&DebounceSettings::default());
        let left = ZoneSignals {
            left: true,
            ..ZoneSignals::default()
        };
        assert!(bank.update(&left).is_empty());
        assert_eq!(bank.update(&left), vec![KeyTransition::down(GameKey::Left)]);
        assert!(bank.is_held(GameKey::Left));
        assert!(!bank.is_held(GameKey::Right));
        assert_eq!(bank.state(GameKey::Right).counter(), -2);
    }

    #[test]
    fn bank_release_all_returns_only_held_keys() {
        let mut bank = DebounceBank::new(&DebounceSettings::default());
        let both = ZoneSignals {
            left: true,
            jump: true,
            right: false,
        };
        bank.update(&both);
        bank.update(&both);
        assert_eq!(bank.held_keys(), vec![GameKey::Left, GameKey::Jump]);

        let released = bank.release_all();
        assert_eq!(
            released,
            vec![KeyTransition::up(GameKey::Left), KeyTransition::up(GameKey::Jump)]
        );
        assert!(bank.held_keys().is_empty());
        assert!(bank.release_all().is_empty());
    }

    #[test]
    fn per_key_thresholds_override_shared_ones() {
        let mut bank = DebounceBank::new(&DebounceSettings::default())
            .with_key_thresholds(GameKey::Jump, 1, 2);
        let jump = ZoneSignals {
            jump: true,
            ..ZoneSignals::default()
        };
        assert_eq!(bank.update(&jump), vec![KeyTransition::down(GameKey::Jump)]);
    }

    proptest! {
        #[test]
        fn counter_stays_within_bounds(
            enter in 1u32..6,
            leave in 1u32..8,
            signals in proptest::collection::vec(any::<bool>(), 0..200),
        ) {
            let mut d = KeyDebouncer::new(enter, leave);
            for s in signals {
                d.update(s);
                prop_assert!(d.counter() <= enter as i32);
                prop_assert!(d.counter() >= -(leave as i32));
            }
        }

        #[test]
        fn transitions_alternate_starting_with_down(
            enter in 1u32..6,
            leave in 1u32..8,
            signals in proptest::collection::vec(any::<bool>(), 0..200),
        ) {
            let mut d = KeyDebouncer::new(enter, leave);
            let mut expected = KeyAction::Down;
            for s in signals {
                if let Some(action) = d.update(s) {
                    prop_assert_eq!(action, expected);
                    expected = match action {
                        KeyAction::Down => KeyAction::Up,
                        KeyAction::Up => KeyAction::Down,
                    };
                }
                prop_assert_eq!(d.is_held(), expected == KeyAction::Up);
            }
        }

        #[test]
        fn release_all_leaves_nothing_held(
            frames in proptest::collection::vec((any::<bool>(), any::<bool>(), any::<bool>()), 0..60),
        ) {
            let mut bank = DebounceBank::new(&DebounceSettings::default());
            for (left, right, jump) in frames {
                bank.update(&ZoneSignals { left, right, jump });
            }
            let held = bank.held_keys();
            let released: Vec<GameKey> = bank.release_all().into_iter().map(|t| t.key).collect();
            prop_assert_eq!(held, released);
            prop_assert!(bank.held_keys().is_empty());
        }
    }
}
