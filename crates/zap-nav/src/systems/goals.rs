// systems/goals.rs
//
// Goal-selection policies consulted by a Follower when it reaches its goal
// or when a planned goal turns out to be unreachable.

use crate::api::types::WaypointId;
use crate::core::store::WaypointStore;
use super::rng::Rng;

/// Chooses the next goal for a follower standing at `current`.
/// Returning `None` lets the follower go idle.
pub trait GoalPolicy {
    fn next_goal(&mut self, store: &WaypointStore, current: WaypointId) -> Option<WaypointId>;
}

impl<F> GoalPolicy for F
where
    F: FnMut(&WaypointStore, WaypointId) -> Option<WaypointId>,
{
    fn next_goal(&mut self, store: &WaypointStore, current: WaypointId) -> Option<WaypointId> {
        self(store, current)
    }
}

/// Uniform random draw among every other waypoint in the store.
#[derive(Debug, Clone)]
pub struct RandomGoal {
    rng: Rng,
}

impl RandomGoal {
    pub fn new(seed: u64) -> Self {
        Self { rng: Rng::new(seed) }
    }
}

impl GoalPolicy for RandomGoal {
    fn next_goal(&mut self, store: &WaypointStore, current: WaypointId) -> Option<WaypointId> {
        let candidates: Vec<WaypointId> = store.ids().filter(|&id| id != current).collect();
        self.rng.pick(&candidates).copied()
    }
}

/// Visits a fixed list of waypoints in order, wrapping at the end.
/// Entries equal to the current waypoint are skipped.
#[derive(Debug, Clone)]
pub struct PatrolGoals {
    route: Vec<WaypointId>,
    cursor: usize,
}

impl PatrolGoals {
    pub fn new(route: Vec<WaypointId>) -> Self {
        Self { route, cursor: 0 }
    }
}

impl GoalPolicy for PatrolGoals {
    fn next_goal(&mut self, _store: &WaypointStore, current: WaypointId) -> Option<WaypointId> {
        for _ in 0..self.route.len() {
            let goal = self.route[self.cursor];
            self.cursor = (self.cursor + 1) % self.route.len();
            if goal != current {
                return Some(goal);
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use crate::core::waypoint::WaypointMeta;

    fn store(n: u32) -> WaypointStore {
        let mut store = WaypointStore::new();
        for i in 0..n {
            store.add_waypoint(Vec3::new(i as f32, 0.0, 0.0), WaypointMeta::new()).unwrap();
        }
        store
    }

    #[test]
    fn random_goal_never_picks_current() {
        let store = store(3);
        let mut policy = RandomGoal::new(7);
        for _ in 0..50 {
            let goal = policy.next_goal(&store, WaypointId(1)).unwrap();
            assert_ne!(goal, WaypointId(1));
        }
    }

    #[test]
    fn random_goal_is_seeded() {
        let store = store(10);
        let mut a = RandomGoal::new(99);
        let mut b = RandomGoal::new(99);
        for _ in 0..20 {
            assert_eq!(a.next_goal(&store, WaypointId(0)), b.next_goal(&store, WaypointId(0)));
        }
    }

    #[test]
    fn random_goal_with_single_waypoint_gives_none() {
        let store = store(1);
        assert_eq!(RandomGoal::new(1).next_goal(&store, WaypointId(0)), None);
    }

    #[test]
    fn patrol_cycles_and_skips_current() {
        let store = store(3);
        let mut patrol = PatrolGoals::new(vec![WaypointId(0), WaypointId(1), WaypointId(2)]);
        assert_eq!(patrol.next_goal(&store, WaypointId(0)), Some(WaypointId(1)));
        assert_eq!(patrol.next_goal(&store, WaypointId(1)), Some(WaypointId(2)));
        assert_eq!(patrol.next_goal(&store, WaypointId(2)), Some(WaypointId(0)));
        assert_eq!(PatrolGoals::new(Vec::new()).next_goal(&store, WaypointId(0)), None);
    }

    #[test]
    fn closures_are_policies() {
        let store = store(2);
        let mut policy = |_: &WaypointStore, _: WaypointId| Some(WaypointId(1));
        assert_eq!(policy.next_goal(&store, WaypointId(0)), Some(WaypointId(1)));
    }
}
