use esmrs::{ActionStatus, Catalog, EsmError, StateManager, WorldState};

#[cfg(test)]
mod tests {
    use super::*;

    fn kitchen_manager() -> StateManager {
        StateManager::with_catalog(Catalog::new(
            "LivingRoom",
            [
                ("Kitchen", vec!["Cup", "Fork"]),
                ("LivingRoom", vec!["Remote"]),
                ("DiningTable", vec![]),
            ],
        ))
        .unwrap()
    }

    /// Every item sits in at most one container.
    fn assert_unique_items(state: &WorldState) {
        let mut names: Vec<&String> = state.environment.values().flatten().collect();
        names.extend(state.robot_status.holding.iter());
        for name in &names {
            assert_eq!(
                state.occurrences(name),
                1,
                "{} appears more than once in {:?}",
                name,
                state
            );
        }
    }

    #[test]
    fn test_case_mismatched_pick_up_scenario() {
        let mut manager = kitchen_manager();

        manager.execute_action("go to the Kitchen");
        assert_eq!(manager.state().robot_status.location, "Kitchen");

        let log = manager.execute_action("pick up the cup");
        assert!(log.contains("Robot picked up Cup from Kitchen"));
        assert_eq!(manager.state().robot_status.holding, vec!["Cup".to_string()]);
        assert_eq!(
            manager.state().items_at("Kitchen").unwrap(),
            &["Fork".to_string()]
        );
    }

    #[test]
    fn test_pick_up_only_from_visited_location() {
        for (location, item, expect_success) in [
            ("Kitchen", "fork", true),
            ("Kitchen", "remote", false),
            ("LivingRoom", "remote", true),
            ("DiningTable", "cup", false),
        ] {
            let mut manager = kitchen_manager();
            let before = manager.state().items_at(location).unwrap().to_vec();

            manager.execute_action(&format!("go to the {}", location));
            let log = manager.execute_action(&format!("pick up the {}", item));

            if expect_success {
                assert_eq!(manager.state().robot_status.holding.len(), 1);
                assert_eq!(
                    manager.state().items_at(location).unwrap().len(),
                    before.len() - 1
                );
            } else {
                assert!(manager.state().robot_status.holding.is_empty());
                assert!(log.contains("not found"), "log was: {}", log);
                assert_eq!(manager.state().items_at(location).unwrap(), &before[..]);
            }
        }
    }

    #[test]
    fn test_put_elsewhere_is_a_no_op() {
        let mut manager = kitchen_manager();
        manager.execute_action("go to the kitchen");
        manager.execute_action("pick up the cup");
        let before = manager.state().clone();

        let response = manager.execute("put Cup in the DiningTable");
        assert_eq!(response.status(), ActionStatus::Refused);
        assert!(response
            .to_string()
            .contains("Robot is at Kitchen and cannot put items in DiningTable"));
        assert_eq!(manager.state(), &before);
    }

    #[test]
    fn test_take_requires_colocation() {
        let mut manager = kitchen_manager();
        let before = manager.state().clone();

        let log = manager.execute_action("take Fork from Kitchen");
        assert!(log.contains("Robot is at LivingRoom and cannot take items from Kitchen"));
        assert_eq!(manager.state(), &before);
    }

    #[test]
    fn test_open_close_round_trip() {
        let mut manager = kitchen_manager();
        manager.execute_action("open the DiningTable");
        let initial = manager.state().open_locations.clone();

        for _ in 0..3 {
            manager.execute_action("open the kitchen");
            manager.execute_action("close the kitchen");
            assert_eq!(manager.state().open_locations, initial);
        }
    }

    #[test]
    fn test_goal_without_marker_fails() {
        let mut manager = kitchen_manager();
        let history_len = manager.history().len();

        assert!(!manager.set_task_goal("{'target_location': 'DiningTable'}"));
        assert!(!manager.set_task_goal("Goal: not a mapping"));
        assert!(!manager.set_task_goal("Goal: {'target_location': print('x')}"));

        assert!(manager.state().task_goal.is_empty());
        assert_eq!(manager.history().len(), history_len);
    }

    #[test]
    fn test_goal_scenario() {
        let mut manager = kitchen_manager();
        assert!(manager.set_task_goal(
            r#"Goal: {"target_location": "DiningTable", "items_needed": {"Plate": 2}}"#
        ));

        let goal = &manager.state().task_goal;
        assert_eq!(goal.target_location.as_deref(), Some("DiningTable"));
        assert_eq!(goal.items_needed.len(), 1);
        assert_eq!(goal.items_needed["Plate"], 2);
    }

    #[test]
    fn test_goal_overwrites_previous_goal() {
        let mut manager = kitchen_manager();
        assert!(manager.set_task_goal("Goal: {target_location: 'Kitchen'}"));
        assert!(manager.set_task_goal("Goal: {items_needed: {'Cup': 1}}"));
        let goal = &manager.state().task_goal;
        assert!(goal.target_location.is_none());
        assert_eq!(goal.items_needed["Cup"], 1);
    }

    #[test]
    fn test_failed_actions_are_coalesced() {
        let mut manager = kitchen_manager();
        manager.execute_action("go to the Kitchen");
        let history_len = manager.history().len();

        let first = manager.execute_action("sing a song");
        let second = manager.execute_action("take Remote from LivingRoom");

        assert!(!first.is_empty());
        assert!(!second.is_empty());
        assert!(manager.history().len() <= history_len + 1);
    }

    #[test]
    fn test_malformed_input_never_panics() {
        let mut manager = kitchen_manager();
        for text in [
            "",
            "   ",
            "go to the",
            "take from",
            "put in the",
            "hand over to user",
            "find",
            "\u{1F916} go to the kitchen",
            "GO TO THE \u{212A}itchen",
            "take \u{0130} from \u{0130}",
            "done",
        ] {
            let response = manager.execute(text);
            assert!(!response.to_string().is_empty());
            assert!(response.lines()[0].starts_with("Action Executed:"));
            assert!(response
                .lines()
                .last()
                .unwrap()
                .starts_with("State Updated:"));
        }
        assert_unique_items(manager.state());
    }

    #[test]
    fn test_items_stay_unique_through_a_session() {
        let mut manager = kitchen_manager();
        for step in [
            "go to the kitchen",
            "pick up the cup",
            "pick up the cup",
            "take fork from kitchen",
            "go to the livingroom",
            "put cup in the livingroom",
            "pick up the remote",
            "pick up the Cup",
            "hand over remote to user",
            "go to the diningtable",
            "put fork in the diningtable",
            "put cup in the diningtable",
        ] {
            manager.execute_action(step);
            assert_unique_items(manager.state());
        }

        let state = manager.state();
        assert_eq!(
            state.items_at("DiningTable").unwrap(),
            &["Fork".to_string(), "Cup".to_string()]
        );
        assert!(state.robot_status.holding.is_empty());
        assert_eq!(state.occurrences("Remote"), 0);
    }

    #[test]
    fn test_invalid_catalog_is_rejected() {
        let result = StateManager::with_catalog(Catalog::new(
            "Kitchen",
            [("Kitchen", vec!["Cup"]), ("Pantry", vec!["cup"])],
        ));
        assert!(matches!(result, Err(EsmError::Catalog(_))));
    }
}
