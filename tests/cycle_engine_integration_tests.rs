use sink_switch::cycle::{CandidateSource, plan_cycle};
use sink_switch::system::EndpointSwitcher;
use sink_switch::{Config, Error, MockAudioSystem, Role, RoleSet};

mod test_utils;
use test_utils::{AudioDeviceBuilder, EngineFixture, desktop_devices};

/// Integration tests for the cycle engine against mock audio and file systems
/// These tests verify candidate selection, ring advance, switching and persistence

const NO_PATTERNS: &[&str] = &[];

fn config(devices: &[&str], last_device_id: &str) -> Config {
    Config {
        devices: devices.iter().map(|d| d.to_string()).collect(),
        last_device_id: last_device_id.to_string(),
    }
}

#[cfg(test)]
mod ring {
    use super::*;

    #[test]
    fn test_advances_from_last_device() {
        let fixture = EngineFixture::new(desktop_devices()).with_config(&config(&[], "spk"));

        let outcome = fixture.engine.cycle(NO_PATTERNS).unwrap();

        assert_eq!(outcome.previous.unwrap().id, "spk");
        assert_eq!(outcome.target.id, "hs");
        assert!(outcome.persisted);
    }

    #[test]
    fn test_n_steps_return_to_start() {
        let fixture = EngineFixture::new(desktop_devices()).with_config(&config(&[], "tv"));

        let visited: Vec<String> = (0..3)
            .map(|_| fixture.engine.cycle(NO_PATTERNS).unwrap().target.id)
            .collect();

        assert_eq!(visited, vec!["spk", "hs", "tv"]);
        assert_eq!(fixture.stored_config().unwrap().last_device_id, "tv");
    }

    #[test]
    fn test_every_position_advances_by_one() {
        let devices = desktop_devices();
        for (position, device) in devices.iter().enumerate() {
            let plan = plan_cycle(&devices, &config(&[], &device.id), NO_PATTERNS, None).unwrap();
            assert_eq!(plan.position, Some(position));
            assert_eq!(plan.target, devices[(position + 1) % devices.len()]);
        }
    }

    #[test]
    fn test_os_default_used_without_last_device() {
        let fixture = EngineFixture::new(desktop_devices());
        fixture.audio.set_mock_default(Some("hs"));

        let outcome = fixture.engine.cycle(NO_PATTERNS).unwrap();
        assert_eq!(outcome.target.id, "tv");
    }

    #[test]
    fn test_last_device_wins_over_os_default() {
        let fixture = EngineFixture::new(desktop_devices()).with_config(&config(&[], "spk"));
        fixture.audio.set_mock_default(Some("tv"));

        let outcome = fixture.engine.cycle(NO_PATTERNS).unwrap();
        assert_eq!(outcome.target.id, "hs");
    }

    #[test]
    fn test_cold_start_uses_first_candidate() {
        let fixture = EngineFixture::new(desktop_devices());
        fixture.audio.set_mock_default(Some("unplugged-device"));

        let outcome = fixture.engine.cycle(NO_PATTERNS).unwrap();

        assert!(outcome.previous.is_none());
        assert_eq!(outcome.target.id, "spk");
    }

    #[test]
    fn test_query_failure_is_not_fatal() {
        let fixture = EngineFixture::new(desktop_devices());
        fixture.audio.set_query_failure(true);

        let outcome = fixture.engine.cycle(NO_PATTERNS).unwrap();
        assert_eq!(outcome.target.id, "spk");
    }
}

#[cfg(test)]
mod candidates {
    use super::*;

    #[test]
    fn test_allow_list_restricts_cycle() {
        let fixture = EngineFixture::new(desktop_devices())
            .with_config(&config(&["headset", "lg tv"], "tv"));

        let (plan, _) = fixture.engine.plan(NO_PATTERNS).unwrap();

        assert_eq!(plan.source, CandidateSource::AllowList);
        assert_eq!(plan.candidates.len(), 2);
        assert_eq!(plan.target.id, "hs");
    }

    #[test]
    fn test_allow_list_with_one_match_falls_back_to_all() {
        let all = desktop_devices();
        let plan = plan_cycle(&all, &config(&["headset", "bluetooth"], ""), NO_PATTERNS, None)
            .unwrap();

        assert_eq!(plan.source, CandidateSource::AllowListFallback);
        assert_eq!(plan.candidates, all);
    }

    #[test]
    fn test_explicit_patterns_override_allow_list() {
        let fixture = EngineFixture::new(desktop_devices())
            .with_config(&config(&["headset", "lg tv"], "tv"));

        let (plan, _) = fixture.engine.plan(&["speakers", "lg tv"]).unwrap();

        assert_eq!(plan.source, CandidateSource::Explicit);
        assert_eq!(plan.position, Some(1));
        assert_eq!(plan.target.id, "spk");
    }

    #[test]
    fn test_single_explicit_match_is_an_error() {
        let fixture = EngineFixture::new(desktop_devices()).with_config(&config(&[], "spk"));

        let result = fixture.engine.cycle(&["headset"]);

        assert!(matches!(
            result,
            Err(Error::InsufficientCandidates { found: 1 })
        ));
        assert!(fixture.audio.get_set_role_calls().is_empty());
        assert!(fixture.files.get_write_calls().is_empty());
        assert_eq!(fixture.stored_config().unwrap().last_device_id, "spk");
    }

    #[test]
    fn test_one_device_system_cannot_cycle() {
        let fixture = EngineFixture::new(vec![
            AudioDeviceBuilder::new().id("spk").name("Speakers").build(),
        ]);

        let result = fixture.engine.cycle(NO_PATTERNS);
        assert!(matches!(
            result,
            Err(Error::InsufficientCandidates { found: 1 })
        ));
        assert!(fixture.audio.get_set_role_calls().is_empty());
    }

    #[test]
    fn test_enumeration_failure_is_fatal() {
        let fixture = EngineFixture::new(desktop_devices());
        fixture.audio.set_enumeration_failure(true);

        assert!(matches!(
            fixture.engine.cycle(NO_PATTERNS),
            Err(Error::Enumeration(_))
        ));
        assert!(fixture.files.get_write_calls().is_empty());
    }
}

#[cfg(test)]
mod switching {
    use super::*;

    #[test]
    fn test_switch_assigns_every_role_in_order() {
        let fixture = EngineFixture::new(desktop_devices());

        fixture.engine.cycle(NO_PATTERNS).unwrap();

        assert_eq!(
            fixture.audio.get_set_role_calls(),
            vec![
                ("spk".to_string(), Role::Console),
                ("spk".to_string(), Role::Multimedia),
                ("spk".to_string(), Role::Communications),
            ]
        );
        for role in Role::ALL {
            assert_eq!(fixture.audio.default_for(role).as_deref(), Some("spk"));
        }
    }

    #[test]
    fn test_second_role_failure_stops_and_keeps_state() {
        let fixture = EngineFixture::new(desktop_devices()).with_config(&config(&[], "spk"));
        fixture.audio.set_mock_default(Some("spk"));
        fixture.audio.set_role_failure(Some(Role::Multimedia));

        let result = fixture.engine.cycle(NO_PATTERNS);

        assert!(matches!(
            result,
            Err(Error::Switch {
                role: Role::Multimedia,
                ..
            })
        ));
        // Communications is never attempted and console is not rolled back
        assert_eq!(
            fixture.audio.get_set_role_calls(),
            vec![
                ("hs".to_string(), Role::Console),
                ("hs".to_string(), Role::Multimedia),
            ]
        );
        assert_eq!(fixture.audio.default_for(Role::Console).as_deref(), Some("hs"));
        assert_eq!(
            fixture.audio.default_for(Role::Communications).as_deref(),
            Some("spk")
        );
        assert_eq!(fixture.stored_config().unwrap().last_device_id, "spk");
    }

    #[test]
    fn test_switcher_honours_role_subset() {
        let audio = MockAudioSystem::with_devices(desktop_devices());
        let roles = RoleSet::EMPTY
            .with(Role::Communications)
            .with(Role::Console);

        audio.set_default_render_endpoint("tv", roles).unwrap();

        assert_eq!(
            audio.get_set_role_calls(),
            vec![
                ("tv".to_string(), Role::Console),
                ("tv".to_string(), Role::Communications),
            ]
        );
        assert_eq!(audio.default_for(Role::Multimedia), None);
    }

    #[test]
    fn test_save_failure_after_switch_is_reported() {
        let fixture = EngineFixture::new(desktop_devices());
        fixture.files.set_write_failure(true);

        let outcome = fixture.engine.cycle(NO_PATTERNS).unwrap();

        assert!(!outcome.persisted);
        assert_eq!(
            fixture.audio.default_for(Role::Multimedia).as_deref(),
            Some("spk")
        );
    }

    #[test]
    fn test_persist_keeps_allow_list() {
        let fixture = EngineFixture::new(desktop_devices())
            .with_config(&config(&["speakers", "headset"], ""));

        fixture.engine.cycle(NO_PATTERNS).unwrap();

        assert_eq!(
            fixture.stored_config().unwrap(),
            config(&["speakers", "headset"], "spk")
        );
    }
}
