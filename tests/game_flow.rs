use std::fs;

use glam::DVec3;
use globe_guess::scene::{EquirectPicker, MarkerKind, Recorder, SceneCommand};
use globe_guess::sim::{
    FeedbackTier, GameController, GameEvent, GamePhase, MotionGenerator, NoiseField,
};
use globe_guess::{Catalog, Location, Settings, Subject, geo};
use tempfile::TempDir;

fn one_subject_game() -> GameController {
    let catalog = Catalog::new(
        vec![Location::new("A", DVec3::ZERO, "RED")],
        vec![Subject::new("X", "A")],
    );
    GameController::new(catalog, Settings::default(), 7)
}

fn count_game_overs(scene: &Recorder) -> usize {
    scene
        .commands
        .iter()
        .filter(|c| matches!(c, SceneCommand::GameOver(_)))
        .count()
}

#[test]
fn exact_guess_wins_and_ends_game() {
    let mut game = one_subject_game();
    let mut scene = Recorder::new();

    game.start_game(&mut scene);
    assert_eq!(game.current_subject_name(), Some("X"));

    game.submit_guess(Some(DVec3::ZERO), &mut scene);
    assert_eq!(game.score(), 500);
    assert_eq!(scene.markers_of(MarkerKind::GuessFlag).len(), 1);
    assert_eq!(scene.markers_of(MarkerKind::AnswerPin).len(), 1);
    assert_eq!(game.phase(), GamePhase::Concluding);

    game.advance_time(1_000, &mut scene);
    assert_eq!(game.phase(), GamePhase::GameOver);
    assert_eq!(game.score(), 500);
    assert!(scene.commands.contains(&SceneCommand::GameOver(500)));
    assert_eq!(scene.live_markers(), 0);
}

#[test]
fn no_guess_times_out_with_zero() {
    let mut game = one_subject_game();
    let mut scene = Recorder::new();
    game.start_game(&mut scene);

    game.advance_time(10_000, &mut scene);
    assert_eq!(game.score(), 0);
    assert_eq!(scene.points_shown(), vec![0]);
    assert!(!game.has_guess());

    game.advance_time(1_000, &mut scene);
    assert_eq!(game.phase(), GamePhase::GameOver);
    assert_eq!(count_game_overs(&scene), 1);
}

#[test]
fn round_timer_counts_down_every_second() {
    let mut game = one_subject_game();
    let mut scene = Recorder::new();
    game.start_game(&mut scene);
    game.advance_time(10_000, &mut scene);

    let timer: Vec<u32> = scene
        .commands
        .iter()
        .filter_map(|c| match c {
            SceneCommand::RoundTimer(s) => Some(*s),
            _ => None,
        })
        .collect();
    assert_eq!(timer, (0..10).rev().collect::<Vec<_>>());
}

#[test]
fn game_clock_caps_the_session() {
    let locations: Vec<Location> = (0..20)
        .map(|i| {
            let position = geo::from_degrees(i as f64 * 15.0, 0.0, 0.0);
            Location::new(format!("L{i}"), position, "RED")
        })
        .collect();
    let subjects = (0..20)
        .map(|i| Subject::new(format!("S{i}"), format!("L{i}")))
        .collect();
    let mut game = GameController::new(Catalog::new(locations, subjects), Settings::default(), 3);
    let mut scene = Recorder::new();
    game.start_game(&mut scene);

    // Six full rounds fit before the minute is up (6 x 11 s > 60 s)
    game.advance_time(59_999, &mut scene);
    assert!(game.phase().is_running());
    game.advance_time(1, &mut scene);
    assert_eq!(game.phase(), GamePhase::GameOver);
    assert_eq!(game.game_seconds_left(), 0);
    assert_eq!(game.round_index(), 5);

    // Nothing moves after game over
    game.submit_guess(Some(DVec3::ZERO), &mut scene);
    game.advance_time(60_000, &mut scene);
    assert_eq!(count_game_overs(&scene), 1);
    assert_eq!(game.score(), 0);
}

#[test]
fn restart_mid_round_does_not_leak_timers() {
    let mut game = one_subject_game();
    let mut scene = Recorder::new();
    game.start_game(&mut scene);
    game.advance_time(9_500, &mut scene);

    game.start_game(&mut scene);
    // The old round would have expired at 10 s
    game.advance_time(600, &mut scene);
    assert_eq!(game.phase(), GamePhase::AwaitingGuess);
    assert_eq!(game.round_seconds_left(), 10);
    assert!(scene.points_shown().is_empty());

    game.advance_time(9_400, &mut scene);
    assert_eq!(game.phase(), GamePhase::Concluding);
    assert_eq!(scene.points_shown(), vec![0]);
}

#[test]
fn click_through_picker_scores_by_distance() {
    let catalog = Catalog::new(
        vec![Location::new("Europe/Paris", geo::from_degrees(2.35, 48.85, 0.0), "RED")],
        vec![Subject::new("Ada", "Europe/Paris")],
    );
    let mut game = GameController::new(catalog, Settings::default(), 1);
    let mut scene = Recorder::new();
    let picker = EquirectPicker::new(3600.0, 1800.0);
    game.start_game(&mut scene);

    // Berlin: ~880 km away, not close enough to end the round
    game.handle_click(&picker, picker.screen_for(13.4, 52.5), &mut scene);
    assert_eq!(game.feedback(), Some(FeedbackTier::Mild));
    assert!(game.accepting_guesses());

    // Missed the globe entirely: nothing changes
    game.handle_click(&picker, glam::Vec2::new(-1.0, -1.0), &mut scene);
    assert_eq!(game.feedback(), Some(FeedbackTier::Mild));

    // Versailles: ~20 km away
    game.handle_click(&picker, picker.screen_for(2.12, 48.80), &mut scene);
    assert_eq!(game.feedback(), Some(FeedbackTier::Hot));
    assert_eq!(game.score(), 500);

    let events = game.drain_events();
    let guesses = events
        .iter()
        .filter(|e| matches!(e, GameEvent::GuessPlaced { .. }))
        .count();
    assert_eq!(guesses, 2);
}

#[test]
fn catalog_and_settings_load_from_disk() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("countries.json"),
        r#"{
            "Europe/Paris": { "position": [2.35, 48.85], "color": "RED" },
            "Asia/Tokyo": { "position": [139.69, 35.69], "color": "YELLOW" }
        }"#,
    )
    .unwrap();
    fs::write(
        dir.path().join("people.json"),
        r#"[
            { "name": "Ada", "tz": "Europe/Paris" },
            { "name": "Ken", "tz": "Asia/Tokyo" },
            { "name": "Nobody", "tz": "Mars/Olympus" }
        ]"#,
    )
    .unwrap();
    fs::write(dir.path().join("settings.json"), r#"{ "round_seconds": 3, "seed": 11 }"#).unwrap();

    let catalog = Catalog::load(dir.path()).unwrap();
    let settings = Settings::load(&dir.path().join("settings.json"));
    assert_eq!(catalog.subjects().len(), 2);
    assert_eq!(catalog.location("Asia/Tokyo").unwrap().display_name, "Tokyo");
    assert_eq!(settings.round_seconds, 3);

    let seed = settings.resolve_seed();
    let mut game = GameController::new(catalog, settings, seed);
    let mut scene = Recorder::new();
    game.start_game(&mut scene);
    assert_eq!(game.round_seconds_left(), 3);

    // Two timed-out rounds of 3 s plus reveal delays
    game.advance_time(8_000, &mut scene);
    assert_eq!(game.phase(), GamePhase::GameOver);
    assert_eq!(scene.points_shown(), vec![0, 0]);
}

#[test]
fn avatars_animate_independently_of_rounds() {
    let catalog = Catalog::new(
        vec![
            Location::new("Europe/Paris", geo::from_degrees(2.35, 48.85, 0.0), "RED"),
            Location::new("Asia/Tokyo", geo::from_degrees(139.69, 35.69, 0.0), "YELLOW"),
        ],
        vec![Subject::new("Ada", "Europe/Paris"), Subject::new("Ken", "Asia/Tokyo")],
    );
    let mut scene = Recorder::new();
    let noise = NoiseField::new(5);
    let mut motion = MotionGenerator::new(5);
    for subject in catalog.subjects() {
        let home = catalog.home_of(subject).unwrap().position;
        motion.spawn(home, &mut scene);
    }
    let mut game = GameController::new(catalog, Settings::default(), 5);
    game.start_game(&mut scene);

    for _ in 0..120 {
        motion.advance_all(&noise, &mut scene);
        game.advance_time(16, &mut scene);
    }
    assert_eq!(scene.move_count(), 240);
    assert_eq!(scene.markers_of(MarkerKind::Avatar).len(), 2);
    for agent in motion.agents() {
        assert!(geo::chord_distance(agent.position, agent.home) < 500_000.0);
    }
    assert_eq!(game.round_seconds_left(), 9);
}
