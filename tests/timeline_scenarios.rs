use approx::assert_relative_eq;
use nalgebra::Vector3;

use rocket_launch::config::TimelineConfig;
use rocket_launch::sim::{simulate, EventKind, FlightPhase, FlightTimeline, RunConfig};
use rocket_launch::vehicle::{StageId, StagePhase, ThrustSource};

fn timeline() -> FlightTimeline {
    FlightTimeline::new(TimelineConfig::default())
}

#[test]
fn attached_stack_climbs_at_ascent_speed() {
    let mut tl = timeline();
    tl.advance(5.0);
    assert_eq!(tl.stage(StageId::First).body().position, Vector3::new(0.0, 0.0, 25.0));
    assert_eq!(tl.stage(StageId::Second).body().position, Vector3::new(0.0, 0.0, 25.0));
    assert_eq!(tl.payload().position, Vector3::new(0.0, 0.0, 25.0));
}

#[test]
fn first_stage_falls_from_separation_point() {
    let mut tl = timeline();
    tl.advance(9.99);
    let events = tl.advance(10.0);
    assert!(events.iter().any(|e| e.kind == EventKind::Separation { stage: StageId::First }));
    assert_relative_eq!(tl.stage(StageId::First).body().position.z, 50.0, epsilon = 1e-9);

    tl.advance(10.1);
    let expected = 50.0 + 5.0 * 0.1 - 0.5 * 9.81 * 0.01;
    assert_relative_eq!(tl.stage(StageId::First).body().position.z, expected, epsilon = 1e-9);
    // second stage still rides with the payload
    assert_relative_eq!(tl.stage(StageId::Second).body().position.z, 50.5, epsilon = 1e-9);
}

#[test]
fn coarse_frames_keep_the_separation_baseline() {
    let mut tl = timeline();
    tl.advance(9.0);
    tl.advance(11.0);
    let expected = 50.0 + 5.0 - 0.5 * 9.81;
    assert_relative_eq!(tl.stage(StageId::First).body().position.z, expected, epsilon = 1e-9);
}

#[test]
fn landed_stage_stays_at_origin() {
    let mut tl = timeline();
    tl.advance(14.0);
    tl.advance(16.0);
    assert_eq!(tl.stage(StageId::First).phase(), StagePhase::Grounded);
    assert_eq!(tl.stage(StageId::First).body().position, Vector3::zeros());
    assert_eq!(tl.stage(StageId::First).body().velocity, Vector3::zeros());

    for t in [17.0, 18.0, 19.0] {
        tl.advance(t);
        assert_eq!(tl.stage(StageId::First).body().position, Vector3::zeros());
    }
}

#[test]
fn each_transition_fires_once() {
    let (_, events) = simulate(&TimelineConfig::default(), &RunConfig::default());
    let count = |kind: EventKind| events.iter().filter(|e| e.kind == kind).count();
    for id in StageId::ALL {
        assert_eq!(count(EventKind::Separation { stage: id }), 1);
        assert_eq!(count(EventKind::Touchdown { stage: id }), 1);
    }
    let insertions = events
        .iter()
        .filter(|e| matches!(e.kind, EventKind::OrbitInsertion { .. }))
        .count();
    assert_eq!(insertions, 1);
}

#[test]
fn orbit_radius_is_fixed_at_insertion() {
    let mut tl = timeline();
    tl.advance(19.5);
    tl.advance(20.0);
    assert_eq!(tl.phase(), FlightPhase::Orbit);
    assert_eq!(tl.orbit().map(|o| o.radius), Some(1100.0));

    for t in [25.0, 100.0, 1000.0] {
        tl.advance(t);
        assert_eq!(tl.orbit().map(|o| o.radius), Some(1100.0));
        let pivot = Vector3::new(0.0, tl.satellite().position.y, -1000.0);
        assert_relative_eq!((tl.satellite().position - pivot).norm(), 1100.0, epsilon = 1e-6);
    }
}

#[test]
fn late_first_orbit_frame_keeps_the_nominal_radius() {
    let mut tl = timeline();
    tl.advance(23.0);
    assert_eq!(tl.orbit().map(|o| o.radius), Some(1100.0));
    assert_relative_eq!(tl.payload().position.z, 100.0, epsilon = 1e-9);
}

#[test]
fn satellite_starts_over_the_pad() {
    let mut tl = timeline();
    tl.advance(20.0);
    assert_relative_eq!(tl.satellite().position, Vector3::new(0.0, 0.0, 100.0), epsilon = 1e-9);

    // quarter turn after pi / (2 * rate) seconds
    tl.advance(20.0 + std::f64::consts::PI);
    assert_relative_eq!(
        tl.satellite().position,
        Vector3::new(1100.0, 0.0, -1000.0),
        epsilon = 1e-6
    );
}

#[test]
fn thrust_moves_up_the_stack() {
    let run = RunConfig { dt: 1.0, duration: 22.0 };
    let (frames, _) = simulate(&TimelineConfig::default(), &run);
    let thrust_at = |t: f64| frames[t as usize].thrust.map(|source| source.as_str());
    assert_eq!(thrust_at(5.0), Some("first"));
    assert_eq!(thrust_at(12.0), Some("second"));
    assert_eq!(thrust_at(17.0), Some("payload"));
    assert_eq!(thrust_at(21.0), None);
}

#[test]
fn stages_separate_independently_in_reverse_order() {
    let config = TimelineConfig::builder()
        .first_separation(15.0)
        .second_separation(10.0)
        .build();
    let mut tl = FlightTimeline::new(config);

    tl.advance(9.0);
    tl.advance(12.0);
    assert_eq!(tl.stage(StageId::First).phase(), StagePhase::Attached);
    assert_eq!(tl.stage(StageId::Second).phase(), StagePhase::Falling);
    assert_eq!(tl.thrust_source(), Some(ThrustSource::FirstStage));
    assert_relative_eq!(tl.stage(StageId::First).body().position.z, 60.0, epsilon = 1e-9);

    tl.advance(16.0);
    assert!(tl.stage(StageId::First).is_separated());
    assert!(tl.stage(StageId::Second).is_separated());
    assert_eq!(tl.thrust_source(), Some(ThrustSource::Payload));
    assert_relative_eq!(tl.stage(StageId::First).body().initial_position.z, 75.0, epsilon = 1e-9);
}

#[test]
fn satellite_keeps_its_own_y_at_insertion() {
    let config = TimelineConfig::builder()
        .ascent_velocity(Vector3::new(0.0, 1.0, 5.0))
        .build();
    let mut tl = FlightTimeline::new(config);
    tl.advance(19.0);
    assert_relative_eq!(tl.payload().position.y, 19.0, epsilon = 1e-9);

    tl.advance(20.0);
    assert_relative_eq!(tl.satellite().position, Vector3::new(0.0, 0.0, 100.0), epsilon = 1e-9);
    for t in [21.0, 30.0, 200.0] {
        tl.advance(t);
        assert_relative_eq!(tl.satellite().position.y, 0.0, epsilon = 1e-9);
        let pivot = Vector3::new(0.0, 0.0, -1000.0);
        assert_relative_eq!((tl.satellite().position - pivot).norm(), 1100.0, epsilon = 1e-6);
    }
}
