use simulator::types::airfield::Airfield;
use simulator::types::catalog::{Airline, Catalog};
use simulator::types::airport::Airport;
use simulator::{FlightStatus, SimConfig, SimError, Simulation, Snapshot};
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::thread;
use std::time::Duration;

fn config(seed: u64, tick_ms: u64) -> SimConfig {
    SimConfig {
        tick_interval: Duration::from_millis(tick_ms),
        seed: Some(seed),
        ..SimConfig::default()
    }
}

fn counts(snapshot: &Snapshot) -> HashMap<FlightStatus, usize> {
    let mut counts = HashMap::new();
    for flight in snapshot.flights.iter() {
        *counts.entry(flight.status).or_insert(0) += 1;
    }
    counts
}

// Run the timer for a while and verify the fleet keeps moving and stays the same size
#[test]
fn timer_driven_simulation_ticks_and_freezes_on_stop() {
    let sim = Simulation::new(config(1, 20)).expect("Failed to create simulation");
    sim.start(200).expect("Failed to start simulation");

    thread::sleep(Duration::from_millis(500));
    sim.stop().expect("Failed to stop simulation");

    let stopped = sim.snapshot().expect("Failed to read snapshot");
    assert!(stopped.tick > 0, "the timer never ticked");
    assert_eq!(stopped.flights.len(), 200);

    thread::sleep(Duration::from_millis(100));
    let later = sim.snapshot().expect("Failed to read snapshot");
    assert_eq!(later.tick, stopped.tick);
    assert_eq!(later.flights, stopped.flights);
}

#[test]
fn simulation_can_be_restarted_with_a_new_fleet() {
    let sim = Simulation::new(config(2, 1000)).expect("Failed to create simulation");

    sim.start(30).expect("Failed to start simulation");
    sim.stop().expect("Failed to stop simulation");
    sim.start(60).expect("Failed to restart simulation");
    sim.stop().expect("Failed to stop simulation");

    let snapshot = sim.snapshot().expect("Failed to read snapshot");
    assert_eq!(snapshot.flights.len(), 60);
    assert_eq!(snapshot.tick, 0);
}

#[test]
fn restart_after_pause_keeps_ticking() {
    let sim = Simulation::new(config(7, 10)).expect("Failed to create simulation");

    sim.start(20).expect("Failed to start simulation");
    sim.pause();
    sim.stop().expect("Failed to stop simulation");
    sim.start(20).expect("Failed to restart simulation");
    thread::sleep(Duration::from_millis(300));

    assert!(!sim.is_paused());
    let snapshot = sim.snapshot().expect("Failed to read snapshot");
    sim.stop().expect("Failed to stop simulation");
    assert!(snapshot.tick > 0, "restarted simulation never ticked");

    // a pause issued while idle does not carry into the next run either
    sim.pause();
    sim.start(20).expect("Failed to restart simulation");
    thread::sleep(Duration::from_millis(300));
    let snapshot = sim.snapshot().expect("Failed to read snapshot");
    sim.stop().expect("Failed to stop simulation");
    assert!(snapshot.tick > 0, "simulation paused before start never ticked");
}

// Nothing leaves parked, boarding, delayed or cancelled on its own
#[test]
fn ground_statuses_never_lose_flights() {
    let sim = Simulation::new(config(3, 1000)).expect("Failed to create simulation");
    sim.start(500).expect("Failed to start simulation");
    sim.pause();

    let mut previous = counts(&sim.snapshot().unwrap());
    for _ in 0..400 {
        let snapshot = sim.step().expect("Failed to step");
        let current = counts(&snapshot);

        for status in [
            FlightStatus::Parked,
            FlightStatus::Boarding,
            FlightStatus::Delayed,
            FlightStatus::Cancelled,
        ] {
            let before = previous.get(&status).copied().unwrap_or(0);
            let after = current.get(&status).copied().unwrap_or(0);
            assert!(after >= before, "{} went from {} to {}", status.as_str(), before, after);
        }
        assert_eq!(current.values().sum::<usize>(), 500);
        previous = current;
    }
    sim.stop().expect("Failed to stop simulation");

    // every arrival and taxi-out eventually settles: arrivals park, departures come back as arrivals
    assert!(previous.get(&FlightStatus::Parked).copied().unwrap_or(0) > 200);
}

#[test]
fn stationary_flights_keep_their_state() {
    let sim = Simulation::new(config(4, 1000)).expect("Failed to create simulation");
    sim.start(100).expect("Failed to start simulation");
    sim.pause();

    let initial = sim.snapshot().unwrap();
    for _ in 0..50 {
        sim.step().expect("Failed to step");
    }
    let after = sim.snapshot().unwrap();
    sim.stop().expect("Failed to stop simulation");

    for (before, now) in initial.flights.iter().zip(after.flights.iter()) {
        if before.is_stationary() {
            assert_eq!(before, now);
        }
    }
}

#[test]
fn transitions_are_written_to_the_log() {
    let log_dir = PathBuf::from("/tmp/airfield_integration_logs");
    let config = SimConfig {
        log_dir: Some(log_dir.clone()),
        ..config(5, 1000)
    };

    let sim = Simulation::new(config).expect("Failed to create simulation");
    sim.start(200).expect("Failed to start simulation");
    sim.pause();
    for _ in 0..100 {
        sim.step().expect("Failed to step");
    }
    sim.stop().expect("Failed to stop simulation");

    let contents =
        fs::read_to_string(log_dir.join("simulation.log")).expect("Failed to read log file");
    assert!(contents.contains("Simulation started with 200 flights"));
    assert!(contents.contains("taxiing in -> parked"));
    assert!(contents.contains("Simulation stopped after 100 ticks"));

    fs::remove_dir_all(&log_dir).expect("Failed to remove log directory");
}

#[test]
fn console_echo_keeps_the_log_file() {
    let log_dir = PathBuf::from("/tmp/airfield_integration_console_logs");
    let config = SimConfig::from_args([
        "--log-dir",
        "/tmp/airfield_integration_console_logs",
        "--log-console",
        "--seed",
        "6",
    ])
    .expect("Failed to parse flags");

    let sim = Simulation::new(config).expect("Failed to create simulation");
    sim.start(10).expect("Failed to start simulation");
    sim.pause();
    sim.resume();
    sim.stop().expect("Failed to stop simulation");

    let contents =
        fs::read_to_string(log_dir.join("simulation.log")).expect("Failed to read log file");
    assert!(contents.contains("Simulation started with 10 flights"));
    assert!(contents.contains("Simulation paused"));
    assert!(contents.contains("Simulation resumed"));

    fs::remove_dir_all(&log_dir).expect("Failed to remove log directory");
}

#[test]
fn custom_reference_data_is_validated() {
    let catalog = Catalog {
        airports: vec![Airport::new("LAX", "Los Angeles International", 33.9416, -118.4085)],
        airlines: vec![Airline::new("UA", "United Airlines")],
        aircraft_types: vec!["B738".to_string()],
    };

    let result = Simulation::with_reference_data(config(6, 1000), Airfield::default(), catalog);
    assert!(matches!(result, Err(SimError::EmptyCatalog(_))));
}

#[test]
fn two_airport_catalog_keeps_recycling() {
    let catalog = Catalog::new(
        vec![
            Airport::new("LAX", "Los Angeles International", 33.9416, -118.4085),
            Airport::new("SEA", "Seattle-Tacoma International", 47.4502, -122.3088),
        ],
        vec![Airline::new("AS", "Alaska Airlines")],
        vec!["B739".to_string()],
    )
    .expect("Failed to build catalog");

    let sim = Simulation::with_reference_data(config(7, 1000), Airfield::default(), catalog)
        .expect("Failed to create simulation");
    sim.start(100).expect("Failed to start simulation");
    sim.pause();

    for _ in 0..300 {
        let snapshot = sim.step().expect("Failed to step");
        for flight in snapshot.flights.iter() {
            if flight.status.is_arrival_side() {
                assert!(flight.origin == "LAX" || flight.origin == "SEA");
                assert_eq!(flight.destination, "SFO");
            }
        }
    }
    sim.stop().expect("Failed to stop simulation");
}
