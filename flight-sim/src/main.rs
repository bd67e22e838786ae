use std::{
    env,
    io::{self, Write},
    sync::mpsc,
    thread,
    time::Duration,
};

use simulator::{SimConfig, SimError, Simulation};

fn clean_scr() {
    print!("\x1B[2J\x1B[1;1H");
    io::stdout().flush().ok();
}

fn start(sim: &Simulation, args: &[&str]) -> Result<(), SimError> {
    match args.get(1) {
        Some(count) => sim.start(count.parse().map_err(|_| SimError::InvalidInput)?)?,
        None => sim.start_default()?,
    }

    println!(
        "Simulation started with {} flights.",
        sim.snapshot()?.flights.len()
    );
    Ok(())
}

fn set_tick_rate(sim: &Simulation) -> Result<(), SimError> {
    let millis_input =
        prompt_input("Enter the tick interval (in milliseconds): ").ok_or(SimError::InvalidInput)?;
    let millis: u64 = millis_input.parse().map_err(|_| SimError::InvalidInput)?;

    sim.set_tick_interval(millis)
}

fn step(sim: &Simulation) -> Result<(), SimError> {
    let snapshot = sim.step()?;
    println!("Tick {} done.", snapshot.tick);
    Ok(())
}

fn print_summary(sim: &Simulation) -> Result<(), SimError> {
    let snapshot = sim.snapshot()?;
    println!(
        "Tick {} at {}",
        snapshot.tick,
        snapshot.time.format("%d-%m-%Y %H:%M:%S")
    );
    println!("\n{:<15} {:<10}", "Status", "Flights");
    for (status, count) in sim.status_counts()? {
        println!("{:<15} {:<10}", status.as_str(), count);
    }
    println!("{:<15} {:<10}", "total", snapshot.flights.len());
    Ok(())
}

/// Displays the flights in real time until Enter is pressed
fn display_flights(sim: &Simulation) {
    let (tx, rx) = mpsc::channel();

    thread::spawn(move || {
        let mut buffer = String::new();
        if io::stdin().read_line(&mut buffer).is_ok() {
            tx.send(()).ok();
        }
    });

    loop {
        if let Ok(snapshot) = sim.snapshot() {
            clean_scr();
            println!(
                "Tick {} at {}",
                snapshot.tick,
                snapshot.time.format("%d-%m-%Y %H:%M:%S")
            );
            if snapshot.flights.is_empty() {
                println!("No flights available.");
            } else {
                println!(
                    "\n{:<10} {:<6} {:<12} {:<6} {:<6} {:<6} {:<10} {:<10} {:<7} {:<6} {:<6}",
                    "Flight",
                    "Type",
                    "Status",
                    "Gate",
                    "From",
                    "To",
                    "Latitude",
                    "Longitude",
                    "Heading",
                    "Speed",
                    "Alt"
                );
                for flight in snapshot.flights.iter().filter(|f| f.status.is_in_motion()) {
                    println!(
                        "{:<10} {:<6} {:<12} {:<6} {:<6} {:<6} {:<10.4} {:<10.4} {:<7.1} {:<6.0} {:<6}",
                        flight.flight_number,
                        flight.aircraft_type,
                        flight.status.as_str(),
                        flight.gate.as_deref().unwrap_or("-"),
                        flight.origin,
                        flight.destination,
                        flight.position.latitude,
                        flight.position.longitude,
                        flight.heading,
                        flight.speed,
                        flight.altitude
                    );
                }
            }
            println!("\nPress Enter to exit list-flights mode");
        }

        if rx.try_recv().is_ok() {
            break;
        }

        let interval = sim
            .tick_interval()
            .unwrap_or_else(|_| sim.config().tick_interval);
        thread::sleep(interval.max(Duration::from_millis(200)));
    }
}

fn main() -> Result<(), SimError> {
    let config = SimConfig::from_args(env::args().skip(1))?;
    let sim = Simulation::new(config)?;

    loop {
        println!("Enter command (type '-h' or '--help' for options): ");
        let Some(command) = prompt_input("") else {
            break;
        };

        let args: Vec<&str> = command.split_whitespace().collect();
        if args.is_empty() {
            continue;
        }

        let result = match args[0] {
            "start" => start(&sim, &args),
            "stop" => sim.stop().map(|_| println!("Simulation stopped")),
            "pause" => {
                sim.pause();
                println!("Simulation paused");
                Ok(())
            }
            "resume" => {
                sim.resume();
                println!("Simulation resumed");
                Ok(())
            }
            "step" => step(&sim),
            "list-flights" => {
                display_flights(&sim);
                Ok(())
            }
            "summary" => {
                clean_scr();
                print_summary(&sim)
            }
            "tick-rate" => {
                clean_scr();
                set_tick_rate(&sim)
            }
            "-h" | "--help" | "help" => {
                print_help();
                Ok(())
            }
            "exit" => break,
            _ => {
                eprintln!("Invalid command. Use -h for help.");
                Ok(())
            }
        };

        if let Err(e) = result {
            println!("{}", e);
        }
    }

    if sim.is_running() {
        sim.stop()?;
    }
    Ok(())
}

/// Reads one trimmed line, `None` once stdin is closed.
fn prompt_input(prompt: &str) -> Option<String> {
    print!("{}", prompt);
    io::stdout().flush().ok();
    let mut input = String::new();
    match io::stdin().read_line(&mut input) {
        Ok(0) | Err(_) => None,
        Ok(_) => Some(input.trim().to_string()),
    }
}

fn print_help() {
    clean_scr();
    println!("Available commands:");
    println!("  start [count]");
    println!("    Generates a fleet (default size from --fleet-size) and starts ticking.");
    println!("  stop");
    println!("    Stops ticking. The last state of the fleet is kept.");
    println!("  pause");
    println!("    Pauses the simulation.");
    println!("  resume");
    println!("    Resumes the simulation.");
    println!("  step");
    println!("    Runs a single tick while stopped or paused.");
    println!("  list-flights");
    println!("    Shows the moving flights in real time.");
    println!("  summary");
    println!("    Shows how many flights are in each status.");
    println!("  tick-rate");
    println!("    Changes the time between ticks.");
    println!("  exit");
    println!("    Closes this application.");
}
