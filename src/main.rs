/* 3rd party libraries */
use clap::{Arg, ArgMatches};
use crossbeam_channel as cbc;
use log::{info, warn};
use std::io::BufRead;
use std::path::Path;
use std::thread::Builder;
use std::time::Duration;

/* Custom libraries */
use elevator_sim::config::{self, Config};
use elevator_sim::console::{self, Input};
use elevator_sim::elevator::{Command, NoopObserver, Simulation, StatusUpdate};
use elevator_sim::unwrap_or_exit;
use elevator_sim::ElevatorState;

/* Main */
fn main() -> std::io::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let matches = cli().get_matches();

    // Load the configuration
    let config = load_config(&matches);
    let json = matches.is_present("json");
    let exit_when_idle = matches.is_present("exit-when-idle");
    let initial_floors = match matches.value_of("floors") {
        Some(list) => unwrap_or_exit!(console::parse_floor_list(list)),
        None => Vec::new(),
    };

    // Initialize channels
    let (command_tx, command_rx) = cbc::unbounded::<Command>();
    let (status_tx, status_rx) = cbc::unbounded::<StatusUpdate>();
    let (terminate_tx, terminate_rx) = cbc::unbounded::<()>();
    let (input_tx, input_rx) = cbc::unbounded::<Input>();

    // Start the simulation
    let frame_interval = Duration::from_millis(config.simulation.frame_interval_ms);
    let simulation = Simulation::new(&config, NoopObserver);
    let simulation_thread = Builder::new()
        .name("elevator_simulation".into())
        .spawn(move || simulation.run(frame_interval, command_rx, status_tx, terminate_rx))?;

    // Start reading commands from the console
    Builder::new()
        .name("console_input".into())
        .spawn(move || read_console(input_tx))?;

    let mut commands_sent: u64 = 0;
    for floor in initial_floors.iter() {
        if command_tx.send(Command::RequestFloor(*floor)).is_ok() {
            commands_sent += 1;
        }
    }
    info!(
        "Elevator ready with {} floors. Type a floor number, `speed <sec>`, `reset`, `status` or `quit`.",
        config.elevator.n_floors
    );

    // Main loop
    let mut last_update = StatusUpdate {
        commands: 0,
        state: ElevatorState::new(config.elevator.travel_speed),
    };
    let mut console_open = true;
    let console_closed = cbc::never::<Input>();
    loop {
        let console_rx = if console_open { &input_rx } else { &console_closed };
        cbc::select! {
            recv(status_rx) -> update => {
                match update {
                    Ok(update) => {
                        if console::milestone_changed(&last_update.state, &update.state) {
                            print_state(&update.state, json);
                        }
                        last_update = update;
                    }
                    Err(_) => break,
                }
            },
            recv(console_rx) -> input => {
                match input {
                    Ok(Input::Command(command)) => {
                        if command_tx.send(command).is_ok() {
                            commands_sent += 1;
                        }
                    }
                    Ok(Input::Status) => print_state(&last_update.state, json),
                    Ok(Input::Quit) => break,
                    // End of input: keep serving when asked to finish the queue
                    Err(_) if exit_when_idle => console_open = false,
                    Err(_) => break,
                }
            },
        }

        if console::should_exit(exit_when_idle, console_open, commands_sent, &last_update) {
            print_state(&last_update.state, json);
            break;
        }
    }

    let _ = terminate_tx.send(());
    if simulation_thread.join().is_err() {
        warn!("Simulation thread panicked");
    }
    Ok(())
}

/***************************************/
/*          Private functions          */
/***************************************/
fn cli() -> clap::Command<'static> {
    clap::Command::new("elevator-sim")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Headless single-car elevator simulation")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .takes_value(true)
                .default_value("config.toml")
                .help("Path to the TOML configuration file"),
        )
        .arg(
            Arg::new("speed")
                .short('s')
                .long("speed")
                .takes_value(true)
                .help("Travel speed in seconds per floor, overrides the configuration"),
        )
        .arg(
            Arg::new("floors")
                .short('f')
                .long("floors")
                .takes_value(true)
                .help("Comma-separated floors to request on start, e.g. 4,2,6"),
        )
        .arg(
            Arg::new("exit-when-idle")
                .long("exit-when-idle")
                .help("Exit once standard input is closed and every requested floor has been served"),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .help("Print status updates as JSON lines"),
        )
}

fn load_config(matches: &ArgMatches) -> Config {
    let path = matches.value_of("config").unwrap_or("config.toml");
    let mut config = if Path::new(path).exists() {
        info!("Loading configuration from {}", path);
        unwrap_or_exit!(config::load_config(path))
    } else {
        warn!("Configuration file {} not found, using defaults", path);
        Config::default()
    };

    if let Some(speed) = matches.value_of("speed") {
        config.elevator.travel_speed = unwrap_or_exit!(speed.parse::<f64>());
        unwrap_or_exit!(config.validate());
    }
    config
}

fn read_console(input_tx: cbc::Sender<Input>) {
    let stdin = std::io::stdin();
    for line in stdin.lock().lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                warn!("Failed to read console input: {}", e);
                break;
            }
        };
        match console::parse_input(&line) {
            Ok(Some(input)) => {
                if input_tx.send(input).is_err() {
                    return;
                }
            }
            Ok(None) => (),
            Err(e) => warn!("{}", e),
        }
    }
}

fn print_state(state: &ElevatorState, json: bool) {
    if json {
        match serde_json::to_string(state) {
            Ok(line) => println!("{}", line),
            Err(e) => warn!("Failed to serialize status: {}", e),
        }
    } else {
        println!("[{}] {}", state.phase, state);
    }
}
