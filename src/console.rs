/***************************************/
/*           Local modules             */
/***************************************/
use crate::elevator::{Command, StatusUpdate};
use crate::shared::{ElevatorState, Phase};

/***************************************/
/*               Enums                 */
/***************************************/
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Input {
    Command(Command),
    Status,
    Quit,
}

/***************************************/
/*           Public functions          */
/***************************************/

/// Parses one console line. Blank lines give `Ok(None)`.
pub fn parse_input(line: &str) -> Result<Option<Input>, String> {
    let mut words = line.split_whitespace();
    let input = match words.next() {
        None => return Ok(None),
        Some("reset") => Input::Command(Command::Reset),
        Some("status") => Input::Status,
        Some("quit") | Some("exit") => Input::Quit,
        Some("speed") => {
            let value = words.next().ok_or("usage: speed <seconds per floor>")?;
            let speed = value
                .parse::<f64>()
                .map_err(|e| format!("invalid speed `{}`: {}", value, e))?;
            Input::Command(Command::SetTravelSpeed(speed))
        }
        Some(word) => {
            let floor = word
                .parse::<u8>()
                .map_err(|_| format!("unknown command `{}`", word))?;
            Input::Command(Command::RequestFloor(floor))
        }
    };
    Ok(Some(input))
}

/// Parses `--floors`, e.g. `4, 2,6`. Empty entries are skipped.
pub fn parse_floor_list(list: &str) -> Result<Vec<u8>, std::num::ParseIntError> {
    list.split(',')
        .map(str::trim)
        .filter(|floor| !floor.is_empty())
        .map(str::parse::<u8>)
        .collect()
}

/// Travel time changes every frame while moving; only report the rest.
pub fn milestone_changed(previous: &ElevatorState, current: &ElevatorState) -> bool {
    previous.floor != current.floor
        || previous.direction != current.direction
        || previous.phase != current.phase
        || previous.visited != current.visited
        || previous.destinations != current.destinations
        || previous.travel_speed != current.travel_speed
}

/// Stopped with nothing queued and the travel time already rounded off.
pub fn is_settled(state: &ElevatorState) -> bool {
    state.phase == Phase::Idle && state.destinations.is_empty() && state.travel_time.fract() == 0.0
}

/**
 * Decides whether `--exit-when-idle` may end the program.
 *
 * Input must be closed and every command sent must be acknowledged by `update`,
 * otherwise an idle state published before a pending command would end the run early.
 */
pub fn should_exit(
    exit_when_idle: bool,
    console_open: bool,
    commands_sent: u64,
    update: &StatusUpdate,
) -> bool {
    exit_when_idle && !console_open && update.commands >= commands_sent && is_settled(&update.state)
}

/***************************************/
/*             Unit tests              */
/***************************************/
