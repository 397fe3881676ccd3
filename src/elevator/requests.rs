/***************************************/
/*           Local modules             */
/***************************************/
use crate::shared::Direction;

/***************************************/
/*             Public API              */
/***************************************/

/**
 * Orders floor requests using the elevator scan policy.
 *
 * Floors ahead of `reference_floor` in `direction` (inclusive) come first, nearest first.
 * The floors behind follow, starting from the one closest to the turning point.
 * Duplicates are dropped.
 *
 * # Arguments
 * - `floors`:          The requested floors, in any order.
 * - `reference_floor`: The committed next stop, or the current floor when nothing is queued.
 * - `direction`:       The current scan direction.
 */
pub fn sort_floors(floors: &[u8], reference_floor: u8, direction: Direction) -> Vec<u8> {
    let (mut ahead, mut behind): (Vec<u8>, Vec<u8>) = floors
        .iter()
        .copied()
        .partition(|&floor| is_ahead(floor, reference_floor, direction));

    match direction {
        Direction::Up => {
            ahead.sort_unstable();
            behind.sort_unstable_by(|a, b| b.cmp(a));
        }
        Direction::Down => {
            ahead.sort_unstable_by(|a, b| b.cmp(a));
            behind.sort_unstable();
        }
    }
    ahead.dedup();
    behind.dedup();

    ahead.extend(behind);
    ahead
}

/**
 * Decides the scan direction for the next leg.
 *
 * Moving up, the elevator turns down when nothing queued lies above `current_floor`
 * or when it stands at the top floor. Moving down is symmetric. An empty queue
 * leaves the direction as it is.
 */
pub fn update_direction(
    direction: Direction,
    current_floor: u8,
    queue: &[u8],
    n_floors: u8,
) -> Direction {
    if queue.is_empty() {
        return direction;
    }

    let at_end = match direction {
        Direction::Up => current_floor == n_floors,
        Direction::Down => current_floor == 1,
    };

    if at_end || !has_floor_in_direction(current_floor, queue, direction) {
        direction.opposite()
    } else {
        direction
    }
}

/// Whether any queued floor lies strictly beyond `current_floor` in `direction`.
pub fn has_floor_in_direction(current_floor: u8, queue: &[u8], direction: Direction) -> bool {
    match direction {
        Direction::Up => queue.iter().any(|&floor| floor > current_floor),
        Direction::Down => queue.iter().any(|&floor| floor < current_floor),
    }
}

/***************************************/
/*          Private functions          */
/***************************************/
fn is_ahead(floor: u8, reference_floor: u8, direction: Direction) -> bool {
    match direction {
        Direction::Up => floor >= reference_floor,
        Direction::Down => floor <= reference_floor,
    }
}
