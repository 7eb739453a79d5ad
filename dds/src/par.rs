//! Par scores from a double-dummy table.
//!
//! Both sides bid with full knowledge of the table. A side that outbids the
//! opponents plays its contract undoubled when it makes and doubled when it
//! fails. Each side takes the best line for itself, working back from the
//! highest possible bid.

use crate::denomination::Denomination;
use crate::table::DdTable;
use dds_core::Seat;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Vulnerability {
    #[default]
    None,
    NorthSouth,
    EastWest,
    Both,
}

impl Vulnerability {
    pub fn is_vulnerable(&self, seat: Seat) -> bool {
        match self {
            Vulnerability::None => false,
            Vulnerability::NorthSouth => seat.is_north_south(),
            Vulnerability::EastWest => !seat.is_north_south(),
            Vulnerability::Both => true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contract {
    pub level: u8,
    pub denomination: Denomination,
    pub declarer: Seat,
    pub doubled: bool,
    /// Tricks the declarer takes double dummy
    pub tricks: u8,
}

impl Contract {
    pub fn makes(&self) -> bool {
        self.tricks >= self.level + 6
    }

    /// Score for the declaring side
    pub fn score(&self, vulnerable: bool) -> i32 {
        contract_score(self.level, self.denomination, self.tricks, self.doubled, vulnerable)
    }
}

/// `4S-N`, `5HX-E`
impl fmt::Display for Contract {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}{}-{}",
            self.level,
            self.denomination,
            if self.doubled { "X" } else { "" },
            self.declarer.to_char()
        )
    }
}

/// Par outcome. `contract` is `None` when the deal is passed out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParResult {
    /// Score from North-South's point of view
    pub score: i32,
    pub contract: Option<Contract>,
}

impl fmt::Display for ParResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.contract {
            Some(contract) => write!(f, "Par {:+} {}", self.score, contract),
            None => write!(f, "Par 0 passed out"),
        }
    }
}

fn trick_value(denomination: Denomination) -> i32 {
    if denomination.is_minor() {
        20
    } else {
        30
    }
}

/// Duplicate score for the declaring side (no redoubles)
pub fn contract_score(level: u8, denomination: Denomination, tricks: u8, doubled: bool, vulnerable: bool) -> i32 {
    let needed = level as i32 + 6;
    let tricks = tricks as i32;

    if tricks < needed {
        let down = needed - tricks;
        return -if !doubled {
            down * if vulnerable { 100 } else { 50 }
        } else if vulnerable {
            200 + (down - 1) * 300
        } else {
            match down {
                1 => 100,
                2 => 300,
                3 => 500,
                _ => 500 + (down - 3) * 300,
            }
        };
    }

    let mut points = level as i32 * trick_value(denomination);
    if denomination == Denomination::NoTrump {
        points += 10;
    }
    if doubled {
        points *= 2;
    }

    let mut score = points;
    score += if points >= 100 {
        if vulnerable {
            500
        } else {
            300
        }
    } else {
        50
    };
    score += match (level, vulnerable) {
        (6, false) => 500,
        (6, true) => 750,
        (7, false) => 1000,
        (7, true) => 1500,
        _ => 0,
    };

    let overtricks = tricks - needed;
    if doubled {
        score += 50 + overtricks * if vulnerable { 200 } else { 100 };
    } else {
        score += overtricks * trick_value(denomination);
    }
    score
}

const BIDS: usize = 35;

/// A line of the auction: value for the side it belongs to and the final
/// contract
type Line = (i32, Option<Contract>);

fn negate(line: Line) -> Line {
    (-line.0, line.1)
}

/// First line unless the second is strictly better
fn better(first: Line, second: Line) -> Line {
    if second.0 > first.0 {
        second
    } else {
        first
    }
}

fn bid(index: usize) -> (u8, Denomination) {
    ((index / 5) as u8 + 1, Denomination::ALL[index % 5])
}

/// Par score and contract for `table`, with `dealer` first to bid
pub fn par(table: &DdTable, vulnerability: Vulnerability, dealer: Seat) -> ParResult {
    // Side 0 is North-South, side 1 East-West
    const SIDES: [[Seat; 2]; 2] = [[Seat::North, Seat::South], [Seat::East, Seat::West]];

    let own_line = |side: usize, index: usize| -> Line {
        let (level, denomination) = bid(index);
        let [first, second] = SIDES[side];
        let declarer = if table.get_tricks(denomination, second) > table.get_tricks(denomination, first) {
            second
        } else {
            first
        };
        let tricks = table.get_tricks(denomination, declarer);
        let mut contract = Contract {
            level,
            denomination,
            declarer,
            doubled: false,
            tricks,
        };
        contract.doubled = !contract.makes();
        (contract.score(vulnerability.is_vulnerable(declarer)), Some(contract))
    };

    // best[side] is the best line over bids above the one being considered
    let mut best: [Option<Line>; 2] = [None, None];
    for index in (0..BIDS).rev() {
        let mut lines = [(0, None); 2];
        for side in 0..2 {
            let own = own_line(side, index);
            lines[side] = match best[1 - side] {
                // Opponents outbid when that is better for them than defending
                Some(theirs) if theirs.0 > -own.0 => negate(theirs),
                _ => own,
            };
        }
        for side in 0..2 {
            best[side] = Some(match best[side] {
                Some(previous) => better(lines[side], previous),
                None => lines[side],
            });
        }
    }

    let first = if dealer.is_north_south() { 0 } else { 1 };
    let second = 1 - first;
    let open = |side: usize| best[side].unwrap_or((i32::MIN, None));
    let passed_out: Line = (0, None);

    // Each side gets two turns to open before the deal is passed out
    let last = better(open(second), passed_out);
    let third = better(open(first), negate(last));
    let second_turn = better(open(second), negate(third));
    let first_turn = better(open(first), negate(second_turn));

    let score = if first == 0 { first_turn.0 } else { -first_turn.0 };
    ParResult {
        score,
        contract: first_turn.1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Table rows are C, D, H, S, NT; columns N, E, S, W
    fn table(rows: [[u8; 4]; 5]) -> DdTable {
        DdTable::from_array(rows)
    }

    #[test]
    fn test_made_contract_scores() {
        use Denomination::*;
        assert_eq!(contract_score(4, Spades, 10, false, false), 420);
        assert_eq!(contract_score(4, Spades, 11, false, true), 650);
        assert_eq!(contract_score(3, NoTrump, 9, false, false), 400);
        assert_eq!(contract_score(1, NoTrump, 7, false, false), 90);
        assert_eq!(contract_score(2, Clubs, 8, false, false), 90);
        assert_eq!(contract_score(5, Diamonds, 11, false, true), 600);
        assert_eq!(contract_score(6, Hearts, 12, false, false), 980);
        assert_eq!(contract_score(7, NoTrump, 13, false, true), 2220);
        // Doubled into game
        assert_eq!(contract_score(2, Hearts, 8, true, false), 470);
        assert_eq!(contract_score(1, Clubs, 8, true, true), 340);
    }

    #[test]
    fn test_undertrick_penalties() {
        use Denomination::*;
        assert_eq!(contract_score(4, Spades, 9, false, false), -50);
        assert_eq!(contract_score(4, Spades, 8, false, true), -200);
        let doubled_nv: Vec<i32> = (1..=5).map(|down| contract_score(7, Clubs, 13 - down, true, false)).collect();
        assert_eq!(doubled_nv, vec![-100, -300, -500, -800, -1100]);
        let doubled_v: Vec<i32> = (1..=4).map(|down| contract_score(7, Clubs, 13 - down, true, true)).collect();
        assert_eq!(doubled_v, vec![-200, -500, -800, -1100]);
    }

    #[test]
    fn test_passed_out() {
        let t = table([[6; 4]; 5]);
        let result = par(&t, Vulnerability::Both, Seat::North);
        assert_eq!(result.score, 0);
        assert_eq!(result.contract, None);
        assert_eq!(result.to_string(), "Par 0 passed out");
    }

    #[test]
    fn test_part_score() {
        let t = table([[6, 7, 6, 7]; 5]);
        let result = par(&t, Vulnerability::None, Seat::North);
        assert_eq!(result.score, -90);
        let contract = result.contract.unwrap();
        assert_eq!(contract.level, 1);
        assert_eq!(contract.denomination, Denomination::NoTrump);
        assert!(!contract.doubled);
        assert!(!contract.declarer.is_north_south());
    }

    #[test]
    fn test_game_contract() {
        let t = table([[6, 7, 6, 7], [6, 7, 6, 7], [6, 7, 6, 7], [10, 3, 10, 3], [6, 7, 6, 7]]);
        for dealer in Seat::ALL {
            let result = par(&t, Vulnerability::None, dealer);
            assert_eq!(result.score, 420, "dealer {dealer}");
            let contract = result.contract.unwrap();
            assert_eq!(contract.to_string(), "4S-N");
        }
    }

    #[test]
    fn test_sacrifice() {
        let t = table([[6, 7, 6, 7], [6, 7, 6, 7], [4, 9, 4, 9], [10, 3, 10, 3], [6, 7, 6, 7]]);
        let result = par(&t, Vulnerability::NorthSouth, Seat::North);
        assert_eq!(result.score, 300);
        let contract = result.contract.unwrap();
        assert_eq!(contract.to_string(), "5HX-E");
        assert_eq!(contract.tricks, 9);
        assert_eq!(result.to_string(), "Par +300 5HX-E");
    }

    #[test]
    fn test_higher_declarer_chosen() {
        let t = table([[6, 7, 6, 7], [6, 7, 6, 7], [6, 7, 6, 7], [9, 3, 10, 3], [6, 7, 6, 7]]);
        let contract = par(&t, Vulnerability::None, Seat::North).contract.unwrap();
        assert_eq!(contract.declarer, Seat::South);
        assert_eq!(contract.tricks, 10);
    }
}
