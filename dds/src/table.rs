use crate::denomination::Denomination;
use dds_core::Seat;
use serde::{Deserialize, Serialize};

/// Tricks for one denomination and declarer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrickResult {
    pub denomination: Denomination,
    pub declarer: Seat,
    pub tricks: u8,
}

/// Double-dummy table: tricks taken by each declarer in each denomination
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DdTable {
    /// Rows follow `Denomination::ALL`, columns `Seat as usize`
    tricks: [[u8; 4]; 5],
}

impl DdTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_array(tricks: [[u8; 4]; 5]) -> Self {
        DdTable { tricks }
    }

    pub fn set_tricks(&mut self, denomination: Denomination, declarer: Seat, tricks: u8) {
        self.tricks[denomination as usize][declarer as usize] = tricks;
    }

    pub fn get_tricks(&self, denomination: Denomination, declarer: Seat) -> u8 {
        self.tricks[denomination as usize][declarer as usize]
    }

    /// Tricks by declarer for one denomination, indexed by `Seat as usize`
    pub fn row(&self, denomination: Denomination) -> [u8; 4] {
        self.tricks[denomination as usize]
    }

    pub fn as_array(&self) -> &[[u8; 4]; 5] {
        &self.tricks
    }

    /// Most tricks either member of `declarer`'s side takes in `denomination`
    pub fn side_tricks(&self, denomination: Denomination, declarer: Seat) -> u8 {
        self.get_tricks(denomination, declarer)
            .max(self.get_tricks(denomination, declarer.partner()))
    }

    pub fn all_results(&self) -> Vec<TrickResult> {
        let mut results = Vec::with_capacity(20);
        for denomination in Denomination::ALL {
            for declarer in Seat::ALL {
                results.push(TrickResult {
                    denomination,
                    declarer,
                    tricks: self.get_tricks(denomination, declarer),
                });
            }
        }
        results
    }
}

impl FromIterator<TrickResult> for DdTable {
    fn from_iter<I: IntoIterator<Item = TrickResult>>(iter: I) -> Self {
        let mut table = DdTable::new();
        for result in iter {
            table.set_tricks(result.denomination, result.declarer, result.tricks);
        }
        table
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_and_get() {
        let mut table = DdTable::new();
        table.set_tricks(Denomination::Spades, Seat::North, 10);
        assert_eq!(table.get_tricks(Denomination::Spades, Seat::North), 10);
        assert_eq!(table.get_tricks(Denomination::Spades, Seat::South), 0);
        assert_eq!(table.row(Denomination::Spades), [10, 0, 0, 0]);
        assert_eq!(table.side_tricks(Denomination::Spades, Seat::South), 10);
    }

    #[test]
    fn test_results_round_trip() {
        let table = DdTable::from_array([[8, 5, 8, 5], [7, 6, 7, 6], [8, 4, 8, 4], [10, 3, 10, 3], [9, 4, 9, 4]]);
        let results = table.all_results();
        assert_eq!(results.len(), 20);
        assert_eq!(results.into_iter().collect::<DdTable>(), table);
    }
}
