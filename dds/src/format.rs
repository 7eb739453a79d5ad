//! Text output for tables and deals

use crate::denomination::Denomination;
use crate::table::DdTable;
use dds_core::{Deal, Seat, Suit};
use std::fmt::Write;

/// Contract level that `tricks` make, if any
pub fn tricks_to_level(tricks: u8) -> Option<u8> {
    tricks.checked_sub(6).filter(|&level| level > 0)
}

/// Tricks per declarer and denomination:
///
/// ```text
///     C  D  H  S NT
/// N   8  7  8 10  9
/// ```
pub fn format_table(table: &DdTable) -> String {
    let mut out = String::from("  ");
    for denomination in Denomination::ALL {
        let _ = write!(out, "{:>3}", denomination.to_string());
    }
    out.push('\n');
    for seat in Seat::ALL {
        out.push(seat.to_char());
        out.push(' ');
        for denomination in Denomination::ALL {
            let _ = write!(out, "{:>3}", table.get_tricks(denomination, seat));
        }
        out.push('\n');
    }
    out
}

/// Highest making level per declarer, `-` when nothing makes. Rows are
/// ordered North, South, West, East.
pub fn format_levels(table: &DdTable) -> String {
    let mut out = String::from("  C D H S NT\n");
    for seat in [Seat::North, Seat::South, Seat::West, Seat::East] {
        let mut row = String::new();
        row.push(seat.to_char());
        for denomination in Denomination::ALL {
            row.push(' ');
            match tricks_to_level(table.get_tricks(denomination, seat)) {
                Some(level) => {
                    let _ = write!(row, "{level}");
                }
                None => row.push('-'),
            }
        }
        out.push_str(&row);
        out.push('\n');
    }
    out
}

fn suit_line(deal: &Deal, seat: Seat, suit: Suit) -> String {
    let text = deal.hand(seat).suit_text(suit);
    format!("{}{}", suit.symbol(), if text.is_empty() { "-" } else { &text })
}

/// Four-hand diagram with North on top
pub fn format_deal(deal: &Deal) -> String {
    let width = |seat: Seat| {
        Suit::DISPLAY_ORDER
            .iter()
            .map(|&suit| suit_line(deal, seat, suit).chars().count())
            .max()
            .unwrap_or(0)
    };
    let west_width = width(Seat::West);
    let indent = " ".repeat(west_width + 1);
    let box_rows = ["┌────┐", "│    │", "│    │", "└────┘"];

    let mut lines = Vec::with_capacity(12);
    for suit in Suit::DISPLAY_ORDER {
        lines.push(format!("{indent}{}", suit_line(deal, Seat::North, suit)));
    }
    for (suit, middle) in Suit::DISPLAY_ORDER.iter().zip(box_rows) {
        let west = suit_line(deal, Seat::West, *suit);
        let pad = west_width - west.chars().count();
        lines.push(format!(
            "{west}{} {middle} {}",
            " ".repeat(pad),
            suit_line(deal, Seat::East, *suit)
        ));
    }
    for suit in Suit::DISPLAY_ORDER {
        lines.push(format!("{indent}{}", suit_line(deal, Seat::South, suit)));
    }
    let mut out = lines.join("\n");
    out.push('\n');
    out
}
