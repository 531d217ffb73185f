use colored::Colorize;
use comfy_table::{Cell, CellAlignment, ContentArrangement, Table};

use crate::cards::{Card, Suit};
use crate::equity::SimulationResult;
use crate::ranges::{HandShape, PositionalProfile, RangeTables, ALL_CATEGORIES};

const RANGE_GRID_RANKS: [char; 13] = ['A', 'K', 'Q', 'J', 'T', '9', '8', '7', '6', '5', '4', '3', '2'];

/// 13x13 starting-hand grid with `shapes` highlighted. Pairs sit on the
/// diagonal, suited hands above it, offsuit below.
pub fn range_grid(shapes: &[HandShape], title: &str) -> String {
    let in_range: std::collections::HashSet<String> = shapes.iter().map(|s| s.to_string()).collect();

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);

    let mut header = vec![Cell::new("")];
    for &r in &RANGE_GRID_RANKS {
        header.push(Cell::new(r).set_alignment(CellAlignment::Center));
    }
    table.set_header(header);

    for (i, &r1) in RANGE_GRID_RANKS.iter().enumerate() {
        let mut row = vec![Cell::new(format!("{}", r1).bold().to_string())];
        for (j, &r2) in RANGE_GRID_RANKS.iter().enumerate() {
            let hand = if i == j {
                format!("{}{}", r1, r2)
            } else if i < j {
                format!("{}{}s", r1, r2)
            } else {
                format!("{}{}o", r2, r1)
            };

            let cell = if in_range.contains(&hand) {
                Cell::new(hand.green().bold().to_string())
            } else {
                Cell::new(hand.dimmed().to_string())
            };
            row.push(cell.set_alignment(CellAlignment::Center));
        }
        table.add_row(row);
    }

    format!("  {}\n{}", title.bold(), table)
}

pub fn profile_table(tables: &RangeTables, profile: PositionalProfile) -> String {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("Category"),
        Cell::new("Weight").set_alignment(CellAlignment::Right),
        Cell::new("Hands"),
    ]);

    for category in ALL_CATEGORIES {
        let weight = tables.weight(profile, category);
        let hands = tables
            .shapes(category)
            .iter()
            .map(|s| s.to_string())
            .collect::<Vec<_>>()
            .join(" ");
        let name = if weight > 0.0 {
            category.as_str().bold().to_string()
        } else {
            category.as_str().dimmed().to_string()
        };
        table.add_row(vec![
            Cell::new(name),
            Cell::new(format!("{:.0}%", weight * 100.0)).set_alignment(CellAlignment::Right),
            Cell::new(hands),
        ]);
    }

    table.to_string()
}

pub fn result_table(result: &SimulationResult) -> String {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![Cell::new(""), Cell::new("")]);
    table.add_row(vec![
        Cell::new("Win".bold().to_string()),
        Cell::new(format!("{:.1}%", result.win_chance * 100.0)),
    ]);
    table.add_row(vec![
        Cell::new("Lose".bold().to_string()),
        Cell::new(format!("{:.1}%", result.lose_chance * 100.0)),
    ]);
    table.add_row(vec![
        Cell::new("Hand".bold().to_string()),
        Cell::new(result.your_hand_type.bold().to_string()),
    ]);
    table.add_row(vec![
        Cell::new("Sims".bold().to_string()),
        Cell::new(format!("{}", result.num_simulations)),
    ]);
    table.to_string()
}

pub fn equity_bar(equity: f64, width: usize) -> String {
    let filled = ((equity.clamp(0.0, 1.0) * width as f64) as usize).min(width);
    let bar: String = "\u{2588}".repeat(filled) + &"\u{2591}".repeat(width - filled);
    let pct = format!("{:.1}%", equity * 100.0);

    if equity >= 0.6 {
        format!("{} {}", bar.green(), pct)
    } else if equity >= 0.4 {
        format!("{} {}", bar.yellow(), pct)
    } else {
        format!("{} {}", bar.red(), pct)
    }
}

pub fn board_display(cards: &[Card]) -> String {
    if cards.is_empty() {
        return "-".dimmed().to_string();
    }
    cards
        .iter()
        .map(|card| {
            let pretty = card.pretty();
            match card.suit {
                Suit::Spades => pretty.white().to_string(),
                Suit::Hearts => pretty.red().to_string(),
                Suit::Diamonds => pretty.blue().to_string(),
                Suit::Clubs => pretty.green().to_string(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn print_section(title: &str, content: &str) {
    println!("\n{}", title.cyan().bold());
    println!("  {}", content);
}

pub fn print_error(msg: &str) {
    eprintln!("{} {}", "Error:".red().bold(), msg);
}
