//! Target label colors
//!
//! Every target gets a stable color derived from its name so that headers for
//! the same target look alike across runs.

use colored::*;

/// Get a consistent color for a target name
pub fn get_target_color(target_name: &str) -> Color {
    let hash = target_name
        .bytes()
        .fold(0u64, |acc, b| acc.wrapping_mul(31).wrapping_add(b as u64));

    // Label palette; red and green are left for failure and success markers
    const PALETTE: [Color; 6] = [
        Color::TrueColor { r: 147, g: 112, b: 219 },
        Color::TrueColor { r: 64, g: 224, b: 208 },
        Color::TrueColor { r: 255, g: 140, b: 0 },
        Color::TrueColor { r: 199, g: 21, b: 133 },
        Color::TrueColor { r: 72, g: 209, b: 204 },
        Color::TrueColor { r: 138, g: 43, b: 226 },
    ];

    PALETTE[(hash % PALETTE.len() as u64) as usize]
}
