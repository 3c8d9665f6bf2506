//! Character substitutions between the three renderings of a description: the machine number
//! (digits `1`-`7`), the standard description (letters `A C D L R N ;`) and base 7 (digits
//! `0`-`6`). Every mapping is total; characters outside a mapping's domain fall back to a fixed
//! value instead of failing.

use crate::types::Symbol;

/// Standard description letters, indexed by machine-number digit minus one.
const LETTERS: [char; 7] = ['A', 'C', 'D', 'L', 'R', 'N', ';'];

/// Maps a machine-number digit to its base-7 digit. Anything else maps to `0`.
pub fn digit_to_base7(c: char) -> char {
    match c {
        '1'..='7' => char::from(c as u8 - 1),
        _ => '0',
    }
}

/// Maps a base-7 digit back to its machine-number digit. Anything else maps to `0`.
pub fn base7_to_digit(c: char) -> char {
    match c {
        '0'..='6' => char::from(c as u8 + 1),
        _ => '0',
    }
}

/// Maps a machine-number digit to its standard description letter. Anything else maps to `N`.
pub fn digit_to_letter(c: char) -> char {
    c.to_digit(10)
        .and_then(|d| LETTERS.get((d as usize).checked_sub(1)?))
        .copied()
        .unwrap_or('N')
}

/// Maps a standard description letter to its machine-number digit. Anything else maps to `0`.
pub fn letter_to_digit(c: char) -> char {
    LETTERS
        .iter()
        .position(|&letter| letter == c)
        .and_then(|i| char::from_digit(i as u32 + 1, 10))
        .unwrap_or('0')
}

/// Maps a `C`-run symbol number to a tape symbol. Unknown numbers read as blank.
pub fn symbol_for_number(n: usize) -> Symbol {
    match n {
        1 => Symbol::Zero,
        2 => Symbol::One,
        _ => Symbol::Blank,
    }
}

pub fn machine_number_to_base7(text: &str) -> String {
    text.chars().map(digit_to_base7).collect()
}

pub fn base7_to_machine_number(text: &str) -> String {
    text.chars().map(base7_to_digit).collect()
}

pub fn machine_number_to_standard_description(text: &str) -> String {
    text.chars().map(digit_to_letter).collect()
}

pub fn standard_description_to_machine_number(text: &str) -> String {
    text.chars().map(letter_to_digit).collect()
}
