//! Text helpers shared by the date parser and the table sort.

use std::cmp::Ordering;

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Lowercase `text` and strip its diacritics.
///
/// The text is NFD-decomposed and combining marks are dropped, so `ñ` folds
/// to `n` as well and "Núñez" and "Nunez" share a primary sort key. Letters
/// with no decomposition (`ø`, `ł`) are kept.
#[must_use]
pub fn fold(text: &str) -> String {
    text.to_lowercase()
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect()
}

/// Compare two strings the way a person reading the table expects.
///
/// Case and accents are ignored, and runs of digits compare by numeric value
/// ("Pedido 9" sorts before "Pedido 10"). Strings that are equal under those
/// rules fall back to plain byte order so the result is total.
#[must_use]
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let folded_a = fold(a);
    let folded_b = fold(b);
    compare_folded(&folded_a, &folded_b).then_with(|| a.cmp(b))
}

fn compare_folded(a: &str, b: &str) -> Ordering {
    let mut left = a.chars().peekable();
    let mut right = b.chars().peekable();

    loop {
        match (left.peek().copied(), right.peek().copied()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(l), Some(r)) if l.is_ascii_digit() && r.is_ascii_digit() => {
                let l_run = take_digits(&mut left);
                let r_run = take_digits(&mut right);
                let ord = compare_digit_runs(&l_run, &r_run);
                if ord != Ordering::Equal {
                    return ord;
                }
            }
            (Some(l), Some(r)) => {
                if l != r {
                    return l.cmp(&r);
                }
                left.next();
                right.next();
            }
        }
    }
}

fn take_digits(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) -> String {
    let mut run = String::new();
    while let Some(c) = chars.next_if(char::is_ascii_digit) {
        run.push(c);
    }
    run
}

// Digit runs can be arbitrarily long (phone numbers), so compare them as
// strings: fewer significant digits means a smaller number.
fn compare_digit_runs(a: &str, b: &str) -> Ordering {
    let a = a.trim_start_matches('0');
    let b = b.trim_start_matches('0');
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}
