//! Additive ("old") Roman numeral encoding.
//!
//! Old numerals predate the subtractive convention: every digit only ever
//! adds to the total, so 4 is `IIII` and 9 is `VIIII`.

use super::RomanError;

/// Digit values from greatest to least. Subtractive pairs (IV, IX, XL, ...)
/// are deliberately absent.
const CONVERSION_TABLE: [(i64, char); 6] = [
    (1000, 'M'),
    (100, 'C'),
    (50, 'L'),
    (10, 'X'),
    (5, 'V'),
    (1, 'I'),
];

/// Convert a number to its "old" (additive-only) Roman numeral.
///
/// Zero has no Roman numeral; it is rendered as the literal `"0"` so the
/// calculator always has something to display. Values outside 0-3999 are
/// rejected with [`RomanError::OutOfRange`].
pub fn old_roman(input: i64) -> Result<String, RomanError> {
    if input == 0 {
        return Ok("0".to_string());
    }
    if !(1..=3999).contains(&input) {
        return Err(RomanError::OutOfRange { value: input });
    }

    // Cycle through the digits from greatest (M) to least (I), subtracting
    // each value as many times as it fits and appending one symbol per
    // subtraction.
    let mut remainder = input;
    let mut result = String::new();
    for (value, symbol) in CONVERSION_TABLE {
        while remainder >= value {
            result.push(symbol);
            remainder -= value;
        }
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Sum of symbol values. For additive numerals this inverts the encoding.
    fn parse_additive(numeral: &str) -> i64 {
        numeral
            .chars()
            .map(|c| match c {
                'M' => 1000,
                'C' => 100,
                'L' => 50,
                'X' => 10,
                'V' => 5,
                'I' => 1,
                _ => 0,
            })
            .sum()
    }

    #[test]
    fn test_zero_is_literal_zero() {
        assert_eq!(old_roman(0).unwrap(), "0");
    }

    #[test]
    fn test_no_subtractive_pairs() {
        assert_eq!(old_roman(4).unwrap(), "IIII");
        assert_eq!(old_roman(9).unwrap(), "VIIII");
        assert_eq!(old_roman(14).unwrap(), "XIIII");
        assert_eq!(old_roman(40).unwrap(), "XXXX");
        assert_eq!(old_roman(90).unwrap(), "LXXXX");
        assert_eq!(old_roman(400).unwrap(), "CCCC");
        // The digit table carries no D, so 900 is nine C's.
        assert_eq!(old_roman(900).unwrap(), "CCCCCCCCC");
    }

    #[test]
    fn test_known_values() {
        assert_eq!(old_roman(1).unwrap(), "I");
        assert_eq!(old_roman(3).unwrap(), "III");
        assert_eq!(old_roman(1000).unwrap(), "M");
        assert_eq!(old_roman(1666).unwrap(), "MCCCCCCLXVI");
        assert_eq!(old_roman(3999).unwrap(), "MMMCCCCCCCCCLXXXXVIIII");
    }

    #[test]
    fn test_out_of_range() {
        assert!(matches!(
            old_roman(-1),
            Err(RomanError::OutOfRange { value: -1 })
        ));
        assert!(matches!(
            old_roman(4000),
            Err(RomanError::OutOfRange { value: 4000 })
        ));
    }

    #[test]
    fn test_round_trip_full_range() {
        for n in 1..=3999 {
            let numeral = old_roman(n).unwrap();
            assert!(
                numeral.chars().all(|c| "MCLXVI".contains(c)),
                "unexpected character in {numeral}"
            );
            assert_eq!(parse_additive(&numeral), n, "mismatch for {n}");
        }
    }
}
