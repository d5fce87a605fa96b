//! iButton to MZone conversion.
//!
//! An iButton code is 16 hex characters: a family byte, a 6-byte serial and a
//! check byte. The MZone code is the serial read as a base-16 number and
//! written in base 10.

use crate::domain::model::{
    ConversionError, MZoneCode, NormalizedCode, ValidationError, CODE_LENGTH,
};

const SERIAL_START: usize = 2;
const SERIAL_END: usize = 14;

/// Checks `input` against the iButton format.
///
/// Rejections are reported in this order: blank input, length other than
/// 16 characters after trimming, first non-hex character.
pub fn validate(input: &str) -> Result<NormalizedCode, ValidationError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyInput);
    }

    let length = trimmed.chars().count();
    if length != CODE_LENGTH {
        return Err(ValidationError::WrongLength { length });
    }

    if let Some((position, character)) = trimmed
        .chars()
        .enumerate()
        .find(|(_, c)| !c.is_ascii_hexdigit())
    {
        return Err(ValidationError::InvalidCharacter {
            character,
            position,
        });
    }

    Ok(NormalizedCode::from_validated(trimmed.to_ascii_uppercase()))
}

/// Converts a raw iButton code into its MZone code.
pub fn convert(input: &str) -> Result<MZoneCode, ConversionError> {
    let code = validate(input)?;
    mzone(&code)
}

/// Derives the MZone code from an already validated iButton code.
pub fn mzone(code: &NormalizedCode) -> Result<MZoneCode, ConversionError> {
    decode_serial(&code.as_str()[SERIAL_START..SERIAL_END])
}

/// Parses a serial field as base-16 after dropping leading zeros.
///
/// An all-zero field yields `0`. Anything that is not plain hex digits, or
/// that does not fit in 48 bits, is a [`ConversionError::Parse`].
pub fn decode_serial(field: &str) -> Result<MZoneCode, ConversionError> {
    let parse_error = || ConversionError::Parse {
        field: field.to_string(),
    };

    // from_str_radix tolerates a leading '+', the format does not
    if !field.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(parse_error());
    }

    let digits = match field.trim_start_matches('0') {
        "" => "0",
        rest => rest,
    };

    let value = u64::from_str_radix(digits, 16).map_err(|_| parse_error())?;
    MZoneCode::try_from(value).map_err(|_| parse_error())
}

/// Trimmed, upper-cased form of `input` for display. Does not validate.
pub fn format(input: &str) -> String {
    input.trim().to_ascii_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::ErrorKind;

    fn decimal(input: &str) -> String {
        convert(input).unwrap().to_string()
    }

    #[test]
    fn test_convert_known_codes() {
        // serial 000001A00BC4 -> 0x1A00BC4
        assert_eq!(decimal("0C000001A00BC401"), "27265988");
        assert_eq!(decimal("0C00000ABCDEF401"), "180150004");
    }

    #[test]
    fn test_convert_ignores_family_and_check_bytes() {
        assert_eq!(decimal("FF000001A00BC4AA"), decimal("0C000001A00BC401"));
    }

    #[test]
    fn test_all_zero_serial_is_zero() {
        assert_eq!(decimal("0C00000000000001"), "0");
        assert_eq!(decode_serial("000000000000").unwrap().value(), 0);
    }

    #[test]
    fn test_full_width_serial_is_exact() {
        assert_eq!(decimal("01FFFFFFFFFFFF01"), "281474976710655");
        assert_eq!(
            convert("01FFFFFFFFFFFF01").unwrap().value(),
            MZoneCode::MAX
        );
    }

    #[test]
    fn test_convert_is_case_insensitive_and_trims() {
        assert_eq!(decimal("0c00000abcdef401"), "180150004");
        assert_eq!(decimal("  0C00000AbCdEf401\t\n"), "180150004");
    }

    #[test]
    fn test_validate_normalizes() {
        let code = validate(" 0c000001a00bc401 ").unwrap();
        assert_eq!(code.as_str(), "0C000001A00BC401");
        assert_eq!(code.family(), "0C");
        assert_eq!(code.serial(), "000001A00BC4");
        assert_eq!(code.check(), "01");
    }

    #[test]
    fn test_validate_empty() {
        assert_eq!(validate(""), Err(ValidationError::EmptyInput));
        assert_eq!(validate("   \t "), Err(ValidationError::EmptyInput));
        assert_eq!(
            convert(""),
            Err(ConversionError::InvalidFormat(ValidationError::EmptyInput))
        );
    }

    #[test]
    fn test_validate_wrong_length() {
        assert_eq!(
            validate("0C000001A00BC4"),
            Err(ValidationError::WrongLength { length: 14 })
        );
        assert_eq!(
            validate("0C000001A00BC4010"),
            Err(ValidationError::WrongLength { length: 17 })
        );
        // the earlier 15-digit form is no longer accepted
        assert_eq!(
            validate("3F0000011566603"),
            Err(ValidationError::WrongLength { length: 15 })
        );
    }

    #[test]
    fn test_validate_length_checked_before_characters() {
        for input in ["G", "XYZ", "0C000001A00BC4G01Z"] {
            let err = validate(input).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::WrongLength, "input {:?}", input);
        }
    }

    #[test]
    fn test_validate_invalid_character() {
        assert_eq!(
            validate("0C000001A00BCG01"),
            Err(ValidationError::InvalidCharacter {
                character: 'G',
                position: 13
            })
        );
        assert_eq!(
            validate("zC000001A00BC401").unwrap_err().kind(),
            ErrorKind::InvalidCharacter
        );
    }

    #[test]
    fn test_non_ascii_counts_characters_not_bytes() {
        let err = validate("0C000001A00BC4É1").unwrap_err();
        assert_eq!(
            err,
            ValidationError::InvalidCharacter {
                character: 'É',
                position: 14
            }
        );
    }

    #[test]
    fn test_decode_serial_guards() {
        assert_eq!(decode_serial("1A").unwrap().value(), 26);
        assert_eq!(decode_serial("").unwrap().value(), 0);
        for field in ["+1", "-1", "1G", "1000000000000"] {
            assert_eq!(
                decode_serial(field).unwrap_err().kind(),
                ErrorKind::ParseError,
                "field {:?}",
                field
            );
        }
    }

    #[test]
    fn test_output_is_plain_decimal() {
        let samples = [
            "0000000000000000",
            "00000000000001FF",
            "0C000001A00BC401",
            "3F00000ABCDEF123",
            "01FFFFFFFFFFFF01",
            "aa0102030405060b",
        ];
        for input in samples {
            let out = decimal(input);
            assert!(out.bytes().all(|b| b.is_ascii_digit()), "{}", out);
            assert!(out == "0" || !out.starts_with('0'), "{}", out);
        }
    }

    #[test]
    fn test_format_is_idempotent() {
        for input in ["", "  abc ", "0c000001a00bc401", "\tÀb\n", "ẞx"] {
            let once = format(input);
            assert_eq!(format(&once), once);
            assert_eq!(once.chars().count(), input.trim().chars().count());
        }
        assert_eq!(format("  0c0g  "), "0C0G");
    }
}
