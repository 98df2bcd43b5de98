use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::{Decimal, RoundingStrategy};
use thiserror::Error;

use crate::core::assets::asset::{Amount, Asset, AssetId};

/// Decimal places of every displayed amount
pub const DISPLAY_PRECISION: u32 = 6;

/// Displayed when the entered amount doesn't start with a number
pub const ZERO_AMOUNT_TEXT: &str = "0";

/// Significant digits a decimal mantissa can hold
const MAX_DIGITS: usize = 28;

/// Past this many divisions by ten any mantissa has rounded to zero
const MAX_NEGATIVE_EXPONENT: u64 = 60;

/// Leading number of the text: sign, integer part, fraction, exponent
static AMOUNT_PREFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<sign>[+-]?)(?P<int>\d*)(?:\.(?P<frac>\d+))?(?:[eE](?P<exp>[+-]?\d+))?")
        .expect("amount pattern is valid")
});

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConversionError {
    #[error("destination asset `{0}` has zero USD price")]
    ZeroDestinationPrice(AssetId),

    #[error("amount is out of range converting `{0}` to `{1}`")]
    Overflow(AssetId, AssetId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParsedAmount {
    Number(Amount),
    /// Numeric text whose magnitude is beyond `Decimal`
    TooLarge,
    NotANumber,
}

/// Reads the number the text starts with, like `12` from `12abc` or `1000` from `1e3 USD`.
/// Magnitudes below the decimal precision read as zero.
pub fn parse_amount(text: &str) -> ParsedAmount {
    let captures = match AMOUNT_PREFIX.captures(text.trim_start()) {
        Some(captures) => captures,
        None => return ParsedAmount::NotANumber,
    };

    let group = |name| captures.name(name).map_or("", |x| x.as_str());
    let (sign, int, frac, exp) = (group("sign"), group("int"), group("frac"), group("exp"));
    if int.is_empty() && frac.is_empty() {
        return ParsedAmount::NotANumber;
    }

    let int = int.trim_start_matches('0');
    let frac = &frac[..frac.len().min(MAX_DIGITS.saturating_sub(int.len()))];
    let mut mantissa = format!(
        "{}{}",
        if sign == "-" { "-" } else { "" },
        if int.is_empty() { "0" } else { int }
    );
    if !frac.is_empty() {
        mantissa.push('.');
        mantissa.push_str(frac);
    }
    let mantissa = match Decimal::from_str(&mantissa) {
        Ok(mantissa) => mantissa,
        Err(_) => return ParsedAmount::TooLarge,
    };

    let exponent = match exp {
        "" => 0,
        exp => exp.parse::<i64>().unwrap_or(if exp.starts_with('-') {
            i64::MIN
        } else {
            i64::MAX
        }),
    };

    scale_by_power_of_ten(mantissa, exponent)
}

fn scale_by_power_of_ten(mut value: Amount, exponent: i64) -> ParsedAmount {
    if value.is_zero() {
        return ParsedAmount::Number(Decimal::ZERO);
    }

    if exponent >= 0 {
        // fractional digits move left of the point without touching the mantissa
        let shift = exponent.min(i64::from(value.scale()));
        if value.set_scale(value.scale() - shift as u32).is_err() {
            return ParsedAmount::TooLarge;
        }

        for _ in 0..exponent - shift {
            value = match value.checked_mul(Decimal::TEN) {
                Some(value) => value,
                None => return ParsedAmount::TooLarge,
            };
        }
    } else {
        for _ in 0..exponent.unsigned_abs().min(MAX_NEGATIVE_EXPONENT) {
            value = value.checked_div(Decimal::TEN).unwrap_or(Decimal::ZERO);
        }
        if value.is_zero() {
            value = Decimal::ZERO;
        }
    }

    ParsedAmount::Number(value)
}

/// `amount` of `from` expressed in `to`, through both USD prices
pub fn convert_amount(amount: Amount, from: &Asset, to: &Asset) -> Result<Amount, ConversionError> {
    if to.price_usd.is_zero() {
        return Err(ConversionError::ZeroDestinationPrice(to.id.clone()));
    }

    amount
        .checked_mul(from.price_usd)
        .and_then(|usd_amount| usd_amount.checked_div(to.price_usd))
        .ok_or_else(|| ConversionError::Overflow(from.id.clone(), to.id.clone()))
}

pub fn format_amount(amount: Amount) -> String {
    let rounded =
        amount.round_dp_with_strategy(DISPLAY_PRECISION, RoundingStrategy::MidpointAwayFromZero);

    format!("{:.*}", DISPLAY_PRECISION as usize, rounded)
}

/// Converts entered text between two selected assets.
/// Returns `None` when an asset isn't selected yet so the caller keeps its previous value,
/// and the zero amount text when the input doesn't start with a number.
pub fn convert(
    amount_text: &str,
    from: Option<&Asset>,
    to: Option<&Asset>,
) -> Result<Option<String>, ConversionError> {
    let (from, to) = match (from, to) {
        (Some(from), Some(to)) => (from, to),
        _ => return Ok(None),
    };

    let amount = match parse_amount(amount_text) {
        ParsedAmount::Number(amount) => amount,
        ParsedAmount::TooLarge => {
            return Err(ConversionError::Overflow(from.id.clone(), to.id.clone()))
        }
        ParsedAmount::NotANumber => return Ok(Some(ZERO_AMOUNT_TEXT.to_owned())),
    };

    let converted = convert_amount(amount, from, to)?;
    log::trace!(
        "Converted {} {} -> {} {}",
        amount,
        from.symbol,
        converted,
        to.symbol
    );

    Ok(Some(format_amount(converted)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::assets::asset::Price;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    fn asset(id: &str, price: Price) -> Asset {
        Asset::new(id.into(), id.into(), id, price)
    }

    fn convert_text(amount_text: &str, from: &Asset, to: &Asset) -> String {
        convert(amount_text, Some(from), Some(to))
            .expect("in test")
            .expect("in test")
    }

    #[test]
    fn in_house_to_usd() {
        let ccy = asset("choccyswap", dec!(0.017));
        let usd = asset("usd", dec!(1));

        assert_eq!(convert_text("1000", &ccy, &usd), "17.000000");
    }

    fn number(amount_text: &str) -> Amount {
        match parse_amount(amount_text) {
            ParsedAmount::Number(amount) => amount,
            other => panic!("{:?} parsed as {:?}", amount_text, other),
        }
    }

    #[rstest]
    #[case("abc")]
    #[case("")]
    #[case("   ")]
    #[case("-")]
    #[case(".")]
    #[case("e5")]
    #[case("NaN")]
    #[case("Infinity")]
    #[case("$12")]
    fn not_a_number_gives_zero(#[case] amount_text: &str) {
        let btc = asset("bitcoin", dec!(60000));
        let eth = asset("ethereum", dec!(3000));

        assert_eq!(convert_text(amount_text, &btc, &eth), "0");
    }

    #[rstest]
    #[case("1000.00", "1000.000000")]
    #[case("0.1234564", "0.123456")]
    #[case("0.1234565", "0.123457")]
    #[case("-2.5", "-2.500000")]
    #[case(" 42 ", "42.000000")]
    #[case("1e3", "1000.000000")]
    #[case("12abc", "12.000000")]
    #[case("3.25 USD", "3.250000")]
    #[case("1.5e2xyz", "150.000000")]
    #[case("+5", "5.000000")]
    #[case(".5", "0.500000")]
    #[case("7.", "7.000000")]
    #[case("0007.25", "7.250000")]
    #[case("-0", "0.000000")]
    #[case("1e-30", "0.000000")]
    #[case("0.0000000000000000000000000000000001", "0.000000")]
    #[case("2.5E-3", "0.002500")]
    fn identity_conversion(#[case] amount_text: &str, #[case] expected: &str) {
        let eth = asset("ethereum", dec!(3123.45));

        assert_eq!(convert_text(amount_text, &eth, &eth), expected);
    }

    #[rstest]
    #[case("1000", dec!(0.017), dec!(1))]
    #[case("0.5", dec!(61234.56), dec!(3012.1))]
    #[case("123.456", dec!(1), dec!(1.08))]
    #[case("7", dec!(0.000012), dec!(2.5))]
    fn round_trip(#[case] amount_text: &str, #[case] price_a: Price, #[case] price_b: Price) {
        let a = asset("a", price_a);
        let b = asset("b", price_b);

        let there = convert_text(amount_text, &a, &b);
        let back = convert_text(&there, &b, &a);

        let original = number(amount_text);
        let back = number(&back);
        // one display rounding on each leg
        let tolerance = dec!(0.000001) * (price_b / price_a + dec!(1));
        assert!(
            (original - back).abs() <= tolerance,
            "{} -> {} -> {}",
            original,
            there,
            back
        );
    }

    #[test]
    fn missing_asset_keeps_previous_value() {
        let usd = asset("usd", dec!(1));

        assert_eq!(convert("10", None, Some(&usd)), Ok(None));
        assert_eq!(convert("10", Some(&usd), None), Ok(None));
        assert_eq!(convert("10", None, None), Ok(None));
    }

    #[test]
    fn zero_destination_price_is_rejected() {
        let usd = asset("usd", dec!(1));
        let broken = asset("broken", dec!(0));

        assert_eq!(
            convert("10", Some(&usd), Some(&broken)),
            Err(ConversionError::ZeroDestinationPrice("broken".into()))
        );
    }

    #[rstest]
    #[case("1e30")]
    #[case("-1e30")]
    #[case("100000000000000000000000000000")]
    #[case("1e99999999999999999999")]
    fn amount_beyond_decimal_range_is_overflow(#[case] amount_text: &str) {
        let eth = asset("ethereum", dec!(3000));

        assert_eq!(parse_amount(amount_text), ParsedAmount::TooLarge);
        assert_eq!(
            convert(amount_text, Some(&eth), Some(&eth)),
            Err(ConversionError::Overflow("ethereum".into(), "ethereum".into()))
        );
    }

    #[rstest]
    #[case("1e28", dec!(10000000000000000000000000000))]
    #[case("12.5e-2", dec!(0.125))]
    #[case("  -4.75", dec!(-4.75))]
    #[case("1e-99999999999999999999", dec!(0))]
    fn leading_number_is_read(#[case] amount_text: &str, #[case] expected: Amount) {
        assert_eq!(parse_amount(amount_text), ParsedAmount::Number(expected));
    }

    #[test]
    fn overflow_is_rejected() {
        let huge = asset("huge", Decimal::MAX);
        let tiny = asset("tiny", dec!(0.0000001));

        assert_eq!(
            convert_amount(Decimal::MAX, &huge, &tiny),
            Err(ConversionError::Overflow("huge".into(), "tiny".into()))
        );
    }
}
