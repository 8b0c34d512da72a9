//! Phone and date formatting helpers.

use chrono::NaiveDate;

/// Country calling code applied to phone numbers.
pub const COUNTRY_CODE: &str = "90";

/// Number of subscriber digits after the country code.
const SUBSCRIBER_DIGITS: usize = 10;

fn digits_only(input: &str) -> String {
    input.chars().filter(char::is_ascii_digit).collect()
}

/// Count the ASCII digits in `input`.
#[must_use]
pub fn digit_count(input: &str) -> usize {
    input.chars().filter(char::is_ascii_digit).count()
}

/// Format a phone number as `+(90) XXX XXX XX XX` while it is being typed.
///
/// A leading country code or trunk `0` is dropped before grouping and input
/// beyond the subscriber length is ignored.
#[must_use]
pub fn format_phone_input(input: &str) -> String {
    let cleaned = digits_only(input);
    let subscriber = cleaned
        .strip_prefix(COUNTRY_CODE)
        .or_else(|| cleaned.strip_prefix('0'))
        .unwrap_or(&cleaned);
    let digits: String = subscriber.chars().take(SUBSCRIBER_DIGITS).collect();

    let mut result = format!("+({COUNTRY_CODE}) ");
    for (start, end) in [(0, 3), (3, 6), (6, 8), (8, 10)] {
        if digits.len() > start {
            if start > 0 {
                result.push(' ');
            }
            result.push_str(&digits[start..end.min(digits.len())]);
        }
    }
    result.trim_end().to_string()
}

/// Format a canonical phone number as `+(90) XXX XXX XXXX` for display.
///
/// Numbers that are not exactly country code plus subscriber digits are
/// returned unchanged.
#[must_use]
pub fn format_phone(phone: &str) -> String {
    let cleaned = digits_only(phone);
    if cleaned.len() != COUNTRY_CODE.len() + SUBSCRIBER_DIGITS {
        return phone.to_string();
    }
    let (country, rest) = cleaned.split_at(COUNTRY_CODE.len());
    format!(
        "+({country}) {} {} {}",
        &rest[0..3],
        &rest[3..6],
        &rest[6..10]
    )
}

/// Reduce any phone representation to canonical `+<country><digits>` form.
#[must_use]
pub fn canonical_phone(phone: &str) -> String {
    format!("+{}", digits_only(phone))
}

/// Format a date as `DD/MM/YYYY`.
#[must_use]
pub fn format_date(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

/// Format an optional date, rendering a missing one as an empty string.
#[must_use]
pub fn format_optional_date(date: Option<NaiveDate>) -> String {
    date.map(format_date).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_phone_input_progressive() {
        assert_eq!(format_phone_input(""), "+(90)");
        assert_eq!(format_phone_input("53"), "+(90) 53");
        assert_eq!(format_phone_input("5321"), "+(90) 532 1");
        assert_eq!(format_phone_input("5321234"), "+(90) 532 123 4");
        assert_eq!(format_phone_input("532123456"), "+(90) 532 123 45 6");
        assert_eq!(format_phone_input("5321234567"), "+(90) 532 123 45 67");
    }

    #[test]
    fn test_format_phone_input_strips_prefixes() {
        assert_eq!(format_phone_input("905321234567"), "+(90) 532 123 45 67");
        assert_eq!(format_phone_input("05321234567"), "+(90) 532 123 45 67");
        assert_eq!(
            format_phone_input("+(90) 532 123 45 67"),
            "+(90) 532 123 45 67"
        );
    }

    #[test]
    fn test_format_phone_input_truncates() {
        assert_eq!(format_phone_input("532123456789"), "+(90) 532 123 45 67");
    }

    #[test]
    fn test_format_phone_display() {
        assert_eq!(format_phone("+905321234567"), "+(90) 532 123 4567");
        assert_eq!(format_phone("12345"), "12345");
    }

    #[test]
    fn test_canonical_phone() {
        assert_eq!(canonical_phone("+(90) 532 123 45 67"), "+905321234567");
        assert_eq!(canonical_phone("+905321234567"), "+905321234567");
    }

    #[test]
    fn test_digit_count() {
        assert_eq!(digit_count("+(90) 532 123 45 67"), 12);
        assert_eq!(digit_count("+(90)"), 2);
    }

    #[test]
    fn test_format_date() {
        let date = NaiveDate::from_ymd_opt(2022, 9, 23).unwrap();
        assert_eq!(format_date(date), "23/09/2022");
        assert_eq!(format_optional_date(None), "");
    }
}
