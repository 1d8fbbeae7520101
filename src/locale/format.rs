//! Long-date and number formatting for the `en-US` and `ar-EG` locales.

use chrono::{Datelike, NaiveDate};

use super::Language;

const MONTHS_EN: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

const MONTHS_AR: [&str; 12] = [
    "يناير",
    "فبراير",
    "مارس",
    "أبريل",
    "مايو",
    "يونيو",
    "يوليو",
    "أغسطس",
    "سبتمبر",
    "أكتوبر",
    "نوفمبر",
    "ديسمبر",
];

const ARABIC_GROUP_SEPARATOR: char = '\u{066C}';
const ARABIC_DECIMAL_SEPARATOR: char = '\u{066B}';
const ARABIC_LETTER_MARK: char = '\u{061C}';
const MAX_FRACTION_DIGITS: usize = 3;

pub fn format_date(language: Language, date: NaiveDate) -> String {
    let month_index = date.month0() as usize;
    match language {
        Language::English => format!("{} {}, {}", MONTHS_EN[month_index], date.day(), date.year()),
        Language::Arabic => format!(
            "{} {} {}",
            to_arabic_digits(&date.day().to_string()),
            MONTHS_AR[month_index],
            to_arabic_digits(&date.year().to_string())
        ),
    }
}

pub fn format_number(language: Language, value: f64) -> String {
    if value.is_nan() {
        return match language {
            Language::English => "NaN".to_string(),
            Language::Arabic => "ليس رقم".to_string(),
        };
    }
    if value.is_infinite() {
        let sign = if value < 0.0 { "-" } else { "" };
        return format!("{sign}∞");
    }

    let rounded = format!("{:.*}", MAX_FRACTION_DIGITS, value.abs());
    let (integer, fraction) = rounded.split_once('.').unwrap_or((rounded.as_str(), ""));
    let fraction = fraction.trim_end_matches('0');
    let negative = value < 0.0 && (integer != "0" || !fraction.is_empty());

    let (group, decimal) = match language {
        Language::English => (',', '.'),
        Language::Arabic => (ARABIC_GROUP_SEPARATOR, ARABIC_DECIMAL_SEPARATOR),
    };

    let mut out = group_thousands(integer, group);
    if !fraction.is_empty() {
        out.push(decimal);
        out.push_str(fraction);
    }

    match language {
        Language::English => {
            if negative {
                out.insert(0, '-');
            }
            out
        }
        Language::Arabic => {
            let digits = to_arabic_digits(&out);
            if negative {
                format!("{ARABIC_LETTER_MARK}-{digits}")
            } else {
                digits
            }
        }
    }
}

fn group_thousands(integer: &str, separator: char) -> String {
    let digits: Vec<char> = integer.chars().collect();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, digit) in digits.iter().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            out.push(separator);
        }
        out.push(*digit);
    }
    out
}

pub fn to_arabic_digits(text: &str) -> String {
    text.chars()
        .map(|ch| match ch.to_digit(10) {
            Some(digit) if ch.is_ascii_digit() => {
                char::from_u32(0x0660 + digit).unwrap_or(ch)
            }
            _ => ch,
        })
        .collect()
}
