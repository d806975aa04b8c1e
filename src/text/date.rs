use chrono::Datelike;

const MONTHS: [&str; 12] = [
    "jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep", "oct", "nov", "dec",
];

/// Expand a two-digit year relative to the current calendar year.
pub fn to_four_digit_year(year: &str) -> String {
    to_four_digit_year_relative(year, chrono::Local::now().year())
}

/// How far past `this_year` an expanded two-digit year may land.
const YEARS_AHEAD: i32 = 10;

/// Expand a two-digit year to the latest year ending in those digits that is at most
/// [`YEARS_AHEAD`] years after `this_year`.
///
/// Anything that is not exactly two ASCII digits is returned trimmed but otherwise untouched.
pub fn to_four_digit_year_relative(year: &str, this_year: i32) -> String {
    let year = year.trim();
    if year.len() != 2 || !year.bytes().all(|b| b.is_ascii_digit()) {
        return year.to_string();
    }
    let Ok(two_digits) = year.parse::<i32>() else {
        return year.to_string();
    };

    let century = this_year - this_year.rem_euclid(100);
    let mut full = century + two_digits;
    if full > this_year + YEARS_AHEAD {
        full -= 100;
    } else if full <= this_year + YEARS_AHEAD - 100 {
        full += 100;
    }
    full.to_string()
}

/// Map a month name, BibTeX month macro, or number to 1..=12.
///
/// Accepts `3`, `03`, `mar`, `#mar#`, `March`; returns `None` for anything else.
pub fn month_number(month: &str) -> Option<u32> {
    let month = month.replace('#', "");
    let month = month.trim().to_lowercase();
    if let Ok(n) = month.parse::<u32>() {
        return (1..=12).contains(&n).then_some(n);
    }
    MONTHS
        .iter()
        .position(|abbr| month.starts_with(abbr))
        .and_then(|i| u32::try_from(i + 1).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn two_digit_years_lean_towards_the_past() {
        assert_eq!(to_four_digit_year_relative("76", 2026), "1976");
        assert_eq!(to_four_digit_year_relative("50", 2026), "1950");
    }

    #[test]
    fn two_digit_years_pick_the_nearest_century() {
        assert_eq!(to_four_digit_year_relative("99", 2026), "1999");
        assert_eq!(to_four_digit_year_relative("20", 2026), "2020");
        assert_eq!(to_four_digit_year_relative("26", 2026), "2026");
        assert_eq!(to_four_digit_year_relative("36", 2026), "2036");
        assert_eq!(to_four_digit_year_relative("37", 2026), "1937");
        assert_eq!(to_four_digit_year_relative("05", 1995), "2005");
        assert_eq!(to_four_digit_year_relative("06", 1995), "1906");
        assert_eq!(to_four_digit_year_relative("05", 2099), "2105");
    }

    #[test]
    fn other_years_pass_through() {
        assert_eq!(to_four_digit_year_relative("1999", 2026), "1999");
        assert_eq!(to_four_digit_year_relative(" 2001 ", 2026), "2001");
        assert_eq!(to_four_digit_year_relative("n.d.", 2026), "n.d.");
        assert_eq!(to_four_digit_year_relative("9", 2026), "9");
    }

    #[test]
    fn ninety_nine_agrees_with_nineteen_ninety_nine() {
        for this_year in [2000, 2026, 2060, 2088] {
            assert_eq!(
                to_four_digit_year_relative("99", this_year),
                to_four_digit_year_relative("1999", this_year)
            );
        }
    }

    #[test]
    fn months_by_name_macro_and_number() {
        assert_eq!(month_number("March"), Some(3));
        assert_eq!(month_number("Jan"), Some(1));
        assert_eq!(month_number("#dec#"), Some(12));
        assert_eq!(month_number(" 7 "), Some(7));
        assert_eq!(month_number("09"), Some(9));
        assert_eq!(month_number("13"), None);
        assert_eq!(month_number("0"), None);
        assert_eq!(month_number("spring"), None);
        assert_eq!(month_number(""), None);
    }

    #[test]
    fn expanded_years_stay_within_the_window() {
        proptest::proptest!(|(yy in 0u32..100, this_year in 1900i32..2200)| {
            let expanded = to_four_digit_year_relative(&format!("{yy:02}"), this_year);
            let n: i32 = expanded.parse().expect("numeric");
            proptest::prop_assert!(n - this_year <= YEARS_AHEAD);
            proptest::prop_assert!(n - this_year > YEARS_AHEAD - 100);
            proptest::prop_assert_eq!(n.rem_euclid(100), yy as i32);
        })
    }
}
