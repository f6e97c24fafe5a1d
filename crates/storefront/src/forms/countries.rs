//! Countries offered in the address selects.

/// `(ISO 3166-1 alpha-2 code, English name)`, sorted by name.
pub const COUNTRIES: &[(&str, &str)] = &[
    ("ar", "Argentina"),
    ("au", "Australia"),
    ("at", "Austria"),
    ("be", "Belgium"),
    ("br", "Brazil"),
    ("ca", "Canada"),
    ("cl", "Chile"),
    ("cn", "China"),
    ("co", "Colombia"),
    ("cz", "Czech Republic"),
    ("dk", "Denmark"),
    ("eg", "Egypt"),
    ("fi", "Finland"),
    ("fr", "France"),
    ("de", "Germany"),
    ("gr", "Greece"),
    ("in", "India"),
    ("id", "Indonesia"),
    ("ie", "Ireland"),
    ("il", "Israel"),
    ("it", "Italy"),
    ("jp", "Japan"),
    ("ke", "Kenya"),
    ("lv", "Latvia"),
    ("my", "Malaysia"),
    ("mx", "Mexico"),
    ("ma", "Morocco"),
    ("nl", "Netherlands"),
    ("nz", "New Zealand"),
    ("ng", "Nigeria"),
    ("no", "Norway"),
    ("pe", "Peru"),
    ("ph", "Philippines"),
    ("pl", "Poland"),
    ("pt", "Portugal"),
    ("ru", "Russia"),
    ("sa", "Saudi Arabia"),
    ("sg", "Singapore"),
    ("za", "South Africa"),
    ("kr", "South Korea"),
    ("es", "Spain"),
    ("se", "Sweden"),
    ("ch", "Switzerland"),
    ("th", "Thailand"),
    ("tr", "Turkey"),
    ("ua", "Ukraine"),
    ("ae", "United Arab Emirates"),
    ("gb", "United Kingdom"),
    ("us", "United States"),
    ("vn", "Vietnam"),
];

/// One `<option>` of a country select.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountryOption {
    pub code: &'static str,
    pub name: &'static str,
    pub selected: bool,
}

/// All countries, with `selected` (case-insensitive) marked.
#[must_use]
pub fn options(selected: &str) -> Vec<CountryOption> {
    COUNTRIES
        .iter()
        .map(|&(code, name)| CountryOption {
            code,
            name,
            selected: code.eq_ignore_ascii_case(selected.trim()),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_options_mark_selection() {
        let opts = options("DE");
        let selected: Vec<_> = opts.iter().filter(|o| o.selected).collect();

        assert_eq!(selected.len(), 1);
        assert_eq!(selected.first().map(|o| o.name), Some("Germany"));
        assert!(options("").iter().all(|o| !o.selected));
    }

    #[test]
    fn test_codes_are_lowercase_and_unique() {
        let mut codes: Vec<_> = COUNTRIES.iter().map(|(code, _)| *code).collect();
        assert!(codes.iter().all(|c| c.len() == 2 && c.chars().all(|ch| ch.is_ascii_lowercase())));
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), COUNTRIES.len());
    }
}
