/// Countries served when the request does not name any.
pub(crate) const DEFAULT_COUNTRIES: &str = "FI,SE,NO,DK";

/// Static catalog of country code -> ENTSO-E bidding-zone EIC code.
/// One representative zone per country.
pub(crate) fn zone_for(country: &str) -> Option<&'static str> {
    match country {
        "FI" => Some("10YFI-1--------U"),
        "SE" => Some("10Y1001A1001A46L"),
        "NO" => Some("10YNO-2--------T"),
        "DK" => Some("10Y1001A1001A65H"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_countries_resolve() {
        for code in DEFAULT_COUNTRIES.split(',') {
            assert!(zone_for(code).is_some(), "{} should have a zone", code);
        }
    }

    #[test]
    fn test_unknown_country_has_no_zone() {
        assert!(zone_for("XX").is_none());
        assert!(zone_for("fi").is_none());
    }
}
