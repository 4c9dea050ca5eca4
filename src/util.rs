use chrono::NaiveDateTime;

pub(crate) fn urljoin(base: &str, path: &str) -> String {
    if path.starts_with("http://") || path.starts_with("https://") {
        return path.to_string();
    }
    let base = base.trim_end_matches('/');
    if path.starts_with('/') {
        format!("{}{}", base, path)
    } else {
        format!("{}/{}", base, path)
    }
}

/// Shows only the first eight characters of a key.
pub fn mask_key(key: &str) -> String {
    let prefix: String = key.chars().take(8).collect();
    format!("{}...", prefix)
}

/// `<prefix>_<YYYYMMDD_HHMMSS>.<ext>`
pub fn timestamped_filename(prefix: &str, at: NaiveDateTime, ext: &str) -> String {
    format!("{}_{}.{}", prefix, at.format("%Y%m%d_%H%M%S"), ext)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn urljoin_handles_slashes() {
        assert_eq!(
            urljoin("https://api.sec.or.th/", "/FundFactsheet/fund/amc"),
            "https://api.sec.or.th/FundFactsheet/fund/amc"
        );
        assert_eq!(
            urljoin("https://api.sec.or.th", "FundFactsheet/fund/amc"),
            "https://api.sec.or.th/FundFactsheet/fund/amc"
        );
        assert_eq!(urljoin("http://a", "https://b/c"), "https://b/c");
    }

    #[test]
    fn mask_key_keeps_prefix() {
        assert_eq!(mask_key("618a3ffe11944da0"), "618a3ffe...");
        assert_eq!(mask_key("abc"), "abc...");
    }

    #[test]
    fn timestamped_filename_format() {
        let at = NaiveDate::from_ymd_opt(2025, 1, 31)
            .unwrap()
            .and_hms_opt(9, 5, 7)
            .unwrap();
        assert_eq!(
            timestamped_filename("scb_rmf_funds", at, "csv"),
            "scb_rmf_funds_20250131_090507.csv"
        );
    }
}
