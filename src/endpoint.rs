/// A path relative to the API base URL plus a label used for reporting and as
/// the key in aggregated results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub path: String,
    pub label: String,
}

impl Endpoint {
    pub fn new(path: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            label: label.into(),
        }
    }
}

const FACTSHEET_SECTIONS: &[(&str, &str)] = &[
    ("specification", "Fund Specification"),
    ("asset", "Asset Allocation"),
    ("policy", "Investment Policy"),
    ("risk", "Risk Information"),
    ("fee", "Fee Structure"),
    ("performance", "Fund Performance"),
    ("return", "Return Information"),
    ("dividend", "Dividend History"),
    ("FundPort/latest", "Fund Holdings (Latest)"),
    ("FundTop5/latest", "Top 5 Holdings (Latest)"),
    ("benchmark", "Benchmark Information"),
    ("suitability", "Fund Suitability"),
    ("redemption", "Redemption Information"),
    ("InvolveParty", "Involved Parties"),
    ("investment", "Investment Information"),
    ("project_type", "Project Type"),
    ("turnover_ratio", "Turnover Ratio"),
    ("5YearLost", "5-Year Loss Probability"),
];

/// Every factsheet section for one fund project, in reporting order.
pub fn factsheet_endpoints(proj_id: &str) -> Vec<Endpoint> {
    FACTSHEET_SECTIONS
        .iter()
        .map(|(section, label)| {
            Endpoint::new(format!("/FundFactsheet/fund/{}/{}", proj_id, section), *label)
        })
        .collect()
}

pub fn amc_list() -> Endpoint {
    Endpoint::new("/FundFactsheet/fund/amc", "AMC List")
}

pub fn funds_by_amc(amc_id: &str) -> Endpoint {
    Endpoint::new(format!("/FundFactsheet/fund/amc/{}", amc_id), "Funds by AMC")
}

pub fn fund_assets(proj_id: &str) -> Endpoint {
    Endpoint::new(format!("/FundFactsheet/fund/{}/asset", proj_id), "Asset Allocation")
}

pub fn daily_nav(proj_id: &str, nav_date: &str) -> Endpoint {
    Endpoint::new(
        format!("/FundDailyInfo/{}/dailynav/{}", proj_id, nav_date),
        "Daily NAV",
    )
}
