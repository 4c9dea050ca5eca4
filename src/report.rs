use comfy_table::{Attribute, Cell, ContentArrangement, Table};

use crate::aggregate::Aggregation;
use crate::funds::{AssetAllocation, Fund};

const RULE_WIDTH: usize = 80;

pub fn section(title: &str) -> String {
    let rule = "═".repeat(RULE_WIDTH);
    format!("\n{}\n{}\n{}", rule, title.to_uppercase(), rule)
}

pub fn asset_table(assets: &[AssetAllocation]) -> Table {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("#").add_attribute(Attribute::Bold),
        Cell::new("Asset Type").add_attribute(Attribute::Bold),
        Cell::new("Allocation %").add_attribute(Attribute::Bold),
    ]);
    for a in assets {
        table.add_row(vec![
            Cell::new(a.asset_seq()),
            Cell::new(a.asset_name()),
            Cell::new(format!("{}%", a.asset_ratio())),
        ]);
    }
    table
}

pub fn fund_table(funds: &[Fund]) -> Table {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(
        ["#", "Code", "Project ID", "Name (EN)", "Name (TH)", "Status", "Cancelled", "Registered"]
            .into_iter()
            .map(|h| Cell::new(h).add_attribute(Attribute::Bold))
            .collect::<Vec<_>>(),
    );
    for (idx, f) in funds.iter().enumerate() {
        table.add_row(vec![
            Cell::new(idx + 1),
            Cell::new(f.proj_abbr_name()),
            Cell::new(f.proj_id()),
            Cell::new(f.proj_name_en()),
            Cell::new(f.proj_name_th()),
            Cell::new(f.fund_status()),
            Cell::new(f.cancel_date()),
            Cell::new(f.regis_date()),
        ]);
    }
    table
}

pub fn aggregation_summary(agg: &Aggregation) -> String {
    let mut out = format!(
        "Summary:\n  Total API endpoints called: {}\n  Successful responses: {}\n  Failed responses: {}",
        agg.attempted,
        agg.succeeded(),
        agg.failed()
    );
    for f in &agg.failures {
        let status = f
            .error
            .status()
            .map(|s| s.as_u16().to_string())
            .unwrap_or_else(|| if f.error.is_decode() { "decode".into() } else { "network".into() });
        out.push_str(&format!("\n    ✗ {} ({})", f.label, status));
    }
    out
}
