use anyhow::{Context, Result};
use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::funds::Fund;

/// Columns of the tabular fund export, in order.
pub const FUND_COLUMNS: [&str; 7] = [
    "proj_id",
    "proj_abbr_name",
    "proj_name_en",
    "proj_name_th",
    "fund_status",
    "regis_date",
    "cancel_date",
];

/// Pretty-printed JSON with a trailing newline. Non-ASCII text is written as-is.
pub fn to_json_bytes<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>> {
    let mut out = serde_json::to_vec_pretty(value).context("failed to serialize JSON")?;
    out.push(b'\n');
    Ok(out)
}

pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    ensure_parent(path)?;
    let bytes = to_json_bytes(value)?;
    std::fs::write(path, bytes).with_context(|| format!("failed to write {}", path.display()))
}

/// Writes `funds` as CSV with [`FUND_COLUMNS`] as the header row.
pub fn write_funds_csv<W: Write>(out: W, funds: &[Fund]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(out);
    wtr.write_record(FUND_COLUMNS)?;
    for f in funds {
        let row: Vec<_> = FUND_COLUMNS.iter().map(|c| f.field(c)).collect();
        wtr.write_record(row.iter().map(|v| v.as_bytes()))?;
    }
    wtr.flush()?;
    Ok(())
}

/// Creates `path` and writes the fund export into it.
pub fn export_funds_csv(path: &Path, funds: &[Fund]) -> Result<PathBuf> {
    ensure_parent(path)?;
    let file = std::fs::File::create(path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    write_funds_csv(file, funds).with_context(|| format!("failed to write {}", path.display()))?;
    Ok(path.to_path_buf())
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create directory {}", parent.display()))?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Map, Value, json};

    #[test]
    fn empty_result_set_is_written_as_empty_object() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/out.json");
        write_json(&path, &Map::<String, Value>::new()).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "{}\n");
    }

    #[test]
    fn thai_text_is_not_escaped() {
        let bytes = to_json_bytes(&json!({"name_th": "ไทยพาณิชย์"})).unwrap();
        assert!(String::from_utf8(bytes).unwrap().contains("ไทยพาณิชย์"));
    }

    #[test]
    fn csv_has_fixed_columns_only() {
        let funds: Vec<Fund> = serde_json::from_value(json!([
            {
                "proj_id": "M0001_2545",
                "proj_abbr_name": "SCBRMF",
                "proj_name_en": "SCB Retirement, Equity",
                "proj_name_th": "ไทยพาณิชย์",
                "fund_status": "RG",
                "regis_date": "2002-03-01",
                "cancel_date": "-",
                "unique_id": "C0000000239"
            }
        ]))
        .unwrap();

        let mut buf = Vec::new();
        write_funds_csv(&mut buf, &funds).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next().unwrap(),
            "proj_id,proj_abbr_name,proj_name_en,proj_name_th,fund_status,regis_date,cancel_date"
        );
        assert_eq!(
            lines.next().unwrap(),
            "M0001_2545,SCBRMF,\"SCB Retirement, Equity\",ไทยพาณิชย์,RG,2002-03-01,-"
        );
        assert!(lines.next().is_none());
        assert!(!text.contains("C0000000239"));
    }
}
