use crate::domain::model::{ResolutionRecord, COMPANY_NAME_COLUMN, SELECTED_DOMAIN_COLUMN};
use crate::domain::ports::Storage;
use crate::utils::error::{FinderError, Result};
use csv::Writer;

pub const SINGLE_EXPORT_FILENAME: &str = "single_company_domain.csv";
pub const BULK_EXPORT_FILENAME: &str = "selected_domains.csv";

/// Renders records as CSV with a `Company Name,Selected Domain` header. The
/// header is written even when there are no records.
pub fn records_to_csv(records: &[ResolutionRecord]) -> Result<Vec<u8>> {
    let mut wtr = Writer::from_writer(Vec::new());

    wtr.write_record([COMPANY_NAME_COLUMN, SELECTED_DOMAIN_COLUMN])?;
    for record in records {
        wtr.write_record([record.company_name(), record.selected_domain()])?;
    }

    wtr.into_inner()
        .map_err(|e| FinderError::IoError(e.into_error()))
}

/// 輸出 CSV 到儲存層，回傳實際寫入的路徑
pub async fn export_records<S: Storage>(
    storage: &S,
    filename: &str,
    records: &[ResolutionRecord],
) -> Result<String> {
    let data = records_to_csv(records)?;
    tracing::debug!(
        "Writing {} record(s), {} bytes, to {}",
        records.len(),
        data.len(),
        filename
    );

    let path = storage.write_file(filename, &data).await?;
    tracing::info!("📁 Exported {} record(s) to {}", records.len(), path);
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    #[derive(Clone, Default)]
    struct MockStorage {
        files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    }

    impl MockStorage {
        async fn get_file(&self, path: &str) -> Option<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned()
        }
    }

    impl Storage for MockStorage {
        async fn write_file(&self, path: &str, data: &[u8]) -> Result<String> {
            let mut files = self.files.lock().await;
            files.insert(path.to_string(), data.to_vec());
            Ok(format!("mock://{}", path))
        }
    }

    fn read_rows(data: &[u8]) -> (Vec<String>, Vec<Vec<String>>) {
        let mut reader = csv::Reader::from_reader(data);
        let headers = reader
            .headers()
            .unwrap()
            .iter()
            .map(str::to_string)
            .collect();
        let rows = reader
            .records()
            .map(|row| row.unwrap().iter().map(str::to_string).collect())
            .collect();
        (headers, rows)
    }

    #[test]
    fn test_single_record_csv() {
        let records = vec![ResolutionRecord::new("Acme Corp", "acme.com")];
        let data = records_to_csv(&records).unwrap();

        let (headers, rows) = read_rows(&data);
        assert_eq!(headers, vec!["Company Name", "Selected Domain"]);
        assert_eq!(rows, vec![vec!["Acme Corp", "acme.com"]]);
    }

    #[test]
    fn test_empty_export_still_has_header() {
        let data = records_to_csv(&[]).unwrap();
        let text = String::from_utf8(data).unwrap();
        assert_eq!(text.trim_end(), "Company Name,Selected Domain");
    }

    #[test]
    fn test_names_with_commas_are_quoted() {
        let records = vec![ResolutionRecord::new("Smith, Jones & Co", "smithjones.com")];
        let data = records_to_csv(&records).unwrap();

        let text = String::from_utf8(data.clone()).unwrap();
        assert!(text.contains("\"Smith, Jones & Co\""));

        let (_, rows) = read_rows(&data);
        assert_eq!(rows[0][0], "Smith, Jones & Co");
    }

    #[tokio::test]
    async fn test_export_records_writes_to_storage() {
        let storage = MockStorage::default();
        let records = vec![
            ResolutionRecord::new("A", "a.com"),
            ResolutionRecord::new("B", "b.org"),
        ];

        let path = export_records(&storage, BULK_EXPORT_FILENAME, &records)
            .await
            .unwrap();

        assert_eq!(path, "mock://selected_domains.csv");
        let data = storage.get_file(BULK_EXPORT_FILENAME).await.unwrap();
        let (_, rows) = read_rows(&data);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1], vec!["B", "b.org"]);
    }
}
