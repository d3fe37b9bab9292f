use std::collections::HashMap;
use std::path::PathBuf;

use crate::error::{AppError, AppResult};
use crate::models::CourseRecord;

/// Handle on the course catalog flat file.
///
/// The catalog is re-read on every call: the dataset is small and the
/// file is the single source of truth, so no in-memory index is kept
/// across requests.
#[derive(Debug, Clone)]
pub struct Catalog {
    path: PathBuf,
}

impl Catalog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Loads and parses the catalog file
    pub async fn load(&self) -> AppResult<CourseTable> {
        let raw = tokio::fs::read(&self.path).await.map_err(|e| {
            AppError::DataUnavailable(format!(
                "Failed to read catalog {}: {}",
                self.path.display(),
                e
            ))
        })?;

        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(raw.as_slice());

        let mut records = Vec::new();
        for row in reader.deserialize::<CourseRecord>() {
            let record =
                row.map_err(|e| AppError::DataUnavailable(format!("Malformed catalog row: {}", e)))?;
            records.push(record);
        }

        Ok(CourseTable::from_records(records))
    }
}

/// Parsed catalog contents, indexed by course id
#[derive(Debug, Clone, Default)]
pub struct CourseTable {
    records: Vec<CourseRecord>,
    index: HashMap<String, usize>,
}

impl CourseTable {
    pub fn from_records(records: Vec<CourseRecord>) -> Self {
        let index = records
            .iter()
            .enumerate()
            .map(|(i, record)| (record.id.clone(), i))
            .collect();

        Self { records, index }
    }

    /// All records in file order
    pub fn all(&self) -> &[CourseRecord] {
        &self.records
    }

    pub fn by_id(&self, id: &str) -> Option<&CourseRecord> {
        self.index.get(id).map(|&i| &self.records[i])
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    const SAMPLE: &str = "\
course_id,course_title,subject,level,price,num_subscribers,num_reviews,num_lectures,content_duration,url
101,Intro to Algebra,Math,Beginner Level,Free,5000,120,24,3 hours,http://example.com/101
102,Watercolor Basics,Art,All Levels,75,2000,40,18,2.5 hours,http://example.com/102
";

    fn sample_file() -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();
        file
    }

    #[tokio::test]
    async fn test_load_parses_records() {
        let file = sample_file();
        let table = Catalog::new(file.path()).load().await.unwrap();

        assert_eq!(table.len(), 2);
        assert_eq!(table.all()[0].title, "Intro to Algebra");
        // Columns the model does not declare (url) are ignored.
        assert_eq!(table.all()[1].subject, "Art");
    }

    #[tokio::test]
    async fn test_by_id_lookup() {
        let file = sample_file();
        let table = Catalog::new(file.path()).load().await.unwrap();

        assert_eq!(table.by_id("102").unwrap().title, "Watercolor Basics");
        assert!(table.by_id("999").is_none());
    }

    #[tokio::test]
    async fn test_missing_file_is_data_unavailable() {
        let err = Catalog::new("/nonexistent/courses.csv")
            .load()
            .await
            .unwrap_err();
        assert!(matches!(err, crate::error::AppError::DataUnavailable(_)));
    }
}
