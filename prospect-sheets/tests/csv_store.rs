use std::fs;

use prospect_sheets::{CsvRowStore, LeadRow, RowResult, RowStore, SheetError};
use tempfile::TempDir;

fn write_input(tmp: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
    let path = tmp.path().join(name);
    fs::write(&path, content).expect("write input csv");
    path
}

#[tokio::test]
async fn loads_rows_with_case_insensitive_headers() {
    let tmp = TempDir::new().unwrap();
    let input = write_input(
        &tmp,
        "leads.csv",
        "Website,Name\nexample.com,Alice\n, \nb.test,\n",
    );
    let store = CsvRowStore::new(&input, tmp.path().join("out.csv"));

    let rows = store.load_rows().await.unwrap();
    assert_eq!(
        rows,
        vec![
            LeadRow {
                index: 1,
                website: "example.com".into(),
                contact_name: Some("Alice".into()),
            },
            LeadRow {
                index: 2,
                website: String::new(),
                contact_name: None,
            },
            LeadRow {
                index: 3,
                website: "b.test".into(),
                contact_name: None,
            },
        ]
    );
}

#[tokio::test]
async fn missing_website_column_is_an_error() {
    let tmp = TempDir::new().unwrap();
    let input = write_input(&tmp, "leads.csv", "url,name\nexample.com,Alice\n");
    let store = CsvRowStore::new(&input, tmp.path().join("out.csv"));

    let err = store.load_rows().await.unwrap_err();
    assert!(matches!(err, SheetError::MissingColumn(col) if col == "website"));
}

#[tokio::test]
async fn custom_column_names_are_honored() {
    let tmp = TempDir::new().unwrap();
    let input = write_input(&tmp, "leads.csv", "url,contact\nexample.com,Alice\n");
    let store =
        CsvRowStore::new(&input, tmp.path().join("out.csv")).with_columns("url", "contact");

    let rows = store.load_rows().await.unwrap();
    assert_eq!(rows[0].website, "example.com");
    assert_eq!(rows[0].contact_name.as_deref(), Some("Alice"));
}

#[tokio::test]
async fn results_are_written_in_input_order() {
    let tmp = TempDir::new().unwrap();
    let input = write_input(&tmp, "leads.csv", "website\na.test\nb.test\n");
    let output = tmp.path().join("out.csv");
    let store = CsvRowStore::new(&input, &output);

    let rows = store.load_rows().await.unwrap();
    let results = vec![
        RowResult {
            row: rows[0].clone(),
            cell: "Hello".into(),
            outreach: Some("Hi Alice".into()),
        },
        RowResult {
            row: rows[1].clone(),
            cell: "No content found".into(),
            outreach: None,
        },
    ];
    store.write_results(&results).await.unwrap();

    let written = fs::read_to_string(&output).unwrap();
    let lines: Vec<&str> = written.lines().collect();
    assert_eq!(
        lines,
        vec![
            "url,about_content,outreach",
            "a.test,Hello,Hi Alice",
            "b.test,No content found,",
        ]
    );
}

#[tokio::test]
async fn cells_with_commas_are_quoted_and_round_trip() {
    let tmp = TempDir::new().unwrap();
    let input = write_input(&tmp, "leads.csv", "website\na.test\n");
    let output = tmp.path().join("out.csv");
    let store = CsvRowStore::new(&input, &output);

    let rows = store.load_rows().await.unwrap();
    let results = vec![RowResult {
        row: rows[0].clone(),
        cell: "We teach, we learn.".into(),
        outreach: None,
    }];
    store.write_results(&results).await.unwrap();

    let mut reader = csv::Reader::from_path(&output).unwrap();
    let record = reader.records().next().unwrap().unwrap();
    assert_eq!(record.get(1), Some("We teach, we learn."));
}
