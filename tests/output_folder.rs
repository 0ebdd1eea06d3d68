use std::fs;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use graph_tables::ingestion::TableFormat;
use graph_tables::output::{convert_folder_to_csv, folder_stats, write_table, FileStats};
use graph_tables::types::{DataSet, DataType, Field, Schema, Value};

fn tmp_dir(name: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let dir = std::env::temp_dir().join(format!("graph-tables-{name}-{nanos}"));
    fs::create_dir_all(&dir).unwrap();
    dir
}

fn node_table(ids: &[&str]) -> DataSet {
    DataSet::new(
        Schema::new(vec![Field::new("id", DataType::Utf8)]),
        ids.iter().map(|id| vec![Value::Utf8(id.to_string())]).collect(),
    )
}

#[test]
fn converts_each_parquet_file_to_a_csv_sibling() {
    let dir = tmp_dir("convert");
    write_table(dir.join("ADDR.parquet"), &node_table(&["Ox000", "Ox001"]), TableFormat::Parquet).unwrap();
    write_table(dir.join("TOKEN.parquet"), &node_table(&["Ox100"]), TableFormat::Parquet).unwrap();
    fs::write(dir.join("notes.txt"), "not a table").unwrap();
    fs::create_dir_all(dir.join("nested")).unwrap();
    write_table(dir.join("nested/DEEP.parquet"), &node_table(&["Ox200"]), TableFormat::Parquet).unwrap();

    let written = convert_folder_to_csv(&dir).unwrap();

    assert_eq!(written, vec![dir.join("ADDR.csv"), dir.join("TOKEN.csv")]);
    assert_eq!(fs::read_to_string(dir.join("ADDR.csv")).unwrap(), "id\nOx000\nOx001\n");
    assert!(!dir.join("nested/DEEP.csv").exists());
}

#[test]
fn stats_list_sizes_and_parquet_row_counts() {
    let dir = tmp_dir("stats");
    write_table(dir.join("ADDR.parquet"), &node_table(&["Ox000", "Ox001", "Ox002"]), TableFormat::Parquet).unwrap();
    write_table(dir.join("ADDR.csv"), &node_table(&["Ox000"]), TableFormat::Csv).unwrap();

    let stats = folder_stats(&dir).unwrap();

    assert_eq!(
        stats,
        vec![
            FileStats {
                name: "ADDR.csv".to_string(),
                bytes: "id\nOx000\n".len() as u64,
                rows: None,
            },
            FileStats {
                name: "ADDR.parquet".to_string(),
                bytes: fs::metadata(dir.join("ADDR.parquet")).unwrap().len(),
                rows: Some(3),
            },
        ]
    );

    let json = serde_json::to_value(&stats).unwrap();
    assert_eq!(json[0], serde_json::json!({ "name": "ADDR.csv", "bytes": 9 }));
}
