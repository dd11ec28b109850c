// Audit log under concurrent writers

use std::sync::Arc;
use tempfile::TempDir;

use hybrid_assistant::audit::{AuditLogger, AuditRecord};

#[tokio::test]
async fn test_concurrent_appends_produce_whole_lines() {
    let dir = TempDir::new().unwrap();
    let logger = Arc::new(AuditLogger::new(dir.path().join("audit_log.json")).unwrap());

    let num_tasks = 32;
    let mut handles = vec![];

    for i in 0..num_tasks {
        let logger = Arc::clone(&logger);
        handles.push(tokio::spawn(async move {
            // Long enough payload that a torn write would show up
            let answer = format!("answer {} {}", i, "x".repeat(8 * 1024));
            let record = AuditRecord::new(format!("query {}", i), answer, "ok");
            logger.append_async(record).await
        }));
    }

    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let contents = std::fs::read_to_string(logger.path()).unwrap();
    assert_eq!(contents.lines().count(), num_tasks);
    for line in contents.lines() {
        let value: serde_json::Value = serde_json::from_str(line).unwrap();
        assert!(value["input"].as_str().unwrap().starts_with("query "));
    }

    let mut inputs: Vec<_> = logger
        .read_all()
        .unwrap()
        .into_iter()
        .map(|r| r.input)
        .collect();
    inputs.sort();
    inputs.dedup();
    assert_eq!(inputs.len(), num_tasks);
}

#[tokio::test]
async fn test_separate_loggers_share_one_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("audit_log.json");
    let first = AuditLogger::new(path.clone()).unwrap();
    let second = AuditLogger::new(path).unwrap();

    first.append_async(AuditRecord::new("a", "1", "ok")).await.unwrap();
    second.append_async(AuditRecord::new("b", "2", "ok")).await.unwrap();

    let records = first.tail(10).unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[1].input, "b");
}
