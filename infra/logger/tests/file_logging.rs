use reg_domain::config::LoggingConfig;
use reg_logger::Logger;
use std::fs;
use std::time::Duration;
use tempfile::tempdir;

#[test]
fn configured_json_file_receives_records() -> Result<(), Box<dyn std::error::Error>> {
    let tmp_dir = tempdir()?;
    let log_dir = tmp_dir.path().join("logs");

    let config = LoggingConfig {
        name: "regtool-it".to_owned(),
        level: "debug".to_owned(),
        path: Some(log_dir.clone()),
        json: true,
        ..LoggingConfig::default()
    };
    let logger = Logger::from_config(&config)?;
    assert!(logger.guard().is_some());

    tracing::info!(repo_id = "1-ROID", "Deletion job committed");

    std::thread::sleep(Duration::from_millis(30));
    drop(logger);

    let log_file = fs::read_dir(&log_dir)?
        .flatten()
        .map(|entry| entry.path())
        .find(|path| path.extension().and_then(|ext| ext.to_str()) == Some("log"))
        .expect("log file should be created");
    let file_name = log_file.file_name().and_then(|n| n.to_str()).unwrap_or_default();
    assert!(file_name.starts_with("regtool-it"), "unexpected file {file_name}");

    let contents = fs::read_to_string(&log_file)?;
    let record = contents.lines().find(|l| l.contains("Deletion job committed")).expect("record written");
    assert!(record.starts_with('{'), "expected a JSON line, got {record}");
    assert!(record.contains("\"repo_id\":\"1-ROID\""));

    Ok(())
}
