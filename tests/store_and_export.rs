// tests/store_and_export.rs
mod common;

use std::io::Write as _;

use chrono::Duration;
use common::{article, dataset, now, raw_job};
use publication_monitor::export::{export_articles_csv, ARTICLE_EXPORT_HEADER};
use publication_monitor::model::JobHealth;
use publication_monitor::{EvalTime, RecordStore, Selector, StoreError};

const SNAPSHOT: &str = r#"{
  "channels": [
    { "id": "fortune", "name": "Fortune", "region": "United States", "categories": ["Finance"],
      "status": "active", "avgLatencyMinutes": 12, "audienceShare": 0.22 },
    { "id": "reuters", "name": "Reuters", "region": "Global", "categories": ["Markets"],
      "status": "paused", "avgLatencyMinutes": 16, "audienceShare": 0.18 }
  ],
  "articles": [
    { "id": "article-1", "title": "Rates, \"again\"", "teaser": "", "source": "Fortune",
      "region": "United States", "category": "Finance", "channelId": "fortune",
      "status": "In Queue", "publishedAt": "2026-10-18T09:05:00Z", "companyName": "GlobalBank plc",
      "sector": "Financial Services",
      "engagement": { "webViews": 10, "mobileViews": 5, "shares": 1, "dwellSeconds": 30 } }
  ],
  "scheduleJobs": [
    { "id": 7, "name": "Reuters sync", "channel": "Reuters", "cron": "0 * * * *",
      "latencyMinutes": 30, "successRate": 0.8, "active": false, "status": "healthy",
      "hourlyLoad": [
        {"hour":0,"success":1,"queued":0,"failed":0},{"hour":1,"success":1,"queued":0,"failed":0},
        {"hour":2,"success":1,"queued":0,"failed":0},{"hour":3,"success":1,"queued":0,"failed":0},
        {"hour":4,"success":1,"queued":0,"failed":0},{"hour":5,"success":1,"queued":0,"failed":0},
        {"hour":6,"success":1,"queued":0,"failed":0},{"hour":7,"success":1,"queued":0,"failed":0},
        {"hour":8,"success":1,"queued":0,"failed":0},{"hour":9,"success":1,"queued":0,"failed":0},
        {"hour":10,"success":1,"queued":0,"failed":0},{"hour":11,"success":1,"queued":0,"failed":0},
        {"hour":12,"success":1,"queued":0,"failed":0},{"hour":13,"success":1,"queued":0,"failed":0},
        {"hour":14,"success":1,"queued":0,"failed":0},{"hour":15,"success":1,"queued":0,"failed":0},
        {"hour":16,"success":1,"queued":0,"failed":0},{"hour":17,"success":1,"queued":0,"failed":0},
        {"hour":18,"success":1,"queued":0,"failed":0},{"hour":19,"success":1,"queued":0,"failed":0},
        {"hour":20,"success":1,"queued":0,"failed":0},{"hour":21,"success":1,"queued":0,"failed":0},
        {"hour":22,"success":1,"queued":0,"failed":0},{"hour":23,"success":2,"queued":1,"failed":1}
      ] }
  ]
}"#;

#[test]
fn json_snapshot_ingests_and_normalizes_jobs() {
    let store = RecordStore::from_json_str(SNAPSHOT).unwrap();
    assert_eq!(store.channels().len(), 2);
    assert_eq!(store.articles().len(), 1);

    let job = &store.jobs()[0];
    assert_eq!(job.channel_id, "reuters");
    assert_eq!(job.channel_name, "Reuters");
    // supplied "healthy" is overridden by the 30 minute latency
    assert_eq!(job.status, JobHealth::Critical);
    assert_eq!(job.hourly_load[23].total(), 4);

    assert_eq!(store.jobs_for(&Selector::only("Reuters")).len(), 1);
    assert_eq!(store.jobs_for(&Selector::only("fortune")).len(), 0);
    assert_eq!(store.region_options(), vec!["Global", "United States"]);
}

#[test]
fn snapshot_loads_from_disk() {
    let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
    file.write_all(SNAPSHOT.as_bytes()).unwrap();
    let store = RecordStore::load_from(file.path()).unwrap();
    assert_eq!(store.channel_label("fortune"), "Fortune");
    assert_eq!(store.channel_label("nope"), "nope");

    let missing = RecordStore::load_from(std::path::Path::new("/definitely/not/here.json"));
    assert!(matches!(missing, Err(StoreError::Io { .. })));
}

#[test]
fn rejects_dangling_references() {
    let bad_article = dataset(vec![article("a", "nowhere", Duration::hours(1))], vec![]);
    assert!(matches!(
        RecordStore::ingest(bad_article),
        Err(StoreError::UnknownChannel { .. })
    ));

    let bad_job = dataset(vec![], vec![raw_job(3, None, Some("Nowhere Weekly"), 1)]);
    assert!(matches!(
        RecordStore::ingest(bad_job),
        Err(StoreError::UnknownChannel { .. })
    ));

    let mut short = raw_job(4, Some("fortune"), None, 1);
    short.hourly_load.pop();
    assert!(matches!(
        RecordStore::ingest(dataset(vec![], vec![short])),
        Err(StoreError::HourlyLoadLength { job: 4, len: 23 })
    ));
}

#[test]
fn csv_export_reads_back_through_a_csv_reader() {
    let store = RecordStore::from_json_str(SNAPSHOT).unwrap();
    let time = EvalTime::utc(now());
    let arts: Vec<_> = store.articles().iter().collect();
    let out = export_articles_csv(&arts, &time).unwrap();
    assert!(!out.ends_with('\n'));

    let mut rdr = csv::Reader::from_reader(out.as_bytes());
    let header: Vec<String> = rdr.headers().unwrap().iter().map(String::from).collect();
    assert_eq!(header, ARTICLE_EXPORT_HEADER);

    let rows: Vec<csv::StringRecord> = rdr.records().collect::<Result<_, _>>().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(&rows[0][0], r#"Rates, "again""#);
    assert_eq!(&rows[0][5], "2026-10-18 09:05");
    assert_eq!(&rows[0][6], "In Queue");
}

#[test]
fn csv_rows_are_newest_first() {
    let store = RecordStore::ingest(dataset(
        vec![
            article("old", "fortune", Duration::days(2)),
            article("new", "bloomberg", Duration::hours(1)),
        ],
        vec![],
    ))
    .unwrap();
    let arts: Vec<_> = store.articles().iter().collect();
    let out = export_articles_csv(&arts, &EvalTime::utc(now())).unwrap();
    let lines: Vec<_> = out.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[1].starts_with("new headline,"));
    assert!(lines[2].starts_with("old headline,"));
}
