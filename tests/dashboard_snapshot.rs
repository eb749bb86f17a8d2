// tests/dashboard_snapshot.rs
mod common;

use chrono::Duration;
use common::{article, dataset, now, raw_job};
use publication_monitor::chart::NO_DATA_LABEL;
use publication_monitor::fixtures::{self, FixtureSpec};
use publication_monitor::kpi::Delta;
use publication_monitor::{
    evaluate, DashboardQuery, EvalTime, FixedClock, Filter, RankingMetric, RecordStore,
};

fn fixture_store() -> RecordStore {
    RecordStore::ingest(fixtures::generate(&FixtureSpec::default(), now())).unwrap()
}

#[test]
fn fixture_snapshot_is_consistent() {
    let store = fixture_store();
    let time = EvalTime::from_clock(&FixedClock(now()), chrono::FixedOffset::east_opt(0).unwrap());
    let query = DashboardQuery::default();
    let snap = evaluate(&store, &query, &time);

    assert_eq!(snap.generated_at, now());
    assert_eq!(snap.cards.len(), 7);
    assert_eq!(snap.scheduler_load.len(), 24);
    assert_eq!(snap.charts.scheduler_hourly.labels.len(), 24);
    assert_eq!(snap.charts.scheduler_hourly.labels[0], "00:00");

    let total = snap.kpis.total_articles;
    assert!(total > 0);
    let dist_sum: usize = snap.distribution.items().iter().map(|s| s.count).sum();
    assert_eq!(dist_sum, total);
    assert_eq!(snap.distribution.items().len(), store.channels().len());
    let breakdown_sum: usize = snap
        .status_breakdown
        .items()
        .iter()
        .map(|t| t.counts.total())
        .sum();
    assert_eq!(breakdown_sum, total);
    let trend_sum: usize = snap.trend.items().iter().map(|b| b.total).sum();
    assert_eq!(trend_sum, total);

    assert!(snap.ranking.items().len() <= 5);
    assert!(snap.recent_articles.len() <= 12);
    assert!(snap
        .recent_articles
        .windows(2)
        .all(|w| w[0].published_at >= w[1].published_at));
}

#[test]
fn evaluation_is_deterministic() {
    let store = fixture_store();
    let time = EvalTime::utc(now());
    let query = DashboardQuery {
        filter: Filter::new(14).with_channel("fortune"),
        ranking: RankingMetric::Shares,
        top_n: 3,
    };
    let a = serde_json::to_value(evaluate(&store, &query, &time)).unwrap();
    let b = serde_json::to_value(evaluate(&store, &query, &time)).unwrap();
    assert_eq!(a, b);
}

#[test]
fn channel_query_narrows_every_view() {
    let store = fixture_store();
    let time = EvalTime::utc(now());
    let query = DashboardQuery {
        filter: Filter::new(60).with_channel("bloomberg"),
        ..DashboardQuery::default()
    };
    let snap = evaluate(&store, &query, &time);

    assert!(snap
        .recent_articles
        .iter()
        .all(|a| a.channel_id == "bloomberg"));
    for share in snap.distribution.items() {
        if share.channel_id != "bloomberg" {
            assert_eq!(share.count, 0);
        }
    }
    let expected_load = publication_monitor::scheduler_hourly_metrics(
        store.jobs(),
        &query.filter.channel,
    );
    assert_eq!(snap.scheduler_load, expected_load);
}

#[test]
fn empty_window_renders_placeholders() {
    let store = RecordStore::ingest(dataset(
        vec![article("ancient", "fortune", Duration::days(90))],
        vec![],
    ))
    .unwrap();
    let snap = evaluate(&store, &DashboardQuery::default(), &EvalTime::utc(now()));

    assert_eq!(snap.kpis.total_articles, 0);
    assert!(snap.trend.is_no_data());
    assert!(snap.distribution.is_no_data());
    assert!(snap.ranking.is_no_data());
    assert!(snap.segments.is_no_data());

    let charts = &snap.charts;
    for chart in [
        &charts.publication_trend,
        &charts.channel_coverage,
        &charts.status_breakdown,
        &charts.scheduler_hourly,
        &charts.top_stories,
    ] {
        assert!(chart.is_no_data(), "{chart:?}");
        assert_eq!(chart.labels, vec![NO_DATA_LABEL]);
    }
    assert_eq!(charts.channel_coverage.datasets[0].data, vec![1.0]);
    assert_eq!(charts.top_stories.datasets[0].data, vec![0.0]);

    assert!(snap
        .cards
        .iter()
        .all(|c| c.delta == Delta::NoPriorData && c.delta_label == "no prior data"));
}

#[test]
fn baseline_feeds_card_deltas() {
    let store = RecordStore::ingest(dataset(
        vec![
            article("c1", "fortune", Duration::days(1)),
            article("c2", "fortune", Duration::days(2)),
            article("c3", "bloomberg", Duration::days(3)),
            article("p1", "fortune", Duration::days(8)),
            article("p2", "fortune", Duration::days(9)),
        ],
        vec![raw_job(1, Some("fortune"), None, 1)],
    ))
    .unwrap();
    let query = DashboardQuery {
        filter: Filter::new(7),
        ..DashboardQuery::default()
    };
    let snap = evaluate(&store, &query, &EvalTime::utc(now()));

    assert_eq!(snap.kpis.total_articles, 3);
    assert_eq!(snap.baseline_kpis.total_articles, 2);
    let total_card = &snap.cards[0];
    assert_eq!(total_card.delta, Delta::Change { percent: 50.0 });
    assert_eq!(total_card.delta_label, "+50.0% vs prev");
    let channels_card = snap.cards.iter().find(|c| c.key == "activeChannels").unwrap();
    assert_eq!(channels_card.delta, Delta::Change { percent: 100.0 });
}
