mod common;

use bidi_core::app::timeline::TimelineStore;
use bidi_core::domain::model::Observation;
use bidi_core::domain::severity::{SeverityCode, StatusColor};
use bidi_core::domain::timeline::{BucketResult, WINDOW_MS};
use common::{test_db, TestDb, MINUTE_MS, NOW_MS};

fn store(db: &TestDb) -> TimelineStore<bidi_core::infra::sqlite_repo::SqliteRepo> {
    TimelineStore::new(std::sync::Arc::clone(&db.repo), chrono_tz::UTC)
}

async fn append(store: &TimelineStore<bidi_core::infra::sqlite_repo::SqliteRepo>, obs: Observation) {
    store.append(&obs).await.expect("append");
}

#[tokio::test]
async fn most_severe_color_wins_within_an_hour() {
    let db = test_db().await;
    let store = store(&db);
    append(&store, Observation::new(NOW_MS - 40 * MINUTE_MS, SeverityCode::Ok, None)).await;
    append(
        &store,
        Observation::new(
            NOW_MS - 35 * MINUTE_MS,
            SeverityCode::PartialMajor,
            Some("Treg innlogging".into()),
        ),
    )
    .await;
    append(&store, Observation::new(NOW_MS - 20 * MINUTE_MS, SeverityCode::Ok, None)).await;

    let timeline = store.query(NOW_MS).await.expect("query");
    let buckets: Vec<BucketResult> = timeline.buckets().collect();

    assert_eq!(
        buckets,
        vec![BucketResult {
            time: "2024-01-01 10:59:59+00:00".into(),
            color: StatusColor::Orange,
            status: 3,
            text: "Treg innlogging".into(),
        }]
    );
}

#[tokio::test]
async fn buckets_are_ordered_and_distinct() {
    let db = test_db().await;
    let store = store(&db);
    for hours_ago in [50, 3, 2, 2, 1] {
        append(
            &store,
            Observation::new(NOW_MS - hours_ago * 60 * MINUTE_MS + MINUTE_MS, SeverityCode::Ok, None),
        )
        .await;
    }

    let timeline = store.query(NOW_MS).await.expect("query");
    let instants: Vec<_> = timeline
        .buckets()
        .map(|b| {
            chrono::DateTime::parse_from_str(&b.time, "%Y-%m-%d %H:%M:%S%:z").expect("label")
        })
        .collect();

    assert_eq!(instants.len(), 4);
    assert!(instants.windows(2).all(|w| w[0] < w[1]));
}

#[tokio::test]
async fn priority_runs_red_orange_blue_green_black() {
    // Most severe first; each round drops the previous winner from the hour.
    let ladder = [
        (SeverityCode::Critical, StatusColor::Red),
        (SeverityCode::PartialMajor, StatusColor::Orange),
        (SeverityCode::Maintenance, StatusColor::Blue),
        (SeverityCode::Ok, StatusColor::Green),
        (SeverityCode::Unknown, StatusColor::Black),
    ];

    for skip in 0..ladder.len() {
        let db = test_db().await;
        let store = store(&db);
        // Least severe appended last so "latest wins" cannot mask the priority.
        for (i, (code, _)) in ladder.iter().enumerate().skip(skip) {
            append(
                &store,
                Observation::new(NOW_MS - 50 * MINUTE_MS + i as i64 * MINUTE_MS, *code, None),
            )
            .await;
        }

        let timeline = store.query(NOW_MS).await.expect("query");
        let buckets: Vec<BucketResult> = timeline.buckets().collect();
        assert_eq!(buckets.len(), 1);
        assert_eq!(buckets[0].color, ladder[skip].1, "winner with {skip} removed");
        assert_eq!(buckets[0].status, ladder[skip].0.ordinal());
    }
}

#[tokio::test]
async fn yellow_only_hour_is_not_reported() {
    let db = test_db().await;
    let store = store(&db);
    append(
        &store,
        Observation::new(NOW_MS - 10 * MINUTE_MS, SeverityCode::PartialMinor, None),
    )
    .await;

    let timeline = store.query(NOW_MS).await.expect("query");
    assert_eq!(timeline.buckets().count(), 0);
}

#[tokio::test]
async fn observations_outside_window_are_ignored() {
    let db = test_db().await;
    let store = store(&db);
    append(&store, Observation::new(NOW_MS - WINDOW_MS - 1, SeverityCode::Critical, None)).await;
    append(&store, Observation::new(NOW_MS, SeverityCode::Critical, None)).await;

    let timeline = store.query(NOW_MS).await.expect("query");
    assert_eq!(timeline.buckets().count(), 0);
}

#[tokio::test]
async fn walking_twice_gives_same_result() {
    let db = test_db().await;
    let store = store(&db);
    append(&store, Observation::new(NOW_MS - 90 * MINUTE_MS, SeverityCode::Unknown, None)).await;
    append(&store, Observation::new(NOW_MS - 5 * MINUTE_MS, SeverityCode::Maintenance, None)).await;

    let timeline = store.query(NOW_MS).await.expect("query");
    let first: Vec<_> = timeline.buckets().collect();
    let second: Vec<_> = timeline.buckets().collect();
    assert_eq!(first, second);
    assert_eq!(first.len(), 2);
    assert_eq!(first[0].color, StatusColor::Black);
    assert_eq!(first[0].text, SeverityCode::Unknown.text());
    assert_eq!(first[1].color, StatusColor::Blue);
}
