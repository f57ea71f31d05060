//! Property tests for resource views produced by the aggregator.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use kubeboard::ResourceAggregator;
use kubeboard_auth::{InMemorySessionStore, Session, SessionConfig, SessionStore};
use kubeboard_core::Credential;
use kubeboard_core::status::resolve_replicas;
use kubeboard_testing::properties::replica_status;
use kubeboard_testing::{FakeCluster, FakeValidator, fixtures, test_clock, test_time};
use proptest::prelude::*;
use std::sync::Arc;
use std::time::Duration;

fn session() -> Session {
    let store = InMemorySessionStore::new(&SessionConfig::default(), Arc::new(test_clock()));
    let token = store.create(Credential::from(fixtures::KUBECONFIG), "admin".into(), None);
    store.lookup(&token).unwrap()
}

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
}

proptest! {
    #[test]
    fn deployment_rows_mirror_resolved_status(status in replica_status(), hours in 0i64..1000) {
        let created = test_time() - chrono::Duration::hours(hours);
        let cluster = FakeCluster::new()
            .with_deployments(vec![fixtures::deployment("web", "prod", status, created)]);
        let aggregator = ResourceAggregator::new(
            Arc::new(FakeValidator::accepting(cluster, "admin")),
            Arc::new(test_clock()),
            Duration::from_secs(30),
        );

        let rows = runtime()
            .block_on(aggregator.deployments(&session(), "prod"))
            .unwrap();

        prop_assert_eq!(rows.len(), 1);
        prop_assert_eq!(&rows[0].ready, &resolve_replicas(&status));
        prop_assert_eq!(&rows[0].up_to_date, &status.updated.to_string());
        let denominator = format!("/{}", status.desired);
        prop_assert!(rows[0].ready.contains(&denominator));
    }

    #[test]
    fn stateful_set_rows_mirror_resolved_status(status in replica_status()) {
        let cluster = FakeCluster::new()
            .with_stateful_sets(vec![fixtures::stateful_set("db", "prod", status, test_time())]);
        let aggregator = ResourceAggregator::new(
            Arc::new(FakeValidator::accepting(cluster, "admin")),
            Arc::new(test_clock()),
            Duration::from_secs(30),
        );

        let rows = runtime()
            .block_on(aggregator.stateful_sets(&session(), "prod"))
            .unwrap();

        prop_assert_eq!(rows.len(), 1);
        prop_assert_eq!(&rows[0].ready, &resolve_replicas(&status));
        prop_assert_eq!(&rows[0].age, "0s");
    }
}
