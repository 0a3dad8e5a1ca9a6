use chrono::{DateTime, Duration, TimeZone, Utc};
use reg_datastore::{Datastore, Fixtures, ResourceReader, partition_of};
use reg_domain::resources::{DomainResource, HistoryEntry, HistoryType, HostResource, StatusValues};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
}

fn domain(repo_id: &str, fqdn: &str) -> DomainResource {
    DomainResource {
        repo_id: repo_id.to_owned(),
        fully_qualified_domain_name: fqdn.to_owned(),
        tld: "example".to_owned(),
        current_sponsor: "TheRegistrar".to_owned(),
        creation_time: now() - Duration::days(30),
        deletion_time: None,
        registration_expiration_time: now() + Duration::days(335),
        registrant: None,
        contacts: Vec::new(),
        nameservers: Default::default(),
        subordinate_hosts: Default::default(),
        ds_data: Vec::new(),
        launch_notice: None,
        smd_id: None,
        idn_table: None,
        grace_periods: Vec::new(),
        status: StatusValues::empty(),
    }
}

fn host(repo_id: &str, name: &str) -> HostResource {
    HostResource {
        repo_id: repo_id.to_owned(),
        fully_qualified_host_name: name.to_owned(),
        current_sponsor: "TheRegistrar".to_owned(),
        inet_addresses: Vec::new(),
        superordinate_domain: None,
        deletion_time: None,
        status: StatusValues::empty(),
    }
}

#[test]
fn committed_writes_become_visible() {
    let store = Datastore::builder().build();
    let result: Result<(), ()> = store.transact(|tx| {
        tx.put_domain(domain("1-EXAMPLE", "one.example"));
        assert!(tx.domain_by_name("one.example", now()).is_some(), "own writes are readable");
        Ok(())
    });
    assert!(result.is_ok());
    assert!(store.snapshot().domain_by_name("one.example", now()).is_some());
}

#[test]
fn failed_transactions_leave_no_trace() {
    let store = Datastore::builder().build();
    let ran_after_commit = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&ran_after_commit);

    let result: Result<(), &str> = store.transact(|tx| {
        tx.put_domain(domain("1-EXAMPLE", "one.example"));
        tx.after_commit(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        Err("abort")
    });

    assert_eq!(result, Err("abort"));
    assert!(store.snapshot().domain_by_name("one.example", now()).is_none());
    assert_eq!(ran_after_commit.load(Ordering::SeqCst), 0);
}

#[test]
fn after_commit_actions_run_once_committed() {
    let store = Datastore::builder().build();
    let ran = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&ran);

    store
        .transact(|tx| {
            tx.record_history(HistoryEntry {
                parent: "1-EXAMPLE".to_owned(),
                kind: HistoryType::DomainCreate,
                client_id: "TheRegistrar".to_owned(),
                modification_time: now(),
                by_superuser: false,
            });
            tx.after_commit(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            });
            Ok::<_, ()>(())
        })
        .unwrap();

    assert_eq!(ran.load(Ordering::SeqCst), 1);
    assert_eq!(store.snapshot().history_for("1-EXAMPLE").count(), 1);
}

#[test]
fn snapshots_do_not_see_later_commits() {
    let store = Datastore::builder().build();
    let before = store.snapshot();
    store.seed_domain(domain("1-EXAMPLE", "one.example"));

    assert!(before.domain_by_name("one.example", now()).is_none());
    assert!(store.snapshot().domain_by_name("one.example", now()).is_some());
}

#[test]
fn deleted_resources_are_not_found_by_name() {
    let store = Datastore::builder().build();
    let mut gone = domain("1-EXAMPLE", "gone.example");
    gone.deletion_time = Some(now() - Duration::days(1));
    store.seed_domain(gone);

    assert!(store.snapshot().domain_by_name("gone.example", now()).is_none());
    assert!(store.snapshot().domain("1-EXAMPLE").is_some());
    assert!(store.load_domain_transactionless("gone.example", now()).is_none());
}

#[test]
fn transactionless_loads_are_invalidated_on_commit() {
    let store = Datastore::builder().cache_ttl(std::time::Duration::from_secs(60)).build();
    assert!(store.load_domain_transactionless("one.example", now()).is_none());

    store
        .transact(|tx| {
            tx.put_domain(domain("1-EXAMPLE", "one.example"));
            Ok::<_, ()>(())
        })
        .unwrap();

    let loaded = store.load_domain_transactionless("one.example", now());
    assert_eq!(loaded.map(|d| d.repo_id.clone()), Some("1-EXAMPLE".to_owned()));
}

#[test]
fn partitions_cover_every_domain_exactly_once() {
    let store = Datastore::builder().build();
    let fixtures = Fixtures {
        domains: (0..40).map(|i| domain(&format!("{i:X}-EXAMPLE"), &format!("d{i}.example"))).collect(),
        hosts: vec![host("1-ROID", "ns1.example.net")],
        contacts: Vec::new(),
    };
    store.seed(fixtures);

    let snapshot = store.snapshot();
    let total: usize = (0..4).map(|p| snapshot.domain_partition(p, 4).count()).sum();
    assert_eq!(total, 40);
    for d in snapshot.domain_partition(2, 4) {
        assert_eq!(partition_of(&d.repo_id, 4), 2);
    }
}

#[test]
fn fixtures_decode_from_json() {
    let raw = r#"{
        "hosts": [{
            "repoId": "7-ROID",
            "fullyQualifiedHostName": "ns1.example.net",
            "currentSponsor": "TheRegistrar"
        }]
    }"#;
    let fixtures = Fixtures::from_json(raw).expect("fixtures decode");
    assert_eq!(fixtures.hosts.len(), 1);
    assert!(fixtures.domains.is_empty());
    assert!(Fixtures::from_json("{ nope").is_err());
}
