mod common;

use chrono::{Months, TimeDelta};
use common::*;
use reg_datastore::ResourceReader;
use reg_domain::resources::{GracePeriodSet, HistoryType, HostResource, StatusValues};
use reg_flows::{AdmissionRequest, EppException, HostDeleteRequest, HostDeleteRequestFlow};
use reg_queue::DnsRefresh;

#[test]
fn create_persists_domain_in_add_grace_and_queues_dns() {
    let world = World::new();
    let cmd = command("example.tld");
    let created = world.flow().run(&world.request(&cmd, false)).unwrap();

    assert_eq!(created.repo_id, "100-TLD");
    assert_eq!(created.expiration_time, now().checked_add_months(Months::new(24)).unwrap());

    let snapshot = world.store.snapshot();
    let domain = snapshot.domain_by_name("example.tld", now()).unwrap();
    assert_eq!(domain.current_sponsor, REGISTRAR);
    assert!(domain.subordinate_hosts.is_empty());
    assert_eq!(domain.grace_period_statuses(now()), GracePeriodSet::ADD);
    assert_eq!(domain.grace_period_statuses(now() + TimeDelta::days(6)), GracePeriodSet::empty());

    let history: Vec<_> = snapshot.history_for(&created.repo_id).map(|h| h.kind).collect();
    assert_eq!(history, [HistoryType::DomainCreate]);
    assert_eq!(world.queues.dns.lease(10), [DnsRefresh::Domain("example.tld".to_owned())]);
}

#[test]
fn rejected_create_writes_and_queues_nothing() {
    let world = World::new();
    let err = world.flow().run(&world.request(&command("blocked.tld"), false)).unwrap_err();
    assert!(matches!(err, EppException::DomainReserved { .. }));

    assert!(world.store.snapshot().domains().next().is_none());
    assert!(world.queues.dns.is_empty());
}

#[test]
fn grace_end_past_the_calendar_is_rejected_without_writes() {
    let mut config = config();
    if let Some(tld) = config.tlds.get_mut("tld") {
        tld.add_grace_period_days = u32::MAX;
    }
    let world = World::with_config(config);

    let err = world.flow().run(&world.request(&command("example.tld"), false)).unwrap_err();
    assert_eq!(err, EppException::ExpirationOutOfRange);
    assert_eq!(err.code(), 2004);
    assert!(world.store.snapshot().domains().next().is_none());
    assert!(world.queues.dns.is_empty());
}

#[test]
fn existing_domain_is_rejected_by_full_path_during_add_grace_and_by_gate_after() {
    let world = World::new();
    let flow = world.flow();
    let cmd = command("example.tld");
    flow.run(&world.request(&cmd, false)).unwrap();

    // In ADD grace the gate lets the request through; the transactional re-check rejects it.
    let err = flow.run(&world.request(&cmd, false)).unwrap_err();
    assert_eq!(err, EppException::ResourceAlreadyExists { id: "example.tld".to_owned() });
    assert_eq!(err.code(), 2302);
    assert_eq!(world.recorder.steps.lock().last().map(|(s, _)| s.as_str()), Some("existence"));

    world.recorder.steps.lock().clear();
    let later = AdmissionRequest { now: now() + TimeDelta::days(10), ..world.request(&cmd, false) };
    assert_eq!(flow.run(&later), Err(EppException::ResourceAlreadyExists { id: "example.tld".to_owned() }));
    // The gate answered on its own.
    assert!(world.recorder.steps.lock().is_empty());
}

#[test]
fn dry_run_matches_run_without_writing() {
    let world = World::new();
    let cmd = command("example.tld");
    let flow = world.flow();

    let plan = flow.dry_run(&world.request(&cmd, false)).unwrap();
    assert!(world.store.snapshot().domains().next().is_none());

    let created = flow.run(&world.request(&cmd, false)).unwrap();
    assert_eq!(created.plan, plan);
}

fn host_world() -> (World, HostDeleteRequestFlow) {
    let world = World::new();
    world.store.seed_host(HostResource {
        repo_id: "9-ROID".to_owned(),
        fully_qualified_host_name: "ns9.example.net".to_owned(),
        current_sponsor: REGISTRAR.to_owned(),
        inet_addresses: vec![],
        superordinate_domain: None,
        deletion_time: None,
        status: StatusValues::empty(),
    });
    let flow = HostDeleteRequestFlow::new(world.store.clone(), world.queues.clone());
    (world, flow)
}

fn delete_request(client_id: &str) -> HostDeleteRequest<'_> {
    HostDeleteRequest {
        fully_qualified_host_name: "ns9.example.net",
        client_id,
        is_superuser: false,
        now: now(),
    }
}

#[test]
fn host_delete_request_marks_pending_and_queues_job() {
    let (world, flow) = host_world();
    let job = flow.run(&delete_request(REGISTRAR)).unwrap();

    assert_eq!(job.target, "9-ROID");
    assert_eq!(job.requesting_client_id, REGISTRAR);
    assert_eq!(job.job_id.len(), 12);
    assert!(job.job_id.chars().all(|c| reg_kernel::SAFE_ALPHABET.contains(&c)), "job id {}", job.job_id);

    let snapshot = world.store.snapshot();
    assert!(snapshot.host("9-ROID").unwrap().status.contains(StatusValues::PENDING_DELETE));
    assert_eq!(
        snapshot.history_for("9-ROID").map(|h| h.kind).collect::<Vec<_>>(),
        [HistoryType::HostPendingDelete]
    );
    assert_eq!(world.queues.async_delete.lease(10), [job]);
}

#[test]
fn host_delete_request_checks_ownership_and_status() {
    let (world, flow) = host_world();

    assert_eq!(flow.run(&delete_request("OtherRegistrar")), Err(EppException::ResourceNotOwned));
    let missing = HostDeleteRequest { fully_qualified_host_name: "ns0.example.net", ..delete_request(REGISTRAR) };
    assert_eq!(
        flow.run(&missing),
        Err(EppException::ResourceDoesNotExist { id: "ns0.example.net".to_owned() })
    );

    let superuser = HostDeleteRequest { is_superuser: true, ..delete_request("OtherRegistrar") };
    flow.run(&superuser).unwrap();
    assert_eq!(flow.run(&delete_request(REGISTRAR)), Err(EppException::ResourceStatusProhibitsOperation));
    assert_eq!(world.queues.async_delete.len(), 1);
}
