//! Topology Store Invariant Tests
//!
//! - Cluster ids are unique and listed in insertion order
//! - Hosts/instances require an existing cluster; failures write nothing
//! - List appends never lose entries, sequentially or across threads
//! - Everything survives closing and reopening the store file

use std::sync::Arc;
use std::thread;

use gmha::topology::{Cluster, Host, Instance, Role, TopologyError, TopologyStore};
use tempfile::TempDir;

// =============================================================================
// Test Utilities
// =============================================================================

fn create_temp_dir() -> TempDir {
    TempDir::new().expect("Failed to create temp dir")
}

fn open(temp_dir: &TempDir) -> TopologyStore {
    TopologyStore::open(temp_dir.path().join("data/gmha.db")).expect("Failed to open store")
}

fn cluster(id: &str) -> Cluster {
    Cluster::new(id, "127.0.0.1:9001")
}

// =============================================================================
// Clusters
// =============================================================================

#[test]
fn test_empty_store_lists_nothing() {
    let temp_dir = create_temp_dir();
    let store = open(&temp_dir);
    assert!(store.list_clusters().unwrap().is_empty());
}

#[test]
fn test_clusters_listed_in_insertion_order() {
    let temp_dir = create_temp_dir();
    let store = open(&temp_dir);

    // key order would be alpha, mid, zeta
    for id in ["zeta", "alpha", "mid"] {
        store.add_cluster(&cluster(id)).unwrap();
    }

    let ids: Vec<String> = store
        .list_clusters()
        .unwrap()
        .into_iter()
        .map(|c| c.id)
        .collect();
    assert_eq!(ids, vec!["zeta", "alpha", "mid"]);
}

#[test]
fn test_two_clusters_listed_exactly() {
    let temp_dir = create_temp_dir();
    let store = open(&temp_dir);
    store.add_cluster(&cluster("c1")).unwrap();
    store.add_cluster(&cluster("c2")).unwrap();

    let list = store.list_clusters().unwrap();
    assert_eq!(list.len(), 2);
    assert_eq!(list[0].id, "c1");
    assert_eq!(list[1].id, "c2");
}

#[test]
fn test_duplicate_cluster_rejected_and_original_kept() {
    let temp_dir = create_temp_dir();
    let store = open(&temp_dir);
    store
        .add_cluster(&Cluster::new("demo", "10.0.0.5:9001"))
        .unwrap();

    let err = store
        .add_cluster(&Cluster::new("demo", "10.0.0.6:9001"))
        .unwrap_err();
    assert!(matches!(err, TopologyError::DuplicateCluster(ref id) if id == "demo"));

    let list = store.list_clusters().unwrap();
    assert_eq!(list.len(), 1, "duplicate must not add a second order entry");
    assert_eq!(list[0].worker_addr, "10.0.0.5:9001");
}

#[test]
fn test_get_cluster_distinguishes_missing() {
    let temp_dir = create_temp_dir();
    let store = open(&temp_dir);
    let added = cluster("demo");
    store.add_cluster(&added).unwrap();

    assert_eq!(store.get_cluster("demo").unwrap(), added);
    let err = store.get_cluster("other").unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(err.code(), "GMHA_TOPOLOGY_NOT_FOUND");
}

// =============================================================================
// Hosts
// =============================================================================

#[test]
fn test_add_host_to_missing_cluster_leaves_store_unchanged() {
    let temp_dir = create_temp_dir();
    let store = open(&temp_dir);
    store.add_cluster(&cluster("demo")).unwrap();
    store
        .add_host("demo", Host::new("10.0.0.1", "root", 22))
        .unwrap();

    let err = store
        .add_host("ghost", Host::new("10.0.0.9", "root", 22))
        .unwrap_err();
    assert!(matches!(err, TopologyError::ClusterNotFound(ref id) if id == "ghost"));

    assert!(store.list_hosts("ghost").unwrap().is_empty());
    assert_eq!(store.list_hosts("demo").unwrap().len(), 1);
    assert!(!store.cluster_exists("ghost").unwrap());
}

#[test]
fn test_sequential_host_appends_both_survive() {
    let temp_dir = create_temp_dir();
    let store = open(&temp_dir);
    store.add_cluster(&cluster("demo")).unwrap();

    store
        .add_host("demo", Host::new("10.0.0.1", "root", 22))
        .unwrap();
    store
        .add_host("demo", Host::new("10.0.0.2", "admin", 2222))
        .unwrap();

    let hosts = store.list_hosts("demo").unwrap();
    assert_eq!(hosts.len(), 2);
    assert_eq!(hosts[0].id, "10.0.0.1");
    assert_eq!(hosts[1].id, "10.0.0.2");
    assert_eq!(hosts[1].ssh_user, "admin");
    assert_eq!(hosts[1].ssh_port, 2222);
    assert!(hosts.iter().all(|h| h.cluster_id == "demo"));
}

#[test]
fn test_concurrent_host_appends_lose_nothing() {
    const THREADS: usize = 4;
    const PER_THREAD: usize = 10;

    let temp_dir = create_temp_dir();
    let store = Arc::new(open(&temp_dir));
    store.add_cluster(&cluster("demo")).unwrap();

    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                for i in 0..PER_THREAD {
                    let ip = format!("10.{}.0.{}", t, i);
                    store.add_host("demo", Host::new(ip, "root", 22)).unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let hosts = store.list_hosts("demo").unwrap();
    assert_eq!(hosts.len(), THREADS * PER_THREAD);

    // each thread's own appends keep their relative order
    for t in 0..THREADS {
        let prefix = format!("10.{}.", t);
        let seen: Vec<&str> = hosts
            .iter()
            .filter(|h| h.ip.starts_with(&prefix))
            .map(|h| h.ip.as_str())
            .collect();
        let expected: Vec<String> = (0..PER_THREAD).map(|i| format!("10.{}.0.{}", t, i)).collect();
        assert_eq!(seen, expected);
    }
}

#[test]
fn test_duplicate_host_ip_is_kept() {
    let temp_dir = create_temp_dir();
    let store = open(&temp_dir);
    store.add_cluster(&cluster("demo")).unwrap();
    store.add_host("demo", Host::new("10.0.0.1", "root", 22)).unwrap();
    store.add_host("demo", Host::new("10.0.0.1", "root", 22)).unwrap();
    assert_eq!(store.list_hosts("demo").unwrap().len(), 2);
}

// =============================================================================
// Instances
// =============================================================================

#[test]
fn test_instance_round_trip_id() {
    let temp_dir = create_temp_dir();
    let store = open(&temp_dir);
    store.add_cluster(&cluster("c")).unwrap();

    let stored = store
        .add_instance("c", Instance::new("10.0.0.1", 3306, Role::Master))
        .unwrap();
    assert_eq!(stored.id, "10.0.0.1:3306");

    let list = store.list_instances("c").unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0].id, "10.0.0.1:3306");
    assert_eq!(list[0].role, Role::Master);
    assert_eq!(list[0].master_addr, "");
    assert_eq!(list[0].cluster_id, "c");
}

#[test]
fn test_instances_are_per_cluster() {
    let temp_dir = create_temp_dir();
    let store = open(&temp_dir);
    store.add_cluster(&cluster("a")).unwrap();
    store.add_cluster(&cluster("b")).unwrap();

    store
        .add_instance("a", Instance::new("10.0.0.1", 3306, Role::Master))
        .unwrap();
    store
        .add_instance(
            "b",
            Instance::new("10.0.1.2", 3307, Role::Slave).with_master("10.0.1.1:3307"),
        )
        .unwrap();

    let a = store.list_instances("a").unwrap();
    let b = store.list_instances("b").unwrap();
    assert_eq!(a.len(), 1);
    assert_eq!(b.len(), 1);
    assert_eq!(b[0].master_addr, "10.0.1.1:3307");
    assert!(store.list_instances("c").unwrap().is_empty());
}

#[test]
fn test_add_instance_to_missing_cluster() {
    let temp_dir = create_temp_dir();
    let store = open(&temp_dir);
    let err = store
        .add_instance("ghost", Instance::new("10.0.0.1", 3306, Role::Master))
        .unwrap_err();
    assert!(err.is_not_found());
    assert!(store.list_instances("ghost").unwrap().is_empty());
}

// =============================================================================
// Topology snapshot & durability
// =============================================================================

#[test]
fn test_topology_snapshot() {
    let temp_dir = create_temp_dir();
    let store = open(&temp_dir);
    store.add_cluster(&cluster("demo")).unwrap();
    store.add_host("demo", Host::new("10.0.0.1", "root", 22)).unwrap();
    store
        .add_instance("demo", Instance::new("10.0.0.1", 3306, Role::Master))
        .unwrap();

    let topology = store.topology("demo").unwrap();
    assert_eq!(topology.cluster.id, "demo");
    assert_eq!(topology.hosts.len(), 1);
    assert_eq!(topology.instances.len(), 1);
    assert!(!topology.is_empty());

    assert!(store.topology("ghost").unwrap_err().is_not_found());
}

#[test]
fn test_everything_survives_reopen() {
    let temp_dir = create_temp_dir();
    let original;
    {
        let store = open(&temp_dir);
        original = cluster("demo");
        store.add_cluster(&original).unwrap();
        store.add_cluster(&cluster("b-second")).unwrap();
        store.add_host("demo", Host::new("10.0.0.1", "root", 22)).unwrap();
        store
            .add_instance(
                "demo",
                Instance::new("10.0.0.2", 3306, Role::Slave).with_master("10.0.0.1:3306"),
            )
            .unwrap();
    }

    let store = open(&temp_dir);
    let clusters = store.list_clusters().unwrap();
    assert_eq!(clusters.len(), 2);
    assert_eq!(clusters[0], original);
    assert_eq!(clusters[1].id, "b-second");

    let hosts = store.list_hosts("demo").unwrap();
    assert_eq!(hosts, vec![Host {
        id: "10.0.0.1".into(),
        ip: "10.0.0.1".into(),
        ssh_user: "root".into(),
        ssh_port: 22,
        cluster_id: "demo".into(),
    }]);

    let instances = store.list_instances("demo").unwrap();
    assert_eq!(instances[0].id, "10.0.0.2:3306");
    assert_eq!(instances[0].role, Role::Slave);
    assert_eq!(instances[0].master_addr, "10.0.0.1:3306");

    // ordering continues after reopen
    store.add_cluster(&cluster("a-third")).unwrap();
    let ids: Vec<String> = store.list_clusters().unwrap().into_iter().map(|c| c.id).collect();
    assert_eq!(ids, vec!["demo", "b-second", "a-third"]);
}
