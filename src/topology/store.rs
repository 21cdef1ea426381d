//! Topology store backed by a single redb file
//!
//! Layout:
//! - `clusters`: cluster id -> JSON cluster record
//! - `hosts`: cluster id -> JSON array of hosts
//! - `instances`: cluster id -> JSON array of instances
//! - `cluster_order`: insertion sequence -> cluster id
//!
//! redb has no list-append primitive, so every host/instance insert reads the
//! whole list, appends and writes it back. The cluster existence check, the
//! read and the write all happen inside one write transaction; redb admits a
//! single writer at a time, so two appends to the same list never lose each
//! other's entries.

use std::fs;
use std::path::{Path, PathBuf};

use redb::{Database, ReadTransaction, ReadableTable, TableDefinition, WriteTransaction};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info};

use super::errors::{TopologyError, TopologyResult};
use super::model::{Cluster, Host, Instance, Topology};

const CLUSTERS_TABLE: &str = "clusters";
const HOSTS_TABLE: &str = "hosts";
const INSTANCES_TABLE: &str = "instances";

const CLUSTERS: TableDefinition<&str, &[u8]> = TableDefinition::new(CLUSTERS_TABLE);
const HOSTS: TableDefinition<&str, &[u8]> = TableDefinition::new(HOSTS_TABLE);
const INSTANCES: TableDefinition<&str, &[u8]> = TableDefinition::new(INSTANCES_TABLE);
const CLUSTER_ORDER: TableDefinition<u64, &str> = TableDefinition::new("cluster_order");

/// Persistent register of clusters, hosts and instances.
///
/// The handle is owned by whoever opened it and passed by reference to the
/// dispatcher; it is `Send + Sync` and can be shared through an `Arc`.
#[derive(Debug)]
pub struct TopologyStore {
    db: Database,
    path: PathBuf,
}

impl TopologyStore {
    /// Opens or creates the store file at `path`.
    ///
    /// Missing parent directories are created, and all tables are created in
    /// one write transaction so later read transactions always find them.
    ///
    /// # Errors
    ///
    /// Returns `TopologyError::Directory` if the parent directory cannot be
    /// created, or `TopologyError::Persistence` if the file cannot be
    /// opened or is locked by another process.
    pub fn open(path: impl AsRef<Path>) -> TopologyResult<Self> {
        let path = path.as_ref();

        if let Some(dir) = path.parent() {
            if !dir.as_os_str().is_empty() && !dir.exists() {
                fs::create_dir_all(dir).map_err(|source| TopologyError::Directory {
                    path: dir.to_path_buf(),
                    source,
                })?;
            }
        }

        let db = Database::create(path).map_err(TopologyError::persistence("open store"))?;

        let txn = db
            .begin_write()
            .map_err(TopologyError::persistence("begin write"))?;
        {
            let open = TopologyError::persistence::<redb::TableError>;
            txn.open_table(CLUSTERS).map_err(open("create table"))?;
            txn.open_table(HOSTS).map_err(open("create table"))?;
            txn.open_table(INSTANCES).map_err(open("create table"))?;
            txn.open_table(CLUSTER_ORDER).map_err(open("create table"))?;
        }
        txn.commit().map_err(TopologyError::persistence("commit"))?;

        debug!(path = %path.display(), "topology store opened");

        Ok(Self {
            db,
            path: path.to_path_buf(),
        })
    }

    /// Returns the path of the store file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Registers a new cluster.
    ///
    /// # Errors
    ///
    /// - `InvalidInput` if the id is blank
    /// - `DuplicateCluster` if a cluster with this id exists; the stored
    ///   record is left untouched
    pub fn add_cluster(&self, cluster: &Cluster) -> TopologyResult<()> {
        if cluster.id.trim().is_empty() {
            return Err(TopologyError::InvalidInput(
                "cluster id must not be empty".to_string(),
            ));
        }
        let data = encode(cluster)?;

        let txn = self.begin_write()?;
        {
            let mut clusters = txn
                .open_table(CLUSTERS)
                .map_err(TopologyError::persistence("open clusters"))?;
            if clusters
                .get(cluster.id.as_str())
                .map_err(TopologyError::persistence("read cluster"))?
                .is_some()
            {
                return Err(TopologyError::DuplicateCluster(cluster.id.clone()));
            }
            clusters
                .insert(cluster.id.as_str(), data.as_slice())
                .map_err(TopologyError::persistence("write cluster"))?;

            let mut order = txn
                .open_table(CLUSTER_ORDER)
                .map_err(TopologyError::persistence("open cluster order"))?;
            let next = order
                .last()
                .map_err(TopologyError::persistence("read cluster order"))?
                .map(|(seq, _)| seq.value() + 1)
                .unwrap_or(0);
            order
                .insert(next, cluster.id.as_str())
                .map_err(TopologyError::persistence("write cluster order"))?;
        }
        txn.commit().map_err(TopologyError::persistence("commit"))?;

        info!(cluster_id = %cluster.id, worker_addr = %cluster.worker_addr, "cluster added");
        Ok(())
    }

    /// Lists all clusters in insertion order.
    pub fn list_clusters(&self) -> TopologyResult<Vec<Cluster>> {
        let txn = self.begin_read()?;
        let order = txn
            .open_table(CLUSTER_ORDER)
            .map_err(TopologyError::persistence("open cluster order"))?;
        let clusters = txn
            .open_table(CLUSTERS)
            .map_err(TopologyError::persistence("open clusters"))?;

        let mut list = Vec::new();
        for entry in order
            .iter()
            .map_err(TopologyError::persistence("scan cluster order"))?
        {
            let (_, id) = entry.map_err(TopologyError::persistence("scan cluster order"))?;
            let id = id.value();
            let found = clusters
                .get(id)
                .map_err(TopologyError::persistence("read cluster"))?;
            if let Some(guard) = found {
                list.push(decode(CLUSTERS_TABLE, id, guard.value())?);
            }
        }
        Ok(list)
    }

    /// Looks up one cluster.
    ///
    /// # Errors
    ///
    /// `ClusterNotFound` if no cluster has this id.
    pub fn get_cluster(&self, id: &str) -> TopologyResult<Cluster> {
        let txn = self.begin_read()?;
        let clusters = txn
            .open_table(CLUSTERS)
            .map_err(TopologyError::persistence("open clusters"))?;
        read_cluster(&clusters, id)
    }

    pub fn cluster_exists(&self, id: &str) -> TopologyResult<bool> {
        match self.get_cluster(id) {
            Ok(_) => Ok(true),
            Err(e) if e.is_not_found() => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Appends a host to a cluster. The host id is set to its IP.
    ///
    /// # Errors
    ///
    /// `ClusterNotFound` if the cluster does not exist; nothing is written.
    pub fn add_host(&self, cluster_id: &str, mut host: Host) -> TopologyResult<Host> {
        if host.ip.trim().is_empty() {
            return Err(TopologyError::InvalidInput(
                "host ip must not be empty".to_string(),
            ));
        }
        host.id = host.ip.clone();
        host.cluster_id = cluster_id.to_string();

        let host = self.append(HOSTS, HOSTS_TABLE, cluster_id, host)?;
        info!(cluster_id, host_id = %host.id, "host added");
        Ok(host)
    }

    /// Lists the hosts of a cluster. Unknown clusters yield an empty list.
    pub fn list_hosts(&self, cluster_id: &str) -> TopologyResult<Vec<Host>> {
        let txn = self.begin_read()?;
        let hosts = txn
            .open_table(HOSTS)
            .map_err(TopologyError::persistence("open hosts"))?;
        read_list(&hosts, HOSTS_TABLE, cluster_id)
    }

    /// Appends an instance to a cluster. The instance id is `host:port`.
    ///
    /// # Errors
    ///
    /// - `InvalidInput` if the host is blank or the port is zero
    /// - `ClusterNotFound` if the cluster does not exist; nothing is written
    pub fn add_instance(&self, cluster_id: &str, mut instance: Instance) -> TopologyResult<Instance> {
        if instance.host.trim().is_empty() {
            return Err(TopologyError::InvalidInput(
                "instance host must not be empty".to_string(),
            ));
        }
        if instance.port == 0 {
            return Err(TopologyError::InvalidInput(
                "instance port must be positive".to_string(),
            ));
        }
        instance.id = instance.addr();
        instance.cluster_id = cluster_id.to_string();

        let instance = self.append(INSTANCES, INSTANCES_TABLE, cluster_id, instance)?;
        info!(cluster_id, instance_id = %instance.id, role = %instance.role, "instance added");
        Ok(instance)
    }

    /// Lists the instances of a cluster. Unknown clusters yield an empty list.
    pub fn list_instances(&self, cluster_id: &str) -> TopologyResult<Vec<Instance>> {
        let txn = self.begin_read()?;
        let instances = txn
            .open_table(INSTANCES)
            .map_err(TopologyError::persistence("open instances"))?;
        read_list(&instances, INSTANCES_TABLE, cluster_id)
    }

    /// Reads a cluster with its hosts and instances from one snapshot.
    pub fn topology(&self, cluster_id: &str) -> TopologyResult<Topology> {
        let txn = self.begin_read()?;
        let open = TopologyError::persistence::<redb::TableError>;
        let clusters = txn.open_table(CLUSTERS).map_err(open("open clusters"))?;
        let hosts = txn.open_table(HOSTS).map_err(open("open hosts"))?;
        let instances = txn.open_table(INSTANCES).map_err(open("open instances"))?;

        Ok(Topology {
            cluster: read_cluster(&clusters, cluster_id)?,
            hosts: read_list(&hosts, HOSTS_TABLE, cluster_id)?,
            instances: read_list(&instances, INSTANCES_TABLE, cluster_id)?,
        })
    }

    /// Read-modify-write of one per-cluster list inside a single write
    /// transaction. Returning early aborts the transaction.
    fn append<T>(
        &self,
        definition: TableDefinition<&'static str, &'static [u8]>,
        table_name: &'static str,
        cluster_id: &str,
        item: T,
    ) -> TopologyResult<T>
    where
        T: Serialize + DeserializeOwned + Clone,
    {
        let txn = self.begin_write()?;
        {
            let clusters = txn
                .open_table(CLUSTERS)
                .map_err(TopologyError::persistence("open clusters"))?;
            if clusters
                .get(cluster_id)
                .map_err(TopologyError::persistence("read cluster"))?
                .is_none()
            {
                return Err(TopologyError::ClusterNotFound(cluster_id.to_string()));
            }
        }
        {
            let mut table = txn
                .open_table(definition)
                .map_err(TopologyError::persistence("open list table"))?;
            let mut list: Vec<T> = read_list(&table, table_name, cluster_id)?;
            list.push(item.clone());
            let data = encode(&list)?;
            table
                .insert(cluster_id, data.as_slice())
                .map_err(TopologyError::persistence("write list"))?;
            debug!(table = table_name, cluster_id, len = list.len(), "list rewritten");
        }
        txn.commit().map_err(TopologyError::persistence("commit"))?;
        Ok(item)
    }

    fn begin_read(&self) -> TopologyResult<ReadTransaction> {
        self.db
            .begin_read()
            .map_err(TopologyError::persistence("begin read"))
    }

    fn begin_write(&self) -> TopologyResult<WriteTransaction> {
        self.db
            .begin_write()
            .map_err(TopologyError::persistence("begin write"))
    }
}

fn read_cluster<R>(clusters: &R, id: &str) -> TopologyResult<Cluster>
where
    R: ReadableTable<&'static str, &'static [u8]>,
{
    let found = clusters
        .get(id)
        .map_err(TopologyError::persistence("read cluster"))?;
    match found {
        Some(guard) => decode(CLUSTERS_TABLE, id, guard.value()),
        None => Err(TopologyError::ClusterNotFound(id.to_string())),
    }
}

/// Missing keys decode as an empty list.
fn read_list<T, R>(table: &R, table_name: &'static str, key: &str) -> TopologyResult<Vec<T>>
where
    T: DeserializeOwned,
    R: ReadableTable<&'static str, &'static [u8]>,
{
    let found = table
        .get(key)
        .map_err(TopologyError::persistence("read list"))?;
    match found {
        Some(guard) => decode(table_name, key, guard.value()),
        None => Ok(Vec::new()),
    }
}

fn encode<T: Serialize + ?Sized>(value: &T) -> TopologyResult<Vec<u8>> {
    serde_json::to_vec(value).map_err(TopologyError::Encode)
}

fn decode<T: DeserializeOwned>(table: &'static str, key: &str, bytes: &[u8]) -> TopologyResult<T> {
    serde_json::from_slice(bytes).map_err(|source| TopologyError::Corrupted {
        table,
        key: key.to_string(),
        source,
    })
}
