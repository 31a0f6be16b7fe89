//! Host list building with resolvers that drop or count nodes.

use std::fs;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use puppet_pssh::{HostList, Level, Logger, PsshError, Resolver};

/// Resolves like a nameserver that only knows some of the names.
struct ZoneResolver {
    known: Vec<(&'static str, &'static str)>,
    calls: AtomicUsize,
}

impl ZoneResolver {
    fn new(known: Vec<(&'static str, &'static str)>) -> Self {
        Self {
            known,
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl Resolver for ZoneResolver {
    async fn resolve(&self, node: &str, _log: &Logger) -> Result<Option<String>, PsshError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .known
            .iter()
            .find(|(name, _)| *name == node)
            .map(|(_, ip)| ip.to_string()))
    }
}

fn names(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

#[tokio::test]
async fn test_unresolvable_nodes_are_dropped() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("hostlist");
    let log = Logger::in_memory(Level::Info);
    let resolver = ZoneResolver::new(vec![("web1", "10.0.0.1"), ("db1", "10.0.0.3")]);

    let addresses = HostList::new(&path, false)
        .build(&names(&["web1", "web2", "db1"]), &resolver, &log)
        .await
        .unwrap();

    assert_eq!(addresses, names(&["10.0.0.1", "10.0.0.3"]));
    assert_eq!(fs::read_to_string(&path).unwrap(), "10.0.0.1\n10.0.0.3\n");
}

#[tokio::test]
async fn test_nodes_sharing_an_address_appear_once() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("hostlist");
    let log = Logger::in_memory(Level::Info);
    let resolver = ZoneResolver::new(vec![("www", "10.0.0.1"), ("web1", "10.0.0.1")]);

    let addresses = HostList::new(&path, false)
        .build(&names(&["www", "web1"]), &resolver, &log)
        .await
        .unwrap();

    assert_eq!(addresses, names(&["10.0.0.1"]));
}

#[tokio::test]
async fn test_cached_file_is_used_verbatim() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("hostlist");
    fs::write(&path, "anything goes\n\n10.9.9.9 root\n").unwrap();
    let log = Logger::in_memory(Level::Info);
    let resolver = ZoneResolver::new(vec![("web1", "10.0.0.1")]);

    let addresses = HostList::new(&path, true)
        .build(&names(&["web1"]), &resolver, &log)
        .await
        .unwrap();

    assert_eq!(addresses, names(&["anything goes", "", "10.9.9.9 root"]));
    assert_eq!(resolver.calls.load(Ordering::SeqCst), 0);
    assert_eq!(
        fs::read_to_string(&path).unwrap(),
        "anything goes\n\n10.9.9.9 root\n"
    );
}

#[tokio::test]
async fn test_without_cache_flag_existing_file_is_regenerated() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("hostlist");
    fs::write(&path, "old\n").unwrap();
    let log = Logger::in_memory(Level::Info);
    let resolver = ZoneResolver::new(vec![("web1", "10.0.0.1")]);

    HostList::new(&path, false)
        .build(&names(&["web1"]), &resolver, &log)
        .await
        .unwrap();

    assert_eq!(resolver.calls.load(Ordering::SeqCst), 1);
    assert_eq!(fs::read_to_string(&path).unwrap(), "10.0.0.1\n");
}

#[tokio::test]
async fn test_cached_file_with_invalid_utf8_is_read() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("hostlist");
    fs::write(&path, b"10.0.0.1\n\xff\xfe-latin1-h\xf6st\n").unwrap();
    let log = Logger::in_memory(Level::Info);
    let resolver = ZoneResolver::new(vec![]);

    let addresses = HostList::new(&path, true)
        .build(&names(&["web1"]), &resolver, &log)
        .await
        .unwrap();

    assert_eq!(addresses.len(), 2);
    assert_eq!(addresses[0], "10.0.0.1");
    assert!(addresses[1].contains("-latin1-h"));
    assert_eq!(resolver.calls.load(Ordering::SeqCst), 0);
    assert_eq!(
        fs::read(&path).unwrap(),
        b"10.0.0.1\n\xff\xfe-latin1-h\xf6st\n"
    );
}
