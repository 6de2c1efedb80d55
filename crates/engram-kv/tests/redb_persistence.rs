//! Persistence tests for the redb backend.

use engram_kv::{KvClient, RedbKv};

#[test]
fn values_survive_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("engram.redb");

    {
        let kv = RedbKv::open(&path, "tenant-a").unwrap();
        kv.set("layers", "2").unwrap();
        kv.set_many(&[
            ("0".to_string(), "point-zero".to_string()),
            ("m:0".to_string(), "{\"tag\":\"a\"}".to_string()),
        ])
        .unwrap();
    }

    let kv = RedbKv::open(&path, "tenant-a").unwrap();
    assert_eq!(kv.get("layers").unwrap(), Some("2".to_string()));
    assert_eq!(kv.get("0").unwrap(), Some("point-zero".to_string()));
    assert_eq!(kv.get("m:0").unwrap(), Some("{\"tag\":\"a\"}".to_string()));
}

#[test]
fn namespaces_survive_reopen_independently() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("engram.redb");

    {
        let kv = RedbKv::open(&path, "tenant-a").unwrap();
        kv.set("points", "3").unwrap();
        kv.contract("tenant-b").unwrap().set("points", "7").unwrap();
    }

    let kv = RedbKv::open(&path, "tenant-a").unwrap();
    assert_eq!(kv.get("points").unwrap(), Some("3".to_string()));
    assert_eq!(
        kv.contract("tenant-b").unwrap().get("points").unwrap(),
        Some("7".to_string())
    );
}
