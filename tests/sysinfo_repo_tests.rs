// Live provider smoke test against the host running the tests

use glances::config::FilesystemConfig;
use glances::sysinfo_repo::{MetricsProvider, SysinfoRepo};

#[tokio::test]
async fn snapshot_reads_the_local_host() {
    let repo = SysinfoRepo::new(FilesystemConfig::default())
        .init()
        .await
        .expect("init");
    let snapshot = repo.snapshot().await;

    let host = snapshot.host.expect("host info");
    assert!(!host.platform.is_empty());
    if let Some(cpu) = &snapshot.cpu {
        let total = cpu.user + cpu.kernel + cpu.nice + cpu.idle;
        assert!(total <= 100.0 + 1e-6);
    }
    if let Some(mem) = &snapshot.mem {
        assert!(mem.total > 0);
        assert!(mem.real_used() <= mem.total);
    }
    if let Some(processes) = &snapshot.processes {
        assert!(processes.windows(2).all(|w| w[0].pid < w[1].pid));
    }
}

#[tokio::test]
async fn ignored_filesystem_types_are_filtered() {
    let filter = FilesystemConfig {
        ignore_names: vec![],
        ignore_types: vec!["proc".into(), "sysfs".into(), "ext4".into()],
    };
    let repo = SysinfoRepo::new(filter);
    if let Ok(filesystems) = repo.get_filesystems().await {
        assert!(filesystems.iter().all(|fs| fs.fs_type != "ext4"));
    }
}
