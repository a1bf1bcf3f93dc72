// KubeRepo against a stand-in kubectl script
#![cfg(unix)]

use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use usage_charter::config::ClusterConfig;
use usage_charter::kube_repo::KubeRepo;
use usage_charter::source::MetricsSource;

/// Answers `/version` with `{}`; otherwise reports, as the container name of a single
/// pod reading, whether it shares its parent's process group.
const FAKE_KUBECTL: &str = r#"#!/bin/sh
case "$*" in
    *"/version"*) echo '{}'; exit 0 ;;
esac
pgid_of() {
    if [ -r "/proc/$1/stat" ]; then cut -d' ' -f5 "/proc/$1/stat"; else ps -o pgid= -p "$1" | tr -d ' '; fi
}
own=$(pgid_of $$)
parent=$(pgid_of $PPID)
if [ "$own" = "$parent" ]; then group=shared_pgroup; else group=own_pgroup; fi
printf '{"items":[{"metadata":{"name":"p-1"},"containers":[{"name":"%s","usage":{"cpu":"5m","memory":"3Mi"}}]}]}\n' "$group"
"#;

fn write_script(dir: &Path) -> PathBuf {
    let path = dir.join("kubectl");
    std::fs::write(&path, FAKE_KUBECTL).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    path
}

#[tokio::test]
async fn kubectl_runs_in_its_own_process_group() {
    let dir = tempfile::TempDir::new().unwrap();
    let script = write_script(dir.path());
    let config = ClusterConfig {
        kubectl: script.to_string_lossy().into_owned(),
        ..ClusterConfig::default()
    };
    let repo = KubeRepo::connect(&config, None).await.expect("connect");
    let readings = repo.sample().await.expect("sample");
    assert_eq!(readings.len(), 1);
    assert_eq!(readings[0].group, "own_pgroup");
    assert_eq!(readings[0].entity_name, "p-1");
    assert_eq!(readings[0].cpu, 5);
    assert_eq!(readings[0].mem, 3);
}

#[tokio::test]
async fn failing_kubectl_is_connection_error() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("kubectl");
    std::fs::write(&path, "#!/bin/sh\necho 'Unable to connect to the server' >&2\nexit 1\n").unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    let config = ClusterConfig {
        kubectl: path.to_string_lossy().into_owned(),
        ..ClusterConfig::default()
    };
    let err = KubeRepo::connect(&config, None).await.err().expect("connect must fail");
    assert!(matches!(err, usage_charter::ChartError::Connection(_)));
    assert!(err.to_string().contains("Unable to connect"));
}
