use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;

/// Take every permission away from `dir`.
///
/// Returns false, with the permissions restored, when the current user can
/// still list it anyway (root or CAP_DAC_OVERRIDE) and the caller has
/// nothing to observe.
pub(crate) fn lock_dir(dir: &Path) -> bool {
    fs::set_permissions(dir, fs::Permissions::from_mode(0o000)).unwrap();
    if fs::read_dir(dir).is_ok() {
        unlock_dir(dir);
        eprintln!(
            "skipped: {} is still readable after chmod 000, run as an unprivileged user",
            dir.display()
        );
        return false;
    }
    true
}

pub(crate) fn unlock_dir(dir: &Path) {
    fs::set_permissions(dir, fs::Permissions::from_mode(0o755)).unwrap();
}
