//! Helpers shared by unit tests that touch process-global state.

use std::env;
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard};

lazy_static! {
    static ref CWD_LOCK: Mutex<()> = Mutex::new(());
}

/// The working directory is shared by every test thread; hold this while
/// reading or changing it.
pub fn cwd_lock() -> MutexGuard<'static, ()> {
    CWD_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Puts the working directory back when dropped.
pub struct RestoreCwd(PathBuf);

impl RestoreCwd {
    pub fn new() -> Self {
        RestoreCwd(env::current_dir().expect("test cwd should be readable"))
    }
}

impl Drop for RestoreCwd {
    fn drop(&mut self) {
        let _ = env::set_current_dir(&self.0);
    }
}
