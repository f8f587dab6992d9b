use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

/// Watches the settings file and calls back when it changes.
///
/// The parent directory is watched rather than the file itself, since most
/// editors save by writing a temp file and renaming it over the original.
pub struct SettingsWatcher {
    _watcher: RecommendedWatcher,
    path: PathBuf,
}

impl SettingsWatcher {
    pub fn new<F>(path: &Path, on_change: F) -> Result<Self, ConfigError>
    where
        F: Fn() + Send + 'static,
    {
        let (sync_tx, sync_rx) = std::sync::mpsc::channel();

        let watch_err = |source| ConfigError::Watch {
            path: path.to_path_buf(),
            source,
        };

        let mut watcher = RecommendedWatcher::new(sync_tx, Config::default()).map_err(watch_err)?;

        let dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        watcher
            .watch(dir, RecursiveMode::NonRecursive)
            .map_err(watch_err)?;

        let target = path.to_path_buf();
        // Ends when the watcher (and with it the sender) is dropped.
        std::thread::Builder::new()
            .name("settings-watcher".into())
            .spawn(move || {
                for res in sync_rx {
                    match res {
                        Ok(event) => {
                            if touches(&event, &target) {
                                tracing::debug!(path = %target.display(), "settings changed");
                                on_change();
                            }
                        }
                        Err(e) => tracing::error!("Watch error: {:?}", e),
                    }
                }
            })
            .map_err(|e| watch_err(notify::Error::io(e)))?;

        tracing::info!(path = %path.display(), "watching settings file");
        Ok(Self {
            _watcher: watcher,
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn touches(event: &Event, target: &Path) -> bool {
    let relevant = matches!(
        event.kind,
        EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_)
    );
    relevant
        && event
            .paths
            .iter()
            .any(|p| p.file_name() == target.file_name())
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::event::{CreateKind, ModifyKind};

    #[test]
    fn test_touches_matches_by_file_name() {
        let target = Path::new("/tmp/ghostcursor/config.json");
        let hit = Event::new(EventKind::Modify(ModifyKind::Any))
            .add_path(PathBuf::from("/tmp/ghostcursor/config.json"));
        let miss = Event::new(EventKind::Create(CreateKind::File))
            .add_path(PathBuf::from("/tmp/ghostcursor/other.json"));
        assert!(touches(&hit, target));
        assert!(!touches(&miss, target));
    }

    #[test]
    fn test_access_events_are_ignored() {
        let target = Path::new("config.json");
        let access = Event::new(EventKind::Access(notify::event::AccessKind::Any))
            .add_path(PathBuf::from("config.json"));
        assert!(!touches(&access, target));
    }
}
