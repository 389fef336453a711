use std::error::Error;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{Receiver, channel};

use cubefall_game::{Game, GameConfig};
use serde::Deserialize;

/// Window and camera settings read from the same file as the game rules.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct HostConfig {
    #[serde(default)]
    pub window: WindowConfig,
    #[serde(default)]
    pub camera: CameraConfig,
}

#[derive(Clone, Debug, Deserialize)]
pub struct WindowConfig {
    #[serde(default = "default_width")]
    pub width: i32,
    #[serde(default = "default_height")]
    pub height: i32,
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default = "default_fps")]
    pub target_fps: u32,
}

fn default_width() -> i32 {
    1280
}
fn default_height() -> i32 {
    720
}
fn default_title() -> String {
    "Cubefall".to_string()
}
fn default_fps() -> u32 {
    60
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            title: default_title(),
            target_fps: default_fps(),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct CameraConfig {
    #[serde(default = "default_distance")]
    pub distance: f32,
    #[serde(default = "default_yaw")]
    pub yaw: f32,
    #[serde(default = "default_pitch")]
    pub pitch: f32,
    #[serde(default = "default_fov")]
    pub fov: f32,
}

fn default_distance() -> f32 {
    26.0
}
fn default_yaw() -> f32 {
    -90.0
}
fn default_pitch() -> f32 {
    28.0
}
fn default_fov() -> f32 {
    45.0
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            distance: default_distance(),
            yaw: default_yaw(),
            pitch: default_pitch(),
            fov: default_fov(),
        }
    }
}

/// Game rules from `path`; a missing file means defaults.
pub fn load_game_config(path: &Path) -> Result<GameConfig, Box<dyn Error>> {
    if !path.exists() {
        log::info!("{} not found; using default settings", path.display());
        return Ok(GameConfig::default());
    }
    let cfg = GameConfig::load(path)?;
    log::info!("loaded settings from {}", path.display());
    Ok(cfg)
}

/// Host settings never stop startup; problems fall back to defaults.
pub fn load_host_config(path: &Path) -> HostConfig {
    if !path.exists() {
        return HostConfig::default();
    }
    match std::fs::read_to_string(path) {
        Ok(s) => match toml::from_str::<HostConfig>(&s) {
            Ok(cfg) => cfg,
            Err(e) => {
                log::warn!("{} host section parse error: {}", path.display(), e);
                HostConfig::default()
            }
        },
        Err(e) => {
            log::warn!("{} read error: {}", path.display(), e);
            HostConfig::default()
        }
    }
}

/// Whether a watcher event touches the config file. Editors that save by
/// renaming over the file report a remove followed by a create.
fn is_reload_event(event: &notify::Event, file_name: Option<&OsStr>) -> bool {
    use notify::EventKind;
    let relevant = matches!(
        event.kind,
        EventKind::Modify(_) | EventKind::Create(_) | EventKind::Remove(_) | EventKind::Any
    );
    relevant && (event.paths.is_empty() || event.paths.iter().any(|p| p.file_name() == file_name))
}

/// Watches the directory holding `path` on a background thread; every change
/// to the file sends `()`. The directory is watched so the watch survives the
/// file being replaced.
pub fn spawn_config_watcher(path: PathBuf) -> Receiver<()> {
    let (tx, rx) = channel::<()>();
    std::thread::spawn(move || {
        use notify::{RecursiveMode, Watcher};
        let file_name = path.file_name().map(OsStr::to_os_string);
        let dir = match path.parent() {
            Some(d) if !d.as_os_str().is_empty() => d.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let mut watcher =
            match notify::recommended_watcher(move |res: Result<notify::Event, notify::Error>| {
                if let Ok(event) = res {
                    if is_reload_event(&event, file_name.as_deref()) {
                        let _ = tx.send(());
                    }
                }
            }) {
                Ok(w) => w,
                Err(e) => {
                    log::warn!("config watcher unavailable: {}", e);
                    return;
                }
            };
        if let Err(e) = watcher.watch(&dir, RecursiveMode::NonRecursive) {
            log::warn!("cannot watch {}: {}", dir.display(), e);
            return;
        }
        log::info!("watching {} for changes", path.display());
        loop {
            std::thread::sleep(std::time::Duration::from_secs(3600));
        }
    });
    rx
}

/// Drains watcher notifications and hands a freshly parsed config to the
/// game. Parse errors keep the current settings.
pub fn poll_config_reload(rx: Option<&Receiver<()>>, path: &Path, game: &mut Game) {
    let Some(rx) = rx else {
        return;
    };
    if rx.try_iter().count() == 0 {
        return;
    }
    match GameConfig::load(path) {
        Ok(cfg) => {
            if let Err(e) = game.queue_config(cfg) {
                log::warn!("rejected reloaded settings: {}", e);
            }
        }
        Err(e) => log::warn!("settings reload failed: {}", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::event::{CreateKind, ModifyKind, RemoveKind};
    use notify::{Event, EventKind};

    fn event(kind: EventKind, path: &str) -> Event {
        Event::new(kind).add_path(PathBuf::from(path))
    }

    #[test]
    fn reload_follows_writes_replacements_and_removals() {
        let name = Some(OsStr::new("cubefall.toml"));
        let kinds = [
            EventKind::Modify(ModifyKind::Any),
            EventKind::Create(CreateKind::File),
            EventKind::Remove(RemoveKind::File),
            EventKind::Any,
        ];
        for kind in kinds {
            let e = event(kind, "/cfg/cubefall.toml");
            assert!(is_reload_event(&e, name), "{:?}", e.kind);
        }
        let access = EventKind::Access(notify::event::AccessKind::Any);
        assert!(!is_reload_event(&event(access, "/cfg/cubefall.toml"), name));
    }

    #[test]
    fn reload_ignores_neighbouring_files() {
        let name = Some(OsStr::new("cubefall.toml"));
        let other = event(EventKind::Modify(ModifyKind::Any), "/cfg/other.toml");
        assert!(!is_reload_event(&other, name));
        let unnamed = Event::new(EventKind::Any);
        assert!(is_reload_event(&unnamed, name));
    }
}
