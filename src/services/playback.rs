//! Audio playback collaborator
//!
//! The core drives playback purely through [`PlaybackControl`] commands and
//! never inspects media content. The shipped implementation spawns an external
//! player process per source, in the same way other external actions in this
//! codebase run through spawned commands.

use std::{
    path::PathBuf,
    process::Stdio,
    sync::{
        atomic::{AtomicBool, Ordering},
        Mutex,
    },
};

use async_trait::async_trait;
use tokio::process::{Child, Command};
use tracing::{debug, info, warn};

/// Command boundary between the timer core and whatever plays audio.
///
/// `play` reports failure asynchronously; the core treats it as a warning,
/// never as a reason to stop the timer.
#[async_trait]
pub trait PlaybackControl: Send + Sync {
    fn set_loop(&self, looping: bool);
    async fn play(&self) -> Result<(), String>;
    fn pause(&self);
    fn rewind_to_start(&self);
    fn has_source(&self) -> bool;
    fn set_source(&self, path: PathBuf);
}

/// Plays the configured source by spawning an external player command.
///
/// A process-backed player has no seek position to keep: `pause` stops the
/// child and the next `play` starts a fresh one from the top of the track,
/// which also covers `rewind_to_start`.
pub struct CommandPlayer {
    command: String,
    source: Mutex<Option<PathBuf>>,
    looping: AtomicBool,
    child: Mutex<Option<Child>>,
}

impl CommandPlayer {
    pub fn new(command: String) -> Self {
        Self {
            command,
            source: Mutex::new(None),
            looping: AtomicBool::new(false),
            child: Mutex::new(None),
        }
    }

    fn stop_child(&self) {
        let Ok(mut child) = self.child.lock() else {
            warn!("Failed to lock player child handle");
            return;
        };
        if let Some(mut running) = child.take() {
            if let Err(e) = running.start_kill() {
                warn!("Failed to stop player process: {}", e);
            } else {
                debug!("Player process stopped");
            }
        }
    }
}

#[async_trait]
impl PlaybackControl for CommandPlayer {
    fn set_loop(&self, looping: bool) {
        self.looping.store(looping, Ordering::Relaxed);
    }

    async fn play(&self) -> Result<(), String> {
        let source = self
            .source
            .lock()
            .map_err(|e| format!("failed to lock playback source: {}", e))?
            .clone()
            .ok_or_else(|| "no audio source selected".to_string())?;

        // One player process at a time
        self.stop_child();

        let mut command = Command::new(&self.command);
        if self.looping.load(Ordering::Relaxed) {
            command.arg("--loop");
        }
        command
            .arg(&source)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());

        let child = command
            .spawn()
            .map_err(|e| format!("failed to launch {}: {}", self.command, e))?;

        *self
            .child
            .lock()
            .map_err(|e| format!("failed to lock player child handle: {}", e))? = Some(child);

        info!("Playing {}", source.display());
        Ok(())
    }

    fn pause(&self) {
        self.stop_child();
    }

    fn rewind_to_start(&self) {
        // Position resets with the process; nothing extra to do beyond stopping
        self.stop_child();
    }

    fn has_source(&self) -> bool {
        self.source.lock().map(|s| s.is_some()).unwrap_or(false)
    }

    fn set_source(&self, path: PathBuf) {
        info!("Audio source set to {}", path.display());
        if let Ok(mut source) = self.source.lock() {
            *source = Some(path);
        }
    }
}

#[cfg(test)]
pub mod testing {
    //! Recording player for exercising the timer core without spawning anything

    use std::{path::PathBuf, sync::Mutex};

    use async_trait::async_trait;

    use super::PlaybackControl;

    #[derive(Debug)]
    pub struct RecordingPlayer {
        pub commands: Mutex<Vec<String>>,
        has_source: Mutex<bool>,
        play_error: Mutex<Option<String>>,
    }

    impl RecordingPlayer {
        pub fn new(has_source: bool) -> Self {
            Self {
                commands: Mutex::new(Vec::new()),
                has_source: Mutex::new(has_source),
                play_error: Mutex::new(None),
            }
        }

        pub fn fail_play_with(&self, message: &str) {
            *self.play_error.lock().unwrap() = Some(message.to_string());
        }

        pub fn recorded(&self) -> Vec<String> {
            self.commands.lock().unwrap().clone()
        }

        fn record(&self, command: &str) {
            self.commands.lock().unwrap().push(command.to_string());
        }
    }

    #[async_trait]
    impl PlaybackControl for RecordingPlayer {
        fn set_loop(&self, looping: bool) {
            self.record(&format!("set_loop({})", looping));
        }

        async fn play(&self) -> Result<(), String> {
            self.record("play");
            match self.play_error.lock().unwrap().clone() {
                Some(message) => Err(message),
                None => Ok(()),
            }
        }

        fn pause(&self) {
            self.record("pause");
        }

        fn rewind_to_start(&self) {
            self.record("rewind");
        }

        fn has_source(&self) -> bool {
            *self.has_source.lock().unwrap()
        }

        fn set_source(&self, path: PathBuf) {
            self.record(&format!("set_source({})", path.display()));
            *self.has_source.lock().unwrap() = true;
        }
    }
}
