mod command;

use crate::model::{InfoEvent, RunConfig};
use std::process::Command;
use std::sync::mpsc;

/// What an invocation looked like, for the run record.
pub struct Invocation {
    pub command_line: String,
    pub exit_code: Option<i32>,
}

pub struct ToolEngine {
    cfg: RunConfig,
}

impl ToolEngine {
    pub fn new(cfg: RunConfig) -> Self {
        Self { cfg }
    }

    /// Invoke CellProfiler headless and block until it exits.
    ///
    /// The exit status is reported as an event but never drives control
    /// flow, and a spawn failure (binary not on PATH) is reported the same
    /// way. The guard/rename logic downstream treats failed and successful
    /// runs alike.
    pub fn run(&self, events: &mpsc::Sender<InfoEvent>) -> Invocation {
        let argv = command::build_command_line(&self.cfg);
        let rendered = command::render_command_line(&argv);
        let _ = events.send(InfoEvent::Message(format!("Running: {}", rendered)));

        let exit_code = match Command::new(&argv[0]).args(&argv[1..]).status() {
            Ok(status) => {
                let _ = events.send(InfoEvent::ToolExit {
                    code: status.code(),
                });
                status.code()
            }
            Err(e) => {
                let _ = events.send(InfoEvent::ToolSpawnFailed {
                    error: e.to_string(),
                });
                None
            }
        };

        Invocation {
            command_line: rendered,
            exit_code,
        }
    }
}
