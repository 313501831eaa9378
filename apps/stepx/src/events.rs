//! Event handling and user feedback

use console::style;
use stepx_events::{AppEvent, GeneralEvent, StepEvent};

/// Event handler rendering step progress to the terminal
///
/// In JSON mode all events are swallowed: the final result document is
/// the only output, so nothing may contaminate stdout.
pub struct EventHandler {
    colors_enabled: bool,
    debug_enabled: bool,
    json_mode: bool,
}

impl EventHandler {
    /// Create new event handler
    pub fn new(colors_enabled: bool, debug_enabled: bool, json_mode: bool) -> Self {
        Self {
            colors_enabled,
            debug_enabled,
            json_mode,
        }
    }

    /// Handle incoming event
    pub fn handle_event(&mut self, event: AppEvent) {
        if self.json_mode {
            return;
        }
        match event {
            AppEvent::Step(step) => self.handle_step_event(&step),
            AppEvent::General(general) => self.handle_general_event(&general),
        }
    }

    fn handle_step_event(&self, event: &StepEvent) {
        match event {
            StepEvent::Started {
                installation,
                nature,
                ..
            } => {
                self.show_status(&format!("Running {nature} step on {installation}"));
            }
            StepEvent::InstallationNotFound { name, .. } => {
                self.show_error(&format!(
                    "No installation named {name} is configured on this node"
                ));
            }
            StepEvent::InterpreterNotFound { home, .. } => {
                self.show_error(&format!("No interpreter found in {}", home.display()));
            }
            StepEvent::ScriptMaterialized {
                program, script, ..
            } => {
                if self.debug_enabled {
                    self.show_status(&format!(
                        "{} {}",
                        program.display(),
                        script.display()
                    ));
                }
            }
            StepEvent::Completed {
                exit_code,
                verdict,
                duration,
                ..
            } => {
                let outcome = if *verdict {
                    self.paint_green("passed")
                } else {
                    self.paint_red("failed")
                };
                self.show_status(&format!(
                    "Step {outcome} (exit code {exit_code}, {duration:.1?})"
                ));
            }
        }
    }

    fn handle_general_event(&self, event: &GeneralEvent) {
        match event {
            GeneralEvent::Warning { message, context } => {
                let mut line = format!("Warning: {message}");
                if let Some(context) = context {
                    line.push_str(&format!(" ({context})"));
                }
                eprintln!("{}", self.paint_yellow(&line));
            }
            GeneralEvent::Error { message, details } => {
                self.show_error(message);
                if let Some(details) = details {
                    eprintln!("  {details}");
                }
            }
            GeneralEvent::DebugLog { message, .. } => {
                if self.debug_enabled {
                    self.show_status(message);
                }
            }
            GeneralEvent::OperationStarted { operation } => {
                self.show_status(operation);
            }
            GeneralEvent::OperationCompleted { operation, success } => {
                if *success {
                    self.show_status(&format!("{operation} done"));
                } else {
                    self.show_error(&format!("{operation} failed"));
                }
            }
            GeneralEvent::OperationFailed { operation, error } => {
                self.show_error(&format!("{operation}: {error}"));
            }
        }
    }

    fn show_status(&self, message: &str) {
        println!("{message}");
    }

    fn show_error(&self, message: &str) {
        eprintln!("{}", self.paint_red(message));
    }

    fn paint_red(&self, text: &str) -> String {
        if self.colors_enabled {
            style(text).red().to_string()
        } else {
            text.to_string()
        }
    }

    fn paint_green(&self, text: &str) -> String {
        if self.colors_enabled {
            style(text).green().to_string()
        } else {
            text.to_string()
        }
    }

    fn paint_yellow(&self, text: &str) -> String {
        if self.colors_enabled {
            style(text).yellow().to_string()
        } else {
            text.to_string()
        }
    }
}
