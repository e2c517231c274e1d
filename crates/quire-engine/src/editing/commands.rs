use std::collections::BTreeMap;
use std::fmt;

use thiserror::Error;

use crate::editing::{Model, Patch, Writer};

/// Listener notified inside the change a command ran in
pub type AfterExecuteListener = Box<dyn FnMut(&str, &mut Writer<'_>)>;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("Unknown command `{0}`")]
    Unknown(String),
}

/// State shared by every command: enabled flag and execution listeners
pub struct CommandBase {
    enabled: bool,
    forced_disabled: bool,
    after_execute: Vec<AfterExecuteListener>,
}

impl Default for CommandBase {
    fn default() -> Self {
        Self {
            enabled: true,
            forced_disabled: false,
            after_execute: Vec::new(),
        }
    }
}

impl fmt::Debug for CommandBase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandBase")
            .field("enabled", &self.enabled)
            .field("forced_disabled", &self.forced_disabled)
            .field("after_execute", &self.after_execute.len())
            .finish()
    }
}

impl CommandBase {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled && !self.forced_disabled
    }

    /// Set by `refresh`; overridden by `force_disabled`
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Keep the command disabled whatever `refresh` decides
    pub fn force_disabled(&mut self) {
        self.forced_disabled = true;
    }

    pub fn clear_force_disabled(&mut self) {
        self.forced_disabled = false;
    }

    pub fn on_after_execute(&mut self, listener: impl FnMut(&str, &mut Writer<'_>) + 'static) {
        self.after_execute.push(Box::new(listener));
    }

    pub(crate) fn fire_after_execute(&mut self, name: &str, writer: &mut Writer<'_>) {
        for listener in &mut self.after_execute {
            listener(name, writer);
        }
    }
}

/// An editing operation that runs inside one model change
pub trait Command {
    fn name(&self) -> &'static str;

    fn base(&self) -> &CommandBase;

    fn base_mut(&mut self) -> &mut CommandBase;

    /// Recompute whether the command can run against the current model
    fn refresh(&mut self, _model: &Model) {
        self.base_mut().set_enabled(true);
    }

    /// The edit itself
    fn run(&mut self, writer: &mut Writer<'_>);

    fn is_enabled(&self) -> bool {
        self.base().is_enabled()
    }

    /// Run the command in a change of its own and notify listeners within it.
    /// Returns `None` without touching the model when disabled.
    fn execute(&mut self, model: &mut Model) -> Option<Patch> {
        let name = self.name();
        if !self.is_enabled() {
            log::debug!("command `{name}` is disabled, not executing");
            return None;
        }

        let patch = model.change(|writer| {
            self.run(writer);
            self.base_mut().fire_after_execute(name, writer);
        });
        log::debug!(
            "command `{name}` executed with {} operation(s)",
            patch.operations.len()
        );
        Some(patch)
    }
}

/// Commands registered by name
#[derive(Default)]
pub struct CommandCollection {
    commands: BTreeMap<&'static str, Box<dyn Command>>,
}

impl CommandCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a command, replacing any command with the same name
    pub fn add(&mut self, command: impl Command + 'static) {
        let name = command.name();
        if self.commands.insert(name, Box::new(command)).is_some() {
            log::warn!("command `{name}` registered twice, keeping the latest");
        }
    }

    pub fn get(&self, name: &str) -> Option<&dyn Command> {
        self.commands.get(name).map(|command| command.as_ref())
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut (dyn Command + 'static)> {
        self.commands.get_mut(name).map(|command| command.as_mut())
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.commands.keys().copied()
    }

    pub fn refresh_all(&mut self, model: &Model) {
        for command in self.commands.values_mut() {
            command.refresh(model);
        }
    }

    /// Refresh and execute the named command
    pub fn execute(&mut self, name: &str, model: &mut Model) -> Result<Option<Patch>, CommandError> {
        let command = self
            .get_mut(name)
            .ok_or_else(|| CommandError::Unknown(name.to_string()))?;
        command.refresh(model);
        Ok(command.execute(model))
    }
}
