//! Programs: named, ordered lists of init steps and checks.
//!
//! The registry is built once at startup and never mutated afterwards.

use crate::core::check::Check;
use crate::core::environment::Environment;
use crate::core::error::PresubmitError;
use crate::core::process::ProcessRunner;
use std::collections::{BTreeMap, HashSet};

pub type InitFn = fn(&mut Environment, &dyn ProcessRunner) -> Result<(), PresubmitError>;

/// Environment provisioning that must succeed before any check runs.
#[derive(Clone, Copy)]
pub struct InitStep {
    pub name: &'static str,
    pub func: InitFn,
}

impl InitStep {
    pub const fn new(name: &'static str, func: InitFn) -> Self {
        Self { name, func }
    }
}

pub enum Step {
    Init(InitStep),
    Check(Box<dyn Check>),
}

impl Step {
    pub fn name(&self) -> &str {
        match self {
            Step::Init(init) => init.name,
            Step::Check(check) => check.name(),
        }
    }
}

pub struct Program {
    name: String,
    steps: Vec<Step>,
}

impl Program {
    /// Step names must be unique within a program.
    pub fn new(name: impl Into<String>, steps: Vec<Step>) -> Result<Self, PresubmitError> {
        let name = name.into();
        let mut seen = HashSet::new();
        for step in &steps {
            if !seen.insert(step.name().to_string()) {
                return Err(PresubmitError::ConfigError(format!(
                    "program '{}' lists step '{}' more than once",
                    name,
                    step.name()
                )));
            }
        }
        Ok(Self { name, steps })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn init_steps(&self) -> impl Iterator<Item = &InitStep> {
        self.steps.iter().filter_map(|s| match s {
            Step::Init(init) => Some(init),
            Step::Check(_) => None,
        })
    }

    pub fn checks(&self) -> impl Iterator<Item = &(dyn Check + 'static)> {
        self.steps.iter().filter_map(|s| match s {
            Step::Check(check) => Some(check.as_ref()),
            Step::Init(_) => None,
        })
    }
}

#[derive(Default)]
pub struct Registry {
    programs: BTreeMap<String, Program>,
}

impl Registry {
    pub fn from_programs(programs: Vec<Program>) -> Result<Self, PresubmitError> {
        let mut map = BTreeMap::new();
        for program in programs {
            let name = program.name().to_string();
            if map.insert(name.clone(), program).is_some() {
                return Err(PresubmitError::ConfigError(format!(
                    "program '{}' registered twice",
                    name
                )));
            }
        }
        Ok(Self { programs: map })
    }

    pub fn get(&self, name: &str) -> Result<&Program, PresubmitError> {
        self.programs.get(name).ok_or_else(|| {
            PresubmitError::NotFound(format!(
                "program '{}' (available: {})",
                name,
                self.names().join(", ")
            ))
        })
    }

    pub fn names(&self) -> Vec<&str> {
        self.programs.keys().map(String::as_str).collect()
    }

    pub fn programs(&self) -> impl Iterator<Item = &Program> {
        self.programs.values()
    }
}
