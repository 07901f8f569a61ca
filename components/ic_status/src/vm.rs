//! Virtual machine state shared by every status builder
//!
//! Builders only read from the VM: the heap for shapes and objects, the
//! common property names, and the options.

use core_types::CommonIdentifiers;
use memory_manager::Heap;

use crate::config::{ConfigError, StatusOptions};

/// Virtual Machine state consulted while summarizing feedback
///
/// The VM owns:
/// - The heap holding every hidden class and object
/// - Property names the runtime reads implicitly
/// - Status computation options
#[derive(Debug, Default)]
pub struct VM {
    /// Heap of hidden classes and objects
    pub heap: Heap,
    /// Implicitly read property names
    pub names: CommonIdentifiers,
    /// Status computation options
    pub options: StatusOptions,
}

impl VM {
    /// Create a VM with an empty heap and default options
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a VM with the given options
    ///
    /// # Example
    ///
    /// ```
    /// use ic_status::{StatusOptions, VM};
    ///
    /// let options = StatusOptions::from_json(r#"{ "use_stub_feedback": false }"#).unwrap();
    /// let vm = VM::with_options(options).unwrap();
    /// assert!(!vm.options.use_stub_feedback);
    /// ```
    pub fn with_options(options: StatusOptions) -> Result<Self, ConfigError> {
        options.validate()?;
        Ok(Self {
            options,
            ..Self::default()
        })
    }

    /// Create a VM configured from `IC_STATUS_*` environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::with_options(StatusOptions::from_env()?)
    }
}
