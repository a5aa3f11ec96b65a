//! Tool registry holding the tools available to a session.

use crate::error::ToolError;
use crate::tools::Tool;
use std::collections::HashMap;
use std::fmt::Write;

/// Registry of tools, keyed by unique name, remembering insertion order.
///
/// The engine takes the registry behind an `Arc`, so it can no longer be
/// mutated once questions are being answered.
pub struct ToolRegistry {
    tools: HashMap<String, Box<dyn Tool>>,
    order: Vec<String>,
}

impl std::fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolRegistry")
            .field("tools", &self.order)
            .finish()
    }
}

impl ToolRegistry {
    /// Creates a new empty tool registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
            order: Vec::new(),
        }
    }

    /// Registers a tool under its own name.
    ///
    /// # Errors
    ///
    /// Returns [`ToolError::Duplicate`] if the name is already taken.
    pub fn register(&mut self, tool: impl Tool + 'static) -> Result<(), ToolError> {
        self.register_boxed(Box::new(tool))
    }

    /// Registers an already boxed tool.
    ///
    /// # Errors
    ///
    /// Returns [`ToolError::Duplicate`] if the name is already taken.
    pub fn register_boxed(&mut self, tool: Box<dyn Tool>) -> Result<(), ToolError> {
        let name = tool.name().into_owned();
        if self.tools.contains_key(&name) {
            return Err(ToolError::Duplicate { name });
        }
        tracing::debug!(tool = %name, "Registered tool");
        self.order.push(name.clone());
        self.tools.insert(name, tool);
        Ok(())
    }

    /// Looks a tool up by name.
    ///
    /// # Errors
    ///
    /// Returns [`ToolError::NotFound`] listing the registered names.
    pub fn lookup(&self, name: &str) -> Result<&dyn Tool, ToolError> {
        self.tools
            .get(name)
            .map(|tool| tool.as_ref())
            .ok_or_else(|| ToolError::NotFound {
                name: name.to_string(),
                available: self.order.clone(),
            })
    }

    /// Returns the registered names in insertion order.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.order.iter().map(String::as_str).collect()
    }

    /// Returns one `name: description` block per tool, in insertion order.
    #[must_use]
    pub fn help_text(&self) -> String {
        let mut text = String::new();
        for tool in self.order.iter().filter_map(|name| self.tools.get(name)) {
            let _ = writeln!(text, "{}: {}", tool.name(), tool.description().trim());
        }
        text
    }

    /// Number of registered tools.
    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Returns `true` if no tool is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}
