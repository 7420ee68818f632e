use crate::interpretation::CodeSystem;

/// Options for building a [`Normalizer`](crate::Normalizer).
#[derive(Debug, Clone)]
pub struct NormalizerOptions {
    /// Extra code systems, consulted before the built-in ones.
    pub code_systems: Vec<CodeSystem>,

    /// Whether the built-in HL7 and internal code systems are recognized.
    /// Default: true.
    pub include_builtin: bool,
}

impl Default for NormalizerOptions {
    fn default() -> Self {
        Self {
            code_systems: Vec::new(),
            include_builtin: true,
        }
    }
}

impl NormalizerOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_code_system(mut self, system: CodeSystem) -> Self {
        self.code_systems.push(system);
        self
    }

    pub fn with_builtin(mut self, enable: bool) -> Self {
        self.include_builtin = enable;
        self
    }
}
