/// Mutable state threaded through a whole translation run.
///
/// Both counters are monotonic for the lifetime of the value and are never
/// reset between units, so every synthesized label is unique run-wide.
#[derive(Debug, Default, Clone)]
pub struct TranslationContext {
    comparison_counter: usize,
    call_counter: usize,
    current_function: Option<String>,
    current_unit: String,
}

impl TranslationContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start translating a new source unit. Static slots are scoped to the
    /// unit, and no function is active until the unit declares one.
    pub fn begin_unit(&mut self, unit: &str) {
        self.current_unit = unit.to_string();
        self.current_function = None;
    }

    pub fn begin_function(&mut self, name: &str) {
        self.current_function = Some(name.to_string());
    }

    pub fn current_unit(&self) -> &str {
        &self.current_unit
    }

    pub fn current_function(&self) -> Option<&str> {
        self.current_function.as_deref()
    }

    pub fn next_comparison(&mut self) -> usize {
        let tmp = self.comparison_counter;
        self.comparison_counter += 1;
        tmp
    }

    pub fn next_call(&mut self) -> usize {
        let tmp = self.call_counter;
        self.call_counter += 1;
        tmp
    }

    /// `<unit>.<index>`
    pub fn static_symbol(&self, index: u16) -> String {
        format!("{}.{}", self.current_unit, index)
    }

    /// Qualify a VM label with the function it is declared in. Labels outside
    /// any function are scoped to the unit as `<unit>$$<label>`; VM symbols
    /// cannot contain `$`, so this never matches a `<function>$<label>`.
    pub fn label_symbol(&self, label: &str) -> String {
        match self.current_function() {
            Some(function) => format!("{}${}", function, label),
            None => format!("{}$${}", self.current_unit, label),
        }
    }
}
