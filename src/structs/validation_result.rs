#[derive(Debug, Default)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidationResult {
    pub fn from_findings(errors: Vec<String>, warnings: Vec<String>) -> Self {
        Self {
            is_valid: errors.is_empty(),
            errors,
            warnings,
        }
    }

    pub fn log_summary(&self) {
        if self.is_valid {
            log::info!("✅ Configuration validation passed");
        } else {
            log::error!("❌ Configuration validation failed with {} errors", self.errors.len());
        }

        if !self.warnings.is_empty() {
            log::warn!("⚠️ {} warnings found", self.warnings.len());
        }

        for error in &self.errors {
            log::error!("   ❌ {}", error);
        }

        for warning in &self.warnings {
            log::warn!("   ⚠️ {}", warning);
        }
    }
}
