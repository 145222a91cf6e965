//! Error type behaviour

#[cfg(test)]
mod tests {
    use crate::config::ConfigError;
    use crate::render::api::ShaderId;
    use crate::render::{BindingViolation, RenderError};

    #[test]
    fn test_binding_violation_summary_names_first_defect() {
        let error = RenderError::BindingViolations(vec![
            BindingViolation::MatrixUnderflow,
            BindingViolation::ShaderLeftBound(ShaderId(3)),
        ]);
        let message = error.to_string();
        assert!(message.starts_with("2 binding violation(s)"));
        assert!(message.contains("matrix stack popped while empty"));
    }

    #[test]
    fn test_config_error_converts() {
        let error: RenderError = ConfigError::Invalid("far <= near".into()).into();
        assert!(matches!(error, RenderError::Config(_)));
    }
}
