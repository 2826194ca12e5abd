use crate::error::{ViewportError, ViewportResult};

use super::ViewportEngineConfig;

pub(super) fn validate_engine_config(config: ViewportEngineConfig) -> ViewportResult<()> {
    validate_non_negative_px(config.edge_margin_px, "edge margin")?;
    validate_non_negative_px(config.column_lead_in_px, "column lead-in")?;
    validate_non_negative_px(config.denoise_threshold_px, "denoise threshold")?;

    if !config.animation_epsilon_px.is_finite() || config.animation_epsilon_px <= 0.0 {
        return Err(ViewportError::InvalidConfig(
            "animation epsilon must be finite and > 0".to_owned(),
        ));
    }
    if config.locate_timeout_ms == 0 {
        return Err(ViewportError::InvalidConfig(
            "locate timeout must be > 0 ms".to_owned(),
        ));
    }
    if config.guard_window_ms == 0 {
        return Err(ViewportError::InvalidConfig(
            "navigation guard window must be > 0 ms".to_owned(),
        ));
    }
    Ok(())
}

fn validate_non_negative_px(value: f64, name: &str) -> ViewportResult<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(ViewportError::InvalidConfig(format!(
            "{name} must be finite and >= 0"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::validate_engine_config;
    use crate::api::ViewportEngineConfig;
    use crate::error::ViewportError;

    #[test]
    fn default_config_is_valid() {
        assert!(validate_engine_config(ViewportEngineConfig::default()).is_ok());
    }

    #[test]
    fn rejects_negative_margin_and_zero_timeouts() {
        let err = validate_engine_config(ViewportEngineConfig::default().with_edge_margin_px(-1.0))
            .expect_err("negative margin");
        assert!(matches!(err, ViewportError::InvalidConfig(_)));

        let err = validate_engine_config(ViewportEngineConfig::default().with_locate_timeout_ms(0))
            .expect_err("zero timeout");
        assert!(matches!(err, ViewportError::InvalidConfig(_)));

        let err = validate_engine_config(
            ViewportEngineConfig::default().with_animation_epsilon_px(f64::NAN),
        )
        .expect_err("nan epsilon");
        assert!(matches!(err, ViewportError::InvalidConfig(_)));
    }
}
