pub type RingloopResult<T> = Result<T, RingloopError>;

#[derive(thiserror::Error, Debug)]
pub enum RingloopError {
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("navigation error: {0}")]
    Navigation(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl RingloopError {
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    pub fn navigation(msg: impl Into<String>) -> Self {
        Self::Navigation(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_prefixes_are_stable() {
        assert!(
            RingloopError::configuration("x")
                .to_string()
                .contains("configuration error:")
        );
        assert!(
            RingloopError::navigation("x")
                .to_string()
                .contains("navigation error:")
        );
    }

    #[test]
    fn other_preserves_source() {
        let base = std::io::Error::other("boom");
        let err = RingloopError::Other(anyhow::Error::new(base));
        assert!(err.to_string().contains("boom"));
    }
}
