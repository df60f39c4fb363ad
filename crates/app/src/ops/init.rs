use clap::Args;

use crate::state::{AppConfig, AppState};

#[derive(Args, Debug, Clone)]
pub struct Init {
    /// Default log level written to the config (default: warn)
    #[arg(long, default_value = "warn")]
    pub default_log_level: String,
}

#[derive(Debug, thiserror::Error)]
pub enum InitError {
    #[error("init failed: {0}")]
    StateFailed(#[from] crate::state::StateError),
}

#[async_trait::async_trait]
impl crate::op::Op for Init {
    type Error = InitError;
    type Output = String;

    async fn execute(&self, ctx: &crate::op::OpContext) -> Result<Self::Output, Self::Error> {
        let config = AppConfig {
            log_level: self.default_log_level.clone(),
            active_bucket: None,
        };

        let state = AppState::init(ctx.config_path.clone(), Some(config))?;

        let output = format!(
            "Initialized par directory at: {}\n\
             - Store: {}\n\
             - Config: {}\n\
             - Log level: {}",
            state.par_dir.display(),
            state.store_path.display(),
            state.config_path.display(),
            state.config.log_level,
        );

        Ok(output)
    }
}
