use std::sync::Arc;

use crate::config::AppConfig;
use crate::services::{StyleGuideResolver, TextGeneratorService, VersionControlService};

#[derive(Clone)]
pub struct AppContext {
    pub config: AppConfig,
    pub version_control: Arc<dyn VersionControlService>,
    pub generator: Arc<dyn TextGeneratorService>,
    pub style_guide: Arc<dyn StyleGuideResolver>,
}

impl AppContext {
    pub fn new(
        config: AppConfig,
        version_control: Arc<dyn VersionControlService>,
        generator: Arc<dyn TextGeneratorService>,
        style_guide: Arc<dyn StyleGuideResolver>,
    ) -> Self {
        Self {
            config,
            version_control,
            generator,
            style_guide,
        }
    }
}
