use std::sync::Arc;

use crate::application::ports::link_repository::LinkRepository;
use crate::application::ports::profile_repository::ProfileRepository;
use crate::bootstrap::config::Config;

#[derive(Clone)]
pub struct AppContext {
    pub cfg: Config,
    services: Arc<AppServices>,
}

#[derive(Clone)]
pub struct AppServices {
    link_repo: Arc<dyn LinkRepository>,
    profile_repo: Arc<dyn ProfileRepository>,
}

impl AppServices {
    pub fn new(
        link_repo: Arc<dyn LinkRepository>,
        profile_repo: Arc<dyn ProfileRepository>,
    ) -> Self {
        Self {
            link_repo,
            profile_repo,
        }
    }
}

impl AppContext {
    pub fn new(cfg: Config, services: AppServices) -> Self {
        Self {
            cfg,
            services: Arc::new(services),
        }
    }

    pub fn link_repo(&self) -> Arc<dyn LinkRepository> {
        self.services.link_repo.clone()
    }

    pub fn profile_repo(&self) -> Arc<dyn ProfileRepository> {
        self.services.profile_repo.clone()
    }
}
