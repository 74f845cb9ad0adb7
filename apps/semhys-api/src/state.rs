use std::sync::Arc;

use semhys_service::SemhysService;

#[derive(Clone)]
pub struct AppState {
	pub service: Arc<SemhysService>,
}
impl AppState {
	pub fn new(config: semhys_config::Config) -> Self {
		Self::from_service(SemhysService::new(config))
	}

	pub fn from_service(service: SemhysService) -> Self {
		Self { service: Arc::new(service) }
	}
}
