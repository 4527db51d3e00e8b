// Application state for HTTP handlers
use crate::application::visualizer_service::VisualizerService;
use crate::infrastructure::run_locator::RunLocator;

#[derive(Clone)]
pub struct AppState {
    pub visualizer: VisualizerService,
    pub runs: RunLocator,
}
