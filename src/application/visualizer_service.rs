// Visualizer service - load, extract, filter and render a series
use crate::application::extractor::extract_series;
use crate::application::sample_repository::SampleRepository;
use crate::application::session::{InteractiveSession, SessionData, plot_title};
use crate::application::surface::{Surface, SurfaceProvider};
use crate::application::timeframe_filter::filter_series;
use crate::domain::error::VisualizerError;
use crate::domain::sample::Series;
use crate::domain::timeframe::Timeframe;
use crate::infrastructure::config::VisualizerConfig;
use crate::infrastructure::path_query::{PathExpression, QueryError};
use crate::presentation::plot_view::{MIN_HEIGHT, MIN_WIDTH};
use crate::presentation::report::{ReportInput, render_report};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct VisualizationRequest {
    pub source_dir: PathBuf,
    pub expression: String,
    pub window: Timeframe,
    pub interactive: bool,
}

/// Extracted data ready for either renderer.
#[derive(Debug, Clone)]
pub struct PreparedSeries {
    pub expression: String,
    pub window: Timeframe,
    /// Every extracted sample, before windowing.
    pub full: Series,
    pub series: Series,
    /// Aggregated warnings about skipped files and records.
    pub notices: Vec<String>,
}

impl PreparedSeries {
    pub fn title(&self) -> String {
        plot_title(&self.expression, self.window)
    }
}

#[derive(Clone)]
pub struct VisualizerService {
    repository: Arc<dyn SampleRepository>,
    surfaces: Arc<dyn SurfaceProvider>,
    config: VisualizerConfig,
}

impl VisualizerService {
    pub fn new(
        repository: Arc<dyn SampleRepository>,
        surfaces: Arc<dyn SurfaceProvider>,
        config: VisualizerConfig,
    ) -> Self {
        Self {
            repository,
            surfaces,
            config,
        }
    }

    pub fn prepare(
        &self,
        request: &VisualizationRequest,
    ) -> Result<PreparedSeries, VisualizerError> {
        let batch = self.repository.load_records(&request.source_dir)?;
        if batch.files_found == 0 {
            return Err(VisualizerError::NoFiles(request.source_dir.clone()));
        }

        let expression: PathExpression = request.expression.parse().map_err(|e: QueryError| {
            VisualizerError::InvalidExpression {
                expression: request.expression.clone(),
                reason: e.to_string(),
            }
        })?;

        let extraction = extract_series(&batch.records, &expression);
        let series = filter_series(&extraction.series, request.window);

        if series.is_empty() {
            return Err(VisualizerError::NoData {
                dir: request.source_dir.clone(),
                expression: expression.to_string(),
                window: request.window,
            });
        }

        let mut notices = Vec::new();
        if batch.skipped_files > 0 {
            notices.push(format!("⚠️ Could not load {} file(s)", batch.skipped_files));
        }
        if extraction.failures > 0 {
            notices.push(format!(
                "⚠️ {} record(s) had no numeric value for '{}'",
                extraction.failures, expression
            ));
        }

        tracing::info!(
            "Prepared {} of {} samples for '{}' ({})",
            series.len(),
            extraction.series.len(),
            expression,
            request.window
        );

        Ok(PreparedSeries {
            expression: expression.to_string(),
            window: request.window,
            full: extraction.series,
            series,
            notices,
        })
    }

    /// Run one visualization and describe the outcome. Failures come back as
    /// `❌` status lines, never as errors.
    pub fn visualize(&self, request: &VisualizationRequest) -> String {
        let prepared = match self.prepare(request) {
            Ok(prepared) => prepared,
            Err(e) => return e.to_string(),
        };

        if !request.interactive {
            return self.render_report(&prepared);
        }

        match self.surfaces.acquire() {
            Ok(Some(mut surface)) => {
                let (width, height) = surface.size();
                if width < MIN_WIDTH || height < MIN_HEIGHT {
                    drop(surface);
                    tracing::info!(
                        "Terminal {}x{} too small; rendering report instead",
                        width,
                        height
                    );
                    return self.render_report(&prepared);
                }
                self.run_session(prepared, surface.as_mut())
            }
            Ok(None) => {
                tracing::info!("No interactive terminal; rendering report instead");
                self.render_report(&prepared)
            }
            Err(e) => {
                tracing::warn!("Could not acquire terminal: {}", e);
                self.render_report(&prepared)
            }
        }
    }

    fn run_session<S>(&self, prepared: PreparedSeries, surface: &mut S) -> String
    where
        S: Surface + ?Sized,
    {
        let data = SessionData::new(prepared.expression, prepared.full, prepared.window);
        let session = InteractiveSession::new(surface, data, self.config.render.clone());

        match session.run() {
            Ok(summary) => std::iter::once(summary)
                .chain(prepared.notices)
                .collect::<Vec<_>>()
                .join("\n"),
            Err(e) => VisualizerError::Render(e.to_string()).to_string(),
        }
    }

    pub fn render_report(&self, prepared: &PreparedSeries) -> String {
        let title = prepared.title();
        render_report(
            &ReportInput {
                title: &title,
                series: &prepared.series,
                notices: &prepared.notices,
            },
            &self.config.report,
        )
    }

    /// Report mode without the status-line flattening of `visualize`.
    pub fn report(&self, request: &VisualizationRequest) -> Result<String, VisualizerError> {
        let prepared = self.prepare(request)?;
        Ok(self.render_report(&prepared))
    }

    /// `report` on a blocking worker thread, for async callers.
    pub async fn report_async(
        &self,
        request: VisualizationRequest,
    ) -> Result<String, VisualizerError> {
        let service = self.clone();
        tokio::task::spawn_blocking(move || service.report(&request))
            .await
            .map_err(|e| VisualizerError::Render(e.to_string()))?
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::application::session::tests::ScriptedSurface;
    use crate::application::surface::{Key, SurfaceError};
    use crate::infrastructure::json_store::JsonDirectoryStore;
    use std::fs;
    use std::io;
    use std::path::Path;

    /// Hands out scripted surfaces of a fixed size, or none at all.
    pub(crate) struct ScriptedProvider {
        pub available: bool,
        pub size: (u16, u16),
        pub keys: Vec<Key>,
    }

    impl ScriptedProvider {
        pub(crate) fn unavailable() -> Self {
            Self {
                available: false,
                size: (80, 24),
                keys: Vec::new(),
            }
        }

        fn with_keys(size: (u16, u16), keys: &[Key]) -> Self {
            Self {
                available: true,
                size,
                keys: keys.to_vec(),
            }
        }
    }

    impl SurfaceProvider for ScriptedProvider {
        fn acquire(&self) -> Result<Option<Box<dyn Surface>>, SurfaceError> {
            if !self.available {
                return Ok(None);
            }
            let mut surface = ScriptedSurface::new(&self.keys);
            (surface.width, surface.height) = self.size;
            Ok(Some(Box::new(surface)))
        }
    }

    struct BrokenProvider;

    impl SurfaceProvider for BrokenProvider {
        fn acquire(&self) -> Result<Option<Box<dyn Surface>>, SurfaceError> {
            Err(io::Error::other("raw mode unavailable").into())
        }
    }

    fn service_with(surfaces: impl SurfaceProvider + 'static) -> VisualizerService {
        VisualizerService::new(
            Arc::new(JsonDirectoryStore::new()),
            Arc::new(surfaces),
            VisualizerConfig::default(),
        )
    }

    fn service() -> VisualizerService {
        service_with(ScriptedProvider::unavailable())
    }

    fn request(dir: &Path, expression: &str, window: Timeframe) -> VisualizationRequest {
        VisualizationRequest {
            source_dir: dir.to_path_buf(),
            expression: expression.to_string(),
            window,
            interactive: false,
        }
    }

    fn interactive(dir: &Path) -> VisualizationRequest {
        VisualizationRequest {
            interactive: true,
            ..request(dir, "value", Timeframe::All)
        }
    }

    fn write_two_samples(dir: &Path) {
        fs::write(
            dir.join("data.json"),
            r#"[{"timestamp":"2024-01-01T00:00:00Z","value":5},{"timestamp":"2024-01-01T00:01:00Z","value":15}]"#,
        )
        .unwrap();
    }

    #[test]
    fn test_two_sample_scenario() {
        let dir = tempfile::tempdir().unwrap();
        write_two_samples(dir.path());

        let prepared = service()
            .prepare(&request(dir.path(), "value", Timeframe::All))
            .unwrap();
        assert_eq!(prepared.series.values(), &[5.0, 15.0]);
        assert_eq!(prepared.series.min(), Some(5.0));
        assert_eq!(prepared.series.max(), Some(15.0));
        assert_eq!(prepared.series.latest(), Some(15.0));
        assert!(prepared.notices.is_empty());

        let report = service().visualize(&request(dir.path(), "value", Timeframe::All));
        assert!(report.contains("+10.0 (+200.0%)"));
    }

    #[test]
    fn test_one_sample_per_file_in_sorted_order() {
        let dir = tempfile::tempdir().unwrap();
        for (name, value) in [("03", 3), ("01", 1), ("02", 2)] {
            fs::write(
                dir.path().join(format!("{}.json", name)),
                format!(r#"{{"timestamp":"2024-01-01T00:00:{}Z","value":{}}}"#, name, value),
            )
            .unwrap();
        }

        let prepared = service()
            .prepare(&request(dir.path(), "value", Timeframe::All))
            .unwrap();
        assert_eq!(prepared.series.values(), &[1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_no_files_differs_from_no_matches() {
        let empty = tempfile::tempdir().unwrap();
        let result = service().visualize(&request(empty.path(), "value", Timeframe::All));
        assert!(result.contains("No JSON files found"), "{}", result);

        let unmatched = tempfile::tempdir().unwrap();
        fs::write(unmatched.path().join("a.json"), r#"{"other": 1}"#).unwrap();
        let result = service().visualize(&request(unmatched.path(), "value", Timeframe::All));
        assert!(result.contains("No data points found"), "{}", result);
        assert!(result.contains("using expression 'value'"), "{}", result);

        let missing = empty.path().join("missing");
        let result = service().visualize(&request(&missing, "value", Timeframe::All));
        assert!(result.starts_with("❌ Directory not found"), "{}", result);
    }

    #[test]
    fn test_malformed_file_is_aggregated() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("a.json"),
            r#"{"timestamp":"2024-01-01T00:00:00Z","value":1}"#,
        )
        .unwrap();
        fs::write(dir.path().join("b.json"), "{{{").unwrap();
        fs::write(
            dir.path().join("c.json"),
            r#"{"timestamp":"2024-01-01T00:00:05Z","value":2}"#,
        )
        .unwrap();

        let prepared = service()
            .prepare(&request(dir.path(), "value", Timeframe::All))
            .unwrap();
        assert_eq!(prepared.series.len(), 2);
        assert_eq!(prepared.notices, vec!["⚠️ Could not load 1 file(s)".to_string()]);

        let report = service().visualize(&request(dir.path(), "value", Timeframe::All));
        assert_eq!(report.matches("Could not load").count(), 1);
    }

    #[test]
    fn test_invalid_expression() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.json"), r#"{"value":1}"#).unwrap();

        let result = service().visualize(&request(dir.path(), "value..x", Timeframe::All));
        assert!(
            result.starts_with("❌ Invalid query expression 'value..x'"),
            "{}",
            result
        );
    }

    #[test]
    fn test_interactive_session_on_provided_surface() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("data.json"),
            r#"[{"timestamp":"2024-01-01T00:00:00Z","value":5},{"timestamp":"2024-01-01T00:01:00Z","value":15},{"timestamp":"2024-01-01T00:01:00Z","value":"n/a"}]"#,
        )
        .unwrap();

        let keys = [Key::Char('t'), Key::Up, Key::Up, Key::Enter, Key::Esc];
        let service = service_with(ScriptedProvider::with_keys((80, 24), &keys));
        let req = VisualizationRequest {
            window: Timeframe::Seconds(60),
            ..interactive(dir.path())
        };

        let result = service.visualize(&req);

        assert!(
            result.starts_with(
                "✅ Successfully visualized 1 data points from expression: \
                 'Data Visualization: value (Last 15 seconds)'"
            ),
            "{}",
            result
        );
        assert!(result.ends_with("⚠️ 1 record(s) had no numeric value for 'value'"));
    }

    #[test]
    fn test_missing_terminal_falls_back_to_report() {
        let dir = tempfile::tempdir().unwrap();
        write_two_samples(dir.path());

        let result = service().visualize(&interactive(dir.path()));
        assert!(result.starts_with("## 📈 Data Visualization: value"), "{}", result);

        let result = service_with(BrokenProvider).visualize(&interactive(dir.path()));
        assert!(result.starts_with("## 📈 Data Visualization: value"), "{}", result);
    }

    #[test]
    fn test_undersized_terminal_falls_back_to_report() {
        let dir = tempfile::tempdir().unwrap();
        write_two_samples(dir.path());

        for size in [(MIN_WIDTH - 1, MIN_HEIGHT), (MIN_WIDTH, MIN_HEIGHT - 1)] {
            let service = service_with(ScriptedProvider::with_keys(size, &[Key::Esc]));
            let result = service.visualize(&interactive(dir.path()));
            assert!(result.starts_with("## 📈 Data Visualization: value"), "{}", result);
        }

        let provider = ScriptedProvider::with_keys((MIN_WIDTH, MIN_HEIGHT), &[Key::Esc]);
        let service = service_with(provider);
        let result = service.visualize(&interactive(dir.path()));
        assert!(result.starts_with("✅ Successfully visualized 2 data points"), "{}", result);
    }

    #[tokio::test]
    async fn test_report_async() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.json"), r#"[{"value":1},{"value":3}]"#).unwrap();

        let report = service().report_async(interactive(dir.path())).await.unwrap();
        assert!(report.starts_with("## 📈 Data Visualization: value"));

        let missing = request(&dir.path().join("missing"), "value", Timeframe::All);
        assert!(matches!(
            service().report_async(missing).await,
            Err(VisualizerError::DirectoryNotFound(_))
        ));
    }
}
