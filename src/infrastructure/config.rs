use serde::Deserialize;

const DEFAULT_CONFIG_FILE: &str = "config/visualizer";
const ENV_PREFIX: &str = "SFC_VIZ";

#[derive(Debug, Deserialize, Clone)]
pub struct VisualizerConfig {
    pub render: RenderConfig,
    pub report: ReportConfig,
    pub runs: RunsConfig,
    pub server: ServerConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RenderConfig {
    /// Sub-steps per spline segment.
    pub spline_steps: usize,
    /// Fractional increment along the dominant axis when rasterizing lines.
    pub line_step: f64,
    /// Smallest value range used for row scaling.
    pub flat_range_epsilon: f64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ReportConfig {
    pub max_table_rows: usize,
    pub chart_width: u32,
    pub chart_height: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RunsConfig {
    pub base_dir: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub listen: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for VisualizerConfig {
    fn default() -> Self {
        Self {
            render: RenderConfig {
                spline_steps: 15,
                line_step: 0.5,
                flat_range_epsilon: 0.1,
            },
            report: ReportConfig {
                max_table_rows: 20,
                chart_width: 800,
                chart_height: 400,
            },
            runs: RunsConfig {
                base_dir: ".sfc/runs".to_string(),
            },
            server: ServerConfig {
                listen: "127.0.0.1:8080".to_string(),
            },
            logging: LoggingConfig {
                level: "info".to_string(),
            },
        }
    }
}

impl VisualizerConfig {
    /// Pull out-of-range values back to something renderable.
    fn normalize(mut self) -> Self {
        self.render.spline_steps = self.render.spline_steps.clamp(10, 15);
        if !(self.render.line_step > 0.0 && self.render.line_step <= 1.0) {
            self.render.line_step = 0.5;
        }
        if !(self.render.flat_range_epsilon > 0.0 && self.render.flat_range_epsilon.is_finite()) {
            self.render.flat_range_epsilon = 0.1;
        }
        self.report.max_table_rows = self.report.max_table_rows.max(2);
        self.report.chart_width = self.report.chart_width.max(200);
        self.report.chart_height = self.report.chart_height.max(150);
        self
    }
}

/// Defaults, then `config/visualizer.*` (or `path`), then `SFC_VIZ__*`
/// environment variables.
pub fn load_visualizer_config(path: Option<&str>) -> anyhow::Result<VisualizerConfig> {
    build_config(path, None)
}

/// `env` replaces the process environment when given.
fn build_config(
    path: Option<&str>,
    env: Option<config::Map<String, String>>,
) -> anyhow::Result<VisualizerConfig> {
    let defaults = VisualizerConfig::default();

    let settings = config::Config::builder()
        .set_default("render.spline_steps", defaults.render.spline_steps as i64)?
        .set_default("render.line_step", defaults.render.line_step)?
        .set_default("render.flat_range_epsilon", defaults.render.flat_range_epsilon)?
        .set_default("report.max_table_rows", defaults.report.max_table_rows as i64)?
        .set_default("report.chart_width", i64::from(defaults.report.chart_width))?
        .set_default("report.chart_height", i64::from(defaults.report.chart_height))?
        .set_default("runs.base_dir", defaults.runs.base_dir)?
        .set_default("server.listen", defaults.server.listen)?
        .set_default("logging.level", defaults.logging.level)?
        .add_source(
            config::File::with_name(path.unwrap_or(DEFAULT_CONFIG_FILE)).required(path.is_some()),
        )
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true)
                .source(env),
        )
        .build()?;

    let config: VisualizerConfig = settings.try_deserialize()?;
    Ok(config.normalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_file_overrides_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "[render]\nspline_steps = 12\n\n[report]\nmax_table_rows = 8\n\n\
             [runs]\nbase_dir = \"/srv/runs\""
        )
        .unwrap();

        let config = load_visualizer_config(file.path().to_str()).unwrap();

        assert_eq!(config.render.spline_steps, 12);
        assert_eq!(config.render.line_step, 0.5);
        assert_eq!(config.report.max_table_rows, 8);
        assert_eq!(config.report.chart_width, 800);
        assert_eq!(config.runs.base_dir, "/srv/runs");
        assert_eq!(config.server.listen, "127.0.0.1:8080");
    }

    #[test]
    fn test_out_of_range_values_are_normalized() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "[render]\nspline_steps = 100\nline_step = 0.0\nflat_range_epsilon = -1.0"
        )
        .unwrap();

        let config = load_visualizer_config(file.path().to_str()).unwrap();

        assert_eq!(config.render.spline_steps, 15);
        assert_eq!(config.render.line_step, 0.5);
        assert_eq!(config.render.flat_range_epsilon, 0.1);
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        assert!(load_visualizer_config(Some("/nonexistent/visualizer.toml")).is_err());
    }

    #[test]
    fn test_environment_overrides_file_and_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "[render]\nspline_steps = 12\n\n[server]\nlisten = \"0.0.0.0:9000\""
        )
        .unwrap();

        let mut env = config::Map::new();
        env.insert("SFC_VIZ__RENDER__SPLINE_STEPS".to_string(), "11".to_string());
        env.insert("SFC_VIZ__REPORT__CHART_WIDTH".to_string(), "640".to_string());
        env.insert("UNRELATED__RENDER__LINE_STEP".to_string(), "0.9".to_string());

        let config = build_config(file.path().to_str(), Some(env)).unwrap();

        assert_eq!(config.render.spline_steps, 11);
        assert_eq!(config.report.chart_width, 640);
        assert_eq!(config.render.line_step, 0.5);
        assert_eq!(config.server.listen, "0.0.0.0:9000");
    }
}
