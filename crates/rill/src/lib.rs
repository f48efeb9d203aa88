//! # Rill
//!
//! Rill turns simple scripts (straight-line statements and `if`/`else`
//! conditionals) into flowchart descriptions. Parsing produces a statement
//! sequence, the flow-graph builder turns it into a control-flow graph, and
//! the exporters serialize that graph as Graphviz DOT or JSON.

pub mod config;

mod cfg;
mod error;
mod export;

pub use cfg::Cfg;
pub use error::RillError;

use log::{debug, info, trace};

use rill_core::semantic::Program;
use rill_parser::ElaborateConfig;

use config::AppConfig;
use export::{dot::DotExporter, json::JsonExporter};

/// Builder for parsing scripts and rendering flowcharts.
///
/// The builder holds only configuration; every call runs on its own graph
/// accumulator, so one builder can serve any number of independent
/// invocations.
///
/// # Examples
///
/// ```
/// use rill::{FlowchartBuilder, config::AppConfig};
///
/// let source = "x = 1\nif x > 0:\n    y = 2\n";
///
/// let builder = FlowchartBuilder::new(AppConfig::default());
///
/// // Parse source to the statement model
/// let program = builder.parse(source)
///     .expect("Failed to parse");
///
/// // Render the statement model to DOT text
/// let dot = builder.render_dot(&program)
///     .expect("Failed to render");
///
/// assert!(dot.starts_with("digraph"));
/// ```
#[derive(Debug, Default)]
pub struct FlowchartBuilder {
    config: AppConfig,
}

impl FlowchartBuilder {
    /// Create a new flowchart builder with the given configuration.
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    /// Parse script source into its statement model.
    ///
    /// # Errors
    ///
    /// Returns [`RillError::Parse`] carrying every diagnostic the parsing
    /// pipeline collected, together with the source for rendering rich
    /// reports.
    pub fn parse(&self, source: &str) -> Result<Program, RillError> {
        info!("Parsing source");

        let elaborate_config = ElaborateConfig::new(self.config.parser.detect_io);
        let program = rill_parser::parse(source, elaborate_config)
            .map_err(|err| RillError::new_parse_error(err, source))?;

        debug!("Source parsed successfully");
        trace!(program:?; "Parsed program");

        Ok(program)
    }

    /// Build the control-flow graph of a program.
    pub fn build_graph(&self, program: &Program) -> Cfg {
        info!("Building flow graph");
        Cfg::from_program(program)
    }

    /// Render a program's flowchart as Graphviz DOT text.
    pub fn render_dot(&self, program: &Program) -> Result<String, RillError> {
        let graph = self.build_graph(program);

        info!("Rendering DOT output");
        let dot = DotExporter::new(&self.config.graph).export(&graph)?;
        debug!(bytes = dot.len(); "DOT rendered");

        Ok(dot)
    }

    /// Render a program's flowchart as a JSON document.
    pub fn render_json(&self, program: &Program) -> Result<String, RillError> {
        let graph = self.build_graph(program);

        info!("Rendering JSON output");
        let json = JsonExporter::new(&self.config.graph).export(&graph)?;
        debug!(bytes = json.len(); "JSON rendered");

        Ok(json)
    }
}
