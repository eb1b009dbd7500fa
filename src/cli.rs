/*!
sunburst Command Line Interface

Renders query results into sunburst chart options and compares chart settings.
*/

use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use serde_json::{json, Map, Value};
use tracing_subscriber::EnvFilter;

use sunburst::diff::diff_form_data;
use sunburst::plot::scale::palettes::{CATEGORICAL_NAMES, SEQUENTIAL_NAMES};
use sunburst::plot::scale::CategoricalColorNamespace;
use sunburst::reader::{FileReader, Reader};
use sunburst::writer::{EChartsWriter, Writer};
use sunburst::{ChartProps, Datasource, FilterState, SunburstConfig, VERSION};

#[derive(Parser)]
#[command(name = "sunburst")]
#[command(about = "Hierarchical visual encoding of tabular query results")]
#[command(version = VERSION)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Render a dataset into ECharts sunburst options
    Render {
        /// Query result (.json payload, .csv or .parquet)
        #[arg(long)]
        data: PathBuf,

        /// Chart form data (JSON)
        #[arg(long)]
        config: PathBuf,

        /// Datasource metadata: currency/column formats and verbose names (JSON)
        #[arg(long)]
        datasource: Option<PathBuf>,

        /// Canvas width in pixels
        #[arg(long, default_value_t = 800.0)]
        width: f64,

        /// Canvas height in pixels
        #[arg(long, default_value_t = 600.0)]
        height: f64,

        /// Currently selected segment keys
        #[arg(long)]
        selected: Vec<String>,

        /// Output file path
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Show the settings that differ between two form data files
    Diff {
        /// Saved form data (JSON)
        original: PathBuf,

        /// Current form data (JSON)
        current: PathBuf,
    },

    /// List the available color palettes
    Palettes,
}

fn read_json(path: &Path) -> anyhow::Result<Value> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("Invalid JSON in {}", path.display()))
}

fn read_object(path: &Path) -> anyhow::Result<Map<String, Value>> {
    match read_json(path)? {
        Value::Object(map) => Ok(map),
        _ => bail!("{} does not contain a JSON object", path.display()),
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Render {
            data,
            config,
            datasource,
            width,
            height,
            selected,
            output,
        } => {
            let dataset = FileReader::new()
                .read(&data)
                .with_context(|| format!("Failed to load {}", data.display()))?;
            let form_data: SunburstConfig = serde_json::from_value(read_json(&config)?)
                .with_context(|| format!("Invalid chart configuration in {}", config.display()))?;
            let datasource: Datasource = match datasource {
                Some(path) => serde_json::from_value(read_json(&path)?)
                    .with_context(|| format!("Invalid datasource in {}", path.display()))?,
                None => Datasource::default(),
            };
            let selected: Vec<&str> = selected.iter().map(String::as_str).collect();

            let props = ChartProps::new(form_data, width, height)
                .with_datasource(datasource)
                .with_filter_state(FilterState::selected(&selected));

            let mut colors = CategoricalColorNamespace::new();
            let chart = EChartsWriter::new().write(&props, &dataset, &mut colors)?;

            let rendered = serde_json::to_string_pretty(&json!({
                "echartOptions": chart.options,
                "labelMap": chart.interaction.label_map,
                "selectedValues": chart.interaction.selected_values,
                "totalValue": chart.total_value,
            }))?;

            match output {
                Some(path) => {
                    std::fs::write(&path, rendered)
                        .with_context(|| format!("Failed to write {}", path.display()))?;
                    eprintln!("Sunburst options written to: {}", path.display());
                }
                None => println!("{}", rendered),
            }
        }

        Commands::Diff { original, current } => {
            let altered = diff_form_data(&read_object(&original)?, &read_object(&current)?);
            if !altered.is_altered() {
                println!("No changes");
                return Ok(());
            }

            let rows = altered.rows();
            let key_width = rows
                .iter()
                .map(|(key, _, _)| key.chars().count())
                .fold("Control".len(), usize::max);
            let before_width = rows
                .iter()
                .map(|(_, before, _)| before.chars().count())
                .fold("Before".len(), usize::max);

            println!(
                "{:<kw$}  {:<bw$}  After",
                "Control",
                "Before",
                kw = key_width,
                bw = before_width
            );
            for (key, before, after) in &rows {
                println!(
                    "{:<kw$}  {:<bw$}  {}",
                    key,
                    before,
                    after,
                    kw = key_width,
                    bw = before_width
                );
            }
        }

        Commands::Palettes => {
            println!("Categorical:");
            for name in CATEGORICAL_NAMES {
                println!("  {}", name);
            }
            println!("Sequential:");
            for name in SEQUENTIAL_NAMES {
                println!("  {}", name);
            }
        }
    }

    Ok(())
}
