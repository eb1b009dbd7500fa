/*!
# sunburst - hierarchical visual encoding for query results

Turns a flat, tabular query result into the declarative option object of a
sunburst chart: records are grouped into a tree along an ordered list of
group-by columns, measures are summed at every level, and every node is
assigned a display name, color, opacity, label and tooltip.

## Example

```rust,ignore
use sunburst::{ChartProps, Dataset, SunburstConfig};
use sunburst::plot::scale::CategoricalColorNamespace;
use sunburst::writer::{EChartsWriter, Writer};

let dataset = Dataset::from_query_payload(&payload)?;
let config: SunburstConfig = serde_json::from_str(&form_data)?;
let props = ChartProps::new(config, 800.0, 600.0);

let mut colors = CategoricalColorNamespace::default();
let chart = EChartsWriter::new().write(&props, &dataset, &mut colors)?;
println!("{}", serde_json::to_string_pretty(&chart.options)?);
```

## Core Components

- [`reader`] - Tabular input (`Dataset`, `Record`, `Scalar`) from files,
  query payloads and polars DataFrames
- [`plot`] - Tree aggregation, domain scanning and color scales
- [`format`] - Number, time, currency, series name and label formatting
- [`writer`] - The encoding pipeline producing ECharts options plus the
  interaction side-channel
- [`diff`] - Changed-settings detection between two chart form data objects
*/

pub mod config;
pub mod diff;
pub mod format;
pub mod plot;
pub mod reader;
pub mod writer;

pub use config::{ChartProps, Datasource, FilterState, LabelType, SunburstConfig, Theme};
pub use plot::{linear_domain, tree_builder, TreeNode};
pub use reader::{ColType, Dataset, Record, Scalar};

/// Version of the crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Display text for null group-by values and missing labels
pub const NULL_STRING: &str = "<NULL>";

/// Main library error type
#[derive(thiserror::Error, Debug)]
pub enum SunburstError {
    #[error("Reader error: {0}")]
    ReaderError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Output generation error: {0}")]
    WriterError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Data error: {0}")]
    DataError(#[from] polars::error::PolarsError),
}

pub type Result<T> = std::result::Result<T, SunburstError>;
