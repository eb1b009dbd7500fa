//! Output writers
//!
//! Writers turn a dataset plus chart properties into something a renderer
//! can consume. The only implementation is [`EChartsWriter`], which produces
//! a sunburst option object together with the interaction side-channel.
//!
//! # Example
//!
//! ```rust,ignore
//! use sunburst::writer::{EChartsWriter, Writer};
//!
//! let writer = EChartsWriter::new();
//! let chart = writer.write(&props, &dataset, &mut colors)?;
//! ```

use crate::config::ChartProps;
use crate::plot::ColorRegistry;
use crate::reader::Dataset;
use crate::Result;

pub mod echarts;

pub use echarts::{
    CrossFilter, DataMask, DataMaskHook, EChartsWriter, Interaction, NodeItem, SunburstChart,
    Tooltip, TooltipFormatter,
};

/// Trait for chart output writers
pub trait Writer {
    /// What a successful write produces
    type Output;

    /// Encode `data` according to `props`.
    ///
    /// `registry` supplies categorical colors and remembers them across
    /// writes, so the same label keeps its color between renders.
    ///
    /// # Errors
    ///
    /// Returns `SunburstError::ValidationError` if the properties are not
    /// renderable. Unknown format identifiers are not errors.
    fn write(
        &self,
        props: &ChartProps,
        data: &Dataset,
        registry: &mut dyn ColorRegistry,
    ) -> Result<Self::Output>;

    /// Check that the properties can be rendered, without touching any data
    fn validate(&self, props: &ChartProps) -> Result<()>;
}
