//! Color scales for hierarchy nodes
//!
//! A render colors its nodes either categorically (by display name, through a
//! [`ColorRegistry`]) or continuously (by each node's secondary/primary ratio,
//! through a [`LinearColorScale`]). The choice is made once per render and
//! captured in [`ColorStrategy`].

pub mod categorical;
pub mod linear;
pub mod palettes;

pub use categorical::{CategoricalColorNamespace, CategoricalColorScale, ColorRegistry};
pub use linear::LinearColorScale;

/// How every node of one render is colored
#[derive(Debug, Clone)]
pub enum ColorStrategy {
    Categorical {
        scheme: String,
        scope: Option<u64>,
    },
    Continuous(LinearColorScale),
}

impl ColorStrategy {
    pub fn is_categorical(&self) -> bool {
        matches!(self, ColorStrategy::Categorical { .. })
    }

    /// Color for a node with display name `name` and ratio `ratio`
    pub fn color(&self, registry: &mut dyn ColorRegistry, name: &str, ratio: f64) -> Option<String> {
        match self {
            ColorStrategy::Categorical { scheme, scope } => {
                Some(registry.get_or_assign(scheme, name, *scope))
            }
            ColorStrategy::Continuous(scale) => scale.color(ratio),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_categorical_ignores_ratio() {
        let strategy = ColorStrategy::Categorical {
            scheme: "tableau10".to_string(),
            scope: Some(1),
        };
        let mut registry = CategoricalColorNamespace::new();
        let a = strategy.color(&mut registry, "A", 0.1);
        assert_eq!(strategy.color(&mut registry, "A", 0.9), a);
        assert!(strategy.is_categorical());
    }

    #[test]
    fn test_continuous_ignores_name() {
        let scale = LinearColorScale::from_scheme("blues", (0.0, 1.0)).unwrap();
        let strategy = ColorStrategy::Continuous(scale);
        let mut registry = CategoricalColorNamespace::new();
        assert_eq!(
            strategy.color(&mut registry, "A", 0.5),
            strategy.color(&mut registry, "B", 0.5)
        );
        assert_ne!(
            strategy.color(&mut registry, "A", 0.0),
            strategy.color(&mut registry, "A", 1.0)
        );
        assert!(!strategy.is_categorical());
    }
}
