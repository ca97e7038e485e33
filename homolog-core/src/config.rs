//! Declarative filter configuration.
//!
//! A [`FilterConfig`] says which record field is filterable, how the active
//! value is compared, and which widget edits it. The core never interprets
//! the widget; it only consumes the value the widget produces.

use crate::error::ValidationError;
use crate::record::{FieldKind, RecordField};
use serde::{Deserialize, Serialize};

/// Comparison applied between a record field and the active filter value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FilterOperator {
    /// Keep iff `min <= value <= max`.
    #[serde(rename = "between-inclusive")]
    BetweenInclusive,
}

impl FilterOperator {
    pub fn as_str(&self) -> &'static str {
        match self {
            FilterOperator::BetweenInclusive => "between-inclusive",
        }
    }
}

/// Widget that edits a filter value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FilterComponent {
    RangeSlider,
}

/// Widget bounds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FilterProps {
    pub min: f64,
    pub max: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step: Option<f64>,
}

/// One filterable field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct FilterConfig {
    pub field: String,
    pub label: String,
    pub operator: FilterOperator,
    pub filter_component: FilterComponent,
    pub filter_props: FilterProps,
}

impl FilterConfig {
    pub fn range_slider(
        field: impl Into<String>,
        label: impl Into<String>,
        min: f64,
        max: f64,
    ) -> Self {
        Self {
            field: field.into(),
            label: label.into(),
            operator: FilterOperator::BetweenInclusive,
            filter_component: FilterComponent::RangeSlider,
            filter_props: FilterProps {
                min,
                max,
                step: None,
            },
        }
    }

    pub fn with_step(mut self, step: f64) -> Self {
        self.filter_props.step = Some(step);
        self
    }

    /// Step used by range widgets: the declared step, or a hundredth of the
    /// range when none is declared.
    pub fn effective_step(&self) -> f64 {
        match self.filter_props.step {
            Some(step) => step,
            None => {
                let span = self.filter_props.max - self.filter_props.min;
                if span > 0.0 {
                    span / 100.0
                } else {
                    1.0
                }
            }
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.field.trim().is_empty() {
            return Err(ValidationError::RequiredFieldMissing {
                field: "field".to_string(),
            });
        }
        let record_field =
            RecordField::from_name(&self.field).ok_or_else(|| ValidationError::UnknownField {
                field: self.field.clone(),
            })?;
        if self.operator == FilterOperator::BetweenInclusive
            && record_field.kind() != FieldKind::Number
        {
            return Err(ValidationError::InvalidValue {
                field: self.field.clone(),
                reason: format!("{} requires a numeric field", self.operator.as_str()),
            });
        }
        let FilterProps { min, max, step } = self.filter_props;
        if !min.is_finite() || !max.is_finite() {
            return Err(ValidationError::InvalidValue {
                field: format!("{}.filterProps", self.field),
                reason: "bounds must be finite".to_string(),
            });
        }
        if min > max {
            return Err(ValidationError::InvalidValue {
                field: format!("{}.filterProps", self.field),
                reason: format!("min {} exceeds max {}", min, max),
            });
        }
        if let Some(step) = step {
            if !(step.is_finite() && step > 0.0) {
                return Err(ValidationError::InvalidValue {
                    field: format!("{}.filterProps.step", self.field),
                    reason: "must be > 0".to_string(),
                });
            }
        }
        Ok(())
    }
}

/// The filters offered on the homolog explorer page.
pub fn homolog_filter_configs() -> Vec<FilterConfig> {
    vec![
        FilterConfig::range_slider("identities", "Identities", 0.0, 500.0),
        FilterConfig::range_slider("coverage", "Coverage", 0.0, 500.0),
        FilterConfig::range_slider("positives", "Positives", 0.0, 500.0),
        FilterConfig::range_slider("score", "Score", 0.0, 1000.0),
        FilterConfig::range_slider("evalue", "E-value", 0.0, 1.0).with_step(0.0001),
        FilterConfig::range_slider("isPrimary", "Is Primary", 0.0, 1.0).with_step(1.0),
    ]
}
