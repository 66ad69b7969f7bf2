//! Form model behind the parameter inputs.
//!
//! A `ParamForm` owns the text of every control and turns edits into new
//! `ParamSet` values. Scalar controls start at the catalog default and report
//! it on mount; range controls start empty and only report the bound that was
//! edited.

use crate::catalog::{self, DefaultValue, ParamSpec, RequestKey, Section};
use crate::error::{EdgesimError, Result};
use crate::params::ParamSet;

/// Which text field of a control an edit targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    Value,
    Low,
    High,
}

impl Bound {
    fn name(&self) -> &'static str {
        match self {
            Bound::Value => "value",
            Bound::Low => "low",
            Bound::High => "high",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Control {
    Scalar {
        spec: &'static ParamSpec,
        key: &'static str,
        text: String,
    },
    Range {
        spec: &'static ParamSpec,
        low_key: &'static str,
        high_key: &'static str,
        low: String,
        high: String,
    },
}

impl Control {
    pub fn from_spec(spec: &'static ParamSpec) -> Self {
        match spec.request_key {
            RequestKey::Single(key) => Control::Scalar {
                spec,
                key,
                text: spec.default.initial_text().unwrap_or_default(),
            },
            RequestKey::Range { low, high } => Control::Range {
                spec,
                low_key: low,
                high_key: high,
                low: String::new(),
                high: String::new(),
            },
        }
    }

    pub fn spec(&self) -> &'static ParamSpec {
        match self {
            Control::Scalar { spec, .. } | Control::Range { spec, .. } => spec,
        }
    }

    pub fn label(&self) -> &'static str {
        self.spec().label
    }

    /// Current text of one field, if the control has it.
    pub fn text(&self, bound: Bound) -> Option<&str> {
        match (self, bound) {
            (Control::Scalar { text, .. }, Bound::Value) => Some(text),
            (Control::Range { low, .. }, Bound::Low) => Some(low),
            (Control::Range { high, .. }, Bound::High) => Some(high),
            _ => None,
        }
    }

    /// Placeholder shown in an empty field. Ranges hint at the catalog default.
    pub fn placeholder(&self, bound: Bound) -> String {
        match (self.spec().default, bound) {
            (DefaultValue::Range { low, .. }, Bound::Low) => format!("Enter a low value (e.g. {low})"),
            (DefaultValue::Range { high, .. }, Bound::High) => {
                format!("Enter a high value (e.g. {high})")
            }
            _ => "Enter a value".to_string(),
        }
    }

    fn bound_for_key(&self, key: &str) -> Option<Bound> {
        match self {
            Control::Scalar { key: k, .. } if *k == key => Some(Bound::Value),
            Control::Range { low_key, .. } if *low_key == key => Some(Bound::Low),
            Control::Range { high_key, .. } if *high_key == key => Some(Bound::High),
            _ => None,
        }
    }

    fn apply(&mut self, bound: Bound, value: String, params: &ParamSet) -> Result<ParamSet> {
        match (self, bound) {
            (Control::Scalar { key, text, .. }, Bound::Value) => {
                let next = params.with(*key, value.clone())?;
                *text = value;
                Ok(next)
            }
            (Control::Range { low_key, low, .. }, Bound::Low) => {
                let next = params.with(*low_key, value.clone())?;
                *low = value;
                Ok(next)
            }
            (Control::Range { high_key, high, .. }, Bound::High) => {
                let next = params.with(*high_key, value.clone())?;
                *high = value;
                Ok(next)
            }
            (control, bound) => Err(EdgesimError::NoSuchBound {
                label: control.label().to_string(),
                bound: bound.name(),
            }),
        }
    }
}

/// Editable controls for an ordered list of catalog entries.
#[derive(Debug, Clone, PartialEq)]
pub struct ParamForm {
    controls: Vec<Control>,
}

impl ParamForm {
    pub fn new(specs: &'static [ParamSpec]) -> Self {
        Self {
            controls: specs.iter().map(Control::from_spec).collect(),
        }
    }

    pub fn for_section(section: Section) -> Self {
        Self::new(section.params())
    }

    /// Environment and algorithm parameters together, as both pages show them.
    pub fn full() -> Self {
        Self {
            controls: catalog::all_params().map(Control::from_spec).collect(),
        }
    }

    pub fn controls(&self) -> &[Control] {
        &self.controls
    }

    pub fn control(&self, label: &str) -> Option<&Control> {
        self.controls.iter().find(|c| c.label() == label)
    }

    /// Report every scalar control's current text. Range controls stay silent.
    pub fn mount(&self, params: &ParamSet) -> Result<ParamSet> {
        let mut next = params.clone();
        for control in &self.controls {
            if let Control::Scalar { key, text, .. } = control {
                next = next.with(key, text.clone())?;
            }
        }
        Ok(next)
    }

    /// Apply an edit to the field `bound` of the control labelled `label`.
    pub fn edit(
        &mut self,
        label: &str,
        bound: Bound,
        value: impl Into<String>,
        params: &ParamSet,
    ) -> Result<ParamSet> {
        let control = self
            .controls
            .iter_mut()
            .find(|c| c.label() == label)
            .ok_or_else(|| EdgesimError::UnknownLabel(label.to_string()))?;
        control.apply(bound, value.into(), params)
    }

    /// Apply an edit addressed by request key instead of label.
    pub fn edit_key(
        &mut self,
        key: &str,
        value: impl Into<String>,
        params: &ParamSet,
    ) -> Result<ParamSet> {
        let (control, bound) = self
            .controls
            .iter_mut()
            .find_map(|c| c.bound_for_key(key).map(|b| (c, b)))
            .ok_or_else(|| EdgesimError::UnknownParameter(key.to_string()))?;
        control.apply(bound, value.into(), params)
    }

    /// Apply every pair of `overrides` through `edit_key`.
    pub fn apply_all(&mut self, overrides: &ParamSet, params: &ParamSet) -> Result<ParamSet> {
        let mut next = params.clone();
        for (key, value) in overrides.iter() {
            next = self.edit_key(key, value, &next)?;
        }
        Ok(next)
    }
}
