//! In-memory form document implementing the target capabilities.
//!
//! A `FormDocument` is a flat list of form controls, loaded from JSON, YAML
//! or TOML. Each control may carry a `chance` list of configuration
//! arguments that is applied when the document is bound to an engine.

use crate::domain::{
    Configurable, Container, FillResult, FillSpec, Target, TargetKind, ValueSource,
};
use crate::engine::Chancy;
use crate::resolver::FillArg;
use anyhow::Context as _;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashSet};
use std::path::Path;
use tracing::debug;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementTag {
    #[default]
    Input,
    Select,
    Textarea,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct SelectOption {
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default)]
    pub selected: bool,
}

/// One form control.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Element {
    #[serde(default)]
    pub tag: ElementTag,
    /// `type` attribute of an input; missing means `text`
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub input_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(default)]
    pub checked: bool,
    #[serde(default)]
    pub multiple: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<SelectOption>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, String>,
    /// Configuration arguments, in `configure` order
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chance: Option<Vec<Value>>,
    #[serde(skip)]
    spec: Option<FillSpec>,
}

impl Element {
    pub fn input(input_type: &str, name: &str) -> Self {
        Self {
            tag: ElementTag::Input,
            input_type: Some(input_type.to_string()),
            name: Some(name.to_string()),
            ..Default::default()
        }
    }

    pub fn checkbox(name: &str, value: &str) -> Self {
        Self {
            value: Some(value.to_string()),
            ..Self::input("checkbox", name)
        }
    }

    pub fn radio(name: &str, value: &str) -> Self {
        Self {
            value: Some(value.to_string()),
            ..Self::input("radio", name)
        }
    }

    pub fn select(name: &str, values: &[&str], multiple: bool) -> Self {
        Self {
            tag: ElementTag::Select,
            name: Some(name.to_string()),
            multiple,
            options: values
                .iter()
                .map(|v| SelectOption {
                    value: v.to_string(),
                    ..Default::default()
                })
                .collect(),
            ..Default::default()
        }
    }

    pub fn textarea(name: &str) -> Self {
        Self {
            tag: ElementTag::Textarea,
            name: Some(name.to_string()),
            ..Default::default()
        }
    }

    pub fn with_attribute(mut self, key: &str, value: &str) -> Self {
        self.attributes.insert(key.to_string(), value.to_string());
        self
    }

    pub fn with_chance(mut self, args: Vec<Value>) -> Self {
        self.chance = Some(args);
        self
    }

    /// Kinds this control satisfies, most specific first.
    pub fn kinds(&self) -> Vec<TargetKind> {
        match self.tag {
            ElementTag::Input => {
                TargetKind::from_input_type(self.input_type.as_deref().unwrap_or("text"))
                    .into_iter()
                    .collect()
            }
            ElementTag::Select if self.multiple => vec![TargetKind::MultiSelect, TargetKind::Select],
            ElementTag::Select => vec![TargetKind::Select],
            ElementTag::Textarea => vec![TargetKind::Textarea],
        }
    }

    fn primary_kind(&self) -> Option<TargetKind> {
        self.kinds().first().copied()
    }

    fn is_grouped(&self) -> bool {
        self.primary_kind().map(|k| k.is_grouped()).unwrap_or(false)
    }

    fn non_empty_value(&self) -> Option<&str> {
        self.value.as_deref().filter(|v| !v.is_empty())
    }

    pub fn fill_spec(&self) -> Option<&FillSpec> {
        self.spec.as_ref()
    }
}

/// A handle over one element, or over every co-named checkbox/radio sibling.
pub struct Selection<'a> {
    elements: Vec<&'a mut Element>,
}

impl<'a> Selection<'a> {
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    fn first(&self) -> Option<&Element> {
        self.elements.first().map(|e| &**e)
    }

    fn primary_kind(&self) -> Option<TargetKind> {
        self.first().and_then(Element::primary_kind)
    }
}

impl Configurable for Selection<'_> {
    fn fill_spec(&self) -> Option<&FillSpec> {
        self.elements.iter().find_map(|e| e.spec.as_ref())
    }

    fn store_fill_spec(&mut self, spec: Option<FillSpec>) {
        for element in self.elements.iter_mut() {
            element.spec = spec.clone();
        }
    }
}

impl Target for Selection<'_> {
    fn kinds(&self) -> Vec<TargetKind> {
        self.first().map(Element::kinds).unwrap_or_default()
    }

    fn current_value(&self) -> Value {
        let Some(first) = self.first() else {
            return Value::Null;
        };
        match self.primary_kind() {
            Some(TargetKind::Checkbox) => Value::Array(
                self.elements
                    .iter()
                    .filter(|e| e.checked)
                    .filter_map(|e| e.non_empty_value())
                    .map(|v| Value::String(v.to_string()))
                    .collect(),
            ),
            Some(TargetKind::Radio) => self
                .elements
                .iter()
                .find(|e| e.checked)
                .and_then(|e| e.non_empty_value())
                .map(|v| Value::String(v.to_string()))
                .unwrap_or(Value::Null),
            Some(TargetKind::MultiSelect) => Value::Array(
                first
                    .options
                    .iter()
                    .filter(|o| o.selected)
                    .map(|o| Value::String(o.value.clone()))
                    .collect(),
            ),
            Some(TargetKind::Select) => first
                .options
                .iter()
                .find(|o| o.selected)
                .map(|o| Value::String(o.value.clone()))
                .unwrap_or(Value::Null),
            _ => first
                .non_empty_value()
                .map(|v| Value::String(v.to_string()))
                .unwrap_or(Value::Null),
        }
    }

    fn candidate_values(&self) -> Vec<Value> {
        let Some(first) = self.first() else {
            return Vec::new();
        };
        if first.tag == ElementTag::Select {
            return first
                .options
                .iter()
                .filter(|o| !o.value.is_empty())
                .map(|o| Value::String(o.value.clone()))
                .collect();
        }
        self.elements
            .iter()
            .filter_map(|e| e.non_empty_value())
            .map(|v| Value::String(v.to_string()))
            .collect()
    }

    fn attribute(&self, name: &str) -> Option<String> {
        self.first().and_then(|e| e.attributes.get(name).cloned())
    }

    fn commit(&mut self, value: Value) {
        let chosen: Vec<String> = match value {
            Value::Null => Vec::new(),
            Value::Array(items) => items.iter().filter_map(value_text).collect(),
            other => value_text(&other).into_iter().collect(),
        };
        let kind = self.primary_kind();
        debug!("Committing {:?} to {:?} target", chosen, kind);

        match kind {
            Some(TargetKind::Checkbox) => {
                for element in self.elements.iter_mut() {
                    element.checked = element
                        .non_empty_value()
                        .map(|v| chosen.iter().any(|c| c == v))
                        .unwrap_or(false);
                }
            }
            Some(TargetKind::Radio) => {
                let mut taken = false;
                for element in self.elements.iter_mut() {
                    let matches = element
                        .non_empty_value()
                        .map(|v| chosen.iter().any(|c| c == v))
                        .unwrap_or(false);
                    element.checked = matches && !taken;
                    taken |= element.checked;
                }
            }
            Some(TargetKind::MultiSelect) | Some(TargetKind::Select) => {
                let single = kind == Some(TargetKind::Select);
                for element in self.elements.iter_mut() {
                    let mut taken = false;
                    for option in element.options.iter_mut() {
                        let matches = chosen.iter().any(|c| *c == option.value);
                        option.selected = matches && !(single && taken);
                        taken |= option.selected;
                    }
                }
            }
            _ => {
                for element in self.elements.iter_mut() {
                    element.value = chosen.first().cloned();
                }
            }
        }
    }
}

/// Text form of a committed value. Nulls are dropped.
fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// A form: the composite container of its controls.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct FormDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Form-level configuration arguments (option overlays)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chance: Option<Vec<Value>>,
    #[serde(default)]
    pub elements: Vec<Element>,
    #[serde(skip)]
    spec: Option<FillSpec>,
}

impl FormDocument {
    pub fn new(elements: Vec<Element>) -> Self {
        Self {
            elements,
            ..Default::default()
        }
    }

    /// Load a document, picking the parser from the file extension.
    pub fn from_path(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read form document {}", path.display()))?;
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("json");
        let mut document: FormDocument = match ext {
            "yaml" | "yml" => serde_yaml::from_str(&content)?,
            "toml" => toml::from_str(&content)?,
            _ => serde_json::from_str(&content)?,
        };
        if document.name.is_none() {
            document.name = path.file_stem().and_then(|s| s.to_str()).map(str::to_string);
        }
        Ok(document)
    }

    /// Apply every `chance` argument list in the document: the form's own
    /// first, then each element's, in document order.
    pub fn bind<S: ValueSource>(&mut self, engine: &Chancy<S>) -> FillResult<()> {
        if let Some(args) = self.chance.clone() {
            engine.configure(self, args.into_iter().map(FillArg::from))?;
        }
        for index in 0..self.elements.len() {
            if let Some(args) = self.elements[index].chance.clone() {
                let mut single = Selection {
                    elements: vec![&mut self.elements[index]],
                };
                engine.configure(&mut single, args.into_iter().map(FillArg::from))?;
            }
        }
        Ok(())
    }

    /// Just the element at `index`, without grouping.
    pub fn element_at(&mut self, index: usize) -> Option<Selection<'_>> {
        self.elements.get_mut(index).map(|e| Selection { elements: vec![e] })
    }

    /// The logical target containing the element at `index`: checkbox and
    /// radio elements expand to every co-named sibling of the same kind.
    pub fn target_at(&mut self, index: usize) -> Option<Selection<'_>> {
        let members = self.group_members(index)?;
        Some(Selection {
            elements: self
                .elements
                .iter_mut()
                .enumerate()
                .filter(|(i, _)| members.contains(i))
                .map(|(_, e)| e)
                .collect(),
        })
    }

    /// The logical target for the first element named `name`.
    pub fn target(&mut self, name: &str) -> Option<Selection<'_>> {
        let index = self
            .elements
            .iter()
            .position(|e| e.name.as_deref() == Some(name))?;
        self.target_at(index)
    }

    fn group_members(&self, index: usize) -> Option<Vec<usize>> {
        let element = self.elements.get(index)?;
        if !element.is_grouped() {
            return Some(vec![index]);
        }
        let Some(name) = element.name.as_deref() else {
            return Some(vec![index]);
        };
        let kind = element.primary_kind();
        Some(
            self.elements
                .iter()
                .enumerate()
                .filter(|(_, e)| e.name.as_deref() == Some(name) && e.primary_kind() == kind)
                .map(|(i, _)| i)
                .collect(),
        )
    }

    /// Filled state as a JSON object keyed by control name.
    pub fn values(&mut self) -> Value {
        let mut out = Map::new();
        let mut seen = HashSet::new();
        for index in 0..self.elements.len() {
            let key = self.elements[index]
                .name
                .clone()
                .unwrap_or_else(|| format!("element-{}", index));
            if !seen.insert(key.clone()) {
                continue;
            }
            if let Some(target) = self.target_at(index) {
                out.insert(key, target.current_value());
            }
        }
        Value::Object(out)
    }
}

impl Configurable for FormDocument {
    fn fill_spec(&self) -> Option<&FillSpec> {
        self.spec.as_ref()
    }

    fn store_fill_spec(&mut self, spec: Option<FillSpec>) {
        self.spec = spec;
    }
}

impl Container for FormDocument {
    fn visit_targets(
        &mut self,
        visit: &mut dyn FnMut(&mut dyn Target) -> FillResult<()>,
    ) -> FillResult<()> {
        let mut visited = HashSet::new();
        for index in 0..self.elements.len() {
            if visited.contains(&index) {
                continue;
            }
            let Some(members) = self.group_members(index) else {
                continue;
            };
            visited.extend(members.iter().copied());
            if let Some(mut target) = self.target_at(index) {
                visit(&mut target)?;
            }
        }
        Ok(())
    }
}
