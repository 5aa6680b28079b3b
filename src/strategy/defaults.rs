//! Default generators per target kind.

use super::pipeline::{StageContext, StageResult};
use super::transforms;
use crate::domain::{FillResult, Generator, NamedOperation, Target, TargetKind, ValueSource};
use chrono::Datelike;
use serde_json::{json, Value};

pub type DefaultFn = fn(&StageContext<'_>) -> FillResult<StageResult>;

/// Default generator builder for `kind`.
pub fn for_kind(kind: TargetKind) -> DefaultFn {
    match kind {
        TargetKind::Color => color,
        TargetKind::Date => date,
        TargetKind::DatetimeLocal => datetime_local,
        TargetKind::Email => email,
        TargetKind::Month => month,
        TargetKind::Number => number,
        TargetKind::Password => password,
        TargetKind::Range => range,
        TargetKind::Search => search,
        TargetKind::Tel => tel,
        TargetKind::Text => text,
        TargetKind::Time => time,
        TargetKind::Url => url,
        TargetKind::Week => week,
        TargetKind::Checkbox | TargetKind::Radio | TargetKind::MultiSelect | TargetKind::Select => {
            transforms::pick_from_values
        }
        TargetKind::Textarea => paragraph,
    }
}

fn operation(op: NamedOperation) -> FillResult<StageResult> {
    Ok(StageResult::Value(Generator::operation(op)))
}

fn color(_: &StageContext<'_>) -> FillResult<StageResult> {
    operation(NamedOperation::Color)
}

fn email(_: &StageContext<'_>) -> FillResult<StageResult> {
    operation(NamedOperation::Email)
}

fn number(_: &StageContext<'_>) -> FillResult<StageResult> {
    operation(NamedOperation::Natural)
}

fn password(_: &StageContext<'_>) -> FillResult<StageResult> {
    operation(NamedOperation::String)
}

fn search(_: &StageContext<'_>) -> FillResult<StageResult> {
    operation(NamedOperation::Word)
}

fn tel(_: &StageContext<'_>) -> FillResult<StageResult> {
    operation(NamedOperation::Phone)
}

fn text(_: &StageContext<'_>) -> FillResult<StageResult> {
    operation(NamedOperation::Sentence)
}

fn url(_: &StageContext<'_>) -> FillResult<StageResult> {
    operation(NamedOperation::Url)
}

fn paragraph(_: &StageContext<'_>) -> FillResult<StageResult> {
    operation(NamedOperation::Paragraph)
}

/// Birthday formatted with a chrono format string.
fn birthday_as(format: &'static str) -> FillResult<StageResult> {
    Ok(StageResult::Value(Generator::new(move |source: &dyn ValueSource, _| {
        Ok(json!(source.birthday().format(format).to_string()))
    })))
}

fn date(_: &StageContext<'_>) -> FillResult<StageResult> {
    birthday_as("%Y-%m-%d")
}

fn datetime_local(_: &StageContext<'_>) -> FillResult<StageResult> {
    birthday_as("%Y-%m-%dT%H:%M")
}

fn month(_: &StageContext<'_>) -> FillResult<StageResult> {
    birthday_as("%Y-%m")
}

fn time(_: &StageContext<'_>) -> FillResult<StageResult> {
    birthday_as("%H:%M")
}

fn week(_: &StageContext<'_>) -> FillResult<StageResult> {
    Ok(StageResult::Value(Generator::new(|source: &dyn ValueSource, _| {
        let iso = source.birthday().date().iso_week();
        Ok(json!(format!("{}-W{:02}", iso.year(), iso.week())))
    })))
}

fn range(ctx: &StageContext<'_>) -> FillResult<StageResult> {
    let domain = RangeDomain::from_target(ctx.target);
    Ok(StageResult::Value(Generator::new(move |source: &dyn ValueSource, _| {
        Ok(domain.sample(source))
    })))
}

/// Value domain of a range input, read from its `min`/`max`/`step` attributes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RangeDomain {
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

impl Default for RangeDomain {
    fn default() -> Self {
        Self {
            min: 0.0,
            max: 100.0,
            step: 1.0,
        }
    }
}

impl RangeDomain {
    pub fn from_target(target: &dyn Target) -> Self {
        let fallback = Self::default();
        let step = parse_attr(target, "step")
            .filter(|s| *s > 0.0)
            .unwrap_or(fallback.step);
        Self {
            min: parse_attr(target, "min").unwrap_or(fallback.min),
            max: parse_attr(target, "max").unwrap_or(fallback.max),
            step,
        }
    }

    /// Number of stepped values `min + k * step` strictly below `max`.
    pub fn stepped_len(&self) -> u64 {
        if self.max <= self.min {
            return 0;
        }
        let mut len = ((self.max - self.min) / self.step).ceil() as u64;
        while len > 0 && self.min + (len - 1) as f64 * self.step >= self.max {
            len -= 1;
        }
        len
    }

    fn is_unit_integral(&self) -> bool {
        self.step == 1.0 && self.min.fract() == 0.0 && self.max.fract() == 0.0
    }

    /// Unit steps over whole-number bounds draw an integer in `[min, max]`;
    /// anything else picks uniformly from the stepped sequence.
    pub fn sample(&self, source: &dyn ValueSource) -> Value {
        if self.is_unit_integral() {
            if self.min > self.max {
                return Value::Null;
            }
            return json!(source.integer(self.min as i64, self.max as i64));
        }
        match self.stepped_len() {
            0 => Value::Null,
            len => {
                let last = i64::try_from(len - 1).unwrap_or(i64::MAX);
                let index = source.integer(0, last);
                number_value(self.min + index as f64 * self.step)
            }
        }
    }
}

fn parse_attr(target: &dyn Target, name: &str) -> Option<f64> {
    target.attribute(name).and_then(|raw| {
        let raw = raw.trim();
        if raw.is_empty() {
            None
        } else {
            raw.parse::<f64>().ok().filter(|value| value.is_finite())
        }
    })
}

fn number_value(value: f64) -> Value {
    let rounded = (value * 1e10).round() / 1e10;
    if rounded.fract() == 0.0 && rounded.abs() < i64::MAX as f64 {
        json!(rounded as i64)
    } else {
        json!(rounded)
    }
}
