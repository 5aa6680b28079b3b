use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of fillable target, in dispatch order (most specific first).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum TargetKind {
    Color,
    Date,
    DatetimeLocal,
    Email,
    Month,
    Number,
    Password,
    Range,
    Search,
    Tel,
    Text,
    Time,
    Url,
    Week,
    Checkbox,
    Radio,
    MultiSelect,
    Select,
    Textarea,
}

impl TargetKind {
    pub const ALL: [TargetKind; 19] = [
        TargetKind::Color,
        TargetKind::Date,
        TargetKind::DatetimeLocal,
        TargetKind::Email,
        TargetKind::Month,
        TargetKind::Number,
        TargetKind::Password,
        TargetKind::Range,
        TargetKind::Search,
        TargetKind::Tel,
        TargetKind::Text,
        TargetKind::Time,
        TargetKind::Url,
        TargetKind::Week,
        TargetKind::Checkbox,
        TargetKind::Radio,
        TargetKind::MultiSelect,
        TargetKind::Select,
        TargetKind::Textarea,
    ];

    /// CSS-style selector describing the elements of this kind
    pub fn selector(&self) -> &'static str {
        match self {
            TargetKind::Color => "input[type=color]",
            TargetKind::Date => "input[type=date]",
            TargetKind::DatetimeLocal => "input[type=datetime-local]",
            TargetKind::Email => "input[type=email]",
            TargetKind::Month => "input[type=month]",
            TargetKind::Number => "input[type=number]",
            TargetKind::Password => "input[type=password]",
            TargetKind::Range => "input[type=range]",
            TargetKind::Search => "input[type=search]",
            TargetKind::Tel => "input[type=tel]",
            TargetKind::Text => "input[type=text]",
            TargetKind::Time => "input[type=time]",
            TargetKind::Url => "input[type=url]",
            TargetKind::Week => "input[type=week]",
            TargetKind::Checkbox => "input[type=checkbox]",
            TargetKind::Radio => "input[type=radio]",
            TargetKind::MultiSelect => "select[multiple]",
            TargetKind::Select => "select",
            TargetKind::Textarea => "textarea",
        }
    }

    /// Kind for an `<input type=...>` value. Unknown types are not fillable.
    pub fn from_input_type(input_type: &str) -> Option<Self> {
        let kind = match input_type.to_ascii_lowercase().as_str() {
            "color" => TargetKind::Color,
            "date" => TargetKind::Date,
            "datetime-local" => TargetKind::DatetimeLocal,
            "email" => TargetKind::Email,
            "month" => TargetKind::Month,
            "number" => TargetKind::Number,
            "password" => TargetKind::Password,
            "range" => TargetKind::Range,
            "search" => TargetKind::Search,
            "tel" => TargetKind::Tel,
            "text" => TargetKind::Text,
            "time" => TargetKind::Time,
            "url" => TargetKind::Url,
            "week" => TargetKind::Week,
            "checkbox" => TargetKind::Checkbox,
            "radio" => TargetKind::Radio,
            _ => return None,
        };
        Some(kind)
    }

    /// Checkbox and radio targets span every co-named sibling.
    pub fn is_grouped(&self) -> bool {
        matches!(self, TargetKind::Checkbox | TargetKind::Radio)
    }
}

impl fmt::Display for TargetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.selector())
    }
}
