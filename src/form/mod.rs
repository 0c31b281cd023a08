use crate::error::SubmitError;
use crate::models::FeaturesInput;
use anyhow::{bail, Context, Result};

/// Accessor for the coerced field a form value is written to
pub type Slot<T> = fn(&mut CoercedFeatures) -> &mut T;

/// How a raw form value becomes a typed payload value, and where it lands
#[derive(Clone, Copy)]
pub enum Coercion {
    /// Whole value must be a finite decimal number
    Decimal(Slot<Option<f64>>),
    /// Leading integer, trailing text ignored
    Integer(Slot<Option<i64>>),
    /// True only for the exact string "true"
    Flag(Slot<bool>),
    /// Passed through unchanged
    Text(Slot<Option<String>>),
}

impl Coercion {
    fn apply(self, out: &mut CoercedFeatures, raw: Option<&str>) {
        match self {
            Coercion::Decimal(slot) => *slot(out) = raw.and_then(parse_decimal),
            Coercion::Integer(slot) => *slot(out) = raw.and_then(parse_leading_int),
            Coercion::Flag(slot) => *slot(out) = parse_flag(raw),
            Coercion::Text(slot) => *slot(out) = raw.map(str::to_string),
        }
    }
}

/// Every form field the payload is built from, in payload order
pub const FIELDS: [(&str, Coercion); 12] = [
    ("area", Coercion::Decimal(|f| &mut f.area)),
    ("bedrooms", Coercion::Integer(|f| &mut f.bedrooms)),
    ("bathrooms", Coercion::Integer(|f| &mut f.bathrooms)),
    ("stories", Coercion::Integer(|f| &mut f.stories)),
    ("mainroad", Coercion::Flag(|f| &mut f.mainroad)),
    ("guestroom", Coercion::Flag(|f| &mut f.guestroom)),
    ("basement", Coercion::Flag(|f| &mut f.basement)),
    ("hotwaterheating", Coercion::Flag(|f| &mut f.hotwaterheating)),
    ("airconditioning", Coercion::Flag(|f| &mut f.airconditioning)),
    ("parking", Coercion::Integer(|f| &mut f.parking)),
    ("prefarea", Coercion::Flag(|f| &mut f.prefarea)),
    ("furnishingstatus", Coercion::Text(|f| &mut f.furnishingstatus)),
];

/// Raw name/value pairs captured from the form
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormData {
    entries: Vec<(String, String)>,
}

impl FormData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            entries: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Decode an `application/x-www-form-urlencoded` body
    pub fn from_urlencoded(body: &str) -> Self {
        Self::from_pairs(url::form_urlencoded::parse(body.trim().as_bytes()).into_owned())
    }

    /// Parse `name=value` arguments
    pub fn from_assignments<S: AsRef<str>>(args: &[S]) -> Result<Self> {
        let mut form = Self::new();
        for arg in args {
            let arg = arg.as_ref();
            let Some((name, value)) = arg.split_once('=') else {
                bail!("expected name=value, got '{}'", arg);
            };
            if name.is_empty() {
                bail!("missing field name in '{}'", arg);
            }
            form.append(name, value);
        }
        Ok(form)
    }

    pub fn append(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.entries.push((name.into(), value.into()));
    }

    /// First value submitted under `name`
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Merge another form's entries after this one's
    pub fn extend(&mut self, other: FormData) {
        self.entries.extend(other.entries);
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Coerce every known field according to [`FIELDS`]
    pub fn coerce(&self) -> CoercedFeatures {
        let mut out = CoercedFeatures::default();
        for (name, coercion) in FIELDS {
            coercion.apply(&mut out, self.get(name));
        }
        out
    }

    /// Entries of `overrides` take precedence over this form's own
    pub fn overridden_by(self, overrides: FormData) -> FormData {
        let mut merged = overrides;
        merged.extend(self);
        merged
    }
}

pub fn parse_flag(raw: Option<&str>) -> bool {
    raw == Some("true")
}

pub fn parse_decimal(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}

pub fn parse_leading_int(raw: &str) -> Option<i64> {
    let s = raw.trim_start();
    let (negative, rest) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let digits_len = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits_len == 0 {
        return None;
    }

    let value: i64 = rest[..digits_len].parse().ok()?;
    Some(if negative { -value } else { value })
}

/// Form values after coercion; numerics are `None` where parsing failed
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CoercedFeatures {
    pub area: Option<f64>,
    pub bedrooms: Option<i64>,
    pub bathrooms: Option<i64>,
    pub stories: Option<i64>,
    pub mainroad: bool,
    pub guestroom: bool,
    pub basement: bool,
    pub hotwaterheating: bool,
    pub airconditioning: bool,
    pub parking: Option<i64>,
    pub prefarea: bool,
    pub furnishingstatus: Option<String>,
}

impl CoercedFeatures {
    /// Names of required numeric fields that did not parse, in form order
    pub fn invalid_fields(&self) -> Vec<&'static str> {
        let checks = [
            ("area", self.area.is_some()),
            ("bedrooms", self.bedrooms.is_some()),
            ("bathrooms", self.bathrooms.is_some()),
            ("stories", self.stories.is_some()),
            ("parking", self.parking.is_some()),
        ];

        checks
            .iter()
            .filter(|(_, ok)| !ok)
            .map(|(name, _)| *name)
            .collect()
    }

    /// Turn the coerced values into a sendable payload.
    /// Only the numeric fields are checked.
    pub fn validate(self) -> Result<FeaturesInput, SubmitError> {
        match (self.area, self.bedrooms, self.bathrooms, self.stories, self.parking) {
            (Some(area), Some(bedrooms), Some(bathrooms), Some(stories), Some(parking)) => {
                Ok(FeaturesInput {
                    area,
                    bedrooms,
                    bathrooms,
                    stories,
                    mainroad: self.mainroad,
                    guestroom: self.guestroom,
                    basement: self.basement,
                    hotwaterheating: self.hotwaterheating,
                    airconditioning: self.airconditioning,
                    parking,
                    prefarea: self.prefarea,
                    furnishingstatus: self.furnishingstatus,
                })
            }
            _ => Err(SubmitError::Validation {
                fields: self.invalid_fields(),
            }),
        }
    }
}

/// Read a form body from disk (urlencoded, one `name=value` per line also accepted)
pub async fn read_form_file(path: &std::path::Path) -> Result<FormData> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read form file {}", path.display()))?;

    let joined = raw
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with('#'))
        .collect::<Vec<_>>()
        .join("&");

    Ok(FormData::from_urlencoded(&joined))
}
