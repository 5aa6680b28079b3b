use crate::domain::value_source::integer_bounds;
use crate::domain::{FillError, FillResult, NamedOperation, ValueSource};
use chrono::{Duration, NaiveDateTime, NaiveTime, Utc};
use fake::faker::address::en::{CityName, CountryName, PostCode, StateAbbr, StreetName};
use fake::faker::internet::en::{DomainSuffix, SafeEmail, Username};
use fake::faker::lorem::en::{Paragraph, Sentence, Word};
use fake::faker::name::en::{FirstName, LastName, Name};
use fake::faker::phone_number::en::PhoneNumber;
use fake::Fake;
use rand::distributions::{Distribution, WeightedIndex};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde_json::{json, Value};
use std::sync::Mutex;

const STRING_POOL: &[u8] =
    b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789!@#$%^&*()[]";

/// Value source backed by `fake` generators and a seedable RNG.
pub struct FakerSource {
    rng: Mutex<StdRng>,
}

impl FakerSource {
    pub fn new() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Deterministic source, for tests and reproducible runs.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    pub fn from_seed(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::seeded(seed),
            None => Self::new(),
        }
    }

    fn with_rng<R>(&self, f: impl FnOnce(&mut StdRng) -> R) -> R {
        let mut rng = self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        f(&mut rng)
    }

    fn text<F>(&self, faker: F) -> Value
    where
        F: Fn(&mut StdRng) -> String,
    {
        json!(self.with_rng(|rng| faker(rng)))
    }
}

impl Default for FakerSource {
    fn default() -> Self {
        Self::new()
    }
}

impl ValueSource for FakerSource {
    fn pick(&self, candidates: &[Value]) -> Value {
        self.with_rng(|rng| candidates.choose(rng).cloned().unwrap_or(Value::Null))
    }

    fn pick_many(&self, candidates: &[Value], count: usize) -> Vec<Value> {
        self.with_rng(|rng| {
            let mut picked = candidates.to_vec();
            picked.shuffle(rng);
            picked.truncate(count);
            picked
        })
    }

    fn weighted(&self, values: &[Value], weights: &[f64]) -> FillResult<Value> {
        if values.len() != weights.len() {
            return Err(FillError::Source(format!(
                "weighted choice needs as many weights as values ({} != {})",
                weights.len(),
                values.len()
            )));
        }
        let dist = WeightedIndex::new(weights)
            .map_err(|e| FillError::Source(format!("invalid weights {:?}: {}", weights, e)))?;
        let index = self.with_rng(|rng| dist.sample(rng));
        Ok(values[index].clone())
    }

    fn integer(&self, min: i64, max: i64) -> i64 {
        if min >= max {
            return min;
        }
        self.with_rng(|rng| rng.gen_range(min..=max))
    }

    fn birthday(&self) -> NaiveDateTime {
        let today = Utc::now().date_naive();
        let (age_days, seconds) = self.with_rng(|rng| {
            (rng.gen_range(18 * 365..=65 * 365), rng.gen_range(0..86_400u32))
        });
        let time = NaiveTime::from_num_seconds_from_midnight_opt(seconds, 0).unwrap_or(NaiveTime::MIN);
        (today - Duration::days(age_days)).and_time(time)
    }

    fn domain(&self, op: NamedOperation, args: &[Value]) -> FillResult<Value> {
        let value = match op {
            NamedOperation::Pick
            | NamedOperation::Weighted
            | NamedOperation::Integer
            | NamedOperation::Birthday => return self.call(op, args),
            NamedOperation::Natural => {
                let (min, max) = integer_bounds(args);
                json!(self.integer(min.max(0), max))
            }
            NamedOperation::Bool => json!(self.with_rng(|rng| rng.gen_bool(0.5))),
            NamedOperation::Color => {
                json!(format!("#{:06x}", self.with_rng(|rng| rng.gen_range(0..=0xFF_FFFFu32))))
            }
            NamedOperation::String => self.text(|rng| {
                let len = rng.gen_range(5..=20);
                (0..len)
                    .map(|_| STRING_POOL[rng.gen_range(0..STRING_POOL.len())] as char)
                    .collect()
            }),
            NamedOperation::Email => self.text(|rng| SafeEmail().fake_with_rng(rng)),
            NamedOperation::Phone => self.text(|rng| PhoneNumber().fake_with_rng(rng)),
            NamedOperation::Sentence => self.text(|rng| Sentence(3..10).fake_with_rng(rng)),
            NamedOperation::Word => self.text(|rng| Word().fake_with_rng(rng)),
            NamedOperation::Paragraph => self.text(|rng| Paragraph(1..3).fake_with_rng(rng)),
            NamedOperation::Url => self.text(|rng| {
                let host: String = Word().fake_with_rng(rng);
                let suffix: String = DomainSuffix().fake_with_rng(rng);
                format!("http://{}.{}", host.to_lowercase(), suffix)
            }),
            NamedOperation::Name => self.text(|rng| Name().fake_with_rng(rng)),
            NamedOperation::First => self.text(|rng| FirstName().fake_with_rng(rng)),
            NamedOperation::Last => self.text(|rng| LastName().fake_with_rng(rng)),
            NamedOperation::Username => self.text(|rng| Username().fake_with_rng(rng)),
            NamedOperation::Street => self.text(|rng| StreetName().fake_with_rng(rng)),
            NamedOperation::City => self.text(|rng| CityName().fake_with_rng(rng)),
            NamedOperation::State => self.text(|rng| StateAbbr().fake_with_rng(rng)),
            NamedOperation::Country => self.text(|rng| CountryName().fake_with_rng(rng)),
            NamedOperation::Zip => self.text(|rng| PostCode().fake_with_rng(rng)),
            NamedOperation::Guid => {
                let bytes: [u8; 16] = self.with_rng(|rng| rng.gen());
                json!(uuid::Builder::from_random_bytes(bytes).into_uuid().to_string())
            }
        };
        Ok(value)
    }
}
