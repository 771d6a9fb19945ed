use super::wire::value_to_string;
use chrono::{DateTime, Utc};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Bedroom filter. `Any` is sent as "0" and means "no constraint"
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Bedrooms {
    #[default]
    Any,
    One,
    Two,
    Three,
    FourPlus,
}

impl Bedrooms {
    /// Value sent to the search backend
    pub fn as_str(&self) -> &'static str {
        match self {
            Bedrooms::Any => "0",
            Bedrooms::One => "1",
            Bedrooms::Two => "2",
            Bedrooms::Three => "3",
            Bedrooms::FourPlus => "4",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Bedrooms::FourPlus => "4+",
            other => other.as_str(),
        }
    }
}

impl FromStr for Bedrooms {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "" | "0" => Ok(Bedrooms::Any),
            "1" => Ok(Bedrooms::One),
            "2" => Ok(Bedrooms::Two),
            "3" => Ok(Bedrooms::Three),
            "4" | "4+" => Ok(Bedrooms::FourPlus),
            other => Err(format!("invalid bedroom count: {}", other)),
        }
    }
}

/// Bathroom filter. `Any` is sent as "0" and means "no constraint"
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Bathrooms {
    #[default]
    Any,
    One,
    Two,
    ThreePlus,
}

impl Bathrooms {
    pub fn as_str(&self) -> &'static str {
        match self {
            Bathrooms::Any => "0",
            Bathrooms::One => "1",
            Bathrooms::Two => "2",
            Bathrooms::ThreePlus => "3",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Bathrooms::ThreePlus => "3+",
            other => other.as_str(),
        }
    }
}

impl FromStr for Bathrooms {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "" | "0" => Ok(Bathrooms::Any),
            "1" => Ok(Bathrooms::One),
            "2" => Ok(Bathrooms::Two),
            "3" | "3+" => Ok(Bathrooms::ThreePlus),
            other => Err(format!("invalid bathroom count: {}", other)),
        }
    }
}

impl fmt::Display for Bedrooms {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl fmt::Display for Bathrooms {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

macro_rules! room_count_serde {
    ($ty:ty) => {
        impl Serialize for $ty {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $ty {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let value = Value::deserialize(deserializer)?;
                value_to_string(&value).parse().map_err(D::Error::custom)
            }
        }
    };
}

room_count_serde!(Bedrooms);
room_count_serde!(Bathrooms);

/// Parse a user-typed price bound. Blank input means "unset"; otherwise the
/// leading run of digits is taken, so "1500 soles" reads as 1500.
pub fn parse_price(input: &str) -> Option<u64> {
    let trimmed = input.trim();
    let digits: String = trimmed.chars().take_while(|c| c.is_ascii_digit()).collect();
    digits.parse().ok()
}

/// Price bounds arrive as numbers, numeric strings, "" or null. Zero is
/// treated as unset, matching how chips are rehydrated.
fn lenient_price<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let price = match &value {
        Value::Number(n) => n.as_u64().or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64)),
        Value::String(s) => parse_price(s),
        _ => None,
    };
    Ok(price.filter(|p| *p > 0))
}

fn lenient_room<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr + Default,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value_to_string(&value).parse().unwrap_or_default())
}

fn lenient_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value_to_string(&value))
}

/// The user-editable search query.
///
/// Trending payloads and stored history deserialize straight into criteria:
/// missing fields take their defaults and unknown room counts become `Any`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterCriteria {
    #[serde(rename = "zona", default, deserialize_with = "lenient_text")]
    pub zone: String,
    #[serde(rename = "dormitorios", default, deserialize_with = "lenient_room")]
    pub bedrooms: Bedrooms,
    #[serde(rename = "banos", default, deserialize_with = "lenient_room")]
    pub bathrooms: Bathrooms,
    #[serde(default, deserialize_with = "lenient_price")]
    pub price_min: Option<u64>,
    #[serde(default, deserialize_with = "lenient_price")]
    pub price_max: Option<u64>,
    #[serde(rename = "palabras_clave", default, deserialize_with = "lenient_text")]
    pub keywords: String,
}

impl FilterCriteria {
    /// True when at least one field differs from its "unset" sentinel
    pub fn is_submittable(&self) -> bool {
        !self.zone.trim().is_empty()
            || self.bedrooms != Bedrooms::Any
            || self.bathrooms != Bathrooms::Any
            || self.price_min.is_some()
            || self.price_max.is_some()
            || !self.keywords.trim().is_empty()
    }

    /// Copy in the form history stores it: a zero price bound counts as unset
    pub fn normalized(&self) -> Self {
        Self {
            price_min: self.price_min.filter(|p| *p > 0),
            price_max: self.price_max.filter(|p| *p > 0),
            ..self.clone()
        }
    }

    /// Identity used to deduplicate search history
    pub fn dedup_key(&self) -> String {
        format!(
            "{}|{}|{}|{}|{}|{}",
            self.zone,
            self.bedrooms.as_str(),
            self.bathrooms.as_str(),
            self.price_min.map(|p| p.to_string()).unwrap_or_default(),
            self.price_max.map(|p| p.to_string()).unwrap_or_default(),
            self.keywords,
        )
    }

    /// Short label for a quick-search chip, e.g. "Miraflores · 2 hab · S/ 0–2000"
    pub fn chip_label(&self) -> String {
        let mut label = if self.zone.is_empty() {
            "Zona".to_string()
        } else {
            self.zone.clone()
        };
        if self.bedrooms != Bedrooms::Any {
            label.push_str(&format!(" · {} hab", self.bedrooms));
        }
        if self.bathrooms != Bathrooms::Any {
            label.push_str(&format!(" · {} baños", self.bathrooms));
        }
        if self.price_min.is_some() || self.price_max.is_some() {
            let min = self.price_min.unwrap_or(0).to_string();
            let max = self
                .price_max
                .map(|p| p.to_string())
                .unwrap_or_else(|| "∞".to_string());
            label.push_str(&format!(" · S/ {}–{}", min, max));
        }
        if !self.keywords.is_empty() {
            label.push_str(&format!(" · {}", self.keywords));
        }
        label
    }
}

/// A submitted search, frozen at the moment it was recorded
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecentSearchEntry {
    #[serde(flatten)]
    pub criteria: FilterCriteria,
    #[serde(rename = "ts", with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
}

impl RecentSearchEntry {
    pub fn new(criteria: FilterCriteria) -> Self {
        Self {
            criteria,
            created_at: Utc::now(),
        }
    }

    pub fn dedup_key(&self) -> String {
        self.criteria.dedup_key()
    }
}
