use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Number, Value};
use std::fmt;

/// Идентификатор, который backend отдает то числом, то строкой.
#[derive(Debug, Serialize, Clone, PartialEq, Eq, Hash)]
#[serde(untagged)]
pub enum Id {
	Int(i64),
	Text(String),
}

impl Id {
	/// Целые числа, в том числе записанные как `2.0`, становятся `Int`.
	fn from_number(n: &Number) -> Id {
		if let Some(i) = n.as_i64() {
			return Id::Int(i);
		}
		match n.as_f64() {
			Some(f) if f.fract() == 0.0 && f.abs() < i64::MAX as f64 => Id::Int(f as i64),
			_ => Id::Text(n.to_string()),
		}
	}
}

impl<'de> Deserialize<'de> for Id {
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
	where
		D: Deserializer<'de>,
	{
		match Value::deserialize(deserializer)? {
			Value::Number(n) => Ok(Id::from_number(&n)),
			Value::String(s) => Ok(Id::Text(s)),
			other => Err(D::Error::custom(format!("invalid id: {}", other))),
		}
	}
}

impl fmt::Display for Id {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Id::Int(n) => write!(f, "{}", n),
			Id::Text(s) => f.write_str(s),
		}
	}
}

impl From<i64> for Id {
	fn from(n: i64) -> Self {
		Id::Int(n)
	}
}

impl From<&str> for Id {
	fn from(s: &str) -> Self {
		Id::Text(s.to_string())
	}
}

pub fn opt_id_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
	D: Deserializer<'de>,
{
	Ok(Option::<Id>::deserialize(deserializer)?
		.map(|id| id.to_string())
		.filter(|id| !id.is_empty()))
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn integral_floats_read_as_integers() {
		let ids: Vec<Id> = serde_json::from_str(r#"[1, 2.0, "x-1", 2.5]"#).unwrap();
		assert_eq!(
			ids,
			vec![Id::Int(1), Id::Int(2), Id::Text("x-1".into()), Id::Text("2.5".into())]
		);
		assert!(serde_json::from_str::<Id>("null").is_err());
		assert!(serde_json::from_str::<Id>("[1]").is_err());
	}
}
