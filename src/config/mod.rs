//! Configuration module
//!
//! Engine settings, plus extraction of settings and attribute records from
//! Python dicts when the `python` feature is enabled.

mod engine;

pub use engine::*;

#[cfg(feature = "python")]
pub use python::*;

#[cfg(feature = "python")]
mod python {
    use pyo3::prelude::*;
    use pyo3::types::{PyBool, PyDict};

    use super::EngineConfig;
    use crate::attribute::{AttributeValue, Attributes};
    use crate::error::RuleError;
    use crate::rule::Connective;

    /// Deserialize an attribute record from a Python dict.
    /// Expected format: {"age": 35, "department": "Sales", ...}
    ///
    /// Keys listed in `skip` are ignored (e.g. the `rule` field of an
    /// evaluation request).
    pub fn deserialize_attributes(
        data: &Bound<'_, PyDict>,
        skip: &[&str],
    ) -> PyResult<Attributes> {
        let mut attributes = Attributes::with_capacity(data.len());

        for (key, value) in data.iter() {
            let name: String = key.extract()?;
            if skip.contains(&name.as_str()) {
                continue;
            }
            let value = extract_attribute(&name, &value)?;
            attributes.insert(name, value);
        }

        Ok(attributes)
    }

    fn extract_attribute(name: &str, obj: &Bound<'_, PyAny>) -> PyResult<AttributeValue> {
        // bool is an int subclass in Python; it is neither of our types
        if obj.is_instance_of::<PyBool>() {
            return Err(RuleError::InvalidAttribute(name.to_string()).into());
        }
        if let Ok(v) = obj.extract::<i32>() {
            return Ok(AttributeValue::Integer(v));
        }
        if let Ok(s) = obj.extract::<String>() {
            return Ok(AttributeValue::Text(s));
        }
        Err(RuleError::InvalidAttribute(name.to_string()).into())
    }

    /// Deserialize engine settings from a Python dict; absent keys keep defaults
    pub fn deserialize_engine_config(config: &Bound<'_, PyDict>) -> PyResult<EngineConfig> {
        let mut engine = EngineConfig::default();

        if let Some(value) = config.get_item("default_connective")? {
            if !value.is_none() {
                let text: String = value.extract()?;
                engine.default_connective = text.parse::<Connective>()?;
            }
        }

        if let Some(value) = config.get_item("cache_capacity")? {
            if !value.is_none() {
                engine.cache_capacity = value.extract()?;
            }
        }

        Ok(engine)
    }
}
