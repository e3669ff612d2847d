//! Model value object representing an oracle model

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Language models known to the OpenAI-compatible oracle (Value Object)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Model {
    Gemini20Flash,
    Gemini25Flash,
    Gemini25Pro,
    Gpt4oMini,
    Gpt41,
    Custom(String),
}

impl Model {
    /// Get the string identifier for this model
    pub fn as_str(&self) -> &str {
        match self {
            Model::Gemini20Flash => "google/gemini-2.0-flash-001",
            Model::Gemini25Flash => "google/gemini-2.5-flash",
            Model::Gemini25Pro => "google/gemini-2.5-pro",
            Model::Gpt4oMini => "openai/gpt-4o-mini",
            Model::Gpt41 => "openai/gpt-4.1",
            Model::Custom(s) => s,
        }
    }

    /// Check if this is a Gemini model
    pub fn is_gemini(&self) -> bool {
        match self {
            Model::Gemini20Flash | Model::Gemini25Flash | Model::Gemini25Pro => true,
            Model::Custom(s) => s.contains("gemini"),
            _ => false,
        }
    }

    /// Whether the provider rejects `system` role messages for this model.
    ///
    /// Gemini models routed through OpenAI-compatible gateways expect system
    /// instructions folded into the first user turn.
    pub fn folds_system_messages(&self) -> bool {
        self.is_gemini()
    }
}

impl Default for Model {
    fn default() -> Self {
        Model::Gemini20Flash
    }
}

impl std::fmt::Display for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Model {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(match s {
            "google/gemini-2.0-flash-001" | "gemini-2.0-flash" => Model::Gemini20Flash,
            "google/gemini-2.5-flash" | "gemini-2.5-flash" => Model::Gemini25Flash,
            "google/gemini-2.5-pro" | "gemini-2.5-pro" => Model::Gemini25Pro,
            "openai/gpt-4o-mini" | "gpt-4o-mini" => Model::Gpt4oMini,
            "openai/gpt-4.1" | "gpt-4.1" => Model::Gpt41,
            other => Model::Custom(other.to_string()),
        })
    }
}

impl Serialize for Model {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Model {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        let Ok(model) = s.parse::<Model>();
        Ok(model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_roundtrip() {
        for model in [Model::Gemini20Flash, Model::Gemini25Flash, Model::Gpt4oMini] {
            let parsed: Model = model.to_string().parse().unwrap();
            assert_eq!(model, parsed);
        }
    }

    #[test]
    fn test_short_aliases() {
        let model: Model = "gemini-2.0-flash".parse().unwrap();
        assert_eq!(model, Model::Gemini20Flash);
    }

    #[test]
    fn test_custom_model() {
        let model: Model = "meta-llama/llama-3.1-70b".parse().unwrap();
        assert_eq!(model, Model::Custom("meta-llama/llama-3.1-70b".to_string()));
        assert!(!model.folds_system_messages());
    }

    #[test]
    fn test_gemini_folds_system() {
        assert!(Model::default().folds_system_messages());
        assert!(Model::Custom("google/gemini-exp".to_string()).is_gemini());
        assert!(!Model::Gpt41.is_gemini());
    }

    #[test]
    fn test_serde_as_string() {
        let json = serde_json::to_string(&Model::Gpt4oMini).unwrap();
        assert_eq!(json, "\"openai/gpt-4o-mini\"");
        let back: Model = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Model::Gpt4oMini);
    }
}
