/// Trait for loading service configuration from environment variables.
///
/// Implementors derive `serde::Deserialize` and call `Config::from_env()` at
/// startup. Field `database_url` is read from `DATABASE_URL`, and so on.
///
/// # Panics
///
/// Panics if any required env var is missing or cannot be deserialized.
pub trait Config: Sized + serde::de::DeserializeOwned {
    fn from_env() -> Self {
        Self::try_from_env().expect("failed to load config from environment")
    }

    /// Non-panicking variant, mostly useful in tests.
    fn try_from_env() -> Result<Self, envy::Error> {
        envy::from_env()
    }

    /// Load from an explicit key/value list instead of the process environment.
    fn from_pairs<I>(pairs: I) -> Result<Self, envy::Error>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        envy::from_iter(pairs)
    }
}
