use serde::Deserialize;

/// Conversion policy for a `Context`.
///
/// Deserialisable so applications can keep it in their own config file:
///
/// ```toml
/// [conversion]
/// strict = true
/// pretty = false
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Options {
    /// Fail on the first sequence element, map entry or flattened field that
    /// does not convert, instead of dropping it.
    pub strict: bool,
    /// Indent JSON produced by `Context::marshal`.
    pub pretty: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_permissive_and_compact() {
        let options = Options::default();
        assert!(!options.strict);
        assert!(!options.pretty);
    }

    #[test]
    fn missing_keys_fall_back_to_defaults() {
        let options: Options = serde_json::from_str(r#"{"strict": true}"#).unwrap();
        assert_eq!(
            options,
            Options {
                strict: true,
                pretty: false
            }
        );
    }
}
