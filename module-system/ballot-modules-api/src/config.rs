use std::fs::File;
use std::io::Read;
use std::path::Path;

use anyhow::Context as _;
use serde::de::DeserializeOwned;

fn read_to_string<P: AsRef<Path>>(path: P) -> anyhow::Result<String> {
    let path = path.as_ref();
    let mut contents = String::new();
    {
        let mut file =
            File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
        file.read_to_string(&mut contents)?;
    }
    Ok(contents)
}

/// Reads a TOML file and deserializes it into `R`.
pub fn from_toml_path<P: AsRef<Path>, R: DeserializeOwned>(path: P) -> anyhow::Result<R> {
    let contents = read_to_string(path)?;
    let result: R = toml::from_str(&contents)?;

    Ok(result)
}

/// Reads a JSON file and deserializes it into `R`. Genesis configs are usually
/// stored this way.
pub fn from_json_path<P: AsRef<Path>, R: DeserializeOwned>(path: P) -> anyhow::Result<R> {
    let contents = read_to_string(path)?;
    let result: R = serde_json::from_str(&contents)?;

    Ok(result)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use serde::Deserialize;
    use tempfile::NamedTempFile;

    use super::*;
    use crate::Address;

    #[derive(Debug, PartialEq, Deserialize)]
    struct SampleConfig {
        admin: Address,
        names: Vec<String>,
    }

    fn create_config_from(content: &str) -> NamedTempFile {
        let mut config_file = NamedTempFile::new().unwrap();
        config_file.write_all(content.as_bytes()).unwrap();
        config_file
    }

    #[test]
    fn test_correct_toml_config() {
        let admin = Address::from([3; 32]);
        let config = format!(
            r#"
            admin = "{admin}"
            names = ["a", "b"]
        "#
        );

        let config_file = create_config_from(&config);
        let config: SampleConfig = from_toml_path(config_file.path()).unwrap();

        assert_eq!(
            config,
            SampleConfig {
                admin,
                names: vec!["a".to_owned(), "b".to_owned()],
            }
        );
    }

    #[test]
    fn test_correct_json_config() {
        let admin = Address::from([4; 32]);
        let config = format!(r#"{{ "admin": "{admin}", "names": [] }}"#);

        let config_file = create_config_from(&config);
        let config: SampleConfig = from_json_path(config_file.path()).unwrap();

        assert_eq!(config.admin, admin);
        assert!(config.names.is_empty());
    }

    #[test]
    fn test_missing_file_names_the_path() {
        let err = from_json_path::<_, SampleConfig>("/definitely/not/here.json").unwrap_err();
        assert!(err.to_string().contains("/definitely/not/here.json"));
    }

    #[test]
    fn test_malformed_address_is_rejected() {
        let config_file = create_config_from(r#"{ "admin": "bal1nope", "names": [] }"#);
        assert!(from_json_path::<_, SampleConfig>(config_file.path()).is_err());
    }
}
