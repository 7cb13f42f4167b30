use std::path::PathBuf;
use std::collections::HashMap;

use serde::Deserialize;

// raw file contents. every field is optional so that files can be layered,
// later files overriding what earlier ones set

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Templates {
    pub dev_mode: Option<bool>,
    pub directory: Option<PathBuf>
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Assets {
    pub directory: Option<PathBuf>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Db {
    pub user: Option<String>,
    pub password: Option<String>,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub dbname: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Session {
    pub secure: Option<bool>,
    pub domain: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Sec {
    pub session: Option<Session>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Generator {
    pub endpoint: Option<String>,
    pub token: Option<String>,
    pub timeout_secs: Option<u64>,
    pub max_length: Option<u32>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Service {
    pub endpoint: Option<String>,
    pub token: Option<String>,
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Assistant {
    pub history_limit: Option<usize>,
    pub generator: Option<Generator>,
    pub translator: Option<Service>,
    pub speech: Option<Service>,
    pub information: Option<Service>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Listener {
    pub addr: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    pub data: Option<PathBuf>,
    pub master_key: Option<String>,

    pub listeners: Option<HashMap<String, Listener>>,

    pub templates: Option<Templates>,
    pub assets: Option<Assets>,

    pub sec: Option<Sec>,
    pub db: Option<Db>,

    pub assistant: Option<Assistant>,
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn unknown_keys_rejected() {
        let result = serde_yaml::from_str::<Settings>("assistant:\n  histroy_limit: 5\n");

        assert!(result.is_err());
    }
}
